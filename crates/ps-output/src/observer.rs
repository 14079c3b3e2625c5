//! `PhaseMetricsObserver<W>` — bridges `EngineObserver` to a `MetricsWriter`.

use ps_core::Round;
use ps_engine::{EngineObserver, RoundReport};

use crate::row::{PhaseTimingRow, RoundSummaryRow};
use crate::writer::MetricsWriter;
use crate::{OutputError, OutputResult};

/// An [`EngineObserver`] that writes one timing row per phase and one
/// summary row per round to any [`MetricsWriter`].
///
/// Observer hooks cannot fail, so writer errors are stored.  After the run,
/// check with [`take_error`](Self::take_error).
pub struct PhaseMetricsObserver<W: MetricsWriter> {
    writer:     W,
    rounds:     u64,
    last_error: Option<OutputError>,
}

impl<W: MetricsWriter> PhaseMetricsObserver<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, rounds: 0, last_error: None }
    }

    /// Take the stored write error (if any).
    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    /// Rounds recorded so far.
    pub fn rounds_recorded(&self) -> u64 {
        self.rounds
    }

    pub fn into_writer(self) -> W {
        self.writer
    }

    fn store_err(&mut self, result: OutputResult<()>) {
        if let Err(e) = result {
            // Keep only the first error.
            if self.last_error.is_none() {
                log::warn!("metrics write failed: {e}");
                self.last_error = Some(e);
            }
        }
    }
}

impl<W: MetricsWriter> EngineObserver for PhaseMetricsObserver<W> {
    // Phase rows are written from the round report so a round's timings
    // land together.
    fn on_round_end(&mut self, report: &RoundReport) {
        let rows: Vec<PhaseTimingRow> = report
            .phases
            .iter()
            .map(|p| PhaseTimingRow::from_report(report.round.0, report.threads, p))
            .collect();
        if !rows.is_empty() {
            let result = self.writer.write_phase_timings(&rows);
            self.store_err(result);
        }

        let result = self.writer.write_round_summary(&RoundSummaryRow::from(report));
        self.store_err(result);
        self.rounds += 1;
    }

    fn on_engine_end(&mut self, _final_round: Round) {
        let result = self.writer.finish();
        self.store_err(result);
    }
}
