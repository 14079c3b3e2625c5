//! CSV metrics backend.
//!
//! Creates two files in the configured output directory:
//! - `phase_timings.csv`
//! - `round_summaries.csv`

use std::fs::File;
use std::path::Path;

use csv::Writer;

use crate::writer::MetricsWriter;
use crate::{OutputResult, PhaseTimingRow, RoundSummaryRow};

/// Writes engine metrics to two CSV files.
pub struct CsvMetricsWriter {
    timings:   Writer<File>,
    summaries: Writer<File>,
    finished:  bool,
}

impl CsvMetricsWriter {
    /// Create the two CSV files in `dir` and write the header rows.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        std::fs::create_dir_all(dir)?;

        let mut timings = Writer::from_path(dir.join("phase_timings.csv"))?;
        timings.write_record([
            "round", "phase", "threads", "dispatched", "failed", "skipped", "elapsed_us",
        ])?;

        let mut summaries = Writer::from_path(dir.join("round_summaries.csv"))?;
        summaries.write_record(["round", "threads", "phases", "dispatched", "failed", "elapsed_us"])?;

        Ok(Self { timings, summaries, finished: false })
    }
}

impl MetricsWriter for CsvMetricsWriter {
    fn write_phase_timings(&mut self, rows: &[PhaseTimingRow]) -> OutputResult<()> {
        for row in rows {
            self.timings.write_record(&[
                row.round.to_string(),
                row.phase.to_string(),
                row.threads.to_string(),
                row.dispatched.to_string(),
                row.failed.to_string(),
                row.skipped.to_string(),
                row.elapsed_micros.to_string(),
            ])?;
        }
        Ok(())
    }

    fn write_round_summary(&mut self, row: &RoundSummaryRow) -> OutputResult<()> {
        self.summaries.write_record(&[
            row.round.to_string(),
            row.threads.to_string(),
            row.phases.to_string(),
            row.dispatched.to_string(),
            row.failed.to_string(),
            row.elapsed_micros.to_string(),
        ])?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.timings.flush()?;
        self.summaries.flush()?;
        Ok(())
    }
}
