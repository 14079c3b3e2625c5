//! The `MetricsWriter` trait implemented by metrics backends.

use crate::{OutputResult, PhaseTimingRow, RoundSummaryRow};

/// Sink for per-phase and per-round metrics rows.
///
/// Errors are returned here but swallowed by the observer, which keeps the
/// first one for [`PhaseMetricsObserver::take_error`](crate::PhaseMetricsObserver::take_error).
pub trait MetricsWriter {
    /// Write the timing rows of one round, in phase order.
    fn write_phase_timings(&mut self, rows: &[PhaseTimingRow]) -> OutputResult<()>;

    fn write_round_summary(&mut self, row: &RoundSummaryRow) -> OutputResult<()>;

    /// Flush and close all underlying file handles.
    ///
    /// Idempotent.
    fn finish(&mut self) -> OutputResult<()>;
}
