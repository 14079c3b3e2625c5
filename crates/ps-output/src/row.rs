//! Plain data row types written by metrics backends.

use ps_engine::{PhaseReport, RoundReport};

/// Timing and outcome counts for one phase of one round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseTimingRow {
    pub round:          u64,
    pub phase:          u8,
    pub threads:        u32,
    pub dispatched:     u64,
    pub failed:         u64,
    pub skipped:        u64,
    pub elapsed_micros: u64,
}

impl PhaseTimingRow {
    pub fn from_report(round: u64, threads: usize, report: &PhaseReport) -> Self {
        Self {
            round,
            phase:          report.phase.index() as u8,
            threads:        threads as u32,
            dispatched:     report.dispatched as u64,
            failed:         report.failed as u64,
            skipped:        report.skipped as u64,
            elapsed_micros: report.elapsed.as_micros() as u64,
        }
    }
}

/// Totals for one round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundSummaryRow {
    pub round:          u64,
    pub threads:        u32,
    /// Phases that ran (equals barriers consumed).
    pub phases:         u32,
    pub dispatched:     u64,
    pub failed:         u64,
    pub elapsed_micros: u64,
}

impl From<&RoundReport> for RoundSummaryRow {
    fn from(report: &RoundReport) -> Self {
        Self {
            round:          report.round.0,
            threads:        report.threads as u32,
            phases:         report.barriers() as u32,
            dispatched:     report.dispatched() as u64,
            failed:         report.failed() as u64,
            elapsed_micros: report.elapsed.as_micros() as u64,
        }
    }
}
