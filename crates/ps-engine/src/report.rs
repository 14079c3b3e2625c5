//! Per-phase and per-round execution summaries.

use std::time::Duration;

use ps_core::{Phase, Round};

/// What happened in one phase of one round.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PhaseReport {
    pub phase:      Phase,
    /// Agents whose eligibility flag was true and whose unit was submitted.
    pub dispatched: usize,
    /// Units whose behavior returned an error or panicked.
    pub failed:     usize,
    /// Units that were submitted but never ran because of cancellation.
    pub skipped:    usize,
    /// Wall time from first submission until the barrier released.
    pub elapsed:    Duration,
}

impl PhaseReport {
    /// Units that ran to completion without error.
    pub fn succeeded(&self) -> usize {
        self.dispatched - self.failed - self.skipped
    }
}

/// What happened in one round.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RoundReport {
    pub round:   Round,
    /// Worker threads available to the round.
    pub threads: usize,
    /// One entry per phase that ran, in execution order.  Skipped
    /// (unregistered) phases do not appear.
    pub phases:  Vec<PhaseReport>,
    pub elapsed: Duration,
}

impl RoundReport {
    pub(crate) fn empty(round: Round, threads: usize) -> Self {
        Self { round, threads, phases: Vec::new(), elapsed: Duration::ZERO }
    }

    /// Barriers consumed: one per phase that ran.
    pub fn barriers(&self) -> usize {
        self.phases.len()
    }

    pub fn dispatched(&self) -> usize {
        self.phases.iter().map(|p| p.dispatched).sum()
    }

    pub fn failed(&self) -> usize {
        self.phases.iter().map(|p| p.failed).sum()
    }

    pub fn phase(&self, phase: Phase) -> Option<&PhaseReport> {
        self.phases.iter().find(|p| p.phase == phase)
    }
}

/// Running totals over an engine's lifetime.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EngineStats {
    pub rounds_completed: u64,
    pub barriers:         u64,
    pub dispatched:       u64,
    pub failed:           u64,
    pub skipped:          u64,
}

impl EngineStats {
    pub(crate) fn record_phase(&mut self, report: &PhaseReport) {
        self.barriers   += 1;
        self.dispatched += report.dispatched as u64;
        self.failed     += report.failed as u64;
        self.skipped    += report.skipped as u64;
    }
}
