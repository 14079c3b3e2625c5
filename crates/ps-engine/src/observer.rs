//! Engine observer trait for progress reporting and metrics collection.

use ps_core::Round;

use crate::{PhaseReport, RoundReport};

/// Callbacks invoked by the round driver at phase and round boundaries.
///
/// Observers are owned by the caller and passed in per call, so several
/// engines in one process never share instrumentation state.  All methods
/// have no-op defaults.
///
/// # Example — slow phase logger
///
/// ```rust,ignore
/// struct SlowPhases { limit: Duration }
///
/// impl EngineObserver for SlowPhases {
///     fn on_phase_end(&mut self, round: Round, report: &PhaseReport) {
///         if report.elapsed > self.limit {
///             log::warn!("{round} {} took {:?}", report.phase, report.elapsed);
///         }
///     }
/// }
/// ```
pub trait EngineObserver {
    /// Called before the first phase of a round.
    fn on_round_start(&mut self, _round: Round) {}

    /// Called after each phase barrier releases.
    fn on_phase_end(&mut self, _round: Round, _report: &PhaseReport) {}

    /// Called after the last phase of a round.
    fn on_round_end(&mut self, _report: &RoundReport) {}

    /// Called once when a multi-round run finishes.
    fn on_engine_end(&mut self, _final_round: Round) {}
}

/// An [`EngineObserver`] that does nothing.
pub struct NoopObserver;

impl EngineObserver for NoopObserver {}

/// Fan out to two observers, left first.
impl<L: EngineObserver, R: EngineObserver> EngineObserver for (L, R) {
    fn on_round_start(&mut self, round: Round) {
        self.0.on_round_start(round);
        self.1.on_round_start(round);
    }

    fn on_phase_end(&mut self, round: Round, report: &PhaseReport) {
        self.0.on_phase_end(round, report);
        self.1.on_phase_end(round, report);
    }

    fn on_round_end(&mut self, report: &RoundReport) {
        self.0.on_round_end(report);
        self.1.on_round_end(report);
    }

    fn on_engine_end(&mut self, final_round: Round) {
        self.0.on_engine_end(final_round);
        self.1.on_engine_end(final_round);
    }
}
