use ps_core::{CoreError, Phase, Round};
use ps_phase::PhaseError;
use thiserror::Error;

use crate::EngineState;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("engine configuration error: {0}")]
    Config(#[from] CoreError),

    #[error("phase registration error: {0}")]
    Registration(#[from] PhaseError),

    #[error("failed to start worker pool: {0}")]
    Pool(#[from] rayon::ThreadPoolBuildError),

    #[error("{operation} is not allowed in state {state:?}")]
    InvalidState {
        operation: &'static str,
        state:     EngineState,
    },

    #[error("{round} {phase} did not drain within the timeout ({pending} units still running)")]
    PhaseTimeout {
        round:   Round,
        phase:   Phase,
        pending: usize,
    },

    #[error("{round} cancelled during {phase}")]
    Cancelled { round: Round, phase: Phase },
}

pub type EngineResult<T> = Result<T, EngineError>;
