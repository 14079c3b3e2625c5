use thiserror::Error;

use ps_core::{MAX_PHASES, Phase};

/// Registration errors.  All are fatal: the engine must not be constructed.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PhaseError {
    #[error("phase {phase} is outside the supported range 0..{max}", max = MAX_PHASES)]
    OutOfRange { phase: usize },

    #[error("more than one behavior registered for {0}")]
    DuplicateBehavior(Phase),

    #[error("more than one eligibility flag registered for {0}")]
    DuplicateEligibility(Phase),
}

pub type PhaseResult<T> = Result<T, PhaseError>;

/// Failure of one agent's behavior in one phase.
///
/// Never fatal to the round: the engine logs it and carries on with the
/// other agents.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BehaviorError {
    #[error("{0}")]
    Failed(String),

    #[error("behavior panicked: {0}")]
    Panicked(String),
}

impl BehaviorError {
    pub fn failed(msg: impl Into<String>) -> Self {
        BehaviorError::Failed(msg.into())
    }
}

pub type BehaviorResult = Result<(), BehaviorError>;
