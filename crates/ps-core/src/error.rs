//! Framework error type.
//!
//! Sub-crates define their own error enums and wrap `CoreError` as one
//! variant where they need to surface core validation failures.

use thiserror::Error;

/// The base error type for `ps-core`.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("phase {0} is outside the supported range 0..{max}", max = crate::MAX_PHASES)]
    PhaseOutOfRange(usize),
}

/// Shorthand result type for `ps-core`.
pub type CoreResult<T> = Result<T, CoreError>;
