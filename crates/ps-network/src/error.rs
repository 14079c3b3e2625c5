//! Network-subsystem error type.

use thiserror::Error;

use ps_core::AgentId;

/// Errors produced by `ps-network`.
///
/// All variants are fatal for the operation that returned them.  Recoverable
/// data problems (malformed lines, unresolved node references) are logged
/// and skipped instead.
#[derive(Debug, Error)]
pub enum NetworkError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("failed to read edge list {source_name}: {source}")]
    Io {
        source_name: String,
        #[source]
        source:      std::io::Error,
    },

    #[error("node count mismatch: expected {expected} but found {found}")]
    NodeCountMismatch { expected: usize, found: usize },

    #[error("{0} was added to the graph more than once")]
    DuplicateHandle(AgentId),

    #[error("{0} is not a node of the graph")]
    UnknownHandle(AgentId),
}

pub type NetworkResult<T> = Result<T, NetworkError>;
