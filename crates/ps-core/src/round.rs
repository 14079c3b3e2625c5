//! Round counter and engine configuration.
//!
//! # Design
//!
//! Simulated time advances in whole rounds.  One round is a full pass through
//! every registered phase for the whole agent population; there is no finer
//! time resolution inside a round.

use std::fmt;
use std::time::Duration;

use crate::{CoreError, CoreResult};

// ── Round ─────────────────────────────────────────────────────────────────────

/// An absolute round counter, starting at 0.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Round(pub u64);

impl Round {
    pub const ZERO: Round = Round(0);

    /// The round after `self`.
    #[inline]
    pub fn next(self) -> Round {
        Round(self.0 + 1)
    }

    /// Rounds elapsed from `earlier` to `self`.
    #[inline]
    pub fn since(self, earlier: Round) -> u64 {
        self.0 - earlier.0
    }
}

impl std::ops::Add<u64> for Round {
    type Output = Round;
    #[inline]
    fn add(self, rhs: u64) -> Round {
        Round(self.0 + rhs)
    }
}

impl fmt::Display for Round {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "R{}", self.0)
    }
}

// ── EngineConfig ──────────────────────────────────────────────────────────────

/// Top-level execution configuration.
///
/// Typically assembled by the application from CLI arguments or a config
/// file and handed to the engine builder.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EngineConfig {
    /// Worker thread count for the phase pool.  `None` uses all logical cores.
    pub num_threads: Option<usize>,

    /// Upper bound on how long the round driver waits for one phase to drain.
    /// `None` waits indefinitely.
    pub phase_timeout: Option<Duration>,

    /// Total rounds for whole-run drivers.  Engines
    /// stepped manually ignore it.
    pub total_rounds: u64,

    /// Master RNG seed.  The same seed always produces identical per-agent
    /// random streams.
    pub seed: u64,
}

impl EngineConfig {
    /// The round at which a full run ends (exclusive upper bound).
    #[inline]
    pub fn end_round(&self) -> Round {
        Round(self.total_rounds)
    }

    /// Reject settings the engine cannot honor.
    pub fn validate(&self) -> CoreResult<()> {
        if self.num_threads == Some(0) {
            return Err(CoreError::Config("num_threads must be at least 1".into()));
        }
        if self.phase_timeout == Some(Duration::ZERO) {
            return Err(CoreError::Config("phase_timeout must be non-zero".into()));
        }
        Ok(())
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            num_threads:   None,
            phase_timeout: None,
            total_rounds:  0,
            seed:          0,
        }
    }
}
