//! Bounded phase index.

use std::fmt;

use crate::{CoreError, CoreResult};

/// Number of phase slots reserved per agent type.  Phases are `0..MAX_PHASES`.
pub const MAX_PHASES: usize = 5;

/// One ordered stage of per-round processing.
///
/// A `Phase` is always in range; construct through [`Phase::new`] or the
/// named constants.  Deserialization goes through the same range check.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "usize"))]
pub struct Phase(u8);

impl Phase {
    pub const FIRST:  Phase = Phase(0);
    pub const SECOND: Phase = Phase(1);
    pub const THIRD:  Phase = Phase(2);
    pub const FOURTH: Phase = Phase(3);
    pub const FIFTH:  Phase = Phase(4);

    /// Validate `n` against [`MAX_PHASES`].
    pub fn new(n: usize) -> CoreResult<Phase> {
        if n < MAX_PHASES {
            Ok(Phase(n as u8))
        } else {
            Err(CoreError::PhaseOutOfRange(n))
        }
    }

    #[inline(always)]
    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// All phases in execution order.
    pub fn all() -> impl Iterator<Item = Phase> {
        (0..MAX_PHASES as u8).map(Phase)
    }
}

impl TryFrom<usize> for Phase {
    type Error = CoreError;
    fn try_from(n: usize) -> CoreResult<Phase> {
        Phase::new(n)
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "phase {}", self.0)
    }
}
