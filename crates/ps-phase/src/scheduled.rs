//! The `PhaseScheduled` trait — the registration point for agent types.

use crate::{BehaviorResult, PhaseRegistryBuilder, PhaseResult};

/// Reads one per-agent boolean: "should this agent run this phase?".
pub type EligibilityFn<A> = fn(&A) -> bool;

/// Runs one per-agent, argument-free phase behavior.
pub type BehaviorFn<A> = fn(&A) -> BehaviorResult;

/// An agent type whose behaviors are driven phase by phase.
///
/// # Thread safety
///
/// Within a phase the engine invokes behaviors for many agents at once, on
/// pool threads, through shared `&Self` references.  Implementors keep their
/// mutable state behind atomics or locks.  A behavior may read other agents
/// (e.g. graph neighbors), but those agents can be mid-update in the same
/// phase; such reads must tolerate stale values.
pub trait PhaseScheduled: Send + Sync + Sized + 'static {
    /// Declare this type's per-phase eligibility flags and behaviors.
    ///
    /// Called exactly once per engine, at construction.
    fn register_phases(reg: &mut PhaseRegistryBuilder<Self>) -> PhaseResult<()>;
}
