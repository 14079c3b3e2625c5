//! Fixed-size per-phase dispatch tables.

use std::fmt;

use log::warn;

use ps_core::{MAX_PHASES, Phase};

use crate::{BehaviorFn, BehaviorResult, EligibilityFn, PhaseError, PhaseResult, PhaseScheduled};

// ── PhaseEntry ────────────────────────────────────────────────────────────────

/// The resolved registration for one phase of one agent type.
pub struct PhaseEntry<A> {
    pub phase:       Phase,
    pub eligibility: EligibilityFn<A>,
    pub behavior:    BehaviorFn<A>,
}

impl<A> PhaseEntry<A> {
    #[inline]
    pub fn is_eligible(&self, agent: &A) -> bool {
        (self.eligibility)(agent)
    }

    #[inline]
    pub fn invoke(&self, agent: &A) -> BehaviorResult {
        (self.behavior)(agent)
    }
}

// `fn(&A)` is always Copy; derive would demand `A: Copy`.
impl<A> Clone for PhaseEntry<A> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<A> Copy for PhaseEntry<A> {}

impl<A> fmt::Debug for PhaseEntry<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PhaseEntry")
            .field("phase", &self.phase)
            .finish_non_exhaustive()
    }
}

// ── PhaseRegistryBuilder ──────────────────────────────────────────────────────

/// Collects registrations; rejects out-of-range and duplicate phases.
pub struct PhaseRegistryBuilder<A> {
    eligibility: [Option<EligibilityFn<A>>; MAX_PHASES],
    behaviors:   [Option<BehaviorFn<A>>; MAX_PHASES],
}

impl<A> PhaseRegistryBuilder<A> {
    pub fn new() -> Self {
        Self {
            eligibility: [None; MAX_PHASES],
            behaviors:   [None; MAX_PHASES],
        }
    }

    /// Register the eligibility flag accessor for `phase`.
    pub fn eligibility(&mut self, phase: usize, flag: EligibilityFn<A>) -> PhaseResult<&mut Self> {
        let p = checked(phase)?;
        let slot = &mut self.eligibility[p.index()];
        if slot.is_some() {
            return Err(PhaseError::DuplicateEligibility(p));
        }
        *slot = Some(flag);
        Ok(self)
    }

    /// Register the behavior for `phase`.
    pub fn behavior(&mut self, phase: usize, run: BehaviorFn<A>) -> PhaseResult<&mut Self> {
        let p = checked(phase)?;
        let slot = &mut self.behaviors[p.index()];
        if slot.is_some() {
            return Err(PhaseError::DuplicateBehavior(p));
        }
        *slot = Some(run);
        Ok(self)
    }

    /// Register both halves of a phase at once.
    pub fn phase(
        &mut self,
        phase: usize,
        flag:  EligibilityFn<A>,
        run:   BehaviorFn<A>,
    ) -> PhaseResult<&mut Self> {
        self.eligibility(phase, flag)?.behavior(phase, run)
    }

    /// Freeze the tables.
    ///
    /// A phase runs only when both its flag and its behavior are
    /// registered.  A half-registered phase is dropped with a warning.
    pub fn build(self) -> PhaseRegistry<A> {
        let mut eligibility = self.eligibility;
        let mut behaviors = self.behaviors;
        for phase in Phase::all() {
            let i = phase.index();
            match (eligibility[i], behaviors[i]) {
                (Some(_), None) => {
                    warn!("{phase} has an eligibility flag but no behavior; it will be skipped");
                    eligibility[i] = None;
                }
                (None, Some(_)) => {
                    warn!("{phase} has a behavior but no eligibility flag; it will be skipped");
                    behaviors[i] = None;
                }
                _ => {}
            }
        }
        PhaseRegistry { eligibility, behaviors }
    }
}

impl<A> Default for PhaseRegistryBuilder<A> {
    fn default() -> Self {
        Self::new()
    }
}

fn checked(phase: usize) -> PhaseResult<Phase> {
    Phase::new(phase).map_err(|_| PhaseError::OutOfRange { phase })
}

// ── PhaseRegistry ─────────────────────────────────────────────────────────────

/// Immutable per-phase tables for one agent type.
///
/// Indexed by phase; built once and then only read, so it can be shared
/// across worker threads without synchronization.
pub struct PhaseRegistry<A> {
    eligibility: [Option<EligibilityFn<A>>; MAX_PHASES],
    behaviors:   [Option<BehaviorFn<A>>; MAX_PHASES],
}

impl<A: PhaseScheduled> PhaseRegistry<A> {
    /// Run `A::register_phases` and freeze the result.
    pub fn discover() -> PhaseResult<Self> {
        let mut builder = PhaseRegistryBuilder::new();
        A::register_phases(&mut builder)?;
        Ok(builder.build())
    }
}

impl<A> PhaseRegistry<A> {
    /// The registration for `phase`, or `None` if the phase is not
    /// registered.
    #[inline]
    pub fn entry(&self, phase: Phase) -> Option<PhaseEntry<A>> {
        let i = phase.index();
        match (self.eligibility[i], self.behaviors[i]) {
            (Some(eligibility), Some(behavior)) => Some(PhaseEntry { phase, eligibility, behavior }),
            _ => None,
        }
    }

    pub fn is_registered(&self, phase: Phase) -> bool {
        self.entry(phase).is_some()
    }

    /// Registered entries in execution order.
    pub fn entries(&self) -> impl Iterator<Item = PhaseEntry<A>> + '_ {
        Phase::all().filter_map(|p| self.entry(p))
    }

    pub fn registered_phases(&self) -> Vec<Phase> {
        self.entries().map(|e| e.phase).collect()
    }

    /// `false` for unregistered phases.
    pub fn is_eligible(&self, phase: Phase, agent: &A) -> bool {
        self.entry(phase).is_some_and(|e| e.is_eligible(agent))
    }

    /// Invoke `agent`'s behavior for `phase`.  Unregistered phases are a
    /// no-op.
    pub fn invoke(&self, phase: Phase, agent: &A) -> BehaviorResult {
        match self.entry(phase) {
            Some(e) => e.invoke(agent),
            None => Ok(()),
        }
    }
}

impl<A> fmt::Debug for PhaseRegistry<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PhaseRegistry")
            .field("registered", &self.registered_phases())
            .finish()
    }
}
