//! The `PhaseEngine` struct and its round loop.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Instant;

use log::{debug, info, warn};
use rayon::ThreadPool;

use ps_core::{EngineConfig, Phase, Round};
use ps_phase::{BehaviorError, PhaseEntry, PhaseRegistry};

use crate::{
    CancelToken, EngineError, EngineObserver, EngineResult, EngineStats, NoopObserver,
    PhaseReport, RoundReport, WaitGroup,
};

/// Shared, reference-counted agent handle.
///
/// Agents mutate their own state through interior mutability (atomics,
/// `Mutex`, `AgentRng`); the engine only ever holds `&A`.
pub type AgentHandle<A> = Arc<A>;

// ── EngineState ───────────────────────────────────────────────────────────────

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum EngineState {
    /// Constructed, no agents yet.
    Idle,
    /// Agents present, between rounds.
    Ready,
    /// Units of this phase are in flight.
    PhaseRunning(Phase),
    /// The last round finished; agents may still be added.
    RoundComplete,
    /// Pool released.  Terminal.
    ShutDown,
    /// A phase failed to drain in time.  Units may still be running, so the
    /// engine refuses to step again.
    Faulted,
}

impl EngineState {
    /// `true` while the agent collection may be modified.
    fn between_rounds(self) -> bool {
        matches!(self, Self::Idle | Self::Ready | Self::RoundComplete)
    }
}

// ── Per-phase shared counters ─────────────────────────────────────────────────

/// Written by worker units, read by the driver after the barrier.
#[derive(Default)]
struct PhaseTally {
    failed:  AtomicUsize,
    skipped: AtomicUsize,
    /// Set by the driver after a barrier timeout; queued units return early.
    abort:   AtomicBool,
}

// ── PhaseEngine ───────────────────────────────────────────────────────────────

/// Phased execution engine for one agent type.
///
/// Holds the agent collection, the frozen phase registry, and a single
/// long-lived worker pool reused by every phase of every round.
///
/// Create via [`EngineBuilder`](crate::EngineBuilder).
pub struct PhaseEngine<A: Send + Sync + 'static> {
    config:   EngineConfig,
    registry: Arc<PhaseRegistry<A>>,
    agents:   Vec<AgentHandle<A>>,
    /// `None` after [`shutdown`](Self::shutdown).
    pool:     Option<ThreadPool>,
    threads:  usize,
    cancel:   CancelToken,
    round:    Round,
    stats:    EngineStats,
    state:    EngineState,
}

impl<A: Send + Sync + 'static> PhaseEngine<A> {
    pub(crate) fn new(
        config:   EngineConfig,
        registry: PhaseRegistry<A>,
        pool:     ThreadPool,
        cancel:   CancelToken,
        capacity: usize,
    ) -> Self {
        let threads = pool.current_num_threads();
        Self {
            config,
            registry: Arc::new(registry),
            agents: Vec::with_capacity(capacity),
            pool: Some(pool),
            threads,
            cancel,
            round: Round::ZERO,
            stats: EngineStats::default(),
            state: EngineState::Idle,
        }
    }

    // ── Agent collection ──────────────────────────────────────────────────

    /// Append an agent.  `None` is accepted and ignored.
    ///
    /// Agents are dispatched in insertion order (completion order within a
    /// phase is unspecified).
    pub fn add_agent(&mut self, agent: impl Into<Option<AgentHandle<A>>>) -> EngineResult<()> {
        if !self.state.between_rounds() {
            return Err(self.invalid("add_agent"));
        }
        let Some(agent) = agent.into() else {
            return Ok(());
        };
        self.agents.push(agent);
        self.state = EngineState::Ready;
        Ok(())
    }

    pub fn agents(&self) -> &[AgentHandle<A>] {
        &self.agents
    }

    pub fn agent_count(&self) -> usize {
        self.agents.len()
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn stats(&self) -> &EngineStats {
        &self.stats
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn registry(&self) -> &PhaseRegistry<A> {
        &self.registry
    }

    /// The round the next [`step`](Self::step) will execute.
    pub fn current_round(&self) -> Round {
        self.round
    }

    /// Worker threads in the pool (0 after shutdown).
    pub fn thread_count(&self) -> usize {
        if self.pool.is_some() { self.threads } else { 0 }
    }

    pub fn cancel_token(&self) -> &CancelToken {
        &self.cancel
    }

    // ── Round driver ──────────────────────────────────────────────────────

    /// Execute one round.
    pub fn step(&mut self) -> EngineResult<RoundReport> {
        self.step_observed(&mut NoopObserver)
    }

    /// Execute one round, reporting phase and round boundaries to `observer`.
    ///
    /// An empty agent collection makes the round a no-op: no phases run, no
    /// hooks fire, and the round counter does not advance.
    ///
    /// # Errors
    ///
    /// - [`EngineError::InvalidState`] after shutdown or a fault.
    /// - [`EngineError::PhaseTimeout`] when a phase does not drain within
    ///   `config.phase_timeout`.  The engine becomes [`EngineState::Faulted`].
    /// - [`EngineError::Cancelled`] when the cancel token is set.  The round
    ///   is abandoned after in-flight units finish and the round counter does
    ///   not advance.
    pub fn step_observed<O: EngineObserver>(&mut self, observer: &mut O) -> EngineResult<RoundReport> {
        if !self.state.between_rounds() {
            return Err(self.invalid("step"));
        }
        let round = self.round;
        if self.agents.is_empty() {
            return Ok(RoundReport::empty(round, self.threads));
        }

        let entries: Vec<PhaseEntry<A>> = self.registry.entries().collect();
        // A round cancelled before it starts is never announced.
        if self.cancel.is_cancelled() {
            let phase = entries.first().map_or(Phase::FIRST, |e| e.phase);
            self.state = EngineState::Ready;
            return Err(EngineError::Cancelled { round, phase });
        }

        let started = Instant::now();
        let mut report = RoundReport::empty(round, self.threads);
        observer.on_round_start(round);

        for entry in entries {
            if self.cancel.is_cancelled() {
                self.state = EngineState::Ready;
                return Err(EngineError::Cancelled { round, phase: entry.phase });
            }

            self.state = EngineState::PhaseRunning(entry.phase);
            let phase_report = self.run_phase(round, entry)?;
            self.stats.record_phase(&phase_report);
            observer.on_phase_end(round, &phase_report);
            report.phases.push(phase_report);

            if self.cancel.is_cancelled() {
                self.state = EngineState::Ready;
                return Err(EngineError::Cancelled { round, phase: entry.phase });
            }
        }

        report.elapsed = started.elapsed();
        self.stats.rounds_completed += 1;
        self.round = round.next();
        self.state = EngineState::RoundComplete;
        observer.on_round_end(&report);
        Ok(report)
    }

    /// Execute `rounds` rounds from the current position.
    pub fn run<O: EngineObserver>(&mut self, rounds: u64, observer: &mut O) -> EngineResult<()> {
        for _ in 0..rounds {
            self.step_observed(observer)?;
        }
        observer.on_engine_end(self.round);
        Ok(())
    }

    /// Execute rounds until `config.end_round()`.
    pub fn run_to_end<O: EngineObserver>(&mut self, observer: &mut O) -> EngineResult<()> {
        let remaining = self.config.end_round().0.saturating_sub(self.round.0);
        self.run(remaining, observer)
    }

    /// Release the worker pool.  Idempotent.
    pub fn shutdown(&mut self) {
        if self.state == EngineState::ShutDown {
            return;
        }
        // Dropping the pool lets its threads exit once their queues drain.
        self.pool = None;
        self.state = EngineState::ShutDown;
        info!(
            "phase engine shut down after {} rounds ({} units dispatched, {} failed)",
            self.stats.rounds_completed, self.stats.dispatched, self.stats.failed
        );
    }

    // ── One phase ─────────────────────────────────────────────────────────

    /// Gate, dispatch and barrier for a single registered phase.
    fn run_phase(&mut self, round: Round, entry: PhaseEntry<A>) -> EngineResult<PhaseReport> {
        let Some(pool) = self.pool.as_ref() else {
            return Err(self.invalid("step"));
        };

        let started = Instant::now();
        let barrier = WaitGroup::new();
        let tally = Arc::new(PhaseTally::default());
        let mut dispatched = 0usize;

        for (index, agent) in self.agents.iter().enumerate() {
            if self.cancel.is_cancelled() {
                break;
            }
            if !entry.is_eligible(agent) {
                continue;
            }

            let guard  = barrier.enter();
            let agent  = Arc::clone(agent);
            let tally  = Arc::clone(&tally);
            let cancel = self.cancel.clone();
            dispatched += 1;

            pool.spawn(move || {
                let _guard = guard;
                if cancel.is_cancelled() || tally.abort.load(Ordering::Acquire) {
                    tally.skipped.fetch_add(1, Ordering::Relaxed);
                    return;
                }
                let outcome = panic::catch_unwind(AssertUnwindSafe(|| entry.invoke(&agent)))
                    .unwrap_or_else(|payload| Err(BehaviorError::Panicked(panic_message(payload))));
                if let Err(e) = outcome {
                    warn!("{round} {}: agent #{index} failed: {e}", entry.phase);
                    tally.failed.fetch_add(1, Ordering::Relaxed);
                }
            });
        }

        match self.config.phase_timeout {
            None => barrier.wait(),
            Some(limit) => {
                if !barrier.wait_timeout(limit) {
                    tally.abort.store(true, Ordering::Release);
                    let pending = barrier.pending();
                    self.state = EngineState::Faulted;
                    warn!("{round} {}: {pending} units still running after {limit:?}", entry.phase);
                    return Err(EngineError::PhaseTimeout { round, phase: entry.phase, pending });
                }
            }
        }

        let report = PhaseReport {
            phase:   entry.phase,
            dispatched,
            failed:  tally.failed.load(Ordering::Relaxed),
            skipped: tally.skipped.load(Ordering::Relaxed),
            elapsed: started.elapsed(),
        };
        debug!(
            "{round} {}: {} dispatched, {} failed, {} skipped in {:?}",
            report.phase, report.dispatched, report.failed, report.skipped, report.elapsed
        );
        Ok(report)
    }

    fn invalid(&self, operation: &'static str) -> EngineError {
        EngineError::InvalidState { operation, state: self.state }
    }
}

/// Best-effort text of a panic payload.
fn panic_message(payload: Box<dyn Any + Send>) -> String {
    match payload.downcast::<String>() {
        Ok(s) => *s,
        Err(payload) => match payload.downcast::<&'static str>() {
            Ok(s) => (*s).to_owned(),
            Err(_) => "non-string panic payload".to_owned(),
        },
    }
}
