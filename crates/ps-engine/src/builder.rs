//! Fluent builder for constructing a [`PhaseEngine`].

use log::info;

use ps_core::EngineConfig;
use ps_phase::{PhaseRegistry, PhaseResult, PhaseScheduled};

use crate::{CancelToken, EngineResult, PhaseEngine};

/// Where the registry comes from: discovered at `build()` or handed in.
enum RegistrySource<A> {
    Discover(fn() -> PhaseResult<PhaseRegistry<A>>),
    Given(PhaseRegistry<A>),
}

/// Fluent builder for [`PhaseEngine<A>`].
///
/// # Optional inputs (have defaults)
///
/// | Method                 | Default                         |
/// |------------------------|---------------------------------|
/// | `.expected_agents(n)`  | 0 (collection grows on demand)  |
/// | `.cancel_token(t)`     | A fresh, never-cancelled token  |
///
/// # Example
///
/// ```rust,ignore
/// let token = CancelToken::new();
/// let mut engine = EngineBuilder::<Person>::new(config)
///     .expected_agents(10_000)
///     .cancel_token(token.clone())
///     .build()?;
/// ```
pub struct EngineBuilder<A: Send + Sync + 'static> {
    config:   EngineConfig,
    registry: RegistrySource<A>,
    capacity: usize,
    cancel:   Option<CancelToken>,
}

impl<A: PhaseScheduled> EngineBuilder<A> {
    /// Builder whose registry is discovered from `A`'s
    /// [`PhaseScheduled`] implementation.
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            registry: RegistrySource::Discover(PhaseRegistry::<A>::discover),
            capacity: 0,
            cancel:   None,
        }
    }
}

impl<A: Send + Sync + 'static> EngineBuilder<A> {
    /// Builder around a registry assembled by hand.
    pub fn with_registry(config: EngineConfig, registry: PhaseRegistry<A>) -> Self {
        Self {
            config,
            registry: RegistrySource::Given(registry),
            capacity: 0,
            cancel:   None,
        }
    }

    /// Pre-size the agent collection.
    pub fn expected_agents(mut self, n: usize) -> Self {
        self.capacity = n;
        self
    }

    /// Share a cancellation token with the caller.
    pub fn cancel_token(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Validate the configuration, resolve the registry, start the worker
    /// pool, and return an engine in [`EngineState::Idle`](crate::EngineState::Idle).
    pub fn build(self) -> EngineResult<PhaseEngine<A>> {
        self.config.validate()?;

        let registry = match self.registry {
            RegistrySource::Discover(discover) => discover()?,
            RegistrySource::Given(registry) => registry,
        };

        // 0 lets rayon pick one thread per logical core.
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.config.num_threads.unwrap_or(0))
            .thread_name(|i| format!("phase-worker-{i}"))
            .build()?;

        info!(
            "phase engine ready: {} worker threads, phases {:?}",
            pool.current_num_threads(),
            registry.registered_phases()
        );

        Ok(PhaseEngine::new(
            self.config,
            registry,
            pool,
            self.cancel.unwrap_or_default(),
            self.capacity,
        ))
    }
}
