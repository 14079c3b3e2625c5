//! `ps-engine` — round driver for the phasesim framework.
//!
//! # Round loop
//!
//! ```text
//! for phase in 0..MAX_PHASES:
//!   ① Skip      — no behavior registered → no work, no barrier.
//!   ② Gate      — read each agent's eligibility flag (driver thread).
//!   ③ Dispatch  — one unit of work per eligible agent onto the pool.
//!   ④ Barrier   — block until every unit of this phase has finished.
//! ```
//!
//! Units within a phase run concurrently and in no particular order.  Phase
//! `i + 1` is never dispatched before every unit of phase `i` has returned.
//! A failing or panicking unit is logged and counted; it never stops its
//! siblings or the round.
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use ps_core::EngineConfig;
//! use ps_engine::{EngineBuilder, NoopObserver};
//!
//! let mut engine = EngineBuilder::<Person>::new(config)
//!     .expected_agents(people.len())
//!     .build()?;
//! for person in people {
//!     engine.add_agent(person)?;
//! }
//! engine.run(100, &mut NoopObserver)?;
//! engine.shutdown();
//! ```

pub mod barrier;
pub mod builder;
pub mod cancel;
pub mod engine;
pub mod error;
pub mod observer;
pub mod report;


pub use barrier::{WaitGroup, WaitGuard};
pub use builder::EngineBuilder;
pub use cancel::CancelToken;
pub use engine::{AgentHandle, EngineState, PhaseEngine};
pub use error::{EngineError, EngineResult};
pub use observer::{EngineObserver, NoopObserver};
pub use report::{EngineStats, PhaseReport, RoundReport};
