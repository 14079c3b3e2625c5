//! `ps-core` — foundational types for the `phasesim` agent framework.
//!
//! This crate is a dependency of every other `ps-*` crate.  It has no `ps-*`
//! dependencies and minimal external ones (only `rand` and `thiserror`, plus
//! optional `serde`).
//!
//! # What lives here
//!
//! | Module          | Contents                                              |
//! |-----------------|-------------------------------------------------------|
//! | [`ids`]         | `AgentId`, `NodeId`                                   |
//! | [`phase`]       | `Phase`, `MAX_PHASES`                                 |
//! | [`round`]       | `Round`, `EngineConfig`                               |
//! | [`rng`]         | `AgentRng` (per-agent, shareable), `SimRng` (global)  |
//! | [`error`]       | `CoreError`, `CoreResult`                             |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod error;
pub mod ids;
pub mod phase;
pub mod rng;
pub mod round;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{CoreError, CoreResult};
pub use ids::{AgentId, NodeId};
pub use phase::{MAX_PHASES, Phase};
pub use rng::{AgentRng, SimRng};
pub use round::{EngineConfig, Round};
