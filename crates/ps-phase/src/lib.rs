//! `ps-phase` — how an agent type declares what it does in each phase.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                        |
//! |---------------|-----------------------------------------------------------------|
//! | [`scheduled`] | `PhaseScheduled` trait, `EligibilityFn`, `BehaviorFn`           |
//! | [`registry`]  | `PhaseRegistry` (fixed tables), `PhaseRegistryBuilder`, `PhaseEntry` |
//! | [`error`]     | `PhaseError`, `BehaviorError`, result aliases                   |
//!
//! # Design notes
//!
//! An agent type registers, once, up to one eligibility accessor and one
//! behavior per phase:
//!
//! ```rust,ignore
//! impl PhaseScheduled for Person {
//!     fn register_phases(reg: &mut PhaseRegistryBuilder<Self>) -> PhaseResult<()> {
//!         reg.phase(0, Person::wants_to_decide, Person::decide_vaccination)?
//!            .phase(1, Person::wants_to_update, Person::update_disease_state)?;
//!         Ok(())
//!     }
//! }
//! ```
//!
//! The engine calls [`PhaseRegistry::discover`] once at construction and
//! shares the resulting read-only tables with every worker.  Accessors are
//! plain `fn` pointers taking `&Self`, so flags are read through the agent's
//! own methods and signatures are checked by the compiler.

pub mod error;
pub mod registry;
pub mod scheduled;


pub use error::{BehaviorError, BehaviorResult, PhaseError, PhaseResult};
pub use registry::{PhaseEntry, PhaseRegistry, PhaseRegistryBuilder};
pub use scheduled::{BehaviorFn, EligibilityFn, PhaseScheduled};
