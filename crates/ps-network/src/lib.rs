//! `ps-network` — edge-list ingestion and the agent relationship graph.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                    |
//! |---------------|-------------------------------------------------------------|
//! | [`loader`]    | `load_edge_map`, `load_edge_map_reader`                     |
//! | [`edge_map`]  | `AdjacencyMap` (+ statistics), `LoadReport`, `EdgeMapLoad`  |
//! | [`graph`]     | `RelationshipGraph` (CSR), `GraphBuilder`                   |
//! | [`topology`]  | `TopologyBuilder`, `TopologyReport`                         |
//! | [`error`]     | `NetworkError`, `NetworkResult<T>`                          |
//!
//! # Data flow
//!
//! ```text
//! edge-list file ──load_edge_map──▶ AdjacencyMap ──TopologyBuilder──▶ RelationshipGraph
//!                                                        ▲
//!                                  GraphBuilder(directed) + ordered AgentIds
//! ```
//!
//! # Feature flags
//!
//! | Flag      | Effect                                                     |
//! |-----------|------------------------------------------------------------|
//! | `fx-hash` | FxHash instead of SipHash for the adjacency map.           |
//! | `serde`   | Derives `Serialize`/`Deserialize` on report types.         |

pub mod edge_map;
pub mod error;
pub mod graph;
pub mod loader;
pub mod topology;

#[cfg(test)]
mod tests;

pub use edge_map::{AdjacencyMap, EdgeMapLoad, LoadReport, NodeSet};
pub use error::{NetworkError, NetworkResult};
pub use graph::{GraphBuilder, RelationshipGraph};
pub use loader::{load_edge_map, load_edge_map_reader};
pub use topology::{TopologyBuilder, TopologyReport};
