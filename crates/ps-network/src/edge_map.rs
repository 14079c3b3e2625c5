//! Adjacency mapping loaded from an edge list, plus derived statistics.
//!
//! The map is `source → set of targets` with set semantics: repeated edges
//! collapse, order is irrelevant.  Node IDs need not be contiguous; the node
//! count bound is `max(any ID) + 1` so that every ID can be used directly as
//! a 0-based index into an agent collection.

use std::fmt::Write as _;
use std::time::Duration;

use ps_core::NodeId;

#[cfg(not(feature = "fx-hash"))]
type NodeMap<V> = std::collections::HashMap<NodeId, V>;
#[cfg(feature = "fx-hash")]
type NodeMap<V> = rustc_hash::FxHashMap<NodeId, V>;

/// Set of target nodes for one source.
#[cfg(not(feature = "fx-hash"))]
pub type NodeSet = std::collections::HashSet<NodeId>;
/// Set of target nodes for one source.
#[cfg(feature = "fx-hash")]
pub type NodeSet = rustc_hash::FxHashSet<NodeId>;

// ── AdjacencyMap ──────────────────────────────────────────────────────────────

/// Immutable-after-load mapping from source node to its outgoing targets.
#[derive(Clone, Debug, Default)]
pub struct AdjacencyMap {
    edges: NodeMap<NodeSet>,
}

impl AdjacencyMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a map from `(source, target)` pairs.  Self-loops are dropped.
    pub fn from_edges<I>(edges: I) -> Self
    where
        I: IntoIterator<Item = (NodeId, NodeId)>,
    {
        let mut map = Self::new();
        for (source, target) in edges {
            map.insert_edge(source, target);
        }
        map
    }

    /// Add `source → target`.
    ///
    /// Returns `false` when the edge is a self-loop (never stored) or was
    /// already present.
    pub fn insert_edge(&mut self, source: NodeId, target: NodeId) -> bool {
        if source == target {
            return false;
        }
        self.edges.entry(source).or_default().insert(target)
    }

    /// Outgoing targets of `source`, if it has any.
    pub fn targets(&self, source: NodeId) -> Option<&NodeSet> {
        self.edges.get(&source)
    }

    pub fn contains_edge(&self, source: NodeId, target: NodeId) -> bool {
        self.edges.get(&source).is_some_and(|t| t.contains(&target))
    }

    /// Iterate `(source, targets)` in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &NodeSet)> + '_ {
        self.edges.iter().map(|(&s, t)| (s, t))
    }

    /// All sources, ascending.  Used wherever a deterministic walk matters.
    pub fn sorted_sources(&self) -> Vec<NodeId> {
        let mut sources: Vec<NodeId> = self.edges.keys().copied().collect();
        sources.sort_unstable();
        sources
    }

    /// Number of distinct source nodes.
    pub fn source_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    // ── Statistics ────────────────────────────────────────────────────────

    /// Nodes required to index every ID seen: `max(id) + 1`, or 0 when empty.
    pub fn node_count(&self) -> usize {
        self.id_range().map_or(0, |(_, max)| max.index() + 1)
    }

    /// `(min, max)` over all source and target IDs; `None` when empty.
    pub fn id_range(&self) -> Option<(NodeId, NodeId)> {
        self.all_ids().fold(None, |acc, id| match acc {
            None => Some((id, id)),
            Some((lo, hi)) => Some((lo.min(id), hi.max(id))),
        })
    }

    /// Total number of directed edges (sum of target-set sizes).
    pub fn edge_count(&self) -> usize {
        self.edges.values().map(|t| t.len()).sum()
    }

    /// `edge_count / node_count`, or 0.0 when there are no nodes.
    pub fn average_degree(&self) -> f64 {
        let nodes = self.node_count();
        if nodes == 0 {
            0.0
        } else {
            self.edge_count() as f64 / nodes as f64
        }
    }

    /// Human-readable block of the headline statistics.
    pub fn statistics_summary(&self) -> String {
        let mut out = String::from("Network statistics:\n");
        let _ = writeln!(out, "  Nodes: {}", self.node_count());
        let _ = writeln!(out, "  Edges: {}", self.edge_count());
        let _ = write!(out, "  Average degree: {:.2}", self.average_degree());
        out
    }

    fn all_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.edges
            .iter()
            .flat_map(|(&s, targets)| std::iter::once(s).chain(targets.iter().copied()))
    }
}

// ── Load results ──────────────────────────────────────────────────────────────

/// Counters collected while parsing an edge list.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LoadReport {
    /// Every line read, including blanks and comments.
    pub lines_processed: usize,
    /// Lines that produced a non-self-loop edge, duplicates included.
    pub edges_loaded:    usize,
    /// Lines skipped with a warning (too few tokens, non-integer IDs).
    pub malformed_lines: usize,
    /// Lines skipped silently because `source == target`.
    pub self_loops:      usize,
    /// Wall time spent reading and parsing.
    pub elapsed:         Duration,
}

/// Output of a successful load: the adjacency map plus parse counters.
#[derive(Clone, Debug)]
pub struct EdgeMapLoad {
    pub map:    AdjacencyMap,
    pub report: LoadReport,
}

impl EdgeMapLoad {
    /// Node count bound of the loaded map.
    pub fn node_count(&self) -> usize {
        self.map.node_count()
    }
}
