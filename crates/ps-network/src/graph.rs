//! Agent relationship graph and its builder.
//!
//! # Data layout
//!
//! Nodes are agent handles (`AgentId`s) held in the order they were added to
//! the [`GraphBuilder`].  That order defines the index ↔ handle bijection the
//! topology builder resolves edge-list IDs through: index `i` is the `i`-th
//! handle added.
//!
//! Adjacency uses **Compressed Sparse Row (CSR)** arrays.  Outgoing
//! neighbors of node index `n` occupy:
//!
//! ```text
//! out_targets[ out_start[n] .. out_start[n+1] ]
//! ```
//!
//! Directed graphs keep a second CSR pair for incoming edges.  Undirected
//! graphs store every edge in both orientations of the single CSR, so
//! "successors", "predecessors", and "adjacent" coincide.
//!
//! The graph is immutable once built and is `Send + Sync`; concurrent phase
//! workers share it behind an `Arc` with no locking.

use std::collections::HashMap;

use ps_core::AgentId;

use crate::{NetworkError, NetworkResult};

// ── RelationshipGraph ─────────────────────────────────────────────────────────

/// Read-only graph over agent handles.
///
/// Do not construct directly; use [`GraphBuilder`] (usually through
/// [`TopologyBuilder`](crate::TopologyBuilder)).
#[derive(Debug)]
pub struct RelationshipGraph {
    directed: bool,

    /// Handle at each index.
    nodes: Vec<AgentId>,

    /// Reverse of `nodes`.
    index: HashMap<AgentId, usize>,

    /// Distinct logical edges (an undirected edge counts once).
    edge_count: usize,

    out_start:   Vec<u32>,
    out_targets: Vec<u32>,

    /// Incoming CSR; `None` for undirected graphs.
    incoming: Option<(Vec<u32>, Vec<u32>)>,
}

impl RelationshipGraph {
    // ── Graph dimensions ──────────────────────────────────────────────────

    pub fn is_directed(&self) -> bool {
        self.directed
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    // ── Index ↔ handle bijection ──────────────────────────────────────────

    /// Handles in index order.
    pub fn nodes(&self) -> &[AgentId] {
        &self.nodes
    }

    pub fn index_of(&self, agent: AgentId) -> Option<usize> {
        self.index.get(&agent).copied()
    }

    pub fn handle_at(&self, index: usize) -> Option<AgentId> {
        self.nodes.get(index).copied()
    }

    // ── Neighbor queries ──────────────────────────────────────────────────

    /// Targets of edges leaving `agent`.  For undirected graphs: all
    /// neighbors.  Unknown handles yield nothing.
    pub fn successors(&self, agent: AgentId) -> impl Iterator<Item = AgentId> + '_ {
        let slice = self
            .index_of(agent)
            .map_or(&[][..], |n| csr_row(&self.out_start, &self.out_targets, n));
        slice.iter().map(|&i| self.nodes[i as usize])
    }

    /// Sources of edges entering `agent`.  For undirected graphs: all
    /// neighbors.
    pub fn predecessors(&self, agent: AgentId) -> impl Iterator<Item = AgentId> + '_ {
        let (start, sources) = match &self.incoming {
            Some((start, sources)) => (start, sources),
            None => (&self.out_start, &self.out_targets),
        };
        let slice = self
            .index_of(agent)
            .map_or(&[][..], |n| csr_row(start, sources, n));
        slice.iter().map(|&i| self.nodes[i as usize])
    }

    /// Every node connected to `agent` in either direction, ascending by
    /// index, without duplicates.
    pub fn adjacent(&self, agent: AgentId) -> Vec<AgentId> {
        let Some(n) = self.index_of(agent) else {
            return Vec::new();
        };
        let mut idx: Vec<u32> = csr_row(&self.out_start, &self.out_targets, n).to_vec();
        if let Some((start, sources)) = &self.incoming {
            idx.extend_from_slice(csr_row(start, sources, n));
            idx.sort_unstable();
            idx.dedup();
        }
        idx.into_iter().map(|i| self.nodes[i as usize]).collect()
    }

    /// `true` if an edge `from → to` exists.  Undirected graphs ignore
    /// orientation.
    pub fn has_edge(&self, from: AgentId, to: AgentId) -> bool {
        match (self.index_of(from), self.index_of(to)) {
            (Some(a), Some(b)) => csr_row(&self.out_start, &self.out_targets, a)
                .binary_search(&(b as u32))
                .is_ok(),
            _ => false,
        }
    }

    pub fn out_degree(&self, agent: AgentId) -> usize {
        self.index_of(agent)
            .map_or(0, |n| csr_row(&self.out_start, &self.out_targets, n).len())
    }

    pub fn in_degree(&self, agent: AgentId) -> usize {
        match &self.incoming {
            Some((start, sources)) => self
                .index_of(agent)
                .map_or(0, |n| csr_row(start, sources, n).len()),
            None => self.out_degree(agent),
        }
    }
}

#[inline]
fn csr_row<'a>(start: &[u32], values: &'a [u32], n: usize) -> &'a [u32] {
    &values[start[n] as usize..start[n + 1] as usize]
}

// ── GraphBuilder ──────────────────────────────────────────────────────────────

/// Graph container: collects ordered handles and edges, then
/// [`build`](Self::build)s a [`RelationshipGraph`].
///
/// Directedness is a property of the container, fixed at construction.
///
/// # Example
///
/// ```
/// use ps_core::AgentId;
/// use ps_network::GraphBuilder;
///
/// let mut b = GraphBuilder::new(false);
/// b.extend_nodes([AgentId(10), AgentId(11)]).unwrap();
/// b.add_edge(AgentId(10), AgentId(11)).unwrap();
/// let g = b.build();
/// assert_eq!(g.edge_count(), 1);
/// assert!(g.has_edge(AgentId(11), AgentId(10))); // undirected
/// ```
#[derive(Debug)]
pub struct GraphBuilder {
    directed:  bool,
    nodes:     Vec<AgentId>,
    index:     HashMap<AgentId, usize>,
    raw_edges: Vec<(u32, u32)>,
}

impl GraphBuilder {
    pub fn new(directed: bool) -> Self {
        Self {
            directed,
            nodes:     Vec::new(),
            index:     HashMap::new(),
            raw_edges: Vec::new(),
        }
    }

    /// Pre-allocate for the expected number of nodes and edges.
    pub fn with_capacity(directed: bool, nodes: usize, edges: usize) -> Self {
        Self {
            directed,
            nodes:     Vec::with_capacity(nodes),
            index:     HashMap::with_capacity(nodes),
            raw_edges: Vec::with_capacity(edges),
        }
    }

    pub fn is_directed(&self) -> bool {
        self.directed
    }

    /// Append a handle and return its index (sequential from 0).
    pub fn add_node(&mut self, agent: AgentId) -> NetworkResult<usize> {
        if self.index.contains_key(&agent) {
            return Err(NetworkError::DuplicateHandle(agent));
        }
        let idx = self.nodes.len();
        self.nodes.push(agent);
        self.index.insert(agent, idx);
        Ok(idx)
    }

    pub fn extend_nodes<I>(&mut self, agents: I) -> NetworkResult<()>
    where
        I: IntoIterator<Item = AgentId>,
    {
        for agent in agents {
            self.add_node(agent)?;
        }
        Ok(())
    }

    /// Add an edge between two handles already in the container.
    pub fn add_edge(&mut self, from: AgentId, to: AgentId) -> NetworkResult<()> {
        let a = self.index_of(from).ok_or(NetworkError::UnknownHandle(from))?;
        let b = self.index_of(to).ok_or(NetworkError::UnknownHandle(to))?;
        self.add_edge_by_index(a, b);
        Ok(())
    }

    /// Add an edge between two node indices.  Callers guarantee both are
    /// `< node_count()`.
    pub(crate) fn add_edge_by_index(&mut self, from: usize, to: usize) {
        debug_assert!(from < self.nodes.len() && to < self.nodes.len());
        self.raw_edges.push((from as u32, to as u32));
    }

    pub fn index_of(&self, agent: AgentId) -> Option<usize> {
        self.index.get(&agent).copied()
    }

    pub fn handle_at(&self, index: usize) -> Option<AgentId> {
        self.nodes.get(index).copied()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Edges added so far, before deduplication.
    pub fn edge_count(&self) -> usize {
        self.raw_edges.len()
    }

    /// Consume the builder and produce a [`RelationshipGraph`].
    ///
    /// Repeated edges collapse (for undirected graphs `a–b` and `b–a` are the
    /// same edge).  Time complexity: O(E log E).
    pub fn build(self) -> RelationshipGraph {
        let node_count = self.nodes.len();

        let mut logical = self.raw_edges;
        if !self.directed {
            for e in &mut logical {
                if e.0 > e.1 {
                    *e = (e.1, e.0);
                }
            }
        }
        logical.sort_unstable();
        logical.dedup();
        let edge_count = logical.len();

        let (out_start, out_targets, incoming) = if self.directed {
            let out = build_csr(node_count, logical.iter().copied());
            let inc = build_csr(node_count, logical.iter().map(|&(a, b)| (b, a)));
            (out.0, out.1, Some(inc))
        } else {
            // A self-loop appears once in its own row.
            let both = logical
                .iter()
                .flat_map(|&(a, b)| std::iter::once((a, b)).chain((a != b).then_some((b, a))));
            let out = build_csr(node_count, both);
            (out.0, out.1, None)
        };

        RelationshipGraph {
            directed: self.directed,
            nodes: self.nodes,
            index: self.index,
            edge_count,
            out_start,
            out_targets,
            incoming,
        }
    }
}

/// Build a CSR row pointer and sorted value array from `(row, value)` pairs.
fn build_csr<I>(node_count: usize, pairs: I) -> (Vec<u32>, Vec<u32>)
where
    I: Iterator<Item = (u32, u32)>,
{
    let mut pairs: Vec<(u32, u32)> = pairs.collect();
    pairs.sort_unstable();

    let mut start = vec![0u32; node_count + 1];
    for &(row, _) in &pairs {
        start[row as usize + 1] += 1;
    }
    for i in 1..=node_count {
        start[i] += start[i - 1];
    }
    debug_assert_eq!(start[node_count] as usize, pairs.len());

    let values = pairs.into_iter().map(|(_, v)| v).collect();
    (start, values)
}
