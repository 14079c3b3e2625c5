//! Translate an [`AdjacencyMap`] into a [`RelationshipGraph`].
//!
//! Edge-list node IDs are resolved to agent handles by position: node ID `n`
//! is the `n`-th handle added to the [`GraphBuilder`].  This runs exactly
//! once per simulation, before the first round.

use log::{info, warn};

use ps_core::NodeId;

use crate::{AdjacencyMap, GraphBuilder, NetworkError, NetworkResult, RelationshipGraph};

/// Diagnostic counters from one [`TopologyBuilder::populate_with_report`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TopologyReport {
    /// Edges added to the container, reverse edges included.
    pub edges_added:        usize,
    /// Reverse edges added by the symmetry policy.
    pub reverse_edges:      usize,
    /// Sources with no matching handle (whole target set skipped).
    pub unresolved_sources: usize,
    /// Individual targets with no matching handle.
    pub unresolved_targets: usize,
}

/// Populates a graph container from an adjacency map.
///
/// # Symmetry policy
///
/// | Container  | `symmetric` | Edges added per mapping entry `a → b`  |
/// |------------|-------------|----------------------------------------|
/// | directed   | `false`     | `a → b`                                |
/// | directed   | `true`      | `a → b` and `b → a`                    |
/// | undirected | either      | `a – b` (flag has no effect)           |
pub struct TopologyBuilder<'a> {
    edges:          &'a AdjacencyMap,
    expected_nodes: usize,
    symmetric:      bool,
}

impl<'a> TopologyBuilder<'a> {
    pub fn new(edges: &'a AdjacencyMap, expected_nodes: usize, symmetric: bool) -> Self {
        Self { edges, expected_nodes, symmetric }
    }

    /// Add the mapped edges to `container` and build the graph.
    pub fn populate(&self, container: GraphBuilder) -> NetworkResult<RelationshipGraph> {
        self.populate_with_report(container).map(|(graph, _)| graph)
    }

    /// Like [`populate`](Self::populate) but also returns the diagnostic
    /// counters.
    ///
    /// # Errors
    ///
    /// [`NetworkError::NodeCountMismatch`] when the container does not hold
    /// exactly `expected_nodes` handles.  Nothing is built in that case.
    pub fn populate_with_report(
        &self,
        mut container: GraphBuilder,
    ) -> NetworkResult<(RelationshipGraph, TopologyReport)> {
        let found = container.node_count();
        if found != self.expected_nodes {
            return Err(NetworkError::NodeCountMismatch {
                expected: self.expected_nodes,
                found,
            });
        }

        let add_reverse = container.is_directed() && self.symmetric;
        let mut report = TopologyReport::default();

        for source_id in self.edges.sorted_sources() {
            let Some(source) = resolve(&container, source_id) else {
                warn!("source node {} has no matching agent; skipping its edges", source_id.0);
                report.unresolved_sources += 1;
                continue;
            };
            let Some(targets) = self.edges.targets(source_id) else {
                continue;
            };

            let mut targets: Vec<NodeId> = targets.iter().copied().collect();
            targets.sort_unstable();

            for target_id in targets {
                let Some(target) = resolve(&container, target_id) else {
                    warn!("target node {} has no matching agent; skipping edge", target_id.0);
                    report.unresolved_targets += 1;
                    continue;
                };

                container.add_edge_by_index(source, target);
                report.edges_added += 1;

                if add_reverse {
                    container.add_edge_by_index(target, source);
                    report.edges_added += 1;
                    report.reverse_edges += 1;
                }
            }
        }

        info!("Created network with {} edges", report.edges_added);
        Ok((container.build(), report))
    }
}

/// Node ID `n` resolves to index `n` when such a handle exists.
#[inline]
fn resolve(container: &GraphBuilder, id: NodeId) -> Option<usize> {
    (id.index() < container.node_count()).then_some(id.index())
}
