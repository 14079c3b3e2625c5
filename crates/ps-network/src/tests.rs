//! Unit tests for ps-network.
//!
//! Loader tests use in-memory readers unless they exercise the filesystem
//! path handling itself.

#[cfg(test)]
mod helpers {
    use std::io::Cursor;

    use ps_core::{AgentId, NodeId};

    use crate::{AdjacencyMap, EdgeMapLoad, GraphBuilder, load_edge_map_reader};

    pub fn load_str(text: &str) -> EdgeMapLoad {
        load_edge_map_reader(Cursor::new(text), "test").unwrap()
    }

    pub fn triangle() -> AdjacencyMap {
        AdjacencyMap::from_edges([
            (NodeId(0), NodeId(1)),
            (NodeId(1), NodeId(2)),
            (NodeId(2), NodeId(0)),
        ])
    }

    /// Container holding `n` handles whose IDs are offset from their index so
    /// index/ID confusion shows up in assertions.
    pub fn container(directed: bool, n: u32) -> GraphBuilder {
        let mut b = GraphBuilder::new(directed);
        b.extend_nodes((0..n).map(|i| AgentId(100 + i))).unwrap();
        b
    }

    pub fn a(i: u32) -> AgentId {
        AgentId(100 + i)
    }
}

// ── Loader ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod loader_tests {
    use std::io::{Cursor, Write};

    use ps_core::NodeId;

    use super::helpers::load_str;
    use crate::{NetworkError, load_edge_map, load_edge_map_reader};

    #[test]
    fn four_line_file_with_self_loop() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"0 1\n1 2\n2 0\n2 2\n").unwrap();

        let load = load_edge_map(file.path()).unwrap();
        let map = &load.map;

        assert_eq!(map.source_count(), 3);
        assert!(map.contains_edge(NodeId(0), NodeId(1)));
        assert!(map.contains_edge(NodeId(1), NodeId(2)));
        assert!(map.contains_edge(NodeId(2), NodeId(0)));
        assert!(!map.contains_edge(NodeId(2), NodeId(2)));
        assert_eq!(map.targets(NodeId(2)).unwrap().len(), 1);

        assert_eq!(map.node_count(), 3);
        assert_eq!(map.edge_count(), 3);
        assert!((map.average_degree() - 1.0).abs() < f64::EPSILON);

        assert_eq!(load.report.lines_processed, 4);
        assert_eq!(load.report.edges_loaded, 3);
        assert_eq!(load.report.self_loops, 1);
        assert_eq!(load.report.malformed_lines, 0);
    }

    #[test]
    fn comments_blanks_and_whitespace_runs() {
        let load = load_str("# header\n\n   \n  3 \t  7  \n# 9 9\n7\t3 extra tokens\n");
        assert_eq!(load.map.edge_count(), 2);
        assert!(load.map.contains_edge(NodeId(3), NodeId(7)));
        assert!(load.map.contains_edge(NodeId(7), NodeId(3)));
        assert_eq!(load.report.malformed_lines, 0);
    }

    #[test]
    fn malformed_lines_skipped_not_fatal() {
        let load = load_str("0 1\n5\nx 2\n3 -4\n1.5 2\n1 2\n");
        assert_eq!(load.map.edge_count(), 2);
        assert_eq!(load.report.malformed_lines, 4);
        assert_eq!(load.report.lines_processed, 6);
    }

    #[test]
    fn duplicate_lines_collapse() {
        let load = load_str("4 5\n4 5\n4   5\n");
        assert_eq!(load.map.edge_count(), 1);
        assert_eq!(load.report.edges_loaded, 3);
    }

    #[test]
    fn self_loops_never_stored() {
        let load = load_str("1 1\n2 2\n3 4\n4 4\n");
        for (source, targets) in load.map.iter() {
            assert!(!targets.contains(&source), "self-loop at {source}");
        }
        assert_eq!(load.report.self_loops, 3);
        assert_eq!(load.map.edge_count(), 1);
    }

    #[test]
    fn node_count_is_max_id_plus_one() {
        // Highest ID only appears as a target.
        let load = load_str("2 40\n7 3\n");
        assert_eq!(load.map.node_count(), 41);
        assert_eq!(load.map.id_range(), Some((NodeId(2), NodeId(40))));
    }

    #[test]
    fn empty_and_comment_only_inputs() {
        for text in ["", "# nothing\n# here\n", "\n\n", "1 1\n"] {
            let load = load_str(text);
            assert_eq!(load.map.node_count(), 0, "input {text:?}");
            assert_eq!(load.map.edge_count(), 0);
            assert_eq!(load.map.id_range(), None);
            assert_eq!(load.map.average_degree(), 0.0);
        }
    }

    #[test]
    fn empty_path_is_invalid_argument() {
        assert!(matches!(load_edge_map(""), Err(NetworkError::InvalidArgument(_))));
        assert!(matches!(load_edge_map("   "), Err(NetworkError::InvalidArgument(_))));
    }

    #[test]
    fn missing_file_is_io_failure() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_edge_map(dir.path().join("absent.txt")).unwrap_err();
        assert!(matches!(err, NetworkError::Io { .. }));
    }

    #[test]
    fn invalid_utf8_line_skipped_with_warning() {
        let load = load_edge_map_reader(Cursor::new(&b"0 1\n1 2\n\xff 9\n2 0\n"[..]), "bytes").unwrap();
        assert_eq!(load.report.lines_processed, 4);
        assert_eq!(load.report.malformed_lines, 1);
        assert_eq!(load.report.edges_loaded, 3);
        assert!(load.map.contains_edge(NodeId(0), NodeId(1)));
        assert!(load.map.contains_edge(NodeId(1), NodeId(2)));
        assert!(load.map.contains_edge(NodeId(2), NodeId(0)));
        assert_eq!(load.map.node_count(), 3);
    }

    #[test]
    fn invalid_utf8_in_file_keeps_valid_edges() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"0 1\n\xff\xfe 2\n1 2").unwrap();
        let load = load_edge_map(file.path()).unwrap();
        assert_eq!(load.report.malformed_lines, 1);
        assert_eq!(load.map.edge_count(), 2);
    }
}

// ── AdjacencyMap statistics ───────────────────────────────────────────────────

#[cfg(test)]
mod edge_map_tests {
    use ps_core::NodeId;

    use super::helpers::triangle;
    use crate::AdjacencyMap;

    #[test]
    fn insert_reports_novelty() {
        let mut map = AdjacencyMap::new();
        assert!(map.insert_edge(NodeId(0), NodeId(1)));
        assert!(!map.insert_edge(NodeId(0), NodeId(1)));
        assert!(!map.insert_edge(NodeId(3), NodeId(3)));
        assert_eq!(map.edge_count(), 1);
    }

    #[test]
    fn sorted_sources_ascending() {
        let map = AdjacencyMap::from_edges([
            (NodeId(9), NodeId(1)),
            (NodeId(2), NodeId(1)),
            (NodeId(5), NodeId(1)),
        ]);
        assert_eq!(map.sorted_sources(), vec![NodeId(2), NodeId(5), NodeId(9)]);
    }

    #[test]
    fn summary_mentions_headline_numbers() {
        let summary = triangle().statistics_summary();
        assert!(summary.contains("Nodes: 3"));
        assert!(summary.contains("Edges: 3"));
        assert!(summary.contains("Average degree: 1.00"));
    }
}

// ── GraphBuilder & RelationshipGraph ──────────────────────────────────────────

#[cfg(test)]
mod graph_tests {
    use ps_core::AgentId;

    use super::helpers::{a, container};
    use crate::{GraphBuilder, NetworkError};

    #[test]
    fn empty_build() {
        let g = GraphBuilder::new(true).build();
        assert!(g.is_empty());
        assert_eq!(g.edge_count(), 0);
        assert!(g.adjacent(AgentId(0)).is_empty());
    }

    #[test]
    fn bijection_follows_insertion_order() {
        let g = container(true, 3).build();
        assert_eq!(g.nodes(), &[a(0), a(1), a(2)]);
        assert_eq!(g.index_of(a(2)), Some(2));
        assert_eq!(g.handle_at(1), Some(a(1)));
        assert_eq!(g.handle_at(3), None);
        assert_eq!(g.index_of(AgentId(2)), None);
    }

    #[test]
    fn duplicate_handle_rejected() {
        let mut b = container(false, 2);
        assert!(matches!(b.add_node(a(1)), Err(NetworkError::DuplicateHandle(_))));
    }

    #[test]
    fn unknown_handle_edge_rejected() {
        let mut b = container(false, 2);
        assert!(matches!(
            b.add_edge(a(0), AgentId(7)),
            Err(NetworkError::UnknownHandle(AgentId(7)))
        ));
    }

    #[test]
    fn directed_queries() {
        let mut b = container(true, 3);
        b.add_edge(a(0), a(1)).unwrap();
        b.add_edge(a(2), a(1)).unwrap();
        b.add_edge(a(0), a(1)).unwrap(); // repeated
        let g = b.build();

        assert_eq!(g.edge_count(), 2);
        assert!(g.has_edge(a(0), a(1)));
        assert!(!g.has_edge(a(1), a(0)));
        assert_eq!(g.successors(a(0)).collect::<Vec<_>>(), vec![a(1)]);
        assert_eq!(g.predecessors(a(1)).collect::<Vec<_>>(), vec![a(0), a(2)]);
        assert_eq!(g.adjacent(a(1)), vec![a(0), a(2)]);
        assert_eq!(g.out_degree(a(1)), 0);
        assert_eq!(g.in_degree(a(1)), 2);
    }

    #[test]
    fn undirected_queries_ignore_orientation() {
        let mut b = container(false, 3);
        b.add_edge(a(0), a(1)).unwrap();
        b.add_edge(a(1), a(0)).unwrap(); // same undirected edge
        b.add_edge(a(2), a(1)).unwrap();
        let g = b.build();

        assert_eq!(g.edge_count(), 2);
        assert!(g.has_edge(a(1), a(0)));
        assert!(g.has_edge(a(1), a(2)));
        assert_eq!(g.adjacent(a(1)), vec![a(0), a(2)]);
        assert_eq!(
            g.successors(a(1)).collect::<Vec<_>>(),
            g.predecessors(a(1)).collect::<Vec<_>>()
        );
        assert_eq!(g.out_degree(a(1)), 2);
    }

    #[test]
    fn graph_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<crate::RelationshipGraph>();
    }
}

// ── TopologyBuilder ───────────────────────────────────────────────────────────

#[cfg(test)]
mod topology_tests {
    use ps_core::NodeId;

    use super::helpers::{a, container, triangle};
    use crate::{AdjacencyMap, NetworkError, TopologyBuilder};

    #[test]
    fn node_count_mismatch_is_fatal() {
        let map = triangle();
        for (expected, available) in [(3, 2), (3, 4), (0, 1), (5, 0)] {
            let result = TopologyBuilder::new(&map, expected, false)
                .populate(container(true, available));
            match result {
                Err(NetworkError::NodeCountMismatch { expected: e, found }) => {
                    assert_eq!((e, found), (expected, available as usize));
                }
                other => panic!("expected mismatch for {expected}/{available}, got {other:?}"),
            }
        }
    }

    #[test]
    fn directed_without_symmetry_has_no_reverse_edges() {
        let map = triangle();
        let (g, report) = TopologyBuilder::new(&map, 3, false)
            .populate_with_report(container(true, 3))
            .unwrap();

        assert_eq!(report.edges_added, 3);
        assert_eq!(report.reverse_edges, 0);
        assert!(g.has_edge(a(0), a(1)));
        assert!(!g.has_edge(a(1), a(0)));
        assert!(g.has_edge(a(2), a(0)));
        assert!(!g.has_edge(a(0), a(2)));
    }

    #[test]
    fn directed_symmetric_adds_every_reverse() {
        let map = triangle();
        let (g, report) = TopologyBuilder::new(&map, 3, true)
            .populate_with_report(container(true, 3))
            .unwrap();

        assert_eq!(report.edges_added, 6);
        assert_eq!(report.reverse_edges, 3);
        for (source, targets) in map.iter() {
            for target in targets {
                let (s, t) = (a(source.0), a(target.0));
                assert!(g.has_edge(s, t));
                assert!(g.has_edge(t, s));
            }
        }
        assert_eq!(g.edge_count(), 6);
    }

    #[test]
    fn undirected_ignores_symmetry_flag() {
        let map = triangle();
        let plain = TopologyBuilder::new(&map, 3, false).populate(container(false, 3)).unwrap();
        let sym = TopologyBuilder::new(&map, 3, true).populate(container(false, 3)).unwrap();

        assert_eq!(plain.edge_count(), sym.edge_count());
        for i in 0..3 {
            for j in 0..3 {
                assert_eq!(plain.has_edge(a(i), a(j)), sym.has_edge(a(i), a(j)));
            }
        }
        assert!(plain.has_edge(a(1), a(0)));
    }

    #[test]
    fn unresolved_references_skipped() {
        let map = AdjacencyMap::from_edges([
            (NodeId(0), NodeId(1)),
            (NodeId(0), NodeId(9)), // target out of range
            (NodeId(7), NodeId(1)), // source out of range
            (NodeId(8), NodeId(2)), // source out of range
        ]);
        let (g, report) = TopologyBuilder::new(&map, 3, false)
            .populate_with_report(container(true, 3))
            .unwrap();

        assert_eq!(report.unresolved_sources, 2);
        assert_eq!(report.unresolved_targets, 1);
        assert_eq!(report.edges_added, 1);
        assert_eq!(g.edge_count(), 1);
        assert!(g.has_edge(a(0), a(1)));
    }

    #[test]
    fn loaded_map_feeds_topology() {
        let load = super::helpers::load_str("0 1\n1 2\n2 0\n2 2\n");
        let n = load.node_count();
        let g = TopologyBuilder::new(&load.map, n, false)
            .populate(container(false, n as u32))
            .unwrap();
        assert_eq!(g.node_count(), 3);
        assert_eq!(g.edge_count(), 3);
        assert_eq!(g.adjacent(a(0)), vec![a(1), a(2)]);
    }
}
