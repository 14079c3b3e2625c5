//! Edge-list loader.
//!
//! # File format
//!
//! UTF-8 text, one directed edge per line, two whitespace-separated
//! non-negative integers:
//!
//! ```text
//! # soc-Epinions style edge list
//! # FromNodeId  ToNodeId
//! 0   4
//! 0   5
//! 1   0
//! ```
//!
//! | Line                               | Handling                     |
//! |------------------------------------|------------------------------|
//! | blank, or starts with `#`          | skipped                      |
//! | fewer than two tokens              | warning, skipped             |
//! | first two tokens not both `u32`    | warning, skipped             |
//! | not valid UTF-8                    | warning, skipped             |
//! | `source == target`                 | skipped silently             |
//! | anything else                      | edge added (set semantics)   |
//!
//! Tokens after the second are ignored, so weighted edge lists load as
//! unweighted.  A read failure aborts the whole load; no partial map is ever
//! returned.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::time::Instant;

use log::{info, warn};

use ps_core::NodeId;

use crate::edge_map::{AdjacencyMap, EdgeMapLoad, LoadReport};
use crate::{NetworkError, NetworkResult};

// ── Public API ────────────────────────────────────────────────────────────────

/// Load an adjacency map from the edge-list file at `path`.
pub fn load_edge_map(path: impl AsRef<Path>) -> NetworkResult<EdgeMapLoad> {
    let path = path.as_ref();
    if path.as_os_str().to_string_lossy().trim().is_empty() {
        return Err(NetworkError::InvalidArgument(
            "edge list path cannot be empty".into(),
        ));
    }

    let source_name = path.display().to_string();
    info!("Reading network data from {source_name}");

    let file = File::open(path).map_err(|source| NetworkError::Io {
        source_name: source_name.clone(),
        source,
    })?;
    load_edge_map_reader(BufReader::new(file), &source_name)
}

/// Like [`load_edge_map`] but accepts any `BufRead` source.
///
/// `source_name` is only used in diagnostics.  Useful for testing (pass a
/// `std::io::Cursor`) or for edge lists embedded in the binary.
pub fn load_edge_map_reader<R: BufRead>(
    mut reader:  R,
    source_name: &str,
) -> NetworkResult<EdgeMapLoad> {
    let started = Instant::now();
    let mut map = AdjacencyMap::new();
    let mut report = LoadReport::default();

    let mut buf = Vec::new();
    let mut line_no = 0usize;
    loop {
        buf.clear();
        let read = reader.read_until(b'\n', &mut buf).map_err(|source| NetworkError::Io {
            source_name: source_name.to_owned(),
            source,
        })?;
        if read == 0 {
            break;
        }
        line_no += 1;
        report.lines_processed += 1;

        let Ok(line) = std::str::from_utf8(&buf) else {
            warn!(
                "{source_name}:{line_no}: invalid text encoding {:?}",
                String::from_utf8_lossy(&buf).trim()
            );
            report.malformed_lines += 1;
            continue;
        };

        match parse_line(line) {
            ParsedLine::Skip => {}
            ParsedLine::TooFewTokens => {
                warn!("{source_name}:{line_no}: invalid line {:?}", line.trim());
                report.malformed_lines += 1;
            }
            ParsedLine::BadNumber => {
                warn!("{source_name}:{line_no}: invalid number format {:?}", line.trim());
                report.malformed_lines += 1;
            }
            ParsedLine::Edge(source, target) => {
                if source == target {
                    report.self_loops += 1;
                    continue;
                }
                map.insert_edge(source, target);
                report.edges_loaded += 1;
            }
        }
    }

    report.elapsed = started.elapsed();
    info!(
        "Loaded {source_name}: {} lines, {} edges, {} nodes in {:.1?}",
        report.lines_processed,
        report.edges_loaded,
        map.node_count(),
        report.elapsed,
    );

    Ok(EdgeMapLoad { map, report })
}

// ── Helpers ───────────────────────────────────────────────────────────────────

enum ParsedLine {
    Skip,
    TooFewTokens,
    BadNumber,
    Edge(NodeId, NodeId),
}

fn parse_line(raw: &str) -> ParsedLine {
    let line = raw.trim();
    if line.is_empty() || line.starts_with('#') {
        return ParsedLine::Skip;
    }

    let mut tokens = line.split_whitespace();
    let (Some(a), Some(b)) = (tokens.next(), tokens.next()) else {
        return ParsedLine::TooFewTokens;
    };

    match (a.parse::<u32>(), b.parse::<u32>()) {
        (Ok(source), Ok(target)) => ParsedLine::Edge(NodeId(source), NodeId(target)),
        _ => ParsedLine::BadNumber,
    }
}
