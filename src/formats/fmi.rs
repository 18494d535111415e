//! `.fmi` text format: the line-oriented node/edge list used by routing
//! research datasets (header giving node/edge counts, then one line per
//! node, then one line per edge).
//!
//! Grounded on `original_source/examples/io/fmi.go`'s parse state machine
//! and per-type `Parse*` functions. File ids need not be dense or start at
//! zero — both the `from` and `to` of every edge line are looked up through
//! the same id→index table built while parsing node lines, so downstream
//! algorithms can assume dense `0..n-1` ids regardless of what the file
//! used.

use std::io::BufRead;
use std::path::Path;

use crate::error::ConfigError;
use crate::graph::csr::Csr;
use crate::graph::edge::{FlaggedEdge128, FlaggedEdge64, TwoLevelFlaggedEdge, WeightedEdge};
use crate::graph::list::AdjacencyList;
use crate::graph::node::{GeoPoint, PartitionedGeoPoint, TwoLevelPartitionedGeoPoint};
use crate::graph::{HalfEdge, NodeId, PartitionId, Weight};

#[derive(PartialEq)]
enum ParseState {
    NodeCount,
    EdgeCount,
    Nodes,
    Edges,
}

/// Loads a graph from a `.fmi` file at `path`, using `parse_node` to turn a
/// node line into a `(raw_id, payload)` pair and `parse_edge` to turn an edge
/// line into a `(raw_from, raw_to, payload)` triple — `payload.to()` is
/// ignored and overwritten with the resolved dense index of `raw_to`.
/// Duplicate edges to the same head are silently dropped (see
/// [`AdjacencyList::insert_edge`]).
pub fn load<N, E, W>(
    path: &Path,
    parse_node: impl Fn(&str) -> (i64, N),
    parse_edge: impl Fn(&str) -> (i64, i64, E),
) -> Result<Csr<N, E>, ConfigError>
where
    E: HalfEdge<W> + Copy,
    W: Weight,
{
    let file = std::fs::File::open(path).map_err(|source| ConfigError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let reader = std::io::BufReader::new(file);

    let mut graph: AdjacencyList<N, E> = AdjacencyList::new();
    let mut id2index = std::collections::HashMap::new();

    let mut state = ParseState::NodeCount;
    let mut num_nodes = 0usize;
    let mut num_parsed_nodes = 0usize;

    for (line_no, line) in reader.lines().enumerate() {
        let line = line.map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        match state {
            ParseState::NodeCount => {
                num_nodes = line.trim().parse().map_err(|_| ConfigError::MalformedFmi {
                    path: path.display().to_string(),
                    line: line_no + 1,
                    reason: "expected node count".to_string(),
                })?;
                state = ParseState::EdgeCount;
            }
            ParseState::EdgeCount => {
                state = ParseState::Nodes;
            }
            ParseState::Nodes => {
                let (raw_id, node) = parse_node(&line);
                id2index.insert(raw_id, graph.node_count() as NodeId);
                graph.append_node(node);
                num_parsed_nodes += 1;
                if num_parsed_nodes == num_nodes {
                    state = ParseState::Edges;
                }
            }
            ParseState::Edges => {
                let (from, to, edge) = parse_edge(&line);
                let tail = *id2index
                    .get(&from)
                    .ok_or_else(|| ConfigError::MalformedFmi {
                        path: path.display().to_string(),
                        line: line_no + 1,
                        reason: format!("edge references unknown node id {from}"),
                    })?;
                let head = *id2index.get(&to).ok_or_else(|| ConfigError::MalformedFmi {
                    path: path.display().to_string(),
                    line: line_no + 1,
                    reason: format!("edge references unknown node id {to}"),
                })?;
                graph.insert_edge(tail, edge.with_to(head));
            }
        }
    }

    if graph.node_count() != num_nodes {
        return Err(ConfigError::MalformedFmi {
            path: path.display().to_string(),
            line: 0,
            reason: format!("expected {num_nodes} nodes, parsed {}", graph.node_count()),
        });
    }

    Ok(graph.freeze())
}

fn fields(line: &str) -> Vec<&str> {
    line.split_whitespace().collect()
}

pub fn parse_geo_point(line: &str) -> (i64, GeoPoint) {
    let f = fields(line);
    let id: i64 = f[0].parse().expect("fmi node id");
    let lat: f64 = f[1].parse().expect("fmi lat");
    let lon: f64 = f[2].parse().expect("fmi lon");
    (id, GeoPoint::new(lat, lon))
}

pub fn parse_partitioned_geo_point(line: &str) -> (i64, PartitionedGeoPoint) {
    let f = fields(line);
    let id: i64 = f[0].parse().expect("fmi node id");
    let lat: f64 = f[1].parse().expect("fmi lat");
    let lon: f64 = f[2].parse().expect("fmi lon");
    let partition: PartitionId = f[3].parse().expect("fmi partition");
    (id, PartitionedGeoPoint::new(lat, lon, partition))
}

pub fn parse_two_level_partitioned_geo_point(line: &str) -> (i64, TwoLevelPartitionedGeoPoint) {
    let f = fields(line);
    let id: i64 = f[0].parse().expect("fmi node id");
    let lat: f64 = f[1].parse().expect("fmi lat");
    let lon: f64 = f[2].parse().expect("fmi lon");
    let l1: PartitionId = f[3].parse().expect("fmi l1 partition");
    let l2: PartitionId = f[4].parse().expect("fmi l2 partition");
    (id, TwoLevelPartitionedGeoPoint::new(lat, lon, l1, l2))
}

pub fn parse_weighted_edge<W>(line: &str) -> (i64, i64, WeightedEdge<W>)
where
    W: Weight + std::str::FromStr,
{
    let f = fields(line);
    let from: i64 = f[0].parse().expect("fmi edge from");
    let to: i64 = f[1].parse().expect("fmi edge to");
    let weight: W = match f[2].parse() {
        Ok(w) => w,
        Err(_) => panic!("fmi edge weight"),
    };
    (from, to, WeightedEdge::new(0, weight))
}

pub fn parse_flagged_edge_64<W>(line: &str) -> (i64, i64, FlaggedEdge64<W>)
where
    W: Weight + std::str::FromStr,
{
    let f = fields(line);
    let from: i64 = f[0].parse().expect("fmi edge from");
    let to: i64 = f[1].parse().expect("fmi edge to");
    let weight: W = match f[2].parse() {
        Ok(w) => w,
        Err(_) => panic!("fmi edge weight"),
    };
    let flags: u64 = f[3].parse().expect("fmi edge flags");
    let mut edge = FlaggedEdge64::new(0, weight);
    edge.flags = flags;
    (from, to, edge)
}

pub fn parse_large_flagged_edge_128<W>(line: &str) -> (i64, i64, FlaggedEdge128<W>)
where
    W: Weight + std::str::FromStr,
{
    let f = fields(line);
    let from: i64 = f[0].parse().expect("fmi edge from");
    let to: i64 = f[1].parse().expect("fmi edge to");
    let weight: W = match f[2].parse() {
        Ok(w) => w,
        Err(_) => panic!("fmi edge weight"),
    };
    let msb: u64 = f[3].parse().expect("fmi edge msb flag");
    let lsb: u64 = f[4].parse().expect("fmi edge lsb flag");
    let mut edge = FlaggedEdge128::new(0, weight);
    edge.flags = [lsb, msb];
    (from, to, edge)
}

pub fn parse_two_level_flagged_edge<W>(line: &str) -> (i64, i64, TwoLevelFlaggedEdge<W>)
where
    W: Weight + std::str::FromStr,
{
    let f = fields(line);
    let from: i64 = f[0].parse().expect("fmi edge from");
    let to: i64 = f[1].parse().expect("fmi edge to");
    let weight: W = match f[2].parse() {
        Ok(w) => w,
        Err(_) => panic!("fmi edge weight"),
    };
    let l1: u64 = f[3].parse().expect("fmi edge l1 flag");
    let l2: u64 = f[4].parse().expect("fmi edge l2 flag");
    let mut edge = TwoLevelFlaggedEdge::new(0, weight);
    edge.l1_flags = l1;
    edge.l2_flags = l2;
    (from, to, edge)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn loads_a_weighted_diamond() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "4\n4\n0 0.0 0.0\n1 0.1 0.0\n2 0.0 0.1\n3 0.1 0.1\n0 1 7\n0 2 8\n1 3 8\n2 3 7"
        )
        .unwrap();

        let graph: Csr<GeoPoint, WeightedEdge<u32>> =
            load(file.path(), parse_geo_point, parse_weighted_edge).unwrap();

        assert_eq!(graph.node_count(), 4);
        assert_eq!(graph.edge_count(), 4);
        assert_eq!(graph.edges_from(0).len(), 2);
    }

    #[test]
    fn skips_comments_and_blank_lines() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "# a comment\n\n2\n1\n\n0 0.0 0.0\n1 1.0 1.0\n# another\n0 1 5"
        )
        .unwrap();

        let graph: Csr<GeoPoint, WeightedEdge<u32>> =
            load(file.path(), parse_geo_point, parse_weighted_edge).unwrap();

        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.edge_count(), 1);
    }

    #[test]
    fn drops_duplicate_edges() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "2\n2\n0 0.0 0.0\n1 1.0 1.0\n0 1 5\n0 1 9").unwrap();

        let graph: Csr<GeoPoint, WeightedEdge<u32>> =
            load(file.path(), parse_geo_point, parse_weighted_edge).unwrap();

        assert_eq!(graph.edge_count(), 1);
        assert_eq!(graph.edges_from(0)[0].weight, 5);
    }
}
