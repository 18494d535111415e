//! meridian-route: accelerated point-to-point shortest-path queries over
//! large static road/geo networks.
//!
//! Pipeline:
//! - Graph model: an expandable adjacency list frozen into a flat CSR,
//!   monomorphised over a node and an edge payload type per capability
//!   needed (coordinates, partitions, arc-flag vectors).
//! - Search: Dijkstra, A\*, bidirectional Dijkstra/A\*, arc-flag Dijkstra
//!   (single- and two-level), all behind a single [`router::Router`] facade.
//! - Preprocessing: arc-flag computation and ALT landmark tables, each
//!   built once offline and then read-only at query time.
//!
//! Key principle: a `Csr<N, E>` is immutable once built. All query-time
//! state (heaps, distance arrays, predecessor arrays) lives in the
//! per-call structures under `search`, never on the graph itself.

pub mod bench;
pub mod cli;
pub mod error;
pub mod formats;
pub mod graph;
pub mod heuristic;
pub mod partition;
pub mod preprocess;
pub mod queue;
pub mod router;
pub mod search;

pub use error::{ConfigError, GraphError, SnapshotError};
pub use graph::csr::Csr;
pub use graph::{NodeId, PartitionId, Weight};
pub use router::Router;
pub use search::ShortestPathResult;
