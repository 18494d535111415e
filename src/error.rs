//! Error types for meridian-route.
//!
//! Library-level code returns typed errors (`thiserror`); the CLI and bench
//! binaries wrap these in `anyhow::Result` for context chains at the
//! application boundary.

use thiserror::Error;

/// Configuration errors: malformed input files, invalid preprocessing
/// parameters. Fail fast with a diagnostic naming the offending file/value.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("partition count {partition_count} exceeds flag width {flag_width} in {context}")]
    PartitionExceedsFlagWidth {
        partition_count: u32,
        flag_width: u32,
        context: &'static str,
    },

    #[error("landmark file {path} is malformed: {reason}")]
    MalformedLandmarkFile { path: String, reason: String },

    #[error("snapshot file {path} not found")]
    SnapshotNotFound { path: String },

    #[error("cannot preprocess an empty graph ({context})")]
    EmptyGraph { context: &'static str },

    #[error(".fmi file {path} is malformed at line {line}: {reason}")]
    MalformedFmi {
        path: String,
        line: usize,
        reason: String,
    },

    #[error("io error reading {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Invariant violations: programmer error at a Graph accessor boundary.
/// The graph is immutable and ids are checked at construction, so these
/// should be unreachable in correct callers; they abort with a precise
/// message rather than silently corrupting state.
#[derive(Debug, Error)]
pub enum GraphError {
    #[error("node id {id} out of range for graph with {node_count} nodes")]
    NodeOutOfRange { id: u32, node_count: u32 },

    #[error("edge references nonexistent node: {which} node {id} does not exist")]
    DanglingEdge { which: &'static str, id: u32 },

    #[error("partition {partition} out of range: 2^{bits} partitions available")]
    PartitionOutOfRange { partition: u32, bits: u32 },
}

/// Snapshot (de)serialization errors, surfaced from the binary loader.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("bad magic number: expected {expected:#x}, found {found:#x}")]
    BadMagic { expected: u32, found: u32 },

    #[error("unsupported snapshot version {found}, this build supports {supported}")]
    UnsupportedVersion { found: u16, supported: u16 },

    #[error("snapshot body checksum mismatch: file is corrupt or truncated")]
    ChecksumMismatch,

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("deserialization error: {0}")]
    Decode(#[from] Box<bincode::ErrorKind>),
}
