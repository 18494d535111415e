//! Binary CSR snapshot: a magic/version/sha256/crc-framed container around a
//! bincode-encoded graph body, so a preprocessed graph can be loaded without
//! re-running the `.fmi` parser or arc-flag/ALT preprocessing.
//!
//! Grounded on the framing shape of `formats/ebg_csr.rs` (magic + version +
//! content hash + CRC footer around a flat body), generalized to serialize
//! the body with `bincode`/`serde` instead of hand-written byte offsets,
//! since this crate's node/edge payload types are already `Serialize`.

use std::io::{Read, Write};

use serde::{de::DeserializeOwned, Serialize};
use sha2::{Digest as _, Sha256};

use crate::error::SnapshotError;
use crate::formats::crc;
use crate::graph::csr::Csr;

const MAGIC: u32 = 0x4d524e54; // "MRNT" (meridian-route snapshot)
const VERSION: u16 = 1;

#[derive(serde::Serialize, serde::Deserialize)]
struct Body<N, E> {
    nodes: Vec<N>,
    edges: Vec<E>,
    offsets: Vec<u32>,
}

/// Serializes `graph` to `writer` as a framed snapshot.
pub fn write<N, E, W>(writer: &mut W, graph: &Csr<N, E>) -> Result<(), SnapshotError>
where
    N: Serialize + Clone,
    E: Serialize + Copy,
    W: Write,
{
    let body = Body {
        nodes: graph.nodes().to_vec(),
        edges: graph.all_edges().to_vec(),
        offsets: graph.offsets().to_vec(),
    };
    let body_bytes = bincode::serialize(&body)?;

    let sha256: [u8; 32] = Sha256::digest(&body_bytes).into();
    let crc64 = crc::checksum(&body_bytes);

    writer.write_all(&MAGIC.to_le_bytes())?;
    writer.write_all(&VERSION.to_le_bytes())?;
    writer.write_all(&sha256)?;
    writer.write_all(&crc64.to_le_bytes())?;
    writer.write_all(&(body_bytes.len() as u64).to_le_bytes())?;
    writer.write_all(&body_bytes)?;
    Ok(())
}

/// Deserializes a framed snapshot from `reader`, validating the magic
/// number, version, and body checksum before handing back a usable graph.
pub fn read<N, E, R>(reader: &mut R) -> Result<Csr<N, E>, SnapshotError>
where
    N: DeserializeOwned + Clone,
    E: DeserializeOwned + Copy,
    R: Read,
{
    let mut magic_buf = [0u8; 4];
    reader.read_exact(&mut magic_buf)?;
    let magic = u32::from_le_bytes(magic_buf);
    if magic != MAGIC {
        return Err(SnapshotError::BadMagic {
            expected: MAGIC,
            found: magic,
        });
    }

    let mut version_buf = [0u8; 2];
    reader.read_exact(&mut version_buf)?;
    let version = u16::from_le_bytes(version_buf);
    if version != VERSION {
        return Err(SnapshotError::UnsupportedVersion {
            found: version,
            supported: VERSION,
        });
    }

    let mut sha256 = [0u8; 32];
    reader.read_exact(&mut sha256)?;
    let mut crc_buf = [0u8; 8];
    reader.read_exact(&mut crc_buf)?;
    let expected_crc = u64::from_le_bytes(crc_buf);
    let mut len_buf = [0u8; 8];
    reader.read_exact(&mut len_buf)?;
    let body_len = u64::from_le_bytes(len_buf) as usize;

    let mut body_bytes = vec![0u8; body_len];
    reader.read_exact(&mut body_bytes)?;

    if crc::checksum(&body_bytes) != expected_crc {
        return Err(SnapshotError::ChecksumMismatch);
    }
    let actual_sha: [u8; 32] = Sha256::digest(&body_bytes).into();
    if actual_sha != sha256 {
        return Err(SnapshotError::ChecksumMismatch);
    }

    let body: Body<N, E> = bincode::deserialize(&body_bytes)?;
    Ok(Csr::from_parts(body.nodes, body.edges, body.offsets))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::edge::WeightedEdge;
    use crate::graph::list::AdjacencyList;
    use crate::graph::node::Plain;

    fn diamond() -> Csr<Plain, WeightedEdge<u32>> {
        let mut g: AdjacencyList<Plain, WeightedEdge<u32>> = AdjacencyList::new();
        for _ in 0..4 {
            g.append_node(Plain);
        }
        g.insert_edge(0, WeightedEdge::new(1, 7));
        g.insert_edge(0, WeightedEdge::new(2, 8));
        g.insert_edge(1, WeightedEdge::new(3, 8));
        g.insert_edge(2, WeightedEdge::new(3, 7));
        g.freeze()
    }

    #[test]
    fn round_trips_through_bytes() {
        let g = diamond();
        let mut buf = Vec::new();
        write(&mut buf, &g).unwrap();
        let loaded: Csr<Plain, WeightedEdge<u32>> = read(&mut buf.as_slice()).unwrap();
        assert_eq!(loaded.node_count(), g.node_count());
        assert_eq!(loaded.edge_count(), g.edge_count());
        assert_eq!(loaded.edges_from(0).len(), g.edges_from(0).len());
    }

    #[test]
    fn rejects_corrupt_body() {
        let g = diamond();
        let mut buf = Vec::new();
        write(&mut buf, &g).unwrap();
        let last = buf.len() - 1;
        buf[last] ^= 0xff;
        let result: Result<Csr<Plain, WeightedEdge<u32>>, _> = read(&mut buf.as_slice());
        assert!(matches!(result, Err(SnapshotError::ChecksumMismatch)));
    }
}
