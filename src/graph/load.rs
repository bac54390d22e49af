//! Binary edge-list ingestion.
//!
//! The on-disk format is a flat sequence of little-endian records with no
//! header; the vertex count is supplied by the caller:
//! - [`WeightKind::Unit`]: `src: u32, dst: u32`
//! - [`WeightKind::Numeric`]: `src: u32, dst: u32, weight: f32`

use std::path::Path;

use tracing::debug;
use zerocopy::byteorder::{LittleEndian, F32, U32};
use zerocopy::{FromBytes, FromZeroes, Unaligned};

use crate::error::{Error, Result};
use crate::graph::{GraphPartition, WeightKind};

#[derive(FromZeroes, FromBytes, Unaligned)]
#[repr(C)]
struct UnitRecord {
    src: U32<LittleEndian>,
    dst: U32<LittleEndian>,
}

#[derive(FromZeroes, FromBytes, Unaligned)]
#[repr(C)]
struct WeightedRecord {
    src: U32<LittleEndian>,
    dst: U32<LittleEndian>,
    weight: F32<LittleEndian>,
}

/// Size in bytes of one record of the given kind.
pub const fn record_size(kind: WeightKind) -> usize {
    match kind {
        WeightKind::Unit => core::mem::size_of::<UnitRecord>(),
        WeightKind::Numeric => core::mem::size_of::<WeightedRecord>(),
    }
}

/// Decodes an in-memory edge list.
///
/// # Errors
/// Fails if `bytes` is not a whole number of records or an endpoint is out of range.
pub fn parse_edge_list(bytes: &[u8], vertices: usize, kind: WeightKind) -> Result<GraphPartition> {
    let truncated = || Error::TruncatedEdgeList {
        bytes: bytes.len(),
        record: record_size(kind),
    };
    match kind {
        WeightKind::Unit => {
            let records = UnitRecord::slice_from(bytes).ok_or_else(truncated)?;
            let srcs: Vec<_> = records.iter().map(|r| r.src.get()).collect();
            let dsts: Vec<_> = records.iter().map(|r| r.dst.get()).collect();
            GraphPartition::from_columns(vertices, &srcs, &dsts, None)
        }
        WeightKind::Numeric => {
            let records = WeightedRecord::slice_from(bytes).ok_or_else(truncated)?;
            let srcs: Vec<_> = records.iter().map(|r| r.src.get()).collect();
            let dsts: Vec<_> = records.iter().map(|r| r.dst.get()).collect();
            let weights: Vec<_> = records.iter().map(|r| r.weight.get()).collect();
            GraphPartition::from_columns(vertices, &srcs, &dsts, Some(&weights))
        }
    }
}

/// Reads and decodes an edge-list file.
///
/// # Errors
/// Fails on I/O errors and on anything [`parse_edge_list`] rejects.
pub fn read_edge_list(
    path: impl AsRef<Path>,
    vertices: usize,
    kind: WeightKind,
) -> Result<GraphPartition> {
    let path = path.as_ref();
    let bytes = std::fs::read(path)?;
    let graph = parse_edge_list(&bytes, vertices, kind)?;
    debug!(
        path = %path.display(),
        vertices = graph.vertices(),
        edges = graph.edges(),
        ?kind,
        "loaded edge list"
    );
    Ok(graph)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode_unit(edges: &[(u32, u32)]) -> Vec<u8> {
        let mut out = Vec::new();
        for &(s, d) in edges {
            out.extend_from_slice(&s.to_le_bytes());
            out.extend_from_slice(&d.to_le_bytes());
        }
        out
    }

    #[test]
    fn parses_unit_records() {
        let bytes = encode_unit(&[(0, 1), (1, 2), (2, 0)]);
        let g = parse_edge_list(&bytes, 3, WeightKind::Unit).unwrap();
        assert_eq!(g.edges(), 3);
        assert_eq!(g.weight_kind(), WeightKind::Unit);
        assert!(g.has_edge(2, 0));
    }

    #[test]
    fn parses_weighted_records_from_unaligned_storage() {
        let mut bytes = vec![0xAA];
        for (s, d, w) in [(0u32, 1u32, 2.5f32), (1, 0, 0.5)] {
            bytes.extend_from_slice(&s.to_le_bytes());
            bytes.extend_from_slice(&d.to_le_bytes());
            bytes.extend_from_slice(&w.to_le_bytes());
        }
        // Skip the leading pad byte so the records start at an odd address.
        let g = parse_edge_list(&bytes[1..], 2, WeightKind::Numeric).unwrap();
        let w: Vec<_> = g.outgoing(0).iter().map(|e| e.weight()).collect();
        assert_eq!(w, vec![2.5]);
        assert_eq!(g.incoming(0).iter().next().unwrap().weight(), 0.5);
    }

    #[test]
    fn rejects_partial_record() {
        let mut bytes = encode_unit(&[(0, 1)]);
        bytes.push(7);
        let err = parse_edge_list(&bytes, 2, WeightKind::Unit).unwrap_err();
        assert!(matches!(err, Error::TruncatedEdgeList { bytes: 9, record: 8 }));
    }

    #[test]
    fn rejects_out_of_range_endpoint() {
        let bytes = encode_unit(&[(0, 5)]);
        assert!(parse_edge_list(&bytes, 2, WeightKind::Unit).is_err());
    }

    #[test]
    fn reads_file_from_disk() {
        let path = std::env::temp_dir().join(format!("fusegraph-load-{}.bin", std::process::id()));
        std::fs::write(&path, encode_unit(&[(0, 1), (1, 0)])).unwrap();
        let g = read_edge_list(&path, 2, WeightKind::Unit).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(g.edges(), 2);
    }
}
