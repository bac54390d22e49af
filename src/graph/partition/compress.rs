//! Counting-sort compression of an edge list into offset/target runs.

use crate::graph::{VertexId, Weight};

/// One compressed adjacency direction.
#[derive(Debug, Clone)]
pub(super) struct Compressed {
    pub(super) offsets: Box<[usize]>,
    pub(super) targets: Box<[VertexId]>,
    pub(super) weights: Option<Box<[Weight]>>,
}

/// Buckets `values[i]` (and `weights[i]`) under `keys[i]`.
///
/// Stable: entries of one key keep their input order. All ids must already be
/// validated against `vertices`.
pub(super) fn compress(
    vertices: usize,
    keys: &[VertexId],
    values: &[VertexId],
    weights: Option<&[Weight]>,
) -> Compressed {
    debug_assert_eq!(keys.len(), values.len());

    // Count entries per key.
    let mut degrees = vec![0usize; vertices];
    for &k in keys {
        degrees[k as usize] += 1;
    }

    // Prefix sums give the run boundaries.
    let mut offsets = Vec::with_capacity(vertices + 1);
    offsets.push(0usize);
    let mut total = 0usize;
    for &deg in &degrees {
        total += deg;
        offsets.push(total);
    }

    let mut targets = vec![0 as VertexId; total];
    let mut out_weights = weights.map(|_| vec![0.0 as Weight; total]);
    let mut write_pos = offsets[..vertices].to_vec();
    for (i, (&k, &v)) in keys.iter().zip(values).enumerate() {
        let idx = write_pos[k as usize];
        targets[idx] = v;
        if let (Some(out), Some(w)) = (out_weights.as_mut(), weights) {
            out[idx] = w[i];
        }
        write_pos[k as usize] += 1;
    }

    Compressed {
        offsets: offsets.into_boxed_slice(),
        targets: targets.into_boxed_slice(),
        weights: out_weights.map(Vec::into_boxed_slice),
    }
}
