use std::collections::{BTreeMap, BTreeSet, HashMap};

use super::Segment;

/// Endpoint match tolerance, meters.
const CONNECT_TOLERANCE: f64 = 1.0;

/// Builds the segment connectivity graph.
///
/// Two segments connect iff they are on the same vertical layer and share
/// an endpoint within [`CONNECT_TOLERANCE`] in the plan (XZ) plane.
/// Candidate pairs come from a uniform spatial hash with cell size twice
/// the tolerance: every endpoint is inserted into its own cell and the 8
/// neighbors, so a single-cell lookup sees everything in range.
///
/// The result maps segment id → connected segment ids, symmetric by
/// construction, with ids sorted for deterministic output. Accumulation is
/// local to this call; the returned map is never mutated afterwards.
#[must_use]
pub fn build_connectivity(segments: &[Segment]) -> BTreeMap<String, Vec<String>> {
    let cell_size = CONNECT_TOLERANCE * 2.0;
    #[allow(clippy::cast_possible_truncation)]
    let cell_key = |x: f64, z: f64| -> (i64, i64) {
        ((x / cell_size).floor() as i64, (z / cell_size).floor() as i64)
    };

    // (segment index, endpoint selector) per cell.
    let mut buckets: HashMap<(i64, i64), Vec<(usize, bool)>> = HashMap::new();
    for (i, seg) in segments.iter().enumerate() {
        for is_end in [false, true] {
            let pt = if is_end { seg.end } else { seg.start };
            let (kx, kz) = cell_key(pt.x, pt.z);
            for dx in -1..=1 {
                for dz in -1..=1 {
                    buckets.entry((kx + dx, kz + dz)).or_default().push((i, is_end));
                }
            }
        }
    }

    let mut conn: BTreeMap<&str, BTreeSet<&str>> = BTreeMap::new();
    for (i, seg) in segments.iter().enumerate() {
        for is_end in [false, true] {
            let pt = if is_end { seg.end } else { seg.start };
            let Some(candidates) = buckets.get(&cell_key(pt.x, pt.z)) else {
                continue;
            };
            for &(j, other_is_end) in candidates {
                if j == i {
                    continue;
                }
                let other = &segments[j];
                if other.layer != seg.layer {
                    continue;
                }
                let other_pt = if other_is_end { other.end } else { other.start };
                let dist = (pt.x - other_pt.x).hypot(pt.z - other_pt.z);
                if dist <= CONNECT_TOLERANCE {
                    conn.entry(&seg.id).or_default().insert(&other.id);
                    conn.entry(&other.id).or_default().insert(&seg.id);
                }
            }
        }
    }

    conn.into_iter()
        .map(|(id, neighbors)| {
            (
                id.to_owned(),
                neighbors.into_iter().map(str::to_owned).collect(),
            )
        })
        .collect()
}
