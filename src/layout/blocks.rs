use serde::Serialize;

use crate::math::{perp, Point2, Polygon, Vector2, TOLERANCE};

use super::zones::{Zone, ZoneType};

/// A buildable city block within a zone. Generated on demand and not part
/// of the persisted plan.
#[derive(Debug, Clone, Serialize)]
pub struct Block {
    pub id: String,
    pub pod_id: String,
    pub zone_type: ZoneType,
    pub polygon: Polygon,
    pub area_m2: f64,
}

/// Block width along the radial (outward) axis, meters.
const BLOCK_W: f64 = 60.0;
/// Block depth along the perpendicular axis, meters.
const BLOCK_D: f64 = 40.0;
/// Path corridor between blocks, meters.
const PATH_GAP: f64 = 3.0;
/// Minimum block area, m².
const MIN_BLOCK_AREA: f64 = 200.0;

/// Creates a grid of rectangular blocks within a zone.
///
/// The grid is aligned to the zone's outward axis from the city center,
/// with [`PATH_GAP`] corridors between blocks. A candidate block is kept
/// when its centroid lies inside the zone and its area clears
/// [`MIN_BLOCK_AREA`].
#[must_use]
pub fn subdivide_into_blocks(zone: &Zone) -> Vec<Block> {
    if zone.polygon.is_empty() {
        return Vec::new();
    }

    // Local frame: outward from the city center, or +x at the center itself.
    let centroid = zone.polygon.centroid();
    let outward = centroid
        .coords
        .try_normalize(1.0)
        .unwrap_or_else(Vector2::x);
    let lateral = perp(outward);

    // Bounding box in local coordinates.
    let mut min_u = f64::MAX;
    let mut max_u = f64::MIN;
    let mut min_v = f64::MAX;
    let mut max_v = f64::MIN;
    for vertex in &zone.polygon.vertices {
        let rel = *vertex - centroid;
        let u = rel.dot(&outward);
        let v = rel.dot(&lateral);
        min_u = min_u.min(u);
        max_u = max_u.max(u);
        min_v = min_v.min(v);
        max_v = max_v.max(v);
    }

    let step_u = BLOCK_W + PATH_GAP;
    let step_v = BLOCK_D + PATH_GAP;

    let corner = |u: f64, v: f64| -> Point2 { centroid + outward * u + lateral * v };

    let mut blocks = Vec::new();
    let mut block_idx = 0usize;
    let mut u = min_u;
    while u + BLOCK_W <= max_u + TOLERANCE {
        let mut v = min_v;
        while v + BLOCK_D <= max_v + TOLERANCE {
            let polygon = Polygon::new(vec![
                corner(u, v),
                corner(u + BLOCK_W, v),
                corner(u + BLOCK_W, v + BLOCK_D),
                corner(u, v + BLOCK_D),
            ]);
            let center = polygon.centroid();
            if zone.polygon.contains(center) {
                let area = polygon.area();
                if area >= MIN_BLOCK_AREA {
                    blocks.push(Block {
                        id: format!("{}_block_{block_idx}", zone.id),
                        pod_id: zone.pod_id.clone(),
                        zone_type: zone.zone_type,
                        polygon,
                        area_m2: area,
                    });
                    block_idx += 1;
                }
            }
            v += step_v;
        }
        u += step_u;
    }
    blocks
}
