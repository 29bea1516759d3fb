pub mod blocks;
pub mod envelope;
pub mod greenways;
pub mod zones;

use std::collections::BTreeMap;
use std::f64::consts::PI;

use serde::Serialize;
use tracing::debug;

use crate::math::clip::{approximate_circle, clip_to_annulus};
use crate::math::{approx_zero, polar, Point2, Polygon};
use crate::report::{Report, Stage};
use crate::spec::{CitySpec, ResolvedParams};

/// Pod-id → neighboring pod-ids, symmetric by construction and ordered for
/// deterministic output.
pub type Adjacency = BTreeMap<String, Vec<String>>;

/// Resolution of the circular city boundary polygon.
const CITY_BOUND_SEGMENTS: usize = 128;

/// Warn only when the max boundary distance exceeds the walk radius by
/// more than 5%; ring geometry routinely forces small overshoots.
const WALK_RADIUS_SLACK: f64 = 1.05;

/// Minimum fraction of the nominal city disc the pods should cover.
const COVERAGE_FLOOR: f64 = 0.90;

const M2_PER_HA: f64 = 10_000.0;

/// A laid-out neighborhood pod.
///
/// Created once by [`layout_pods`]; read-only for every downstream stage.
#[derive(Debug, Clone, Serialize)]
pub struct Pod {
    pub id: String,
    /// Name of the ring this pod belongs to.
    pub ring: String,
    /// The Voronoi seed the pod grew from.
    pub center: Point2,
    /// Voronoi cell clipped to the pod's ring annulus.
    pub boundary: Polygon,
    pub area_ha: f64,
    pub target_population: u32,
}

struct SeedInfo {
    ring: String,
    ring_index: usize,
    pod_index: u32,
    population: u32,
}

/// Lays out neighborhood pods with a constrained Voronoi tessellation.
///
/// Seeds are placed per ring on the ring midline, evenly spaced with a
/// per-ring angular stagger; the tessellation is clipped to the circular
/// city boundary, and each cell is then clipped to its own ring annulus.
/// An empty clipped cell is reported as an error but does not abort the
/// sibling pods. Walk-radius and coverage shortfalls are warnings.
///
/// Returns the pods, the pod adjacency map derived from the Delaunay
/// triangulation, and the layout validation report.
#[must_use]
pub fn layout_pods(spec: &CitySpec, params: &ResolvedParams) -> (Vec<Pod>, Adjacency, Report) {
    let mut report = Report::new();

    // 1. Place seed points along ring midlines.
    let mut seeds: Vec<Point2> = Vec::new();
    let mut meta: Vec<SeedInfo> = Vec::new();
    for (ri, ring) in params.rings.iter().enumerate() {
        let mid_r = (ring.radius_from_m + ring.radius_to_m) / 2.0;
        for pi in 0..ring.pod_count {
            let seed = if ring.pod_count == 1 && approx_zero(ring.radius_from_m) {
                // Center ring with a single pod seeds at the origin.
                Point2::origin()
            } else {
                #[allow(clippy::cast_precision_loss)]
                let stagger = ri as f64 * PI / 6.0;
                let angle =
                    2.0 * PI * f64::from(pi) / f64::from(ring.pod_count) + stagger;
                polar(Point2::origin(), mid_r, angle)
            };
            seeds.push(seed);
            meta.push(SeedInfo {
                ring: ring.name.clone(),
                ring_index: ri,
                pod_index: pi,
                population: ring.pod_population,
            });
        }
    }

    if seeds.is_empty() {
        report.error(Stage::Layout, "no pods to lay out (zero pod count)");
        return (Vec::new(), Adjacency::new(), report);
    }

    // 2. Tessellate against the circular city boundary.
    let outer_radius = params.rings.last().map_or(0.0, |r| r.radius_to_m);
    let bounds = approximate_circle(Point2::origin(), outer_radius, CITY_BOUND_SEGMENTS);
    let cells = crate::tessellation::voronoi(&seeds, &bounds);

    // 3. Clip each cell to its ring annulus and validate walk radius.
    let mut pods: Vec<Pod> = Vec::with_capacity(cells.len());
    let mut pod_ids: Vec<Option<String>> = vec![None; cells.len()];
    for (i, cell) in cells.iter().enumerate() {
        let info = &meta[i];
        let ring = &params.rings[info.ring_index];
        let clipped = clip_to_annulus(
            &cell.polygon,
            Point2::origin(),
            ring.radius_from_m,
            ring.radius_to_m,
        );
        if clipped.is_empty() {
            report.error(
                Stage::Layout,
                format!(
                    "pod {}_{}: Voronoi cell empty after ring clipping",
                    info.ring, info.pod_index
                ),
            );
            continue;
        }

        let max_dist = clipped.max_distance_to(cell.seed);
        if max_dist > spec.walk_radius_m * WALK_RADIUS_SLACK {
            report.warning(
                Stage::Layout,
                format!(
                    "pod {}_{}: max distance to boundary {:.0}m exceeds walk radius {:.0}m",
                    info.ring, info.pod_index, max_dist, spec.walk_radius_m
                ),
            );
        }

        let id = format!("pod_{}_{}", info.ring, info.pod_index);
        pod_ids[i] = Some(id.clone());
        pods.push(Pod {
            id,
            ring: info.ring.clone(),
            center: cell.seed,
            area_ha: clipped.area() / M2_PER_HA,
            boundary: clipped,
            target_population: info.population,
        });
    }

    // 4. Adjacency map from Delaunay neighbors, skipping failed pods.
    let mut adjacency = Adjacency::new();
    for (i, cell) in cells.iter().enumerate() {
        let Some(id) = &pod_ids[i] else { continue };
        let neighbors: Vec<String> = cell
            .neighbors
            .iter()
            .filter_map(|&ni| pod_ids[ni].clone())
            .collect();
        adjacency.insert(id.clone(), neighbors);
    }

    // 5. Coverage validation against the nominal city disc.
    let total_pod_area: f64 = pods.iter().map(|p| p.area_ha).sum();
    let city_area_ha = PI * outer_radius * outer_radius / M2_PER_HA;
    let coverage = total_pod_area / city_area_ha;
    if coverage < COVERAGE_FLOOR {
        report.warning(
            Stage::Layout,
            format!(
                "pod coverage is only {:.1}% of city area ({total_pod_area:.1} ha / {city_area_ha:.1} ha)",
                coverage * 100.0
            ),
        );
    }

    report.info(
        Stage::Layout,
        format!(
            "laid out {} pods across {} rings, total area {total_pod_area:.1} ha ({:.1}% coverage)",
            pods.len(),
            params.rings.len(),
            coverage * 100.0
        ),
    );
    debug!(pods = pods.len(), coverage, "pod layout complete");

    (pods, adjacency, report)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::testutil::{default_params, default_spec};

    #[test]
    fn default_city_yields_six_pods() {
        let (pods, _, report) = layout_pods(&default_spec(), &default_params());
        assert!(report.valid, "layout failed: {:?}", report.errors);
        assert_eq!(pods.len(), 6);
    }

    #[test]
    fn pods_are_assigned_to_their_rings() {
        let (pods, _, _) = layout_pods(&default_spec(), &default_params());
        let count = |ring: &str| pods.iter().filter(|p| p.ring == ring).count();
        assert_eq!(count("center"), 1);
        assert_eq!(count("middle"), 2);
        assert_eq!(count("edge"), 3);
    }

    #[test]
    fn pod_coverage_is_at_least_ninety_percent() {
        let (pods, _, _) = layout_pods(&default_spec(), &default_params());
        let total: f64 = pods.iter().map(|p| p.area_ha).sum();
        let city = PI * 900.0 * 900.0 / M2_PER_HA;
        assert!(total / city >= 0.90, "coverage {:.1}%", total / city * 100.0);
    }

    #[test]
    fn center_pod_is_adjacent_to_middle_pods() {
        let (_, adjacency, _) = layout_pods(&default_spec(), &default_params());
        let center_adj = &adjacency["pod_center_0"];
        let middle = center_adj.iter().filter(|id| id.contains("middle")).count();
        assert!(middle >= 2, "center pod neighbors: {center_adj:?}");
    }

    #[test]
    fn adjacency_is_symmetric() {
        let (_, adjacency, _) = layout_pods(&default_spec(), &default_params());
        for (id, neighbors) in &adjacency {
            for n in neighbors {
                assert!(
                    adjacency[n].contains(id),
                    "adjacency not symmetric: {id} -> {n}"
                );
            }
        }
    }

    #[test]
    fn pod_centers_lie_inside_their_boundaries() {
        let (pods, _, _) = layout_pods(&default_spec(), &default_params());
        for pod in &pods {
            assert!(
                pod.boundary.contains(pod.center),
                "pod {} center outside its boundary",
                pod.id
            );
        }
    }

    #[test]
    fn pod_boundaries_are_non_degenerate() {
        let (pods, _, _) = layout_pods(&default_spec(), &default_params());
        for pod in &pods {
            assert!(pod.boundary.len() >= 3, "pod {} degenerate", pod.id);
            assert!(pod.area_ha > 0.0);
        }
    }

    #[test]
    fn center_pod_respects_walk_radius() {
        let (pods, _, _) = layout_pods(&default_spec(), &default_params());
        let center = pods.iter().find(|p| p.ring == "center").unwrap();
        let max_dist = center.boundary.max_distance_to(center.center);
        assert!(max_dist <= 400.0 * 1.10, "max distance {max_dist:.0}m");
    }

    #[test]
    fn zero_pod_count_errors_and_short_circuits() {
        let mut params = default_params();
        for ring in &mut params.rings {
            ring.pod_count = 0;
        }
        let (pods, adjacency, report) = layout_pods(&default_spec(), &params);
        assert!(pods.is_empty());
        assert!(adjacency.is_empty());
        assert!(!report.valid);
    }

    #[test]
    fn layout_is_deterministic() {
        let (a, adj_a, _) = layout_pods(&default_spec(), &default_params());
        let (b, adj_b, _) = layout_pods(&default_spec(), &default_params());
        assert_eq!(adj_a, adj_b);
        for (pa, pb) in a.iter().zip(&b) {
            assert_eq!(pa.id, pb.id);
            assert_eq!(pa.boundary, pb.boundary);
        }
    }
}
