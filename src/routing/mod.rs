pub mod connectivity;

use std::collections::BTreeMap;
use std::f64::consts::PI;
use std::fmt;

use serde::Serialize;
use tracing::debug;

use crate::math::{polar, Point2, Point3};
use crate::report::{Report, Stage};
use crate::spec::{CitySpec, InfrastructureSpec};

use crate::layout::Pod;

/// Infrastructure network identity.
///
/// Routing and capacity sizing both match exhaustively on this enum;
/// adding a network means extending both together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NetworkType {
    Sewage,
    Water,
    Electrical,
    Telecom,
    Vehicle,
    Pedway,
    BikeTunnel,
}

impl NetworkType {
    /// All networks in routing dependency order.
    pub const ALL: [Self; 7] = [
        Self::Sewage,
        Self::Water,
        Self::Electrical,
        Self::Telecom,
        Self::Vehicle,
        Self::Pedway,
        Self::BikeTunnel,
    ];
}

impl fmt::Display for NetworkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Sewage => "sewage",
            Self::Water => "water",
            Self::Electrical => "electrical",
            Self::Telecom => "telecom",
            Self::Vehicle => "vehicle",
            Self::Pedway => "pedway",
            Self::BikeTunnel => "bike_tunnel",
        };
        f.write_str(s)
    }
}

/// One routed infrastructure segment.
///
/// Immutable once routed, except `connected_to`, which the connectivity
/// post-process fills with sorted segment ids.
#[derive(Debug, Clone, Serialize)]
pub struct Segment {
    pub id: String,
    pub network: NetworkType,
    /// Vertical layer: 1 = bottom, 2 = middle, 3 = top underground.
    pub layer: u8,
    pub start: Point3,
    pub end: Point3,
    pub width_m: f64,
    /// Network-specific units (gpd, kW, nodes, or peak users).
    pub capacity: f64,
    pub is_trunk: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub connected_to: Vec<String>,
}

// Layer Y offsets within the 8 m excavation depth.
const Y_LAYER1: f64 = -7.0;
const Y_LAYER2: f64 = -4.5;
const Y_LAYER3: f64 = -2.0;

/// Radials stop this far from the center to avoid the hub singularity.
const CENTER_STANDOFF: f64 = 10.0;

/// Branches shorter than this are dropped: the pod sits on a junction.
const MIN_BRANCH_LENGTH: f64 = 1.0;

// People served per unit of peak capacity.
const VEHICLE_SERVICE_RATIO: f64 = 250.0;
const PEDWAY_SERVICE_RATIO: f64 = 100.0;
const BIKE_SERVICE_RATIO: f64 = 200.0;

/// Routing parameters for one network.
struct NetworkDef {
    network: NetworkType,
    layer: u8,
    y_offset: f64,
    trunk_width: f64,
    branch_width: f64,
    /// Shift along the radial's perpendicular so co-layer networks do not
    /// overlap. Applied to radial trunks only.
    lateral_offset: f64,
}

/// Precomputed trunk geometry shared by all networks.
struct Backbone {
    num_radials: usize,
    radial_angles: Vec<f64>,
    perimeter_r: f64,
    /// Inter-ring boundary radii (every ring's outer radius but the last).
    ring_radii: Vec<f64>,
    /// Radial × ring-radius intersections.
    junctions: Vec<Point2>,
}

/// Routes all seven infrastructure networks as trunk-and-branch topology
/// over a shared radial/ring backbone, then derives the connectivity graph.
///
/// Segment order and ids are deterministic for identical input. A network
/// that produces zero segments is a warning, not an error.
#[must_use]
pub fn route_infrastructure(spec: &CitySpec, pods: &[Pod]) -> (Vec<Segment>, Report) {
    let mut report = Report::new();

    if pods.is_empty() {
        report.warning(Stage::Routing, "no pods for infrastructure routing");
        return (Vec::new(), report);
    }

    let total_pop: u32 = pods.iter().map(|p| p.target_population).sum();
    let backbone = compute_backbone(spec, pods.len());

    let defs = [
        NetworkDef {
            network: NetworkType::Sewage,
            layer: 1,
            y_offset: Y_LAYER1,
            trunk_width: 2.5,
            branch_width: 1.5,
            lateral_offset: 0.0,
        },
        NetworkDef {
            network: NetworkType::Water,
            layer: 1,
            y_offset: Y_LAYER1,
            trunk_width: 2.5,
            branch_width: 1.5,
            lateral_offset: 3.0,
        },
        NetworkDef {
            network: NetworkType::Electrical,
            layer: 2,
            y_offset: Y_LAYER2,
            trunk_width: 2.0,
            branch_width: 1.0,
            lateral_offset: 0.0,
        },
        NetworkDef {
            network: NetworkType::Telecom,
            layer: 2,
            y_offset: Y_LAYER2,
            trunk_width: 1.5,
            branch_width: 0.8,
            lateral_offset: 2.5,
        },
        NetworkDef {
            network: NetworkType::Vehicle,
            layer: 3,
            y_offset: Y_LAYER3,
            trunk_width: spec.vehicles.arterial_width_m,
            branch_width: spec.vehicles.service_branch_width_m,
            lateral_offset: 0.0,
        },
        NetworkDef {
            network: NetworkType::Pedway,
            layer: 3,
            y_offset: Y_LAYER3,
            trunk_width: 3.0,
            branch_width: 2.0,
            lateral_offset: 5.0,
        },
        NetworkDef {
            network: NetworkType::BikeTunnel,
            layer: 3,
            y_offset: Y_LAYER3,
            trunk_width: 2.5,
            branch_width: 1.5,
            lateral_offset: 8.0,
        },
    ];

    let mut segments = Vec::new();
    let mut idx = 0usize;
    for def in &defs {
        route_network(
            def,
            &backbone,
            pods,
            total_pop,
            &spec.infrastructure,
            &mut idx,
            &mut segments,
        );
    }

    // Connectivity post-process: fill each segment's sorted neighbor ids.
    let conn = connectivity::build_connectivity(&segments);
    for seg in &mut segments {
        if let Some(ids) = conn.get(&seg.id) {
            seg.connected_to = ids.clone();
        }
    }

    let mut counts: BTreeMap<NetworkType, usize> = BTreeMap::new();
    for seg in &segments {
        *counts.entry(seg.network).or_insert(0) += 1;
    }
    for network in NetworkType::ALL {
        if counts.get(&network).copied().unwrap_or(0) == 0 {
            report.warning(
                Stage::Routing,
                format!("no segments generated for {network} network"),
            );
        }
    }

    let count_summary: Vec<String> = NetworkType::ALL
        .iter()
        .map(|n| format!("{n}={}", counts.get(n).copied().unwrap_or(0)))
        .collect();
    report.info(
        Stage::Routing,
        format!(
            "routed {} infrastructure segments: {}",
            segments.len(),
            count_summary.join(" ")
        ),
    );
    debug!(segments = segments.len(), "infrastructure routing complete");

    (segments, report)
}

/// Builds the shared radial + ring-chord skeleton.
fn compute_backbone(spec: &CitySpec, pod_count: usize) -> Backbone {
    let num_radials = pod_count.max(4);
    let perimeter_r = spec.outer_radius();

    let ring_radii: Vec<f64> = spec
        .rings
        .iter()
        .take(spec.rings.len().saturating_sub(1))
        .map(|r| r.radius_to_m)
        .collect();

    #[allow(clippy::cast_precision_loss)]
    let radial_angles: Vec<f64> = (0..num_radials)
        .map(|i| 2.0 * PI * i as f64 / num_radials as f64)
        .collect();

    let mut junctions = Vec::with_capacity(num_radials * ring_radii.len());
    for &angle in &radial_angles {
        for &r in &ring_radii {
            junctions.push(polar(Point2::origin(), r, angle));
        }
    }

    Backbone {
        num_radials,
        radial_angles,
        perimeter_r,
        ring_radii,
        junctions,
    }
}

/// Generates trunk, ring-chord, and branch segments for one network.
#[allow(clippy::too_many_arguments)]
fn route_network(
    def: &NetworkDef,
    backbone: &Backbone,
    pods: &[Pod],
    total_pop: u32,
    infra: &InfrastructureSpec,
    idx: &mut usize,
    out: &mut Vec<Segment>,
) {
    // 1. Radial trunks, split at every ring crossing, perimeter → center.
    for &angle in &backbone.radial_angles {
        let mut breakpoints = vec![backbone.perimeter_r];
        breakpoints.extend(backbone.ring_radii.iter().rev());
        breakpoints.push(CENTER_STANDOFF);

        let (sin, cos) = angle.sin_cos();
        let (perp_x, perp_z) = (-sin, cos);

        for pair in breakpoints.windows(2) {
            let (outer_r, inner_r) = (pair[0], pair[1]);
            let down_pop = downstream_population(
                inner_r,
                backbone.perimeter_r,
                total_pop,
                backbone.num_radials,
            );
            let capacity =
                capacity_for(def.network, infra, down_pop, (outer_r - inner_r).abs());

            out.push(Segment {
                id: format!("{}_trunk_{:03}", def.network, *idx),
                network: def.network,
                layer: def.layer,
                start: Point3::new(
                    outer_r * cos + def.lateral_offset * perp_x,
                    def.y_offset,
                    outer_r * sin + def.lateral_offset * perp_z,
                ),
                end: Point3::new(
                    inner_r * cos + def.lateral_offset * perp_x,
                    def.y_offset,
                    inner_r * sin + def.lateral_offset * perp_z,
                ),
                width_m: def.trunk_width,
                capacity,
                is_trunk: true,
                connected_to: Vec::new(),
            });
            *idx += 1;
        }
    }

    // 2. Ring chords between adjacent radials at each inter-ring radius.
    for &ring_r in &backbone.ring_radii {
        for i in 0..backbone.num_radials {
            let a1 = backbone.radial_angles[i];
            let a2 = backbone.radial_angles[(i + 1) % backbone.num_radials];

            #[allow(clippy::cast_possible_truncation)]
            let share = total_pop / backbone.num_radials as u32;
            let capacity = capacity_for(def.network, infra, share, ring_r * (a2 - a1).abs());

            let p1 = polar(Point2::origin(), ring_r, a1);
            let p2 = polar(Point2::origin(), ring_r, a2);
            out.push(Segment {
                id: format!("{}_ring_{:03}", def.network, *idx),
                network: def.network,
                layer: def.layer,
                start: Point3::new(p1.x, def.y_offset, p1.y),
                end: Point3::new(p2.x, def.y_offset, p2.y),
                width_m: def.trunk_width,
                capacity,
                is_trunk: true,
                connected_to: Vec::new(),
            });
            *idx += 1;
        }
    }

    // 3. Branches from the nearest junction to each pod center.
    for pod in pods {
        let junction = nearest_junction(pod.center, backbone);
        let length = nalgebra::distance(&pod.center, &junction);
        if length < MIN_BRANCH_LENGTH {
            continue;
        }
        let capacity = capacity_for(def.network, infra, pod.target_population, length);

        out.push(Segment {
            id: format!("{}_branch_{:03}", def.network, *idx),
            network: def.network,
            layer: def.layer,
            start: Point3::new(junction.x, def.y_offset, junction.y),
            end: Point3::new(pod.center.x, def.y_offset, pod.center.y),
            width_m: def.branch_width,
            capacity,
            is_trunk: false,
            connected_to: Vec::new(),
        });
        *idx += 1;
    }
}

/// Returns the backbone junction closest to `p`, considering both the
/// radial × ring intersections and the radial perimeter endpoints.
fn nearest_junction(p: Point2, backbone: &Backbone) -> Point2 {
    let mut best = Point2::origin();
    let mut best_dist = f64::MAX;

    for j in &backbone.junctions {
        let d = nalgebra::distance(&p, j);
        if d < best_dist {
            best_dist = d;
            best = *j;
        }
    }
    for &angle in &backbone.radial_angles {
        let perimeter = polar(Point2::origin(), backbone.perimeter_r, angle);
        let d = nalgebra::distance(&p, &perimeter);
        if d < best_dist {
            best_dist = d;
            best = perimeter;
        }
    }
    best
}

/// Estimates the population served downstream of a radial point: the
/// area-proportional share of the city inside `inner_r`, split across the
/// radials.
fn downstream_population(
    inner_r: f64,
    perimeter_r: f64,
    total_pop: u32,
    num_radials: usize,
) -> u32 {
    #[allow(clippy::cast_precision_loss)]
    let radials = num_radials.max(1) as f64;
    if perimeter_r < 1.0 {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        return (f64::from(total_pop) / radials) as u32;
    }
    let fraction = 1.0 - (inner_r * inner_r) / (perimeter_r * perimeter_r);
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let pop = (fraction * f64::from(total_pop) / radials).ceil() as u32;
    pop
}

/// Capacity for one segment, in each network's own units.
fn capacity_for(
    network: NetworkType,
    infra: &InfrastructureSpec,
    pop: u32,
    seg_length: f64,
) -> f64 {
    let pop = f64::from(pop);
    match network {
        NetworkType::Sewage => pop * infra.sewage_gpd_per_capita,
        NetworkType::Water => pop * infra.water_gpd_per_capita,
        NetworkType::Electrical => pop * infra.electrical_kw_per_capita,
        NetworkType::Telecom => {
            if seg_length < infra.telecom_node_spacing_m {
                1.0
            } else {
                (seg_length / infra.telecom_node_spacing_m).ceil()
            }
        }
        NetworkType::Vehicle => (pop / VEHICLE_SERVICE_RATIO).max(1.0),
        NetworkType::Pedway => (pop / PEDWAY_SERVICE_RATIO).max(1.0),
        NetworkType::BikeTunnel => (pop / BIKE_SERVICE_RATIO).max(1.0),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::layout::layout_pods;
    use crate::testutil::{default_params, default_spec};

    fn routed_city() -> (Vec<Segment>, CitySpec) {
        let spec = default_spec();
        let (pods, _, layout_report) = layout_pods(&spec, &default_params());
        assert!(layout_report.valid, "layout failed: {:?}", layout_report.errors);
        let (segments, report) = route_infrastructure(&spec, &pods);
        assert!(report.valid, "routing failed: {:?}", report.errors);
        (segments, spec)
    }

    #[test]
    fn produces_segments_for_all_seven_networks() {
        let (segments, _) = routed_city();
        assert!(!segments.is_empty());
        for network in NetworkType::ALL {
            assert!(
                segments.iter().any(|s| s.network == network),
                "no segments for {network}"
            );
        }
    }

    #[test]
    fn layer_assignment_follows_network() {
        let (segments, _) = routed_city();
        for seg in &segments {
            let expected = match seg.network {
                NetworkType::Sewage | NetworkType::Water => 1,
                NetworkType::Electrical | NetworkType::Telecom => 2,
                NetworkType::Vehicle | NetworkType::Pedway | NetworkType::BikeTunnel => 3,
            };
            assert_eq!(seg.layer, expected, "segment {}", seg.id);
        }
    }

    #[test]
    fn y_offsets_match_layers() {
        let (segments, _) = routed_city();
        for seg in &segments {
            let expected = match seg.layer {
                1 => Y_LAYER1,
                2 => Y_LAYER2,
                _ => Y_LAYER3,
            };
            assert!(
                (seg.start.y - expected).abs() < f64::EPSILON
                    && (seg.end.y - expected).abs() < f64::EPSILON,
                "segment {} y = {}/{}",
                seg.id,
                seg.start.y,
                seg.end.y
            );
        }
    }

    #[test]
    fn capacities_are_positive() {
        let (segments, _) = routed_city();
        for seg in &segments {
            assert!(seg.capacity > 0.0, "segment {} capacity {}", seg.id, seg.capacity);
        }
    }

    #[test]
    fn vehicle_widths_come_from_the_spec() {
        let (segments, spec) = routed_city();
        for seg in segments.iter().filter(|s| s.network == NetworkType::Vehicle) {
            let expected = if seg.is_trunk {
                spec.vehicles.arterial_width_m
            } else {
                spec.vehicles.service_branch_width_m
            };
            assert!(
                (seg.width_m - expected).abs() < f64::EPSILON,
                "vehicle segment {} width {}",
                seg.id,
                seg.width_m
            );
        }
    }

    #[test]
    fn both_trunks_and_branches_exist() {
        let (segments, _) = routed_city();
        assert!(segments.iter().any(|s| s.is_trunk));
        assert!(segments.iter().any(|s| !s.is_trunk));
    }

    #[test]
    fn endpoints_stay_within_the_city() {
        let (segments, spec) = routed_city();
        let max_r = spec.outer_radius() + 10.0;
        for seg in &segments {
            for pt in [&seg.start, &seg.end] {
                let r = pt.x.hypot(pt.z);
                assert!(r <= max_r, "segment {} endpoint at radius {r:.1}", seg.id);
            }
        }
    }

    #[test]
    fn no_pods_warns_and_returns_empty() {
        let spec = default_spec();
        let (segments, report) = route_infrastructure(&spec, &[]);
        assert!(segments.is_empty());
        assert!(report.valid);
        assert!(!report.warnings.is_empty());
    }

    #[test]
    fn telecom_capacity_counts_nodes() {
        let infra = InfrastructureSpec::default();
        assert!((capacity_for(NetworkType::Telecom, &infra, 0, 30.0) - 1.0).abs() < f64::EPSILON);
        assert!((capacity_for(NetworkType::Telecom, &infra, 0, 300.0) - 4.0).abs() < f64::EPSILON);
    }

    #[test]
    fn downstream_population_shrinks_toward_perimeter() {
        let at_center = downstream_population(10.0, 900.0, 50_000, 6);
        let near_edge = downstream_population(600.0, 900.0, 50_000, 6);
        assert!(at_center > near_edge);
        assert!(near_edge > 0);
    }

    #[test]
    fn routing_is_deterministic() {
        let (a, _) = routed_city();
        let (b, _) = routed_city();
        assert_eq!(a.len(), b.len());
        for (sa, sb) in a.iter().zip(&b) {
            assert_eq!(sa.id, sb.id);
            assert_eq!(sa.start, sb.start);
            assert_eq!(sa.end, sb.end);
            assert_eq!(sa.connected_to, sb.connected_to);
        }
    }
}
