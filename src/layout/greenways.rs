use serde::Serialize;
use tracing::debug;

use crate::math::spline::{catmull_rom, catmull_rom_closed};
use crate::math::{midpoint, polar, Point2};
use crate::report::{Report, Stage};
use crate::spec::RingSpec;

use super::Pod;

/// Kind of a greenway path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GreenwayKind {
    /// Closed loop threading the inter-pod space of one ring.
    RingCorridor,
    /// Center-to-edge path with a countryside extension.
    Radial,
}

/// An elevated green path through the city.
#[derive(Debug, Clone, Serialize)]
pub struct Greenway {
    pub id: String,
    pub kind: GreenwayKind,
    /// Sampled spline points.
    pub points: Vec<Point2>,
    pub width_m: f64,
    pub elevated_m: f64,
    /// Ring name for corridors; absent for radials.
    pub ring: Option<String>,
}

const GREENWAY_WIDTH: f64 = 3.0;
const GREENWAY_ELEVATION: f64 = 5.0;
/// How far radial paths continue past the city edge, meters.
const COUNTRYSIDE_EXTENSION: f64 = 500.0;
const SPLINE_SAMPLES: usize = 10;
const SPLINE_TENSION: f64 = 0.5;

/// Generates the city-wide greenway network.
///
/// Ring corridors loop around each ring with two or more pods, threading
/// the space between pods; radial paths run from near the center to the
/// edge and out into the countryside. Both are Catmull-Rom splines over
/// deterministically perturbed waypoints, so identical input reproduces
/// identical paths.
#[must_use]
pub fn generate_greenways(pods: &[Pod], rings: &[RingSpec]) -> (Vec<Greenway>, Report) {
    let mut report = Report::new();
    let mut paths = Vec::new();

    // Ring corridor loops for rings with 2+ pods.
    let mut corridor_count = 0usize;
    for ring in rings {
        let ring_pods: Vec<&Pod> = pods.iter().filter(|p| p.ring == ring.name).collect();
        if ring_pods.len() < 2 {
            continue;
        }
        let waypoints = corridor_waypoints(&ring_pods, ring);
        if waypoints.len() < 3 {
            continue;
        }
        let spline = catmull_rom_closed(&waypoints, SPLINE_SAMPLES, SPLINE_TENSION);
        paths.push(Greenway {
            id: format!("greenway_ring_{}_{corridor_count}", ring.name),
            kind: GreenwayKind::RingCorridor,
            points: spline.points,
            width_m: GREENWAY_WIDTH,
            elevated_m: GREENWAY_ELEVATION,
            ring: Some(ring.name.clone()),
        });
        corridor_count += 1;
    }

    // Radial paths center → edge → countryside.
    let radials = radial_waypoints(pods, rings);
    let radial_count = radials.len();
    for (i, waypoints) in radials.into_iter().enumerate() {
        if waypoints.len() < 2 {
            continue;
        }
        let spline = catmull_rom(&waypoints, SPLINE_SAMPLES, SPLINE_TENSION);
        paths.push(Greenway {
            id: format!("greenway_radial_{i}"),
            kind: GreenwayKind::Radial,
            points: spline.points,
            width_m: GREENWAY_WIDTH,
            elevated_m: GREENWAY_ELEVATION,
            ring: None,
        });
    }

    report.info(
        Stage::Greenways,
        format!(
            "generated {} greenways ({corridor_count} ring corridors, {radial_count} radials)",
            paths.len()
        ),
    );
    debug!(greenways = paths.len(), "greenway generation complete");
    (paths, report)
}

/// Waypoints for a closed corridor through a ring's inter-pod space: the
/// midpoint between each pair of angularly consecutive pods, projected to
/// the ring midline with a small deterministic perturbation.
fn corridor_waypoints(ring_pods: &[&Pod], ring: &RingSpec) -> Vec<Point2> {
    let mut sorted: Vec<(&Pod, f64)> = ring_pods
        .iter()
        .map(|p| (*p, p.center.y.atan2(p.center.x)))
        .collect();
    sorted.sort_by(|a, b| a.1.total_cmp(&b.1));

    let mid_radius = (ring.radius_from_m + ring.radius_to_m) / 2.0;
    let n = sorted.len();
    let mut waypoints = Vec::with_capacity(n);

    for i in 0..n {
        let (cur, cur_angle) = sorted[i];
        let (next, next_angle) = sorted[(i + 1) % n];
        let mid = midpoint(cur.center, next.center);
        let dist = mid.coords.norm();
        if dist < 1.0 {
            // Diametrically opposed pods: fall back to the bisector angle.
            let angle = (cur_angle + next_angle) / 2.0;
            waypoints.push(polar(Point2::origin(), mid_radius, angle));
            continue;
        }
        #[allow(clippy::cast_precision_loss)]
        let perturbation = 0.05 * (i as f64).mul_add(2.3, 0.7).sin();
        let target_r = mid_radius * (1.0 + perturbation);
        waypoints.push(Point2::from(mid.coords * (target_r / dist)));
    }
    waypoints
}

/// Waypoints for the radial paths. The radial count follows the outermost
/// ring with at least 3 pods (clamped to 12, default 6); each radial gets a
/// deterministic S-curve offset at every ring midline.
fn radial_waypoints(pods: &[Pod], rings: &[RingSpec]) -> Vec<Vec<Point2>> {
    let Some(last_ring) = rings.last() else {
        return Vec::new();
    };
    let outer_radius = last_ring.radius_to_m;

    let mut num_radials = 6usize;
    for ring in rings.iter().rev() {
        let count = pods.iter().filter(|p| p.ring == ring.name).count();
        if count >= 3 {
            num_radials = count.min(12);
            break;
        }
    }

    let mut radials = Vec::with_capacity(num_radials);
    for r in 0..num_radials {
        #[allow(clippy::cast_precision_loss)]
        let base_angle = 2.0 * std::f64::consts::PI * r as f64 / num_radials as f64;

        let mut start_r = 50.0;
        if rings[0].radius_to_m < start_r {
            start_r = rings[0].radius_to_m * 0.5;
        }

        let mut waypoints = vec![polar(Point2::origin(), start_r, base_angle)];
        for (ri, ring) in rings.iter().enumerate() {
            let mid_r = (ring.radius_from_m + ring.radius_to_m) / 2.0;
            #[allow(clippy::cast_precision_loss)]
            let offset = 0.03 * (ri as f64).mul_add(1.7, r as f64 * 0.5).sin();
            waypoints.push(polar(Point2::origin(), mid_r, base_angle + offset));
        }
        waypoints.push(polar(Point2::origin(), outer_radius, base_angle));
        waypoints.push(polar(
            Point2::origin(),
            outer_radius + COUNTRYSIDE_EXTENSION,
            base_angle,
        ));
        radials.push(waypoints);
    }
    radials
}
