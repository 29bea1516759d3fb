use super::{lerp, polar, Point2, Polygon, PARAM_EPSILON, TOLERANCE};

/// Default resolution for circle approximation.
pub const CIRCLE_SEGMENTS: usize = 64;

/// Chord length used when sampling arcs into line segments, in meters.
const ARC_CHORD: f64 = 20.0;

/// Cross-product magnitude below which two directions are treated as parallel.
const PARALLEL_EPS: f64 = 1e-12;

/// Returns a CCW polygon approximating a circle with the given number of
/// segments (minimum 3).
#[must_use]
pub fn approximate_circle(center: Point2, radius: f64, segments: usize) -> Polygon {
    let segments = segments.max(3);
    let mut pts = Vec::with_capacity(segments);
    for i in 0..segments {
        #[allow(clippy::cast_precision_loss)]
        let angle = 2.0 * std::f64::consts::PI * i as f64 / segments as f64;
        pts.push(polar(center, radius, angle));
    }
    Polygon::new(pts)
}

/// Clips the subject polygon to a convex clip polygon using the
/// Sutherland-Hodgman algorithm. Returns the intersection polygon.
///
/// Never fails: degenerate inputs or an intersection with fewer than 3
/// vertices yield the empty polygon, which callers must check.
#[must_use]
pub fn clip_to_convex(subject: &Polygon, clipper: &Polygon) -> Polygon {
    if subject.is_empty() || clipper.is_empty() {
        return Polygon::default();
    }
    let mut output = subject.vertices.clone();

    let clip_n = clipper.vertices.len();
    for i in 0..clip_n {
        if output.is_empty() {
            return Polygon::default();
        }
        let edge_start = clipper.vertices[i];
        let edge_end = clipper.vertices[(i + 1) % clip_n];
        let input = std::mem::take(&mut output);

        for j in 0..input.len() {
            let current = input[j];
            let next = input[(j + 1) % input.len()];
            let cur_inside = is_inside_edge(current, edge_start, edge_end);
            let next_inside = is_inside_edge(next, edge_start, edge_end);

            if cur_inside && next_inside {
                output.push(next);
            } else if cur_inside && !next_inside {
                if let Some(ix) = line_intersection(current, next, edge_start, edge_end) {
                    output.push(ix);
                }
            } else if !cur_inside && next_inside {
                if let Some(ix) = line_intersection(current, next, edge_start, edge_end) {
                    output.push(ix);
                }
                output.push(next);
            }
        }
    }
    if output.len() < 3 {
        return Polygon::default();
    }
    Polygon::new(output)
}

/// Clips a polygon to the left side of the directed line from `a` to `b`.
///
/// "Left" is the side with positive 2D cross product; this is the bisector
/// primitive of the Voronoi tessellator and the inner step of annulus
/// clipping.
#[must_use]
pub fn clip_to_half_plane(poly: &Polygon, a: Point2, b: Point2) -> Polygon {
    if poly.is_empty() {
        return Polygon::default();
    }
    let n = poly.vertices.len();
    let mut output = Vec::with_capacity(n);
    for i in 0..n {
        let current = poly.vertices[i];
        let next = poly.vertices[(i + 1) % n];
        let cur_inside = is_inside_edge(current, a, b);
        let next_inside = is_inside_edge(next, a, b);

        if cur_inside && next_inside {
            output.push(next);
        } else if cur_inside && !next_inside {
            if let Some(ix) = line_intersection(current, next, a, b) {
                output.push(ix);
            }
        } else if !cur_inside && next_inside {
            if let Some(ix) = line_intersection(current, next, a, b) {
                output.push(ix);
            }
            output.push(next);
        }
    }
    if output.len() < 3 {
        return Polygon::default();
    }
    Polygon::new(output)
}

/// Clips a polygon to the annular region between `inner_r` and `outer_r`
/// centered at `center`.
///
/// The outer bound is a [`CIRCLE_SEGMENTS`]-gon convex clip. When `inner_r`
/// is positive, chords crossing the inner disc are replaced by sampled arc
/// segments so the result stays a closed simple polygon. Degenerate results
/// collapse to the empty polygon.
#[must_use]
pub fn clip_to_annulus(subject: &Polygon, center: Point2, inner_r: f64, outer_r: f64) -> Polygon {
    if subject.is_empty() {
        return Polygon::default();
    }
    let outer_circle = approximate_circle(center, outer_r, CIRCLE_SEGMENTS);
    let result = clip_to_convex(subject, &outer_circle);
    if result.is_empty() {
        return Polygon::default();
    }
    if inner_r > TOLERANCE {
        return clip_outside_circle(&result, center, inner_r);
    }
    result
}

/// Removes the interior of a circle from a polygon by walking the boundary
/// and replacing runs inside the circle with arcs along it.
fn clip_outside_circle(subject: &Polygon, center: Point2, radius: f64) -> Polygon {
    if subject.is_empty() {
        return Polygon::default();
    }
    let n = subject.vertices.len();
    let mut result: Vec<Point2> = Vec::with_capacity(n * 2);

    for i in 0..n {
        let current = subject.vertices[i];
        let next = subject.vertices[(i + 1) % n];
        let cur_outside = nalgebra::distance(&center, &current) >= radius - TOLERANCE;
        let next_outside = nalgebra::distance(&center, &next) >= radius - TOLERANCE;

        if cur_outside && next_outside {
            // The chord may still pass through the circle.
            if segment_intersects_circle(current, next, center, radius) {
                let pts = line_circle_intersections(current, next, center, radius);
                if pts.len() == 2 {
                    result.push(pts[0]);
                    result.extend(arc_between(center, radius, pts[0], pts[1]));
                    result.push(pts[1]);
                }
            }
            result.push(next);
        } else if cur_outside && !next_outside {
            // Entering the circle.
            if let Some(pt) = line_circle_intersection_nearest(current, next, center, radius) {
                result.push(pt);
            }
        } else if !cur_outside && next_outside {
            // Exiting: arc from the entry point to the exit, then continue.
            if let Some(pt) = line_circle_intersection_nearest(next, current, center, radius) {
                if let Some(last) = result.last().copied() {
                    result.extend(arc_between(center, radius, last, pt));
                }
                result.push(pt);
            }
            result.push(next);
        }
        // Both inside: skipped, replaced by the arc.
    }

    if result.len() < 3 {
        return Polygon::default();
    }
    Polygon::new(result)
}

/// Returns true if the point is on the inside (left) of the directed edge.
fn is_inside_edge(p: Point2, edge_start: Point2, edge_end: Point2) -> bool {
    (edge_end.x - edge_start.x) * (p.y - edge_start.y)
        - (edge_end.y - edge_start.y) * (p.x - edge_start.x)
        >= 0.0
}

/// Returns the intersection point of the infinite lines `p1→p2` and `p3→p4`.
fn line_intersection(p1: Point2, p2: Point2, p3: Point2, p4: Point2) -> Option<Point2> {
    let d = (p1.x - p2.x) * (p3.y - p4.y) - (p1.y - p2.y) * (p3.x - p4.x);
    if d.abs() < PARALLEL_EPS {
        return None;
    }
    let t = ((p1.x - p3.x) * (p3.y - p4.y) - (p1.y - p3.y) * (p3.x - p4.x)) / d;
    Some(Point2::new(
        p1.x + t * (p2.x - p1.x),
        p1.y + t * (p2.y - p1.y),
    ))
}

/// Returns the intersection of segment `a→b` with the circle that is
/// nearest to `a`.
fn line_circle_intersection_nearest(
    a: Point2,
    b: Point2,
    center: Point2,
    radius: f64,
) -> Option<Point2> {
    line_circle_intersections(a, b, center, radius)
        .into_iter()
        .min_by(|p, q| {
            nalgebra::distance(&a, p).total_cmp(&nalgebra::distance(&a, q))
        })
}

/// Returns all intersection points of segment `a→b` with the circle.
fn line_circle_intersections(a: Point2, b: Point2, center: Point2, radius: f64) -> Vec<Point2> {
    let d = b - a;
    let f = a - center;

    let aa = d.dot(&d);
    let bb = 2.0 * f.dot(&d);
    let cc = f.dot(&f) - radius * radius;

    let disc = bb * bb - 4.0 * aa * cc;
    if disc < 0.0 {
        return Vec::new();
    }

    let sqrt_disc = disc.sqrt();
    let mut pts = Vec::with_capacity(2);
    for sign in [-1.0, 1.0] {
        let t = (-bb + sign * sqrt_disc) / (2.0 * aa);
        if (-PARAM_EPSILON..=1.0 + PARAM_EPSILON).contains(&t) {
            pts.push(lerp(a, b, t.clamp(0.0, 1.0)));
        }
    }
    pts
}

/// Returns true if segment `a→b` passes through the interior of the circle.
fn segment_intersects_circle(a: Point2, b: Point2, center: Point2, radius: f64) -> bool {
    let d = b - a;
    let len2 = d.dot(&d);
    if len2 < TOLERANCE * TOLERANCE {
        return nalgebra::distance(&a, &center) < radius;
    }
    let t = ((center - a).dot(&d) / len2).clamp(0.0, 1.0);
    let closest = a + d * t;
    nalgebra::distance(&closest, &center) < radius - TOLERANCE
}

/// Returns intermediate points on the CCW arc from `p1` to `p2`, both of
/// which must lie on the circle. Spacing is roughly [`ARC_CHORD`] meters.
fn arc_between(center: Point2, radius: f64, p1: Point2, p2: Point2) -> Vec<Point2> {
    let a1 = (p1.y - center.y).atan2(p1.x - center.x);
    let a2 = (p2.y - center.y).atan2(p2.x - center.x);

    let mut diff = a2 - a1;
    if diff < 0.0 {
        diff += 2.0 * std::f64::consts::PI;
    }
    if diff > 2.0 * std::f64::consts::PI {
        diff -= 2.0 * std::f64::consts::PI;
    }

    let arc_len = radius * diff;
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let num_pts = (arc_len / ARC_CHORD).ceil() as usize;
    if num_pts < 1 {
        return Vec::new();
    }

    let mut pts = Vec::with_capacity(num_pts.saturating_sub(1));
    for i in 1..num_pts {
        #[allow(clippy::cast_precision_loss)]
        let t = i as f64 / num_pts as f64;
        pts.push(polar(center, radius, a1 + diff * t));
    }
    pts
}
