use serde::Serialize;

use super::{lerp, perp, Point2, Vector2, TOLERANCE};

/// An ordered, open sequence of points forming a path.
///
/// Zero- and one-point polylines are defined degenerate forms: length is
/// zero and [`Polyline::point_at`] returns the only point (or the origin).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Polyline {
    pub points: Vec<Point2>,
}

impl Polyline {
    /// Creates a polyline from a list of points.
    #[must_use]
    pub fn new(points: Vec<Point2>) -> Self {
        Self { points }
    }

    /// Returns the total arc length of the polyline.
    #[must_use]
    pub fn length(&self) -> f64 {
        self.points
            .windows(2)
            .map(|w| nalgebra::distance(&w[0], &w[1]))
            .sum()
    }

    /// Returns the point at fraction `t` in `[0, 1]` along the arc length.
    #[must_use]
    pub fn point_at(&self, t: f64) -> Point2 {
        let Some(first) = self.points.first() else {
            return Point2::origin();
        };
        if self.points.len() == 1 || t <= 0.0 {
            return *first;
        }
        let last = self.points[self.points.len() - 1];
        if t >= 1.0 {
            return last;
        }

        let target = t * self.length();
        let mut walked = 0.0;
        for w in self.points.windows(2) {
            let seg_len = nalgebra::distance(&w[0], &w[1]);
            if walked + seg_len >= target {
                let frac = (target - walked) / seg_len;
                return lerp(w[0], w[1], frac);
            }
            walked += seg_len;
        }
        last
    }

    /// Returns the closest point on the polyline to `p`, and its distance.
    #[must_use]
    pub fn nearest_point(&self, p: Point2) -> (Point2, f64) {
        let Some(first) = self.points.first() else {
            return (Point2::origin(), f64::MAX);
        };
        let mut best = *first;
        let mut best_dist = nalgebra::distance(&p, first);
        for w in self.points.windows(2) {
            let (pt, dist) = nearest_point_on_segment(p, w[0], w[1]);
            if dist < best_dist {
                best = pt;
                best_dist = dist;
            }
        }
        (best, best_dist)
    }

    /// Returns a polyline offset laterally by `distance`.
    ///
    /// Positive offsets shift to the left when walking along the polyline.
    /// Interior vertices use the averaged direction of their adjacent
    /// segments, so corners stay joined instead of splitting.
    #[must_use]
    pub fn offset(&self, distance: f64) -> Self {
        let n = self.points.len();
        if n < 2 {
            return self.clone();
        }

        let dir_or_zero = |a: Point2, b: Point2| -> Vector2 {
            (b - a).try_normalize(TOLERANCE).unwrap_or_else(Vector2::zeros)
        };

        let mut result = Vec::with_capacity(n);
        for i in 0..n {
            let normal = if i == 0 {
                perp(dir_or_zero(self.points[0], self.points[1]))
            } else if i == n - 1 {
                perp(dir_or_zero(self.points[n - 2], self.points[n - 1]))
            } else {
                let d1 = dir_or_zero(self.points[i - 1], self.points[i]);
                let d2 = dir_or_zero(self.points[i], self.points[i + 1]);
                let avg = (d1 + d2).try_normalize(TOLERANCE).unwrap_or(d1);
                perp(avg)
            };
            result.push(self.points[i] + normal * distance);
        }
        Self { points: result }
    }
}

/// Returns the closest point on segment `ab` to `p`, and its distance.
#[must_use]
pub fn nearest_point_on_segment(p: Point2, a: Point2, b: Point2) -> (Point2, f64) {
    let ab = b - a;
    let len2 = ab.dot(&ab);
    if len2 < TOLERANCE * TOLERANCE {
        return (a, nalgebra::distance(&p, &a));
    }
    let t = ((p - a).dot(&ab) / len2).clamp(0.0, 1.0);
    let closest = a + ab * t;
    (closest, nalgebra::distance(&p, &closest))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::math::approx_eq;

    #[test]
    fn length_two_segments() {
        let pl = Polyline::new(vec![
            Point2::new(0.0, 0.0),
            Point2::new(100.0, 0.0),
            Point2::new(100.0, 100.0),
        ]);
        assert!(approx_eq(pl.length(), 200.0));
    }

    #[test]
    fn point_at_endpoints_and_midpoint() {
        let pl = Polyline::new(vec![Point2::new(0.0, 0.0), Point2::new(100.0, 0.0)]);
        assert!(approx_eq(pl.point_at(0.0).x, 0.0));
        assert!(approx_eq(pl.point_at(0.5).x, 50.0));
        assert!(approx_eq(pl.point_at(1.0).x, 100.0));
    }

    #[test]
    fn point_at_clamps_out_of_range() {
        let pl = Polyline::new(vec![Point2::new(0.0, 0.0), Point2::new(10.0, 0.0)]);
        assert!(approx_eq(pl.point_at(-0.5).x, 0.0));
        assert!(approx_eq(pl.point_at(1.5).x, 10.0));
    }

    #[test]
    fn nearest_point_projects_onto_segment() {
        let pl = Polyline::new(vec![Point2::new(0.0, 0.0), Point2::new(100.0, 0.0)]);
        let (pt, dist) = pl.nearest_point(Point2::new(50.0, 10.0));
        assert!(approx_eq(dist, 10.0));
        assert!(approx_eq(pt.x, 50.0));
        assert!(approx_eq(pt.y, 0.0));
    }

    #[test]
    fn nearest_point_clamps_to_endpoint() {
        let pl = Polyline::new(vec![Point2::new(0.0, 0.0), Point2::new(10.0, 0.0)]);
        let (pt, dist) = pl.nearest_point(Point2::new(-3.0, 4.0));
        assert!(approx_eq(pt.x, 0.0));
        assert!(approx_eq(dist, 5.0));
    }

    #[test]
    fn offset_straight_line_shifts_left() {
        let pl = Polyline::new(vec![
            Point2::new(0.0, 0.0),
            Point2::new(100.0, 0.0),
            Point2::new(200.0, 0.0),
        ]);
        let off = pl.offset(10.0);
        assert_eq!(off.points.len(), 3);
        for p in &off.points {
            assert!(approx_eq(p.y, 10.0));
        }
    }

    #[test]
    fn empty_polyline_is_defined() {
        let pl = Polyline::default();
        assert!(approx_eq(pl.length(), 0.0));
        let p = pl.point_at(0.5);
        assert!(approx_eq(p.x, 0.0) && approx_eq(p.y, 0.0));
    }
}
