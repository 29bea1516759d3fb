use serde::Serialize;

use super::{approx_zero, Point2, Vector2};

/// A closed polygon defined by its vertices in order.
///
/// The closing edge from the last vertex back to the first is implicit.
/// Winding is significant: counter-clockwise polygons have positive signed
/// area, and the clipping routines rely on the sign.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Polygon {
    pub vertices: Vec<Point2>,
}

impl Polygon {
    /// Creates a polygon from a list of vertices.
    #[must_use]
    pub fn new(vertices: Vec<Point2>) -> Self {
        Self { vertices }
    }

    /// Returns the number of vertices.
    #[must_use]
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    /// Returns true if the polygon has fewer than 3 vertices.
    ///
    /// Degenerate polygons are the defined "empty" result of clipping; every
    /// caller checks this before using the geometry.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vertices.len() < 3
    }

    /// Returns the i-th edge as `(start, end)`, wrapping around.
    #[must_use]
    pub fn edge(&self, i: usize) -> (Point2, Point2) {
        let n = self.vertices.len();
        (self.vertices[i % n], self.vertices[(i + 1) % n])
    }

    /// Returns the signed area via the shoelace formula.
    ///
    /// Positive for counter-clockwise winding, negative for clockwise.
    #[must_use]
    pub fn signed_area(&self) -> f64 {
        let n = self.vertices.len();
        if n < 3 {
            return 0.0;
        }
        let mut area = 0.0;
        for i in 0..n {
            let j = (i + 1) % n;
            area += self.vertices[i].x * self.vertices[j].y;
            area -= self.vertices[j].x * self.vertices[i].y;
        }
        area / 2.0
    }

    /// Returns the unsigned area of the polygon.
    #[must_use]
    pub fn area(&self) -> f64 {
        self.signed_area().abs()
    }

    /// Returns true if vertices are in counter-clockwise order.
    #[must_use]
    pub fn is_ccw(&self) -> bool {
        self.signed_area() > 0.0
    }

    /// Returns the polygon with vertices in counter-clockwise order.
    #[must_use]
    pub fn ensure_ccw(&self) -> Self {
        if self.signed_area() < 0.0 {
            self.reverse()
        } else {
            self.clone()
        }
    }

    /// Returns the polygon with reversed vertex order.
    #[must_use]
    pub fn reverse(&self) -> Self {
        let mut rev = self.vertices.clone();
        rev.reverse();
        Self { vertices: rev }
    }

    /// Returns the centroid of the polygon.
    ///
    /// Falls back to the vertex average when the signed area is near zero,
    /// which avoids the division in the area-weighted formula.
    #[must_use]
    pub fn centroid(&self) -> Point2 {
        let n = self.vertices.len();
        if n == 0 {
            return Point2::origin();
        }
        let a = self.signed_area();
        if n < 3 || approx_zero(a) {
            let sum: Vector2 = self.vertices.iter().map(|v| v.coords).sum();
            #[allow(clippy::cast_precision_loss)]
            return Point2::from(sum / n as f64);
        }
        let mut cx = 0.0;
        let mut cy = 0.0;
        for i in 0..n {
            let j = (i + 1) % n;
            let cross = self.vertices[i].x * self.vertices[j].y
                - self.vertices[j].x * self.vertices[i].y;
            cx += (self.vertices[i].x + self.vertices[j].x) * cross;
            cy += (self.vertices[i].y + self.vertices[j].y) * cross;
        }
        let f = 1.0 / (6.0 * a);
        Point2::new(cx * f, cy * f)
    }

    /// Returns the axis-aligned bounding box as `(min, max)`.
    #[must_use]
    pub fn bounding_box(&self) -> (Point2, Point2) {
        let Some(first) = self.vertices.first() else {
            return (Point2::origin(), Point2::origin());
        };
        let mut min = *first;
        let mut max = *first;
        for v in &self.vertices[1..] {
            min.x = min.x.min(v.x);
            min.y = min.y.min(v.y);
            max.x = max.x.max(v.x);
            max.y = max.y.max(v.y);
        }
        (min, max)
    }

    /// Returns true if the point is inside the polygon, by ray-casting parity.
    ///
    /// Points exactly on the boundary are not guaranteed either way; callers
    /// only ever test interior representative points (centroids).
    #[must_use]
    pub fn contains(&self, pt: Point2) -> bool {
        let n = self.vertices.len();
        if n < 3 {
            return false;
        }
        let mut inside = false;
        let mut j = n - 1;
        for i in 0..n {
            let vi = self.vertices[i];
            let vj = self.vertices[j];
            if (vi.y > pt.y) != (vj.y > pt.y)
                && pt.x < (vj.x - vi.x) * (pt.y - vi.y) / (vj.y - vi.y) + vi.x
            {
                inside = !inside;
            }
            j = i;
        }
        inside
    }

    /// Returns the total perimeter length.
    #[must_use]
    pub fn perimeter(&self) -> f64 {
        let n = self.vertices.len();
        if n < 2 {
            return 0.0;
        }
        (0..n)
            .map(|i| {
                let j = (i + 1) % n;
                nalgebra::distance(&self.vertices[i], &self.vertices[j])
            })
            .sum()
    }

    /// Returns the maximum distance from any vertex to the given point.
    #[must_use]
    pub fn max_distance_to(&self, pt: Point2) -> f64 {
        self.vertices
            .iter()
            .map(|v| nalgebra::distance(v, &pt))
            .fold(0.0, f64::max)
    }
}
