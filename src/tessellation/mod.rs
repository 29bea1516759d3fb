mod delaunay;

use crate::math::clip::clip_to_half_plane;
use crate::math::{midpoint, perp, Point2, Polygon};

/// One cell of a bounded Voronoi diagram.
#[derive(Debug, Clone)]
pub struct VoronoiCell {
    /// Index into the original seed slice.
    pub seed_index: usize,
    /// The seed point.
    pub seed: Point2,
    /// The cell boundary, clipped to the bounding polygon.
    pub polygon: Polygon,
    /// Indices of Delaunay-adjacent seeds, sorted ascending.
    ///
    /// Adjacency is computed independently of the cell polygons and is an
    /// approximation for routing and path purposes; it is not guaranteed to
    /// coincide exactly with polygon edge sharing.
    pub neighbors: Vec<usize>,
}

/// Computes the Voronoi diagram of the given seeds, clipped to `bounds`.
///
/// Cell geometry comes from half-plane intersection against every
/// perpendicular bisector — O(n²), robust for the low seed counts this
/// solver works with. Neighbor detection runs a separate incremental
/// Delaunay triangulation (see [`VoronoiCell::neighbors`]).
///
/// Zero seeds yield an empty diagram; a single seed owns the entire bound
/// and has no neighbors.
#[must_use]
pub fn voronoi(seeds: &[Point2], bounds: &Polygon) -> Vec<VoronoiCell> {
    let n = seeds.len();
    if n == 0 {
        return Vec::new();
    }
    if n == 1 {
        return vec![VoronoiCell {
            seed_index: 0,
            seed: seeds[0],
            polygon: bounds.clone(),
            neighbors: Vec::new(),
        }];
    }

    let neighbors = delaunay::neighbors(seeds, bounds);

    (0..n)
        .map(|i| VoronoiCell {
            seed_index: i,
            seed: seeds[i],
            polygon: cell_by_half_planes(i, seeds, bounds),
            neighbors: neighbors[i].clone(),
        })
        .collect()
}

/// Computes one Voronoi cell by clipping the bound against the perpendicular
/// bisector of every other seed, keeping the side containing the seed.
fn cell_by_half_planes(seed_idx: usize, seeds: &[Point2], bounds: &Polygon) -> Polygon {
    let seed = seeds[seed_idx];
    let mut cell = bounds.clone();
    for (j, other) in seeds.iter().enumerate() {
        if j == seed_idx {
            continue;
        }
        let mid = midpoint(seed, *other);
        let dir = perp(*other - seed);
        cell = clip_to_half_plane(&cell, mid, mid + dir);
        if cell.is_empty() {
            break;
        }
    }
    cell
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::math::clip::approximate_circle;
    use crate::math::polar;
    use approx::assert_relative_eq;
    use std::f64::consts::PI;

    fn square40() -> Polygon {
        Polygon::new(vec![
            Point2::new(-20.0, -20.0),
            Point2::new(20.0, -20.0),
            Point2::new(20.0, 20.0),
            Point2::new(-20.0, 20.0),
        ])
    }

    #[test]
    fn zero_seeds_is_empty() {
        assert!(voronoi(&[], &square40()).is_empty());
    }

    #[test]
    fn single_seed_owns_the_bound() {
        let bounds = approximate_circle(Point2::origin(), 100.0, 64);
        let cells = voronoi(&[Point2::origin()], &bounds);
        assert_eq!(cells.len(), 1);
        assert_relative_eq!(cells[0].polygon.area(), bounds.area(), max_relative = 1e-9);
        assert!(cells[0].neighbors.is_empty());
    }

    #[test]
    fn two_seeds_split_a_square_in_half() {
        let seeds = [Point2::new(-5.0, 0.0), Point2::new(5.0, 0.0)];
        let cells = voronoi(&seeds, &square40());
        assert_eq!(cells.len(), 2);
        for cell in &cells {
            assert!((cell.polygon.area() - 800.0).abs() < 40.0);
            assert!(cell.polygon.contains(cell.seed));
        }
    }

    #[test]
    fn four_seeds_quarter_the_square() {
        let seeds = [
            Point2::new(-5.0, -5.0),
            Point2::new(5.0, -5.0),
            Point2::new(5.0, 5.0),
            Point2::new(-5.0, 5.0),
        ];
        let bounds = square40();
        let cells = voronoi(&seeds, &bounds);
        assert_eq!(cells.len(), 4);
        let quarter = bounds.area() / 4.0;
        for cell in &cells {
            assert_relative_eq!(cell.polygon.area(), quarter, max_relative = 0.1);
            assert!(cell.polygon.contains(cell.seed));
            assert!(cell.neighbors.len() >= 2, "cell has {} neighbors", cell.neighbors.len());
        }
    }

    #[test]
    fn cell_areas_sum_to_bound_area() {
        let seeds = [
            Point2::new(-8.0, 3.0),
            Point2::new(4.0, -11.0),
            Point2::new(12.0, 9.0),
            Point2::new(-2.0, 15.0),
            Point2::new(1.0, 1.0),
        ];
        let bounds = square40();
        let cells = voronoi(&seeds, &bounds);
        let total: f64 = cells.iter().map(|c| c.polygon.area()).sum();
        assert_relative_eq!(total, bounds.area(), max_relative = 0.1);
    }

    #[test]
    fn ring_anchored_city_seeds() {
        // 1 center seed + 2 at r=450 + 3 at r=750 inside a radius-900 bound.
        let mut seeds = vec![Point2::origin()];
        for i in 0..2 {
            seeds.push(polar(Point2::origin(), 450.0, f64::from(i) * PI));
        }
        for i in 0..3 {
            seeds.push(polar(Point2::origin(), 750.0, f64::from(i) * 2.0 * PI / 3.0));
        }
        let bounds = approximate_circle(Point2::origin(), 900.0, 128);
        let cells = voronoi(&seeds, &bounds);

        assert_eq!(cells.len(), 6);
        let mut total = 0.0;
        for cell in &cells {
            assert!(!cell.polygon.is_empty(), "cell {} is empty", cell.seed_index);
            assert!(cell.polygon.area() > 1000.0);
            total += cell.polygon.area();
        }
        assert_relative_eq!(total, bounds.area(), max_relative = 0.1);
    }

    #[test]
    fn voronoi_is_deterministic() {
        let seeds = [
            Point2::new(-8.0, 3.0),
            Point2::new(4.0, -11.0),
            Point2::new(12.0, 9.0),
        ];
        let bounds = square40();
        let a = voronoi(&seeds, &bounds);
        let b = voronoi(&seeds, &bounds);
        for (ca, cb) in a.iter().zip(&b) {
            assert_eq!(ca.polygon, cb.polygon);
            assert_eq!(ca.neighbors, cb.neighbors);
        }
    }
}
