use std::collections::{BTreeSet, HashMap};

use crate::math::{Point2, Polygon};

/// Deterministic per-seed coordinate perturbation applied before
/// triangulation only. Breaks exact cocircularity (grid-aligned or
/// symmetric seed layouts) without altering reported cell geometry.
const JITTER: f64 = 1e-8;

/// Computes Delaunay adjacency over the seeds via incremental Bowyer-Watson.
///
/// `neighbors[i]` is the sorted list of seed indices sharing a Delaunay edge
/// with seed `i`. The triangulation starts from a synthetic super-triangle
/// built from the bound's bounding box scaled 4×; triangles touching the
/// super-triangle vertices are excluded from the final adjacency.
pub(crate) fn neighbors(seeds: &[Point2], bounds: &Polygon) -> Vec<Vec<usize>> {
    let n = seeds.len();
    if n < 2 {
        return vec![Vec::new(); n];
    }

    let mut all_pts: Vec<Point2> = seeds
        .iter()
        .enumerate()
        .map(|(i, s)| {
            #[allow(clippy::cast_precision_loss)]
            let eps = i as f64 * JITTER;
            Point2::new(s.x + eps, s.y + eps)
        })
        .collect();

    let (bb_min, bb_max) = bounds.bounding_box();
    let max_d = (bb_max.x - bb_min.x).max(bb_max.y - bb_min.y) * 4.0;
    all_pts.push(Point2::new(bb_min.x - max_d, bb_min.y - max_d));
    all_pts.push(Point2::new(bb_max.x + max_d, bb_min.y - max_d));
    all_pts.push(Point2::new((bb_min.x + bb_max.x) / 2.0, bb_max.y + max_d));

    let mut triangles: Vec<[usize; 3]> = vec![[n, n + 1, n + 2]];

    for pi in 0..n {
        let p = all_pts[pi];

        // Triangles whose circumcircle contains the new point are invalid.
        let bad: Vec<usize> = triangles
            .iter()
            .enumerate()
            .filter(|(_, t)| in_circumcircle(p, all_pts[t[0]], all_pts[t[1]], all_pts[t[2]]))
            .map(|(ti, _)| ti)
            .collect();

        // Cavity boundary edges appear in exactly one invalidated triangle.
        let mut edge_count: HashMap<(usize, usize), u32> = HashMap::new();
        for &ti in &bad {
            let t = triangles[ti];
            for k in 0..3 {
                *edge_count.entry(ordered(t[k], t[(k + 1) % 3])).or_insert(0) += 1;
            }
        }
        let mut boundary: Vec<(usize, usize)> = Vec::new();
        for &ti in &bad {
            let t = triangles[ti];
            for k in 0..3 {
                let (a, b) = (t[k], t[(k + 1) % 3]);
                if edge_count[&ordered(a, b)] == 1 {
                    boundary.push((a, b));
                }
            }
        }

        // Remove invalidated triangles (descending index, swap_remove safe).
        for &ti in bad.iter().rev() {
            triangles.swap_remove(ti);
        }
        for (a, b) in boundary {
            triangles.push([a, b, pi]);
        }
    }

    // Undirected edges among non-super-triangle vertices.
    let mut sets: Vec<BTreeSet<usize>> = vec![BTreeSet::new(); n];
    for t in &triangles {
        if t[0] >= n || t[1] >= n || t[2] >= n {
            continue;
        }
        for k in 0..3 {
            let (a, b) = (t[k], t[(k + 1) % 3]);
            sets[a].insert(b);
            sets[b].insert(a);
        }
    }
    sets.into_iter().map(|s| s.into_iter().collect()).collect()
}

fn ordered(a: usize, b: usize) -> (usize, usize) {
    if a > b {
        (b, a)
    } else {
        (a, b)
    }
}

/// Determinant test: true if `p` lies inside the circumcircle of `(a, b, c)`.
///
/// The sign flips with triangle orientation, so the determinant is negated
/// for clockwise triangles.
fn in_circumcircle(p: Point2, a: Point2, b: Point2, c: Point2) -> bool {
    let (ax, ay) = (a.x - p.x, a.y - p.y);
    let (bx, by) = (b.x - p.x, b.y - p.y);
    let (cx, cy) = (c.x - p.x, c.y - p.y);

    let det = ax * (by * (cx * cx + cy * cy) - cy * (bx * bx + by * by))
        - ay * (bx * (cx * cx + cy * cy) - cx * (bx * bx + by * by))
        + (ax * ax + ay * ay) * (bx * cy - cx * by);

    let orient = (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x);
    if orient < 0.0 {
        -det > 0.0
    } else {
        det > 0.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn unit_square_bounds() -> Polygon {
        Polygon::new(vec![
            Point2::new(-1.0, -1.0),
            Point2::new(1.0, -1.0),
            Point2::new(1.0, 1.0),
            Point2::new(-1.0, 1.0),
        ])
    }

    #[test]
    fn circumcircle_contains_center() {
        let a = Point2::new(0.0, 1.0);
        let b = Point2::new(-1.0, -1.0);
        let c = Point2::new(1.0, -1.0);
        assert!(in_circumcircle(Point2::new(0.0, 0.0), a, b, c));
        assert!(!in_circumcircle(Point2::new(5.0, 5.0), a, b, c));
    }

    #[test]
    fn circumcircle_handles_cw_orientation() {
        let a = Point2::new(0.0, 1.0);
        let b = Point2::new(1.0, -1.0);
        let c = Point2::new(-1.0, -1.0);
        assert!(in_circumcircle(Point2::new(0.0, 0.0), a, b, c));
    }

    #[test]
    fn fewer_than_two_seeds_have_no_neighbors() {
        assert!(neighbors(&[], &unit_square_bounds()).is_empty());
        let one = neighbors(&[Point2::origin()], &unit_square_bounds());
        assert_eq!(one.len(), 1);
        assert!(one[0].is_empty());
    }

    #[test]
    fn triangle_seeds_are_mutually_adjacent() {
        let ns = neighbors(
            &[
                Point2::new(-0.5, -0.3),
                Point2::new(0.5, -0.3),
                Point2::new(0.0, 0.5),
            ],
            &unit_square_bounds(),
        );
        assert_eq!(ns[0], vec![1, 2]);
        assert_eq!(ns[1], vec![0, 2]);
        assert_eq!(ns[2], vec![0, 1]);
    }

    #[test]
    fn collinear_grid_is_broken_by_jitter() {
        // Four exactly cocircular points (square corners) would be degenerate
        // without the deterministic perturbation.
        let seeds = [
            Point2::new(-1.0, -1.0),
            Point2::new(1.0, -1.0),
            Point2::new(1.0, 1.0),
            Point2::new(-1.0, 1.0),
        ];
        let bounds = Polygon::new(vec![
            Point2::new(-2.0, -2.0),
            Point2::new(2.0, -2.0),
            Point2::new(2.0, 2.0),
            Point2::new(-2.0, 2.0),
        ]);
        let ns = neighbors(&seeds, &bounds);
        for (i, adj) in ns.iter().enumerate() {
            assert!(adj.len() >= 2, "seed {i} has {} neighbors", adj.len());
            assert!(!adj.contains(&i));
        }
        // Symmetry.
        for (i, adj) in ns.iter().enumerate() {
            for &j in adj {
                assert!(ns[j].contains(&i), "adjacency not symmetric: {i} -> {j}");
            }
        }
    }
}
