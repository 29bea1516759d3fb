use super::{lerp, Point2, Polyline};

/// Evaluates an open Catmull-Rom spline through the given control points.
///
/// The curve passes exactly through every control point. Missing neighbors
/// at the open ends are supplied by reflecting the adjacent segment
/// (phantom points). `samples_per_segment` intermediate points are generated
/// per control-point pair; `tension` of 0.5 gives the standard centripetal
/// spline, 0.0 the uniform one.
///
/// Degenerate inputs are defined: one control point yields a single-point
/// polyline, two yield a straight linear interpolation.
#[must_use]
pub fn catmull_rom(control: &[Point2], samples_per_segment: usize, tension: f64) -> Polyline {
    let n = control.len();
    if n == 0 {
        return Polyline::default();
    }
    if n == 1 {
        return Polyline::new(vec![control[0]]);
    }
    let samples = samples_per_segment.max(1);
    if n == 2 {
        let mut pts = Vec::with_capacity(samples + 1);
        for i in 0..=samples {
            #[allow(clippy::cast_precision_loss)]
            let t = i as f64 / samples as f64;
            pts.push(lerp(control[0], control[1], t));
        }
        return Polyline::new(pts);
    }

    // Extended control array with reflected phantom endpoints.
    let mut extended = Vec::with_capacity(n + 2);
    extended.push(control[0] + (control[0] - control[1]));
    extended.extend_from_slice(control);
    extended.push(control[n - 1] + (control[n - 1] - control[n - 2]));

    let mut pts = Vec::with_capacity((n - 1) * samples + 1);
    for i in 1..n {
        let p0 = extended[i - 1];
        let p1 = extended[i];
        let p2 = extended[i + 1];
        let p3 = extended[i + 2];
        for j in 0..samples {
            #[allow(clippy::cast_precision_loss)]
            let t = j as f64 / samples as f64;
            pts.push(catmull_rom_point(p0, p1, p2, p3, t, tension));
        }
    }
    pts.push(control[n - 1]);

    Polyline::new(pts)
}

/// Evaluates a closed Catmull-Rom loop through the given control points.
///
/// Neighbors wrap cyclically, and the sampled polyline ends on a copy of
/// its first point. Fewer than 3 control points fall back to the open form.
#[must_use]
pub fn catmull_rom_closed(control: &[Point2], samples_per_segment: usize, tension: f64) -> Polyline {
    let n = control.len();
    if n < 3 {
        return catmull_rom(control, samples_per_segment, tension);
    }
    let samples = samples_per_segment.max(1);

    let mut pts = Vec::with_capacity(n * samples + 1);
    for i in 0..n {
        let p0 = control[(i + n - 1) % n];
        let p1 = control[i];
        let p2 = control[(i + 1) % n];
        let p3 = control[(i + 2) % n];
        for j in 0..samples {
            #[allow(clippy::cast_precision_loss)]
            let t = j as f64 / samples as f64;
            pts.push(catmull_rom_point(p0, p1, p2, p3, t, tension));
        }
    }
    // Close the loop.
    pts.push(pts[0]);

    Polyline::new(pts)
}

/// Evaluates a single point on a Catmull-Rom segment from `p1` to `p2`.
fn catmull_rom_point(p0: Point2, p1: Point2, p2: Point2, p3: Point2, t: f64, tension: f64) -> Point2 {
    let t2 = t * t;
    let t3 = t2 * t;
    let s = tension;

    let eval = |c0: f64, c1: f64, c2: f64, c3: f64| -> f64 {
        0.5 * ((-s * c0 + (2.0 - s) * c1 + (s - 2.0) * c2 + s * c3) * t3
            + (2.0 * s * c0 + (s - 3.0) * c1 + (3.0 - 2.0 * s) * c2 - s * c3) * t2
            + (-s * c0 + s * c2) * t
            + 2.0 * c1)
    };

    Point2::new(eval(p0.x, p1.x, p2.x, p3.x), eval(p0.y, p1.y, p2.y, p3.y))
}
