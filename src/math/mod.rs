pub mod clip;
pub mod polygon;
pub mod polyline;
pub mod spline;

pub use polygon::Polygon;
pub use polyline::Polyline;

/// 2D plan-coordinate point.
///
/// Plan coordinates are the scene's XZ plane: a plan point's `y` component
/// is the scene `z` axis (the scene itself is y-up). All solver geometry
/// lives in this plane; only routed segments carry a third coordinate.
pub type Point2 = nalgebra::Point2<f64>;

/// 3D point type for routed segment endpoints (y = depth below grade).
pub type Point3 = nalgebra::Point3<f64>;

/// 2D vector type.
pub type Vector2 = nalgebra::Vector2<f64>;

/// Global geometric tolerance for floating-point comparisons, in meters.
pub const TOLERANCE: f64 = 0.01;

/// Tolerance for comparisons in normalized parameter space `[0, 1]`.
pub const PARAM_EPSILON: f64 = 1e-3;

/// Returns true if `a` and `b` differ by less than [`TOLERANCE`].
#[must_use]
pub fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < TOLERANCE
}

/// Returns true if `x` is within [`TOLERANCE`] of zero.
#[must_use]
pub fn approx_zero(x: f64) -> bool {
    x.abs() < TOLERANCE
}

/// Returns the point at the given polar coordinates around `center`.
#[must_use]
pub fn polar(center: Point2, radius: f64, angle: f64) -> Point2 {
    Point2::new(
        center.x + radius * angle.cos(),
        center.y + radius * angle.sin(),
    )
}

/// Returns the vector rotated 90° counter-clockwise.
#[must_use]
pub fn perp(v: Vector2) -> Vector2 {
    Vector2::new(-v.y, v.x)
}

/// Linear interpolation between `p` and `q` at `t` in `[0, 1]`.
#[must_use]
pub fn lerp(p: Point2, q: Point2, t: f64) -> Point2 {
    p + (q - p) * t
}

/// Returns the midpoint between `p` and `q`.
#[must_use]
pub fn midpoint(p: Point2, q: Point2) -> Point2 {
    lerp(p, q, 0.5)
}

/// Returns `p` rotated by `angle` radians around the origin.
#[must_use]
pub fn rotate(p: Point2, angle: f64) -> Point2 {
    let (s, c) = angle.sin_cos();
    Point2::new(p.x * c - p.y * s, p.x * s + p.y * c)
}
