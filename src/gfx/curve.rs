//! # Curve Sampling
//!
//! Expands the three control points of a curved signal line into an ordered
//! polyline. The control points are first threaded with a centripetal
//! Catmull-Rom spline, sampled at [`CONTROL_DIVISIONS`] divisions; the four
//! resulting points are the control polygon of a cubic Bezier which is then
//! sampled at [`CURVE_DIVISIONS`] divisions.
//!
//! The traversal engine and the labels only ever see the sampled points.

use cgmath::{EuclideanSpace, MetricSpace, Point3, Vector3};

/// Catmull-Rom divisions; yields the four Bezier control points
pub const CONTROL_DIVISIONS: usize = 3;

/// Bezier divisions; a curved line has `CURVE_DIVISIONS + 1` points
pub const CURVE_DIVISIONS: usize = 50;

/// Knot spacings below this are treated as coincident points
const MIN_KNOT_SPACING: f32 = 1e-4;

/// Centripetal Catmull-Rom spline through an open sequence of points
#[derive(Debug, Clone)]
pub struct CatmullRomCurve<'a> {
    points: &'a [Point3<f32>],
}

impl<'a> CatmullRomCurve<'a> {
    /// `points` must hold at least two points
    pub fn new(points: &'a [Point3<f32>]) -> Self {
        debug_assert!(points.len() >= 2, "a Catmull-Rom curve needs two points");
        Self { points }
    }

    /// Point at global parameter `t` in `[0, 1]`
    pub fn point_at(&self, t: f32) -> Point3<f32> {
        let points = self.points;
        let count = points.len();

        let p = (count - 1) as f32 * t.clamp(0.0, 1.0);
        let mut segment = p.floor() as usize;
        let mut weight = p - segment as f32;

        if segment >= count - 1 {
            segment = count - 2;
            weight = 1.0;
        }

        let p1 = points[segment];
        let p2 = points[segment + 1];

        // Open ends are extended by mirroring the neighbouring point.
        let p0 = if segment > 0 {
            points[segment - 1]
        } else {
            p1 + (p1 - p2)
        };
        let p3 = if segment + 2 < count {
            points[segment + 2]
        } else {
            p2 + (p2 - p1)
        };

        let mut dt1 = p1.distance2(p2).powf(0.25);
        if dt1 < MIN_KNOT_SPACING {
            dt1 = 1.0;
        }
        let mut dt0 = p0.distance2(p1).powf(0.25);
        if dt0 < MIN_KNOT_SPACING {
            dt0 = dt1;
        }
        let mut dt2 = p2.distance2(p3).powf(0.25);
        if dt2 < MIN_KNOT_SPACING {
            dt2 = dt1;
        }

        let axis = |x0: f32, x1: f32, x2: f32, x3: f32| {
            CubicPoly::nonuniform_catmull_rom(x0, x1, x2, x3, dt0, dt1, dt2).eval(weight)
        };

        Point3::new(
            axis(p0.x, p1.x, p2.x, p3.x),
            axis(p0.y, p1.y, p2.y, p3.y),
            axis(p0.z, p1.z, p2.z, p3.z),
        )
    }

    /// `divisions + 1` points evenly spaced in parameter
    pub fn sample(&self, divisions: usize) -> Vec<Point3<f32>> {
        sample_parametric(divisions, |t| self.point_at(t))
    }
}

/// Cubic Bezier curve defined by four control points
#[derive(Debug, Clone, Copy)]
pub struct CubicBezierCurve {
    pub controls: [Point3<f32>; 4],
}

impl CubicBezierCurve {
    pub fn new(controls: [Point3<f32>; 4]) -> Self {
        Self { controls }
    }

    pub fn point_at(&self, t: f32) -> Point3<f32> {
        let t = t.clamp(0.0, 1.0);
        let k = 1.0 - t;
        let [p0, p1, p2, p3] = self.controls;

        let v: Vector3<f32> = p0.to_vec() * (k * k * k)
            + p1.to_vec() * (3.0 * k * k * t)
            + p2.to_vec() * (3.0 * k * t * t)
            + p3.to_vec() * (t * t * t);

        Point3::from_vec(v)
    }

    pub fn sample(&self, divisions: usize) -> Vec<Point3<f32>> {
        sample_parametric(divisions, |t| self.point_at(t))
    }
}

/// Expand three control points (start, middle, end) into the sampled
/// polyline of a curved signal line.
pub fn expand_control_points(controls: &[Point3<f32>; 3]) -> Vec<Point3<f32>> {
    let through = CatmullRomCurve::new(controls).sample(CONTROL_DIVISIONS);
    let bezier = CubicBezierCurve::new([through[0], through[1], through[2], through[3]]);

    bezier.sample(CURVE_DIVISIONS)
}

fn sample_parametric(divisions: usize, point_at: impl Fn(f32) -> Point3<f32>) -> Vec<Point3<f32>> {
    let divisions = divisions.max(1);
    (0..=divisions)
        .map(|d| point_at(d as f32 / divisions as f32))
        .collect()
}

/// Hermite cubic `c0 + c1 t + c2 t^2 + c3 t^3` on one axis
#[derive(Debug, Clone, Copy)]
struct CubicPoly {
    c0: f32,
    c1: f32,
    c2: f32,
    c3: f32,
}

impl CubicPoly {
    fn hermite(x0: f32, x1: f32, t0: f32, t1: f32) -> Self {
        Self {
            c0: x0,
            c1: t0,
            c2: -3.0 * x0 + 3.0 * x1 - 2.0 * t0 - t1,
            c3: 2.0 * x0 - 2.0 * x1 + t0 + t1,
        }
    }

    fn nonuniform_catmull_rom(
        x0: f32,
        x1: f32,
        x2: f32,
        x3: f32,
        dt0: f32,
        dt1: f32,
        dt2: f32,
    ) -> Self {
        // tangents over the knot intervals, rescaled to [0, 1] on [x1, x2]
        let t1 = ((x1 - x0) / dt0 - (x2 - x0) / (dt0 + dt1) + (x2 - x1) / dt1) * dt1;
        let t2 = ((x2 - x1) / dt1 - (x3 - x1) / (dt1 + dt2) + (x3 - x2) / dt2) * dt1;

        Self::hermite(x1, x2, t1, t2)
    }

    fn eval(&self, t: f32) -> f32 {
        let t2 = t * t;
        self.c0 + self.c1 * t + self.c2 * t2 + self.c3 * t2 * t
    }
}
