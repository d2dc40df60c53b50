//! # Line Paths
//!
//! A [`Path`] is the immutable, ordered point sequence a signal line is drawn
//! through and signals travel along. Curved lines are expanded from their
//! three control points before the path is finalised, so everything
//! downstream only ever sees sampled points.

use cgmath::{MetricSpace, Point3};

use crate::error::{Result, SignalLineError};
use crate::gfx::bounds::Aabb;
use crate::gfx::curve;

/// How the configured points are turned into a path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineType {
    /// Points are used as given
    #[default]
    Normal,
    /// Exactly three control points (start, middle, end) expanded into a smooth curve
    Curve,
}

/// Ordered, immutable sequence of at least two points
#[derive(Debug, Clone, PartialEq)]
pub struct Path {
    points: Vec<Point3<f32>>,
}

impl Path {
    /// Straight polyline through `points`
    pub fn new(points: Vec<Point3<f32>>) -> Result<Self> {
        if points.len() < 2 {
            return Err(SignalLineError::invalid_path(format!(
                "a line needs at least 2 points, got {}",
                points.len()
            )));
        }

        Ok(Self { points })
    }

    /// Smooth curve sampled from exactly three control points
    pub fn curve(control_points: &[Point3<f32>]) -> Result<Self> {
        let controls: &[Point3<f32>; 3] = control_points.try_into().map_err(|_| {
            SignalLineError::invalid_path(format!(
                "a curve needs exactly 3 points (start, middle, end), got {}",
                control_points.len()
            ))
        })?;

        Self::new(curve::expand_control_points(controls))
    }

    pub fn from_line_type(points: Vec<Point3<f32>>, line_type: LineType) -> Result<Self> {
        match line_type {
            LineType::Normal => Self::new(points),
            LineType::Curve => {
                // The two-point rule is checked first so both modes reject short paths alike.
                if points.len() < 2 {
                    return Self::new(points);
                }
                Self::curve(&points)
            }
        }
    }

    pub fn points(&self) -> &[Point3<f32>] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always false; kept for API symmetry with `len`
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn point(&self, index: usize) -> Option<Point3<f32>> {
        self.points.get(index).copied()
    }

    pub fn first(&self) -> Point3<f32> {
        self.points[0]
    }

    pub fn last(&self) -> Point3<f32> {
        self.points[self.points.len() - 1]
    }

    pub fn segment_count(&self) -> usize {
        self.points.len() - 1
    }

    /// Length of the segment from `points[index]` to `points[index + 1]`
    ///
    /// # Panics
    /// If `index` is not in `0..segment_count()`.
    pub fn segment_length(&self, index: usize) -> f32 {
        self.points[index].distance(self.points[index + 1])
    }

    /// Sum of all segment lengths
    pub fn total_length(&self) -> f32 {
        self.points
            .windows(2)
            .map(|pair| pair[0].distance(pair[1]))
            .sum()
    }

    pub fn bounding_box(&self) -> Aabb {
        // A path is never empty, the fallback only satisfies the type.
        Aabb::from_points(&self.points).unwrap_or_else(|| Aabb::new(self.first(), self.first()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::curve::CURVE_DIVISIONS;

    fn p(x: f32, y: f32, z: f32) -> Point3<f32> {
        Point3::new(x, y, z)
    }

    #[test]
    fn test_rejects_single_point() {
        let err = Path::new(vec![p(0.0, 0.0, 0.0)]).unwrap_err();
        assert!(matches!(err, SignalLineError::InvalidPath { .. }));
    }

    #[test]
    fn test_segment_and_total_length() {
        let path = Path::new(vec![p(0.0, 0.0, 0.0), p(3.0, 4.0, 0.0), p(3.0, 4.0, 10.0)]).unwrap();

        assert_eq!(path.len(), 3);
        assert_eq!(path.segment_count(), 2);
        assert_eq!(path.segment_length(0), 5.0);
        assert_eq!(path.segment_length(1), 10.0);
        assert_eq!(path.total_length(), 15.0);
    }

    #[test]
    fn test_curve_requires_three_points() {
        let four = vec![p(0.0, 0.0, 0.0), p(1.0, 1.0, 0.0), p(2.0, 1.0, 0.0), p(3.0, 0.0, 0.0)];
        assert!(matches!(
            Path::from_line_type(four, LineType::Curve),
            Err(SignalLineError::InvalidPath { .. })
        ));

        let two = vec![p(0.0, 0.0, 0.0), p(1.0, 1.0, 0.0)];
        assert!(Path::curve(&two).is_err());
    }

    #[test]
    fn test_curve_is_expanded() {
        let path = Path::from_line_type(
            vec![p(0.0, 0.0, 0.0), p(5.0, 5.0, 0.0), p(10.0, 0.0, 0.0)],
            LineType::Curve,
        )
        .unwrap();

        assert_eq!(path.len(), CURVE_DIVISIONS + 1);
        assert!(path.total_length() > 10.0);
    }

    #[test]
    fn test_bounding_box() {
        let path = Path::new(vec![p(-1.0, 2.0, 0.0), p(3.0, -2.0, 4.0)]).unwrap();
        let bounds = path.bounding_box();

        assert_eq!(bounds.min, p(-1.0, -2.0, 0.0));
        assert_eq!(bounds.max, p(3.0, 2.0, 4.0));
    }
}
