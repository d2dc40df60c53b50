use cgmath::{Point3, Vector3};

/// Largest pitch magnitude; keeps the eye off the poles
const MAX_PITCH: f32 = std::f32::consts::FRAC_PI_2 - 1e-3;

/// Camera orbiting a target point.
///
/// Only the eye position matters here: camera-facing labels turn toward it
/// on every update.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitCamera {
    pub distance: f32,
    pub pitch: f32,
    pub yaw: f32,
    pub target: Point3<f32>,
    /// Derived from the fields above; refreshed by every setter
    pub eye: Point3<f32>,
}

impl OrbitCamera {
    pub fn new(distance: f32, pitch: f32, yaw: f32, target: Point3<f32>) -> Self {
        let mut camera = Self {
            distance: distance.max(f32::EPSILON),
            pitch: pitch.clamp(-MAX_PITCH, MAX_PITCH),
            yaw,
            target,
            eye: target,
        };
        camera.update_eye();
        camera
    }

    pub fn add_yaw(&mut self, delta: f32) {
        self.yaw += delta;
        self.update_eye();
    }

    /// Tilt the camera; pitch stays short of straight up or down
    pub fn add_pitch(&mut self, delta: f32) {
        self.pitch = (self.pitch + delta).clamp(-MAX_PITCH, MAX_PITCH);
        self.update_eye();
    }

    pub fn set_distance(&mut self, distance: f32) {
        self.distance = distance.max(f32::EPSILON);
        self.update_eye();
    }

    pub fn set_target(&mut self, target: Point3<f32>) {
        self.target = target;
        self.update_eye();
    }

    // Y-up spherical coordinates; yaw 0 looks down -Z from +Z.
    fn update_eye(&mut self) {
        let (sin_pitch, cos_pitch) = self.pitch.sin_cos();
        let (sin_yaw, cos_yaw) = self.yaw.sin_cos();

        self.eye = self.target
            + Vector3::new(sin_yaw * cos_pitch, sin_pitch, cos_yaw * cos_pitch) * self.distance;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use cgmath::{EuclideanSpace, MetricSpace};

    #[test]
    fn test_eye_sits_at_distance_from_target() {
        let camera = OrbitCamera::new(10.0, 0.3, 1.1, Point3::new(1.0, 2.0, 3.0));
        assert_abs_diff_eq!(camera.eye.distance(camera.target), 10.0, epsilon = 1e-4);
    }

    #[test]
    fn test_zero_angles_look_down_z() {
        let camera = OrbitCamera::new(5.0, 0.0, 0.0, Point3::origin());
        assert_abs_diff_eq!(camera.eye.x, 0.0, epsilon = 1e-6);
        assert_abs_diff_eq!(camera.eye.y, 0.0, epsilon = 1e-6);
        assert_abs_diff_eq!(camera.eye.z, 5.0, epsilon = 1e-6);
    }

    #[test]
    fn test_pitch_is_clamped() {
        let mut camera = OrbitCamera::new(5.0, 0.0, 0.0, Point3::origin());
        camera.add_pitch(10.0);
        assert!(camera.pitch < std::f32::consts::FRAC_PI_2);
        assert!(camera.eye.y < 5.0);
    }

    #[test]
    fn test_setters_move_the_eye() {
        let mut camera = OrbitCamera::new(5.0, 0.0, 0.0, Point3::origin());
        camera.set_target(Point3::new(10.0, 0.0, 0.0));
        assert_abs_diff_eq!(camera.eye.x, 10.0, epsilon = 1e-6);

        camera.set_distance(2.0);
        assert_abs_diff_eq!(camera.eye.z, 2.0, epsilon = 1e-6);

        camera.add_yaw(std::f32::consts::FRAC_PI_2);
        assert_abs_diff_eq!(camera.eye.x, 12.0, epsilon = 1e-5);
    }
}
