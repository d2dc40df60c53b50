use cgmath::{
    EuclideanSpace, InnerSpace, Matrix4, Point3, Quaternion, Rad, Rotation, Rotation3, Vector3,
};

use crate::gfx::backend::{DrawableHandle, LineMaterial, MarkerAppearance, TextOptions};

/// Width of one glyph relative to the font size, used to measure text
pub const GLYPH_ASPECT: f32 = 0.6;

/// Depth of extruded text relative to the font size
pub const EXTRUSION_RATIO: f32 = 0.2;

/// What a scene object draws
#[derive(Debug, Clone, PartialEq)]
pub enum DrawableKind {
    Line {
        points: Vec<Point3<f32>>,
        material: LineMaterial,
    },
    Marker {
        appearance: MarkerAppearance,
    },
    Label {
        text: TextOptions,
    },
}

impl DrawableKind {
    pub fn type_name(&self) -> &'static str {
        match self {
            DrawableKind::Line { .. } => "line",
            DrawableKind::Marker { .. } => "marker",
            DrawableKind::Label { .. } => "label",
        }
    }
}

/// One drawable held by the in-memory [`Scene`](super::Scene)
#[derive(Debug, Clone)]
pub struct Object {
    pub name: String,
    pub kind: DrawableKind,
    pub position: Point3<f32>,
    pub rotation: Quaternion<f32>,
    pub scale: f32,
    pub parent: Option<DrawableHandle>,
    /// Whether the object is attached to the scene root
    pub in_scene: bool,
    pub visible: bool,
}

impl Object {
    /// Create a new Object at the origin with identity rotation
    pub fn new(name: impl Into<String>, kind: DrawableKind) -> Self {
        Self {
            name: name.into(),
            kind,
            position: Point3::origin(),
            rotation: Quaternion::new(1.0, 0.0, 0.0, 0.0),
            scale: 1.0,
            parent: None,
            in_scene: false,
            visible: true,
        }
    }

    /// Set translation
    pub fn set_translation(&mut self, translation: Point3<f32>) {
        self.position = translation;
    }

    /// Set rotation around Y axis
    pub fn set_rotation_y(&mut self, angle: Rad<f32>) {
        self.rotation = Quaternion::from_angle_y(angle);
    }

    /// Apply rotation around Y axis
    pub fn rotate_y(&mut self, angle: Rad<f32>) {
        self.rotation = self.rotation * Quaternion::from_angle_y(angle);
    }

    /// Set translation and rotation about Y in one go
    pub fn set_transform_ty(&mut self, translation: Point3<f32>, rotation_y: Rad<f32>) {
        self.set_translation(translation);
        self.set_rotation_y(rotation_y);
    }

    /// Turn the object so its local +Z axis points at `target`.
    ///
    /// `target` is in the same space as `self.position`. A target on top of
    /// the object leaves the rotation untouched.
    pub fn look_at(&mut self, target: Point3<f32>) {
        let dir = target - self.position;
        if dir.magnitude2() <= f32::EPSILON {
            return;
        }

        let yaw = dir.x.atan2(dir.z);
        let pitch = -dir.y.atan2((dir.x * dir.x + dir.z * dir.z).sqrt());
        self.rotation = Quaternion::from_angle_y(Rad(yaw)) * Quaternion::from_angle_x(Rad(pitch));
    }

    /// Direction the object's local +Z axis points to
    pub fn forward(&self) -> Vector3<f32> {
        self.rotation.rotate_vector(Vector3::unit_z())
    }

    /// Rotation about Y of the forward axis
    pub fn yaw(&self) -> Rad<f32> {
        let forward = self.forward();
        Rad(forward.x.atan2(forward.z))
    }

    /// Local transform: T * R * S
    pub fn local_transform(&self) -> Matrix4<f32> {
        let t = Matrix4::from_translation(self.position.to_vec());
        let r = Matrix4::from(self.rotation);
        let s = Matrix4::from_scale(self.scale);
        t * r * s // Order matters: T * R * S
    }

    /// Size of the measured text, or `None` when this is not a label
    pub fn text_extent(&self) -> Option<Vector3<f32>> {
        let DrawableKind::Label { text } = &self.kind else {
            return None;
        };

        let lines = text.text.lines().count().max(1);
        let columns = text
            .text
            .lines()
            .map(|line| line.chars().count())
            .max()
            .unwrap_or(0);
        let depth = if text.three_d {
            text.size * EXTRUSION_RATIO
        } else {
            0.0
        };

        Some(Vector3::new(
            columns as f32 * text.size * GLYPH_ASPECT,
            lines as f32 * text.size,
            depth,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn label(text: &str, size: f32) -> Object {
        Object::new(
            "label",
            DrawableKind::Label {
                text: TextOptions {
                    text: text.to_string(),
                    size,
                    ..Default::default()
                },
            },
        )
    }

    #[test]
    fn test_look_at_points_forward_axis_at_target() {
        let mut object = label("a", 1.0);
        object.set_translation(Point3::new(1.0, 0.0, 1.0));
        object.look_at(Point3::new(4.0, 4.0, 1.0));

        let forward = object.forward();
        assert_abs_diff_eq!(forward.x, 0.6, epsilon = 1e-5);
        assert_abs_diff_eq!(forward.y, 0.8, epsilon = 1e-5);
        assert_abs_diff_eq!(forward.z, 0.0, epsilon = 1e-5);
    }

    #[test]
    fn test_set_rotation_y_is_reported_as_yaw() {
        let mut object = label("a", 1.0);
        object.set_rotation_y(Rad(0.75));
        assert_abs_diff_eq!(object.yaw().0, 0.75, epsilon = 1e-5);
    }

    #[test]
    fn test_text_extent_grows_with_size_and_lines() {
        let single = label("abcd", 2.0).text_extent().unwrap();
        assert_abs_diff_eq!(single.x, 4.0 * 2.0 * GLYPH_ASPECT);
        assert_abs_diff_eq!(single.y, 2.0);

        let double = label("ab\nabcdef", 2.0).text_extent().unwrap();
        assert_abs_diff_eq!(double.x, 6.0 * 2.0 * GLYPH_ASPECT);
        assert_abs_diff_eq!(double.y, 4.0);
    }

    #[test]
    fn test_markers_have_no_text_extent() {
        let marker = Object::new(
            "marker",
            DrawableKind::Marker {
                appearance: MarkerAppearance {
                    color: Default::default(),
                    size: 1.0,
                    opacity: 1.0,
                    texture: None,
                },
            },
        );
        assert!(marker.text_extent().is_none());
    }
}
