//! # Labels
//!
//! A [`Label`] is a piece of text pinned to a signal line. Its anchor point and
//! rotation about Y are computed once from the path when the label is created.
//! Changing the text, font or size re-measures the rendered text and recentres
//! it vertically above the anchor; it never moves the label along the path.

use std::rc::Rc;

use cgmath::{InnerSpace, Point3, Rad, Vector3};

use crate::error::Result;
use crate::gfx::backend::{DrawableBackend, DrawableHandle, TextOptions};
use crate::path::{LineType, Path};

/// Identity of a label on its line; the id of its text drawable
pub type LabelId = DrawableHandle;

/// Where on the path a label is anchored
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AnchorMode {
    Start,
    #[default]
    Center,
    End,
}

/// Configuration for one label
#[derive(Debug, Clone, PartialEq)]
pub struct LabelOptions {
    pub text: TextOptions,
    pub anchor: AnchorMode,
    /// Gap between the anchor and the bottom of the text
    pub vertical_offset: f32,
    /// Extra rotation about Y added to the path-derived rotation
    pub rotation_offset: Option<Rad<f32>>,
    /// Turn toward the scene camera on every update
    pub face_camera: bool,
}

impl Default for LabelOptions {
    fn default() -> Self {
        Self {
            text: TextOptions::default(),
            anchor: AnchorMode::Center,
            vertical_offset: 2.0,
            rotation_offset: None,
            face_camera: false,
        }
    }
}

impl LabelOptions {
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text.text = text.into();
        self
    }

    pub fn with_text_options(mut self, text: TextOptions) -> Self {
        self.text = text;
        self
    }

    pub fn with_anchor(mut self, anchor: AnchorMode) -> Self {
        self.anchor = anchor;
        self
    }

    pub fn with_vertical_offset(mut self, offset: f32) -> Self {
        self.vertical_offset = offset;
        self
    }

    pub fn with_rotation_offset(mut self, offset: Rad<f32>) -> Self {
        self.rotation_offset = Some(offset);
        self
    }

    pub fn facing_camera(mut self) -> Self {
        self.face_camera = true;
        self
    }
}

/// Anchor point and rotation about Y derived from a path
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Anchor {
    pub point: Point3<f32>,
    pub rotation: Rad<f32>,
}

impl Anchor {
    /// Compute the anchor for `mode` on `path`.
    ///
    /// On curved lines the second tangent reference is always the last sampled
    /// point, whatever the mode.
    pub fn compute(path: &Path, line_type: LineType, mode: AnchorMode) -> Self {
        let points = path.points();
        let last = path.last();

        let (point, tangent_from, mut tangent_to) = match mode {
            AnchorMode::Start => (points[0], points[0], points[1]),
            AnchorMode::Center => {
                let bounds = path.bounding_box();
                let center = bounds.center();
                (Point3::new(center.x, bounds.max.y, center.z), center, last)
            }
            AnchorMode::End => (last, points[points.len() - 2], last),
        };

        // TODO: derive the curve tangent from the sampled neighbours of the anchor
        if line_type == LineType::Curve {
            tangent_to = last;
        }

        Self {
            point,
            rotation: tangent_rotation(tangent_to - tangent_from),
        }
    }
}

/// Angle between the X axis and a tangent, as a rotation about Y.
/// Degenerate tangents map to no rotation.
pub fn tangent_rotation(tangent: Vector3<f32>) -> Rad<f32> {
    if tangent.magnitude2() <= f32::EPSILON {
        return Rad(0.0);
    }

    let cos = Vector3::unit_x().dot(tangent.normalize());
    Rad(cos.clamp(-1.0, 1.0).acos())
}

/// Text anchored to a signal line
#[derive(Debug)]
pub struct Label {
    id: LabelId,
    handle: Option<DrawableHandle>,
    path: Rc<Path>,
    anchor: Anchor,
    anchor_mode: AnchorMode,
    vertical_offset: f32,
    rotation_offset: Option<Rad<f32>>,
    face_camera: bool,
    text: TextOptions,
    position: Point3<f32>,
    rotation: Rad<f32>,
}

impl Label {
    /// Create the label drawable and place it at its anchor.
    ///
    /// The drawable is created but not attached; the owning line parents it.
    pub fn new<B: DrawableBackend + ?Sized>(
        path: Rc<Path>,
        line_type: LineType,
        options: &LabelOptions,
        scene: &mut B,
    ) -> Result<Self> {
        let anchor = Anchor::compute(&path, line_type, options.anchor);
        let handle = scene.create_label_drawable(&options.text);

        let mut label = Self {
            id: handle,
            handle: Some(handle),
            path,
            anchor,
            anchor_mode: options.anchor,
            vertical_offset: options.vertical_offset,
            rotation_offset: options.rotation_offset,
            face_camera: options.face_camera,
            text: options.text.clone(),
            position: anchor.point,
            rotation: anchor.rotation,
        };

        if let Err(err) = label.recenter(scene) {
            label.dispose(scene);
            return Err(err);
        }

        Ok(label)
    }

    /// Place the text half its measured height above the anchor plus the
    /// vertical offset, and apply the rotation offset.
    pub fn recenter<B: DrawableBackend + ?Sized>(&mut self, scene: &mut B) -> Result<()> {
        let Some(handle) = self.handle else {
            return Ok(());
        };

        let half_height = scene.label_bounds(handle)?.size().y / 2.0;
        self.position = Point3::new(
            self.anchor.point.x,
            self.anchor.point.y + half_height + self.vertical_offset,
            self.anchor.point.z,
        );
        self.rotation = self.anchor.rotation + self.rotation_offset.unwrap_or(Rad(0.0));

        scene.set_transform(handle, self.position, self.rotation)
    }

    pub fn set_text<B: DrawableBackend + ?Sized>(&mut self, text: &str, scene: &mut B) -> Result<()> {
        if let Some(handle) = self.handle {
            scene.set_label_text(handle, text)?;
            self.text.text = text.to_string();
        }
        self.recenter(scene)
    }

    pub fn set_font<B: DrawableBackend + ?Sized>(&mut self, font: &str, scene: &mut B) -> Result<()> {
        if let Some(handle) = self.handle {
            scene.set_label_font(handle, font)?;
            self.text.font = Some(font.to_string());
        }
        self.recenter(scene)
    }

    pub fn set_size<B: DrawableBackend + ?Sized>(&mut self, size: f32, scene: &mut B) -> Result<()> {
        if let Some(handle) = self.handle {
            scene.set_label_size(handle, size)?;
            self.text.size = size;
        }
        self.recenter(scene)
    }

    /// Per-tick update: turn toward the camera when configured to
    pub fn update<B: DrawableBackend + ?Sized>(&mut self, scene: &mut B) -> Result<()> {
        if !self.face_camera {
            return Ok(());
        }

        match (self.handle, scene.camera_position()) {
            (Some(handle), Some(eye)) => scene.look_at(handle, eye),
            _ => Ok(()),
        }
    }

    /// Release the text drawable. Safe to call any number of times.
    pub fn dispose<B: DrawableBackend + ?Sized>(&mut self, scene: &mut B) {
        if let Some(handle) = self.handle.take() {
            scene.dispose_handle(handle);
        }
    }

    pub fn id(&self) -> LabelId {
        self.id
    }

    pub fn handle(&self) -> Option<DrawableHandle> {
        self.handle
    }

    pub fn anchor(&self) -> Anchor {
        self.anchor
    }

    pub fn anchor_mode(&self) -> AnchorMode {
        self.anchor_mode
    }

    /// Local position of the text drawable, relative to the line
    pub fn position(&self) -> Point3<f32> {
        self.position
    }

    /// Rotation about Y including the rotation offset
    pub fn rotation(&self) -> Rad<f32> {
        self.rotation
    }

    pub fn text(&self) -> &TextOptions {
        &self.text
    }

    pub fn faces_camera(&self) -> bool {
        self.face_camera
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
