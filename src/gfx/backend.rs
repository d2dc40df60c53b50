//! # Drawable Backend Contract
//!
//! The signal line core never renders anything itself. It talks to a scene
//! through the [`DrawableBackend`] trait, creating opaque [`DrawableHandle`]s
//! for the line, its markers and its labels, and releasing them when the
//! logical entity that owns them goes away.
//!
//! [`Scene`](crate::gfx::scene::Scene) is the in-memory implementation shipped
//! with the crate. A GPU renderer implements the same trait on top of its own
//! scene graph.

use std::fmt;

use cgmath::{Point3, Rad};

use super::bounds::Aabb;
use super::color::Color;
use crate::error::Result;

/// Opaque reference to a renderable object owned by the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DrawableHandle(u64);

impl DrawableHandle {
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    pub const fn id(self) -> u64 {
        self.0
    }
}

impl fmt::Display for DrawableHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// How a drawable is composited over what is already in the frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Blending {
    #[default]
    Normal,
    Additive,
}

/// Appearance of the line drawable itself
#[derive(Debug, Clone, PartialEq)]
pub struct LineMaterial {
    pub color: Color,
    pub opacity: f32,
    pub blending: Blending,
    pub transparent: bool,
    pub depth_write: bool,
    pub line_width: f32,
}

impl Default for LineMaterial {
    fn default() -> Self {
        Self {
            color: Color::from_hex(0xffffff),
            opacity: 1.0,
            blending: Blending::Normal,
            transparent: true,
            depth_write: true,
            line_width: 2.0,
        }
    }
}

impl LineMaterial {
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity.clamp(0.0, 1.0);
        self
    }

    pub fn with_blending(mut self, blending: Blending) -> Self {
        self.blending = blending;
        self
    }

    pub fn with_line_width(mut self, line_width: f32) -> Self {
        self.line_width = line_width.max(0.0);
        self
    }
}

/// Appearance of a single travelling marker
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerAppearance {
    pub color: Color,
    pub size: f32,
    pub opacity: f32,
    /// Texture reference handed through to the backend untouched (path or data URI)
    pub texture: Option<String>,
}

/// Text content and styling of a label drawable
#[derive(Debug, Clone, PartialEq)]
pub struct TextOptions {
    pub text: String,
    pub color: Color,
    pub size: f32,
    pub font: Option<String>,
    /// Extruded text instead of a flat quad
    pub three_d: bool,
}

impl Default for TextOptions {
    fn default() -> Self {
        Self {
            text: "label".to_string(),
            color: Color::RED,
            size: 5.0,
            font: None,
            three_d: false,
        }
    }
}

/// Operations the signal line core needs from a scene graph.
///
/// Creation methods return a handle that is not yet visible; the caller
/// attaches it with [`add_to_scene`](Self::add_to_scene) or
/// [`add_child`](Self::add_child). Every handle is released exactly once
/// through [`dispose_handle`](Self::dispose_handle).
pub trait DrawableBackend {
    fn create_line_drawable(&mut self, points: &[Point3<f32>], material: &LineMaterial) -> DrawableHandle;

    fn create_marker_drawable(
        &mut self,
        position: Point3<f32>,
        appearance: &MarkerAppearance,
    ) -> DrawableHandle;

    fn create_label_drawable(&mut self, text: &TextOptions) -> DrawableHandle;

    fn add_to_scene(&mut self, handle: DrawableHandle);

    /// Attach `child` under `parent` so it inherits the parent's transform
    fn add_child(&mut self, parent: DrawableHandle, child: DrawableHandle);

    /// Release the drawable and every backend resource tied to it
    fn dispose_handle(&mut self, handle: DrawableHandle);

    fn set_marker_position(&mut self, handle: DrawableHandle, position: Point3<f32>) -> Result<()>;

    /// Place a drawable at `position` with a rotation about the Y axis
    fn set_transform(
        &mut self,
        handle: DrawableHandle,
        position: Point3<f32>,
        rotation_y: Rad<f32>,
    ) -> Result<()>;

    /// Measured bounds of a label's rendered text, in its local space
    fn label_bounds(&self, handle: DrawableHandle) -> Result<Aabb>;

    fn set_label_text(&mut self, handle: DrawableHandle, text: &str) -> Result<()>;

    fn set_label_font(&mut self, handle: DrawableHandle, font: &str) -> Result<()>;

    fn set_label_size(&mut self, handle: DrawableHandle, size: f32) -> Result<()>;

    /// Turn a drawable so that it faces `target`
    fn look_at(&mut self, handle: DrawableHandle, target: Point3<f32>) -> Result<()>;

    /// Eye position of the active camera, if the scene has one
    fn camera_position(&self) -> Option<Point3<f32>>;
}
