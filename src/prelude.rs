//! # Haggis Signals Prelude
//!
//! Commonly used types in one import.
//!
//! ```rust
//! use haggis_signals::prelude::*;
//!
//! let mut scene = Scene::with_camera(OrbitCamera::new(50.0, 0.3, 0.0, Point3::new(0.0, 0.0, 0.0)));
//! let line = SignalLine::new(
//!     SignalLineOptions::curve(
//!         Point3::new(0.0, 0.0, 0.0),
//!         Point3::new(20.0, 10.0, 0.0),
//!         Point3::new(40.0, 0.0, 0.0),
//!     ),
//!     &mut scene,
//! );
//! assert!(line.is_ok());
//! ```

// Lines, signals and labels
pub use crate::driver::LineDriver;
pub use crate::label::{Anchor, AnchorMode, Label, LabelId, LabelOptions};
pub use crate::line::{LabelRef, LineState, SignalLine, SignalLineOptions};
pub use crate::path::{LineType, Path};
pub use crate::signal::{Direction, Signal, SignalId, SignalOptions};

// Errors
pub use crate::error::SignalLineError;

// Backend contract and the in-memory scene
pub use crate::gfx::backend::{
    Blending, DrawableBackend, DrawableHandle, LineMaterial, MarkerAppearance, TextOptions,
};
pub use crate::gfx::bounds::Aabb;
pub use crate::gfx::camera::OrbitCamera;
pub use crate::gfx::color::Color;
pub use crate::gfx::scene::Scene;

// Math types
pub use cgmath::{Point3, Rad, Vector3};
