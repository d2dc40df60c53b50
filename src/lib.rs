// src/lib.rs
//! Haggis Signals
//!
//! Animated signal lines for 3D scenes: polylines or curves that markers
//! travel along at a fixed speed, with text labels anchored to the line.
//!
//! The crate never owns a renderer. Every operation that touches a drawable
//! takes a [`DrawableBackend`](gfx::DrawableBackend); [`gfx::scene::Scene`]
//! is the in-memory implementation used headless and in tests.

pub mod driver;
pub mod error;
pub mod gfx;
pub mod label;
pub mod line;
pub mod path;
pub mod prelude;
pub mod signal;

// Re-export main types for convenience
pub use driver::LineDriver;
pub use error::{Result, SignalLineError};
pub use line::{SignalLine, SignalLineOptions};
