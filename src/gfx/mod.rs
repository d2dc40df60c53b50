//! # Graphics Module
//!
//! The drawable side of signal lines: the backend contract lines draw through,
//! the value types passed across it, curve sampling, and an in-memory scene
//! graph implementing the contract.
//!
//! - **Backend** ([`backend`]) - [`DrawableBackend`] and drawable handles
//! - **Curves** ([`curve`]) - Catmull-Rom and cubic Bezier sampling
//! - **Camera** ([`camera`]) - Orbit camera labels can turn toward
//! - **Scene** ([`scene`]) - Object hierarchy backing [`DrawableBackend`]

pub mod backend;
pub mod bounds;
pub mod camera;
pub mod color;
pub mod curve;
pub mod scene;

// Re-export commonly used types
pub use backend::{DrawableBackend, DrawableHandle};
pub use camera::OrbitCamera;
pub use scene::Scene;
