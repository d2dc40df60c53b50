//! # Scene Module
//!
//! In-memory implementation of the [`DrawableBackend`](crate::gfx::backend::DrawableBackend)
//! contract. It keeps an object hierarchy with transforms, measures label text,
//! tracks the camera eye and logs every release, which is what headless drivers
//! and tests need to run signal lines without a GPU.
//!
//! ## Key Components
//!
//! - [`Scene`] - The scene container implementing the backend contract
//! - [`Object`] - One drawable with kind, transform and parent link
//! - [`DrawableKind`] - Line, marker or label payload
//!
//! ## Usage
//!
//! ```
//! use haggis_signals::gfx::scene::Scene;
//! use haggis_signals::line::{SignalLine, SignalLineOptions};
//! use cgmath::Point3;
//!
//! let mut scene = Scene::new();
//! let options = SignalLineOptions::default()
//!     .with_path(vec![Point3::new(0.0, 0.0, 0.0), Point3::new(10.0, 0.0, 0.0)]);
//! let line = SignalLine::new(options, &mut scene).unwrap();
//! assert_eq!(scene.get_statistics().line_count, 1);
//! # drop(line);
//! ```

pub mod object;
pub mod scene;

// Re-export main types
pub use object::{DrawableKind, Object};
pub use scene::{Scene, SceneStatistics};
