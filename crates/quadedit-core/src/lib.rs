//! Core data model for quadedit.
//!
//! This crate provides the observable scene graph of a quad-surface editor and
//! its ray-based selection engine:
//! - [`ChangeNotifier`], the synchronous publish/subscribe primitive
//! - [`Vertex`], [`Face`] and [`Model`], which bubble changes upward
//! - [`geometry`] and [`pick`] for ray/face intersection and centroids
//! - [`Selection`] for the currently selected face
//!
//! Everything here is single-threaded: handles are `Rc`-based and every
//! notification is delivered before the mutating call returns.

// Documentation lints - internal functions don't need exhaustive panic/error docs
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
// Builder patterns return Self which doesn't need must_use
#![allow(clippy::must_use_candidate)]
// Coordinates are f32; counts and pixel sizes are converted freely
#![allow(clippy::cast_precision_loss)]

pub mod error;
pub mod face;
pub mod geometry;
pub mod model;
pub mod notifier;
pub mod options;
pub mod pick;
pub mod selection;
pub mod vertex;

pub use error::{QuadEditError, Result};
pub use face::{Face, FACE_VERTEX_COUNT};
pub use geometry::Ray;
pub use model::Model;
pub use notifier::{ChangeNotifier, Subscription, SubscriptionId, Suspension};
pub use options::{CoordinateMode, ExportScope, ExportSettings, Options};
pub use pick::PickHit;
pub use selection::Selection;
pub use vertex::{Axis, Vertex};

// Re-export glam types for convenience
pub use glam::{Mat4, UVec2, Vec2, Vec3};
