//! quadedit: the editing core of a quad-face polyhedral modeler.
//!
//! A session is an [`Editor`]: one observable [`Model`] of four-vertex
//! [`Face`]s, the current [`Selection`] and the [`Options`] it runs with.
//! Views subscribe to whatever they display and are told synchronously about
//! every change, whether it comes from an edit of a single vertex coordinate
//! or from a whole-model translation.
//!
//! # Quick Start
//!
//! ```no_run
//! use quadedit::*;
//!
//! fn main() -> Result<()> {
//!     init_logging();
//!
//!     // A session seeded with the default cube
//!     let editor = Editor::default();
//!     let _redraw = editor.model().subscribe(|model| {
//!         println!("model changed, {} faces", model.len());
//!     });
//!
//!     // Pick the front face and lift one corner
//!     let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::NEG_Z);
//!     editor.pick(&ray);
//!     editor.set_selected_coordinate(2, Axis::Z, 1.5)?;
//!
//!     // Move everything and export
//!     editor.translate_all(Vec3::new(0.0, 2.0, 0.0));
//!     editor.export_json(&ExportSettings::default(), std::io::stdout())?;
//!
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! Changes bubble upward: a [`Vertex`] notifies its faces, a [`Face`]
//! notifies the model, and the [`Model`] notifies its subscribers. Bulk
//! edits go through [`Model::batch`], which mutes everything below the model
//! and publishes once at the end.
//!
//! - [`notifier`] - the publish/subscribe primitive and its guards
//! - [`geometry`] - ray/triangle and ray/face intersection, centroids
//! - [`pick`] - nearest-face picking and screen-space rays
//! - [`export`] - the export document
//! - [`scene`] - the default cube

// Documentation lints - internal functions don't need exhaustive panic/error docs
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
// Step counts and tolerances are small
#![allow(clippy::cast_precision_loss)]

mod editor;
pub mod export;
mod init;
pub mod scene;

pub use editor::Editor;
pub use export::{ExportDocument, EXPORT_MODEL_ID};
pub use init::{init_logging, init_logging_with_filter};

// Re-export core types
pub use quadedit_core::{
    error::{QuadEditError, Result},
    geometry, notifier, pick, Axis, ChangeNotifier, CoordinateMode, ExportScope, ExportSettings,
    Face, Mat4, Model, Options, PickHit, Ray, Selection, Subscription, SubscriptionId, Suspension,
    UVec2, Vec2, Vec3, Vertex, FACE_VERTEX_COUNT,
};
