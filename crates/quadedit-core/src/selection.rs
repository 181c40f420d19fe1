//! The current face selection.

use std::cell::RefCell;

use crate::face::Face;
use crate::notifier::{ChangeNotifier, Subscription};

/// Holds at most one selected face and announces changes to it.
///
/// The selection does not own the face in any meaningful sense; it is a
/// back-reference that renderers and editors can watch.
#[derive(Debug, Default)]
pub struct Selection {
    selected: RefCell<Option<Face>>,
    changed: ChangeNotifier<Option<Face>>,
}

impl Selection {
    /// Creates an empty selection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the selected face, if any.
    #[must_use]
    pub fn selected(&self) -> Option<Face> {
        self.selected.borrow().clone()
    }

    /// Returns whether `face` is the selected face.
    #[must_use]
    pub fn is_selected(&self, face: &Face) -> bool {
        self.selected.borrow().as_ref() == Some(face)
    }

    /// Selects `face` (or nothing, for `None`).
    ///
    /// Publishes the new selection and returns `true` if it differs by
    /// identity from the current one; otherwise does nothing.
    pub fn select(&self, face: Option<Face>) -> bool {
        if *self.selected.borrow() == face {
            return false;
        }
        self.selected.replace(face.clone());
        self.changed.publish(&face);
        true
    }

    /// Clears the selection. Same as `select(None)`.
    pub fn clear(&self) -> bool {
        self.select(None)
    }

    /// Subscribes to selection changes. The payload is the new selection.
    pub fn subscribe(&self, callback: impl Fn(&Option<Face>) + 'static) -> Subscription {
        self.changed.subscribe(callback)
    }
}
