//! Observable 3D points.

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::notifier::{ChangeNotifier, Subscription, Suspension};

/// A coordinate axis, used to address one component of a vertex.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    /// All axes in component order.
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    /// Returns the component index (0, 1 or 2).
    #[must_use]
    pub fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }
}

struct VertexInner {
    position: Cell<Vec3>,
    changed: ChangeNotifier<Vertex>,
}

/// A mutable point in 3D space.
///
/// `Vertex` is a shared handle: clones refer to the same point. Every write
/// that actually changes a coordinate publishes the vertex to its
/// subscribers; writing the current value is silent. Values are stored as
/// given, including NaN and infinities.
#[derive(Clone)]
pub struct Vertex {
    inner: Rc<VertexInner>,
}

impl Vertex {
    /// Creates a vertex at `(x, y, z)`.
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self::from_position(Vec3::new(x, y, z))
    }

    /// Creates a vertex at `position`.
    pub fn from_position(position: Vec3) -> Self {
        Self {
            inner: Rc::new(VertexInner {
                position: Cell::new(position),
                changed: ChangeNotifier::new(),
            }),
        }
    }

    /// Returns the current position.
    #[must_use]
    pub fn position(&self) -> Vec3 {
        self.inner.position.get()
    }

    /// Returns the X coordinate.
    #[must_use]
    pub fn x(&self) -> f32 {
        self.position().x
    }

    /// Returns the Y coordinate.
    #[must_use]
    pub fn y(&self) -> f32 {
        self.position().y
    }

    /// Returns the Z coordinate.
    #[must_use]
    pub fn z(&self) -> f32 {
        self.position().z
    }

    /// Returns one coordinate.
    #[must_use]
    pub fn axis(&self, axis: Axis) -> f32 {
        self.position()[axis.index()]
    }

    /// Writes the X coordinate, publishing if it changed.
    pub fn set_x(&self, value: f32) {
        self.set_axis(Axis::X, value);
    }

    /// Writes the Y coordinate, publishing if it changed.
    pub fn set_y(&self, value: f32) {
        self.set_axis(Axis::Y, value);
    }

    /// Writes the Z coordinate, publishing if it changed.
    pub fn set_z(&self, value: f32) {
        self.set_axis(Axis::Z, value);
    }

    /// Writes one coordinate, publishing if the value changed.
    #[allow(clippy::float_cmp)]
    pub fn set_axis(&self, axis: Axis, value: f32) {
        let mut position = self.position();
        if position[axis.index()] != value {
            position[axis.index()] = value;
            self.inner.position.set(position);
            self.inner.changed.publish(self);
        }
    }

    /// Writes all three coordinates, publishing once if any of them changed.
    #[allow(clippy::float_cmp)]
    pub fn set_position(&self, position: Vec3) {
        let current = self.position();
        if current.x != position.x || current.y != position.y || current.z != position.z {
            self.inner.position.set(position);
            self.inner.changed.publish(self);
        }
    }

    /// Subscribes to coordinate changes. The payload is this vertex.
    pub fn subscribe(&self, callback: impl Fn(&Vertex) + 'static) -> Subscription {
        self.inner.changed.subscribe(callback)
    }

    /// Returns whether both handles refer to the same vertex.
    #[must_use]
    pub fn ptr_eq(&self, other: &Vertex) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    pub(crate) fn suspend(&self) -> Suspension {
        self.inner.changed.suspend()
    }
}

impl From<Vec3> for Vertex {
    fn from(position: Vec3) -> Self {
        Self::from_position(position)
    }
}

impl fmt::Debug for Vertex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let p = self.position();
        write!(f, "Vertex({}, {}, {})", p.x, p.y, p.z)
    }
}
