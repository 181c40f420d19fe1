//! Quad faces.
//!
//! A [`Face`] groups exactly four vertices. It subscribes to each of them and
//! re-publishes itself whenever one moves, so observers of a face never need
//! to watch individual vertices.

use std::cell::RefCell;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::{Rc, Weak};

use glam::Vec3;
use uuid::Uuid;

use crate::error::{QuadEditError, Result};
use crate::notifier::{ChangeNotifier, Subscription, Suspension};
use crate::vertex::Vertex;

/// Number of vertices in every face.
pub const FACE_VERTEX_COUNT: usize = 4;

fn generate_face_id() -> String {
    Uuid::new_v4().to_string()
}

fn into_quad(vertices: Vec<Vertex>) -> Result<[Vertex; FACE_VERTEX_COUNT]> {
    vertices
        .try_into()
        .map_err(|rejected: Vec<Vertex>| QuadEditError::InvalidTopology {
            expected: FACE_VERTEX_COUNT,
            actual: rejected.len(),
        })
}

struct FaceInner {
    id: String,
    vertices: RefCell<[Vertex; FACE_VERTEX_COUNT]>,
    /// One guard per current vertex.
    vertex_subscriptions: RefCell<Vec<Subscription>>,
    changed: ChangeNotifier<Face>,
}

/// A quadrilateral made of four vertices, with a stable identity.
///
/// Vertex order is significant: picking splits the quad into the triangles
/// `(0, 1, 2)` and `(0, 2, 3)`, and renderers rely on it for winding.
///
/// `Face` is a shared handle. Equality and hashing use handle identity, never
/// coordinates or the id string.
#[derive(Clone)]
pub struct Face {
    inner: Rc<FaceInner>,
}

impl Face {
    /// Creates a face with a random (v4 UUID) id.
    ///
    /// # Errors
    ///
    /// Returns [`QuadEditError::InvalidTopology`] unless exactly four
    /// vertices are given.
    pub fn new(vertices: Vec<Vertex>) -> Result<Self> {
        let vertices = into_quad(vertices)?;
        Ok(Self::from_quad(vertices, generate_face_id()))
    }

    /// Creates a face with a caller-chosen id.
    ///
    /// # Errors
    ///
    /// Returns [`QuadEditError::InvalidTopology`] unless exactly four
    /// vertices are given.
    pub fn with_id(vertices: Vec<Vertex>, id: impl Into<String>) -> Result<Self> {
        let vertices = into_quad(vertices)?;
        Ok(Self::from_quad(vertices, id.into()))
    }

    /// Creates a face over four fresh vertices at the given positions.
    pub fn from_positions(positions: [Vec3; FACE_VERTEX_COUNT]) -> Self {
        Self::from_quad(positions.map(Vertex::from_position), generate_face_id())
    }

    /// Like [`Face::from_positions`], with a caller-chosen id.
    pub fn named(id: impl Into<String>, positions: [Vec3; FACE_VERTEX_COUNT]) -> Self {
        Self::from_quad(positions.map(Vertex::from_position), id.into())
    }

    fn from_quad(vertices: [Vertex; FACE_VERTEX_COUNT], id: String) -> Self {
        let face = Self {
            inner: Rc::new(FaceInner {
                id,
                vertices: RefCell::new(vertices),
                vertex_subscriptions: RefCell::new(Vec::new()),
                changed: ChangeNotifier::new(),
            }),
        };
        let subscriptions = face.watch_vertices();
        *face.inner.vertex_subscriptions.borrow_mut() = subscriptions;
        face
    }

    /// Subscribes to every current vertex, bubbling its changes up as this face.
    fn watch_vertices(&self) -> Vec<Subscription> {
        self.vertices()
            .iter()
            .map(|vertex| {
                let face: Weak<FaceInner> = Rc::downgrade(&self.inner);
                vertex.subscribe(move |_| {
                    if let Some(inner) = face.upgrade() {
                        let face = Face { inner };
                        face.inner.changed.publish(&face);
                    }
                })
            })
            .collect()
    }

    /// Returns the face id.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.inner.id
    }

    /// Returns the four vertices in order.
    #[must_use]
    pub fn vertices(&self) -> [Vertex; FACE_VERTEX_COUNT] {
        self.inner.vertices.borrow().clone()
    }

    /// Returns the vertex at `index`, or `None` past the fourth.
    #[must_use]
    pub fn vertex(&self, index: usize) -> Option<Vertex> {
        self.inner.vertices.borrow().get(index).cloned()
    }

    /// Returns the four vertex positions in order.
    #[must_use]
    pub fn positions(&self) -> [Vec3; FACE_VERTEX_COUNT] {
        self.vertices().map(|vertex| vertex.position())
    }

    /// Returns the mean of the four vertex positions.
    #[must_use]
    pub fn centroid(&self) -> Vec3 {
        self.positions().iter().copied().sum::<Vec3>() / FACE_VERTEX_COUNT as f32
    }

    /// Swaps in a new vertex set.
    ///
    /// Stops watching the old vertices, starts watching the new ones and
    /// publishes this face, even if the new vertices sit exactly where the
    /// old ones did.
    ///
    /// # Errors
    ///
    /// Returns [`QuadEditError::InvalidTopology`] unless exactly four
    /// vertices are given. The face is left untouched in that case.
    pub fn replace_vertices(&self, vertices: Vec<Vertex>) -> Result<()> {
        let vertices = into_quad(vertices)?;

        let old_subscriptions = std::mem::take(&mut *self.inner.vertex_subscriptions.borrow_mut());
        drop(old_subscriptions);

        *self.inner.vertices.borrow_mut() = vertices;
        let subscriptions = self.watch_vertices();
        *self.inner.vertex_subscriptions.borrow_mut() = subscriptions;

        self.inner.changed.publish(self);
        Ok(())
    }

    /// Subscribes to changes of this face or any of its vertices.
    /// The payload is this face.
    pub fn subscribe(&self, callback: impl Fn(&Face) + 'static) -> Subscription {
        self.inner.changed.subscribe(callback)
    }

    /// Mutes this face and its current vertices.
    pub(crate) fn suspend(&self) -> Vec<Suspension> {
        let mut suspensions = vec![self.inner.changed.suspend()];
        suspensions.extend(self.inner.vertices.borrow().iter().map(Vertex::suspend));
        suspensions
    }
}

impl PartialEq for Face {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Eq for Face {}

impl Hash for Face {
    fn hash<H: Hasher>(&self, state: &mut H) {
        Rc::as_ptr(&self.inner).hash(state);
    }
}

impl fmt::Debug for Face {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Face")
            .field("id", &self.inner.id)
            .field("vertices", &*self.inner.vertices.borrow())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn quad() -> Vec<Vertex> {
        vec![
            Vertex::new(-1.0, -1.0, 1.0),
            Vertex::new(1.0, -1.0, 1.0),
            Vertex::new(1.0, 1.0, 1.0),
            Vertex::new(-1.0, 1.0, 1.0),
        ]
    }

    fn counting(face: &Face) -> (Rc<Cell<usize>>, Subscription) {
        let count = Rc::new(Cell::new(0));
        let sink = Rc::clone(&count);
        let sub = face.subscribe(move |_| sink.set(sink.get() + 1));
        (count, sub)
    }

    #[test]
    fn test_construction() {
        let face = Face::with_id(quad(), "front").unwrap();
        assert_eq!(face.id(), "front");
        assert_eq!(face.vertices().len(), FACE_VERTEX_COUNT);
        assert_eq!(face.positions()[2], Vec3::new(1.0, 1.0, 1.0));
        assert!(face.vertex(4).is_none());
    }

    #[test]
    fn test_wrong_vertex_count_rejected() {
        for count in [0, 1, 2, 3, 5] {
            let vertices = (0..count).map(|_| Vertex::new(0.0, 0.0, 0.0)).collect();
            let err = Face::new(vertices).unwrap_err();
            assert!(matches!(
                err,
                QuadEditError::InvalidTopology { expected: 4, actual } if actual == count
            ));
        }
    }

    #[test]
    fn test_generated_ids_are_unique() {
        let a = Face::new(quad()).unwrap();
        let b = Face::new(quad()).unwrap();
        assert_ne!(a.id(), b.id());
        assert!(Uuid::parse_str(a.id()).is_ok());
    }

    #[test]
    fn test_generated_id_does_not_collide_with_named() {
        let named = Face::named("face-1", [Vec3::ZERO; 4]);
        let generated = Face::from_positions([Vec3::ZERO; 4]);
        assert_ne!(named.id(), generated.id());
        assert_ne!(generated.id(), "face-1");
    }

    #[test]
    fn test_vertex_change_bubbles_once() {
        let vertices = quad();
        let face = Face::new(vertices.clone()).unwrap();
        let seen: Rc<RefCell<Vec<Face>>> = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let _sub = face.subscribe(move |f| sink.borrow_mut().push(f.clone()));

        vertices[0].set_x(10.0);

        assert_eq!(seen.borrow().len(), 1);
        assert_eq!(seen.borrow()[0], face);
    }

    #[test]
    fn test_replace_vertices_rewires_subscriptions() {
        let old = quad();
        let face = Face::new(old.clone()).unwrap();
        let (count, _sub) = counting(&face);

        let new = quad();
        face.replace_vertices(new.clone()).unwrap();
        assert_eq!(count.get(), 1);

        old[1].set_y(42.0);
        assert_eq!(count.get(), 1);

        new[1].set_y(42.0);
        assert_eq!(count.get(), 2);
        assert!(face.vertex(1).unwrap().ptr_eq(&new[1]));
    }

    #[test]
    fn test_replace_with_identical_coordinates_still_publishes() {
        let face = Face::new(quad()).unwrap();
        let (count, _sub) = counting(&face);

        face.replace_vertices(quad()).unwrap();

        assert_eq!(count.get(), 1);
    }

    #[test]
    fn test_failed_replace_leaves_face_untouched() {
        let original = quad();
        let face = Face::new(original.clone()).unwrap();
        let (count, _sub) = counting(&face);

        for n in [0, 1, 2, 3, 5] {
            let vertices = (0..n).map(|_| Vertex::new(9.0, 9.0, 9.0)).collect();
            assert!(face.replace_vertices(vertices).is_err());
        }

        assert_eq!(count.get(), 0);
        let current = face.vertices();
        assert!(current.iter().zip(&original).all(|(a, b)| a.ptr_eq(b)));

        original[3].set_z(-3.0);
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn test_dropped_face_releases_vertices() {
        let vertices = quad();
        let face = Face::new(vertices.clone()).unwrap();
        drop(face);
        // No face left to bubble into; the write must simply succeed.
        vertices[0].set_x(3.0);
        assert_eq!(vertices[0].x(), 3.0);
    }

    #[test]
    fn test_identity_equality() {
        let a = Face::with_id(quad(), "same").unwrap();
        let b = Face::with_id(quad(), "same").unwrap();
        assert_ne!(a, b);
        assert_eq!(a, a.clone());
    }

    #[test]
    fn test_centroid() {
        let face = Face::new(quad()).unwrap();
        assert_eq!(face.centroid(), Vec3::new(0.0, 0.0, 1.0));
    }
}
