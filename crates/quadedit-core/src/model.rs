//! The scene model: an ordered collection of quad faces.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::iter;
use std::rc::{Rc, Weak};

use glam::Vec3;

use crate::face::Face;
use crate::geometry::{self, Ray};
use crate::notifier::{ChangeNotifier, Subscription, Suspension};
use crate::pick::{self, PickHit};

struct FaceEntry {
    face: Face,
    _subscription: Subscription,
}

struct ModelInner {
    faces: RefCell<Vec<FaceEntry>>,
    changed: ChangeNotifier<Model>,
    /// Nesting depth of running [`Model::batch`] calls.
    batch_depth: Cell<u32>,
    /// Mutes held by the outermost running batch.
    batch_suspensions: RefCell<Vec<Suspension>>,
}

/// Ends a batch scope, also on unwind.
struct BatchScope<'a> {
    inner: &'a ModelInner,
}

impl Drop for BatchScope<'_> {
    fn drop(&mut self) {
        let depth = self.inner.batch_depth.get() - 1;
        self.inner.batch_depth.set(depth);
        if depth == 0 {
            let released = std::mem::take(&mut *self.inner.batch_suspensions.borrow_mut());
            drop(released);
        }
    }
}

/// The single aggregate of an editing session.
///
/// Faces keep their insertion order, which is the render and export order.
/// The model watches every face it holds and publishes itself whenever one of
/// them (or one of their vertices) changes, as well as on every structural
/// edit.
///
/// Adding the same face twice is not prevented; it is then watched (and
/// bubbles) twice.
pub struct Model {
    inner: Rc<ModelInner>,
}

impl Model {
    /// Creates an empty model.
    pub fn new() -> Self {
        Self {
            inner: Rc::new(ModelInner {
                faces: RefCell::new(Vec::new()),
                changed: ChangeNotifier::new(),
                batch_depth: Cell::new(0),
                batch_suspensions: RefCell::new(Vec::new()),
            }),
        }
    }

    /// Appends a face and publishes the model.
    ///
    /// Inside a [`Model::batch`] the face and its vertices are muted until the
    /// batch ends.
    pub fn add_face(&self, face: Face) {
        if self.in_batch() {
            let suspensions = face.suspend();
            self.inner.batch_suspensions.borrow_mut().extend(suspensions);
        }

        let model: Weak<ModelInner> = Rc::downgrade(&self.inner);
        let subscription = face.subscribe(move |_| {
            if let Some(inner) = model.upgrade() {
                Model { inner }.publish();
            }
        });

        self.inner.faces.borrow_mut().push(FaceEntry {
            face,
            _subscription: subscription,
        });
        self.publish();
    }

    /// Removes the first occurrence of `face` (by identity).
    ///
    /// Returns `false`, without publishing, if the face is not in the model.
    pub fn remove_face(&self, face: &Face) -> bool {
        let removed = {
            let mut faces = self.inner.faces.borrow_mut();
            let index = faces.iter().position(|entry| entry.face == *face);
            index.map(|index| faces.remove(index))
        };

        match removed {
            Some(entry) => {
                drop(entry);
                self.publish();
                true
            }
            None => false,
        }
    }

    /// Removes every face and publishes, even if the model was already empty.
    pub fn clear(&self) {
        let entries = std::mem::take(&mut *self.inner.faces.borrow_mut());
        drop(entries);
        self.publish();
    }

    /// Moves every vertex of every face by `delta`, publishing the model once.
    ///
    /// Vertex- and face-level subscribers are not notified of this change;
    /// only model subscribers are.
    pub fn translate_all(&self, delta: Vec3) {
        let moved = self.batch(|model| {
            let mut moved = 0usize;
            for face in model.faces() {
                for vertex in face.vertices() {
                    vertex.set_position(vertex.position() + delta);
                    moved += 1;
                }
            }
            moved
        });
        log::debug!("translated {moved} vertices by {delta}");
    }

    /// Runs `edit` with propagation suspended, then publishes the model once.
    ///
    /// For the duration of the closure the model is muted, together with
    /// every face it holds or gains through [`Model::add_face`] and the
    /// vertices of those faces. Changes made inside reach only the single
    /// model notification fired afterwards; they are not replayed to vertex
    /// or face subscribers. Batches nest; only the outermost one publishes.
    pub fn batch<R>(&self, edit: impl FnOnce(&Self) -> R) -> R {
        let outermost = !self.in_batch();
        if outermost {
            let suspensions: Vec<Suspension> = iter::once(self.inner.changed.suspend())
                .chain(self.faces().iter().flat_map(Face::suspend))
                .collect();
            *self.inner.batch_suspensions.borrow_mut() = suspensions;
        }
        self.inner.batch_depth.set(self.inner.batch_depth.get() + 1);

        let result = {
            let _scope = BatchScope { inner: &self.inner };
            edit(self)
        };

        if outermost {
            self.publish();
        }
        result
    }

    fn in_batch(&self) -> bool {
        self.inner.batch_depth.get() > 0
    }

    /// Returns the faces in order.
    #[must_use]
    pub fn faces(&self) -> Vec<Face> {
        self.inner
            .faces
            .borrow()
            .iter()
            .map(|entry| entry.face.clone())
            .collect()
    }

    /// Returns the number of faces.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.faces.borrow().len()
    }

    /// Returns true if the model holds no faces.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.faces.borrow().is_empty()
    }

    /// Returns whether `face` (by identity) is in the model.
    #[must_use]
    pub fn contains(&self, face: &Face) -> bool {
        self.inner
            .faces
            .borrow()
            .iter()
            .any(|entry| entry.face == *face)
    }

    /// Returns the first face with the given id.
    #[must_use]
    pub fn face_by_id(&self, id: &str) -> Option<Face> {
        self.inner
            .faces
            .borrow()
            .iter()
            .find(|entry| entry.face.id() == id)
            .map(|entry| entry.face.clone())
    }

    /// Returns the mean of every vertex position in the model.
    #[must_use]
    pub fn centroid(&self) -> Vec3 {
        geometry::centroid(&self.faces())
    }

    /// Returns the face nearest along `ray`, if any.
    #[must_use]
    pub fn pick(&self, ray: &Ray) -> Option<PickHit> {
        pick::pick_nearest(ray, &self.faces())
    }

    /// Subscribes to model changes. The payload is this model.
    pub fn subscribe(&self, callback: impl Fn(&Model) + 'static) -> Subscription {
        self.inner.changed.subscribe(callback)
    }

    fn publish(&self) {
        self.inner.changed.publish(self);
    }
}

impl Default for Model {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Model")
            .field("faces", &self.faces())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vertex::Vertex;
    use proptest::prelude::*;
    use std::cell::Cell;

    fn quad_at(z: f32) -> (Face, Vec<Vertex>) {
        let vertices = vec![
            Vertex::new(-1.0, -1.0, z),
            Vertex::new(1.0, -1.0, z),
            Vertex::new(1.0, 1.0, z),
            Vertex::new(-1.0, 1.0, z),
        ];
        (Face::new(vertices.clone()).unwrap(), vertices)
    }

    fn counter() -> (Rc<Cell<usize>>, impl Fn() -> Box<dyn Fn(&Model)>) {
        let count = Rc::new(Cell::new(0));
        let sink = Rc::clone(&count);
        (count, move || -> Box<dyn Fn(&Model)> {
            let sink = Rc::clone(&sink);
            Box::new(move |_: &Model| sink.set(sink.get() + 1))
        })
    }

    #[test]
    fn test_add_face_publishes() {
        let model = Model::new();
        let (count, make) = counter();
        let _sub = model.subscribe(make());

        let (face, _) = quad_at(0.0);
        model.add_face(face.clone());

        assert_eq!(count.get(), 1);
        assert!(model.contains(&face));
        assert_eq!(model.len(), 1);
    }

    #[test]
    fn test_insertion_order_preserved() {
        let model = Model::new();
        let faces: Vec<Face> = (0..3).map(|i| quad_at(i as f32).0).collect();
        for face in &faces {
            model.add_face(face.clone());
        }
        assert_eq!(model.faces(), faces);
    }

    #[test]
    fn test_vertex_change_propagates_two_levels() {
        let model = Model::new();
        let (face, vertices) = quad_at(1.0);
        model.add_face(face.clone());

        let face_count = Rc::new(Cell::new(0));
        let sink = Rc::clone(&face_count);
        let _face_sub = face.subscribe(move |_| sink.set(sink.get() + 1));
        let (model_count, make) = counter();
        let _model_sub = model.subscribe(make());

        vertices[2].set_y(5.0);

        assert_eq!(face_count.get(), 1);
        assert_eq!(model_count.get(), 1);
    }

    #[test]
    fn test_remove_face() {
        let model = Model::new();
        let (face, vertices) = quad_at(0.0);
        model.add_face(face.clone());
        let (count, make) = counter();
        let _sub = model.subscribe(make());

        assert!(model.remove_face(&face));
        assert_eq!(count.get(), 1);
        assert!(!model.contains(&face));

        // The removed face no longer bubbles into the model.
        vertices[0].set_x(7.0);
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn test_remove_absent_face_is_silent() {
        let model = Model::new();
        let (present, _) = quad_at(0.0);
        let (absent, _) = quad_at(1.0);
        model.add_face(present);
        let (count, make) = counter();
        let _sub = model.subscribe(make());

        assert!(!model.remove_face(&absent));
        assert_eq!(count.get(), 0);
        assert_eq!(model.len(), 1);
    }

    #[test]
    fn test_clear_always_publishes() {
        let model = Model::new();
        let (face, vertices) = quad_at(0.0);
        model.add_face(face);
        let (count, make) = counter();
        let _sub = model.subscribe(make());

        model.clear();
        model.clear();

        assert_eq!(count.get(), 2);
        assert!(model.is_empty());

        vertices[0].set_x(7.0);
        assert_eq!(count.get(), 2);
    }

    #[test]
    fn test_translate_all_single_notification() {
        let model = Model::new();
        let mut all_vertices = Vec::new();
        for i in 0..6 {
            let (face, vertices) = quad_at(i as f32);
            model.add_face(face);
            all_vertices.extend(vertices);
        }

        let vertex_count = Rc::new(Cell::new(0));
        let _vertex_subs: Vec<Subscription> = all_vertices
            .iter()
            .map(|v| {
                let sink = Rc::clone(&vertex_count);
                v.subscribe(move |_| sink.set(sink.get() + 1))
            })
            .collect();
        let face_count = Rc::new(Cell::new(0));
        let _face_subs: Vec<Subscription> = model
            .faces()
            .iter()
            .map(|f| {
                let sink = Rc::clone(&face_count);
                f.subscribe(move |_| sink.set(sink.get() + 1))
            })
            .collect();
        let (model_count, make) = counter();
        let _sub = model.subscribe(make());

        model.translate_all(Vec3::new(1.0, 2.0, 3.0));

        assert_eq!(model_count.get(), 1);
        assert_eq!(face_count.get(), 0);
        assert_eq!(vertex_count.get(), 0);
        assert_eq!(all_vertices[0].position(), Vec3::new(0.0, 1.0, 3.0));

        // Propagation is live again afterwards.
        all_vertices[0].set_x(9.0);
        assert_eq!(vertex_count.get(), 1);
        assert_eq!(face_count.get(), 1);
        assert_eq!(model_count.get(), 2);
    }

    #[test]
    fn test_translate_all_on_empty_model() {
        let model = Model::new();
        let (count, make) = counter();
        let _sub = model.subscribe(make());
        model.translate_all(Vec3::ONE);
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn test_nested_batches_publish_once() {
        let model = Model::new();
        model.add_face(quad_at(0.0).0);
        let (count, make) = counter();
        let _sub = model.subscribe(make());

        model.batch(|m| {
            m.translate_all(Vec3::X);
            m.add_face(quad_at(2.0).0);
        });

        assert_eq!(count.get(), 1);
        assert_eq!(model.len(), 2);
    }

    #[test]
    fn test_face_added_in_batch_is_muted() {
        let model = Model::new();
        let (face, vertices) = quad_at(0.0);
        let face_count = Rc::new(Cell::new(0));
        let sink = Rc::clone(&face_count);
        let _face_sub = face.subscribe(move |_| sink.set(sink.get() + 1));
        let (model_count, make) = counter();
        let _model_sub = model.subscribe(make());

        model.batch(|m| {
            m.add_face(face.clone());
            vertices[0].set_x(3.0);
            m.batch(|inner| inner.add_face(quad_at(1.0).0));
            vertices[1].set_y(4.0);
        });

        assert_eq!(face_count.get(), 0);
        assert_eq!(model_count.get(), 1);
        assert_eq!(model.len(), 2);

        // Unmuted once the outermost batch is over.
        vertices[2].set_z(5.0);
        assert_eq!(face_count.get(), 1);
        assert_eq!(model_count.get(), 2);
    }

    #[test]
    fn test_batch_unwinds_cleanly() {
        let model = Model::new();
        let (face, vertices) = quad_at(0.0);
        model.add_face(face);
        let (count, make) = counter();
        let _sub = model.subscribe(make());

        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            model.batch(|_| panic!("edit failed"));
        }));
        assert!(result.is_err());

        vertices[0].set_x(2.0);
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn test_duplicate_add() {
        let model = Model::new();
        let (face, vertices) = quad_at(0.0);
        model.add_face(face.clone());
        model.add_face(face.clone());
        assert_eq!(model.len(), 2);
        assert_eq!(model.faces(), vec![face.clone(), face.clone()]);

        let face_count = Rc::new(Cell::new(0));
        let sink = Rc::clone(&face_count);
        let _face_sub = face.subscribe(move |_| sink.set(sink.get() + 1));
        let (model_count, make) = counter();
        let _model_sub = model.subscribe(make());

        // Watched once per entry.
        vertices[0].set_x(-2.0);
        assert_eq!(face_count.get(), 1);
        assert_eq!(model_count.get(), 2);

        // Each entry shifts the shared vertices once.
        model.translate_all(Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(vertices[0].position(), Vec3::new(0.0, -1.0, 0.0));
        assert_eq!(vertices[1].position(), Vec3::new(3.0, -1.0, 0.0));
        assert_eq!(model_count.get(), 3);

        // Only the first occurrence goes.
        assert!(model.remove_face(&face));
        assert_eq!(model.len(), 1);
        assert!(model.contains(&face));
        assert_eq!(model_count.get(), 4);

        vertices[0].set_x(10.0);
        assert_eq!(model_count.get(), 5);
    }

    #[test]
    fn test_reentrant_edit_from_model_callback() {
        let model = Rc::new(Model::new());
        let (face, vertices) = quad_at(0.0);
        model.add_face(face.clone());

        // A subscriber that clears the model the first time it hears from it.
        let fired = Rc::new(Cell::new(0));
        let _sub = {
            let fired = Rc::clone(&fired);
            model.subscribe(move |m| {
                fired.set(fired.get() + 1);
                if fired.get() == 1 {
                    m.clear();
                }
            })
        };

        vertices[0].set_x(4.0);

        assert_eq!(fired.get(), 2);
        assert!(model.is_empty());
    }

    #[test]
    fn test_face_by_id() {
        let model = Model::new();
        let face = Face::with_id(quad_at(0.0).1, "top").unwrap();
        model.add_face(face.clone());
        assert_eq!(model.face_by_id("top"), Some(face));
        assert!(model.face_by_id("missing").is_none());
    }

    proptest! {
        #[test]
        fn prop_translate_all_shifts_every_vertex(
            faces in 0usize..8,
            dx in -50.0f32..50.0,
            dy in -50.0f32..50.0,
            dz in -50.0f32..50.0,
        ) {
            let model = Model::new();
            let mut before = Vec::new();
            for i in 0..faces {
                let (face, vertices) = quad_at(i as f32);
                model.add_face(face);
                before.extend(vertices.iter().map(|v| (v.clone(), v.position())));
            }
            let (count, make) = counter();
            let _sub = model.subscribe(make());

            let delta = Vec3::new(dx, dy, dz);
            model.translate_all(delta);

            prop_assert_eq!(count.get(), 1);
            for (vertex, original) in before {
                prop_assert_eq!(vertex.position(), original + delta);
            }
        }
    }
}
