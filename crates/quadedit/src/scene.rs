//! The default scene.

use quadedit_core::{Face, Model, Vec3};

/// Names of the default cube faces, in the order they are added.
pub const CUBE_FACE_NAMES: [&str; 6] = ["front", "back", "top", "bottom", "right", "left"];

/// Corner positions of each cube face, counter-clockwise seen from outside.
const CUBE_FACES: [[[f32; 3]; 4]; 6] = [
    [[-1.0, -1.0, 1.0], [1.0, -1.0, 1.0], [1.0, 1.0, 1.0], [-1.0, 1.0, 1.0]],
    [[1.0, -1.0, -1.0], [-1.0, -1.0, -1.0], [-1.0, 1.0, -1.0], [1.0, 1.0, -1.0]],
    [[-1.0, 1.0, 1.0], [1.0, 1.0, 1.0], [1.0, 1.0, -1.0], [-1.0, 1.0, -1.0]],
    [[-1.0, -1.0, -1.0], [1.0, -1.0, -1.0], [1.0, -1.0, 1.0], [-1.0, -1.0, 1.0]],
    [[1.0, -1.0, 1.0], [1.0, -1.0, -1.0], [1.0, 1.0, -1.0], [1.0, 1.0, 1.0]],
    [[-1.0, -1.0, -1.0], [-1.0, -1.0, 1.0], [-1.0, 1.0, 1.0], [-1.0, 1.0, -1.0]],
];

/// Adds a cube spanning `[-1, 1]` on every axis to `model`.
///
/// Each face gets its own four vertices: corners shared geometrically are
/// separate points, so moving one face's corner leaves its neighbours alone.
pub fn populate_unit_cube(model: &Model) {
    model.batch(|model| {
        for (name, corners) in CUBE_FACE_NAMES.iter().zip(CUBE_FACES) {
            model.add_face(Face::named(*name, corners.map(Vec3::from_array)));
        }
    });
}
