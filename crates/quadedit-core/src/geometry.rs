//! Vector helpers, ray intersection and centroids.

use glam::Vec3;

use crate::face::Face;

/// Tolerance for parallel rays and for hits too close to the ray origin.
pub const EPSILON: f32 = 1e-6;

/// A world-space ray.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    /// Ray origin point.
    pub origin: Vec3,
    /// Ray direction. Expected to be normalized, so hit distances are in
    /// world units; it is stored as given.
    pub direction: Vec3,
}

impl Ray {
    /// Creates a new ray.
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self { origin, direction }
    }

    /// Returns the point at parameter `t` along the ray.
    #[must_use]
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}

/// Dot product of `a` and `b`.
#[must_use]
pub fn dot(a: Vec3, b: Vec3) -> f32 {
    a.dot(b)
}

/// Cross product of `a` and `b`.
#[must_use]
pub fn cross(a: Vec3, b: Vec3) -> Vec3 {
    a.cross(b)
}

/// Vector from `b` to `a`.
#[must_use]
pub fn subtract(a: Vec3, b: Vec3) -> Vec3 {
    a - b
}

/// Möller–Trumbore ray/triangle intersection.
///
/// Returns the distance along the ray to the hit, or `None` when the ray is
/// parallel to the triangle, misses it, or hits at `t <= EPSILON`.
#[must_use]
pub fn ray_intersects_triangle(ray: &Ray, v0: Vec3, v1: Vec3, v2: Vec3) -> Option<f32> {
    let edge1 = subtract(v1, v0);
    let edge2 = subtract(v2, v0);
    let h = cross(ray.direction, edge2);
    let a = dot(edge1, h);
    if a.abs() < EPSILON {
        return None;
    }
    let f = 1.0 / a;
    let s = subtract(ray.origin, v0);
    let u = f * dot(s, h);
    if !(0.0..=1.0).contains(&u) {
        return None;
    }
    let q = cross(s, edge1);
    let v = f * dot(ray.direction, q);
    if v < 0.0 || u + v > 1.0 {
        return None;
    }
    let t = f * dot(edge2, q);
    if t > EPSILON {
        Some(t)
    } else {
        None
    }
}

/// Intersects a ray with a quad face, split as triangles `(0, 1, 2)` and
/// `(0, 2, 3)`. Returns the nearer hit distance.
#[must_use]
pub fn ray_intersects_face(ray: &Ray, face: &Face) -> Option<f32> {
    let [p0, p1, p2, p3] = face.positions();
    let first = ray_intersects_triangle(ray, p0, p1, p2);
    let second = ray_intersects_triangle(ray, p0, p2, p3);
    match (first, second) {
        (Some(a), Some(b)) => Some(a.min(b)),
        (hit @ Some(_), None) | (None, hit) => hit,
    }
}

/// Mean of every vertex position across `faces`.
///
/// Vertices are not deduplicated. Returns the origin when `faces` is empty.
#[must_use]
pub fn centroid(faces: &[Face]) -> Vec3 {
    let (sum, count) = faces
        .iter()
        .flat_map(Face::positions)
        .fold((Vec3::ZERO, 0usize), |(sum, count), p| (sum + p, count + 1));

    if count == 0 {
        Vec3::ZERO
    } else {
        sum / count as f32
    }
}
