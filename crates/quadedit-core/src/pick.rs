//! Picking: turning a pointer gesture into the face under the cursor.

use glam::{Mat4, UVec2, Vec2, Vec3, Vec4};

use crate::face::Face;
use crate::geometry::{ray_intersects_face, Ray};

/// Result of a pick.
#[derive(Debug, Clone)]
pub struct PickHit {
    /// The face that was hit.
    pub face: Face,

    /// Distance along the ray to the hit point.
    pub distance: f32,

    /// World-space hit point.
    pub point: Vec3,
}

/// Finds the face nearest along `ray`.
///
/// Faces are tested in order; on equal distances the earlier face wins.
#[must_use]
pub fn pick_nearest<'a>(ray: &Ray, faces: impl IntoIterator<Item = &'a Face>) -> Option<PickHit> {
    let mut best: Option<PickHit> = None;
    for face in faces {
        let Some(distance) = ray_intersects_face(ray, face) else {
            continue;
        };
        let is_better = best.as_ref().map_or(true, |hit| distance < hit.distance);
        if is_better {
            best = Some(PickHit {
                face: face.clone(),
                distance,
                point: ray.at(distance),
            });
        }
    }
    best
}

/// Builds the world-space ray under a pixel.
///
/// `click` is in pixels with y growing downward; `viewport` is the pixel
/// size of the view. The pixel is unprojected through the near (depth 0) and
/// far (depth 1) planes; the ray starts on the near plane and its direction
/// is normalized.
///
/// Returns `None` for an empty viewport or a degenerate projection.
#[must_use]
pub fn screen_ray(click: Vec2, viewport: UVec2, inverse_view_projection: Mat4) -> Option<Ray> {
    if viewport.x == 0 || viewport.y == 0 {
        return None;
    }

    let half_width = viewport.x as f32 / 2.0;
    let half_height = viewport.y as f32 / 2.0;
    let ndc_x = (click.x / half_width) - 1.0;
    let ndc_y = 1.0 - (click.y / half_height);

    let near = inverse_view_projection * Vec4::new(ndc_x, ndc_y, 0.0, 1.0);
    let far = inverse_view_projection * Vec4::new(ndc_x, ndc_y, 1.0, 1.0);

    if near.w.abs() < 1e-6 || far.w.abs() < 1e-6 {
        return None;
    }

    let origin = near.truncate() / near.w;
    let far_point = far.truncate() / far.w;
    let direction = (far_point - origin).normalize_or_zero();
    if direction.length_squared() < 1e-12 {
        return None;
    }

    Some(Ray::new(origin, direction))
}

/// Returns whether a press/release pair is a click rather than a drag.
///
/// The gesture is a click when the manhattan distance between the two points
/// is below `tolerance` pixels.
#[must_use]
pub fn is_click(press: Vec2, release: Vec2, tolerance: f32) -> bool {
    let delta = (release - press).abs();
    delta.x + delta.y < tolerance
}
