//! Drag sessions and per-mode delta computation
//!
//! Every edit is computed from the matrix captured at drag start, never the
//! live one, so many small pointer moves do not accumulate drift.

use crate::math::{compose_about_pivot, ray_plane_intersection, rotation_of, LocalFrame, Plane};
use crate::orientation::{ActiveScale, ViewSnapshot};
use crate::types::{constants, Axis, AxisFlags, Handle, Mat3, Mat4, Mode, Ray, Vec3};

/// Plane the pointer ray is intersected with while dragging `handle`
///
/// Planar translate handles drag in their own plane, rotate handles in the
/// plane perpendicular to their axis; free axes, scale handles and the
/// center grip use a camera-facing plane through the center.
pub fn drag_plane(handle: &Handle, snapshot: &ViewSnapshot) -> Option<Plane> {
    let normal = match (handle.mode, handle.axis) {
        (Mode::Translate, axis) if axis.is_plane() => {
            snapshot.frame.axis(axis.plane_normal()?.index()?)
        }
        (Mode::Rotate, axis) => snapshot.frame.axis(axis.index()?),
        _ => -snapshot.camera_direction,
    };
    Plane::new(snapshot.center, normal)
}

/// Translation applied on top of `initial`
///
/// The pointer motion is projected onto the frame axes named by `axes`, so
/// single-axis handles keep only their own component.
pub fn translate_matrix(
    initial: &Mat4,
    start_point: Vec3,
    point: Vec3,
    frame: &LocalFrame,
    axes: AxisFlags,
) -> Mat4 {
    let moved = point - start_point;
    let offset: Vec3 = axes
        .indices()
        .map(|i| {
            let axis = frame.axis(i);
            axis * moved.dot(axis)
        })
        .sum();
    Mat4::from_translation(offset) * *initial
}

/// Signed angle in `(-π, π]` from `start` to `current` about `axis`
pub fn signed_angle(start: Vec3, current: Vec3, axis: Vec3) -> f64 {
    let angle = start.dot(current).clamp(-1.0, 1.0).acos();
    if start.cross(current).dot(axis) < 0.0 {
        -angle
    } else {
        angle
    }
}

/// Rotation of `initial` about `axis` through `pivot`
///
/// Returns `None` for a zero angle so no degenerate quaternion is composed.
pub fn rotate_matrix(initial: &Mat4, axis: Vec3, angle: f64, pivot: Vec3) -> Option<Mat4> {
    if angle == 0.0 || !angle.is_finite() {
        return None;
    }
    let delta = Mat4::from_axis_angle(axis, angle);
    Some(compose_about_pivot(&delta, pivot) * *initial)
}

/// `max(0.01, 1 + dot(delta, direction) × sensitivity × gain)`
pub fn scale_factor(delta: Vec3, direction: Vec3, sensitivity: f64, gain: f64) -> f64 {
    (1.0 + delta.dot(direction) * sensitivity * gain).max(constants::MIN_SCALE_FACTOR)
}

/// Scale `initial` by `factor` along its own axis `index`, about `pivot`
///
/// Built as `R · diag(s) · Rᵀ` so the edit stays aligned with the object's
/// axes when the object is rotated.
pub fn axis_scale_matrix(initial: &Mat4, index: usize, factor: f64, pivot: Vec3) -> Mat4 {
    let rotation = Mat4::from_mat3(rotation_of(initial).unwrap_or(Mat3::IDENTITY));
    let mut scale = Vec3::ONE;
    scale[index] = factor;
    let delta = rotation * Mat4::from_scale(scale) * rotation.transpose();
    compose_about_pivot(&delta, pivot) * *initial
}

/// Uniform scale of `initial` about `pivot`
pub fn uniform_scale_matrix(initial: &Mat4, factor: f64, pivot: Vec3) -> Mat4 {
    compose_about_pivot(&Mat4::from_scale(Vec3::splat(factor)), pivot) * *initial
}

/// State of one press-move-release gesture
#[derive(Debug, Clone, PartialEq)]
pub struct DragSession {
    pub handle: Handle,
    pub plane: Plane,
    pub start_point: Vec3,
    pub start_center: Vec3,
    /// Unit vector from the center to the start point (rotate only)
    pub start_direction: Vec3,
    pub initial_matrix: Mat4,
    /// Local frame at the start center
    pub frame: LocalFrame,
    pub camera_up: Vec3,
    /// Inverse of the on-screen handle length in world units
    pub sensitivity: f64,
    pub active_scale: ActiveScale,
}

impl DragSession {
    /// Start a session if the initial ray meets the drag plane
    pub fn begin(
        handle: Handle,
        ray: &Ray,
        snapshot: &ViewSnapshot,
        initial_matrix: Mat4,
    ) -> Option<Self> {
        let plane = drag_plane(&handle, snapshot)?;
        let start_point = ray_plane_intersection(ray, &plane)?;
        Some(Self {
            handle,
            plane,
            start_point,
            start_center: snapshot.center,
            start_direction: (start_point - snapshot.center).normalize_or_zero(),
            initial_matrix,
            frame: snapshot.frame,
            camera_up: snapshot.camera_up,
            sensitivity: 1.0 / (snapshot.handle_scale * constants::AXIS_LENGTH),
            active_scale: ActiveScale::Identity,
        })
    }

    /// World direction of the handle's principal axis
    pub fn axis_vector(&self) -> Option<Vec3> {
        self.handle.axis.index().map(|i| self.frame.axis(i))
    }

    /// New model matrix for a pointer ray, or `None` to skip this tick
    pub fn drag_to(&mut self, ray: &Ray) -> Option<Mat4> {
        let point = ray_plane_intersection(ray, &self.plane)?;
        match self.handle.mode {
            Mode::Translate => Some(translate_matrix(
                &self.initial_matrix,
                self.start_point,
                point,
                &self.frame,
                self.handle.axis.flags(),
            )),
            Mode::Rotate => {
                let axis = self.axis_vector()?;
                let current = (point - self.start_center).try_normalize()?;
                let angle = signed_angle(self.start_direction, current, axis);
                rotate_matrix(&self.initial_matrix, axis, angle, self.start_center)
            }
            Mode::Scale => {
                let delta = point - self.start_point;
                if self.handle.axis == Axis::Center {
                    let factor = scale_factor(delta, self.camera_up, self.sensitivity, 2.0);
                    self.active_scale = ActiveScale::Uniform(factor);
                    Some(uniform_scale_matrix(&self.initial_matrix, factor, self.start_center))
                } else {
                    let index = self.handle.axis.index()?;
                    let factor = scale_factor(delta, self.frame.axis(index), self.sensitivity, 1.0);
                    self.active_scale = ActiveScale::Axis(self.handle.axis, factor);
                    Some(axis_scale_matrix(&self.initial_matrix, index, factor, self.start_center))
                }
            }
        }
    }
}
