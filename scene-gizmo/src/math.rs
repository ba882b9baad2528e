//! Frame math utilities
//!
//! Local tangent frames, pivot composition, ray/plane intersection and the
//! decomposition of a model matrix into a reportable [`TransformState`].

use crate::types::{
    constants, Mat3, Mat4, Position, Quat, Ray, Rotation, Scale, TransformState, Vec3,
};
use crate::{GizmoError, GizmoResult};
use glam::EulerRot;

const DEGENERATE_EPSILON: f64 = 1e-6;
const PLANE_EPSILON: f64 = 1e-6;

/// Reference ellipsoid used to derive "up" for east-north-up frames
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Ellipsoid {
    pub radii: Vec3,
}

impl Ellipsoid {
    /// WGS84 reference ellipsoid, meters
    pub const WGS84: Ellipsoid = Ellipsoid {
        radii: Vec3::new(6_378_137.0, 6_378_137.0, 6_356_752.314_245),
    };

    /// Outward surface normal of the ellipsoid through `point`
    pub fn geodetic_normal(&self, point: Vec3) -> Vec3 {
        (point / (self.radii * self.radii)).normalize_or_zero()
    }
}

/// How the local tangent frame at a world point is oriented
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FrameKind {
    /// East-north-up relative to an ellipsoid centered at the world origin
    EastNorthUp(Ellipsoid),
    /// World axes, translated to the point
    Cartesian,
}

impl Default for FrameKind {
    fn default() -> Self {
        FrameKind::EastNorthUp(Ellipsoid::WGS84)
    }
}

/// Orthonormal basis anchored at a world point
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocalFrame {
    pub origin: Vec3,
    /// Columns are the frame's X (east), Y (north) and Z (up) axes
    pub rotation: Mat3,
}

impl LocalFrame {
    /// Frame-to-world matrix
    pub fn to_mat4(&self) -> Mat4 {
        Mat4::from_cols(
            self.rotation.x_axis.extend(0.0),
            self.rotation.y_axis.extend(0.0),
            self.rotation.z_axis.extend(0.0),
            self.origin.extend(1.0),
        )
    }

    /// World direction of a frame axis by index (0=X, 1=Y, 2=Z)
    pub fn axis(&self, index: usize) -> Vec3 {
        self.rotation.col(index)
    }

    /// Express a world-space direction in frame coordinates
    pub fn to_local_vector(&self, vector: Vec3) -> Vec3 {
        self.rotation.transpose() * vector
    }
}

/// Build the local tangent frame at `point`
///
/// Recompute whenever the anchoring point moves: an east-north-up basis
/// differs from point to point.
pub fn local_frame(point: Vec3, kind: FrameKind) -> LocalFrame {
    let rotation = match kind {
        FrameKind::Cartesian => Mat3::IDENTITY,
        FrameKind::EastNorthUp(ellipsoid) => east_north_up(point, &ellipsoid),
    };
    LocalFrame {
        origin: point,
        rotation,
    }
}

fn east_north_up(point: Vec3, ellipsoid: &Ellipsoid) -> Mat3 {
    if point.length_squared() < DEGENERATE_EPSILON {
        return Mat3::IDENTITY;
    }
    let up = ellipsoid.geodetic_normal(point);
    if up == Vec3::ZERO {
        return Mat3::IDENTITY;
    }
    let mut east = Vec3::new(-point.y, point.x, 0.0);
    if east.length_squared() < DEGENERATE_EPSILON {
        // On the polar axis
        east = Vec3::X;
    }
    let east = east.normalize();
    let north = up.cross(east);
    Mat3::from_cols(east, north, up)
}

/// `translate(pivot) · delta · translate(-pivot)`
pub fn compose_about_pivot(delta: &Mat4, pivot: Vec3) -> Mat4 {
    Mat4::from_translation(pivot) * *delta * Mat4::from_translation(-pivot)
}

/// Re-orthonormalize the columns of a 3x3 block (Gram-Schmidt)
///
/// Mirrored bases are flipped on Z so the result is a proper rotation.
/// Returns `None` when a column collapses.
pub fn orthonormalize(matrix: &Mat3) -> Option<Mat3> {
    let x = matrix.x_axis.try_normalize()?;
    let y = (matrix.y_axis - x * x.dot(matrix.y_axis)).try_normalize()?;
    let mut z = (matrix.z_axis - x * x.dot(matrix.z_axis) - y * y.dot(matrix.z_axis))
        .try_normalize()?;
    if x.cross(y).dot(z) < 0.0 {
        z = -z;
    }
    Some(Mat3::from_cols(x, y, z))
}

/// Rotation part of a model matrix with scale removed
pub fn rotation_of(matrix: &Mat4) -> Option<Mat3> {
    orthonormalize(&Mat3::from_mat4(*matrix))
}

/// Round to a number of decimal digits
pub fn round_to(value: f64, digits: i32) -> f64 {
    let factor = 10f64.powi(digits);
    (value * factor).round() / factor + 0.0
}

/// Wrap an angle in degrees into `[0, 360)`
pub fn wrap_degrees(degrees: f64) -> f64 {
    let wrapped = degrees - 360.0 * (degrees / 360.0).floor();
    if wrapped >= 360.0 { 0.0 } else { wrapped + 0.0 }
}

/// Snap an angle down to the enclosing multiple of 90°
pub fn snap_quadrant(angle: f64) -> f64 {
    (angle / constants::QUADRANT).floor() * constants::QUADRANT
}

/// Decompose `matrix` into a rounded [`TransformState`] relative to `frame`
///
/// Rotation is reported as heading (about local up), pitch (about local Y)
/// and roll (about local X) of `frame⁻¹ · rotation(matrix)`.
pub fn decompose_transform(matrix: &Mat4, frame: &LocalFrame) -> GizmoResult<TransformState> {
    let translation = matrix.w_axis.truncate();
    let block = Mat3::from_mat4(*matrix);
    let scale = Vec3::new(
        block.x_axis.length(),
        block.y_axis.length(),
        block.z_axis.length(),
    );

    let rotation = orthonormalize(&block)
        .ok_or_else(|| GizmoError::degenerate_matrix("model matrix has a collapsed axis"))?;
    let relative = frame.rotation.transpose() * rotation;
    let (heading, pitch, roll) = Quat::from_mat3(&relative).to_euler(EulerRot::ZYX);

    let snap_unit = |s: f64| {
        if (s - 1.0).abs() < constants::UNIT_SCALE_SNAP {
            1.0
        } else {
            round_to(s, 3)
        }
    };
    let angle = |radians: f64| wrap_degrees(round_to(radians.to_degrees(), 2));

    Ok(TransformState {
        position: Position {
            x: round_to(translation.x, 3),
            y: round_to(translation.y, 3),
            z: round_to(translation.z, 3),
        },
        rotation: Rotation {
            heading: angle(heading),
            pitch: angle(pitch),
            roll: angle(roll),
        },
        scale: Scale {
            x: snap_unit(scale.x),
            y: snap_unit(scale.y),
            z: snap_unit(scale.z),
        },
    })
}

/// Rebuild a model matrix from a [`TransformState`]
///
/// Inverse of [`decompose_transform`] up to rounding; the frame is taken at
/// the state's position.
pub fn recompose_transform(state: &TransformState, kind: FrameKind) -> Mat4 {
    let position = Vec3::new(state.position.x, state.position.y, state.position.z);
    let frame = local_frame(position, kind);
    let relative = Quat::from_euler(
        EulerRot::ZYX,
        state.rotation.heading.to_radians(),
        state.rotation.pitch.to_radians(),
        state.rotation.roll.to_radians(),
    );
    let rotation = Quat::from_mat3(&frame.rotation) * relative;
    Mat4::from_scale_rotation_translation(
        Vec3::new(state.scale.x, state.scale.y, state.scale.z),
        rotation,
        position,
    )
}

/// A plane through `origin` with unit `normal`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    pub origin: Vec3,
    pub normal: Vec3,
}

impl Plane {
    /// Returns `None` for a zero normal
    pub fn new(origin: Vec3, normal: Vec3) -> Option<Self> {
        Some(Self {
            origin,
            normal: normal.try_normalize()?,
        })
    }
}

/// Intersect a ray with a plane
///
/// Returns `None` when the ray is parallel to the plane or the plane lies
/// behind the ray origin.
pub fn ray_plane_intersection(ray: &Ray, plane: &Plane) -> Option<Vec3> {
    let denom = plane.normal.dot(ray.direction);
    if denom.abs() < PLANE_EPSILON {
        return None;
    }
    let t = (plane.origin - ray.origin).dot(plane.normal) / denom;
    if t >= 0.0 { Some(ray.at(t)) } else { None }
}

/// Check if a matrix contains only finite values (no NaN or infinity)
pub fn is_matrix_finite(matrix: &Mat4) -> bool {
    matrix.to_cols_array().iter().all(|x| x.is_finite())
}

/// Inverse of an affine placement, or `None` when it is singular
pub fn try_inverse(matrix: &Mat4) -> Option<Mat4> {
    let det = matrix.determinant();
    if !det.is_finite() || det.abs() < f64::EPSILON * f64::EPSILON {
        return None;
    }
    let inverse = matrix.inverse();
    is_matrix_finite(&inverse).then_some(inverse)
}
