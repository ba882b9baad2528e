//! Billboard and orientation updater
//!
//! Once per frame: size the handles to a constant on-screen length, place
//! them in the local frame at the object center and turn each rotation
//! wedge towards the camera in 90° steps.

use crate::config::GizmoConfig;
use crate::handles::HandleRegistry;
use crate::host::Camera;
use crate::math::{local_frame, snap_quadrant, LocalFrame};
use crate::types::{Axis, Handle, Mat4, Mode, Vec3};

/// Camera and object state sampled once per frame
///
/// Placement and drag math for the same frame read from one snapshot so
/// they never disagree.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewSnapshot {
    pub camera_position: Vec3,
    pub camera_direction: Vec3,
    pub camera_up: Vec3,
    pub center: Vec3,
    pub frame: LocalFrame,
    /// World length of one unit of handle space
    pub handle_scale: f64,
}

impl ViewSnapshot {
    /// Sample the camera around `center`
    ///
    /// Returns `None` when the camera reports an unusable pixel size.
    pub fn capture<C: Camera + ?Sized>(
        camera: &C,
        center: Vec3,
        config: &GizmoConfig,
    ) -> Option<Self> {
        let camera_position = camera.position();
        let distance = camera_position.distance(center);
        let handle_scale = camera.pixel_size_at(distance) * config.target_pixel_length;
        if !(handle_scale.is_finite() && handle_scale > 0.0) {
            crate::gizmo_trace!("unusable handle scale {} at distance {}", handle_scale, distance);
            return None;
        }
        Some(Self {
            camera_position,
            camera_direction: camera.direction(),
            camera_up: camera.up(),
            center,
            frame: local_frame(center, config.frame),
            handle_scale,
        })
    }

    /// Direction from the center to the camera, in frame coordinates
    pub fn camera_in_frame(&self) -> Vec3 {
        self.frame.to_local_vector(self.camera_position - self.center)
    }
}

/// Live scale edit folded into the handle display during a scale drag
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum ActiveScale {
    #[default]
    Identity,
    /// Factor applied along one principal axis
    Axis(Axis, f64),
    /// Factor applied to all axes
    Uniform(f64),
}

impl ActiveScale {
    /// Display stretch of the handle on `axis`
    pub fn stretch(&self, axis: Axis) -> Vec3 {
        match *self {
            ActiveScale::Identity => Vec3::ONE,
            ActiveScale::Uniform(f) => Vec3::splat(f),
            ActiveScale::Axis(active, f) if active == axis => match axis.index() {
                Some(i) => {
                    let mut v = Vec3::ONE;
                    v[i] = f;
                    v
                }
                None => Vec3::ONE,
            },
            ActiveScale::Axis(..) => Vec3::ONE,
        }
    }
}

/// Snapped wedge angle of a rotation handle
///
/// Projects the camera direction onto the handle's plane and snaps the
/// atan2 angle down to a multiple of 90°.
pub fn quadrant_angle(axis: Axis, camera_in_frame: Vec3) -> f64 {
    let Some((u, v)) = axis.plane_coords() else {
        return 0.0;
    };
    snap_quadrant(camera_in_frame[v].atan2(camera_in_frame[u]))
}

/// Mode-specific orientation of a handle within the scaled local frame
pub fn handle_orientation(handle: &Handle, snapshot: &ViewSnapshot) -> Mat4 {
    match (handle.mode, handle.axis.unit()) {
        (Mode::Rotate, Some(unit)) => {
            let angle = quadrant_angle(handle.axis, snapshot.camera_in_frame());
            Mat4::from_axis_angle(unit, angle)
        }
        _ => Mat4::IDENTITY,
    }
}

/// `frame(center) · scale · orientation` for one handle
pub fn handle_placement(handle: &Handle, snapshot: &ViewSnapshot, active: ActiveScale) -> Mat4 {
    let scale = Vec3::splat(snapshot.handle_scale) * active.stretch(handle.axis);
    snapshot.frame.to_mat4() * Mat4::from_scale(scale) * handle_orientation(handle, snapshot)
}

/// Re-place every handle for this frame
pub fn update_placements(
    registry: &mut HandleRegistry,
    snapshot: &ViewSnapshot,
    active: ActiveScale,
) {
    for entry in registry.entries_mut() {
        entry.placement = handle_placement(&entry.handle, snapshot, active);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::FrameKind;
    use crate::types::{Ray, Vec2};
    use approx::assert_relative_eq;
    use std::f64::consts::FRAC_PI_2;

    struct FixedCamera {
        position: Vec3,
    }

    impl Camera for FixedCamera {
        fn pick_ray(&self, _pointer: Vec2) -> Option<Ray> {
            None
        }
        fn position(&self) -> Vec3 {
            self.position
        }
        fn direction(&self) -> Vec3 {
            (-self.position).normalize_or_zero()
        }
        fn up(&self) -> Vec3 {
            Vec3::Y
        }
        fn pixel_size_at(&self, distance: f64) -> f64 {
            distance * 0.001
        }
        fn set_controls_enabled(&mut self, _enabled: bool) {}
    }

    fn config() -> GizmoConfig {
        GizmoConfig::default().frame(FrameKind::Cartesian)
    }

    #[test]
    fn test_handle_scale_tracks_distance() {
        let camera_at = |height: f64| FixedCamera {
            position: Vec3::new(0.0, 0.0, height),
        };
        let near = ViewSnapshot::capture(&camera_at(10.0), Vec3::ZERO, &config()).unwrap();
        let far = ViewSnapshot::capture(&camera_at(40.0), Vec3::ZERO, &config()).unwrap();
        assert_relative_eq!(near.handle_scale, 1.0, epsilon = 1e-5);
        assert_relative_eq!(far.handle_scale, 4.0, epsilon = 1e-5);
    }

    #[test]
    fn test_zero_pixel_size_is_rejected() {
        // Camera sitting on the center reports a zero pixel size
        let camera = FixedCamera { position: Vec3::ZERO };
        assert!(ViewSnapshot::capture(&camera, Vec3::ZERO, &config()).is_none());
    }

    #[test]
    fn test_quadrant_piecewise_constant() {
        for degrees in [0.0f64, 30.0, 60.0, 89.0] {
            let (s, c) = degrees.to_radians().sin_cos();
            assert_eq!(quadrant_angle(Axis::Z, Vec3::new(c, s, 0.0)), 0.0);
        }
        assert_relative_eq!(quadrant_angle(Axis::Z, Vec3::new(0.0, 1.0, 0.0)), FRAC_PI_2);
        assert_relative_eq!(quadrant_angle(Axis::Z, Vec3::new(-1.0, 0.5, 0.0)), FRAC_PI_2);
        assert_relative_eq!(quadrant_angle(Axis::Z, Vec3::new(-1.0, -0.5, 0.0)), -2.0 * FRAC_PI_2);

        let dir = Vec3::new(0.3, -0.8, 0.2);
        assert_eq!(quadrant_angle(Axis::X, dir), quadrant_angle(Axis::X, dir));
    }

    #[test]
    fn test_rotation_wedge_faces_camera() {
        let camera = FixedCamera {
            position: Vec3::new(-5.0, -5.0, 5.0),
        };
        let snapshot = ViewSnapshot::capture(&camera, Vec3::ZERO, &config()).unwrap();
        let handle = Handle::new(Axis::Z, Mode::Rotate);
        let placement = handle_placement(&handle, &snapshot, ActiveScale::Identity);
        // The wedge bisector (1,1,0) in handle space must point at the camera's side
        let bisector = placement.transform_vector3(Vec3::new(1.0, 1.0, 0.0));
        assert!(bisector.x < 0.0 && bisector.y < 0.0);
    }

    #[test]
    fn test_translate_handles_are_not_rotated() {
        let camera = FixedCamera {
            position: Vec3::new(-5.0, -5.0, 5.0),
        };
        let snapshot = ViewSnapshot::capture(&camera, Vec3::new(1.0, 2.0, 3.0), &config()).unwrap();
        let handle = Handle::new(Axis::X, Mode::Translate);
        let placement = handle_placement(&handle, &snapshot, ActiveScale::Identity);
        let tip = placement.transform_point3(Vec3::X);
        let expected = Vec3::new(1.0, 2.0, 3.0) + Vec3::X * snapshot.handle_scale;
        assert_relative_eq!(tip.x, expected.x, epsilon = 1e-4);
        assert_relative_eq!(tip.y, expected.y, epsilon = 1e-4);
    }

    #[test]
    fn test_active_scale_stretches_only_its_axis() {
        let active = ActiveScale::Axis(Axis::Y, 2.0);
        assert_eq!(active.stretch(Axis::Y), Vec3::new(1.0, 2.0, 1.0));
        assert_eq!(active.stretch(Axis::X), Vec3::ONE);
        assert_eq!(active.stretch(Axis::Center), Vec3::ONE);
        assert_eq!(ActiveScale::Uniform(0.5).stretch(Axis::Center), Vec3::splat(0.5));
    }
}
