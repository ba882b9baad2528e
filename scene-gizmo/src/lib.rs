//! # scene-gizmo
//!
//! Interaction engine for a translate/rotate/scale manipulation gizmo in a
//! 3D scene viewer.
//!
//! The engine owns the handle geometry and the pointer state machine. The
//! host supplies the camera, the renderer primitives and the object being
//! edited through the traits in [`host`]:
//!
//! - per-frame, [`TransformGizmo::update_frame`] sizes the handles to a
//!   constant on-screen length and turns the rotation wedges towards the
//!   camera
//! - pointer events pick a handle by ray-casting against invisible colliders
//!   and drive a drag that rewrites the object's model matrix
//! - after every applied drag tick the decoded [`TransformState`] is passed to
//!   the update callback
//!
//! ```no_run
//! use scene_gizmo::{GizmoConfig, Mode, SharedObject, TransformGizmo, Viewer};
//!
//! fn attach<V: Viewer>(
//!     viewer: V,
//!     object: SharedObject,
//! ) -> scene_gizmo::GizmoResult<TransformGizmo<V>> {
//!     let config = GizmoConfig::default().mode(Mode::Rotate);
//!     let mut gizmo = TransformGizmo::new(viewer, config, Some(object))?;
//!     gizmo.on_update(|state| println!("heading {}", state.rotation.heading));
//!     Ok(gizmo)
//! }
//! ```

pub mod collider;
pub mod config;
pub mod drag;
pub mod error;
pub mod gizmo;
pub mod handles;
pub mod host;
pub mod math;
pub mod orientation;
pub mod picking;
pub mod types;

pub use config::GizmoConfig;
pub use error::{GizmoError, GizmoResult};
pub use gizmo::{TransformGizmo, UpdateCallback};
pub use handles::{HandleEntry, HandleRegistry};
pub use host::{
    Camera, HandleKey, Manipulable, ObjectId, PointerEvent, PointerEventKind, PrimitiveDesc,
    PrimitiveId, PrimitiveRole, PrimitiveShape, PrimitiveUpdate, Scene, SharedObject,
    SubscriptionId, Viewer,
};
pub use math::{
    decompose_transform, local_frame, recompose_transform, Ellipsoid, FrameKind, LocalFrame,
};
pub use picking::{pick_handle, PickHit};
pub use types::{
    colors, constants, Axis, AxisFlags, Color, Handle, Mat3, Mat4, Mode, Position, Quat, Ray,
    Rotation, Scale, TransformState, Vec2, Vec3,
};

/// Re-export glam for hosts that build matrices and rays
pub use glam;
