//! Host collaborator interfaces
//!
//! The engine never renders or generates rays itself. The host viewer
//! supplies camera queries, owns the visual primitives and routes pointer
//! events; the bound object stays owned by the host and is shared with the
//! engine through [`SharedObject`].

use crate::types::{Axis, Color, Mat4, Ray, Vec2, Vec3};
use parking_lot::Mutex;
use std::sync::Arc;

/// Camera queries and control toggles
pub trait Camera {
    /// World-space pick ray through a pointer position, if the pointer is
    /// inside the viewport
    fn pick_ray(&self, pointer: Vec2) -> Option<Ray>;

    /// Camera position in world space
    fn position(&self) -> Vec3;

    /// Unit view direction in world space
    fn direction(&self) -> Vec3;

    /// Unit up vector in world space
    fn up(&self) -> Vec3;

    /// World size of one pixel at `distance` from the camera
    fn pixel_size_at(&self, distance: f64) -> f64;

    /// Enable or disable the camera's own rotate/pan controls
    fn set_controls_enabled(&mut self, enabled: bool);
}

/// Scene and renderer services
pub trait Scene {
    /// Create a visual primitive and return its id
    fn add_primitive(&mut self, desc: &PrimitiveDesc) -> PrimitiveId;

    /// Destroy a primitive previously returned by `add_primitive`
    fn remove_primitive(&mut self, id: PrimitiveId);

    /// Push the per-frame placement and display flags of a primitive
    fn update_primitive(&mut self, id: PrimitiveId, update: &PrimitiveUpdate);

    /// Object-level pick under the pointer
    fn pick(&self, pointer: Vec2) -> Option<PrimitiveId>;

    /// Whether the renderer can outline a selected object
    fn supports_highlight(&self) -> bool;

    /// Outline zero or one object
    fn set_highlight(&mut self, object: Option<ObjectId>);

    /// Route pointer events of `kind` to the engine
    fn subscribe(&mut self, kind: PointerEventKind) -> SubscriptionId;

    /// Stop routing events for a subscription
    fn unsubscribe(&mut self, id: SubscriptionId);
}

/// Everything the engine needs from its host
pub trait Viewer: Camera + Scene {}

impl<T: Camera + Scene> Viewer for T {}

/// The externally owned object being manipulated
pub trait Manipulable {
    /// Stable identity, used for selection highlighting
    fn id(&self) -> ObjectId;

    /// Current 4x4 model matrix
    fn model_matrix(&self) -> Mat4;

    /// Replace the model matrix
    fn set_model_matrix(&mut self, matrix: Mat4);

    /// World-space bounding sphere center
    fn bounding_center(&self) -> Vec3;

    /// Objects whose transform is not editable (e.g. streamed tiles) return false
    fn supports_transform(&self) -> bool {
        true
    }
}

/// Shared reference to a host-owned object
pub type SharedObject = Arc<Mutex<dyn Manipulable>>;

/// Host identity of a bound object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjectId(pub u64);

/// Host identity of a visual primitive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PrimitiveId(pub u64);

/// Host identity of an event subscription
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(pub u64);

/// Pointer event categories the engine listens to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerEventKind {
    Down,
    Move,
    Up,
}

/// A pointer event delivered by the host
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub kind: PointerEventKind,
    pub position: Vec2,
}

/// Part of a handle a primitive draws
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveRole {
    /// Axis line
    Shaft,
    /// Arrow head or scale cube at the end of an axis
    Tip,
    /// Filled plane square, center grip or rotation fan
    Face,
    /// Rotation arc
    Outline,
}

/// Composite key of a primitive within the active handle set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HandleKey {
    pub axis: Axis,
    pub role: PrimitiveRole,
}

/// Geometry of a primitive in unit handle space
///
/// The host builds the mesh; the engine only positions it through
/// [`PrimitiveUpdate::transform`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PrimitiveShape {
    /// Line from `start` to `end`, `width` pixels wide
    Line { start: Vec3, end: Vec3, width: f64 },
    /// Cone at `base` pointing along `direction`
    Arrow {
        base: Vec3,
        direction: Vec3,
        length: f64,
        radius: f64,
    },
    /// Axis-aligned box
    Cuboid { min: Vec3, max: Vec3 },
    /// Quarter-circle arc about `axis`, starting on its first in-plane axis
    Arc { axis: Axis, radius: f64, width: f64 },
    /// Filled quarter-circle fan about `axis`
    Fan { axis: Axis, radius: f64 },
}

/// Static description of a primitive
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PrimitiveDesc {
    pub key: HandleKey,
    pub shape: PrimitiveShape,
    pub color: Color,
}

/// Per-frame state of a primitive
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PrimitiveUpdate {
    /// Handle placement (handle space to world)
    pub transform: Mat4,
    pub visible: bool,
    pub highlighted: bool,
}
