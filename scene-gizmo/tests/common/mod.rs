//! Headless host used by the integration tests
//!
//! An orthographic camera at z = 10 looking down -Z: the pointer position
//! (x, y) is the world point (x, y) on every plane facing the camera, and
//! one handle-space unit is one world unit at the origin.
//!
//! [`MockViewer::above`] hovers the same camera over any local frame, with
//! the pointer axes along the frame's X and Y.

#![allow(dead_code)]

use parking_lot::Mutex;
use scene_gizmo::{
    local_frame, Camera, FrameKind, LocalFrame, Manipulable, Mat4, ObjectId, PointerEventKind,
    PrimitiveDesc, PrimitiveId, PrimitiveUpdate, Ray, Scene, SharedObject, SubscriptionId, Vec2,
    Vec3,
};
use std::collections::BTreeMap;
use std::sync::Arc;

pub const CAMERA_HEIGHT: f64 = 10.0;

#[derive(Debug)]
pub struct MockViewer {
    pub controls_enabled: bool,
    pub controls_disabled_count: usize,
    pub in_viewport: bool,
    pub highlight_supported: bool,
    pub highlighted: Option<ObjectId>,
    pub pick_result: Option<PrimitiveId>,
    pub primitives: BTreeMap<PrimitiveId, PrimitiveDesc>,
    pub updates: BTreeMap<PrimitiveId, PrimitiveUpdate>,
    pub subscriptions: BTreeMap<SubscriptionId, PointerEventKind>,
    /// Frame the pointer plane is laid out in
    pub view: LocalFrame,
    pub eye: Vec3,
    pub look: Vec3,
    pub screen_up: Vec3,
    next_id: u64,
}

impl Default for MockViewer {
    fn default() -> Self {
        Self {
            controls_enabled: true,
            controls_disabled_count: 0,
            in_viewport: true,
            highlight_supported: true,
            highlighted: None,
            pick_result: None,
            primitives: BTreeMap::new(),
            updates: BTreeMap::new(),
            subscriptions: BTreeMap::new(),
            view: local_frame(Vec3::ZERO, FrameKind::Cartesian),
            eye: Vec3::new(0.0, 0.0, CAMERA_HEIGHT),
            look: Vec3::NEG_Z,
            screen_up: Vec3::Y,
            next_id: 0,
        }
    }
}

impl MockViewer {
    pub fn without_highlight() -> Self {
        Self {
            highlight_supported: false,
            ..Self::default()
        }
    }

    /// Camera looking straight down the frame's Z axis at its origin
    ///
    /// The eye sits a hair off the axis, inside the frame's first XY
    /// quadrant, so the Z rotation wedge faces a known direction.
    pub fn above(view: LocalFrame) -> Self {
        let nudge = (view.axis(0) + view.axis(1)) * 0.01;
        Self {
            eye: view.origin + view.axis(2) * CAMERA_HEIGHT + nudge,
            look: -view.axis(2),
            screen_up: view.axis(1),
            view,
            ..Self::default()
        }
    }

    pub fn highlighted_primitives(&self) -> usize {
        self.updates
            .iter()
            .filter(|(id, u)| u.highlighted && self.primitives.contains_key(id))
            .count()
    }
}

impl Camera for MockViewer {
    fn pick_ray(&self, pointer: Vec2) -> Option<Ray> {
        let view = &self.view;
        let origin = view.origin
            + view.axis(0) * pointer.x
            + view.axis(1) * pointer.y
            + view.axis(2) * CAMERA_HEIGHT;
        self.in_viewport.then(|| Ray::new(origin, self.look))
    }

    fn position(&self) -> Vec3 {
        self.eye
    }

    fn direction(&self) -> Vec3 {
        self.look
    }

    fn up(&self) -> Vec3 {
        self.screen_up
    }

    fn pixel_size_at(&self, distance: f64) -> f64 {
        distance * 0.001
    }

    fn set_controls_enabled(&mut self, enabled: bool) {
        if !enabled {
            self.controls_disabled_count += 1;
        }
        self.controls_enabled = enabled;
    }
}

impl Scene for MockViewer {
    fn add_primitive(&mut self, desc: &PrimitiveDesc) -> PrimitiveId {
        self.next_id += 1;
        let id = PrimitiveId(self.next_id);
        self.primitives.insert(id, *desc);
        id
    }

    fn remove_primitive(&mut self, id: PrimitiveId) {
        self.primitives.remove(&id);
        self.updates.remove(&id);
    }

    fn update_primitive(&mut self, id: PrimitiveId, update: &PrimitiveUpdate) {
        self.updates.insert(id, *update);
    }

    fn pick(&self, _pointer: Vec2) -> Option<PrimitiveId> {
        self.pick_result
    }

    fn supports_highlight(&self) -> bool {
        self.highlight_supported
    }

    fn set_highlight(&mut self, object: Option<ObjectId>) {
        self.highlighted = object;
    }

    fn subscribe(&mut self, kind: PointerEventKind) -> SubscriptionId {
        self.next_id += 1;
        let id = SubscriptionId(self.next_id);
        self.subscriptions.insert(id, kind);
        id
    }

    fn unsubscribe(&mut self, id: SubscriptionId) {
        self.subscriptions.remove(&id);
    }
}

#[derive(Debug, Clone)]
pub struct MockObject {
    pub id: ObjectId,
    pub matrix: Mat4,
    pub editable: bool,
    pub writes: usize,
}

impl Manipulable for MockObject {
    fn id(&self) -> ObjectId {
        self.id
    }

    fn model_matrix(&self) -> Mat4 {
        self.matrix
    }

    fn set_model_matrix(&mut self, matrix: Mat4) {
        self.matrix = matrix;
        self.writes += 1;
    }

    fn bounding_center(&self) -> Vec3 {
        self.matrix.w_axis.truncate()
    }

    fn supports_transform(&self) -> bool {
        self.editable
    }
}

/// Typed handle for assertions plus the type-erased handle for the engine
pub fn object_at(id: u64, matrix: Mat4) -> (Arc<Mutex<MockObject>>, SharedObject) {
    let object = Arc::new(Mutex::new(MockObject {
        id: ObjectId(id),
        matrix,
        editable: true,
        writes: 0,
    }));
    let shared: SharedObject = object.clone();
    (object, shared)
}

pub fn tileset(id: u64) -> SharedObject {
    Arc::new(Mutex::new(MockObject {
        id: ObjectId(id),
        matrix: Mat4::IDENTITY,
        editable: false,
        writes: 0,
    }))
}

pub fn at(x: f64, y: f64) -> Vec2 {
    Vec2::new(x, y)
}

/// Route test logs through the same subscriber the demo uses
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
