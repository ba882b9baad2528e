//! Headless walkthrough of the three editing modes
//!
//! Run with `RUST_LOG=scene_gizmo=debug cargo run -p scene-gizmo --example headless_drag`
//! to see the engine's log output.

use parking_lot::Mutex;
use scene_gizmo::{
    Camera, FrameKind, GizmoConfig, Manipulable, Mat4, Mode, ObjectId, PointerEventKind,
    PrimitiveDesc, PrimitiveId, PrimitiveUpdate, Ray, Scene, SharedObject, SubscriptionId,
    TransformGizmo, Vec2, Vec3,
};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Orthographic top-down viewer that keeps no scene at all
#[derive(Default)]
struct TopDownViewer {
    next_id: u64,
    primitives: usize,
}

impl Camera for TopDownViewer {
    fn pick_ray(&self, pointer: Vec2) -> Option<Ray> {
        Some(Ray::new(pointer.extend(10.0), Vec3::NEG_Z))
    }

    fn position(&self) -> Vec3 {
        Vec3::new(0.0, 0.0, 10.0)
    }

    fn direction(&self) -> Vec3 {
        Vec3::NEG_Z
    }

    fn up(&self) -> Vec3 {
        Vec3::Y
    }

    fn pixel_size_at(&self, distance: f64) -> f64 {
        distance * 0.001
    }

    fn set_controls_enabled(&mut self, enabled: bool) {
        tracing::info!(enabled, "camera controls");
    }
}

impl Scene for TopDownViewer {
    fn add_primitive(&mut self, _desc: &PrimitiveDesc) -> PrimitiveId {
        self.next_id += 1;
        self.primitives += 1;
        PrimitiveId(self.next_id)
    }

    fn remove_primitive(&mut self, _id: PrimitiveId) {
        self.primitives -= 1;
    }

    fn update_primitive(&mut self, _id: PrimitiveId, _update: &PrimitiveUpdate) {}

    fn pick(&self, _pointer: Vec2) -> Option<PrimitiveId> {
        None
    }

    fn supports_highlight(&self) -> bool {
        false
    }

    fn set_highlight(&mut self, _object: Option<ObjectId>) {}

    fn subscribe(&mut self, _kind: PointerEventKind) -> SubscriptionId {
        self.next_id += 1;
        SubscriptionId(self.next_id)
    }

    fn unsubscribe(&mut self, _id: SubscriptionId) {}
}

struct Model {
    matrix: Mat4,
}

impl Manipulable for Model {
    fn id(&self) -> ObjectId {
        ObjectId(1)
    }

    fn model_matrix(&self) -> Mat4 {
        self.matrix
    }

    fn set_model_matrix(&mut self, matrix: Mat4) {
        self.matrix = matrix;
    }

    fn bounding_center(&self) -> Vec3 {
        self.matrix.w_axis.truncate()
    }
}

fn drag(gizmo: &mut TransformGizmo<TopDownViewer>, from: Vec2, to: Vec2) {
    gizmo.update_frame();
    gizmo.pointer_down(from);
    for step in 1..=4 {
        gizmo.pointer_move(from.lerp(to, step as f64 / 4.0));
        gizmo.update_frame();
    }
    gizmo.pointer_up(to);
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let model: SharedObject = Arc::new(Mutex::new(Model { matrix: Mat4::IDENTITY }));
    let config = GizmoConfig::default().frame(FrameKind::Cartesian);
    let mut gizmo = TransformGizmo::new(TopDownViewer::default(), config, Some(model))?;
    gizmo.on_update(|state| {
        tracing::info!(
            position = ?state.position,
            rotation = ?state.rotation,
            scale = ?state.scale,
            "transform updated"
        );
    });

    drag(&mut gizmo, Vec2::new(0.6, 0.0), Vec2::new(2.6, 0.0));

    gizmo.set_mode(Mode::Rotate);
    // The gizmo now sits at x = 2
    drag(&mut gizmo, Vec2::new(2.9, 0.0), Vec2::new(2.0, 0.9));

    gizmo.set_mode(Mode::Scale);
    drag(&mut gizmo, Vec2::new(2.0, 0.6), Vec2::new(2.0, 1.1));

    if let Some(state) = gizmo.transform_state() {
        println!("{state:#?}");
    }
    println!("live primitives: {}", gizmo.viewer().primitives);
    gizmo.destroy();
    println!("after destroy: {}", gizmo.viewer().primitives);
    Ok(())
}
