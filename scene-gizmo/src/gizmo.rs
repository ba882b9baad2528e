//! The gizmo engine
//!
//! Owns the handle registry, the idle → hover → dragging state machine and
//! the event subscriptions registered with the host. The bound object stays
//! owned by the host; only an active drag writes its model matrix.

use crate::config::GizmoConfig;
use crate::drag::DragSession;
use crate::handles::HandleRegistry;
use crate::host::{PointerEvent, PointerEventKind, SharedObject, SubscriptionId, Viewer};
use crate::math::{decompose_transform, is_matrix_finite, local_frame};
use crate::orientation::{update_placements, ActiveScale, ViewSnapshot};
use crate::picking::resolve_handle;
use crate::types::{Handle, Mode, TransformState, Vec2};
use crate::{GizmoError, GizmoResult};

/// Callback fired with the decoded transform after a bind and after every
/// applied drag tick
pub type UpdateCallback = Box<dyn FnMut(&TransformState)>;

#[derive(Debug, Default)]
enum Interaction {
    #[default]
    Idle,
    Hovering(Handle),
    Dragging(DragSession),
}

/// Translate/rotate/scale gizmo bound to at most one host object
pub struct TransformGizmo<V: Viewer> {
    viewer: V,
    config: GizmoConfig,
    object: Option<SharedObject>,
    registry: HandleRegistry,
    interaction: Interaction,
    snapshot: Option<ViewSnapshot>,
    on_update: Option<UpdateCallback>,
    subscriptions: Vec<(PointerEventKind, SubscriptionId)>,
    highlight_available: bool,
    destroyed: bool,
}

impl<V: Viewer> TransformGizmo<V> {
    /// Create the engine, subscribe to pointer events and bind `initial`
    ///
    /// An initial object that cannot be manipulated is logged and left
    /// unbound.
    pub fn new(
        mut viewer: V,
        config: GizmoConfig,
        initial: Option<SharedObject>,
    ) -> GizmoResult<Self> {
        config.validate()?;

        let subscriptions = [PointerEventKind::Down, PointerEventKind::Move, PointerEventKind::Up]
            .into_iter()
            .map(|kind| (kind, viewer.subscribe(kind)))
            .collect();

        let highlight_available = config.highlight_selection && viewer.supports_highlight();
        if config.highlight_selection && !highlight_available {
            crate::gizmo_warn!("scene cannot outline objects; selection highlighting disabled");
        }

        let mut gizmo = Self {
            viewer,
            config,
            object: None,
            registry: HandleRegistry::new(),
            interaction: Interaction::Idle,
            snapshot: None,
            on_update: None,
            subscriptions,
            highlight_available,
            destroyed: false,
        };
        if initial.is_some()
            && let Err(_err) = gizmo.bind(initial)
        {
            crate::gizmo_warn!("initial object not bound: {}", _err);
        }
        Ok(gizmo)
    }

    pub fn viewer(&self) -> &V {
        &self.viewer
    }

    pub fn viewer_mut(&mut self) -> &mut V {
        &mut self.viewer
    }

    pub fn config(&self) -> &GizmoConfig {
        &self.config
    }

    pub fn mode(&self) -> Mode {
        self.config.mode
    }

    pub fn bound_object(&self) -> Option<&SharedObject> {
        self.object.as_ref()
    }

    /// Active handle set (empty while unbound)
    pub fn handles(&self) -> Vec<Handle> {
        self.registry.handles()
    }

    pub fn registry(&self) -> &HandleRegistry {
        &self.registry
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.interaction, Interaction::Dragging(_))
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    pub fn hovered_handle(&self) -> Option<Handle> {
        match self.interaction {
            Interaction::Hovering(handle) => Some(handle),
            _ => None,
        }
    }

    pub fn active_handle(&self) -> Option<Handle> {
        match &self.interaction {
            Interaction::Dragging(session) => Some(session.handle),
            _ => None,
        }
    }

    /// Register the update callback, replacing any previous one
    pub fn on_update(&mut self, callback: impl FnMut(&TransformState) + 'static) {
        self.on_update = Some(Box::new(callback));
    }

    /// Set or clear the manipulated object
    ///
    /// Any drag in progress is cancelled and all engine state is reset.
    /// Objects that do not support transforms are rejected and leave the
    /// engine unbound.
    pub fn bind(&mut self, object: Option<SharedObject>) -> GizmoResult<()> {
        if self.destroyed {
            return Err(GizmoError::Destroyed);
        }
        self.reset();

        let Some(object) = object else {
            crate::gizmo_debug!("gizmo detached");
            return Ok(());
        };

        let (supported, id) = {
            let guard = object.lock();
            (guard.supports_transform(), guard.id())
        };
        if !supported {
            return Err(GizmoError::unsupported_object(format!(
                "object {:?} does not support transforms",
                id
            )));
        }

        self.object = Some(object);
        self.registry.rebuild(self.config.mode, &self.config, &mut self.viewer);
        self.registry.set_visible(true);
        if self.highlight_available {
            self.viewer.set_highlight(Some(id));
        }
        crate::gizmo_debug!("bound object {:?} in {:?} mode", id, self.config.mode);

        self.update_frame();
        self.emit_update();
        Ok(())
    }

    /// Clear the bound object; equivalent to `bind(None)`
    pub fn detach(&mut self) {
        if !self.destroyed {
            self.reset();
        }
    }

    /// Switch the editing mode and rebuild the handles
    pub fn set_mode(&mut self, mode: Mode) {
        if self.destroyed {
            return;
        }
        self.cancel_drag();
        self.interaction = Interaction::Idle;
        self.config.mode = mode;
        self.rebuild_handles();
        crate::gizmo_debug!("mode set to {:?}", mode);
    }

    /// Change the rendered axis width; rebuilds the handles
    pub fn set_axis_width(&mut self, axis_width: f64) -> GizmoResult<()> {
        let config = self.config.axis_width(axis_width);
        config.validate()?;
        self.cancel_drag();
        self.interaction = Interaction::Idle;
        self.config = config;
        if !self.destroyed {
            self.rebuild_handles();
        }
        Ok(())
    }

    /// Decoded transform of the bound object
    pub fn transform_state(&self) -> Option<TransformState> {
        let matrix = self.object.as_ref()?.lock().model_matrix();
        let frame = local_frame(matrix.w_axis.truncate(), self.config.frame);
        match decompose_transform(&matrix, &frame) {
            Ok(state) => Some(state),
            Err(_err) => {
                crate::gizmo_debug!("transform state unavailable: {}", _err);
                None
            }
        }
    }

    /// Per-frame update: resize, re-place and re-orient every handle
    pub fn update_frame(&mut self) {
        if self.destroyed {
            return;
        }
        let Some(center) = self.object.as_ref().map(|o| o.lock().bounding_center()) else {
            return;
        };
        let Some(snapshot) = ViewSnapshot::capture(&self.viewer, center, &self.config) else {
            return;
        };
        self.snapshot = Some(snapshot);
        self.place_handles();
    }

    /// Dispatch a host pointer event if its subscription is live
    pub fn handle_event(&mut self, event: PointerEvent) {
        if !self.subscriptions.iter().any(|(kind, _)| *kind == event.kind) {
            return;
        }
        match event.kind {
            PointerEventKind::Down => self.pointer_down(event.position),
            PointerEventKind::Move => self.pointer_move(event.position),
            PointerEventKind::Up => self.pointer_up(event.position),
        }
    }

    /// Start a drag if a draggable handle is under the pointer
    pub fn pointer_down(&mut self, position: Vec2) {
        if self.destroyed || self.is_dragging() {
            return;
        }
        let Some(object) = self.object.clone() else {
            return;
        };
        let Some(ray) = self.viewer.pick_ray(position) else {
            return;
        };
        let fallback = self.viewer.pick(position);
        let Some(handle) = resolve_handle(&self.registry, Some(&ray), fallback) else {
            return;
        };
        if !handle.is_draggable(self.config.mode) {
            crate::gizmo_trace!("{} is not draggable in {:?}", handle.name, self.config.mode);
            return;
        }
        let snapshot = match self.snapshot {
            Some(snapshot) => snapshot,
            None => {
                let center = object.lock().bounding_center();
                match ViewSnapshot::capture(&self.viewer, center, &self.config) {
                    Some(snapshot) => snapshot,
                    None => return,
                }
            }
        };
        let initial = object.lock().model_matrix();
        let Some(session) = DragSession::begin(handle, &ray, &snapshot, initial) else {
            crate::gizmo_trace!("drag plane of {} not reachable from pointer", handle.name);
            return;
        };

        self.viewer.set_controls_enabled(false);
        self.interaction = Interaction::Dragging(session);
        self.registry.set_highlighted(Some(handle.axis));
        self.registry.push_updates(&mut self.viewer);
        crate::gizmo_debug!("drag started on {}", handle.name);
    }

    /// Hover while idle, apply the drag while dragging
    pub fn pointer_move(&mut self, position: Vec2) {
        if self.destroyed {
            return;
        }
        let Some(object) = self.object.clone() else {
            return;
        };
        let ray = self.viewer.pick_ray(position);

        if let Interaction::Dragging(session) = &mut self.interaction {
            let Some(ray) = ray else {
                return;
            };
            let Some(matrix) = session.drag_to(&ray) else {
                crate::gizmo_trace!("drag tick skipped");
                return;
            };
            if !is_matrix_finite(&matrix) {
                crate::gizmo_trace!("drag tick produced a non-finite matrix");
                return;
            }
            object.lock().set_model_matrix(matrix);
            self.emit_update();
            return;
        }

        let fallback = self.viewer.pick(position);
        let hovered = resolve_handle(&self.registry, ray.as_ref(), fallback);
        let changed = self.hovered_handle() != hovered;
        self.interaction = match hovered {
            Some(handle) => Interaction::Hovering(handle),
            None => Interaction::Idle,
        };
        if changed {
            self.registry.set_highlighted(hovered.map(|h| h.axis));
            self.registry.push_updates(&mut self.viewer);
        }
    }

    /// Finish the drag
    pub fn pointer_up(&mut self, _position: Vec2) {
        if let Interaction::Dragging(_session) = std::mem::take(&mut self.interaction) {
            crate::gizmo_debug!("drag finished on {}", _session.handle.name);
            self.finish_drag();
        }
    }

    /// Release every owned resource and subscription; idempotent
    pub fn destroy(&mut self) {
        if self.destroyed {
            return;
        }
        self.reset();
        for (_, id) in self.subscriptions.drain(..) {
            self.viewer.unsubscribe(id);
        }
        self.on_update = None;
        self.destroyed = true;
        crate::gizmo_debug!("gizmo destroyed");
    }

    fn emit_update(&mut self) {
        let Some(state) = self.transform_state() else {
            return;
        };
        if let Some(callback) = self.on_update.as_mut() {
            callback(&state);
        }
    }

    fn rebuild_handles(&mut self) {
        if self.object.is_none() {
            self.registry.clear(&mut self.viewer);
            return;
        }
        self.registry.rebuild(self.config.mode, &self.config, &mut self.viewer);
        self.registry.set_visible(true);
        self.update_frame();
    }

    fn place_handles(&mut self) {
        let Some(snapshot) = self.snapshot else {
            return;
        };
        let active = match &self.interaction {
            Interaction::Dragging(session) if session.handle.mode == Mode::Scale => {
                session.active_scale
            }
            _ => ActiveScale::Identity,
        };
        update_placements(&mut self.registry, &snapshot, active);
        self.registry.push_updates(&mut self.viewer);
    }

    /// Force-exit a drag, restoring camera controls
    fn cancel_drag(&mut self) {
        if let Interaction::Dragging(_session) = std::mem::take(&mut self.interaction) {
            crate::gizmo_info!("drag on {} cancelled", _session.handle.name);
            self.finish_drag();
        }
    }

    fn finish_drag(&mut self) {
        self.viewer.set_controls_enabled(true);
        self.registry.set_highlighted(None);
        self.place_handles();
    }

    /// Drop the object, handles and all interaction state
    fn reset(&mut self) {
        self.cancel_drag();
        self.interaction = Interaction::Idle;
        self.registry.clear(&mut self.viewer);
        self.snapshot = None;
        if self.object.take().is_some() && self.highlight_available {
            self.viewer.set_highlight(None);
        }
    }
}

impl<V: Viewer> Drop for TransformGizmo<V> {
    fn drop(&mut self) {
        self.destroy();
    }
}
