//! Handle and collider registry
//!
//! Builds the complete handle set of a mode, keeps one collider per handle
//! and owns the arena mapping `(axis, role)` keys to host primitives.

use crate::collider::{Aabb, Collider, Sector};
use crate::config::GizmoConfig;
use crate::host::{
    HandleKey, PrimitiveDesc, PrimitiveId, PrimitiveRole, PrimitiveShape, PrimitiveUpdate, Scene,
};
use crate::types::{colors, constants, Axis, Color, Handle, Mat4, Mode, Vec3};
use std::collections::HashMap;

/// One handle of the active mode with its collider and live placement
#[derive(Debug, Clone, PartialEq)]
pub struct HandleEntry {
    pub handle: Handle,
    pub collider: Collider,
    /// Handle space to world, written by the orientation updater
    pub placement: Mat4,
    pub visible: bool,
    pub highlighted: bool,
}

/// Static layout of one handle before it is registered with the host
#[derive(Debug, Clone, PartialEq)]
pub struct HandleSpec {
    pub handle: Handle,
    pub collider: Collider,
    pub primitives: Vec<PrimitiveDesc>,
}

/// Registry of the active handle set
#[derive(Debug, Default)]
pub struct HandleRegistry {
    mode: Option<Mode>,
    entries: Vec<HandleEntry>,
    primitives: Vec<(HandleKey, PrimitiveId)>,
    by_key: HashMap<HandleKey, usize>,
    by_primitive: HashMap<PrimitiveId, usize>,
}

impl HandleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mode the current set was built for, `None` when empty
    pub fn mode(&self) -> Option<Mode> {
        self.mode
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[HandleEntry] {
        &self.entries
    }

    pub(crate) fn entries_mut(&mut self) -> &mut [HandleEntry] {
        &mut self.entries
    }

    /// Handles of the active set
    pub fn handles(&self) -> Vec<Handle> {
        self.entries.iter().map(|e| e.handle).collect()
    }

    pub fn entry(&self, axis: Axis) -> Option<&HandleEntry> {
        self.entries.iter().find(|e| e.handle.axis == axis)
    }

    /// Host primitive registered under `key`
    pub fn primitive(&self, key: HandleKey) -> Option<PrimitiveId> {
        self.by_key.get(&key).map(|&i| self.primitives[i].1)
    }

    /// Number of live host primitives
    pub fn primitive_count(&self) -> usize {
        self.primitives.len()
    }

    /// Handle owning a host primitive, used for the object-level pick fallback
    pub fn handle_for_primitive(&self, id: PrimitiveId) -> Option<Handle> {
        let &index = self.by_primitive.get(&id)?;
        let axis = self.primitives[index].0.axis;
        self.entry(axis).map(|e| e.handle)
    }

    /// Replace the handle set with the one for `mode`
    ///
    /// Always clears first, so calling it twice yields the same set as once.
    pub fn rebuild<S: Scene + ?Sized>(&mut self, mode: Mode, config: &GizmoConfig, scene: &mut S) {
        self.clear(scene);
        for spec in handle_specs(mode, config) {
            for desc in &spec.primitives {
                let id = scene.add_primitive(desc);
                let index = self.primitives.len();
                self.primitives.push((desc.key, id));
                self.by_key.insert(desc.key, index);
                self.by_primitive.insert(id, index);
            }
            self.entries.push(HandleEntry {
                handle: spec.handle,
                collider: spec.collider,
                placement: Mat4::IDENTITY,
                visible: false,
                highlighted: false,
            });
        }
        self.mode = Some(mode);
        crate::gizmo_debug!(
            "rebuilt {} handles ({} primitives) for {:?}",
            self.entries.len(),
            self.primitives.len(),
            mode
        );
    }

    /// Remove every handle and host primitive
    pub fn clear<S: Scene + ?Sized>(&mut self, scene: &mut S) {
        for (_, id) in self.primitives.drain(..) {
            scene.remove_primitive(id);
        }
        self.entries.clear();
        self.by_key.clear();
        self.by_primitive.clear();
        self.mode = None;
    }

    pub fn set_visible(&mut self, visible: bool) {
        for entry in &mut self.entries {
            entry.visible = visible;
        }
    }

    /// Highlight at most one handle
    pub fn set_highlighted(&mut self, axis: Option<Axis>) {
        for entry in &mut self.entries {
            entry.highlighted = Some(entry.handle.axis) == axis;
        }
    }

    /// Push placements and flags of every primitive to the host
    pub fn push_updates<S: Scene + ?Sized>(&self, scene: &mut S) {
        for (key, id) in &self.primitives {
            if let Some(entry) = self.entry(key.axis) {
                scene.update_primitive(
                    *id,
                    &PrimitiveUpdate {
                        transform: entry.placement,
                        visible: entry.visible,
                        highlighted: entry.highlighted,
                    },
                );
            }
        }
    }
}

/// Complete handle layout of `mode`
pub fn handle_specs(mode: Mode, config: &GizmoConfig) -> Vec<HandleSpec> {
    let half_width = config.axis_half_width();
    let mut specs = Vec::new();
    match mode {
        Mode::Translate => {
            for axis in Axis::PRINCIPAL {
                let dir = axis.unit().unwrap_or(Vec3::X);
                specs.push(HandleSpec {
                    handle: Handle::new(axis, mode),
                    collider: Collider::Box(axis_prism(axis, half_width)),
                    primitives: vec![
                        desc(axis, PrimitiveRole::Shaft, PrimitiveShape::Line {
                            start: dir * constants::AXIS_STANDOFF,
                            end: dir * constants::AXIS_LENGTH,
                            width: config.axis_width,
                        }),
                        desc(axis, PrimitiveRole::Tip, PrimitiveShape::Arrow {
                            base: dir * constants::AXIS_LENGTH,
                            direction: dir,
                            length: 0.15,
                            radius: 0.05,
                        }),
                    ],
                });
            }
            for axis in Axis::PLANES {
                let square = plane_square(axis, half_width);
                specs.push(HandleSpec {
                    handle: Handle::new(axis, mode),
                    collider: Collider::Box(square),
                    primitives: vec![desc(axis, PrimitiveRole::Face, PrimitiveShape::Cuboid {
                        min: square.min,
                        max: square.max,
                    })],
                });
            }
            specs.push(center_spec(mode));
        }
        Mode::Rotate => {
            for axis in Axis::PRINCIPAL {
                specs.push(HandleSpec {
                    handle: Handle::new(axis, mode),
                    collider: Collider::Sector(Sector {
                        axis,
                        outer_radius: constants::ROTATE_RADIUS + constants::ROTATE_TUBE,
                        half_thickness: constants::ROTATE_TUBE,
                        tolerance: constants::SECTOR_TOLERANCE,
                    }),
                    primitives: vec![
                        desc(axis, PrimitiveRole::Outline, PrimitiveShape::Arc {
                            axis,
                            radius: constants::ROTATE_RADIUS,
                            width: config.axis_width,
                        }),
                        desc(axis, PrimitiveRole::Face, PrimitiveShape::Fan {
                            axis,
                            radius: constants::ROTATE_RADIUS,
                        }),
                    ],
                });
            }
        }
        Mode::Scale => {
            for axis in Axis::PRINCIPAL {
                let dir = axis.unit().unwrap_or(Vec3::X);
                let tip = dir * constants::AXIS_LENGTH;
                specs.push(HandleSpec {
                    handle: Handle::new(axis, mode),
                    collider: Collider::Box(axis_prism(axis, half_width)),
                    primitives: vec![
                        desc(axis, PrimitiveRole::Shaft, PrimitiveShape::Line {
                            start: dir * constants::AXIS_STANDOFF,
                            end: tip,
                            width: config.axis_width,
                        }),
                        desc(axis, PrimitiveRole::Tip, PrimitiveShape::Cuboid {
                            min: tip - Vec3::splat(0.05),
                            max: tip + Vec3::splat(0.05),
                        }),
                    ],
                });
            }
            specs.push(center_spec(mode));
        }
    }
    specs
}

fn center_spec(mode: Mode) -> HandleSpec {
    let cube = Aabb::cube(constants::CENTER_HALF_EXTENT);
    HandleSpec {
        handle: Handle::new(Axis::Center, mode),
        collider: Collider::Box(cube),
        primitives: vec![desc(Axis::Center, PrimitiveRole::Face, PrimitiveShape::Cuboid {
            min: cube.min,
            max: cube.max,
        })],
    }
}

/// Thin prism along a principal axis, starting past the center grip
fn axis_prism(axis: Axis, half_width: f64) -> Aabb {
    let i = axis.index().unwrap_or(0);
    let mut min = Vec3::splat(-half_width);
    let mut max = Vec3::splat(half_width);
    min[i] = constants::AXIS_STANDOFF;
    max[i] = constants::AXIS_LENGTH;
    Aabb::new(min, max)
}

/// Thin square in a coordinate plane
fn plane_square(axis: Axis, half_width: f64) -> Aabb {
    let mut min = Vec3::splat(-half_width);
    let mut max = Vec3::splat(half_width);
    for i in axis.flags().indices() {
        min[i] = constants::PLANE_MIN;
        max[i] = constants::PLANE_MAX;
    }
    Aabb::new(min, max)
}

fn desc(axis: Axis, role: PrimitiveRole, shape: PrimitiveShape) -> PrimitiveDesc {
    PrimitiveDesc {
        key: HandleKey { axis, role },
        shape,
        color: axis_color(axis),
    }
}

fn axis_color(axis: Axis) -> Color {
    let translucent = |c: Color| [c[0], c[1], c[2], colors::PLANE_ALPHA];
    match axis {
        Axis::X => colors::RED,
        Axis::Y => colors::GREEN,
        Axis::Z => colors::BLUE,
        Axis::YZ => translucent(colors::RED),
        Axis::ZX => translucent(colors::GREEN),
        Axis::XY => translucent(colors::BLUE),
        Axis::Center => colors::WHITE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{ObjectId, PointerEventKind, SubscriptionId};
    use crate::types::Vec2;
    use pretty_assertions::assert_eq;
    use std::collections::BTreeSet;

    #[derive(Default)]
    struct RecordingScene {
        next: u64,
        live: BTreeSet<PrimitiveId>,
        updates: usize,
    }

    impl Scene for RecordingScene {
        fn add_primitive(&mut self, _desc: &PrimitiveDesc) -> PrimitiveId {
            self.next += 1;
            self.live.insert(PrimitiveId(self.next));
            PrimitiveId(self.next)
        }
        fn remove_primitive(&mut self, id: PrimitiveId) {
            assert!(self.live.remove(&id), "removed unknown primitive {id:?}");
        }
        fn update_primitive(&mut self, _id: PrimitiveId, _update: &PrimitiveUpdate) {
            self.updates += 1;
        }
        fn pick(&self, _pointer: Vec2) -> Option<PrimitiveId> {
            None
        }
        fn supports_highlight(&self) -> bool {
            false
        }
        fn set_highlight(&mut self, _object: Option<ObjectId>) {}
        fn subscribe(&mut self, _kind: PointerEventKind) -> SubscriptionId {
            SubscriptionId(0)
        }
        fn unsubscribe(&mut self, _id: SubscriptionId) {}
    }

    fn snapshot(registry: &HandleRegistry) -> Vec<(Handle, Collider)> {
        registry
            .entries()
            .iter()
            .map(|e| (e.handle, e.collider))
            .collect()
    }

    #[test]
    fn test_rebuild_is_idempotent() {
        let config = GizmoConfig::default();
        for mode in Mode::ALL {
            let mut scene = RecordingScene::default();
            let mut registry = HandleRegistry::new();
            registry.rebuild(mode, &config, &mut scene);
            let once = snapshot(&registry);
            let live_once = scene.live.len();

            registry.rebuild(mode, &config, &mut scene);
            assert_eq!(snapshot(&registry), once);
            assert_eq!(scene.live.len(), live_once);
            assert_eq!(registry.primitive_count(), live_once);
        }
    }

    #[test]
    fn test_handle_sets_per_mode() {
        let config = GizmoConfig::default();
        let axes = |mode| -> Vec<Axis> {
            handle_specs(mode, &config)
                .iter()
                .map(|s| s.handle.axis)
                .collect()
        };
        assert_eq!(
            axes(Mode::Translate),
            vec![Axis::X, Axis::Y, Axis::Z, Axis::XY, Axis::YZ, Axis::ZX, Axis::Center]
        );
        assert_eq!(axes(Mode::Rotate), vec![Axis::X, Axis::Y, Axis::Z]);
        assert_eq!(axes(Mode::Scale), vec![Axis::X, Axis::Y, Axis::Z, Axis::Center]);
    }

    #[test]
    fn test_rotate_handles_use_sectors() {
        for spec in handle_specs(Mode::Rotate, &GizmoConfig::default()) {
            assert!(matches!(spec.collider, Collider::Sector(s) if s.axis == spec.handle.axis));
        }
    }

    #[test]
    fn test_mode_switch_replaces_everything() {
        let config = GizmoConfig::default();
        let mut scene = RecordingScene::default();
        let mut registry = HandleRegistry::new();
        registry.rebuild(Mode::Translate, &config, &mut scene);
        let old: Vec<PrimitiveId> = scene.live.iter().copied().collect();

        registry.rebuild(Mode::Rotate, &config, &mut scene);
        assert_eq!(registry.mode(), Some(Mode::Rotate));
        for id in old {
            assert!(!scene.live.contains(&id));
            assert!(registry.handle_for_primitive(id).is_none());
        }
    }

    #[test]
    fn test_primitive_arena_lookup() {
        let config = GizmoConfig::default();
        let mut scene = RecordingScene::default();
        let mut registry = HandleRegistry::new();
        registry.rebuild(Mode::Rotate, &config, &mut scene);

        let key = HandleKey {
            axis: Axis::Y,
            role: PrimitiveRole::Face,
        };
        let id = registry.primitive(key).unwrap();
        assert_eq!(registry.handle_for_primitive(id).unwrap().axis, Axis::Y);

        registry.push_updates(&mut scene);
        assert_eq!(scene.updates, registry.primitive_count());

        registry.clear(&mut scene);
        assert!(registry.is_empty());
        assert!(scene.live.is_empty());
    }

    #[test]
    fn test_axis_prism_leaves_room_for_center() {
        let prism = axis_prism(Axis::Y, 0.05);
        assert!(prism.min.y > constants::CENTER_HALF_EXTENT);
        assert_eq!(prism.max.y, constants::AXIS_LENGTH);
    }
}
