//! Ray intersection engine
//!
//! Tests a world ray against every visible collider in its handle's local
//! space and returns the nearest handle.

use crate::handles::HandleRegistry;
use crate::host::PrimitiveId;
use crate::math::try_inverse;
use crate::types::{constants, Axis, Handle, Ray};

/// Nearest collider hit
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PickHit {
    pub handle: Handle,
    /// Ray parameter of the entry point, including the center penalty
    pub distance: f64,
}

/// Nearest visible handle hit by a world-space ray
///
/// Center-grip hits are pushed back by [`constants::CENTER_PICK_PENALTY`] so
/// overlapping axis and plane handles win. Handles whose placement cannot
/// be inverted are skipped for this pick.
pub fn pick_handle(registry: &HandleRegistry, ray: &Ray) -> Option<PickHit> {
    let mut best: Option<PickHit> = None;
    for entry in registry.entries().iter().filter(|e| e.visible) {
        let Some(inverse) = try_inverse(&entry.placement) else {
            crate::gizmo_trace!("skipping {} with singular placement", entry.handle.name);
            continue;
        };
        let local = ray.transformed(&inverse);
        let Some(t) = entry.collider.intersect_local(&local) else {
            continue;
        };
        let distance = if entry.handle.axis == Axis::Center {
            t + constants::CENTER_PICK_PENALTY
        } else {
            t
        };
        if best.is_none_or(|b| distance < b.distance) {
            best = Some(PickHit {
                handle: entry.handle,
                distance,
            });
        }
    }
    best
}

/// Resolve the handle under the pointer
///
/// Falls back to the host's object-level pick when no collider is hit, as
/// some visuals (e.g. rotation fans) are independently pickable.
pub fn resolve_handle(
    registry: &HandleRegistry,
    ray: Option<&Ray>,
    fallback: Option<PrimitiveId>,
) -> Option<Handle> {
    if let Some(hit) = ray.and_then(|r| pick_handle(registry, r)) {
        return Some(hit.handle);
    }
    let handle = registry.handle_for_primitive(fallback?)?;
    registry
        .entry(handle.axis)
        .filter(|e| e.visible)
        .map(|e| e.handle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GizmoConfig;
    use crate::host::{
        ObjectId, PointerEventKind, PrimitiveDesc, PrimitiveUpdate, Scene, SubscriptionId,
    };
    use crate::types::{Mat4, Mode, Vec2, Vec3};

    #[derive(Default)]
    struct CountingScene(u64);

    impl Scene for CountingScene {
        fn add_primitive(&mut self, _desc: &PrimitiveDesc) -> PrimitiveId {
            self.0 += 1;
            PrimitiveId(self.0)
        }
        fn remove_primitive(&mut self, _id: PrimitiveId) {}
        fn update_primitive(&mut self, _id: PrimitiveId, _update: &PrimitiveUpdate) {}
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

    fn registry(mode: Mode) -> HandleRegistry {
        let mut registry = HandleRegistry::new();
        registry.rebuild(mode, &GizmoConfig::default(), &mut CountingScene::default());
        registry.set_visible(true);
        registry
    }

    fn down_at(x: f64, y: f64) -> Ray {
        Ray::new(Vec3::new(x, y, 10.0), Vec3::NEG_Z)
    }

    #[test]
    fn test_picks_axis_prism() {
        let registry = registry(Mode::Translate);
        let hit = pick_handle(&registry, &down_at(0.6, 0.0)).unwrap();
        assert_eq!(hit.handle.axis, Axis::X);
        let hit = pick_handle(&registry, &down_at(0.0, 0.6)).unwrap();
        assert_eq!(hit.handle.axis, Axis::Y);
    }

    #[test]
    fn test_picks_plane_square() {
        let registry = registry(Mode::Translate);
        let hit = pick_handle(&registry, &down_at(0.4, 0.4)).unwrap();
        assert_eq!(hit.handle.axis, Axis::XY);
    }

    #[test]
    fn test_axis_beats_center_when_overlapping() {
        let registry = registry(Mode::Translate);
        // Looking straight down Z, the Z prism and the center grip overlap
        let hit = pick_handle(&registry, &down_at(0.0, 0.0)).unwrap();
        assert_eq!(hit.handle.axis, Axis::Z);
    }

    #[test]
    fn test_center_penalty() {
        let registry = registry(Mode::Scale);
        // Enters the center grip first, then runs along the X prism
        let ray = Ray::new(Vec3::new(-10.0, 0.0, 0.0), Vec3::X);
        let hit = pick_handle(&registry, &ray).unwrap();
        assert_eq!(hit.handle.axis, Axis::X);

        let ray = Ray::new(Vec3::new(-0.1, -0.1, 10.0), Vec3::NEG_Z);
        let hit = pick_handle(&registry, &ray).unwrap();
        assert_eq!(hit.handle.axis, Axis::Center);
        assert!(hit.distance >= constants::CENTER_PICK_PENALTY);
    }

    #[test]
    fn test_hidden_handles_are_skipped() {
        let mut registry = registry(Mode::Translate);
        registry.set_visible(false);
        assert!(pick_handle(&registry, &down_at(0.6, 0.0)).is_none());
    }

    #[test]
    fn test_singular_placement_is_skipped() {
        let mut registry = registry(Mode::Translate);
        for entry in registry.entries_mut() {
            if entry.handle.axis == Axis::X {
                entry.placement = Mat4::from_scale(Vec3::new(1.0, 1.0, 0.0));
            }
        }
        let hit = pick_handle(&registry, &down_at(0.6, 0.0));
        assert!(hit.is_none_or(|h| h.handle.axis != Axis::X));
    }

    #[test]
    fn test_placement_moves_colliders() {
        let mut registry = registry(Mode::Translate);
        let offset = Mat4::from_translation(Vec3::new(100.0, 0.0, 0.0));
        for entry in registry.entries_mut() {
            entry.placement = offset;
        }
        assert!(pick_handle(&registry, &down_at(0.6, 0.0)).is_none());
        let hit = pick_handle(&registry, &down_at(100.6, 0.0)).unwrap();
        assert_eq!(hit.handle.axis, Axis::X);
    }

    #[test]
    fn test_fallback_to_object_pick() {
        let registry = registry(Mode::Rotate);
        let fan = registry
            .primitive(crate::host::HandleKey {
                axis: Axis::Z,
                role: crate::host::PrimitiveRole::Face,
            })
            .unwrap();
        let miss = down_at(50.0, 50.0);
        let handle = resolve_handle(&registry, Some(&miss), Some(fan)).unwrap();
        assert_eq!(handle.axis, Axis::Z);
        assert!(resolve_handle(&registry, Some(&miss), Some(PrimitiveId(9999))).is_none());
        assert!(resolve_handle(&registry, None, None).is_none());
    }
}
