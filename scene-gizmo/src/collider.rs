//! Hit-test volumes and their local-space ray tests

use crate::types::{Axis, Ray, Vec3};

const SLAB_EPSILON: f64 = 1e-9;

/// Axis-aligned box in handle-local space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self {
            min: min.min(max),
            max: min.max(max),
        }
    }

    /// Box of half-extent `half` around the origin
    pub fn cube(half: f64) -> Self {
        Self::new(Vec3::splat(-half), Vec3::splat(half))
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Entry/exit parameters of `ray` through the box (slab method)
    ///
    /// Returns `None` when the interval is empty or lies entirely behind the
    /// ray origin. The entry is clamped to 0 for rays starting inside.
    pub fn intersect(&self, ray: &Ray) -> Option<(f64, f64)> {
        let mut t_min = f64::NEG_INFINITY;
        let mut t_max = f64::INFINITY;
        for i in 0..3 {
            let origin = ray.origin[i];
            let dir = ray.direction[i];
            if dir.abs() < SLAB_EPSILON {
                if origin < self.min[i] || origin > self.max[i] {
                    return None;
                }
                continue;
            }
            let inv = 1.0 / dir;
            let mut t0 = (self.min[i] - origin) * inv;
            let mut t1 = (self.max[i] - origin) * inv;
            if t0 > t1 {
                std::mem::swap(&mut t0, &mut t1);
            }
            t_min = t_min.max(t0);
            t_max = t_max.min(t1);
        }
        let entry = t_min.max(0.0);
        (t_max >= entry).then_some((entry, t_max))
    }
}

/// Quarter-circle wedge around a principal axis
///
/// Spans 0°..90° in the axis' plane (see [`Axis::plane_coords`]), from
/// radius 0 out to `outer_radius`, `half_thickness` deep along the axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sector {
    pub axis: Axis,
    pub outer_radius: f64,
    pub half_thickness: f64,
    pub tolerance: f64,
}

impl Sector {
    /// Coarse bounding box used before the wedge test
    pub fn bounds(&self) -> Aabb {
        let (u, v) = self.axis.plane_coords().unwrap_or((0, 1));
        let normal = 3 - u - v;
        let mut min = Vec3::ZERO;
        let mut max = Vec3::ZERO;
        min[u] = -self.tolerance;
        min[v] = -self.tolerance;
        max[u] = self.outer_radius;
        max[v] = self.outer_radius;
        min[normal] = -self.half_thickness;
        max[normal] = self.half_thickness;
        Aabb::new(min, max)
    }

    /// Whether a local point lies inside the wedge
    pub fn contains(&self, point: Vec3) -> bool {
        let Some((u, v)) = self.axis.plane_coords() else {
            return false;
        };
        point.length() <= self.outer_radius + self.tolerance
            && point[u] >= -self.tolerance
            && point[v] >= -self.tolerance
    }

    /// Entry parameter of `ray` into the wedge
    pub fn intersect(&self, ray: &Ray) -> Option<f64> {
        let (entry, _) = self.bounds().intersect(ray)?;
        self.contains(ray.at(entry)).then_some(entry)
    }
}

/// Simplified hit-test volume of one handle
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Collider {
    Box(Aabb),
    Sector(Sector),
}

impl Collider {
    /// Entry distance of a handle-local ray, if it hits
    pub fn intersect_local(&self, ray: &Ray) -> Option<f64> {
        match self {
            Collider::Box(aabb) => aabb.intersect(ray).map(|(entry, _)| entry),
            Collider::Sector(sector) => sector.intersect(ray),
        }
    }
}
