//! Core data types and enumerations for the gizmo
//!
//! This module defines the editing modes, handle identities, rays and the
//! decoded transform snapshot reported to the host.

use bitflags::bitflags;

// Double precision throughout: positions in an Earth-centred frame are
// millions of metres from the origin.

/// 2D vector for pointer positions
pub type Vec2 = glam::DVec2;

/// 3D vector for world coordinates
pub type Vec3 = glam::DVec3;

/// 3x3 matrix for rotation blocks and local frames
pub type Mat3 = glam::DMat3;

/// 4x4 transformation matrix
pub type Mat4 = glam::DMat4;

/// Rotation quaternion
pub type Quat = glam::DQuat;

/// Color represented as RGBA floats (0.0 to 1.0)
pub type Color = [f32; 4];

/// Editing mode of the gizmo
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Mode {
    /// Move the object along an axis or within a plane
    #[default]
    Translate,
    /// Rotate the object about one principal axis
    Rotate,
    /// Scale the object along one axis or uniformly
    Scale,
}

impl Mode {
    /// All modes, in display order
    pub const ALL: [Mode; 3] = [Mode::Translate, Mode::Rotate, Mode::Scale];
}

bitflags! {
    /// Principal axes touched by a handle
    ///
    /// Plane handles combine two axes, e.g. `AxisFlags::X | AxisFlags::Y`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct AxisFlags: u8 {
        /// X axis
        const X = 1 << 0;
        /// Y axis
        const Y = 1 << 1;
        /// Z axis
        const Z = 1 << 2;
        /// All three axes
        const XYZ = Self::X.bits() | Self::Y.bits() | Self::Z.bits();
    }
}

impl AxisFlags {
    /// Component indices of the set axes, in X, Y, Z order
    pub fn indices(self) -> impl Iterator<Item = usize> {
        (0..3).filter(move |&i| self.bits() & (1 << i) != 0)
    }

    /// The principal axis of a single-axis mask
    pub fn principal(self) -> Option<Axis> {
        if self == AxisFlags::X {
            Some(Axis::X)
        } else if self == AxisFlags::Y {
            Some(Axis::Y)
        } else if self == AxisFlags::Z {
            Some(Axis::Z)
        } else {
            None
        }
    }
}

/// Axis tag identifying one affordance within a mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
    Z,
    XY,
    YZ,
    ZX,
    Center,
}

impl Axis {
    /// The three principal axes
    pub const PRINCIPAL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];
    /// The three coordinate planes
    pub const PLANES: [Axis; 3] = [Axis::XY, Axis::YZ, Axis::ZX];

    /// Axes involved in this handle
    pub fn flags(self) -> AxisFlags {
        match self {
            Axis::X => AxisFlags::X,
            Axis::Y => AxisFlags::Y,
            Axis::Z => AxisFlags::Z,
            Axis::XY => AxisFlags::X | AxisFlags::Y,
            Axis::YZ => AxisFlags::Y | AxisFlags::Z,
            Axis::ZX => AxisFlags::Z | AxisFlags::X,
            Axis::Center => AxisFlags::XYZ,
        }
    }

    /// Component index for single-axis handles (0=X, 1=Y, 2=Z)
    pub fn index(self) -> Option<usize> {
        match self {
            Axis::X => Some(0),
            Axis::Y => Some(1),
            Axis::Z => Some(2),
            _ => None,
        }
    }

    /// Unit direction of a principal axis in handle-local space
    pub fn unit(self) -> Option<Vec3> {
        self.index().map(|i| Vec3::AXES[i])
    }

    /// Check if this is a coordinate plane
    pub fn is_plane(self) -> bool {
        self.flags().bits().count_ones() == 2
    }

    /// Axis perpendicular to a plane handle
    pub fn plane_normal(self) -> Option<Axis> {
        if !self.is_plane() {
            return None;
        }
        AxisFlags::XYZ.difference(self.flags()).principal()
    }

    /// Indices of the two in-plane coordinates around a principal axis,
    /// ordered so that rotating by +90° about the axis maps the first onto
    /// the second.
    pub fn plane_coords(self) -> Option<(usize, usize)> {
        match self {
            Axis::X => Some((1, 2)),
            Axis::Y => Some((2, 0)),
            Axis::Z => Some((0, 1)),
            _ => None,
        }
    }
}

/// One interactive affordance of the active mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Handle {
    pub axis: Axis,
    pub mode: Mode,
    pub name: &'static str,
}

impl Handle {
    /// Build the handle for `axis` in `mode`
    pub fn new(axis: Axis, mode: Mode) -> Self {
        Self {
            axis,
            mode,
            name: handle_name(axis, mode),
        }
    }

    /// Whether a pointer-down on this handle may start a drag in `mode`.
    ///
    /// The center grip only drives uniform scaling; in the other modes it is
    /// displayed but inert.
    pub fn is_draggable(&self, mode: Mode) -> bool {
        self.mode == mode && (self.axis != Axis::Center || mode == Mode::Scale)
    }
}

fn handle_name(axis: Axis, mode: Mode) -> &'static str {
    match (mode, axis) {
        (Mode::Translate, Axis::X) => "translate_x",
        (Mode::Translate, Axis::Y) => "translate_y",
        (Mode::Translate, Axis::Z) => "translate_z",
        (Mode::Translate, Axis::XY) => "translate_xy",
        (Mode::Translate, Axis::YZ) => "translate_yz",
        (Mode::Translate, Axis::ZX) => "translate_zx",
        (Mode::Translate, Axis::Center) => "translate_center",
        (Mode::Rotate, Axis::X) => "rotate_x",
        (Mode::Rotate, Axis::Y) => "rotate_y",
        (Mode::Rotate, Axis::Z) => "rotate_z",
        (Mode::Scale, Axis::X) => "scale_x",
        (Mode::Scale, Axis::Y) => "scale_y",
        (Mode::Scale, Axis::Z) => "scale_z",
        (Mode::Scale, Axis::Center) => "scale_uniform",
        _ => "unused",
    }
}

/// A half-line in world or local space
///
/// The direction is not required to be unit length; local-space rays keep
/// the scale of the inverse placement so entry distances stay comparable
/// with world distances.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self { origin, direction }
    }

    /// Point at parameter `t`
    pub fn at(&self, t: f64) -> Vec3 {
        self.origin + self.direction * t
    }

    /// Map the ray through an affine matrix
    pub fn transformed(&self, matrix: &Mat4) -> Self {
        Self {
            origin: matrix.transform_point3(self.origin),
            direction: matrix.transform_vector3(self.direction),
        }
    }
}

/// World position of the bound object
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Position {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// Heading/pitch/roll in degrees, each in `[0, 360)`
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rotation {
    pub heading: f64,
    pub pitch: f64,
    pub roll: f64,
}

/// Per-axis scale factors along the object's own axes
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Scale {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Default for Scale {
    fn default() -> Self {
        Self {
            x: 1.0,
            y: 1.0,
            z: 1.0,
        }
    }
}

/// Decoded, rounded snapshot of the bound object's transform
///
/// Always recomputed from the live model matrix; never stored as the source
/// of truth.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TransformState {
    pub position: Position,
    pub rotation: Rotation,
    pub scale: Scale,
}

/// Default colors for gizmo elements
pub mod colors {
    use super::Color;

    /// Red color for X-axis
    pub const RED: Color = [1.0, 0.0, 0.0, 1.0];
    /// Green color for Y-axis
    pub const GREEN: Color = [0.0, 1.0, 0.0, 1.0];
    /// Blue color for Z-axis
    pub const BLUE: Color = [0.0, 0.0, 1.0, 1.0];
    /// Center grip
    pub const WHITE: Color = [1.0, 1.0, 1.0, 1.0];
    /// Plane handles, drawn translucent
    pub const PLANE_ALPHA: f32 = 0.35;
}

/// Handle geometry, in unit handle space (1.0 = one on-screen handle length)
pub mod constants {
    /// Length of axis prisms and arrows
    pub const AXIS_LENGTH: f64 = 1.0;
    /// Gap between the center grip and the start of an axis prism
    pub const AXIS_STANDOFF: f64 = 0.2;
    /// Extra half-width added to thin colliders so they remain grabbable
    pub const PICK_MARGIN: f64 = 0.03;
    /// Inner corner of the planar translate squares
    pub const PLANE_MIN: f64 = 0.25;
    /// Outer corner of the planar translate squares
    pub const PLANE_MAX: f64 = 0.55;
    /// Half-extent of the center grip
    pub const CENTER_HALF_EXTENT: f64 = 0.12;
    /// Nominal radius of the rotation arcs
    pub const ROTATE_RADIUS: f64 = 1.0;
    /// Thickness tolerance around the rotation arcs
    pub const ROTATE_TUBE: f64 = 0.08;
    /// Slack admitted by the sector wedge and radius tests
    pub const SECTOR_TOLERANCE: f64 = 0.02;
    /// Distance added to center-grip hits so axis and plane handles win overlaps
    pub const CENTER_PICK_PENALTY: f64 = 1.0e9;
    /// Smallest scale factor a drag may produce
    pub const MIN_SCALE_FACTOR: f64 = 0.01;
    /// Scale values this close to 1.0 are reported as exactly 1.0
    pub const UNIT_SCALE_SNAP: f64 = 1.0e-5;
    /// Quarter turn
    pub const QUADRANT: f64 = std::f64::consts::FRAC_PI_2;
}
