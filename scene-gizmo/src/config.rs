//! Construction-time configuration

use crate::math::FrameKind;
use crate::types::Mode;
use crate::{GizmoError, GizmoResult};

/// Gizmo configuration
///
/// ```
/// use scene_gizmo::{GizmoConfig, Mode};
/// let config = GizmoConfig::default().mode(Mode::Rotate).axis_width(4.0);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GizmoConfig {
    /// Initial editing mode
    pub mode: Mode,
    /// Rendered axis width in pixels; also widens the axis colliders
    pub axis_width: f64,
    /// On-screen length of one handle, in pixels
    pub target_pixel_length: f64,
    /// Orientation of the local tangent frame
    pub frame: FrameKind,
    /// Ask the host to outline the bound object
    pub highlight_selection: bool,
}

impl Default for GizmoConfig {
    fn default() -> Self {
        Self {
            mode: Mode::Translate,
            axis_width: 6.0,
            target_pixel_length: 100.0,
            frame: FrameKind::default(),
            highlight_selection: true,
        }
    }
}

impl GizmoConfig {
    pub fn mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    pub fn axis_width(mut self, axis_width: f64) -> Self {
        self.axis_width = axis_width;
        self
    }

    pub fn target_pixel_length(mut self, pixels: f64) -> Self {
        self.target_pixel_length = pixels;
        self
    }

    pub fn frame(mut self, frame: FrameKind) -> Self {
        self.frame = frame;
        self
    }

    pub fn highlight_selection(mut self, enabled: bool) -> Self {
        self.highlight_selection = enabled;
        self
    }

    /// Reject non-finite or non-positive sizes
    pub fn validate(&self) -> GizmoResult<()> {
        if !(self.axis_width.is_finite() && self.axis_width > 0.0) {
            return Err(GizmoError::invalid_config(format!(
                "axis_width must be positive and finite, got {}",
                self.axis_width
            )));
        }
        if !(self.target_pixel_length.is_finite() && self.target_pixel_length > 0.0) {
            return Err(GizmoError::invalid_config(format!(
                "target_pixel_length must be positive and finite, got {}",
                self.target_pixel_length
            )));
        }
        if let FrameKind::EastNorthUp(ellipsoid) = self.frame {
            if ellipsoid.radii.min_element() <= 0.0 || !ellipsoid.radii.is_finite() {
                return Err(GizmoError::invalid_config("ellipsoid radii must be positive"));
            }
        }
        Ok(())
    }

    /// Half-width of an axis prism collider in unit handle space
    pub(crate) fn axis_half_width(&self) -> f64 {
        0.5 * self.axis_width / self.target_pixel_length + crate::constants::PICK_MARGIN
    }
}
