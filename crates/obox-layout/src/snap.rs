// crates/obox-layout/src/snap.rs
//! Rounding of lengths onto the device pixel grid.
//!
//! All functions are pure: the same value and scale always produce the same
//! bits, which is what keeps repeated layout passes identical.

use obox_core::{ContainerConfig, Orientation};

/// Tolerance, in device pixels, absorbing float noise before floor/ceil.
const SNAP_EPSILON: f32 = 1e-3;

/// Distributor tolerance used when snapping is disabled.
const UNSNAPPED_UNIT: f32 = 1e-3;

/// Rounds `value` to the nearest device pixel. Zero stays exactly zero.
pub fn snap(value: f32, scale: f32) -> f32 {
    if value == 0.0 || !value.is_finite() {
        return if value == 0.0 { 0.0 } else { value };
    }
    (value * scale).round() / scale
}

/// Rounds `value` up to the next device pixel so content is never clipped.
pub fn snap_size(value: f32, scale: f32) -> f32 {
    if value == 0.0 || !value.is_finite() {
        return if value == 0.0 { 0.0 } else { value };
    }
    (value * scale - SNAP_EPSILON).ceil() / scale
}

/// Truncates `value` toward zero on the pixel grid, but never below one
/// device pixel in magnitude for a non-zero input.
pub fn snap_portion(value: f32, scale: f32) -> f32 {
    if value == 0.0 {
        return 0.0;
    }
    let scaled = value * scale;
    let snapped = if scaled > 0.0 {
        (scaled + SNAP_EPSILON).floor().max(1.0)
    } else {
        (scaled - SNAP_EPSILON).ceil().min(-1.0)
    };
    snapped / scale
}

/// Per-container snapping policy: enabled flag plus a scale per axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelSnapper {
    enabled: bool,
    scale_x: f32,
    scale_y: f32,
}

impl Default for PixelSnapper {
    fn default() -> Self {
        Self::new(true, 1.0, 1.0)
    }
}

impl PixelSnapper {
    pub fn new(enabled: bool, scale_x: f32, scale_y: f32) -> Self {
        Self {
            enabled,
            scale_x: sanitize_scale(scale_x),
            scale_y: sanitize_scale(scale_y),
        }
    }

    pub fn disabled() -> Self {
        Self::new(false, 1.0, 1.0)
    }

    pub fn from_config(config: &ContainerConfig) -> Self {
        Self::new(
            config.snap_to_pixel,
            config.scale_x,
            config.scale_y,
        )
    }

    pub fn scale(&self, axis: Orientation) -> f32 {
        match axis {
            Orientation::Horizontal => self.scale_x,
            Orientation::Vertical => self.scale_y,
        }
    }

    /// Smallest meaningful length along `axis`.
    pub fn unit(&self, axis: Orientation) -> f32 {
        if self.enabled {
            1.0 / self.scale(axis)
        } else {
            UNSNAPPED_UNIT
        }
    }

    /// Snaps spacing, margins and positions.
    pub fn snap_space(&self, value: f32, axis: Orientation) -> f32 {
        if self.enabled {
            snap(value, self.scale(axis))
        } else {
            value
        }
    }

    pub fn snap_size(&self, value: f32, axis: Orientation) -> f32 {
        if self.enabled {
            snap_size(value, self.scale(axis))
        } else {
            value
        }
    }

    pub fn snap_portion(&self, value: f32, axis: Orientation) -> f32 {
        if self.enabled {
            snap_portion(value, self.scale(axis))
        } else {
            value
        }
    }
}

fn sanitize_scale(scale: f32) -> f32 {
    if scale.is_finite() && scale > 0.0 {
        scale
    } else {
        1.0
    }
}
