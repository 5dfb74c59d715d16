// crates/obox-core/src/config.rs
use crate::{Alignment, Insets, Orientation, Priority};

/// Container-level layout configuration.
///
/// Spacing is kept per absolute axis: a row uses `h_spacing` between its
/// children and a column `v_spacing`, so an auto-orientating container
/// switches gaps when it flips. Fill flags and alignment are relative to the
/// orientation a pass resolves to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContainerConfig {
    pub orientation: Orientation,
    pub auto_orientate: bool,
    pub h_spacing: f32,
    pub v_spacing: f32,
    pub alignment: Alignment,
    pub fill_main: bool,
    pub fill_cross: bool,
    pub snap_to_pixel: bool,
    pub scale_x: f32,
    pub scale_y: f32,
    pub padding: Insets,
}

impl Default for ContainerConfig {
    fn default() -> Self {
        Self {
            orientation: Orientation::Vertical,
            auto_orientate: false,
            h_spacing: 0.0,
            v_spacing: 0.0,
            alignment: Alignment::TOP_LEFT,
            fill_main: true,
            fill_cross: true,
            snap_to_pixel: true,
            scale_x: 1.0,
            scale_y: 1.0,
            padding: Insets::ZERO,
        }
    }
}

impl ContainerConfig {
    /// Gap between children laid out along `axis`, with negative and
    /// non-finite values treated as zero.
    pub fn spacing(&self, axis: Orientation) -> f32 {
        let spacing = match axis {
            Orientation::Horizontal => self.h_spacing,
            Orientation::Vertical => self.v_spacing,
        };
        sanitize_spacing(spacing)
    }
}

fn sanitize_spacing(value: f32) -> f32 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

/// Per-child layout constraints held by the container, keyed by child id.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ChildConstraints {
    pub margin: Insets,
    pub hgrow: Priority,
    pub vgrow: Priority,
}

impl ChildConstraints {
    /// Grow priority along `axis`.
    pub fn grow(&self, axis: Orientation) -> Priority {
        match axis {
            Orientation::Horizontal => self.hgrow,
            Orientation::Vertical => self.vgrow,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spacing_is_clamped() {
        let config = ContainerConfig {
            h_spacing: -4.0,
            v_spacing: f32::NAN,
            ..Default::default()
        };
        assert_eq!(config.spacing(Orientation::Horizontal), 0.0);
        assert_eq!(config.spacing(Orientation::Vertical), 0.0);
    }

    #[test]
    fn test_spacing_by_axis() {
        let config = ContainerConfig {
            h_spacing: 10.0,
            v_spacing: 30.0,
            ..Default::default()
        };
        assert_eq!(config.spacing(Orientation::Horizontal), 10.0);
        assert_eq!(config.spacing(Orientation::Vertical), 30.0);
    }

    #[test]
    fn test_grow_by_axis() {
        let constraints = ChildConstraints {
            hgrow: Priority::Always,
            ..Default::default()
        };
        assert_eq!(constraints.grow(Orientation::Horizontal), Priority::Always);
        assert_eq!(constraints.grow(Orientation::Vertical), Priority::None);
    }
}
