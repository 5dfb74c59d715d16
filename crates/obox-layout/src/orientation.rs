// crates/obox-layout/src/orientation.rs
use obox_core::{ContainerConfig, Orientation};
use std::cmp::Ordering;
use tracing::debug;

/// Picks the orientation for a pass from the explicit setting, the auto
/// flag and the current aspect ratio. A square (or unmeasurable) area keeps
/// `current`, so the box never oscillates at the boundary.
pub fn select_orientation(current: Orientation, auto: bool, width: f32, height: f32) -> Orientation {
    if !auto {
        return current;
    }
    match width.partial_cmp(&height) {
        Some(Ordering::Greater) => Orientation::Horizontal,
        Some(Ordering::Less) => Orientation::Vertical,
        _ => current,
    }
}

/// Resolves the effective orientation of a container and remembers it.
#[derive(Debug, Clone, Default)]
pub struct OrientationSelector {
    last_resolved: Option<Orientation>,
}

impl OrientationSelector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Orientation produced by the most recent [`resolve`](Self::resolve).
    pub fn last_resolved(&self) -> Option<Orientation> {
        self.last_resolved
    }

    /// Resolves the orientation for a `width` x `height` area.
    ///
    /// The result is written back into `config.orientation`, so a later read
    /// of the configured orientation reports what auto-orientation chose.
    pub fn resolve(&mut self, config: &mut ContainerConfig, width: f32, height: f32) -> Orientation {
        let resolved = select_orientation(config.orientation, config.auto_orientate, width, height);
        if resolved != config.orientation {
            debug!("Auto-orientation switched {:?} -> {:?} for {}x{}", config.orientation, resolved, width, height);
        }
        config.orientation = resolved;
        self.last_resolved = Some(resolved);
        resolved
    }
}
