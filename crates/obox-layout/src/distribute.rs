// crates/obox-layout/src/distribute.rs
//! Spreads surplus or deficit main-axis space over children.
//!
//! Surplus goes to `Always` children first and whatever they cannot absorb
//! to `Sometimes` children. A deficit is taken from every child whatever
//! its priority. Each round hands every adjustable child an equal, pixel
//! snapped portion; a child that hits its bound drops out, so a pass ends
//! after at most one round per child plus a final sub-pixel round.

use crate::PixelSnapper;
use obox_core::{Orientation, Priority};
use tracing::trace;

/// Per-child bounds for one distribution, all margin-inclusive.
#[derive(Debug, Clone, Copy)]
pub struct DistributionBounds<'a> {
    pub min: &'a [f32],
    pub max: &'a [f32],
    pub grow: &'a [Priority],
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Distribution {
    /// Allocated extents plus spacing.
    pub content: f32,
    /// Space that could not be handed out because every eligible child was
    /// pinned at a bound. Positive for surplus, negative for deficit.
    pub residual: f32,
}

#[derive(Debug, Clone, Copy)]
pub struct SpaceDistributor<'a> {
    snapper: &'a PixelSnapper,
    axis: Orientation,
}

impl<'a> SpaceDistributor<'a> {
    pub fn new(snapper: &'a PixelSnapper, axis: Orientation) -> Self {
        Self { snapper, axis }
    }

    /// Resizes `extents` (preferred extents on entry) to fill `available`.
    ///
    /// `limits` is scratch space; its contents on entry are ignored.
    pub fn distribute(
        &self,
        extents: &mut [f32],
        bounds: &DistributionBounds<'_>,
        available: f32,
        spacing: f32,
        limits: &mut Vec<Option<f32>>,
    ) -> Distribution {
        let n = extents.len();
        if n == 0 {
            return Distribution { content: 0.0, residual: 0.0 };
        }

        let mut content: f32 = extents.iter().sum::<f32>() + spacing * (n - 1) as f32;
        let extra = available - content;
        if extra == 0.0 || !extra.is_finite() {
            return Distribution { content, residual: 0.0 };
        }

        let remaining = self.grow_or_shrink(extents, bounds, Priority::Always, extra, limits);
        let remaining = self.grow_or_shrink(extents, bounds, Priority::Sometimes, remaining, limits);
        content += extra - remaining;

        trace!(
            "Distributed {:.2} over {} children along {:?}, residual {:.2}",
            extra, n, self.axis, remaining
        );

        Distribution { content, residual: remaining }
    }

    fn grow_or_shrink(
        &self,
        extents: &mut [f32],
        bounds: &DistributionBounds<'_>,
        priority: Priority,
        extra: f32,
        limits: &mut Vec<Option<f32>>,
    ) -> f32 {
        let shrinking = extra < 0.0;

        limits.clear();
        limits.extend((0..extents.len()).map(|i| {
            if shrinking {
                Some(bounds.min[i])
            } else if bounds.grow[i] == priority {
                Some(bounds.max[i])
            } else {
                None
            }
        }));
        let mut adjusting = limits.iter().filter(|l| l.is_some()).count();

        let unit = self.snapper.unit(self.axis);
        let mut available = extra;
        'rounds: while available.abs() > unit && adjusting > 0 {
            let portion = self.snapper.snap_portion(available / adjusting as f32, self.axis);
            for (extent, limit) in extents.iter_mut().zip(limits.iter_mut()) {
                let Some(bound) = *limit else {
                    continue;
                };
                // A bound on the wrong side of the extent leaves no headroom.
                let headroom = if shrinking {
                    (bound - *extent).min(0.0)
                } else {
                    (bound - *extent).max(0.0)
                };
                let change = if headroom.abs() <= portion.abs() { headroom } else { portion };
                *extent += change;
                available -= change;
                if available.abs() < unit {
                    break 'rounds;
                }
                if change.abs() < portion.abs() {
                    *limit = None;
                    adjusting -= 1;
                }
            }
        }
        available
    }
}
