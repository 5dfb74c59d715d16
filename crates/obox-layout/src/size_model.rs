// crates/obox-layout/src/size_model.rs
//! Margin-inclusive min/preferred/max extents of children.
//!
//! Extents along one axis may depend on the extent along the other axis
//! (content bias). When the opposing extent is known, the model first
//! resolves what the child would get on that axis, using the container's
//! fill policy and baseline complement, and asks the child again with that
//! value as a hint.

use crate::PixelSnapper;
use obox_core::{bounded_size, is_unbounded, BaselineOffset, Insets, LayoutNode, Orientation, UNBOUNDED};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComplementKind {
    Min,
    Pref,
}

/// Space needed below the baseline so that baseline-aligned children line up:
/// the largest `extent - baseline_offset` among children with a literal
/// offset. Children whose baseline is their bottom edge do not contribute.
pub fn baseline_complement<'n, N, I>(nodes: I, kind: ComplementKind) -> f32
where
    N: LayoutNode + ?Sized + 'n,
    I: IntoIterator<Item = &'n N>,
{
    let mut complement = 0.0f32;
    for node in nodes {
        let Some(offset) = node.baseline_offset().offset() else {
            continue;
        };
        let extent = if node.is_resizable() && kind == ComplementKind::Min {
            node.min_size(Orientation::Vertical, None)
        } else {
            node.pref_size(Orientation::Vertical, None)
        };
        complement = complement.max(extent - offset);
    }
    complement
}

#[derive(Debug, Clone, Copy)]
pub struct SizeModel<'a> {
    snapper: &'a PixelSnapper,
    main: Orientation,
    fill_main: bool,
    fill_cross: bool,
    complement: Option<f32>,
}

impl<'a> SizeModel<'a> {
    pub fn new(snapper: &'a PixelSnapper, main: Orientation, fill_main: bool, fill_cross: bool) -> Self {
        Self {
            snapper,
            main,
            fill_main,
            fill_cross,
            complement: None,
        }
    }

    /// Reserve `complement` below the baseline when fitting heights of
    /// children whose baseline is their bottom edge.
    pub fn with_complement(mut self, complement: Option<f32>) -> Self {
        self.complement = complement;
        self
    }

    pub fn main(&self) -> Orientation {
        self.main
    }

    pub fn snapper(&self) -> &PixelSnapper {
        self.snapper
    }

    pub fn fills(&self, axis: Orientation) -> bool {
        if axis == self.main {
            self.fill_main
        } else {
            self.fill_cross
        }
    }

    pub fn snap_margin(&self, margin: &Insets) -> Insets {
        Insets {
            top: self.snapper.snap_space(margin.top, Orientation::Vertical),
            right: self.snapper.snap_space(margin.right, Orientation::Horizontal),
            bottom: self.snapper.snap_space(margin.bottom, Orientation::Vertical),
            left: self.snapper.snap_space(margin.left, Orientation::Horizontal),
        }
    }

    /// Size of a child along `axis` when placed into `space` (which includes
    /// its margins), following the fill policy for that axis.
    pub fn fit_extent<N: LayoutNode + ?Sized>(
        &self,
        node: &N,
        margin: &Insets,
        axis: Orientation,
        space: f32,
        hint: Option<f32>,
    ) -> f32 {
        let margin = self.snap_margin(margin);
        let mut content = space - margin.along(axis);
        if axis == Orientation::Vertical && node.baseline_offset() == BaselineOffset::SameAsExtent {
            if let Some(complement) = self.complement {
                content -= complement;
            }
        }

        let min = node.min_size(axis, hint);
        let max = node.max_size(axis, hint);
        let size = if self.fills(axis) {
            bounded_size(min, content, max)
        } else {
            bounded_size(min, node.pref_size(axis, hint), max.min(content))
        };
        self.snapper.snap_size(size, axis)
    }

    /// Hint for querying `axis`, if the child's extent there depends on the
    /// opposing extent and that extent is known.
    fn opposing_hint<N: LayoutNode + ?Sized>(
        &self,
        node: &N,
        margin: &Insets,
        axis: Orientation,
        opposing: Option<f32>,
    ) -> Option<f32> {
        let space = opposing?;
        let other = axis.other();
        if !node.is_resizable() || node.content_bias() != Some(other) {
            return None;
        }
        Some(self.fit_extent(node, margin, other, space, None))
    }

    pub fn min_extent<N: LayoutNode + ?Sized>(
        &self,
        node: &N,
        margin: &Insets,
        axis: Orientation,
        opposing: Option<f32>,
    ) -> f32 {
        let hint = self.opposing_hint(node, margin, axis, opposing);
        let margin = self.snap_margin(margin);
        margin.leading(axis) + self.snapper.snap_size(node.min_size(axis, hint), axis) + margin.trailing(axis)
    }

    pub fn pref_extent<N: LayoutNode + ?Sized>(
        &self,
        node: &N,
        margin: &Insets,
        axis: Orientation,
        opposing: Option<f32>,
    ) -> f32 {
        let hint = self.opposing_hint(node, margin, axis, opposing);
        let margin = self.snap_margin(margin);
        let pref = bounded_size(
            node.min_size(axis, hint),
            node.pref_size(axis, hint),
            node.max_size(axis, hint),
        );
        margin.leading(axis) + self.snapper.snap_size(pref, axis) + margin.trailing(axis)
    }

    /// Returns [`UNBOUNDED`] untouched for children without a maximum.
    pub fn max_extent<N: LayoutNode + ?Sized>(
        &self,
        node: &N,
        margin: &Insets,
        axis: Orientation,
        opposing: Option<f32>,
    ) -> f32 {
        if is_unbounded(node.max_size(axis, None)) {
            return UNBOUNDED;
        }
        let hint = self.opposing_hint(node, margin, axis, opposing);
        let max = node.max_size(axis, hint);
        if is_unbounded(max) {
            return UNBOUNDED;
        }
        let margin = self.snap_margin(margin);
        let max = bounded_size(node.min_size(axis, hint), max, UNBOUNDED);
        margin.leading(axis) + self.snapper.snap_size(max, axis) + margin.trailing(axis)
    }
}
