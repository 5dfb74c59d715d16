// crates/obox-layout/src/baseline.rs
use crate::SizeModel;
use obox_core::{bounded_size, Insets, LayoutNode, Orientation};

/// Shared baseline of a row of children.
///
/// Only rows align on baselines, so heights are the cross extents here and
/// widths the main extents.
#[derive(Debug, Clone, Copy)]
pub struct BaselineCalculator<'a> {
    model: SizeModel<'a>,
    fill: bool,
}

impl<'a> BaselineCalculator<'a> {
    /// `fill` is the container's raw fill-cross flag.
    pub fn new(model: SizeModel<'a>, fill: bool) -> Self {
        Self { model, fill }
    }

    /// Distance from a child's top edge to its baseline when it is laid out
    /// in a row of height `area_height` with `complement` reserved below the
    /// baseline. `width` is the child's resolved width, used when its height
    /// depends on it.
    pub fn contribution<N: LayoutNode + ?Sized>(
        &self,
        node: &N,
        margin: &Insets,
        width: f32,
        area_height: f32,
        complement: f32,
    ) -> f32 {
        if let Some(offset) = node.baseline_offset().offset() {
            return offset;
        }

        let margin = self.model.snap_margin(margin);
        let hint = (node.content_bias() == Some(Orientation::Horizontal)).then_some(width);
        let available = area_height - complement - margin.along(Orientation::Vertical);
        let min = node.min_size(Orientation::Vertical, hint);
        let max = node.max_size(Orientation::Vertical, hint);
        let height = if self.fill {
            bounded_size(min, available, max)
        } else {
            bounded_size(min, node.pref_size(Orientation::Vertical, hint), max.min(available))
        };
        self.model.snapper().snap_size(height, Orientation::Vertical)
    }

    /// Container baseline: the lowest of `top margin + contribution`.
    pub fn container_baseline<N: LayoutNode + ?Sized>(
        &self,
        children: &[(&N, Insets)],
        widths: &[f32],
        area_height: f32,
        complement: f32,
    ) -> f32 {
        children
            .iter()
            .zip(widths)
            .map(|((node, margin), &width)| {
                let top = self.model.snap_margin(margin).top;
                top + self.contribution(*node, margin, width, area_height, complement)
            })
            .fold(0.0, f32::max)
    }

    /// Offset of a child's top edge below the content top.
    pub fn placement(baseline: f32, contribution: f32) -> f32 {
        baseline - contribution
    }
}
