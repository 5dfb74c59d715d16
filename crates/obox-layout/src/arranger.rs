// crates/obox-layout/src/arranger.rs
//! `OBox`: a box that lays its children out as a row or a column.
//!
//! A pass moves through `Measuring`, `Distributing` and `Positioning` and
//! back to `Idle`. Mutations only mark the box dirty; the next call to
//! [`OBox::layout`] recomputes, and an unchanged box with an unchanged size
//! returns its cached result.

use crate::{
    baseline_complement, BaselineCalculator, ComplementKind, ConstraintTable, DistributionBounds,
    LayoutEngine, LayoutResult, OrientationSelector, PixelSnapper, SizeModel, SpaceDistributor,
};
use glam::Vec2;
use obox_core::{
    bounded_size, Alignment, BaselineOffset, ChildId, ContainerConfig, Insets, LayoutNode,
    Orientation, Priority, SceneFile,
};
use std::cell::Cell;
use std::collections::HashMap;
use std::rc::Rc;
use tracing::{debug, trace, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PassState {
    #[default]
    Idle,
    Measuring,
    Distributing,
    Positioning,
}

/// Handle for requesting a new layout from outside the box, including from
/// node callbacks that run while a pass is in progress.
#[derive(Debug, Clone, Default)]
pub struct LayoutRequest(Rc<Cell<bool>>);

impl LayoutRequest {
    pub fn request(&self) {
        self.0.set(true);
    }

    pub fn is_requested(&self) -> bool {
        self.0.get()
    }

    fn take(&self) -> bool {
        self.0.replace(false)
    }
}

/// Reusable per-pass buffers. Always reset to the current child count.
#[derive(Debug, Default)]
struct Scratch {
    main: Vec<f32>,
    min: Vec<f32>,
    max: Vec<f32>,
    grow: Vec<Priority>,
    limits: Vec<Option<f32>>,
}

impl Scratch {
    fn reset(&mut self, len: usize) {
        for buffer in [&mut self.main, &mut self.min, &mut self.max] {
            buffer.clear();
            buffer.resize(len, 0.0);
        }
        self.grow.clear();
        self.grow.resize(len, Priority::None);
        self.limits.clear();
    }
}

#[derive(Debug)]
pub struct OBox {
    config: ContainerConfig,
    children: Vec<ChildId>,
    constraints: ConstraintTable,
    selector: OrientationSelector,
    state: PassState,
    dirty: bool,
    request: LayoutRequest,
    bias: Option<Option<Orientation>>,
    last_size: Option<Vec2>,
    cached: Option<LayoutResult>,
    scratch: Scratch,
    passes: u64,
}

impl Default for OBox {
    fn default() -> Self {
        Self::new()
    }
}

impl OBox {
    pub fn new() -> Self {
        Self::with_config(ContainerConfig::default())
    }

    pub fn with_config(config: ContainerConfig) -> Self {
        Self {
            config,
            children: Vec::new(),
            constraints: ConstraintTable::new(),
            selector: OrientationSelector::new(),
            state: PassState::Idle,
            dirty: true,
            request: LayoutRequest::default(),
            bias: None,
            last_size: None,
            cached: None,
            scratch: Scratch::default(),
            passes: 0,
        }
    }

    pub fn with_spacing(spacing: f32) -> Self {
        let mut obox = Self::new();
        obox.set_spacing(spacing);
        obox
    }

    pub fn with_orientation(orientation: Orientation) -> Self {
        let mut obox = Self::new();
        obox.set_orientation(orientation);
        obox
    }

    pub fn with_children(children: impl IntoIterator<Item = ChildId>) -> Self {
        let mut obox = Self::new();
        for child in children {
            obox.add_child(child);
        }
        obox
    }

    /// Builds a box holding every child of `scene` with its constraints.
    /// Child ids are the scene's positional ids.
    pub fn from_scene(scene: &SceneFile) -> Self {
        let mut obox = Self::with_config(scene.config);
        for (id, child) in scene.child_ids().zip(&scene.children) {
            obox.add_child(id);
            obox.constraints.update(id, |c| *c = child.constraints);
        }
        obox
    }

    // Configuration

    pub fn config(&self) -> &ContainerConfig {
        &self.config
    }

    /// Applies `update` to the configuration; marks the box dirty if it changed.
    pub fn configure(&mut self, update: impl FnOnce(&mut ContainerConfig)) {
        let before = self.config;
        update(&mut self.config);
        if before != self.config {
            self.mark_dirty();
        }
    }

    /// The configured orientation. After a pass with auto-orientation this
    /// is the orientation that pass resolved to.
    pub fn orientation(&self) -> Orientation {
        self.config.orientation
    }

    pub fn set_orientation(&mut self, orientation: Orientation) {
        self.configure(|c| c.orientation = orientation);
    }

    pub fn is_orientation_vertical(&self) -> bool {
        self.config.orientation.is_vertical()
    }

    pub fn is_orientation_horizontal(&self) -> bool {
        self.config.orientation.is_horizontal()
    }

    /// Orientation the most recent pass resolved to, `None` before the first.
    pub fn resolved_orientation(&self) -> Option<Orientation> {
        self.selector.last_resolved()
    }

    pub fn is_auto_orientate(&self) -> bool {
        self.config.auto_orientate
    }

    pub fn set_auto_orientate(&mut self, auto: bool) {
        self.configure(|c| c.auto_orientate = auto);
    }

    /// Sets horizontal and vertical spacing together.
    pub fn set_spacing(&mut self, spacing: f32) {
        self.configure(|c| {
            c.h_spacing = spacing;
            c.v_spacing = spacing;
        });
    }

    /// Gap between children of a row.
    pub fn set_h_spacing(&mut self, spacing: f32) {
        self.configure(|c| c.h_spacing = spacing);
    }

    /// Gap between children of a column.
    pub fn set_v_spacing(&mut self, spacing: f32) {
        self.configure(|c| c.v_spacing = spacing);
    }

    /// `(horizontal, vertical)` spacing, negative values reported as zero.
    pub fn spacing(&self) -> (f32, f32) {
        (
            self.config.spacing(Orientation::Horizontal),
            self.config.spacing(Orientation::Vertical),
        )
    }

    pub fn is_spacing_identical(&self) -> bool {
        let (h, v) = self.spacing();
        h == v
    }

    pub fn alignment(&self) -> Alignment {
        self.config.alignment
    }

    pub fn set_alignment(&mut self, alignment: Alignment) {
        self.configure(|c| c.alignment = alignment);
    }

    pub fn set_fill_main(&mut self, fill: bool) {
        self.configure(|c| c.fill_main = fill);
    }

    pub fn set_fill_cross(&mut self, fill: bool) {
        self.configure(|c| c.fill_cross = fill);
    }

    pub fn set_snap_to_pixel(&mut self, snap: bool) {
        self.configure(|c| c.snap_to_pixel = snap);
    }

    pub fn set_scale(&mut self, scale_x: f32, scale_y: f32) {
        self.configure(|c| {
            c.scale_x = scale_x;
            c.scale_y = scale_y;
        });
    }

    pub fn set_padding(&mut self, padding: Insets) {
        self.configure(|c| c.padding = padding);
    }

    // Children

    pub fn children(&self) -> &[ChildId] {
        &self.children
    }

    /// Appends `id`; a child already in the box is left where it is.
    pub fn add_child(&mut self, id: ChildId) -> bool {
        if self.children.contains(&id) {
            return false;
        }
        self.children.push(id);
        self.children_changed();
        true
    }

    /// Inserts `id` at `index` (clamped to the end).
    pub fn insert_child(&mut self, index: usize, id: ChildId) -> bool {
        if self.children.contains(&id) {
            return false;
        }
        let index = index.min(self.children.len());
        self.children.insert(index, id);
        self.children_changed();
        true
    }

    pub fn remove_child(&mut self, id: ChildId) -> bool {
        let Some(index) = self.children.iter().position(|&c| c == id) else {
            return false;
        };
        self.children.remove(index);
        self.children_changed();
        true
    }

    pub fn clear_children(&mut self) {
        if !self.children.is_empty() {
            self.children.clear();
            self.children_changed();
        }
    }

    fn children_changed(&mut self) {
        self.bias = None;
        self.mark_dirty();
    }

    // Per-child constraints

    pub fn margin(&self, id: ChildId) -> Insets {
        self.constraints.get(id).margin
    }

    pub fn set_margin(&mut self, id: ChildId, margin: Insets) {
        if self.constraints.set_margin(id, margin) {
            self.constraint_changed(id);
        }
    }

    pub fn hgrow(&self, id: ChildId) -> Priority {
        self.constraints.get(id).hgrow
    }

    pub fn set_hgrow(&mut self, id: ChildId, priority: Priority) {
        if self.constraints.set_hgrow(id, priority) {
            self.constraint_changed(id);
        }
    }

    pub fn vgrow(&self, id: ChildId) -> Priority {
        self.constraints.get(id).vgrow
    }

    pub fn set_vgrow(&mut self, id: ChildId, priority: Priority) {
        if self.constraints.set_vgrow(id, priority) {
            self.constraint_changed(id);
        }
    }

    pub fn clear_constraints(&mut self, id: ChildId) {
        if self.constraints.clear(id) {
            self.constraint_changed(id);
        }
    }

    fn constraint_changed(&mut self, id: ChildId) {
        if self.children.contains(&id) {
            self.mark_dirty();
        }
    }

    // Invalidation

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// A handle that marks this box dirty when requested.
    pub fn layout_request(&self) -> LayoutRequest {
        self.request.clone()
    }

    pub fn needs_layout(&self, size: Vec2) -> bool {
        self.dirty || self.request.is_requested() || self.last_size != Some(size) || self.cached.is_none()
    }

    pub fn state(&self) -> PassState {
        self.state
    }

    /// Number of passes run so far.
    pub fn pass_count(&self) -> u64 {
        self.passes
    }

    /// Content bias derived from the children: `Horizontal` if any child has
    /// it, otherwise `Vertical` if any child has that.
    pub fn content_bias<N: LayoutNode>(&mut self, nodes: &HashMap<ChildId, N>) -> Option<Orientation> {
        if let Some(bias) = self.bias {
            return bias;
        }
        let mut bias = None;
        for node in self.children.iter().filter_map(|id| nodes.get(id)) {
            match node.content_bias() {
                Some(Orientation::Horizontal) => {
                    bias = Some(Orientation::Horizontal);
                    break;
                }
                Some(Orientation::Vertical) => bias = Some(Orientation::Vertical),
                None => {}
            }
        }
        self.bias = Some(bias);
        bias
    }

    // Layout

    /// Lays the children out in a box of `size`, recomputing only if needed.
    pub fn layout<N: LayoutNode>(&mut self, nodes: &HashMap<ChildId, N>, size: Vec2) -> &LayoutResult {
        if self.needs_layout(size) {
            self.dirty = false;
            self.request.take();

            let mut result = self.run_pass(nodes, size);
            if self.request.take() {
                debug!("Layout requested during pass, running one follow-up pass");
                result = self.run_pass(nodes, size);
                if self.request.take() {
                    self.dirty = true;
                }
            }

            self.last_size = Some(size);
            self.cached = Some(result);
        }
        self.cached.get_or_insert_with(LayoutResult::default)
    }

    fn run_pass<N: LayoutNode>(&mut self, nodes: &HashMap<ChildId, N>, size: Vec2) -> LayoutResult {
        self.passes += 1;
        self.state = PassState::Measuring;

        let main = self.selector.resolve(&mut self.config, size.x, size.y);
        let cross = main.other();
        let config = self.config;
        let snapper = PixelSnapper::from_config(&config);

        let mut managed: Vec<(ChildId, &N, Insets, Priority)> = Vec::with_capacity(self.children.len());
        for &id in &self.children {
            match nodes.get(&id) {
                Some(node) => {
                    let constraints = self.constraints.get(id);
                    managed.push((id, node, constraints.margin, constraints.grow(main)));
                }
                None => warn!("Child {} has no node, skipping it", id),
            }
        }

        if managed.is_empty() {
            self.state = PassState::Idle;
            return LayoutResult::empty(main);
        }

        let padding = Insets {
            top: snapper.snap_space(config.padding.top, Orientation::Vertical),
            right: snapper.snap_space(config.padding.right, Orientation::Horizontal),
            bottom: snapper.snap_space(config.padding.bottom, Orientation::Vertical),
            left: snapper.snap_space(config.padding.left, Orientation::Horizontal),
        };
        let main_space = along(size, main) - padding.along(main);
        let cross_space = along(size, cross) - padding.along(cross);
        let spacing = snapper.snap_space(config.spacing(main), main);

        let baseline_aligned = main.is_horizontal() && config.alignment.is_baseline();
        let fill_cross = config.fill_cross && !baseline_aligned;
        let (min_complement, pref_complement) = if baseline_aligned {
            let nodes = managed.iter().map(|(_, node, _, _)| *node);
            (
                Some(baseline_complement(nodes.clone(), ComplementKind::Min)),
                Some(baseline_complement(nodes, ComplementKind::Pref)),
            )
        } else {
            (None, None)
        };

        let model = SizeModel::new(&snapper, main, config.fill_main, fill_cross);
        let pref_model = model.with_complement(pref_complement);
        let min_model = model.with_complement(min_complement);

        // Measuring: preferred main extents at the cross space.
        self.scratch.reset(managed.len());
        for (i, (_, node, margin, _)) in managed.iter().enumerate() {
            self.scratch.main[i] = pref_model.pref_extent(*node, margin, main, Some(cross_space));
        }

        // Distributing: bounds are recomputed at the cross extent children
        // will actually get.
        self.state = PassState::Distributing;
        let cross_hint = fill_cross.then_some(cross_space);
        for (i, (_, node, margin, grow)) in managed.iter().enumerate() {
            let min = min_model.min_extent(*node, margin, main, cross_hint);
            let max = min_model.max_extent(*node, margin, main, cross_hint);
            self.scratch.min[i] = min;
            self.scratch.max[i] = max;
            self.scratch.grow[i] = *grow;
            self.scratch.main[i] = bounded_size(min, self.scratch.main[i], max);
        }

        let bounds = DistributionBounds {
            min: &self.scratch.min,
            max: &self.scratch.max,
            grow: &self.scratch.grow,
        };
        let distribution = SpaceDistributor::new(&snapper, main).distribute(
            &mut self.scratch.main,
            &bounds,
            main_space,
            spacing,
            &mut self.scratch.limits,
        );

        // Positioning
        self.state = PassState::Positioning;
        let mut result = LayoutResult::empty(main);
        result.content_extent = distribution.content;
        result.residual = distribution.residual;
        result.allocated = self.scratch.main.clone();

        let sizes: Vec<(f32, f32)> = managed
            .iter()
            .zip(&self.scratch.main)
            .map(|((_, node, margin, _), &area)| child_size(&model, *node, margin, area, cross_space))
            .collect();

        let cross_start = padding.leading(cross);
        let calculator = BaselineCalculator::new(min_model, config.fill_cross);
        let complement = min_complement.unwrap_or(0.0);
        let baseline = baseline_aligned.then(|| {
            let children: Vec<(&N, Insets)> = managed.iter().map(|(_, node, margin, _)| (*node, *margin)).collect();
            let widths: Vec<f32> = sizes.iter().map(|(width, _)| *width).collect();
            calculator.container_baseline(&children, &widths, cross_space, complement)
        });
        result.baseline = baseline;

        let mut cursor = padding.leading(main) + config.alignment.main.offset(main_space, distribution.content);
        for (i, (id, node, margin, _)) in managed.iter().enumerate() {
            let area = self.scratch.main[i];
            let (main_size, cross_size) = sizes[i];
            let snapped_margin = model.snap_margin(margin);

            let main_free = area - snapped_margin.along(main);
            let main_pos = cursor + snapped_margin.leading(main) + config.alignment.main.offset(main_free, main_size);

            let (cross_pos, cross_size) = match baseline {
                Some(baseline) => {
                    let contribution = calculator.contribution(*node, margin, main_size, cross_space, complement);
                    let cross_size = match node.baseline_offset() {
                        BaselineOffset::SameAsExtent => contribution,
                        BaselineOffset::Offset(_) => cross_size,
                    };
                    // The top margin is already part of the baseline.
                    (cross_start + BaselineCalculator::placement(baseline, contribution), cross_size)
                }
                None => {
                    let cross_free = cross_space - snapped_margin.along(cross);
                    let offset = config.alignment.cross.anchor().offset(cross_free, cross_size);
                    (cross_start + snapped_margin.leading(cross) + offset, cross_size)
                }
            };

            let position = compose(
                main,
                snapper.snap_space(main_pos, main),
                snapper.snap_space(cross_pos, cross),
            );
            let size = compose(main, main_size, cross_size);
            trace!("Child {}: area={:.2} pos={:?} size={:?}", id, area, position, size);

            result.order.push(*id);
            result.computed_positions.insert(*id, position);
            result.computed_sizes.insert(*id, size);

            cursor += area + spacing;
        }

        debug!(
            "OBox pass {}: {:?}, {} children, content {:.2} of {:.2}, residual {:.2}",
            self.passes,
            main,
            managed.len(),
            result.content_extent,
            main_space,
            result.residual
        );

        self.state = PassState::Idle;
        result
    }

    // Intrinsic sizes

    /// Minimum size of the box along `axis` in its configured orientation.
    pub fn min_size<N: LayoutNode>(&self, nodes: &HashMap<ChildId, N>, axis: Orientation) -> f32 {
        self.intrinsic_size(nodes, axis, |model, node, margin, axis| model.min_extent(node, margin, axis, None))
    }

    /// Preferred size of the box along `axis` in its configured orientation.
    pub fn pref_size<N: LayoutNode>(&self, nodes: &HashMap<ChildId, N>, axis: Orientation) -> f32 {
        self.intrinsic_size(nodes, axis, |model, node, margin, axis| model.pref_extent(node, margin, axis, None))
    }

    fn intrinsic_size<N: LayoutNode>(
        &self,
        nodes: &HashMap<ChildId, N>,
        axis: Orientation,
        extent: impl Fn(&SizeModel<'_>, &N, &Insets, Orientation) -> f32,
    ) -> f32 {
        let main = self.config.orientation;
        let snapper = PixelSnapper::from_config(&self.config);
        let model = SizeModel::new(&snapper, main, self.config.fill_main, self.config.fill_cross);
        let padding = snapper.snap_space(self.config.padding.leading(axis), axis)
            + snapper.snap_space(self.config.padding.trailing(axis), axis);

        let extents: Vec<f32> = self
            .children
            .iter()
            .filter_map(|id| nodes.get(id).map(|node| extent(&model, node, &self.margin(*id), axis)))
            .collect();
        if extents.is_empty() {
            return padding;
        }

        let content = if axis == main {
            let spacing = snapper.snap_space(self.config.spacing(main), main);
            extents.iter().sum::<f32>() + spacing * (extents.len() - 1) as f32
        } else {
            extents.iter().copied().fold(0.0, f32::max)
        };
        padding + content
    }
}

impl LayoutEngine for OBox {
    fn compute_layout<N: LayoutNode>(&mut self, nodes: &HashMap<ChildId, N>, size: Vec2) -> LayoutResult {
        self.layout(nodes, size).clone()
    }
}

/// Final child size inside its area. The independent axis is sized first so
/// a content-biased child can be asked about the other one with a hint.
fn child_size<N: LayoutNode + ?Sized>(
    model: &SizeModel<'_>,
    node: &N,
    margin: &Insets,
    area_main: f32,
    area_cross: f32,
) -> (f32, f32) {
    let main = model.main();
    let cross = main.other();
    if node.content_bias() == Some(cross) {
        let cross_size = model.fit_extent(node, margin, cross, area_cross, None);
        let main_size = model.fit_extent(node, margin, main, area_main, Some(cross_size));
        (main_size, cross_size)
    } else {
        let main_size = model.fit_extent(node, margin, main, area_main, None);
        let cross_hint = (node.content_bias() == Some(main)).then_some(main_size);
        let cross_size = model.fit_extent(node, margin, cross, area_cross, cross_hint);
        (main_size, cross_size)
    }
}

fn along(size: Vec2, axis: Orientation) -> f32 {
    match axis {
        Orientation::Horizontal => size.x,
        Orientation::Vertical => size.y,
    }
}

fn compose(main: Orientation, main_value: f32, cross_value: f32) -> Vec2 {
    match main {
        Orientation::Horizontal => Vec2::new(main_value, cross_value),
        Orientation::Vertical => Vec2::new(cross_value, main_value),
    }
}
