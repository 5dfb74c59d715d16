// crates/obox-layout/src/lib.rs

use obox_core::{ChildId, LayoutNode, Orientation};
use glam::Vec2;
use std::collections::HashMap;

pub mod snap;
pub mod orientation;
pub mod constraints;
pub mod size_model;
pub mod baseline;
pub mod distribute;
pub mod arranger;

pub use snap::*;
pub use orientation::*;
pub use constraints::*;
pub use size_model::*;
pub use baseline::*;
pub use distribute::*;
pub use arranger::*;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct LayoutResult {
    pub computed_positions: HashMap<ChildId, Vec2>,
    pub computed_sizes: HashMap<ChildId, Vec2>,
    /// Laid out children in placement order. Children without a node are absent.
    pub order: Vec<ChildId>,
    /// Main-axis area each child was allocated, margins included, in `order`.
    pub allocated: Vec<f32>,
    pub orientation: Orientation,
    /// Sum of allocated areas and spacing along the main axis.
    pub content_extent: f32,
    /// Main-axis space left over (positive) or missing (negative) because
    /// every child was pinned at a bound.
    pub residual: f32,
    /// Shared baseline, below the content top, for baseline-aligned rows.
    pub baseline: Option<f32>,
}

impl LayoutResult {
    pub fn empty(orientation: Orientation) -> Self {
        Self {
            orientation,
            ..Default::default()
        }
    }

    /// Position and size of `id`, if it was laid out.
    pub fn rect(&self, id: ChildId) -> Option<(Vec2, Vec2)> {
        Some((*self.computed_positions.get(&id)?, *self.computed_sizes.get(&id)?))
    }

    pub fn allocated_main(&self) -> f32 {
        self.allocated.iter().sum()
    }
}

pub trait LayoutEngine {
    fn compute_layout<N: LayoutNode>(&mut self, nodes: &HashMap<ChildId, N>, size: Vec2) -> LayoutResult;
}
