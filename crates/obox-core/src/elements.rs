// crates/obox-core/src/elements.rs
use glam::Vec2;
use crate::{BaselineOffset, Orientation, UNBOUNDED};

/// Sizing interface a host node exposes to the layout engine.
///
/// `hint` is the resolved extent along the *other* axis, or `None` when it
/// is not known yet. Nodes without a content bias ignore it.
pub trait LayoutNode {
    fn min_size(&self, axis: Orientation, hint: Option<f32>) -> f32;
    fn pref_size(&self, axis: Orientation, hint: Option<f32>) -> f32;
    fn max_size(&self, axis: Orientation, hint: Option<f32>) -> f32;

    /// The axis whose extent this node's other extent depends on.
    /// `Horizontal` means "height depends on width".
    fn content_bias(&self) -> Option<Orientation> {
        None
    }

    fn baseline_offset(&self) -> BaselineOffset {
        BaselineOffset::SameAsExtent
    }

    fn is_resizable(&self) -> bool {
        true
    }
}

impl<T: LayoutNode + ?Sized> LayoutNode for Box<T> {
    fn min_size(&self, axis: Orientation, hint: Option<f32>) -> f32 {
        (**self).min_size(axis, hint)
    }

    fn pref_size(&self, axis: Orientation, hint: Option<f32>) -> f32 {
        (**self).pref_size(axis, hint)
    }

    fn max_size(&self, axis: Orientation, hint: Option<f32>) -> f32 {
        (**self).max_size(axis, hint)
    }

    fn content_bias(&self) -> Option<Orientation> {
        (**self).content_bias()
    }

    fn baseline_offset(&self) -> BaselineOffset {
        (**self).baseline_offset()
    }

    fn is_resizable(&self) -> bool {
        (**self).is_resizable()
    }
}

/// A plain node with fixed size ranges, optionally flowing its content so
/// that one extent follows the other (wrapped text, fixed-area boxes).
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub id: String,

    // Size ranges
    pub min_size: Vec2,
    pub pref_size: Vec2,
    pub max_size: Vec2,

    pub baseline: BaselineOffset,
    pub content_bias: Option<Orientation>,
    pub resizable: bool,

    /// Content area kept constant along the biased axis: with a horizontal
    /// bias, height = area / width.
    pub flow_area: Option<f32>,
}

impl Default for Element {
    fn default() -> Self {
        Self {
            id: String::new(),
            min_size: Vec2::ZERO,
            pref_size: Vec2::ZERO,
            max_size: Vec2::splat(UNBOUNDED),
            baseline: BaselineOffset::SameAsExtent,
            content_bias: None,
            resizable: true,
            flow_area: None,
        }
    }
}

impl Element {
    pub fn new(id: impl Into<String>, pref_width: f32, pref_height: f32) -> Self {
        Self {
            id: id.into(),
            pref_size: Vec2::new(pref_width, pref_height),
            ..Default::default()
        }
    }

    pub fn with_min(mut self, width: f32, height: f32) -> Self {
        self.min_size = Vec2::new(width, height);
        self
    }

    pub fn with_max(mut self, width: f32, height: f32) -> Self {
        self.max_size = Vec2::new(width, height);
        self
    }

    pub fn with_baseline(mut self, offset: f32) -> Self {
        self.baseline = BaselineOffset::Offset(offset);
        self
    }

    /// Makes the extent across `bias` follow `area / extent along bias`.
    pub fn with_flow(mut self, bias: Orientation, area: f32) -> Self {
        self.content_bias = Some(bias);
        self.flow_area = Some(area);
        self
    }

    pub fn fixed(mut self) -> Self {
        self.resizable = false;
        self
    }

    fn component(size: Vec2, axis: Orientation) -> f32 {
        match axis {
            Orientation::Horizontal => size.x,
            Orientation::Vertical => size.y,
        }
    }

    /// Extent along `axis` dictated by the flow area, if `axis` is the
    /// dependent axis and the hint is usable.
    fn flowed(&self, axis: Orientation, hint: Option<f32>) -> Option<f32> {
        let bias = self.content_bias?;
        if axis == bias {
            return None;
        }
        let area = self.flow_area?;
        let hint = hint.filter(|h| h.is_finite() && *h > 0.0)?;
        Some((area / hint).ceil())
    }
}

impl LayoutNode for Element {
    fn min_size(&self, axis: Orientation, hint: Option<f32>) -> f32 {
        if !self.resizable {
            return Self::component(self.pref_size, axis);
        }
        let min = Self::component(self.min_size, axis);
        match self.flowed(axis, hint) {
            Some(flowed) => flowed.max(min),
            None => min,
        }
    }

    fn pref_size(&self, axis: Orientation, hint: Option<f32>) -> f32 {
        let pref = Self::component(self.pref_size, axis);
        if !self.resizable {
            return pref;
        }
        self.flowed(axis, hint).unwrap_or(pref)
    }

    fn max_size(&self, axis: Orientation, _hint: Option<f32>) -> f32 {
        if !self.resizable {
            return Self::component(self.pref_size, axis);
        }
        Self::component(self.max_size, axis)
    }

    fn content_bias(&self) -> Option<Orientation> {
        self.content_bias
    }

    fn baseline_offset(&self) -> BaselineOffset {
        self.baseline
    }

    fn is_resizable(&self) -> bool {
        self.resizable
    }
}
