// crates/obox-core/src/geometry.rs
use serde::{Deserialize, Serialize};

/// Stable handle of a child inside a container's node graph.
pub type ChildId = u32;

/// Sentinel for a maximum extent with no upper bound.
///
/// Infinity absorbs any finite term, so margins and snapping never turn an
/// unbounded maximum into a finite one.
pub const UNBOUNDED: f32 = f32::INFINITY;

pub fn is_unbounded(value: f32) -> bool {
    value == UNBOUNDED
}

/// Clamps `pref` into `[min, max]`. When `min > max` the minimum wins.
pub fn bounded_size(min: f32, pref: f32, max: f32) -> f32 {
    let a = pref.max(min);
    let b = min.max(max);
    a.min(b)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    Horizontal,
    #[default]
    Vertical,
}

impl Orientation {
    pub fn other(self) -> Self {
        match self {
            Orientation::Horizontal => Orientation::Vertical,
            Orientation::Vertical => Orientation::Horizontal,
        }
    }

    pub fn is_horizontal(self) -> bool {
        self == Orientation::Horizontal
    }

    pub fn is_vertical(self) -> bool {
        self == Orientation::Vertical
    }
}

/// Margin or padding insets, in layout units.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Insets {
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub left: f32,
}

impl Insets {
    pub const ZERO: Insets = Insets { top: 0.0, right: 0.0, bottom: 0.0, left: 0.0 };

    pub fn new(top: f32, right: f32, bottom: f32, left: f32) -> Self {
        Self { top, right, bottom, left }
    }

    pub fn uniform(value: f32) -> Self {
        Self::new(value, value, value, value)
    }

    /// Inset at the start of `axis` (left for horizontal, top for vertical).
    pub fn leading(&self, axis: Orientation) -> f32 {
        match axis {
            Orientation::Horizontal => self.left,
            Orientation::Vertical => self.top,
        }
    }

    pub fn trailing(&self, axis: Orientation) -> f32 {
        match axis {
            Orientation::Horizontal => self.right,
            Orientation::Vertical => self.bottom,
        }
    }

    pub fn along(&self, axis: Orientation) -> f32 {
        self.leading(axis) + self.trailing(axis)
    }
}

impl From<[f32; 4]> for Insets {
    fn from([top, right, bottom, left]: [f32; 4]) -> Self {
        Self::new(top, right, bottom, left)
    }
}

/// Grow priority of a child along one axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    #[default]
    None,
    Sometimes,
    Always,
}

/// Distance from a child's top edge to its baseline.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum BaselineOffset {
    Offset(f32),
    /// The baseline sits at the bottom edge, whatever the child's height.
    #[default]
    SameAsExtent,
}

impl BaselineOffset {
    pub fn offset(self) -> Option<f32> {
        match self {
            BaselineOffset::Offset(value) => Some(value),
            BaselineOffset::SameAsExtent => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AxisAlign {
    #[default]
    Start,
    Center,
    End,
}

impl AxisAlign {
    /// Offset of `content` inside `space` for this anchor.
    pub fn offset(self, space: f32, content: f32) -> f32 {
        match self {
            AxisAlign::Start => 0.0,
            AxisAlign::Center => (space - content) / 2.0,
            AxisAlign::End => space - content,
        }
    }

    fn from_token(token: &str) -> Option<Self> {
        match token {
            "start" | "left" | "top" => Some(AxisAlign::Start),
            "center" => Some(AxisAlign::Center),
            "end" | "right" | "bottom" => Some(AxisAlign::End),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CrossAlign {
    #[default]
    Start,
    Center,
    End,
    Baseline,
}

impl CrossAlign {
    /// The plain anchor used for offsets; baseline places like `Start`.
    pub fn anchor(self) -> AxisAlign {
        match self {
            CrossAlign::Start | CrossAlign::Baseline => AxisAlign::Start,
            CrossAlign::Center => AxisAlign::Center,
            CrossAlign::End => AxisAlign::End,
        }
    }

    fn from_token(token: &str) -> Option<Self> {
        if token == "baseline" {
            return Some(CrossAlign::Baseline);
        }
        AxisAlign::from_token(token).map(|anchor| match anchor {
            AxisAlign::Start => CrossAlign::Start,
            AxisAlign::Center => CrossAlign::Center,
            AxisAlign::End => CrossAlign::End,
        })
    }
}

/// Anchor pair relative to the resolved orientation of a pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Alignment {
    pub main: AxisAlign,
    pub cross: CrossAlign,
}

impl Alignment {
    /// The default anchor, used whenever an alignment cannot be parsed.
    pub const TOP_LEFT: Alignment = Alignment { main: AxisAlign::Start, cross: CrossAlign::Start };

    pub fn new(main: AxisAlign, cross: CrossAlign) -> Self {
        Self { main, cross }
    }

    pub fn is_baseline(&self) -> bool {
        self.cross == CrossAlign::Baseline
    }

    /// Parse `"<main> <cross>"` or a single token applied to both axes
    /// (`"center"`, `"baseline"`). Anything else yields [`Alignment::TOP_LEFT`].
    pub fn from_string(value: &str) -> Self {
        let value = value.trim().to_ascii_lowercase();
        let tokens: Vec<&str> = value
            .split(|c: char| c == '-' || c == '_' || c.is_whitespace())
            .filter(|t| !t.is_empty())
            .collect();

        let parsed = match tokens.as_slice() {
            ["baseline"] => Some(Alignment::new(AxisAlign::Start, CrossAlign::Baseline)),
            [both] => AxisAlign::from_token(both)
                .zip(CrossAlign::from_token(both))
                .map(|(main, cross)| Alignment::new(main, cross)),
            [main, cross] => AxisAlign::from_token(main)
                .zip(CrossAlign::from_token(cross))
                .map(|(main, cross)| Alignment::new(main, cross)),
            _ => None,
        };

        parsed.unwrap_or(Alignment::TOP_LEFT)
    }
}
