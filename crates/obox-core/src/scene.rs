// crates/obox-core/src/scene.rs
//! JSON scene files: one container, its configuration and its children.
//!
//! ```json
//! {
//!   "width": 300, "height": 200,
//!   "container": { "orientation": "horizontal", "auto_orientate": true,
//!                  "spacing": 4, "v_spacing": 2, "alignment": "center baseline" },
//!   "children": [
//!     { "id": "label", "pref": [60, 20], "baseline": 14 },
//!     { "id": "field", "pref": [120, 24], "max": [null, 24], "hgrow": "always" }
//!   ]
//! }
//! ```

use crate::{
    Alignment, BaselineOffset, BoxError, ChildConstraints, ChildId, ContainerConfig, Element,
    Insets, Orientation, Priority, Result, UNBOUNDED,
};
use glam::Vec2;
use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use tracing::debug;

#[derive(Debug, Clone)]
pub struct SceneFile {
    pub width: f32,
    pub height: f32,
    pub config: ContainerConfig,
    pub children: Vec<SceneChild>,
}

#[derive(Debug, Clone)]
pub struct SceneChild {
    pub element: Element,
    pub constraints: ChildConstraints,
}

impl SceneFile {
    /// Child ids are positions in the file, which keeps them stable and
    /// matches placement order.
    pub fn child_ids(&self) -> impl Iterator<Item = ChildId> + '_ {
        (0..self.children.len()).map(|i| i as ChildId)
    }

    pub fn nodes(&self) -> HashMap<ChildId, Element> {
        self.child_ids()
            .zip(self.children.iter().map(|c| c.element.clone()))
            .collect()
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawScene {
    width: f32,
    height: f32,
    #[serde(default)]
    container: RawContainer,
    #[serde(default)]
    children: Vec<RawChild>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct RawContainer {
    orientation: Option<Orientation>,
    auto_orientate: Option<bool>,
    spacing: Option<f32>,
    h_spacing: Option<f32>,
    v_spacing: Option<f32>,
    alignment: Option<String>,
    fill_main: Option<bool>,
    fill_cross: Option<bool>,
    snap_to_pixel: Option<bool>,
    scale: Option<f32>,
    scale_x: Option<f32>,
    scale_y: Option<f32>,
    padding: Option<[f32; 4]>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawChild {
    id: String,
    pref: [f32; 2],
    #[serde(default)]
    min: Option<[f32; 2]>,
    #[serde(default)]
    max: Option<[Option<f32>; 2]>,
    #[serde(default)]
    margin: Option<[f32; 4]>,
    #[serde(default)]
    hgrow: Option<Priority>,
    #[serde(default)]
    vgrow: Option<Priority>,
    #[serde(default)]
    baseline: Option<f32>,
    #[serde(default)]
    bias: Option<Orientation>,
    #[serde(default)]
    flow_area: Option<f32>,
    #[serde(default)]
    resizable: Option<bool>,
}

pub struct SceneParser {
    source: String,
}

impl SceneParser {
    pub fn new(source: impl Into<String>) -> Self {
        Self { source: source.into() }
    }

    pub fn parse(&self) -> Result<SceneFile> {
        let raw: RawScene = serde_json::from_str(&self.source)?;

        let size = check_pair("size", [raw.width, raw.height])?;
        let (width, height) = (size.x, size.y);
        let config = Self::parse_container(raw.container)?;

        let mut seen = HashSet::new();
        let mut children = Vec::with_capacity(raw.children.len());
        for child in raw.children {
            if child.id.is_empty() {
                return Err(BoxError::InvalidScene("child without an id".to_string()));
            }
            if !seen.insert(child.id.clone()) {
                return Err(BoxError::DuplicateChild(child.id));
            }
            children.push(Self::parse_child(child)?);
        }

        debug!("Parsed scene {}x{} with {} children", width, height, children.len());

        Ok(SceneFile { width, height, config, children })
    }

    fn parse_container(raw: RawContainer) -> Result<ContainerConfig> {
        let defaults = ContainerConfig::default();
        let spacing = raw.spacing.unwrap_or(defaults.h_spacing);
        let scale = raw.scale.unwrap_or(1.0);

        // Spacing and scales are clamped by the engine, not rejected here.
        Ok(ContainerConfig {
            orientation: raw.orientation.unwrap_or(defaults.orientation),
            auto_orientate: raw.auto_orientate.unwrap_or(defaults.auto_orientate),
            h_spacing: raw.h_spacing.unwrap_or(spacing),
            v_spacing: raw.v_spacing.unwrap_or(spacing),
            alignment: raw
                .alignment
                .as_deref()
                .map(Alignment::from_string)
                .unwrap_or(defaults.alignment),
            fill_main: raw.fill_main.unwrap_or(defaults.fill_main),
            fill_cross: raw.fill_cross.unwrap_or(defaults.fill_cross),
            snap_to_pixel: raw.snap_to_pixel.unwrap_or(defaults.snap_to_pixel),
            scale_x: raw.scale_x.unwrap_or(scale),
            scale_y: raw.scale_y.unwrap_or(scale),
            padding: match raw.padding {
                Some(padding) => check_insets("container.padding", padding)?,
                None => defaults.padding,
            },
        })
    }

    fn parse_child(raw: RawChild) -> Result<SceneChild> {
        let field = |name: &str| format!("{}.{}", raw.id, name);

        let pref = check_pair(&field("pref"), raw.pref)?;
        let min = match raw.min {
            Some(min) => check_pair(&field("min"), min)?,
            None => Vec2::ZERO,
        };
        let max = match raw.max {
            Some([w, h]) => Vec2::new(
                check_length(&field("max"), w.unwrap_or(UNBOUNDED))?,
                check_length(&field("max"), h.unwrap_or(UNBOUNDED))?,
            ),
            None => Vec2::splat(UNBOUNDED),
        };

        if raw.flow_area.is_some() && raw.bias.is_none() {
            return Err(BoxError::InvalidScene(format!(
                "child '{}' has a flow_area but no bias",
                raw.id
            )));
        }

        let baseline = match raw.baseline {
            Some(offset) => BaselineOffset::Offset(check_length(&field("baseline"), offset)?),
            None => BaselineOffset::SameAsExtent,
        };
        let margin = match raw.margin {
            Some(margin) => check_insets(&field("margin"), margin)?,
            None => Insets::ZERO,
        };

        let element = Element {
            id: raw.id,
            min_size: min,
            pref_size: pref,
            max_size: max,
            baseline,
            content_bias: raw.bias,
            resizable: raw.resizable.unwrap_or(true),
            flow_area: raw.flow_area,
        };

        Ok(SceneChild {
            element,
            constraints: ChildConstraints {
                margin,
                hgrow: raw.hgrow.unwrap_or_default(),
                vgrow: raw.vgrow.unwrap_or_default(),
            },
        })
    }
}

pub fn load_scene_file(path: &str) -> Result<SceneFile> {
    let source = std::fs::read_to_string(path)?;
    SceneParser::new(source).parse()
}

/// Accepts non-negative lengths; `UNBOUNDED` is allowed.
fn check_length(field: &str, value: f32) -> Result<f32> {
    if value.is_nan() || value < 0.0 || value == f32::NEG_INFINITY {
        return Err(BoxError::InvalidValue {
            field: field.to_string(),
            value: value.to_string(),
        });
    }
    Ok(value)
}

fn check_pair(field: &str, [w, h]: [f32; 2]) -> Result<Vec2> {
    let w = check_length(field, w)?;
    let h = check_length(field, h)?;
    if w.is_infinite() || h.is_infinite() {
        return Err(BoxError::InvalidValue {
            field: field.to_string(),
            value: format!("[{}, {}]", w, h),
        });
    }
    Ok(Vec2::new(w, h))
}

fn check_insets(field: &str, values: [f32; 4]) -> Result<Insets> {
    for value in values {
        if !value.is_finite() {
            return Err(BoxError::InvalidValue {
                field: field.to_string(),
                value: value.to_string(),
            });
        }
    }
    Ok(Insets::from(values))
}
