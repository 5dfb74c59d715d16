use glam::Vec2;
use obox_core::{Element, LayoutNode, Orientation, Priority, SceneParser, UNBOUNDED};
use obox_layout::{snap, snap_size, LayoutResult, OBox};
use proptest::prelude::*;
use proptest::{collection, option, sample};
use std::collections::HashMap;

fn layout_scene(source: &str) -> (OBox, LayoutResult) {
    let scene = SceneParser::new(source).parse().expect("Failed to parse scene");
    let nodes = scene.nodes();
    let mut obox = OBox::from_scene(&scene);
    let result = obox.layout(&nodes, Vec2::new(scene.width, scene.height)).clone();
    (obox, result)
}

#[derive(Debug, Clone)]
struct ChildSpec {
    pref: f32,
    min: f32,
    max: f32,
    grow: Priority,
}

fn priority() -> impl Strategy<Value = Priority> {
    prop_oneof![Just(Priority::None), Just(Priority::Sometimes), Just(Priority::Always)]
}

fn child_spec() -> impl Strategy<Value = ChildSpec> {
    (10u32..=100, 0u32..=100, option::of(0u32..=60), priority()).prop_map(|(pref, min_percent, extra, grow)| {
        let pref = pref as f32;
        ChildSpec {
            pref,
            min: (pref * min_percent as f32 / 100.0).floor(),
            max: extra.map_or(UNBOUNDED, |extra| pref + extra as f32),
            grow,
        }
    })
}

fn scales() -> impl Strategy<Value = f32> {
    sample::select(vec![1.0f32, 1.25, 1.5, 2.0])
}

struct Case {
    obox: OBox,
    nodes: HashMap<u32, Element>,
    size: Vec2,
}

fn build_case(children: &[ChildSpec], scale: f32, spacing: f32, width: f32) -> Case {
    let mut obox = OBox::with_orientation(Orientation::Horizontal);
    obox.set_scale(scale, scale);
    obox.set_spacing(spacing);

    let mut nodes = HashMap::new();
    for (id, child) in (0u32..).zip(children) {
        nodes.insert(
            id,
            Element::new(format!("c{}", id), child.pref, 20.0)
                .with_min(child.min, 0.0)
                .with_max(child.max, UNBOUNDED),
        );
        obox.add_child(id);
        obox.set_hgrow(id, child.grow);
    }

    Case {
        obox,
        nodes,
        size: Vec2::new(width, 40.0),
    }
}

proptest! {
    #[test]
    fn test_allocation_fills_available_length(
        children in collection::vec(child_spec(), 1..=6),
        scale in scales(),
        spacing in 0u32..=8,
        width in 0u32..=500,
    ) {
        let mut case = build_case(&children, scale, spacing as f32, width as f32);
        let result = case.obox.layout(&case.nodes, case.size).clone();
        let unit = 1.0 / scale;
        let spacing = snap(spacing as f32, scale);
        let n = result.allocated.len() as f32;

        let allocated = result.allocated_main() + spacing * (n - 1.0);
        prop_assert!(
            (allocated - result.content_extent).abs() < 1e-2,
            "allocated {} vs content {}",
            allocated,
            result.content_extent
        );
        prop_assert!((result.content_extent + result.residual - case.size.x).abs() < 1e-2);

        if result.residual.abs() > unit + 1e-3 {
            // Everything that could move is pinned at a bound.
            for (i, id) in result.order.iter().enumerate() {
                let node = &case.nodes[id];
                let area = result.allocated[i];
                if result.residual < 0.0 {
                    let min = snap_size(node.min_size(Orientation::Horizontal, None), scale);
                    prop_assert!((area - min).abs() < 1e-2, "child {} not at min", id);
                } else if case.obox.hgrow(*id) != Priority::None {
                    let max = node.max_size(Orientation::Horizontal, None);
                    prop_assert!(max != UNBOUNDED, "unbounded child {} left space", id);
                    let max = snap_size(max.max(node.min_size(Orientation::Horizontal, None)), scale);
                    prop_assert!((area - max).abs() < 1e-2, "child {} not at max", id);
                }
            }
        }
    }

    #[test]
    fn test_allocation_respects_bounds(
        children in collection::vec(child_spec(), 1..=6),
        scale in scales(),
        spacing in 0u32..=8,
        width in 0u32..=500,
    ) {
        let mut case = build_case(&children, scale, spacing as f32, width as f32);
        let result = case.obox.layout(&case.nodes, case.size).clone();

        for (i, id) in result.order.iter().enumerate() {
            let node = &case.nodes[id];
            let min = snap_size(node.min_size(Orientation::Horizontal, None), scale);
            let max = node.max_size(Orientation::Horizontal, None);
            let area = result.allocated[i];
            prop_assert!(area >= min - 1e-3, "{} below min {}", area, min);
            if max != UNBOUNDED {
                let max = snap_size(max.max(min), scale);
                prop_assert!(area <= max + 1e-3, "{} above max {}", area, max);
            }
        }
    }

    #[test]
    fn test_repeated_passes_match(
        children in collection::vec(child_spec(), 1..=6),
        scale in scales(),
        spacing in 0u32..=8,
        width in 0u32..=500,
    ) {
        let mut case = build_case(&children, scale, spacing as f32, width as f32);
        let first = case.obox.layout(&case.nodes, case.size).clone();
        case.obox.mark_dirty();
        let second = case.obox.layout(&case.nodes, case.size).clone();
        prop_assert_eq!(first, second);
    }
}

#[test]
fn test_auto_orientation_follows_aspect_ratio() {
    let scene = |w: u32, h: u32| {
        format!(
            r#"{{ "width": {}, "height": {}, "container": {{ "auto_orientate": true }},
                 "children": [ {{ "id": "a", "pref": [20, 20] }} ] }}"#,
            w, h
        )
    };

    let (_, result) = layout_scene(&scene(300, 200));
    assert_eq!(result.orientation, Orientation::Horizontal);

    let (_, result) = layout_scene(&scene(150, 300));
    assert_eq!(result.orientation, Orientation::Vertical);

    // A square keeps whatever was resolved before.
    let scene = SceneParser::new(scene(300, 200)).parse().unwrap();
    let nodes = scene.nodes();
    let mut obox = OBox::from_scene(&scene);
    obox.layout(&nodes, Vec2::new(300.0, 200.0));
    let result = obox.layout(&nodes, Vec2::new(200.0, 200.0));
    assert_eq!(result.orientation, Orientation::Horizontal);
}

#[test]
fn test_growth_example() {
    let (_, result) = layout_scene(
        r#"{ "width": 180, "height": 20, "container": { "orientation": "horizontal" },
             "children": [
                { "id": "a", "pref": [50, 20] },
                { "id": "b", "pref": [50, 20], "hgrow": "always" },
                { "id": "c", "pref": [50, 20] }
             ] }"#,
    );
    assert_eq!(result.allocated, vec![50.0, 80.0, 50.0]);
}

#[test]
fn test_shrink_example() {
    let (_, result) = layout_scene(
        r#"{ "width": 250, "height": 20, "container": { "orientation": "horizontal" },
             "children": [
                { "id": "a", "pref": [100, 20], "min": [40, 0] },
                { "id": "b", "pref": [100, 20], "min": [40, 0] },
                { "id": "c", "pref": [100, 20], "min": [40, 0] }
             ] }"#,
    );
    assert_eq!(result.allocated_main(), 250.0);
    for area in &result.allocated {
        assert!((area - 83.33).abs() <= 1.0, "{} is not an even share", area);
    }
}

#[test]
fn test_shrink_at_fractional_scale() {
    let (_, result) = layout_scene(
        r#"{ "width": 250, "height": 20,
             "container": { "orientation": "horizontal", "scale": 1.5 },
             "children": [
                { "id": "a", "pref": [100, 20], "min": [40, 0] },
                { "id": "b", "pref": [100, 20], "min": [40, 0] },
                { "id": "c", "pref": [100, 20], "min": [40, 0] }
             ] }"#,
    );
    assert!((result.allocated_main() - 250.0).abs() <= 1.0 / 1.5);
    for area in &result.allocated {
        let pixels = area * 1.5;
        assert!((pixels - pixels.round()).abs() < 1e-3, "{} is off the pixel grid", area);
    }
}

#[test]
fn test_baseline_example() {
    let (_, result) = layout_scene(
        r#"{ "width": 200, "height": 100,
             "container": { "orientation": "horizontal", "alignment": "start baseline" },
             "children": [
                { "id": "a", "pref": [40, 30], "baseline": 10 },
                { "id": "b", "pref": [40, 30], "baseline": 20 }
             ] }"#,
    );
    assert_eq!(result.baseline, Some(20.0));
    let (a, _) = result.rect(0).unwrap();
    let (b, _) = result.rect(1).unwrap();
    assert_eq!(a.y - b.y, 10.0);
}

#[test]
fn test_flowing_text_in_column() {
    let (_, result) = layout_scene(
        r#"{ "width": 100, "height": 300,
             "children": [
                { "id": "text", "pref": [300, 10], "bias": "horizontal", "flow_area": 6000 },
                { "id": "below", "pref": [20, 20] }
             ] }"#,
    );
    assert_eq!(result.rect(0), Some((Vec2::ZERO, Vec2::new(100.0, 60.0))));
    assert_eq!(result.rect(1).map(|(pos, _)| pos), Some(Vec2::new(0.0, 60.0)));
}

#[test]
fn test_negative_spacing_is_ignored() {
    let (obox, result) = layout_scene(
        r#"{ "width": 100, "height": 20,
             "container": { "orientation": "horizontal", "spacing": -5 },
             "children": [ { "id": "a", "pref": [10, 10] }, { "id": "b", "pref": [10, 10] } ] }"#,
    );
    assert_eq!(obox.spacing(), (0.0, 0.0));
    assert_eq!(result.rect(1).map(|(pos, _)| pos.x), Some(10.0));
}

#[test]
fn test_demo_scenes_lay_out() {
    for name in ["toolbar.json", "form_row.json", "adaptive.json"] {
        let path = format!("{}/demos/{}", env!("CARGO_MANIFEST_DIR"), name);
        let scene = obox_core::load_scene_file(&path).expect("Failed to load demo scene");
        let nodes = scene.nodes();
        let mut obox = OBox::from_scene(&scene);
        let result = obox.layout(&nodes, Vec2::new(scene.width, scene.height));
        assert_eq!(result.order.len(), scene.children.len(), "{}", name);
    }
}
