use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use glam::Vec2;
use serde_json::json;
use tracing::{debug, info, warn};

use obox_core::{load_scene_file, SceneFile};
use obox_layout::{LayoutResult, OBox};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Format {
    Tree,
    Json,
}

#[derive(Parser)]
#[command(author, version, about = "Lays out a box scene and prints the resulting geometry", long_about = None)]
struct Args {
    /// Path to the .json scene file
    #[arg(value_name = "FILE")]
    scene_file: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "tree")]
    format: Format,

    /// Override the container width from the scene
    #[arg(long)]
    width: Option<f32>,

    /// Override the container height from the scene
    #[arg(long)]
    height: Option<f32>,

    /// Save output to file instead of stdout
    #[arg(short, long)]
    output: Option<String>,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(if args.debug {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")?;

    if !Path::new(&args.scene_file).exists() {
        anyhow::bail!("Scene file not found: {}", args.scene_file);
    }
    if !args.scene_file.ends_with(".json") {
        warn!("File doesn't have .json extension: {}", args.scene_file);
    }

    info!("Loading scene: {}", args.scene_file);
    let scene = load_scene_file(&args.scene_file)
        .with_context(|| format!("Failed to load scene: {}", args.scene_file))?;

    let size = Vec2::new(
        args.width.unwrap_or(scene.width),
        args.height.unwrap_or(scene.height),
    );
    if !(size.x.is_finite() && size.y.is_finite() && size.x >= 0.0 && size.y >= 0.0) {
        anyhow::bail!("Invalid container size: {}x{}", size.x, size.y);
    }

    let nodes = scene.nodes();
    let mut obox = OBox::from_scene(&scene);
    let result = obox.layout(&nodes, size).clone();
    debug!("Layout finished after {} pass(es)", obox.pass_count());

    if let Some(resolved) = obox.resolved_orientation() {
        if resolved != scene.config.orientation {
            info!("Auto-orientation switched the box to {:?}", resolved);
        }
    }

    if result.residual != 0.0 {
        info!("{:.2} of main-axis space could not be distributed", result.residual);
    }

    let output_text = match args.format {
        Format::Tree => generate_tree_output(&scene, &result, size),
        Format::Json => generate_json_output(&scene, &result, size)?,
    };

    if let Some(output_file) = args.output {
        fs::write(&output_file, output_text)
            .with_context(|| format!("Failed to write to file: {}", output_file))?;
        info!("Output written to: {}", output_file);
    } else {
        print!("{}", output_text);
    }

    Ok(())
}

fn generate_tree_output(scene: &SceneFile, result: &LayoutResult, size: Vec2) -> String {
    let mut output = format!(
        "OBox {:?} {:.0}x{:.0} content:{:.2}",
        result.orientation, size.x, size.y, result.content_extent
    );
    if let Some(baseline) = result.baseline {
        output.push_str(&format!(" baseline:{:.2}", baseline));
    }
    output.push('\n');

    for (i, id) in result.order.iter().enumerate() {
        let tree_char = if i + 1 == result.order.len() { "└── " } else { "├── " };
        let name = scene
            .children
            .get(*id as usize)
            .map(|child| child.element.id.as_str())
            .unwrap_or("?");

        match result.rect(*id) {
            Some((pos, size)) => output.push_str(&format!(
                "{}{} pos:({:.2},{:.2}) size:({:.2},{:.2}) area:{:.2}\n",
                tree_char, name, pos.x, pos.y, size.x, size.y, result.allocated[i]
            )),
            None => output.push_str(&format!("{}{} (not laid out)\n", tree_char, name)),
        }
    }

    output
}

fn generate_json_output(scene: &SceneFile, result: &LayoutResult, size: Vec2) -> Result<String> {
    let children: Vec<_> = result
        .order
        .iter()
        .zip(&result.allocated)
        .filter_map(|(id, area)| {
            let (pos, child_size) = result.rect(*id)?;
            let name = &scene.children.get(*id as usize)?.element.id;
            Some(json!({
                "id": name,
                "position": [pos.x, pos.y],
                "size": [child_size.x, child_size.y],
                "area": area,
            }))
        })
        .collect();

    let document = json!({
        "width": size.x,
        "height": size.y,
        "orientation": result.orientation,
        "content_extent": result.content_extent,
        "residual": result.residual,
        "baseline": result.baseline,
        "children": children,
    });

    let mut output = serde_json::to_string_pretty(&document).context("Failed to serialize layout")?;
    output.push('\n');
    Ok(output)
}
