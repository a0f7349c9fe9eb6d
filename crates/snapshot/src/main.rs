//! Render a flat collection to a standalone SVG document.
//!
//! Usage: `flatmap-snapshot <input.json> [output.svg]`
//!
//! The input file carries the scale config and the flat records; selection
//! and hover ids are optional. Output goes to the given path, or stdout.
//! `ZOOM` (env var) picks the Web Mercator zoom level, default 10.

mod mercator;

use flatmap_render::{MarkerLayer, SvgScene};
use flatmap_shared::{Flat, ScaleConfig};
use mercator::WebMercator;
use serde::Deserialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SnapshotInput {
    config: ScaleConfig,
    flats: Vec<Flat>,
    #[serde(default)]
    selected_flat_id: Option<u64>,
    #[serde(default)]
    previewed_flat_id: Option<u64>,
}

/// Run one render pass and serialize the scene.
fn render_snapshot(input: &SnapshotInput, zoom: u8) -> String {
    let projector = WebMercator::new(zoom);
    let world = projector.world_size();
    let mut scene = SvgScene::new(world, world);
    let mut layer = MarkerLayer::new(input.config);

    layer
        .draw(
            &mut scene,
            &projector,
            &input.flats,
            input.selected_flat_id,
            input.previewed_flat_id,
        )
        .expect("render failed");

    scene.to_svg()
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut args = std::env::args().skip(1);
    let input_path = args.next().unwrap_or_else(|| {
        eprintln!("usage: flatmap-snapshot <input.json> [output.svg]");
        std::process::exit(2);
    });
    let output_path = args.next();

    let zoom: u8 = std::env::var("ZOOM")
        .unwrap_or_else(|_| "10".to_string())
        .parse()
        .expect("ZOOM must be an integer");

    let raw = std::fs::read_to_string(&input_path).expect("Failed to read input file");
    let input: SnapshotInput = serde_json::from_str(&raw).expect("Failed to parse input JSON");
    info!(flats = input.flats.len(), zoom, "rendering snapshot");

    let svg = render_snapshot(&input, zoom);

    match output_path {
        Some(path) => std::fs::write(&path, svg).expect("Failed to write output file"),
        None => println!("{svg}"),
    }
}
