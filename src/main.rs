//! # Blaze Demo Entry Point
//!
//! Builds a sprite tree, either from a JSON scene file or from a seeded
//! random layout, and renders it into a macroquad window every frame.

use blaze::{BlazeResult, MacroquadDisplay, SceneDescription, Sprite, SpriteSettings};
use clap::Parser;
use log::{debug, info};
use macroquad::prelude::{
    get_frame_time, is_key_pressed, next_frame, request_new_screen_size, KeyCode,
};
use ::rand::rngs::StdRng;
use ::rand::{Rng, SeedableRng};
use std::path::PathBuf;
#[cfg(feature = "dev-tools")]
use tracing::Level;

/// Command line arguments for the Blaze demo.
#[derive(Parser, Debug)]
#[command(name = "blaze")]
#[command(about = "Renders a sprite scene graph into a window")]
#[command(version)]
struct Args {
    /// Random seed for the generated demo scene
    #[arg(short, long)]
    seed: Option<u64>,

    /// JSON scene file to render instead of the generated scene
    #[arg(long)]
    scene: Option<PathBuf>,

    /// Number of top-level sprites in the generated scene
    #[arg(long, default_value_t = 12)]
    sprites: usize,

    /// Degrees each top-level sprite turns per frame
    #[arg(long, default_value_t = 1.0)]
    spin: f32,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[macroquad::main("Blaze")]
async fn main() -> BlazeResult<()> {
    let args = Args::parse();

    initialize_logging(&args.log_level);

    info!("Starting Blaze v{}", blaze::VERSION);

    let mut root = match &args.scene {
        Some(path) => {
            info!("Loading scene from {}", path.display());
            SceneDescription::load(path)?.build()?
        }
        None => {
            let seed = args.seed.unwrap_or(12345);
            info!("Generating demo scene with seed: {}", seed);
            demo_scene(seed, args.sprites)?
        }
    };

    let (width, height) = root.surface().size();
    request_new_screen_size(width as f32, height as f32);

    run_loop(&mut root, args.spin).await
}

/// Initializes the logging system based on the specified log level.
fn initialize_logging(log_level: &str) {
    #[cfg(feature = "dev-tools")]
    {
        let level = match log_level.to_lowercase().as_str() {
            "error" => Level::ERROR,
            "warn" => Level::WARN,
            "info" => Level::INFO,
            "debug" => Level::DEBUG,
            "trace" => Level::TRACE,
            _ => Level::INFO,
        };

        tracing_subscriber::fmt()
            .with_max_level(level)
            .with_target(false)
            .init();
    }

    #[cfg(not(feature = "dev-tools"))]
    {
        env_logger::Builder::new()
            .parse_filters(log_level)
            .format_target(false)
            .init();
    }
}

/// Builds a seeded scene: a dark backdrop carrying translucent, rotated
/// squares, plus one transparent layer at the origin that groups a second
/// set of squares.
fn demo_scene(seed: u64, count: usize) -> BlazeResult<Sprite> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut square = || SpriteSettings {
        width: rng.gen_range(24..96),
        height: rng.gen_range(24..96),
        alpha: rng.gen_range(0.3..1.0),
        rotation: rng.gen_range(0.0..360.0),
        x: rng.gen_range(0.0..320.0),
        y: rng.gen_range(0.0..240.0),
        fill: Some([rng.gen(), rng.gen(), rng.gen(), 255]),
        ..SpriteSettings::default()
    };

    let backdrop = SpriteSettings {
        width: 640,
        height: 480,
        fill: Some([16, 16, 24, 255]),
        ..SpriteSettings::default()
    };
    let layer = SpriteSettings {
        width: 640,
        height: 480,
        alpha: 0.6,
        children: (0..count / 2).map(|_| square()).collect(),
        ..SpriteSettings::default()
    };

    let mut root = backdrop.build()?;
    for _ in 0..count {
        root.add(square().build()?);
    }
    root.add(layer.build()?);

    debug!("demo scene has {} top-level sprites", root.child_count());
    Ok(root)
}

/// Main render loop implementation.
async fn run_loop(root: &mut Sprite, spin: f32) -> BlazeResult<()> {
    let mut display = MacroquadDisplay::new();

    loop {
        if is_key_pressed(KeyCode::Escape) || is_key_pressed(KeyCode::Q) {
            info!("Quit requested");
            break;
        }

        if is_key_pressed(KeyCode::Space) {
            for child in root.children_mut() {
                child.visible = !child.visible;
            }
        }

        for child in root.children_mut() {
            if child.child_count() == 0 {
                child.rotation = (child.rotation + spin) % 360.0;
            }
        }

        root.render(Some(&mut display))?;
        display.present();

        next_frame().await;
        display.record_frame_time(get_frame_time());
    }

    info!("Render loop ended ({} slow frames)", display.overruns());
    Ok(())
}
