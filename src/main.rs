//! JimJam compass animator, headless demo.
//!
//! Builds a small scene of 8-directional sprites and steps it frame by frame,
//! logging which sprite each animated entity shows:
//! - **bevy_ecs** for entity-component-system architecture
//! - **configparser** for the INI configuration
//! - **serde_json** for sprite sheet manifests
//!
//! # Running
//!
//! ```sh
//! RUST_LOG=debug cargo run -- --frames 64 --dt 0.05
//! ```

use std::path::PathBuf;

use clap::Parser;

use jimjam::components::compassanimator::CompassAnimator;
use jimjam::error::CompassError;
use jimjam::game;
use jimjam::resources::compassconfig::CompassConfig;
use jimjam::resources::compasssheetstore::CompassSheetStore;
use jimjam::resources::worldtime::WorldTime;

/// JimJam compass animator demo
#[derive(Parser)]
#[command(version, about = "Steps a headless scene of 8-directional billboard sprites.")]
struct Cli {
    /// INI configuration file. Defaults are used when it is missing.
    #[arg(long, value_name = "PATH", default_value = "./compass.ini")]
    config: PathBuf,

    /// JSON sheet manifest. The built-in demo sheets are used when omitted.
    #[arg(long, value_name = "PATH")]
    manifest: Option<PathBuf>,

    /// Number of frames to simulate.
    #[arg(long, default_value_t = 48)]
    frames: u64,

    /// Seconds per simulated frame.
    #[arg(long, default_value_t = 0.05)]
    dt: f32,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    if let Err(e) = run(&cli) {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<(), CompassError> {
    let mut config = CompassConfig::with_path(&cli.config);
    if cli.config.exists() {
        config.load_from_file()?;
    } else {
        log::info!("No config at {:?}, using defaults", cli.config);
    }

    let mut store = CompassSheetStore::new();
    match &cli.manifest {
        Some(path) => store.load_manifest_file(path, &config)?,
        None => store.load_manifest_str(game::DEMO_MANIFEST, &config)?,
    };

    let mut world = game::build_world(config, store);
    let mut schedule = game::build_schedule();
    let scene = game::spawn_demo_scene(&mut world)?;

    for frame in 0..cli.frames {
        let t = world.resource::<WorldTime>().elapsed;
        game::drive_demo(&mut world, &scene, frame, t);
        game::run_frame(&mut world, &mut schedule, cli.dt);

        for (label, entity) in [("knight", scene.knight), ("villager", scene.villager)] {
            if let Some(animator) = world.get::<CompassAnimator>(entity) {
                let sprite = animator.current_sprite();
                log::info!(
                    "frame {:>3} {:<8} {:<13} {:<2} f{} -> {} @ ({}, {})",
                    frame,
                    label,
                    animator.sheet().name,
                    animator.state.direction.short_name(),
                    animator.state.frame_index,
                    sprite.tex_key,
                    sprite.offset.x,
                    sprite.offset.y
                );
            }
        }
    }
    Ok(())
}
