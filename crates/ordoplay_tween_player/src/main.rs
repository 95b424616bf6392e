// SPDX-License-Identifier: MIT OR Apache-2.0
//! `OrdoPlay` Tween Player - headless scene runner
//!
//! Loads a RON scene, activates every top-level animation and steps the
//! frame loop at a fixed rate, then prints where every object ended up.

use clap::{Parser, ValueEnum};
use ordoplay_tween::{AnimationError, ConfigError, ObjectConfig, Player, SceneConfig};
use std::path::PathBuf;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Run an animation scene without a renderer
#[derive(Parser, Debug)]
#[command(name = "ordoplay_tween_player")]
#[command(about = "Run an OrdoPlay tween scene headless")]
#[command(version)]
struct Args {
    /// Scene file (RON)
    scene: PathBuf,

    /// Frames per second
    #[arg(long, default_value = "60")]
    fps: u32,

    /// Seconds to simulate
    #[arg(long, default_value = "5.0")]
    seconds: f32,

    /// Print the final scene in this format
    #[arg(long, value_enum)]
    dump: Option<DumpFormat>,
}

/// Output format for the final scene
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum DumpFormat {
    Json,
    Ron,
}

/// Error ending a run
#[derive(Debug, thiserror::Error)]
enum RunError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Animation(#[from] AnimationError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("RON error: {0}")]
    Ron(#[from] ron::Error),
}

fn main() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting OrdoPlay Tween Player v{}", env!("CARGO_PKG_VERSION"));

    let args = Args::parse();
    if let Err(err) = run(&args) {
        tracing::error!("{err}");
        std::process::exit(1);
    }
}

fn run(args: &Args) -> Result<(), RunError> {
    let config = SceneConfig::load(&args.scene)?;
    let mut player = config.build()?;
    player.activate_all()?;

    let frames = player.run_for(args.seconds, args.fps)?;
    tracing::info!(
        "Ran {frames} frames ({:.3}s at {} fps), {} still playing",
        player.now(),
        args.fps.max(1),
        player
            .animations()
            .filter(|(_, animation)| animation.is_active())
            .count()
    );

    for (_, object) in player.scene().objects() {
        let t = &object.transform;
        tracing::info!(
            "{}: position {:?} rotation {:?} scale {:?}",
            object.name,
            t.position,
            t.rotation,
            t.scale
        );
    }

    if let Some(format) = args.dump {
        println!("{}", dump(&player, format)?);
    }
    Ok(())
}

/// Final object transforms in the same shape a scene file declares them
fn dump(player: &Player, format: DumpFormat) -> Result<String, RunError> {
    let objects: Vec<ObjectConfig> = player
        .scene()
        .objects()
        .map(|(_, object)| ObjectConfig {
            name: object.name.clone(),
            transform: object.transform,
        })
        .collect();

    Ok(match format {
        DumpFormat::Json => serde_json::to_string_pretty(&objects)?,
        DumpFormat::Ron => {
            ron::ser::to_string_pretty(&objects, ron::ser::PrettyConfig::default())?
        }
    })
}
