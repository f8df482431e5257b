//! Player model simulation command

use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;
use std::sync::Arc;

use q3_md3::{
    AnimNumber, BodyPart, Clock, DirectoryProvider, ManualClock, PlayerModel, PlayerModelOptions,
};

use crate::utils::{add_table_row, create_table, format_vec3};

#[derive(Args)]
pub struct PlayerArgs {
    /// Directory containing lower.md3, upper.md3 and head.md3
    pub dir: PathBuf,

    /// Skin to select
    #[arg(short, long, default_value = "default")]
    pub skin: String,

    /// Torso animation, e.g. TORSO_ATTACK
    #[arg(long, default_value = "TORSO_STAND", value_parser = parse_animation)]
    pub torso: AnimNumber,

    /// Legs animation, e.g. LEGS_RUN
    #[arg(long, default_value = "LEGS_IDLE", value_parser = parse_animation)]
    pub legs: AnimNumber,

    /// Number of ticks to simulate
    #[arg(short, long, default_value = "10")]
    pub ticks: u32,

    /// Simulated milliseconds per tick
    #[arg(long, default_value = "50")]
    pub step_ms: f64,
}

fn parse_animation(name: &str) -> std::result::Result<AnimNumber, String> {
    AnimNumber::from_name(name).ok_or_else(|| format!("unknown animation '{name}'"))
}

pub fn execute(args: PlayerArgs) -> Result<()> {
    let dir = args
        .dir
        .canonicalize()
        .with_context(|| format!("Failed to open {}", args.dir.display()))?;
    let root = dir
        .parent()
        .with_context(|| format!("{} has no parent directory", dir.display()))?;
    let model_name = dir
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .with_context(|| format!("{} has no directory name", dir.display()))?;

    let provider = DirectoryProvider::new(root)
        .with_context(|| format!("Failed to index {}", root.display()))?;
    let clock = ManualClock::new(0.0);
    let options = PlayerModelOptions {
        skin: args.skin,
        torso_animation: args.torso,
        legs_animation: args.legs,
    };
    let mut player = PlayerModel::load(
        Arc::new(provider),
        &model_name,
        Arc::new(clock.clone()),
        options,
    )
    .with_context(|| format!("Failed to load player model from {}", dir.display()))?;

    println!("Player model: {}", dir.display());
    println!("Skin: {}", player.skin_name());
    println!("Available skins: {}", player.available_skins().join(", "));
    if player.animations().is_none() {
        println!("No animation.cfg, parts stay at frame 0");
    }
    println!("Center height: {:.2}", player.center_height());
    println!("Bounding radius: {:.2}", player.bounding_radius());
    println!(
        "Torso: {} ({} frames), legs: {} ({} frames)",
        player.torso_animation(),
        player.torso_frame_count(),
        player.legs_animation(),
        player.legs_frame_count()
    );

    let mut table = create_table(&["Tick", "Time", "Part", "Frame A", "Frame B", "Fraction", "Origin"]);
    for tick in 0..=args.ticks {
        let now = clock.now_ms();
        let pose = player.update(now);
        for part in BodyPart::ALL {
            let part_pose = pose.part(part);
            add_table_row(
                &mut table,
                vec![
                    tick.to_string(),
                    format!("{now:.0}"),
                    part.to_string(),
                    part_pose.frames.frame_a.to_string(),
                    part_pose.frames.frame_b.to_string(),
                    format!("{:.3}", part_pose.frames.fraction),
                    format_vec3(part_pose.transform.origin),
                ],
            );
        }
        clock.advance(args.step_ms);
    }
    table.printstd();

    Ok(())
}
