//! animation.cfg command implementation

use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

use q3_md3::AnimationConfig;

use crate::utils::{add_table_row, create_table, format_fps};

pub fn execute(path: PathBuf) -> Result<()> {
    let data = fs::read(&path).with_context(|| format!("Failed to read {}", path.display()))?;
    let config = AnimationConfig::parse(&data);

    println!("Animation table: {}", path.display());
    println!("Fixed legs: {}", config.fixed_legs);
    println!("Fixed torso: {}", config.fixed_torso);

    let mut table = create_table(&[
        "Animation",
        "First",
        "Frames",
        "Loop",
        "Lerp (ms)",
        "FPS",
        "Reversed",
    ]);
    for (anim, entry) in config.animations.iter() {
        let name = if anim.is_parsed() {
            anim.name().to_string()
        } else {
            format!("{} *", anim.name())
        };
        add_table_row(
            &mut table,
            vec![
                name,
                entry.first_frame.to_string(),
                entry.num_frames.to_string(),
                entry.loop_frames.to_string(),
                entry.frame_lerp.to_string(),
                format_fps(entry.frame_lerp),
                if entry.reversed { "yes" } else { "no" }.to_string(),
            ],
        );
    }
    table.printstd();
    println!("* derived after parsing");

    Ok(())
}
