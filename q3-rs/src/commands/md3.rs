//! MD3 model file command implementations

use anyhow::{Context, Result};
use clap::Subcommand;
use std::fs;
use std::path::{Path, PathBuf};

use q3_md3::Md3Model;

use crate::utils::{add_table_row, create_table, format_bytes, format_vec3};

#[derive(Subcommand)]
pub enum Md3Commands {
    /// Display information about an MD3 model file
    Info {
        /// Path to the MD3 file
        file: PathBuf,

        /// Also list the tags of every frame
        #[arg(short, long)]
        detailed: bool,
    },

    /// Display the tags of one frame
    Tags {
        /// Path to the MD3 file
        file: PathBuf,

        /// Frame to display
        #[arg(short, long, default_value = "0")]
        frame: usize,
    },
}

pub fn execute(cmd: Md3Commands) -> Result<()> {
    match cmd {
        Md3Commands::Info { file, detailed } => handle_info(&file, detailed),
        Md3Commands::Tags { file, frame } => handle_tags(&file, frame),
    }
}

fn load_model(path: &Path) -> Result<(Md3Model, u64)> {
    let data = fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let model = Md3Model::parse(&data, &name)
        .with_context(|| format!("Failed to decode MD3 model from {}", path.display()))?;
    Ok((model, data.len() as u64))
}

fn handle_info(path: &Path, detailed: bool) -> Result<()> {
    println!("Loading MD3 model: {}", path.display());
    let (model, size) = load_model(path)?;

    println!("\n=== MD3 Model Information ===");
    println!("Name: {}", model.header.name);
    println!("Size: {}", format_bytes(size));
    println!("Frames: {}", model.num_frames());
    println!("Tags per frame: {}", model.num_tags());
    println!(
        "Surfaces: {} of {} decoded",
        model.num_surfaces(),
        model.header.num_surfaces
    );

    let mut frames = create_table(&["#", "Name", "Radius", "Origin"]);
    for (index, frame) in model.frames.iter().enumerate() {
        add_table_row(
            &mut frames,
            vec![
                index.to_string(),
                frame.name.clone(),
                format!("{:.2}", frame.radius),
                format_vec3(frame.local_origin),
            ],
        );
    }
    println!("\n=== Frames ===");
    frames.printstd();

    let mut surfaces = create_table(&["Surface", "Frames", "Vertices", "Triangles", "Shader"]);
    for surface in &model.surfaces {
        add_table_row(
            &mut surfaces,
            vec![
                surface.name.clone(),
                surface.num_frames.to_string(),
                surface.num_verts.to_string(),
                surface.num_triangles().to_string(),
                surface.shader_name.clone().unwrap_or_else(|| "-".to_string()),
            ],
        );
    }
    println!("\n=== Surfaces ===");
    surfaces.printstd();

    if detailed {
        println!("\n=== Tags ===");
        for frame in 0..model.num_frames() {
            print_tags(&model, frame);
        }
    } else {
        println!("\nTags: {}", model.tag_names().join(", "));
    }

    Ok(())
}

fn handle_tags(path: &Path, frame: usize) -> Result<()> {
    let (model, _) = load_model(path)?;
    if frame >= model.num_frames() {
        anyhow::bail!(
            "Frame {} out of range, model has {} frames",
            frame,
            model.num_frames()
        );
    }
    print_tags(&model, frame);
    Ok(())
}

fn print_tags(model: &Md3Model, frame: usize) {
    let mut table = create_table(&["Frame", "Tag", "Origin", "Forward", "Left", "Up"]);
    for tag in model.frame_tags(frame) {
        add_table_row(
            &mut table,
            vec![
                frame.to_string(),
                tag.name.clone(),
                format_vec3(tag.origin),
                format_vec3(tag.axis[0]),
                format_vec3(tag.axis[1]),
                format_vec3(tag.axis[2]),
            ],
        );
    }
    table.printstd();
}
