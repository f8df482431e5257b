//! .skin command implementation

use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

use q3_md3::SkinMapping;

use crate::utils::{add_table_row, create_table};

pub fn execute(path: PathBuf) -> Result<()> {
    let data = fs::read(&path).with_context(|| format!("Failed to read {}", path.display()))?;
    let skin = SkinMapping::parse(&data);

    println!("Skin: {} ({} surfaces)", path.display(), skin.len());
    if skin.is_empty() {
        return Ok(());
    }

    let mut table = create_table(&["Surface", "Texture"]);
    for (surface, texture) in skin.entries() {
        add_table_row(&mut table, vec![surface.to_string(), texture.to_string()]);
    }
    table.printstd();

    Ok(())
}
