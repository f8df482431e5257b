//! `.skin` files: surface name to texture path mappings

use std::collections::HashMap;

use crate::animation::decode_text;
use crate::model::Surface;

/// Texture paths for the surfaces of one model part
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SkinMapping {
    textures: HashMap<String, String>,
}

impl SkinMapping {
    /// Parse `.skin` bytes. Lines naming tags or lacking either half are ignored.
    pub fn parse(data: &[u8]) -> Self {
        let text = decode_text(data);
        let mut textures = HashMap::new();

        for line in text.lines() {
            let Some((surface, path)) = line.trim().split_once(',') else {
                continue;
            };
            let surface = surface.trim();
            let path = path.trim();
            if surface.is_empty() || path.is_empty() {
                continue;
            }
            if surface
                .get(..4)
                .is_some_and(|prefix| prefix.eq_ignore_ascii_case("tag_"))
            {
                continue;
            }
            textures.insert(surface.to_ascii_lowercase(), path.to_string());
        }

        Self { textures }
    }

    /// Parse an optional resource; a missing skin file is an empty mapping
    pub fn from_resource(data: Option<&[u8]>) -> Self {
        data.map(Self::parse).unwrap_or_default()
    }

    /// Texture path for a surface name
    pub fn texture_for(&self, surface: &str) -> Option<&str> {
        self.textures
            .get(&surface.to_ascii_lowercase())
            .map(String::as_str)
    }

    /// Material for a surface: the skin entry, else the surface's own shader
    pub fn resolve_material<'a>(&'a self, surface: &'a Surface) -> Option<&'a str> {
        self.texture_for(&surface.name)
            .or(surface.shader_name.as_deref())
    }

    pub fn len(&self) -> usize {
        self.textures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }

    /// Mappings sorted by surface name
    pub fn entries(&self) -> Vec<(&str, &str)> {
        let mut entries: Vec<_> = self
            .textures
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();
        entries.sort_unstable();
        entries
    }
}
