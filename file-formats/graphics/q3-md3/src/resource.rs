//! Access to the named byte blobs a player model is assembled from

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Part files every player model directory must contain
pub const PLAYER_PART_FILES: [&str; 3] = ["lower.md3", "upper.md3", "head.md3"];

/// Source of raw resource bytes, addressed by `/`-separated paths.
///
/// Lookups ignore case.
pub trait ResourceProvider: Send + Sync {
    /// Contents of a resource, or `None` if it does not exist
    fn read(&self, path: &str) -> Option<Vec<u8>>;

    /// Paths of every resource
    fn list(&self) -> Vec<String>;

    /// Directories holding all three player model parts, sorted
    fn player_model_paths(&self) -> Vec<String> {
        let files: BTreeSet<String> = self.list().iter().map(|f| f.to_ascii_lowercase()).collect();
        let mut dirs: BTreeSet<String> = BTreeSet::new();

        for file in self.list() {
            let Some((dir, name)) = file.rsplit_once('/') else {
                continue;
            };
            if !PLAYER_PART_FILES.iter().any(|p| name.eq_ignore_ascii_case(p)) {
                continue;
            }
            let complete = PLAYER_PART_FILES
                .iter()
                .all(|p| files.contains(&format!("{dir}/{p}").to_ascii_lowercase()));
            if complete {
                dirs.insert(dir.to_string());
            }
        }

        dirs.into_iter().collect()
    }
}

/// In-memory resources keyed by lower-cased path
#[derive(Debug, Clone, Default)]
pub struct MemoryProvider {
    files: BTreeMap<String, (String, Vec<u8>)>,
}

impl MemoryProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a resource
    pub fn insert(&mut self, path: impl Into<String>, data: impl Into<Vec<u8>>) {
        let path = path.into();
        self.files
            .insert(path.to_ascii_lowercase(), (path, data.into()));
    }

    /// Builder-style [`insert`](Self::insert)
    pub fn with(mut self, path: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        self.insert(path, data);
        self
    }
}

impl ResourceProvider for MemoryProvider {
    fn read(&self, path: &str) -> Option<Vec<u8>> {
        self.files
            .get(&path.to_ascii_lowercase())
            .map(|(_, data)| data.clone())
    }

    fn list(&self) -> Vec<String> {
        self.files.values().map(|(path, _)| path.clone()).collect()
    }
}

/// Resources stored as files below a directory
#[derive(Debug, Clone)]
pub struct DirectoryProvider {
    root: PathBuf,
    index: BTreeMap<String, PathBuf>,
}

impl DirectoryProvider {
    /// Index every file below `root`
    pub fn new(root: impl AsRef<Path>) -> io::Result<Self> {
        let root = root.as_ref().to_path_buf();
        let mut index = BTreeMap::new();
        collect_files(&root, &root, &mut index)?;
        log::debug!("indexed {} files under {}", index.len(), root.display());
        Ok(Self { root, index })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

fn collect_files(root: &Path, dir: &Path, index: &mut BTreeMap<String, PathBuf>) -> io::Result<()> {
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        let file_type = entry.file_type()?;
        // Symlinked directories are not followed, they may loop
        if file_type.is_dir() {
            collect_files(root, &path, index)?;
        } else if file_type.is_symlink() && path.is_dir() {
            log::debug!("not following directory link {}", path.display());
        } else if let Ok(relative) = path.strip_prefix(root) {
            let key = relative
                .components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/");
            index.insert(key.to_ascii_lowercase(), path);
        }
    }
    Ok(())
}

impl ResourceProvider for DirectoryProvider {
    fn read(&self, path: &str) -> Option<Vec<u8>> {
        let file = self.index.get(&path.to_ascii_lowercase())?;
        match fs::read(file) {
            Ok(data) => Some(data),
            Err(e) => {
                log::warn!("failed to read {}: {}", file.display(), e);
                None
            }
        }
    }

    fn list(&self) -> Vec<String> {
        self.index
            .values()
            .filter_map(|p| p.strip_prefix(&self.root).ok())
            .map(|p| {
                p.components()
                    .map(|c| c.as_os_str().to_string_lossy())
                    .collect::<Vec<_>>()
                    .join("/")
            })
            .collect()
    }
}

/// Maps material paths to renderer texture handles
pub trait TextureResolver {
    type Handle: Clone;

    /// Handle for a texture path; implementations return [`white`](Self::white)
    /// when the texture is missing or cannot be decoded
    fn texture_for_path(&mut self, path: &str) -> Self::Handle;

    /// Placeholder handle for surfaces without a usable texture
    fn white(&mut self) -> Self::Handle;

    /// Handle for an optional material path
    fn resolve(&mut self, path: Option<&str>) -> Self::Handle {
        match path {
            Some(p) if !p.is_empty() => self.texture_for_path(p),
            _ => self.white(),
        }
    }
}
