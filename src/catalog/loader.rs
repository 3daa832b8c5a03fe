//! Texture directory discovery and ignore-list parsing

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::catalog::Tile;
use crate::io::configuration::{EXCLUDED_SUFFIXES, RESOURCE_PACK_TEXTURE_DIR, TEXTURE_EXTENSIONS};
use crate::io::error::{MosaicError, Result};

/// Locate the directory holding tile textures
///
/// A full resource pack keeps them under `assets/minecraft/textures/block`;
/// otherwise `root` itself is taken as the texture directory.
///
/// # Errors
///
/// Returns an error if neither location is a directory
pub fn resolve_texture_dir(root: &Path) -> Result<PathBuf> {
    let nested = RESOURCE_PACK_TEXTURE_DIR
        .iter()
        .fold(root.to_path_buf(), |path, part| path.join(part));
    let dir = if nested.is_dir() {
        nested
    } else {
        root.to_path_buf()
    };

    if dir.is_dir() {
        Ok(dir)
    } else {
        Err(MosaicError::TextureDirectory { path: dir })
    }
}

fn is_texture_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            TEXTURE_EXTENSIONS
                .iter()
                .any(|accepted| ext.eq_ignore_ascii_case(accepted))
        })
}

/// Recursively collect texture files, sorted for a stable catalog order
///
/// Unreadable directory entries are skipped.
pub fn scan_texture_files(dir: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(dir)
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(error) => {
                warn!(%error, "skipping unreadable texture directory entry");
                None
            }
        })
        .filter(|entry| entry.file_type().is_file() && is_texture_file(entry.path()))
        .map(walkdir::DirEntry::into_path)
        .collect();
    files.sort();
    files
}

/// Prefix a bare name with the namespace, leaving namespaced names alone
pub fn normalize_tile_name(namespace: &str, name: &str) -> String {
    if name.contains(':') {
        name.to_string()
    } else {
        format!("{namespace}:{name}")
    }
}

/// Derive `"<namespace>:<stem>"` from a texture path
pub fn tile_name(namespace: &str, path: &Path) -> Option<String> {
    let stem = path.file_stem()?.to_str()?;
    Some(normalize_tile_name(namespace, stem))
}

/// Parse ignore-list text: one texture name per line, `#` starts a comment line
pub fn parse_ignore_list(text: &str) -> HashSet<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect()
}

/// Read an ignore list, treating a missing file as empty
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read
pub fn load_ignore_list(path: &Path) -> Result<HashSet<String>> {
    match std::fs::read_to_string(path) {
        Ok(text) => Ok(parse_ignore_list(&text)),
        Err(error) if error.kind() == std::io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "no ignore list found");
            Ok(HashSet::new())
        }
        Err(source) => Err(MosaicError::FileSystem {
            path: path.to_path_buf(),
            operation: "read ignore list",
            source,
        }),
    }
}

/// Discover tiles under a texture root
///
/// Files whose dimensions cannot be read, and names ending in an excluded
/// suffix, are skipped. Tiles come back unanalyzed.
///
/// # Errors
///
/// Returns an error if the texture directory cannot be resolved
pub fn discover_tiles(root: &Path, namespace: &str) -> Result<Vec<Tile>> {
    let dir = resolve_texture_dir(root)?;
    let mut tiles = Vec::new();

    for path in scan_texture_files(&dir) {
        let Some(name) = tile_name(namespace, &path) else {
            warn!(path = %path.display(), "skipping texture with a non UTF-8 name");
            continue;
        };
        if EXCLUDED_SUFFIXES.iter().any(|suffix| name.ends_with(suffix)) {
            debug!(%name, "skipping excluded texture");
            continue;
        }
        match image::image_dimensions(&path) {
            Ok((width, _)) => tiles.push(Tile::new(name, path, width)),
            Err(error) => {
                warn!(path = %path.display(), %error, "skipping unreadable texture");
            }
        }
    }

    debug!(count = tiles.len(), dir = %dir.display(), "discovered textures");
    Ok(tiles)
}
