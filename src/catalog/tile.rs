//! Tile identity and per-texture color metadata

use std::path::{Path, PathBuf};

use crate::math::color::{Lab, srgb_to_lab};

/// Stable index of a tile within its catalog
///
/// Used as the grid cell value, the texture cache key and the draw target
/// registry handle, so no lookup ever goes through the tile name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TileId(u32);

impl TileId {
    /// Create an id from a catalog index
    ///
    /// Indices beyond `u32::MAX` saturate; catalogs never approach that size.
    pub fn new(index: usize) -> Self {
        Self(u32::try_from(index).unwrap_or(u32::MAX))
    }

    /// Position of the tile within its catalog
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Outcome of analyzing one texture
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TileAnalysis {
    /// Too many non-opaque pixels to stand for a single color
    Transparent,
    /// Opaque texture with its mean color
    Solid {
        /// Mean RGB over visible pixels
        average: [u8; 3],
    },
}

/// One catalog entry: a texture plus derived color metadata
///
/// The perceptual color is present exactly when the texture is not
/// transparent; `apply_analysis` is the only way to set either.
#[derive(Debug, Clone, PartialEq)]
pub struct Tile {
    name: String,
    path: PathBuf,
    size: u32,
    average_color: Option<[u8; 3]>,
    perceptual_color: Option<Lab>,
    has_transparency: bool,
}

impl Tile {
    /// Create an unanalyzed tile
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>, size: u32) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            size,
            average_color: None,
            perceptual_color: None,
            has_transparency: false,
        }
    }

    /// Create an analyzed solid tile, mostly useful for synthetic catalogs
    pub fn solid(name: impl Into<String>, path: impl Into<PathBuf>, size: u32, rgb: [u8; 3]) -> Self {
        let mut tile = Self::new(name, path, size);
        tile.apply_analysis(TileAnalysis::Solid { average: rgb });
        tile
    }

    /// Record analyzer results
    pub fn apply_analysis(&mut self, analysis: TileAnalysis) {
        match analysis {
            TileAnalysis::Transparent => {
                self.has_transparency = true;
                self.average_color = None;
                self.perceptual_color = None;
            }
            TileAnalysis::Solid { average } => {
                self.has_transparency = false;
                self.average_color = Some(average);
                self.perceptual_color = Some(srgb_to_lab(average));
            }
        }
    }

    /// Namespaced name, e.g. `minecraft:stone`
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Name without its namespace
    pub fn texture_name(&self) -> &str {
        self.name
            .rsplit_once(':')
            .map_or(self.name.as_str(), |(_, stem)| stem)
    }

    /// Source texture file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Texture side length in pixels
    pub const fn size(&self) -> u32 {
        self.size
    }

    /// Mean RGB of visible pixels, if analyzed as solid
    pub const fn average_color(&self) -> Option<[u8; 3]> {
        self.average_color
    }

    /// L*a*b* color used for matching, if analyzed as solid
    pub const fn perceptual_color(&self) -> Option<Lab> {
        self.perceptual_color
    }

    /// Whether the texture has too many non-opaque pixels
    pub const fn has_transparency(&self) -> bool {
        self.has_transparency
    }
}
