//! Transparency classification and representative colors for textures

use std::path::Path;

use image::RgbaImage;
use rayon::prelude::*;
use tracing::{debug, warn};

use crate::catalog::{Tile, TileAnalysis};
use crate::io::configuration::DEFAULT_TRANSPARENCY_THRESHOLD;
use crate::io::error::{Result, WithPath};

/// Share of pixels that are not fully opaque
pub fn transparency_ratio(image: &RgbaImage) -> f64 {
    let total = image.width() as usize * image.height() as usize;
    if total == 0 {
        return 0.0;
    }
    let translucent = image.pixels().filter(|pixel| pixel[3] < u8::MAX).count();
    translucent as f64 / total as f64
}

/// Mean RGB over pixels with nonzero alpha
///
/// Falls back to the plain mean when every pixel is fully transparent.
/// Channel means are truncated toward zero.
pub fn average_rgb(image: &RgbaImage) -> [u8; 3] {
    let mut sums = [0u64; 3];
    let mut count = 0u64;
    for pixel in image.pixels().filter(|pixel| pixel[3] > 0) {
        for (sum, &channel) in sums.iter_mut().zip(pixel.0.iter()) {
            *sum += u64::from(channel);
        }
        count += 1;
    }

    if count == 0 {
        for pixel in image.pixels() {
            for (sum, &channel) in sums.iter_mut().zip(pixel.0.iter()) {
                *sum += u64::from(channel);
            }
            count += 1;
        }
    }

    if count == 0 {
        return [0; 3];
    }
    sums.map(|sum| u8::try_from(sum / count).unwrap_or(u8::MAX))
}

/// Classifies textures and computes their matching colors
#[derive(Debug, Clone, Copy)]
pub struct TextureAnalyzer {
    transparency_threshold: f64,
}

impl Default for TextureAnalyzer {
    fn default() -> Self {
        Self::new(DEFAULT_TRANSPARENCY_THRESHOLD)
    }
}

impl TextureAnalyzer {
    /// Create an analyzer flagging textures whose non-opaque share exceeds `threshold`
    pub const fn new(transparency_threshold: f64) -> Self {
        Self {
            transparency_threshold,
        }
    }

    /// Threshold above which a texture counts as transparent
    pub const fn transparency_threshold(&self) -> f64 {
        self.transparency_threshold
    }

    /// Analyze a decoded texture
    ///
    /// Transparent textures get no color at all: an alpha-weighted average
    /// would misrepresent how the tile looks when placed.
    pub fn analyze_image(&self, image: &RgbaImage) -> TileAnalysis {
        if transparency_ratio(image) > self.transparency_threshold {
            TileAnalysis::Transparent
        } else {
            TileAnalysis::Solid {
                average: average_rgb(image),
            }
        }
    }

    /// Decode and analyze a texture file
    ///
    /// # Errors
    ///
    /// Returns an error if the texture cannot be decoded
    pub fn analyze_file(&self, path: &Path) -> Result<TileAnalysis> {
        let image = image::open(path).with_path(path)?;
        Ok(self.analyze_image(&image.to_rgba8()))
    }

    /// Analyze tiles in place, decoding textures in parallel
    ///
    /// Tiles whose texture cannot be decoded are dropped with a warning.
    pub fn analyze(&self, tiles: &mut Vec<Tile>) {
        let results: Vec<Result<TileAnalysis>> = tiles
            .par_iter()
            .map(|tile| self.analyze_file(tile.path()))
            .collect();

        let mut results = results.into_iter();
        tiles.retain_mut(|tile| match results.next() {
            Some(Ok(analysis)) => {
                tile.apply_analysis(analysis);
                true
            }
            Some(Err(error)) => {
                warn!(tile = tile.name(), %error, "dropping texture that failed analysis");
                false
            }
            None => false,
        });

        let transparent = tiles.iter().filter(|tile| tile.has_transparency()).count();
        debug!(
            analyzed = tiles.len(),
            transparent, "texture analysis complete"
        );
    }
}
