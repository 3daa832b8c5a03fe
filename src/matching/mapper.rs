//! Source image to tile grid conversion

use std::path::Path;

use image::imageops::{self, FilterType};
use image::{DynamicImage, RgbImage};
use ndarray::Array2;
use tracing::{debug, info};

use crate::catalog::TileId;
use crate::io::error::{MosaicError, Result, WithPath};
use crate::matching::{MatchCache, TileMatcher};
use crate::math::color::image_to_lab;
use crate::spatial::Grid;

/// Maps every pixel of an image to its nearest tile
///
/// One grid cell per (resized) pixel. Matches are memoized per RGB value for
/// the duration of one call.
pub struct ImageMapper<'a> {
    matcher: &'a TileMatcher,
}

impl<'a> ImageMapper<'a> {
    /// Create a mapper over a prepared matcher
    pub const fn new(matcher: &'a TileMatcher) -> Self {
        Self { matcher }
    }

    /// Decode an image file and map it
    ///
    /// # Errors
    ///
    /// Returns an error carrying the path if decoding fails, or any error
    /// from [`Self::map_image`]
    pub fn map_path(
        &self,
        path: &Path,
        target_size: Option<(u32, u32)>,
        progress: Option<&mut dyn FnMut(f64)>,
    ) -> Result<Grid> {
        let image = image::open(path).with_path(path)?;
        self.map_image(&image, target_size, progress)
    }

    /// Map an image to a grid of tiles
    ///
    /// `target_size` is `(width, height)`; resizing uses point sampling so
    /// every cell keeps a crisp representative color. `progress` receives
    /// `(row + 1) / height` after each row.
    ///
    /// # Errors
    ///
    /// Returns `EmptyImage` if the image or requested size has a zero
    /// dimension
    pub fn map_image(
        &self,
        image: &DynamicImage,
        target_size: Option<(u32, u32)>,
        mut progress: Option<&mut dyn FnMut(f64)>,
    ) -> Result<Grid> {
        let rgb = prepare_pixels(image, target_size)?;
        let (width, height) = rgb.dimensions();
        let lab = image_to_lab(&rgb);

        let mut cache = MatchCache::new();
        let fallback = TileId::new(0);
        let mut cells = Array2::from_elem((height as usize, width as usize), fallback);

        for (row, mut cell_row) in cells.rows_mut().into_iter().enumerate() {
            for (col, cell) in cell_row.iter_mut().enumerate() {
                let pixel = rgb.get_pixel(col as u32, row as u32).0;
                *cell = cache.get_or_compute(pixel, || {
                    lab.get([row, col])
                        .map_or(fallback, |target| self.matcher.nearest(*target))
                });
            }
            if let Some(report) = progress.as_deref_mut() {
                report((row + 1) as f64 / f64::from(height));
            }
        }

        debug!(
            distinct_colors = cache.len(),
            hit_rate = cache.stats.hit_rate(),
            "match cache summary"
        );
        info!(width, height, "mapped image to grid");
        Ok(Grid::from_array(cells))
    }
}

fn prepare_pixels(image: &DynamicImage, target_size: Option<(u32, u32)>) -> Result<RgbImage> {
    let rgb = image.to_rgb8();
    let (width, height) = target_size.unwrap_or_else(|| rgb.dimensions());
    if width == 0 || height == 0 || rgb.width() == 0 || rgb.height() == 0 {
        return Err(MosaicError::EmptyImage { width, height });
    }
    if (width, height) == rgb.dimensions() {
        Ok(rgb)
    } else {
        Ok(imageops::resize(&rgb, width, height, FilterType::Nearest))
    }
}
