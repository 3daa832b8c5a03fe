//! Flat PNG export of a tile grid

use std::path::Path;

use image::{Rgba as Pixel, RgbaImage};

use crate::io::configuration::{EXPORT_BACKGROUND, Rgba};
use crate::io::error::{MosaicError, Result, invalid_parameter};
use crate::render::TextureCache;
use crate::render::target::{blend_pixel, draw_line_into};
use crate::spatial::Grid;

/// Rasterize a grid with one texture per cell on a white background
///
/// Transparent texels show the background. With `grid_lines`, one-pixel
/// lines are drawn along every tile boundary.
///
/// # Errors
///
/// Returns an error if the grid is empty or the output would not fit in
/// `u32` pixel dimensions
pub fn render_grid_image(
    grid: &Grid,
    textures: &TextureCache,
    grid_lines: Option<Rgba>,
) -> Result<RgbaImage> {
    if grid.is_empty() {
        return Err(MosaicError::EmptyImage {
            width: grid.width() as u32,
            height: grid.height() as u32,
        });
    }
    let tile_size = textures.tile_size();
    let pixels = |cells: usize, parameter: &'static str| {
        u32::try_from(cells)
            .ok()
            .and_then(|count| count.checked_mul(tile_size))
            .ok_or_else(|| invalid_parameter(parameter, &cells, &"output image too large"))
    };
    let width = pixels(grid.width(), "width")?;
    let height = pixels(grid.height(), "height")?;

    let mut output = RgbaImage::from_pixel(width, height, Pixel(EXPORT_BACKGROUND));
    for (cell, tile) in grid.iter() {
        let texture = textures.get_or_load(tile);
        let origin_x = cell.x as u32 * tile_size;
        let origin_y = cell.y as u32 * tile_size;
        for (x, y, texel) in texture.enumerate_pixels() {
            if let Some(pixel) = output.get_pixel_mut_checked(origin_x + x, origin_y + y) {
                blend_pixel(pixel, texel.0);
            }
        }
    }

    if let Some(color) = grid_lines {
        let (right, bottom) = (f64::from(width), f64::from(height));
        // The closing boundary falls outside the image; pull it onto the last pixel
        for column in 0..=grid.width() {
            let x = (column as f64).mul_add(f64::from(tile_size), 0.5).min(right - 0.5);
            draw_line_into(&mut output, (x, 0.0), (x, bottom), color, 1.0);
        }
        for row in 0..=grid.height() {
            let y = (row as f64).mul_add(f64::from(tile_size), 0.5).min(bottom - 0.5);
            draw_line_into(&mut output, (0.0, y), (right, y), color, 1.0);
        }
    }
    Ok(output)
}

/// Save a rendered image as PNG, creating parent directories
///
/// # Errors
///
/// Returns an error if the parent directory cannot be created or the image
/// cannot be encoded
pub fn export_png(image: &RgbaImage, output_path: &Path) -> Result<()> {
    if let Some(parent) = output_path
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
    {
        std::fs::create_dir_all(parent).map_err(|e| MosaicError::FileSystem {
            path: parent.to_path_buf(),
            operation: "create directory",
            source: e,
        })?;
    }

    image
        .save(output_path)
        .map_err(|e| MosaicError::ImageExport {
            path: output_path.to_path_buf(),
            source: e,
        })
}

/// Render a grid and save it as PNG
///
/// # Errors
///
/// Returns an error if rendering or saving fails
pub fn export_grid_as_png(
    grid: &Grid,
    textures: &TextureCache,
    grid_lines: Option<Rgba>,
    output_path: &Path,
) -> Result<()> {
    let image = render_grid_image(grid, textures, grid_lines)?;
    export_png(&image, output_path)
}
