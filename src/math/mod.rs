//! Mathematical utilities for color matching and grid rasterization

/// Perceptual color space conversion and distances
pub mod color;
/// Integer line rasterization between grid cells
pub mod line;
