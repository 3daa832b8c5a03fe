//! Perceptual tile mosaics: convert images into grids of texture tiles and edit them interactively
//!
//! Source pixels are matched to the catalog tile with the nearest average color in CIE L*a*b*
//! space. The resulting grid can be exported as a flat image or edited on a canvas with an
//! incremental renderer, a brush and a picker.

#![forbid(unsafe_code)]

/// Texture discovery, color analysis and active-tile management
pub mod catalog;
/// Input/output operations, configuration and error handling
pub mod io;
/// Nearest-tile matching and image to grid conversion
pub mod matching;
/// Color space conversion and line rasterization
pub mod math;
/// Incremental canvas rendering and texture caching
pub mod render;
/// Pointer-driven editing session
pub mod session;
/// Tile grid, viewport transform and dirty tracking
pub mod spatial;
/// Brush and picker painting tools
pub mod tools;

pub use io::error::{MosaicError, Result};
