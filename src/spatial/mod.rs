//! Spatial data structures for the tile grid
//!
//! This module contains spatial-related functionality including:
//! - The tile grid and signed cell coordinates
//! - The zoom/pan viewport transform
//! - Dirty cell tracking for incremental rendering

/// Dirty cell tracking between renders
pub mod dirty;
/// Tile grid storage and cell coordinates
pub mod grid;
/// Zoom and pan transform between screen and grid space
pub mod viewport;

pub use dirty::DirtySet;
pub use grid::{Cell, Grid};
pub use viewport::Viewport;
