//! Interactive rendering of tile grids
//!
//! This module contains rendering functionality including:
//! - The draw target abstraction and a software canvas
//! - Lazily decoded tile textures with parallel pre-warming
//! - Time gates coalescing redraw requests
//! - The incremental render engine

/// Render engine with full and dirty render modes
pub mod engine;
/// Draw target trait and software raster canvas
pub mod target;
/// Shared decoded texture cache and pre-warm pool
pub mod texture_cache;
/// Minimum-interval gate for coalescing
pub mod throttle;

pub use engine::{RenderConfig, RenderEngine, RenderOutcome, RenderStats};
pub use target::{DrawTarget, RasterCanvas, TargetLost};
pub use texture_cache::{TextureCache, TexturePrewarmer};
pub use throttle::Throttle;
