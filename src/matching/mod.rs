//! Color matching from source pixels to catalog tiles

/// Per-color memoization of match results
pub mod cache;
/// Image to grid conversion with progress reporting
pub mod mapper;
/// Nearest-tile search over perceptual colors
pub mod matcher;

pub use cache::{CacheStats, MatchCache};
pub use mapper::ImageMapper;
pub use matcher::TileMatcher;
