/// Command-line interface and batch conversion
pub mod cli;
/// Policy constants and configuration defaults
pub mod configuration;
/// Error types and path context
pub mod error;
/// Flat PNG export of tile grids
pub mod image;
/// Progress bars for batch conversion
pub mod progress;
