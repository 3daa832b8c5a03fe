//! Policy constants and runtime configuration defaults

use std::time::Duration;

/// RGBA color used throughout rendering
pub type Rgba = [u8; 4];

// Tile catalog
/// Pixel size of one tile texture (textures are square)
pub const DEFAULT_TILE_SIZE: u32 = 16;
/// Namespace prefixed to tile names derived from file stems
pub const DEFAULT_NAMESPACE: &str = "minecraft";
/// Share of non-opaque pixels above which a texture counts as transparent
pub const DEFAULT_TRANSPARENCY_THRESHOLD: f64 = 0.05;
/// Resource pack layout searched before falling back to the root itself
pub const RESOURCE_PACK_TEXTURE_DIR: [&str; 4] = ["assets", "minecraft", "textures", "block"];
/// File extensions accepted as tile textures
pub const TEXTURE_EXTENSIONS: [&str; 1] = ["png"];
/// Orientation suffixes naming faces of the same logical tile
pub const DIRECTIONAL_SUFFIXES: [&str; 6] = ["_top", "_side", "_front", "_back", "_bottom", "_end"];
/// Name suffixes dropped from the catalog entirely
pub const EXCLUDED_SUFFIXES: [&str; 1] = ["_log_top"];
/// Variant label for tiles without a directional suffix
pub const NORMAL_VARIANT: &str = "normal";

// Viewport
/// Smallest zoom factor
pub const MIN_ZOOM: f64 = 0.1;
/// Largest zoom factor
pub const MAX_ZOOM: f64 = 32.0;
/// Total margin in screen pixels left around the grid by fit-to-window
pub const FIT_MARGIN: f64 = 40.0;

// Rendering
/// Screen margin added around the canvas when culling, avoids pop-in at the edges
pub const CULL_MARGIN: f64 = 50.0;
/// Dirty renders are used below this many changed cells
pub const DIRTY_RENDER_LIMIT: usize = 50;
/// Pending edits that force a render regardless of the frame interval
pub const MAX_PENDING_EDITS: usize = 100;
/// Grid lines are drawn at or above this zoom
pub const GRID_VISIBLE_ZOOM: f64 = 0.5;
/// Minimum time between two renders (~60 Hz)
pub const RENDER_INTERVAL: Duration = Duration::from_millis(16);
/// Minimum time between two hover overlay updates (20 Hz)
pub const HOVER_INTERVAL: Duration = Duration::from_millis(50);
/// Unique tiles decoded ahead of the first render of a new grid
pub const PREWARM_LIMIT: usize = 50;
/// Decoding threads used for pre-warming
pub const PREWARM_WORKERS: usize = 4;
/// Time the render thread waits for each pre-warm task
pub const PREWARM_TIMEOUT: Duration = Duration::from_millis(100);

// Colors
/// Canvas background
pub const BACKGROUND_COLOR: Rgba = [45, 45, 48, 255];
/// Grid line overlay on the interactive canvas
pub const GRID_LINE_COLOR: Rgba = [100, 100, 100, 128];
/// Grid lines in exported images
pub const EXPORT_GRID_COLOR: Rgba = [128, 128, 128, 128];
/// Background of exported images
pub const EXPORT_BACKGROUND: Rgba = [255, 255, 255, 255];
/// Hover highlight outline
pub const HOVER_COLOR: Rgba = [255, 255, 255, 200];
/// Outline thickness of the hover highlight
pub const HOVER_THICKNESS: f64 = 2.0;
/// Placeholder color for textures without an average color
pub const FALLBACK_COLOR: [u8; 3] = [255, 0, 255];

// Brush
/// Smallest brush side length
pub const MIN_BRUSH_SIZE: u32 = 1;
/// Largest brush side length
pub const MAX_BRUSH_SIZE: u32 = 15;

// Output
/// Suffix added to exported mosaic filenames
pub const OUTPUT_SUFFIX: &str = "_mosaic";
/// Suffix added to exported mosaic filenames with grid lines
pub const GRID_OUTPUT_SUFFIX: &str = "_mosaic_grid";
/// Source image extensions accepted by the command line tool
pub const IMAGE_EXTENSIONS: [&str; 7] = ["png", "jpg", "jpeg", "bmp", "gif", "tiff", "webp"];

// Progress bar display settings
/// Threshold for switching to batch progress mode
pub const MAX_INDIVIDUAL_PROGRESS_BARS: usize = 5;
/// Resolution of the per-image progress bars
pub const PROGRESS_STEPS: u64 = 1000;
