//! Decoded tile textures shared between the render thread and decode workers

use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::{Arc, OnceLock};
use std::time::Duration;

use image::imageops::{self, FilterType};
use image::{Rgba as Pixel, RgbaImage};
use tracing::{debug, warn};

use crate::catalog::{Catalog, TileId};
use crate::io::configuration::{FALLBACK_COLOR, PREWARM_LIMIT, PREWARM_TIMEOUT, PREWARM_WORKERS};
use crate::io::error::{MosaicError, Result, WithPath};

#[derive(Debug, Clone)]
struct TextureSource {
    path: PathBuf,
    average_color: Option<[u8; 3]>,
}

/// Tile id to decoded bitmap, filled lazily
///
/// Each slot is a `OnceLock`: concurrent first requests for the same tile
/// decode once and every later read is lock-free.
#[derive(Debug)]
pub struct TextureCache {
    tile_size: u32,
    sources: Vec<TextureSource>,
    slots: Vec<OnceLock<Arc<RgbaImage>>>,
}

impl TextureCache {
    /// Create an empty cache for every tile of a catalog
    pub fn new(catalog: &Catalog, tile_size: u32) -> Self {
        let sources: Vec<TextureSource> = catalog
            .tiles()
            .iter()
            .map(|tile| TextureSource {
                path: tile.path().to_path_buf(),
                average_color: tile.average_color(),
            })
            .collect();
        let slots = sources.iter().map(|_| OnceLock::new()).collect();
        Self {
            tile_size: tile_size.max(1),
            sources,
            slots,
        }
    }

    /// Side length every cached texture is scaled to
    pub const fn tile_size(&self) -> u32 {
        self.tile_size
    }

    /// Number of tiles the cache can hold
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Already decoded texture, if any
    pub fn get(&self, tile: TileId) -> Option<Arc<RgbaImage>> {
        self.slots.get(tile.index()).and_then(OnceLock::get).cloned()
    }

    /// Cached texture, decoding it on first use
    ///
    /// Missing or undecodable files yield a solid placeholder of the tile's
    /// average color, or magenta without one. Unknown ids get an uncached
    /// magenta placeholder.
    pub fn get_or_load(&self, tile: TileId) -> Arc<RgbaImage> {
        let (Some(slot), Some(source)) = (
            self.slots.get(tile.index()),
            self.sources.get(tile.index()),
        ) else {
            return Arc::new(placeholder(self.tile_size, None));
        };

        Arc::clone(slot.get_or_init(|| {
            let texture = decode(&source.path, self.tile_size).unwrap_or_else(|error| {
                debug!(?tile, %error, "substituting placeholder texture");
                placeholder(self.tile_size, source.average_color)
            });
            Arc::new(texture)
        }))
    }

    /// Store an externally decoded texture
    ///
    /// Returns false if the tile was already cached or is unknown.
    pub fn insert(&self, tile: TileId, texture: RgbaImage) -> bool {
        self.slots
            .get(tile.index())
            .is_some_and(|slot| slot.set(Arc::new(texture)).is_ok())
    }

    /// Number of decoded textures
    pub fn loaded_count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.get().is_some()).count()
    }

    /// Drop every decoded texture
    pub fn clear(&mut self) {
        for slot in &mut self.slots {
            slot.take();
        }
    }
}

/// Decode a texture and scale it to `tile_size` with point sampling
///
/// # Errors
///
/// Returns an error if the file is missing or cannot be decoded
pub fn decode(path: &Path, tile_size: u32) -> Result<RgbaImage> {
    let image = image::open(path).with_path(path)?.to_rgba8();
    if image.dimensions() == (tile_size, tile_size) {
        Ok(image)
    } else {
        Ok(imageops::resize(
            &image,
            tile_size,
            tile_size,
            FilterType::Nearest,
        ))
    }
}

/// Solid square texture standing in for an unusable file
pub fn placeholder(tile_size: u32, average_color: Option<[u8; 3]>) -> RgbaImage {
    let [r, g, b] = average_color.unwrap_or(FALLBACK_COLOR);
    RgbaImage::from_pixel(tile_size, tile_size, Pixel([r, g, b, 255]))
}

/// Outcome of one pre-warm batch
#[derive(Debug, Default)]
pub struct PrewarmReport {
    /// Textures decoded in time, in completion order
    pub loaded: Vec<(TileId, Arc<RgbaImage>)>,
    /// Tasks that missed their completion timeout
    pub timed_out: usize,
}

/// Bounded worker pool decoding textures ahead of a first render
///
/// Workers only touch the texture cache. Results come back over a channel so
/// the caller can upload them on the thread owning the draw target.
pub struct TexturePrewarmer {
    pool: rayon::ThreadPool,
    limit: usize,
    timeout: Duration,
}

impl TexturePrewarmer {
    /// Create a pool with the default worker count, limit and timeout
    ///
    /// # Errors
    ///
    /// Returns `WorkerPool` if the threads cannot be started
    pub fn new() -> Result<Self> {
        Self::with_settings(PREWARM_WORKERS, PREWARM_LIMIT, PREWARM_TIMEOUT)
    }

    /// Create a pool with explicit settings
    ///
    /// # Errors
    ///
    /// Returns `WorkerPool` if the threads cannot be started
    pub fn with_settings(workers: usize, limit: usize, timeout: Duration) -> Result<Self> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers.max(1))
            .thread_name(|index| format!("texture-prewarm-{index}"))
            .build()
            .map_err(|e| MosaicError::WorkerPool {
                reason: e.to_string(),
            })?;
        Ok(Self {
            pool,
            limit,
            timeout,
        })
    }

    /// Maximum number of tiles decoded per batch
    pub const fn limit(&self) -> usize {
        self.limit
    }

    /// Decode up to `limit` of `tiles` in parallel
    ///
    /// Already cached tiles are skipped. Each task gets its own completion
    /// timeout; late textures stay in the cache for the next full render.
    pub fn prewarm(&self, cache: &Arc<TextureCache>, tiles: &[TileId]) -> PrewarmReport {
        let (sender, receiver) = mpsc::channel();
        let mut submitted = 0;

        for &tile in tiles.iter().take(self.limit) {
            if cache.get(tile).is_some() {
                continue;
            }
            let cache = Arc::clone(cache);
            let sender = sender.clone();
            self.pool.spawn(move || {
                let texture = cache.get_or_load(tile);
                let _ = sender.send((tile, texture));
            });
            submitted += 1;
        }
        drop(sender);

        let mut report = PrewarmReport::default();
        for _ in 0..submitted {
            match receiver.recv_timeout(self.timeout) {
                Ok(result) => report.loaded.push(result),
                Err(RecvTimeoutError::Timeout) => report.timed_out += 1,
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }

        if report.timed_out > 0 {
            warn!(
                timed_out = report.timed_out,
                "texture pre-warm tasks missed their timeout"
            );
        }
        debug!(
            submitted,
            loaded = report.loaded.len(),
            "texture pre-warm finished"
        );
        report
    }
}
