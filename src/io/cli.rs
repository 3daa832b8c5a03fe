//! Command-line interface for batch converting images into tile mosaics

use crate::catalog::{Catalog, CatalogConfig};
use crate::io::configuration::{
    DEFAULT_NAMESPACE, DEFAULT_TILE_SIZE, DEFAULT_TRANSPARENCY_THRESHOLD, EXPORT_GRID_COLOR,
    GRID_OUTPUT_SUFFIX, IMAGE_EXTENSIONS, OUTPUT_SUFFIX,
};
use crate::io::error::{Result, WithPath, invalid_parameter};
use crate::io::image::export_grid_as_png;
use crate::io::progress::ProgressManager;
use crate::matching::{ImageMapper, TileMatcher};
use crate::render::TextureCache;
use clap::Parser;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{error, info, warn};

#[derive(Parser)]
#[command(name = "mosaictile")]
#[command(
    author,
    version,
    about = "Convert images into tile mosaics by perceptual color matching"
)]
/// Command-line arguments for the mosaic conversion tool
#[allow(clippy::struct_excessive_bools)]
pub struct Cli {
    /// Input image file or directory to process
    #[arg(value_name = "TARGET")]
    pub target: PathBuf,

    /// Texture directory or resource pack root
    #[arg(short, long, value_name = "DIR")]
    pub textures: PathBuf,

    /// Output width in tiles (keeps the aspect ratio if height is omitted)
    #[arg(short = 'w', long)]
    pub width: Option<u32>,

    /// Output height in tiles (keeps the aspect ratio if width is omitted)
    #[arg(short = 'H', long)]
    pub height: Option<u32>,

    /// File listing tile base names to leave out, one per line
    #[arg(short, long, value_name = "FILE")]
    pub ignore_list: Option<PathBuf>,

    /// Share of non-opaque pixels above which a texture is transparent
    #[arg(long, default_value_t = DEFAULT_TRANSPARENCY_THRESHOLD)]
    pub threshold: f64,

    /// Namespace prefixed to tile names
    #[arg(long, default_value = DEFAULT_NAMESPACE)]
    pub namespace: String,

    /// Keep tile groups whose other variants are transparent
    #[arg(long)]
    pub keep_transparent_groups: bool,

    /// Also write a copy with tile grid lines
    #[arg(short, long)]
    pub grid_lines: bool,

    /// Log tile usage counts for every image
    #[arg(short, long)]
    pub stats: bool,

    /// Suppress progress output
    #[arg(short, long)]
    pub quiet: bool,

    /// Process files even if output exists
    #[arg(short, long)]
    pub no_skip: bool,
}

impl Cli {
    /// Check if existing output files should be skipped
    pub const fn skip_existing(&self) -> bool {
        !self.no_skip
    }

    /// Check if progress should be displayed
    pub const fn should_show_progress(&self) -> bool {
        !self.quiet
    }

    /// Catalog options derived from the flags
    pub fn catalog_config(&self) -> CatalogConfig {
        CatalogConfig {
            namespace: self.namespace.clone(),
            transparency_threshold: self.threshold,
            ignore_list: self.ignore_list.clone(),
            ignore_transparent_groups: !self.keep_transparent_groups,
        }
    }

    /// Grid size for a source image of `(width, height)` pixels
    ///
    /// A single given dimension scales the other to keep the aspect ratio.
    pub fn target_size(&self, source: (u32, u32)) -> Option<(u32, u32)> {
        let (source_width, source_height) = source;
        let scaled = |length: u32, numerator: u32, denominator: u32| {
            if denominator == 0 {
                return length.max(1);
            }
            let value = f64::from(length) * f64::from(numerator) / f64::from(denominator);
            (value.round() as u32).max(1)
        };
        match (self.width, self.height) {
            (Some(w), Some(h)) => Some((w, h)),
            (Some(w), None) => Some((w, scaled(source_height, w, source_width))),
            (None, Some(h)) => Some((scaled(source_width, h, source_height), h)),
            (None, None) => None,
        }
    }
}

/// Orchestrates batch conversion of image files with progress tracking
pub struct FileProcessor {
    cli: Cli,
    progress_manager: Option<ProgressManager>,
}

impl FileProcessor {
    /// Create a new file processor with the given CLI arguments
    pub fn new(cli: Cli) -> Self {
        let progress_manager = cli.should_show_progress().then(ProgressManager::new);

        Self {
            cli,
            progress_manager,
        }
    }

    /// Process files according to CLI arguments
    ///
    /// The catalog is loaded once and shared by every image. A failing image
    /// is reported and the batch continues; the first failure is returned at
    /// the end.
    ///
    /// # Errors
    ///
    /// Returns an error if the arguments are invalid, the catalog cannot be
    /// loaded, no tile qualifies for matching, or any image fails
    pub fn process(&mut self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.cli.threshold) {
            return Err(invalid_parameter(
                "threshold",
                &self.cli.threshold,
                &"must lie between 0 and 1",
            ));
        }
        let files = self.collect_files()?;

        if files.is_empty() {
            info!("nothing to convert");
            return Ok(());
        }

        let catalog = Catalog::load(&self.cli.textures, &self.cli.catalog_config())?;
        let matcher = catalog.matcher()?;
        let textures = TextureCache::new(&catalog, DEFAULT_TILE_SIZE);

        if let Some(ref mut pm) = self.progress_manager {
            pm.initialize(files.len());
        }

        let mut first_failure = None;
        for (index, file) in files.iter().enumerate() {
            if let Err(e) = self.process_file(file, index, &catalog, &matcher, &textures) {
                error!(file = %file.display(), error = %e, "conversion failed");
                first_failure.get_or_insert(e);
            }
        }

        if let Some(ref mut pm) = self.progress_manager {
            pm.finish();
        }

        first_failure.map_or(Ok(()), Err)
    }

    /// Image files named by the target, minus skipped ones, sorted
    ///
    /// # Errors
    ///
    /// Returns an error if the target is neither an image file nor a
    /// readable directory
    pub fn collect_files(&self) -> Result<Vec<PathBuf>> {
        let target = &self.cli.target;
        if target.is_file() {
            if is_image_file(target) {
                Ok(if self.should_process_file(target) {
                    vec![target.clone()]
                } else {
                    vec![]
                })
            } else {
                Err(invalid_parameter(
                    "target",
                    &target.display(),
                    &"not a supported image file",
                ))
            }
        } else if target.is_dir() {
            let mut files = Vec::new();
            for entry in std::fs::read_dir(target).with_path(target)? {
                let path = entry.with_path(target)?.path();
                if is_image_file(&path) && !is_output_file(&path) && self.should_process_file(&path)
                {
                    files.push(path);
                }
            }
            files.sort();
            Ok(files)
        } else {
            Err(invalid_parameter(
                "target",
                &target.display(),
                &"must be an image file or directory",
            ))
        }
    }

    fn should_process_file(&self, input_path: &Path) -> bool {
        if !self.cli.skip_existing() {
            return true;
        }

        if output_path(input_path, OUTPUT_SUFFIX).exists() {
            info!(file = %input_path.display(), "skipping, output exists");
            false
        } else {
            true
        }
    }

    fn process_file(
        &mut self,
        input_path: &Path,
        index: usize,
        catalog: &Catalog,
        matcher: &TileMatcher,
        textures: &TextureCache,
    ) -> Result<()> {
        let start_time = Instant::now();

        if let Some(ref mut pm) = self.progress_manager {
            pm.start_file(index, input_path);
        }

        let image = image::open(input_path).with_path(input_path)?;
        let size = self.cli.target_size((image.width(), image.height()));

        let progress_manager = &mut self.progress_manager;
        let mut report = |fraction: f64| {
            if let Some(pm) = progress_manager.as_mut() {
                pm.update_fraction(index, fraction);
            }
        };
        let grid = ImageMapper::new(matcher).map_image(&image, size, Some(&mut report))?;

        export_grid_as_png(
            &grid,
            textures,
            None,
            &output_path(input_path, OUTPUT_SUFFIX),
        )?;
        if self.cli.grid_lines {
            export_grid_as_png(
                &grid,
                textures,
                Some(EXPORT_GRID_COLOR),
                &output_path(input_path, GRID_OUTPUT_SUFFIX),
            )?;
        }

        if self.cli.stats {
            for (tile, count) in grid.tile_counts() {
                match catalog.tile(tile) {
                    Some(entry) => info!(tile = entry.name(), count, "tile usage"),
                    None => warn!(?tile, count, "tile usage for unknown tile"),
                }
            }
        }

        if let Some(ref mut pm) = self.progress_manager {
            pm.complete_file(index);
        }
        info!(
            file = %input_path.display(),
            width = grid.width(),
            height = grid.height(),
            elapsed_ms = start_time.elapsed().as_millis(),
            "converted"
        );
        Ok(())
    }
}

fn is_image_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            IMAGE_EXTENSIONS
                .iter()
                .any(|known| known.eq_ignore_ascii_case(ext))
        })
}

fn is_output_file(path: &Path) -> bool {
    path.file_stem()
        .and_then(|stem| stem.to_str())
        .is_some_and(|stem| stem.ends_with(OUTPUT_SUFFIX) || stem.ends_with(GRID_OUTPUT_SUFFIX))
}

/// Output path next to the input: `<stem><suffix>.png`
pub fn output_path(input_path: &Path, suffix: &str) -> PathBuf {
    let stem = input_path.file_stem().unwrap_or_default();
    let output_name = format!("{}{suffix}.png", stem.to_string_lossy());

    if let Some(parent) = input_path.parent() {
        parent.join(output_name)
    } else {
        PathBuf::from(output_name)
    }
}
