//! Tile catalog: discovery, analysis and active-subset management
//!
//! The catalog owns every tile discovered under a texture root. A derived
//! active subset excludes ignored groups; membership is a bit per tile so the
//! per-tile test during grid construction stays O(1).

/// Transparency classification and representative colors
pub mod analyzer;
/// Directional-suffix grouping and default ignore policy
pub mod filter;
/// Texture directory discovery and ignore-list parsing
pub mod loader;
/// Tile identity and metadata
pub mod tile;

use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};

use bitvec::prelude::*;
use tracing::info;

pub use analyzer::TextureAnalyzer;
pub use tile::{Tile, TileAnalysis, TileId};

use crate::io::configuration::{DEFAULT_NAMESPACE, DEFAULT_TRANSPARENCY_THRESHOLD};
use crate::io::error::Result;
use crate::matching::TileMatcher;

/// Options controlling catalog construction
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    /// Namespace prefixed to texture stems
    pub namespace: String,
    /// Non-opaque pixel share above which a texture is transparent
    pub transparency_threshold: f64,
    /// Optional ignore-list file seeding default-ignored groups
    pub ignore_list: Option<PathBuf>,
    /// Ignore a whole group when any of its variants is transparent
    pub ignore_transparent_groups: bool,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            namespace: DEFAULT_NAMESPACE.to_string(),
            transparency_threshold: DEFAULT_TRANSPARENCY_THRESHOLD,
            ignore_list: None,
            ignore_transparent_groups: true,
        }
    }
}

/// Ordered collection of tiles with an active subset
#[derive(Debug, Clone)]
pub struct Catalog {
    tiles: Vec<Tile>,
    ignore_list: HashSet<String>,
    ignore_transparent_groups: bool,
    ignored_groups: HashSet<String>,
    active: BitVec,
}

impl Catalog {
    /// Discover and analyze every texture under `root`
    ///
    /// Unreadable textures are skipped rather than failing the load.
    ///
    /// # Errors
    ///
    /// Returns an error if the texture directory cannot be resolved or the
    /// ignore list exists but cannot be read
    pub fn load(root: &Path, config: &CatalogConfig) -> Result<Self> {
        let mut tiles = loader::discover_tiles(root, &config.namespace)?;
        TextureAnalyzer::new(config.transparency_threshold).analyze(&mut tiles);

        let ignore_list = match &config.ignore_list {
            Some(path) => loader::load_ignore_list(path)?,
            None => HashSet::new(),
        };

        let catalog = Self::from_tiles(tiles, ignore_list, config.ignore_transparent_groups);
        info!(
            total = catalog.len(),
            active = catalog.active_count(),
            ignored_groups = catalog.ignored_groups.len(),
            "catalog loaded"
        );
        Ok(catalog)
    }

    /// Build a catalog from already analyzed tiles
    pub fn from_tiles(
        tiles: Vec<Tile>,
        ignore_list: HashSet<String>,
        ignore_transparent_groups: bool,
    ) -> Self {
        let ignored_groups =
            filter::default_ignored_groups(&tiles, &ignore_list, ignore_transparent_groups);
        let mut catalog = Self {
            active: bitvec![0; tiles.len()],
            tiles,
            ignore_list,
            ignore_transparent_groups,
            ignored_groups,
        };
        catalog.refresh_active();
        catalog
    }

    fn refresh_active(&mut self) {
        for (index, tile) in self.tiles.iter().enumerate() {
            let active = !self
                .ignored_groups
                .contains(filter::base_name(tile.name()));
            self.active.set(index, active);
        }
    }

    /// Number of tiles, active or not
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    /// Test if the catalog has no tiles
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// All tiles in catalog order
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    /// Tile by id
    pub fn tile(&self, id: TileId) -> Option<&Tile> {
        self.tiles.get(id.index())
    }

    /// Iterate ids with their tiles
    pub fn iter(&self) -> impl Iterator<Item = (TileId, &Tile)> {
        self.tiles
            .iter()
            .enumerate()
            .map(|(index, tile)| (TileId::new(index), tile))
    }

    /// Look a tile up by its namespaced name
    pub fn find(&self, name: &str) -> Option<TileId> {
        self.tiles
            .iter()
            .position(|tile| tile.name() == name)
            .map(TileId::new)
    }

    /// Test active-subset membership
    pub fn is_active(&self, id: TileId) -> bool {
        self.active.get(id.index()).as_deref() == Some(&true)
    }

    /// Number of active tiles
    pub fn active_count(&self) -> usize {
        self.active.count_ones()
    }

    /// Iterate active tiles in catalog order
    pub fn active_tiles(&self) -> impl Iterator<Item = (TileId, &Tile)> {
        self.iter().filter(|(id, _)| self.is_active(*id))
    }

    /// Test whether a group is ignored
    pub fn is_group_ignored(&self, base_name: &str) -> bool {
        self.ignored_groups.contains(base_name)
    }

    /// Ignored group base names
    pub const fn ignored_groups(&self) -> &HashSet<String> {
        &self.ignored_groups
    }

    /// Include or exclude a group from the active subset
    pub fn set_group_ignored(&mut self, base_name: &str, ignored: bool) {
        if ignored {
            self.ignored_groups.insert(base_name.to_string());
        } else {
            self.ignored_groups.remove(base_name);
        }
        self.refresh_active();
    }

    /// Discard user edits and restore the default ignored groups
    pub fn reset_to_defaults(&mut self) {
        self.ignored_groups = filter::default_ignored_groups(
            &self.tiles,
            &self.ignore_list,
            self.ignore_transparent_groups,
        );
        self.refresh_active();
    }

    /// Tiles grouped by base name as `(variant, id)` pairs
    pub fn groups(&self) -> BTreeMap<String, Vec<(&'static str, TileId)>> {
        filter::group_indices(&self.tiles)
            .into_iter()
            .map(|(base, members)| {
                let variants = members
                    .into_iter()
                    .filter_map(|index| {
                        self.tiles
                            .get(index)
                            .map(|tile| (filter::variant(tile.name()), TileId::new(index)))
                    })
                    .collect();
                (base, variants)
            })
            .collect()
    }

    /// Build a matcher over the active subset, excluding transparent tiles
    ///
    /// # Errors
    ///
    /// Returns an error if no active tile has a perceptual color
    pub fn matcher(&self) -> Result<TileMatcher> {
        TileMatcher::new(self.active_tiles(), false)
    }
}
