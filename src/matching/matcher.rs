//! Nearest-tile search in perceptual color space

use crate::catalog::{Tile, TileId};
use crate::io::error::{MosaicError, Result};
use crate::math::color::Lab;

/// Linear-scan nearest neighbour over eligible tile colors
///
/// Candidates keep the order they were offered in; equidistant tiles resolve
/// to the first one encountered.
#[derive(Debug, Clone)]
pub struct TileMatcher {
    candidates: Vec<(TileId, Lab)>,
}

impl TileMatcher {
    /// Build a matcher from `(id, tile)` pairs
    ///
    /// Tiles without a perceptual color never qualify. Transparent tiles
    /// qualify only when `allow_transparency` is set and they carry a color.
    ///
    /// # Errors
    ///
    /// Returns `NoEligibleTiles` if no candidate qualifies
    pub fn new<'a, I>(tiles: I, allow_transparency: bool) -> Result<Self>
    where
        I: IntoIterator<Item = (TileId, &'a Tile)>,
    {
        let mut offered = 0;
        let candidates: Vec<(TileId, Lab)> = tiles
            .into_iter()
            .inspect(|_| offered += 1)
            .filter(|(_, tile)| allow_transparency || !tile.has_transparency())
            .filter_map(|(id, tile)| tile.perceptual_color().map(|lab| (id, lab)))
            .collect();

        if candidates.is_empty() {
            return Err(MosaicError::NoEligibleTiles {
                candidates: offered,
                allow_transparency,
            });
        }
        Ok(Self { candidates })
    }

    /// Number of eligible tiles
    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    /// Always false; construction rejects an empty candidate set
    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    /// Eligible tile ids in scan order
    pub fn candidate_ids(&self) -> impl Iterator<Item = TileId> + '_ {
        self.candidates.iter().map(|(id, _)| *id)
    }

    /// Closest tile to `target` together with its Euclidean distance
    pub fn nearest_with_distance(&self, target: Lab) -> (TileId, f64) {
        let mut best_id = self.candidates.first().map_or(TileId::new(0), |(id, _)| *id);
        let mut best_distance = f64::INFINITY;

        for (id, lab) in &self.candidates {
            let distance = lab.distance_squared(&target);
            if distance < best_distance {
                best_distance = distance;
                best_id = *id;
            }
        }
        (best_id, best_distance.sqrt())
    }

    /// Closest tile to `target`
    pub fn nearest(&self, target: Lab) -> TileId {
        self.nearest_with_distance(target).0
    }
}
