//! Directional-suffix grouping and default ignore policy
//!
//! Textures such as `oak_log_side` and `oak_log_end` are faces of one logical
//! tile. Ignore decisions are made per group, keyed by the name with the
//! suffix stripped.

use std::collections::{BTreeMap, HashSet};

use crate::catalog::Tile;
use crate::io::configuration::{DIRECTIONAL_SUFFIXES, NORMAL_VARIANT};

/// Name with the first matching directional suffix removed
pub fn base_name(name: &str) -> &str {
    DIRECTIONAL_SUFFIXES
        .iter()
        .find_map(|suffix| name.strip_suffix(suffix))
        .unwrap_or(name)
}

/// Directional variant of a name, `"normal"` when it has no suffix
pub fn variant(name: &str) -> &'static str {
    DIRECTIONAL_SUFFIXES
        .iter()
        .copied()
        .find(|suffix| name.ends_with(suffix))
        .map_or(NORMAL_VARIANT, |suffix| suffix.trim_start_matches('_'))
}

fn strip_namespace(name: &str) -> &str {
    name.rsplit_once(':').map_or(name, |(_, stem)| stem)
}

/// Tile indices grouped by base name, in catalog order within each group
pub fn group_indices(tiles: &[Tile]) -> BTreeMap<String, Vec<usize>> {
    let mut groups: BTreeMap<String, Vec<usize>> = BTreeMap::new();
    for (index, tile) in tiles.iter().enumerate() {
        groups
            .entry(base_name(tile.name()).to_string())
            .or_default()
            .push(index);
    }
    groups
}

/// Groups ignored before the user changes anything
///
/// A group is ignored when its base name or any variant's texture name is on
/// the ignore list, or, with `ignore_transparent` set, when any variant has
/// transparency.
pub fn default_ignored_groups(
    tiles: &[Tile],
    ignore_list: &HashSet<String>,
    ignore_transparent: bool,
) -> HashSet<String> {
    group_indices(tiles)
        .into_iter()
        .filter(|(base, members)| {
            let listed = ignore_list.contains(strip_namespace(base))
                || members.iter().any(|&index| {
                    tiles
                        .get(index)
                        .is_some_and(|tile| ignore_list.contains(tile.texture_name()))
                });
            let transparent = ignore_transparent
                && members.iter().any(|&index| {
                    tiles
                        .get(index)
                        .is_some_and(Tile::has_transparency)
                });
            listed || transparent
        })
        .map(|(base, _)| base)
        .collect()
}
