//! Tests for nearest-tile selection in perceptual color space

#[cfg(test)]
mod tests {
    use mosaictile::MosaicError;
    use mosaictile::catalog::{Tile, TileAnalysis, TileId};
    use mosaictile::math::color::srgb_to_lab;
    use mosaictile::matching::TileMatcher;

    fn transparent(name: &str) -> Tile {
        let mut tile = Tile::new(name, format!("/nonexistent/{name}.png"), 16);
        tile.apply_analysis(TileAnalysis::Transparent);
        tile
    }

    fn solid(name: &str, rgb: [u8; 3]) -> Tile {
        Tile::solid(name, format!("/nonexistent/{name}.png"), 16, rgb)
    }

    fn indexed(tiles: &[Tile]) -> impl Iterator<Item = (TileId, &Tile)> {
        tiles.iter().enumerate().map(|(i, tile)| (TileId::new(i), tile))
    }

    // Tests a pure color picks the matching tile
    #[test]
    fn test_nearest_primary() {
        let tiles = [
            solid("red", [255, 0, 0]),
            solid("green", [0, 255, 0]),
            solid("blue", [0, 0, 255]),
        ];
        let matcher = TileMatcher::new(indexed(&tiles), false).expect("matcher");

        assert_eq!(matcher.nearest(srgb_to_lab([250, 10, 10])), TileId::new(0));
        assert_eq!(matcher.nearest(srgb_to_lab([0, 0, 200])), TileId::new(2));
        let (_, distance) = matcher.nearest_with_distance(srgb_to_lab([0, 255, 0]));
        assert!(distance < 1e-9);
    }

    // Tests transparent tiles never become candidates, even when allowed,
    // because they carry no perceptual color
    #[test]
    fn test_transparent_tiles_excluded() {
        let tiles = [
            transparent("glass"),
            solid("red", [255, 0, 0]),
            solid("blue", [0, 0, 255]),
        ];

        let strict = TileMatcher::new(indexed(&tiles), false).expect("matcher");
        assert_eq!(strict.len(), 2);
        assert_eq!(strict.nearest(srgb_to_lab([250, 5, 5])), TileId::new(1));

        let relaxed = TileMatcher::new(indexed(&tiles), true).expect("matcher");
        assert_eq!(relaxed.len(), 2);
        assert_eq!(relaxed.candidate_ids().next(), Some(TileId::new(1)));
    }

    // Tests equidistant candidates resolve to the first one offered
    // Verified by using <= in the scan
    #[test]
    fn test_ties_pick_first() {
        let tiles = [solid("a", [128, 128, 128]), solid("b", [128, 128, 128])];
        let matcher = TileMatcher::new(indexed(&tiles), false).expect("matcher");
        assert_eq!(matcher.nearest(srgb_to_lab([0, 0, 0])), TileId::new(0));
        assert_eq!(
            matcher.candidate_ids().collect::<Vec<_>>(),
            vec![TileId::new(0), TileId::new(1)]
        );
    }

    #[test]
    fn test_unanalyzed_tiles_rejected() {
        let tiles = [Tile::new("raw", "/nonexistent/raw.png", 16), transparent("glass")];
        let error = TileMatcher::new(indexed(&tiles), true).expect_err("no eligible tiles");
        assert!(matches!(
            error,
            MosaicError::NoEligibleTiles {
                candidates: 2,
                allow_transparency: true
            }
        ));
    }

    // Tests repeated queries return identical answers
    #[test]
    fn test_nearest_deterministic() {
        let tiles: Vec<Tile> = (0..32u8)
            .map(|i| solid(&format!("t{i}"), [i * 8, 255 - i * 8, i.wrapping_mul(37)]))
            .collect();
        let matcher = TileMatcher::new(indexed(&tiles), false).expect("matcher");
        let target = srgb_to_lab([120, 60, 200]);
        let first = matcher.nearest(target);
        for _ in 0..10 {
            assert_eq!(matcher.nearest(target), first);
        }
    }
}
