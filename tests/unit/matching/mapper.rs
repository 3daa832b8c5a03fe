//! Tests for image to grid mapping

#[cfg(test)]
mod tests {
    use image::{DynamicImage, Rgb, RgbImage};
    use mosaictile::MosaicError;
    use mosaictile::catalog::TileId;
    use mosaictile::matching::ImageMapper;
    use mosaictile::spatial::Cell;
    use tempfile::TempDir;

    use crate::common::rgbw_catalog;

    fn quadrants(size: u32) -> DynamicImage {
        let half = size / 2;
        DynamicImage::ImageRgb8(RgbImage::from_fn(size, size, |x, y| match (x < half, y < half) {
            (true, true) => Rgb([255, 0, 0]),
            (false, true) => Rgb([0, 255, 0]),
            (true, false) => Rgb([0, 0, 255]),
            (false, false) => Rgb([255, 255, 255]),
        }))
    }

    // Tests one cell per pixel at native size
    #[test]
    fn test_map_native_size() {
        let catalog = rgbw_catalog();
        let matcher = catalog.matcher().expect("matcher");
        let grid = ImageMapper::new(&matcher)
            .map_image(&quadrants(4), None, None)
            .expect("map");

        assert_eq!((grid.width(), grid.height()), (4, 4));
        assert_eq!(grid.get(Cell::new(0, 0)), Some(TileId::new(0)));
        assert_eq!(grid.get(Cell::new(3, 0)), Some(TileId::new(1)));
        assert_eq!(grid.get(Cell::new(0, 3)), Some(TileId::new(2)));
        assert_eq!(grid.get(Cell::new(3, 3)), Some(TileId::new(3)));
    }

    // Tests point sampling keeps each quadrant a single tile
    // Verified by switching the resize filter to bilinear
    #[test]
    fn test_map_downscaled() {
        let catalog = rgbw_catalog();
        let matcher = catalog.matcher().expect("matcher");
        let grid = ImageMapper::new(&matcher)
            .map_image(&quadrants(4), Some((2, 2)), None)
            .expect("map");

        assert_eq!((grid.width(), grid.height()), (2, 2));
        let tiles: Vec<TileId> = grid.iter().map(|(_, tile)| tile).collect();
        assert_eq!(
            tiles,
            vec![TileId::new(0), TileId::new(1), TileId::new(2), TileId::new(3)]
        );
    }

    // Tests progress rises monotonically per row and ends at one
    #[test]
    fn test_progress_reports() {
        let catalog = rgbw_catalog();
        let matcher = catalog.matcher().expect("matcher");
        let mut seen = Vec::new();
        let mut report = |fraction: f64| seen.push(fraction);

        ImageMapper::new(&matcher)
            .map_image(&quadrants(8), Some((3, 5)), Some(&mut report))
            .expect("map");

        assert_eq!(seen.len(), 5);
        assert!(seen.windows(2).all(|pair| pair[0] < pair[1]));
        assert!((seen[0] - 0.2).abs() < 1e-9);
        assert!((seen[4] - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_zero_target_rejected() {
        let catalog = rgbw_catalog();
        let matcher = catalog.matcher().expect("matcher");
        let result = ImageMapper::new(&matcher).map_image(&quadrants(4), Some((0, 2)), None);
        assert!(matches!(result, Err(MosaicError::EmptyImage { width: 0, .. })));
    }

    #[test]
    fn test_map_path_reports_missing_file() {
        let dir = TempDir::new().expect("temp dir");
        let missing = dir.path().join("missing.png");
        let catalog = rgbw_catalog();
        let matcher = catalog.matcher().expect("matcher");

        let message = ImageMapper::new(&matcher)
            .map_path(&missing, None, None)
            .expect_err("missing file")
            .to_string();
        assert!(message.contains("missing.png"));
    }

    #[test]
    fn test_map_path_decodes_file() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("source.png");
        quadrants(6).save(&path).expect("write");
        let catalog = rgbw_catalog();
        let matcher = catalog.matcher().expect("matcher");

        let grid = ImageMapper::new(&matcher)
            .map_path(&path, Some((2, 2)), None)
            .expect("map");
        assert_eq!(grid.get(Cell::new(1, 1)), Some(TileId::new(3)));
    }
}
