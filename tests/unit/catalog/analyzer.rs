//! Tests for transparency classification and average colors

#[cfg(test)]
mod tests {
    use image::{Rgba, RgbaImage};
    use mosaictile::catalog::analyzer::{average_rgb, transparency_ratio};
    use mosaictile::catalog::{Tile, TileAnalysis, TextureAnalyzer};
    use tempfile::TempDir;

    use crate::common::{write_half_transparent, write_texture};

    fn with_transparent_pixels(count: u32) -> RgbaImage {
        let mut image = RgbaImage::from_pixel(10, 10, Rgba([10, 20, 30, 255]));
        for i in 0..count {
            image.put_pixel(i % 10, i / 10, Rgba([0, 0, 0, 0]));
        }
        image
    }

    // Tests the ratio counts partially transparent pixels too
    #[test]
    fn test_transparency_ratio_counts_non_opaque() {
        let mut image = with_transparent_pixels(3);
        image.put_pixel(9, 9, Rgba([1, 1, 1, 254]));
        assert!((transparency_ratio(&image) - 0.04).abs() < 1e-12);
    }

    // Tests the 5% default threshold is exclusive
    // Verified by changing > to >= in analyze_image
    #[test]
    fn test_threshold_boundary() {
        let analyzer = TextureAnalyzer::default();
        assert!(matches!(
            analyzer.analyze_image(&with_transparent_pixels(5)),
            TileAnalysis::Solid { .. }
        ));
        assert_eq!(
            analyzer.analyze_image(&with_transparent_pixels(6)),
            TileAnalysis::Transparent
        );
    }

    // Tests that the mean ignores fully transparent pixels
    #[test]
    fn test_average_skips_invisible_pixels() {
        let mut image = RgbaImage::from_pixel(2, 1, Rgba([100, 50, 0, 255]));
        image.put_pixel(1, 0, Rgba([255, 255, 255, 0]));
        assert_eq!(average_rgb(&image), [100, 50, 0]);
    }

    // Tests the fallback to a plain mean when nothing is visible
    #[test]
    fn test_average_falls_back_to_all_pixels() {
        let mut image = RgbaImage::from_pixel(2, 1, Rgba([100, 0, 0, 0]));
        image.put_pixel(1, 0, Rgba([201, 0, 0, 0]));
        assert_eq!(average_rgb(&image), [150, 0, 0]);
    }

    // Tests parallel analysis drops undecodable files and keeps order
    #[test]
    fn test_analyze_drops_unreadable_tiles() {
        let dir = TempDir::new().expect("temp dir");
        let red = write_texture(dir.path(), "red", [255, 0, 0, 255], 4);
        let glass = write_half_transparent(dir.path(), "glass", [0, 0, 255], 4);
        let broken = dir.path().join("broken.png");
        std::fs::write(&broken, b"not a png").expect("write");

        let mut tiles = vec![
            Tile::new("minecraft:red", red, 4),
            Tile::new("minecraft:broken", broken, 4),
            Tile::new("minecraft:glass", glass, 4),
        ];
        TextureAnalyzer::default().analyze(&mut tiles);

        let names: Vec<&str> = tiles.iter().map(Tile::name).collect();
        assert_eq!(names, ["minecraft:red", "minecraft:glass"]);
        assert_eq!(tiles[0].average_color(), Some([255, 0, 0]));
        assert!(tiles[1].has_transparency());
        assert_eq!(tiles[1].perceptual_color(), None);
    }

    #[test]
    fn test_analyze_file_reports_path() {
        let error = TextureAnalyzer::default()
            .analyze_file(std::path::Path::new("/definitely/missing.png"))
            .expect_err("missing file");
        assert!(error.to_string().contains("missing.png"));
    }
}
