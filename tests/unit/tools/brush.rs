//! Tests for brush sizing, footprints and stroke interpolation

#[cfg(test)]
mod tests {
    use mosaictile::catalog::TileId;
    use mosaictile::io::configuration::{MAX_BRUSH_SIZE, MIN_BRUSH_SIZE};
    use mosaictile::math::line::bresenham_line;
    use mosaictile::spatial::Cell;
    use mosaictile::tools::brush::footprint;
    use mosaictile::tools::{Brush, CanvasTool, CursorHint, PointerButton, normalize_brush_size};
    use std::collections::HashSet;

    use super::super::GridSurface;

    // Tests sizes are clamped and forced odd
    // Verified by rounding even sizes down
    #[test]
    fn test_normalize_brush_size() {
        assert_eq!(normalize_brush_size(0), MIN_BRUSH_SIZE);
        assert_eq!(normalize_brush_size(1), 1);
        assert_eq!(normalize_brush_size(2), 3);
        assert_eq!(normalize_brush_size(7), 7);
        assert_eq!(normalize_brush_size(14), 15);
        assert_eq!(normalize_brush_size(100), MAX_BRUSH_SIZE);
        assert!((0..40).all(|size| normalize_brush_size(size) % 2 == 1));
    }

    #[test]
    fn test_footprint_square() {
        let cells: Vec<Cell> = footprint(Cell::new(5, 5), 3).collect();
        assert_eq!(cells.len(), 9);
        assert_eq!(cells.first(), Some(&Cell::new(4, 4)));
        assert_eq!(cells.last(), Some(&Cell::new(6, 6)));
        assert_eq!(footprint(Cell::new(0, 0), 1).collect::<Vec<_>>(), vec![Cell::new(0, 0)]);
    }

    // Tests footprints clip at the grid edge
    #[test]
    fn test_paint_clips_at_edge() {
        let mut surface = GridSurface::new(4, 4);
        let brush = Brush::new(3);
        assert_eq!(brush.paint(&mut surface, Cell::new(0, 0)), 4);
        assert_eq!(brush.paint(&mut surface, Cell::new(0, 0)), 0);
    }

    #[test]
    fn test_paint_without_selection() {
        let mut surface = GridSurface::new(4, 4);
        surface.selected = None;
        let mut brush = Brush::default();
        brush.on_press(&mut surface, Cell::new(1, 1), PointerButton::Primary);
        assert!(surface.painted.is_empty());
    }

    // Tests a fast drag leaves no gaps between samples
    // Verified by painting only the sampled cells
    #[test]
    fn test_drag_interpolates() {
        let mut surface = GridSurface::new(20, 20);
        let mut brush = Brush::default();

        brush.on_press(&mut surface, Cell::new(1, 1), PointerButton::Primary);
        brush.on_drag(&mut surface, Cell::new(9, 4), PointerButton::Primary);
        brush.on_drag(&mut surface, Cell::new(9, 4), PointerButton::Primary);

        let painted: HashSet<Cell> = surface.painted.iter().copied().collect();
        let expected: HashSet<Cell> = bresenham_line(Cell::new(1, 1), Cell::new(9, 4))
            .into_iter()
            .collect();
        assert_eq!(painted, expected);
        assert_eq!(surface.render_requests, 2);
        assert_eq!(brush.last_cell(), Some(Cell::new(9, 4)));

        brush.on_release(&mut surface, Cell::new(9, 4), PointerButton::Primary);
        assert_eq!(surface.strokes_finished, 1);
        assert_eq!(brush.last_cell(), None);
    }

    // Tests a wide brush drag covers the swept band
    #[test]
    fn test_wide_drag_covers_band() {
        let mut surface = GridSurface::new(12, 12);
        let mut brush = Brush::new(3);

        brush.on_press(&mut surface, Cell::new(2, 5), PointerButton::Primary);
        brush.on_drag(&mut surface, Cell::new(9, 5), PointerButton::Primary);

        for x in 1..=10 {
            for y in 4..=6 {
                assert_eq!(surface.grid.get(Cell::new(x, y)), Some(TileId::new(1)));
            }
        }
        assert_eq!(surface.grid.get(Cell::new(5, 7)), Some(TileId::new(0)));
    }

    #[test]
    fn test_other_buttons_ignored() {
        let mut surface = GridSurface::new(4, 4);
        let mut brush = Brush::default();
        brush.on_press(&mut surface, Cell::new(1, 1), PointerButton::Secondary);
        brush.on_release(&mut surface, Cell::new(1, 1), PointerButton::Secondary);
        assert!(surface.painted.is_empty());
        assert_eq!(surface.strokes_finished, 0);
    }

    // Tests deactivation drops the stroke so a later drag does not connect
    #[test]
    fn test_deactivate_breaks_stroke() {
        let mut surface = GridSurface::new(10, 10);
        let mut brush = Brush::default();
        brush.on_press(&mut surface, Cell::new(0, 0), PointerButton::Primary);
        brush.deactivate();
        brush.on_drag(&mut surface, Cell::new(5, 0), PointerButton::Primary);

        assert_eq!(surface.painted, vec![Cell::new(0, 0), Cell::new(5, 0)]);
        assert_eq!(brush.cursor_hint(), CursorHint::Crosshair);
    }

    #[test]
    fn test_set_size_normalizes() {
        let mut brush = Brush::new(4);
        assert_eq!(brush.size(), 5);
        brush.set_size(0);
        assert_eq!(brush.size(), 1);
    }
}
