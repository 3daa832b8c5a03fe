//! Tests for Bresenham rasterization between cells

#[cfg(test)]
mod tests {
    use mosaictile::math::line::{BresenhamLine, bresenham_line};
    use mosaictile::spatial::Cell;

    fn connected(cells: &[Cell]) -> bool {
        cells
            .windows(2)
            .all(|pair| (pair[0].x - pair[1].x).abs() <= 1 && (pair[0].y - pair[1].y).abs() <= 1)
    }

    #[test]
    fn test_single_point() {
        assert_eq!(bresenham_line(Cell::new(3, 3), Cell::new(3, 3)), vec![Cell::new(3, 3)]);
    }

    // Tests a horizontal line covers every cell between the endpoints
    #[test]
    fn test_horizontal_line() {
        let cells = bresenham_line(Cell::new(0, 0), Cell::new(5, 0));
        assert_eq!(cells.len(), 6);
        assert!(cells.iter().all(|cell| cell.y == 0));
    }

    // Tests diagonal and steep lines stay 8-connected with both endpoints
    // Verified by advancing only one axis per step
    #[test]
    fn test_lines_are_connected() {
        let cases = [
            (Cell::new(0, 0), Cell::new(4, 4)),
            (Cell::new(0, 0), Cell::new(2, 7)),
            (Cell::new(5, -3), Cell::new(-4, 2)),
            (Cell::new(-1, 6), Cell::new(9, 6)),
        ];
        for (start, end) in cases {
            let cells = bresenham_line(start, end);
            assert_eq!(cells.first(), Some(&start));
            assert_eq!(cells.last(), Some(&end));
            assert!(connected(&cells));
            let span = (end.x - start.x).abs().max((end.y - start.y).abs());
            assert_eq!(cells.len(), span as usize + 1);
        }
    }

    #[test]
    fn test_iterator_is_fused() {
        let mut line = BresenhamLine::new(Cell::new(0, 0), Cell::new(1, 0));
        assert_eq!(line.next(), Some(Cell::new(0, 0)));
        assert_eq!(line.next(), Some(Cell::new(1, 0)));
        assert_eq!(line.next(), None);
        assert_eq!(line.next(), None);
    }
}
