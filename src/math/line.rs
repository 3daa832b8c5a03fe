//! Integer Bresenham rasterization between two grid cells

use crate::spatial::Cell;

/// Iterator over every cell on the Bresenham line from `start` to `end`
///
/// Both endpoints are included and consecutive cells are 8-connected, so a
/// brush stamped at each point leaves no gaps.
#[derive(Debug, Clone)]
pub struct BresenhamLine {
    current: Cell,
    end: Cell,
    dx: i64,
    dy: i64,
    step_x: i32,
    step_y: i32,
    error: i64,
    finished: bool,
}

impl BresenhamLine {
    /// Create a line iterator between two cells
    pub fn new(start: Cell, end: Cell) -> Self {
        let dx = (i64::from(end.x) - i64::from(start.x)).abs();
        let dy = (i64::from(end.y) - i64::from(start.y)).abs();
        Self {
            current: start,
            end,
            dx,
            dy,
            step_x: if start.x < end.x { 1 } else { -1 },
            step_y: if start.y < end.y { 1 } else { -1 },
            error: dx - dy,
            finished: false,
        }
    }
}

impl Iterator for BresenhamLine {
    type Item = Cell;

    fn next(&mut self) -> Option<Cell> {
        if self.finished {
            return None;
        }

        let point = self.current;
        if point == self.end {
            self.finished = true;
            return Some(point);
        }

        let doubled = 2 * self.error;
        if doubled > -self.dy {
            self.error -= self.dy;
            self.current.x += self.step_x;
        }
        if doubled < self.dx {
            self.error += self.dx;
            self.current.y += self.step_y;
        }

        Some(point)
    }
}

/// Collect the cells of a line between two cells
pub fn bresenham_line(start: Cell, end: Cell) -> Vec<Cell> {
    BresenhamLine::new(start, end).collect()
}
