use crate::io::configuration::{MAX_BRUSH_SIZE, MIN_BRUSH_SIZE};
use crate::math::line::BresenhamLine;
use crate::spatial::Cell;
use crate::tools::{CanvasTool, CursorHint, PaintSurface, PointerButton};

/// Clamp a requested brush size to an odd value in the allowed range
///
/// Even values round up to the next odd value, or down when that would
/// exceed the maximum.
pub const fn normalize_brush_size(size: u32) -> u32 {
    let clamped = if size < MIN_BRUSH_SIZE {
        MIN_BRUSH_SIZE
    } else if size > MAX_BRUSH_SIZE {
        MAX_BRUSH_SIZE
    } else {
        size
    };
    if clamped % 2 == 1 {
        clamped
    } else if clamped < MAX_BRUSH_SIZE {
        clamped + 1
    } else {
        clamped - 1
    }
}

/// Cells of the square footprint of side `size` centered on `center`
pub fn footprint(center: Cell, size: u32) -> impl Iterator<Item = Cell> {
    let radius = i32::try_from(size / 2).unwrap_or(0);
    (-radius..=radius).flat_map(move |dy| (-radius..=radius).map(move |dx| center.offset(dx, dy)))
}

/// Square brush painting the selected tile
#[derive(Debug, Clone)]
pub struct Brush {
    size: u32,
    last: Option<Cell>,
}

impl Default for Brush {
    fn default() -> Self {
        Self {
            size: MIN_BRUSH_SIZE,
            last: None,
        }
    }
}

impl Brush {
    /// Create a brush with a normalized size
    pub const fn new(size: u32) -> Self {
        Self {
            size: normalize_brush_size(size),
            last: None,
        }
    }

    /// Current odd side length
    pub const fn size(&self) -> u32 {
        self.size
    }

    /// Change the side length, normalizing it
    pub const fn set_size(&mut self, size: u32) {
        self.size = normalize_brush_size(size);
    }

    /// Last painted cell of the current stroke
    pub const fn last_cell(&self) -> Option<Cell> {
        self.last
    }

    /// Stamp the footprint at `center`, returning the number of changed cells
    pub fn paint(&self, surface: &mut dyn PaintSurface, center: Cell) -> usize {
        let Some(tile) = surface.selected_tile() else {
            return 0;
        };
        let mut changed = 0;
        for cell in footprint(center, self.size) {
            if surface.paint_cell(cell, tile) {
                changed += 1;
            }
        }
        changed
    }
}

impl CanvasTool for Brush {
    fn on_press(&mut self, surface: &mut dyn PaintSurface, cell: Cell, button: PointerButton) {
        if button != PointerButton::Primary {
            return;
        }
        self.paint(surface, cell);
        self.last = Some(cell);
        surface.request_render();
    }

    fn on_drag(&mut self, surface: &mut dyn PaintSurface, cell: Cell, button: PointerButton) {
        if button != PointerButton::Primary || self.last == Some(cell) {
            return;
        }
        match self.last {
            Some(last) => {
                for point in BresenhamLine::new(last, cell).skip(1) {
                    self.paint(surface, point);
                }
            }
            None => {
                self.paint(surface, cell);
            }
        }
        self.last = Some(cell);
        surface.request_render();
    }

    fn on_release(&mut self, surface: &mut dyn PaintSurface, _cell: Cell, button: PointerButton) {
        if button != PointerButton::Primary {
            return;
        }
        if self.last.take().is_some() {
            surface.finish_stroke();
        }
    }

    fn cursor_hint(&self) -> CursorHint {
        CursorHint::Crosshair
    }

    fn deactivate(&mut self) {
        self.last = None;
    }
}
