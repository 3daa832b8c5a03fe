use std::fmt;

use crate::catalog::TileId;
use crate::spatial::Cell;
use crate::tools::{CanvasTool, CursorHint, PaintSurface, PointerButton};

type PickHandler = Box<dyn FnMut(TileId)>;

/// Samples the tile under the pointer into the painting selection
#[derive(Default)]
pub struct Picker {
    on_pick: Option<PickHandler>,
}

impl fmt::Debug for Picker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Picker")
            .field("on_pick", &self.on_pick.is_some())
            .finish()
    }
}

impl Picker {
    /// Create a picker without a notification handler
    pub fn new() -> Self {
        Self::default()
    }

    /// Install the handler notified with every picked tile
    pub fn set_on_pick(&mut self, handler: impl FnMut(TileId) + 'static) {
        self.on_pick = Some(Box::new(handler));
    }

    fn pick(&mut self, surface: &mut dyn PaintSurface, cell: Cell, button: PointerButton) {
        if button != PointerButton::Primary {
            return;
        }
        let Some(tile) = surface.tile_at(cell) else {
            return;
        };
        surface.select_tile(tile);
        if let Some(handler) = self.on_pick.as_mut() {
            handler(tile);
        }
    }
}

impl CanvasTool for Picker {
    fn on_press(&mut self, surface: &mut dyn PaintSurface, cell: Cell, button: PointerButton) {
        self.pick(surface, cell, button);
    }

    fn on_drag(&mut self, surface: &mut dyn PaintSurface, cell: Cell, button: PointerButton) {
        self.pick(surface, cell, button);
    }

    fn on_release(&mut self, _surface: &mut dyn PaintSurface, _cell: Cell, _button: PointerButton) {}

    fn cursor_hint(&self) -> CursorHint {
        CursorHint::Eyedropper
    }

    fn deactivate(&mut self) {}
}
