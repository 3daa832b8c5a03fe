use std::time::Instant;

use crate::catalog::TileId;
use crate::render::{DrawTarget, RenderEngine, RenderOutcome};
use crate::spatial::{Cell, Grid};
use crate::tools::{CursorHint, PaintSurface, PointerButton, ToolKind, Toolbox};

/// One editing session over a canvas
///
/// Routes typed pointer events: the primary button drives the active tool,
/// the middle button pans, scrolling zooms around the pointer and every
/// move updates the hover highlight.
pub struct Editor<T: DrawTarget> {
    engine: RenderEngine<T>,
    tools: Toolbox,
    pressed: Option<PointerButton>,
}

impl<T: DrawTarget> Editor<T> {
    /// Wrap an engine with the brush active
    pub fn new(engine: RenderEngine<T>) -> Self {
        Self {
            engine,
            tools: Toolbox::new(),
            pressed: None,
        }
    }

    /// Render engine
    pub const fn engine(&self) -> &RenderEngine<T> {
        &self.engine
    }

    /// Mutable render engine
    pub const fn engine_mut(&mut self) -> &mut RenderEngine<T> {
        &mut self.engine
    }

    /// Tool state
    pub const fn tools(&self) -> &Toolbox {
        &self.tools
    }

    /// Mutable tool state, e.g. to install a pick callback
    pub const fn tools_mut(&mut self) -> &mut Toolbox {
        &mut self.tools
    }

    /// Show a new grid fitted to the canvas
    pub fn load_grid(&mut self, grid: Grid) {
        self.pressed = None;
        self.tools.active_tool_mut().deactivate();
        self.engine.set_grid(grid);
        self.engine.fit_to_window();
    }

    /// Activate a tool; the hover highlight follows its footprint
    ///
    /// A stroke still held with the primary button ends here, as if released.
    pub fn select_tool(&mut self, kind: ToolKind) {
        if kind != self.tools.active_kind() && self.pressed == Some(PointerButton::Primary) {
            self.pressed = None;
            self.tools.active_tool_mut().deactivate();
            self.engine.finish_stroke();
        }
        self.tools.select(kind);
        self.engine.set_hover_size(self.tools.footprint_size());
    }

    /// Change the brush size, returning the normalized value
    pub fn set_brush_size(&mut self, size: u32) -> u32 {
        self.tools.brush_mut().set_size(size);
        self.engine.set_hover_size(self.tools.footprint_size());
        self.tools.brush().size()
    }

    /// Change the painting tile
    pub fn select_tile(&mut self, tile: TileId) {
        PaintSurface::select_tile(&mut self.engine, tile);
    }

    /// Cursor the host should show
    pub fn cursor_hint(&self) -> CursorHint {
        if self.engine.is_panning() {
            CursorHint::Grab
        } else {
            self.tools.cursor_hint()
        }
    }

    fn cell_at(&self, screen_x: f64, screen_y: f64) -> Cell {
        self.engine.viewport().screen_to_grid(screen_x, screen_y)
    }

    /// Pointer button went down
    pub fn pointer_pressed(&mut self, screen_x: f64, screen_y: f64, button: PointerButton) {
        if self.pressed.is_some() {
            return;
        }
        self.pressed = Some(button);
        if button == PointerButton::Middle {
            self.engine.begin_pan(screen_x, screen_y);
            return;
        }
        let cell = self.cell_at(screen_x, screen_y);
        self.tools
            .active_tool_mut()
            .on_press(&mut self.engine, cell, button);
    }

    /// Pointer moved, pressed or not
    pub fn pointer_moved(&mut self, screen_x: f64, screen_y: f64, now: Instant) {
        match self.pressed {
            Some(PointerButton::Middle) => {
                self.engine.update_pan(screen_x, screen_y);
            }
            Some(button) => {
                let cell = self.cell_at(screen_x, screen_y);
                self.tools
                    .active_tool_mut()
                    .on_drag(&mut self.engine, cell, button);
            }
            None => {}
        }
        let cell = self.cell_at(screen_x, screen_y);
        self.engine.set_hover_at(Some(cell), now);
    }

    /// Pointer button went up
    pub fn pointer_released(&mut self, screen_x: f64, screen_y: f64, button: PointerButton) {
        if self.pressed != Some(button) {
            return;
        }
        self.pressed = None;
        if button == PointerButton::Middle {
            self.engine.end_pan();
            return;
        }
        let cell = self.cell_at(screen_x, screen_y);
        self.tools
            .active_tool_mut()
            .on_release(&mut self.engine, cell, button);
    }

    /// Pointer left the canvas
    pub fn pointer_left(&mut self, now: Instant) {
        self.engine.set_hover_at(None, now);
    }

    /// Wheel scrolled over a screen point; positive deltas zoom in
    pub fn scrolled(&mut self, screen_x: f64, screen_y: f64, delta: f64) -> Option<RenderOutcome> {
        let anchor = Some((screen_x, screen_y));
        if delta > 0.0 {
            self.engine.zoom_in(anchor)
        } else if delta < 0.0 {
            self.engine.zoom_out(anchor)
        } else {
            None
        }
    }

    /// Periodic poll flushing coalesced renders
    pub fn tick(&mut self, now: Instant) -> Option<RenderOutcome> {
        self.engine.tick(now)
    }
}
