//! Canvas painting tools
//!
//! Tools never own the grid. They act through [`PaintSurface`], which the
//! render engine implements, so the same tool code drives the interactive
//! canvas and headless tests alike.

/// Square brush with stroke interpolation
pub mod brush;
/// Tile picker (eyedropper)
pub mod picker;

pub use brush::{Brush, normalize_brush_size};
pub use picker::Picker;

use crate::catalog::TileId;
use crate::spatial::Cell;

/// Pointer button carried by input events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerButton {
    /// Paints or picks
    Primary,
    /// Unused by the tools
    Secondary,
    /// Pans the view
    Middle,
}

/// Cursor the host should show while a tool is active
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorHint {
    /// Platform arrow
    Default,
    /// Precise cell targeting
    Crosshair,
    /// Color sampling
    Eyedropper,
    /// View is being dragged
    Grab,
}

/// Operations a tool may perform on the canvas it acts on
pub trait PaintSurface {
    /// Tile at a cell, `None` outside the grid
    fn tile_at(&self, cell: Cell) -> Option<TileId>;

    /// Place a tile and mark the cell dirty, returning whether it changed
    ///
    /// Cells outside the grid are ignored.
    fn paint_cell(&mut self, cell: Cell, tile: TileId) -> bool;

    /// Tile currently used for painting
    fn selected_tile(&self) -> Option<TileId>;

    /// Change the painting tile
    fn select_tile(&mut self, tile: TileId);

    /// Ask for a throttled redraw of pending edits
    fn request_render(&mut self);

    /// Stroke finished; force a full redraw
    fn finish_stroke(&mut self);
}

/// Common interface of canvas tools
pub trait CanvasTool {
    /// Pointer pressed over `cell`
    fn on_press(&mut self, surface: &mut dyn PaintSurface, cell: Cell, button: PointerButton);

    /// Pointer moved to `cell` while pressed
    fn on_drag(&mut self, surface: &mut dyn PaintSurface, cell: Cell, button: PointerButton);

    /// Pointer released over `cell`
    fn on_release(&mut self, surface: &mut dyn PaintSurface, cell: Cell, button: PointerButton);

    /// Cursor to show while this tool is active
    fn cursor_hint(&self) -> CursorHint;

    /// Drop any in-progress stroke state
    fn deactivate(&mut self);
}

/// Which tool receives pointer input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ToolKind {
    /// Paint with the selected tile
    #[default]
    Brush,
    /// Pick the painting tile from the canvas
    Picker,
}

/// Both tools plus the exclusive active selection
#[derive(Default)]
pub struct Toolbox {
    brush: Brush,
    picker: Picker,
    active: ToolKind,
}

impl Toolbox {
    /// Create a toolbox with the brush active
    pub fn new() -> Self {
        Self::default()
    }

    /// Currently active tool kind
    pub const fn active_kind(&self) -> ToolKind {
        self.active
    }

    /// Activate a tool, deactivating the previous one
    pub fn select(&mut self, kind: ToolKind) {
        if kind == self.active {
            return;
        }
        self.active_tool_mut().deactivate();
        self.active = kind;
    }

    /// Active tool as a trait object
    pub fn active_tool_mut(&mut self) -> &mut dyn CanvasTool {
        match self.active {
            ToolKind::Brush => &mut self.brush,
            ToolKind::Picker => &mut self.picker,
        }
    }

    /// Cursor of the active tool
    pub fn cursor_hint(&self) -> CursorHint {
        match self.active {
            ToolKind::Brush => self.brush.cursor_hint(),
            ToolKind::Picker => self.picker.cursor_hint(),
        }
    }

    /// Brush parameters
    pub const fn brush(&self) -> &Brush {
        &self.brush
    }

    /// Mutable brush parameters
    pub const fn brush_mut(&mut self) -> &mut Brush {
        &mut self.brush
    }

    /// Mutable picker, e.g. to install a pick callback
    pub const fn picker_mut(&mut self) -> &mut Picker {
        &mut self.picker
    }

    /// Side length of the hover highlight for the active tool
    pub const fn footprint_size(&self) -> u32 {
        match self.active {
            ToolKind::Brush => self.brush.size(),
            ToolKind::Picker => 1,
        }
    }
}
