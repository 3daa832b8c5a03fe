//! Zoom and pan transform between screen and grid space
//!
//! A cell `(gx, gy)` occupies the screen square whose top-left corner is
//! `(gx * s + pan_x, gy * s + pan_y)` with `s = tile_size * zoom`.

use crate::io::configuration::{DEFAULT_TILE_SIZE, FIT_MARGIN, MAX_ZOOM, MIN_ZOOM};
use crate::spatial::Cell;

/// Axis-aligned rectangle in screen pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenRect {
    /// Left edge
    pub x: f64,
    /// Top edge
    pub y: f64,
    /// Width in pixels
    pub width: f64,
    /// Height in pixels
    pub height: f64,
}

impl ScreenRect {
    /// Create a rectangle from its top-left corner and size
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Right edge
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Bottom edge
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Test overlap with a canvas spanning `(0, 0)` to `(width, height)`
    ///
    /// Touching edges count as overlap so no partially visible cell is culled.
    pub fn touches_canvas(&self, width: f64, height: f64) -> bool {
        self.right() >= 0.0 && self.x <= width && self.bottom() >= 0.0 && self.y <= height
    }
}

/// Inclusive range of grid cells
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellRange {
    /// First visible column
    pub start_x: usize,
    /// First visible row
    pub start_y: usize,
    /// Last visible column (inclusive)
    pub end_x: usize,
    /// Last visible row (inclusive)
    pub end_y: usize,
}

impl CellRange {
    /// Number of cells covered
    pub const fn cell_count(&self) -> usize {
        (self.end_x - self.start_x + 1) * (self.end_y - self.start_y + 1)
    }

    /// Iterate covered cells row by row
    pub fn cells(&self) -> impl Iterator<Item = Cell> + use<> {
        let Self {
            start_x,
            start_y,
            end_x,
            end_y,
        } = *self;
        (start_y..=end_y)
            .flat_map(move |y| (start_x..=end_x).map(move |x| Cell::new(x as i32, y as i32)))
    }
}

/// Zoom/pan state of one canvas
#[derive(Debug, Clone, PartialEq)]
pub struct Viewport {
    zoom: f64,
    pan_x: f64,
    pan_y: f64,
    canvas_width: f64,
    canvas_height: f64,
    tile_size: f64,
    min_zoom: f64,
    max_zoom: f64,
}

impl Viewport {
    /// Create a viewport at zoom 1 with no pan
    pub fn new(canvas_width: f64, canvas_height: f64, tile_size: u32) -> Self {
        Self {
            zoom: 1.0,
            pan_x: 0.0,
            pan_y: 0.0,
            canvas_width,
            canvas_height,
            tile_size: f64::from(tile_size.max(1)),
            min_zoom: MIN_ZOOM,
            max_zoom: MAX_ZOOM,
        }
    }

    /// Replace the zoom limits, re-clamping the current zoom
    ///
    /// Non-positive or inverted limits are ignored.
    #[must_use]
    pub fn with_zoom_limits(mut self, min_zoom: f64, max_zoom: f64) -> Self {
        if min_zoom > 0.0 && min_zoom <= max_zoom {
            self.min_zoom = min_zoom;
            self.max_zoom = max_zoom;
            self.zoom = self.clamp_zoom(self.zoom);
        }
        self
    }

    /// Current zoom factor
    pub const fn zoom(&self) -> f64 {
        self.zoom
    }

    /// Zoom limits as `(min, max)`
    pub const fn zoom_limits(&self) -> (f64, f64) {
        (self.min_zoom, self.max_zoom)
    }

    /// Pan offset in screen pixels
    pub const fn pan(&self) -> (f64, f64) {
        (self.pan_x, self.pan_y)
    }

    /// Canvas size in screen pixels
    pub const fn canvas_size(&self) -> (f64, f64) {
        (self.canvas_width, self.canvas_height)
    }

    /// Unscaled tile size in pixels
    pub const fn tile_size(&self) -> f64 {
        self.tile_size
    }

    /// On-screen side length of one cell
    pub fn scaled_tile_size(&self) -> f64 {
        self.tile_size * self.zoom
    }

    fn clamp_zoom(&self, zoom: f64) -> f64 {
        if zoom.is_nan() {
            return self.zoom;
        }
        zoom.clamp(self.min_zoom, self.max_zoom)
    }

    /// Resize the canvas, keeping zoom and pan
    pub const fn resize_canvas(&mut self, width: f64, height: f64) {
        self.canvas_width = width;
        self.canvas_height = height;
    }

    /// Cell under a screen point, possibly outside the grid
    pub fn screen_to_grid(&self, screen_x: f64, screen_y: f64) -> Cell {
        let scale = self.scaled_tile_size();
        let gx = ((screen_x - self.pan_x) / scale).floor();
        let gy = ((screen_y - self.pan_y) / scale).floor();
        Cell::new(saturate(gx), saturate(gy))
    }

    /// Top-left screen corner of a cell
    pub fn grid_to_screen(&self, cell: Cell) -> (f64, f64) {
        let scale = self.scaled_tile_size();
        (
            f64::from(cell.x).mul_add(scale, self.pan_x),
            f64::from(cell.y).mul_add(scale, self.pan_y),
        )
    }

    /// Screen rectangle covered by a cell
    pub fn cell_rect(&self, cell: Cell) -> ScreenRect {
        let (x, y) = self.grid_to_screen(cell);
        let size = self.scaled_tile_size();
        ScreenRect::new(x, y, size, size)
    }

    /// Set the pan offset directly
    pub const fn set_pan(&mut self, pan_x: f64, pan_y: f64) {
        self.pan_x = pan_x;
        self.pan_y = pan_y;
    }

    /// Shift the pan offset
    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        self.pan_x += dx;
        self.pan_y += dy;
    }

    /// Change the zoom, keeping the grid point under `anchor` fixed
    ///
    /// Without an anchor the canvas center is kept fixed. Returns whether the
    /// zoom actually changed after clamping.
    pub fn zoom_to(&mut self, zoom: f64, anchor: Option<(f64, f64)>) -> bool {
        let old_zoom = self.zoom;
        let new_zoom = self.clamp_zoom(zoom);
        if (new_zoom - old_zoom).abs() <= f64::EPSILON {
            return false;
        }

        let (anchor_x, anchor_y) =
            anchor.unwrap_or((self.canvas_width / 2.0, self.canvas_height / 2.0));
        let point_x = (anchor_x - self.pan_x) / old_zoom;
        let point_y = (anchor_y - self.pan_y) / old_zoom;
        self.pan_x = point_x.mul_add(-new_zoom, anchor_x);
        self.pan_y = point_y.mul_add(-new_zoom, anchor_y);
        self.zoom = new_zoom;
        true
    }

    /// Multiplicative zoom-in step for the current zoom
    ///
    /// Steps shrink as zoom grows so perceived speed stays roughly constant.
    pub fn zoom_in_factor(&self) -> f64 {
        match self.zoom {
            z if z < 0.5 => 1.3,
            z if z < 1.0 => 1.25,
            z if z < 4.0 => 1.2,
            _ => 1.15,
        }
    }

    /// Multiplicative zoom-out step for the current zoom
    pub fn zoom_out_factor(&self) -> f64 {
        match self.zoom {
            z if z < 0.5 => 0.77,
            z if z < 1.0 => 0.8,
            z if z < 4.0 => 0.83,
            _ => 0.87,
        }
    }

    /// Zoom in one step around an optional anchor
    pub fn zoom_in(&mut self, anchor: Option<(f64, f64)>) -> bool {
        self.zoom_to(self.zoom * self.zoom_in_factor(), anchor)
    }

    /// Zoom out one step around an optional anchor
    pub fn zoom_out(&mut self, anchor: Option<(f64, f64)>) -> bool {
        self.zoom_to(self.zoom * self.zoom_out_factor(), anchor)
    }

    /// Fit a grid inside the canvas with a margin and center it
    ///
    /// Does nothing for an empty grid.
    pub fn fit_to_window(&mut self, grid_width: usize, grid_height: usize) {
        if grid_width == 0 || grid_height == 0 {
            return;
        }
        let pixel_width = grid_width as f64 * self.tile_size;
        let pixel_height = grid_height as f64 * self.tile_size;
        let zoom_x = (self.canvas_width - FIT_MARGIN) / pixel_width;
        let zoom_y = (self.canvas_height - FIT_MARGIN) / pixel_height;

        self.zoom = self.clamp_zoom(zoom_x.min(zoom_y));
        self.pan_x = pixel_width.mul_add(-self.zoom, self.canvas_width) / 2.0;
        self.pan_y = pixel_height.mul_add(-self.zoom, self.canvas_height) / 2.0;
    }

    /// Back to zoom 1 with no pan
    pub const fn reset(&mut self) {
        self.zoom = 1.0;
        self.pan_x = 0.0;
        self.pan_y = 0.0;
    }

    /// Grid cells that may appear on the canvas
    ///
    /// The canvas bounds are widened by `margin` screen pixels on each side
    /// before inverse-transforming, then clamped to the grid. Returns `None`
    /// when the grid lies entirely off-screen or is empty.
    pub fn visible_cells(
        &self,
        grid_width: usize,
        grid_height: usize,
        margin: f64,
    ) -> Option<CellRange> {
        if grid_width == 0 || grid_height == 0 {
            return None;
        }
        let top_left = self.screen_to_grid(-margin, -margin);
        let bottom_right =
            self.screen_to_grid(self.canvas_width + margin, self.canvas_height + margin);

        let max_x = i64::try_from(grid_width).unwrap_or(i64::MAX) - 1;
        let max_y = i64::try_from(grid_height).unwrap_or(i64::MAX) - 1;
        let start_x = i64::from(top_left.x).max(0);
        let start_y = i64::from(top_left.y).max(0);
        let end_x = i64::from(bottom_right.x).min(max_x);
        let end_y = i64::from(bottom_right.y).min(max_y);

        if start_x > end_x || start_y > end_y {
            return None;
        }
        Some(CellRange {
            start_x: usize::try_from(start_x).ok()?,
            start_y: usize::try_from(start_y).ok()?,
            end_x: usize::try_from(end_x).ok()?,
            end_y: usize::try_from(end_y).ok()?,
        })
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(800.0, 600.0, DEFAULT_TILE_SIZE)
    }
}

fn saturate(value: f64) -> i32 {
    if value.is_nan() {
        0
    } else {
        value.clamp(f64::from(i32::MIN), f64::from(i32::MAX)) as i32
    }
}
