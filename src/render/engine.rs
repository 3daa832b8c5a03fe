//! Incremental tile-grid renderer
//!
//! Two render modes share one entry point. A full render clears the canvas
//! and redraws every visible cell; a dirty render only redraws cells edited
//! since the last frame. Redraw requests are coalesced through time gates
//! instead of queued, and the hover highlight lives on a separate overlay
//! with its own gate.

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use tracing::debug;

use crate::catalog::TileId;
use crate::io::configuration::{
    BACKGROUND_COLOR, CULL_MARGIN, DIRTY_RENDER_LIMIT, GRID_LINE_COLOR, GRID_VISIBLE_ZOOM,
    HOVER_COLOR, HOVER_INTERVAL, HOVER_THICKNESS, MAX_PENDING_EDITS, RENDER_INTERVAL, Rgba,
};
use crate::render::target::{DrawResult, DrawTarget, TargetLost};
use crate::render::texture_cache::{TextureCache, TexturePrewarmer};
use crate::render::throttle::Throttle;
use crate::spatial::viewport::{CellRange, ScreenRect};
use crate::spatial::{Cell, DirtySet, Grid, Viewport};
use crate::tools::PaintSurface;

// Half a pixel moves a boundary line onto the first pixel after the boundary
const GRID_LINE_OFFSET: f64 = 0.5;

type TileChangedHandler = Box<dyn FnMut(Cell, TileId)>;
type HoverHandler = Box<dyn FnMut(Cell)>;

/// Render engine settings
#[derive(Debug, Clone, PartialEq)]
pub struct RenderConfig {
    /// Canvas clear color
    pub background: Rgba,
    /// Grid line color
    pub grid_color: Rgba,
    /// Whether grid lines are drawn at all
    pub show_grid: bool,
    /// Grid lines are hidden below this zoom
    pub grid_visible_zoom: f64,
    /// Hover outline color
    pub hover_color: Rgba,
    /// Hover outline thickness in screen pixels
    pub hover_thickness: f64,
    /// Screen margin added around the canvas before culling
    pub cull_margin: f64,
    /// Dirty renders are used below this many changed cells
    pub dirty_limit: usize,
    /// Pending edits that bypass the render interval
    pub max_pending_edits: usize,
    /// Minimum time between renders
    pub render_interval: std::time::Duration,
    /// Minimum time between hover updates
    pub hover_interval: std::time::Duration,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            background: BACKGROUND_COLOR,
            grid_color: GRID_LINE_COLOR,
            show_grid: true,
            grid_visible_zoom: GRID_VISIBLE_ZOOM,
            hover_color: HOVER_COLOR,
            hover_thickness: HOVER_THICKNESS,
            cull_margin: CULL_MARGIN,
            dirty_limit: DIRTY_RENDER_LIMIT,
            max_pending_edits: MAX_PENDING_EDITS,
            render_interval: RENDER_INTERVAL,
            hover_interval: HOVER_INTERVAL,
        }
    }
}

/// What a call to [`RenderEngine::render`] did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderOutcome {
    /// Canvas cleared and every visible cell drawn
    Full {
        /// Texture draw calls issued
        draws: usize,
    },
    /// Only changed cells redrawn
    Dirty {
        /// Texture draw calls issued
        draws: usize,
    },
    /// Draw target went away; the next render starts from a clean state
    Skipped,
    /// A render was already in progress
    Busy,
}

/// Running render counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderStats {
    /// Completed full renders
    pub full_renders: usize,
    /// Completed dirty renders
    pub dirty_renders: usize,
    /// Frames dropped because the target was lost
    pub skipped_frames: usize,
    /// Texture draw calls issued in total
    pub draw_calls: usize,
    /// Texture uploads to the draw target
    pub uploads: usize,
}

/// Owns the grid, viewport and dirty set of one canvas and draws them
pub struct RenderEngine<T: DrawTarget> {
    target: T,
    grid: Option<Grid>,
    viewport: Viewport,
    dirty: DirtySet,
    textures: Arc<TextureCache>,
    prewarmer: Option<TexturePrewarmer>,
    config: RenderConfig,
    busy: bool,
    pending: bool,
    pending_edits: usize,
    needs_full: bool,
    render_gate: Throttle,
    hover_gate: Throttle,
    hover_cell: Option<Cell>,
    hover_pending: bool,
    hover_size: u32,
    panning: Option<(f64, f64)>,
    selected: Option<TileId>,
    on_tile_changed: Option<TileChangedHandler>,
    on_hover: Option<HoverHandler>,
    stats: RenderStats,
}

impl<T: DrawTarget + fmt::Debug> fmt::Debug for RenderEngine<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderEngine")
            .field("target", &self.target)
            .field("viewport", &self.viewport)
            .field("dirty", &self.dirty.len())
            .field("stats", &self.stats)
            .finish_non_exhaustive()
    }
}

impl<T: DrawTarget> RenderEngine<T> {
    /// Create an engine without a grid
    pub fn new(
        target: T,
        viewport: Viewport,
        textures: Arc<TextureCache>,
        config: RenderConfig,
    ) -> Self {
        Self {
            target,
            grid: None,
            viewport,
            dirty: DirtySet::default(),
            textures,
            prewarmer: None,
            render_gate: Throttle::new(config.render_interval),
            hover_gate: Throttle::new(config.hover_interval),
            config,
            busy: false,
            pending: false,
            pending_edits: 0,
            needs_full: true,
            hover_cell: None,
            hover_pending: false,
            hover_size: 1,
            panning: None,
            selected: None,
            on_tile_changed: None,
            on_hover: None,
            stats: RenderStats::default(),
        }
    }

    /// Decode textures of new grids ahead of their first render
    #[must_use]
    pub fn with_prewarmer(mut self, prewarmer: TexturePrewarmer) -> Self {
        self.prewarmer = Some(prewarmer);
        self
    }

    /// Install the handler notified with `(cell, new_tile)` on every edit
    pub fn on_tile_changed(&mut self, handler: impl FnMut(Cell, TileId) + 'static) {
        self.on_tile_changed = Some(Box::new(handler));
    }

    /// Install the handler notified when the hovered grid cell changes
    pub fn on_hover(&mut self, handler: impl FnMut(Cell) + 'static) {
        self.on_hover = Some(Box::new(handler));
    }

    /// Draw target
    pub const fn target(&self) -> &T {
        &self.target
    }

    /// Mutable draw target
    pub const fn target_mut(&mut self) -> &mut T {
        &mut self.target
    }

    /// Current grid
    pub const fn grid(&self) -> Option<&Grid> {
        self.grid.as_ref()
    }

    /// Current viewport
    pub const fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// Cells edited since the last render
    pub const fn dirty(&self) -> &DirtySet {
        &self.dirty
    }

    /// Shared texture cache
    pub const fn textures(&self) -> &Arc<TextureCache> {
        &self.textures
    }

    /// Engine settings
    pub const fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Render counters
    pub const fn stats(&self) -> RenderStats {
        self.stats
    }

    /// Whether a coalesced render is waiting for [`Self::tick`]
    pub const fn has_pending_render(&self) -> bool {
        self.pending
    }

    /// Hovered cell, if the pointer is over the canvas
    pub const fn hover_cell(&self) -> Option<Cell> {
        self.hover_cell
    }

    /// Whether the view is being dragged
    pub const fn is_panning(&self) -> bool {
        self.panning.is_some()
    }

    /// Replace the grid, pre-warm its textures and redraw
    pub fn set_grid(&mut self, grid: Grid) {
        self.dirty.reset(grid.width(), grid.height());
        self.hover_cell = None;

        if let Some(prewarmer) = &self.prewarmer {
            let report = prewarmer.prewarm(&self.textures, &grid.unique_tiles());
            for (tile, texture) in report.loaded {
                if self.target.has_texture(tile) {
                    continue;
                }
                if self.target.upload_texture(tile, &texture).is_err() {
                    break;
                }
                self.stats.uploads += 1;
            }
        }

        self.grid = Some(grid);
        self.render(true);
    }

    /// Remove the grid, returning it
    pub fn take_grid(&mut self) -> Option<Grid> {
        self.dirty.reset(0, 0);
        self.hover_cell = None;
        let grid = self.grid.take();
        self.render(true);
        grid
    }

    /// Toggle grid lines
    pub fn set_show_grid(&mut self, show: bool) {
        if self.config.show_grid != show {
            self.config.show_grid = show;
            self.render(true);
        }
    }

    /// Change the canvas size
    pub fn resize(&mut self, width: u32, height: u32) {
        self.viewport
            .resize_canvas(f64::from(width), f64::from(height));
        if self.target.resize(width, height).is_err() {
            self.needs_full = true;
        }
        self.render(true);
    }

    /// Side length of the hover highlight, in cells
    pub fn set_hover_size(&mut self, size: u32) {
        self.hover_size = size.max(1);
        if self.hover_cell.is_some() && !self.is_panning() {
            self.draw_overlay_or_flag();
        }
    }

    fn grid_lines_visible(&self) -> bool {
        self.config.show_grid && self.viewport.zoom() >= self.config.grid_visible_zoom
    }

    /// Draw the canvas now
    ///
    /// A dirty render is used when few cells changed since the last frame and
    /// `force` is not set; everything else is a full render. The dirty set is
    /// empty afterwards whatever the outcome.
    pub fn render(&mut self, force: bool) -> RenderOutcome {
        if self.busy {
            self.pending = true;
            return RenderOutcome::Busy;
        }
        self.busy = true;

        let incremental = !force
            && !self.needs_full
            && self.grid.is_some()
            && !self.dirty.is_empty()
            && self.dirty.len() < self.config.dirty_limit;

        let result = if incremental {
            self.render_dirty()
        } else {
            self.render_full()
        };

        self.dirty.clear();
        self.pending = false;
        self.pending_edits = 0;

        let outcome = match result {
            Ok(draws) => {
                self.stats.draw_calls += draws;
                if incremental {
                    self.stats.dirty_renders += 1;
                    RenderOutcome::Dirty { draws }
                } else {
                    self.needs_full = false;
                    self.stats.full_renders += 1;
                    RenderOutcome::Full { draws }
                }
            }
            Err(TargetLost) => {
                self.needs_full = true;
                self.stats.skipped_frames += 1;
                debug!("draw target lost, frame skipped");
                RenderOutcome::Skipped
            }
        };

        self.busy = false;
        outcome
    }

    fn render_full(&mut self) -> Result<usize, TargetLost> {
        self.target.clear(self.config.background)?;

        let Some(grid) = &self.grid else {
            return Ok(0);
        };
        let Some(range) =
            self.viewport
                .visible_cells(grid.width(), grid.height(), self.config.cull_margin)
        else {
            self.draw_overlay()?;
            return Ok(0);
        };

        let (canvas_width, canvas_height) = self.viewport.canvas_size();
        let mut draws: Vec<(TileId, ScreenRect)> = range
            .cells()
            .filter_map(|cell| {
                let tile = grid.get(cell)?;
                let rect = self.viewport.cell_rect(cell);
                rect.touches_canvas(canvas_width, canvas_height)
                    .then_some((tile, rect))
            })
            .collect();
        // Group same-texture draws back to back
        draws.sort_by_key(|(tile, _)| *tile);

        for &(tile, rect) in &draws {
            self.ensure_texture(tile)?;
            self.target.draw_texture(tile, rect)?;
        }

        if self.grid_lines_visible() {
            self.draw_grid_lines(range)?;
        }
        self.draw_overlay()?;

        debug!(
            visible = range.cell_count(),
            draws = draws.len(),
            "full render"
        );
        Ok(draws.len())
    }

    fn render_dirty(&mut self) -> Result<usize, TargetLost> {
        let Some(grid) = &self.grid else {
            return Ok(0);
        };
        let (canvas_width, canvas_height) = self.viewport.canvas_size();
        let draws: Vec<(TileId, ScreenRect)> = self
            .dirty
            .cells()
            .iter()
            .filter_map(|&cell| {
                let tile = grid.get(cell)?;
                let rect = self.viewport.cell_rect(cell);
                rect.touches_canvas(canvas_width, canvas_height)
                    .then_some((tile, rect))
            })
            .collect();

        let grid_lines = self.grid_lines_visible();
        for &(tile, rect) in &draws {
            self.target.fill_rect(rect, self.config.background)?;
            self.ensure_texture(tile)?;
            self.target.draw_texture(tile, rect)?;
            if grid_lines {
                self.draw_cell_grid_lines(rect)?;
            }
        }
        Ok(draws.len())
    }

    /// Redraw the two boundary lines that fall on a cell's own pixels
    ///
    /// Lines cover the first pixel column and row after each boundary, so the
    /// right and bottom lines belong to the neighboring cells.
    fn draw_cell_grid_lines(&mut self, rect: ScreenRect) -> DrawResult {
        let color = self.config.grid_color;
        let x = rect.x + GRID_LINE_OFFSET;
        let y = rect.y + GRID_LINE_OFFSET;
        self.target.draw_line((x, rect.y), (x, rect.bottom()), color, 1.0)?;
        self.target.draw_line((rect.x, y), (rect.right(), y), color, 1.0)
    }

    fn ensure_texture(&mut self, tile: TileId) -> DrawResult {
        if self.target.has_texture(tile) {
            return Ok(());
        }
        let texture = self.textures.get_or_load(tile);
        self.target.upload_texture(tile, &texture)?;
        self.stats.uploads += 1;
        Ok(())
    }

    fn draw_grid_lines(&mut self, range: CellRange) -> DrawResult {
        let (left, top) = self
            .viewport
            .grid_to_screen(Cell::new(range.start_x as i32, range.start_y as i32));
        let (right, bottom) = self
            .viewport
            .grid_to_screen(Cell::new(range.end_x as i32 + 1, range.end_y as i32 + 1));
        let color = self.config.grid_color;

        for column in range.start_x..=range.end_x + 1 {
            let (x, _) = self.viewport.grid_to_screen(Cell::new(column as i32, 0));
            let x = x + GRID_LINE_OFFSET;
            self.target.draw_line((x, top), (x, bottom), color, 1.0)?;
        }
        for row in range.start_y..=range.end_y + 1 {
            let (_, y) = self.viewport.grid_to_screen(Cell::new(0, row as i32));
            let y = y + GRID_LINE_OFFSET;
            self.target.draw_line((left, y), (right, y), color, 1.0)?;
        }
        Ok(())
    }

    fn draw_overlay(&mut self) -> DrawResult {
        self.hover_pending = false;
        self.target.clear_overlay()?;
        let (Some(center), Some(grid)) = (self.hover_cell, &self.grid) else {
            return Ok(());
        };
        if !grid.contains(center) {
            return Ok(());
        }

        // Footprint clipped to the grid; `center` is inside, so both corners are too
        let radius = i32::try_from(self.hover_size / 2).unwrap_or(0);
        let last_x = i32::try_from(grid.width()).unwrap_or(i32::MAX) - 1;
        let last_y = i32::try_from(grid.height()).unwrap_or(i32::MAX) - 1;
        let first = Cell::new((center.x - radius).max(0), (center.y - radius).max(0));
        let last = Cell::new(
            (center.x + radius).min(last_x),
            (center.y + radius).min(last_y),
        );
        let top_left = self.viewport.cell_rect(first);
        let bottom_right = self.viewport.cell_rect(last);
        let rect = ScreenRect::new(
            top_left.x,
            top_left.y,
            bottom_right.right() - top_left.x,
            bottom_right.bottom() - top_left.y,
        );
        self.target
            .stroke_overlay_rect(rect, self.config.hover_color, self.config.hover_thickness)
    }

    fn draw_overlay_or_flag(&mut self) {
        if self.draw_overlay().is_err() {
            self.needs_full = true;
        }
    }

    /// Request a redraw, coalescing requests that arrive too quickly
    ///
    /// Renders immediately when the render interval has elapsed or too many
    /// edits are pending; otherwise the request waits for [`Self::tick`].
    pub fn schedule_render_at(&mut self, now: Instant) -> Option<RenderOutcome> {
        if self.busy {
            self.pending = true;
            return None;
        }
        if self.render_gate.ready(now) || self.pending_edits >= self.config.max_pending_edits {
            self.render_gate.mark(now);
            Some(self.render(false))
        } else {
            self.pending = true;
            None
        }
    }

    /// [`Self::schedule_render_at`] with the current time
    pub fn schedule_render(&mut self) -> Option<RenderOutcome> {
        self.schedule_render_at(Instant::now())
    }

    /// Periodic poll running a coalesced render once its interval elapsed
    ///
    /// A deferred hover highlight is redrawn once the hover interval allows.
    pub fn tick(&mut self, now: Instant) -> Option<RenderOutcome> {
        if self.pending && self.render_gate.ready(now) {
            self.render_gate.mark(now);
            return Some(self.render(false));
        }
        if self.hover_pending && !self.is_panning() && self.hover_gate.try_acquire(now) {
            self.draw_overlay_or_flag();
        }
        None
    }

    /// Whether a hover highlight redraw is waiting for [`Self::tick`]
    pub const fn has_pending_hover(&self) -> bool {
        self.hover_pending
    }

    /// Move the hover highlight
    ///
    /// The hovered cell and the hover notification always follow the
    /// pointer; only the overlay redraw is throttled to the hover interval,
    /// and a throttled redraw is left for [`Self::tick`]. Returns whether the
    /// hovered cell changed. Ignored while panning.
    pub fn set_hover_at(&mut self, cell: Option<Cell>, now: Instant) -> bool {
        if self.is_panning() || cell == self.hover_cell {
            return false;
        }

        self.hover_cell = cell;
        if let (Some(cell), Some(grid)) = (cell, &self.grid)
            && grid.contains(cell)
            && let Some(handler) = self.on_hover.as_mut()
        {
            handler(cell);
        }
        if self.hover_gate.try_acquire(now) {
            self.draw_overlay_or_flag();
        } else {
            self.hover_pending = true;
        }
        true
    }

    /// Start dragging the view from a screen point
    pub fn begin_pan(&mut self, screen_x: f64, screen_y: f64) {
        self.panning = Some((screen_x, screen_y));
        if self.target.clear_overlay().is_err() {
            self.needs_full = true;
        }
    }

    /// Follow the pointer while dragging the view
    pub fn update_pan(&mut self, screen_x: f64, screen_y: f64) -> Option<RenderOutcome> {
        let (last_x, last_y) = self.panning?;
        self.viewport.pan_by(screen_x - last_x, screen_y - last_y);
        self.panning = Some((screen_x, screen_y));
        self.needs_full = true;
        self.schedule_render()
    }

    /// Stop dragging the view and redraw everything
    pub fn end_pan(&mut self) -> RenderOutcome {
        self.panning = None;
        self.render(true)
    }

    fn after_view_change(&mut self, changed: bool) -> Option<RenderOutcome> {
        if changed {
            self.needs_full = true;
            Some(self.render(true))
        } else {
            None
        }
    }

    /// Zoom in one step around a screen point (canvas center without one)
    pub fn zoom_in(&mut self, anchor: Option<(f64, f64)>) -> Option<RenderOutcome> {
        let changed = self.viewport.zoom_in(anchor);
        self.after_view_change(changed)
    }

    /// Zoom out one step around a screen point (canvas center without one)
    pub fn zoom_out(&mut self, anchor: Option<(f64, f64)>) -> Option<RenderOutcome> {
        let changed = self.viewport.zoom_out(anchor);
        self.after_view_change(changed)
    }

    /// Set an absolute zoom around a screen point
    pub fn zoom_to(&mut self, zoom: f64, anchor: Option<(f64, f64)>) -> Option<RenderOutcome> {
        let changed = self.viewport.zoom_to(zoom, anchor);
        self.after_view_change(changed)
    }

    /// Fit the grid to the canvas and center it
    pub fn fit_to_window(&mut self) -> Option<RenderOutcome> {
        let (width, height) = self.grid.as_ref().map(|g| (g.width(), g.height()))?;
        self.viewport.fit_to_window(width, height);
        self.after_view_change(true)
    }

    /// Back to zoom 1 with no pan
    pub fn reset_view(&mut self) -> RenderOutcome {
        self.viewport.reset();
        self.needs_full = true;
        self.render(true)
    }
}

impl<T: DrawTarget> PaintSurface for RenderEngine<T> {
    fn tile_at(&self, cell: Cell) -> Option<TileId> {
        self.grid.as_ref().and_then(|grid| grid.get(cell))
    }

    fn paint_cell(&mut self, cell: Cell, tile: TileId) -> bool {
        let Some(grid) = self.grid.as_mut() else {
            return false;
        };
        if !grid.set(cell, tile) {
            return false;
        }
        self.dirty.mark(cell);
        self.pending_edits += 1;
        if let Some(handler) = self.on_tile_changed.as_mut() {
            handler(cell, tile);
        }
        true
    }

    fn selected_tile(&self) -> Option<TileId> {
        self.selected
    }

    fn select_tile(&mut self, tile: TileId) {
        self.selected = Some(tile);
    }

    fn request_render(&mut self) {
        self.schedule_render();
    }

    fn finish_stroke(&mut self) {
        self.render(true);
    }
}
