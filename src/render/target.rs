//! Draw target abstraction and a software raster implementation

use std::collections::HashMap;
use std::fmt;

use image::{Rgba as Pixel, RgbaImage};

use crate::catalog::TileId;
use crate::io::configuration::Rgba;
use crate::spatial::viewport::ScreenRect;

/// The draw target went away mid-frame
///
/// Never escapes the render engine; a frame that hits it is skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TargetLost;

impl fmt::Display for TargetLost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "draw target is no longer attached")
    }
}

impl std::error::Error for TargetLost {}

/// Result of a single draw call
pub type DrawResult = std::result::Result<(), TargetLost>;

/// Surface the render engine issues draw calls against
///
/// Textures are registered once per tile and drawn by id. The overlay layer
/// is independent of the base layer so hover updates never touch tiles.
pub trait DrawTarget {
    /// Whether draw calls can still succeed
    fn is_attached(&self) -> bool;

    /// Fill the whole base layer
    fn clear(&mut self, color: Rgba) -> DrawResult;

    /// Fill a rectangle of the base layer
    fn fill_rect(&mut self, rect: ScreenRect, color: Rgba) -> DrawResult;

    /// Whether a texture is registered for a tile
    fn has_texture(&self, tile: TileId) -> bool;

    /// Register or replace the texture of a tile
    fn upload_texture(&mut self, tile: TileId, texture: &RgbaImage) -> DrawResult;

    /// Draw a registered texture scaled into a rectangle
    fn draw_texture(&mut self, tile: TileId, rect: ScreenRect) -> DrawResult;

    /// Draw a line on the base layer
    fn draw_line(&mut self, from: (f64, f64), to: (f64, f64), color: Rgba, thickness: f64)
    -> DrawResult;

    /// Outline a rectangle on the base layer
    fn stroke_rect(&mut self, rect: ScreenRect, color: Rgba, thickness: f64) -> DrawResult {
        let (left, top, right, bottom) = (rect.x, rect.y, rect.right(), rect.bottom());
        self.draw_line((left, top), (right, top), color, thickness)?;
        self.draw_line((left, bottom), (right, bottom), color, thickness)?;
        self.draw_line((left, top), (left, bottom), color, thickness)?;
        self.draw_line((right, top), (right, bottom), color, thickness)
    }

    /// Drop everything on the overlay layer
    fn clear_overlay(&mut self) -> DrawResult;

    /// Outline a rectangle on the overlay layer
    fn stroke_overlay_rect(&mut self, rect: ScreenRect, color: Rgba, thickness: f64)
    -> DrawResult;

    /// Follow a canvas size change
    fn resize(&mut self, _width: u32, _height: u32) -> DrawResult {
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct OverlayRect {
    rect: ScreenRect,
    color: Rgba,
    thickness: f64,
}

/// Software draw target backed by an RGBA bitmap
///
/// The base layer is always opaque. Overlay rectangles are kept as a list and
/// only composited by [`RasterCanvas::snapshot`].
#[derive(Debug, Clone)]
pub struct RasterCanvas {
    base: RgbaImage,
    textures: HashMap<TileId, RgbaImage>,
    overlay: Vec<OverlayRect>,
    attached: bool,
}

impl RasterCanvas {
    /// Create an attached canvas filled with black
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            base: RgbaImage::from_pixel(width, height, Pixel([0, 0, 0, 255])),
            textures: HashMap::new(),
            overlay: Vec::new(),
            attached: true,
        }
    }

    /// Simulate the canvas being torn down
    pub fn detach(&mut self) {
        self.attached = false;
    }

    /// Reattach after [`Self::detach`]
    pub fn attach(&mut self) {
        self.attached = true;
    }

    /// Base layer without the overlay
    pub const fn base(&self) -> &RgbaImage {
        &self.base
    }

    /// Number of registered textures
    pub fn texture_count(&self) -> usize {
        self.textures.len()
    }

    /// Number of overlay rectangles currently shown
    pub fn overlay_len(&self) -> usize {
        self.overlay.len()
    }

    /// Base layer with the overlay composited on top
    pub fn snapshot(&self) -> RgbaImage {
        let mut image = self.base.clone();
        for overlay in &self.overlay {
            stroke_rect_into(&mut image, overlay.rect, overlay.color, overlay.thickness);
        }
        image
    }

    const fn check(&self) -> DrawResult {
        if self.attached { Ok(()) } else { Err(TargetLost) }
    }
}

impl DrawTarget for RasterCanvas {
    fn is_attached(&self) -> bool {
        self.attached
    }

    fn clear(&mut self, color: Rgba) -> DrawResult {
        self.check()?;
        let opaque = Pixel([color[0], color[1], color[2], 255]);
        for pixel in self.base.pixels_mut() {
            *pixel = opaque;
        }
        Ok(())
    }

    fn fill_rect(&mut self, rect: ScreenRect, color: Rgba) -> DrawResult {
        self.check()?;
        fill_rect_into(&mut self.base, rect, color);
        Ok(())
    }

    fn has_texture(&self, tile: TileId) -> bool {
        self.textures.contains_key(&tile)
    }

    fn upload_texture(&mut self, tile: TileId, texture: &RgbaImage) -> DrawResult {
        self.check()?;
        self.textures.insert(tile, texture.clone());
        Ok(())
    }

    fn draw_texture(&mut self, tile: TileId, rect: ScreenRect) -> DrawResult {
        self.check()?;
        let Some(texture) = self.textures.get(&tile) else {
            return Ok(());
        };
        let (tex_width, tex_height) = texture.dimensions();
        if tex_width == 0 || tex_height == 0 || rect.width <= 0.0 || rect.height <= 0.0 {
            return Ok(());
        }

        let (x_range, y_range) = pixel_span(&self.base, rect);
        for py in y_range {
            let v = texel(f64::from(py), rect.y, rect.height, tex_height);
            for px in x_range.clone() {
                let u = texel(f64::from(px), rect.x, rect.width, tex_width);
                let source = texture.get_pixel(u, v).0;
                blend_pixel(self.base.get_pixel_mut(px, py), source);
            }
        }
        Ok(())
    }

    fn draw_line(
        &mut self,
        from: (f64, f64),
        to: (f64, f64),
        color: Rgba,
        thickness: f64,
    ) -> DrawResult {
        self.check()?;
        draw_line_into(&mut self.base, from, to, color, thickness);
        Ok(())
    }

    fn clear_overlay(&mut self) -> DrawResult {
        self.check()?;
        self.overlay.clear();
        Ok(())
    }

    fn stroke_overlay_rect(&mut self, rect: ScreenRect, color: Rgba, thickness: f64) -> DrawResult {
        self.check()?;
        self.overlay.push(OverlayRect {
            rect,
            color,
            thickness,
        });
        Ok(())
    }

    fn resize(&mut self, width: u32, height: u32) -> DrawResult {
        self.check()?;
        self.base = RgbaImage::from_pixel(width, height, Pixel([0, 0, 0, 255]));
        self.overlay.clear();
        Ok(())
    }
}

#[inline]
fn blend_channel(src: u8, dst: u8, alpha: u16) -> u8 {
    let result = u16::from(src) * alpha + u16::from(dst) * (255 - alpha);
    ((result + 1 + (result >> 8)) >> 8) as u8
}

/// Source-over blend onto an opaque destination pixel
pub fn blend_pixel(dst: &mut Pixel<u8>, src: Rgba) {
    match src[3] {
        0 => {}
        255 => *dst = Pixel([src[0], src[1], src[2], 255]),
        alpha => {
            let alpha = u16::from(alpha);
            dst.0 = [
                blend_channel(src[0], dst[0], alpha),
                blend_channel(src[1], dst[1], alpha),
                blend_channel(src[2], dst[2], alpha),
                255,
            ];
        }
    }
}

// Pixel centers inside the rectangle, clipped to the image
fn pixel_span(
    image: &RgbaImage,
    rect: ScreenRect,
) -> (std::ops::Range<u32>, std::ops::Range<u32>) {
    let clip = |start: f64, end: f64, limit: u32| {
        let lo = start.floor().clamp(0.0, f64::from(limit)) as u32;
        let hi = end.floor().clamp(0.0, f64::from(limit)) as u32;
        lo..hi
    };
    (
        clip(rect.x, rect.right(), image.width()),
        clip(rect.y, rect.bottom(), image.height()),
    )
}

fn texel(pixel: f64, origin: f64, extent: f64, size: u32) -> u32 {
    let t = ((pixel + 0.5 - origin) / extent * f64::from(size)).floor();
    t.clamp(0.0, f64::from(size - 1)) as u32
}

/// Blend a solid rectangle into an image
pub fn fill_rect_into(image: &mut RgbaImage, rect: ScreenRect, color: Rgba) {
    let (x_range, y_range) = pixel_span(image, rect);
    for py in y_range {
        for px in x_range.clone() {
            blend_pixel(image.get_pixel_mut(px, py), color);
        }
    }
}

/// Draw a line of the given thickness into an image
///
/// Axis-aligned lines become thin rectangles; anything else is stamped along
/// its length.
pub fn draw_line_into(
    image: &mut RgbaImage,
    from: (f64, f64),
    to: (f64, f64),
    color: Rgba,
    thickness: f64,
) {
    let width = thickness.max(1.0);
    let half = width / 2.0;
    let (dx, dy) = (to.0 - from.0, to.1 - from.1);

    if dy.abs() < f64::EPSILON || dx.abs() < f64::EPSILON {
        let left = from.0.min(to.0);
        let top = from.1.min(to.1);
        let rect = if dy.abs() < f64::EPSILON {
            ScreenRect::new(left, top - half, dx.abs().max(1.0), width)
        } else {
            ScreenRect::new(left - half, top, width, dy.abs().max(1.0))
        };
        fill_rect_into(image, rect, color);
        return;
    }

    let steps = dx.abs().max(dy.abs()).ceil() as u32;
    let mut stamped = std::collections::HashSet::new();
    for step in 0..=steps {
        let t = f64::from(step) / f64::from(steps);
        let x = dx.mul_add(t, from.0) - half;
        let y = dy.mul_add(t, from.1) - half;
        let (x_range, y_range) = pixel_span(image, ScreenRect::new(x, y, width, width));
        for py in y_range {
            for px in x_range.clone() {
                if stamped.insert((px, py)) {
                    blend_pixel(image.get_pixel_mut(px, py), color);
                }
            }
        }
    }
}

/// Outline a rectangle with lines drawn inside its bounds
pub fn stroke_rect_into(image: &mut RgbaImage, rect: ScreenRect, color: Rgba, thickness: f64) {
    let t = thickness.max(1.0).min(rect.width / 2.0).min(rect.height / 2.0);
    let edges = [
        ScreenRect::new(rect.x, rect.y, rect.width, t),
        ScreenRect::new(rect.x, rect.bottom() - t, rect.width, t),
        ScreenRect::new(rect.x, rect.y + t, t, rect.height - 2.0 * t),
        ScreenRect::new(rect.right() - t, rect.y + t, t, rect.height - 2.0 * t),
    ];
    for edge in edges {
        fill_rect_into(image, edge, color);
    }
}
