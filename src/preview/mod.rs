//! # Preview Rasterizer
//!
//! Paints a scene [`Frame`] into an RGBA image so a layout can be inspected
//! without a browser: the CLI writes it to disk and the server returns it as
//! `image/png`.
//!
//! Text uses Spleen bitmap glyphs scaled nearest-neighbor to the font size;
//! font family is not honored. The result is a faithful picture of positions
//! and sizes, not of typography.

mod font;

use image::imageops::{self, FilterType};
use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
use std::io::Cursor;

use crate::error::StencilError;
use crate::geometry::{Rect, Size};
use crate::scene::{Color, DrawCommand, Frame, TEXT_ADVANCE_RATIO, TEXT_LINE_HEIGHT};

/// Largest canvas side, in pixels, that will be rasterized.
pub const MAX_PREVIEW_SIDE: u32 = 4096;

/// Paint `frame`. `background` is stretched over the canvas when the frame
/// asks for it; without one the canvas stays white.
pub fn rasterize(frame: &Frame, background: Option<&DynamicImage>) -> RgbaImage {
    let width = frame.canvas.width.round().max(1.0) as u32;
    let height = frame.canvas.height.round().max(1.0) as u32;
    let mut img = RgbaImage::from_pixel(width, height, Rgba([255, 255, 255, 255]));

    for command in &frame.commands {
        match command {
            DrawCommand::Background { .. } => {
                if let Some(bg) = background {
                    let scaled =
                        imageops::resize(&bg.to_rgba8(), width, height, FilterType::Triangle);
                    imageops::overlay(&mut img, &scaled, 0, 0);
                }
            }
            DrawCommand::Rect {
                bounds,
                fill,
                stroke,
                stroke_width,
            } => {
                fill_rect(&mut img, *bounds, *fill);
                stroke_rect(&mut img, *bounds, *stroke, *stroke_width);
            }
            DrawCommand::Text {
                bounds,
                content,
                font_size,
                bold,
                fill,
                highlight,
                ..
            } => {
                fill_rect(&mut img, *bounds, *highlight);
                draw_text(&mut img, *bounds, content, *font_size, *bold, *fill);
            }
            DrawCommand::SelectionOutline { bounds, color } => {
                stroke_rect(&mut img, *bounds, *color, 1.0);
            }
            DrawCommand::Handle { bounds, color } => {
                fill_rect(&mut img, *bounds, *color);
            }
        }
    }

    img
}

/// Rasterize and encode as PNG.
pub fn render_png(
    frame: &Frame,
    background: Option<&DynamicImage>,
) -> Result<Vec<u8>, StencilError> {
    let Size { width, height } = frame.canvas;
    let limit = MAX_PREVIEW_SIDE as f64;
    if !(width <= limit && height <= limit) {
        return Err(StencilError::Image(format!(
            "canvas {}x{} exceeds the {}px preview limit",
            width, height, MAX_PREVIEW_SIDE
        )));
    }
    let img = rasterize(frame, background);
    let mut png_bytes = Vec::new();
    img.write_to(&mut Cursor::new(&mut png_bytes), ImageFormat::Png)
        .map_err(|e| StencilError::Image(format!("PNG encoding failed: {}", e)))?;
    Ok(png_bytes)
}

/// Source-over blend of `color` onto an opaque pixel.
#[inline]
fn blend(px: &mut Rgba<u8>, color: Color) {
    let a = color.a as f32 / 255.0;
    let mix = |dst: u8, src: u8| (src as f32 * a + dst as f32 * (1.0 - a)).round() as u8;
    px.0 = [
        mix(px.0[0], color.r),
        mix(px.0[1], color.g),
        mix(px.0[2], color.b),
        255,
    ];
}

/// Pixel span `[start, end)` covered by `[lo, hi)`, clipped to `0..limit`.
fn span(lo: f64, hi: f64, limit: u32) -> (u32, u32) {
    let start = lo.round().clamp(0.0, limit as f64) as u32;
    let end = hi.round().clamp(0.0, limit as f64) as u32;
    (start, end.max(start))
}

fn fill_rect(img: &mut RgbaImage, r: Rect, color: Color) {
    if color.a == 0 {
        return;
    }
    let (x0, x1) = span(r.x, r.right(), img.width());
    let (y0, y1) = span(r.y, r.bottom(), img.height());
    for y in y0..y1 {
        for x in x0..x1 {
            blend(img.get_pixel_mut(x, y), color);
        }
    }
}

fn stroke_rect(img: &mut RgbaImage, r: Rect, color: Color, width: f64) {
    let w = width.max(1.0);
    fill_rect(img, Rect::new(r.x, r.y, r.width, w), color);
    fill_rect(img, Rect::new(r.x, r.bottom() - w, r.width, w), color);
    fill_rect(img, Rect::new(r.x, r.y + w, w, r.height - 2.0 * w), color);
    fill_rect(img, Rect::new(r.right() - w, r.y + w, w, r.height - 2.0 * w), color);
}

fn draw_text(
    img: &mut RgbaImage,
    bounds: Rect,
    content: &str,
    font_size: f64,
    bold: bool,
    color: Color,
) {
    let advance = font_size * TEXT_ADVANCE_RATIO;
    let top = bounds.y + font_size * (TEXT_LINE_HEIGHT - 1.0) / 2.0;
    let cell_w = advance.round().max(1.0) as i64;
    let cell_h = font_size.round().max(1.0) as i64;

    let glyphs = font::glyphs(content);
    for (i, (ch, glyph)) in content.chars().zip(glyphs).enumerate() {
        if ch.is_whitespace() {
            continue;
        }
        let bitmap = glyph.unwrap_or_else(font::missing_glyph);
        let left = (bounds.x + i as f64 * advance).round() as i64;
        let top = top.round() as i64;

        for ty in 0..cell_h {
            let sy = (ty * font::GLYPH_HEIGHT as i64 / cell_h) as usize;
            for tx in 0..cell_w {
                let sx = (tx * font::GLYPH_WIDTH as i64 / cell_w) as usize;
                if !bitmap[sy * font::GLYPH_WIDTH + sx] {
                    continue;
                }
                put(img, left + tx, top + ty, color);
                if bold {
                    put(img, left + tx + 1, top + ty, color);
                }
            }
        }
    }
}

#[inline]
fn put(img: &mut RgbaImage, x: i64, y: i64, color: Color) {
    if x < 0 || y < 0 || x >= img.width() as i64 || y >= img.height() as i64 {
        return;
    }
    blend(img.get_pixel_mut(x as u32, y as u32), color);
}
