//! Bitmap glyphs for preview labels (Spleen 12x24).

use spleen_font::{FONT_12X24, PSF2Font};

pub const GLYPH_WIDTH: usize = 12;
pub const GLYPH_HEIGHT: usize = 24;

/// Row-major 12x24 coverage bitmaps for every char of `text`, in order.
///
/// The font is parsed once per call. Chars Spleen lacks map to `None`.
pub fn glyphs(text: &str) -> Vec<Option<Vec<bool>>> {
    let Ok(mut spleen) = PSF2Font::new(FONT_12X24) else {
        return text.chars().map(|_| None).collect();
    };

    text.chars()
        .map(|ch| {
            let utf8 = ch.to_string();
            let rows = spleen.glyph_for_utf8(utf8.as_bytes())?;
            let mut bitmap = vec![false; GLYPH_WIDTH * GLYPH_HEIGHT];
            for (row_y, row) in rows.enumerate() {
                for (col_x, on) in row.enumerate() {
                    if row_y < GLYPH_HEIGHT && col_x < GLYPH_WIDTH {
                        bitmap[row_y * GLYPH_WIDTH + col_x] = on;
                    }
                }
            }
            Some(bitmap)
        })
        .collect()
}

/// Box outline used for characters without a glyph.
pub fn missing_glyph() -> Vec<bool> {
    let mut bitmap = vec![false; GLYPH_WIDTH * GLYPH_HEIGHT];
    for y in 2..GLYPH_HEIGHT - 2 {
        for x in 1..GLYPH_WIDTH - 1 {
            let edge = y == 2 || y == GLYPH_HEIGHT - 3 || x == 1 || x == GLYPH_WIDTH - 2;
            bitmap[y * GLYPH_WIDTH + x] = edge;
        }
    }
    bitmap
}
