//! Text drawing: an outline font through `ab_glyph` when one can be loaded,
//! otherwise a built-in 5x7 bitmap face so generation never depends on the
//! fonts installed on the build machine.

use ab_glyph::{point, Font, FontVec, OutlinedGlyph, PxScale, ScaleFont};
use glam::Vec2;
use image::Rgba;
use std::{fs, path::Path};
use tracing::{debug, warn};

use crate::raster::Canvas;

/// Ink box of a laid-out string, relative to the pen origin.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextBounds {
    pub min: Vec2,
    pub max: Vec2,
}

impl TextBounds {
    pub fn width(&self) -> f32 {
        (self.max.x - self.min.x).max(0.0)
    }
    pub fn height(&self) -> f32 {
        (self.max.y - self.min.y).max(0.0)
    }
}

pub enum Typeface {
    Outline(FontVec),
    Builtin,
}

pub struct LoadedFont {
    face: Typeface,
    px: f32,
}

impl LoadedFont {
    /// Try `path` at `px`; on any failure fall back to the bitmap face at `fallback_px`.
    pub fn load_or_builtin(path: Option<&Path>, px: f32, fallback_px: f32) -> Self {
        let Some(path) = path else {
            debug!("no font file resolved, using builtin face at {fallback_px}px");
            return Self::builtin(fallback_px);
        };
        match fs::read(path).map_err(|e| e.to_string()).and_then(|bytes| {
            FontVec::try_from_vec(bytes).map_err(|e| e.to_string())
        }) {
            Ok(font) => Self { face: Typeface::Outline(font), px },
            Err(e) => {
                warn!("font {} unusable ({e}); using builtin face", path.display());
                Self::builtin(fallback_px)
            }
        }
    }

    pub fn builtin(px: f32) -> Self {
        Self { face: Typeface::Builtin, px }
    }

    pub fn is_builtin(&self) -> bool {
        matches!(self.face, Typeface::Builtin)
    }

    pub fn px(&self) -> f32 {
        self.px
    }

    pub fn measure(&self, text: &str) -> TextBounds {
        match &self.face {
            Typeface::Outline(font) => outline_bounds(&layout(font, self.px, text)),
            Typeface::Builtin => {
                let cell = bitmap_cell(self.px);
                let n = text.chars().count() as f32;
                let w = if n > 0.0 { (n * 6.0 - 1.0) * cell } else { 0.0 };
                TextBounds { min: Vec2::ZERO, max: Vec2::new(w, 7.0 * cell) }
            }
        }
    }

    /// Draw `text` with the top-left of its ink box at `top_left`. `shade` maps
    /// the normalized row inside the ink box (0 = top, 1 = bottom) to a colour.
    pub fn draw(&self, canvas: &mut Canvas, top_left: Vec2, text: &str, shade: impl Fn(f32) -> Rgba<u8>) {
        let bounds = self.measure(text);
        let height = bounds.height().max(1.0);
        let offset = top_left - bounds.min;
        match &self.face {
            Typeface::Outline(font) => {
                for glyph in layout(font, self.px, text) {
                    let gb = glyph.px_bounds();
                    glyph.draw(|gx, gy, cov| {
                        let x = gb.min.x + gx as f32 + offset.x;
                        let y = gb.min.y + gy as f32 + offset.y;
                        if x < 0.0 || y < 0.0 {
                            return;
                        }
                        let t = (gb.min.y + gy as f32 - bounds.min.y) / height;
                        canvas.blend_pixel(x as u32, y as u32, shade(t), cov);
                    });
                }
            }
            Typeface::Builtin => {
                let cell = bitmap_cell(self.px);
                let step = cell.max(1.0) as u32;
                for (i, ch) in text.chars().enumerate() {
                    let rows = bitmap_glyph(ch);
                    let gx = offset.x + i as f32 * 6.0 * cell;
                    for (row, bits) in rows.iter().enumerate() {
                        let t = (row as f32 + 0.5) / 7.0;
                        let color = shade(t);
                        for col in 0..5 {
                            if bits & (0b10000 >> col) == 0 {
                                continue;
                            }
                            let x0 = gx + col as f32 * cell;
                            let y0 = offset.y + row as f32 * cell;
                            if x0 < 0.0 || y0 < 0.0 {
                                continue;
                            }
                            for dy in 0..step {
                                for dx in 0..step {
                                    canvas.blend_pixel(x0 as u32 + dx, y0 as u32 + dy, color, 1.0);
                                }
                            }
                        }
                    }
                }
            }
        }
    }

    /// Split `text` into at most two lines so that each fits `max_width`.
    /// The break goes at the space closest to the middle.
    pub fn wrap_two_lines(&self, text: &str, max_width: f32) -> Vec<String> {
        if self.measure(text).width() <= max_width {
            return vec![text.to_string()];
        }
        let mid = text.len() / 2;
        let split = text
            .match_indices(' ')
            .map(|(i, _)| i)
            .min_by_key(|i| i.abs_diff(mid));
        match split {
            Some(i) => vec![text[..i].trim_end().to_string(), text[i + 1..].trim_start().to_string()],
            None => vec![text.to_string()],
        }
    }
}

fn layout(font: &FontVec, px: f32, text: &str) -> Vec<OutlinedGlyph> {
    let scaled = font.as_scaled(PxScale::from(px));
    let mut caret = 0.0f32;
    let mut prev = None;
    let mut out = Vec::new();
    for ch in text.chars() {
        let id = font.glyph_id(ch);
        if let Some(p) = prev {
            caret += scaled.kern(p, id);
        }
        let glyph = id.with_scale_and_position(PxScale::from(px), point(caret, scaled.ascent()));
        caret += scaled.h_advance(id);
        prev = Some(id);
        if let Some(outlined) = font.outline_glyph(glyph) {
            out.push(outlined);
        }
    }
    out
}

fn outline_bounds(glyphs: &[OutlinedGlyph]) -> TextBounds {
    let mut min = Vec2::splat(f32::MAX);
    let mut max = Vec2::splat(f32::MIN);
    for g in glyphs {
        let b = g.px_bounds();
        min = min.min(Vec2::new(b.min.x, b.min.y));
        max = max.max(Vec2::new(b.max.x, b.max.y));
    }
    if glyphs.is_empty() {
        TextBounds { min: Vec2::ZERO, max: Vec2::ZERO }
    } else {
        TextBounds { min, max }
    }
}

/// Pixel size of one bitmap cell for a nominal font size (7 rows + 1 leading).
fn bitmap_cell(px: f32) -> f32 {
    (px / 8.0).round().max(1.0)
}

fn bitmap_glyph(ch: char) -> [u8; 7] {
    let ch = ch.to_ascii_uppercase();
    BITMAP_GLYPHS
        .iter()
        .find(|(c, _)| *c == ch)
        .map(|(_, rows)| *rows)
        .unwrap_or([0; 7])
}

// 5x7 glyphs, one byte per row, MSB of the low five bits is the leftmost column.
// Lowercase renders through the uppercase shapes.
const BITMAP_GLYPHS: &[(char, [u8; 7])] = &[
    ('A', [0b01110, 0b10001, 0b10001, 0b11111, 0b10001, 0b10001, 0b10001]),
    ('B', [0b11110, 0b10001, 0b10001, 0b11110, 0b10001, 0b10001, 0b11110]),
    ('C', [0b01110, 0b10001, 0b10000, 0b10000, 0b10000, 0b10001, 0b01110]),
    ('D', [0b11110, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b11110]),
    ('E', [0b11111, 0b10000, 0b10000, 0b11110, 0b10000, 0b10000, 0b11111]),
    ('F', [0b11111, 0b10000, 0b10000, 0b11110, 0b10000, 0b10000, 0b10000]),
    ('G', [0b01110, 0b10001, 0b10000, 0b10111, 0b10001, 0b10001, 0b01111]),
    ('H', [0b10001, 0b10001, 0b10001, 0b11111, 0b10001, 0b10001, 0b10001]),
    ('I', [0b01110, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110]),
    ('J', [0b00111, 0b00010, 0b00010, 0b00010, 0b00010, 0b10010, 0b01100]),
    ('K', [0b10001, 0b10010, 0b10100, 0b11000, 0b10100, 0b10010, 0b10001]),
    ('L', [0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b11111]),
    ('M', [0b10001, 0b11011, 0b10101, 0b10101, 0b10001, 0b10001, 0b10001]),
    ('N', [0b10001, 0b10001, 0b11001, 0b10101, 0b10011, 0b10001, 0b10001]),
    ('O', [0b01110, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01110]),
    ('P', [0b11110, 0b10001, 0b10001, 0b11110, 0b10000, 0b10000, 0b10000]),
    ('Q', [0b01110, 0b10001, 0b10001, 0b10001, 0b10101, 0b10010, 0b01101]),
    ('R', [0b11110, 0b10001, 0b10001, 0b11110, 0b10100, 0b10010, 0b10001]),
    ('S', [0b01111, 0b10000, 0b10000, 0b01110, 0b00001, 0b00001, 0b11110]),
    ('T', [0b11111, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100]),
    ('U', [0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01110]),
    ('V', [0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01010, 0b00100]),
    ('W', [0b10001, 0b10001, 0b10001, 0b10101, 0b10101, 0b10101, 0b01010]),
    ('X', [0b10001, 0b10001, 0b01010, 0b00100, 0b01010, 0b10001, 0b10001]),
    ('Y', [0b10001, 0b10001, 0b01010, 0b00100, 0b00100, 0b00100, 0b00100]),
    ('Z', [0b11111, 0b00001, 0b00010, 0b00100, 0b01000, 0b10000, 0b11111]),
    ('0', [0b01110, 0b10001, 0b10011, 0b10101, 0b11001, 0b10001, 0b01110]),
    ('1', [0b00100, 0b01100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110]),
    ('2', [0b01110, 0b10001, 0b00001, 0b00010, 0b00100, 0b01000, 0b11111]),
    ('3', [0b11111, 0b00010, 0b00100, 0b00010, 0b00001, 0b10001, 0b01110]),
    ('4', [0b00010, 0b00110, 0b01010, 0b10010, 0b11111, 0b00010, 0b00010]),
    ('5', [0b11111, 0b10000, 0b11110, 0b00001, 0b00001, 0b10001, 0b01110]),
    ('6', [0b00110, 0b01000, 0b10000, 0b11110, 0b10001, 0b10001, 0b01110]),
    ('7', [0b11111, 0b00001, 0b00010, 0b00100, 0b01000, 0b01000, 0b01000]),
    ('8', [0b01110, 0b10001, 0b10001, 0b01110, 0b10001, 0b10001, 0b01110]),
    ('9', [0b01110, 0b10001, 0b10001, 0b01111, 0b00001, 0b00010, 0b01100]),
    ('.', [0b00000, 0b00000, 0b00000, 0b00000, 0b00000, 0b01100, 0b01100]),
    ('-', [0b00000, 0b00000, 0b00000, 0b11111, 0b00000, 0b00000, 0b00000]),
    ('!', [0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b00000, 0b00100]),
    ('?', [0b01110, 0b10001, 0b00001, 0b00010, 0b00100, 0b00000, 0b00100]),
];
