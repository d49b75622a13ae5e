use anyhow::{bail, Context, Result};
use glam::Vec2;
use image::{DynamicImage, RgbImage};
use std::path::{Path, PathBuf};

use crate::config::{DefaultImageConfig, FontConfig};
use crate::raster::{rgba, Canvas, Rect};
use crate::text::LoadedFont;

const BACKGROUND: [u8; 3] = [255, 255, 255];
const BORDER: [u8; 3] = [200, 200, 200];
const LABEL: [u8; 3] = [100, 100, 100];

/// Label font: regular face at the configured size, builtin at two thirds of it.
pub fn label_font(fonts: &FontConfig, px: f32) -> LoadedFont {
    let path = fonts.resolve(&fonts.regular);
    LoadedFont::load_or_builtin(path.as_deref(), px, (px * 2.0 / 3.0).round().max(8.0))
}

pub fn render_default_image(cfg: &DefaultImageConfig, font: &LoadedFont) -> RgbImage {
    let (w, h) = (cfg.width.max(1), cfg.height.max(1));
    let [r, g, b] = BACKGROUND;
    let mut c = Canvas::filled(w, h, rgba(r, g, b, 255));

    let bw = cfg.border_px as f32;
    if bw > 0.0 {
        let [r, g, b] = BORDER;
        c.stroke_rounded_rect(Rect::new(bw, bw, w as f32 - bw, h as f32 - bw), 0.0, bw, rgba(r, g, b, 255));
    }

    let margin = (bw * 2.0 + 8.0).min(w as f32 / 4.0);
    let lines = font.wrap_two_lines(&cfg.label, w as f32 - 2.0 * margin);
    let line_gap = (font.px() * 0.25).round();
    let boxes: Vec<_> = lines.iter().map(|l| font.measure(l)).collect();
    let block_h: f32 = boxes.iter().map(|b| b.height()).sum::<f32>() + line_gap * (lines.len() as f32 - 1.0);

    let [r, g, b] = LABEL;
    let mut y = ((h as f32 - block_h) * 0.5).floor();
    for (line, ink) in lines.iter().zip(&boxes) {
        let x = ((w as f32 - ink.width()) * 0.5).floor();
        font.draw(&mut c, Vec2::new(x, y), line, |_| rgba(r, g, b, 255));
        y += ink.height() + line_gap;
    }
    DynamicImage::ImageRgba8(c.into_image()).to_rgb8()
}

/// Render the placeholder into `<dir>/<name>.png`.
pub fn create_default_image(dir: &Path, name: &str, cfg: &DefaultImageConfig, fonts: &FontConfig) -> Result<PathBuf> {
    if !dir.is_dir() {
        bail!("{} is not a valid directory", dir.display());
    }
    let font = label_font(fonts, cfg.font_px);
    let img = render_default_image(cfg, &font);
    let path = dir.join(format!("{name}.png"));
    img.save(&path).with_context(|| format!("write {}", path.display()))?;
    Ok(path)
}
