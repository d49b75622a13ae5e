//! Procedural app icon artwork and icon-set generation.
//!
//! Three styles share the same skeleton (gradient background, card motif,
//! centred glyph) and differ in palette and ornament:
//!   - `Plain`: letter "W" on a single shadowed card, unmasked square
//!   - `Cool`: stacked cards with a line-art brain, rounded mask and drop shadow
//!   - `Modern`: stacked cards with a geometric "V", accent dot and corner shine

use anyhow::{Context, Result};
use glam::Vec2;
use image::RgbaImage;
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::info;

use crate::catalog::{Contents, IconSlot, PatchSummary, CONTENTS_FILE};
use crate::config::{FontConfig, IconConfig};
use crate::raster::{opaque, rgba, rotated_extent, Canvas, Gradient, Rect};
use crate::text::LoadedFont;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IconStyle {
    Plain,
    Cool,
    Modern,
}

impl IconStyle {
    pub fn name(self) -> &'static str {
        match self {
            IconStyle::Plain => "plain",
            IconStyle::Cool => "cool",
            IconStyle::Modern => "modern",
        }
    }

    pub fn default_dir(self, cfg: &IconConfig) -> &Path {
        match self {
            IconStyle::Cool => &cfg.project_icon_dir,
            IconStyle::Plain | IconStyle::Modern => &cfg.app_icon_dir,
        }
    }

    /// Cool rewrites the descriptor from scratch; the others patch what is there.
    pub fn rewrites_descriptor(self) -> bool {
        matches!(self, IconStyle::Cool)
    }

    fn uses_text(self) -> bool {
        matches!(self, IconStyle::Plain)
    }
}

/// Lettering font for one icon edge: bold face at s/3, builtin at s/4.
pub fn icon_font(fonts: &FontConfig, size: u32) -> LoadedFont {
    let path = fonts.resolve(&fonts.bold);
    LoadedFont::load_or_builtin(path.as_deref(), (size / 3).max(1) as f32, (size / 4).max(1) as f32)
}

pub fn render_icon(style: IconStyle, size: u32, font: Option<&LoadedFont>) -> RgbaImage {
    let size = size.max(1);
    match style {
        IconStyle::Plain => {
            let fallback;
            let font = match font {
                Some(f) => f,
                None => {
                    fallback = LoadedFont::builtin((size / 4).max(1) as f32);
                    &fallback
                }
            };
            render_plain(size, font)
        }
        IconStyle::Cool => render_cool(size),
        IconStyle::Modern => render_modern(size),
    }
}

fn render_plain(s: u32, font: &LoadedFont) -> RgbaImage {
    let sf = s as f32;
    let mut c = Canvas::new(s, s);
    c.vertical_gradient(&Gradient::new(&[[50, 100, 200], [150, 150, 150]]));
    for y in (0..s).step_by(20) {
        let opacity = (40.0 + (y as f32 / sf) * 60.0) as u8;
        c.hline(y, 2, rgba(255, 255, 255, opacity));
    }

    let margin = s / 10;
    let card_w = s - 2 * margin;
    let card_h = (card_w as f32 * 0.7) as u32;
    let card = Rect::new(margin as f32, margin as f32, (margin + card_w) as f32, (margin + card_h) as f32);

    // soft shadow: translucent block, blurred with room to spread
    let sigma = (s / 30) as f32;
    let pad = (sigma * 2.0).ceil() as u32;
    let mut shadow = Canvas::new(card_w + 2 * pad, card_h + 2 * pad);
    shadow.fill_rect(Rect::new(pad as f32, pad as f32, (pad + card_w) as f32, (pad + card_h) as f32), rgba(0, 0, 0, 100));
    let shadow = shadow.blurred(sigma);
    c.overlay(&shadow, (margin + s / 60) as i64 - pad as i64, (margin + s / 30) as i64 - pad as i64);

    c.fill_rounded_rect(card, (s / 20) as f32, rgba(255, 255, 255, 230));

    let letter = "W";
    let ink = font.measure(letter);
    let at = card.min + (card.max - card.min - Vec2::new(ink.width(), ink.height())) * 0.5;
    let shade = Gradient::new(&[[50, 50, 150], [200, 150, 200]]);
    font.draw(&mut c, at.floor(), letter, |t| opaque(shade.sample(t)));

    // three small flash cards fanned along the bottom edge
    let small = (s / 6) as f32;
    for angle in [-30.0f32, 0.0, 30.0] {
        let extent = rotated_extent(small, angle);
        let center = Vec2::new(sf * 0.5, sf - extent * 0.5 - (margin / 2) as f32);
        c.fill_rotated_square(center, small, angle, rgba(255, 255, 255, 180));
    }

    c.stroke_rounded_rect(
        Rect::new(0.0, 0.0, sf, sf),
        (s / 10) as f32,
        (s / 100).max(1) as f32,
        rgba(255, 255, 255, 100),
    );
    c.into_image()
}

/// Shared layout of the stacked-card styles.
struct CardStack {
    margin: f32,
    size: f32,
    offset: f32,
    radius: f32,
}

impl CardStack {
    fn new(s: u32) -> Self {
        let margin = s / 10;
        Self {
            margin: margin as f32,
            size: (s - 2 * margin) as f32,
            offset: (s / 20) as f32,
            radius: ((s / 5) / 2) as f32,
        }
    }

    fn center(&self) -> Vec2 {
        Vec2::splat(self.margin + self.size * 0.5)
    }

    /// Bottom, middle and top card with the given alphas; lower cards are
    /// shifted toward the bottom-right and share the top card's far corner.
    fn draw(&self, c: &mut Canvas, alphas: [u8; 3]) {
        let far = self.margin + self.size;
        for (shift, alpha) in [self.offset, self.offset * 0.5, 0.0].into_iter().zip(alphas) {
            let near = self.margin + shift.floor();
            c.fill_rounded_rect(Rect::new(near, near, far, far), self.radius, rgba(255, 255, 255, alpha));
        }
    }
}

fn render_cool(s: u32) -> RgbaImage {
    let sf = s as f32;
    let accent = opaque([230, 126, 34]);
    let radius = (s / 5) as f32;

    let mut c = Canvas::new(s, s);
    c.vertical_gradient(&Gradient::new(&[[41, 128, 185], [142, 68, 173]]));
    for y in (0..s).step_by((s / 40).max(2) as usize) {
        let opacity = (10.0 + (y as f32 / sf) * 20.0) as u8;
        c.hline(y, 1, rgba(255, 255, 255, opacity));
    }

    let cards = CardStack::new(s);
    cards.draw(&mut c, [80, 120, 200]);

    // line-art brain: two hemisphere domes joined along the top, three folds each
    let center = cards.center().floor();
    let half = ((cards.size * 0.6) as u32 / 2) as f32;
    let width = (s / 40).max(2) as f32;
    let third = (half / 3.0).floor();
    let fold = (half / 2.0).floor();
    for hx in [center.x - third, center.x + third] {
        c.arc(Rect::centered(Vec2::new(hx, center.y), Vec2::splat(half)), 180.0, 0.0, width, accent);
        for i in 0..3 {
            let fy = center.y - fold + i as f32 * fold;
            let bounds = Rect::centered(Vec2::new(hx, fy), Vec2::new(fold, (fold / 2.0).floor()));
            c.arc(bounds, 180.0, 0.0, width, accent);
        }
    }
    c.line(
        Vec2::new(center.x - third, center.y - half),
        Vec2::new(center.x + third, center.y - half),
        width,
        accent,
    );
    c.mask_rounded(radius);

    // faint blurred drop shadow under the whole tile
    let drop = (s / 50) as i64;
    let mut shadow = Canvas::new(s, s);
    shadow.fill_rounded_rect(Rect::new(0.0, 0.0, sf, sf), radius, rgba(0, 0, 0, 30));
    let shadow = shadow.blurred((s / 50) as f32);
    let mut out = Canvas::new(s, s);
    out.overlay(&shadow, 0, drop);
    out.overlay(&c, 0, 0);
    out.into_image()
}

fn render_modern(s: u32) -> RgbaImage {
    let accent = opaque([241, 196, 15]);

    let mut c = Canvas::new(s, s);
    c.vertical_gradient(&Gradient::new(&[[52, 152, 219], [155, 89, 182]]));
    let cards = CardStack::new(s);
    cards.draw(&mut c, [100, 150, 230]);

    let center = cards.center().floor();
    let half_v = ((cards.size * 0.6) as u32 / 2) as f32;
    let thickness = (s / 30).max(2) as f32;
    let top_left = Vec2::new(center.x - half_v, center.y - half_v);
    let bottom = Vec2::new(center.x, center.y + half_v);
    let top_right = Vec2::new(center.x + half_v, center.y - half_v);
    c.line(top_left, bottom, thickness, accent);
    c.line(bottom, top_right, thickness, accent);

    let dot = (s / 25).max(2) as f32;
    let dot_center = Vec2::new(center.x, center.y - half_v - (half_v * 2.0 / 4.0).floor());
    c.fill_ellipse(Rect::centered(dot_center, Vec2::splat(dot)), accent);

    // diagonal shine fading out from the top-left corner
    let shine = s / 3;
    if shine > 0 {
        for y in 0..shine {
            for x in 0..(shine - y) {
                let opacity = (200.0 * (1.0 - (x + y) as f32 / shine as f32)) as u8;
                c.blend_pixel(x, y, rgba(255, 255, 255, opacity), 1.0);
            }
        }
    }
    c.mask_rounded((s / 5) as f32);
    c.into_image()
}

/// How the descriptor was brought up to date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DescriptorUpdate {
    Created,
    Patched(PatchSummary),
}

#[derive(Debug, Clone, PartialEq)]
pub struct IconSetReport {
    pub written: Vec<PathBuf>,
    pub descriptor: DescriptorUpdate,
}

/// Render every slot into `dir` and bring `dir/Contents.json` in line with
/// the written files.
pub fn generate_icon_set(style: IconStyle, dir: &Path, slots: &[IconSlot], fonts: &FontConfig) -> Result<IconSetReport> {
    fs::create_dir_all(dir).with_context(|| format!("create {}", dir.display()))?;
    let mut written = Vec::with_capacity(slots.len());
    for slot in slots {
        info!("generating {} ({}x{})", slot.filename, slot.pixels, slot.pixels);
        let font = style.uses_text().then(|| icon_font(fonts, slot.pixels));
        let img = render_icon(style, slot.pixels, font.as_ref());
        let path = dir.join(slot.filename);
        img.save(&path).with_context(|| format!("write {}", path.display()))?;
        written.push(path);
    }

    let contents_path = dir.join(CONTENTS_FILE);
    let descriptor = if style.rewrites_descriptor() || !contents_path.is_file() {
        Contents::app_icon(slots).save(&contents_path)?;
        DescriptorUpdate::Created
    } else {
        let mut contents = Contents::load(&contents_path)?;
        let summary = contents.attach_filenames(slots);
        if !summary.is_noop() {
            contents.save(&contents_path)?;
        }
        DescriptorUpdate::Patched(summary)
    };
    Ok(IconSetReport { written, descriptor })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn alpha(img: &RgbaImage, x: u32, y: u32) -> u8 {
        img.get_pixel(x, y).0[3]
    }

    #[test]
    fn every_style_renders_requested_edge() {
        for style in [IconStyle::Plain, IconStyle::Cool, IconStyle::Modern] {
            for size in [20, 29, 87, 167] {
                let img = render_icon(style, size, None);
                assert_eq!(img.dimensions(), (size, size), "{} at {size}", style.name());
            }
        }
    }

    #[test]
    fn masked_styles_have_transparent_corners() {
        for style in [IconStyle::Cool, IconStyle::Modern] {
            let img = render_icon(style, 120, None);
            assert_eq!(alpha(&img, 0, 0), 0, "{} corner", style.name());
            assert_eq!(alpha(&img, 60, 60), 255, "{} centre", style.name());
        }
        let plain = render_icon(IconStyle::Plain, 120, None);
        assert_eq!(alpha(&plain, 0, 0), 255);
    }

    #[test]
    fn modern_v_uses_accent_colour() {
        let img = render_icon(IconStyle::Modern, 180, None);
        // bottom tip of the V sits on the vertical centre line
        let cards = CardStack::new(180);
        let c = cards.center().floor();
        let half_v = ((cards.size * 0.6) as u32 / 2) as f32;
        let px = img.get_pixel(c.x as u32, (c.y + half_v) as u32 - 1);
        assert_eq!(*px, Rgba([241, 196, 15, 255]));
    }

    #[test]
    fn style_targets_and_descriptor_mode() {
        let cfg = IconConfig::default();
        assert_eq!(IconStyle::Cool.default_dir(&cfg), cfg.project_icon_dir.as_path());
        assert_eq!(IconStyle::Modern.default_dir(&cfg), cfg.app_icon_dir.as_path());
        assert!(IconStyle::Cool.rewrites_descriptor());
        assert!(!IconStyle::Plain.rewrites_descriptor());
    }
}
