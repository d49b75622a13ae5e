//! Small coverage rasterizer on top of `image::RgbaImage`.
//!
//! Every shape is described by a signed distance function (negative inside,
//! positive outside, in pixels) and rasterized by sampling it at pixel centres:
//! coverage = clamp(0.5 - sd, 0, 1). That gives one-pixel antialiasing for free
//! and keeps each primitive a few lines of math.

use glam::Vec2;
use image::{imageops, Rgba, RgbaImage};

pub const TRANSPARENT: Rgba<u8> = Rgba([0, 0, 0, 0]);

#[inline]
pub fn rgba(r: u8, g: u8, b: u8, a: u8) -> Rgba<u8> {
    Rgba([r, g, b, a])
}

#[inline]
pub fn opaque([r, g, b]: [u8; 3]) -> Rgba<u8> {
    Rgba([r, g, b, 255])
}

/// Axis-aligned rectangle in pixel space (max is exclusive for filled shapes).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub min: Vec2,
    pub max: Vec2,
}

impl Rect {
    pub fn new(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self { min: Vec2::new(x0.min(x1), y0.min(y1)), max: Vec2::new(x0.max(x1), y0.max(y1)) }
    }
    pub fn centered(center: Vec2, half: Vec2) -> Self {
        Self { min: center - half, max: center + half }
    }
    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }
    pub fn half_size(&self) -> Vec2 {
        (self.max - self.min) * 0.5
    }
    pub fn grow(&self, by: f32) -> Self {
        Self { min: self.min - Vec2::splat(by), max: self.max + Vec2::splat(by) }
    }
}

/// Piecewise-linear colour ramp sampled by normalized position.
#[derive(Clone, Debug, PartialEq)]
pub struct Gradient {
    stops: Vec<[u8; 3]>,
}

impl Gradient {
    pub fn new(stops: &[[u8; 3]]) -> Self {
        assert!(!stops.is_empty(), "gradient needs at least one stop");
        Self { stops: stops.to_vec() }
    }

    pub fn sample(&self, t: f32) -> [u8; 3] {
        let t = t.clamp(0.0, 1.0);
        if self.stops.len() == 1 {
            return self.stops[0];
        }
        let segments = (self.stops.len() - 1) as f32;
        let pos = t * segments;
        let i = (pos.floor() as usize).min(self.stops.len() - 2);
        let local = pos - i as f32;
        let (a, b) = (self.stops[i], self.stops[i + 1]);
        let mut out = [0u8; 3];
        for c in 0..3 {
            // truncation mirrors integer colour math used for the palettes
            out[c] = (a[c] as f32 * (1.0 - local) + b[c] as f32 * local) as u8;
        }
        out
    }
}

// --- signed distance primitives -------------------------------------------

pub fn sd_rounded_box(p: Vec2, rect: &Rect, radius: f32) -> f32 {
    let half = rect.half_size();
    let r = radius.min(half.x).min(half.y).max(0.0);
    let q = (p - rect.center()).abs() - half + Vec2::splat(r);
    q.max(Vec2::ZERO).length() + q.x.max(q.y).min(0.0) - r
}

pub fn sd_segment(p: Vec2, a: Vec2, b: Vec2) -> f32 {
    let pa = p - a;
    let ba = b - a;
    let len2 = ba.length_squared();
    let h = if len2 <= f32::EPSILON { 0.0 } else { (pa.dot(ba) / len2).clamp(0.0, 1.0) };
    (pa - ba * h).length()
}

/// First-order distance to an axis-aligned ellipse (exact for circles).
pub fn sd_ellipse(p: Vec2, center: Vec2, radii: Vec2) -> f32 {
    let r = radii.max(Vec2::splat(0.5));
    let d = p - center;
    let f = (d.x * d.x) / (r.x * r.x) + (d.y * d.y) / (r.y * r.y) - 1.0;
    let grad = Vec2::new(2.0 * d.x / (r.x * r.x), 2.0 * d.y / (r.y * r.y));
    let g = grad.length();
    if g <= f32::EPSILON {
        -r.x.min(r.y)
    } else {
        f / g
    }
}

/// Angle of `d` in degrees, clockwise from 3 o'clock in y-down image space.
fn clockwise_degrees(d: Vec2) -> f32 {
    d.y.atan2(d.x).to_degrees().rem_euclid(360.0)
}

fn in_sweep(angle: f32, start: f32, end: f32) -> bool {
    let start = start.rem_euclid(360.0);
    let span = (end - start).rem_euclid(360.0);
    let span = if span == 0.0 { 360.0 } else { span };
    (angle - start).rem_euclid(360.0) <= span
}

/// Pixel canvas with source-over compositing.
#[derive(Clone, Debug)]
pub struct Canvas {
    img: RgbaImage,
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> Self {
        Self { img: RgbaImage::from_pixel(width, height, TRANSPARENT) }
    }

    pub fn filled(width: u32, height: u32, color: Rgba<u8>) -> Self {
        Self { img: RgbaImage::from_pixel(width, height, color) }
    }

    pub fn width(&self) -> u32 {
        self.img.width()
    }
    pub fn height(&self) -> u32 {
        self.img.height()
    }
    pub fn image(&self) -> &RgbaImage {
        &self.img
    }
    pub fn into_image(self) -> RgbaImage {
        self.img
    }

    pub fn blend_pixel(&mut self, x: u32, y: u32, color: Rgba<u8>, coverage: f32) {
        if x >= self.img.width() || y >= self.img.height() {
            return;
        }
        blend(self.img.get_pixel_mut(x, y), color, coverage);
    }

    /// Opaque row-by-row fill; row y gets `gradient.sample(y / height)`.
    pub fn vertical_gradient(&mut self, gradient: &Gradient) {
        let h = self.img.height().max(1) as f32;
        for (y, row) in self.img.enumerate_rows_mut() {
            let c = opaque(gradient.sample(y as f32 / h));
            for (_, _, px) in row {
                *px = c;
            }
        }
    }

    /// Horizontal band `thickness` pixels tall, starting at row `y`.
    pub fn hline(&mut self, y: u32, thickness: u32, color: Rgba<u8>) {
        for yy in y..(y + thickness.max(1)).min(self.img.height()) {
            for x in 0..self.img.width() {
                blend(self.img.get_pixel_mut(x, yy), color, 1.0);
            }
        }
    }

    /// Rasterize an arbitrary signed distance function over `bounds`.
    pub fn fill_sdf(&mut self, bounds: Rect, color: Rgba<u8>, sdf: impl Fn(Vec2) -> f32) {
        let (w, h) = (self.img.width() as f32, self.img.height() as f32);
        let x0 = bounds.min.x.floor().clamp(0.0, w) as u32;
        let y0 = bounds.min.y.floor().clamp(0.0, h) as u32;
        let x1 = bounds.max.x.ceil().clamp(0.0, w) as u32;
        let y1 = bounds.max.y.ceil().clamp(0.0, h) as u32;
        for y in y0..y1 {
            for x in x0..x1 {
                let p = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
                let coverage = (0.5 - sdf(p)).clamp(0.0, 1.0);
                if coverage > 0.0 {
                    blend(self.img.get_pixel_mut(x, y), color, coverage);
                }
            }
        }
    }

    pub fn fill_rect(&mut self, rect: Rect, color: Rgba<u8>) {
        self.fill_rounded_rect(rect, 0.0, color);
    }

    pub fn fill_rounded_rect(&mut self, rect: Rect, radius: f32, color: Rgba<u8>) {
        self.fill_sdf(rect.grow(1.0), color, |p| sd_rounded_box(p, &rect, radius));
    }

    /// Outline drawn inward from the rect edge, `width` pixels thick.
    pub fn stroke_rounded_rect(&mut self, rect: Rect, radius: f32, width: f32, color: Rgba<u8>) {
        let width = width.max(1.0);
        self.fill_sdf(rect.grow(1.0), color, |p| {
            let d = sd_rounded_box(p, &rect, radius);
            d.max(-(d + width))
        });
    }

    pub fn line(&mut self, a: Vec2, b: Vec2, width: f32, color: Rgba<u8>) {
        let half = width.max(1.0) * 0.5;
        let bounds = Rect::new(a.x.min(b.x), a.y.min(b.y), a.x.max(b.x), a.y.max(b.y)).grow(half + 1.0);
        self.fill_sdf(bounds, color, |p| sd_segment(p, a, b) - half);
    }

    pub fn fill_ellipse(&mut self, rect: Rect, color: Rgba<u8>) {
        let (c, r) = (rect.center(), rect.half_size());
        self.fill_sdf(rect.grow(1.0), color, |p| sd_ellipse(p, c, r));
    }

    /// Elliptical arc inscribed in `rect`, swept clockwise from `start_deg` to
    /// `end_deg` (0 = 3 o'clock). The stroke sits inside the bounding box.
    pub fn arc(&mut self, rect: Rect, start_deg: f32, end_deg: f32, width: f32, color: Rgba<u8>) {
        let width = width.max(1.0);
        let c = rect.center();
        let r = rect.half_size() - Vec2::splat(width * 0.5);
        self.fill_sdf(rect.grow(1.0), color, |p| {
            if !in_sweep(clockwise_degrees(p - c), start_deg, end_deg) {
                return f32::MAX;
            }
            sd_ellipse(p, c, r).abs() - width * 0.5
        });
    }

    /// Square of side `side` centred on `center`, rotated counter-clockwise by `angle_deg`.
    pub fn fill_rotated_square(&mut self, center: Vec2, side: f32, angle_deg: f32, color: Rgba<u8>) {
        let half = Vec2::splat(side * 0.5);
        // rotate sample points the other way so the square turns counter-clockwise on screen
        let rot = Vec2::from_angle(angle_deg.to_radians());
        let local = Rect::centered(Vec2::ZERO, half);
        let extent = rotated_extent(side, angle_deg) * 0.5;
        self.fill_sdf(Rect::centered(center, Vec2::splat(extent + 1.0)), color, |p| {
            let d = p - center;
            let q = Vec2::new(d.x * rot.x - d.y * rot.y, d.x * rot.y + d.y * rot.x);
            sd_rounded_box(q, &local, 0.0)
        });
    }

    /// Scale every pixel's alpha by the coverage of a rounded rect spanning the canvas.
    pub fn mask_rounded(&mut self, radius: f32) {
        let rect = Rect::new(0.0, 0.0, self.img.width() as f32, self.img.height() as f32);
        for (x, y, px) in self.img.enumerate_pixels_mut() {
            let p = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
            let coverage = (0.5 - sd_rounded_box(p, &rect, radius)).clamp(0.0, 1.0);
            px.0[3] = (px.0[3] as f32 * coverage).round() as u8;
        }
    }

    /// Gaussian-blurred copy. Sigmas below half a pixel return an unblurred clone.
    pub fn blurred(&self, sigma: f32) -> Canvas {
        if sigma < 0.5 {
            return self.clone();
        }
        Canvas { img: imageops::blur(&self.img, sigma) }
    }

    /// Composite `top` over this canvas with its top-left corner at (x, y).
    pub fn overlay(&mut self, top: &Canvas, x: i64, y: i64) {
        imageops::overlay(&mut self.img, &top.img, x, y);
    }
}

/// Edge length of the axis-aligned box around a square of `side` rotated by `angle_deg`.
pub fn rotated_extent(side: f32, angle_deg: f32) -> f32 {
    let a = angle_deg.to_radians();
    side * (a.cos().abs() + a.sin().abs())
}

fn blend(dst: &mut Rgba<u8>, src: Rgba<u8>, coverage: f32) {
    let sa = src.0[3] as f32 / 255.0 * coverage;
    if sa <= 0.0 {
        return;
    }
    let da = dst.0[3] as f32 / 255.0;
    let oa = sa + da * (1.0 - sa);
    for c in 0..3 {
        let v = (src.0[c] as f32 * sa + dst.0[c] as f32 * da * (1.0 - sa)) / oa;
        dst.0[c] = v.round().clamp(0.0, 255.0) as u8;
    }
    dst.0[3] = (oa * 255.0).round().clamp(0.0, 255.0) as u8;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gradient_interpolates_by_row() {
        let g = Gradient::new(&[[50, 100, 200], [150, 150, 150]]);
        assert_eq!(g.sample(0.0), [50, 100, 200]);
        assert_eq!(g.sample(0.5), [100, 125, 175]);
        assert_eq!(g.sample(1.0), [150, 150, 150]);
        let three = Gradient::new(&[[0, 0, 0], [100, 100, 100], [200, 0, 0]]);
        assert_eq!(three.sample(0.5), [100, 100, 100]);
        assert_eq!(three.sample(0.75), [150, 50, 50]);
    }

    #[test]
    fn rounded_box_sign() {
        let r = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(sd_rounded_box(Vec2::new(5.0, 5.0), &r, 2.0) < 0.0);
        assert!(sd_rounded_box(Vec2::new(12.0, 5.0), &r, 2.0) > 0.0);
        // the very corner is cut away by the radius
        assert!(sd_rounded_box(Vec2::new(0.2, 0.2), &r, 4.0) > 0.0);
    }

    #[test]
    fn sweep_wraps_through_zero() {
        // 180 -> 0 clockwise is the upper half in y-down space
        assert!(in_sweep(270.0, 180.0, 0.0));
        assert!(in_sweep(180.0, 180.0, 0.0));
        assert!(!in_sweep(90.0, 180.0, 0.0));
        assert_eq!(clockwise_degrees(Vec2::new(0.0, -1.0)), 270.0);
    }

    #[test]
    fn mask_clears_corners_only() {
        let mut c = Canvas::filled(40, 40, rgba(255, 0, 0, 255));
        c.mask_rounded(8.0);
        assert_eq!(c.image().get_pixel(0, 0).0[3], 0);
        assert_eq!(c.image().get_pixel(20, 20).0[3], 255);
        assert_eq!(c.image().get_pixel(20, 0).0[3], 255);
    }

    #[test]
    fn blend_over_transparent_keeps_source_colour() {
        let mut c = Canvas::new(4, 4);
        c.blend_pixel(1, 1, rgba(10, 20, 30, 128), 1.0);
        assert_eq!(c.image().get_pixel(1, 1).0, [10, 20, 30, 128]);
        // out of bounds is ignored
        c.blend_pixel(9, 9, rgba(1, 1, 1, 255), 1.0);
    }

    #[test]
    fn arc_draws_only_requested_half() {
        let mut c = Canvas::new(40, 40);
        c.arc(Rect::new(0.0, 0.0, 40.0, 40.0), 180.0, 0.0, 3.0, rgba(255, 255, 255, 255));
        assert!(c.image().get_pixel(20, 1).0[3] > 0, "top of the arc should be inked");
        assert_eq!(c.image().get_pixel(20, 38).0[3], 0, "bottom half must stay empty");
    }

    #[test]
    fn line_and_rotated_square_cover_their_centres() {
        let mut c = Canvas::new(50, 50);
        c.line(Vec2::new(5.0, 5.0), Vec2::new(45.0, 45.0), 3.0, rgba(0, 0, 255, 255));
        assert!(c.image().get_pixel(25, 25).0[3] > 200);
        assert_eq!(c.image().get_pixel(45, 5).0[3], 0);
        let mut s = Canvas::new(50, 50);
        s.fill_rotated_square(Vec2::new(25.0, 25.0), 20.0, 45.0, rgba(0, 255, 0, 255));
        assert_eq!(s.image().get_pixel(25, 25).0[3], 255);
        // the diamond's tip reaches further up than an upright square would
        assert!(s.image().get_pixel(25, 12).0[3] > 0);
        assert_eq!(s.image().get_pixel(16, 16).0[3], 0);
    }
}
