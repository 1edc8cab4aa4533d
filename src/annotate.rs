// Annotation engine: turns pen positions into strokes on a drawing surface,
// and composites a surface over its background for display.

use std::f32::consts::{FRAC_PI_4, TAU};

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use tracing::debug;

use crate::brush::{Brush, BrushStyle};
use crate::config::SPRAY_DOTS;
use crate::draw::{draw_thick_line, fill_disc, fill_polygon, put_pixel};
use crate::presentation::Presentation;
use crate::types::{Canvas, Point, Rgb};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Tool {
    #[default]
    Brush,
    Eraser,
}

pub struct Annotator {
    brush: Brush,
    tool: Tool,
    anchor: Option<Point>, // last pen position; None = pen lifted
    rng: Pcg32,
}

impl Default for Annotator {
    fn default() -> Self {
        Self::new()
    }
}

impl Annotator {
    pub fn new() -> Self {
        Self::from_rng(Pcg32::from_rng(&mut rand::rng()))
    }

    /// Reproducible spray output, for tests.
    pub fn with_seed(seed: u64) -> Self {
        Self::from_rng(Pcg32::seed_from_u64(seed))
    }

    fn from_rng(rng: Pcg32) -> Self {
        Self {
            brush: Brush::default(),
            tool: Tool::Brush,
            anchor: None,
            rng,
        }
    }

    pub fn brush(&self) -> Brush {
        self.brush
    }

    pub fn tool(&self) -> Tool {
        self.tool
    }

    pub fn anchor(&self) -> Option<Point> {
        self.anchor
    }

    pub fn set_tool(&mut self, tool: Tool) {
        self.tool = tool;
    }

    pub fn toggle_eraser(&mut self) -> Tool {
        self.tool = match self.tool {
            Tool::Brush => Tool::Eraser,
            Tool::Eraser => Tool::Brush,
        };
        debug!(tool = ?self.tool, "tool toggled");
        self.tool
    }

    pub fn set_color(&mut self, color: Rgb) {
        self.brush.color = color;
    }

    pub fn set_thickness(&mut self, thickness: u32) {
        self.brush.thickness = thickness.max(1);
    }

    pub fn set_style(&mut self, style: BrushStyle) {
        self.brush.style = style;
    }

    pub fn cycle_style(&mut self) -> BrushStyle {
        self.brush.style = self.brush.style.next();
        debug!(style = self.brush.style.as_str(), "brush style cycled");
        self.brush.style
    }

    /// Drop the anchor so the next `stroke_to` starts a new stroke.
    pub fn lift(&mut self) {
        self.anchor = None;
    }

    /// Draw from the anchor to `to` and move the anchor there. With the pen
    /// lifted this only places the anchor. Returns whether anything was drawn.
    pub fn stroke_to(&mut self, surface: &mut Canvas, to: Point) -> bool {
        let Some(from) = self.anchor.replace(to) else {
            return false;
        };
        let t = self.brush.thickness.max(1);

        if self.tool == Tool::Eraser {
            erase_segment(surface, from, to, (t * 3) as i32);
            return true;
        }

        let color = self.brush.color;
        match self.brush.style {
            BrushStyle::Normal => draw_thick_line(surface, from, to, t, color),
            BrushStyle::Spray => self.spray(surface, to, t, color),
            BrushStyle::Calligraphy => calligraphy(surface, from, to, t, color),
            BrushStyle::Neon => neon(surface, from, to, t, color),
        }
        true
    }

    /// Wipe the surface currently on display and lift the pen.
    pub fn clear_active(&mut self, deck: &mut Presentation) {
        self.lift();
        deck.clear_active();
    }

    fn spray(&mut self, surface: &mut Canvas, at: Point, t: u32, color: Rgb) {
        let reach = (t * 2) as f32;
        let c = color.packed();
        for _ in 0..SPRAY_DOTS {
            let angle = self.rng.random::<f32>() * TAU;
            let radius = self.rng.random::<f32>() * reach;
            let x = (at.x as f32 + radius * angle.cos()) as i32;
            let y = (at.y as f32 + radius * angle.sin()) as i32;
            put_pixel(surface, x, y, c);
        }
    }
}

/// Flat-nib stroke: a quad whose long edges sit `2t` either side of the
/// segment, rotated 45 degrees from its direction.
fn calligraphy(surface: &mut Canvas, from: Point, to: Point, t: u32, color: Rgb) {
    let angle = ((to.y - from.y) as f32).atan2((to.x - from.x) as f32) + FRAC_PI_4;
    let width = (t * 2) as f32;
    let (dx, dy) = ((width * angle.cos()) as i32, (width * angle.sin()) as i32);
    let quad = [
        Point::new(from.x - dx, from.y - dy),
        Point::new(to.x - dx, to.y - dy),
        Point::new(to.x + dx, to.y + dy),
        Point::new(from.x + dx, from.y + dy),
    ];
    fill_polygon(surface, &quad, color);
}

/// Glow: halos from `2t` down to `t`, dimming as they narrow, then a
/// full-colour core of width `t`.
fn neon(surface: &mut Canvas, from: Point, to: Point, t: u32, color: Rgb) {
    for width in (t..=t * 2).rev() {
        let k = (width - t) as f32 / (t * 2) as f32;
        draw_thick_line(surface, from, to, width, color.scaled(k));
    }
    draw_thick_line(surface, from, to, t, color);
}

/// Sweep a zero-valued disc of radius `r` along the segment.
fn erase_segment(surface: &mut Canvas, from: Point, to: Point, r: i32) {
    let (dx, dy) = ((to.x - from.x) as f32, (to.y - from.y) as f32);
    let step = (r as f32 / 2.0).max(1.0);
    let steps = ((dx * dx + dy * dy).sqrt() / step).ceil() as i32;
    for i in 0..=steps {
        let k = if steps == 0 { 1.0 } else { i as f32 / steps as f32 };
        let p = Point::new(from.x + (dx * k).round() as i32, from.y + (dy * k).round() as i32);
        fill_disc(surface, p, r, Rgb::BLACK);
    }
}

/// Grey level as the display pipeline sees it (BT.601, 14-bit fixed point).
#[inline]
pub fn luma(px: u32) -> u32 {
    let c = Rgb::unpack(px);
    (c.r as u32 * 4899 + c.g as u32 * 9617 + c.b as u32 * 1868 + 8192) >> 14
}

/// Background with every non-background drawing pixel laid on top.
pub fn composite(background: &Canvas, drawing: &Canvas) -> Canvas {
    let mut out = background.clone();
    for (dst, &ink) in out.pixels.iter_mut().zip(&drawing.pixels) {
        if luma(ink) != 0 {
            *dst = ink;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const W: usize = 200;
    const H: usize = 120;

    fn ink(fb: &Canvas) -> Vec<(i32, i32)> {
        let mut out = Vec::new();
        for y in 0..fb.height {
            for x in 0..fb.width {
                if fb.pixels[y * fb.width + x] != 0 {
                    out.push((x as i32, y as i32));
                }
            }
        }
        out
    }

    #[test]
    fn first_stroke_only_anchors() {
        let mut a = Annotator::with_seed(1);
        let mut s = Canvas::blank(W, H);
        assert!(!a.stroke_to(&mut s, Point::new(10, 10)));
        assert!(s.is_empty());
        assert_eq!(a.anchor(), Some(Point::new(10, 10)));
    }

    #[test]
    fn n_positions_make_n_minus_one_segments() {
        let mut a = Annotator::with_seed(1);
        let mut s = Canvas::blank(W, H);
        let drawn = (0..8)
            .filter(|i| a.stroke_to(&mut s, Point::new(20 + i * 10, 60)))
            .count();
        assert_eq!(drawn, 7);
        assert_eq!(s.get(20, 60), Some(a.brush().color));
        assert_eq!(s.get(90, 60), Some(a.brush().color));
    }

    #[test]
    fn lift_breaks_the_stroke() {
        let mut a = Annotator::with_seed(1);
        let mut s = Canvas::blank(W, H);
        a.stroke_to(&mut s, Point::new(10, 20));
        a.lift();
        a.stroke_to(&mut s, Point::new(150, 20));
        assert!(s.is_empty());
    }

    #[test]
    fn spray_scatters_bounded_dots() {
        for seed in 0..20 {
            let mut a = Annotator::with_seed(seed);
            a.set_style(BrushStyle::Spray);
            a.set_thickness(4);
            let mut s = Canvas::blank(W, H);
            let at = Point::new(100, 60);
            a.stroke_to(&mut s, Point::new(50, 60));
            a.stroke_to(&mut s, at);

            let dots = ink(&s);
            assert!(!dots.is_empty() && dots.len() <= SPRAY_DOTS, "seed {seed}: {}", dots.len());
            let reach = 2.0 * 4.0 + 1.5;
            for (x, y) in dots {
                let d = (((x - at.x).pow(2) + (y - at.y).pow(2)) as f32).sqrt();
                assert!(d <= reach, "seed {seed}: dot at distance {d}");
            }
        }
    }

    #[test]
    fn calligraphy_is_wider_than_a_plain_line() {
        let mut plain = Canvas::blank(W, H);
        let mut nib = Canvas::blank(W, H);
        for (style, surface) in [(BrushStyle::Normal, &mut plain), (BrushStyle::Calligraphy, &mut nib)] {
            let mut a = Annotator::with_seed(3);
            a.set_style(style);
            a.stroke_to(surface, Point::new(40, 60));
            a.stroke_to(surface, Point::new(160, 60));
        }
        assert!(ink(&nib).len() > ink(&plain).len());
        // Horizontal stroke: nib offset is (4.24, 4.24) at thickness 3.
        assert_eq!(nib.get(100, 64), Some(Brush::default().color));
        assert_eq!(nib.get(100, 56), Some(Brush::default().color));
    }

    #[test]
    fn neon_core_is_full_colour_and_halo_is_dimmer() {
        let mut a = Annotator::with_seed(3);
        a.set_style(BrushStyle::Neon);
        a.set_thickness(6);
        a.set_color(Rgb::new(0, 200, 0));
        let mut s = Canvas::blank(W, H);
        a.stroke_to(&mut s, Point::new(40, 60));
        a.stroke_to(&mut s, Point::new(160, 60));

        assert_eq!(s.get(100, 60), Some(Rgb::new(0, 200, 0)));
        let halo = s.get(100, 65).unwrap_or_default();
        assert!(halo.g > 0 && halo.g < 200, "halo {halo:?}");
        assert_eq!(s.get(100, 68), Some(Rgb::BLACK));
    }

    #[test]
    fn neon_halo_fades_toward_the_core() {
        let mut a = Annotator::with_seed(3);
        a.set_style(BrushStyle::Neon);
        a.set_thickness(6);
        a.set_color(Rgb::new(0, 200, 0));
        let mut s = Canvas::blank(W, H);
        a.stroke_to(&mut s, Point::new(40, 60));
        a.stroke_to(&mut s, Point::new(160, 60));

        // Rings at distance 6, 5, 4 are last painted by widths 12, 10, 8.
        let g = |dy: usize| s.get(100, 60 + dy).unwrap_or_default().g;
        assert_eq!(g(6), 100);
        assert!(g(6) > g(5) && g(5) > g(4) && g(4) > 0, "{} {} {}", g(6), g(5), g(4));
    }

    #[test]
    fn eraser_clears_along_the_path_regardless_of_style() {
        let mut s = Canvas::filled(W, H, Rgb::new(9, 9, 9));
        let mut a = Annotator::with_seed(5);
        a.set_style(BrushStyle::Neon);
        a.set_color(Rgb::WHITE);
        assert_eq!(a.toggle_eraser(), Tool::Eraser);

        a.stroke_to(&mut s, Point::new(30, 60));
        a.stroke_to(&mut s, Point::new(170, 60));
        for x in 30..=170 {
            assert_eq!(s.get(x, 60), Some(Rgb::BLACK), "x {x}");
            assert_eq!(s.get(x, 60 + 6), Some(Rgb::BLACK), "x {x}");
        }
        assert_eq!(s.get(100, 60 + 10), Some(Rgb::new(9, 9, 9)));
    }

    #[test]
    fn composite_overlays_only_ink() {
        let bg = Canvas::filled(4, 1, Rgb::WHITE);
        let mut drawing = Canvas::blank(4, 1);
        drawing.pixels[1] = Rgb::new(255, 0, 0).packed();
        drawing.pixels[2] = Rgb::new(0, 0, 1).packed(); // too dark to count as ink
        let out = composite(&bg, &drawing);
        assert_eq!(out.get(0, 0), Some(Rgb::WHITE));
        assert_eq!(out.get(1, 0), Some(Rgb::new(255, 0, 0)));
        assert_eq!(out.get(2, 0), Some(Rgb::WHITE));
        assert_eq!(bg.get(1, 0), Some(Rgb::WHITE));
    }

    #[test]
    fn thickness_never_drops_to_zero() {
        let mut a = Annotator::with_seed(0);
        a.set_thickness(0);
        assert_eq!(a.brush().thickness, 1);
    }
}
