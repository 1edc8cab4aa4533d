// Core pixel types shared by the drawing, compositing and codec layers.

use image::RgbImage;

/// An RGB colour triple.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Pack as 0x00RRGGBB, the layout every `Canvas` stores.
    #[inline]
    pub const fn packed(self) -> u32 {
        ((self.r as u32) << 16) | ((self.g as u32) << 8) | self.b as u32
    }

    #[inline]
    pub const fn unpack(px: u32) -> Self {
        Self {
            r: ((px >> 16) & 0xFF) as u8,
            g: ((px >> 8) & 0xFF) as u8,
            b: (px & 0xFF) as u8,
        }
    }

    /// Scale every channel by `k` in [0,1].
    pub fn scaled(self, k: f32) -> Self {
        let k = k.clamp(0.0, 1.0);
        let s = |c: u8| (c as f32 * k) as u8;
        Self::new(s(self.r), s(self.g), s(self.b))
    }
}

/// A pixel position in display coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Fixed-size packed pixel buffer: slides, drawing surfaces and composed frames.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Canvas {
    pub width: usize,
    pub height: usize,
    pub pixels: Vec<u32>, // each entry is 0x00RRGGBB; 0 is the drawing background
}

impl Canvas {
    /// All-zero canvas (an empty drawing surface).
    pub fn blank(width: usize, height: usize) -> Self {
        Self::filled(width, height, Rgb::BLACK)
    }

    pub fn filled(width: usize, height: usize, color: Rgb) -> Self {
        Self {
            width,
            height,
            pixels: vec![color.packed(); width * height],
        }
    }

    pub fn clear(&mut self) {
        self.pixels.fill(0);
    }

    /// True when no pixel has been drawn on.
    pub fn is_empty(&self) -> bool {
        self.pixels.iter().all(|&p| p == 0)
    }

    pub fn get(&self, x: usize, y: usize) -> Option<Rgb> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(Rgb::unpack(self.pixels[y * self.width + x]))
    }

    pub fn from_rgb_image(img: &RgbImage) -> Self {
        let (w, h) = img.dimensions();
        let pixels = img
            .pixels()
            .map(|p| Rgb::new(p[0], p[1], p[2]).packed())
            .collect();
        Self {
            width: w as usize,
            height: h as usize,
            pixels,
        }
    }

    pub fn to_rgb_image(&self) -> RgbImage {
        let mut raw = Vec::with_capacity(self.pixels.len() * 3);
        for &px in &self.pixels {
            let c = Rgb::unpack(px);
            raw.extend_from_slice(&[c.r, c.g, c.b]);
        }
        // Length always matches width * height * 3.
        RgbImage::from_raw(self.width as u32, self.height as u32, raw)
            .unwrap_or_else(|| RgbImage::new(self.width as u32, self.height as u32))
    }
}
