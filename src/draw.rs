// Software drawing on packed pixel buffers.
// Everything here clips silently at the canvas edges, so callers can pass
// points that wander off-screen (hands near the frame border do).

use crate::types::{Canvas, Point, Rgb};

/// Put a pixel on the canvas if (x,y) is inside bounds.
#[inline]
pub fn put_pixel(fb: &mut Canvas, x: i32, y: i32, color: u32) {
    if x < 0 || y < 0 {
        return;
    }
    let (x, y) = (x as usize, y as usize);
    if x >= fb.width || y >= fb.height {
        return;
    }
    let idx = y * fb.width + x;
    fb.pixels[idx] = color;
}

/// Walk the Bresenham pixels from `a` to `b` inclusive.
fn bresenham(a: Point, b: Point, mut plot: impl FnMut(i32, i32)) {
    let (mut x0, mut y0) = (a.x, a.y);
    let dx = (b.x - x0).abs();
    let sx = if x0 < b.x { 1 } else { -1 };
    let dy = -(b.y - y0).abs();
    let sy = if y0 < b.y { 1 } else { -1 };
    let mut err = dx + dy;
    loop {
        plot(x0, y0);
        if x0 == b.x && y0 == b.y { break; }
        let e2 = 2 * err;
        if e2 >= dy { err += dy; x0 += sx; }
        if e2 <= dx { err += dx; y0 += sy; }
    }
}

/// 1-pixel line between `a` and `b`.
pub fn draw_line(fb: &mut Canvas, a: Point, b: Point, color: Rgb) {
    let c = color.packed();
    bresenham(a, b, |x, y| put_pixel(fb, x, y, c));
}

/// Solid disc of radius `r` (r = 0 is a single pixel).
pub fn fill_disc(fb: &mut Canvas, center: Point, r: i32, color: Rgb) {
    let c = color.packed();
    let r2 = r * r;
    for dy in -r..=r {
        for dx in -r..=r {
            if dx * dx + dy * dy <= r2 {
                put_pixel(fb, center.x + dx, center.y + dy, c);
            }
        }
    }
}

/// Line of the given thickness with round caps.
pub fn draw_thick_line(fb: &mut Canvas, a: Point, b: Point, thickness: u32, color: Rgb) {
    if thickness <= 1 {
        draw_line(fb, a, b, color);
        return;
    }
    let r = (thickness / 2) as i32;
    let mut centers = Vec::new();
    bresenham(a, b, |x, y| centers.push(Point::new(x, y)));
    for p in centers {
        fill_disc(fb, p, r, color);
    }
}

/// Axis-aligned filled rectangle with its top-left at (x,y).
pub fn fill_rect(fb: &mut Canvas, x: i32, y: i32, w: i32, h: i32, color: Rgb) {
    let c = color.packed();
    for yy in y.max(0)..(y + h).min(fb.height as i32) {
        for xx in x.max(0)..(x + w).min(fb.width as i32) {
            fb.pixels[yy as usize * fb.width + xx as usize] = c;
        }
    }
}

/// Even-odd scanline fill; the outline is drawn too so degenerate polygons
/// still leave a visible line.
pub fn fill_polygon(fb: &mut Canvas, pts: &[Point], color: Rgb) {
    if pts.is_empty() {
        return;
    }
    let min_y = pts.iter().map(|p| p.y).min().unwrap_or(0).max(0);
    let max_y = pts.iter().map(|p| p.y).max().unwrap_or(0).min(fb.height as i32 - 1);
    let c = color.packed();
    let mut xs: Vec<f32> = Vec::with_capacity(pts.len());

    for y in min_y..=max_y {
        let sy = y as f32 + 0.5; // sample at the pixel centre
        xs.clear();
        for i in 0..pts.len() {
            let p = pts[i];
            let q = pts[(i + 1) % pts.len()];
            let (py, qy) = (p.y as f32, q.y as f32);
            if (py <= sy && qy > sy) || (qy <= sy && py > sy) {
                let t = (sy - py) / (qy - py);
                xs.push(p.x as f32 + t * (q.x - p.x) as f32);
            }
        }
        xs.sort_by(|a, b| a.total_cmp(b));
        for span in xs.chunks_exact(2) {
            let x0 = span[0].round() as i32;
            let x1 = span[1].round() as i32;
            for x in x0..=x1 {
                put_pixel(fb, x, y, c);
            }
        }
    }

    for i in 0..pts.len() {
        draw_line(fb, pts[i], pts[(i + 1) % pts.len()], color);
    }
}

/* ---------- 5x7 bitmap font ---------- */

/// Return a 5x7 glyph bitmap. Each u8 is a row; bit 4 is the leftmost pixel.
/// Lowercase letters are drawn with the uppercase glyph.
fn glyph5x7(ch: char) -> Option<[u8; 7]> {
    macro_rules! g { ($a:expr,$b:expr,$c:expr,$d:expr,$e:expr,$f:expr,$g:expr) => {
        Some([$a,$b,$c,$d,$e,$f,$g])
    }; }

    match ch.to_ascii_uppercase() {
        '0' => g!(0b01110,0b10001,0b10011,0b10101,0b11001,0b10001,0b01110),
        '1' => g!(0b00100,0b01100,0b00100,0b00100,0b00100,0b00100,0b01110),
        '2' => g!(0b01110,0b10001,0b00001,0b00010,0b00100,0b01000,0b11111),
        '3' => g!(0b11110,0b00001,0b00001,0b01110,0b00001,0b00001,0b11110),
        '4' => g!(0b00010,0b00110,0b01010,0b10010,0b11111,0b00010,0b00010),
        '5' => g!(0b11111,0b10000,0b11110,0b00001,0b00001,0b10001,0b01110),
        '6' => g!(0b00110,0b01000,0b10000,0b11110,0b10001,0b10001,0b01110),
        '7' => g!(0b11111,0b00001,0b00010,0b00100,0b01000,0b01000,0b01000),
        '8' => g!(0b01110,0b10001,0b10001,0b01110,0b10001,0b10001,0b01110),
        '9' => g!(0b01110,0b10001,0b10001,0b01111,0b00001,0b00010,0b01100),

        'A' => g!(0b01110,0b10001,0b10001,0b11111,0b10001,0b10001,0b10001),
        'B' => g!(0b11110,0b10001,0b10001,0b11110,0b10001,0b10001,0b11110),
        'C' => g!(0b01110,0b10001,0b10000,0b10000,0b10000,0b10001,0b01110),
        'D' => g!(0b11100,0b10010,0b10001,0b10001,0b10001,0b10010,0b11100),
        'E' => g!(0b11111,0b10000,0b10000,0b11110,0b10000,0b10000,0b11111),
        'F' => g!(0b11111,0b10000,0b10000,0b11110,0b10000,0b10000,0b10000),
        'G' => g!(0b01110,0b10001,0b10000,0b10111,0b10001,0b10001,0b01111),
        'H' => g!(0b10001,0b10001,0b10001,0b11111,0b10001,0b10001,0b10001),
        'I' => g!(0b01110,0b00100,0b00100,0b00100,0b00100,0b00100,0b01110),
        'J' => g!(0b00111,0b00010,0b00010,0b00010,0b00010,0b10010,0b01100),
        'K' => g!(0b10001,0b10010,0b10100,0b11000,0b10100,0b10010,0b10001),
        'L' => g!(0b10000,0b10000,0b10000,0b10000,0b10000,0b10000,0b11111),
        'M' => g!(0b10001,0b11011,0b10101,0b10101,0b10001,0b10001,0b10001),
        'N' => g!(0b10001,0b10001,0b11001,0b10101,0b10011,0b10001,0b10001),
        'O' => g!(0b01110,0b10001,0b10001,0b10001,0b10001,0b10001,0b01110),
        'P' => g!(0b11110,0b10001,0b10001,0b11110,0b10000,0b10000,0b10000),
        'Q' => g!(0b01110,0b10001,0b10001,0b10001,0b10101,0b10010,0b01101),
        'R' => g!(0b11110,0b10001,0b10001,0b11110,0b10100,0b10010,0b10001),
        'S' => g!(0b01111,0b10000,0b10000,0b01110,0b00001,0b00001,0b11110),
        'T' => g!(0b11111,0b00100,0b00100,0b00100,0b00100,0b00100,0b00100),
        'U' => g!(0b10001,0b10001,0b10001,0b10001,0b10001,0b10001,0b01110),
        'V' => g!(0b10001,0b10001,0b10001,0b10001,0b10001,0b01010,0b00100),
        'W' => g!(0b10001,0b10001,0b10001,0b10101,0b10101,0b10101,0b01010),
        'X' => g!(0b10001,0b10001,0b01010,0b00100,0b01010,0b10001,0b10001),
        'Y' => g!(0b10001,0b10001,0b01010,0b00100,0b00100,0b00100,0b00100),
        'Z' => g!(0b11111,0b00001,0b00010,0b00100,0b01000,0b10000,0b11111),

        ' ' => g!(0b00000,0b00000,0b00000,0b00000,0b00000,0b00000,0b00000),
        '|' => g!(0b00100,0b00100,0b00100,0b00100,0b00100,0b00100,0b00100),
        ':' => g!(0b00000,0b00100,0b00000,0b00000,0b00100,0b00000,0b00000),
        '.' => g!(0b00000,0b00000,0b00000,0b00000,0b00000,0b00100,0b00000),
        '/' => g!(0b00001,0b00010,0b00010,0b00100,0b01000,0b01000,0b10000),
        '-' => g!(0b00000,0b00000,0b00000,0b11111,0b00000,0b00000,0b00000),

        _ => None,
    }
}

/// One glyph at (x,y), each font pixel a `scale`x`scale` block, with a
/// black shadow offset by one block for contrast.
fn draw_char_5x7(fb: &mut Canvas, x: i32, y: i32, ch: char, scale: i32, color: Rgb) {
    let Some(rows) = glyph5x7(ch) else { return };
    for (offset, c) in [(scale, Rgb::BLACK), (0, color)] {
        for (ry, rowbits) in rows.iter().enumerate() {
            for rx in 0..5 {
                if (rowbits & (1 << (4 - rx))) != 0 {
                    let px = x + rx * scale + offset;
                    let py = y + ry as i32 * scale + offset;
                    fill_rect(fb, px, py, scale, scale, c);
                }
            }
        }
    }
}

/// Draw a text string using 5x7 glyphs; unknown characters leave a gap.
pub fn draw_text_5x7(fb: &mut Canvas, mut x: i32, y: i32, text: &str, scale: i32, color: Rgb) {
    for ch in text.chars() {
        draw_char_5x7(fb, x, y, ch, scale, color);
        x += 6 * scale; // 5 pixels glyph width + 1 pixel spacing
    }
}

pub fn text_width(text: &str, scale: i32) -> i32 {
    text.chars().count() as i32 * 6 * scale
}
