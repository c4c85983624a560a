use png::{BitDepth, ColorType};

use super::font::{glyph, ADVANCE, GLYPH_WIDTH};

pub type Rgb = [u8; 3];

/// Opaque RGBA8 raster. Coordinates are signed so shapes may be clipped
/// at the edges; anything outside the surface is ignored.
pub struct Canvas {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl Canvas {
    pub fn new(width: u32, height: u32, background: Rgb) -> Self {
        let mut pixels = Vec::with_capacity(width as usize * height as usize * 4);
        for _ in 0..(width as usize * height as usize) {
            pixels.extend_from_slice(&[background[0], background[1], background[2], 255]);
        }
        Self {
            width,
            height,
            pixels,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    fn offset(&self, x: i64, y: i64) -> Option<usize> {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return None;
        }
        Some((y as usize * self.width as usize + x as usize) * 4)
    }

    #[cfg(test)]
    pub fn pixel(&self, x: i64, y: i64) -> Option<Rgb> {
        self.offset(x, y)
            .map(|i| [self.pixels[i], self.pixels[i + 1], self.pixels[i + 2]])
    }

    pub fn put(&mut self, x: i64, y: i64, color: Rgb) {
        self.blend(x, y, color, 1.0);
    }

    /// Alpha-composite `color` over the existing pixel.
    pub fn blend(&mut self, x: i64, y: i64, color: Rgb, alpha: f64) {
        let Some(i) = self.offset(x, y) else {
            return;
        };
        let alpha = alpha.clamp(0.0, 1.0);
        for (channel, src) in color.iter().enumerate() {
            let dst = self.pixels[i + channel] as f64;
            self.pixels[i + channel] = (alpha * *src as f64 + (1.0 - alpha) * dst).round() as u8;
        }
    }

    /// Fill the rectangle spanned by two corners (inclusive, any order).
    pub fn fill_rect(&mut self, x0: i64, y0: i64, x1: i64, y1: i64, color: Rgb, alpha: f64) {
        let (xa, xb) = (x0.min(x1), x0.max(x1));
        let (ya, yb) = (y0.min(y1), y0.max(y1));
        for y in ya..=yb {
            for x in xa..=xb {
                self.blend(x, y, color, alpha);
            }
        }
    }

    pub fn stroke_rect(&mut self, x0: i64, y0: i64, x1: i64, y1: i64, color: Rgb) {
        self.line(x0, y0, x1, y0, color);
        self.line(x1, y0, x1, y1, color);
        self.line(x1, y1, x0, y1, color);
        self.line(x0, y1, x0, y0, color);
    }

    pub fn hline(&mut self, x0: i64, x1: i64, y: i64, thickness: i64, color: Rgb) {
        let top = y - thickness / 2;
        self.fill_rect(x0, top, x1, top + thickness - 1, color, 1.0);
    }

    pub fn dashed_hline(&mut self, x0: i64, x1: i64, y: i64, dash: i64, color: Rgb, alpha: f64) {
        let period = (dash * 2).max(2);
        for x in x0.min(x1)..=x0.max(x1) {
            if (x - x0).rem_euclid(period) < dash {
                self.blend(x, y, color, alpha);
            }
        }
    }

    /// Bresenham line, one pixel wide.
    pub fn line(&mut self, x0: i64, y0: i64, x1: i64, y1: i64, color: Rgb) {
        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let (mut x, mut y, mut err) = (x0, y0, dx + dy);

        loop {
            self.put(x, y, color);
            if x == x1 && y == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
    }

    /// Upward-pointing filled triangle centred on `(cx, cy)`.
    pub fn fill_triangle_up(&mut self, cx: i64, cy: i64, size: i64, color: Rgb) {
        let half = size / 2;
        let top = cy - half;
        let bottom = cy + half;
        let height = (bottom - top).max(1);
        for y in top..=bottom {
            let span = (y - top) * half / height;
            for x in (cx - span)..=(cx + span) {
                self.put(x, y, color);
            }
        }
    }

    /// Draw `text` with its top-left corner at `(x, y)`.
    pub fn text(&mut self, x: i64, y: i64, text: &str, scale: i64, color: Rgb) {
        let scale = scale.max(1);
        for (n, c) in text.chars().enumerate() {
            let origin_x = x + n as i64 * ADVANCE * scale;
            for (row, bits) in glyph(c).iter().enumerate() {
                for col in 0..GLYPH_WIDTH {
                    if bits & (1 << (GLYPH_WIDTH - 1 - col)) != 0 {
                        let px = origin_x + col * scale;
                        let py = y + row as i64 * scale;
                        self.fill_rect(px, py, px + scale - 1, py + scale - 1, color, 1.0);
                    }
                }
            }
        }
    }

    pub fn encode_png(&self) -> Result<Vec<u8>, png::EncodingError> {
        let mut out = Vec::new();
        {
            let mut encoder = png::Encoder::new(&mut out, self.width, self.height);
            encoder.set_color(ColorType::Rgba);
            encoder.set_depth(BitDepth::Eight);
            let mut writer = encoder.write_header()?;
            writer.write_image_data(&self.pixels)?;
        }
        Ok(out)
    }
}
