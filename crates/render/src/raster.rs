use cellspace_common::{CellspaceError, Rgb};
use glam::Vec2;

/// A row-major RGB pixel buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    width: u32,
    height: u32,
    pixels: Vec<Rgb>,
}

impl Frame {
    pub fn new(width: u32, height: u32, background: Rgb) -> Result<Self, CellspaceError> {
        if width == 0 || height == 0 {
            return Err(CellspaceError::InvalidFrameSize { width, height });
        }
        Ok(Self::filled(width, height, background))
    }

    /// Caller guarantees non-zero dimensions.
    pub(crate) fn filled(width: u32, height: u32, background: Rgb) -> Self {
        Self {
            width,
            height,
            pixels: vec![background; width as usize * height as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[Rgb] {
        &self.pixels
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgb> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.pixels[self.index(x, y)])
    }

    /// Out-of-frame writes are dropped.
    pub fn set(&mut self, x: i64, y: i64, color: Rgb) {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return;
        }
        let i = self.index(x as u32, y as u32);
        self.pixels[i] = color;
    }

    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// Packed `RGBRGB...` bytes, row by row.
    pub fn to_rgb_bytes(&self) -> Vec<u8> {
        self.pixels.iter().flat_map(|p| p.to_array()).collect()
    }

    /// Number of pixels that differ from `color`.
    pub fn count_not(&self, color: Rgb) -> usize {
        self.pixels.iter().filter(|p| **p != color).count()
    }

    /// Fill a polygon, sampling at pixel centers with the even-odd rule.
    /// Vertices may lie far outside the frame.
    pub fn fill_polygon(&mut self, points: &[Vec2], color: Rgb) {
        if points.len() < 3 || points.iter().any(|p| !p.is_finite()) {
            return;
        }
        let (min_y, max_y) = points
            .iter()
            .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), p| {
                (lo.min(p.y), hi.max(p.y))
            });
        let first = (min_y - 0.5).ceil().max(0.0) as i64;
        let last = (max_y - 0.5).floor().min(self.height as f32 - 1.0) as i64;

        let mut crossings: Vec<f32> = Vec::with_capacity(points.len());
        for y in first..=last {
            let yc = y as f32 + 0.5;
            crossings.clear();
            for (i, a) in points.iter().enumerate() {
                let b = points[(i + 1) % points.len()];
                if (a.y <= yc) != (b.y <= yc) {
                    crossings.push(a.x + (yc - a.y) * (b.x - a.x) / (b.y - a.y));
                }
            }
            crossings.sort_by(f32::total_cmp);
            for span in crossings.chunks_exact(2) {
                let x0 = (span[0] - 0.5).ceil().max(0.0);
                let x1 = (span[1] - 0.5).ceil().min(self.width as f32);
                for x in x0 as i64..x1 as i64 {
                    self.set(x, y, color);
                }
            }
        }
    }

    /// Closed outline through `points`.
    pub fn stroke_polygon(&mut self, points: &[Vec2], color: Rgb) {
        for (i, a) in points.iter().enumerate() {
            self.draw_line(*a, points[(i + 1) % points.len()], color);
        }
    }

    /// One-pixel line, clipped to the frame first.
    pub fn draw_line(&mut self, a: Vec2, b: Vec2, color: Rgb) {
        let Some((a, b)) = clip_segment(a, b, self.width as f32, self.height as f32) else {
            return;
        };
        let d = b - a;
        let steps = d.x.abs().max(d.y.abs()).ceil().max(1.0) as i64;
        for i in 0..=steps {
            let p = a + d * (i as f32 / steps as f32);
            self.set(p.x.floor() as i64, p.y.floor() as i64, color);
        }
    }
}

/// Liang-Barsky clip of a segment to `[0, w] x [0, h]`.
fn clip_segment(a: Vec2, b: Vec2, w: f32, h: f32) -> Option<(Vec2, Vec2)> {
    if !a.is_finite() || !b.is_finite() {
        return None;
    }
    let d = b - a;
    let (mut t0, mut t1) = (0.0_f32, 1.0_f32);
    for (p, q) in [(-d.x, a.x), (d.x, w - a.x), (-d.y, a.y), (d.y, h - a.y)] {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let r = q / p;
        if p < 0.0 {
            t0 = t0.max(r);
        } else {
            t1 = t1.min(r);
        }
        if t0 > t1 {
            return None;
        }
    }
    Some((a + d * t0, a + d * t1))
}
