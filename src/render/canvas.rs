use super::color::Color;

/// An in-memory RGB pixel buffer.
///
/// Coordinates are in pixels with the origin at the top left. Shapes cover every pixel whose
/// center falls inside them, and anything outside the buffer is clipped.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Canvas {
    width: u16,
    height: u16,
    pixels: Vec<Color>,
}

impl Canvas {
    pub(crate) fn new(width: u16, height: u16, color: Color) -> Self {
        Self { width, height, pixels: vec![color; width as usize * height as usize] }
    }

    pub(crate) fn width(&self) -> u16 {
        self.width
    }

    pub(crate) fn height(&self) -> u16 {
        self.height
    }

    pub(crate) fn pixel(&self, x: u16, y: u16) -> Option<Color> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels.get(y as usize * self.width as usize + x as usize).copied()
    }

    pub(crate) fn fill(&mut self, color: Color) {
        self.pixels.fill(color);
    }

    pub(crate) fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64, color: Color) {
        let (left, right) = ordered(x, x + width);
        let (top, bottom) = ordered(y, y + height);
        let columns = self.covered(left, right, self.width);
        let rows = self.covered(top, bottom, self.height);
        for row in rows {
            let start = row * self.width as usize;
            self.pixels[start + columns.start..start + columns.end].fill(color);
        }
    }

    /// Draw a straight line `line_width` pixels thick with square caps.
    pub(crate) fn stroke_line(&mut self, from: (f64, f64), to: (f64, f64), line_width: f64, color: Color) {
        let (dx, dy) = (to.0 - from.0, to.1 - from.1);
        let samples = (dx.abs().max(dy.abs()) * 2.0).ceil().max(1.0) as usize;
        let half = line_width / 2.0;
        for sample in 0..=samples {
            let t = sample as f64 / samples as f64;
            let (x, y) = (from.0 + dx * t, from.1 + dy * t);
            self.fill_rect(x - half, y - half, line_width, line_width, color);
        }
    }

    fn covered(&self, start: f64, end: f64, limit: u16) -> std::ops::Range<usize> {
        let clamp = |value: f64| (value - 0.5).ceil().clamp(0.0, limit as f64) as usize;
        clamp(start)..clamp(end)
    }
}

fn ordered(a: f64, b: f64) -> (f64, f64) {
    if a <= b { (a, b) } else { (b, a) }
}
