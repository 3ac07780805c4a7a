use super::{DrawingSurface, canvas::Canvas, color::Color};
use crate::config::Config;
use std::f64::consts::PI;

/// Eases a leg's progress into a bar height: empty at both ends, full halfway through.
pub(crate) fn sinify(scale: f64) -> f64 {
    (scale * PI).sin()
}

/// Sizes of the scene derived from the viewport.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Layout {
    pub(crate) center: (f64, f64),
    pub(crate) container_size: f64,
    pub(crate) stroke_width: f64,
}

impl Layout {
    pub(crate) fn new(width: f64, height: f64, stroke_factor: f64, container_size_factor: f64) -> Self {
        let shortest = width.min(height);
        Self {
            center: (width / 2.0, height / 2.0),
            container_size: shortest / container_size_factor,
            stroke_width: shortest / stroke_factor,
        }
    }

    /// The three container strokes: left side, right side, base.
    pub(crate) fn container_lines(&self) -> [((f64, f64), (f64, f64)); 3] {
        let (cx, cy) = self.center;
        let half = self.container_size / 2.0;
        let top = cy - self.container_size;
        [((cx - half, cy), (cx - half, top)), ((cx + half, cy), (cx + half, top)), ((cx - half, cy), (cx + half, cy))]
    }

    /// The bar rectangle as `(x, y, width, height)` for a given scale.
    pub(crate) fn bar_rect(&self, scale: f64) -> (f64, f64, f64, f64) {
        let (cx, cy) = self.center;
        let size = self.container_size;
        let height = size * sinify(scale);
        (cx - size / 2.0, cy - height, size, height)
    }
}

/// Draws the scene onto a pixel canvas.
#[derive(Clone, Debug)]
pub(crate) struct CanvasSurface {
    canvas: Canvas,
    layout: Layout,
    palette: Vec<Color>,
    background_color: Color,
    container_color: Color,
    stroke_factor: f64,
    container_size_factor: f64,
}

impl CanvasSurface {
    pub(crate) fn new(config: &Config, width: u16, height: u16) -> Self {
        let layout = Layout::new(width as f64, height as f64, config.stroke_factor, config.container_size_factor);
        Self {
            canvas: Canvas::new(width, height, config.background_color),
            layout,
            palette: config.palette.clone(),
            background_color: config.background_color,
            container_color: config.container_color,
            stroke_factor: config.stroke_factor,
            container_size_factor: config.container_size_factor,
        }
    }

    pub(crate) fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    pub(crate) fn resize(&mut self, width: u16, height: u16) {
        self.canvas = Canvas::new(width, height, self.background_color);
        self.layout = Layout::new(width as f64, height as f64, self.stroke_factor, self.container_size_factor);
    }

    /// Clear the canvas to the background before drawing a new frame.
    pub(crate) fn begin_frame(&mut self) {
        self.canvas.fill(self.background_color);
    }
}

impl DrawingSurface for CanvasSurface {
    fn draw_container(&mut self) {
        for (from, to) in self.layout.container_lines() {
            self.canvas.stroke_line(from, to, self.layout.stroke_width, self.container_color);
        }
    }

    fn draw_bar(&mut self, index: usize, scale: f64) {
        let Some(color) = self.palette.get(index).copied() else {
            return;
        };
        let (x, y, width, height) = self.layout.bar_rect(scale);
        self.canvas.fill_rect(x, y, width, height, color);
    }
}
