use super::{canvas::Canvas, color::Color};
use crossterm::{
    cursor::MoveTo,
    queue,
    style::{Print, ResetColor, SetBackgroundColor, SetForegroundColor},
};
use std::io::{self, Write};

/// The glyph used for every cell: its foreground paints the top pixel, its background the bottom.
const UPPER_HALF_BLOCK: char = '▀';

/// Writes a canvas to a terminal, two pixel rows per text row.
pub(crate) struct TerminalPresenter<W: Write> {
    writer: W,
}

impl<W: Write> TerminalPresenter<W> {
    pub(crate) fn new(writer: W) -> Self {
        Self { writer }
    }

    /// The canvas size in pixels that fills a terminal of `columns` by `rows` cells.
    pub(crate) fn canvas_size(columns: u16, rows: u16) -> (u16, u16) {
        (columns, rows.saturating_mul(2))
    }

    pub(crate) fn present(&mut self, canvas: &Canvas) -> io::Result<()> {
        let rows = canvas.height() / 2;
        for row in 0..rows {
            queue!(self.writer, MoveTo(0, row))?;
            let mut current: Option<(Color, Color)> = None;
            for column in 0..canvas.width() {
                let (Some(top), Some(bottom)) = (canvas.pixel(column, row * 2), canvas.pixel(column, row * 2 + 1))
                else {
                    continue;
                };
                if current != Some((top, bottom)) {
                    queue!(self.writer, SetForegroundColor(top.into()), SetBackgroundColor(bottom.into()))?;
                    current = Some((top, bottom));
                }
                queue!(self.writer, Print(UPPER_HALF_BLOCK))?;
            }
        }
        queue!(self.writer, ResetColor)?;
        self.writer.flush()
    }

    #[cfg(test)]
    pub(crate) fn into_inner(self) -> W {
        self.writer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canvas_covers_two_pixels_per_row() {
        assert_eq!(TerminalPresenter::<Vec<u8>>::canvas_size(80, 24), (80, 48));
    }

    #[test]
    fn writes_one_glyph_per_cell() {
        let canvas = Canvas::new(4, 6, Color::new(1, 2, 3));
        let mut presenter = TerminalPresenter::new(Vec::new());
        presenter.present(&canvas).expect("present failed");
        let output = String::from_utf8(presenter.into_inner()).expect("not utf8");
        assert_eq!(output.matches(UPPER_HALF_BLOCK).count(), 12);
    }

    #[test]
    fn only_emits_colors_when_they_change() {
        let mut canvas = Canvas::new(6, 2, Color::new(0, 0, 0));
        canvas.fill_rect(3.0, 0.0, 3.0, 1.0, Color::new(255, 0, 0));
        let mut presenter = TerminalPresenter::new(Vec::new());
        presenter.present(&canvas).expect("present failed");
        let output = String::from_utf8(presenter.into_inner()).expect("not utf8");
        assert_eq!(output.matches("38;2;").count(), 2);
        assert!(output.contains("38;2;255;0;0"));
    }
}
