mod canvas;
mod color;
mod surface;
mod terminal;

pub(crate) use color::Color;
pub(crate) use surface::CanvasSurface;
pub(crate) use terminal::TerminalPresenter;

/// The drawing operations the animation needs from whatever it is drawn on.
pub(crate) trait DrawingSurface {
    /// Draw the fixed container outline, sized from the viewport.
    fn draw_container(&mut self);

    /// Draw the bar for palette entry `index` at the given leg progress.
    fn draw_bar(&mut self, index: usize, scale: f64);
}

#[cfg(test)]
pub(crate) mod testing {
    use super::DrawingSurface;

    #[derive(Clone, Debug, PartialEq)]
    pub(crate) enum SurfaceCall {
        Container,
        Bar { index: usize, scale: f64 },
    }

    /// Records every draw call it receives.
    #[derive(Debug, Default)]
    pub(crate) struct RecordingSurface {
        pub(crate) calls: Vec<SurfaceCall>,
    }

    impl DrawingSurface for RecordingSurface {
        fn draw_container(&mut self) {
            self.calls.push(SurfaceCall::Container);
        }

        fn draw_bar(&mut self, index: usize, scale: f64) {
            self.calls.push(SurfaceCall::Bar { index, scale });
        }
    }
}
