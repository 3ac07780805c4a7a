use super::scale::ScaleState;
use crate::render::DrawingSurface;

/// Which way the sequence walks from one node to the next.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) enum Oscillation {
    #[default]
    Forward,
    Backward,
}

impl Oscillation {
    pub(crate) fn flipped(self) -> Self {
        match self {
            Self::Forward => Self::Backward,
            Self::Backward => Self::Forward,
        }
    }
}

/// The result of looking up a node's neighbor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Neighbor {
    /// The adjacent node in the requested direction.
    Adjacent(usize),
    /// There is no node that way; the caller stays where it is.
    Boundary,
}

/// One palette entry with its own animated scale.
#[derive(Clone, Debug)]
pub(crate) struct BarNode {
    index: usize,
    state: ScaleState,
}

impl BarNode {
    pub(crate) fn new(index: usize, step: f64) -> Self {
        Self { index, state: ScaleState::new(step) }
    }

    pub(crate) fn index(&self) -> usize {
        self.index
    }

    pub(crate) fn state(&self) -> &ScaleState {
        &self.state
    }

    pub(crate) fn draw<S: DrawingSurface + ?Sized>(&self, surface: &mut S) {
        surface.draw_bar(self.index, self.state.scale());
    }

    pub(crate) fn advance(&mut self) -> bool {
        self.state.advance()
    }

    pub(crate) fn begin(&mut self) -> bool {
        self.state.begin()
    }

    pub(crate) fn cancel(&mut self) {
        self.state.cancel();
    }

    /// Find the node next to this one in a sequence of `node_count` nodes.
    pub(crate) fn neighbor(&self, oscillation: Oscillation, node_count: usize) -> Neighbor {
        let candidate = match oscillation {
            Oscillation::Backward => self.index.checked_sub(1),
            Oscillation::Forward => Some(self.index + 1).filter(|next| *next < node_count),
        };
        candidate.map(Neighbor::Adjacent).unwrap_or(Neighbor::Boundary)
    }
}
