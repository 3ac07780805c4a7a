use super::node::{BarNode, Neighbor, Oscillation};
use crate::render::DrawingSurface;
use log::debug;

/// The palette's nodes plus the one currently on screen.
///
/// Only the current node ever animates. When its leg settles the sequence hands over to the
/// adjacent node in the oscillation direction, or turns around when there is none, which yields
/// the walk `0, 1, .., N-1, N-1, .., 1, 0, 0, 1, ..` across successive legs.
#[derive(Clone, Debug)]
pub(crate) struct BarSequence {
    nodes: Vec<BarNode>,
    current: usize,
    oscillation: Oscillation,
}

impl BarSequence {
    /// Build a sequence of `node_count` nodes. A sequence always holds at least one node.
    pub(crate) fn new(node_count: usize, step: f64) -> Self {
        let nodes = (0..node_count.max(1)).map(|index| BarNode::new(index, step)).collect();
        Self { nodes, current: 0, oscillation: Oscillation::Forward }
    }

    pub(crate) fn len(&self) -> usize {
        self.nodes.len()
    }

    pub(crate) fn node(&self, index: usize) -> Option<&BarNode> {
        self.nodes.get(index)
    }

    pub(crate) fn current(&self) -> &BarNode {
        &self.nodes[self.current]
    }

    pub(crate) fn current_index(&self) -> usize {
        self.current
    }

    pub(crate) fn current_scale(&self) -> f64 {
        self.current().state().scale()
    }

    pub(crate) fn oscillation(&self) -> Oscillation {
        self.oscillation
    }

    pub(crate) fn is_animating(&self) -> bool {
        self.current().state().is_animating()
    }

    pub(crate) fn draw<S: DrawingSurface + ?Sized>(&self, surface: &mut S) {
        surface.draw_container();
        self.current().draw(surface);
    }

    /// Advance the current node by one step, handing over to its neighbor once it settles.
    ///
    /// Returns `true` when the current leg completed on this call.
    pub(crate) fn advance(&mut self) -> bool {
        if !self.nodes[self.current].advance() {
            return false;
        }
        let settled = self.current;
        match self.current().neighbor(self.oscillation, self.nodes.len()) {
            Neighbor::Adjacent(next) => self.current = next,
            Neighbor::Boundary => self.oscillation = self.oscillation.flipped(),
        }
        debug!(
            "node {settled} settled at {}, current node is now {} ({:?})",
            self.nodes[settled].state().scale(),
            self.current,
            self.oscillation
        );
        true
    }

    pub(crate) fn begin(&mut self) -> bool {
        self.nodes[self.current].begin()
    }

    /// Undo a [BarSequence::begin] whose leg never got to run.
    pub(crate) fn cancel(&mut self) {
        self.nodes[self.current].cancel();
    }
}
