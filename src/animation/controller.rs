use super::sequence::BarSequence;
use super::ticker::Ticker;
use log::{debug, info, trace, warn};
use std::{collections::VecDeque, io};

/// Whether a leg is currently being driven by the ticker.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) enum Phase {
    #[default]
    Idle,
    Animating,
}

/// Something that happened, either from the host or as the outcome of an earlier effect.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Input {
    /// The user tapped.
    Tap,
    /// The ticker fired.
    Tick,
    /// A tap managed to start a leg on the current node.
    Started,
    /// The current leg reached its extreme.
    Settled,
}

/// Work the controller performs in response to an input.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Effect {
    /// Try to start a leg; reports [Input::Started] on success.
    Begin,
    /// Step the sequence; reports [Input::Settled] when the leg completes.
    Advance,
    StartTicker,
    StopTicker,
    Render,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Transition {
    pub(crate) next: Phase,
    pub(crate) effects: &'static [Effect],
}

/// The controller's transition function. Effects run in the order listed.
pub(crate) fn step(phase: Phase, input: Input) -> Transition {
    use Effect::*;
    let (next, effects): (Phase, &'static [Effect]) = match (phase, input) {
        (Phase::Idle, Input::Tap) => (Phase::Idle, &[Begin]),
        (Phase::Idle, Input::Started) => (Phase::Animating, &[StartTicker]),
        (Phase::Animating, Input::Tick) => (Phase::Animating, &[Render, Advance]),
        (Phase::Animating, Input::Settled) => (Phase::Idle, &[StopTicker, Render]),
        // A tap mid-leg and a tick that arrives while idle are both ignored.
        (phase, _) => (phase, &[]),
    };
    Transition { next, effects }
}

/// Owns the sequence and its ticker and turns taps and ticks into animation.
#[derive(Debug)]
pub(crate) struct Controller<T> {
    sequence: BarSequence,
    ticker: T,
    phase: Phase,
    legs: usize,
}

impl<T: Ticker> Controller<T> {
    pub(crate) fn new(sequence: BarSequence, ticker: T) -> Self {
        Self { sequence, ticker, phase: Phase::Idle, legs: 0 }
    }

    pub(crate) fn sequence(&self) -> &BarSequence {
        &self.sequence
    }

    pub(crate) fn ticker(&self) -> &T {
        &self.ticker
    }

    pub(crate) fn phase(&self) -> Phase {
        self.phase
    }

    /// How many legs have settled so far.
    pub(crate) fn legs(&self) -> usize {
        self.legs
    }

    /// Handle a tap.
    ///
    /// Fails only if the ticker could not be started, in which case the leg is rolled back and
    /// the controller is idle again.
    pub(crate) fn on_tap<R: FnMut(&BarSequence)>(&mut self, render: &mut R) -> io::Result<()> {
        self.handle(Input::Tap, render)
    }

    pub(crate) fn on_tick<R: FnMut(&BarSequence)>(&mut self, render: &mut R) -> io::Result<()> {
        self.handle(Input::Tick, render)
    }

    fn handle<R: FnMut(&BarSequence)>(&mut self, input: Input, render: &mut R) -> io::Result<()> {
        let mut inputs = VecDeque::from([input]);
        while let Some(input) = inputs.pop_front() {
            let transition = step(self.phase, input);
            trace!("{:?} + {input:?} -> {:?}", self.phase, transition.next);
            self.phase = transition.next;
            for effect in transition.effects {
                if let Some(follow_up) = self.perform(*effect, render)? {
                    inputs.push_back(follow_up);
                }
            }
        }
        Ok(())
    }

    fn perform<R: FnMut(&BarSequence)>(&mut self, effect: Effect, render: &mut R) -> io::Result<Option<Input>> {
        match effect {
            Effect::Begin => {
                let started = self.sequence.begin();
                if started {
                    let state = self.sequence.current().state();
                    debug!(
                        "node {} starts a leg {:?} from {}",
                        self.sequence.current_index(),
                        state.direction(),
                        state.scale()
                    );
                }
                Ok(started.then_some(Input::Started))
            }
            Effect::Advance => {
                let settled = self.sequence.advance();
                if settled {
                    self.legs += 1;
                    info!(
                        "leg {} settled, node {} is next walking {:?}",
                        self.legs,
                        self.sequence.current_index(),
                        self.sequence.oscillation()
                    );
                }
                Ok(settled.then_some(Input::Settled))
            }
            Effect::StartTicker => {
                if let Err(e) = self.ticker.start() {
                    warn!("ticker failed to start, dropping leg on node {}: {e}", self.sequence.current_index());
                    self.sequence.cancel();
                    self.phase = Phase::Idle;
                    return Err(e);
                }
                Ok(None)
            }
            Effect::StopTicker => {
                self.ticker.stop();
                Ok(None)
            }
            Effect::Render => {
                render(&self.sequence);
                Ok(None)
            }
        }
    }
}
