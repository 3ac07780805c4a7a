use crate::{
    animation::{BarSequence, Controller, ManualTicker, Ticker},
    config::Config,
};
use log::debug;
use std::io::{self, Write};

/// Upper bound on ticks per leg so a tiny step can never spin forever.
const MAX_TICKS_PER_LEG: usize = 1_000_000;

/// One completed leg of the simulation.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Leg {
    pub(crate) node: usize,
    pub(crate) from: f64,
    pub(crate) to: f64,
    pub(crate) ticks: usize,
    pub(crate) frames: usize,
}

/// Play `taps` taps without a terminal, letting each leg settle before the next tap.
pub(crate) fn simulate(config: &Config, taps: usize) -> Result<Vec<Leg>, SimulateError> {
    simulate_with_limit(config, taps, MAX_TICKS_PER_LEG)
}

fn simulate_with_limit(config: &Config, taps: usize, max_ticks: usize) -> Result<Vec<Leg>, SimulateError> {
    let sequence = BarSequence::new(config.palette.len(), config.step);
    let mut controller = Controller::new(sequence, ManualTicker::default());
    let mut legs = Vec::with_capacity(taps);
    for _ in 0..taps {
        let node = controller.sequence().current().index();
        let from = controller.sequence().current_scale();
        let mut frames = 0;
        controller.on_tap(&mut |_| frames += 1)?;
        let mut ticks = 0;
        while controller.ticker().is_running() {
            if ticks == max_ticks {
                return Err(SimulateError::Unsettled { leg: legs.len() + 1, ticks });
            }
            controller.on_tick(&mut |_| frames += 1)?;
            ticks += 1;
        }
        let to = controller.sequence().node(node).map(|node| node.state().target_scale()).unwrap_or(from);
        legs.push(Leg { node, from, to, ticks, frames });
    }
    let ticker = controller.ticker();
    debug!("simulated {} legs, ticker started {} times and stopped {} times", legs.len(), ticker.starts, ticker.stops);
    Ok(legs)
}

pub(crate) fn write_legs<W: Write>(legs: &[Leg], mut writer: W) -> io::Result<()> {
    for (number, leg) in legs.iter().enumerate() {
        writeln!(
            writer,
            "leg {}: node {} {} -> {} ({} ticks, {} frames)",
            number + 1,
            leg.node,
            leg.from,
            leg.to,
            leg.ticks,
            leg.frames
        )?;
    }
    writer.flush()
}

#[derive(thiserror::Error, Debug)]
pub enum SimulateError {
    #[error("leg {leg} did not settle within {ticks} ticks, the step is too small")]
    Unsettled { leg: usize, ticks: usize },

    #[error("failed to start the tick timer: {0}")]
    Ticker(#[from] io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_walks_forward_and_back() {
        let legs = simulate(&Config::default(), 11).expect("simulation failed");
        let nodes: Vec<_> = legs.iter().map(|leg| leg.node).collect();
        assert_eq!(nodes, vec![0, 1, 2, 3, 4, 4, 3, 2, 1, 0, 0]);
        for leg in &legs {
            assert_eq!(leg.ticks, 50);
            assert_eq!(leg.frames, 51);
        }
    }

    #[test]
    fn legs_alternate_between_extremes_per_node() {
        let legs = simulate(&Config::default(), 7).expect("simulation failed");
        let extremes: Vec<_> = legs.iter().map(|leg| (leg.from, leg.to)).collect();
        let grow = (0.0, 1.0);
        let shrink = (1.0, 0.0);
        assert_eq!(extremes, vec![grow, grow, grow, grow, grow, shrink, shrink]);
    }

    #[test]
    fn single_color_bounces_in_place() {
        let config = Config { palette: vec![Config::default().palette[0]], ..Default::default() };
        let nodes: Vec<_> = simulate(&config, 4).expect("simulation failed").iter().map(|leg| leg.node).collect();
        assert_eq!(nodes, vec![0, 0, 0, 0]);
    }

    #[test]
    fn stops_at_a_leg_that_never_settles() {
        let error = simulate_with_limit(&Config::default(), 3, 10).expect_err("leg settled");
        assert!(matches!(error, SimulateError::Unsettled { leg: 1, ticks: 10 }), "{error}");
    }

    #[test]
    fn limit_that_fits_a_leg_is_not_an_error() {
        let legs = simulate_with_limit(&Config::default(), 2, 50).expect("simulation failed");
        assert_eq!(legs.len(), 2);
    }

    #[test]
    fn output_has_one_line_per_leg() {
        let legs = simulate(&Config::default(), 2).expect("simulation failed");
        let mut output = Vec::new();
        write_legs(&legs, &mut output).expect("write failed");
        let output = String::from_utf8(output).expect("not utf8");
        assert_eq!(
            output,
            "leg 1: node 0 0 -> 1 (50 ticks, 51 frames)\nleg 2: node 1 0 -> 1 (50 ticks, 51 frames)\n"
        );
    }
}
