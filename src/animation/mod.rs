mod controller;
mod node;
mod scale;
mod sequence;
mod ticker;

pub(crate) use controller::Controller;
pub(crate) use sequence::BarSequence;
pub(crate) use ticker::{ManualTicker, ThreadTicker, TickToken, Ticker};
