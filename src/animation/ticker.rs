use log::debug;
use std::io;
use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
    mpsc::Sender,
};
use std::thread;
use std::time::{Duration, Instant};

/// A repeating timer with two states: idle and running.
pub(crate) trait Ticker {
    /// Start ticking. Does nothing if already running.
    ///
    /// On error the ticker stays idle.
    fn start(&mut self) -> io::Result<()>;

    /// Stop ticking. Does nothing if already idle.
    fn stop(&mut self);

    fn is_running(&self) -> bool;
}

/// Identifies the run of a ticker that produced a tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct TickToken(u64);

#[derive(Debug)]
struct Run {
    generation: u64,
    cancelled: Arc<AtomicBool>,
}

/// A ticker that sends a tick into a channel from a background thread every period.
///
/// A tick may already be queued in the channel when the ticker is stopped. Receivers must check
/// every tick with [ThreadTicker::accepts] so nothing from a cancelled run is ever acted on.
#[derive(Debug)]
pub(crate) struct ThreadTicker<E> {
    sender: Sender<E>,
    period: Duration,
    generation: u64,
    run: Option<Run>,
}

impl<E> ThreadTicker<E>
where
    E: From<TickToken> + Send + 'static,
{
    pub(crate) fn new(sender: Sender<E>, period: Duration) -> Self {
        Self { sender, period, generation: 0, run: None }
    }

    /// Whether a tick belongs to the run that is currently live.
    pub(crate) fn accepts(&self, token: TickToken) -> bool {
        self.run.as_ref().is_some_and(|run| run.generation == token.0)
    }

    fn spawn(&self, generation: u64, cancelled: Arc<AtomicBool>) -> io::Result<()> {
        let sender = self.sender.clone();
        let period = self.period;
        thread::Builder::new().name(format!("ticker-{generation}")).spawn(move || {
            let mut deadline = Instant::now() + period;
            loop {
                thread::sleep(deadline.saturating_duration_since(Instant::now()));
                if cancelled.load(Ordering::Acquire) {
                    break;
                }
                if sender.send(E::from(TickToken(generation))).is_err() {
                    break;
                }
                deadline += period;
            }
        })?;
        Ok(())
    }
}

impl<E> Ticker for ThreadTicker<E>
where
    E: From<TickToken> + Send + 'static,
{
    fn start(&mut self) -> io::Result<()> {
        if self.run.is_some() {
            return Ok(());
        }
        let generation = self.generation + 1;
        let cancelled = Arc::new(AtomicBool::new(false));
        self.spawn(generation, cancelled.clone())?;
        debug!("ticker run {generation} started, period {:?}", self.period);
        self.generation = generation;
        self.run = Some(Run { generation, cancelled });
        Ok(())
    }

    fn stop(&mut self) {
        if let Some(run) = self.run.take() {
            run.cancelled.store(true, Ordering::Release);
            debug!("ticker run {} stopped", run.generation);
        }
    }

    fn is_running(&self) -> bool {
        self.run.is_some()
    }
}

impl<E> Drop for ThreadTicker<E> {
    fn drop(&mut self) {
        if let Some(run) = self.run.take() {
            run.cancelled.store(true, Ordering::Release);
        }
    }
}

/// A ticker that never fires on its own. Whoever owns it ticks by hand while it is running.
#[derive(Debug, Default)]
pub(crate) struct ManualTicker {
    running: bool,
    pub(crate) starts: usize,
    pub(crate) stops: usize,
}

impl Ticker for ManualTicker {
    fn start(&mut self) -> io::Result<()> {
        if !self.running {
            self.running = true;
            self.starts += 1;
        }
        Ok(())
    }

    fn stop(&mut self) {
        if self.running {
            self.running = false;
            self.stops += 1;
        }
    }

    fn is_running(&self) -> bool {
        self.running
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc::{Receiver, channel};

    const PERIOD: Duration = Duration::from_millis(5);

    fn ticker() -> (ThreadTicker<TickToken>, Receiver<TickToken>) {
        let (sender, receiver) = channel();
        (ThreadTicker::new(sender, PERIOD), receiver)
    }

    #[test]
    fn starts_idle() {
        let (ticker, _receiver) = ticker();
        assert!(!ticker.is_running());
        assert!(!ticker.accepts(TickToken(0)));
    }

    #[test]
    fn ticks_while_running() {
        let (mut ticker, receiver) = ticker();
        ticker.start().expect("start failed");
        assert!(ticker.is_running());
        let token = receiver.recv_timeout(Duration::from_secs(2)).expect("no tick");
        assert!(ticker.accepts(token));
        ticker.stop();
    }

    #[test]
    fn double_start_runs_a_single_timer() {
        let (mut ticker, receiver) = ticker();
        ticker.start().expect("start failed");
        ticker.start().expect("second start failed");
        let first = receiver.recv_timeout(Duration::from_secs(2)).expect("no tick");
        for _ in 0..5 {
            let token = receiver.recv_timeout(Duration::from_secs(2)).expect("no tick");
            assert_eq!(token, first);
        }
        ticker.stop();
    }

    #[test]
    fn double_stop_is_safe() {
        let (mut ticker, _receiver) = ticker();
        ticker.stop();
        ticker.start().expect("start failed");
        ticker.stop();
        ticker.stop();
        assert!(!ticker.is_running());
    }

    #[test]
    fn ticks_from_a_stopped_run_are_rejected() {
        let (mut ticker, receiver) = ticker();
        ticker.start().expect("start failed");
        let stale = receiver.recv_timeout(Duration::from_secs(2)).expect("no tick");
        ticker.stop();
        assert!(!ticker.accepts(stale));

        ticker.start().expect("start failed");
        assert!(!ticker.accepts(stale));
        let fresh = loop {
            let token = receiver.recv_timeout(Duration::from_secs(2)).expect("no tick");
            if token != stale {
                break token;
            }
        };
        assert!(ticker.accepts(fresh));
        ticker.stop();
    }

    #[test]
    fn manual_ticker_counts_transitions() {
        let mut ticker = ManualTicker::default();
        ticker.stop();
        ticker.start().expect("start failed");
        ticker.start().expect("second start failed");
        assert!(ticker.is_running());
        ticker.stop();
        ticker.stop();
        assert_eq!((ticker.starts, ticker.stops), (1, 1));
        assert!(!ticker.is_running());
    }
}
