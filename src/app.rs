use crate::{
    animation::{BarSequence, Controller, ThreadTicker, TickToken},
    config::Config,
    render::{CanvasSurface, TerminalPresenter},
};
use crossterm::{
    cursor::{Hide, Show},
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers,
        MouseEvent, MouseEventKind,
    },
    execute,
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
};
use log::{debug, info, trace, warn};
use std::{
    io::{self, Stdout, Write},
    sync::mpsc::{Receiver, Sender, channel},
    thread,
};

/// Everything the dispatch loop reacts to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum AppEvent {
    Tap,
    Tick(TickToken),
    Resize(u16, u16),
    Quit,
}

impl From<TickToken> for AppEvent {
    fn from(token: TickToken) -> Self {
        Self::Tick(token)
    }
}

/// Map a terminal event onto what it means for the animation, if anything.
pub(crate) fn translate(event: Event) -> Option<AppEvent> {
    match event {
        Event::Mouse(MouseEvent { kind: MouseEventKind::Down(_), .. }) => Some(AppEvent::Tap),
        Event::Key(KeyEvent { code, modifiers, kind: KeyEventKind::Press, .. }) => match code {
            KeyCode::Char(' ') | KeyCode::Enter => Some(AppEvent::Tap),
            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => Some(AppEvent::Quit),
            KeyCode::Char('q') | KeyCode::Esc => Some(AppEvent::Quit),
            _ => None,
        },
        Event::Resize(columns, rows) => Some(AppEvent::Resize(columns, rows)),
        _ => None,
    }
}

/// Puts the terminal into the mode the animation needs and restores it when dropped.
struct TerminalGuard {
    stdout: Stdout,
}

impl TerminalGuard {
    fn enter() -> io::Result<Self> {
        let mut stdout = io::stdout();
        terminal::enable_raw_mode()?;
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture, Hide)?;
        Ok(Self { stdout })
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        if let Err(e) = execute!(self.stdout, Show, DisableMouseCapture, LeaveAlternateScreen) {
            warn!("failed to restore terminal screen: {e}");
        }
        if let Err(e) = terminal::disable_raw_mode() {
            warn!("failed to disable raw mode: {e}");
        }
    }
}

/// The interactive terminal animation.
pub(crate) struct App {
    config: Config,
}

impl App {
    pub(crate) fn new(config: Config) -> Self {
        Self { config }
    }

    pub(crate) fn run(self) -> Result<(), AppError> {
        let _guard = TerminalGuard::enter()?;
        let (sender, receiver) = channel();
        spawn_input_reader(sender.clone())?;

        let (columns, rows) = terminal::size()?;
        let (width, height) = TerminalPresenter::<Stdout>::canvas_size(columns, rows);
        let mut surface = CanvasSurface::new(&self.config, width, height);
        let mut presenter = TerminalPresenter::new(io::stdout());
        let sequence = BarSequence::new(self.config.palette.len(), self.config.step);
        let ticker = ThreadTicker::new(sender, self.config.tick_period());
        let mut controller = Controller::new(sequence, ticker);
        info!("animating {} colors in a {columns}x{rows} terminal", controller.sequence().len());

        draw_frame(&mut surface, &mut presenter, controller.sequence())?;
        dispatch(&mut controller, &receiver, &mut surface, &mut presenter)
    }
}

fn spawn_input_reader(sender: Sender<AppEvent>) -> io::Result<()> {
    thread::Builder::new().name("input".into()).spawn(move || {
        loop {
            let event = match event::read() {
                Ok(event) => event,
                Err(e) => {
                    warn!("failed to read terminal input: {e}");
                    let _ = sender.send(AppEvent::Quit);
                    return;
                }
            };
            if let Some(event) = translate(event) {
                if sender.send(event).is_err() {
                    return;
                }
            }
        }
    })?;
    Ok(())
}

fn dispatch<W: Write>(
    controller: &mut Controller<ThreadTicker<AppEvent>>,
    receiver: &Receiver<AppEvent>,
    surface: &mut CanvasSurface,
    presenter: &mut TerminalPresenter<W>,
) -> Result<(), AppError> {
    loop {
        let event = receiver.recv().map_err(|_| AppError::Disconnected)?;
        if let AppEvent::Resize(columns, rows) = event {
            let (width, height) = TerminalPresenter::<W>::canvas_size(columns, rows);
            surface.resize(width, height);
        }
        let mut failure = None;
        let mut render = |sequence: &BarSequence| {
            if failure.is_none() {
                failure = draw_frame(surface, presenter, sequence).err();
            }
        };
        match event {
            AppEvent::Tap if controller.sequence().is_animating() => debug!("ignoring tap mid-leg"),
            AppEvent::Tap => controller.on_tap(&mut render).map_err(AppError::Ticker)?,
            AppEvent::Tick(token) if controller.ticker().accepts(token) => {
                controller.on_tick(&mut render).map_err(AppError::Ticker)?
            }
            AppEvent::Tick(_) => debug!("dropping tick from a stopped ticker run"),
            AppEvent::Resize(..) => render(controller.sequence()),
            AppEvent::Quit => {
                info!("quitting after {} legs", controller.legs());
                return Ok(());
            }
        }
        if let Some(e) = failure {
            return Err(e.into());
        }
        trace!("{event:?} handled, controller is {:?}", controller.phase());
    }
}

fn draw_frame<W: Write>(
    surface: &mut CanvasSurface,
    presenter: &mut TerminalPresenter<W>,
    sequence: &BarSequence,
) -> io::Result<()> {
    surface.begin_frame();
    sequence.draw(surface);
    presenter.present(surface.canvas())
}

#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("terminal error: {0}")]
    Terminal(#[from] io::Error),

    #[error("failed to start the tick timer: {0}")]
    Ticker(io::Error),

    #[error("event channel closed unexpectedly")]
    Disconnected,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::Ticker;
    use crossterm::event::MouseButton;
    use rstest::rstest;

    fn key(code: KeyCode, modifiers: KeyModifiers, kind: KeyEventKind) -> Event {
        Event::Key(KeyEvent::new_with_kind(code, modifiers, kind))
    }

    fn press(code: KeyCode) -> Event {
        key(code, KeyModifiers::NONE, KeyEventKind::Press)
    }

    fn mouse(kind: MouseEventKind) -> Event {
        Event::Mouse(MouseEvent { kind, column: 3, row: 4, modifiers: KeyModifiers::NONE })
    }

    #[rstest]
    #[case::space(press(KeyCode::Char(' ')), Some(AppEvent::Tap))]
    #[case::enter(press(KeyCode::Enter), Some(AppEvent::Tap))]
    #[case::click(mouse(MouseEventKind::Down(MouseButton::Left)), Some(AppEvent::Tap))]
    #[case::right_click(mouse(MouseEventKind::Down(MouseButton::Right)), Some(AppEvent::Tap))]
    #[case::mouse_up(mouse(MouseEventKind::Up(MouseButton::Left)), None)]
    #[case::mouse_move(mouse(MouseEventKind::Moved), None)]
    #[case::q(press(KeyCode::Char('q')), Some(AppEvent::Quit))]
    #[case::esc(press(KeyCode::Esc), Some(AppEvent::Quit))]
    #[case::ctrl_c(key(KeyCode::Char('c'), KeyModifiers::CONTROL, KeyEventKind::Press), Some(AppEvent::Quit))]
    #[case::plain_c(press(KeyCode::Char('c')), None)]
    #[case::release(key(KeyCode::Char(' '), KeyModifiers::NONE, KeyEventKind::Release), None)]
    #[case::resize(Event::Resize(80, 24), Some(AppEvent::Resize(80, 24)))]
    #[case::focus(Event::FocusGained, None)]
    fn translates_terminal_events(#[case] event: Event, #[case] expected: Option<AppEvent>) {
        assert_eq!(translate(event), expected);
    }

    #[test]
    fn dispatch_drives_a_leg_and_quits() {
        let config = Config { step: 0.25, tick_period_ms: 1, ..Default::default() };
        let (sender, receiver) = channel();
        let ticker = ThreadTicker::new(sender.clone(), config.tick_period());
        let mut controller = Controller::new(BarSequence::new(config.palette.len(), config.step), ticker);
        let mut surface = CanvasSurface::new(&config, 20, 20);
        let mut presenter = TerminalPresenter::new(Vec::new());

        sender.send(AppEvent::Tap).expect("send failed");
        thread::spawn(move || {
            thread::sleep(std::time::Duration::from_millis(500));
            let _ = sender.send(AppEvent::Quit);
        });
        dispatch(&mut controller, &receiver, &mut surface, &mut presenter).expect("dispatch failed");

        assert_eq!(controller.legs(), 1);
        assert_eq!(controller.sequence().current_index(), 1);
        assert!(!controller.ticker().is_running());
        assert!(!presenter.into_inner().is_empty());
    }

    #[test]
    fn resize_redraws_at_new_size() {
        let config = Config::default();
        let (sender, receiver) = channel();
        let ticker = ThreadTicker::new(sender.clone(), config.tick_period());
        let mut controller = Controller::new(BarSequence::new(5, config.step), ticker);
        let mut surface = CanvasSurface::new(&config, 20, 20);
        let mut presenter = TerminalPresenter::new(Vec::new());

        sender.send(AppEvent::Resize(10, 5)).expect("send failed");
        sender.send(AppEvent::Quit).expect("send failed");
        dispatch(&mut controller, &receiver, &mut surface, &mut presenter).expect("dispatch failed");

        assert_eq!((surface.canvas().width(), surface.canvas().height()), (10, 10));
        let output = String::from_utf8(presenter.into_inner()).expect("not utf8");
        assert_eq!(output.matches('▀').count(), 50);
    }
}
