use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::time::Duration;

use crossterm::event::{self, Event as CtEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Unified event type consumed by the drill loop
#[derive(Clone, Debug)]
pub enum DrillEvent {
    Key(KeyEvent),
    Tick,
    /// The event source went away
    Closed,
}

/// Source of terminal key events
pub trait DrillEventSource: Send + 'static {
    /// Block for up to `timeout` waiting for an event.
    /// Returns Ok(event) if an event arrives before the timeout, or Err(Timeout) if it expires.
    fn recv_timeout(&self, timeout: Duration) -> Result<DrillEvent, RecvTimeoutError>;
}

/// Production event source using crossterm
pub struct CrosstermEventSource {
    rx: Receiver<DrillEvent>,
}

impl CrosstermEventSource {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();

        std::thread::spawn(move || loop {
            match event::read() {
                Ok(CtEvent::Key(key)) if key.kind != KeyEventKind::Release => {
                    if tx.send(DrillEvent::Key(key)).is_err() {
                        break;
                    }
                }
                Ok(_) => {}
                Err(_) => break,
            }
        });

        Self { rx }
    }
}

impl Default for CrosstermEventSource {
    fn default() -> Self {
        Self::new()
    }
}

impl DrillEventSource for CrosstermEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<DrillEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Test event source for unit tests
pub struct TestEventSource {
    rx: Receiver<DrillEvent>,
}

impl TestEventSource {
    pub fn new(rx: Receiver<DrillEvent>) -> Self {
        Self { rx }
    }
}

impl DrillEventSource for TestEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<DrillEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Result of collecting the keys for one trial
#[derive(Debug, Clone, PartialEq)]
pub enum KeyRead {
    Typed(String),
    Quit,
}

/// Runner that advances the drill one event/tick at a time
pub struct Runner<E: DrillEventSource> {
    event_source: E,
    tick: Duration,
}

impl<E: DrillEventSource> Runner<E> {
    pub fn new(event_source: E, tick: Duration) -> Self {
        Self { event_source, tick }
    }

    /// Blocks up to the tick interval and returns the next event, or Tick on timeout
    pub fn step(&self) -> DrillEvent {
        match self.event_source.recv_timeout(self.tick) {
            Ok(ev) => ev,
            Err(RecvTimeoutError::Timeout) => DrillEvent::Tick,
            Err(RecvTimeoutError::Disconnected) => DrillEvent::Closed,
        }
    }

    /// Collect `count` typed characters, calling `on_char` for each one.
    /// Esc or Ctrl-C ends the session; other non-character keys are ignored.
    /// `max_ticks` bounds how long to wait in total.
    pub fn read_keys(
        &self,
        count: usize,
        max_ticks: Option<usize>,
        mut on_char: impl FnMut(char),
    ) -> KeyRead {
        let mut typed = String::new();
        let mut typed_count = 0;
        let mut ticks = 0;

        while typed_count < count {
            match self.step() {
                DrillEvent::Closed => return KeyRead::Quit,
                DrillEvent::Tick => {
                    ticks += 1;
                    if max_ticks.is_some_and(|max| ticks >= max) {
                        return KeyRead::Quit;
                    }
                }
                DrillEvent::Key(key) => match key.code {
                    KeyCode::Esc => return KeyRead::Quit,
                    KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                        return KeyRead::Quit
                    }
                    KeyCode::Char(c) => {
                        typed.push(c);
                        typed_count += 1;
                        on_char(c);
                    }
                    _ => {}
                },
            }
        }

        KeyRead::Typed(typed)
    }
}
