//! Logical input.
//!
//! The simulation only sees [`InputSnapshot`]s: the key transitions that
//! happened since the previous tick, in arrival order.  [`TerminalInput`]
//! builds them from crossterm events delivered over a channel.

use std::collections::HashMap;
use std::io;
use std::sync::mpsc::{self, TryRecvError};
use std::thread;

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Once auto-repeat is flowing, a key is considered released after this
/// many polls without a press or repeat.  Only used on terminals that never
/// report key releases; OS key-repeat (≥ 15 Hz) refreshes it well within the
/// window at 30 ticks/s.
///
/// Those terminals cannot tell a second real press from auto-repeat, so
/// pressing Fire again while it still counts as held does not fire again.
pub const HOLD_WINDOW: u64 = 4;

/// Silence allowed between the first press and the first auto-repeat.
/// Covers the usual 250–660 ms OS repeat delay at 30 ticks/s.
pub const INITIAL_HOLD_WINDOW: u64 = 20;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    MoveLeft,
    MoveRight,
    Fire,
    Quit,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyTransition {
    Pressed(Key),
    Released(Key),
}

/// Key transitions collected for one tick.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InputSnapshot {
    transitions: Vec<KeyTransition>,
}

impl InputSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn press(key: Key) -> Self {
        Self::new().with_press(key)
    }

    pub fn release(key: Key) -> Self {
        Self::new().with_release(key)
    }

    pub fn with_press(mut self, key: Key) -> Self {
        self.push(KeyTransition::Pressed(key));
        self
    }

    pub fn with_release(mut self, key: Key) -> Self {
        self.push(KeyTransition::Released(key));
        self
    }

    pub fn push(&mut self, transition: KeyTransition) {
        self.transitions.push(transition);
    }

    /// All transitions, oldest first.
    pub fn transitions(&self) -> &[KeyTransition] {
        &self.transitions
    }

    pub fn pressed(&self) -> impl Iterator<Item = Key> + '_ {
        self.transitions.iter().filter_map(|t| match t {
            KeyTransition::Pressed(key) => Some(*key),
            KeyTransition::Released(_) => None,
        })
    }

    pub fn released(&self) -> impl Iterator<Item = Key> + '_ {
        self.transitions.iter().filter_map(|t| match t {
            KeyTransition::Released(key) => Some(*key),
            KeyTransition::Pressed(_) => None,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.transitions.is_empty()
    }
}

/// Supplies one snapshot per tick.
pub trait InputSource {
    fn poll(&mut self) -> InputSnapshot;
}

/// Physical → logical key mapping.
pub fn key_for(code: KeyCode, modifiers: KeyModifiers) -> Option<Key> {
    match code {
        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => Some(Key::Quit),
        KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('A') => Some(Key::MoveLeft),
        KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('D') => Some(Key::MoveRight),
        KeyCode::Char(' ') => Some(Key::Fire),
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => Some(Key::Quit),
        _ => None,
    }
}

// ── Terminal input ────────────────────────────────────────────────────────────

/// Turns the raw crossterm event stream into edge-triggered snapshots.
///
/// Works on two classes of terminal:
/// * **Keyboard-enhancement capable** (kitty protocol): real `Press` /
///   `Repeat` / `Release` events, so releases are reported as they happen.
/// * **Classic terminals**: only `Press` events, with OS key-repeat showing
///   up as more presses.  A held key stays down while repeats keep coming
///   and is released after [`HOLD_WINDOW`] polls of silence.
pub struct TerminalInput {
    rx: mpsc::Receiver<Event>,
    reports_releases: bool,
    held: HashMap<Key, Held>,
    frame: u64,
    closed: bool,
}

#[derive(Clone, Copy, Debug)]
struct Held {
    /// Poll number the key was last seen on.
    last: u64,
    /// Seen again since the press, i.e. auto-repeat has started.
    repeating: bool,
}

impl Held {
    fn window(&self) -> u64 {
        if self.repeating {
            HOLD_WINDOW
        } else {
            INITIAL_HOLD_WINDOW
        }
    }
}

impl TerminalInput {
    pub fn new(rx: mpsc::Receiver<Event>, reports_releases: bool) -> Self {
        Self {
            rx,
            reports_releases,
            held: HashMap::new(),
            frame: 0,
            closed: false,
        }
    }

    fn on_key(&mut self, event: KeyEvent, snapshot: &mut InputSnapshot) {
        let Some(key) = key_for(event.code, event.modifiers) else {
            return;
        };
        match event.kind {
            KeyEventKind::Press | KeyEventKind::Repeat => match self.held.get_mut(&key) {
                Some(held) => {
                    held.last = self.frame;
                    held.repeating = true;
                }
                None => {
                    let held = Held {
                        last: self.frame,
                        repeating: false,
                    };
                    self.held.insert(key, held);
                    snapshot.push(KeyTransition::Pressed(key));
                }
            },
            KeyEventKind::Release => {
                if self.held.remove(&key).is_some() {
                    snapshot.push(KeyTransition::Released(key));
                }
            }
        }
    }

    fn expire_stale(&mut self, snapshot: &mut InputSnapshot) {
        let frame = self.frame;
        let mut stale: Vec<Key> = self
            .held
            .iter()
            .filter(|(_, held)| frame.saturating_sub(held.last) > held.window())
            .map(|(&key, _)| key)
            .collect();
        // HashMap order is arbitrary; keep snapshots deterministic.
        stale.sort_by_key(|key| *key as u8);
        for key in stale {
            self.held.remove(&key);
            snapshot.push(KeyTransition::Released(key));
        }
    }
}

impl InputSource for TerminalInput {
    /// Drain every pending event without blocking.
    fn poll(&mut self) -> InputSnapshot {
        self.frame += 1;
        let mut snapshot = InputSnapshot::new();

        loop {
            match self.rx.try_recv() {
                Ok(Event::Key(key_event)) => self.on_key(key_event, &mut snapshot),
                Ok(_) => {}
                Err(TryRecvError::Empty) => break,
                // Nothing can ever quit the game otherwise.
                Err(TryRecvError::Disconnected) => {
                    if !self.closed {
                        self.closed = true;
                        log::error!("input stream closed, quitting");
                        snapshot.push(KeyTransition::Pressed(Key::Quit));
                    }
                    break;
                }
            }
        }

        if !self.reports_releases {
            self.expire_stale(&mut snapshot);
        }

        if !snapshot.is_empty() {
            log::trace!("input: {:?}", snapshot.transitions());
        }
        snapshot
    }
}

/// Read terminal events on a dedicated thread, so the game loop never blocks
/// on I/O.  The channel closes when `read` fails.
pub fn spawn_reader<F>(mut read: F) -> mpsc::Receiver<Event>
where
    F: FnMut() -> io::Result<Event> + Send + 'static,
{
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || loop {
        match read() {
            Ok(ev) => {
                if tx.send(ev).is_err() {
                    break; // receiver dropped → program exiting
                }
            }
            Err(e) => {
                log::error!("terminal event reader stopped: {}", e);
                break;
            }
        }
    });
    rx
}
