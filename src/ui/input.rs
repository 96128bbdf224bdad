/// Keyboard input.
///
/// Terminal events are drained without blocking into a `KeyQueue` of game
/// keys. The tick loop takes at most one turn per snake from the queue each
/// tick; further presses wait for later ticks, so a quick double tap can
/// never add up to a reversal inside a single move.
///
/// Waiting screens (banners, prompts) use `await_key`: drop whatever was
/// typed before the wait, then poll at a fixed interval until a matching key
/// arrives. Ctrl+C ends any wait with `NibblesError::Interrupted`.

use std::collections::VecDeque;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::domain::snake::Direction;
use crate::error::{NibblesError, Result};
use crate::sim::step::TickInput;
use super::gamepad::GamepadState;

/// Poll interval for waiting screens.
pub const WAIT_POLL: Duration = Duration::from_millis(10);

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Key {
    /// Turn for snake 0 (arrows) or snake 1 (W/A/S/D).
    Steer(usize, Direction),
    Pause,
    Char(char),
    Enter,
    Backspace,
    Interrupt,
}

impl Key {
    /// Same key ignoring letter case, for Y/N style prompts.
    pub fn is_char(self, want: char) -> bool {
        match self {
            Key::Char(c) => c.eq_ignore_ascii_case(&want),
            Key::Pause => want.eq_ignore_ascii_case(&'p'),
            Key::Steer(1, dir) => wasd(dir).eq_ignore_ascii_case(&want),
            _ => false,
        }
    }

    /// Printable character this key would type, if any.
    pub fn as_char(self) -> Option<char> {
        match self {
            Key::Char(c) => Some(c),
            Key::Pause => Some('p'),
            Key::Steer(1, dir) => Some(wasd(dir)),
            _ => None,
        }
    }
}

fn wasd(dir: Direction) -> char {
    match dir {
        Direction::Up => 'w',
        Direction::Left => 'a',
        Direction::Down => 's',
        Direction::Right => 'd',
    }
}

/// Game key for a terminal key event; None for keys the game ignores.
pub fn translate(key: KeyEvent) -> Option<Key> {
    if key.kind == KeyEventKind::Release {
        return None;
    }
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') | KeyCode::Char('C') => Some(Key::Interrupt),
            _ => None,
        };
    }
    let k = match key.code {
        KeyCode::Up => Key::Steer(0, Direction::Up),
        KeyCode::Down => Key::Steer(0, Direction::Down),
        KeyCode::Left => Key::Steer(0, Direction::Left),
        KeyCode::Right => Key::Steer(0, Direction::Right),
        KeyCode::Enter => Key::Enter,
        KeyCode::Backspace => Key::Backspace,
        KeyCode::Char(c) => match c.to_ascii_lowercase() {
            'w' => Key::Steer(1, Direction::Up),
            's' => Key::Steer(1, Direction::Down),
            'a' => Key::Steer(1, Direction::Left),
            'd' => Key::Steer(1, Direction::Right),
            'p' => Key::Pause,
            _ => Key::Char(c),
        },
        _ => return None,
    };
    Some(k)
}

/// Per-tick result of reading the queue.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TickKeys {
    pub input: TickInput,
    pub pause: bool,
    pub interrupt: bool,
}

#[derive(Default)]
pub struct KeyQueue {
    keys: VecDeque<Key>,
}

impl KeyQueue {
    pub fn push(&mut self, key: Key) {
        self.keys.push_back(key);
    }

    pub fn pop(&mut self) -> Option<Key> {
        self.keys.pop_front()
    }

    pub fn clear(&mut self) {
        self.keys.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Take this tick's keys: the oldest pending turn per snake, plus any
    /// pause or interrupt. Other typing is dropped; later turns stay queued.
    pub fn take_tick(&mut self) -> TickKeys {
        let mut out = TickKeys::default();
        let mut kept = VecDeque::new();
        while let Some(key) = self.keys.pop_front() {
            match key {
                Key::Steer(i, dir) if i < 2 => {
                    if out.input.steer[i].is_none() {
                        out.input.steer[i] = Some(dir);
                    } else {
                        kept.push_back(key);
                    }
                }
                Key::Pause => out.pause = true,
                Key::Interrupt => out.interrupt = true,
                _ => {}
            }
        }
        self.keys = kept;
        out
    }
}

pub struct InputState {
    queue: KeyQueue,
    gamepad: GamepadState,
}

impl InputState {
    pub fn new(gamepad: GamepadState) -> Self {
        InputState { queue: KeyQueue::default(), gamepad }
    }

    /// Move every pending terminal and gamepad event into the queue.
    pub fn drain_events(&mut self) -> Result<()> {
        while event::poll(Duration::ZERO)? {
            if let Event::Key(key) = event::read()? {
                if let Some(k) = translate(key) {
                    self.queue.push(k);
                }
            }
        }
        self.gamepad.update();
        for k in self.gamepad.keys() {
            self.queue.push(k);
        }
        Ok(())
    }

    /// Keys for one game tick.
    pub fn tick_keys(&mut self) -> Result<TickKeys> {
        self.drain_events()?;
        let keys = self.queue.take_tick();
        if keys.interrupt {
            return Err(NibblesError::Interrupted);
        }
        Ok(keys)
    }

    /// Forget anything typed so far.
    pub fn flush(&mut self) -> Result<()> {
        self.drain_events()?;
        self.queue.clear();
        Ok(())
    }

    /// Next key, waiting at most `timeout`.
    pub fn next_key(&mut self, timeout: Duration) -> Result<Option<Key>> {
        self.drain_events()?;
        if self.queue.is_empty() && event::poll(timeout)? {
            self.drain_events()?;
        }
        match self.queue.pop() {
            Some(Key::Interrupt) => Err(NibblesError::Interrupted),
            other => Ok(other),
        }
    }

    /// Block until a key accepted by `want` arrives. Earlier typing is dropped.
    pub fn await_key(&mut self, want: impl Fn(Key) -> bool, interval: Duration) -> Result<Key> {
        self.flush()?;
        loop {
            if let Some(k) = self.next_key(interval)? {
                if want(k) {
                    return Ok(k);
                }
            }
        }
    }
}
