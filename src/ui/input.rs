/// Keyboard input tracker.
///
/// Drains every pending terminal event once per tick and keeps only the
/// last direction key seen; missed keys are fine, the next tick corrects.
/// Release events are ignored, so terminals without keyboard enhancement
/// behave the same as those with it.

use std::time::Duration;

use crossterm::event::{self, poll, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::domain::rules::Direction;

const KEYS_UP: &[KeyCode] = &[KeyCode::Up, KeyCode::Char('w'), KeyCode::Char('W')];
const KEYS_DOWN: &[KeyCode] = &[KeyCode::Down, KeyCode::Char('s'), KeyCode::Char('S')];
const KEYS_LEFT: &[KeyCode] = &[KeyCode::Left, KeyCode::Char('a'), KeyCode::Char('A')];
const KEYS_RIGHT: &[KeyCode] = &[KeyCode::Right, KeyCode::Char('d'), KeyCode::Char('D')];
const KEYS_QUIT: &[KeyCode] = &[KeyCode::Esc, KeyCode::Char('q'), KeyCode::Char('Q')];

pub struct InputState {
    /// Last direction pressed since the previous `take_direction()`.
    pending: Direction,
    quit: bool,
}

impl InputState {
    pub fn new() -> Self {
        InputState { pending: Direction::None, quit: false }
    }

    /// Drain all pending terminal events without blocking.
    pub fn drain_events(&mut self) -> std::io::Result<()> {
        while poll(Duration::ZERO)? {
            if let Event::Key(key) = event::read()? {
                self.handle_key(key);
            }
        }
        Ok(())
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if key.kind == KeyEventKind::Release {
            return;
        }
        if key.modifiers.contains(KeyModifiers::CONTROL)
            && matches!(key.code, KeyCode::Char('c') | KeyCode::Char('C'))
        {
            self.quit = true;
            return;
        }
        if KEYS_QUIT.contains(&key.code) {
            self.quit = true;
            return;
        }
        if let Some(dir) = direction_for(key.code) {
            self.pending = dir;
        }
    }

    /// This tick's direction; resets to `None` for the next tick.
    pub fn take_direction(&mut self) -> Direction {
        std::mem::take(&mut self.pending)
    }

    pub fn quit_requested(&self) -> bool {
        self.quit
    }
}

fn direction_for(code: KeyCode) -> Option<Direction> {
    if KEYS_UP.contains(&code) {
        Some(Direction::Up)
    } else if KEYS_DOWN.contains(&code) {
        Some(Direction::Down)
    } else if KEYS_LEFT.contains(&code) {
        Some(Direction::Left)
    } else if KEYS_RIGHT.contains(&code) {
        Some(Direction::Right)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn last_direction_wins() {
        let mut input = InputState::new();
        input.handle_key(press(KeyCode::Up));
        input.handle_key(press(KeyCode::Char('d')));
        assert_eq!(input.take_direction(), Direction::Right);
        assert_eq!(input.take_direction(), Direction::None);
    }

    #[test]
    fn release_is_ignored() {
        let mut input = InputState::new();
        let mut ev = press(KeyCode::Left);
        ev.kind = KeyEventKind::Release;
        input.handle_key(ev);
        assert_eq!(input.take_direction(), Direction::None);
    }

    #[test]
    fn quit_keys() {
        let mut input = InputState::new();
        input.handle_key(press(KeyCode::Char('x')));
        assert!(!input.quit_requested());
        input.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(input.quit_requested());

        let mut input = InputState::new();
        input.handle_key(press(KeyCode::Esc));
        assert!(input.quit_requested());
    }
}
