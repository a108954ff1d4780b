//! Hold tracker for terminal environments.
//!
//! Horizontal keys auto-repeat with DAS/ARR. Soft drop is a held state: the first press
//! starts it and a release (or, on terminals that never report releases, a quiet period
//! without repeats) stops it. Time is fed in explicitly through [`InputHandler::update`].

use crossterm::event::KeyCode;

use arrayvec::ArrayVec;

use crate::types::{Command, DEFAULT_ARR_MS, DEFAULT_DAS_MS, SOFT_DROP_GRACE_MS};

/// Direction for horizontal movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HorizontalDirection {
    Left,
    Right,
    None,
}

/// Tracks held keys and turns them into repeated or paired commands.
#[derive(Debug, Clone)]
pub struct InputHandler {
    horizontal: HorizontalDirection,
    down_held: bool,
    /// Milliseconds since the last movement key press.
    idle_ms: u32,
    das_timer: u32,
    arr_accumulator: u32,
    das_delay: u32,
    arr_rate: u32,
    key_release_timeout_ms: u32,
}

impl InputHandler {
    pub fn new() -> Self {
        Self::with_config(DEFAULT_DAS_MS, DEFAULT_ARR_MS)
    }

    pub fn with_config(das_delay: u32, arr_rate: u32) -> Self {
        Self {
            horizontal: HorizontalDirection::None,
            down_held: false,
            idle_ms: 0,
            das_timer: 0,
            arr_accumulator: 0,
            das_delay,
            arr_rate: arr_rate.max(1),
            key_release_timeout_ms: SOFT_DROP_GRACE_MS,
        }
    }

    pub fn with_key_release_timeout_ms(mut self, timeout_ms: u32) -> Self {
        self.key_release_timeout_ms = timeout_ms;
        self
    }

    pub fn key_release_timeout_ms(&self) -> u32 {
        self.key_release_timeout_ms
    }

    pub fn is_soft_drop_held(&self) -> bool {
        self.down_held
    }

    /// Register a key press. Returns the command to apply right away, if any.
    ///
    /// Repeats of an already held key only refresh the hold.
    pub fn handle_key_press(&mut self, code: KeyCode) -> Option<Command> {
        match code {
            KeyCode::Left | KeyCode::Char('h' | 'H' | 'a' | 'A') => {
                self.press_horizontal(HorizontalDirection::Left, Command::MoveLeft)
            }
            KeyCode::Right | KeyCode::Char('l' | 'L' | 'd' | 'D') => {
                self.press_horizontal(HorizontalDirection::Right, Command::MoveRight)
            }
            KeyCode::Down | KeyCode::Char('j' | 'J' | 's' | 'S') => {
                self.idle_ms = 0;
                if self.down_held {
                    None
                } else {
                    self.down_held = true;
                    Some(Command::SoftDropStart)
                }
            }
            _ => None,
        }
    }

    fn press_horizontal(
        &mut self,
        direction: HorizontalDirection,
        command: Command,
    ) -> Option<Command> {
        self.idle_ms = 0;
        if self.horizontal == direction {
            return None;
        }
        self.horizontal = direction;
        self.das_timer = 0;
        self.arr_accumulator = 0;
        Some(command)
    }

    /// Register a key release. Returns [`Command::SoftDropStop`] when it ends a soft drop.
    pub fn handle_key_release(&mut self, code: KeyCode) -> Option<Command> {
        match code {
            KeyCode::Left | KeyCode::Char('h' | 'H' | 'a' | 'A') => {
                self.release_horizontal(HorizontalDirection::Left);
                None
            }
            KeyCode::Right | KeyCode::Char('l' | 'L' | 'd' | 'D') => {
                self.release_horizontal(HorizontalDirection::Right);
                None
            }
            KeyCode::Down | KeyCode::Char('j' | 'J' | 's' | 'S') => self.release_down(),
            _ => None,
        }
    }

    fn release_horizontal(&mut self, direction: HorizontalDirection) {
        if self.horizontal == direction {
            self.horizontal = HorizontalDirection::None;
            self.das_timer = 0;
            self.arr_accumulator = 0;
        }
    }

    fn release_down(&mut self) -> Option<Command> {
        if !self.down_held {
            return None;
        }
        self.down_held = false;
        Some(Command::SoftDropStop)
    }

    /// Advance hold timers by `elapsed_ms` and collect the resulting commands.
    pub fn update(&mut self, elapsed_ms: u32) -> ArrayVec<Command, 32> {
        let mut commands = ArrayVec::<Command, 32>::new();

        // Auto-release when the terminal does not emit release events.
        self.idle_ms = self.idle_ms.saturating_add(elapsed_ms);
        if self.idle_ms > self.key_release_timeout_ms {
            self.release_horizontal(self.horizontal);
            if let Some(stop) = self.release_down() {
                let _ = commands.try_push(stop);
            }
        }

        let repeat = match self.horizontal {
            HorizontalDirection::Left => Command::MoveLeft,
            HorizontalDirection::Right => Command::MoveRight,
            HorizontalDirection::None => return commands,
        };

        let prev_das = self.das_timer;
        self.das_timer = self.das_timer.saturating_add(elapsed_ms);
        if self.das_timer >= self.das_delay {
            let excess = if prev_das < self.das_delay {
                self.das_timer - self.das_delay
            } else {
                elapsed_ms
            };
            self.arr_accumulator += excess;

            while self.arr_accumulator >= self.arr_rate {
                if commands.try_push(repeat).is_err() {
                    self.arr_accumulator = 0;
                    break;
                }
                self.arr_accumulator -= self.arr_rate;
            }
        }

        commands
    }

    /// Forget every held key, e.g. when the game pauses or restarts.
    pub fn reset(&mut self) {
        self.horizontal = HorizontalDirection::None;
        self.down_held = false;
        self.idle_ms = 0;
        self.das_timer = 0;
        self.arr_accumulator = 0;
    }
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_horizontal_das_arr_repeats_after_delay() {
        let mut ih = InputHandler::with_config(100, 25).with_key_release_timeout_ms(10_000);

        assert_eq!(ih.handle_key_press(KeyCode::Left), Some(Command::MoveLeft));

        // Before DAS expires: no repeats.
        assert!(ih.update(99).is_empty());

        // Exactly at DAS: still no repeats.
        assert!(ih.update(1).is_empty());

        assert_eq!(ih.update(25).as_slice(), &[Command::MoveLeft]);
        assert_eq!(ih.update(25).as_slice(), &[Command::MoveLeft]);
    }

    #[test]
    fn test_repeated_press_only_refreshes_the_hold() {
        let mut ih = InputHandler::new();
        assert_eq!(ih.handle_key_press(KeyCode::Right), Some(Command::MoveRight));
        assert_eq!(ih.handle_key_press(KeyCode::Right), None);
        assert_eq!(ih.handle_key_press(KeyCode::Left), Some(Command::MoveLeft));
    }

    #[test]
    fn test_soft_drop_press_and_release_pair_up() {
        let mut ih = InputHandler::new();
        assert_eq!(ih.handle_key_press(KeyCode::Down), Some(Command::SoftDropStart));
        assert_eq!(ih.handle_key_press(KeyCode::Down), None);
        assert!(ih.is_soft_drop_held());

        assert_eq!(ih.handle_key_release(KeyCode::Down), Some(Command::SoftDropStop));
        assert_eq!(ih.handle_key_release(KeyCode::Down), None);
    }

    #[test]
    fn test_soft_drop_auto_releases_after_quiet_period() {
        let mut ih = InputHandler::new().with_key_release_timeout_ms(50);
        assert_eq!(ih.handle_key_press(KeyCode::Down), Some(Command::SoftDropStart));

        assert!(ih.update(50).is_empty());
        // Terminal auto-repeat keeps the hold alive.
        assert_eq!(ih.handle_key_press(KeyCode::Down), None);
        assert!(ih.update(50).is_empty());

        assert_eq!(ih.update(1).as_slice(), &[Command::SoftDropStop]);
        assert!(!ih.is_soft_drop_held());
        assert!(ih.update(100).is_empty());
    }

    #[test]
    fn test_non_movement_key_does_not_extend_the_hold() {
        let mut ih = InputHandler::with_config(100, 25).with_key_release_timeout_ms(50);
        assert_eq!(ih.handle_key_press(KeyCode::Left), Some(Command::MoveLeft));

        assert!(ih.update(40).is_empty());
        assert_eq!(ih.handle_key_press(KeyCode::Up), None);

        assert!(ih.update(20).is_empty());
        assert_eq!(ih.horizontal, HorizontalDirection::None);
    }

    #[test]
    fn test_default_key_release_timeout_is_non_zero() {
        assert!(InputHandler::new().key_release_timeout_ms() > 0);
    }

    #[test]
    fn test_reset_clears_held_state_and_stops_repeats() {
        let mut ih = InputHandler::with_config(100, 25).with_key_release_timeout_ms(10_000);

        assert_eq!(ih.handle_key_press(KeyCode::Left), Some(Command::MoveLeft));
        assert!(!ih.update(200).is_empty(), "expected repeats before reset");

        ih.reset();
        assert!(ih.update(200).is_empty(), "reset should stop repeats");
    }
}
