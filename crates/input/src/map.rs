//! Key mapping from terminal events to game commands.

use crate::types::Command;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Map a key press to a command.
///
/// Arrow keys follow the classic layout (up rotates, space hard drops); `hjkl` and
/// `wasd` are accepted as alternatives.
pub fn handle_key_event(key: KeyEvent) -> Option<Command> {
    match key.code {
        // Movement
        KeyCode::Left | KeyCode::Char('h' | 'H' | 'a' | 'A') => Some(Command::MoveLeft),
        KeyCode::Right | KeyCode::Char('l' | 'L' | 'd' | 'D') => Some(Command::MoveRight),
        KeyCode::Down | KeyCode::Char('j' | 'J' | 's' | 'S') => Some(Command::SoftDropStart),

        // Rotation
        KeyCode::Up | KeyCode::Char('k' | 'K' | 'w' | 'W' | 'x' | 'X') => Some(Command::RotateCw),
        KeyCode::Char('z' | 'Z' | 'y' | 'Y') => Some(Command::RotateCcw),

        KeyCode::Char(' ') => Some(Command::HardDrop),
        KeyCode::Char('p' | 'P') | KeyCode::Esc => Some(Command::TogglePause),

        // Start from the menu, restart after game over
        KeyCode::Enter | KeyCode::Char('r' | 'R') => Some(Command::Start),

        _ => None,
    }
}

/// Map a key release to a command. Only soft drop cares about releases.
pub fn handle_key_release(key: KeyEvent) -> Option<Command> {
    match key.code {
        KeyCode::Down | KeyCode::Char('j' | 'J' | 's' | 'S') => Some(Command::SoftDropStop),
        _ => None,
    }
}

/// Check if key should quit the game.
pub fn should_quit(key: KeyEvent) -> bool {
    matches!(key.code, KeyCode::Char('q') | KeyCode::Char('Q'))
        || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
}
