//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the workspace.
//! All types are plain `Copy` data with no external dependencies, so they can be
//! shared by the simulation core, the terminal renderer and the hook collaborators.
//!
//! # Board Dimensions
//!
//! - **Width**: 10 columns (indexed 0-9)
//! - **Height**: 20 rows (indexed 0-19, row 0 is the top)
//!
//! # Game Timing Constants
//!
//! Timing values are in milliseconds:
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `TICK_MS` | 16 | Host loop cadence (~60 FPS) |
//! | `START_DROP_MS` | 1000 | Gravity period when a game starts |
//! | `GRAVITY_BASE_MS` | 1000 | Numerator of the level-derived period |
//! | `GRAVITY_FLOOR_MS` | 200 | Constant added to the level-derived period |
//! | `SOFT_DROP_INTERVAL_MS` | 50 | Fixed gravity period while soft drop is held |
//!
//! The level-derived period is `GRAVITY_BASE_MS / (level + 1) + GRAVITY_FLOOR_MS`.
//!
//! # Examples
//!
//! ```
//! use blockfall_types::{Cell, Command, PieceKind, BOARD_HEIGHT, BOARD_WIDTH};
//!
//! let parsed = PieceKind::from_str("t").unwrap();
//! assert_eq!(parsed, PieceKind::T);
//!
//! assert!(Cell::Settled(PieceKind::I).is_blocking());
//! assert!(!Cell::Ghost(PieceKind::I).is_blocking());
//!
//! assert_eq!(Command::HardDrop.as_str(), "hardDrop");
//!
//! assert_eq!(BOARD_WIDTH, 10);
//! assert_eq!(BOARD_HEIGHT, 20);
//! ```

/// Board width in cells (10 columns)
pub const BOARD_WIDTH: u8 = 10;

/// Board height in cells (20 rows)
pub const BOARD_HEIGHT: u8 = 20;

/// Host loop interval in milliseconds (16ms ≈ 60 FPS)
pub const TICK_MS: u32 = 16;

/// Gravity period applied when a game starts.
pub const START_DROP_MS: u32 = 1000;

/// Numerator of the level-derived gravity period.
pub const GRAVITY_BASE_MS: u32 = 1000;

/// Constant term of the level-derived gravity period.
pub const GRAVITY_FLOOR_MS: u32 = 200;

/// Gravity period while soft drop is held.
pub const SOFT_DROP_INTERVAL_MS: u32 = 50;

/// Soft drop hold timeout for terminals that never report key releases.
pub const SOFT_DROP_GRACE_MS: u32 = 150;

/// DAS (Delayed Auto Shift) delay in milliseconds.
pub const DEFAULT_DAS_MS: u32 = 150;

/// ARR (Auto Repeat Rate) in milliseconds.
pub const DEFAULT_ARR_MS: u32 = 50;

/// Rows that must be cleared to advance one level.
pub const ROWS_PER_LEVEL: u32 = 10;

/// Line clear scoring table.
///
/// Base points for clearing N lines at level 0, indexed by `N - 1`:
/// - 1 line: 40 points
/// - 2 lines: 100 points
/// - 3 lines: 300 points
/// - 4 lines: 1200 points
///
/// Points are multiplied by (level + 1), using the level before the clear.
pub const LINE_SCORES: [u32; 4] = [40, 100, 300, 1200];


/// The seven tetromino piece kinds
///
/// Each piece has a distinct shape and color:
/// - **I**: Cyan, straight bar
/// - **J**: Blue, J-shaped
/// - **L**: Orange, L-shaped (mirror of J)
/// - **O**: Yellow, 2x2 square
/// - **S**: Green, S-shaped
/// - **T**: Purple, T-shaped
/// - **Z**: Red, Z-shaped (mirror of S)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceKind {
    I,
    J,
    L,
    O,
    S,
    T,
    Z,
}

impl PieceKind {
    /// Every kind, in catalog order.
    pub const ALL: [PieceKind; 7] = [
        PieceKind::I,
        PieceKind::J,
        PieceKind::L,
        PieceKind::O,
        PieceKind::S,
        PieceKind::T,
        PieceKind::Z,
    ];

    /// Parse piece kind from string (case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use blockfall_types::PieceKind;
    ///
    /// assert_eq!(PieceKind::from_str("i"), Some(PieceKind::I));
    /// assert_eq!(PieceKind::from_str("O"), Some(PieceKind::O));
    /// assert_eq!(PieceKind::from_str("unknown"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "i" => Some(PieceKind::I),
            "j" => Some(PieceKind::J),
            "l" => Some(PieceKind::L),
            "o" => Some(PieceKind::O),
            "s" => Some(PieceKind::S),
            "t" => Some(PieceKind::T),
            "z" => Some(PieceKind::Z),
            _ => None,
        }
    }

    /// Convert to lowercase string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            PieceKind::I => "i",
            PieceKind::J => "j",
            PieceKind::L => "l",
            PieceKind::O => "o",
            PieceKind::S => "s",
            PieceKind::T => "t",
            PieceKind::Z => "z",
        }
    }
}

/// A cell on the game board
///
/// Only [`Cell::Settled`] and [`Cell::Clearing`] block movement. Ghost marks are
/// projection hints for renderers and are rewritten every time the active piece moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Cell {
    #[default]
    Empty,
    /// Locked material left behind by a piece of this kind.
    Settled(PieceKind),
    /// Landing projection of the active piece.
    Ghost(PieceKind),
    /// Part of a full row that is being removed by the current sweep.
    Clearing,
}

impl Cell {
    /// Whether a piece may not overlap this cell.
    pub fn is_blocking(&self) -> bool {
        matches!(self, Cell::Settled(_) | Cell::Clearing)
    }

    pub fn is_settled(&self) -> bool {
        matches!(self, Cell::Settled(_))
    }

    /// Ghost and clearing marks, which are reset before each projection.
    pub fn is_transient(&self) -> bool {
        matches!(self, Cell::Ghost(_) | Cell::Clearing)
    }

    /// Piece kind carried by the cell, if any.
    pub fn kind(&self) -> Option<PieceKind> {
        match self {
            Cell::Settled(kind) | Cell::Ghost(kind) => Some(*kind),
            Cell::Empty | Cell::Clearing => None,
        }
    }
}

/// Rotation direction for the active piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RotationDirection {
    Clockwise,
    CounterClockwise,
}

/// Lifecycle phase of a game.
///
/// `Menu` and `GameOver` only accept [`Command::Start`]; `Paused` only accepts resume.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GamePhase {
    #[default]
    Menu,
    Playing,
    Paused,
    GameOver,
}

impl GamePhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            GamePhase::Menu => "menu",
            GamePhase::Playing => "playing",
            GamePhase::Paused => "paused",
            GamePhase::GameOver => "gameOver",
        }
    }
}

/// Commands accepted by the simulation driver
///
/// The control surface is device agnostic: keyboard, touch and scripted input all
/// map onto these values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Move piece one cell left
    MoveLeft,
    /// Move piece one cell right
    MoveRight,
    /// Begin holding soft drop (one immediate step, then fast gravity)
    SoftDropStart,
    /// Release soft drop
    SoftDropStop,
    /// Rotate piece 90° clockwise
    RotateCw,
    /// Rotate piece 90° counter-clockwise
    RotateCcw,
    /// Drop piece to its landing row and lock it
    HardDrop,
    /// Suspend gravity and input
    Pause,
    /// Leave the paused phase
    Resume,
    /// Pause when playing, resume when paused
    TogglePause,
    /// Start a new game from the menu or after game over
    Start,
}

impl Command {
    /// camelCase name, used in logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Command::MoveLeft => "moveLeft",
            Command::MoveRight => "moveRight",
            Command::SoftDropStart => "softDropStart",
            Command::SoftDropStop => "softDropStop",
            Command::RotateCw => "rotateCw",
            Command::RotateCcw => "rotateCcw",
            Command::HardDrop => "hardDrop",
            Command::Pause => "pause",
            Command::Resume => "resume",
            Command::TogglePause => "togglePause",
            Command::Start => "start",
        }
    }
}

/// Discrete notifications emitted by the driver at the point of occurrence.
///
/// Consumers (sound, commentary) have no way to feed back into the simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameEvent {
    /// The active piece moved one column.
    Move,
    /// A rotate command was handled.
    Rotate,
    /// The active piece was hard dropped.
    Drop,
    /// One lock cleared this many rows (1-4).
    LineClear(u32),
    GameOver,
    GameStart,
}

impl GameEvent {
    /// Hook name of the event.
    pub fn name(&self) -> &'static str {
        match self {
            GameEvent::Move => "onMove",
            GameEvent::Rotate => "onRotate",
            GameEvent::Drop => "onDrop",
            GameEvent::LineClear(_) => "onLineClear",
            GameEvent::GameOver => "onGameOver",
            GameEvent::GameStart => "onGameStart",
        }
    }
}
