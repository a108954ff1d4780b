//! Core game logic - pure, deterministic, and testable
//!
//! This crate contains the rules of the falling-block puzzle: the board, the piece
//! catalog, collision, rotation with wall kicks, row clearing, scoring and the
//! simulation driver. It performs no I/O beyond `tracing` diagnostics, so it runs the
//! same in a terminal, a headless test or a benchmark.
//!
//! # Module Structure
//!
//! - [`board`]: 10x20 grid of cells with commit, ghost marking and row sweeping
//! - [`shapes`]: piece catalog and matrix rotation
//! - [`collision`]: the single collision predicate
//! - [`piece`]: the active piece and its wall-kick search
//! - [`rng`]: seeded uniform piece source
//! - [`scoring`]: line-clear points, levels and gravity periods
//! - [`game`]: lifecycle, commands, gravity timer and event queue
//! - [`snapshot`]: read-only views for renderers
//!
//! # Rules
//!
//! - **Uniform randomizer**: every draw picks any of the seven kinds with equal odds
//! - **Simple rotation**: rotate the matrix, then try horizontal kicks 0, +1, -1, +2, ...
//! - **Instant lock**: a piece that cannot fall locks on the next gravity step
//! - **Ghost piece**: the landing position is marked on the board
//! - **Scoring**: 40/100/300/1200 times (level + 1), level = rows / 10
//!
//! # Example
//!
//! ```
//! use blockfall_core::Game;
//! use blockfall_core::types::{Command, GameEvent, GamePhase};
//!
//! let mut game = Game::new(12345);
//! game.apply(Command::Start);
//! assert_eq!(game.phase(), GamePhase::Playing);
//!
//! game.apply(Command::MoveRight);
//! game.apply(Command::RotateCw);
//! game.apply(Command::HardDrop);
//!
//! let events: Vec<GameEvent> = game.take_events().collect();
//! assert_eq!(events.first(), Some(&GameEvent::GameStart));
//! assert!(events.contains(&GameEvent::Drop));
//! ```
//!
//! # Timing
//!
//! Call [`Game::advance`](game::Game::advance) every frame with the elapsed
//! milliseconds. Gravity starts at 1000ms per row, becomes `1000 / (level + 1) + 200`
//! after the first level change, and is fixed at 50ms while soft drop is held.

pub mod board;
pub mod collision;
pub mod game;
pub mod piece;
pub mod rng;
pub mod scoring;
pub mod shapes;
pub mod snapshot;

pub use blockfall_types as types;

// Re-export commonly used types for convenience
pub use board::{Board, Position};
pub use collision::collides;
pub use game::Game;
pub use piece::ActivePiece;
pub use rng::{PieceSource, SimpleRng};
pub use scoring::{gravity_interval_ms, level_for_rows, line_clear_points, Progress};
pub use shapes::{get_shape, Shape};
pub use snapshot::{ActiveSnapshot, GameSnapshot};
