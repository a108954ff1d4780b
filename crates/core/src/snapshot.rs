//! Snapshot types handed to renderers and hosts

use crate::board::Position;
use crate::piece::ActivePiece;
use crate::shapes::Shape;
use crate::types::{Cell, GamePhase, PieceKind, BOARD_HEIGHT, BOARD_WIDTH};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ActiveSnapshot {
    pub kind: PieceKind,
    pub shape: Shape,
    pub x: i8,
    pub y: i8,
}

impl ActiveSnapshot {
    /// Absolute board coordinates of the occupied cells at `y`.
    pub fn cells_at(&self, y: i8) -> impl Iterator<Item = Position> {
        let origin = Position::new(self.x, y);
        self.shape
            .cells()
            .map(move |(dx, dy)| origin.offset(dx, dy))
    }
}

impl From<ActivePiece> for ActiveSnapshot {
    fn from(value: ActivePiece) -> Self {
        Self {
            kind: value.kind,
            shape: value.shape,
            x: value.position.x,
            y: value.position.y,
        }
    }
}

/// Read-only view of a game for renderers.
///
/// `board` includes ghost marks; the active piece is reported separately.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GameSnapshot {
    pub board: [[Cell; BOARD_WIDTH as usize]; BOARD_HEIGHT as usize],
    pub active: Option<ActiveSnapshot>,
    pub ghost_y: Option<i8>,
    pub next: PieceKind,
    pub phase: GamePhase,
    pub score: u32,
    pub level: u32,
    pub rows: u32,
    pub gravity_ms: u32,
}

impl Default for GameSnapshot {
    fn default() -> Self {
        Self {
            board: [[Cell::Empty; BOARD_WIDTH as usize]; BOARD_HEIGHT as usize],
            active: None,
            ghost_y: None,
            next: PieceKind::I,
            phase: GamePhase::Menu,
            score: 0,
            level: 0,
            rows: 0,
            gravity_ms: 0,
        }
    }
}
