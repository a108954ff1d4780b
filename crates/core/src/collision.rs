//! Collision oracle
//!
//! A single pure predicate shared by movement, rotation, drops, ghost projection and the
//! block-out check.

use crate::board::{Board, Position};
use crate::shapes::Shape;
use crate::types::BOARD_HEIGHT;

/// Whether `shape` anchored at `anchor` and shifted by `delta` would overlap the walls,
/// the floor or blocking material.
///
/// Cells above the top row are tolerated so pieces can spawn partially hidden. Ghost
/// marks never collide.
///
/// # Examples
///
/// ```
/// use blockfall_core::{collides, get_shape, Board, Position};
/// use blockfall_core::types::PieceKind;
///
/// let board = Board::new();
/// let o = get_shape(PieceKind::O);
/// assert!(!collides(&o, Position::new(4, 0), &board, (0, 0)));
/// assert!(collides(&o, Position::new(8, 0), &board, (1, 0)));
/// assert!(!collides(&o, Position::new(4, -1), &board, (0, 0)));
/// ```
pub fn collides(shape: &Shape, anchor: Position, board: &Board, delta: (i8, i8)) -> bool {
    let (dx, dy) = delta;
    shape.cells().any(|(lx, ly)| {
        let x = anchor.x + lx + dx;
        let y = anchor.y + ly + dy;
        if y >= BOARD_HEIGHT as i8 {
            return true;
        }
        if y < 0 {
            // Above the board: only the side walls apply.
            return board.is_out_of_bounds(x, 0);
        }
        board.is_out_of_bounds(x, y) || board.is_blocked(x, y)
    })
}
