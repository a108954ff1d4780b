//! Active piece controller
//!
//! Owns the falling piece's matrix and anchor and validates every change against the
//! collision oracle. Moves and rotations are computed as candidate values and only
//! written back once they are known to be legal, so a rejected request leaves the piece
//! exactly as it was.

use crate::board::{Board, Position};
use crate::collision::collides;
use crate::shapes::{get_shape, Shape};
use crate::types::{PieceKind, RotationDirection, BOARD_WIDTH};

/// Horizontal offsets tried by the wall-kick search: 0, +1, -1, +2, -2, ...
///
/// Each failed attempt advances the step with `step = -(step + sign(step))`; the search
/// ends as soon as the step grows past `width`.
///
/// # Examples
///
/// ```
/// use blockfall_core::piece::kick_offsets;
///
/// assert_eq!(kick_offsets(2).collect::<Vec<_>>(), vec![0, 1]);
/// assert_eq!(kick_offsets(3).collect::<Vec<_>>(), vec![0, 1, -1, 2]);
/// ```
pub fn kick_offsets(width: u8) -> impl Iterator<Item = i8> {
    let width = width as i8;
    let mut net: i8 = 0;
    let mut step: i8 = 1;
    let mut started = false;
    std::iter::from_fn(move || {
        if !started {
            started = true;
            return Some(0);
        }
        net += step;
        step = -(step + step.signum());
        if step > width {
            return None;
        }
        Some(net)
    })
}

/// The falling piece
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ActivePiece {
    pub kind: PieceKind,
    /// Current matrix, already rotated.
    pub shape: Shape,
    /// Top-left corner of the matrix in board coordinates.
    pub position: Position,
}

impl ActivePiece {
    /// Place a catalog piece at the spawn anchor
    pub fn spawn(kind: PieceKind) -> Self {
        Self::spawn_shape(kind, get_shape(kind))
    }

    /// Place an arbitrary matrix at the spawn anchor
    ///
    /// The matrix is centered horizontally (`W/2 - N/2`) on row 0. No collision check
    /// happens here; block-out is the driver's call.
    pub fn spawn_shape(kind: PieceKind, shape: Shape) -> Self {
        let x = (BOARD_WIDTH / 2) as i8 - (shape.size() / 2) as i8;
        Self {
            kind,
            shape,
            position: Position::new(x, 0),
        }
    }

    /// Whether the piece, shifted by `delta`, overlaps anything.
    pub fn collides(&self, board: &Board, delta: (i8, i8)) -> bool {
        collides(&self.shape, self.position, board, delta)
    }

    /// Try to shift the piece. Returns false and leaves the piece untouched on collision.
    ///
    /// A rejected move with `dy > 0` means the piece has landed.
    pub fn translate(&mut self, board: &Board, dx: i8, dy: i8) -> bool {
        if self.collides(board, (dx, dy)) {
            return false;
        }
        self.position = self.position.offset(dx, dy);
        true
    }

    /// Rotate with a horizontal wall-kick search
    ///
    /// Returns false, with shape and anchor unchanged, when no kick offset fits.
    pub fn rotate(&mut self, board: &Board, direction: RotationDirection) -> bool {
        let rotated = self.shape.rotated(direction);
        let kick = kick_offsets(rotated.width())
            .find(|&dx| !collides(&rotated, self.position, board, (dx, 0)));

        match kick {
            Some(dx) => {
                self.shape = rotated;
                self.position = self.position.offset(dx, 0);
                true
            }
            None => false,
        }
    }

    /// Rows the piece can fall before it lands
    pub fn drop_distance(&self, board: &Board) -> i8 {
        let mut distance: i8 = 0;
        while !self.collides(board, (0, distance + 1)) {
            distance += 1;
        }
        distance
    }

    /// Move straight to the landing row in one step and return the distance fallen
    ///
    /// The caller locks the piece afterwards.
    pub fn hard_drop(&mut self, board: &Board) -> u32 {
        let distance = self.drop_distance(board);
        self.position = self.position.offset(0, distance);
        distance as u32
    }

    /// Anchor row the piece would land on, without moving it
    pub fn ghost_y(&self, board: &Board) -> i8 {
        self.position.y + self.drop_distance(board)
    }

    /// Absolute board coordinates of the occupied cells
    pub fn cells(&self) -> impl Iterator<Item = Position> {
        let origin = self.position;
        self.shape
            .cells()
            .map(move |(dx, dy)| origin.offset(dx, dy))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Cell;

    #[test]
    fn test_spawn_centers_by_matrix_size() {
        assert_eq!(ActivePiece::spawn(PieceKind::I).position, Position::new(3, 0));
        assert_eq!(ActivePiece::spawn(PieceKind::T).position, Position::new(4, 0));
        assert_eq!(ActivePiece::spawn(PieceKind::O).position, Position::new(4, 0));
    }

    #[test]
    fn test_kick_offsets_for_each_width() {
        assert_eq!(kick_offsets(2).collect::<Vec<_>>(), vec![0, 1]);
        assert_eq!(kick_offsets(3).collect::<Vec<_>>(), vec![0, 1, -1, 2]);
        assert_eq!(kick_offsets(4).collect::<Vec<_>>(), vec![0, 1, -1, 2]);
        assert_eq!(kick_offsets(5).collect::<Vec<_>>(), vec![0, 1, -1, 2, -2, 3]);
    }

    #[test]
    fn test_translate_rejects_walls() {
        let board = Board::new();
        let mut piece = ActivePiece::spawn(PieceKind::O);
        let mut moved = 0;
        for _ in 0..10 {
            if piece.translate(&board, -1, 0) {
                moved += 1;
            }
        }
        assert_eq!(moved, 4);
        assert_eq!(piece.position.x, 0);
    }

    #[test]
    fn test_rotate_kicks_off_the_walls() {
        let board = Board::new();
        // Vertical I in column 8: laying it flat needs to slide left by one.
        let mut piece = ActivePiece::spawn(PieceKind::I);
        piece.position = Position::new(7, 5);
        assert!(piece.rotate(&board, RotationDirection::Clockwise));
        assert!(!piece.collides(&board, (0, 0)));
        assert_eq!(piece.position.x, 6);

        // Vertical I in column 0 slides right by one.
        let mut piece = ActivePiece::spawn(PieceKind::I);
        piece.position = Position::new(-1, 5);
        assert!(piece.rotate(&board, RotationDirection::Clockwise));
        assert_eq!(piece.position.x, 0);
    }

    #[test]
    fn test_flat_search_cannot_reach_two_left() {
        // Column 9 would need a -2 kick, which lies past the search bound.
        let board = Board::new();
        let mut piece = ActivePiece::spawn(PieceKind::I);
        piece.position = Position::new(8, 5);
        let before = piece;
        assert!(!piece.rotate(&board, RotationDirection::Clockwise));
        assert_eq!(piece, before);
    }

    #[test]
    fn test_failed_rotation_restores_everything() {
        // A vertical I in a one-wide well cannot lie flat.
        let mut board = Board::new();
        for y in 0..20 {
            for x in 0..10 {
                if x != 4 {
                    board.set(x, y, Cell::Settled(PieceKind::Z));
                }
            }
        }
        let mut piece = ActivePiece::spawn(PieceKind::I);
        piece.position = Position::new(3, 10);
        let before = piece;

        assert!(!piece.rotate(&board, RotationDirection::Clockwise));
        assert_eq!(piece, before);
    }

    #[test]
    fn test_hard_drop_and_ghost_agree() {
        let board = Board::from_ascii(&["....zz....", "...zz....."]);
        let mut piece = ActivePiece::spawn(PieceKind::T);
        let ghost = piece.ghost_y(&board);
        let distance = piece.hard_drop(&board);

        assert_eq!(piece.position.y, ghost);
        assert_eq!(distance as i8, ghost);
        assert!(!piece.collides(&board, (0, 0)));
        assert!(piece.collides(&board, (0, 1)));
    }
}
