//! Board module - manages the game grid
//!
//! The board is a 10x20 grid of [`Cell`]s stored in a flat row-major array for cache
//! locality and zero allocation. Coordinates are `(x, y)` with x in 0..9 (left to right)
//! and y in 0..19 (top to bottom). Dimensions are fixed; only cell contents change.

use arrayvec::ArrayVec;

use crate::shapes::Shape;
use crate::types::{Cell, PieceKind, BOARD_HEIGHT, BOARD_WIDTH};

/// Total number of cells on the board
const BOARD_SIZE: usize = (BOARD_WIDTH as usize) * (BOARD_HEIGHT as usize);

/// A point in board coordinates. `y` may be negative while a piece overflows the top.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Position {
    pub x: i8,
    pub y: i8,
}

impl Position {
    pub const fn new(x: i8, y: i8) -> Self {
        Self { x, y }
    }

    pub fn offset(self, dx: i8, dy: i8) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

/// The game board - 10 columns x 20 rows using flat array storage
#[derive(Debug, Clone, PartialEq)]
pub struct Board {
    /// Flat array of cells, row-major order (y * WIDTH + x)
    cells: [Cell; BOARD_SIZE],
}

impl Board {
    /// Create a new empty board
    pub fn new() -> Self {
        Self {
            cells: [Cell::Empty; BOARD_SIZE],
        }
    }

    /// Build a board from text rows aligned to the bottom of the grid.
    ///
    /// `.` is empty and a piece letter (`IJLOSTZ`, any case) is a settled cell.
    /// Missing rows above the given ones are empty; extra columns are ignored.
    ///
    /// # Examples
    ///
    /// ```
    /// use blockfall_core::Board;
    /// use blockfall_core::types::{Cell, PieceKind};
    ///
    /// let board = Board::from_ascii(&["T.........", "IIII......"]);
    /// assert_eq!(board.get(0, 18), Some(Cell::Settled(PieceKind::T)));
    /// assert_eq!(board.get(3, 19), Some(Cell::Settled(PieceKind::I)));
    /// ```
    pub fn from_ascii(rows: &[&str]) -> Self {
        let mut board = Self::new();
        let height = BOARD_HEIGHT as usize;
        let skip = rows.len().saturating_sub(height);
        let top = height - (rows.len() - skip);
        for (dy, row) in rows.iter().skip(skip).enumerate() {
            let y = (top + dy) as i8;
            for (x, ch) in row.chars().take(BOARD_WIDTH as usize).enumerate() {
                let mut buf = [0u8; 4];
                if let Some(kind) = PieceKind::from_str(ch.encode_utf8(&mut buf)) {
                    board.set(x as i8, y, Cell::Settled(kind));
                }
            }
        }
        board
    }

    /// Calculate flat index from (x, y) coordinates
    #[inline(always)]
    fn index(x: i8, y: i8) -> Option<usize> {
        if x < 0 || x >= BOARD_WIDTH as i8 || y < 0 || y >= BOARD_HEIGHT as i8 {
            return None;
        }
        Some((y as usize) * (BOARD_WIDTH as usize) + (x as usize))
    }

    /// Get width of the board
    pub fn width(&self) -> u8 {
        BOARD_WIDTH
    }

    /// Get height of the board
    pub fn height(&self) -> u8 {
        BOARD_HEIGHT
    }

    /// Get cell at position (x, y)
    /// Returns None if out of bounds
    pub fn get(&self, x: i8, y: i8) -> Option<Cell> {
        Self::index(x, y).map(|idx| self.cells[idx])
    }

    /// Set cell at position (x, y)
    /// Returns false if out of bounds
    pub fn set(&mut self, x: i8, y: i8, cell: Cell) -> bool {
        match Self::index(x, y) {
            Some(idx) => {
                self.cells[idx] = cell;
                true
            }
            None => false,
        }
    }

    /// Check if an in-bounds position holds blocking material
    pub fn is_blocked(&self, x: i8, y: i8) -> bool {
        matches!(self.get(x, y), Some(cell) if cell.is_blocking())
    }

    /// Check if position is out of bounds
    pub fn is_out_of_bounds(&self, x: i8, y: i8) -> bool {
        Self::index(x, y).is_none()
    }

    fn row(&self, y: usize) -> &[Cell] {
        let start = y * BOARD_WIDTH as usize;
        &self.cells[start..start + BOARD_WIDTH as usize]
    }

    fn row_mut(&mut self, y: usize) -> &mut [Cell] {
        let start = y * BOARD_WIDTH as usize;
        &mut self.cells[start..start + BOARD_WIDTH as usize]
    }

    /// Check if a row is completely filled with settled cells
    ///
    /// Empty and ghost cells both disqualify a row.
    pub fn is_row_full(&self, y: usize) -> bool {
        if y >= BOARD_HEIGHT as usize {
            return false;
        }
        self.row(y).iter().all(Cell::is_settled)
    }

    /// Indices of all full rows, top to bottom
    pub fn full_rows(&self) -> ArrayVec<usize, { BOARD_HEIGHT as usize }> {
        (0..BOARD_HEIGHT as usize)
            .filter(|&y| self.is_row_full(y))
            .collect()
    }

    /// Write settled cells for every occupied cell of `shape` anchored at `position`
    ///
    /// The caller is responsible for having checked collisions. Cells that overflow the
    /// board (above the top row) are dropped.
    pub fn commit(&mut self, shape: &Shape, position: Position, kind: PieceKind) {
        for (dx, dy) in shape.cells() {
            self.set(position.x + dx, position.y + dy, Cell::Settled(kind));
        }
    }

    /// Tag every full row as [`Cell::Clearing`] and return how many were tagged
    pub fn mark_full_rows(&mut self) -> usize {
        let full = self.full_rows();
        for &y in &full {
            self.row_mut(y).fill(Cell::Clearing);
        }
        full.len()
    }

    /// Remove all full rows and compact the board downward
    ///
    /// Full rows are tagged first, then a single bottom-up two-pointer pass moves the
    /// surviving rows down in their original order. The vacated top rows are emptied.
    /// Returns the number of rows removed.
    pub fn sweep(&mut self) -> usize {
        let cleared = self.mark_full_rows();
        if cleared == 0 {
            return 0;
        }

        let width = BOARD_WIDTH as usize;
        let mut write_y = BOARD_HEIGHT as usize;

        // Scan from bottom to top
        for read_y in (0..BOARD_HEIGHT as usize).rev() {
            if self.row(read_y)[0] == Cell::Clearing {
                continue;
            }
            write_y -= 1;
            if write_y != read_y {
                // copy_within handles overlapping ranges without allocating
                let src_start = read_y * width;
                self.cells
                    .copy_within(src_start..src_start + width, write_y * width);
            }
        }

        // Clear the remaining rows at the top
        for y in 0..write_y {
            self.row_mut(y).fill(Cell::Empty);
        }

        cleared
    }

    /// Project a ghost of `shape` at `position`
    ///
    /// Only non-blocking cells are marked, so settled material is never overwritten.
    pub fn mark_ghost(&mut self, shape: &Shape, position: Position, kind: PieceKind) {
        for (dx, dy) in shape.cells() {
            let (x, y) = (position.x + dx, position.y + dy);
            if let Some(cell) = self.get(x, y) {
                if !cell.is_blocking() {
                    self.set(x, y, Cell::Ghost(kind));
                }
            }
        }
    }

    /// Reset ghost and clearing marks to empty, leaving settled cells untouched
    pub fn clear_transient_marks(&mut self) {
        for cell in &mut self.cells {
            if cell.is_transient() {
                *cell = Cell::Empty;
            }
        }
    }

    /// Get a reference to the internal cells array
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Copy the grid into a row-major 2D array
    pub fn write_grid(&self, out: &mut [[Cell; BOARD_WIDTH as usize]; BOARD_HEIGHT as usize]) {
        for (y, row) in out.iter_mut().enumerate() {
            row.copy_from_slice(self.row(y));
        }
    }

    /// Clear the entire board
    pub fn clear(&mut self) {
        self.cells.fill(Cell::Empty);
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::get_shape;

    fn fill_row(board: &mut Board, y: i8, kind: PieceKind) {
        for x in 0..BOARD_WIDTH as i8 {
            board.set(x, y, Cell::Settled(kind));
        }
    }

    #[test]
    fn test_board_index_calculation() {
        assert_eq!(Board::index(0, 0), Some(0));
        assert_eq!(Board::index(9, 0), Some(9));
        assert_eq!(Board::index(0, 1), Some(10));
        assert_eq!(Board::index(9, 19), Some(199));
        assert_eq!(Board::index(-1, 0), None);
        assert_eq!(Board::index(10, 0), None);
        assert_eq!(Board::index(0, 20), None);
    }

    #[test]
    fn test_board_flat_array() {
        let mut board = Board::new();
        board.set(0, 0, Cell::Settled(PieceKind::I));
        board.set(5, 10, Cell::Ghost(PieceKind::T));

        assert_eq!(board.cells[0], Cell::Settled(PieceKind::I));
        assert_eq!(board.cells[10 * 10 + 5], Cell::Ghost(PieceKind::T));
    }

    #[test]
    fn test_ghost_cells_do_not_make_a_row_full() {
        let mut board = Board::new();
        fill_row(&mut board, 19, PieceKind::J);
        board.set(4, 19, Cell::Ghost(PieceKind::J));

        assert!(!board.is_row_full(19));
        assert_eq!(board.sweep(), 0);
    }

    #[test]
    fn test_sweep_keeps_survivor_order() {
        let mut board = Board::new();
        board.set(0, 16, Cell::Settled(PieceKind::S));
        fill_row(&mut board, 17, PieceKind::I);
        board.set(1, 18, Cell::Settled(PieceKind::Z));
        fill_row(&mut board, 19, PieceKind::I);

        assert_eq!(board.sweep(), 2);
        assert_eq!(board.get(0, 18), Some(Cell::Settled(PieceKind::S)));
        assert_eq!(board.get(1, 19), Some(Cell::Settled(PieceKind::Z)));
        assert_eq!(board.get(0, 16), Some(Cell::Empty));
        assert!(board.cells().iter().all(|c| *c != Cell::Clearing));
    }

    #[test]
    fn test_commit_drops_cells_above_the_top() {
        let mut board = Board::new();
        board.commit(&get_shape(PieceKind::I), Position::new(0, -2), PieceKind::I);

        let settled = board.cells().iter().filter(|c| c.is_settled()).count();
        assert_eq!(settled, 2);
        assert_eq!(board.get(1, 0), Some(Cell::Settled(PieceKind::I)));
        assert_eq!(board.get(1, 1), Some(Cell::Settled(PieceKind::I)));
    }

    #[test]
    fn test_mark_ghost_never_overwrites_settled() {
        let mut board = Board::new();
        board.set(1, 19, Cell::Settled(PieceKind::L));
        board.mark_ghost(&get_shape(PieceKind::O), Position::new(0, 18), PieceKind::O);

        assert_eq!(board.get(1, 19), Some(Cell::Settled(PieceKind::L)));
        assert_eq!(board.get(0, 19), Some(Cell::Ghost(PieceKind::O)));

        board.clear_transient_marks();
        assert_eq!(board.get(0, 19), Some(Cell::Empty));
        assert_eq!(board.get(1, 19), Some(Cell::Settled(PieceKind::L)));
    }

    #[test]
    fn test_from_ascii_aligns_to_bottom() {
        let board = Board::from_ascii(&["z.", "..o"]);
        assert_eq!(board.get(0, 18), Some(Cell::Settled(PieceKind::Z)));
        assert_eq!(board.get(2, 19), Some(Cell::Settled(PieceKind::O)));
        assert_eq!(board.get(1, 19), Some(Cell::Empty));
    }
}
