//! Shapes module - the tetromino catalog and matrix rotation
//!
//! Every piece is an N×N occupancy matrix (N ∈ {2, 3, 4}) stored as one bitmask per row,
//! bit `x` set meaning column `x` is occupied. Shapes are `Copy` values: rotating one
//! yields a new matrix and never touches the catalog.

use crate::types::{PieceKind, RotationDirection};

/// Largest matrix side in the catalog (the I piece).
pub const MAX_SHAPE_SIZE: usize = 4;

/// Occupancy matrix of a piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Shape {
    size: u8,
    rows: [u8; MAX_SHAPE_SIZE],
}

impl Shape {
    /// Build a shape from text rows, `#` marking occupied cells.
    ///
    /// The matrix side is the number of rows; rows are expected to be that wide.
    ///
    /// # Examples
    ///
    /// ```
    /// use blockfall_core::Shape;
    ///
    /// let o = Shape::from_pattern(&[b"##", b"##"]);
    /// assert_eq!(o.size(), 2);
    /// assert!(o.is_filled(1, 1));
    /// ```
    pub const fn from_pattern(pattern: &[&[u8]]) -> Self {
        let mut rows = [0u8; MAX_SHAPE_SIZE];
        let mut y = 0;
        while y < pattern.len() && y < MAX_SHAPE_SIZE {
            let line = pattern[y];
            let mut x = 0;
            while x < line.len() && x < MAX_SHAPE_SIZE {
                if line[x] == b'#' {
                    rows[y] |= 1 << x;
                }
                x += 1;
            }
            y += 1;
        }
        Self {
            size: pattern.len() as u8,
            rows,
        }
    }

    /// Matrix side length.
    pub fn size(&self) -> u8 {
        self.size
    }

    /// Width of the matrix; bounds the wall-kick search.
    pub fn width(&self) -> u8 {
        self.size
    }

    pub fn is_filled(&self, x: u8, y: u8) -> bool {
        if x >= self.size || y >= self.size {
            return false;
        }
        self.rows[y as usize] & (1 << x) != 0
    }

    /// Local `(x, y)` offsets of the occupied cells, row by row.
    pub fn cells(&self) -> impl Iterator<Item = (i8, i8)> {
        let shape = *self;
        (0..shape.size).flat_map(move |y| {
            (0..shape.size)
                .filter(move |&x| shape.is_filled(x, y))
                .map(move |x| (x as i8, y as i8))
        })
    }

    /// Number of occupied cells.
    pub fn cell_count(&self) -> u32 {
        self.rows.iter().map(|row| row.count_ones()).sum()
    }

    /// Swap rows and columns.
    pub fn transposed(&self) -> Self {
        let mut rows = [0u8; MAX_SHAPE_SIZE];
        for y in 0..self.size {
            for x in 0..self.size {
                if self.is_filled(x, y) {
                    rows[x as usize] |= 1 << y;
                }
            }
        }
        Self {
            size: self.size,
            rows,
        }
    }

    /// Reverse the cells within each row.
    pub fn mirrored(&self) -> Self {
        let mut rows = [0u8; MAX_SHAPE_SIZE];
        let n = self.size;
        for y in 0..n {
            for x in 0..n {
                if self.is_filled(x, y) {
                    rows[y as usize] |= 1 << (n - 1 - x);
                }
            }
        }
        Self { size: n, rows }
    }

    /// Rotate by 90°.
    ///
    /// Clockwise is transpose then reverse each row; counter-clockwise is reverse each
    /// row then transpose. The same transform is used for every kind, including O.
    pub fn rotated(&self, direction: RotationDirection) -> Self {
        match direction {
            RotationDirection::Clockwise => self.transposed().mirrored(),
            RotationDirection::CounterClockwise => self.mirrored().transposed(),
        }
    }
}

const I_SHAPE: Shape = Shape::from_pattern(&[b".#..", b".#..", b".#..", b".#.."]);
const J_SHAPE: Shape = Shape::from_pattern(&[b".#.", b".#.", b"##."]);
const L_SHAPE: Shape = Shape::from_pattern(&[b".#.", b".#.", b".##"]);
const O_SHAPE: Shape = Shape::from_pattern(&[b"##", b"##"]);
const S_SHAPE: Shape = Shape::from_pattern(&[b".##", b"##.", b"..."]);
const T_SHAPE: Shape = Shape::from_pattern(&[b"...", b"###", b".#."]);
const Z_SHAPE: Shape = Shape::from_pattern(&[b"##.", b".##", b"..."]);

/// Catalog lookup: the spawn orientation of a piece kind.
pub fn get_shape(kind: PieceKind) -> Shape {
    match kind {
        PieceKind::I => I_SHAPE,
        PieceKind::J => J_SHAPE,
        PieceKind::L => L_SHAPE,
        PieceKind::O => O_SHAPE,
        PieceKind::S => S_SHAPE,
        PieceKind::T => T_SHAPE,
        PieceKind::Z => Z_SHAPE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_sizes() {
        assert_eq!(get_shape(PieceKind::I).size(), 4);
        assert_eq!(get_shape(PieceKind::O).size(), 2);
        for kind in [PieceKind::J, PieceKind::L, PieceKind::S, PieceKind::T, PieceKind::Z] {
            assert_eq!(get_shape(kind).size(), 3, "{kind:?}");
        }
    }

    #[test]
    fn test_every_piece_has_four_cells() {
        for kind in PieceKind::ALL {
            assert_eq!(get_shape(kind).cell_count(), 4, "{kind:?}");
            assert_eq!(get_shape(kind).cells().count(), 4, "{kind:?}");
        }
    }

    #[test]
    fn test_t_cells_in_row_order() {
        let cells: Vec<_> = get_shape(PieceKind::T).cells().collect();
        assert_eq!(cells, vec![(0, 1), (1, 1), (2, 1), (1, 2)]);
    }

    #[test]
    fn test_rotate_i_clockwise_lays_it_flat() {
        let flat = get_shape(PieceKind::I).rotated(RotationDirection::Clockwise);
        let expected = Shape::from_pattern(&[b"....", b"####", b"....", b"...."]);
        assert_eq!(flat, expected);
    }

    #[test]
    fn test_rotate_t_both_directions() {
        let t = get_shape(PieceKind::T);
        let cw = t.rotated(RotationDirection::Clockwise);
        assert_eq!(cw, Shape::from_pattern(&[b".#.", b"##.", b".#."]));

        let ccw = t.rotated(RotationDirection::CounterClockwise);
        assert_eq!(ccw, Shape::from_pattern(&[b".#.", b".##", b".#."]));
    }

    #[test]
    fn test_out_of_range_is_empty() {
        let o = get_shape(PieceKind::O);
        assert!(!o.is_filled(2, 0));
        assert!(!o.is_filled(0, 2));
    }
}
