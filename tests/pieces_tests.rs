//! Pieces tests - catalog, rotation, wall kicks and drops

use blockfall::core::piece::kick_offsets;
use blockfall::core::{collides, get_shape, ActivePiece, Board, Position, Shape};
use blockfall::types::{Cell, PieceKind, RotationDirection, BOARD_HEIGHT, BOARD_WIDTH};

// ============== Shape Tests ==============

#[test]
fn test_catalog_matrices() {
    let expected: [(PieceKind, &[&[u8]]); 7] = [
        (PieceKind::I, &[b".#..", b".#..", b".#..", b".#.."]),
        (PieceKind::J, &[b".#.", b".#.", b"##."]),
        (PieceKind::L, &[b".#.", b".#.", b".##"]),
        (PieceKind::O, &[b"##", b"##"]),
        (PieceKind::S, &[b".##", b"##.", b"..."]),
        (PieceKind::T, &[b"...", b"###", b".#."]),
        (PieceKind::Z, &[b"##.", b".##", b"..."]),
    ];
    for (kind, pattern) in expected {
        assert_eq!(get_shape(kind), Shape::from_pattern(pattern), "{kind:?}");
    }
}

#[test]
fn test_four_clockwise_turns_are_identity() {
    for kind in PieceKind::ALL {
        let start = get_shape(kind);
        let mut shape = start;
        for _ in 0..4 {
            shape = shape.rotated(RotationDirection::Clockwise);
            assert_eq!(shape.cell_count(), 4, "{kind:?}");
        }
        assert_eq!(shape, start, "{kind:?}");
    }
}

#[test]
fn test_clockwise_then_counter_clockwise_is_identity() {
    for kind in PieceKind::ALL {
        let start = get_shape(kind);
        let back = start
            .rotated(RotationDirection::Clockwise)
            .rotated(RotationDirection::CounterClockwise);
        assert_eq!(back, start, "{kind:?}");
    }
}

#[test]
fn test_o_is_rotation_invariant() {
    let o = get_shape(PieceKind::O);
    assert_eq!(o.rotated(RotationDirection::Clockwise), o);
    assert_eq!(o.rotated(RotationDirection::CounterClockwise), o);
}

// ============== Spawn Tests ==============

#[test]
fn test_spawn_is_centered_on_row_zero() {
    assert_eq!(ActivePiece::spawn(PieceKind::I).position, Position::new(3, 0));
    assert_eq!(ActivePiece::spawn(PieceKind::O).position, Position::new(4, 0));
    assert_eq!(ActivePiece::spawn(PieceKind::T).position, Position::new(4, 0));
}

#[test]
fn test_every_spawn_fits_an_empty_board() {
    let board = Board::new();
    for kind in PieceKind::ALL {
        assert!(!ActivePiece::spawn(kind).collides(&board, (0, 0)), "{kind:?}");
    }
}

// ============== Kick Tests ==============

#[test]
fn test_kick_search_order() {
    assert_eq!(kick_offsets(4).collect::<Vec<_>>(), vec![0, 1, -1, 2]);
}

#[test]
fn test_rotation_kicks_off_the_left_wall() {
    let board = Board::new();
    let mut piece = ActivePiece::spawn(PieceKind::I);
    // Vertical I hugging the left wall: its cells sit in column 0.
    piece.position = Position::new(-1, 5);
    assert!(!piece.collides(&board, (0, 0)));

    assert!(piece.rotate(&board, RotationDirection::Clockwise));
    assert_eq!(piece.position, Position::new(0, 5));
    assert!(piece.cells().all(|p| p.y == 6 && (0..4).contains(&p.x)));
}

#[test]
fn test_rotation_reverts_when_no_kick_fits() {
    // Everything settled except column 0: a vertical I cannot lie down anywhere.
    let mut board = Board::new();
    for y in 0..BOARD_HEIGHT as i8 {
        for x in 1..BOARD_WIDTH as i8 {
            board.set(x, y, Cell::Settled(PieceKind::Z));
        }
    }
    let mut piece = ActivePiece::spawn(PieceKind::I);
    piece.position = Position::new(-1, 5);
    let before = piece;

    assert!(!piece.rotate(&board, RotationDirection::Clockwise));
    assert!(!piece.rotate(&board, RotationDirection::CounterClockwise));
    assert_eq!(piece, before);
}

#[test]
fn test_three_wide_pieces_rotate_against_the_left_wall() {
    let kinds = [PieceKind::J, PieceKind::L, PieceKind::S, PieceKind::T, PieceKind::Z];
    let directions = [RotationDirection::Clockwise, RotationDirection::CounterClockwise];

    for kind in kinds {
        let mut piece = ActivePiece::spawn(kind);
        piece.position = Position::new(0, 5);
        let open = Board::new();
        assert!(!piece.collides(&open, (0, 0)), "{kind:?}");

        // Everything settled except the piece's own cells.
        let mut packed = Board::new();
        for y in 0..BOARD_HEIGHT as i8 {
            for x in 0..BOARD_WIDTH as i8 {
                if !piece.cells().any(|p| p == Position::new(x, y)) {
                    packed.set(x, y, Cell::Settled(PieceKind::O));
                }
            }
        }

        for direction in directions {
            let mut turned = piece;
            assert!(turned.rotate(&open, direction), "{kind:?} {direction:?}");
            assert!(!turned.collides(&open, (0, 0)));
            assert!(turned.cells().all(|p| p.x >= 0));

            let mut stuck = piece;
            assert!(!stuck.rotate(&packed, direction), "{kind:?} {direction:?}");
            assert_eq!(stuck, piece);
        }
    }
}

// ============== Drop Tests ==============

#[test]
fn test_hard_drop_matches_repeated_single_steps() {
    let board = Board::from_ascii(&[
        "....T.....",
        "...TTT..OO",
        "I.SS....OO",
        "ISS..ZZ..L",
        "I.....ZZ.L",
        "I......LLL",
    ]);

    for kind in PieceKind::ALL {
        for x in -1..8 {
            let mut piece = ActivePiece::spawn(kind);
            piece.position.x = x;
            if piece.collides(&board, (0, 0)) {
                continue;
            }

            let mut stepped = piece;
            let mut steps = 0;
            while stepped.translate(&board, 0, 1) {
                steps += 1;
            }

            let distance = piece.hard_drop(&board);
            assert_eq!(piece, stepped, "{kind:?} at x={x}");
            assert_eq!(distance, steps, "{kind:?} at x={x}");
            assert!(piece.collides(&board, (0, 1)));
        }
    }
}

#[test]
fn test_ghost_row_is_the_landing_row() {
    let board = Board::from_ascii(&["OO........", "OO........"]);
    let mut piece = ActivePiece::spawn(PieceKind::O);
    piece.position.x = 0;
    assert_eq!(piece.ghost_y(&board), 16);

    piece.position.x = 4;
    assert_eq!(piece.ghost_y(&board), 18);
}

#[test]
fn test_rejected_move_leaves_piece_unchanged() {
    let board = Board::new();
    let mut piece = ActivePiece::spawn(PieceKind::O);
    piece.position.x = 0;
    let before = piece;
    assert!(!piece.translate(&board, -1, 0));
    assert_eq!(piece, before);
}

#[test]
fn test_cells_above_the_top_only_hit_walls() {
    let board = Board::new();
    let i = get_shape(PieceKind::I);
    assert!(!collides(&i, Position::new(3, -3), &board, (0, 0)));
    assert!(collides(&i, Position::new(-2, -3), &board, (0, 0)));
}
