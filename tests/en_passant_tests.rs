// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
use std::collections::HashSet;
use std::convert::TryFrom;

use caissa::{legal_moves, Board, Square};

fn sq(name: &str) -> Square {
    Square::try_from(name).unwrap()
}

fn legal_set(board: &mut Board, from: &str) -> HashSet<Square> {
    legal_moves(board, sq(from)).into_iter().collect()
}

fn squares(names: &[&str]) -> HashSet<Square> {
    names.iter().map(|name| sq(name)).collect()
}

#[test]
fn double_push_registers_the_target() {
    let mut board = Board::from_strings([
        "........",
        ".p......",
        "........",
        "........",
        "........",
        "........",
        ".P......",
        "........",
    ]);

    board.apply_move(sq("b2"), sq("b4"));
    assert_eq!(Some(sq("b3")), board.en_passant_square());

    board.apply_move(sq("b7"), sq("b5"));
    assert_eq!(Some(sq("b6")), board.en_passant_square());
}

#[test]
fn single_push_does_not() {
    let mut board = Board::from_strings([
        "........",
        "........",
        "........",
        "........",
        "........",
        "........",
        ".P......",
        "........",
    ]);

    board.apply_move(sq("b2"), sq("b3"));
    assert_eq!(None, board.en_passant_square());
}

#[test]
fn both_neighbors_may_capture_in_passing() {
    let mut board = Board::from_strings([
        "........",
        ".p......",
        "........",
        "P.P.....",
        "........",
        "........",
        "........",
        "........",
    ]);

    board.apply_move(sq("b7"), sq("b5"));

    assert_eq!(squares(&["a6", "b6"]), legal_set(&mut board, "a5"));
    assert_eq!(squares(&["c6", "b6"]), legal_set(&mut board, "c5"));
}

#[test]
fn the_window_is_one_move_wide() {
    let mut board = Board::from_strings([
        "........",
        ".p......",
        "........",
        "P.P.....",
        "........",
        "........",
        "........",
        "........",
    ]);

    board.apply_move(sq("b7"), sq("b5"));
    assert_eq!(Some(sq("b6")), board.en_passant_square());

    // any intervening move closes the window
    board.apply_move(sq("c5"), sq("c6"));
    assert_eq!(None, board.en_passant_square());
    assert_eq!(squares(&["a6"]), legal_set(&mut board, "a5"));
}

#[test]
fn capturing_in_passing_removes_the_passed_pawn() {
    // the black pawn is mid-double-push; import the open window directly
    let mut board = Board::from_fen("8/8/8/3pP3/8/8/8/8 w - d6 0 1").unwrap();
    board.apply_move(sq("e5"), sq("d6"));

    assert!(board.is_empty(sq("d5")));
    assert!(board.is_empty(sq("e5")));
    assert_eq!(
        Some("P".to_string()),
        board.piece_at(sq("d6")).map(|p| p.to_string())
    );
}

#[test]
fn black_captures_in_passing_too() {
    let mut board = Board::from_strings([
        "........",
        "........",
        "........",
        "........",
        "p.p.....",
        "........",
        ".P......",
        "........",
    ]);

    board.apply_move(sq("b2"), sq("b4"));

    assert_eq!(squares(&["a3", "b3"]), legal_set(&mut board, "a4"));
    assert_eq!(squares(&["c3", "b3"]), legal_set(&mut board, "c4"));

    board.apply_move(sq("c4"), sq("b3"));
    assert!(board.is_empty(sq("b4")));
    assert_eq!(
        Some("p".to_string()),
        board.piece_at(sq("b3")).map(|p| p.to_string())
    );
}
