// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
use std::convert::TryFrom;

use caissa::{Board, Color, Piece, PieceKind, Square};

fn init() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn sq(name: &str) -> Square {
    Square::try_from(name).unwrap()
}

#[test]
fn relocation_clears_the_origin() {
    init();
    let mut board = Board::standard();
    board.apply_move(sq("e2"), sq("e3"));

    assert!(board.is_empty(sq("e2")));
    assert_eq!(
        Some(Piece::new(PieceKind::Pawn, Color::White)),
        board.piece_at(sq("e3"))
    );
}

#[test]
fn captures_replace_the_occupant() {
    init();
    let mut board = Board::from_strings([
        "........",
        "........",
        "........",
        "........",
        ".....p..",
        "....P...",
        "........",
        "........",
    ]);

    board.apply_move(sq("e3"), sq("f4"));
    assert_eq!(
        Some(Piece::new(PieceKind::Pawn, Color::White)),
        board.piece_at(sq("f4"))
    );
    assert!(board.is_empty(sq("e3")));
}

#[test]
fn the_king_cache_follows_the_king() {
    init();
    let mut board = Board::from_strings([
        "....k...",
        "........",
        "........",
        "........",
        "........",
        "........",
        "........",
        "....K...",
    ]);

    assert_eq!(Some(sq("e1")), board.king_square(Color::White));
    board.apply_move(sq("e1"), sq("d2"));
    assert_eq!(Some(sq("d2")), board.king_square(Color::White));
    assert_eq!(Some(sq("e8")), board.king_square(Color::Black));
}

#[test]
fn turn_flow_is_explicit() {
    init();
    let mut board = Board::standard();
    assert_eq!(Color::White, board.side_to_move());

    board.apply_move(sq("e2"), sq("e4"));
    // applying a move does not pass the turn; the game loop does
    assert_eq!(Color::White, board.side_to_move());

    board.next_turn();
    assert_eq!(Color::Black, board.side_to_move());
    board.next_turn();
    assert_eq!(Color::White, board.side_to_move());
}

#[test]
fn rook_moves_revoke_one_wing_king_moves_revoke_both() {
    init();
    let mut board = Board::from_strings([
        "r...k..r",
        "........",
        "........",
        "........",
        "........",
        "........",
        "........",
        "R...K..R",
    ]);

    board.apply_move(sq("h1"), sq("h4"));
    assert!(!board.can_castle_kingside(Color::White));
    assert!(board.can_castle_queenside(Color::White));

    board.apply_move(sq("e8"), sq("e7"));
    assert!(!board.can_castle_kingside(Color::Black));
    assert!(!board.can_castle_queenside(Color::Black));

    // white's queenside is untouched by all of the above
    assert!(board.can_castle_queenside(Color::White));
}

#[test]
fn castled_rook_relocation_leaves_other_rights_alone() {
    init();
    let mut board = Board::from_strings([
        "r...k..r",
        "........",
        "........",
        "........",
        "........",
        "........",
        "........",
        "R...K..R",
    ]);

    board.apply_move(sq("e1"), sq("g1"));

    // the rook hopping h1 -> f1 is part of the castle, not a rook move
    // that should touch black's bookkeeping
    assert!(board.can_castle_kingside(Color::Black));
    assert!(board.can_castle_queenside(Color::Black));
    assert!(!board.can_castle_kingside(Color::White));
    assert!(!board.can_castle_queenside(Color::White));
}

#[test]
#[should_panic(expected = "no piece at the origin")]
fn moving_from_an_empty_square_is_a_caller_error() {
    init();
    let mut board = Board::new();
    board.apply_move(sq("e4"), sq("e5"));
}
