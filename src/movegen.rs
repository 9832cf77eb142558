// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Per-piece move generation and the check/pin legality filter.
//!
//! The per-kind generators produce *pseudo-legal* destinations: geometry
//! and occupancy only, ignoring the mover's own king. `legal_moves` layers
//! the king-safety filter on top; the king is the one kind that filters
//! itself, candidate by candidate.
use arrayvec::ArrayVec;

use crate::attacks;
use crate::board::Board;
use crate::types::{
    CastleSide, Color, Direction, File, PieceKind, Square, CARDINALS, DIAGONALS, DIRECTIONS,
    KNIGHT_JUMPS,
};

/// Destination list for a single piece. A queen in the open tops out at 27
/// destinations; a castling-capable king at 10.
pub type MoveVec = ArrayVec<[Square; 32]>;

/// Every destination the piece on `from` may legally move to. An empty
/// origin yields an empty list; illegality is an absence, never an error.
///
/// The board is borrowed mutably for the speculative vacate-and-probe
/// checks, but it is restored before the call returns.
pub fn legal_moves(board: &mut Board, from: Square) -> MoveVec {
    let piece = match board.piece_at(from) {
        Some(piece) => piece,
        None => return MoveVec::new(),
    };

    match piece.kind {
        PieceKind::King => king_moves(board, from, piece.color),
        _ => {
            let candidates = pseudo_legal_moves(board, from);
            prune_exposing_moves(board, from, piece.color, candidates)
        }
    }
}

/// Geometry-and-occupancy destinations for the piece on `from`, with no
/// king-safety filtering at all. Castling is a legality-layer concern and
/// is likewise absent here.
pub fn pseudo_legal_moves(board: &Board, from: Square) -> MoveVec {
    let piece = match board.piece_at(from) {
        Some(piece) => piece,
        None => return MoveVec::new(),
    };

    match piece.kind {
        PieceKind::Pawn => pawn_moves(board, from, piece.color),
        PieceKind::Knight => knight_moves(board, from, piece.color),
        PieceKind::Bishop => slider_moves(board, from, piece.color, &DIAGONALS),
        PieceKind::Rook => slider_moves(board, from, piece.color, &CARDINALS),
        PieceKind::Queen => {
            let mut moves = slider_moves(board, from, piece.color, &DIAGONALS);
            moves.extend(slider_moves(board, from, piece.color, &CARDINALS));
            moves
        }
        PieceKind::King => king_steps(board, from, piece.color),
    }
}

fn pawn_moves(board: &Board, from: Square, color: Color) -> MoveVec {
    let mut moves = MoveVec::new();
    let (forward, _) = color.forward().as_vector();

    let one_ahead = board.offset_square(from, forward, 0);
    if let Some(to) = one_ahead {
        if board.is_empty(to) {
            moves.push(to);
        }
    }

    if from.rank() == color.pawn_start_rank() {
        if let (Some(one), Some(two)) = (one_ahead, board.offset_square(from, forward * 2, 0)) {
            if board.is_empty(one) && board.is_empty(two) {
                moves.push(two);
            }
        }
    }

    for &side in &[-1, 1] {
        if let Some(to) = board.offset_square(from, forward, side) {
            if board.are_enemies(color, to) || board.en_passant_square() == Some(to) {
                moves.push(to);
            }
        }
    }

    moves
}

fn knight_moves(board: &Board, from: Square, color: Color) -> MoveVec {
    let mut moves = MoveVec::new();
    for &(delta_rank, delta_file) in &KNIGHT_JUMPS {
        if let Some(to) = board.offset_square(from, delta_rank, delta_file) {
            if board.is_empty(to) || board.are_enemies(color, to) {
                moves.push(to);
            }
        }
    }

    moves
}

fn slider_moves(
    board: &Board,
    from: Square,
    color: Color,
    directions: &'static [Direction],
) -> MoveVec {
    let mut moves = MoveVec::new();
    for (_, ray) in board.rays(from, directions) {
        for square in ray {
            if board.is_empty(square) {
                moves.push(square);
                continue;
            }

            if board.are_enemies(color, square) {
                moves.push(square);
            }

            break;
        }
    }

    moves
}

/// The king's plain one-step candidates: adjacent, on the board, and not
/// blocked by a friend. Safety is `king_moves`' problem.
fn king_steps(board: &Board, from: Square, color: Color) -> MoveVec {
    let mut moves = MoveVec::new();
    for &direction in &DIRECTIONS {
        if let Some(to) = board.towards(from, direction) {
            if board.is_empty(to) || board.are_enemies(color, to) {
                moves.push(to);
            }
        }
    }

    moves
}

/// Full king move generation: each step candidate is probed with the king's
/// own square vacated (so a ray through the origin is not falsely blocked
/// by the king itself), then the castling destinations are unioned in.
fn king_moves(board: &mut Board, from: Square, color: Color) -> MoveVec {
    let candidates = king_steps(board, from, color);
    let mut moves = MoveVec::new();
    for to in candidates {
        let exposed = board.with_temporarily_cleared(&[from], |cleared| {
            attacks::is_attacked(cleared, to, color.toggle())
        });
        if !exposed {
            moves.push(to);
        }
    }

    if board.is_able_to_castle(color, CastleSide::Kingside) {
        moves.push(Square::of(from.rank(), File::G));
    }
    if board.is_able_to_castle(color, CastleSide::Queenside) {
        moves.push(Square::of(from.rank(), File::C));
    }

    moves
}

/// The check/pin filter applied to every non-king piece, covering both
/// pins and pre-existing check with one probe: vacate the origin and ask
/// who attacks the king. Vacating a blocker reveals the pinning piece; if
/// the king was already checked, the attacker shows up the same way.
///
/// No attacker: the candidates pass unchanged. Two or more: nothing this
/// piece does can help, only the king may move. Exactly one: either it is
/// unblockable (knight, pawn, king) and capturing it is the only option,
/// or it slides, and the move must land on the attack line between it and
/// the king (capturing included).
fn prune_exposing_moves(
    board: &mut Board,
    from: Square,
    color: Color,
    candidates: MoveVec,
) -> MoveVec {
    let king_square = match board.king_square(color) {
        Some(square) => square,
        None => return candidates,
    };

    let attackers = board.with_temporarily_cleared(&[from], |cleared| {
        attacks::attackers_of(cleared, king_square, color.toggle())
    });

    if attackers.is_empty() {
        return candidates;
    }
    if attackers.len() >= 2 {
        return MoveVec::new();
    }

    let attacker = attackers[0];
    let attacking_piece = board
        .piece_at(attacker)
        .expect("attacker produced for an empty square");
    if !attacking_piece.is_slider() {
        return candidates.into_iter().filter(|&to| to == attacker).collect();
    }

    let direction = king_square
        .direction_towards(attacker)
        .expect("sliding attacker off the king's lines");
    candidates
        .into_iter()
        .filter(|&to| {
            let aligned = match direction {
                // along a northeast/southwest diagonal, rank - file is
                // constant; along the other diagonal, rank + file is
                Direction::NorthEast | Direction::SouthWest => {
                    to.rank_index() - to.file_index()
                        == king_square.rank_index() - king_square.file_index()
                }
                Direction::NorthWest | Direction::SouthEast => {
                    to.rank_index() + to.file_index()
                        == king_square.rank_index() + king_square.file_index()
                }
                Direction::North | Direction::South => to.file() == king_square.file(),
                Direction::East | Direction::West => to.rank() == king_square.rank(),
            };
            aligned && to.within(attacker, king_square)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::convert::TryFrom;

    use super::{legal_moves, pseudo_legal_moves};
    use crate::board::Board;
    use crate::types::Square;

    fn sq(name: &str) -> Square {
        Square::try_from(name).unwrap()
    }

    #[test]
    fn empty_origin_has_no_moves() {
        let mut board = Board::new();
        assert!(pseudo_legal_moves(&board, sq("e4")).is_empty());
        assert!(legal_moves(&mut board, sq("e4")).is_empty());
    }

    #[test]
    fn slider_walks_stop_at_the_first_occupant() {
        let board = Board::from_strings([
            "........",
            "........",
            "........",
            "........",
            "....p...",
            "........",
            "....R...",
            "....K...",
        ]);

        let moves = pseudo_legal_moves(&board, sq("e2"));
        // up to and including the enemy pawn, sideways to both edges,
        // nothing through the friendly king below
        assert!(moves.contains(&sq("e3")));
        assert!(moves.contains(&sq("e4")));
        assert!(!moves.contains(&sq("e5")));
        assert!(moves.contains(&sq("a2")));
        assert!(moves.contains(&sq("h2")));
        assert!(!moves.contains(&sq("e1")));
        assert_eq!(9, moves.len());
    }

    #[test]
    fn queen_combines_both_slider_geometries() {
        let board = Board::from_strings([
            "........",
            "........",
            "........",
            "........",
            "........",
            "........",
            "........",
            "Q.......",
        ]);

        let moves = pseudo_legal_moves(&board, sq("a1"));
        assert_eq!(21, moves.len());
        assert!(moves.contains(&sq("a8")));
        assert!(moves.contains(&sq("h1")));
        assert!(moves.contains(&sq("h8")));
    }

    #[test]
    fn legal_moves_restore_the_board() {
        let mut board = Board::from_strings([
            "....q...",
            "........",
            "........",
            "........",
            "........",
            "........",
            "....N...",
            "....K...",
        ]);

        let before = format!("{}", board);
        let _ = legal_moves(&mut board, sq("e2"));
        let _ = legal_moves(&mut board, sq("e1"));
        assert_eq!(before, format!("{}", board));
    }
}
