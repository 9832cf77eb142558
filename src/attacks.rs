// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Attack detection. The one query here answers both "is this king in
//! check" and "may the king step onto this square": every square an enemy
//! piece currently attacks a target from.
use arrayvec::ArrayVec;

use crate::board::Board;
use crate::types::{Color, Direction, Piece, PieceKind, Square, DIRECTIONS, KNIGHT_JUMPS};

/// At most eight ray hits and eight knight probes can attack one square.
pub type AttackerVec = ArrayVec<[Square; 16]>;

/// Every square from which a piece of color `by` attacks `target`.
///
/// Each of the eight rays is walked to its first occupant; that occupant
/// attacks iff its movement geometry matches the ray (or it is a king or
/// pawn at the right adjacency). Occupied squares end the ray either way,
/// friend or foe. Knights are probed separately since nothing blocks them.
pub fn attackers_of(board: &Board, target: Square, by: Color) -> AttackerVec {
    let mut attackers = AttackerVec::new();
    for (direction, ray) in board.rays(target, &DIRECTIONS) {
        for square in ray {
            let piece = match board.piece_at(square) {
                Some(piece) => piece,
                None => continue,
            };

            if piece.color == by && attacks_along(piece, direction, square, target) {
                attackers.push(square);
            }

            break;
        }
    }

    for &(delta_rank, delta_file) in &KNIGHT_JUMPS {
        if let Some(square) = board.offset_square(target, delta_rank, delta_file) {
            if board.piece_at(square) == Some(Piece::new(PieceKind::Knight, by)) {
                attackers.push(square);
            }
        }
    }

    attackers
}

pub fn is_attacked(board: &Board, target: Square, by: Color) -> bool {
    !attackers_of(board, target, by).is_empty()
}

/// Does `piece`, sitting on `from` as the first occupant of the ray cast
/// from `target` in `direction`, actually attack `target`?
fn attacks_along(piece: Piece, direction: Direction, from: Square, target: Square) -> bool {
    match piece.kind {
        PieceKind::Queen => true,
        PieceKind::Bishop => direction.is_diagonal(),
        PieceKind::Rook => !direction.is_diagonal(),
        PieceKind::King => from.distance(target) == 1,
        PieceKind::Pawn => {
            // a pawn only captures one step diagonally forward, so the
            // target must sit one rank ahead of it
            let (forward, _) = piece.color.forward().as_vector();
            direction.is_diagonal()
                && from.distance(target) == 1
                && from.rank_index() + forward == target.rank_index()
        }
        // knights never attack along a ray
        PieceKind::Knight => false,
    }
}
