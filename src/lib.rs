// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The rules core of a chess implementation: a sentinel-bordered board,
//! attack detection, per-piece legal-move generation with full check, pin,
//! castling, en-passant, and promotion handling. Position import, display,
//! game-end classification, and anything resembling a search live with the
//! consumers of this crate.

#[macro_use]
extern crate bitflags;
#[macro_use]
extern crate log;
#[macro_use]
extern crate num_derive;

pub mod attacks;
mod board;
mod movegen;
mod types;

pub use board::{Board, FenParseError, Ray};
pub use movegen::{legal_moves, pseudo_legal_moves, MoveVec};
pub use types::{
    CastleSide, CastleStatus, Color, Direction, File, Piece, PieceKind, Rank, Square, COLORS,
    FILES, PIECE_KINDS, RANKS,
};
