// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
use std::convert::TryFrom;
use std::fmt;

use arrayvec::ArrayVec;
use num_traits::FromPrimitive;

use crate::attacks;
use crate::types::{
    CastleSide, CastleStatus, Color, Direction, File, Piece, PieceKind, Rank, Square, FILES, RANKS,
};

/// Possible errors that can arise when parsing a FEN string into a `Board`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FenParseError {
    UnexpectedChar(char),
    UnexpectedEnd,
    InvalidDigit,
    FileDoesNotSumToEight,
    UnknownPiece,
    InvalidSideToMove,
    InvalidCastle,
    InvalidEnPassant,
}

/// One cell of the bordered grid. The interior holds pieces or nothing;
/// everything outside it is `OutOfBounds`, so walks off the edge read a
/// sentinel instead of needing a range check.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Cell {
    OutOfBounds,
    Empty,
    Occupied(Piece),
}

// The interior is 8x8; the border is two cells thick on every side so that
// knight probes (which reach two squares out) always land inside the grid.
const BORDER: usize = 2;
const GRID: usize = 8 + 2 * BORDER;

fn square_at(rank: i32, file: i32) -> Square {
    Square::of(Rank::from_i32(rank).unwrap(), File::from_i32(file).unwrap())
}

/// The central game aggregate: piece occupancy plus the bookkeeping state
/// derived from moves (castle rights, the en-passant target, the king
/// location cache, and the side to move).
///
/// All occupancy writes funnel through `place_piece`/`remove_piece`, which
/// keep the king cache synchronized.
pub struct Board {
    grid: [[Cell; GRID]; GRID],
    kings: [Option<Square>; 2],
    castle_status: CastleStatus,
    en_passant_square: Option<Square>,
    side_to_move: Color,
    promotion_choice: Option<Box<dyn FnMut() -> PieceKind>>,
}

//
// Construction
//

impl Board {
    /// An empty board: no pieces, both colors retaining full castle rights
    /// (rights only decay; with no rook on the corner the castling
    /// validator refuses anyway).
    pub fn new() -> Board {
        let mut grid = [[Cell::OutOfBounds; GRID]; GRID];
        for row in grid.iter_mut().skip(BORDER).take(8) {
            for cell in row.iter_mut().skip(BORDER).take(8) {
                *cell = Cell::Empty;
            }
        }

        Board {
            grid,
            kings: [None; 2],
            castle_status: CastleStatus::ALL,
            en_passant_square: None,
            side_to_move: Color::White,
            promotion_choice: None,
        }
    }

    pub fn standard() -> Board {
        Board::from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1").unwrap()
    }

    /// Builds a board from eight rows of eight characters, rank eight
    /// first, `.` marking an empty square. This is the diagram notation the
    /// test suites are written in.
    ///
    /// Panics on a malformed diagram; it is a fixture constructor, not a
    /// parsing boundary.
    pub fn from_strings(rows: [&str; 8]) -> Board {
        let mut board = Board::new();
        for (row, &rank) in rows.iter().zip(RANKS.iter().rev()) {
            let chars: Vec<char> = row.chars().collect();
            assert!(
                chars.len() == 8,
                "board diagram rows must be eight characters"
            );
            for (&chr, &file) in chars.iter().zip(FILES.iter()) {
                if chr == '.' {
                    continue;
                }

                let piece = Piece::try_from(chr)
                    .unwrap_or_else(|_| panic!("unrecognized piece character {:?}", chr));
                board.place_piece(Square::of(rank, file), piece);
            }
        }

        board
    }

    /// Constructs a board from the FEN rendering of a position. The
    /// occupancy, side to move, castle rights, and en-passant fields are
    /// honored; anything after them (the move clocks) is ignored.
    pub fn from_fen<S: AsRef<str>>(fen: S) -> Result<Board, FenParseError> {
        use std::iter::Peekable;
        use std::str::Chars;

        type Stream<'a> = Peekable<Chars<'a>>;

        fn eat<'a>(iter: &mut Stream<'a>, expected: char) -> Result<(), FenParseError> {
            match iter.next() {
                Some(c) if c == expected => Ok(()),
                Some(c) => Err(FenParseError::UnexpectedChar(c)),
                None => Err(FenParseError::UnexpectedEnd),
            }
        }

        fn advance<'a>(iter: &mut Stream<'a>) -> Result<(), FenParseError> {
            let _ = iter.next();
            Ok(())
        }

        fn peek<'a>(iter: &mut Stream<'a>) -> Result<char, FenParseError> {
            if let Some(c) = iter.peek() {
                Ok(*c)
            } else {
                Err(FenParseError::UnexpectedEnd)
            }
        }

        fn eat_side_to_move<'a>(iter: &mut Stream<'a>) -> Result<Color, FenParseError> {
            let side = match peek(iter)? {
                'w' => Color::White,
                'b' => Color::Black,
                _ => return Err(FenParseError::InvalidSideToMove),
            };

            advance(iter)?;
            Ok(side)
        }

        fn eat_castle_status<'a>(iter: &mut Stream<'a>) -> Result<CastleStatus, FenParseError> {
            if peek(iter)? == '-' {
                advance(iter)?;
                return Ok(CastleStatus::NONE);
            }

            let mut status = CastleStatus::NONE;
            for _ in 0..4 {
                match peek(iter)? {
                    'K' => status |= CastleStatus::WHITE_KINGSIDE,
                    'k' => status |= CastleStatus::BLACK_KINGSIDE,
                    'Q' => status |= CastleStatus::WHITE_QUEENSIDE,
                    'q' => status |= CastleStatus::BLACK_QUEENSIDE,
                    ' ' => break,
                    _ => return Err(FenParseError::InvalidCastle),
                }

                advance(iter)?;
            }

            Ok(status)
        }

        fn eat_en_passant<'a>(iter: &mut Stream<'a>) -> Result<Option<Square>, FenParseError> {
            let c = peek(iter)?;
            if c == '-' {
                advance(iter)?;
                return Ok(None);
            }

            if let Ok(file) = File::try_from(c) {
                advance(iter)?;
                let rank_c = peek(iter)?;
                if let Ok(rank) = Rank::try_from(rank_c) {
                    advance(iter)?;
                    Ok(Some(Square::of(rank, file)))
                } else {
                    Err(FenParseError::InvalidEnPassant)
                }
            } else {
                Err(FenParseError::InvalidEnPassant)
            }
        }

        let mut board = Board::new();
        let str_ref = fen.as_ref();
        let iter = &mut str_ref.chars().peekable();
        for &rank in RANKS.iter().rev() {
            let mut file = 0;
            while file <= 7 {
                let c = peek(iter)?;
                // digits 1 through 8 indicate empty squares.
                if c.is_digit(10) {
                    if c < '1' || c > '8' {
                        return Err(FenParseError::InvalidDigit);
                    }

                    let value = c as usize - 48;
                    file += value;
                    if file > 8 {
                        return Err(FenParseError::FileDoesNotSumToEight);
                    }

                    advance(iter)?;
                    continue;
                }

                // if it's not a digit, it represents a piece.
                let piece = if let Ok(piece) = Piece::try_from(c) {
                    piece
                } else {
                    return Err(FenParseError::UnknownPiece);
                };

                let square = Square::of(rank, File::from_usize(file).unwrap());
                board.place_piece(square, piece);
                advance(iter)?;
                file += 1;
            }

            if rank != Rank::One {
                eat(iter, '/')?;
            }
        }

        eat(iter, ' ')?;
        board.side_to_move = eat_side_to_move(iter)?;
        eat(iter, ' ')?;
        board.castle_status = eat_castle_status(iter)?;
        eat(iter, ' ')?;
        board.en_passant_square = eat_en_passant(iter)?;
        Ok(board)
    }

    /// Installs the callback consulted when a pawn reaches its last rank.
    pub fn set_promotion_choice<F>(&mut self, choice: F)
    where
        F: FnMut() -> PieceKind + 'static,
    {
        self.promotion_choice = Some(Box::new(choice));
    }
}

//
// State getters
//

impl Board {
    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    pub fn en_passant_square(&self) -> Option<Square> {
        self.en_passant_square
    }

    pub fn king_square(&self, color: Color) -> Option<Square> {
        self.kings[color as usize]
    }

    pub fn can_castle_kingside(&self, color: Color) -> bool {
        self.castle_status.contains(kingside_castle_mask(color))
    }

    pub fn can_castle_queenside(&self, color: Color) -> bool {
        self.castle_status.contains(queenside_castle_mask(color))
    }

    /// Rank-major, file-minor view of the 8x8 interior, rank eight first:
    /// the orientation a display draws in. The border never appears.
    pub fn projection(&self) -> [[Option<Piece>; 8]; 8] {
        let mut rows = [[None; 8]; 8];
        for (row, &rank) in rows.iter_mut().zip(RANKS.iter().rev()) {
            for (slot, &file) in row.iter_mut().zip(FILES.iter()) {
                *slot = self.piece_at(Square::of(rank, file));
            }
        }

        rows
    }
}

//
// Spatial queries
//

impl Board {
    fn cell(&self, rank: i32, file: i32) -> Cell {
        let row = rank + BORDER as i32;
        let col = file + BORDER as i32;
        if row < 0 || col < 0 || row >= GRID as i32 || col >= GRID as i32 {
            return Cell::OutOfBounds;
        }

        self.grid[row as usize][col as usize]
    }

    fn cell_at(&self, square: Square) -> Cell {
        self.cell(square.rank_index(), square.file_index())
    }

    fn cell_mut(&mut self, square: Square) -> &mut Cell {
        let row = (square.rank_index() + BORDER as i32) as usize;
        let col = (square.file_index() + BORDER as i32) as usize;
        &mut self.grid[row][col]
    }

    pub fn piece_at(&self, square: Square) -> Option<Piece> {
        match self.cell_at(square) {
            Cell::Occupied(piece) => Some(piece),
            _ => None,
        }
    }

    pub fn is_empty(&self, square: Square) -> bool {
        self.cell_at(square) == Cell::Empty
    }

    /// Whether the given raw rank/file coordinates name an interior square.
    pub fn is_in_bounds(&self, rank: i32, file: i32) -> bool {
        match self.cell(rank, file) {
            Cell::OutOfBounds => false,
            _ => true,
        }
    }

    /// Whether the piece on `square` (if any) belongs to the enemy of
    /// `color`.
    pub fn are_enemies(&self, color: Color, square: Square) -> bool {
        match self.piece_at(square) {
            Some(piece) => piece.color != color,
            None => false,
        }
    }

    /// The square `delta_rank`/`delta_file` away from `from`, or `None`
    /// when the probe lands on the border. This is the single-step cousin
    /// of `ray` used for knight jumps, king steps, and pawn pushes.
    pub fn offset_square(&self, from: Square, delta_rank: i32, delta_file: i32) -> Option<Square> {
        let rank = from.rank_index() + delta_rank;
        let file = from.file_index() + delta_file;
        match self.cell(rank, file) {
            Cell::OutOfBounds => None,
            _ => Some(square_at(rank, file)),
        }
    }

    /// One step from `from` in `direction`, or `None` at the edge.
    pub fn towards(&self, from: Square, direction: Direction) -> Option<Square> {
        let (delta_rank, delta_file) = direction.as_vector();
        self.offset_square(from, delta_rank, delta_file)
    }

    /// Walks outward from `from` (exclusive) in `direction` until the
    /// border sentinel. The walk is finite and restartable: each call
    /// starts a fresh iterator.
    pub fn ray(&self, from: Square, direction: Direction) -> Ray {
        let (delta_rank, delta_file) = direction.as_vector();
        Ray {
            board: self,
            rank: from.rank_index(),
            file: from.file_index(),
            delta_rank,
            delta_file,
            done: false,
        }
    }

    /// Batched form of `ray`, pairing each direction with its walk.
    pub fn rays<'a>(
        &'a self,
        from: Square,
        directions: &'static [Direction],
    ) -> impl Iterator<Item = (Direction, Ray<'a>)> {
        directions
            .iter()
            .map(move |&direction| (direction, self.ray(from, direction)))
    }

    /// Runs `f` with the given squares vacated, restoring their occupants
    /// on every exit path. A panic inside `f` must not leave the board
    /// corrupted, since callers use this for speculative attack probes.
    pub fn with_temporarily_cleared<F, R>(&mut self, squares: &[Square], f: F) -> R
    where
        F: FnOnce(&mut Board) -> R,
    {
        struct Restore<'a> {
            board: &'a mut Board,
            saved: ArrayVec<[(Square, Piece); 8]>,
        }

        impl<'a> Drop for Restore<'a> {
            fn drop(&mut self) {
                for &(square, piece) in self.saved.iter() {
                    self.board.place_piece(square, piece);
                }
            }
        }

        let mut saved = ArrayVec::new();
        for &square in squares {
            if let Some(piece) = self.piece_at(square) {
                saved.push((square, piece));
                self.remove_piece(square);
            }
        }

        let mut guard = Restore { board: self, saved };
        f(&mut *guard.board)
    }

    pub fn is_in_check(&self, color: Color) -> bool {
        match self.king_square(color) {
            Some(king) => attacks::is_attacked(self, king, color.toggle()),
            None => false,
        }
    }
}

/// A lazy walk along one direction; see `Board::ray`.
pub struct Ray<'a> {
    board: &'a Board,
    rank: i32,
    file: i32,
    delta_rank: i32,
    delta_file: i32,
    done: bool,
}

impl<'a> Iterator for Ray<'a> {
    type Item = Square;

    fn next(&mut self) -> Option<Square> {
        if self.done {
            return None;
        }

        self.rank += self.delta_rank;
        self.file += self.delta_file;
        match self.board.cell(self.rank, self.file) {
            Cell::OutOfBounds => {
                self.done = true;
                None
            }
            _ => Some(square_at(self.rank, self.file)),
        }
    }
}

//
// Castling
//

impl Board {
    /// Full castling-legality decision for one wing: the right must still
    /// be held, the king must not currently be in check, the file toward
    /// the corner must be clear up to a friendly rook sitting exactly on
    /// the corner, and neither square the king crosses (the one it passes
    /// over and the one it lands on) may be attacked.
    pub fn is_able_to_castle(&self, color: Color, side: CastleSide) -> bool {
        let (right, walk, corner) = match side {
            CastleSide::Kingside => (kingside_castle_mask(color), Direction::East, File::H),
            CastleSide::Queenside => (queenside_castle_mask(color), Direction::West, File::A),
        };

        if !self.castle_status.contains(right) {
            return false;
        }

        let king_square = match self.king_square(color) {
            Some(square) => square,
            None => return false,
        };

        if attacks::is_attacked(self, king_square, color.toggle()) {
            return false;
        }

        let mut crossed = 0;
        for square in self.ray(king_square, walk) {
            match self.piece_at(square) {
                None => {
                    crossed += 1;
                    if crossed <= 2 && attacks::is_attacked(self, square, color.toggle()) {
                        return false;
                    }
                }
                Some(piece) => {
                    // the first occupied square must be the corner rook;
                    // anything else blocks the file
                    return square.file() == corner && piece == Piece::new(PieceKind::Rook, color);
                }
            }
        }

        // ran off the board without meeting a rook
        false
    }
}

//
// Mutation
//

impl Board {
    /// The single occupancy write path. Writing a king also records its
    /// location in the king cache.
    pub fn place_piece(&mut self, square: Square, piece: Piece) {
        *self.cell_mut(square) = Cell::Occupied(piece);
        if piece.kind == PieceKind::King {
            self.kings[piece.color as usize] = Some(square);
        }
    }

    pub fn remove_piece(&mut self, square: Square) {
        *self.cell_mut(square) = Cell::Empty;
    }

    pub fn next_turn(&mut self) {
        self.side_to_move = self.side_to_move.toggle();
    }

    /// Moves whatever sits on `from` to `to`, then runs the bookkeeping
    /// pipeline: castle-right revocation, the castling rook relocation, the
    /// en-passant capture and target window, and promotion. Legality is the
    /// caller's responsibility; an empty origin is a programming error.
    pub fn apply_move(&mut self, from: Square, to: Square) {
        let piece = self
            .piece_at(from)
            .expect("apply_move: no piece at the origin square");
        debug!("applying move: {}{}", from, to);

        // A rook leaving its home corner gives up that wing's castle. The
        // castling rook relocation below bypasses this on purpose.
        if piece.kind == PieceKind::Rook && !(self.castle_status & castle_mask(piece.color)).is_empty()
        {
            match from.file() {
                File::A => self.castle_status &= !queenside_castle_mask(piece.color),
                File::H => self.castle_status &= !kingside_castle_mask(piece.color),
                _ => {}
            }
        }

        self.remove_piece(from);
        self.place_piece(to, piece);

        if piece.kind == PieceKind::King {
            self.castle_status &= !castle_mask(piece.color);
            if from.rank() == to.rank() && from.distance(to) == 2 {
                // The king went two files over: this is a castle, so the
                // matching rook comes across with it.
                let (corner_file, castled_file) = match from.direction_towards(to) {
                    Some(Direction::East) => (File::H, File::F),
                    _ => (File::A, File::D),
                };

                let corner = Square::of(from.rank(), corner_file);
                let castled = Square::of(from.rank(), castled_file);
                let rook = self
                    .piece_at(corner)
                    .expect("apply_move: castling with no rook on the corner");
                debug!("castling: rook {} -> {}", corner, castled);
                self.remove_piece(corner);
                self.place_piece(castled, rook);
            }
        }

        if self.en_passant_square == Some(to) && piece.kind == PieceKind::Pawn {
            // The captured pawn sits beside the destination, not on it.
            let captured = Square::of(from.rank(), to.file());
            debug!("en passant: removing pawn on {}", captured);
            self.remove_piece(captured);
        }

        // The en-passant window is exactly one move wide: every move closes
        // it, and only a double pawn push opens a new one.
        self.en_passant_square = None;
        if piece.kind == PieceKind::Pawn && from.distance(to) == 2 {
            let (forward, _) = piece.color.forward().as_vector();
            let behind = self
                .offset_square(to, -forward, 0)
                .expect("double-push destination always has a square behind it");
            self.en_passant_square = Some(behind);
        }

        if piece.kind == PieceKind::Pawn && to.rank() == piece.color.promotion_rank() {
            let kind = {
                let choice = self
                    .promotion_choice
                    .as_mut()
                    .expect("apply_move: pawn promoted with no promotion handler installed");
                choice()
            };
            debug!("promoting pawn on {} to {:?}", to, kind);
            self.place_piece(to, Piece::new(kind, piece.color));
        }
    }
}

//
// Trait implementations
//

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for &rank in RANKS.iter().rev() {
            for &file in &FILES {
                let square = Square::of(rank, file);
                if let Some(piece) = self.piece_at(square) {
                    write!(f, " {} ", piece)?;
                } else {
                    write!(f, " . ")?;
                }
            }

            writeln!(f, "| {}", rank)?;
        }

        for _ in &FILES {
            write!(f, "---")?;
        }

        writeln!(f)?;
        for &file in &FILES {
            write!(f, " {} ", file)?;
        }

        writeln!(f)?;
        Ok(())
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Board")
            .field("side_to_move", &self.side_to_move)
            .field("castle_status", &self.castle_status)
            .field("en_passant_square", &self.en_passant_square)
            .field("kings", &self.kings)
            .finish()
    }
}

impl Default for Board {
    fn default() -> Self {
        Board::new()
    }
}

//
// Helper functions
//

fn kingside_castle_mask(color: Color) -> CastleStatus {
    match color {
        Color::White => CastleStatus::WHITE_KINGSIDE,
        Color::Black => CastleStatus::BLACK_KINGSIDE,
    }
}

fn queenside_castle_mask(color: Color) -> CastleStatus {
    match color {
        Color::White => CastleStatus::WHITE_QUEENSIDE,
        Color::Black => CastleStatus::BLACK_QUEENSIDE,
    }
}

fn castle_mask(color: Color) -> CastleStatus {
    match color {
        Color::White => CastleStatus::WHITE,
        Color::Black => CastleStatus::BLACK,
    }
}
