// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

#[macro_use]
extern crate criterion;

use std::convert::TryFrom;

use caissa::attacks;
use caissa::{legal_moves, Board, Color, Square};
use criterion::black_box;
use criterion::Criterion;

fn criterion_benchmark(c: &mut Criterion) {
    c.bench_function("attackers of e4 starting position", |b| {
        let board = Board::standard();
        let target = Square::try_from("e4").unwrap();
        b.iter(|| attacks::attackers_of(black_box(&board), target, Color::White))
    });

    c.bench_function("legal moves g1 knight", |b| {
        let mut board = Board::standard();
        let from = Square::try_from("g1").unwrap();
        b.iter(|| legal_moves(black_box(&mut board), from))
    });

    c.bench_function("legal moves e1 king open board", |b| {
        let mut board = Board::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
        let from = Square::try_from("e1").unwrap();
        b.iter(|| legal_moves(black_box(&mut board), from))
    });

    c.bench_function("standard setup", |b| b.iter(Board::standard));
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
