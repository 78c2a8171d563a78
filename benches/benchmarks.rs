use criterion::{black_box, criterion_group, criterion_main, Criterion};
use chess_rules::board::Board;
use chess_rules::game::{Game, GameOptions};
use chess_rules::perft::run_perft_test;
use chess_rules::types::{Color, MoveRequest};
use chess_rules::validator::{all_legal_moves, has_any_legal_move, ValidationContext};

const SEB_FEN: &str = "r3k2r/p1ppqpb1/Bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPB1PPP/R3K2R b KQkq - 0 1";

pub fn bench_legal_moves_from_start(c: &mut Criterion) {
    let bo = Board::new();
    let ctx = ValidationContext::new(Color::White);
    c.bench_function("get legal moves from start", |b| {
        b.iter(|| all_legal_moves(black_box(&bo), black_box(&ctx)))
    });
}

pub fn bench_legal_moves_from_seb(c: &mut Criterion) {
    let setup = Board::from_fen(SEB_FEN).unwrap();
    let ctx = ValidationContext::new(setup.active_color);
    c.bench_function("get legal moves from seb", |b| {
        b.iter(|| all_legal_moves(black_box(&setup.board), black_box(&ctx)))
    });
}

pub fn bench_has_any_legal_move_seb(c: &mut Criterion) {
    let setup = Board::from_fen(SEB_FEN).unwrap();
    let ctx = ValidationContext::new(setup.active_color);
    c.bench_function("has any legal move from seb", |b| {
        b.iter(|| has_any_legal_move(black_box(&setup.board), black_box(&ctx)))
    });
}

pub fn bench_commit_opening(c: &mut Criterion) {
    let moves: Vec<MoveRequest> = ["e2e4", "e7e5", "g1f3", "b8c6", "f1b5", "a7a6", "e1g1"]
        .iter()
        .map(|m| MoveRequest::from_coordinates(m).unwrap())
        .collect();
    c.bench_function("commit ruy lopez opening", |b| {
        b.iter(|| {
            let mut game = Game::with_options(GameOptions::default());
            for m in &moves {
                game.commit_move(black_box(*m)).unwrap();
            }
            game
        })
    });
}

pub fn bench_perft_3(c: &mut Criterion) {
    let mut group = c.benchmark_group("flat-sampling");
    group.sample_size(10);

    let bo = Board::new();
    let ctx = ValidationContext::new(Color::White);
    group.bench_function("perft from start 3 ply", |b| {
        b.iter(|| run_perft_test(black_box(&bo), black_box(&ctx), 3))
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_legal_moves_from_start,
    bench_legal_moves_from_seb,
    bench_has_any_legal_move_seb,
    bench_commit_opening,
    bench_perft_3,
);
criterion_main!(benches);
