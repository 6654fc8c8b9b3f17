//! Benchmarks for move generation, search and evaluation.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use chessium::board::Position;
use chessium::evaluation::{Evaluator, MaterialEvaluator};
use chessium::search::{SearchConfig, Searcher};

const KIWIPETE: &str = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1";

fn bench_perft(c: &mut Criterion) {
    let mut group = c.benchmark_group("perft");

    let startpos = Position::initial();
    for depth in 1..=4 {
        group.bench_with_input(BenchmarkId::new("startpos", depth), &depth, |b, &depth| {
            b.iter(|| startpos.perft(black_box(depth)))
        });
    }

    let kiwipete = Position::from_fen(KIWIPETE).unwrap();
    for depth in 1..=3 {
        group.bench_with_input(BenchmarkId::new("kiwipete", depth), &depth, |b, &depth| {
            b.iter(|| kiwipete.perft(black_box(depth)))
        });
    }

    group.finish();
}

fn bench_movegen(c: &mut Criterion) {
    let mut group = c.benchmark_group("movegen");

    let positions = [
        ("startpos", Position::initial()),
        (
            "middlegame",
            Position::from_fen("r1bqkb1r/pppp1ppp/2n2n2/4p3/2B1P3/5N2/PPPP1PPP/RNBQK2R w KQkq - 4 4")
                .unwrap(),
        ),
        ("kiwipete", Position::from_fen(KIWIPETE).unwrap()),
    ];
    for (name, position) in &positions {
        group.bench_function(*name, |b| b.iter(|| black_box(position.legal_moves())));
    }

    group.finish();
}

fn bench_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("search");
    group.sample_size(10);

    let startpos = Position::initial();
    for depth in [3, 4, 5] {
        group.bench_with_input(BenchmarkId::new("startpos", depth), &depth, |b, &depth| {
            b.iter(|| {
                let config = SearchConfig::with_threads(1).depth(depth).unlimited_time();
                Searcher::with_config(config).search(&startpos)
            })
        });
    }

    let kiwipete = Position::from_fen(KIWIPETE).unwrap();
    for threads in [1, 2, 4] {
        group.bench_with_input(BenchmarkId::new("threads", threads), &threads, |b, &threads| {
            b.iter(|| {
                let config = SearchConfig::with_threads(threads).depth(4).unlimited_time();
                Searcher::with_config(config).search(&kiwipete)
            })
        });
    }

    group.finish();
}

fn bench_eval(c: &mut Criterion) {
    let mut group = c.benchmark_group("eval");

    let positions = [
        ("startpos", Position::initial()),
        ("kiwipete", Position::from_fen(KIWIPETE).unwrap()),
        ("endgame", Position::from_fen("8/5k2/8/8/8/8/5K2/4R3 w - - 0 1").unwrap()),
    ];
    for (name, position) in &positions {
        group.bench_with_input(BenchmarkId::new("position", name), position, |b, position| {
            b.iter(|| black_box(MaterialEvaluator.evaluate(position)))
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_perft,
    bench_movegen,
    bench_search,
    bench_eval
);
criterion_main!(benches);
