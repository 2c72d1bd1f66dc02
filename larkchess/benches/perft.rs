use criterion::{black_box, criterion_group, criterion_main, Criterion};
use larkchess::{Situation, Variant};

const BOARDS: [(&str, &str); 5] = [
    (
        "initial",
        "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
    ),
    (
        "kiwipete",
        "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
    ),
    (
        "middle",
        "1rq1r1k1/1p3ppp/pB3n2/3ppP2/Pbb1P3/1PN2B2/2P2QPP/R1R4K w - - 1 21",
    ),
    ("endgame", "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1"),
    (
        "promotions",
        "r3k2r/Pppp1ppp/1b3nbN/nP6/BBP1P3/q4N2/Pp1P2pP/R2Q1RQ1 w kq - 0 1",
    ),
];

fn boards() -> impl Iterator<Item = (&'static str, Situation)> {
    BOARDS
        .iter()
        .map(|&(name, fen)| (name, Situation::from_fen(Variant::Standard, fen).unwrap()))
}

fn bench_legal_moves(c: &mut Criterion) {
    let mut group = c.benchmark_group("legal_moves");
    for (name, pos) in boards() {
        group.bench_function(name, |b| b.iter(|| black_box(pos.legal_moves().len())));
    }
}

fn bench_play(c: &mut Criterion) {
    let mut group = c.benchmark_group("play");
    for (name, pos) in boards() {
        let moves = pos.legal_moves();
        group.bench_function(name, |b| {
            b.iter(|| {
                for m in &moves {
                    black_box(pos.play_unchecked(m));
                }
            })
        });
    }
}

fn bench_perft(c: &mut Criterion) {
    let mut group = c.benchmark_group("perft");
    group.sample_size(10);
    let pos = Situation::new(Variant::Standard);
    group.bench_function("initial_d4", |b| b.iter(|| black_box(pos.perft(4))));
    let pos = Situation::new(Variant::Crazyhouse);
    group.bench_function("crazyhouse_d3", |b| b.iter(|| black_box(pos.perft(3))));
    let pos = Situation::new(Variant::Atomic);
    group.bench_function("atomic_d3", |b| b.iter(|| black_box(pos.perft(3))));
}

criterion_group!(perft, bench_legal_moves, bench_play, bench_perft);
criterion_main!(perft);
