//! Perft oracles: the number of leaf positions reachable in exactly N plies
//! must match the published reference counts.

use larkchess::{Situation, Variant};

fn perft(variant: Variant, fen: &str, depth: usize) -> u64 {
    Situation::from_fen(variant, fen)
        .unwrap_or_else(|e| panic!("bad fen {:?}: {}", fen, e))
        .perft(depth)
}

#[test]
fn perft_initial() {
    let pos = Situation::new(Variant::Standard);
    assert_eq!(pos.perft(1), 20);
    assert_eq!(pos.perft(2), 400);
    assert_eq!(pos.perft(3), 8_902);
    assert_eq!(pos.perft(4), 197_281);
    assert_eq!(pos.perft(5), 4_865_609);
}

#[test]
fn perft_kiwipete() {
    const FEN: &str = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1";
    assert_eq!(perft(Variant::Standard, FEN, 1), 48);
    assert_eq!(perft(Variant::Standard, FEN, 2), 2_039);
    assert_eq!(perft(Variant::Standard, FEN, 3), 97_862);
    assert_eq!(perft(Variant::Standard, FEN, 4), 4_085_603);
}

#[test]
fn perft_endgame() {
    const FEN: &str = "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1";
    assert_eq!(perft(Variant::Standard, FEN, 1), 14);
    assert_eq!(perft(Variant::Standard, FEN, 2), 191);
    assert_eq!(perft(Variant::Standard, FEN, 3), 2_812);
    assert_eq!(perft(Variant::Standard, FEN, 4), 43_238);
    assert_eq!(perft(Variant::Standard, FEN, 5), 674_624);
}

#[test]
fn perft_promotions_and_pins() {
    const FEN: &str = "r3k2r/Pppp1ppp/1b3nbN/nP6/BBP1P3/q4N2/Pp1P2pP/R2Q1RQ1 w kq - 0 1";
    assert_eq!(perft(Variant::Standard, FEN, 1), 6);
    assert_eq!(perft(Variant::Standard, FEN, 2), 264);
    assert_eq!(perft(Variant::Standard, FEN, 3), 9_467);
    assert_eq!(perft(Variant::Standard, FEN, 4), 422_333);
}

#[test]
fn perft_three_check_matches_standard_from_start() {
    // Check counting only affects termination, never the move set, so the
    // counts from the initial position coincide with standard chess.
    let pos = Situation::new(Variant::ThreeCheck);
    assert_eq!(pos.perft(3), 8_902);
    assert_eq!(pos.perft(4), 197_281);
}

#[test]
fn perft_chess960_classical_array() {
    // The classical setup is one of the 960 start arrays; the generalized
    // castling rules must reproduce the standard counts, castling included.
    let pos = Situation::new(Variant::Chess960);
    assert_eq!(pos.perft(4), 197_281);
    assert_eq!(pos.perft(5), 4_865_609);
}

#[test]
fn perft_crazyhouse_from_start() {
    // Pockets are still empty at this depth, so the counts match standard.
    let pos = Situation::new(Variant::Crazyhouse);
    assert_eq!(pos.perft(3), 8_902);
}

#[test]
fn perft_antichess() {
    let pos = Situation::new(Variant::Antichess);
    assert_eq!(pos.perft(1), 20);
    assert_eq!(pos.perft(2), 400);
    assert_eq!(pos.perft(3), 8_067);
    assert_eq!(pos.perft(4), 153_299);
}

#[test]
fn perft_horde() {
    let pos = Situation::new(Variant::Horde);
    assert_eq!(pos.perft(1), 8);
    assert_eq!(pos.perft(2), 128);
    assert_eq!(pos.perft(3), 1_274);
}

#[test]
fn perft_racing_kings() {
    let pos = Situation::new(Variant::RacingKings);
    assert_eq!(pos.perft(1), 21);
}
