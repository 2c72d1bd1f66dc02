//! End-to-end legality scenarios: short move sequences whose resulting
//! situation must satisfy specific predicates.

use larkchess::{Color, Outcome, OutcomeFilter, Situation, Variant, WinReason};

#[test]
fn italian_opening_position() {
    let pos = Situation::new(Variant::Standard)
        .play_uci_list("e2e4 e7e5 g1f3 b8c6 f1b5")
        .unwrap();
    assert_eq!(pos.turn(), Color::Black);
    assert!(!pos.is_check());
    assert!(pos.play_uci("a7a6").is_ok());
}

#[test]
fn en_passant_only_after_double_push() {
    let pos = Situation::from_fen(
        Variant::Standard,
        "rnbqkbnr/pppp1ppp/8/4p3/4P3/8/PPPP1PPP/RNBQKBNR w KQkq - 0 2",
    )
    .unwrap();
    // After the double push the capture target exists...
    let pos = pos.play_uci("f2f4").unwrap();
    assert_eq!(pos.ep_square(), Some("f3".parse().unwrap()));
    // ...but once the pawn is captured normally, the previous move is a
    // capture rather than a double push, so no en passant is available.
    let pos = pos.play_uci("e5f4").unwrap();
    assert_eq!(pos.ep_square(), None);
    assert!(pos
        .legal_moves()
        .iter()
        .all(|m| !m.is_en_passant()));
}

#[test]
fn threefold_by_knight_shuffle() {
    let pos = Situation::new(Variant::Standard)
        .play_uci_list("g1f3 g8f6 f3g1 f6g8 g1f3 g8f6 f3g1 f6g8")
        .unwrap();
    assert!(pos.threefold_repetition());
    assert!(!pos.fivefold_repetition());
    assert_eq!(
        pos.outcome(OutcomeFilter::Relaxed),
        Some(Outcome::Draw(larkchess::DrawReason::Repeat3))
    );
    // The mandatory rules do not end the game yet.
    assert_eq!(pos.outcome(OutcomeFilter::Strict), None);
}

#[test]
fn fivefold_by_knight_shuffle() {
    let shuffle = "g1f3 g8f6 f3g1 f6g8 ";
    let pos = Situation::new(Variant::Standard)
        .play_uci_list(&shuffle.repeat(4))
        .unwrap();
    assert!(pos.fivefold_repetition());
    assert_eq!(
        pos.outcome(OutcomeFilter::Strict),
        Some(Outcome::Draw(larkchess::DrawReason::Repeat5))
    );
}

#[test]
fn atomic_scholars_explosion_is_terminal() {
    let pos = Situation::new(Variant::Atomic)
        .play_uci_list("e2e4 e7e5 d1h5 b8c6 f1c4 g8f6 h5f7")
        .unwrap();
    assert_eq!(pos.board().king_of(Color::Black), None);
    assert!(pos.is_terminal());
    assert_eq!(
        pos.outcome(OutcomeFilter::Force),
        Some(Outcome::Win {
            side: Color::White,
            reason: WinReason::KingExploded
        })
    );
}

#[test]
fn hash_history_grows_one_entry_per_move() {
    let mut pos = Situation::new(Variant::Standard);
    assert_eq!(pos.history().position_hashes.len(), 1);
    for (i, mv) in ["d2d4", "d7d5", "c1f4", "c8f5"].iter().enumerate() {
        pos = pos.play_uci(mv).unwrap();
        assert_eq!(pos.history().position_hashes.len(), i + 2);
    }
}
