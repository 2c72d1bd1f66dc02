//! Plays out a short game in every variant by always choosing the first legal
//! move, printing the final position and outcome.

use larkchess::{OutcomeFilter, Situation, Variant};

fn main() {
    for variant in Variant::ALL {
        let mut pos = Situation::new(variant);
        let mut plies = 0;
        while plies < 60 {
            let moves = pos.legal_moves();
            let m = match moves.first() {
                Some(m) => *m,
                None => break,
            };
            pos = pos.play_unchecked(&m);
            plies += 1;
            if pos.outcome(OutcomeFilter::Strict).is_some() {
                break;
            }
        }
        println!("{} after {} plies:", variant, plies);
        println!("{}", pos.board().pretty(larkchess::board::PrettyStyle::Ascii));
        match pos.outcome(OutcomeFilter::Relaxed) {
            Some(outcome) => println!("game over: {}\n", outcome),
            None => println!("game still running: {}\n", pos.fen()),
        }
    }
}
