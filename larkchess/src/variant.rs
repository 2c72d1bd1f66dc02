//! Variant rules
//!
//! A [`Variant`] is a small value dispatched over everywhere a rule can differ:
//! the starting position, the legal-move filter, capture side effects, the
//! promotion set, terminal detection and insufficient material. Most variants
//! share the staged generator of [`movegen`](crate::movegen); Atomic and Racing
//! Kings apply an extra make-and-test filter because explosions and the
//! no-checks rule cannot be expressed through pin reasoning alone.

use crate::bitboard::Bitboard;
use crate::board::Board;
use crate::movegen::{self, GenOpts, MoveList};
use crate::moves::{CastlingMode, Move};
use crate::position::Situation;
use crate::types::{Color, DrawReason, Outcome, Rank, Role, WinReason};
use crate::{bitboard_consts, geometry};

use std::fmt;

/// The chess variant being played
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Variant {
    /// Standard chess
    Standard,
    /// Standard rules with generalized castling from randomized setups
    Chess960,
    /// Deliver three checks to win
    ThreeCheck,
    /// Captures are mandatory; lose all your pieces (or get stalemated) to win
    Antichess,
    /// Captures explode the surrounding non-pawns
    Atomic,
    /// Captured pieces may be dropped back onto the board
    Crazyhouse,
    /// Race the kings to the eighth rank; checks are forbidden
    RacingKings,
    /// A kingless pawn horde against a regular army
    Horde,
}

impl Variant {
    /// All supported variants
    pub const ALL: [Variant; 8] = [
        Variant::Standard,
        Variant::Chess960,
        Variant::ThreeCheck,
        Variant::Antichess,
        Variant::Atomic,
        Variant::Crazyhouse,
        Variant::RacingKings,
        Variant::Horde,
    ];

    /// Returns the FEN of the variant's starting position
    pub fn starting_fen(&self) -> &'static str {
        match self {
            Variant::Antichess => "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w - - 0 1",
            Variant::RacingKings => "8/8/8/8/8/8/krbnNBRK/qrbnNBRQ w - - 0 1",
            Variant::Horde => {
                "rnbqkbnr/pppppppp/8/1PP2PP1/PPPPPPPP/PPPPPPPP/PPPPPPPP/PPPPPPPP w kq - 0 1"
            }
            _ => "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
        }
    }

    /// Returns the starting position of the variant
    #[inline]
    pub fn starting_position(&self) -> Situation {
        Situation::new(*self)
    }

    /// Returns how castling moves should be encoded in UCI for this variant
    #[inline]
    pub fn castling_mode(&self) -> CastlingMode {
        match self {
            Variant::Chess960 => CastlingMode::Chess960,
            _ => CastlingMode::Standard,
        }
    }

    /// Returns the roles a pawn may promote to
    pub fn promotion_roles(&self) -> &'static [Role] {
        match self {
            Variant::Antichess => &[
                Role::Queen,
                Role::Rook,
                Role::Bishop,
                Role::Knight,
                Role::King,
            ],
            _ => &[Role::Queen, Role::Rook, Role::Bishop, Role::Knight],
        }
    }

    /// Returns `true` if the king is a royal piece whose safety constrains moves
    #[inline]
    pub(crate) fn king_is_royal(&self) -> bool {
        *self != Variant::Antichess
    }

    /// Returns `true` if the variant has castling at all
    #[inline]
    pub(crate) fn castling_allowed(&self) -> bool {
        !matches!(self, Variant::Antichess | Variant::RacingKings)
    }

    /// Returns `true` if promoted pieces must be remembered (they demote to
    /// pawns when pocketed)
    #[inline]
    pub(crate) fn tracks_promoted(&self) -> bool {
        *self == Variant::Crazyhouse
    }

    /// Destination ranks a double pawn push may land on
    ///
    /// Horde additionally lets its first-rank pawns push two squares.
    pub(crate) fn double_push_targets(&self, c: Color) -> Bitboard {
        let mut mask = bitboard_consts::rank(geometry::double_move_dst_rank(c));
        if *self == Variant::Horde && c == Color::White {
            mask |= bitboard_consts::rank(Rank::R3);
        }
        mask
    }

    /// Generates the legal moves of `pos` into `moves`
    pub(crate) fn legal_moves(&self, pos: &Situation, moves: &mut MoveList) {
        match self {
            Variant::Standard
            | Variant::Chess960
            | Variant::ThreeCheck
            | Variant::Horde => movegen::royal_legals(
                pos,
                moves,
                GenOpts {
                    castling: true,
                    drops: false,
                },
            ),
            Variant::Crazyhouse => movegen::royal_legals(
                pos,
                moves,
                GenOpts {
                    castling: true,
                    drops: true,
                },
            ),
            Variant::RacingKings => {
                movegen::royal_legals(
                    pos,
                    moves,
                    GenOpts {
                        castling: false,
                        drops: false,
                    },
                );
                // Giving check is as illegal as moving into one.
                moves.retain(|m| !pos.play_unchecked(m).is_check());
            }
            Variant::Antichess => {
                movegen::antichess_pseudo_legals(pos, moves);
                if moves.iter().any(|m| m.is_capture()) {
                    moves.retain(|m| m.is_capture());
                }
            }
            Variant::Atomic => {
                movegen::atomic_pseudo_legals(pos, moves);
                moves.retain(|m| atomic_legal(pos, m));
            }
        }
    }

    /// Terminal outcomes that do not depend on having moves available
    pub(crate) fn special_outcome(&self, pos: &Situation) -> Option<Outcome> {
        match self {
            Variant::ThreeCheck => {
                let cc = pos.history().check_count;
                if cc.white >= 3 {
                    Some(Outcome::Win {
                        side: Color::White,
                        reason: WinReason::ThreeChecks,
                    })
                } else if cc.black >= 3 {
                    Some(Outcome::Win {
                        side: Color::Black,
                        reason: WinReason::ThreeChecks,
                    })
                } else {
                    None
                }
            }
            Variant::Atomic => {
                if pos.board().king_of(Color::White).is_none() {
                    Some(Outcome::Win {
                        side: Color::Black,
                        reason: WinReason::KingExploded,
                    })
                } else if pos.board().king_of(Color::Black).is_none() {
                    Some(Outcome::Win {
                        side: Color::White,
                        reason: WinReason::KingExploded,
                    })
                } else {
                    None
                }
            }
            Variant::Antichess => {
                if pos.us().is_empty() {
                    Some(Outcome::Win {
                        side: pos.turn(),
                        reason: WinReason::BarePosition,
                    })
                } else {
                    None
                }
            }
            Variant::Horde => {
                if pos.board().by_color(Color::White).is_empty() {
                    Some(Outcome::Win {
                        side: Color::Black,
                        reason: WinReason::BarePosition,
                    })
                } else {
                    None
                }
            }
            Variant::RacingKings => racing_outcome(pos),
            _ => None,
        }
    }

    /// Outcome when the side to move has no legal moves
    pub(crate) fn no_moves_outcome(&self, pos: &Situation) -> Outcome {
        match self {
            Variant::Antichess => Outcome::Win {
                side: pos.turn(),
                reason: WinReason::NoLegalMoves,
            },
            _ => {
                if pos.is_check() {
                    Outcome::Win {
                        side: pos.turn().inv(),
                        reason: WinReason::Checkmate,
                    }
                } else {
                    Outcome::Draw(DrawReason::Stalemate)
                }
            }
        }
    }

    /// Returns `true` if the remaining material can never produce a decisive
    /// result
    pub fn insufficient_material(&self, board: &Board) -> bool {
        match self {
            Variant::Crazyhouse | Variant::RacingKings => false,
            Variant::Antichess => {
                // The single-bishops-on-opposite-colors endgame cannot force a
                // capture chain; other material is left to the players.
                let bishops = board.by_role(Role::Bishop);
                board.occupied() == bishops
                    && bishops.len() == 2
                    && (board.by_color(Color::White) & bishops).len() == 1
                    && (bishops & bitboard_consts::LIGHT_SQUARES).len() == 1
            }
            Variant::Atomic | Variant::Horde => board.occupied() == board.by_role(Role::King),
            _ => {
                let kings = board.by_role(Role::King);
                let rest = board.occupied() ^ kings;

                // Material on both square colors is always sufficient; this
                // cutoff settles most positions immediately.
                if (rest & bitboard_consts::LIGHT_SQUARES).is_nonempty()
                    && (rest & bitboard_consts::DARK_SQUARES).is_nonempty()
                {
                    return false;
                }

                if rest.is_empty() {
                    return true;
                }

                let knights = board.by_role(Role::Knight);
                if rest == knights && knights.len() == 1 {
                    return true;
                }

                // All remaining pieces share a square color, so bishops alone
                // can never deliver mate.
                rest == board.by_role(Role::Bishop)
            }
        }
    }

    /// Short lowercase key of the variant
    pub fn key(&self) -> &'static str {
        match self {
            Variant::Standard => "standard",
            Variant::Chess960 => "chess960",
            Variant::ThreeCheck => "threeCheck",
            Variant::Antichess => "antichess",
            Variant::Atomic => "atomic",
            Variant::Crazyhouse => "crazyhouse",
            Variant::RacingKings => "racingKings",
            Variant::Horde => "horde",
        }
    }
}

impl Default for Variant {
    #[inline]
    fn default() -> Variant {
        Variant::Standard
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Atomic legality: the mover's king must survive the move, and either the
/// enemy king explodes or the mover's king is left out of (atomic) check
fn atomic_legal(pos: &Situation, m: &Move) -> bool {
    let us = pos.turn();
    let next = pos.play_unchecked(m);
    let king = match next.board().king_of(us) {
        Some(king) => king,
        None => return false,
    };
    if next.board().king_of(us.inv()).is_none() {
        return true;
    }
    if next.kings_connected() {
        return true;
    }
    next.board().attackers_to(king, us.inv()).is_empty()
}

/// Racing Kings terminal rule
///
/// Black gets one reply to equalize after White reaches the goal, compensating
/// the first-move advantage; if both kings stand on the goal rank the race is
/// drawn.
fn racing_outcome(pos: &Situation) -> Option<Outcome> {
    let goal = bitboard_consts::LAST_RANK;
    let board = pos.board();
    let white_in = (board.by_piece(Color::White, Role::King) & goal).is_nonempty();
    let black_in = (board.by_piece(Color::Black, Role::King) & goal).is_nonempty();

    match (white_in, black_in) {
        (true, true) => Some(Outcome::Draw(DrawReason::RaceFinished)),
        (false, true) => Some(Outcome::Win {
            side: Color::Black,
            reason: WinReason::KingReachedGoal,
        }),
        (true, false) => {
            let black_can_equalize = pos.turn() == Color::Black
                && pos
                    .legal_moves()
                    .iter()
                    .any(|m| m.role() == Role::King && m.to().rank() == Rank::R8);
            if black_can_equalize {
                None
            } else {
                Some(Outcome::Win {
                    side: Color::White,
                    reason: WinReason::KingReachedGoal,
                })
            }
        }
        (false, false) => None,
    }
}
