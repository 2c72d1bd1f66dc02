//! Legal move generation
//!
//! The generator works in stages: compute the pieces giving check, generate
//! evasions or regular moves against a destination mask, then drop everything a
//! pinned piece or the king cannot actually do. En passant is validated by
//! simulating the capture, which also covers the horizontal pin through both
//! pawns. Castling is generated in the Chess960-general form driven by the
//! unmoved-rooks bitboard.

use crate::bitboard::Bitboard;
use crate::board::Board;
use crate::moves::{self, Move};
use crate::position::Situation;
use crate::types::{CastlingSide, Color, Role, Square};
use crate::{attack, bitboard_consts, geometry, pawns};

use arrayvec::ArrayVec;

/// Container for generated moves
///
/// The capacity leaves room for Crazyhouse positions, where drops can push the
/// count well beyond the over-the-board maximum.
pub type MoveList = ArrayVec<Move, 512>;

/// Which optional move classes the generator should emit
#[derive(Debug, Copy, Clone)]
pub(crate) struct GenOpts {
    pub castling: bool,
    pub drops: bool,
}

fn push_pawn_move(
    moves: &mut MoveList,
    turn: Color,
    from: Square,
    to: Square,
    capture: Option<Role>,
    promotion_roles: &[Role],
) {
    if to.rank() == geometry::promote_dst_rank(turn) {
        for &promotion in promotion_roles {
            moves.push(Move::Normal {
                role: Role::Pawn,
                from,
                capture,
                to,
                promotion: Some(promotion),
            });
        }
    } else {
        moves.push(Move::Normal {
            role: Role::Pawn,
            from,
            capture,
            to,
            promotion: None,
        });
    }
}

fn gen_pawn_moves(
    pos: &Situation,
    target: Bitboard,
    moves: &mut MoveList,
    promotion_roles: &[Role],
) {
    let turn = pos.turn();
    let board = pos.board();
    let our_pawns = pos.our(Role::Pawn);
    let forward = geometry::pawn_forward_delta(turn);

    let left = geometry::pawn_left_delta(turn);
    for to in pawns::advance_left(turn, our_pawns) & pos.them() & target {
        let from = unsafe { to.add_unchecked(-left) };
        push_pawn_move(moves, turn, from, to, board.role_at(to), promotion_roles);
    }
    let right = geometry::pawn_right_delta(turn);
    for to in pawns::advance_right(turn, our_pawns) & pos.them() & target {
        let from = unsafe { to.add_unchecked(-right) };
        push_pawn_move(moves, turn, from, to, board.role_at(to), promotion_roles);
    }

    let single = pawns::advance_forward(turn, our_pawns) & !board.occupied();
    for to in single & target {
        let from = unsafe { to.add_unchecked(-forward) };
        push_pawn_move(moves, turn, from, to, None, promotion_roles);
    }

    let double_mask = pos.variant().double_push_targets(turn);
    let double = pawns::advance_forward(turn, single) & !board.occupied() & double_mask & target;
    for to in double {
        let from = unsafe { to.add_unchecked(-2 * forward) };
        moves.push(Move::Normal {
            role: Role::Pawn,
            from,
            capture: None,
            to,
            promotion: None,
        });
    }
}

fn gen_piece_moves(pos: &Situation, target: Bitboard, moves: &mut MoveList) {
    let board = pos.board();
    let occupied = board.occupied();
    let allowed = !pos.us() & target;

    for role in [Role::Knight, Role::Bishop, Role::Rook, Role::Queen] {
        for from in pos.our(role) {
            let att = match role {
                Role::Knight => attack::knight(from),
                Role::Bishop => attack::bishop(from, occupied),
                Role::Rook => attack::rook(from, occupied),
                Role::Queen => attack::queen(from, occupied),
                _ => unreachable!(),
            };
            for to in att & allowed {
                moves.push(Move::Normal {
                    role,
                    from,
                    capture: board.role_at(to),
                    to,
                    promotion: None,
                });
            }
        }
    }
}

/// All non-king moves with destinations restricted to `target`
fn gen_non_king(
    pos: &Situation,
    target: Bitboard,
    moves: &mut MoveList,
    promotion_roles: &[Role],
) {
    gen_piece_moves(pos, target, moves);
    gen_pawn_moves(pos, target, moves, promotion_roles);
}

/// King moves to squares that are not attacked once the king has left its
/// origin; removing the king from the occupancy catches sliders x-raying
/// through it
fn gen_king_moves(pos: &Situation, king: Square, moves: &mut MoveList) {
    let board = pos.board();
    let them = pos.turn().inv();
    let occ_without_king = board.occupied().without(king);
    for to in attack::king(king) & !pos.us() {
        if board.attackers_to_occ(to, them, occ_without_king).is_empty() {
            moves.push(Move::Normal {
                role: Role::King,
                from: king,
                capture: board.role_at(to),
                to,
                promotion: None,
            });
        }
    }
}

/// King moves without any safety checks, for variants where the king is an
/// ordinary piece (Antichess)
fn gen_king_moves_unsafe(pos: &Situation, moves: &mut MoveList) {
    let board = pos.board();
    for from in pos.our(Role::King) {
        for to in attack::king(from) & !pos.us() {
            moves.push(Move::Normal {
                role: Role::King,
                from,
                capture: board.role_at(to),
                to,
                promotion: None,
            });
        }
    }
}

fn gen_en_passant(pos: &Situation, moves: &mut MoveList) {
    if let Some(to) = pos.ep_square() {
        for from in pos.our(Role::Pawn) & attack::pawn(pos.turn().inv(), to) {
            moves.push(Move::EnPassant { from, to });
        }
    }
}

/// Chess960-compatible castling generation
///
/// Target squares are fixed by side; the king's whole path must be unattacked
/// and both the king's and the rook's paths must be free of other pieces.
/// Callers only invoke this when the king is not in check.
fn gen_castling(pos: &Situation, king: Square, moves: &mut MoveList) {
    let board = pos.board();
    let turn = pos.turn();
    let them = turn.inv();
    let back = bitboard_consts::back_rank(turn);

    if !back.has(king) {
        return;
    }

    'next_rook: for rook in pos.unmoved_rooks() & back & board.by_piece(turn, Role::Rook) {
        let side = if rook > king {
            CastlingSide::King
        } else {
            CastlingSide::Queen
        };
        let king_to = moves::king_castling_target(king, side);
        let rook_to = moves::rook_castling_target(king, side);

        let empty_for_king = attack::between(king, king_to)
            .with(king_to)
            .without(rook)
            .without(king);
        let empty_for_rook = attack::between(rook, rook_to)
            .with(rook_to)
            .without(rook)
            .without(king);
        if board.occupied().intersects(empty_for_king)
            || board.occupied().intersects(empty_for_rook)
        {
            continue;
        }

        for sq in attack::between(king, king_to).with(king).with(king_to) {
            if board.attackers_to(sq, them).is_nonempty() {
                continue 'next_rook;
            }
        }

        // The involved rook may currently shield the king's target square from
        // an enemy rook on the same rank; only possible in Chess960 setups.
        if (attack::rook(king_to, board.occupied().without(rook))
            & pos.them()
            & board.rooks_and_queens())
        .is_nonempty()
        {
            continue;
        }

        moves.push(Move::Castle { king, rook });
    }
}

fn gen_drops(pos: &Situation, target: Bitboard, moves: &mut MoveList) {
    let empty = !pos.board().occupied() & target;
    let pocket = pos.pockets().by_color(pos.turn());
    for role in [Role::Pawn, Role::Knight, Role::Bishop, Role::Rook, Role::Queen] {
        if pocket.count(role) == 0 {
            continue;
        }
        let allowed = if role == Role::Pawn {
            empty & !bitboard_consts::BACK_RANKS
        } else {
            empty
        };
        for to in allowed {
            moves.push(Move::Drop { role, to });
        }
    }
}

/// Our pieces that shield the king from an enemy slider: for each enemy sniper
/// aligned with the king, a single piece standing between them is pinned
/// (an enemy piece in that spot would give a discovered check instead, and is
/// filtered out by the caller)
pub(crate) fn slider_blockers(board: &Board, enemy: Bitboard, king: Square) -> Bitboard {
    let snipers = ((attack::rook(king, Bitboard::EMPTY) & board.rooks_and_queens())
        | (attack::bishop(king, Bitboard::EMPTY) & board.bishops_and_queens()))
        & enemy;

    let mut blockers = Bitboard::EMPTY;
    for sniper in snipers {
        let b = attack::between(king, sniper) & board.occupied();
        if !b.more_than_one() {
            blockers |= b;
        }
    }
    blockers
}

/// Final legality filter for the staged generator: pinned pieces must stay on
/// their pin ray, and en passant must survive the remove-both-pawns simulation
fn is_safe(pos: &Situation, king: Square, m: &Move, our_blockers: Bitboard) -> bool {
    match *m {
        Move::Normal { role, from, to, .. } => {
            if role == Role::King {
                // Already validated with the king removed from the occupancy.
                true
            } else {
                !our_blockers.has(from) || attack::aligned(from, to, king)
            }
        }
        Move::EnPassant { from, to } => {
            // Both pawns leave their squares at once. The king is re-checked
            // against the full attacker set, so a checker that the capture
            // neither removes nor blocks keeps the move illegal; intersecting
            // with the new occupancy drops the captured pawn from that set.
            let board = pos.board();
            let captured = moves::ep_capture_square(pos.turn(), to);
            let occupied = board
                .occupied()
                .without(from)
                .without(captured)
                .with(to);
            (board.attackers_to_occ(king, pos.turn().inv(), occupied) & occupied).is_empty()
        }
        Move::Castle { .. } | Move::Drop { .. } => true,
    }
}

/// The staged legal move generator for variants with a royal king
///
/// Covers Standard, Chess960, Three-check, Crazyhouse (with `opts.drops`) and
/// Horde (whose kingless side takes the unconstrained path).
pub(crate) fn royal_legals(pos: &Situation, moves: &mut MoveList, opts: GenOpts) {
    let board = pos.board();
    let turn = pos.turn();
    let promotion_roles = pos.variant().promotion_roles();

    let king = match board.king_of(turn) {
        Some(king) => king,
        None => {
            // A kingless army (Horde's White) has no checks and no pins.
            gen_en_passant(pos, moves);
            gen_non_king(pos, Bitboard::FULL, moves, promotion_roles);
            if opts.drops {
                gen_drops(pos, Bitboard::FULL, moves);
            }
            return;
        }
    };

    let checkers = board.attackers_to(king, turn.inv());

    gen_en_passant(pos, moves);
    gen_king_moves(pos, king, moves);

    if checkers.is_empty() {
        gen_non_king(pos, Bitboard::FULL, moves, promotion_roles);
        if opts.castling {
            gen_castling(pos, king, moves);
        }
        if opts.drops {
            gen_drops(pos, Bitboard::FULL, moves);
        }
    } else if let Some(checker) = checkers.single_square() {
        // Single check: capture the checker or block the checking ray.
        let target = attack::between(king, checker).with(checker);
        gen_non_king(pos, target, moves, promotion_roles);
        if opts.drops {
            // A drop cannot capture, so it may only interpose.
            gen_drops(pos, attack::between(king, checker), moves);
        }
    }
    // Double check: only the king moves, which are already generated.

    let our_blockers = slider_blockers(board, pos.them(), king) & pos.us();
    moves.retain(|m| is_safe(pos, king, m, our_blockers));
}

/// Pseudo-legal generation for Antichess: the king is an ordinary piece, there
/// is no castling, and promotion to king is allowed. The mandatory-capture
/// filter is applied by the variant layer.
pub(crate) fn antichess_pseudo_legals(pos: &Situation, moves: &mut MoveList) {
    gen_en_passant(pos, moves);
    gen_non_king(pos, Bitboard::FULL, moves, pos.variant().promotion_roles());
    gen_king_moves_unsafe(pos, moves);
}

/// Pseudo-legal generation for Atomic: kings may never capture. Explosion-aware
/// legality is decided by the variant layer through simulation.
pub(crate) fn atomic_pseudo_legals(pos: &Situation, moves: &mut MoveList) {
    let board = pos.board();
    let turn = pos.turn();

    gen_en_passant(pos, moves);
    gen_non_king(pos, Bitboard::FULL, moves, pos.variant().promotion_roles());

    if let Some(king) = board.king_of(turn) {
        for to in attack::king(king) & !board.occupied() {
            moves.push(Move::Normal {
                role: Role::King,
                from: king,
                capture: None,
                to,
                promotion: None,
            });
        }
        if board.attackers_to(king, turn.inv()).is_empty() {
            gen_castling(pos, king, moves);
        }
    }
}
