//! Position state and move application
//!
//! A [`Situation`] is the full game state: piece placement, side to move,
//! history (castling rights, check counters, half-move clock, position hashes)
//! and the variant being played. Applying a move never mutates the original
//! situation; it produces a new value, so situations can be shared freely
//! across threads and searched in parallel.

use crate::bitboard::Bitboard;
use crate::board::{self, Board, FenParseError, Setup};
use crate::movegen::MoveList;
use crate::moves::{self, CastlingMode, Move, Uci, UciParseError};
use crate::types::{Castles, Color, DrawReason, Outcome, OutcomeFilter, Role, Square};
use crate::variant::Variant;
use crate::{attack, bitboard_consts, geometry, zobrist};

use std::fmt;

use thiserror::Error;

/// Position validation error
///
/// Reported when external input (a FEN-decoded [`Setup`]) violates a structural
/// invariant. A [`Situation`] is never partially constructed.
#[derive(Debug, Clone, Error, Eq, PartialEq)]
pub enum PositionError {
    /// One of the sides doesn't have a king
    #[error("no king of color {0:?}")]
    MissingKing(Color),
    /// One of the sides has more than one king
    #[error("more than one king of color {0:?}")]
    TooManyKings(Color),
    /// A side that must not have a king has one (Horde's White)
    #[error("unexpected king of color {0:?}")]
    UnexpectedKing(Color),
    /// Too many pieces of given color
    #[error("too many pieces of color {0:?}")]
    TooManyPieces(Color),
    /// There is a pawn on a rank it can never stand on
    #[error("invalid pawn position {0}")]
    PawnOnBackRank(Square),
    /// The side which is not to move is in check
    #[error("side not to move is in check")]
    OppositeCheck,
}

/// Error constructing a [`Situation`] from FEN
#[derive(Debug, Clone, Error, Eq, PartialEq)]
pub enum FromFenError {
    /// FEN cannot be parsed
    #[error("cannot parse fen: {0}")]
    Fen(#[from] FenParseError),
    /// FEN was parsed, but the position is invalid
    #[error("invalid position: {0}")]
    Position(#[from] PositionError),
}

/// Error applying a move
#[derive(Debug, Clone, Error, Eq, PartialEq)]
pub enum PlayError {
    /// The move is not in the legal move set of the situation
    #[error("illegal move {mv} in position {fen}")]
    IllegalMove {
        /// The offending move
        mv: Move,
        /// FEN of the situation the move was applied to
        fen: String,
    },
}

/// Error applying a move given in UCI notation
#[derive(Debug, Clone, Error, Eq, PartialEq)]
pub enum UciPlayError {
    /// The string is not valid UCI
    #[error("cannot parse move: {0}")]
    Parse(#[from] UciParseError),
    /// The move is well-formed but not legal in this situation
    #[error("no legal move matching {uci} in position {fen}")]
    NoMatch {
        /// The unmatched UCI move
        uci: Uci,
        /// FEN of the situation
        fen: String,
    },
}

/// Pieces captured and available for dropping, for one side (Crazyhouse)
#[derive(Debug, Default, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Pocket([u8; 5]);

impl Pocket {
    /// Returns the number of pocketed pieces of role `r`
    ///
    /// Kings can never be pocketed.
    #[inline]
    pub fn count(&self, r: Role) -> u8 {
        match r {
            Role::King => 0,
            _ => self.0[r.index()],
        }
    }

    /// Returns `true` if the pocket holds no pieces
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0 == [0; 5]
    }

    #[inline]
    fn add(&mut self, r: Role) {
        debug_assert!(r != Role::King);
        self.0[r.index()] += 1;
    }

    #[inline]
    fn remove(&mut self, r: Role) {
        debug_assert!(self.count(r) > 0);
        self.0[r.index()] -= 1;
    }
}

/// Both sides' pockets (Crazyhouse)
#[derive(Debug, Default, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Pockets {
    white: Pocket,
    black: Pocket,
}

impl Pockets {
    /// Returns the pocket of color `c`
    #[inline]
    pub fn by_color(&self, c: Color) -> &Pocket {
        match c {
            Color::White => &self.white,
            Color::Black => &self.black,
        }
    }

    #[inline]
    fn by_color_mut(&mut self, c: Color) -> &mut Pocket {
        match c {
            Color::White => &mut self.white,
            Color::Black => &mut self.black,
        }
    }
}

/// Number of checks each side has delivered (Three-check)
///
/// Counters never decrease. Every variant maintains them; only Three-check
/// reads them for terminal detection.
#[derive(Debug, Default, Copy, Clone, Eq, PartialEq, Hash)]
pub struct CheckCount {
    /// Checks delivered by White
    pub white: u8,
    /// Checks delivered by Black
    pub black: u8,
}

impl CheckCount {
    /// Returns the number of checks delivered by color `c`
    #[inline]
    pub fn by_color(&self, c: Color) -> u8 {
        c.fold(self.white, self.black)
    }

    #[inline]
    fn add(&mut self, c: Color) {
        match c {
            Color::White => self.white += 1,
            Color::Black => self.black += 1,
        }
    }
}

/// Append-only sequence of 3-byte position digests
///
/// One digest is recorded per reached position, the starting position included.
/// Repetitions are counted by sampling every other entry from the most recent
/// one, so only positions with the same side to move are compared.
#[derive(Debug, Default, Clone, Eq, PartialEq)]
pub struct PositionHashes(Vec<u8>);

impl PositionHashes {
    /// Size of one digest, in bytes
    pub const ENTRY_SIZE: usize = 3;

    /// Returns the number of recorded digests
    #[inline]
    pub fn len(&self) -> usize {
        self.0.len() / Self::ENTRY_SIZE
    }

    /// Returns `true` if no digests are recorded
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[inline]
    fn push(&mut self, digest: [u8; Self::ENTRY_SIZE]) {
        self.0.extend_from_slice(&digest);
    }

    /// Counts how many times the most recent digest occurs among the recorded
    /// positions with the same side to move, itself included
    pub fn count_current(&self) -> usize {
        const STRIDE: usize = 2 * PositionHashes::ENTRY_SIZE;
        let n = self.0.len();
        if n < Self::ENTRY_SIZE {
            return 0;
        }
        let current = &self.0[n - Self::ENTRY_SIZE..];
        let mut count = 0;
        let mut at = n - Self::ENTRY_SIZE;
        loop {
            if &self.0[at..at + Self::ENTRY_SIZE] == current {
                count += 1;
            }
            if at < STRIDE {
                break;
            }
            at -= STRIDE;
        }
        count
    }
}

/// Everything the position remembers beyond the piece placement
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct History {
    /// The move that produced this position, used to reconstruct the en
    /// passant target
    pub last_move: Option<Move>,
    /// Cached castling rights mask, derivable from `unmoved_rooks`
    pub castles: Castles,
    /// Rook squares that still retain castling rights
    pub unmoved_rooks: Bitboard,
    /// Checks delivered by each side
    pub check_count: CheckCount,
    /// Half-moves since the last pawn move or capture
    pub halfmove_clock: u16,
    /// Digests of all positions reached so far
    pub position_hashes: PositionHashes,
}

/// A complete, validated game state
///
/// All state transitions are pure: [`Situation::play`] returns a fresh value and
/// leaves the original untouched.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Situation {
    board: Board,
    turn: Color,
    history: History,
    variant: Variant,
    pockets: Pockets,
    fullmoves: u16,
}

impl Situation {
    /// Returns the starting position of the given variant
    pub fn new(variant: Variant) -> Situation {
        Situation::from_fen(variant, variant.starting_fen())
            .expect("variant starting position is valid")
    }

    /// Parses and validates a situation from FEN
    pub fn from_fen(variant: Variant, fen: &str) -> Result<Situation, FromFenError> {
        let setup = Setup::from_fen(fen)?;
        Ok(Situation::from_setup(variant, setup)?)
    }

    /// Validates an externally decoded [`Setup`] and builds a situation
    ///
    /// Structurally impossible setups are rejected; harmless inconsistencies
    /// (castling rights without a rook, a stale en passant marker) are fixed up
    /// silently, matching what FEN consumers usually do.
    pub fn from_setup(variant: Variant, setup: Setup) -> Result<Situation, PositionError> {
        let Setup {
            board,
            turn,
            mut unmoved_rooks,
            ep_square,
            halfmove_clock,
            fullmoves,
        } = setup;

        for color in [Color::White, Color::Black] {
            let pieces = board.by_color(color);
            let limit = if variant == Variant::Horde && color == Color::White {
                36
            } else {
                16
            };
            if pieces.len() > limit {
                return Err(PositionError::TooManyPieces(color));
            }

            if variant.king_is_royal() {
                let kings = board.by_piece(color, Role::King);
                if variant == Variant::Horde && color == Color::White {
                    if kings.is_nonempty() {
                        return Err(PositionError::UnexpectedKing(color));
                    }
                } else if kings.is_empty() {
                    return Err(PositionError::MissingKing(color));
                } else if kings.more_than_one() {
                    return Err(PositionError::TooManyKings(color));
                }
            }
        }

        let mut bad_pawns = board.by_role(Role::Pawn) & bitboard_consts::BACK_RANKS;
        if variant == Variant::Horde {
            // Horde pawns legitimately start on White's first rank.
            bad_pawns &= !(board.by_color(Color::White) & bitboard_consts::FIRST_RANK);
        }
        if let Some(sq) = bad_pawns.first() {
            return Err(PositionError::PawnOnBackRank(sq));
        }

        // Castling rights survive only for rooks still sitting on the back rank
        // of a color whose king is also there.
        if !variant.castling_allowed() {
            unmoved_rooks = Bitboard::EMPTY;
        } else {
            let mut keep = Bitboard::EMPTY;
            for color in [Color::White, Color::Black] {
                let back = bitboard_consts::back_rank(color);
                if (board.by_piece(color, Role::King) & back).single_square().is_some() {
                    keep |= board.by_piece(color, Role::Rook) & back;
                }
            }
            unmoved_rooks &= keep;
        }

        // A stale en passant marker is dropped rather than rejected: the pushed
        // pawn must be present with both squares behind it empty.
        let last_move = ep_square.and_then(|ep| {
            let pusher = turn.inv();
            let forward = geometry::pawn_forward_delta(pusher);
            let to = ep.add(forward);
            let from = ep.add(-forward);
            let pushed_ok = board.by_piece(pusher, Role::Pawn).has(to)
                && !board.occupied().has(ep)
                && !board.occupied().has(from);
            pushed_ok.then_some(Move::Normal {
                role: Role::Pawn,
                from,
                capture: None,
                to,
                promotion: None,
            })
        });

        let castles = board::castles_from_rooks(&board, unmoved_rooks);
        let mut pos = Situation {
            board,
            turn,
            history: History {
                last_move,
                castles,
                unmoved_rooks,
                check_count: CheckCount::default(),
                halfmove_clock,
                position_hashes: PositionHashes::default(),
            },
            variant,
            pockets: Pockets::default(),
            fullmoves,
        };

        if variant.king_is_royal() {
            if let Some(their_king) = pos.board.king_of(turn.inv()) {
                let attacked = pos.board.attackers_to(their_king, turn).is_nonempty();
                let exempt = variant == Variant::Atomic && pos.kings_connected();
                if attacked && !exempt {
                    return Err(PositionError::OppositeCheck);
                }
            }
        }

        let digest = pos.position_digest();
        pos.history.position_hashes.push(digest);
        Ok(pos)
    }

    /// Returns the piece placement
    #[inline]
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Returns the side to move
    #[inline]
    pub fn turn(&self) -> Color {
        self.turn
    }

    /// Returns the variant being played
    #[inline]
    pub fn variant(&self) -> Variant {
        self.variant
    }

    /// Returns the history of the position
    #[inline]
    pub fn history(&self) -> &History {
        &self.history
    }

    /// Returns both sides' pockets (meaningful in Crazyhouse)
    #[inline]
    pub fn pockets(&self) -> &Pockets {
        &self.pockets
    }

    /// Returns the move number (incremented after each move by Black)
    #[inline]
    pub fn fullmoves(&self) -> u16 {
        self.fullmoves
    }

    /// Returns the number of half-moves since the last pawn move or capture
    #[inline]
    pub fn halfmove_clock(&self) -> u16 {
        self.history.halfmove_clock
    }

    /// Returns all pieces of the side to move
    #[inline]
    pub fn us(&self) -> Bitboard {
        self.board.by_color(self.turn)
    }

    /// Returns all pieces of the opponent
    #[inline]
    pub fn them(&self) -> Bitboard {
        self.board.by_color(self.turn.inv())
    }

    /// Returns our pieces of role `r`
    #[inline]
    pub fn our(&self, r: Role) -> Bitboard {
        self.board.by_piece(self.turn, r)
    }

    /// Returns the opponent's pieces of role `r`
    #[inline]
    pub fn their(&self, r: Role) -> Bitboard {
        self.board.by_piece(self.turn.inv(), r)
    }

    /// Returns the rook squares that still retain castling rights
    #[inline]
    pub fn unmoved_rooks(&self) -> Bitboard {
        self.history.unmoved_rooks
    }

    /// Returns the cached castling rights mask
    #[inline]
    pub fn castles(&self) -> Castles {
        self.history.castles
    }

    /// Returns the en passant target square, reconstructed from the last move
    pub fn ep_square(&self) -> Option<Square> {
        match self.history.last_move {
            Some(Move::Normal {
                role: Role::Pawn,
                from,
                to,
                ..
            }) if from.index().abs_diff(to.index()) == 16 => {
                Some(Square::from_index((from.index() + to.index()) / 2))
            }
            _ => None,
        }
    }

    /// Returns `true` if the two kings stand on adjacent squares
    ///
    /// In Atomic chess connected kings suspend the notion of check.
    pub(crate) fn kings_connected(&self) -> bool {
        match (
            self.board.king_of(Color::White),
            self.board.king_of(Color::Black),
        ) {
            (Some(w), Some(b)) => attack::king(w).has(b),
            _ => false,
        }
    }

    /// Returns the enemy pieces currently giving check
    pub fn checkers(&self) -> Bitboard {
        let king = match self.board.king_of(self.turn) {
            Some(king) => king,
            None => return Bitboard::EMPTY,
        };
        if self.variant == Variant::Atomic && self.kings_connected() {
            return Bitboard::EMPTY;
        }
        self.board.attackers_to(king, self.turn.inv())
    }

    /// Returns `true` if the side to move is in check
    #[inline]
    pub fn is_check(&self) -> bool {
        self.checkers().is_nonempty()
    }

    /// Generates all legal moves in this situation
    ///
    /// A terminal position simply has no legal moves; that is not an error.
    #[inline]
    pub fn legal_moves(&self) -> MoveList {
        let mut moves = MoveList::new();
        self.variant.legal_moves(self, &mut moves);
        moves
    }

    /// Returns `true` if `m` is legal in this situation
    #[inline]
    pub fn is_legal(&self, m: &Move) -> bool {
        self.legal_moves().contains(m)
    }

    /// Validates and applies a move, producing the next situation
    pub fn play(&self, m: &Move) -> Result<Situation, PlayError> {
        if !self.is_legal(m) {
            return Err(PlayError::IllegalMove {
                mv: *m,
                fen: self.fen(),
            });
        }
        Ok(self.play_unchecked(m))
    }

    /// Applies a move without checking its legality
    ///
    /// Feeding a move that is not in [`Situation::legal_moves`] produces an
    /// unspecified (but memory-safe) position.
    pub fn play_unchecked(&self, m: &Move) -> Situation {
        let mut next = self.clone();
        next.do_move(m);
        next
    }

    /// Resolves a UCI move against the legal move list
    ///
    /// Both castling encodings (king two squares, king takes own rook) are
    /// accepted regardless of variant.
    pub fn uci_to_move(&self, uci: &Uci) -> Result<Move, UciPlayError> {
        let legals = self.legal_moves();
        for m in &legals {
            if !matches!(m, Move::Castle { .. }) && m.to_uci(CastlingMode::Standard) == *uci {
                return Ok(*m);
            }
        }
        for m in &legals {
            if matches!(m, Move::Castle { .. })
                && (m.to_uci(CastlingMode::Standard) == *uci
                    || m.to_uci(CastlingMode::Chess960) == *uci)
            {
                return Ok(*m);
            }
        }
        Err(UciPlayError::NoMatch {
            uci: *uci,
            fen: self.fen(),
        })
    }

    /// Parses a UCI move and applies it
    pub fn play_uci(&self, uci: &str) -> Result<Situation, UciPlayError> {
        let uci: Uci = uci.parse()?;
        let m = self.uci_to_move(&uci)?;
        Ok(self.play_unchecked(&m))
    }

    /// Applies a space-separated list of UCI moves
    pub fn play_uci_list(&self, uci_list: &str) -> Result<Situation, UciPlayError> {
        let mut pos = self.clone();
        for token in uci_list.split_ascii_whitespace() {
            pos = pos.play_uci(token)?;
        }
        Ok(pos)
    }

    fn do_move(&mut self, m: &Move) {
        let turn = self.turn;
        let zeroing = m.is_zeroing();

        let mut unmoved = self.history.unmoved_rooks;
        match *m {
            Move::Normal { role, from, to, .. } => {
                if role == Role::King {
                    unmoved &= !bitboard_consts::back_rank(turn);
                }
                unmoved = unmoved.without(from).without(to);
            }
            Move::Castle { .. } => {
                unmoved &= !bitboard_consts::back_rank(turn);
            }
            Move::EnPassant { .. } | Move::Drop { .. } => {}
        }

        self.apply_to_board(m, &mut unmoved);

        self.history.unmoved_rooks = unmoved;
        self.history.castles = board::castles_from_rooks(&self.board, unmoved);
        self.history.halfmove_clock = if zeroing {
            0
        } else {
            self.history.halfmove_clock + 1
        };
        self.history.last_move = Some(*m);

        self.turn = turn.inv();
        if turn == Color::Black {
            self.fullmoves += 1;
        }

        if self.is_check() {
            self.history.check_count.add(turn);
        }

        let digest = self.position_digest();
        self.history.position_hashes.push(digest);
    }

    fn apply_to_board(&mut self, m: &Move, unmoved: &mut Bitboard) {
        let turn = self.turn;
        let tracks_promoted = self.variant.tracks_promoted();

        match *m {
            Move::Normal {
                role,
                from,
                capture,
                to,
                promotion,
            } => {
                if capture.is_some() {
                    let was_promoted = self.board.is_promoted(to);
                    let taken = self.board.discard_piece_at(to);
                    if self.variant == Variant::Crazyhouse {
                        let pocketed = if was_promoted {
                            Role::Pawn
                        } else {
                            taken.role().unwrap_or(Role::Pawn)
                        };
                        self.pockets.by_color_mut(turn).add(pocketed);
                    }
                }
                let was_promoted = self.board.is_promoted(from);
                self.board.discard_piece_at(from);
                let new_role = promotion.unwrap_or(role);
                let promoted_now =
                    tracks_promoted && (promotion.is_some() || was_promoted);
                self.board.set_piece_at(to, turn, new_role, promoted_now);

                if self.variant == Variant::Atomic && capture.is_some() {
                    self.explode(to, unmoved);
                }
            }
            Move::EnPassant { from, to } => {
                let captured = moves::ep_capture_square(turn, to);
                self.board.discard_piece_at(captured);
                self.board.discard_piece_at(from);
                self.board.set_piece_at(to, turn, Role::Pawn, false);
                if self.variant == Variant::Crazyhouse {
                    self.pockets.by_color_mut(turn).add(Role::Pawn);
                }
                if self.variant == Variant::Atomic {
                    self.explode(to, unmoved);
                }
            }
            Move::Castle { king, rook } => {
                let side = moves::castling_side_of(king, rook);
                self.board.discard_piece_at(king);
                self.board.discard_piece_at(rook);
                self.board.set_piece_at(
                    moves::king_castling_target(king, side),
                    turn,
                    Role::King,
                    false,
                );
                self.board.set_piece_at(
                    moves::rook_castling_target(king, side),
                    turn,
                    Role::Rook,
                    false,
                );
            }
            Move::Drop { role, to } => {
                self.board.set_piece_at(to, turn, role, false);
                self.pockets.by_color_mut(turn).remove(role);
            }
        }
    }

    /// Atomic capture effect: the capturer and every non-pawn piece on the
    /// king-ring of the capture square are removed along with the captured one
    fn explode(&mut self, to: Square, unmoved: &mut Bitboard) {
        self.board.discard_piece_at(to);
        unmoved.unset(to);
        for sq in attack::king(to) & self.board.occupied() {
            if self.board.role_at(sq) != Some(Role::Pawn) {
                self.board.discard_piece_at(sq);
                unmoved.unset(sq);
            }
        }
    }

    /// 3-byte digest of this position: piece placement, side to move, castling
    /// rights, and the en passant target when a pawn could actually take it
    fn position_digest(&self) -> [u8; PositionHashes::ENTRY_SIZE] {
        let mut h = self.board.zobrist_hash();
        if self.turn == Color::White {
            h ^= zobrist::MOVE_SIDE;
        }
        h ^= zobrist::castling(self.history.castles);
        if let Some(ep) = self.ep_square() {
            if (self.our(Role::Pawn) & attack::pawn(self.turn.inv(), ep)).is_nonempty() {
                h ^= zobrist::enpassant(ep);
            }
        }
        [h as u8, (h >> 8) as u8, (h >> 16) as u8]
    }

    /// Returns `true` if the current position occurred at least three times
    pub fn threefold_repetition(&self) -> bool {
        self.history.position_hashes.count_current() >= 3
    }

    /// Returns `true` if the current position occurred at least five times
    pub fn fivefold_repetition(&self) -> bool {
        self.history.position_hashes.count_current() >= 5
    }

    /// Calculates the outcome of the game, if any
    ///
    /// The most significant applicable outcome is found in priority order and
    /// then gated by [`Outcome::passes`]: force outcomes are always reported,
    /// the mandatory draws (insufficient material, 75 moves, fivefold
    /// repetition) need at least [`OutcomeFilter::Strict`], and the claimable
    /// draws (50 moves, threefold repetition) need [`OutcomeFilter::Relaxed`].
    ///
    /// This function can be computationally expensive, as it generates the
    /// legal moves.
    pub fn outcome(&self, filter: OutcomeFilter) -> Option<Outcome> {
        let outcome = if let Some(end) = self.variant.special_outcome(self) {
            Some(end)
        } else if self.legal_moves().is_empty() {
            Some(self.variant.no_moves_outcome(self))
        } else if self.variant.insufficient_material(&self.board) {
            Some(Outcome::Draw(DrawReason::InsufficientMaterial))
        } else if self.history.halfmove_clock >= 150 {
            Some(Outcome::Draw(DrawReason::Moves75))
        } else if self.fivefold_repetition() {
            Some(Outcome::Draw(DrawReason::Repeat5))
        } else if self.history.halfmove_clock >= 100 {
            Some(Outcome::Draw(DrawReason::Moves50))
        } else if self.threefold_repetition() {
            Some(Outcome::Draw(DrawReason::Repeat3))
        } else {
            None
        };
        outcome.filter(|o| o.passes(filter))
    }

    /// Returns `true` if the game is over by the mandatory rules
    #[inline]
    pub fn is_terminal(&self) -> bool {
        self.outcome(OutcomeFilter::Strict).is_some()
    }

    /// Converts the situation back into its external [`Setup`] form
    pub fn to_setup(&self) -> Setup {
        Setup {
            board: self.board.clone(),
            turn: self.turn,
            unmoved_rooks: self.history.unmoved_rooks,
            ep_square: self.ep_square(),
            halfmove_clock: self.history.halfmove_clock,
            fullmoves: self.fullmoves,
        }
    }

    /// Returns the FEN of the situation
    #[inline]
    pub fn fen(&self) -> String {
        self.to_setup().to_string()
    }

    /// Counts the leaf positions reachable in exactly `depth` half-moves
    ///
    /// The standard move-generator correctness oracle. Terminal rules based on
    /// counters and repetitions are ignored, as is conventional.
    pub fn perft(&self, depth: usize) -> u64 {
        if depth == 0 {
            return 1;
        }
        let moves = self.legal_moves();
        if depth == 1 {
            return moves.len() as u64;
        }
        moves
            .iter()
            .map(|m| self.play_unchecked(m).perft(depth - 1))
            .sum()
    }
}

impl fmt::Display for Situation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.to_setup().fmt(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{GameStatus, WinReason};

    const INI_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

    #[test]
    fn test_initial() {
        let pos = Situation::new(Variant::Standard);
        assert_eq!(pos.fen(), INI_FEN);
        assert_eq!(pos.legal_moves().len(), 20);
        assert!(!pos.is_check());
        assert_eq!(pos.outcome(OutcomeFilter::Relaxed), None);
        assert_eq!(pos.history().position_hashes.len(), 1);
    }

    #[test]
    fn test_simple_line() {
        let mut pos = Situation::new(Variant::Standard);
        for (mv, fen) in [
            (
                "e2e4",
                "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1",
            ),
            (
                "b8c6",
                "r1bqkbnr/pppppppp/2n5/8/4P3/8/PPPP1PPP/RNBQKBNR w KQkq - 1 2",
            ),
            (
                "g1f3",
                "r1bqkbnr/pppppppp/2n5/8/4P3/5N2/PPPP1PPP/RNBQKB1R b KQkq - 2 2",
            ),
            (
                "e7e5",
                "r1bqkbnr/pppp1ppp/2n5/4p3/4P3/5N2/PPPP1PPP/RNBQKB1R w KQkq e6 0 3",
            ),
            (
                "f1b5",
                "r1bqkbnr/pppp1ppp/2n5/1B2p3/4P3/5N2/PPPP1PPP/RNBQK2R b KQkq - 1 3",
            ),
            (
                "g8f6",
                "r1bqkb1r/pppp1ppp/2n2n2/1B2p3/4P3/5N2/PPPP1PPP/RNBQK2R w KQkq - 2 4",
            ),
            (
                "e1g1",
                "r1bqkb1r/pppp1ppp/2n2n2/1B2p3/4P3/5N2/PPPP1PPP/RNBQ1RK1 b kq - 3 4",
            ),
            (
                "f6e4",
                "r1bqkb1r/pppp1ppp/2n5/1B2p3/4n3/5N2/PPPP1PPP/RNBQ1RK1 w kq - 0 5",
            ),
        ] {
            pos = pos.play_uci(mv).unwrap();
            assert_eq!(pos.fen(), fen);
        }
    }

    #[test]
    fn test_hashes_grow_by_one() {
        let mut pos = Situation::new(Variant::Standard);
        for (i, mv) in ["e2e4", "e7e5", "g1f3", "b8c6"].iter().enumerate() {
            pos = pos.play_uci(mv).unwrap();
            assert_eq!(pos.history().position_hashes.len(), i + 2);
        }
    }

    #[test]
    fn test_halfmove_clock() {
        let pos = Situation::new(Variant::Standard)
            .play_uci_list("g1f3 g8f6")
            .unwrap();
        assert_eq!(pos.halfmove_clock(), 2);
        let pos = pos.play_uci("e2e4").unwrap();
        assert_eq!(pos.halfmove_clock(), 0);
        let pos = pos.play_uci_list("f6e4 b1c3 e4c3").unwrap();
        assert_eq!(pos.halfmove_clock(), 0);
    }

    #[test]
    fn test_illegal_move() {
        let pos = Situation::new(Variant::Standard);
        let m = Move::Normal {
            role: Role::Knight,
            from: Square::from_index(1),
            capture: None,
            to: Square::from_index(20),
            promotion: None,
        };
        assert!(matches!(
            pos.play(&m),
            Err(PlayError::IllegalMove { .. })
        ));
        // The original situation is untouched and can be used further.
        assert_eq!(pos.legal_moves().len(), 20);
    }

    #[test]
    fn test_en_passant_capture() {
        let pos = Situation::from_fen(
            Variant::Standard,
            "rnbqkbnr/ppp1pppp/8/8/3pP3/8/PPPP1PP1/RNBQKBNR b KQkq e3 0 3",
        )
        .unwrap();
        assert_eq!(pos.ep_square(), Some("e3".parse().unwrap()));
        let next = pos.play_uci("d4e3").unwrap();
        // Both the moving pawn's origin and the captured pawn's square are empty.
        assert_eq!(
            next.fen(),
            "rnbqkbnr/ppp1pppp/8/8/8/4p3/PPPP1PP1/RNBQKBNR w KQkq - 0 4"
        );
    }

    #[test]
    fn test_en_passant_cannot_ignore_knight_check() {
        // White is in check from the knight on d3; the pending en passant
        // capture on d6 neither removes nor blocks it, so it is not legal.
        let pos =
            Situation::from_fen(Variant::Standard, "4k3/8/8/3pP3/8/3n4/8/4K3 w - d6 0 1")
                .unwrap();
        assert!(pos.is_check());
        let moves = pos.legal_moves();
        assert!(moves.iter().all(|m| !m.is_en_passant()));
        // Nothing can capture or block a knight check here; only the king moves.
        assert!(moves.iter().all(|m| m.role() == Role::King));
        assert_eq!(moves.len(), 4);
    }

    #[test]
    fn test_stale_ep_is_dropped() {
        // The marker names a square, but no pushed pawn is behind it.
        let pos = Situation::from_fen(
            Variant::Standard,
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR b KQkq e3 0 1",
        )
        .unwrap();
        assert_eq!(pos.ep_square(), None);
    }

    #[test]
    fn test_checkmate() {
        let pos = Situation::new(Variant::Standard)
            .play_uci_list("f2f3 e7e5 g2g4 d8h4")
            .unwrap();
        assert!(pos.is_check());
        assert!(pos.legal_moves().is_empty());
        assert_eq!(
            pos.outcome(OutcomeFilter::Force),
            Some(Outcome::Win {
                side: Color::Black,
                reason: WinReason::Checkmate
            })
        );
        assert_eq!(GameStatus::from(pos.outcome(OutcomeFilter::Force)), GameStatus::Black);
    }

    #[test]
    fn test_stalemate() {
        let pos = Situation::from_fen(Variant::Standard, "7K/8/5n2/5n2/8/8/7k/8 w - - 0 1")
            .unwrap();
        assert!(!pos.is_check());
        assert!(pos.legal_moves().is_empty());
        assert_eq!(
            pos.outcome(OutcomeFilter::Force),
            Some(Outcome::Draw(DrawReason::Stalemate))
        );
    }

    #[test]
    fn test_move_counters_draws() {
        let pos =
            Situation::from_fen(Variant::Standard, "NNK4k/8/8/8/8/8/8/8 w - - 100 80").unwrap();
        assert_eq!(pos.outcome(OutcomeFilter::Strict), None);
        assert_eq!(
            pos.outcome(OutcomeFilter::Relaxed),
            Some(Outcome::Draw(DrawReason::Moves50))
        );

        let pos =
            Situation::from_fen(Variant::Standard, "NNK4k/8/8/8/8/8/8/8 w - - 150 90").unwrap();
        assert_eq!(
            pos.outcome(OutcomeFilter::Strict),
            Some(Outcome::Draw(DrawReason::Moves75))
        );
    }

    #[test]
    fn test_validation() {
        assert_eq!(
            Situation::from_fen(Variant::Standard, "8/8/8/8/8/8/8/K7 w - - 0 1"),
            Err(FromFenError::Position(PositionError::MissingKing(
                Color::Black
            )))
        );
        assert_eq!(
            Situation::from_fen(Variant::Standard, "kk6/8/8/8/8/8/8/K7 w - - 0 1"),
            Err(FromFenError::Position(PositionError::TooManyKings(
                Color::Black
            )))
        );
        assert_eq!(
            Situation::from_fen(Variant::Standard, "k7/8/8/8/8/8/8/KP6 w - - 0 1"),
            Err(FromFenError::Position(PositionError::PawnOnBackRank(
                Square::from_index(1)
            )))
        );
        // The opponent of the side to move may not be in check.
        assert_eq!(
            Situation::from_fen(Variant::Standard, "k7/8/8/8/8/8/r7/K7 b - - 0 1"),
            Err(FromFenError::Position(PositionError::OppositeCheck))
        );
    }

    #[test]
    fn test_rights_cleared_by_rook_capture() {
        let pos = Situation::from_fen(
            Variant::Standard,
            "r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1",
        )
        .unwrap();
        // Rook takes rook across the a-file: both queenside rights disappear.
        let next = pos.play_uci("a1a8").unwrap();
        assert_eq!(
            next.castles().to_string(),
            "Kk",
        );
    }

    #[test]
    fn test_castling_moves_both_pieces() {
        let pos = Situation::from_fen(
            Variant::Standard,
            "r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1",
        )
        .unwrap();
        let next = pos.play_uci("e1c1").unwrap();
        assert_eq!(next.fen(), "r3k2r/8/8/8/8/8/8/2KR3R b kq - 1 1");
        let next = next.play_uci("e8g8").unwrap();
        assert_eq!(next.fen(), "r4rk1/8/8/8/8/8/8/2KR3R w - - 2 2");
    }

    #[test]
    fn test_uci_castle_both_encodings() {
        let pos = Situation::from_fen(
            Variant::Standard,
            "r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1",
        )
        .unwrap();
        let a = pos.play_uci("e1g1").unwrap();
        let b = pos.play_uci("e1h1").unwrap();
        assert_eq!(a.fen(), b.fen());
    }
}
