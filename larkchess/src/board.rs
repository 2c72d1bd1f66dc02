//! Piece placement and the FEN bridge

use crate::bitboard::Bitboard;
use crate::types::{
    self, Castles, CastlesParseError, Color, File, Piece, Rank, Role, Square, SquareParseError,
};
use crate::{attack, bitboard_consts, geometry, zobrist};

use std::fmt::{self, Display};
use std::num::ParseIntError;
use std::str::FromStr;

use thiserror::Error;

/// Error parsing the first part of FEN (i.e. the positions of pieces on the board)
#[derive(Debug, Clone, Error, Eq, PartialEq)]
pub enum PlacementParseError {
    /// Rank is too large
    #[error("too many items in rank {0}")]
    RankOverflow(Rank),
    /// Rank is too small
    #[error("not enough items in rank {0}")]
    RankUnderflow(Rank),
    /// Too many ranks
    #[error("too many ranks")]
    Overflow,
    /// Not enough ranks
    #[error("not enough ranks")]
    Underflow,
    /// Unexpected character
    #[error("unexpected char {0:?}")]
    UnexpectedChar(char),
}

/// Error parsing [`Setup`] from FEN
#[derive(Debug, Clone, Error, Eq, PartialEq)]
pub enum FenParseError {
    /// FEN contains non-ASCII characters
    #[error("non-ASCII data in FEN")]
    NonAscii,
    /// FEN doesn't have board part
    #[error("board not specified")]
    NoBoard,
    /// Error parsing board from FEN
    #[error("bad board: {0}")]
    Board(#[from] PlacementParseError),
    /// FEN doesn't have move side part
    #[error("no move side")]
    NoMoveSide,
    /// Error parsing move side from FEN
    #[error("bad move side: {0}")]
    MoveSide(#[from] types::ColorParseError),
    /// FEN doesn't have castling rights part
    #[error("no castling rights")]
    NoCastling,
    /// Error parsing castling rights from FEN
    #[error("bad castling rights: {0}")]
    Castling(#[from] CastlesParseError),
    /// FEN doesn't have enpassant part
    #[error("no enpassant")]
    NoEnpassant,
    /// Error parsing enpassant from FEN
    #[error("bad enpassant: {0}")]
    Enpassant(#[from] SquareParseError),
    /// Enpassant rank is invalid
    #[error("invalid enpassant rank {0}")]
    InvalidEnpassantRank(Rank),
    /// Error parsing move counter
    #[error("bad move counter: {0}")]
    MoveCounter(ParseIntError),
    /// Error parsing move number
    #[error("bad move number: {0}")]
    MoveNumber(ParseIntError),
    /// FEN contains extra data
    #[error("extra data in FEN")]
    ExtraData,
}

/// Piece placement on the board
///
/// The placement is stored as bitboards partitioned two ways which always agree:
/// one bitboard per role and one per color, plus the `occupied` union. An extra
/// `promoted` bitboard tracks pieces that began life as pawns, which matters only
/// for Crazyhouse pocket bookkeeping.
///
/// A Zobrist key of the placement is maintained incrementally by the mutators.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Board {
    by_role: [Bitboard; Role::COUNT],
    by_color: [Bitboard; 2],
    occupied: Bitboard,
    promoted: Bitboard,
    hash: u64,
}

impl Board {
    /// Returns a board without any pieces
    #[inline]
    pub const fn empty() -> Board {
        Board {
            by_role: [Bitboard::EMPTY; Role::COUNT],
            by_color: [Bitboard::EMPTY; 2],
            occupied: Bitboard::EMPTY,
            promoted: Bitboard::EMPTY,
            hash: 0,
        }
    }

    /// Returns the bitboard over all the pieces of role `r`, regardless of color
    #[inline]
    pub fn by_role(&self, r: Role) -> Bitboard {
        unsafe { *self.by_role.get_unchecked(r.index()) }
    }

    /// Returns the bitboard over all the pieces of color `c`
    #[inline]
    pub fn by_color(&self, c: Color) -> Bitboard {
        unsafe { *self.by_color.get_unchecked(c as u8 as usize) }
    }

    /// Returns the bitboard over all the pieces of color `c` and role `r`
    #[inline]
    pub fn by_piece(&self, c: Color, r: Role) -> Bitboard {
        self.by_color(c) & self.by_role(r)
    }

    /// Returns the bitboard over all occupied squares
    #[inline]
    pub fn occupied(&self) -> Bitboard {
        self.occupied
    }

    /// Returns the bitboard of pieces that were obtained by promotion
    ///
    /// Only maintained meaningfully when the variant tracks promotions (Crazyhouse).
    #[inline]
    pub fn promoted(&self) -> Bitboard {
        self.promoted
    }

    /// Returns all rooks and queens, the pieces attacking along ranks and files
    #[inline]
    pub fn rooks_and_queens(&self) -> Bitboard {
        self.by_role(Role::Rook) | self.by_role(Role::Queen)
    }

    /// Returns all bishops and queens, the pieces attacking along diagonals
    #[inline]
    pub fn bishops_and_queens(&self) -> Bitboard {
        self.by_role(Role::Bishop) | self.by_role(Role::Queen)
    }

    /// Returns all sliding pieces
    #[inline]
    pub fn sliders(&self) -> Bitboard {
        self.by_role(Role::Bishop) | self.by_role(Role::Rook) | self.by_role(Role::Queen)
    }

    /// Returns the role of the piece on `sq`, if any
    #[inline]
    pub fn role_at(&self, sq: Square) -> Option<Role> {
        if !self.occupied.has(sq) {
            return None;
        }
        for r in Role::iter() {
            if self.by_role(r).has(sq) {
                return Some(r);
            }
        }
        None
    }

    /// Returns the color of the piece on `sq`, if any
    #[inline]
    pub fn color_at(&self, sq: Square) -> Option<Color> {
        if self.by_color(Color::White).has(sq) {
            Some(Color::White)
        } else if self.by_color(Color::Black).has(sq) {
            Some(Color::Black)
        } else {
            None
        }
    }

    /// Returns the contents of square `sq`
    #[inline]
    pub fn piece_at(&self, sq: Square) -> Piece {
        match (self.color_at(sq), self.role_at(sq)) {
            (Some(c), Some(r)) => Piece::from_parts(c, r),
            _ => Piece::EMPTY,
        }
    }

    /// Returns the position of the king of color `c`, if there is exactly one
    ///
    /// Kingless armies occur in Horde (White) and in Atomic after an explosion;
    /// Antichess allows any number of kings.
    #[inline]
    pub fn king_of(&self, c: Color) -> Option<Square> {
        self.by_piece(c, Role::King).single_square()
    }

    /// Puts a piece of color `c` and role `r` to square `sq`, replacing its
    /// previous contents
    pub fn set_piece_at(&mut self, sq: Square, c: Color, r: Role, promoted: bool) {
        self.discard_piece_at(sq);
        let bit = Bitboard::from_square(sq);
        self.by_role[r.index()] |= bit;
        self.by_color[c as u8 as usize] |= bit;
        self.occupied |= bit;
        if promoted {
            self.promoted |= bit;
        }
        self.hash ^= zobrist::pieces(Piece::from_parts(c, r), sq);
    }

    /// Removes the piece from square `sq`, returning what was there
    pub fn discard_piece_at(&mut self, sq: Square) -> Piece {
        let piece = self.piece_at(sq);
        if let (Some(c), Some(r)) = (piece.color(), piece.role()) {
            let bit = Bitboard::from_square(sq);
            self.by_role[r.index()] ^= bit;
            self.by_color[c as u8 as usize] ^= bit;
            self.occupied ^= bit;
            self.promoted = self.promoted.without(sq);
            self.hash ^= zobrist::pieces(piece, sq);
        }
        piece
    }

    /// Returns `true` if square `sq` holds a promoted piece
    #[inline]
    pub fn is_promoted(&self, sq: Square) -> bool {
        self.promoted.has(sq)
    }

    /// Returns all the pieces of color `by` attacking square `sq`, assuming the
    /// given occupancy
    ///
    /// Passing an occupancy different from [`Board::occupied()`] allows x-ray
    /// queries, e.g. looking through the king while validating its evasions.
    pub fn attackers_to_occ(&self, sq: Square, by: Color, occupied: Bitboard) -> Bitboard {
        // The pawn table is indexed by the victim's color: a white pawn attacks
        // `sq` exactly if a black pawn on `sq` would attack it back.
        ((attack::pawn(by.inv(), sq) & self.by_role(Role::Pawn))
            | (attack::knight(sq) & self.by_role(Role::Knight))
            | (attack::king(sq) & self.by_role(Role::King))
            | (attack::rook(sq, occupied) & self.rooks_and_queens())
            | (attack::bishop(sq, occupied) & self.bishops_and_queens()))
            & self.by_color(by)
    }

    /// Returns all the pieces of color `by` attacking square `sq`
    #[inline]
    pub fn attackers_to(&self, sq: Square, by: Color) -> Bitboard {
        self.attackers_to_occ(sq, by, self.occupied)
    }

    /// Returns the Zobrist key of the piece placement
    ///
    /// Side to move, castling rights and en passant are mixed in at the
    /// position level, not here.
    #[inline]
    pub fn zobrist_hash(&self) -> u64 {
        self.hash
    }

    /// Wraps the board to allow pretty-printing with the given style
    #[inline]
    pub fn pretty(&self, style: PrettyStyle) -> Pretty<'_> {
        Pretty { board: self, style }
    }
}

impl Default for Board {
    #[inline]
    fn default() -> Board {
        Board::empty()
    }
}

fn format_placement(board: &Board, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
    for rank in (0..8).rev().map(Rank::from_index) {
        if rank != Rank::R8 {
            write!(f, "/")?;
        }
        let mut empty = 0;
        for file in File::iter() {
            let piece = board.piece_at(Square::from_parts(file, rank));
            if piece.is_empty() {
                empty += 1;
                continue;
            }
            if empty != 0 {
                write!(f, "{}", (b'0' + empty) as char)?;
                empty = 0;
            }
            write!(f, "{}", piece)?;
        }
        if empty != 0 {
            write!(f, "{}", (b'0' + empty) as char)?;
        }
    }
    Ok(())
}

fn parse_placement(s: &str) -> Result<Board, PlacementParseError> {
    type Error = PlacementParseError;

    let mut board = Board::empty();
    let mut file = 0_usize;
    let mut rank = 7_usize;
    let mut rank_done = false;
    for b in s.bytes() {
        match b {
            b'1'..=b'8' => {
                let add = (b - b'0') as usize;
                if file + add > 8 {
                    return Err(Error::RankOverflow(Rank::from_index(rank)));
                }
                file += add;
            }
            b'/' => {
                if file < 8 {
                    return Err(Error::RankUnderflow(Rank::from_index(rank)));
                }
                if rank == 0 {
                    return Err(Error::Overflow);
                }
                rank -= 1;
                file = 0;
                rank_done = rank == 0;
            }
            _ => {
                if file >= 8 {
                    return Err(Error::RankOverflow(Rank::from_index(rank)));
                }
                let piece =
                    Piece::from_char(b as char).ok_or(Error::UnexpectedChar(b as char))?;
                if let (Some(c), Some(r)) = (piece.color(), piece.role()) {
                    board.set_piece_at(
                        Square::from_parts(File::from_index(file), Rank::from_index(rank)),
                        c,
                        r,
                        false,
                    );
                } else {
                    return Err(Error::UnexpectedChar(b as char));
                }
                file += 1;
            }
        };
    }

    if file < 8 {
        return Err(Error::RankUnderflow(Rank::from_index(rank)));
    }
    if !rank_done {
        return Err(Error::Underflow);
    }

    Ok(board)
}

/// External form of a position, as decoded from FEN
///
/// A setup carries everything a FEN string does, with castling rights resolved
/// into the bitboard of unmoved rooks (which makes it Chess960-ready). It is not
/// validated; convert it into a [`Situation`](crate::position::Situation) with
/// [`Situation::from_setup`](crate::position::Situation::from_setup) to obtain a
/// playable position.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Setup {
    /// Piece placement
    pub board: Board,
    /// Side to move
    pub turn: Color,
    /// Rook squares that still retain castling rights
    pub unmoved_rooks: Bitboard,
    /// En passant target square (e.g. e3 after a white double push)
    pub ep_square: Option<Square>,
    /// Number of half-moves without pawn moves or captures
    pub halfmove_clock: u16,
    /// Move number, incremented after each move by Black
    pub fullmoves: u16,
}

impl Setup {
    /// Returns the setup of the standard initial position
    pub fn initial() -> Setup {
        let mut board = Board::empty();
        for file in File::iter() {
            board.set_piece_at(
                Square::from_parts(file, Rank::R2),
                Color::White,
                Role::Pawn,
                false,
            );
            board.set_piece_at(
                Square::from_parts(file, Rank::R7),
                Color::Black,
                Role::Pawn,
                false,
            );
        }
        for (color, rank) in [(Color::White, Rank::R1), (Color::Black, Rank::R8)] {
            for (file, role) in [
                (File::A, Role::Rook),
                (File::B, Role::Knight),
                (File::C, Role::Bishop),
                (File::D, Role::Queen),
                (File::E, Role::King),
                (File::F, Role::Bishop),
                (File::G, Role::Knight),
                (File::H, Role::Rook),
            ] {
                board.set_piece_at(Square::from_parts(file, rank), color, role, false);
            }
        }
        Setup {
            board,
            turn: Color::White,
            unmoved_rooks: bitboard_consts::CORNERS,
            ep_square: None,
            halfmove_clock: 0,
            fullmoves: 1,
        }
    }

    /// Parses a setup from FEN
    ///
    /// Does the same as [`Setup::from_str`]. It is recommended to use this function
    /// instead of `from_str()` for better readability.
    #[inline]
    pub fn from_fen(fen: &str) -> Result<Setup, FenParseError> {
        Setup::from_str(fen)
    }

    /// Converts the setup into a FEN string
    #[inline]
    pub fn as_fen(&self) -> String {
        self.to_string()
    }

    /// Returns the castling rights mask derivable from the unmoved rooks
    pub fn castles(&self) -> Castles {
        castles_from_rooks(&self.board, self.unmoved_rooks)
    }
}

impl Default for Setup {
    #[inline]
    fn default() -> Setup {
        Setup::initial()
    }
}

/// Derives the 4-bit castling rights mask from the unmoved rooks bitboard
pub(crate) fn castles_from_rooks(board: &Board, unmoved_rooks: Bitboard) -> Castles {
    let mut castles = Castles::EMPTY;
    for color in [Color::White, Color::Black] {
        let back = bitboard_consts::back_rank(color);
        let king = match (board.by_piece(color, Role::King) & back).single_square() {
            Some(k) => k,
            None => continue,
        };
        for rook in unmoved_rooks & back & board.by_piece(color, Role::Rook) {
            let side = if rook > king {
                types::CastlingSide::King
            } else {
                types::CastlingSide::Queen
            };
            castles.set(color, side);
        }
    }
    castles
}

fn parse_castling(s: &str, board: &Board) -> Result<Bitboard, CastlesParseError> {
    type Error = CastlesParseError;

    if s == "-" {
        return Ok(Bitboard::EMPTY);
    }
    if s.is_empty() {
        return Err(Error::EmptyString);
    }

    let mut rooks = Bitboard::EMPTY;
    for b in s.bytes() {
        let c = b as char;
        let color = if c.is_ascii_uppercase() {
            Color::White
        } else {
            Color::Black
        };
        let back = bitboard_consts::back_rank(color);
        let candidates = board.by_piece(color, Role::Rook) & back;
        let king = board.by_piece(color, Role::King) & back;

        // Flags referring to absent rooks are silently dropped, like other
        // impossible FEN details fixed up during validation.
        let rook = match c.to_ascii_uppercase() {
            'K' => match king.first() {
                Some(k) => candidates.into_iter().filter(|&r| r > k).last(),
                None => None,
            },
            'Q' => match king.first() {
                Some(k) => candidates.into_iter().find(|&r| r < k),
                None => None,
            },
            'A'..='H' => {
                let file = File::from_char(c.to_ascii_lowercase()).unwrap();
                (candidates & bitboard_consts::file(file)).first()
            }
            _ => return Err(Error::UnexpectedChar(c)),
        };
        if let Some(r) = rook {
            if rooks.has(r) {
                return Err(Error::DuplicateChar(c));
            }
            rooks.set(r);
        }
    }
    Ok(rooks)
}

fn format_castling(
    board: &Board,
    unmoved_rooks: Bitboard,
    f: &mut fmt::Formatter<'_>,
) -> Result<(), fmt::Error> {
    let mut any = false;
    for color in [Color::White, Color::Black] {
        let back = bitboard_consts::back_rank(color);
        let king = match (board.by_piece(color, Role::King) & back).single_square() {
            Some(k) => k,
            None => continue,
        };
        let rooks = unmoved_rooks & back & board.by_piece(color, Role::Rook);
        // Kingside flag first, then queenside, as in classical FEN.
        let mut flags = Vec::new();
        if let Some(r) = rooks.into_iter().filter(|&r| r > king).last() {
            flags.push(if r.file() == File::H {
                'k'
            } else {
                r.file().as_char()
            });
        }
        if let Some(r) = rooks.into_iter().find(|&r| r < king) {
            flags.push(if r.file() == File::A {
                'q'
            } else {
                r.file().as_char()
            });
        }
        for flag in flags {
            any = true;
            match color {
                Color::White => write!(f, "{}", flag.to_ascii_uppercase())?,
                Color::Black => write!(f, "{}", flag)?,
            };
        }
    }
    if !any {
        write!(f, "-")?;
    }
    Ok(())
}

fn parse_ep_square(s: &str, side: Color) -> Result<Option<Square>, FenParseError> {
    if s == "-" {
        return Ok(None);
    }
    let ep = Square::from_str(s)?;
    if ep.rank() != geometry::enpassant_dst_rank(side) {
        return Err(FenParseError::InvalidEnpassantRank(ep.rank()));
    }
    Ok(Some(ep))
}

impl FromStr for Setup {
    type Err = FenParseError;

    fn from_str(s: &str) -> Result<Setup, Self::Err> {
        type Error = FenParseError;

        if !s.is_ascii() {
            return Err(Error::NonAscii);
        }
        let mut iter = s.split(' ').fuse();

        let board = parse_placement(iter.next().ok_or(Error::NoBoard)?)?;
        let turn = Color::from_str(iter.next().ok_or(Error::NoMoveSide)?)?;
        let unmoved_rooks = parse_castling(iter.next().ok_or(Error::NoCastling)?, &board)?;
        let ep_square = parse_ep_square(iter.next().ok_or(Error::NoEnpassant)?, turn)?;
        let halfmove_clock = match iter.next() {
            Some(s) => u16::from_str(s).map_err(Error::MoveCounter)?,
            None => 0,
        };
        let fullmoves = match iter.next() {
            Some(s) => u16::from_str(s).map_err(Error::MoveNumber)?,
            None => 1,
        };

        if iter.next().is_some() {
            return Err(Error::ExtraData);
        }

        Ok(Setup {
            board,
            turn,
            unmoved_rooks,
            ep_square,
            halfmove_clock,
            fullmoves,
        })
    }
}

impl Display for Setup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        format_placement(&self.board, f)?;
        write!(f, " {} ", self.turn)?;
        format_castling(&self.board, self.unmoved_rooks, f)?;
        match self.ep_square {
            Some(p) => write!(f, " {}", p)?,
            None => write!(f, " -")?,
        };
        write!(f, " {} {}", self.halfmove_clock, self.fullmoves)?;
        Ok(())
    }
}

/// Style for [`Board::pretty()`]
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum PrettyStyle {
    /// Print pieces and frames as ASCII characters
    Ascii,
    /// Print pieces and frames as fancy Unicode characters
    Utf8,
}

/// Wrapper to pretty-print the board
pub struct Pretty<'a> {
    board: &'a Board,
    style: PrettyStyle,
}

trait StyleTable {
    const HORZ_FRAME: char;
    const VERT_FRAME: char;
    const ANGLE_FRAME: char;

    fn piece(p: Piece) -> char;

    fn fmt(b: &Board, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        for rank in (0..8).rev().map(Rank::from_index) {
            write!(f, "{}{}", rank, Self::VERT_FRAME)?;
            for file in File::iter() {
                write!(f, "{}", Self::piece(b.piece_at(Square::from_parts(file, rank))))?;
            }
            writeln!(f)?;
        }
        write!(f, "{}{}", Self::HORZ_FRAME, Self::ANGLE_FRAME)?;
        for _ in File::iter() {
            write!(f, "{}", Self::HORZ_FRAME)?;
        }
        writeln!(f)?;
        write!(f, " {}", Self::VERT_FRAME)?;
        for file in File::iter() {
            write!(f, "{}", file)?;
        }
        writeln!(f)?;
        Ok(())
    }
}

struct AsciiStyleTable;
struct Utf8StyleTable;

impl StyleTable for AsciiStyleTable {
    const HORZ_FRAME: char = '-';
    const VERT_FRAME: char = '|';
    const ANGLE_FRAME: char = '+';

    fn piece(p: Piece) -> char {
        p.as_char()
    }
}

impl StyleTable for Utf8StyleTable {
    const HORZ_FRAME: char = '─';
    const VERT_FRAME: char = '│';
    const ANGLE_FRAME: char = '┼';

    fn piece(p: Piece) -> char {
        p.as_utf8_char()
    }
}

impl<'a> Display for Pretty<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        match self.style {
            PrettyStyle::Ascii => AsciiStyleTable::fmt(self.board, f),
            PrettyStyle::Utf8 => Utf8StyleTable::fmt(self.board, f),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CastlingSide;

    const INI_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

    #[test]
    fn test_initial() {
        let setup = Setup::initial();
        assert_eq!(setup.to_string(), INI_FEN);
        assert_eq!(Setup::from_str(INI_FEN), Ok(setup.clone()));
        assert_eq!(setup.castles(), Castles::FULL);
        assert_eq!(
            setup.board.king_of(Color::White),
            Some(Square::from_parts(File::E, Rank::R1))
        );
        assert_eq!(setup.board.occupied().len(), 32);
    }

    #[test]
    fn test_board_partitions_agree() {
        let setup = Setup::initial();
        let b = &setup.board;
        let mut union = Bitboard::EMPTY;
        for r in Role::iter() {
            for r2 in Role::iter() {
                if r != r2 {
                    assert!(b.by_role(r).is_disjoint(b.by_role(r2)));
                }
            }
            union |= b.by_role(r);
        }
        assert_eq!(union, b.occupied());
        assert!(b.by_color(Color::White).is_disjoint(b.by_color(Color::Black)));
        assert_eq!(
            b.by_color(Color::White) | b.by_color(Color::Black),
            b.occupied()
        );
    }

    #[test]
    fn test_midgame() {
        const FEN: &str = "1rq1r1k1/1p3ppp/pB3n2/3ppP2/Pbb1P3/1PN2B2/2P2QPP/R1R4K w - - 1 21";

        let setup = Setup::from_fen(FEN).unwrap();
        assert_eq!(setup.as_fen(), FEN);
        assert_eq!(
            setup.board.piece_at(Square::from_str("b4").unwrap()),
            Piece::from_parts(Color::Black, Role::Bishop)
        );
        assert_eq!(
            setup.board.piece_at(Square::from_str("f2").unwrap()),
            Piece::from_parts(Color::White, Role::Queen)
        );
        assert_eq!(
            setup.board.king_of(Color::White),
            Some(Square::from_str("h1").unwrap())
        );
        assert_eq!(setup.turn, Color::White);
        assert_eq!(setup.unmoved_rooks, Bitboard::EMPTY);
        assert_eq!(setup.ep_square, None);
        assert_eq!(setup.halfmove_clock, 1);
        assert_eq!(setup.fullmoves, 21);
    }

    #[test]
    fn test_ep_roundtrip() {
        const FEN: &str = "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1";
        let setup = Setup::from_fen(FEN).unwrap();
        assert_eq!(setup.ep_square, Some(Square::from_str("e3").unwrap()));
        assert_eq!(setup.as_fen(), FEN);

        assert_eq!(
            Setup::from_fen("rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e4 0 1"),
            Err(FenParseError::InvalidEnpassantRank(Rank::R4))
        );
    }

    #[test]
    fn test_castling_letters() {
        // Chess960-style position with rooks away from the corners. Kingside
        // flags come first, as in classical FEN.
        const FEN: &str = "1rkr4/pppppppp/8/8/8/8/PPPPPPPP/1RKR4 w DBdb - 0 1";
        let setup = Setup::from_fen(FEN).unwrap();
        let castles = setup.castles();
        assert!(castles.has(Color::White, CastlingSide::King));
        assert!(castles.has(Color::White, CastlingSide::Queen));
        assert!(castles.has(Color::Black, CastlingSide::King));
        assert!(castles.has(Color::Black, CastlingSide::Queen));
        assert_eq!(setup.as_fen(), FEN);
    }

    #[test]
    fn test_incomplete() {
        assert_eq!(
            Setup::from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR"),
            Err(FenParseError::NoMoveSide)
        );
        assert_eq!(
            Setup::from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w"),
            Err(FenParseError::NoCastling)
        );
        assert_eq!(
            Setup::from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq"),
            Err(FenParseError::NoEnpassant)
        );

        let setup =
            Setup::from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq -").unwrap();
        assert_eq!(setup.halfmove_clock, 0);
        assert_eq!(setup.fullmoves, 1);
    }

    #[test]
    fn test_attackers() {
        let setup =
            Setup::from_fen("rnbqkbnr/pppp1ppp/8/4p3/4P3/8/PPPP1PPP/RNBQKBNR w KQkq - 0 2")
                .unwrap();
        let e5 = Square::from_str("e5").unwrap();
        // Nothing attacks the black pawn on e5 yet.
        assert_eq!(setup.board.attackers_to(e5, Color::White), Bitboard::EMPTY);
        let d4 = Square::from_str("d4").unwrap();
        // d4 is covered by the e5 pawn and the black queen through d8-d4? No:
        // the d7 pawn blocks the file, so only the e5 pawn attacks d4.
        assert_eq!(
            setup.board.attackers_to(d4, Color::Black),
            Bitboard::from_square(e5)
        );
    }

    #[test]
    fn test_discard_restores_hash() {
        let mut board = Setup::initial().board;
        let h = board.zobrist_hash();
        let e4 = Square::from_str("e4").unwrap();
        board.set_piece_at(e4, Color::White, Role::Knight, false);
        assert_ne!(board.zobrist_hash(), h);
        board.discard_piece_at(e4);
        assert_eq!(board.zobrist_hash(), h);
        assert_eq!(board, Setup::initial().board);
    }
}
