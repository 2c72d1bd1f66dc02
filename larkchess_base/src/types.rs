//! Core chess value types

use derive_more::Display;
use std::{fmt, hint, str::FromStr};
use thiserror::Error;

/// Error when parsing [`Square`] from string
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SquareParseError {
    /// Unexpected character for file coordinate
    #[error("unexpected file char {0:?}")]
    UnexpectedFileChar(char),
    /// Unexpected character for rank coordinate
    #[error("unexpected rank char {0:?}")]
    UnexpectedRankChar(char),
    /// Invalid string length
    #[error("invalid string length")]
    BadLength,
}

/// Error when parsing [`Piece`] from string
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PieceParseError {
    /// Unexpected character
    #[error("unexpected piece char {0:?}")]
    UnexpectedChar(char),
    /// Invalid string length
    #[error("invalid string length")]
    BadLength,
}

/// Error when parsing [`Color`] from string
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ColorParseError {
    /// Unexpected character
    #[error("unexpected color char {0:?}")]
    UnexpectedChar(char),
    /// Invalid string length
    #[error("invalid string length")]
    BadLength,
}

/// Error when parsing [`Castles`] from string
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CastlesParseError {
    /// Unexpected character
    #[error("unexpected char {0:?}")]
    UnexpectedChar(char),
    /// Duplicate character
    #[error("duplicate char {0:?}")]
    DuplicateChar(char),
    /// The string is empty
    #[error("the string is empty")]
    EmptyString,
}

/// File (i. e. a vertical line) on a chess board
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Debug, Hash)]
#[repr(u8)]
pub enum File {
    A = 0,
    B = 1,
    C = 2,
    D = 3,
    E = 4,
    F = 5,
    G = 6,
    H = 7,
}

impl File {
    /// Returns a numeric index of the current file
    ///
    /// The files are numbered from left to right, i.e. file A has index 0, and file H has index 7.
    #[inline]
    pub const fn index(&self) -> usize {
        *self as u8 as usize
    }

    /// Converts a file index to [`File`]
    ///
    /// # Safety
    ///
    /// The behavior is undefined when `val` is not in range `[0; 8)`.
    #[inline]
    pub const unsafe fn from_index_unchecked(val: usize) -> Self {
        match val {
            0 => File::A,
            1 => File::B,
            2 => File::C,
            3 => File::D,
            4 => File::E,
            5 => File::F,
            6 => File::G,
            7 => File::H,
            _ => hint::unreachable_unchecked(),
        }
    }

    /// Converts a file index to [`File`]
    ///
    /// # Panics
    ///
    /// The function panics when `val` is not in range `[0; 8)`.
    #[inline]
    pub const fn from_index(val: usize) -> Self {
        assert!(val < 8, "file index must be between 0 and 7");
        unsafe { Self::from_index_unchecked(val) }
    }

    /// Returns an iterator over all the files, in ascending order of their indices
    #[inline]
    pub fn iter() -> impl Iterator<Item = Self> {
        (0..8).map(|x| unsafe { Self::from_index_unchecked(x) })
    }

    /// Creates a file from its character representation (`'a'` to `'h'`), if it's valid
    #[inline]
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            'a'..='h' => Some(unsafe {
                Self::from_index_unchecked((u32::from(c) - u32::from('a')) as usize)
            }),
            _ => None,
        }
    }

    /// Converts a file into its character representation
    #[inline]
    pub fn as_char(&self) -> char {
        (b'a' + *self as u8) as char
    }
}

impl fmt::Display for File {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        write!(f, "{}", self.as_char())
    }
}

/// Rank (i. e. a horizontal line) on a chess board
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Debug, Hash)]
#[repr(u8)]
pub enum Rank {
    R1 = 0,
    R2 = 1,
    R3 = 2,
    R4 = 3,
    R5 = 4,
    R6 = 5,
    R7 = 6,
    R8 = 7,
}

impl Rank {
    /// Returns a numeric index of the current rank
    ///
    /// The ranks are numbered from bottom to top, i.e. rank 1 has index 0, and rank 8
    /// has index 7.
    #[inline]
    pub const fn index(&self) -> usize {
        *self as u8 as usize
    }

    /// Converts a rank index to [`Rank`]
    ///
    /// # Safety
    ///
    /// The behavior is undefined when `val` is not in range `[0; 8)`.
    #[inline]
    pub const unsafe fn from_index_unchecked(val: usize) -> Self {
        match val {
            0 => Rank::R1,
            1 => Rank::R2,
            2 => Rank::R3,
            3 => Rank::R4,
            4 => Rank::R5,
            5 => Rank::R6,
            6 => Rank::R7,
            7 => Rank::R8,
            _ => hint::unreachable_unchecked(),
        }
    }

    /// Converts a rank index to [`Rank`]
    ///
    /// # Panics
    ///
    /// The function panics when `val` is not in range `[0; 8)`.
    #[inline]
    pub const fn from_index(val: usize) -> Self {
        assert!(val < 8, "rank index must be between 0 and 7");
        unsafe { Self::from_index_unchecked(val) }
    }

    /// Returns an iterator over all the ranks, in ascending order of their indices
    #[inline]
    pub fn iter() -> impl Iterator<Item = Self> {
        (0..8).map(|x| unsafe { Self::from_index_unchecked(x) })
    }

    /// Creates a rank from its character representation (`'1'` to `'8'`), if it's valid
    #[inline]
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '1'..='8' => Some(unsafe {
                Self::from_index_unchecked((u32::from(c) - u32::from('1')) as usize)
            }),
            _ => None,
        }
    }

    /// Converts a rank into its character representation
    #[inline]
    pub fn as_char(&self) -> char {
        (b'1' + *self as u8) as char
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        write!(f, "{}", self.as_char())
    }
}

/// Coordinate of a square
///
/// The indices are assigned in a little-endian rank-file manner, so a1 has index 0,
/// b1 has index 1, and h8 has index 63:
///
/// ```notrust
/// 8 | 56 57 58 59 60 61 62 63
/// 7 | 48 49 50 51 52 53 54 55
/// 6 | 40 41 42 43 44 45 46 47
/// 5 | 32 33 34 35 36 37 38 39
/// 4 | 24 25 26 27 28 29 30 31
/// 3 | 16 17 18 19 20 21 22 23
/// 2 |  8  9 10 11 12 13 14 15
/// 1 |  0  1  2  3  4  5  6  7
/// --+------------------------
///   |  a  b  c  d  e  f  g  h
/// ```
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Square(u8);

impl Square {
    /// Creates a square from its index
    ///
    /// # Panics
    ///
    /// This function panics if `val` is not a valid index.
    #[inline]
    pub const fn from_index(val: usize) -> Square {
        assert!(val < 64, "square index must be between 0 and 63");
        Square(val as u8)
    }

    /// Creates a square from its index
    ///
    /// # Safety
    ///
    /// The behavior is undefined if `val` is not a valid index.
    #[inline]
    pub const unsafe fn from_index_unchecked(val: usize) -> Square {
        Square(val as u8)
    }

    /// Creates a square from the given file and rank
    #[inline]
    pub const fn from_parts(file: File, rank: Rank) -> Square {
        Square(((rank as u8) << 3) | file as u8)
    }

    /// Returns the file on which the square is located
    #[inline]
    pub const fn file(&self) -> File {
        unsafe { File::from_index_unchecked((self.0 & 7) as usize) }
    }

    /// Returns the rank on which the square is located
    #[inline]
    pub const fn rank(&self) -> Rank {
        unsafe { Rank::from_index_unchecked((self.0 >> 3) as usize) }
    }

    /// Returns the index of the square
    #[inline]
    pub const fn index(&self) -> usize {
        self.0 as usize
    }

    /// Flips the square vertically
    #[inline]
    pub const fn flipped_rank(self) -> Square {
        Square(self.0 ^ 56)
    }

    /// Flips the square horizontally
    #[inline]
    pub const fn flipped_file(self) -> Square {
        Square(self.0 ^ 7)
    }

    /// Takes the file from `self` and the rank from `rank_of`
    ///
    /// Useful to reconstruct the square of a pawn captured en passant: it shares
    /// its file with the capture target and its rank with the capturing pawn.
    #[inline]
    pub const fn combine(self, rank_of: Square) -> Square {
        Square((self.0 & 7) | (rank_of.0 & 56))
    }

    /// Adds `delta` to the index of the square
    ///
    /// # Panics
    ///
    /// The function panics if the index is invalid (i.e. not in range `[0; 64)`) after
    /// such addition.
    #[inline]
    pub const fn add(self, delta: isize) -> Square {
        Square::from_index(self.index().wrapping_add(delta as usize))
    }

    /// Adds `delta` to the index of the square
    ///
    /// # Safety
    ///
    /// The behavior is undefined if the index is invalid (i.e. not in range `[0; 64)`)
    /// after such addition.
    #[inline]
    pub const unsafe fn add_unchecked(self, delta: isize) -> Square {
        Square::from_index_unchecked(self.index().wrapping_add(delta as usize))
    }

    /// Adds `delta_file` to the file index and `delta_rank` to the rank index.
    /// If either index leaves the board, returns `None`
    #[inline]
    pub fn shift(self, delta_file: isize, delta_rank: isize) -> Option<Square> {
        let new_file = self.file().index().wrapping_add(delta_file as usize);
        let new_rank = self.rank().index().wrapping_add(delta_rank as usize);
        if new_file >= 8 || new_rank >= 8 {
            return None;
        }
        unsafe {
            Some(Square::from_parts(
                File::from_index_unchecked(new_file),
                Rank::from_index_unchecked(new_rank),
            ))
        }
    }

    /// Iterates over all squares in ascending order of their indices
    #[inline]
    pub fn iter() -> impl Iterator<Item = Self> {
        (0_u8..64_u8).map(Square)
    }
}

impl fmt::Debug for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        if self.0 < 64 {
            return write!(f, "Square({})", self);
        }
        write!(f, "Square(?{:?})", self.0)
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        write!(f, "{}{}", self.file().as_char(), self.rank().as_char())
    }
}

impl FromStr for Square {
    type Err = SquareParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != 2 {
            return Err(SquareParseError::BadLength);
        }
        let bytes = s.as_bytes();
        let (file_ch, rank_ch) = (bytes[0] as char, bytes[1] as char);
        Ok(Square::from_parts(
            File::from_char(file_ch).ok_or(SquareParseError::UnexpectedFileChar(file_ch))?,
            Rank::from_char(rank_ch).ok_or(SquareParseError::UnexpectedRankChar(rank_ch))?,
        ))
    }
}

/// Color of chess pieces (either white or black)
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Color {
    White = 0,
    Black = 1,
}

impl Color {
    /// Returns the opposite color
    #[inline]
    pub const fn inv(&self) -> Color {
        match *self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    /// Selects `white` or `black` depending on the color
    #[inline]
    pub fn fold<T>(self, white: T, black: T) -> T {
        match self {
            Color::White => white,
            Color::Black => black,
        }
    }

    /// Returns a character representation of the color (`"w"` or `"b"`)
    #[inline]
    pub fn as_char(&self) -> char {
        match *self {
            Color::White => 'w',
            Color::Black => 'b',
        }
    }

    /// Creates a color from its character representation
    #[inline]
    pub fn from_char(c: char) -> Option<Color> {
        match c {
            'w' => Some(Color::White),
            'b' => Some(Color::Black),
            _ => None,
        }
    }

    /// Returns a full string representation of the color (either `"white"` or `"black"`)
    #[inline]
    pub fn as_long_str(&self) -> &'static str {
        match *self {
            Color::White => "white",
            Color::Black => "black",
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        write!(f, "{}", self.as_char())
    }
}

impl FromStr for Color {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != 1 {
            return Err(ColorParseError::BadLength);
        }
        let ch = s.as_bytes()[0] as char;
        Color::from_char(ch).ok_or(ColorParseError::UnexpectedChar(ch))
    }
}

/// Kind of chess pieces (without regard to piece color)
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Role {
    Pawn = 0,
    Knight = 1,
    Bishop = 2,
    Rook = 3,
    Queen = 4,
    King = 5,
}

impl Role {
    /// Number of different possible indices of [`Role`]
    pub const COUNT: usize = 6;

    /// Returns a numeric index of the current role
    #[inline]
    pub const fn index(&self) -> usize {
        *self as u8 as usize
    }

    /// Converts a role index to [`Role`]
    ///
    /// # Safety
    ///
    /// The behavior is undefined if the index is greater or equal than [`Role::COUNT`]
    #[inline]
    pub const unsafe fn from_index_unchecked(val: usize) -> Self {
        match val {
            0 => Self::Pawn,
            1 => Self::Knight,
            2 => Self::Bishop,
            3 => Self::Rook,
            4 => Self::Queen,
            5 => Self::King,
            _ => hint::unreachable_unchecked(),
        }
    }

    /// Converts a role index to [`Role`]
    ///
    /// # Panics
    ///
    /// The function panics if the index is greater or equal than [`Role::COUNT`]
    #[inline]
    pub const fn from_index(val: usize) -> Self {
        assert!(val < Self::COUNT, "role index must be between 0 and 5");
        unsafe { Self::from_index_unchecked(val) }
    }

    /// Returns an iterator over all the roles, in ascending order of their indices
    #[inline]
    pub fn iter() -> impl Iterator<Item = Self> {
        (0..Self::COUNT).map(|x| unsafe { Self::from_index_unchecked(x) })
    }

    /// Returns a lowercase character representation of the role
    #[inline]
    pub fn as_char(&self) -> char {
        b"pnbrqk"[self.index()] as char
    }

    /// Creates a role from its lowercase character representation
    #[inline]
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            'p' => Some(Role::Pawn),
            'n' => Some(Role::Knight),
            'b' => Some(Role::Bishop),
            'r' => Some(Role::Rook),
            'q' => Some(Role::Queen),
            'k' => Some(Role::King),
            _ => None,
        }
    }
}

/// Contents of a square on a chess board
///
/// A square can be either empty or contain a piece of some given color. This type is
/// one byte long to facilitate compact board representation and dense Zobrist tables.
#[derive(Default, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Piece(u8);

impl Piece {
    /// [`Piece`] standing for an empty square
    pub const EMPTY: Piece = Piece(0);

    /// Number of different possible indices of [`Piece`]
    pub const COUNT: usize = 13;

    /// Returns `true` if there is no piece
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Returns `true` if there is a piece
    #[inline]
    pub const fn is_occupied(&self) -> bool {
        self.0 != 0
    }

    /// Creates a piece from its index
    ///
    /// # Safety
    ///
    /// The behavior is undefined if the index is greater or equal than [`Piece::COUNT`]
    #[inline]
    pub const unsafe fn from_index_unchecked(val: usize) -> Piece {
        Piece(val as u8)
    }

    /// Creates a piece from its index
    ///
    /// # Panics
    ///
    /// The function panics if the index is greater or equal than [`Piece::COUNT`]
    #[inline]
    pub const fn from_index(val: usize) -> Piece {
        assert!(val < Self::COUNT, "piece index too large");
        Piece(val as u8)
    }

    /// Returns the index of the piece
    ///
    /// Piece indices are stable and are used to address the Zobrist tables.
    #[inline]
    pub const fn index(&self) -> usize {
        self.0 as usize
    }

    /// Creates a piece of role `r` and color `c`
    #[inline]
    pub const fn from_parts(c: Color, r: Role) -> Piece {
        Piece(match c {
            Color::White => 1 + r as u8,
            Color::Black => 7 + r as u8,
        })
    }

    /// Returns the color of the piece, or `None` for an empty square
    #[inline]
    pub const fn color(&self) -> Option<Color> {
        match self.0 {
            0 => None,
            1..=6 => Some(Color::White),
            _ => Some(Color::Black),
        }
    }

    /// Returns the role of the piece, or `None` for an empty square
    #[inline]
    pub const fn role(&self) -> Option<Role> {
        match self.0 {
            0 => None,
            1 | 7 => Some(Role::Pawn),
            2 | 8 => Some(Role::Knight),
            3 | 9 => Some(Role::Bishop),
            4 | 10 => Some(Role::Rook),
            5 | 11 => Some(Role::Queen),
            6 | 12 => Some(Role::King),
            _ => unsafe { hint::unreachable_unchecked() },
        }
    }

    /// Iterates over all possible pieces in ascending order of their indices
    #[inline]
    pub fn iter() -> impl Iterator<Item = Self> {
        (0..Self::COUNT).map(|x| unsafe { Self::from_index_unchecked(x) })
    }

    /// Returns an ASCII character representation of the piece
    #[inline]
    pub fn as_char(&self) -> char {
        b".PNBRQKpnbrqk"[self.0 as usize] as char
    }

    /// Converts a piece to a corresponding Unicode character
    #[inline]
    pub fn as_utf8_char(&self) -> char {
        [
            '.', '♙', '♘', '♗', '♖', '♕', '♔', '♟', '♞', '♝', '♜', '♛', '♚',
        ][self.0 as usize]
    }

    /// Creates a piece from its ASCII character representation
    #[inline]
    pub fn from_char(c: char) -> Option<Self> {
        if c == '.' {
            return Some(Piece::EMPTY);
        }
        let color = if c.is_ascii_uppercase() {
            Color::White
        } else {
            Color::Black
        };
        let role = Role::from_char(c.to_ascii_lowercase())?;
        Some(Piece::from_parts(color, role))
    }
}

impl fmt::Debug for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        if (self.0 as usize) < Self::COUNT {
            return write!(f, "Piece({})", self.as_char());
        }
        write!(f, "Piece(?{:?})", self.0)
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        write!(f, "{}", self.as_char())
    }
}

impl FromStr for Piece {
    type Err = PieceParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != 1 {
            return Err(PieceParseError::BadLength);
        }
        let ch = s.as_bytes()[0] as char;
        Piece::from_char(ch).ok_or(PieceParseError::UnexpectedChar(ch))
    }
}

/// Castling side (either queenside or kingside)
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum CastlingSide {
    /// Queenside castling (a.k.a. O-O-O)
    Queen = 0,
    /// Kingside castling (a.k.a. O-O)
    King = 1,
}

/// Flags specifying allowed castling sides for both white and black
///
/// This is the compact 4-bit summary; the authoritative castling state is the
/// bitboard of unmoved rooks kept in the position history, from which this mask
/// is derived and cached.
#[derive(Default, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Castles(u8);

impl Castles {
    #[inline]
    const fn to_index(c: Color, s: CastlingSide) -> u8 {
        ((c as u8) << 1) | s as u8
    }

    #[inline]
    const fn to_color_mask(c: Color) -> u8 {
        3 << ((c as u8) << 1)
    }

    /// Empty castling rights (i.e. castling is not allowed at all)
    pub const EMPTY: Castles = Castles(0);

    /// Full castling rights (i.e. all possible castlings are allowed)
    pub const FULL: Castles = Castles(15);

    /// Returns `true` if color `c` is able to perform castling to side `s`
    #[inline]
    pub const fn has(&self, c: Color, s: CastlingSide) -> bool {
        ((self.0 >> Self::to_index(c, s)) & 1) != 0
    }

    /// Returns `true` if color `c` is able to perform castling to at least one of
    /// the sides.
    #[inline]
    pub const fn has_color(&self, c: Color) -> bool {
        (self.0 & Self::to_color_mask(c)) != 0
    }

    /// Returns `true` if no castling is allowed at all
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Adds `s` to allowed castling sides for color `c`
    #[inline]
    pub const fn with(self, c: Color, s: CastlingSide) -> Castles {
        Castles(self.0 | (1_u8 << Self::to_index(c, s)))
    }

    /// Removes `s` from allowed castling sides for color `c`
    #[inline]
    pub const fn without(self, c: Color, s: CastlingSide) -> Castles {
        Castles(self.0 & !(1_u8 << Self::to_index(c, s)))
    }

    /// Adds `s` to allowed castling sides for color `c`, in place
    #[inline]
    pub fn set(&mut self, c: Color, s: CastlingSide) {
        *self = self.with(c, s)
    }

    /// Removes `s` from allowed castling sides for color `c`, in place
    #[inline]
    pub fn unset(&mut self, c: Color, s: CastlingSide) {
        *self = self.without(c, s)
    }

    /// Removes all the castling rights for color `c`
    #[inline]
    pub fn unset_color(&mut self, c: Color) {
        self.unset(c, CastlingSide::King);
        self.unset(c, CastlingSide::Queen);
    }

    /// Creates [`Castles`] from index
    ///
    /// # Panics
    ///
    /// The function panics if `val` is an invalid index.
    #[inline]
    pub const fn from_index(val: usize) -> Castles {
        assert!(val < 16, "raw castling rights must be between 0 and 15");
        Castles(val as u8)
    }

    /// Converts [`Castles`] into an index
    #[inline]
    pub const fn index(&self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for Castles {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        if self.0 < 16 {
            return write!(f, "Castles({})", self);
        }
        write!(f, "Castles(?{:?})", self.0)
    }
}

impl fmt::Display for Castles {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        if *self == Self::EMPTY {
            return write!(f, "-");
        }
        if self.has(Color::White, CastlingSide::King) {
            write!(f, "K")?;
        }
        if self.has(Color::White, CastlingSide::Queen) {
            write!(f, "Q")?;
        }
        if self.has(Color::Black, CastlingSide::King) {
            write!(f, "k")?;
        }
        if self.has(Color::Black, CastlingSide::Queen) {
            write!(f, "q")?;
        }
        Ok(())
    }
}

impl FromStr for Castles {
    type Err = CastlesParseError;

    fn from_str(s: &str) -> Result<Castles, Self::Err> {
        type Error = CastlesParseError;
        if s == "-" {
            return Ok(Castles::EMPTY);
        }
        if s.is_empty() {
            return Err(Error::EmptyString);
        }
        let mut res = Castles::EMPTY;
        for b in s.bytes() {
            let (color, side) = match b {
                b'K' => (Color::White, CastlingSide::King),
                b'Q' => (Color::White, CastlingSide::Queen),
                b'k' => (Color::Black, CastlingSide::King),
                b'q' => (Color::Black, CastlingSide::Queen),
                _ => return Err(Error::UnexpectedChar(b as char)),
            };
            if res.has(color, side) {
                return Err(Error::DuplicateChar(b as char));
            }
            res.set(color, side);
        }
        Ok(res)
    }
}

/// Reason for game finish with draw
#[non_exhaustive]
#[derive(Debug, Display, Copy, Clone, PartialEq, Eq, Hash)]
pub enum DrawReason {
    /// Draw by stalemate
    #[display(fmt = "stalemate")]
    Stalemate,
    /// Draw by insufficient material
    #[display(fmt = "insufficient material")]
    InsufficientMaterial,
    /// Draw by 75 moves
    ///
    /// This one is mandatory, in contrast with draw by 50 moves.
    #[display(fmt = "75 move rule")]
    Moves75,
    /// Draw by five-fold repetition
    ///
    /// This one is mandatory, in contrast with draw by threefold repetition.
    #[display(fmt = "fivefold repetition")]
    Repeat5,
    /// Draw by 50 moves
    ///
    /// According to FIDE rules, one can claim a draw if no player captures a piece or
    /// makes a pawn move during the last 50 moves, but is not obligated to do so.
    #[display(fmt = "50 move rule")]
    Moves50,
    /// Draw by threefold repetition
    ///
    /// In case of threefold repetition, one can claim a draw but is not obligated to do so.
    #[display(fmt = "threefold repetition")]
    Repeat3,
    /// Both kings reached the goal rank (Racing Kings)
    #[display(fmt = "both kings reached the goal")]
    RaceFinished,
}

/// Reason for game finish with win
#[non_exhaustive]
#[derive(Debug, Display, Copy, Clone, PartialEq, Eq, Hash)]
pub enum WinReason {
    /// Game ends with checkmate
    #[display(fmt = "checkmate")]
    Checkmate,
    /// The winner delivered three checks (Three-check)
    #[display(fmt = "three checks")]
    ThreeChecks,
    /// The opponent's king was exploded (Atomic)
    #[display(fmt = "king exploded")]
    KingExploded,
    /// The winner's king reached the goal rank (Racing Kings)
    #[display(fmt = "king reached the goal")]
    KingReachedGoal,
    /// The deciding side ran out of pieces (Antichess, Horde)
    #[display(fmt = "bare position")]
    BarePosition,
    /// The winner has no legal moves (Antichess)
    #[display(fmt = "no legal moves")]
    NoLegalMoves,
}

/// Outcome of a finished game
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Outcome {
    /// Win (either by White or by Black)
    Win {
        /// Winning side
        side: Color,
        /// Reason
        reason: WinReason,
    },
    /// Draw
    Draw(DrawReason),
}

/// Filter to group various types of outcomes
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum OutcomeFilter {
    /// Only outcomes where the game cannot continue at all are considered: checkmate,
    /// stalemate, and the variant-specific endings
    Force,
    /// All outcomes which are mandatorily applied by the rules
    ///
    /// This adds draws by insufficient material, by 75 moves and by five-fold repetition.
    Strict,
    /// All the outcomes in [`Strict`](OutcomeFilter::Strict) plus the outcomes where
    /// a player can claim a draw (50 moves, threefold repetition)
    Relaxed,
}

impl Outcome {
    /// Extracts the winner from the outcome
    ///
    /// If this is a draw outcome, then `None` is returned
    #[inline]
    pub fn winner(&self) -> Option<Color> {
        match self {
            Self::Win { side, .. } => Some(*side),
            Self::Draw(_) => None,
        }
    }

    /// Returns `true` if the game cannot continue past this outcome
    #[inline]
    pub fn is_force(&self) -> bool {
        !matches!(
            *self,
            Self::Draw(
                DrawReason::InsufficientMaterial
                    | DrawReason::Moves75
                    | DrawReason::Repeat5
                    | DrawReason::Moves50
                    | DrawReason::Repeat3
            )
        )
    }

    /// Returns `true` if the outcome passes filter `filter`
    #[inline]
    pub fn passes(&self, filter: OutcomeFilter) -> bool {
        if self.is_force() {
            return true;
        }
        if matches!(filter, OutcomeFilter::Strict | OutcomeFilter::Relaxed)
            && matches!(
                *self,
                Self::Draw(
                    DrawReason::InsufficientMaterial | DrawReason::Moves75 | DrawReason::Repeat5
                )
            )
        {
            return true;
        }
        matches!(filter, OutcomeFilter::Relaxed)
            && matches!(*self, Self::Draw(DrawReason::Moves50 | DrawReason::Repeat3))
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Draw(reason) => reason.fmt(f),
            Self::Win { side, reason } => write!(f, "{} wins: {}", side.as_long_str(), reason),
        }
    }
}

/// Short status of the game (either running or finished)
#[derive(Debug, Display, Copy, Clone, PartialEq, Eq, Hash)]
pub enum GameStatus {
    /// White wins
    #[display(fmt = "1-0")]
    White,
    /// Black wins
    #[display(fmt = "0-1")]
    Black,
    /// Draw
    #[display(fmt = "1/2-1/2")]
    Draw,
    /// Game is still running
    #[display(fmt = "*")]
    Running,
}

impl From<Option<Outcome>> for GameStatus {
    #[inline]
    fn from(src: Option<Outcome>) -> Self {
        match src {
            Some(Outcome::Win {
                side: Color::White, ..
            }) => Self::White,
            Some(Outcome::Win {
                side: Color::Black, ..
            }) => Self::Black,
            Some(Outcome::Draw(_)) => Self::Draw,
            None => Self::Running,
        }
    }
}

impl From<Outcome> for GameStatus {
    #[inline]
    fn from(src: Outcome) -> Self {
        Self::from(Some(src))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file() {
        for (idx, file) in File::iter().enumerate() {
            assert_eq!(file.index(), idx);
            assert_eq!(File::from_index(idx), file);
        }
    }

    #[test]
    fn test_rank() {
        for (idx, rank) in Rank::iter().enumerate() {
            assert_eq!(rank.index(), idx);
            assert_eq!(Rank::from_index(idx), rank);
        }
        assert_eq!(Rank::R1.as_char(), '1');
        assert_eq!(Rank::from_char('8'), Some(Rank::R8));
    }

    #[test]
    fn test_role() {
        for (idx, role) in Role::iter().enumerate() {
            assert_eq!(role.index(), idx);
            assert_eq!(Role::from_index(idx), role);
            assert_eq!(Role::from_char(role.as_char()), Some(role));
        }
    }

    #[test]
    fn test_square() {
        let mut squares = Vec::new();
        for rank in Rank::iter() {
            for file in File::iter() {
                let sq = Square::from_parts(file, rank);
                assert_eq!(sq.file(), file);
                assert_eq!(sq.rank(), rank);
                squares.push(sq);
            }
        }
        assert_eq!(squares, Square::iter().collect::<Vec<_>>());

        assert_eq!(Square::from_parts(File::A, Rank::R1).index(), 0);
        assert_eq!(Square::from_parts(File::H, Rank::R8).index(), 63);
        assert_eq!(Square::from_parts(File::E, Rank::R4).index(), 28);
    }

    #[test]
    fn test_square_combine() {
        let e5 = Square::from_parts(File::E, Rank::R5);
        let d6 = Square::from_parts(File::D, Rank::R6);
        assert_eq!(d6.combine(e5), Square::from_parts(File::D, Rank::R5));
    }

    #[test]
    fn test_piece() {
        assert_eq!(Piece::EMPTY.color(), None);
        assert_eq!(Piece::EMPTY.role(), None);
        let mut pieces = vec![Piece::EMPTY];
        for color in [Color::White, Color::Black] {
            for role in Role::iter() {
                let piece = Piece::from_parts(color, role);
                assert_eq!(piece.color(), Some(color));
                assert_eq!(piece.role(), Some(role));
                pieces.push(piece);
            }
        }
        assert_eq!(pieces, Piece::iter().collect::<Vec<_>>());
    }

    #[test]
    fn test_piece_str() {
        for piece in Piece::iter() {
            let s = piece.to_string();
            assert_eq!(Piece::from_str(&s), Ok(piece));
        }
        assert_eq!(
            Piece::from_char('K'),
            Some(Piece::from_parts(Color::White, Role::King))
        );
        assert_eq!(
            Piece::from_char('n'),
            Some(Piece::from_parts(Color::Black, Role::Knight))
        );
    }

    #[test]
    fn test_castles() {
        let empty = Castles::EMPTY;
        assert!(!empty.has_color(Color::White));
        assert!(!empty.has_color(Color::Black));
        assert_eq!(empty.to_string(), "-");
        assert_eq!(Castles::from_str("-"), Ok(empty));

        let full = Castles::FULL;
        assert!(full.has(Color::White, CastlingSide::Queen));
        assert!(full.has(Color::Black, CastlingSide::King));
        assert_eq!(full.to_string(), "KQkq");
        assert_eq!(Castles::from_str("KQkq"), Ok(full));

        let mut rights = Castles::EMPTY;
        rights.set(Color::White, CastlingSide::King);
        rights.set(Color::Black, CastlingSide::Queen);
        assert_eq!(rights.to_string(), "Kq");
        assert_eq!(Castles::from_str("Kq"), Ok(rights));
        rights.unset_color(Color::White);
        assert_eq!(rights.to_string(), "q");
    }

    #[test]
    fn test_square_str() {
        assert_eq!(
            Square::from_parts(File::B, Rank::R4).to_string(),
            "b4".to_string()
        );
        assert_eq!(
            Square::from_str("a1"),
            Ok(Square::from_parts(File::A, Rank::R1))
        );
        assert!(Square::from_str("h9").is_err());
        assert!(Square::from_str("i4").is_err());
    }

    #[test]
    fn test_color_fold() {
        assert_eq!(Color::White.fold(1, 2), 1);
        assert_eq!(Color::Black.fold(1, 2), 2);
        assert_eq!(Color::White.inv(), Color::Black);
    }
}
