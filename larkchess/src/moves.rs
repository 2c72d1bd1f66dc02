//! Move representation and the UCI bridge

use crate::geometry;
use crate::types::{CastlingSide, Color, File, Role, Square, SquareParseError};

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// A move, as produced by the legal move generator
///
/// Castling is encoded in the king-takes-own-rook form, which represents both
/// classical and Chess960 castling without ambiguity. Drops exist only in
/// Crazyhouse.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Move {
    /// An ordinary move of a piece, including promotions
    Normal {
        /// Moved piece
        role: Role,
        /// Source square
        from: Square,
        /// Role of the captured piece, if any
        capture: Option<Role>,
        /// Destination square
        to: Square,
        /// Promotion role, if this is a promotion
        promotion: Option<Role>,
    },
    /// An en passant capture; the captured pawn does not stand on `to`
    EnPassant {
        /// Source square
        from: Square,
        /// Destination square
        to: Square,
    },
    /// Castling, encoded by the current squares of the king and the involved rook
    Castle {
        /// King's current square
        king: Square,
        /// The involved rook's current square
        rook: Square,
    },
    /// A piece dropped from the pocket (Crazyhouse)
    Drop {
        /// Dropped piece
        role: Role,
        /// Destination square
        to: Square,
    },
}

impl Move {
    /// Returns the role of the moved (or dropped) piece
    #[inline]
    pub fn role(&self) -> Role {
        match *self {
            Move::Normal { role, .. } => role,
            Move::EnPassant { .. } => Role::Pawn,
            Move::Castle { .. } => Role::King,
            Move::Drop { role, .. } => role,
        }
    }

    /// Returns the source square, or `None` for drops
    #[inline]
    pub fn from(&self) -> Option<Square> {
        match *self {
            Move::Normal { from, .. } | Move::EnPassant { from, .. } => Some(from),
            Move::Castle { king, .. } => Some(king),
            Move::Drop { .. } => None,
        }
    }

    /// Returns the destination square
    ///
    /// For castling this is the square the king ends up on.
    #[inline]
    pub fn to(&self) -> Square {
        match *self {
            Move::Normal { to, .. } | Move::EnPassant { to, .. } | Move::Drop { to, .. } => to,
            Move::Castle { king, rook } => {
                king_castling_target(king, castling_side_of(king, rook))
            }
        }
    }

    /// Returns the role of the captured piece, if any
    #[inline]
    pub fn capture(&self) -> Option<Role> {
        match *self {
            Move::Normal { capture, .. } => capture,
            Move::EnPassant { .. } => Some(Role::Pawn),
            _ => None,
        }
    }

    /// Returns `true` if the move captures a piece
    #[inline]
    pub fn is_capture(&self) -> bool {
        self.capture().is_some()
    }

    /// Returns `true` if this is an en passant capture
    #[inline]
    pub fn is_en_passant(&self) -> bool {
        matches!(self, Move::EnPassant { .. })
    }

    /// Returns the promotion role, if this is a promotion
    #[inline]
    pub fn promotion(&self) -> Option<Role> {
        match *self {
            Move::Normal { promotion, .. } => promotion,
            _ => None,
        }
    }

    /// Returns `true` if the move resets the half-move clock, i.e. it is a pawn
    /// move (drops included) or a capture
    #[inline]
    pub fn is_zeroing(&self) -> bool {
        self.is_capture()
            || matches!(
                self,
                Move::Normal {
                    role: Role::Pawn,
                    ..
                } | Move::EnPassant { .. }
                    | Move::Drop {
                        role: Role::Pawn,
                        ..
                    }
            )
    }

    /// Returns the castling side, if this is a castling move
    #[inline]
    pub fn castling_side(&self) -> Option<CastlingSide> {
        match *self {
            Move::Castle { king, rook } => Some(castling_side_of(king, rook)),
            _ => None,
        }
    }

    /// Returns `true` if the move is a two-square pawn push
    #[inline]
    pub fn is_double_push(&self) -> bool {
        match *self {
            Move::Normal {
                role: Role::Pawn,
                from,
                to,
                ..
            } => from.index().abs_diff(to.index()) == 16,
            _ => false,
        }
    }

    /// Converts the move into its UCI representation
    ///
    /// In [`CastlingMode::Standard`] castling is encoded by the king moving two
    /// squares; in [`CastlingMode::Chess960`] by the king capturing its own rook.
    pub fn to_uci(&self, mode: CastlingMode) -> Uci {
        match *self {
            Move::Normal {
                from, to, promotion, ..
            } => Uci::Normal {
                from,
                to,
                promotion,
            },
            Move::EnPassant { from, to } => Uci::Normal {
                from,
                to,
                promotion: None,
            },
            Move::Castle { king, rook } => Uci::Normal {
                from: king,
                to: match mode {
                    CastlingMode::Standard => {
                        king_castling_target(king, castling_side_of(king, rook))
                    }
                    CastlingMode::Chess960 => rook,
                },
                promotion: None,
            },
            Move::Drop { role, to } => Uci::Drop { role, to },
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        match *self {
            Move::Castle { king, rook } => match castling_side_of(king, rook) {
                CastlingSide::King => write!(f, "O-O"),
                CastlingSide::Queen => write!(f, "O-O-O"),
            },
            _ => self.to_uci(CastlingMode::Standard).fmt(f),
        }
    }
}

/// Determines which side a king-and-rook pair castles to
#[inline]
pub(crate) fn castling_side_of(king: Square, rook: Square) -> CastlingSide {
    if rook > king {
        CastlingSide::King
    } else {
        CastlingSide::Queen
    }
}

/// Destination of the king when castling to the given side
///
/// Target files are fixed regardless of the initial king and rook files: g-file
/// for kingside, c-file for queenside.
#[inline]
pub(crate) fn king_castling_target(king: Square, side: CastlingSide) -> Square {
    let file = match side {
        CastlingSide::King => File::G,
        CastlingSide::Queen => File::C,
    };
    Square::from_parts(file, king.rank())
}

/// Destination of the rook when castling to the given side
#[inline]
pub(crate) fn rook_castling_target(king: Square, side: CastlingSide) -> Square {
    let file = match side {
        CastlingSide::King => File::F,
        CastlingSide::Queen => File::D,
    };
    Square::from_parts(file, king.rank())
}

/// Square of the pawn captured en passant
#[inline]
pub(crate) fn ep_capture_square(turn: Color, to: Square) -> Square {
    unsafe { to.add_unchecked(-geometry::pawn_forward_delta(turn)) }
}

/// How castling moves are written in UCI
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum CastlingMode {
    /// Classical encoding: the king moves two squares (e1g1)
    Standard,
    /// Chess960 encoding: the king takes its own rook (e1h1)
    Chess960,
}

/// Error creating a parsed UCI representation from string
#[derive(Debug, Clone, Error, Eq, PartialEq)]
pub enum UciParseError {
    /// Bad string length
    #[error("bad string length")]
    BadLength,
    /// Bad source square
    #[error("bad source: {0}")]
    BadSrc(SquareParseError),
    /// Bad destination square
    #[error("bad destination: {0}")]
    BadDst(SquareParseError),
    /// Bad promotion character
    #[error("bad promotion char {0:?}")]
    BadPromotion(char),
    /// Bad dropped piece character
    #[error("bad drop char {0:?}")]
    BadDrop(char),
}

/// A move in UCI notation, not yet resolved against a position
///
/// Resolution into a [`Move`] happens through
/// [`Situation::uci_to_move`](crate::position::Situation::uci_to_move), which
/// checks the move against the legal move list.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Uci {
    /// Ordinary move
    Normal {
        /// Source square
        from: Square,
        /// Destination square
        to: Square,
        /// Promotion role, if any
        promotion: Option<Role>,
    },
    /// Drop (Crazyhouse), e.g. `N@f3`
    Drop {
        /// Dropped piece
        role: Role,
        /// Destination square
        to: Square,
    },
}

impl fmt::Display for Uci {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        match *self {
            Uci::Normal {
                from,
                to,
                promotion,
            } => {
                write!(f, "{}{}", from, to)?;
                if let Some(p) = promotion {
                    write!(f, "{}", p.as_char())?;
                }
                Ok(())
            }
            Uci::Drop { role, to } => {
                write!(f, "{}@{}", role.as_char().to_ascii_uppercase(), to)
            }
        }
    }
}

impl FromStr for Uci {
    type Err = UciParseError;

    fn from_str(s: &str) -> Result<Uci, Self::Err> {
        if let Some((role_str, to_str)) = s.split_once('@') {
            if role_str.len() != 1 {
                return Err(UciParseError::BadLength);
            }
            let role_ch = role_str.as_bytes()[0] as char;
            let role = Role::from_char(role_ch.to_ascii_lowercase())
                .ok_or(UciParseError::BadDrop(role_ch))?;
            let to = Square::from_str(to_str).map_err(UciParseError::BadDst)?;
            return Ok(Uci::Drop { role, to });
        }
        if !matches!(s.len(), 4 | 5) {
            return Err(UciParseError::BadLength);
        }
        let from = Square::from_str(&s[0..2]).map_err(UciParseError::BadSrc)?;
        let to = Square::from_str(&s[2..4]).map_err(UciParseError::BadDst)?;
        let promotion = if s.len() == 5 {
            let c = s.as_bytes()[4] as char;
            Some(match c {
                'n' => Role::Knight,
                'b' => Role::Bishop,
                'r' => Role::Rook,
                'q' => Role::Queen,
                'k' => Role::King,
                _ => return Err(UciParseError::BadPromotion(c)),
            })
        } else {
            None
        };
        Ok(Uci::Normal {
            from,
            to,
            promotion,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(s: &str) -> Square {
        s.parse().unwrap()
    }

    #[test]
    fn test_uci_parse() {
        assert_eq!(
            Uci::from_str("e2e4"),
            Ok(Uci::Normal {
                from: sq("e2"),
                to: sq("e4"),
                promotion: None
            })
        );
        assert_eq!(
            Uci::from_str("e7e8q"),
            Ok(Uci::Normal {
                from: sq("e7"),
                to: sq("e8"),
                promotion: Some(Role::Queen)
            })
        );
        assert_eq!(
            Uci::from_str("N@f3"),
            Ok(Uci::Drop {
                role: Role::Knight,
                to: sq("f3")
            })
        );
        assert!(Uci::from_str("e2e9").is_err());
        assert!(Uci::from_str("e2e4x").is_err());
        assert!(Uci::from_str("e2").is_err());
    }

    #[test]
    fn test_uci_display() {
        for s in ["e2e4", "e7e8q", "a7a8n", "N@f3", "P@c6"] {
            assert_eq!(Uci::from_str(s).unwrap().to_string(), s);
        }
    }

    #[test]
    fn test_castle_encodings() {
        let m = Move::Castle {
            king: sq("e1"),
            rook: sq("h1"),
        };
        assert_eq!(m.castling_side(), Some(CastlingSide::King));
        assert_eq!(m.to(), sq("g1"));
        assert_eq!(m.to_uci(CastlingMode::Standard).to_string(), "e1g1");
        assert_eq!(m.to_uci(CastlingMode::Chess960).to_string(), "e1h1");
        assert_eq!(m.to_string(), "O-O");

        let m = Move::Castle {
            king: sq("e8"),
            rook: sq("a8"),
        };
        assert_eq!(m.castling_side(), Some(CastlingSide::Queen));
        assert_eq!(m.to(), sq("c8"));
        assert_eq!(m.to_uci(CastlingMode::Standard).to_string(), "e8c8");
        assert_eq!(m.to_string(), "O-O-O");
    }

    #[test]
    fn test_move_predicates() {
        let push = Move::Normal {
            role: Role::Pawn,
            from: sq("e2"),
            capture: None,
            to: sq("e4"),
            promotion: None,
        };
        assert!(push.is_double_push());
        assert!(push.is_zeroing());
        assert!(!push.is_capture());

        let knight = Move::Normal {
            role: Role::Knight,
            from: sq("g1"),
            capture: None,
            to: sq("f3"),
            promotion: None,
        };
        assert!(!knight.is_zeroing());

        let ep = Move::EnPassant {
            from: sq("d5"),
            to: sq("e6"),
        };
        assert!(ep.is_capture());
        assert_eq!(ep.capture(), Some(Role::Pawn));
        assert_eq!(ep_capture_square(Color::White, sq("e6")), sq("e5"));
    }
}
