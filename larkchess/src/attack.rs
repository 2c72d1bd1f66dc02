//! Precomputed attack and geometry tables
//!
//! The tables themselves are generated by the build script: leaper attacks from
//! clamped delta walks, sliding attacks through the fixed-shift magic scheme
//! (see `larkchess_base::magics`), and the 64×64 between/ray matrices.

use crate::bitboard::Bitboard;
use crate::magics;
use crate::types::{Color, Square};

#[inline]
const fn bb(val: u64) -> Bitboard {
    Bitboard::from_raw(val)
}

include!(concat!(env!("OUT_DIR"), "/near_attacks.rs"));
include!(concat!(env!("OUT_DIR"), "/sliding.rs"));
include!(concat!(env!("OUT_DIR"), "/geometry_tables.rs"));

/// King attacks from `sq`
#[inline]
pub fn king(sq: Square) -> Bitboard {
    unsafe { *KING_ATTACKS.get_unchecked(sq.index()) }
}

/// Knight attacks from `sq`
#[inline]
pub fn knight(sq: Square) -> Bitboard {
    unsafe { *KNIGHT_ATTACKS.get_unchecked(sq.index()) }
}

/// Squares attacked by a pawn of color `color` standing on `sq`
#[inline]
pub fn pawn(color: Color, sq: Square) -> Bitboard {
    match color {
        Color::White => unsafe { *WHITE_PAWN_ATTACKS.get_unchecked(sq.index()) },
        Color::Black => unsafe { *BLACK_PAWN_ATTACKS.get_unchecked(sq.index()) },
    }
}

/// Rook attacks from `sq` with the given occupancy
#[inline]
pub fn rook(sq: Square, occupied: Bitboard) -> Bitboard {
    unsafe {
        let mask = *ROOK_MASKS.get_unchecked(sq.index());
        let magic = *magics::ROOK_MAGIC_NUMS.get_unchecked(sq.index());
        let offset = *magics::ROOK_MAGIC_OFFSETS.get_unchecked(sq.index());
        let idx = (occupied | mask)
            .as_raw()
            .wrapping_mul(magic)
            >> (64 - magics::ROOK_SHIFT);
        *ATTACKS.get_unchecked(idx as usize + offset as usize)
    }
}

/// Bishop attacks from `sq` with the given occupancy
#[inline]
pub fn bishop(sq: Square, occupied: Bitboard) -> Bitboard {
    unsafe {
        let mask = *BISHOP_MASKS.get_unchecked(sq.index());
        let magic = *magics::BISHOP_MAGIC_NUMS.get_unchecked(sq.index());
        let offset = *magics::BISHOP_MAGIC_OFFSETS.get_unchecked(sq.index());
        let idx = (occupied | mask)
            .as_raw()
            .wrapping_mul(magic)
            >> (64 - magics::BISHOP_SHIFT);
        *ATTACKS.get_unchecked(idx as usize + offset as usize)
    }
}

/// Queen attacks from `sq` with the given occupancy
#[inline]
pub fn queen(sq: Square, occupied: Bitboard) -> Bitboard {
    rook(sq, occupied) ^ bishop(sq, occupied)
}

/// The open segment strictly between `a` and `b`, or an empty bitboard when the
/// squares don't share a rook or bishop ray
#[inline]
pub fn between(a: Square, b: Square) -> Bitboard {
    unsafe {
        *BETWEEN
            .get_unchecked(a.index())
            .get_unchecked(b.index())
    }
}

/// The full line through `a` and `b` clipped to the board, endpoints included,
/// or an empty bitboard when the squares don't share a rook or bishop ray
#[inline]
pub fn ray(a: Square, b: Square) -> Bitboard {
    unsafe { *RAYS.get_unchecked(a.index()).get_unchecked(b.index()) }
}

/// Returns `true` if `c` lies on the line through `a` and `b`
#[inline]
pub fn aligned(a: Square, b: Square, c: Square) -> bool {
    ray(a, b).has(c)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{File, Rank};

    fn sq(s: &str) -> Square {
        s.parse().unwrap()
    }

    #[test]
    fn test_leapers() {
        // Knight in the middle has 8 attacks, in the corner only 2.
        assert_eq!(knight(sq("d4")).len(), 8);
        assert_eq!(knight(sq("a1")).len(), 2);
        assert_eq!(
            knight(sq("a1")),
            Bitboard::EMPTY.with(sq("b3")).with(sq("c2"))
        );

        assert_eq!(king(sq("e4")).len(), 8);
        assert_eq!(king(sq("a1")).len(), 3);
        assert_eq!(king(sq("h8")).len(), 3);

        assert_eq!(
            pawn(Color::White, sq("e4")),
            Bitboard::EMPTY.with(sq("d5")).with(sq("f5"))
        );
        assert_eq!(
            pawn(Color::Black, sq("e4")),
            Bitboard::EMPTY.with(sq("d3")).with(sq("f3"))
        );
        assert_eq!(pawn(Color::White, sq("a2")), Bitboard::from_square(sq("b3")));
        assert_eq!(pawn(Color::Black, sq("h7")), Bitboard::from_square(sq("g6")));
    }

    #[test]
    fn test_sliders() {
        // Empty board: rook sees its full rank and file.
        assert_eq!(rook(sq("a1"), Bitboard::EMPTY).len(), 14);
        assert_eq!(bishop(sq("a1"), Bitboard::EMPTY).len(), 7);
        assert_eq!(bishop(sq("d4"), Bitboard::EMPTY).len(), 13);

        // Blockers stop the ray but are included in the attack set.
        let occ = Bitboard::EMPTY.with(sq("a4")).with(sq("c1"));
        let att = rook(sq("a1"), occ);
        assert!(att.has(sq("a4")));
        assert!(!att.has(sq("a5")));
        assert!(att.has(sq("c1")));
        assert!(!att.has(sq("d1")));
        assert_eq!(att.len(), 5);
    }

    #[test]
    fn test_queen_is_rook_xor_bishop() {
        // Sampled occupancies; rook and bishop sets are disjoint, so the xor is
        // also their union.
        let mut occ = Bitboard::EMPTY;
        for (i, s) in Square::iter().enumerate() {
            if i % 7 == 0 {
                occ.set(s);
            }
        }
        for s in Square::iter() {
            assert_eq!(queen(s, occ), rook(s, occ) | bishop(s, occ));
            assert!(rook(s, occ).is_disjoint(bishop(s, occ)));
        }
    }

    #[test]
    fn test_between_and_rays() {
        let b4 = Square::from_parts(File::B, Rank::R4);
        let e7 = Square::from_parts(File::E, Rank::R7);
        let res = Bitboard::EMPTY.with(sq("c5")).with(sq("d6"));
        assert_eq!(between(b4, e7), res);
        assert_eq!(between(e7, b4), res);

        let d3 = sq("d3");
        let d6 = sq("d6");
        assert_eq!(between(d3, d6), Bitboard::EMPTY.with(sq("d4")).with(sq("d5")));

        // Not on a common ray.
        assert_eq!(between(sq("a1"), sq("b3")), Bitboard::EMPTY);
        assert_eq!(ray(sq("a1"), sq("b3")), Bitboard::EMPTY);

        // Ray includes the endpoints and extends across the whole board.
        let r = ray(sq("c3"), sq("e5"));
        assert!(r.has(sq("c3")));
        assert!(r.has(sq("e5")));
        assert!(r.has(sq("a1")));
        assert!(r.has(sq("h8")));
        assert_eq!(r.len(), 8);
    }

    #[test]
    fn test_ray_laws() {
        for a in Square::iter() {
            for b in Square::iter() {
                if a == b {
                    continue;
                }
                let r = ray(a, b);
                let btw = between(a, b);
                if r.is_empty() {
                    assert!(btw.is_empty());
                    continue;
                }
                assert!(r.has(a));
                assert!(r.has(b));
                assert_eq!(btw & r, btw);
                assert!(!btw.has(a));
                assert!(!btw.has(b));
                for c in r {
                    assert!(aligned(a, b, c));
                    if c != a {
                        assert_eq!(ray(a, c), r);
                    }
                }
            }
        }
    }
}
