use std::io::{self, BufWriter, Write};
use std::{env, fs, path::Path};

use larkchess_base::magics::{
    ATTACK_TABLE_SIZE, BISHOP_MAGIC_NUMS, BISHOP_MAGIC_OFFSETS, BISHOP_SHIFT, ROOK_MAGIC_NUMS,
    ROOK_MAGIC_OFFSETS, ROOK_SHIFT,
};
use larkchess_base::types::Piece;
use rand_core::{RngCore, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;

const ROOK_DELTAS: [i32; 4] = [8, -8, 1, -1];
const BISHOP_DELTAS: [i32; 4] = [7, 9, -7, -9];
const KNIGHT_DELTAS: [i32; 8] = [6, 10, 15, 17, -6, -10, -15, -17];
const KING_DELTAS: [i32; 8] = [1, 7, 8, 9, -1, -7, -8, -9];
const WHITE_PAWN_DELTAS: [i32; 2] = [7, 9];
const BLACK_PAWN_DELTAS: [i32; 2] = [-7, -9];

fn square_distance(a: i32, b: i32) -> i32 {
    let file_diff = (a % 8 - b % 8).abs();
    let rank_diff = (a / 8 - b / 8).abs();
    file_diff.max(rank_diff)
}

/// Walks along each delta from `sq`, emitting every destination including the
/// first blocker, and stopping on blockers or upon leaving the board. With
/// `occupied == !0` each walk stops after a single step, which also yields the
/// leaper attack tables.
fn sliding_attacks(sq: i32, occupied: u64, deltas: &[i32]) -> u64 {
    let mut attacks = 0_u64;
    for &delta in deltas {
        let mut prev = sq;
        loop {
            let next = prev + delta;
            if !(0..64).contains(&next) || square_distance(next, prev) > 2 {
                break;
            }
            attacks |= 1_u64 << next;
            if occupied & (1_u64 << next) != 0 {
                break;
            }
            prev = next;
        }
    }
    attacks
}

fn step_attacks(sq: i32, deltas: &[i32]) -> u64 {
    sliding_attacks(sq, !0, deltas)
}

/// Squares where a blocker cannot influence the attack set: the far end of
/// each ray. Removing them keeps the relevant-occupancy masks small.
fn board_edges(sq: i32) -> u64 {
    let rank_of = 0xff_u64 << (sq / 8 * 8);
    let file_of = 0x0101_0101_0101_0101_u64 << (sq % 8);
    ((0xff_u64 | (0xff_u64 << 56)) & !rank_of)
        | ((0x0101_0101_0101_0101_u64 | 0x8080_8080_8080_8080_u64) & !file_of)
}

fn write_bb_array<W: Write>(w: &mut W, name: &str, values: &[u64]) -> io::Result<()> {
    writeln!(w, "pub static {}: [Bitboard; {}] = [", name, values.len())?;
    for chunk in values.chunks(4) {
        write!(w, "   ")?;
        for v in chunk {
            write!(w, " bb(0x{:016x}),", v)?;
        }
        writeln!(w)?;
    }
    writeln!(w, "];\n")?;
    Ok(())
}

fn write_bb_matrix<W: Write>(w: &mut W, name: &str, values: &[[u64; 64]; 64]) -> io::Result<()> {
    writeln!(w, "pub static {}: [[Bitboard; 64]; 64] = [", name)?;
    for row in values.iter() {
        writeln!(w, "    [")?;
        for chunk in row.chunks(4) {
            write!(w, "       ")?;
            for v in chunk {
                write!(w, " bb(0x{:016x}),", v)?;
            }
            writeln!(w)?;
        }
        writeln!(w, "    ],")?;
    }
    writeln!(w, "];\n")?;
    Ok(())
}

fn gen_near_attacks(out_path: &Path) -> io::Result<()> {
    let mut w = BufWriter::new(fs::File::create(out_path)?);

    for (name, deltas) in [
        ("KING_ATTACKS", &KING_DELTAS[..]),
        ("KNIGHT_ATTACKS", &KNIGHT_DELTAS[..]),
        ("WHITE_PAWN_ATTACKS", &WHITE_PAWN_DELTAS[..]),
        ("BLACK_PAWN_ATTACKS", &BLACK_PAWN_DELTAS[..]),
    ] {
        let table: Vec<u64> = (0..64).map(|sq| step_attacks(sq, deltas)).collect();
        write_bb_array(&mut w, name, &table)?;
    }

    Ok(())
}

/// Fills the shared sliding attack table, enumerating every subset of each
/// square's blocker mask with the carry-rippler identity. Two distinct
/// occupancies may share a slot only if their attack sets are equal; anything
/// else is a collision and aborts the build.
fn fill_sliding(
    attacks: &mut [u64],
    written: &mut [bool],
    sq: i32,
    deltas: &[i32],
    magic: u64,
    offset: u32,
    shift: u32,
) -> u64 {
    let mask = sliding_attacks(sq, 0, deltas) & !board_edges(sq);
    let inv_mask = !mask;

    let mut subset = 0_u64;
    loop {
        let att = sliding_attacks(sq, subset, deltas);
        let idx = (((subset | inv_mask).wrapping_mul(magic)) >> (64 - shift)) as usize
            + offset as usize;
        assert!(
            idx < attacks.len(),
            "magic index out of table bounds for square {}",
            sq
        );
        assert!(
            !written[idx] || attacks[idx] == att,
            "magic collision detected for square {}",
            sq
        );
        attacks[idx] = att;
        written[idx] = true;

        subset = subset.wrapping_sub(mask) & mask;
        if subset == 0 {
            break;
        }
    }

    inv_mask
}

fn gen_sliding(out_path: &Path) -> io::Result<()> {
    let mut attacks = vec![0_u64; ATTACK_TABLE_SIZE];
    let mut written = vec![false; ATTACK_TABLE_SIZE];
    let mut rook_masks = [0_u64; 64];
    let mut bishop_masks = [0_u64; 64];

    for sq in 0..64 {
        rook_masks[sq as usize] = fill_sliding(
            &mut attacks,
            &mut written,
            sq,
            &ROOK_DELTAS,
            ROOK_MAGIC_NUMS[sq as usize],
            ROOK_MAGIC_OFFSETS[sq as usize],
            ROOK_SHIFT,
        );
        bishop_masks[sq as usize] = fill_sliding(
            &mut attacks,
            &mut written,
            sq,
            &BISHOP_DELTAS,
            BISHOP_MAGIC_NUMS[sq as usize],
            BISHOP_MAGIC_OFFSETS[sq as usize],
            BISHOP_SHIFT,
        );
    }

    let mut w = BufWriter::new(fs::File::create(out_path)?);
    write_bb_array(&mut w, "ROOK_MASKS", &rook_masks)?;
    write_bb_array(&mut w, "BISHOP_MASKS", &bishop_masks)?;
    write_bb_array(&mut w, "ATTACKS", &attacks)?;
    Ok(())
}

fn gen_geometry_tables(out_path: &Path) -> io::Result<()> {
    let mut between = [[0_u64; 64]; 64];
    let mut rays = [[0_u64; 64]; 64];

    for a in 0..64_i32 {
        for b in 0..64_i32 {
            if a == b {
                continue;
            }
            let deltas: &[i32] = if sliding_attacks(a, 0, &BISHOP_DELTAS) & (1 << b) != 0 {
                &BISHOP_DELTAS
            } else if sliding_attacks(a, 0, &ROOK_DELTAS) & (1 << b) != 0 {
                &ROOK_DELTAS
            } else {
                continue;
            };
            rays[a as usize][b as usize] = (sliding_attacks(a, 0, deltas)
                & sliding_attacks(b, 0, deltas))
                | (1 << a)
                | (1 << b);
            between[a as usize][b as usize] =
                sliding_attacks(a, 1 << b, deltas) & sliding_attacks(b, 1 << a, deltas);
        }
    }

    let mut w = BufWriter::new(fs::File::create(out_path)?);
    write_bb_matrix(&mut w, "BETWEEN", &between)?;
    write_bb_matrix(&mut w, "RAYS", &rays)?;
    Ok(())
}

struct Zobrist {
    pieces: [[u64; 64]; Piece::COUNT],
    move_side: u64,
    castling: [u64; 16],
    enpassant: [u64; 64],
}

impl Zobrist {
    fn generate<R: RngCore>(gen: &mut R) -> Zobrist {
        let pieces = {
            let mut res = [[0_u64; 64]; Piece::COUNT];
            for sub in res.iter_mut().skip(1) {
                for x in sub {
                    *x = gen.next_u64();
                }
            }
            res
        };
        Zobrist {
            pieces,
            move_side: gen.next_u64(),
            castling: [(); 16].map(|_| gen.next_u64()),
            enpassant: [(); 64].map(|_| gen.next_u64()),
        }
    }

    fn generate_default() -> Zobrist {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(0x1A2B_C0DE_5EED_F00D_u64);
        Self::generate(&mut rng)
    }

    fn output<W: Write>(&self, w: &mut W) -> io::Result<()> {
        writeln!(w, "pub const PIECES: [[u64; 64]; {}] = [", Piece::COUNT)?;
        for (i, sub) in self.pieces.iter().enumerate() {
            writeln!(w, "    /*{:2}*/ [", i)?;
            for (i, hsh) in sub.iter().enumerate() {
                writeln!(w, "        /*{:2}*/ {:#x},", i, hsh)?;
            }
            writeln!(w, "    ],")?;
        }
        writeln!(w, "];\n")?;

        writeln!(w, "pub const MOVE_SIDE: u64 = {:#x};\n", self.move_side)?;

        writeln!(w, "pub const CASTLING: [u64; 16] = [")?;
        for (i, sub) in self.castling.iter().enumerate() {
            writeln!(w, "    /*{:2}*/ {:#x},", i, sub)?;
        }
        writeln!(w, "];\n")?;

        writeln!(w, "pub const ENPASSANT: [u64; 64] = [")?;
        for (i, sub) in self.enpassant.iter().enumerate() {
            writeln!(w, "    /*{:2}*/ {:#x},", i, sub)?;
        }
        writeln!(w, "];")?;

        Ok(())
    }
}

fn gen_zobrist(out_path: &Path) -> io::Result<()> {
    Zobrist::generate_default().output(&mut BufWriter::new(fs::File::create(out_path)?))?;
    Ok(())
}

fn main() -> io::Result<()> {
    println!("cargo:rerun-if-changed=build.rs");

    let out_dir = env::var("OUT_DIR").unwrap();
    let out_dir = Path::new(&out_dir);

    gen_near_attacks(&out_dir.join("near_attacks.rs"))?;
    gen_sliding(&out_dir.join("sliding.rs"))?;
    gen_geometry_tables(&out_dir.join("geometry_tables.rs"))?;
    gen_zobrist(&out_dir.join("zobrist.rs"))?;

    Ok(())
}
