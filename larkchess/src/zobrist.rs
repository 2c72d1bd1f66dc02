use crate::types::{Castles, Piece, Square};

include!(concat!(env!("OUT_DIR"), "/zobrist.rs"));

pub fn pieces(piece: Piece, sq: Square) -> u64 {
    unsafe {
        *PIECES
            .get_unchecked(piece.index())
            .get_unchecked(sq.index())
    }
}

pub fn enpassant(sq: Square) -> u64 {
    unsafe { *ENPASSANT.get_unchecked(sq.index()) }
}

pub fn castling(rights: Castles) -> u64 {
    unsafe { *CASTLING.get_unchecked(rights.index()) }
}
