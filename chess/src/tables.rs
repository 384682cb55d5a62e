//! Precomputed move tables
//!
//! The tables are generated once by the build script (see [`chessgate_base::tables`]) and
//! stored as immutable statics, so they can be shared freely.

use crate::bitboard::Bitboard;
use crate::types::Coord;

pub use chessgate_base::tables::Ray;

#[inline]
const fn bb(val: u64) -> Bitboard {
    Bitboard::from_raw(val)
}

#[inline]
const fn c(idx: usize) -> Coord {
    Coord::from_index(idx)
}

include!(concat!(env!("OUT_DIR"), "/leapers.rs"));
include!(concat!(env!("OUT_DIR"), "/rays.rs"));

/// Squares reachable by a knight from `coord` on an empty board
#[inline]
pub fn knight(coord: Coord) -> Bitboard {
    KNIGHT_MOVES[coord.index()]
}

/// Squares reachable by a king from `coord` on an empty board, without castling
#[inline]
pub fn king(coord: Coord) -> Bitboard {
    KING_MOVES[coord.index()]
}

#[inline]
pub fn rook_rays(coord: Coord) -> &'static [Ray; 4] {
    &ROOK_RAYS[coord.index()]
}

#[inline]
pub fn bishop_rays(coord: Coord) -> &'static [Ray; 4] {
    &BISHOP_RAYS[coord.index()]
}
