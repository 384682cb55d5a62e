//! Castling
//!
//! Castling is never produced by the piece geometry in [`legal`](crate::legal). It is
//! recognized separately by [`castling_side_for()`], checked by [`can_castle()`] and executed by
//! [`do_castle()`].

use crate::attack;
use crate::board::Board;
use crate::geometry;
use crate::types::{CastlingRights, CastlingSide, Cell, Color, Coord, Piece};

use arrayvec::ArrayVec;
use tracing::trace;

/// Squares strictly between the king and the rook, which must be empty to castle
pub fn between(c: Color, s: CastlingSide) -> ArrayVec<Coord, 3> {
    let rook = geometry::castling_rook_src(c, s);
    let delta = geometry::castling_delta(s);
    let mut res = ArrayVec::new();
    let mut p = geometry::king_home(c).shift(delta, 0);
    while let Some(cur) = p {
        if cur == rook {
            break;
        }
        res.push(cur);
        p = cur.shift(delta, 0);
    }
    res
}

/// Squares the king occupies while castling, from its home square to the destination
///
/// None of these squares may be attacked.
pub fn king_path(c: Color, s: CastlingSide) -> ArrayVec<Coord, 3> {
    let dst = geometry::castling_king_dst(c, s);
    let delta = geometry::castling_delta(s);
    let mut res = ArrayVec::new();
    let mut p = Some(geometry::king_home(c));
    while let Some(cur) = p {
        res.push(cur);
        if cur == dst {
            break;
        }
        p = cur.shift(delta, 0);
    }
    res
}

/// Returns the castling side if the king move from `src` to `dst` looks like castling
///
/// Only the squares are checked here, use [`can_castle()`] to verify the move.
pub fn castling_side_for(c: Color, src: Coord, dst: Coord) -> Option<CastlingSide> {
    if src != geometry::king_home(c) {
        return None;
    }
    CastlingSide::iter().find(|&s| geometry::castling_king_dst(c, s) == dst)
}

/// Returns `true` if color `c` can castle to side `s`
pub fn can_castle(b: &Board, c: Color, s: CastlingSide, rights: CastlingRights) -> bool {
    if !rights.has(c, s) {
        trace!(side = %c, castling = ?s, "no castling right");
        return false;
    }

    let king = Cell::from_parts(c, Piece::King);
    let rook = Cell::from_parts(c, Piece::Rook);
    if b.get(geometry::king_home(c)) != king || b.get(geometry::castling_rook_src(c, s)) != rook {
        trace!(side = %c, castling = ?s, "king or rook is not at home");
        return false;
    }
    if between(c, s).iter().any(|&p| b.get(p).is_occupied()) {
        trace!(side = %c, castling = ?s, "path is blocked");
        return false;
    }

    let mut base = *b;
    base.take(geometry::king_home(c));
    for p in king_path(c, s) {
        let mut scratch = base;
        scratch.put(p, king);
        if attack::is_check(&scratch, c) {
            trace!(side = %c, castling = ?s, square = %p, "king passes an attacked square");
            return false;
        }
    }

    true
}

/// Moves the king and the rook of color `c` to their post-castling squares
///
/// No checks are performed, so the caller must ensure that [`can_castle()`] holds.
pub fn do_castle(b: &mut Board, c: Color, s: CastlingSide) {
    let king = b.take(geometry::king_home(c));
    let rook = b.take(geometry::castling_rook_src(c, s));
    b.put(geometry::castling_king_dst(c, s), king);
    b.put(geometry::castling_rook_dst(c, s), rook);
}
