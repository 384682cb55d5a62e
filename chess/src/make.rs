//! Move execution
//!
//! The move is assumed to be already validated, so no checks except castling recognition
//! are performed here. [`apply()`] commits a move and asks the [`Promoter`] for the promotion
//! piece, while [`simulate()`] does the same without consulting anyone and is used to look
//! ahead.

use crate::board::Board;
use crate::castling;
use crate::geometry;
use crate::types::{CastlingRights, CastlingSide, Cell, Color, Coord, Piece};

use std::str::FromStr;
use thiserror::Error;
use tracing::trace;

/// Piece a pawn can be promoted to
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum PromotePiece {
    Knight,
    Bishop,
    Rook,
    Queen,
}

/// Error parsing [`PromotePiece`]
#[derive(Debug, Clone, Error, Eq, PartialEq)]
pub enum PromotePieceParseError {
    #[error("unexpected promote char {0:?}")]
    UnexpectedChar(char),
    #[error("bad string length")]
    BadLength,
}

impl PromotePiece {
    /// Parses a promote piece from its letter, in either case
    pub fn from_char(c: char) -> Option<PromotePiece> {
        match c.to_ascii_lowercase() {
            'n' => Some(PromotePiece::Knight),
            'b' => Some(PromotePiece::Bishop),
            'r' => Some(PromotePiece::Rook),
            'q' => Some(PromotePiece::Queen),
            _ => None,
        }
    }

    /// Returns the uppercase letter of the piece
    pub fn as_char(&self) -> char {
        match *self {
            PromotePiece::Knight => 'N',
            PromotePiece::Bishop => 'B',
            PromotePiece::Rook => 'R',
            PromotePiece::Queen => 'Q',
        }
    }
}

impl From<PromotePiece> for Piece {
    #[inline]
    fn from(p: PromotePiece) -> Self {
        match p {
            PromotePiece::Knight => Piece::Knight,
            PromotePiece::Bishop => Piece::Bishop,
            PromotePiece::Rook => Piece::Rook,
            PromotePiece::Queen => Piece::Queen,
        }
    }
}

impl TryFrom<Piece> for PromotePiece {
    type Error = ();

    #[inline]
    fn try_from(p: Piece) -> Result<Self, Self::Error> {
        match p {
            Piece::Knight => Ok(PromotePiece::Knight),
            Piece::Bishop => Ok(PromotePiece::Bishop),
            Piece::Rook => Ok(PromotePiece::Rook),
            Piece::Queen => Ok(PromotePiece::Queen),
            _ => Err(()),
        }
    }
}

impl FromStr for PromotePiece {
    type Err = PromotePieceParseError;

    fn from_str(s: &str) -> Result<PromotePiece, Self::Err> {
        let mut chars = s.trim().chars();
        let (Some(c), None) = (chars.next(), chars.next()) else {
            return Err(PromotePieceParseError::BadLength);
        };
        PromotePiece::from_char(c).ok_or(PromotePieceParseError::UnexpectedChar(c))
    }
}

/// Source of the promotion choice
///
/// Called exactly once for every committed promotion, with the color of the promoting pawn.
/// Any `FnMut(Color) -> PromotePiece` closure is a promoter.
pub trait Promoter {
    fn choose(&mut self, color: Color) -> PromotePiece;
}

impl<F: FnMut(Color) -> PromotePiece> Promoter for F {
    #[inline]
    fn choose(&mut self, color: Color) -> PromotePiece {
        self(color)
    }
}

/// Promoter which always chooses the same piece
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Always(pub PromotePiece);

impl Promoter for Always {
    #[inline]
    fn choose(&mut self, _color: Color) -> PromotePiece {
        self.0
    }
}

/// Moves the piece from `src` to `dst`, removing the pawn captured en passant if any
///
/// Only an enemy pawn is removed from beside the source square. Returns the moved piece.
pub(crate) fn relocate(b: &mut Board, src: Coord, dst: Coord, ep_target: Option<Coord>) -> Cell {
    let cell = b.take(src);
    if let (Some(Piece::Pawn), Some(color)) = (cell.piece(), cell.color()) {
        let victim = Coord::from_parts(dst.file(), src.rank());
        if ep_target == Some(dst)
            && src.file() != dst.file()
            && b.get(dst).is_free()
            && b.get(victim) == Cell::from_parts(color.inv(), Piece::Pawn)
        {
            b.take(victim);
        }
    }
    b.put(dst, cell);
    cell
}

fn update_castling(
    rights: CastlingRights,
    color: Color,
    piece: Option<Piece>,
    src: Coord,
    dst: Coord,
) -> CastlingRights {
    let mut rights = rights;
    if piece == Some(Piece::King) {
        rights.unset_color(color);
    }
    for side in CastlingSide::iter() {
        if piece == Some(Piece::Rook) && src == geometry::castling_rook_src(color, side) {
            rights.unset(color, side);
        }
        if dst == geometry::castling_rook_src(color.inv(), side) {
            rights.unset(color.inv(), side);
        }
    }
    rights
}

/// Makes the move from `src` to `dst` for `color` on the board
///
/// `ep_target` and `rights` are the en passant target and the castling rights before the
/// move. Returns the en passant target and the castling rights after the move. If the moving
/// pawn reaches the last rank, `promoter` is asked for the piece to promote to.
///
/// A king move from its home square to the castling destination is executed as castling if
/// [`castling::can_castle()`] allows it.
pub fn apply<P: Promoter + ?Sized>(
    b: &mut Board,
    src: Coord,
    dst: Coord,
    color: Color,
    ep_target: Option<Coord>,
    rights: CastlingRights,
    promoter: &mut P,
) -> (Option<Coord>, CastlingRights) {
    if b.get(src) == Cell::from_parts(color, Piece::King) {
        if let Some(side) = castling::castling_side_for(color, src, dst) {
            if castling::can_castle(b, color, side, rights) {
                trace!(side = %color, castling = ?side, "castling");
                castling::do_castle(b, color, side);
                return (None, rights.without_color(color));
            }
        }
    }

    let cell = relocate(b, src, dst, ep_target);
    let piece = cell.piece();

    let mut new_ep_target = None;
    if piece == Some(Piece::Pawn) {
        let forward = geometry::pawn_forward_delta(color);
        if src.rank() == geometry::double_move_src_rank(color)
            && src.shift(0, 2 * forward) == Some(dst)
        {
            new_ep_target = src.shift(0, forward);
        }
        if dst.rank() == geometry::promote_dst_rank(color) {
            let promote = promoter.choose(color);
            trace!(side = %color, square = %dst, piece = ?promote, "promotion");
            b.put(dst, Cell::from_parts(color, promote.into()));
        }
    }

    (
        new_ep_target,
        update_castling(rights, color, piece, src, dst),
    )
}

/// Same as [`apply()`], but promotes to a queen without calling any [`Promoter`]
///
/// Used to look ahead, as the chosen piece doesn't affect the safety of the king.
#[inline]
pub fn simulate(
    b: &mut Board,
    src: Coord,
    dst: Coord,
    color: Color,
    ep_target: Option<Coord>,
    rights: CastlingRights,
) -> (Option<Coord>, CastlingRights) {
    apply(
        b,
        src,
        dst,
        color,
        ep_target,
        rights,
        &mut Always(PromotePiece::Queen),
    )
}
