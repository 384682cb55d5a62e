//! Move validation
//!
//! A single routine validates moves in two modes. In [`Legality::SemiLegal`] mode only the
//! geometry of the move is checked, and in [`Legality::Legal`] mode the move is additionally
//! simulated to verify that the mover's king doesn't remain under attack. Check detection
//! in [`attack`](crate::attack) calls back into this module, but always in semi-legal mode,
//! so the recursion stops after one level.

use crate::board::Board;
use crate::tables::{self, Ray};
use crate::types::{Color, Coord, Piece};
use crate::{attack, geometry, make};

use thiserror::Error;

/// Validation mode
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Legality {
    /// Check only the move geometry, ignoring whether the king is left under attack
    SemiLegal,
    /// Check the move geometry and that the mover's king is not attacked after the move
    Legal,
}

/// Error indicating that move is invalid
#[derive(Debug, Copy, Clone, Error, Eq, PartialEq)]
pub enum ValidateError {
    /// Source square is empty
    #[error("no piece on {0}")]
    NoPiece(Coord),
    /// Source square holds a piece of the opponent
    #[error("piece on {0} belongs to the opponent")]
    WrongSide(Coord),
    /// Destination square holds a piece of the same color
    #[error("cannot capture own piece on {0}")]
    OwnPiece(Coord),
    /// Piece cannot move this way
    #[error("move is not semi-legal")]
    NotSemiLegal,
    /// Move leaves the king under attack
    #[error("move leaves the king in check")]
    NotLegal,
    /// Castling conditions are not satisfied
    #[error("castling is not allowed")]
    CannotCastle,
}

fn is_pawn_semilegal(
    b: &Board,
    side: Color,
    src: Coord,
    dst: Coord,
    ep_target: Option<Coord>,
) -> bool {
    let forward = geometry::pawn_forward_delta(side);
    if src.shift(0, forward) == Some(dst) {
        return b.get(dst).is_free();
    }
    if src.shift(0, 2 * forward) == Some(dst) {
        return src.rank() == geometry::double_move_src_rank(side)
            && src.shift(0, forward).is_some_and(|mid| b.get(mid).is_free())
            && b.get(dst).is_free();
    }
    if src.shift(-1, forward) == Some(dst) || src.shift(1, forward) == Some(dst) {
        let target = b.get(dst);
        return target.color() == Some(side.inv())
            || (ep_target == Some(dst) && target.is_free());
    }
    false
}

fn is_ray_semilegal(b: &Board, rays: &[Ray; 4], dst: Coord) -> bool {
    rays.iter().any(|ray| match ray.position(dst) {
        Some(pos) => ray.as_slice()[..pos].iter().all(|&c| b.get(c).is_free()),
        None => false,
    })
}

fn is_geometry_valid(
    b: &Board,
    piece: Piece,
    side: Color,
    src: Coord,
    dst: Coord,
    ep_target: Option<Coord>,
) -> bool {
    match piece {
        Piece::Pawn => is_pawn_semilegal(b, side, src, dst, ep_target),
        Piece::Knight => tables::knight(src).has(dst),
        Piece::Bishop => is_ray_semilegal(b, tables::bishop_rays(src), dst),
        Piece::Rook => is_ray_semilegal(b, tables::rook_rays(src), dst),
        Piece::Queen => {
            is_ray_semilegal(b, tables::rook_rays(src), dst)
                || is_ray_semilegal(b, tables::bishop_rays(src), dst)
        }
        Piece::King => tables::king(src).has(dst),
    }
}

/// Validates the move from `src` to `dst` made by `side`
///
/// `ep_target` is the current en passant target square. Castling is not considered here,
/// see [`castling`](crate::castling) for it.
///
/// The checks are performed in the following order, and the first failing one is reported:
/// the source square holds a piece of `side`, the destination doesn't hold a piece of `side`,
/// the piece can move this way, and (in [`Legality::Legal`] mode only) the king of `side` is
/// not attacked after the move.
pub fn validate(
    b: &Board,
    src: Coord,
    dst: Coord,
    side: Color,
    ep_target: Option<Coord>,
    mode: Legality,
) -> Result<(), ValidateError> {
    let cell = b.get(src);
    let (Some(color), Some(piece)) = (cell.color(), cell.piece()) else {
        return Err(ValidateError::NoPiece(src));
    };
    if color != side {
        return Err(ValidateError::WrongSide(src));
    }
    if b.get(dst).color() == Some(side) {
        return Err(ValidateError::OwnPiece(dst));
    }
    if !is_geometry_valid(b, piece, side, src, dst, ep_target) {
        return Err(ValidateError::NotSemiLegal);
    }

    if mode == Legality::Legal {
        // Promotion and castling rights don't affect attacks on the king, so only the pieces
        // are moved here.
        let mut scratch = *b;
        make::relocate(&mut scratch, src, dst, ep_target);
        if attack::is_check(&scratch, side) {
            return Err(ValidateError::NotLegal);
        }
    }

    Ok(())
}

/// Returns `true` if the move is valid in the given mode
///
/// See [`validate()`] for details.
#[inline]
pub fn is_legal(
    b: &Board,
    src: Coord,
    dst: Coord,
    side: Color,
    ep_target: Option<Coord>,
    mode: Legality,
) -> bool {
    validate(b, src, dst, side, ep_target, mode).is_ok()
}
