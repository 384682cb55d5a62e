//! Check detection
//!
//! A king is in check if any enemy piece could capture it with a semi-legal move. En passant
//! never captures a king, so no en passant target is passed to the validator here.

use crate::bitboard::Bitboard;
use crate::board::Board;
use crate::legal::{self, Legality};
use crate::types::{Cell, Color, Coord, Piece};

/// Returns the position of the king of color `c`, or `None` if there is no such king
///
/// If the board contains multiple kings of the same color, the first one in board order
/// (from `a8` to `h1`) is returned.
pub fn king_pos(b: &Board, c: Color) -> Option<Coord> {
    let king = Cell::from_parts(c, Piece::King);
    b.occupied()
        .find(|&(_, cell)| cell == king)
        .map(|(coord, _)| coord)
}

fn attackers(b: &Board, target: Coord, by: Color) -> impl Iterator<Item = Coord> + '_ {
    b.occupied()
        .filter(move |&(_, cell)| cell.color() == Some(by))
        .map(|(coord, _)| coord)
        .filter(move |&src| legal::is_legal(b, src, target, by, None, Legality::SemiLegal))
}

/// Returns `true` if the king of color `c` is under attack
///
/// Positions without such a king are never considered to be check.
pub fn is_check(b: &Board, c: Color) -> bool {
    match king_pos(b, c) {
        Some(king) => attackers(b, king, c.inv()).next().is_some(),
        None => false,
    }
}

/// Returns all the pieces that give check to the king of color `c`
pub fn checkers(b: &Board, c: Color) -> Bitboard {
    match king_pos(b, c) {
        Some(king) => {
            let mut res = Bitboard::EMPTY;
            for src in attackers(b, king, c.inv()) {
                res |= Bitboard::from_coord(src);
            }
            res
        }
        None => Bitboard::EMPTY,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::c;

    #[test]
    fn test_king_pos() {
        let b = Board::initial();
        assert_eq!(king_pos(&b, Color::White), Some(c("e1")));
        assert_eq!(king_pos(&b, Color::Black), Some(c("e8")));
        assert_eq!(king_pos(&Board::empty(), Color::White), None);
    }

    #[test]
    fn test_initial() {
        let b = Board::initial();
        assert!(!is_check(&b, Color::White));
        assert!(!is_check(&b, Color::Black));
        assert_eq!(checkers(&b, Color::White), Bitboard::EMPTY);
    }

    #[test]
    fn test_attackers() {
        let b = Board::from_rows([
            "....k...", "...P....", ".....N..", "........", "........", "........", "........",
            "....K..r",
        ])
        .unwrap();
        assert!(is_check(&b, Color::Black));
        assert!(is_check(&b, Color::White));
        assert_eq!(
            checkers(&b, Color::Black),
            Bitboard::EMPTY.with(c("d7")).with(c("f6"))
        );
        assert_eq!(checkers(&b, Color::White), Bitboard::EMPTY.with(c("h1")));
    }

    #[test]
    fn test_blocked() {
        let b = Board::from_rows([
            "....r...", "........", "........", "....n...", "........", "........", "....P...",
            "....K...",
        ])
        .unwrap();
        assert!(!is_check(&b, Color::White));

        let b = Board::from_rows([
            "....r...", "........", "........", "........", "........", "........", "........",
            "....K...",
        ])
        .unwrap();
        assert!(is_check(&b, Color::White));
    }

    #[test]
    fn test_pawn_pushes_dont_attack() {
        let b = Board::from_rows([
            "........", "........", "........", "........", "....p...", "....K...", "........",
            "........",
        ])
        .unwrap();
        assert!(!is_check(&b, Color::White));

        let b = Board::from_rows([
            "........", "........", "........", "........", "...p....", "....K...", "........",
            "........",
        ])
        .unwrap();
        assert!(is_check(&b, Color::White));
    }

    #[test]
    fn test_kings_and_knights() {
        let b = Board::from_rows([
            "........", "........", "........", "...k....", "....K...", "........", "........",
            "........",
        ])
        .unwrap();
        assert!(is_check(&b, Color::White));
        assert!(is_check(&b, Color::Black));

        let b = Board::from_rows([
            "........", "........", "........", "........", "....K...", "........", "...n....",
            "........",
        ])
        .unwrap();
        assert!(is_check(&b, Color::White));
        assert!(!is_check(&b, Color::Black));
    }
}
