//! Turn control
//!
//! [`Game`] owns the authoritative [`GameState`] and applies the moves only after they pass
//! both the validation and the look-ahead safety check. Rejected moves leave the state intact.

use crate::board::{Board, GameState};
use crate::legal::{self, Legality, ValidateError};
use crate::make::{self, Promoter};
use crate::types::{Cell, Color, Coord, CoordParseError, Piece};
use crate::{attack, castling};

use std::str::FromStr;
use thiserror::Error;
use tracing::debug;

/// Command entered by the user
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Command {
    /// Move a piece from `from` to `to`
    Move { from: Coord, to: Coord },
    /// End the session
    Quit,
}

/// Error parsing [`Command`]
#[derive(Debug, Clone, Error, Eq, PartialEq)]
pub enum CommandParseError {
    #[error("empty command")]
    Empty,
    #[error("destination square is missing")]
    NoDestination,
    #[error("extra data after move")]
    ExtraData,
    #[error("bad square: {0}")]
    BadCoord(#[from] CoordParseError),
}

impl FromStr for Command {
    type Err = CommandParseError;

    fn from_str(s: &str) -> Result<Command, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("quit") {
            return Ok(Command::Quit);
        }
        let mut tokens = s.split_whitespace();
        let from = tokens.next().ok_or(CommandParseError::Empty)?;
        let to = tokens.next().ok_or(CommandParseError::NoDestination)?;
        if tokens.next().is_some() {
            return Err(CommandParseError::ExtraData);
        }
        Ok(Command::Move {
            from: Coord::from_str(from)?,
            to: Coord::from_str(to)?,
        })
    }
}

/// Error indicating that the move was rejected
#[derive(Debug, Copy, Clone, Error, Eq, PartialEq)]
#[error("cannot move from {from} to {to}: {source}")]
pub struct MoveError {
    pub from: Coord,
    pub to: Coord,
    pub source: ValidateError,
}

/// Chess game in progress
///
/// The game never ends by itself. Even when the side to move has no legal moves, it is only
/// reported via [`Game::is_check()`], and it's up to the caller to stop.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default)]
pub struct Game {
    state: GameState,
}

impl Game {
    /// Starts a game from the initial position
    #[inline]
    pub fn new() -> Game {
        Game::from_state(GameState::initial())
    }

    /// Starts a game from the given state
    #[inline]
    pub fn from_state(state: GameState) -> Game {
        Game { state }
    }

    #[inline]
    pub fn state(&self) -> &GameState {
        &self.state
    }

    #[inline]
    pub fn board(&self) -> &Board {
        &self.state.board
    }

    /// Returns the side to move
    #[inline]
    pub fn side(&self) -> Color {
        self.state.side
    }

    /// Returns `true` if the side to move is in check
    #[inline]
    pub fn is_check(&self) -> bool {
        attack::is_check(&self.state.board, self.state.side)
    }

    /// Checks whether the side to move may move from `from` to `to`, without making the move
    ///
    /// Castling is recognized as a king move from its home square to the castling
    /// destination. All other moves are validated in [`Legality::Legal`] mode. Then the move
    /// is simulated on a copy of the state to verify that the king is safe.
    pub fn check_move(&self, from: Coord, to: Coord) -> Result<(), ValidateError> {
        let s = &self.state;
        let side = s.side;
        let castling_side = castling::castling_side_for(side, from, to)
            .filter(|_| s.board.get(from) == Cell::from_parts(side, Piece::King));
        match castling_side {
            Some(cs) => {
                if !castling::can_castle(&s.board, side, cs, s.castling) {
                    return Err(ValidateError::CannotCastle);
                }
            }
            None => legal::validate(&s.board, from, to, side, s.ep_target, Legality::Legal)?,
        }

        let mut scratch = s.board;
        make::simulate(&mut scratch, from, to, side, s.ep_target, s.castling);
        if attack::is_check(&scratch, side) {
            return Err(ValidateError::NotLegal);
        }

        Ok(())
    }

    /// Makes the move from `from` to `to` for the side to move
    ///
    /// `promoter` is called exactly once if the move is accepted and promotes a pawn, and is
    /// never called otherwise. On error, the game is left unchanged.
    pub fn push<P: Promoter + ?Sized>(
        &mut self,
        from: Coord,
        to: Coord,
        promoter: &mut P,
    ) -> Result<(), MoveError> {
        let side = self.state.side;
        if let Err(source) = self.check_move(from, to) {
            debug!(%from, %to, %side, reason = %source, "move rejected");
            return Err(MoveError { from, to, source });
        }

        #[cfg(feature = "selftest")]
        let prev = self.state;

        let s = &mut self.state;
        let (ep_target, castling) =
            make::apply(&mut s.board, from, to, side, s.ep_target, s.castling, promoter);
        s.ep_target = ep_target;
        s.castling = castling;
        s.side = side.inv();
        debug!(%from, %to, %side, "move accepted");

        #[cfg(feature = "selftest")]
        self.selftest(&prev);

        Ok(())
    }

    #[cfg(feature = "selftest")]
    fn selftest(&self, prev: &GameState) {
        use crate::geometry;

        let s = &self.state;
        assert!(
            s.castling.is_subset_of(prev.castling),
            "castling rights grew from {} to {}",
            prev.castling,
            s.castling
        );
        if let Some(p) = s.ep_target {
            assert_eq!(
                p.rank(),
                geometry::enpassant_dst_rank(s.side),
                "en passant target {} is on a wrong rank",
                p
            );
            assert!(s.board.get(p).is_free(), "en passant target {} is occupied", p);
            assert_ne!(prev.ep_target, Some(p), "en passant target {} persisted", p);
        }
        assert_ne!(s.side, prev.side, "side to move didn't change");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::{c, never};
    use crate::geometry;
    use crate::make::{Always, PromotePiece};
    use crate::types::{CastlingRights, CastlingSide};
    use rand::rngs::StdRng;
    use rand::seq::SliceRandom;
    use rand::SeedableRng;

    fn push(game: &mut Game, from: &str, to: &str) -> Result<(), MoveError> {
        game.push(c(from), c(to), &mut never)
    }

    fn legal_moves(game: &Game) -> Vec<(Coord, Coord)> {
        let side = game.side();
        let mut res = Vec::new();
        for (from, cell) in game.board().occupied() {
            if cell.color() != Some(side) {
                continue;
            }
            for to in Coord::iter() {
                if game.check_move(from, to).is_ok() {
                    res.push((from, to));
                }
            }
        }
        res
    }

    #[test]
    fn test_command() {
        assert_eq!(
            Command::from_str("e2 e4"),
            Ok(Command::Move {
                from: c("e2"),
                to: c("e4")
            })
        );
        assert_eq!(
            Command::from_str("  g1\tf3 \n"),
            Ok(Command::Move {
                from: c("g1"),
                to: c("f3")
            })
        );
        assert_eq!(Command::from_str("quit"), Ok(Command::Quit));
        assert_eq!(Command::from_str("QUIT\n"), Ok(Command::Quit));
        assert_eq!(Command::from_str(""), Err(CommandParseError::Empty));
        assert_eq!(Command::from_str("e2"), Err(CommandParseError::NoDestination));
        assert_eq!(
            Command::from_str("e2 e4 e5"),
            Err(CommandParseError::ExtraData)
        );
        assert_eq!(
            Command::from_str("e2 i4"),
            Err(CommandParseError::BadCoord(
                CoordParseError::UnexpectedFileChar('i')
            ))
        );
        assert_eq!(
            Command::from_str("e9 e4"),
            Err(CommandParseError::BadCoord(
                CoordParseError::UnexpectedRankChar('9')
            ))
        );
        assert_eq!(
            Command::from_str("e2e4"),
            Err(CommandParseError::NoDestination)
        );
    }

    #[test]
    fn test_opening() {
        let mut game = Game::new();
        push(&mut game, "e2", "e4").unwrap();
        let s = game.state();
        assert_eq!(s.ep_target, Some(c("e3")));
        assert_eq!(s.board.get(c("e4")), Cell::from_parts(Color::White, Piece::Pawn));
        assert!(s.board.get(c("e2")).is_free());
        assert_eq!(game.side(), Color::Black);

        push(&mut game, "e7", "e5").unwrap();
        assert_eq!(game.state().ep_target, Some(c("e6")));
        assert_eq!(game.side(), Color::White);

        push(&mut game, "g1", "f3").unwrap();
        assert_eq!(game.state().ep_target, None);
        assert_eq!(game.state().castling, CastlingRights::FULL);
    }

    #[test]
    fn test_wrong_side() {
        let mut game = Game::new();
        assert_eq!(
            push(&mut game, "e7", "e5"),
            Err(MoveError {
                from: c("e7"),
                to: c("e5"),
                source: ValidateError::WrongSide(c("e7"))
            })
        );
        assert_eq!(
            push(&mut game, "e3", "e4").unwrap_err().source,
            ValidateError::NoPiece(c("e3"))
        );
        assert_eq!(game, Game::new());
    }

    #[test]
    fn test_enpassant() {
        let mut game = Game::from_state(
            GameState::from_rows(
                [
                    "....k...", "...p....", "........", "....P...", "........", "........",
                    "........", "....K...",
                ],
                Color::Black,
                CastlingRights::EMPTY,
                None,
            )
            .unwrap(),
        );
        push(&mut game, "d7", "d5").unwrap();
        assert_eq!(game.state().ep_target, Some(c("d6")));
        push(&mut game, "e5", "d6").unwrap();
        let expected = Board::from_rows([
            "....k...", "........", "...P....", "........", "........", "........", "........",
            "....K...",
        ])
        .unwrap();
        assert_eq!(game.board(), &expected);
        assert_eq!(game.state().ep_target, None);
    }

    #[test]
    fn test_enpassant_bogus_target() {
        let mut game = Game::from_state(
            GameState::from_rows(
                [
                    "....k...", "........", "........", "...PR...", "........", "........",
                    "........", "K.......",
                ],
                Color::White,
                CastlingRights::EMPTY,
                Some(c("e6")),
            )
            .unwrap(),
        );
        assert_eq!(game.state().ep_target, None);
        assert_eq!(
            push(&mut game, "d5", "e6").unwrap_err().source,
            ValidateError::NotSemiLegal
        );
        assert_eq!(game.board().get(c("e5")), Cell::from_parts(Color::White, Piece::Rook));
        assert_eq!(game.side(), Color::White);
    }

    #[test]
    fn test_enpassant_expires() {
        let mut game = Game::from_state(
            GameState::from_rows(
                [
                    "....k...", "...p....", "........", "....P...", "........", "........",
                    "........", "....K...",
                ],
                Color::Black,
                CastlingRights::EMPTY,
                None,
            )
            .unwrap(),
        );
        push(&mut game, "d7", "d5").unwrap();
        push(&mut game, "e1", "f1").unwrap();
        push(&mut game, "e8", "f8").unwrap();
        assert_eq!(game.state().ep_target, None);
        let before = game;
        assert_eq!(
            push(&mut game, "e5", "d6").unwrap_err().source,
            ValidateError::NotSemiLegal
        );
        assert_eq!(game, before);
    }

    #[test]
    fn test_castling() {
        let mut game = Game::from_state(
            GameState::from_rows(
                [
                    "r...k..r", "pppppppp", "........", "........", "........", "........",
                    "PPPPPPPP", "R...K..R",
                ],
                Color::White,
                CastlingRights::FULL,
                None,
            )
            .unwrap(),
        );
        push(&mut game, "e1", "g1").unwrap();
        let s = game.state();
        assert_eq!(s.board.get(c("g1")), Cell::from_parts(Color::White, Piece::King));
        assert_eq!(s.board.get(c("f1")), Cell::from_parts(Color::White, Piece::Rook));
        assert!(s.board.get(c("e1")).is_free());
        assert!(s.board.get(c("h1")).is_free());
        assert_eq!(s.castling, CastlingRights::FULL.without_color(Color::White));
        assert_eq!(s.ep_target, None);

        push(&mut game, "e8", "c8").unwrap();
        let s = game.state();
        assert_eq!(s.board.get(c("c8")), Cell::from_parts(Color::Black, Piece::King));
        assert_eq!(s.board.get(c("d8")), Cell::from_parts(Color::Black, Piece::Rook));
        assert_eq!(s.castling, CastlingRights::EMPTY);
    }

    #[test]
    fn test_castling_rejected() {
        let state = GameState::from_rows(
            [
                "....k...", "........", "........", ".....r..", "........", "........",
                "........", "R...K..R",
            ],
            Color::White,
            CastlingRights::FULL,
            None,
        )
        .unwrap();
        let mut game = Game::from_state(state);
        assert_eq!(
            push(&mut game, "e1", "g1").unwrap_err().source,
            ValidateError::CannotCastle
        );
        assert_eq!(game.state(), &state);
        push(&mut game, "e1", "c1").unwrap();

        let mut game = Game::from_state(GameState {
            castling: CastlingRights::EMPTY,
            ..state
        });
        assert_eq!(
            push(&mut game, "e1", "c1").unwrap_err().source,
            ValidateError::CannotCastle
        );
    }

    #[test]
    fn test_rights_monotone() {
        let mut game = Game::from_state(
            GameState::from_rows(
                [
                    "r...k..r", "........", "........", "........", "........", "........",
                    "........", "R...K..R",
                ],
                Color::White,
                CastlingRights::FULL,
                None,
            )
            .unwrap(),
        );
        push(&mut game, "h1", "h4").unwrap();
        push(&mut game, "a8", "a5").unwrap();
        push(&mut game, "h4", "h1").unwrap();
        push(&mut game, "a5", "a8").unwrap();
        let rights = game.state().castling;
        assert!(!rights.has(Color::White, CastlingSide::King));
        assert!(!rights.has(Color::Black, CastlingSide::Queen));
        assert!(rights.has(Color::White, CastlingSide::Queen));
        assert!(rights.has(Color::Black, CastlingSide::King));
        assert_eq!(
            push(&mut game, "e1", "g1").unwrap_err().source,
            ValidateError::CannotCastle
        );
    }

    #[test]
    fn test_self_check() {
        let state = GameState::from_rows(
            [
                "....k...", "........", "........", "........", ".b......", "........",
                "...N....", "....K...",
            ],
            Color::White,
            CastlingRights::EMPTY,
            None,
        )
        .unwrap();
        let mut game = Game::from_state(state);
        assert_eq!(
            push(&mut game, "d2", "f3").unwrap_err().source,
            ValidateError::NotLegal
        );
        assert_eq!(game.state(), &state);
        push(&mut game, "d2", "b3").unwrap_err();
        push(&mut game, "e1", "f1").unwrap();
    }

    #[test]
    fn test_in_check() {
        let state = GameState::from_rows(
            [
                "....r..k", "........", "........", "........", "........", "........",
                "P.......", "....K...",
            ],
            Color::White,
            CastlingRights::EMPTY,
            None,
        )
        .unwrap();
        let mut game = Game::from_state(state);
        assert!(game.is_check());
        assert_eq!(
            push(&mut game, "a2", "a3").unwrap_err().source,
            ValidateError::NotLegal
        );
        assert_eq!(game.state(), &state);
        push(&mut game, "e1", "d2").unwrap();
        assert!(!game.is_check());
    }

    #[test]
    fn test_promotion() {
        let state = GameState::from_rows(
            [
                "....k...", "P.......", "........", "........", "........", "........",
                "........", "....K...",
            ],
            Color::White,
            CastlingRights::EMPTY,
            None,
        )
        .unwrap();

        let mut calls = 0;
        let mut promoter = |color: Color| {
            assert_eq!(color, Color::White);
            calls += 1;
            PromotePiece::Rook
        };

        let mut game = Game::from_state(state);
        game.push(c("a7"), c("b8"), &mut promoter).unwrap_err();
        game.push(c("a7"), c("a8"), &mut promoter).unwrap();
        assert_eq!(calls, 1);
        assert_eq!(
            game.board().get(c("a8")),
            Cell::from_parts(Color::White, Piece::Rook)
        );
        assert!(game.is_check());
    }

    #[test]
    fn test_promotion_rejected() {
        // The pawn is pinned, so the promotion must not reach the promoter
        let state = GameState::from_rows(
            [
                ".......k", "...K.P.r", "........", "........", "........", "........",
                "........", "........",
            ],
            Color::White,
            CastlingRights::EMPTY,
            None,
        )
        .unwrap();
        let mut game = Game::from_state(state);
        assert_eq!(
            push(&mut game, "f7", "f8").unwrap_err().source,
            ValidateError::NotLegal
        );
        game.push(c("d7"), c("d6"), &mut Always(PromotePiece::Queen))
            .unwrap();
    }

    #[test]
    fn test_random_playouts() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..8 {
            let mut game = Game::new();
            for _ in 0..60 {
                let moves = legal_moves(&game);
                let Some(&(from, to)) = moves.choose(&mut rng) else {
                    break;
                };
                let prev = *game.state();
                game.push(from, to, &mut Always(PromotePiece::Queen))
                    .unwrap();
                let s = game.state();

                assert!(s.castling.is_subset_of(prev.castling));
                assert_eq!(s.side, prev.side.inv());
                if let Some(p) = s.ep_target {
                    assert_eq!(p.rank(), geometry::enpassant_dst_rank(s.side));
                    assert!(s.board.get(p).is_free());
                }
                if prev.ep_target.is_some() {
                    assert_ne!(s.ep_target, prev.ep_target);
                }
                assert!(!attack::is_check(&s.board, prev.side));
            }
        }
    }
}
