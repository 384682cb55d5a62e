//! Move legality and board state for two-player chess
//!
//! The crate judges moves given as a pair of squares and keeps the state of a single game.
//! It doesn't generate moves, doesn't search and doesn't detect the end of the game.
//!
//! # Example
//!
//! ```
//! use chessgate::{Game, Color, Coord};
//! use chessgate::make::{Always, PromotePiece};
//! use std::str::FromStr;
//!
//! let mut game = Game::new();
//! let mut promoter = Always(PromotePiece::Queen);
//! game.push(Coord::from_str("e2").unwrap(), Coord::from_str("e4").unwrap(), &mut promoter)
//!     .unwrap();
//! assert_eq!(game.side(), Color::Black);
//! assert_eq!(game.state().ep_target, Some(Coord::from_str("e3").unwrap()));
//!
//! // Knights don't move like this
//! assert!(game
//!     .push(Coord::from_str("b8").unwrap(), Coord::from_str("b6").unwrap(), &mut promoter)
//!     .is_err());
//! assert_eq!(game.side(), Color::Black);
//! ```

pub mod attack;
pub mod board;
pub mod castling;
pub mod game;
pub mod legal;
pub mod make;
pub mod tables;

#[cfg(test)]
mod test_util;

pub use chessgate_base::{bitboard, geometry, types};

pub use bitboard::Bitboard;
pub use board::{Board, GameState};
pub use game::{Command, Game, MoveError};
pub use legal::{Legality, ValidateError};
pub use make::{PromotePiece, Promoter};
pub use types::{CastlingRights, CastlingSide, Cell, Color, Coord, File, Piece, Rank};
