//! Board and related things

use crate::geometry;
use crate::types::{CastlingRights, CastlingSide, Cell, Color, Coord, File, Piece, Rank};

use std::fmt::{self, Display};

use thiserror::Error;

/// Error building a [`Board`] from its row diagram
#[derive(Debug, Clone, Error, Eq, PartialEq)]
pub enum BoardParseError {
    /// Row has a wrong number of squares
    #[error("rank {rank} has {len} squares instead of 8")]
    BadRowLength { rank: Rank, len: usize },
    /// Unexpected character
    #[error("unexpected char {0:?}")]
    UnexpectedChar(char),
}

/// Contents of all the 64 squares
///
/// At most one piece stands on each square by construction. The board doesn't require both
/// kings to be present: scratch boards used in tests and simulations may lack them.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Board {
    cells: [Cell; 64],
}

impl Board {
    /// Returns an empty board
    #[inline]
    pub const fn empty() -> Board {
        Board {
            cells: [Cell::EMPTY; 64],
        }
    }

    /// Returns a board with the initial arrangement of pieces
    pub fn initial() -> Board {
        let mut res = Board::empty();
        for file in File::iter() {
            res.put2(file, Rank::R2, Cell::from_parts(Color::White, Piece::Pawn));
            res.put2(file, Rank::R7, Cell::from_parts(Color::Black, Piece::Pawn));
        }
        for (color, rank) in [(Color::White, Rank::R1), (Color::Black, Rank::R8)] {
            res.put2(File::A, rank, Cell::from_parts(color, Piece::Rook));
            res.put2(File::B, rank, Cell::from_parts(color, Piece::Knight));
            res.put2(File::C, rank, Cell::from_parts(color, Piece::Bishop));
            res.put2(File::D, rank, Cell::from_parts(color, Piece::Queen));
            res.put2(File::E, rank, Cell::from_parts(color, Piece::King));
            res.put2(File::F, rank, Cell::from_parts(color, Piece::Bishop));
            res.put2(File::G, rank, Cell::from_parts(color, Piece::Knight));
            res.put2(File::H, rank, Cell::from_parts(color, Piece::Rook));
        }
        res
    }

    /// Builds a board from eight rows, starting from rank 8
    ///
    /// Each row contains exactly eight characters: piece letters (uppercase for White,
    /// lowercase for Black) or `.` for an empty square.
    ///
    /// # Example
    ///
    /// ```
    /// # use chessgate::{Board, Cell, Color, Piece, File, Rank};
    /// #
    /// let b = Board::from_rows([
    ///     "....k...",
    ///     "........",
    ///     "........",
    ///     "........",
    ///     "........",
    ///     "........",
    ///     "........",
    ///     "....K..R",
    /// ])
    /// .unwrap();
    /// assert_eq!(b.get2(File::H, Rank::R1), Cell::from_parts(Color::White, Piece::Rook));
    /// ```
    pub fn from_rows(rows: [&str; 8]) -> Result<Board, BoardParseError> {
        let mut res = Board::empty();
        for (rank, row) in Rank::iter().zip(rows) {
            let len = row.chars().count();
            if len != 8 {
                return Err(BoardParseError::BadRowLength { rank, len });
            }
            for (file, ch) in File::iter().zip(row.chars()) {
                let cell = Cell::from_char(ch).ok_or(BoardParseError::UnexpectedChar(ch))?;
                res.put2(file, rank, cell);
            }
        }
        Ok(res)
    }

    /// Returns the contents of the square with coordinate `c`
    #[inline]
    pub fn get(&self, c: Coord) -> Cell {
        self.cells[c.index()]
    }

    /// Returns the contents of the square with file `file` and rank `rank`
    #[inline]
    pub fn get2(&self, file: File, rank: Rank) -> Cell {
        self.get(Coord::from_parts(file, rank))
    }

    /// Puts `cell` to the square with coordinate `c`
    #[inline]
    pub fn put(&mut self, c: Coord, cell: Cell) {
        self.cells[c.index()] = cell;
    }

    /// Puts `cell` to the square with file `file` and rank `rank`
    #[inline]
    pub fn put2(&mut self, file: File, rank: Rank, cell: Cell) {
        self.put(Coord::from_parts(file, rank), cell);
    }

    /// Empties the square `c` and returns its previous contents
    #[inline]
    pub fn take(&mut self, c: Coord) -> Cell {
        std::mem::take(&mut self.cells[c.index()])
    }

    /// Iterates over all the occupied squares
    pub fn occupied(&self) -> impl Iterator<Item = (Coord, Cell)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, cell)| cell.is_occupied())
            .map(|(i, &cell)| (Coord::from_index(i), cell))
    }

    /// Wraps the board to allow pretty-printing with the given style `Style`
    ///
    /// The resulting wrapper implements [`fmt::Display`], so can be used with
    /// `write!()`, `println!()`, or `ToString::to_string`.
    ///
    /// # Example
    ///
    /// ```
    /// # use chessgate::{Board, board::PrettyStyle};
    /// #
    /// let res = r#"
    ///   a b c d e f g h
    /// 8 r n b q k b n r 8
    /// 7 p p p p p p p p 7
    /// 6 . . . . . . . . 6
    /// 5 . . . . . . . . 5
    /// 4 . . . . . . . . 4
    /// 3 . . . . . . . . 3
    /// 2 P P P P P P P P 2
    /// 1 R N B Q K B N R 1
    ///   a b c d e f g h
    /// "#;
    /// assert_eq!(
    ///     Board::initial().pretty(PrettyStyle::Ascii).to_string().trim_end(),
    ///     res.trim_start_matches('\n').trim_end(),
    /// );
    /// ```
    #[inline]
    pub fn pretty(&self, style: PrettyStyle) -> Pretty<'_> {
        Pretty { board: self, style }
    }
}

impl Default for Board {
    #[inline]
    fn default() -> Board {
        Board::empty()
    }
}

impl Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        self.pretty(PrettyStyle::Ascii).fmt(f)
    }
}

/// Full state of the game
///
/// Besides the board, contains everything needed to judge the next move: side to move,
/// castling rights and en passant target square.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct GameState {
    /// Contents of the board
    pub board: Board,
    /// Side to move
    pub side: Color,
    /// Castling rights
    pub castling: CastlingRights,
    /// En passant target square
    ///
    /// It is the square a pawn of the side to move may capture onto by en passant, i.e. the
    /// square just passed by the opponent's pawn on its double move. It is `None` if the
    /// previous move was not a double pawn move.
    pub ep_target: Option<Coord>,
}

impl GameState {
    /// Returns the state at the start of a game
    pub fn initial() -> GameState {
        GameState {
            board: Board::initial(),
            side: Color::White,
            castling: CastlingRights::FULL,
            ep_target: None,
        }
    }

    /// Creates a state with the given board and side to move
    ///
    /// Castling rights which are impossible for the given board (i.e. when the king or the rook
    /// is not on its home square) are dropped. En passant target is dropped unless it's an empty
    /// square on the proper rank with an enemy pawn just behind it.
    pub fn new(
        board: Board,
        side: Color,
        castling: CastlingRights,
        ep_target: Option<Coord>,
    ) -> GameState {
        let mut castling = castling;
        for color in [Color::White, Color::Black] {
            let rank = geometry::castling_rank(color);
            if board.get2(File::E, rank) != Cell::from_parts(color, Piece::King) {
                castling.unset_color(color);
            }
            for side in CastlingSide::iter() {
                let rook = geometry::castling_rook_src(color, side);
                if board.get(rook) != Cell::from_parts(color, Piece::Rook) {
                    castling.unset(color, side);
                }
            }
        }
        let enemy_pawn = Cell::from_parts(side.inv(), Piece::Pawn);
        let ep_target = ep_target.filter(|&p| {
            p.rank() == geometry::enpassant_dst_rank(side)
                && board.get(p).is_free()
                && p.shift(0, -geometry::pawn_forward_delta(side))
                    .is_some_and(|pawn| board.get(pawn) == enemy_pawn)
        });
        GameState {
            board,
            side,
            castling,
            ep_target,
        }
    }

    /// Creates a state from a board diagram
    ///
    /// See [`Board::from_rows()`] for the diagram format and [`GameState::new()`] for the
    /// handling of the remaining arguments.
    pub fn from_rows(
        rows: [&str; 8],
        side: Color,
        castling: CastlingRights,
        ep_target: Option<Coord>,
    ) -> Result<GameState, BoardParseError> {
        Ok(GameState::new(
            Board::from_rows(rows)?,
            side,
            castling,
            ep_target,
        ))
    }
}

impl Default for GameState {
    #[inline]
    fn default() -> GameState {
        GameState::initial()
    }
}

/// Style for [`Board::pretty()`]
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
pub enum PrettyStyle {
    /// Print pieces as ASCII letters
    #[default]
    Ascii,
    /// Print pieces as Unicode chess symbols
    Utf8,
}

/// Wrapper to pretty-print the board
///
/// See docs for [`Board::pretty()`] for more details.
pub struct Pretty<'a> {
    board: &'a Board,
    style: PrettyStyle,
}

trait StyleTable {
    fn cell(c: Cell) -> char;

    fn header(f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        write!(f, " ")?;
        for file in File::iter() {
            write!(f, " {}", file)?;
        }
        writeln!(f)
    }

    fn fmt(b: &Board, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        Self::header(f)?;
        for rank in Rank::iter() {
            write!(f, "{}", rank)?;
            for file in File::iter() {
                write!(f, " {}", Self::cell(b.get2(file, rank)))?;
            }
            writeln!(f, " {}", rank)?;
        }
        Self::header(f)
    }
}

struct AsciiStyleTable;
struct Utf8StyleTable;

impl StyleTable for AsciiStyleTable {
    fn cell(c: Cell) -> char {
        c.as_char()
    }
}

impl StyleTable for Utf8StyleTable {
    fn cell(c: Cell) -> char {
        c.as_utf8_char()
    }
}

impl<'a> Display for Pretty<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        match self.style {
            PrettyStyle::Ascii => AsciiStyleTable::fmt(self.board, f),
            PrettyStyle::Utf8 => Utf8StyleTable::fmt(self.board, f),
        }
    }
}
