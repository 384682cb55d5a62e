//! Generator for the precomputed move tables
//!
//! Everything here is pure and deterministic. The build script of `chessgate` runs these
//! functions once and bakes the results into static arrays, and the tests of `chessgate`
//! run them again to verify the baked tables.

use crate::bitboard::Bitboard;
use crate::types::Coord;

use std::fmt;

pub const KNIGHT_OFFSETS: [(isize, isize); 8] = [
    (-1, -2),
    (1, -2),
    (-2, -1),
    (2, -1),
    (-2, 1),
    (2, 1),
    (-1, 2),
    (1, 2),
];

pub const KING_OFFSETS: [(isize, isize); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// Directions of rook rays as `(delta_file, delta_rank)`
pub const ROOK_DIRS: [(isize, isize); 4] = [(0, 1), (0, -1), (1, 0), (-1, 0)];

/// Directions of bishop rays as `(delta_file, delta_rank)`
pub const BISHOP_DIRS: [(isize, isize); 4] = [(1, 1), (-1, 1), (1, -1), (-1, -1)];

/// Maximum number of squares in a single ray
pub const MAX_RAY_LEN: usize = 7;

/// Squares strictly outward from an origin in one direction, nearest first
///
/// The ray ends at the board edge, so it may be empty if the origin lies on the edge.
#[derive(Copy, Clone, PartialEq, Eq, Hash)]
pub struct Ray {
    cells: [Coord; MAX_RAY_LEN],
    len: u8,
}

impl Ray {
    pub const EMPTY: Ray = Ray {
        cells: [Coord::from_index(0); MAX_RAY_LEN],
        len: 0,
    };

    /// Creates a ray from its raw parts
    ///
    /// Only the first `len` items of `cells` belong to the ray, the rest is padding.
    pub const fn from_parts(cells: [Coord; MAX_RAY_LEN], len: usize) -> Ray {
        assert!(len <= MAX_RAY_LEN, "ray is too long");
        Ray {
            cells,
            len: len as u8,
        }
    }

    fn push(&mut self, c: Coord) {
        self.cells[self.len as usize] = c;
        self.len += 1;
    }

    #[inline]
    pub fn as_slice(&self) -> &[Coord] {
        &self.cells[..self.len as usize]
    }

    /// Returns the padded array of cells, as accepted by [`Ray::from_parts()`]
    #[inline]
    pub fn raw_cells(&self) -> &[Coord; MAX_RAY_LEN] {
        &self.cells
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len as usize
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the distance from the origin to `c` minus one, or `None` if `c` is not on the ray
    #[inline]
    pub fn position(&self, c: Coord) -> Option<usize> {
        self.as_slice().iter().position(|&x| x == c)
    }

    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = Coord> + '_ {
        self.as_slice().iter().copied()
    }
}

impl fmt::Debug for Ray {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        f.debug_list().entries(self.as_slice()).finish()
    }
}

pub fn leaper_table(offsets: &[(isize, isize)]) -> [Bitboard; 64] {
    let mut res = [Bitboard::EMPTY; 64];
    for c in Coord::iter() {
        res[c.index()] = offsets
            .iter()
            .filter_map(|&(delta_file, delta_rank)| c.shift(delta_file, delta_rank))
            .collect();
    }
    res
}

pub fn ray_table(dirs: &[(isize, isize); 4]) -> [[Ray; 4]; 64] {
    let mut res = [[Ray::EMPTY; 4]; 64];
    for c in Coord::iter() {
        for (ray, &(delta_file, delta_rank)) in res[c.index()].iter_mut().zip(dirs.iter()) {
            let mut p = c;
            while let Some(new_p) = p.shift(delta_file, delta_rank) {
                ray.push(new_p);
                p = new_p;
            }
        }
    }
    res
}

pub fn knight_moves() -> [Bitboard; 64] {
    leaper_table(&KNIGHT_OFFSETS)
}

pub fn king_moves() -> [Bitboard; 64] {
    leaper_table(&KING_OFFSETS)
}

pub fn rook_rays() -> [[Ray; 4]; 64] {
    ray_table(&ROOK_DIRS)
}

pub fn bishop_rays() -> [[Ray; 4]; 64] {
    ray_table(&BISHOP_DIRS)
}
