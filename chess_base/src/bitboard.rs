use crate::types::Coord;
use derive_more::{BitOr, BitOrAssign};
use std::fmt;
use std::iter::IntoIterator;

/// Set of squares, one bit per square index
///
/// Leaper tables are stored as bitboards, and check detection collects the checking
/// pieces into one.
#[derive(Default, Copy, Clone, PartialEq, Eq, Hash, BitOr, BitOrAssign)]
pub struct Bitboard(u64);

impl Bitboard {
    pub const EMPTY: Bitboard = Bitboard(0);

    pub const fn from_raw(val: u64) -> Bitboard {
        Bitboard(val)
    }

    /// Returns the set containing only `coord`
    pub const fn from_coord(coord: Coord) -> Bitboard {
        Bitboard(1_u64 << coord.index())
    }

    pub const fn with(self, coord: Coord) -> Bitboard {
        Bitboard(self.0 | Self::from_coord(coord).0)
    }

    pub const fn has(&self, coord: Coord) -> bool {
        self.0 & Self::from_coord(coord).0 != 0
    }

    /// Returns the raw value, as accepted by [`Bitboard::from_raw()`]
    pub const fn as_raw(&self) -> u64 {
        self.0
    }

    pub const fn len(&self) -> u32 {
        self.0.count_ones()
    }

    pub const fn is_empty(&self) -> bool {
        self.0 == 0
    }
}

impl fmt::Debug for Bitboard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        f.debug_set().entries(*self).finish()
    }
}

pub struct Iter(u64);

impl Iterator for Iter {
    type Item = Coord;

    fn next(&mut self) -> Option<Coord> {
        if self.0 == 0 {
            return None;
        }
        let bit = self.0.trailing_zeros();
        self.0 &= self.0 - 1;
        Some(Coord::from_index(bit as usize))
    }
}

impl IntoIterator for Bitboard {
    type Item = Coord;
    type IntoIter = Iter;

    fn into_iter(self) -> Iter {
        Iter(self.0)
    }
}

impl FromIterator<Coord> for Bitboard {
    fn from_iter<I: IntoIterator<Item = Coord>>(iter: I) -> Self {
        iter.into_iter().fold(Bitboard::EMPTY, Bitboard::with)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{File, Rank};

    #[test]
    fn test_order() {
        let a4 = Coord::from_parts(File::A, Rank::R4);
        let e2 = Coord::from_parts(File::E, Rank::R2);
        let f3 = Coord::from_parts(File::F, Rank::R3);
        let bb: Bitboard = [e2, a4, f3].into_iter().collect();
        assert_eq!(bb.into_iter().collect::<Vec<_>>(), vec![a4, f3, e2]);
        assert_eq!(bb.len(), 3);
        assert!(bb.has(f3));
        assert!(!bb.has(Coord::from_parts(File::F, Rank::R2)));
        assert_eq!(format!("{:?}", bb), "{Coord(a4), Coord(f3), Coord(e2)}");
    }

    #[test]
    fn test_union() {
        let a8 = Coord::from_parts(File::A, Rank::R8);
        let h1 = Coord::from_parts(File::H, Rank::R1);
        let mut bb = Bitboard::from_coord(a8);
        assert_eq!(bb.as_raw(), 1);
        bb |= Bitboard::from_coord(h1);
        assert_eq!(bb.as_raw(), 1 | (1 << 63));
        assert_eq!(bb | Bitboard::from_coord(a8), bb);
        assert!(Bitboard::EMPTY.is_empty());
        assert_eq!(Bitboard::EMPTY.into_iter().next(), None);
    }
}
