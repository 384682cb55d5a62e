use crate::make::PromotePiece;
use crate::types::{Color, Coord};
use std::str::FromStr;

pub fn c(s: &str) -> Coord {
    Coord::from_str(s).unwrap()
}

pub fn never(_: Color) -> PromotePiece {
    panic!("unexpected promotion");
}
