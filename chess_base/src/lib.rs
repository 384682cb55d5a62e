//! # Base types for chessgate
//!
//! This is an auxiliary crate for `chessgate`, which contains the value types and the move table
//! generator. It was split from the main crate, so everything declared here can be used in the
//! build script for `chessgate`.
//!
//! Normally you don't want to use this crate directly. Use `chessgate` instead.

pub mod bitboard;
pub mod geometry;
pub mod tables;
pub mod types;
