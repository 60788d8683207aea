#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Sudoku variants with rectangular blocks, clues and pairwise sum constraints.
//!
//! A [`puzzle::Puzzle`] is turned into CNF by [`encoder::encode`], solved by
//! any [`crate::sat::solver::Solver`], read back by [`decoder::decode`] and
//! checked independently by [`validator::validate`].

pub mod decoder;
pub mod encoder;
pub mod grid;
pub mod puzzle;
pub mod validator;
