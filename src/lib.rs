//! Sudoku variants solved through SAT.
//!
//! A puzzle (rectangular blocks, clues, and pairwise sum constraints) is
//! encoded as CNF, handed to a DPLL solver with unit propagation and fixed-order
//! branching, and the model is decoded back into a grid.

/// CNF representation and the DPLL solvers.
pub mod sat;

/// Puzzle description, CNF encoding, decoding and independent validation.
pub mod sudoku;

/// Encode, solve and decode under a wall-clock budget.
pub mod harness;
