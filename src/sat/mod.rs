#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! A small, complete DPLL SAT solver, generic over the variable type.

pub mod assignment;
pub mod branching;
pub mod clause;
pub mod cnf;
pub mod dpll;
pub mod literal;
pub mod propagation;
pub mod solver;
pub mod trail;
pub mod variable_selection;
