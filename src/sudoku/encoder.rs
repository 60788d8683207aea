//! Puzzle → CNF.
//!
//! Variable `(row, col, value)` reads "cell (row, col) holds value". Clauses are
//! emitted in a fixed order (cells, rows, columns, blocks, clues, sums), each
//! family in row-major and ascending order, so the same puzzle always yields
//! the same formula.
//!
//! Every "at most one" family is the pairwise encoding, which gives O(N^4)
//! clauses.

use crate::sat::clause::Clause;
use crate::sat::cnf::Cnf;
use crate::sat::literal::Literal;
use crate::sudoku::puzzle::{Clue, Puzzle, PuzzleError, Rectangle, SumConstraint};
use itertools::{Itertools, iproduct};
use std::fmt::{Display, Formatter};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Variable {
    pub row: usize,
    pub col: usize,
    pub value: usize,
}

impl Variable {
    #[must_use]
    pub const fn new(row: usize, col: usize, value: usize) -> Self {
        Self { row, col, value }
    }
}

impl Display for Variable {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "({},{})={}", self.row, self.col, self.value)
    }
}

/// `¬a ∨ ¬b`: `a` and `b` are not both true.
fn not_both(a: Variable, b: Variable) -> Clause<Variable> {
    Clause::from([Literal::negative(a), Literal::negative(b)])
}

/// Every `(row, col, value)` of a `size`×`size` grid, row-major, values ascending.
#[must_use]
pub fn generate_variables(size: usize) -> Vec<Variable> {
    iproduct!(0..size, 0..size, 1..=size)
        .map(|(row, col, value)| Variable::new(row, col, value))
        .collect()
}

/// Per cell: some value holds, and no two values hold together.
fn generate_cell_clauses(size: usize) -> Vec<Clause<Variable>> {
    let mut clauses = vec![];
    for (row, col) in iproduct!(0..size, 0..size) {
        clauses.push(
            (1..=size)
                .map(|value| Literal::positive(Variable::new(row, col, value)))
                .collect(),
        );

        for (v1, v2) in (1..=size).tuple_combinations() {
            clauses.push(not_both(
                Variable::new(row, col, v1),
                Variable::new(row, col, v2),
            ));
        }
    }
    clauses
}

fn generate_row_clauses(size: usize) -> Vec<Clause<Variable>> {
    let mut clauses = vec![];
    for (row, value) in iproduct!(0..size, 1..=size) {
        for (col1, col2) in (0..size).tuple_combinations() {
            clauses.push(not_both(
                Variable::new(row, col1, value),
                Variable::new(row, col2, value),
            ));
        }
    }
    clauses
}

fn generate_col_clauses(size: usize) -> Vec<Clause<Variable>> {
    let mut clauses = vec![];
    for (col, value) in iproduct!(0..size, 1..=size) {
        for (row1, row2) in (0..size).tuple_combinations() {
            clauses.push(not_both(
                Variable::new(row1, col, value),
                Variable::new(row2, col, value),
            ));
        }
    }
    clauses
}

/// Blocks group rows in chunks of `height` and columns in chunks of `width`.
fn generate_block_clauses(rectangle: Rectangle) -> Vec<Clause<Variable>> {
    let Rectangle { height, width } = rectangle;
    let size = rectangle.size();
    let mut clauses = vec![];

    for (br, bc) in iproduct!((0..size).step_by(height), (0..size).step_by(width)) {
        let cells = iproduct!(br..br + height, bc..bc + width).collect_vec();
        for value in 1..=size {
            for (&(r1, c1), &(r2, c2)) in cells.iter().tuple_combinations() {
                clauses.push(not_both(
                    Variable::new(r1, c1, value),
                    Variable::new(r2, c2, value),
                ));
            }
        }
    }
    clauses
}

fn generate_clue_clauses(clues: &[Clue]) -> Vec<Clause<Variable>> {
    clues
        .iter()
        .map(|clue| Variable::new(clue.row, clue.col, clue.value))
        .map(|variable| Clause::from([Literal::positive(variable)]))
        .collect()
}

/// For each constraint, forbids every value pair that misses the target.
fn generate_sum_clauses(size: usize, sums: &[SumConstraint]) -> Vec<Clause<Variable>> {
    let mut clauses = vec![];
    for sum in sums {
        for (v1, v2) in iproduct!(1..=size, 1..=size) {
            if v1 + v2 != sum.target {
                clauses.push(not_both(
                    Variable::new(sum.row1, sum.col1, v1),
                    Variable::new(sum.row2, sum.col2, v2),
                ));
            }
        }
    }
    clauses
}

/// Encodes `puzzle` as a list of variables (in branching order) and a formula
/// whose models are exactly the puzzle's solutions.
///
/// # Errors
///
/// `PuzzleError` if the puzzle fails [`Puzzle::validate`]; nothing is generated.
pub fn encode(puzzle: &Puzzle) -> Result<(Vec<Variable>, Cnf<Variable>), PuzzleError> {
    puzzle.validate()?;

    let size = puzzle.size();
    let variables = generate_variables(size);

    let cnf: Cnf<Variable> = generate_cell_clauses(size)
        .into_iter()
        .chain(generate_row_clauses(size))
        .chain(generate_col_clauses(size))
        .chain(generate_block_clauses(puzzle.rectangle))
        .chain(generate_clue_clauses(&puzzle.clues))
        .chain(generate_sum_clauses(size, &puzzle.sums))
        .collect();

    debug!(
        size,
        variables = variables.len(),
        clauses = cnf.len(),
        literals = cnf.num_literals(),
        "encoded puzzle"
    );

    Ok((variables, cnf))
}
