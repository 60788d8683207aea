//! Independent check of a grid against a puzzle, straight from the rules and
//! without going through the CNF encoding.

use crate::sudoku::grid::Grid;
use crate::sudoku::puzzle::Puzzle;
use itertools::{Itertools, iproduct};
use thiserror::Error;

/// The first rule a grid breaks.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Violation {
    #[error("grid has {rows} rows, expected {expected}")]
    WrongHeight { rows: usize, expected: usize },

    #[error("row {row} has {len} cells, expected {expected}")]
    WrongWidth {
        row: usize,
        len: usize,
        expected: usize,
    },

    #[error("row {0} is invalid")]
    Row(usize),

    #[error("column {0} is invalid")]
    Column(usize),

    #[error("box starting at ({row}, {col}) is invalid")]
    Block { row: usize, col: usize },

    #[error("clue at ({row}, {col}) mismatched: expected {expected}, got {actual}")]
    Clue {
        row: usize,
        col: usize,
        expected: usize,
        actual: usize,
    },

    #[error("cells ({row1}, {col1}) and ({row2}, {col2}) sum to {actual}, expected {target}")]
    Sum {
        row1: usize,
        col1: usize,
        row2: usize,
        col2: usize,
        target: usize,
        actual: usize,
    },
}

/// Whether `values` is a permutation of `1..=n`.
fn is_permutation(values: impl Iterator<Item = usize>, n: usize) -> bool {
    values.sorted_unstable().eq(1..=n)
}

/// Checks shape, rows, columns, blocks, clues and sums, in that order.
///
/// # Errors
///
/// The first [`Violation`] found.
pub fn validate(puzzle: &Puzzle, grid: &Grid) -> Result<(), Violation> {
    let n = puzzle.size();
    let (height, width) = (puzzle.rectangle.height, puzzle.rectangle.width);

    if grid.size() != n {
        return Err(Violation::WrongHeight {
            rows: grid.size(),
            expected: n,
        });
    }
    if let Some((row, cells)) = grid.rows().find_position(|r| r.len() != n) {
        return Err(Violation::WrongWidth {
            row,
            len: cells.len(),
            expected: n,
        });
    }

    if let Some((row, _)) = grid
        .rows()
        .find_position(|r| !is_permutation(r.iter().copied(), n))
    {
        return Err(Violation::Row(row));
    }

    if let Some(col) = (0..n).find(|&c| !is_permutation(grid.column(c), n)) {
        return Err(Violation::Column(col));
    }

    if height > 0 && width > 0 {
        for (row, col) in iproduct!((0..n).step_by(height), (0..n).step_by(width)) {
            let values = iproduct!(row..row + height, col..col + width)
                .map(|(r, c)| grid.get(r, c).unwrap_or(0));
            if !is_permutation(values, n) {
                return Err(Violation::Block { row, col });
            }
        }
    }

    for clue in &puzzle.clues {
        let actual = grid.get(clue.row, clue.col).unwrap_or(0);
        if actual != clue.value {
            return Err(Violation::Clue {
                row: clue.row,
                col: clue.col,
                expected: clue.value,
                actual,
            });
        }
    }

    for sum in &puzzle.sums {
        let actual = sum
            .cells()
            .iter()
            .map(|&(row, col)| grid.get(row, col).unwrap_or(0))
            .sum::<usize>();
        if actual != sum.target {
            return Err(Violation::Sum {
                row1: sum.row1,
                col1: sum.col1,
                row2: sum.row2,
                col2: sum.col2,
                target: sum.target,
                actual,
            });
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sudoku::puzzle::{Clue, Rectangle, SumConstraint};

    fn solved() -> Grid {
        Grid::from([[1, 2, 3, 4], [3, 4, 1, 2], [2, 1, 4, 3], [4, 3, 2, 1]])
    }

    fn puzzle() -> Puzzle {
        Puzzle::new(
            Rectangle::new(2, 2),
            vec![Clue::new(0, 0, 1), Clue::new(3, 3, 1)],
            vec![SumConstraint::new(0, 0, 0, 1, 3)],
        )
    }

    #[test]
    fn test_accepts_solution() {
        assert_eq!(validate(&puzzle(), &solved()), Ok(()));
    }

    #[test]
    fn test_wrong_shape() {
        assert_eq!(
            validate(&puzzle(), &Grid::empty(3)),
            Err(Violation::WrongHeight {
                rows: 3,
                expected: 4
            })
        );

        let ragged = Grid::new(vec![vec![1, 2, 3, 4], vec![1, 2]]);
        let p = Puzzle::new(Rectangle::new(1, 2), vec![], vec![]);
        assert_eq!(
            validate(&p, &ragged),
            Err(Violation::WrongWidth {
                row: 0,
                len: 4,
                expected: 2
            })
        );
    }

    #[test]
    fn test_bad_row() {
        let grid = Grid::from([[1, 1, 3, 4], [3, 4, 1, 2], [2, 1, 4, 3], [4, 3, 2, 1]]);
        assert_eq!(validate(&puzzle(), &grid), Err(Violation::Row(0)));
    }

    #[test]
    fn test_bad_column() {
        let grid = Grid::from([[1, 2, 3, 4], [2, 3, 4, 1], [3, 4, 1, 2], [1, 2, 3, 4]]);
        // Rows are fine, column 0 repeats 1.
        assert_eq!(validate(&puzzle(), &grid), Err(Violation::Column(0)));
    }

    #[test]
    fn test_bad_block() {
        let grid = Grid::from([[1, 2, 3, 4], [2, 3, 4, 1], [3, 4, 1, 2], [4, 1, 2, 3]]);
        assert_eq!(validate(&puzzle(), &grid), Err(Violation::Block { row: 0, col: 0 }));
    }

    #[test]
    fn test_bad_clue() {
        let p = Puzzle::new(Rectangle::new(2, 2), vec![Clue::new(1, 1, 3)], vec![]);
        assert_eq!(
            validate(&p, &solved()),
            Err(Violation::Clue {
                row: 1,
                col: 1,
                expected: 3,
                actual: 4
            })
        );
    }

    #[test]
    fn test_bad_sum() {
        let p = Puzzle::new(
            Rectangle::new(2, 2),
            vec![],
            vec![SumConstraint::new(2, 2, 3, 2, 5)],
        );
        let err = validate(&p, &solved()).unwrap_err();
        assert_eq!(
            err,
            Violation::Sum {
                row1: 2,
                col1: 2,
                row2: 3,
                col2: 2,
                target: 5,
                actual: 6
            }
        );
        assert_eq!(err.to_string(), "cells (2, 2) and (3, 2) sum to 6, expected 5");
    }
}
