use crate::sudoku::puzzle::Puzzle;
use itertools::Itertools;
use std::fmt::{Display, Formatter};

/// An N×N grid of values `1..=N`, with `0` for an unfilled cell.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Grid(Vec<Vec<usize>>);

impl Grid {
    #[must_use]
    pub const fn new(rows: Vec<Vec<usize>>) -> Self {
        Self(rows)
    }

    /// An all-zero `size`×`size` grid.
    #[must_use]
    pub fn empty(size: usize) -> Self {
        Self(vec![vec![0; size]; size])
    }

    /// The puzzle's clues on an otherwise empty grid. Out-of-range clues are skipped.
    #[must_use]
    pub fn from_clues(puzzle: &Puzzle) -> Self {
        let mut grid = Self::empty(puzzle.size());
        for clue in &puzzle.clues {
            grid.set(clue.row, clue.col, clue.value);
        }
        grid
    }

    /// Number of rows.
    #[must_use]
    pub fn size(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn get(&self, row: usize, col: usize) -> Option<usize> {
        self.0.get(row)?.get(col).copied()
    }

    /// Writes `value` at `(row, col)`; returns `false` if the cell is off the grid.
    pub fn set(&mut self, row: usize, col: usize, value: usize) -> bool {
        match self.0.get_mut(row).and_then(|r| r.get_mut(col)) {
            Some(cell) => {
                *cell = value;
                true
            }
            None => false,
        }
    }

    pub fn rows(&self) -> impl Iterator<Item = &[usize]> {
        self.0.iter().map(Vec::as_slice)
    }

    /// Column `col`, treating missing cells as 0.
    pub fn column(&self, col: usize) -> impl Iterator<Item = usize> + '_ {
        self.0.iter().map(move |r| r.get(col).copied().unwrap_or(0))
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.0.iter().flatten().all(|&v| v != 0)
    }
}

impl From<Vec<Vec<usize>>> for Grid {
    fn from(rows: Vec<Vec<usize>>) -> Self {
        Self::new(rows)
    }
}

impl From<Grid> for Vec<Vec<usize>> {
    fn from(grid: Grid) -> Self {
        grid.0
    }
}

impl<const N: usize> From<[[usize; N]; N]> for Grid {
    fn from(rows: [[usize; N]; N]) -> Self {
        Self::new(rows.iter().map(|r| r.to_vec()).collect())
    }
}

impl Display for Grid {
    /// One row per line, unfilled cells as `.`, columns right-aligned.
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let width = self.size().to_string().len();
        for row in &self.0 {
            let line = row
                .iter()
                .map(|&v| {
                    if v == 0 {
                        format!("{:>width$}", ".")
                    } else {
                        format!("{v:>width$}")
                    }
                })
                .join(" ");
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_set() {
        let mut grid = Grid::empty(3);
        assert!(grid.set(1, 2, 3));
        assert!(!grid.set(3, 0, 1));
        assert_eq!(grid.get(1, 2), Some(3));
        assert_eq!(grid.get(0, 0), Some(0));
        assert_eq!(grid.get(0, 3), None);
        assert!(!grid.is_complete());
    }

    #[test]
    fn test_column() {
        let grid = Grid::from([[1, 2], [2, 1]]);
        assert_eq!(grid.column(1).collect::<Vec<_>>(), vec![2, 1]);
        assert!(grid.is_complete());
    }

    #[test]
    fn test_display_pads_wide_grids() {
        let mut grid = Grid::empty(10);
        grid.set(0, 0, 10);
        grid.set(0, 1, 7);
        let first = grid.to_string().lines().next().unwrap().to_string();
        assert!(first.starts_with("10  7  ."));
    }
}
