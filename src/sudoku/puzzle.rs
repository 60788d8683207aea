//! Puzzle description and its text file format.
//!
//! ```text
//! c 4x4 grid in 2x2 blocks
//! rect 2 2
//! clue 0 0 1
//! sum 0 1 1 1 7
//! ```
//!
//! Rows and columns are 0-indexed, values 1-indexed. Lines whose first word is
//! `c`, lines starting with `#`, and blank lines are ignored.

use crate::sudoku::grid::Grid;
use std::fmt::{Display, Formatter};
use std::io;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PuzzleError {
    #[error("rectangle dimensions must be positive and indexable, got {height}x{width}")]
    InvalidDimensions { height: usize, width: usize },

    #[error("a {height}x{width} rectangle does not tile a {size}x{size} grid")]
    Untileable {
        height: usize,
        width: usize,
        size: usize,
    },

    #[error("clue {index} at ({row}, {col}) lies outside the {size}x{size} grid")]
    ClueOutOfRange {
        index: usize,
        row: usize,
        col: usize,
        size: usize,
    },

    #[error("clue {index} at ({row}, {col}) has value {value}, expected 1..={size}")]
    ClueValueOutOfRange {
        index: usize,
        row: usize,
        col: usize,
        value: usize,
        size: usize,
    },

    #[error("sum constraint {index} names ({row}, {col}), outside the {size}x{size} grid")]
    SumOutOfRange {
        index: usize,
        row: usize,
        col: usize,
        size: usize,
    },

    #[error("line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("missing `rect <height> <width>` line")]
    MissingRectangle,

    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Block shape. The grid is `height * width` cells on a side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rectangle {
    pub height: usize,
    pub width: usize,
}

impl Rectangle {
    #[must_use]
    pub const fn new(height: usize, width: usize) -> Self {
        Self { height, width }
    }

    /// Grid side length, `None` on overflow.
    #[must_use]
    pub const fn checked_size(self) -> Option<usize> {
        self.height.checked_mul(self.width)
    }

    /// Grid side length. Only meaningful once the puzzle has been validated.
    #[must_use]
    pub const fn size(self) -> usize {
        self.height.saturating_mul(self.width)
    }
}

/// A pre-filled cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Clue {
    pub row: usize,
    pub col: usize,
    pub value: usize,
}

impl Clue {
    #[must_use]
    pub const fn new(row: usize, col: usize, value: usize) -> Self {
        Self { row, col, value }
    }
}

/// Two cells whose values must add up to `target`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SumConstraint {
    pub row1: usize,
    pub col1: usize,
    pub row2: usize,
    pub col2: usize,
    pub target: usize,
}

impl SumConstraint {
    #[must_use]
    pub const fn new(row1: usize, col1: usize, row2: usize, col2: usize, target: usize) -> Self {
        Self {
            row1,
            col1,
            row2,
            col2,
            target,
        }
    }

    #[must_use]
    pub const fn cells(&self) -> [(usize, usize); 2] {
        [(self.row1, self.col1), (self.row2, self.col2)]
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Puzzle {
    pub rectangle: Rectangle,
    pub clues: Vec<Clue>,
    pub sums: Vec<SumConstraint>,
}

impl Puzzle {
    #[must_use]
    pub const fn new(rectangle: Rectangle, clues: Vec<Clue>, sums: Vec<SumConstraint>) -> Self {
        Self {
            rectangle,
            clues,
            sums,
        }
    }

    /// Grid side length `N`.
    #[must_use]
    pub const fn size(&self) -> usize {
        self.rectangle.size()
    }

    /// Checks dimensions and that every clue and sum lies on the grid.
    ///
    /// # Errors
    ///
    /// The first problem found: dimensions, then clues in order, then sums in order.
    pub fn validate(&self) -> Result<(), PuzzleError> {
        let Rectangle { height, width } = self.rectangle;
        let size = match self.rectangle.checked_size() {
            // N^3 variables must stay addressable.
            Some(size) if height > 0 && width > 0 && size.checked_pow(3).is_some() => size,
            _ => return Err(PuzzleError::InvalidDimensions { height, width }),
        };

        if size % height != 0 || size % width != 0 {
            return Err(PuzzleError::Untileable {
                height,
                width,
                size,
            });
        }

        for (index, clue) in self.clues.iter().enumerate() {
            if clue.row >= size || clue.col >= size {
                return Err(PuzzleError::ClueOutOfRange {
                    index,
                    row: clue.row,
                    col: clue.col,
                    size,
                });
            }
            if !(1..=size).contains(&clue.value) {
                return Err(PuzzleError::ClueValueOutOfRange {
                    index,
                    row: clue.row,
                    col: clue.col,
                    value: clue.value,
                    size,
                });
            }
        }

        for (index, sum) in self.sums.iter().enumerate() {
            if let Some(&(row, col)) = sum
                .cells()
                .iter()
                .find(|&&(row, col)| row >= size || col >= size)
            {
                return Err(PuzzleError::SumOutOfRange {
                    index,
                    row,
                    col,
                    size,
                });
            }
        }

        Ok(())
    }
}

fn parse_fields<const N: usize>(
    line: usize,
    keyword: &str,
    rest: &[&str],
) -> Result<[usize; N], PuzzleError> {
    if rest.len() != N {
        return Err(PuzzleError::Parse {
            line,
            message: format!("`{keyword}` takes {N} numbers, got {}", rest.len()),
        });
    }

    let mut out = [0; N];
    for (slot, token) in out.iter_mut().zip(rest) {
        *slot = token.parse().map_err(|e| PuzzleError::Parse {
            line,
            message: format!("`{token}` is not a non-negative integer: {e}"),
        })?;
    }
    Ok(out)
}

impl FromStr for Puzzle {
    type Err = PuzzleError;

    /// Parses the line format described in the module docs. Range checks are
    /// left to [`Puzzle::validate`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut rectangle = None;
        let mut clues = Vec::new();
        let mut sums = Vec::new();

        for (i, raw) in s.lines().enumerate() {
            let line = i + 1;
            let tokens: Vec<&str> = raw.split_whitespace().collect();

            match tokens.split_first() {
                None => {}
                Some((first, _)) if *first == "c" || first.starts_with('#') => {}
                Some((&"rect", rest)) => {
                    if rectangle.is_some() {
                        return Err(PuzzleError::Parse {
                            line,
                            message: "duplicate `rect` line".to_string(),
                        });
                    }
                    let [height, width] = parse_fields(line, "rect", rest)?;
                    rectangle = Some(Rectangle::new(height, width));
                }
                Some((&"clue", rest)) => {
                    let [row, col, value] = parse_fields(line, "clue", rest)?;
                    clues.push(Clue::new(row, col, value));
                }
                Some((&"sum", rest)) => {
                    let [row1, col1, row2, col2, target] = parse_fields(line, "sum", rest)?;
                    sums.push(SumConstraint::new(row1, col1, row2, col2, target));
                }
                Some((other, _)) => {
                    return Err(PuzzleError::Parse {
                        line,
                        message: format!("unknown directive `{other}`"),
                    });
                }
            }
        }

        let rectangle = rectangle.ok_or(PuzzleError::MissingRectangle)?;
        Ok(Self::new(rectangle, clues, sums))
    }
}

/// Reads and parses a puzzle file.
///
/// # Errors
///
/// I/O failures and malformed lines.
pub fn parse_puzzle_file(path: impl AsRef<Path>) -> Result<Puzzle, PuzzleError> {
    std::fs::read_to_string(path)?.parse()
}

impl Display for Puzzle {
    /// The clue grid, followed by one line per sum constraint. The grid is left
    /// out for puzzles that fail [`Puzzle::validate`].
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "{0}x{0} grid, {1}x{2} blocks",
            self.size(),
            self.rectangle.height,
            self.rectangle.width
        )?;
        if self.validate().is_ok() {
            write!(f, "{}", Grid::from_clues(self))?;
        }
        for sum in &self.sums {
            writeln!(
                f,
                "({}, {}) + ({}, {}) = {}",
                sum.row1, sum.col1, sum.row2, sum.col2, sum.target
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        let puzzle: Puzzle = "c example\n\
                              rect 2 3\n\
                              \n\
                              # clues\n\
                              clue 0 0 1\n\
                              clue 5 5 6\n\
                              sum 0 1 0 2 7\n"
            .parse()
            .unwrap();

        assert_eq!(puzzle.rectangle, Rectangle::new(2, 3));
        assert_eq!(puzzle.size(), 6);
        assert_eq!(puzzle.clues, vec![Clue::new(0, 0, 1), Clue::new(5, 5, 6)]);
        assert_eq!(puzzle.sums, vec![SumConstraint::new(0, 1, 0, 2, 7)]);
        assert!(puzzle.validate().is_ok());
    }

    #[test]
    fn test_parse_missing_rect() {
        let err = "clue 0 0 1".parse::<Puzzle>().unwrap_err();
        assert!(matches!(err, PuzzleError::MissingRectangle));
    }

    #[test]
    fn test_parse_bad_arity() {
        let err = "rect 2 2\nclue 0 1".parse::<Puzzle>().unwrap_err();
        assert!(matches!(err, PuzzleError::Parse { line: 2, .. }));
    }

    #[test]
    fn test_parse_bad_number() {
        let err = "rect 2 -2".parse::<Puzzle>().unwrap_err();
        assert!(matches!(err, PuzzleError::Parse { line: 1, .. }));
    }

    #[test]
    fn test_parse_unknown_directive() {
        let err = "rect 2 2\ncage 0 0".parse::<Puzzle>().unwrap_err();
        assert_eq!(err.to_string(), "line 2: unknown directive `cage`");
    }

    #[test]
    fn test_parse_duplicate_rect() {
        let err = "rect 2 2\nrect 1 2".parse::<Puzzle>().unwrap_err();
        assert!(matches!(err, PuzzleError::Parse { line: 2, .. }));
    }

    #[test]
    fn test_validate_dimensions() {
        let puzzle = Puzzle::new(Rectangle::new(0, 3), vec![], vec![]);
        assert!(matches!(
            puzzle.validate(),
            Err(PuzzleError::InvalidDimensions { height: 0, width: 3 })
        ));

        let puzzle = Puzzle::new(Rectangle::new(usize::MAX, 2), vec![], vec![]);
        assert!(matches!(
            puzzle.validate(),
            Err(PuzzleError::InvalidDimensions { .. })
        ));
    }

    #[test]
    fn test_validate_clues() {
        let puzzle = Puzzle::new(Rectangle::new(2, 2), vec![Clue::new(1, 4, 1)], vec![]);
        assert!(matches!(
            puzzle.validate(),
            Err(PuzzleError::ClueOutOfRange { index: 0, row: 1, col: 4, size: 4 })
        ));

        let puzzle = Puzzle::new(
            Rectangle::new(2, 2),
            vec![Clue::new(0, 0, 1), Clue::new(1, 1, 0)],
            vec![],
        );
        assert!(matches!(
            puzzle.validate(),
            Err(PuzzleError::ClueValueOutOfRange { index: 1, value: 0, .. })
        ));
    }

    #[test]
    fn test_validate_sums() {
        let puzzle = Puzzle::new(
            Rectangle::new(1, 2),
            vec![],
            vec![SumConstraint::new(0, 0, 2, 0, 3)],
        );
        assert!(matches!(
            puzzle.validate(),
            Err(PuzzleError::SumOutOfRange { index: 0, row: 2, col: 0, size: 2 })
        ));
    }

    #[test]
    fn test_display() {
        let puzzle = Puzzle::new(
            Rectangle::new(1, 2),
            vec![Clue::new(0, 0, 1)],
            vec![SumConstraint::new(0, 0, 0, 1, 3)],
        );
        assert_eq!(
            puzzle.to_string(),
            "2x2 grid, 1x2 blocks\n1 .\n. .\n(0, 0) + (0, 1) = 3\n"
        );
    }

    #[test]
    fn test_display_skips_grid_of_invalid_puzzle() {
        let puzzle = Puzzle::new(Rectangle::new(1 << 20, 1 << 20), vec![], vec![]);
        assert!(puzzle.validate().is_err());
        assert_eq!(
            puzzle.to_string(),
            "1099511627776x1099511627776 grid, 1048576x1048576 blocks\n"
        );
    }
}
