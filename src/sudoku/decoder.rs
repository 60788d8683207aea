use crate::sat::assignment::Assignment;
use crate::sudoku::encoder::Variable;
use crate::sudoku::grid::Grid;
use crate::sudoku::puzzle::Puzzle;

/// Reads a grid off a model: every variable assigned `true` writes its value
/// into its cell.
///
/// Cells with no true variable stay 0, and variables off the grid are ignored.
/// No checking happens here; the grid is only a solution if `assignment`
/// satisfies the puzzle's encoding.
#[must_use]
pub fn decode(variables: &[Variable], assignment: &Assignment<Variable>, puzzle: &Puzzle) -> Grid {
    let mut grid = Grid::empty(puzzle.size());
    for &variable in variables {
        if assignment.var_value(variable) == Some(true) {
            grid.set(variable.row, variable.col, variable.value);
        }
    }
    grid
}
