#![allow(clippy::cast_precision_loss)]

use clap::{Args, Parser, Subcommand};
use itertools::Itertools;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};
use std::time::Duration;
use sudoku_sat::harness::{DEFAULT_TIMEOUT, HarnessError, Outcome, Report, solve_with_timeout};
use sudoku_sat::sat::solver::{SolverError, SolverType};
use sudoku_sat::sudoku::encoder::{Variable, encode};
use sudoku_sat::sudoku::grid::Grid;
use sudoku_sat::sudoku::puzzle::{Puzzle, PuzzleError, parse_puzzle_file};
use sudoku_sat::sudoku::validator::{Violation, validate};
use thiserror::Error;
use tikv_jemalloc_ctl::{epoch, stats};
use tracing::{info, warn};

/// Extension of puzzle files picked up by `batch`.
pub(crate) const PUZZLE_EXTENSION: &str = "puzzle";

/// Command-line interface of the sudoku solver.
#[derive(Parser, Debug)]
#[command(
    name = "sudoku-sat",
    version,
    about = "Solves sudoku variants with sum constraints through a DPLL SAT solver"
)]
pub(crate) struct Cli {
    /// Verbosity level (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub(crate) enum Commands {
    /// Solve a single puzzle file.
    Solve {
        /// Path to the puzzle file (`rect`, `clue` and `sum` lines).
        path: PathBuf,

        /// Write the generated CNF in DIMACS format to `<path>.cnf`.
        #[arg(short, long, default_value_t = false)]
        export_dimacs: bool,

        #[command(flatten)]
        common: CommonOptions,
    },

    /// Solve every `.puzzle` file under a directory and summarise the results.
    ///
    /// A puzzle that times out leaves its worker searching in the background
    /// until the process exits, so it competes for CPU with later puzzles.
    Batch {
        /// Directory to walk.
        dir: PathBuf,

        #[command(flatten)]
        common: CommonOptions,
    },

    /// Generate shell completion scripts.
    Completions {
        /// The shell to generate completions for.
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// Options shared by `solve` and `batch`.
#[derive(Args, Debug, Clone)]
#[allow(clippy::struct_excessive_bools)]
pub(crate) struct CommonOptions {
    /// Search procedure.
    #[arg(long, value_enum, default_value_t = SolverType::Dpll)]
    pub(crate) solver: SolverType,

    /// Wall-clock budget in seconds across encode, solve and decode. 0 disables it.
    #[arg(short, long, default_value_t = DEFAULT_TIMEOUT.as_secs())]
    pub(crate) timeout: u64,

    /// Check the model against the formula and the grid against the puzzle rules.
    #[arg(long, default_value_t = false)]
    pub(crate) verify: bool,

    /// Print problem and search statistics.
    #[arg(short, long, default_value_t = false)]
    pub(crate) stats: bool,

    /// Print the cell assignments of the solution alongside the grid.
    #[arg(short, long, default_value_t = false)]
    pub(crate) print_solution: bool,
}

impl Default for CommonOptions {
    fn default() -> Self {
        Self {
            solver: SolverType::default(),
            timeout: DEFAULT_TIMEOUT.as_secs(),
            verify: false,
            stats: false,
            print_solution: false,
        }
    }
}

impl CommonOptions {
    pub(crate) const fn budget(&self) -> Option<Duration> {
        if self.timeout == 0 {
            None
        } else {
            Some(Duration::from_secs(self.timeout))
        }
    }
}

#[derive(Debug, Error)]
pub(crate) enum CliError {
    #[error("{path}: {source}")]
    Puzzle {
        path: PathBuf,
        #[source]
        source: PuzzleError,
    },

    #[error("could not export DIMACS: {0}")]
    Dimacs(#[from] SolverError),

    #[error("unable to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("not a directory: {0}")]
    NotADirectory(PathBuf),

    #[error("model does not satisfy the generated formula")]
    ModelRejected,

    #[error("solution failed verification: {0}")]
    Verification(#[from] Violation),

    #[error(transparent)]
    Harness(#[from] HarnessError),
}

/// How one puzzle ended, as counted by `batch`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Verdict {
    Correct,
    Incorrect,
    Unsatisfiable,
    TimedOut,
    Error,
}

/// Tally of a `batch` run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) struct BatchSummary {
    pub correct: usize,
    pub incorrect: usize,
    pub unsatisfiable: usize,
    pub timed_out: usize,
    pub errors: usize,
}

impl BatchSummary {
    pub(crate) const fn record(&mut self, verdict: Verdict) {
        match verdict {
            Verdict::Correct => self.correct += 1,
            Verdict::Incorrect => self.incorrect += 1,
            Verdict::Unsatisfiable => self.unsatisfiable += 1,
            Verdict::TimedOut => self.timed_out += 1,
            Verdict::Error => self.errors += 1,
        }
    }

    pub(crate) const fn total(&self) -> usize {
        self.correct + self.incorrect + self.unsatisfiable + self.timed_out + self.errors
    }
}

impl Display for BatchSummary {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} puzzles: {} correct, {} incorrect, {} unsatisfiable, {} timed out, {} errors",
            self.total(),
            self.correct,
            self.incorrect,
            self.unsatisfiable,
            self.timed_out,
            self.errors
        )
    }
}

/// Reads, parses and validates a puzzle file.
fn load(path: &Path) -> Result<Puzzle, CliError> {
    parse_puzzle_file(path)
        .and_then(|puzzle| puzzle.validate().map(|()| puzzle))
        .map_err(|source| CliError::Puzzle {
            path: path.to_path_buf(),
            source,
        })
}

/// Writes the puzzle's CNF next to it as `<path>.cnf`, variables numbered from 1
/// in generation order.
pub(crate) fn export_dimacs(path: &Path, puzzle: &Puzzle) -> Result<PathBuf, CliError> {
    let (variables, cnf) = encode(puzzle).map_err(|source| CliError::Puzzle {
        path: path.to_path_buf(),
        source,
    })?;
    let dimacs = cnf.to_dimacs(&variables)?;

    let mut target = path.as_os_str().to_owned();
    target.push(".cnf");
    let target = PathBuf::from(target);
    std::fs::write(&target, dimacs).map_err(|source| CliError::Write {
        path: target.clone(),
        source,
    })?;
    Ok(target)
}

/// Checks a solved run: the model against the formula, the grid against the rules.
pub(crate) fn verify_solution(
    puzzle: &Puzzle,
    grid: &Grid,
    report: &Report,
) -> Result<(), CliError> {
    if !report.model_verified {
        return Err(CliError::ModelRejected);
    }
    Ok(validate(puzzle, grid)?)
}

/// Solve a puzzle file and print the outcome.
///
/// # Errors
///
/// If the file can't be read or parsed, the puzzle is invalid, or `--verify`
/// rejects the solution.
pub(crate) fn solve_puzzle_file(
    path: &Path,
    export: bool,
    common: &CommonOptions,
) -> Result<(), CliError> {
    let puzzle = load(path)?;
    println!("Parsed puzzle:\n{puzzle}");

    if export {
        let target = export_dimacs(path, &puzzle)?;
        println!("DIMACS written to: {}", target.display());
    }

    let outcome = solve_with_timeout(&puzzle, common.solver, common.budget());

    match outcome {
        Outcome::Solved { grid, report } => {
            if common.verify {
                verify_solution(&puzzle, &grid, &report)?;
                println!("Verified: true");
            }
            if common.stats {
                print_stats(&report, common.solver);
            }
            println!("Solution:\n{grid}");
            if common.print_solution {
                println!("Cells: {}", cell_assignments(&grid));
            }
            println!("SATISFIABLE");
        }
        Outcome::Unsatisfiable { report } => {
            if common.stats {
                print_stats(&report, common.solver);
            }
            println!("UNSATISFIABLE");
        }
        Outcome::TimedOut { stage } => {
            println!("TIMEOUT during {stage}");
        }
        Outcome::Invalid(source) => {
            return Err(CliError::Puzzle {
                path: path.to_path_buf(),
                source,
            });
        }
        Outcome::Failed(e) => return Err(e.into()),
    }
    Ok(())
}

fn judge(path: &Path, common: &CommonOptions) -> Verdict {
    let puzzle = match load(path) {
        Ok(puzzle) => puzzle,
        Err(e) => {
            warn!("{e}");
            return Verdict::Error;
        }
    };

    match solve_with_timeout(&puzzle, common.solver, common.budget()) {
        Outcome::Solved { grid, report } => match verify_solution(&puzzle, &grid, &report) {
            Ok(()) => {
                if common.print_solution {
                    println!("{grid}");
                }
                Verdict::Correct
            }
            Err(e) => {
                warn!(path = %path.display(), "{e}");
                Verdict::Incorrect
            }
        },
        Outcome::Unsatisfiable { .. } => Verdict::Unsatisfiable,
        Outcome::TimedOut { .. } => Verdict::TimedOut,
        Outcome::Invalid(e) => {
            warn!(path = %path.display(), "{e}");
            Verdict::Error
        }
        Outcome::Failed(e) => {
            warn!(path = %path.display(), "{e}");
            Verdict::Error
        }
    }
}

/// Solves every `.puzzle` file under `dir`, in path order.
///
/// # Errors
///
/// If `dir` is not a directory. Per-file problems are counted, not returned.
pub(crate) fn solve_dir(dir: &Path, common: &CommonOptions) -> Result<BatchSummary, CliError> {
    if !dir.is_dir() {
        return Err(CliError::NotADirectory(dir.to_path_buf()));
    }

    let mut summary = BatchSummary::default();
    for entry in walkdir::WalkDir::new(dir)
        .sort_by_file_name()
        .into_iter()
        .filter_map(Result::ok)
    {
        let path = entry.path();
        if !entry.file_type().is_file()
            || path.extension().is_none_or(|ext| ext != PUZZLE_EXTENSION)
        {
            continue;
        }

        let verdict = judge(path, common);
        println!("{}: {verdict:?}", path.display());
        summary.record(verdict);
    }

    info!(%summary, "batch finished");
    Ok(summary)
}

/// `(row,col)=value` for every filled cell, row-major.
pub(crate) fn cell_assignments(grid: &Grid) -> String {
    grid.rows()
        .enumerate()
        .flat_map(|(row, cells)| {
            cells
                .iter()
                .enumerate()
                .filter(|&(_, &value)| value != 0)
                .map(move |(col, &value)| Variable::new(row, col, value))
        })
        .join(" ")
}

/// Allocated and resident memory in MiB, if jemalloc reports them.
fn memory_usage() -> Option<(f64, f64)> {
    epoch::advance().ok()?;
    let allocated = stats::allocated::read().ok()?;
    let resident = stats::resident::read().ok()?;
    Some((
        allocated as f64 / (1024.0 * 1024.0),
        resident as f64 / (1024.0 * 1024.0),
    ))
}

pub(crate) fn stat_line(label: &str, value: impl Display) {
    println!("|  {label:<28} {value:>18}  |");
}

/// A count followed by its rate per second of search.
pub(crate) fn stat_line_with_rate(label: &str, value: usize, elapsed: f64) {
    let rate = if elapsed > 0.0 {
        value as f64 / elapsed
    } else {
        0.0
    };
    println!("|  {label:<20} {value:>12} ({rate:>9.0}/sec)  |");
}

pub(crate) fn print_stats(report: &Report, solver: SolverType) {
    let solve_secs = report.timings.solve.as_secs_f64();

    println!("\n=======================[ Problem Statistics ]=========================");
    stat_line("Encode time (s)", format!("{:.3}", report.timings.encode.as_secs_f64()));
    stat_line("Variables", report.variables);
    stat_line("Clauses", report.clauses);
    stat_line("Literals", report.literals);

    println!("========================[ Search Statistics ]========================");
    stat_line("Solver", solver);
    stat_line_with_rate("Decisions", report.stats.decisions, solve_secs);
    stat_line_with_rate("Propagations", report.stats.propagations, solve_secs);
    stat_line_with_rate("Conflicts", report.stats.conflicts, solve_secs);
    match memory_usage() {
        Some((allocated, resident)) => {
            stat_line("Memory usage (MiB)", format!("{allocated:.2}"));
            stat_line("Resident memory (MiB)", format!("{resident:.2}"));
        }
        None => stat_line("Memory usage (MiB)", "n/a"),
    }
    stat_line("Solve time (s)", format!("{solve_secs:.3}"));
    stat_line("Total time (s)", format!("{:.3}", report.timings.total().as_secs_f64()));
    println!("=====================================================================");
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_solve() {
        let cli = Cli::try_parse_from([
            "sudoku-sat",
            "-vv",
            "solve",
            "grid.puzzle",
            "--solver",
            "branching",
            "--timeout",
            "5",
            "--export-dimacs",
        ])
        .unwrap();

        assert_eq!(cli.verbose, 2);
        let Commands::Solve {
            path,
            export_dimacs,
            common,
        } = cli.command
        else {
            panic!("expected solve");
        };
        assert_eq!(path, PathBuf::from("grid.puzzle"));
        assert!(export_dimacs);
        assert_eq!(common.solver, SolverType::Branching);
        assert_eq!(common.budget(), Some(Duration::from_secs(5)));
        assert!(!common.verify);
    }

    #[test]
    fn test_parse_batch_defaults() {
        let cli = Cli::try_parse_from(["sudoku-sat", "batch", "puzzles"]).unwrap();
        let Commands::Batch { dir, common } = cli.command else {
            panic!("expected batch");
        };
        assert_eq!(dir, PathBuf::from("puzzles"));
        assert_eq!(common.solver, SolverType::Dpll);
        assert_eq!(common.budget(), Some(DEFAULT_TIMEOUT));
    }

    #[test]
    fn test_zero_timeout_disables_budget() {
        let common = CommonOptions {
            timeout: 0,
            ..CommonOptions::default()
        };
        assert_eq!(common.budget(), None);
    }

    #[test]
    fn test_unknown_solver_rejected() {
        assert!(Cli::try_parse_from(["sudoku-sat", "solve", "p", "--solver", "cdcl"]).is_err());
    }

    #[test]
    fn test_cell_assignments() {
        let grid = Grid::from([[1, 2], [0, 1]]);
        assert_eq!(cell_assignments(&grid), "(0,0)=1 (0,1)=2 (1,1)=1");
    }

    #[test]
    fn test_batch_summary() {
        let mut summary = BatchSummary::default();
        summary.record(Verdict::Correct);
        summary.record(Verdict::Correct);
        summary.record(Verdict::TimedOut);
        summary.record(Verdict::Unsatisfiable);
        assert_eq!(
            summary.to_string(),
            "4 puzzles: 2 correct, 0 incorrect, 1 unsatisfiable, 1 timed out, 0 errors"
        );
    }

    #[test]
    fn test_solve_dir() {
        let dir = std::env::temp_dir().join(format!("sudoku-sat-batch-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("a.puzzle"), "rect 1 2\nclue 0 0 1\n").unwrap();
        std::fs::write(dir.join("b.puzzle"), "rect 1 2\nclue 0 0 1\nclue 0 0 2\n").unwrap();
        std::fs::write(dir.join("c.puzzle"), "rect 2 2\nclue 9 9 1\n").unwrap();
        std::fs::write(dir.join("notes.txt"), "ignored").unwrap();

        let summary = solve_dir(&dir, &CommonOptions::default()).unwrap();
        std::fs::remove_dir_all(&dir).unwrap();

        assert_eq!(
            summary,
            BatchSummary {
                correct: 1,
                unsatisfiable: 1,
                errors: 1,
                ..BatchSummary::default()
            }
        );
    }

    #[test]
    fn test_oversized_rect_is_rejected_before_printing() {
        let path = std::env::temp_dir()
            .join(format!("sudoku-sat-oversized-{}.puzzle", std::process::id()));
        std::fs::write(&path, "rect 1048576 1048576\n").unwrap();

        let result = solve_puzzle_file(&path, false, &CommonOptions::default());
        std::fs::remove_file(&path).unwrap();

        assert!(matches!(
            result,
            Err(CliError::Puzzle {
                source: PuzzleError::InvalidDimensions { .. },
                ..
            })
        ));
    }

    #[test]
    fn test_harness_error_keeps_source() {
        let err = CliError::from(HarnessError::Solver(SolverError::NoVariables));
        assert!(matches!(err, CliError::Harness(HarnessError::Solver(_))));
        assert_eq!(err.to_string(), "the variable list is empty");
    }

    #[test]
    fn test_solve_dir_rejects_file() {
        assert!(matches!(
            solve_dir(Path::new("Cargo.toml"), &CommonOptions::default()),
            Err(CliError::NotADirectory(_))
        ));
    }
}
