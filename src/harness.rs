#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Runs encode, solve and decode on a worker thread under a wall-clock budget.
//!
//! The worker reports after each stage. The caller waits for each report with
//! whatever is left of the budget; once it runs out the worker is abandoned and
//! the run is reported as timed out in the stage it was in. A timeout is
//! inconclusive and says nothing about satisfiability.

use crate::sat::assignment::Assignment;
use crate::sat::solver::{SolutionStats, SolverError, SolverType, solve_with};
use crate::sudoku::decoder::decode;
use crate::sudoku::encoder::encode;
use crate::sudoku::grid::Grid;
use crate::sudoku::puzzle::{Puzzle, PuzzleError};
use std::fmt::{Display, Formatter};
use std::io;
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::thread;
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Budget used when the caller does not pick one.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// The recursive solver recurses once per decision.
const WORKER_STACK_SIZE: usize = 256 * 1024 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Encode,
    Solve,
    Decode,
}

impl Display for Stage {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Encode => write!(f, "encode"),
            Self::Solve => write!(f, "solve"),
            Self::Decode => write!(f, "decode"),
        }
    }
}

#[derive(Debug, Error)]
pub enum HarnessError {
    #[error("worker stopped without reporting during {stage}")]
    WorkerDisconnected { stage: Stage },

    #[error("could not start worker thread: {0}")]
    Spawn(#[source] io::Error),

    #[error(transparent)]
    Solver(#[from] SolverError),
}

/// Time spent in each stage that finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Timings {
    pub encode: Duration,
    pub solve: Duration,
    pub decode: Duration,
}

impl Timings {
    #[must_use]
    pub fn total(&self) -> Duration {
        self.encode + self.solve + self.decode
    }
}

/// What a finished run measured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Report {
    pub timings: Timings,
    pub stats: SolutionStats,
    pub variables: usize,
    pub clauses: usize,
    pub literals: usize,
    /// The model satisfied every clause. Only meaningful for solved runs.
    pub model_verified: bool,
}

#[derive(Debug)]
pub enum Outcome {
    Solved { grid: Grid, report: Report },
    Unsatisfiable { report: Report },
    TimedOut { stage: Stage },
    Invalid(PuzzleError),
    Failed(HarnessError),
}

impl Outcome {
    #[must_use]
    pub const fn grid(&self) -> Option<&Grid> {
        match self {
            Self::Solved { grid, .. } => Some(grid),
            _ => None,
        }
    }

    #[must_use]
    pub const fn report(&self) -> Option<&Report> {
        match self {
            Self::Solved { report, .. } | Self::Unsatisfiable { report } => Some(report),
            _ => None,
        }
    }
}

enum Event {
    Encoded {
        variables: usize,
        clauses: usize,
        literals: usize,
        elapsed: Duration,
    },
    Searched {
        satisfiable: bool,
        stats: SolutionStats,
        elapsed: Duration,
    },
    Decoded {
        grid: Grid,
        model_verified: bool,
        elapsed: Duration,
    },
    Rejected(PuzzleError),
    Failed(SolverError),
}

/// Sends are allowed to fail: the receiver is gone once the caller gave up.
fn run_stages(puzzle: &Puzzle, solver: SolverType, tx: &Sender<Event>) {
    let start = Instant::now();
    let (variables, cnf) = match encode(puzzle) {
        Ok(encoded) => encoded,
        Err(e) => {
            let _ = tx.send(Event::Rejected(e));
            return;
        }
    };
    let _ = tx.send(Event::Encoded {
        variables: variables.len(),
        clauses: cnf.len(),
        literals: cnf.num_literals(),
        elapsed: start.elapsed(),
    });

    let start = Instant::now();
    let (model, stats) = match solve_with(solver, &variables, &cnf, Assignment::new()) {
        Ok(result) => result,
        Err(e) => {
            let _ = tx.send(Event::Failed(e));
            return;
        }
    };
    let _ = tx.send(Event::Searched {
        satisfiable: model.is_some(),
        stats,
        elapsed: start.elapsed(),
    });

    let Some(model) = model else {
        return;
    };
    let start = Instant::now();
    let grid = decode(&variables, &model, puzzle);
    let _ = tx.send(Event::Decoded {
        grid,
        model_verified: cnf.verify(&model),
        elapsed: start.elapsed(),
    });
}

/// Encodes, solves and decodes `puzzle` with `solver`, giving up once `budget`
/// has elapsed across all stages. `None`, or a budget too large to represent
/// as a deadline, waits indefinitely.
#[must_use]
pub fn solve_with_timeout(
    puzzle: &Puzzle,
    solver: SolverType,
    budget: Option<Duration>,
) -> Outcome {
    let (tx, rx) = mpsc::channel();
    let owned = puzzle.clone();

    let spawned = thread::Builder::new()
        .name("sudoku-worker".to_string())
        .stack_size(WORKER_STACK_SIZE)
        .spawn(move || run_stages(&owned, solver, &tx));
    if let Err(e) = spawned {
        return Outcome::Failed(HarnessError::Spawn(e));
    }

    let deadline = budget.and_then(|b| Instant::now().checked_add(b));
    let mut stage = Stage::Encode;
    let mut report = Report::default();

    loop {
        let event = match deadline {
            Some(deadline) => rx.recv_timeout(deadline.saturating_duration_since(Instant::now())),
            None => rx.recv().map_err(|_| RecvTimeoutError::Disconnected),
        };

        let event = match event {
            Ok(event) => event,
            Err(RecvTimeoutError::Timeout) => {
                warn!(%stage, ?budget, "timed out");
                return Outcome::TimedOut { stage };
            }
            Err(RecvTimeoutError::Disconnected) => {
                return Outcome::Failed(HarnessError::WorkerDisconnected { stage });
            }
        };

        match event {
            Event::Encoded {
                variables,
                clauses,
                literals,
                elapsed,
            } => {
                debug!(variables, clauses, ?elapsed, "encoded");
                report.variables = variables;
                report.clauses = clauses;
                report.literals = literals;
                report.timings.encode = elapsed;
                stage = Stage::Solve;
            }
            Event::Searched {
                satisfiable,
                stats,
                elapsed,
            } => {
                debug!(satisfiable, ?stats, ?elapsed, "search finished");
                report.stats = stats;
                report.timings.solve = elapsed;
                if !satisfiable {
                    info!("unsatisfiable");
                    return Outcome::Unsatisfiable { report };
                }
                stage = Stage::Decode;
            }
            Event::Decoded {
                grid,
                model_verified,
                elapsed,
            } => {
                report.timings.decode = elapsed;
                report.model_verified = model_verified;
                info!(total = ?report.timings.total(), "solved");
                return Outcome::Solved { grid, report };
            }
            Event::Rejected(e) => return Outcome::Invalid(e),
            Event::Failed(e) => return Outcome::Failed(e.into()),
        }
    }
}
