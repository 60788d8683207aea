use crate::sat::assignment::Assignment;
use crate::sat::branching::BranchingDpll;
use crate::sat::cnf::Cnf;
use crate::sat::dpll::Dpll;
use crate::sat::literal::Variable;
use clap::ValueEnum;
use rustc_hash::FxHashSet;
use std::fmt::{Display, Formatter};
use thiserror::Error;

/// Malformed solver input. Reported before any search starts.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SolverError {
    #[error("the variable list is empty")]
    NoVariables,

    #[error("clause {0} has no literals")]
    EmptyClause(usize),

    #[error("clause {clause} mentions {variable}, which is not in the variable list")]
    UnknownVariable { clause: usize, variable: String },
}

/// Counters collected during a search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SolutionStats {
    /// Variables branched on (the `true` attempt; the `false` retry is not counted).
    pub decisions: usize,
    /// Literals forced by unit propagation.
    pub propagations: usize,
    /// Branches abandoned, through a falsified clause or with nothing left to branch on.
    pub conflicts: usize,
}

/// A complete search procedure over a fixed formula.
///
/// `solve_from` returns `Some(model)` when the formula is satisfiable and `None`
/// when it is not. Unsatisfiability is an answer, not an error.
pub trait Solver<V: Variable>: Sized {
    /// Builds a solver that branches on `variables` in the order given.
    ///
    /// # Errors
    ///
    /// See [`check_formula`].
    fn new(variables: Vec<V>, cnf: Cnf<V>) -> Result<Self, SolverError>;

    /// Searches for a model extending `assignment`.
    fn solve_from(&mut self, assignment: Assignment<V>) -> Option<Assignment<V>>;

    fn solve(&mut self) -> Option<Assignment<V>> {
        self.solve_from(Assignment::new())
    }

    fn stats(&self) -> SolutionStats;
}

/// Which search procedure to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, ValueEnum)]
pub enum SolverType {
    /// Iterative search with an assignment trail, undone on backtrack.
    #[default]
    Dpll,
    /// Recursive search that copies the assignment at each branch.
    Branching,
}

impl Display for SolverType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Dpll => write!(f, "dpll"),
            Self::Branching => write!(f, "branching"),
        }
    }
}

/// Rejects input the search assumes away: no variables, empty clauses, and
/// clauses over variables the solver would never branch on.
///
/// # Errors
///
/// The first problem found, scanning clauses in order.
pub fn check_formula<V: Variable>(variables: &[V], cnf: &Cnf<V>) -> Result<(), SolverError> {
    if variables.is_empty() {
        return Err(SolverError::NoVariables);
    }

    let known: FxHashSet<V> = variables.iter().copied().collect();

    for (idx, clause) in cnf.iter().enumerate() {
        if clause.is_empty() {
            return Err(SolverError::EmptyClause(idx));
        }
        if let Some(v) = clause.variables().find(|v| !known.contains(v)) {
            return Err(SolverError::UnknownVariable {
                clause: idx,
                variable: format!("{v:?}"),
            });
        }
    }

    Ok(())
}

/// Solves `cnf` starting from `assignment` with the default solver.
///
/// # Errors
///
/// See [`check_formula`].
pub fn solve<V: Variable>(
    variables: &[V],
    cnf: &Cnf<V>,
    assignment: Assignment<V>,
) -> Result<Option<Assignment<V>>, SolverError> {
    solve_with(SolverType::Dpll, variables, cnf, assignment).map(|(model, _)| model)
}

/// Solves `cnf` with the chosen procedure, returning the model (if any) and the
/// search counters.
///
/// # Errors
///
/// See [`check_formula`].
pub fn solve_with<V: Variable>(
    solver: SolverType,
    variables: &[V],
    cnf: &Cnf<V>,
    assignment: Assignment<V>,
) -> Result<(Option<Assignment<V>>, SolutionStats), SolverError> {
    match solver {
        SolverType::Dpll => run::<V, Dpll<V>>(variables, cnf, assignment),
        SolverType::Branching => run::<V, BranchingDpll<V>>(variables, cnf, assignment),
    }
}

fn run<V: Variable, S: Solver<V>>(
    variables: &[V],
    cnf: &Cnf<V>,
    assignment: Assignment<V>,
) -> Result<(Option<Assignment<V>>, SolutionStats), SolverError> {
    let mut solver = S::new(variables.to_vec(), cnf.clone())?;
    let model = solver.solve_from(assignment);
    Ok((model, solver.stats()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sat::clause::Clause;
    use crate::sat::literal::Literal;

    #[test]
    fn test_check_formula_no_variables() {
        let cnf: Cnf<u32> = Cnf::default();
        assert_eq!(check_formula(&[], &cnf), Err(SolverError::NoVariables));
    }

    #[test]
    fn test_check_formula_empty_clause() {
        let cnf = Cnf::new([
            Clause::from([Literal::positive(1_u32)]),
            Clause::<u32>::new([]),
        ]);
        assert_eq!(check_formula(&[1], &cnf), Err(SolverError::EmptyClause(1)));
    }

    #[test]
    fn test_check_formula_unknown_variable() {
        let cnf = Cnf::new([Clause::from([Literal::positive(1_u32), Literal::negative(8)])]);
        assert_eq!(
            check_formula(&[1, 2], &cnf),
            Err(SolverError::UnknownVariable {
                clause: 0,
                variable: "8".to_string()
            })
        );
    }

    #[test]
    fn test_solve_reports_errors() {
        let cnf = Cnf::new([Clause::<u32>::new([])]);
        assert_eq!(
            solve::<u32>(&[1], &cnf, Assignment::new()),
            Err(SolverError::EmptyClause(0))
        );
    }

    #[test]
    fn test_solver_type_display() {
        assert_eq!(SolverType::Dpll.to_string(), "dpll");
        assert_eq!(SolverType::Branching.to_string(), "branching");
    }
}
