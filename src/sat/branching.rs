//! DPLL in its recursive, copy-on-branch form.
//!
//! Each decision clones the current assignment into the `true` branch; the
//! `false` branch reuses the caller's own copy. Siblings never see each
//! other's tentative values, and nothing needs undoing. Recursion depth grows
//! with the number of decisions, so large grids should run on a thread with a
//! generous stack (see [`crate::harness`]) or use [`Dpll`](crate::sat::dpll::Dpll).

use crate::sat::assignment::Assignment;
use crate::sat::cnf::Cnf;
use crate::sat::literal::{Literal, Variable};
use crate::sat::propagation::{Propagation, UnitSearch};
use crate::sat::solver::{SolutionStats, Solver, SolverError, check_formula};
use crate::sat::variable_selection::FixedOrder;
use tracing::trace;

#[derive(Debug, Clone)]
pub struct BranchingDpll<V: Variable> {
    pub cnf: Cnf<V>,
    pub selector: FixedOrder<V>,
    pub propagator: UnitSearch,
    decisions: usize,
    conflicts: usize,
}

impl<V: Variable> Solver<V> for BranchingDpll<V> {
    fn new(variables: Vec<V>, cnf: Cnf<V>) -> Result<Self, SolverError> {
        check_formula(&variables, &cnf)?;

        Ok(Self {
            cnf,
            selector: FixedOrder::new(variables),
            propagator: UnitSearch::new(),
            decisions: 0,
            conflicts: 0,
        })
    }

    fn solve_from(&mut self, assignment: Assignment<V>) -> Option<Assignment<V>> {
        self.search(assignment, 0)
    }

    fn stats(&self) -> SolutionStats {
        SolutionStats {
            decisions: self.decisions,
            propagations: self.propagator.propagations,
            conflicts: self.conflicts,
        }
    }
}

impl<V: Variable> BranchingDpll<V> {
    fn search(&mut self, mut assignment: Assignment<V>, depth: usize) -> Option<Assignment<V>> {
        match self
            .propagator
            .propagate(&self.cnf, &mut assignment, |_, _| {})
        {
            Propagation::Satisfied => return Some(assignment),
            Propagation::Conflict(clause) => {
                trace!(clause, depth, "conflict");
                self.conflicts += 1;
                return None;
            }
            Propagation::Stalled => {}
        }

        let Some(variable) = self.selector.pick(&assignment) else {
            self.conflicts += 1;
            return None;
        };
        self.decisions += 1;

        let mut true_branch = assignment.clone();
        true_branch.assign(Literal::positive(variable));
        if let Some(model) = self.search(true_branch, depth + 1) {
            return Some(model);
        }

        let mut false_branch = assignment;
        false_branch.assign(Literal::negative(variable));
        self.search(false_branch, depth + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sat::clause::Clause;
    use crate::sat::dpll::Dpll;

    fn cnf(clauses: &[&[i32]]) -> Cnf<u32> {
        clauses
            .iter()
            .map(|c| {
                c.iter()
                    .map(|&l| Literal::new(l.unsigned_abs(), l > 0))
                    .collect::<Clause<u32>>()
            })
            .collect()
    }

    #[test]
    fn test_unsatisfiable() {
        let mut s =
            BranchingDpll::new(vec![1, 2], cnf(&[&[1, 2], &[1, -2], &[-1, 2], &[-1, -2]])).unwrap();
        assert_eq!(s.solve(), None);
        assert_eq!(s.stats().conflicts, 2);
    }

    #[test]
    fn test_matches_trail_solver() {
        let vars = vec![1, 2, 3, 4, 5];
        let formula = cnf(&[
            &[1, 2, 3],
            &[-1, -2],
            &[-1, 4],
            &[-4, -5],
            &[2, 5],
            &[-3, -4],
            &[1, -3],
        ]);

        let mut branching = BranchingDpll::new(vars.clone(), formula.clone()).unwrap();
        let mut trail = Dpll::new(vars, formula.clone()).unwrap();

        let a = branching.solve();
        let b = trail.solve();

        assert!(a.is_some());
        assert_eq!(a, b);
        assert!(formula.verify(&a.unwrap()));
        assert_eq!(branching.stats(), trail.stats());
    }
}
