//! Defines the main DPLL (Davis-Putnam-Logemann-Loveland) SAT solver.
//!
//! This module provides the `Dpll` struct, a classical DPLL search:
//! 1.  **Unit Propagation:** clauses are scanned in order; a unit clause forces
//!     its last open literal and the scan restarts, until a conflict, until
//!     every clause is satisfied, or until nothing more can be forced.
//! 2.  **Decision:** the first unassigned variable (in generation order) is
//!     tried `true`, then `false`.
//! 3.  **Backtracking:** every assignment is recorded on a `Trail`. A failed
//!     branch truncates the trail back to where the decision was taken, which
//!     restores the parent's assignment exactly.
//!
//! The recursion of the textbook algorithm is replaced by an explicit stack of
//! decision frames, so search depth is bounded by memory rather than by the
//! native call stack. Branch order and first-model-wins behaviour are the same
//! as [`BranchingDpll`](crate::sat::branching::BranchingDpll), which keeps the
//! recursive form.

use crate::sat::assignment::Assignment;
use crate::sat::cnf::Cnf;
use crate::sat::literal::{Literal, Variable};
use crate::sat::propagation::{Propagation, UnitSearch};
use crate::sat::solver::{SolutionStats, Solver, SolverError, check_formula};
use crate::sat::trail::{Reason, Trail};
use crate::sat::variable_selection::FixedOrder;
use tracing::{debug, trace};

/// An open decision: `variable` was assigned when the trail had `mark` steps.
#[derive(Debug, Clone, Copy)]
struct Frame<V> {
    variable: V,
    mark: usize,
    /// Whether the `false` branch is the one being explored.
    flipped: bool,
}

/// Represents a DPLL SAT solver.
#[derive(Debug, Clone)]
pub struct Dpll<V: Variable> {
    /// The formula being solved.
    pub cnf: Cnf<V>,
    /// Branching order.
    pub selector: FixedOrder<V>,
    /// The unit propagator.
    pub propagator: UnitSearch,
    /// Every assignment made since `solve_from` was entered.
    pub trail: Trail<V>,
    decisions: usize,
    conflicts: usize,
}

impl<V: Variable> Solver<V> for Dpll<V> {
    fn new(variables: Vec<V>, cnf: Cnf<V>) -> Result<Self, SolverError> {
        check_formula(&variables, &cnf)?;

        Ok(Self {
            trail: Trail::with_capacity(variables.len()),
            selector: FixedOrder::new(variables),
            propagator: UnitSearch::new(),
            cnf,
            decisions: 0,
            conflicts: 0,
        })
    }

    /// Attempts to satisfy the formula, extending `assignment`.
    ///
    /// The caller's assignment is never undone: only what this search added is
    /// on the trail. If the caller's assignment already falsifies a clause, the
    /// answer is `None`.
    fn solve_from(&mut self, mut assignment: Assignment<V>) -> Option<Assignment<V>> {
        self.trail.clear();
        let mut stack: Vec<Frame<V>> = Vec::new();

        loop {
            let level = stack.len();
            let trail = &mut self.trail;
            let outcome = self
                .propagator
                .propagate(&self.cnf, &mut assignment, |lit, clause| {
                    trail.push(lit, level, Reason::Clause(clause));
                });

            let failed = match outcome {
                Propagation::Satisfied => {
                    debug!(
                        decisions = self.decisions,
                        conflicts = self.conflicts,
                        assigned = assignment.len(),
                        "formula satisfied"
                    );
                    return Some(assignment);
                }
                Propagation::Conflict(clause) => {
                    trace!(clause, level, "conflict");
                    true
                }
                Propagation::Stalled => match self.selector.pick(&assignment) {
                    Some(variable) => {
                        self.decisions += 1;
                        stack.push(Frame {
                            variable,
                            mark: self.trail.len(),
                            flipped: false,
                        });
                        self.decide(&mut assignment, Literal::positive(variable), stack.len());
                        false
                    }
                    // Every variable has a value yet some clause is still open.
                    // Cannot happen after a full propagation scan; give up on
                    // the branch rather than loop.
                    None => true,
                },
            };

            if failed {
                self.conflicts += 1;
                loop {
                    let Some(frame) = stack.pop() else {
                        debug!(
                            decisions = self.decisions,
                            conflicts = self.conflicts,
                            "formula unsatisfiable"
                        );
                        return None;
                    };

                    self.trail.backtrack_to(&mut assignment, frame.mark);

                    if !frame.flipped {
                        stack.push(Frame {
                            flipped: true,
                            ..frame
                        });
                        let lit = Literal::negative(frame.variable);
                        self.decide(&mut assignment, lit, stack.len());
                        break;
                    }
                }
            }
        }
    }

    fn stats(&self) -> SolutionStats {
        SolutionStats {
            decisions: self.decisions,
            propagations: self.propagator.propagations,
            conflicts: self.conflicts,
        }
    }
}

impl<V: Variable> Dpll<V> {
    fn decide(&mut self, assignment: &mut Assignment<V>, lit: Literal<V>, level: usize) {
        trace!(variable = ?lit.variable(), value = lit.polarity(), level, "decide");
        assignment.assign(lit);
        self.trail.push(lit, level, Reason::Decision);
    }
}
