#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Unit propagation by repeated full scans.
//!
//! Every clause is classified against the current assignment, front to back.
//! A unit clause forces its literal and the scan restarts from the first clause,
//! since earlier clauses may have become unit or conflicting. The loop stops at
//! the first conflict, when every clause is satisfied, or when a full scan finds
//! nothing to force.

use crate::sat::assignment::Assignment;
use crate::sat::clause::ClauseStatus;
use crate::sat::cnf::Cnf;
use crate::sat::literal::{Literal, Variable};

/// Result of running propagation to a fixed point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Propagation {
    /// Every clause is satisfied.
    Satisfied,
    /// The clause at this index has every literal falsified.
    Conflict(usize),
    /// No conflict and nothing left to force; some clause is still open.
    Stalled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UnitSearch {
    /// Literals forced so far, over the lifetime of this propagator.
    pub propagations: usize,
}

impl UnitSearch {
    #[must_use]
    pub const fn new() -> Self {
        Self { propagations: 0 }
    }

    /// Propagates unit clauses of `cnf` into `assignment` until a fixed point.
    ///
    /// `on_assign` sees each forced literal along with the index of the clause
    /// that forced it, after it has been written to `assignment`.
    pub fn propagate<V: Variable>(
        &mut self,
        cnf: &Cnf<V>,
        assignment: &mut Assignment<V>,
        mut on_assign: impl FnMut(Literal<V>, usize),
    ) -> Propagation {
        'scan: loop {
            let mut all_satisfied = true;

            for (idx, clause) in cnf.iter().enumerate() {
                match clause.status(assignment) {
                    ClauseStatus::Satisfied => {}
                    ClauseStatus::Conflict => return Propagation::Conflict(idx),
                    ClauseStatus::Unit(lit) => {
                        assignment.assign(lit);
                        self.propagations += 1;
                        on_assign(lit, idx);
                        continue 'scan;
                    }
                    ClauseStatus::Unresolved => all_satisfied = false,
                }
            }

            return if all_satisfied {
                Propagation::Satisfied
            } else {
                Propagation::Stalled
            };
        }
    }
}
