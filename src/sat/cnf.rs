//! Conjunctive Normal Form formulas.
//!
//! A `Cnf` is an ordered list of clauses. Order matters to the solver: unit
//! propagation scans clauses front to back, which decides which forced literal
//! is applied first and so which model comes back when several exist.

use crate::sat::assignment::Assignment;
use crate::sat::clause::Clause;
use crate::sat::literal::Variable;
use crate::sat::solver::SolverError;
use core::ops::Index;
use itertools::Itertools;
use rustc_hash::FxHashMap;
use std::fmt::Write;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Cnf<V> {
    pub clauses: Vec<Clause<V>>,
}

impl<V> Default for Cnf<V> {
    fn default() -> Self {
        Self {
            clauses: Vec::new(),
        }
    }
}

impl<V: Variable> Cnf<V> {
    pub fn new(clauses: impl IntoIterator<Item = Clause<V>>) -> Self {
        Self {
            clauses: clauses.into_iter().collect(),
        }
    }

    pub fn push(&mut self, clause: Clause<V>) {
        self.clauses.push(clause);
    }

    pub fn len(&self) -> usize {
        self.clauses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Clause<V>> {
        self.clauses.iter()
    }

    /// Total number of literal occurrences across all clauses.
    pub fn num_literals(&self) -> usize {
        self.iter().map(Clause::len).sum()
    }

    /// Checks that every clause has a literal made true by `assignment`.
    pub fn verify(&self, assignment: &Assignment<V>) -> bool {
        self.iter().all(|clause| clause.is_satisfied_by(assignment))
    }

    /// Renders the formula in DIMACS format, numbering `variables` from 1 in the
    /// order given.
    ///
    /// # Errors
    ///
    /// `SolverError::UnknownVariable` if a clause mentions a variable missing from
    /// `variables`.
    pub fn to_dimacs(&self, variables: &[V]) -> Result<String, SolverError> {
        let index: FxHashMap<V, usize> = variables
            .iter()
            .enumerate()
            .map(|(i, &v)| (v, i + 1))
            .collect();

        let mut out = String::new();
        let _ = writeln!(out, "p cnf {} {}", variables.len(), self.len());

        for (clause_idx, clause) in self.iter().enumerate() {
            let lits: Vec<String> = clause
                .iter()
                .map(|lit| -> Result<String, SolverError> {
                    let id = index.get(&lit.variable()).ok_or_else(|| {
                        SolverError::UnknownVariable {
                            clause: clause_idx,
                            variable: format!("{:?}", lit.variable()),
                        }
                    })?;
                    Ok(if lit.polarity() {
                        id.to_string()
                    } else {
                        format!("-{id}")
                    })
                })
                .try_collect()?;
            let _ = writeln!(out, "{} 0", lits.iter().join(" "));
        }

        Ok(out)
    }
}

impl<V> Index<usize> for Cnf<V> {
    type Output = Clause<V>;

    fn index(&self, index: usize) -> &Self::Output {
        &self.clauses[index]
    }
}

impl<V: Variable> FromIterator<Clause<V>> for Cnf<V> {
    fn from_iter<T: IntoIterator<Item = Clause<V>>>(iter: T) -> Self {
        Self::new(iter)
    }
}

impl<'a, V> IntoIterator for &'a Cnf<V> {
    type Item = &'a Clause<V>;
    type IntoIter = std::slice::Iter<'a, Clause<V>>;

    fn into_iter(self) -> Self::IntoIter {
        self.clauses.iter()
    }
}
