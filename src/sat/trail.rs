#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]

use crate::sat::assignment::Assignment;
use crate::sat::literal::{Literal, Variable};
use core::ops::Index;

/// Why a literal ended up on the trail.
#[derive(Debug, Clone, PartialEq, Eq, Default, Copy, Hash, PartialOrd, Ord)]
pub enum Reason {
    #[default]
    Decision,
    /// Forced by the clause at this index becoming unit.
    Clause(usize),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step<V> {
    pub lit: Literal<V>,
    pub decision_level: usize,
    pub reason: Reason,
}

/// Chronological record of every assignment made during search, so a branch
/// can be undone without copying the whole assignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trail<V> {
    t: Vec<Step<V>>,
}

impl<V> Default for Trail<V> {
    fn default() -> Self {
        Self { t: Vec::new() }
    }
}

impl<V> Index<usize> for Trail<V> {
    type Output = Step<V>;

    fn index(&self, index: usize) -> &Self::Output {
        &self.t[index]
    }
}

impl<V: Variable> Trail<V> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_capacity(n: usize) -> Self {
        Self {
            t: Vec::with_capacity(n),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.t.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.t.is_empty()
    }

    #[must_use]
    pub fn decision_level(&self) -> usize {
        self.t.last().map_or(0, |step| step.decision_level)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Step<V>> {
        self.t.iter()
    }

    pub fn push(&mut self, lit: Literal<V>, decision_level: usize, reason: Reason) {
        self.t.push(Step {
            lit,
            decision_level,
            reason,
        });
    }

    /// Unassigns every literal recorded after the first `len` steps.
    pub fn backtrack_to(&mut self, assignment: &mut Assignment<V>, len: usize) {
        let start = len.min(self.t.len());
        for step in self.t.drain(start..).rev() {
            assignment.unassign(step.lit.variable());
        }
    }

    pub fn clear(&mut self) {
        self.t.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backtrack_restores_assignment() {
        let mut a = Assignment::new();
        let mut trail = Trail::new();

        for (i, lit) in [Literal::positive(1), Literal::negative(2), Literal::positive(3)]
            .into_iter()
            .enumerate()
        {
            a.assign(lit);
            trail.push(lit, i, Reason::Decision);
        }
        assert_eq!(trail.decision_level(), 2);

        trail.backtrack_to(&mut a, 1);

        assert_eq!(trail.len(), 1);
        assert_eq!(a.var_value(1), Some(true));
        assert!(!a.is_assigned(2));
        assert!(!a.is_assigned(3));
        assert_eq!(trail[0].reason, Reason::Decision);
    }

    #[test]
    fn test_backtrack_past_end_is_noop() {
        let mut a = Assignment::new();
        let mut trail = Trail::new();
        a.assign(Literal::positive(1));
        trail.push(Literal::positive(1), 0, Reason::Clause(4));

        trail.backtrack_to(&mut a, 10);
        assert_eq!(trail.len(), 1);
        assert!(a.is_assigned(1));
    }
}
