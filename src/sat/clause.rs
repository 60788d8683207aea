use crate::sat::assignment::Assignment;
use crate::sat::literal::{Literal, Variable};
use core::ops::Index;
use smallvec::SmallVec;
use std::fmt::{Display, Formatter};

/// Where a clause stands under a partial assignment.
///
/// `Satisfied` wins over everything else: a clause with one true literal is
/// never reported as a conflict, whatever its other literals say.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClauseStatus<V> {
    /// Some assigned literal matches its required sign.
    Satisfied,
    /// Every literal is assigned and none matches.
    Conflict,
    /// Exactly one literal is unassigned and nothing satisfies the clause yet;
    /// carries the literal that is now forced.
    Unit(Literal<V>),
    /// Two or more literals are unassigned and none is satisfied.
    Unresolved,
}

/// A disjunction of literals, kept in insertion order.
///
/// Most clauses produced by the puzzle encoder are binary, so two literals
/// live inline.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Clause<V> {
    literals: SmallVec<[Literal<V>; 2]>,
}

impl<V: Variable> Clause<V> {
    pub fn new(literals: impl IntoIterator<Item = Literal<V>>) -> Self {
        Self {
            literals: literals.into_iter().collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.literals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.literals.is_empty()
    }

    pub fn is_unit(&self) -> bool {
        self.len() == 1
    }

    pub fn iter(&self) -> impl Iterator<Item = &Literal<V>> {
        self.literals.iter()
    }

    pub fn variables(&self) -> impl Iterator<Item = V> + '_ {
        self.literals.iter().map(|lit| lit.variable())
    }

    /// Classifies the clause against `assignment` in a single pass.
    pub fn status(&self, assignment: &Assignment<V>) -> ClauseStatus<V> {
        let mut unassigned = None;
        let mut unassigned_count = 0_usize;

        for &lit in &self.literals {
            match assignment.literal_value(lit) {
                Some(true) => return ClauseStatus::Satisfied,
                Some(false) => {}
                None => {
                    unassigned_count += 1;
                    unassigned.get_or_insert(lit);
                }
            }
        }

        match (unassigned_count, unassigned) {
            (1, Some(lit)) => ClauseStatus::Unit(lit),
            (0, _) => ClauseStatus::Conflict,
            _ => ClauseStatus::Unresolved,
        }
    }

    pub fn is_satisfied_by(&self, assignment: &Assignment<V>) -> bool {
        self.iter()
            .any(|&lit| assignment.literal_value(lit) == Some(true))
    }
}

impl<V> Index<usize> for Clause<V> {
    type Output = Literal<V>;

    fn index(&self, index: usize) -> &Self::Output {
        &self.literals[index]
    }
}

impl<V: Variable> FromIterator<Literal<V>> for Clause<V> {
    fn from_iter<T: IntoIterator<Item = Literal<V>>>(iter: T) -> Self {
        Self::new(iter)
    }
}

impl<V: Variable> From<Vec<Literal<V>>> for Clause<V> {
    fn from(literals: Vec<Literal<V>>) -> Self {
        Self::new(literals)
    }
}

impl<V: Variable, const N: usize> From<[Literal<V>; N]> for Clause<V> {
    fn from(literals: [Literal<V>; N]) -> Self {
        Self::new(literals)
    }
}

impl<V: Variable + Display> Display for Clause<V> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "(")?;
        for (i, lit) in self.literals.iter().enumerate() {
            if i > 0 {
                write!(f, " ∨ ")?;
            }
            write!(f, "{lit}")?;
        }
        write!(f, ")")
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    /// Reference classification: look at each literal's value separately.
    fn oracle(clause: &Clause<u8>, assignment: &Assignment<u8>) -> ClauseStatus<u8> {
        let values: Vec<_> = clause.iter().map(|&l| assignment.literal_value(l)).collect();
        if values.contains(&Some(true)) {
            return ClauseStatus::Satisfied;
        }
        let open: Vec<_> = clause
            .iter()
            .zip(&values)
            .filter(|(_, v)| v.is_none())
            .map(|(&l, _)| l)
            .collect();
        match open.as_slice() {
            [] => ClauseStatus::Conflict,
            [lit] => ClauseStatus::Unit(*lit),
            _ => ClauseStatus::Unresolved,
        }
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(512))]

        #[test]
        fn status_matches_oracle(
            lits in prop::collection::vec((0..6_u8, any::<bool>()), 0..5),
            values in prop::collection::vec(prop::option::of(any::<bool>()), 6),
        ) {
            let clause: Clause<u8> = lits.into_iter().map(Literal::from).collect();
            let assignment: Assignment<u8> = values
                .iter()
                .enumerate()
                .filter_map(|(v, value)| value.map(|b| (u8::try_from(v).unwrap(), b)))
                .collect();

            prop_assert_eq!(clause.status(&assignment), oracle(&clause, &assignment));
        }
    }
}
