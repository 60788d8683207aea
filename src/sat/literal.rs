#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Propositional variables and literals.
//!
//! The solver is generic over the variable type: anything that is cheap to copy,
//! hashable and comparable for equality can name a proposition. The Sudoku
//! encoder uses a structural `(row, col, value)` triple, tests use plain integers.

use core::ops::Not;
use std::fmt::{Debug, Display, Formatter};
use std::hash::Hash;

/// A proposition the solver can assign `true` or `false`.
///
/// Identity is structural: two variables comparing equal are the same
/// proposition.
pub trait Variable: Copy + Debug + Eq + Hash {}

impl<T: Copy + Debug + Eq + Hash> Variable for T {}

/// A variable together with the truth value it must take to satisfy a clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Literal<V> {
    variable: V,
    polarity: bool,
}

impl<V: Variable> Literal<V> {
    /// Creates a literal requiring `variable` to be `polarity`.
    pub fn new(variable: V, polarity: bool) -> Self {
        Self { variable, polarity }
    }

    /// The literal satisfied when `variable` is true.
    pub fn positive(variable: V) -> Self {
        Self::new(variable, true)
    }

    /// The literal satisfied when `variable` is false.
    pub fn negative(variable: V) -> Self {
        Self::new(variable, false)
    }

    pub fn variable(self) -> V {
        self.variable
    }

    /// The required sign of the variable.
    pub fn polarity(self) -> bool {
        self.polarity
    }

    pub fn is_negated(self) -> bool {
        !self.polarity
    }

    #[must_use]
    pub fn negated(self) -> Self {
        Self {
            variable: self.variable,
            polarity: !self.polarity,
        }
    }

    /// Whether a variable valued `value` satisfies this literal.
    pub fn is_satisfied_by(self, value: bool) -> bool {
        value == self.polarity
    }
}

impl<V: Variable> Not for Literal<V> {
    type Output = Self;

    fn not(self) -> Self::Output {
        self.negated()
    }
}

impl<V: Variable> From<(V, bool)> for Literal<V> {
    fn from((variable, polarity): (V, bool)) -> Self {
        Self::new(variable, polarity)
    }
}

impl<V: Display> Display for Literal<V> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.polarity {
            write!(f, "{}", self.variable)
        } else {
            write!(f, "¬{}", self.variable)
        }
    }
}
