use crate::sat::literal::{Literal, Variable};
use rustc_hash::FxHashMap;

/// A partial mapping from variables to truth values.
///
/// Built incrementally during search. Lookup order never leaks out of this type:
/// callers that need a reproducible order iterate their own variable list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment<V: Variable>(FxHashMap<V, bool>);

impl<V: Variable> Default for Assignment<V> {
    fn default() -> Self {
        Self(FxHashMap::default())
    }
}

impl<V: Variable> Assignment<V> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_capacity(n: usize) -> Self {
        Self(FxHashMap::with_capacity_and_hasher(n, Default::default()))
    }

    pub fn set(&mut self, variable: V, value: bool) {
        let previous = self.0.insert(variable, value);
        debug_assert!(
            previous.is_none_or(|p| p == value),
            "variable {variable:?} reassigned without backtracking"
        );
    }

    /// Makes `lit` true.
    pub fn assign(&mut self, lit: Literal<V>) {
        self.set(lit.variable(), lit.polarity());
    }

    pub fn unassign(&mut self, variable: V) {
        self.0.remove(&variable);
    }

    pub fn var_value(&self, variable: V) -> Option<bool> {
        self.0.get(&variable).copied()
    }

    /// `Some(true)` if `lit` holds, `Some(false)` if it is falsified, `None`
    /// while its variable is unassigned.
    pub fn literal_value(&self, lit: Literal<V>) -> Option<bool> {
        self.var_value(lit.variable())
            .map(|value| lit.is_satisfied_by(value))
    }

    pub fn is_assigned(&self, variable: V) -> bool {
        self.0.contains_key(&variable)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Assigned variables in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = (V, bool)> + '_ {
        self.0.iter().map(|(&v, &b)| (v, b))
    }

    /// Variables assigned `true`, in unspecified order.
    pub fn true_variables(&self) -> impl Iterator<Item = V> + '_ {
        self.iter().filter_map(|(v, b)| b.then_some(v))
    }
}

impl<V: Variable> FromIterator<(V, bool)> for Assignment<V> {
    fn from_iter<T: IntoIterator<Item = (V, bool)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<V: Variable> FromIterator<Literal<V>> for Assignment<V> {
    fn from_iter<T: IntoIterator<Item = Literal<V>>>(iter: T) -> Self {
        iter.into_iter()
            .map(|lit| (lit.variable(), lit.polarity()))
            .collect()
    }
}
