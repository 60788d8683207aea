use crate::sat::assignment::Assignment;
use crate::sat::literal::Variable;

/// Branches on variables in the order they were generated.
///
/// The order is part of the solver's observable behaviour: together with
/// trying `true` before `false`, it fixes which model is returned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedOrder<V> {
    order: Vec<V>,
}

impl<V: Variable> FixedOrder<V> {
    #[must_use]
    pub fn new(order: Vec<V>) -> Self {
        Self { order }
    }

    /// The first variable in generation order with no value yet.
    pub fn pick(&self, assignment: &Assignment<V>) -> Option<V> {
        self.order
            .iter()
            .copied()
            .find(|&v| !assignment.is_assigned(v))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn variables(&self) -> &[V] {
        &self.order
    }
}
