use std::fmt::Display;

use fxhash::FxHashMap;
use itertools::Itertools;

use super::{Formula, Literal, Variable};

/// Truth values for a set of variables.
///
/// During search the assignment is extended and rolled back by the solver one
/// variable at a time; no variable is ever held twice.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Assignment {
    inner: FxHashMap<Variable, bool>,
}

impl Assignment {
    /// Create a new empty assignment.
    pub fn new() -> Self {
        Assignment::default()
    }

    /// Set the value of a variable, replacing any previous value.
    pub fn assign(&mut self, variable: Variable, value: bool) {
        self.inner.insert(variable, value);
    }

    /// Forget the value of a variable.
    pub fn unassign(&mut self, variable: &Variable) {
        self.inner.remove(variable);
    }

    pub fn value(&self, variable: &Variable) -> Option<bool> {
        self.inner.get(variable).copied()
    }

    pub fn contains(&self, variable: &Variable) -> bool {
        self.inner.contains_key(variable)
    }

    /// A literal of an unassigned variable is not true.
    pub fn literal_is_true(&self, literal: &Literal) -> bool {
        self.value(literal.variable()) == Some(literal.value())
    }

    /// Check every clause of the formula against this assignment.
    pub fn satisfies(&self, formula: &Formula) -> bool {
        formula.clauses().all(|c| c.is_satisfied_by(self))
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// The assignment as true literals, ordered by variable. When every
    /// variable is a number they are ordered numerically.
    pub fn literals(&self) -> impl Iterator<Item = Literal> + '_ {
        let mut entries = self.inner.iter().collect_vec();
        if entries.iter().all(|(var, _)| var.number().is_some()) {
            entries.sort_by_key(|(var, _)| var.number());
        } else {
            entries.sort_by(|(a, _), (b, _)| a.cmp(b));
        }
        entries
            .into_iter()
            .map(|(var, &value)| Literal::new(var.clone(), value))
    }
}

impl Display for Assignment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.literals().join(", "))
    }
}
