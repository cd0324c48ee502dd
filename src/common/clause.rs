use std::{collections::BTreeSet, fmt::Display};

use itertools::Itertools;

use super::{Assignment, Literal, Variable};

/// A clause consists of a set of literals in disjunction.
#[derive(Debug, Default, PartialEq, Eq, PartialOrd, Ord, Clone, Hash)]
pub struct Clause(BTreeSet<Literal>);

impl Clause {
    /// Create the empty clause.
    pub fn empty() -> Self {
        Clause(BTreeSet::new())
    }

    /// Return an iterator over all the literals present in the clause.
    pub fn literals(&self) -> impl Iterator<Item = &Literal> {
        self.0.iter()
    }

    /// The variables of the clause in literal order. A variable that appears
    /// with both polarities is yielded twice.
    pub fn variables(&self) -> impl Iterator<Item = &Variable> {
        self.0.iter().map(Literal::variable)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if the clause is the empty clause.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Check if the clause contains the specified literal. This does not return
    /// true if it contains the negated literal.
    pub fn has_literal(&self, literal: &Literal) -> bool {
        self.0.contains(literal)
    }

    /// A clause holding a literal and its negation is true under every
    /// assignment.
    pub fn is_tautology(&self) -> bool {
        self.0
            .iter()
            .tuple_windows()
            .any(|(a, b)| a.matches(b))
    }

    /// Create a copy of the clause with the literal removed.
    pub fn without(&self, literal: &Literal) -> Self {
        let mut literals = self.0.clone();
        literals.remove(literal);
        Clause(literals)
    }

    pub fn is_satisfied_by(&self, assignment: &Assignment) -> bool {
        self.0.iter().any(|lit| assignment.literal_is_true(lit))
    }
}

impl FromIterator<Literal> for Clause {
    fn from_iter<T: IntoIterator<Item = Literal>>(iter: T) -> Self {
        Clause(BTreeSet::from_iter(iter))
    }
}

impl Display for Clause {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.iter().join(", "))
    }
}
