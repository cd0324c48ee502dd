use std::{fmt::Display, rc::Rc};

use fxhash::FxHashSet;
use itertools::Itertools;

use super::{Clause, InvalidLiteral, Literal, Variable};

/// A conjunction of clauses.
///
/// Clauses sit behind reference counted pointers so that formulas derived
/// through [`Formula::reduce`] share every clause the reduction leaves
/// untouched. A formula is never modified after it has been built.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Formula {
    clauses: Vec<Rc<Clause>>,
}

impl Formula {
    /// Build a formula from clauses given as literal tokens, e.g.
    /// `[["x", "-y"], ["y"]]`.
    pub fn from_tokens<C, T>(clauses: C) -> Result<Self, InvalidLiteral>
    where
        C: IntoIterator,
        C::Item: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        clauses
            .into_iter()
            .map(|clause| {
                clause
                    .into_iter()
                    .map(|token| token.as_ref().parse::<Literal>())
                    .collect::<Result<Clause, _>>()
            })
            .collect()
    }

    pub fn clauses(&self) -> impl Iterator<Item = &Clause> {
        self.clauses.iter().map(Rc::as_ref)
    }

    pub fn len(&self) -> usize {
        self.clauses.len()
    }

    /// The empty formula, satisfied by every assignment.
    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    pub fn has_empty_clause(&self) -> bool {
        self.clauses.iter().any(|c| c.is_empty())
    }

    /// All variables of the formula in order of their first occurrence.
    pub fn variables(&self) -> Vec<Variable> {
        let mut seen = FxHashSet::default();
        self.clauses()
            .flat_map(Clause::variables)
            .filter(|&var| seen.insert(var))
            .cloned()
            .collect_vec()
    }

    /// Derive the formula that remains once `variable` is fixed to `value`.
    ///
    /// Clauses made true by the assignment are dropped and the literal made
    /// false is removed from the others. Clauses that do not mention the
    /// variable are shared with `self`.
    pub fn reduce(&self, variable: &Variable, value: bool) -> Formula {
        let satisfied = Literal::new(variable.clone(), value);
        let falsified = !&satisfied;
        let clauses = self
            .clauses
            .iter()
            .filter(|clause| !clause.has_literal(&satisfied))
            .map(|clause| {
                if clause.has_literal(&falsified) {
                    Rc::new(clause.without(&falsified))
                } else {
                    Rc::clone(clause)
                }
            })
            .collect();
        Formula { clauses }
    }

    #[cfg(test)]
    pub(crate) fn shares_clause(&self, index: usize, other: &Formula, other_index: usize) -> bool {
        Rc::ptr_eq(&self.clauses[index], &other.clauses[other_index])
    }
}

impl FromIterator<Clause> for Formula {
    fn from_iter<T: IntoIterator<Item = Clause>>(iter: T) -> Self {
        Formula {
            clauses: iter.into_iter().map(Rc::new).collect(),
        }
    }
}

impl Display for Formula {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            self.clauses.iter().map(|c| format!("({})", c)).join(" & ")
        )
    }
}
