use std::{fmt::Display, ops::Not, rc::Rc, str::FromStr};

use thiserror::Error;

/// A token that cannot be used as a literal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidLiteral {
    #[error("empty literal")]
    Empty,
    #[error("literal '{0}' has no variable after the negation sign")]
    MissingVariable(String),
    #[error("literal '{0}' is negated more than once")]
    DoubleNegation(String),
    #[error("literal '{0}' contains whitespace")]
    Whitespace(String),
}

/// The name of a variable, the unit of assignment.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Variable(Rc<str>);

impl Variable {
    pub fn name(&self) -> &str {
        &self.0
    }

    /// The variable as a DIMACS index, if its name is one.
    pub fn number(&self) -> Option<u64> {
        self.0.parse().ok()
    }
}

impl FromStr for Variable {
    type Err = InvalidLiteral;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        if name.is_empty() {
            Err(InvalidLiteral::Empty)
        } else if name.starts_with('-') {
            Err(InvalidLiteral::DoubleNegation(format!("-{}", name)))
        } else if name.chars().any(char::is_whitespace) {
            Err(InvalidLiteral::Whitespace(name.to_string()))
        } else {
            Ok(Variable(Rc::from(name)))
        }
    }
}

impl Display for Variable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A variable or its negation. Written as the variable name, prefixed with `-`
/// when negated.
///
/// Literals order by variable first, so the positive and negative literal of a
/// variable sit next to each other in a clause with the positive one first.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Literal {
    variable: Variable,
    negated: bool,
}

impl Literal {
    pub fn new(variable: Variable, value: bool) -> Self {
        Literal {
            variable,
            negated: !value,
        }
    }

    pub fn positive(variable: Variable) -> Self {
        Literal::new(variable, true)
    }

    pub fn negative(variable: Variable) -> Self {
        Literal::new(variable, false)
    }

    pub fn variable(&self) -> &Variable {
        &self.variable
    }

    /// The value the variable must take for this literal to be true.
    pub fn value(&self) -> bool {
        !self.negated
    }

    pub fn is_negated(&self) -> bool {
        self.negated
    }

    /// Compares two literals and returns true if they use the same variable
    pub fn matches(&self, other: &Literal) -> bool {
        self.variable == other.variable
    }
}

impl FromStr for Literal {
    type Err = InvalidLiteral;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        match token.strip_prefix('-') {
            Some("") => Err(InvalidLiteral::MissingVariable(token.to_string())),
            Some(name) => Ok(Literal::negative(name.parse()?)),
            None => Ok(Literal::positive(token.parse()?)),
        }
    }
}

impl Not for Literal {
    type Output = Self;

    fn not(mut self) -> Self::Output {
        self.negated = !self.negated;
        self
    }
}

impl Not for &Literal {
    type Output = Literal;

    fn not(self) -> Self::Output {
        !self.clone()
    }
}

impl Display for Literal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.negated {
            write!(f, "-{}", self.variable)
        } else {
            write!(f, "{}", self.variable)
        }
    }
}
