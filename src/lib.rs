//! A backtracking satisfiability solver for formulas in conjunctive normal
//! form, with a reader for DIMACS problem files and a runner for directories of
//! fixture problems.

pub mod common;
pub mod parser;
pub mod solver;
pub mod suite;

pub use common::{Assignment, Clause, Formula, InvalidLiteral, Literal, Variable};
pub use solver::{solve, Solution, Solver, Stats};
