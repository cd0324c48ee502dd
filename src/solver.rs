use std::fmt::Display;

use itertools::Itertools;

use crate::common::{Assignment, Formula, Literal, Variable};

const MAX_LITERALS_PER_LINE: usize = 8;

/// Raised when a branch of the search cannot be extended to a model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Unsat;

/// The result of solving a formula.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Solution {
    /// A model assigning every variable of the formula.
    Satisfiable(Assignment),
    Unsatisfiable,
}

impl Solution {
    pub fn is_sat(&self) -> bool {
        matches!(self, Solution::Satisfiable(_))
    }

    pub fn is_unsat(&self) -> bool {
        matches!(self, Solution::Unsatisfiable)
    }

    pub fn assignment(&self) -> Option<&Assignment> {
        match self {
            Solution::Satisfiable(assignment) => Some(assignment),
            Solution::Unsatisfiable => None,
        }
    }

    /// Render the solution in the output format of the SAT competition: a
    /// status line, followed by value lines for satisfiable formulas.
    pub fn to_dimacs(&self) -> String {
        match self {
            Solution::Unsatisfiable => "s UNSATISFIABLE\n".to_string(),
            Solution::Satisfiable(assignment) => {
                let values = assignment
                    .literals()
                    .chunks(MAX_LITERALS_PER_LINE)
                    .into_iter()
                    .map(|line| format!("v {} 0\n", line.format(" ")))
                    .collect::<String>();
                format!("s SATISFIABLE\n{}", values)
            }
        }
    }
}

impl Display for Solution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Solution::Satisfiable(assignment) => write!(f, "Satisfiable: {}", assignment),
            Solution::Unsatisfiable => write!(f, "Unsatisfiable"),
        }
    }
}

/// Counters collected during a single solve.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Stats {
    /// Variables on which both values had to be explored.
    pub decisions: usize,
    /// Branches abandoned after their subtree was exhausted.
    pub backtracks: usize,
    pub max_depth: usize,
}

/// Backtracking search over partial assignments.
///
/// Every step fixes one variable, derives the formula that remains under
/// either value and recurses into the reductions until a formula without
/// clauses (a model) or one holding the empty clause (a dead end) is reached.
#[derive(Debug, Clone, Copy)]
pub struct Solver {
    /// Explore the value that leaves fewer clauses first instead of always
    /// trying `true` first.
    smallest_branch_first: bool,
}

impl Default for Solver {
    fn default() -> Self {
        Solver {
            smallest_branch_first: true,
        }
    }
}

impl Solver {
    pub fn in_order() -> Self {
        Solver {
            smallest_branch_first: false,
        }
    }

    pub fn solve(&self, formula: &Formula) -> Solution {
        self.solve_with_stats(formula).0
    }

    pub fn solve_with_stats(&self, formula: &Formula) -> (Solution, Stats) {
        let mut assignment = Assignment::new();
        let mut stats = Stats::default();
        let result = self.search(formula, &mut assignment, &mut stats, 0);
        tracing::debug!(
            decisions = stats.decisions,
            backtracks = stats.backtracks,
            max_depth = stats.max_depth,
            "search finished"
        );

        match result {
            Ok(()) => {
                // variables that only occur in clauses satisfied along the way
                // were never decided, any value works for them
                for variable in formula.variables() {
                    if !assignment.contains(&variable) {
                        assignment.assign(variable, false);
                    }
                }
                (Solution::Satisfiable(assignment), stats)
            }
            Err(Unsat) => (Solution::Unsatisfiable, stats),
        }
    }

    /// Extend the assignment to a model of the formula. On failure the
    /// assignment is left exactly as it was passed in.
    fn search(
        &self,
        formula: &Formula,
        assignment: &mut Assignment,
        stats: &mut Stats,
        depth: usize,
    ) -> Result<(), Unsat> {
        stats.max_depth = stats.max_depth.max(depth);

        if formula.is_empty() {
            return Ok(());
        }
        if formula.has_empty_clause() {
            return Err(Unsat);
        }

        let variable = match Solver::pick_branching_variable(formula, assignment) {
            Some(variable) => variable.clone(),
            None => {
                tracing::warn!("no unassigned variable left in {}", formula);
                return Err(Unsat);
            }
        };

        let when_true = formula.reduce(&variable, true);
        if when_true.is_empty() {
            assignment.assign(variable, true);
            return Ok(());
        }
        let when_false = formula.reduce(&variable, false);
        if when_false.is_empty() {
            assignment.assign(variable, false);
            return Ok(());
        }

        stats.decisions += 1;
        let branches = if self.smallest_branch_first && when_false.len() < when_true.len() {
            [(false, when_false), (true, when_true)]
        } else {
            [(true, when_true), (false, when_false)]
        };

        for (value, reduced) in branches {
            tracing::trace!(depth, "branching on {}", Literal::new(variable.clone(), value));
            assignment.assign(variable.clone(), value);
            if self.search(&reduced, assignment, stats, depth + 1).is_ok() {
                return Ok(());
            }
            stats.backtracks += 1;
        }

        tracing::trace!(depth, "both values of {} failed", variable);
        assignment.unassign(&variable);
        Err(Unsat)
    }

    /// Picks the first unassigned variable, scanning the clauses in order.
    fn pick_branching_variable<'a>(
        formula: &'a Formula,
        assignment: &Assignment,
    ) -> Option<&'a Variable> {
        formula
            .clauses()
            .flat_map(|clause| clause.variables())
            .find(|&variable| !assignment.contains(variable))
    }
}

/// Solve a formula with the default solver configuration.
pub fn solve(formula: &Formula) -> Solution {
    Solver::default().solve(formula)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::Clause;
    use proptest::{collection::vec, prelude::*};

    const VARIABLES: [&str; 4] = ["a", "b", "c", "d"];

    fn formula(clauses: &[&[&str]]) -> Formula {
        Formula::from_tokens(clauses.iter().map(|c| c.iter())).unwrap()
    }

    fn var(name: &str) -> Variable {
        name.parse().unwrap()
    }

    /// Decide satisfiability by trying every assignment of the variables.
    fn truth_table(formula: &Formula) -> bool {
        let variables = formula.variables();
        (0..1u32 << variables.len()).any(|bits| {
            let mut assignment = Assignment::new();
            for (i, variable) in variables.iter().enumerate() {
                assignment.assign(variable.clone(), bits >> i & 1 == 1);
            }
            assignment.satisfies(formula)
        })
    }

    fn model_of(solution: &Solution) -> &Assignment {
        solution.assignment().expect("expected a model")
    }

    #[test]
    fn empty_formula_has_the_empty_model() {
        let solution = solve(&Formula::default());
        assert_eq!(solution, Solution::Satisfiable(Assignment::new()));
    }

    #[test]
    fn empty_clause_is_unsat() {
        assert!(solve(&formula(&[&[]])).is_unsat());
        assert!(solve(&formula(&[&["x", "y"], &[], &["-x"]])).is_unsat());
    }

    #[test]
    fn single_unit_clause() {
        let solution = solve(&formula(&[&["x"]]));
        let model = model_of(&solution);
        assert_eq!(model.len(), 1);
        assert_eq!(model.value(&var("x")), Some(true));
    }

    #[test]
    fn direct_contradiction_is_unsat() {
        assert!(solve(&formula(&[&["x"], &["-x"]])).is_unsat());
    }

    #[test]
    fn forced_values_are_found() {
        let f = formula(&[&["-x", "y"], &["-y"]]);
        let solution = solve(&f);
        let model = model_of(&solution);
        assert_eq!(model.value(&var("x")), Some(false));
        assert_eq!(model.value(&var("y")), Some(false));
    }

    #[test]
    fn three_clause_chain_is_unsat() {
        // (x | y) and (-y) force x, (-x | y) and (-y) forbid it
        let f = formula(&[&["x", "y"], &["-x", "y"], &["-y"]]);
        assert!(solve(&f).is_unsat());
        assert!(!truth_table(&f));
    }

    #[test]
    fn tautologies_never_fail() {
        let f = formula(&[&["x", "-x"], &["y", "-y", "z"]]);
        let solution = solve(&f);
        assert!(model_of(&solution).satisfies(&f));
    }

    #[test]
    fn undecided_variables_are_completed() {
        let f = formula(&[&["x", "y"], &["x", "-z"]]);
        let solution = solve(&f);
        let model = model_of(&solution);
        assert_eq!(model.value(&var("x")), Some(true));
        assert_eq!(model.value(&var("y")), Some(false));
        assert_eq!(model.value(&var("z")), Some(false));
    }

    #[test]
    fn smaller_branch_is_tried_first() {
        let f = formula(&[&["-a", "p"], &["-a", "q"], &["a", "r", "s"]]);

        let (solution, stats) = Solver::default().solve_with_stats(&f);
        let model = model_of(&solution);
        assert_eq!(model.value(&var("a")), Some(false));
        assert_eq!(model.value(&var("r")), Some(true));
        assert_eq!(stats.decisions, 1);
        assert_eq!(stats.backtracks, 0);

        let solution = Solver::in_order().solve(&f);
        let model = model_of(&solution);
        assert_eq!(model.value(&var("a")), Some(true));
        assert_eq!(model.value(&var("p")), Some(true));
        assert_eq!(model.value(&var("q")), Some(true));
    }

    #[test]
    fn contradiction_backtracks_both_values() {
        let (solution, stats) = Solver::default().solve_with_stats(&formula(&[&["x"], &["-x"]]));
        assert!(solution.is_unsat());
        assert_eq!(stats.decisions, 1);
        assert_eq!(stats.backtracks, 2);
        assert_eq!(stats.max_depth, 1);
    }

    #[test]
    fn failed_search_restores_the_assignment() {
        let f = formula(&[&["x", "y"], &["-x", "y"], &["x", "-y"], &["-x", "-y"]]);
        let mut assignment = Assignment::new();
        assignment.assign(var("w"), true);
        let before = assignment.clone();

        let result =
            Solver::default().search(&f, &mut assignment, &mut Stats::default(), 0);
        assert_eq!(result, Err(Unsat));
        assert_eq!(assignment, before);
    }

    #[test]
    fn selection_skips_assigned_variables_across_clauses() {
        let f = formula(&[&["x"], &["-x", "y"]]);
        let mut assignment = Assignment::new();
        assignment.assign(var("x"), true);
        let picked = Solver::pick_branching_variable(&f, &assignment);
        assert_eq!(picked, Some(&var("y")));

        assignment.assign(var("y"), true);
        assert_eq!(Solver::pick_branching_variable(&f, &assignment), None);
    }

    #[test]
    fn formula_is_not_mutated_by_solving() {
        let f = formula(&[&["x", "y"], &["-x"], &["-y", "z"]]);
        let copy = f.clone();
        let first = solve(&f);
        let second = solve(&f);
        assert_eq!(f, copy);
        assert!(model_of(&first).satisfies(&f));
        assert!(model_of(&second).satisfies(&f));
    }

    #[test]
    fn renders_dimacs_solution_lines() {
        assert_eq!(Solution::Unsatisfiable.to_dimacs(), "s UNSATISFIABLE\n");

        let f = Formula::from_tokens((1..=10).map(|i| vec![format!("-{}", i)])).unwrap();
        let dimacs = solve(&f).to_dimacs();
        let lines: Vec<_> = dimacs.lines().collect();
        assert_eq!(lines[0], "s SATISFIABLE");
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1], "v -1 -2 -3 -4 -5 -6 -7 -8 0");
        assert_eq!(lines[2], "v -9 -10 0");
    }

    fn arbitrary_formula() -> impl Strategy<Value = Formula> {
        vec(vec((0..VARIABLES.len(), any::<bool>()), 1..=3), 0..=8).prop_map(|clauses| {
            clauses
                .into_iter()
                .map(|clause| {
                    clause
                        .into_iter()
                        .map(|(i, value)| Literal::new(var(VARIABLES[i]), value))
                        .collect::<Clause>()
                })
                .collect::<Formula>()
        })
    }

    proptest! {
        #[test]
        fn models_satisfy_every_clause(f in arbitrary_formula()) {
            if let Solution::Satisfiable(model) = solve(&f) {
                prop_assert!(model.satisfies(&f));
                prop_assert_eq!(model.len(), f.variables().len());
            }
        }

        #[test]
        fn agrees_with_the_truth_table(f in arbitrary_formula()) {
            prop_assert_eq!(solve(&f).is_sat(), truth_table(&f));
            prop_assert_eq!(Solver::in_order().solve(&f).is_sat(), truth_table(&f));
        }
    }
}
