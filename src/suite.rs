use std::{
    fmt::Display,
    path::{Path, PathBuf},
    time::{Duration, Instant},
};

use anyhow::{bail, Context, Result};
use indicatif::ProgressBar;
use itertools::Itertools;

use crate::parser::cnf;
use crate::solver::{Solution, Solver};

/// The answer a fixture is filed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expectation {
    Satisfiable,
    Unsatisfiable,
}

impl Expectation {
    fn directory(self) -> &'static str {
        match self {
            Expectation::Satisfiable => "satisfiable",
            Expectation::Unsatisfiable => "unsatisfiable",
        }
    }
}

/// The result of solving one fixture.
#[derive(Debug)]
pub struct Outcome {
    pub name: String,
    pub expected: Expectation,
    /// The solver's answer, or why the fixture could not be read.
    pub result: Result<Solution>,
    pub elapsed: Duration,
    /// Whether a returned model actually satisfies the fixture.
    pub verified: bool,
}

impl Outcome {
    pub fn passed(&self) -> bool {
        match (self.expected, &self.result) {
            (_, Err(_)) => false,
            (Expectation::Unsatisfiable, Ok(solution)) => solution.is_unsat(),
            (Expectation::Satisfiable, Ok(solution)) => solution.is_sat() && self.verified,
        }
    }
}

impl Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let millis = self.elapsed.as_millis();
        match (self.expected, &self.result) {
            (_, Err(err)) => write!(f, "FAILED: {} - {:#}", self.name, err),
            (Expectation::Unsatisfiable, Ok(Solution::Unsatisfiable)) => {
                write!(f, "PASSED in {}ms: {} - unsatisfiable", millis, self.name)
            }
            (Expectation::Unsatisfiable, Ok(Solution::Satisfiable(assignment))) => write!(
                f,
                "FAILED: {} - should be unsatisfiable, got - {}",
                self.name, assignment
            ),
            (Expectation::Satisfiable, Ok(Solution::Unsatisfiable)) => {
                write!(f, "FAILED: {} - should be satisfiable", self.name)
            }
            (Expectation::Satisfiable, Ok(Solution::Satisfiable(assignment))) if !self.verified => {
                write!(
                    f,
                    "FAILED: {} - assignment does not satisfy the formula - {}",
                    self.name, assignment
                )
            }
            (Expectation::Satisfiable, Ok(Solution::Satisfiable(_))) => {
                write!(f, "PASSED in {}ms: {} - assignment found", millis, self.name)
            }
        }
    }
}

/// All outcomes of a suite run in the order the fixtures were solved.
#[derive(Debug, Default)]
pub struct Report {
    outcomes: Vec<Outcome>,
}

impl Report {
    pub fn outcomes(&self) -> &[Outcome] {
        &self.outcomes
    }

    pub fn passed(&self) -> usize {
        self.outcomes.iter().filter(|o| o.passed()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.passed()
    }
}

/// Collect the fixture files of a suite, unsatisfiable ones first, each group
/// sorted by name.
fn fixtures(dir: &Path) -> Result<Vec<(Expectation, PathBuf)>> {
    let mut found_group = false;
    let mut fixtures = Vec::new();

    for expected in [Expectation::Unsatisfiable, Expectation::Satisfiable] {
        let group = dir.join(expected.directory());
        if !group.is_dir() {
            continue;
        }
        found_group = true;

        let entries = std::fs::read_dir(&group)
            .with_context(|| format!("could not list '{}'", group.display()))?
            .map(|entry| entry.map(|e| e.path()))
            .collect::<std::io::Result<Vec<_>>>()?;
        fixtures.extend(
            entries
                .into_iter()
                .filter(|path| path.is_file())
                .sorted()
                .map(|path| (expected, path)),
        );
    }

    if !found_group {
        bail!(
            "'{}' contains neither a satisfiable nor an unsatisfiable directory",
            dir.display()
        );
    }
    Ok(fixtures)
}

/// Solve every fixture below `dir` and print one line per fixture.
pub fn run(dir: &Path, solver: &Solver, progress: bool) -> Result<Report> {
    let fixtures = fixtures(dir)?;
    tracing::info!("running {} fixtures from {}", fixtures.len(), dir.display());

    let bar = if progress {
        ProgressBar::new(fixtures.len() as u64)
    } else {
        ProgressBar::hidden()
    };

    let mut report = Report::default();
    for (expected, path) in fixtures {
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let outcome = match cnf::read(&path) {
            Ok(formula) => {
                let start = Instant::now();
                let solution = solver.solve(&formula);
                let elapsed = start.elapsed();
                let verified = solution
                    .assignment()
                    .map_or(true, |assignment| assignment.satisfies(&formula));
                Outcome {
                    name,
                    expected,
                    result: Ok(solution),
                    elapsed,
                    verified,
                }
            }
            Err(err) => {
                tracing::warn!("skipping {}: {:#}", path.display(), err);
                Outcome {
                    name,
                    expected,
                    result: Err(err),
                    elapsed: Duration::ZERO,
                    verified: false,
                }
            }
        };
        bar.suspend(|| println!("{}", outcome));
        report.outcomes.push(outcome);
        bar.inc(1);
    }
    bar.finish_and_clear();

    Ok(report)
}
