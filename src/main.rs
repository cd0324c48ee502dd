use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use satisfy::{parser, suite, Solution, Solver};

#[derive(Parser, Debug)]
struct Flags {
    #[arg(short, long)]
    /// Show a progress bar while running a directory of fixtures.
    progress: bool,
    #[arg(long)]
    /// Always try the value `true` first instead of the value that leaves fewer clauses.
    in_order: bool,
    #[arg(short, long)]
    /// Only print the status line of the solution.
    quiet: bool,
    /// A problem file in the DIMACS format, or a directory with `satisfiable` and
    /// `unsatisfiable` subdirectories holding such files.
    path: PathBuf,
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env())
        .init();
    let flags = Flags::parse();
    let solver = if flags.in_order {
        Solver::in_order()
    } else {
        Solver::default()
    };

    if flags.path.is_dir() {
        let report = suite::run(&flags.path, &solver, flags.progress)?;
        println!("{} passed, {} failed", report.passed(), report.failed());
        if report.failed() > 0 {
            bail!("{} fixtures failed", report.failed());
        }
        return Ok(());
    }

    let formula = parser::cnf::read(&flags.path)?;
    let solution = solver.solve(&formula);
    if let Solution::Satisfiable(assignment) = &solution {
        if !assignment.satisfies(&formula) {
            bail!("model does not satisfy the formula: {}", assignment);
        }
    }

    if flags.quiet {
        println!("{}", solution.to_dimacs().lines().next().unwrap_or_default());
    } else {
        print!("{}", solution.to_dimacs());
    }
    Ok(())
}
