use std::path::Path;

use super::{parse_tokens, parse_usize};
use crate::common::{Clause, Formula, Literal};
use anyhow::{anyhow, Context, Result};
use nom::{
    bytes::complete::tag,
    character::complete::{multispace0, multispace1},
    sequence::tuple,
    IResult, Parser,
};
use tracing::{debug, info, warn};

pub struct Header {
    pub vars: usize,
    pub clauses: usize,
}

fn parse_header(input: &str) -> IResult<&str, Header> {
    let (input, _) =
        tuple((multispace0, tag("p"), multispace1, tag("cnf"), multispace1)).parse(input)?;
    let (input, (vars, _, clauses)) =
        tuple((parse_usize, multispace1, parse_usize)).parse(input)?;
    Ok((input, Header { vars, clauses }))
}

/// Parse a problem in the DIMACS format.
///
/// Lines starting with `c` are comments and lines starting with `p` are
/// headers. A line starting with `%` ends the problem. Every other line holds
/// one clause, its tokens are taken as literals verbatim except for the `0`
/// terminator.
pub fn parse(input: &str) -> Result<Formula> {
    info!("parsing cnf");
    let mut header = None;
    let mut clauses = Vec::new();

    for (index, line) in input.lines().enumerate() {
        let number = index + 1;
        if line.starts_with('%') {
            break;
        } else if line.starts_with('c') {
            continue;
        } else if line.starts_with('p') {
            match parse_header(line) {
                Ok((_, h)) => {
                    info!("{} variables and {} clauses", h.vars, h.clauses);
                    header = Some(h);
                }
                Err(_) => warn!("ignoring malformed header '{}' on line {}", line, number),
            }
            continue;
        }

        let (_, tokens) =
            parse_tokens(line).map_err(|_| anyhow!("invalid clause '{}' on line {}", line, number))?;
        // blank lines separate nothing and are not clauses
        if tokens.is_empty() {
            continue;
        }

        let clause = tokens
            .into_iter()
            .filter(|&token| token != "0")
            .map(str::parse::<Literal>)
            .collect::<Result<Clause, _>>()
            .with_context(|| format!("invalid clause '{}' on line {}", line, number))?;
        if clause.is_tautology() {
            debug!("clause ({}) on line {} is a tautology", clause, number);
        }
        clauses.push(clause);
    }

    if let Some(h) = header {
        if h.clauses != clauses.len() {
            warn!(
                "header announces {} clauses but {} were read",
                h.clauses,
                clauses.len()
            );
        }
    }

    Ok(clauses.into_iter().collect())
}

/// Read and parse a problem file.
pub fn read(path: impl AsRef<Path>) -> Result<Formula> {
    let path = path.as_ref();
    let input = std::fs::read_to_string(path)
        .with_context(|| format!("could not read '{}'", path.display()))?;
    parse(&input).with_context(|| format!("could not parse '{}'", path.display()))
}
