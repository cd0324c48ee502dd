pub mod cnf;

use nom::{
    bytes::complete::take_till1,
    character::complete::{digit1, multispace0, multispace1},
    combinator::map_res,
    multi::separated_list0,
    sequence::delimited,
    IResult, Parser,
};

fn parse_usize(input: &str) -> IResult<&str, usize> {
    map_res(digit1, str::parse).parse(input)
}

/// Splits a clause line into its raw tokens. Turning them into literals is left
/// to the caller so that errors can name the offending token.
fn parse_tokens(input: &str) -> IResult<&str, Vec<&str>> {
    delimited(
        multispace0,
        separated_list0(multispace1, take_till1(char::is_whitespace)),
        multispace0,
    )
    .parse(input)
}
