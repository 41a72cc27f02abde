use crate::utils::interval::parse_range;
use crate::utils::reduce::{CountOverflow, Reduction};
use aoc_solver::{AocParser, ParseError, PartSolver, SolveError};
use aoc_solver_macros::{AocSolver, AutoRegisterSolver};
use std::collections::HashSet;
use std::ops::RangeInclusive;

#[derive(AocSolver, AutoRegisterSolver)]
#[aoc_solver(max_parts = 2)]
#[aoc(year = 2025, day = 2, tags = ["2025", "math"])]
pub struct Solver;

impl AocParser for Solver {
    /// Product id ranges in input order
    type SharedData<'a> = Vec<RangeInclusive<u64>>;

    fn parse<'a>(input: &'a str) -> Result<Self::SharedData<'a>, ParseError> {
        let ranges = input
            .split([',', '\n'])
            .map(str::trim)
            .filter(|piece| !piece.is_empty())
            .map(parse_range)
            .collect::<Result<Vec<_>, _>>()?;

        if ranges.is_empty() {
            return Err(ParseError::MissingData("no id ranges".to_string()));
        }
        Ok(ranges)
    }
}

impl PartSolver<1> for Solver {
    fn solve(ranges: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        Ok(sum_repeated_ids(ranges, |repeats| repeats == 2)?.to_string())
    }
}

impl PartSolver<2> for Solver {
    fn solve(ranges: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        Ok(sum_repeated_ids(ranges, |repeats| repeats >= 2)?.to_string())
    }
}

/// Sum over every range of the repeated-block ids it contains
///
/// Ranges are summed independently: an id inside two overlapping ranges is
/// counted for each of them.
fn sum_repeated_ids(
    ranges: &[RangeInclusive<u64>],
    accept: impl Fn(u32) -> bool,
) -> Result<u64, CountOverflow> {
    Reduction::Sum.try_reduce(
        ranges
            .iter()
            .map(|range| Reduction::Sum.reduce(repeated_ids(range, &accept))),
    )
}

/// Ids inside `range` whose digits are one block written `repeats` times,
/// for every repeat count accepted by `accept`
///
/// An id such as `222222` is returned once even though it repeats blocks of
/// several lengths.
fn repeated_ids(range: &RangeInclusive<u64>, accept: impl Fn(u32) -> bool) -> HashSet<u64> {
    let max_digits = digit_count(*range.end());

    let mut found = HashSet::new();
    for block_digits in 1..=max_digits / 2 {
        for repeats in (2..=max_digits / block_digits).filter(|&r| accept(r)) {
            let multiplier = repeat_multiplier(block_digits, repeats);
            let block_min = 10u128.pow(block_digits - 1);
            let block_max = 10u128.pow(block_digits) - 1;

            let low = u128::from(*range.start()).div_ceil(multiplier).max(block_min);
            let high = (u128::from(*range.end()) / multiplier).min(block_max);
            for block in low..=high {
                if let Ok(id) = u64::try_from(block * multiplier) {
                    found.insert(id);
                }
            }
        }
    }
    found
}

/// `1`, `101`, `10101`, ... for the given block width: multiplying a block by
/// this writes it `repeats` times
fn repeat_multiplier(block_digits: u32, repeats: u32) -> u128 {
    let shift = 10u128.pow(block_digits);
    (0..repeats).fold(0, |acc, _| acc * shift + 1)
}

fn digit_count(n: u64) -> u32 {
    n.checked_ilog10().map_or(1, |log| log + 1)
}
