use crate::utils::parse::parse_lines;
use crate::utils::reduce::Reduction;
use anyhow::anyhow;
use aoc_solver::{AocParser, ParseError, PartSolver, SolveError};
use aoc_solver_macros::{AocSolver, AutoRegisterSolver};

#[derive(AocSolver, AutoRegisterSolver)]
#[aoc_solver(max_parts = 2)]
#[aoc(year = 2025, day = 3, tags = ["2025", "greedy"])]
pub struct Solver;

impl AocParser for Solver {
    /// One bank of battery joltage digits per line
    type SharedData<'a> = Vec<Vec<u8>>;

    fn parse<'a>(input: &'a str) -> Result<Self::SharedData<'a>, ParseError> {
        let banks = parse_lines(input, |line| {
            line.trim()
                .bytes()
                .map(|b| {
                    b.is_ascii_digit()
                        .then(|| b - b'0')
                        .ok_or_else(|| anyhow!("'{}' is not a joltage digit", b as char))
                })
                .collect()
        })?;

        if banks.is_empty() {
            return Err(ParseError::MissingData("no battery banks".to_string()));
        }
        Ok(banks)
    }
}

impl PartSolver<1> for Solver {
    fn solve(banks: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        total_joltage(banks, 2).map(|total| total.to_string())
    }
}

impl PartSolver<2> for Solver {
    fn solve(banks: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        total_joltage(banks, 12).map(|total| total.to_string())
    }
}

fn total_joltage(banks: &[Vec<u8>], batteries: usize) -> Result<u64, SolveError> {
    Reduction::Sum.try_reduce(banks.iter().map(|bank| {
        max_joltage(bank, batteries).ok_or_else(|| {
            SolveError::SolveFailed(
                format!("bank of {} batteries cannot turn on {batteries}", bank.len()).into(),
            )
        })
    }))
}

/// Largest number formed by `batteries` digits of `bank`, keeping their order
///
/// Each digit is the first maximum in the window that still leaves enough
/// digits for the remaining positions.
fn max_joltage(bank: &[u8], batteries: usize) -> Option<u64> {
    if batteries == 0 || bank.len() < batteries {
        return None;
    }

    let mut start = 0;
    let mut joltage = 0u64;
    for remaining in (0..batteries).rev() {
        let window = &bank[start..bank.len() - remaining];
        let (offset, &digit) = window
            .iter()
            .enumerate()
            .rev()
            .max_by_key(|&(_, digit)| digit)?;
        joltage = joltage * 10 + u64::from(digit);
        start += offset + 1;
    }
    Some(joltage)
}

#[cfg(test)]
mod tests {
    use super::*;
    use aoc_solver::Solver as _;

    const EXAMPLE: &str = "987654321111111\n811111111111119\n234234234234278\n818181911112111\n";

    #[test]
    fn test_part1_example() {
        let mut shared = Solver::parse(EXAMPLE).unwrap();
        assert_eq!(Solver::solve_part(&mut shared, 1).unwrap(), "357");
    }

    #[test]
    fn test_part2_example() {
        let mut shared = Solver::parse(EXAMPLE).unwrap();
        assert_eq!(Solver::solve_part(&mut shared, 2).unwrap(), "3121910778619");
    }

    #[test]
    fn test_first_maximum_wins() {
        assert_eq!(max_joltage(&[9, 1, 9, 1], 2), Some(99));
        assert_eq!(max_joltage(&[8, 1, 1, 9], 2), Some(89));
        assert_eq!(max_joltage(&[1, 2], 3), None);
    }

    #[test]
    fn test_short_bank_fails_part2() {
        let mut shared = Solver::parse("12345\n").unwrap();
        assert!(matches!(
            Solver::solve_part(&mut shared, 2),
            Err(SolveError::SolveFailed(_))
        ));
    }
}
