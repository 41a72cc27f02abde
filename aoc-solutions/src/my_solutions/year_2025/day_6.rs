use crate::utils::reduce::{CountOverflow, Reduction};
use aoc_solver::{AocParser, ParseError, PartSolver, SolveError};
use aoc_solver_macros::{AocSolver, AutoRegisterSolver};
use itertools::Itertools;

#[derive(AocSolver, AutoRegisterSolver)]
#[aoc_solver(max_parts = 2)]
#[aoc(year = 2025, day = 6, tags = ["2025", "parsing"])]
pub struct Solver;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Problem {
    numbers: Vec<u64>,
    operation: Reduction,
}

impl Problem {
    fn answer(&self) -> Result<u64, CountOverflow> {
        self.operation.reduce(self.numbers.iter().copied())
    }
}

/// The same worksheet read two ways
#[derive(Debug)]
pub struct Worksheet {
    /// Numbers written left to right along each row
    by_rows: Vec<Problem>,
    /// Numbers written top to bottom in each character column
    by_columns: Vec<Problem>,
}

impl AocParser for Solver {
    type SharedData<'a> = Worksheet;

    fn parse<'a>(input: &'a str) -> Result<Self::SharedData<'a>, ParseError> {
        let mut lines: Vec<&str> = input.lines().filter(|line| !line.trim().is_empty()).collect();
        let operator_line = lines
            .pop()
            .ok_or_else(|| ParseError::MissingData("empty worksheet".to_string()))?;
        if lines.is_empty() {
            return Err(ParseError::MissingData("worksheet has no numbers".to_string()));
        }

        let operations = operator_line
            .split_whitespace()
            .map(|symbol| match symbol {
                "+" => Ok(Reduction::Sum),
                "*" => Ok(Reduction::Product),
                other => Err(ParseError::InvalidFormat(format!("unknown operator '{other}'"))),
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Worksheet {
            by_rows: attach_operations(read_rows(&lines)?, &operations)?,
            by_columns: attach_operations(read_columns(&lines)?, &operations)?,
        })
    }
}

impl PartSolver<1> for Solver {
    fn solve(worksheet: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        Ok(grand_total(&worksheet.by_rows)?.to_string())
    }
}

impl PartSolver<2> for Solver {
    fn solve(worksheet: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        Ok(grand_total(&worksheet.by_columns)?.to_string())
    }
}

fn grand_total(problems: &[Problem]) -> Result<u64, CountOverflow> {
    Reduction::Sum.try_reduce(problems.iter().map(Problem::answer))
}

fn attach_operations(
    groups: Vec<Vec<u64>>,
    operations: &[Reduction],
) -> Result<Vec<Problem>, ParseError> {
    if groups.len() != operations.len() {
        return Err(ParseError::InvalidFormat(format!(
            "{} problems but {} operators",
            groups.len(),
            operations.len()
        )));
    }
    Ok(groups
        .into_iter()
        .zip(operations)
        .map(|(numbers, &operation)| Problem { numbers, operation })
        .collect())
}

/// Whitespace separated numbers, transposed so each group is one problem
fn read_rows(lines: &[&str]) -> Result<Vec<Vec<u64>>, ParseError> {
    let rows = lines
        .iter()
        .enumerate()
        .map(|(line_idx, line)| {
            line.split_whitespace()
                .map(|n| {
                    n.parse::<u64>()
                        .map_err(|e| ParseError::at_line(line_idx, format!("bad number '{n}': {e}")))
                })
                .collect::<Result<Vec<_>, _>>()
        })
        .collect::<Result<Vec<_>, _>>()?;

    let width = rows.first().map_or(0, Vec::len);
    if let Some((line_idx, row)) = rows.iter().find_position(|row| row.len() != width) {
        return Err(ParseError::at_line(
            line_idx,
            format!("row has {} numbers, expected {width}", row.len()),
        ));
    }

    Ok((0..width)
        .map(|col| rows.iter().map(|row| row[col]).collect())
        .collect())
}

/// One number per character column, read top to bottom, with columns taken
/// right to left; columns of spaces separate problems
///
/// Lines shorter than the widest one are treated as padded with spaces.
/// Problems come out in left-to-right order to line up with the operators.
fn read_columns(lines: &[&str]) -> Result<Vec<Vec<u64>>, ParseError> {
    let width = lines.iter().map(|line| line.len()).max().unwrap_or(0);

    let mut groups = vec![Vec::new()];
    for col in (0..width).rev() {
        let digits: Vec<u8> = lines
            .iter()
            .filter_map(|line| line.as_bytes().get(col).copied())
            .filter(|&b| b != b' ')
            .collect();

        if digits.is_empty() {
            groups.push(Vec::new());
            continue;
        }

        let mut number = 0u64;
        for digit in digits {
            if !digit.is_ascii_digit() {
                return Err(ParseError::InvalidFormat(format!(
                    "'{}' in column {} is not a digit",
                    digit as char,
                    col + 1
                )));
            }
            number = number * 10 + u64::from(digit - b'0');
        }
        if let Some(group) = groups.last_mut() {
            group.push(number);
        }
    }

    groups.retain(|group| !group.is_empty());
    groups.reverse();
    Ok(groups)
}

#[cfg(test)]
mod tests {
    use super::*;
    use aoc_solver::Solver as _;

    const EXAMPLE: &str = "\
123 328  51 64
 45 64  387 23
  6 98  215 314
*   +   *   +
";

    #[test]
    fn test_part1_example() {
        let mut shared = Solver::parse(EXAMPLE).unwrap();
        assert_eq!(Solver::solve_part(&mut shared, 1).unwrap(), "4277556");
    }

    #[test]
    fn test_part2_example() {
        let mut shared = Solver::parse(EXAMPLE).unwrap();
        assert_eq!(Solver::solve_part(&mut shared, 2).unwrap(), "3263827");
    }

    #[test]
    fn test_column_reading() {
        let lines = ["123 328", " 45 64 ", "  6 98"];
        assert_eq!(
            read_columns(&lines).unwrap(),
            vec![vec![356, 24, 1], vec![8, 248, 369]]
        );
    }

    #[test]
    fn test_operator_count_mismatch_rejected() {
        assert!(Solver::parse("1 2\n3 4\n+\n").is_err());
        assert!(Solver::parse("1 2\n3 4\n+ /\n").is_err());
        assert!(Solver::parse("+ *\n").is_err());
    }
}
