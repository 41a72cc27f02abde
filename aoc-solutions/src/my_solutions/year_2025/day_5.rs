use crate::utils::interval::{self, parse_range, span};
use crate::utils::parse::sections;
use aoc_solver::{AocParser, ParseError, PartSolver, SolveError};
use aoc_solver_macros::{AocSolver, AutoRegisterSolver};
use std::ops::RangeInclusive;

#[derive(AocSolver, AutoRegisterSolver)]
#[aoc_solver(max_parts = 2)]
#[aoc(year = 2025, day = 5, tags = ["2025", "intervals"])]
pub struct Solver;

#[derive(Debug)]
pub struct Inventory {
    /// Merged fresh ranges, sorted by start
    fresh: Vec<RangeInclusive<u64>>,
    available: Vec<u64>,
}

impl Inventory {
    fn is_fresh(&self, id: u64) -> bool {
        let idx = self.fresh.partition_point(|range| *range.end() < id);
        self.fresh.get(idx).is_some_and(|range| range.contains(&id))
    }
}

impl AocParser for Solver {
    type SharedData<'a> = Inventory;

    fn parse<'a>(input: &'a str) -> Result<Self::SharedData<'a>, ParseError> {
        let [ranges, ids] = sections(input).try_into().map_err(|sections: Vec<_>| {
            ParseError::InvalidFormat(format!(
                "expected a range section and an id section, found {} sections",
                sections.len()
            ))
        })?;

        let fresh = ranges
            .into_iter()
            .map(parse_range)
            .collect::<Result<Vec<_>, _>>()?;
        let available = ids
            .into_iter()
            .map(|id| {
                id.trim()
                    .parse()
                    .map_err(|e| ParseError::InvalidFormat(format!("bad ingredient id '{id}': {e}")))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Inventory {
            fresh: interval::merge(fresh),
            available,
        })
    }
}

impl PartSolver<1> for Solver {
    fn solve(inventory: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        let fresh = inventory
            .available
            .iter()
            .filter(|&&id| inventory.is_fresh(id))
            .count();
        Ok(fresh.to_string())
    }
}

impl PartSolver<2> for Solver {
    fn solve(inventory: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        Ok(inventory.fresh.iter().map(span).sum::<u64>().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aoc_solver::Solver as _;

    const EXAMPLE: &str = "3-5\n10-14\n16-20\n12-18\n\n1\n5\n8\n11\n17\n32\n";

    #[test]
    fn test_part1_example() {
        let mut shared = Solver::parse(EXAMPLE).unwrap();
        assert_eq!(Solver::solve_part(&mut shared, 1).unwrap(), "3");
    }

    #[test]
    fn test_part2_example() {
        let mut shared = Solver::parse(EXAMPLE).unwrap();
        assert_eq!(Solver::solve_part(&mut shared, 2).unwrap(), "14");
    }

    #[test]
    fn test_range_boundaries_are_fresh() {
        let inventory = Solver::parse("3-5\n7-7\n\n3\n5\n6\n7\n8\n").unwrap();
        let fresh: Vec<_> = (2..=8).filter(|&id| inventory.is_fresh(id)).collect();
        assert_eq!(fresh, vec![3, 4, 5, 7]);
    }

    #[test]
    fn test_missing_id_section_rejected() {
        assert!(matches!(
            Solver::parse("3-5\n10-14\n"),
            Err(ParseError::InvalidFormat(_))
        ));
        assert!(Solver::parse("3-5\n\nabc\n").is_err());
    }
}
