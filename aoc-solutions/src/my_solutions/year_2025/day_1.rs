use crate::utils::parse::parse_lines;
use anyhow::{anyhow, bail};
use aoc_solver::{AocParser, ParseError, PartSolver, SolveError};
use aoc_solver_macros::{AocSolver, AutoRegisterSolver};

const DIAL_SIZE: u32 = 100;
const DIAL_START: u32 = 50;

#[derive(AocSolver, AutoRegisterSolver)]
#[aoc_solver(max_parts = 2)]
#[aoc(year = 2025, day = 1, tags = ["2025", "simulation"])]
pub struct Solver;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rotation {
    Left(u32),
    Right(u32),
}

#[derive(Debug)]
pub struct SharedData {
    rotations: Vec<Rotation>,
    zero_counts: Option<ZeroCounts>,
}

#[derive(Debug, Clone, Copy)]
struct ZeroCounts {
    /// Rotations that leave the dial at 0
    resting: u32,
    /// Single clicks that land on 0, including the final one
    clicks: u32,
}

impl AocParser for Solver {
    type SharedData<'a> = SharedData;

    fn parse<'a>(input: &'a str) -> Result<Self::SharedData<'a>, ParseError> {
        let rotations = parse_lines(input, |line| {
            let (direction, clicks) = line.trim().split_at_checked(1)
                .ok_or_else(|| anyhow!("empty rotation"))?;
            let clicks: u32 = clicks.parse()?;
            match direction {
                "L" => Ok(Rotation::Left(clicks)),
                "R" => Ok(Rotation::Right(clicks)),
                other => bail!("first character need to be 'L' or 'R', got '{other}'"),
            }
        })?;

        Ok(SharedData {
            rotations,
            zero_counts: None,
        })
    }
}

impl PartSolver<1> for Solver {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        Ok(count_zeros(shared).resting.to_string())
    }
}

impl PartSolver<2> for Solver {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        Ok(count_zeros(shared).clicks.to_string())
    }
}

fn count_zeros(shared: &mut SharedData) -> ZeroCounts {
    let rotations = &shared.rotations;
    *shared.zero_counts.get_or_insert_with(|| {
        let mut dial = DIAL_START;
        let mut counts = ZeroCounts {
            resting: 0,
            clicks: 0,
        };

        for rotation in rotations {
            let (next, passes) = rotate(dial, *rotation);
            dial = next;
            counts.clicks += passes;
            if dial == 0 {
                counts.resting += 1;
            }
        }
        counts
    })
}

/// New dial position and how many clicks on the way pointed at 0
fn rotate(dial: u32, rotation: Rotation) -> (u32, u32) {
    match rotation {
        Rotation::Right(clicks) => ((dial + clicks) % DIAL_SIZE, (dial + clicks) / DIAL_SIZE),
        Rotation::Left(clicks) => {
            let next = (dial + DIAL_SIZE - clicks % DIAL_SIZE) % DIAL_SIZE;
            let passes = if dial == 0 {
                clicks / DIAL_SIZE
            } else if clicks >= dial {
                1 + (clicks - dial) / DIAL_SIZE
            } else {
                0
            };
            (next, passes)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aoc_solver::Solver as _;

    const EXAMPLE: &str = "L68\nL30\nR48\nL5\nR60\nL55\nL1\nL99\nR14\nL82\n";

    #[test]
    fn test_part1_example() {
        let mut shared = Solver::parse(EXAMPLE).unwrap();
        assert_eq!(Solver::solve_part(&mut shared, 1).unwrap(), "3");
    }

    #[test]
    fn test_part2_example() {
        let mut shared = Solver::parse(EXAMPLE).unwrap();
        assert_eq!(Solver::solve_part(&mut shared, 2).unwrap(), "6");
    }

    #[test]
    fn test_large_rotations_pass_zero_repeatedly() {
        assert_eq!(rotate(50, Rotation::Right(1000)), (50, 10));
        assert_eq!(rotate(0, Rotation::Left(250)), (50, 2));
        assert_eq!(rotate(5, Rotation::Left(5)), (0, 1));
    }

    #[test]
    fn test_invalid_direction_rejected() {
        assert!(Solver::parse("U10").is_err());
        assert!(Solver::parse("R1x").is_err());
    }
}
