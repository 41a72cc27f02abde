use crate::utils::parse::{parse_lines, parse_separated};
use crate::utils::reduce::{CountOverflow, Reduction};
use crate::utils::search::BreadthFirst;
use anyhow::{Context, ensure};
use aoc_solver::{AocParser, ParseError, PartSolver, SolveError};
use aoc_solver_macros::{AocSolver, AutoRegisterSolver};
use regex::Regex;
use std::sync::LazyLock;
use thiserror::Error;

static LIGHTS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\[([.#]+)\]").unwrap());
static BUTTON: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\(([\d,]*)\)").unwrap());
static JOLTAGE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\{([\d,]*)\}").unwrap());

#[derive(AocSolver, AutoRegisterSolver)]
#[aoc_solver(max_parts = 2)]
#[aoc(year = 2025, day = 10, tags = ["2025", "search", "linear-algebra"])]
pub struct Solver;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Machine {
    /// Indicator lights that must end up on, one bit per light
    target: u64,
    /// Counters (and lights) toggled by each button
    buttons: Vec<Vec<usize>>,
    joltage: Vec<u64>,
}

#[derive(Debug, Error)]
pub enum MachineError {
    #[error("indicator lights cannot reach {target:#b} with these buttons")]
    LightsUnreachable { target: u64 },
    #[error("joltage levels {0:?} cannot be reached with these buttons")]
    JoltageUnreachable(Vec<u64>),
    #[error("total presses: {0}")]
    Overflow(#[from] CountOverflow),
}

impl From<MachineError> for SolveError {
    fn from(err: MachineError) -> Self {
        SolveError::SolveFailed(Box::new(err))
    }
}

impl AocParser for Solver {
    type SharedData<'a> = Vec<Machine>;

    fn parse<'a>(input: &'a str) -> Result<Self::SharedData<'a>, ParseError> {
        let machines = parse_lines(input, |line| {
            let lights = LIGHTS
                .captures(line)
                .and_then(|caps| caps.get(1))
                .context("missing [indicator lights]")?
                .as_str();
            ensure!(lights.len() <= 64, "{} lights do not fit in 64 bits", lights.len());

            let target = lights
                .bytes()
                .enumerate()
                .filter(|&(_, b)| b == b'#')
                .fold(0u64, |mask, (i, _)| mask | 1 << i);

            let buttons = BUTTON
                .captures_iter(line)
                .map(|caps| parse_separated::<usize>(&caps[1], ','))
                .collect::<anyhow::Result<Vec<_>>>()?;
            ensure!(!buttons.is_empty(), "machine has no buttons");
            if let Some(counter) = buttons.iter().flatten().find(|&&c| c >= lights.len()) {
                anyhow::bail!("button wired to counter {counter} of {}", lights.len());
            }

            let joltage = JOLTAGE
                .captures(line)
                .map(|caps| parse_separated::<u64>(&caps[1], ','))
                .context("missing {joltage requirements}")??;
            ensure!(
                joltage.len() == lights.len(),
                "{} joltage levels for {} lights",
                joltage.len(),
                lights.len()
            );

            Ok(Machine {
                target,
                buttons,
                joltage,
            })
        })?;

        if machines.is_empty() {
            return Err(ParseError::MissingData("no machines".to_string()));
        }
        Ok(machines)
    }
}

impl PartSolver<1> for Solver {
    fn solve(machines: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        let total = Reduction::Sum.par_try_reduce(machines, fewest_presses_for_lights)?;
        Ok(total.to_string())
    }
}

impl PartSolver<2> for Solver {
    fn solve(machines: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        let total = Reduction::Sum.par_try_reduce(machines, fewest_presses_for_joltage)?;
        Ok(total.to_string())
    }
}

/// Breadth-first search over light states, where each press toggles the
/// button's lights
///
/// Pressing a button twice cancels out, so no shortest sequence is longer
/// than the number of buttons.
fn fewest_presses_for_lights(machine: &Machine) -> Result<u64, MachineError> {
    let masks: Vec<u64> = machine
        .buttons
        .iter()
        .map(|button| button.iter().fold(0u64, |mask, &light| mask | 1 << light))
        .collect();

    BreadthFirst::new(|&state: &u64| masks.iter().map(move |mask| state ^ mask))
        .max_depth(masks.len())
        .min_transitions(0u64, |&state| state == machine.target)
        .map(|presses| presses as u64)
        .map_err(|_| MachineError::LightsUnreachable {
            target: machine.target,
        })
}

/// Fewest total presses that raise every counter exactly to its joltage
///
/// The presses `x` solve `A x = b` with `A[i][j] = 1` when button `j` feeds
/// counter `i`. Integer Gauss-Jordan elimination leaves a few free buttons;
/// each is bounded by the smallest target among its counters, and every
/// assignment of them fixes the pivot buttons.
fn fewest_presses_for_joltage(machine: &Machine) -> Result<u64, MachineError> {
    let buttons = machine.buttons.len();
    let mut matrix: Vec<Vec<i64>> = machine
        .joltage
        .iter()
        .enumerate()
        .map(|(counter, &target)| {
            machine
                .buttons
                .iter()
                .map(|button| i64::from(button.contains(&counter)))
                .chain([target as i64])
                .collect()
        })
        .collect();

    let pivots = eliminate(&mut matrix, buttons);
    let unreachable = || MachineError::JoltageUnreachable(machine.joltage.clone());
    if matrix[pivots.len()..].iter().any(|row| row[buttons] != 0) {
        return Err(unreachable());
    }
    matrix.truncate(pivots.len());

    let free: Vec<usize> = (0..buttons).filter(|col| !pivots.contains(col)).collect();
    let bounds: Vec<i64> = free
        .iter()
        .map(|&col| {
            machine.buttons[col]
                .iter()
                .map(|&counter| machine.joltage[counter] as i64)
                .min()
                .unwrap_or(0)
        })
        .collect();

    let system = ReducedSystem {
        rows: matrix,
        pivots,
        free,
        bounds,
        rhs: buttons,
    };
    let mut best = None;
    system.search(&mut Vec::with_capacity(system.free.len()), 0, &mut best);
    best.ok_or_else(unreachable)
}

/// Rows of `[A | b]` in reduced row echelon form, without the zero rows
struct ReducedSystem {
    rows: Vec<Vec<i64>>,
    /// Pivot column of each row
    pivots: Vec<usize>,
    free: Vec<usize>,
    /// Upper bound on presses of each free button
    bounds: Vec<i64>,
    /// Column holding `b`
    rhs: usize,
}

impl ReducedSystem {
    fn search(&self, assignment: &mut Vec<i64>, free_total: i64, best: &mut Option<u64>) {
        if best.is_some_and(|best| free_total as u64 >= best) {
            return;
        }
        if assignment.len() == self.free.len() {
            if let Some(pivot_total) = self.pivot_total(assignment) {
                let total = (free_total + pivot_total) as u64;
                if best.is_none_or(|best| total < best) {
                    *best = Some(total);
                }
            }
            return;
        }

        for presses in 0..=self.bounds[assignment.len()] {
            assignment.push(presses);
            self.search(assignment, free_total + presses, best);
            assignment.pop();
        }
    }

    /// Presses of all pivot buttons, if each is a non-negative integer
    fn pivot_total(&self, assignment: &[i64]) -> Option<i64> {
        self.rows
            .iter()
            .zip(&self.pivots)
            .try_fold(0, |total, (row, &pivot)| {
                let known: i64 = self
                    .free
                    .iter()
                    .zip(assignment)
                    .map(|(&col, &presses)| row[col] * presses)
                    .sum();
                let remainder = row[self.rhs] - known;
                let coefficient = row[pivot];
                (remainder % coefficient == 0 && remainder / coefficient >= 0)
                    .then(|| total + remainder / coefficient)
            })
    }
}

/// Integer Gauss-Jordan elimination over the first `columns` columns
///
/// Returns the pivot column of each leading row. Rows are scaled by their
/// gcd after every update to keep entries small.
fn eliminate(matrix: &mut [Vec<i64>], columns: usize) -> Vec<usize> {
    let mut pivots = Vec::new();
    for col in 0..columns {
        let row = pivots.len();
        let Some(found) = (row..matrix.len()).find(|&r| matrix[r][col] != 0) else {
            continue;
        };
        matrix.swap(row, found);

        let pivot_row = matrix[row].clone();
        for (idx, other) in matrix.iter_mut().enumerate() {
            let factor = other[col];
            if idx == row || factor == 0 {
                continue;
            }
            for (value, &p) in other.iter_mut().zip(&pivot_row) {
                *value = *value * pivot_row[col] - p * factor;
            }
            normalize(other);
        }
        pivots.push(col);
    }
    pivots
}

fn normalize(row: &mut [i64]) {
    let divisor = row.iter().fold(0, |g, &v| gcd(g, v.abs()));
    if divisor > 1 {
        row.iter_mut().for_each(|v| *v /= divisor);
    }
}

fn gcd(a: i64, b: i64) -> i64 {
    if b == 0 { a } else { gcd(b, a % b) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aoc_solver::Solver as _;
    use proptest::prelude::*;

    const EXAMPLE: &str = "\
[.##.] (3) (1,3) (2) (2,3) (0,2) (0,1) {3,5,4,7}
[...#.] (0,2,3,4) (2,3) (0,4) (0,1,2) (1,2,3,4) {7,5,12,7,2}
[.###.#] (0,1,2,3,4) (0,3,4) (0,1,2,4,5) (1,2) {10,11,11,5,10,5}
";

    #[test]
    fn test_part1_example() {
        let mut shared = Solver::parse(EXAMPLE).unwrap();
        assert_eq!(Solver::solve_part(&mut shared, 1).unwrap(), "7");
    }

    #[test]
    fn test_part2_example() {
        let mut shared = Solver::parse(EXAMPLE).unwrap();
        assert_eq!(Solver::solve_part(&mut shared, 2).unwrap(), "33");
    }

    #[test]
    fn test_per_machine_presses() {
        let machines = Solver::parse(EXAMPLE).unwrap();
        let lights: Vec<u64> = machines
            .iter()
            .map(|m| fewest_presses_for_lights(m).unwrap())
            .collect();
        assert_eq!(lights, vec![2, 3, 2]);
        let joltage: Vec<u64> = machines
            .iter()
            .map(|m| fewest_presses_for_joltage(m).unwrap())
            .collect();
        assert_eq!(joltage, vec![10, 12, 11]);
    }

    #[test]
    fn test_unreachable_targets_fail() {
        let mut shared = Solver::parse("[##] (0) {1,2}\n").unwrap();
        assert!(matches!(
            Solver::solve_part(&mut shared, 1),
            Err(SolveError::SolveFailed(_))
        ));
        assert!(matches!(
            Solver::solve_part(&mut shared, 2),
            Err(SolveError::SolveFailed(_))
        ));
    }

    #[test]
    fn test_malformed_machines_rejected() {
        assert!(Solver::parse("(0) {1}\n").is_err());
        assert!(Solver::parse("[#] (1) {1}\n").is_err());
        assert!(Solver::parse("[##] (0) {1}\n").is_err());
        assert!(Solver::parse("[#] {1}\n").is_err());
    }

    /// Exhaustive minimum over all press counts up to the largest target
    fn brute_force_joltage(machine: &Machine) -> Option<u64> {
        let limit = machine.joltage.iter().copied().max().unwrap_or(0);
        let mut presses = vec![0u64; machine.buttons.len()];
        let mut best = None;
        loop {
            let mut levels = vec![0u64; machine.joltage.len()];
            for (button, &count) in machine.buttons.iter().zip(&presses) {
                for &counter in button {
                    levels[counter] += count;
                }
            }
            if levels == machine.joltage {
                let total: u64 = presses.iter().sum();
                best = Some(best.map_or(total, |b: u64| b.min(total)));
            }

            let Some(idx) = presses.iter().position(|&p| p < limit) else {
                return best;
            };
            presses[idx] += 1;
            presses[..idx].iter_mut().for_each(|p| *p = 0);
        }
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn prop_joltage_matches_brute_force(
            buttons in prop::collection::vec(prop::collection::btree_set(0usize..3, 1..=3), 1..=4),
            presses in prop::collection::vec(0u64..4, 4)
        ) {
            let buttons: Vec<Vec<usize>> = buttons.into_iter().map(|b| b.into_iter().collect()).collect();
            let mut joltage = vec![0u64; 3];
            for (button, &count) in buttons.iter().zip(&presses) {
                for &counter in button {
                    joltage[counter] += count;
                }
            }
            let machine = Machine { target: 0, buttons, joltage };
            let expected = brute_force_joltage(&machine);
            prop_assert!(expected.is_some());
            prop_assert_eq!(fewest_presses_for_joltage(&machine).ok(), expected);
        }
    }
}
