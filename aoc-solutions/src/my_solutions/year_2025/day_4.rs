use crate::utils::grid::{Grid, Pos};
use aoc_solver::{AocParser, ParseError, PartSolver, SolveError};
use aoc_solver_macros::{AocSolver, AutoRegisterSolver};

const ROLL: u8 = b'@';
const EMPTY: u8 = b'.';
/// A roll is reachable by forklift with fewer neighbors than this
const CROWDED: usize = 4;

#[derive(AocSolver, AutoRegisterSolver)]
#[aoc_solver(max_parts = 2)]
#[aoc(year = 2025, day = 4, tags = ["2025", "grid"])]
pub struct Solver;

impl AocParser for Solver {
    type SharedData<'a> = Grid;

    fn parse<'a>(input: &'a str) -> Result<Self::SharedData<'a>, ParseError> {
        let grid = Grid::parse(input)?;
        if let Some((pos, &cell)) = grid.iter().find(|&(_, &cell)| cell != ROLL && cell != EMPTY) {
            return Err(ParseError::InvalidFormat(format!(
                "unexpected '{}' at {pos:?}",
                cell as char
            )));
        }
        Ok(grid)
    }
}

impl PartSolver<1> for Solver {
    fn solve(grid: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        Ok(accessible_rolls(grid).len().to_string())
    }
}

impl PartSolver<2> for Solver {
    fn solve(grid: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        Ok(remove_until_stable(grid).to_string())
    }
}

fn accessible_rolls(grid: &Grid) -> Vec<Pos> {
    grid.iter()
        .filter(|&(pos, &cell)| cell == ROLL && neighboring_rolls(grid, pos) < CROWDED)
        .map(|(pos, _)| pos)
        .collect()
}

fn neighboring_rolls(grid: &Grid, pos: Pos) -> usize {
    grid.neighbors8(pos).filter(|&n| grid[n] == ROLL).count()
}

/// Remove every accessible roll at once, round after round, until no roll
/// is accessible; returns the number removed
///
/// Each round builds a new grid so the shared one stays untouched.
fn remove_until_stable(grid: &Grid) -> usize {
    let mut removed = 0;
    let mut current = grid.clone();
    loop {
        let accessible = accessible_rolls(&current);
        if accessible.is_empty() {
            return removed;
        }
        removed += accessible.len();
        current = current.map(|pos, &cell| {
            if cell == ROLL && accessible.binary_search_by_key(&(pos.1, pos.0), |&(x, y)| (y, x)).is_ok() {
                EMPTY
            } else {
                cell
            }
        });
    }
}
