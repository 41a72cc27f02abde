use crate::utils::grid::Grid;
use crate::utils::search::{Frontier, WeightedFrontier};
use aoc_solver::{AocParser, ParseError, PartSolver, SolveError};
use aoc_solver_macros::{AocSolver, AutoRegisterSolver};

const START: u8 = b'S';
const SPLITTER: u8 = b'^';

#[derive(AocSolver, AutoRegisterSolver)]
#[aoc_solver(max_parts = 2)]
#[aoc(year = 2025, day = 7, tags = ["2025", "grid", "search"])]
pub struct Solver;

#[derive(Debug)]
pub struct Manifold {
    grid: Grid,
    /// Column and row of the beam source
    start: (usize, usize),
}

impl AocParser for Solver {
    type SharedData<'a> = Manifold;

    fn parse<'a>(input: &'a str) -> Result<Self::SharedData<'a>, ParseError> {
        let grid = Grid::parse(input)?;
        let start = grid
            .find(START)
            .ok_or_else(|| ParseError::MissingData("no beam source 'S'".to_string()))?;
        Ok(Manifold { grid, start })
    }
}

impl PartSolver<1> for Solver {
    fn solve(manifold: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        let (x, y) = manifold.start;
        let mut beams = Frontier::single(x);
        let mut splits = 0;

        for row in manifold.grid.rows().skip(y + 1) {
            splits += beams.iter().filter(|&&x| row[x] == SPLITTER).count();
            beams = beams.step(|&x| beam_successors(row, x));
        }
        Ok(splits.to_string())
    }
}

impl PartSolver<2> for Solver {
    /// Every split sends one timeline each way, so timelines are routes
    fn solve(manifold: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        let (x, y) = manifold.start;
        let timelines = manifold
            .grid
            .rows()
            .skip(y + 1)
            .try_fold(WeightedFrontier::single(x), |beams, row| {
                beams.step(|&x| beam_successors(row, x))
            })?;
        Ok(timelines.total()?.to_string())
    }
}

/// Columns a beam in column `x` occupies after passing through `row`
///
/// Beams leaving the side of the manifold are lost.
fn beam_successors(row: &[u8], x: usize) -> impl Iterator<Item = usize> + '_ {
    let candidates = if row[x] == SPLITTER {
        [x.checked_sub(1), Some(x + 1)]
    } else {
        [Some(x), None]
    };
    candidates
        .into_iter()
        .flatten()
        .filter(move |&next| next < row.len())
}
