use crate::utils::grid::Grid;
use crate::utils::parse::{parse_lines, parse_separated};
use crate::utils::search::Frontier;
use anyhow::ensure;
use aoc_solver::{AocParser, ParseError, PartSolver, SolveError};
use aoc_solver_macros::{AocSolver, AutoRegisterSolver};
use itertools::Itertools;

#[derive(AocSolver, AutoRegisterSolver)]
#[aoc_solver(max_parts = 2)]
#[aoc(year = 2025, day = 9, tags = ["2025", "geometry", "grid"])]
pub struct Solver;

pub type Tile = (u64, u64);

impl AocParser for Solver {
    /// Red tiles in loop order
    type SharedData<'a> = Vec<Tile>;

    fn parse<'a>(input: &'a str) -> Result<Self::SharedData<'a>, ParseError> {
        let tiles = parse_lines(input, |line| {
            let coords: Vec<u64> = parse_separated(line, ',')?;
            ensure!(coords.len() == 2, "expected X,Y but got {} values", coords.len());
            Ok((coords[0], coords[1]))
        })?;

        if tiles.len() < 2 {
            return Err(ParseError::MissingData("need at least two red tiles".to_string()));
        }
        for (idx, (a, b)) in tiles.iter().circular_tuple_windows().enumerate() {
            if a.0 != b.0 && a.1 != b.1 {
                return Err(ParseError::at_line(
                    idx,
                    format!("{a:?} and {b:?} are not on the same row or column"),
                ));
            }
        }
        Ok(tiles)
    }
}

impl PartSolver<1> for Solver {
    fn solve(tiles: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        let largest = tiles
            .iter()
            .tuple_combinations()
            .map(|(a, b)| area(a, b))
            .max()
            .unwrap_or(0);
        Ok(largest.to_string())
    }
}

impl PartSolver<2> for Solver {
    fn solve(tiles: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        let floor = CompressedFloor::new(tiles);
        let largest = tiles
            .iter()
            .tuple_combinations()
            .filter(|&(a, b)| floor.rectangle_inside(a, b))
            .map(|(a, b)| area(a, b))
            .max()
            .unwrap_or(0);
        Ok(largest.to_string())
    }
}

/// Tiles covered by the rectangle with opposite corners `a` and `b`
fn area(a: &Tile, b: &Tile) -> u64 {
    (a.0.abs_diff(b.0) + 1) * (a.1.abs_diff(b.1) + 1)
}

/// The tile floor with coordinates compressed to the distinct red tile
/// columns and rows
///
/// Coordinate `xs[i]` maps to column `2 * i + 1`; even columns stand for the
/// gaps between consecutive coordinates and for the border around the loop.
struct CompressedFloor {
    xs: Vec<u64>,
    ys: Vec<u64>,
    /// Prefix sums of cells outside the loop, `(width + 1) * (height + 1)`
    outside_prefix: Vec<u32>,
    prefix_width: usize,
}

impl CompressedFloor {
    fn new(tiles: &[Tile]) -> Self {
        let xs: Vec<u64> = tiles.iter().map(|t| t.0).sorted_unstable().dedup().collect();
        let ys: Vec<u64> = tiles.iter().map(|t| t.1).sorted_unstable().dedup().collect();
        let (width, height) = (2 * xs.len() + 1, 2 * ys.len() + 1);

        let compress = |tile: &Tile| (compress_coord(&xs, tile.0), compress_coord(&ys, tile.1));
        let mut boundary = Grid::filled(width, height, false);
        for (a, b) in tiles.iter().circular_tuple_windows() {
            let ((ax, ay), (bx, by)) = (compress(a), compress(b));
            for x in ax.min(bx)..=ax.max(bx) {
                for y in ay.min(by)..=ay.max(by) {
                    if let Some(cell) = boundary.get_mut((x, y)) {
                        *cell = true;
                    }
                }
            }
        }

        let outside = flood_outside(&boundary);

        let prefix_width = width + 1;
        let mut outside_prefix = vec![0u32; prefix_width * (height + 1)];
        for y in 0..height {
            for x in 0..width {
                outside_prefix[(y + 1) * prefix_width + x + 1] = u32::from(outside[(x, y)])
                    + outside_prefix[y * prefix_width + x + 1]
                    + outside_prefix[(y + 1) * prefix_width + x]
                    - outside_prefix[y * prefix_width + x];
            }
        }

        Self {
            xs,
            ys,
            outside_prefix,
            prefix_width,
        }
    }

    /// Whether every tile of the rectangle is on the loop or inside it
    fn rectangle_inside(&self, a: &Tile, b: &Tile) -> bool {
        let (ax, ay) = (compress_coord(&self.xs, a.0), compress_coord(&self.ys, a.1));
        let (bx, by) = (compress_coord(&self.xs, b.0), compress_coord(&self.ys, b.1));
        self.outside_cells(ax.min(bx), ay.min(by), ax.max(bx), ay.max(by)) == 0
    }

    fn outside_cells(&self, x0: usize, y0: usize, x1: usize, y1: usize) -> u32 {
        let at = |x: usize, y: usize| self.outside_prefix[y * self.prefix_width + x];
        at(x1 + 1, y1 + 1) + at(x0, y0) - at(x0, y1 + 1) - at(x1 + 1, y0)
    }
}

fn compress_coord(sorted: &[u64], value: u64) -> usize {
    2 * sorted.partition_point(|&v| v < value) + 1
}

/// Cells reachable from the top-left corner without crossing the boundary
fn flood_outside(boundary: &Grid<bool>) -> Grid<bool> {
    let mut outside = Grid::filled(boundary.width(), boundary.height(), false);
    let mut frontier = Frontier::single((0, 0));

    while !frontier.is_empty() {
        for &pos in frontier.iter() {
            if let Some(cell) = outside.get_mut(pos) {
                *cell = true;
            }
        }
        frontier = frontier.step(|&pos| {
            boundary
                .neighbors4(pos)
                .filter(|&next| !boundary[next] && !outside[next])
                .collect::<Vec<_>>()
        });
    }
    outside
}

#[cfg(test)]
mod tests {
    use super::*;
    use aoc_solver::Solver as _;

    const EXAMPLE: &str = "7,1\n11,1\n11,7\n9,7\n9,5\n2,5\n2,3\n7,3\n";

    #[test]
    fn test_part1_example() {
        let mut shared = Solver::parse(EXAMPLE).unwrap();
        assert_eq!(Solver::solve_part(&mut shared, 1).unwrap(), "50");
    }

    #[test]
    fn test_part2_example() {
        let mut shared = Solver::parse(EXAMPLE).unwrap();
        assert_eq!(Solver::solve_part(&mut shared, 2).unwrap(), "24");
    }

    #[test]
    fn test_area_counts_tiles_inclusively() {
        assert_eq!(area(&(2, 5), &(11, 1)), 50);
        assert_eq!(area(&(3, 3), &(3, 3)), 1);
    }

    #[test]
    fn test_concave_corner_is_outside() {
        let tiles = Solver::parse(EXAMPLE).unwrap();
        let floor = CompressedFloor::new(&tiles);
        assert!(floor.rectangle_inside(&(9, 5), &(2, 3)));
        assert!(!floor.rectangle_inside(&(2, 5), &(11, 1)));
        assert!(!floor.rectangle_inside(&(7, 1), &(2, 5)));
    }

    #[test]
    fn test_diagonal_neighbors_rejected() {
        assert!(Solver::parse("1,1\n2,2\n").is_err());
        assert!(Solver::parse("1,1\n").is_err());
    }
}
