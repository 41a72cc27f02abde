use crate::utils::parse::{parse_lines, parse_separated};
use crate::utils::reduce::{CountOverflow, Reduction};
use anyhow::ensure;
use aoc_solver::{AocParser, ParseError, PartSolver, SolveError};
use aoc_solver_macros::{AocSolver, AutoRegisterSolver};
use itertools::Itertools;

/// Shortest connections made before measuring circuits in part 1
const CONNECTIONS: usize = 1000;

#[derive(AocSolver, AutoRegisterSolver)]
#[aoc_solver(max_parts = 2)]
#[aoc(year = 2025, day = 8, tags = ["2025", "graph", "union-find"])]
pub struct Solver;

pub type Point = [i64; 3];

#[derive(Debug)]
pub struct Playground {
    boxes: Vec<Point>,
    /// Box index pairs sorted by distance, built on first use
    pairs: Option<Vec<(usize, usize)>>,
}

impl Playground {
    fn pairs(&mut self) -> &[(usize, usize)] {
        let boxes = &self.boxes;
        self.pairs.get_or_insert_with(|| pairs_by_distance(boxes))
    }
}

impl AocParser for Solver {
    type SharedData<'a> = Playground;

    fn parse<'a>(input: &'a str) -> Result<Self::SharedData<'a>, ParseError> {
        let boxes = parse_lines(input, |line| {
            let coords: Vec<i64> = parse_separated(line, ',')?;
            ensure!(coords.len() == 3, "expected X,Y,Z but got {} values", coords.len());
            Ok([coords[0], coords[1], coords[2]])
        })?;

        if boxes.len() < 2 {
            return Err(ParseError::MissingData(
                "need at least two junction boxes".to_string(),
            ));
        }
        Ok(Playground { boxes, pairs: None })
    }
}

impl PartSolver<1> for Solver {
    fn solve(playground: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        Ok(largest_circuits_product(playground, CONNECTIONS)?.to_string())
    }
}

impl PartSolver<2> for Solver {
    fn solve(playground: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        let count = playground.boxes.len();
        let mut circuits = Circuits::new(count);
        let closing = playground
            .pairs()
            .iter()
            .find(|&&(a, b)| circuits.union(a, b) && circuits.count() == 1)
            .copied();

        match closing {
            Some((a, b)) => Ok((playground.boxes[a][0] * playground.boxes[b][0]).to_string()),
            None => Err(SolveError::SolveFailed(
                "connections never formed a single circuit".into(),
            )),
        }
    }
}

/// Product of the three largest circuit sizes after joining the
/// `connections` closest pairs
///
/// Pairs already in the same circuit still use up a connection.
pub fn largest_circuits_product(
    playground: &mut Playground,
    connections: usize,
) -> Result<u64, CountOverflow> {
    let mut circuits = Circuits::new(playground.boxes.len());
    for &(a, b) in playground.pairs().iter().take(connections) {
        circuits.union(a, b);
    }

    let sizes = circuits.sizes().into_iter().sorted_unstable_by(|a, b| b.cmp(a));
    Reduction::Product.reduce(sizes.take(3).map(|size| size as u64))
}

fn squared_distance(a: &Point, b: &Point) -> i64 {
    a.iter().zip(b).map(|(p, q)| (p - q) * (p - q)).sum()
}

fn pairs_by_distance(boxes: &[Point]) -> Vec<(usize, usize)> {
    (0..boxes.len())
        .tuple_combinations()
        .map(|(a, b)| (squared_distance(&boxes[a], &boxes[b]), a, b))
        .sorted_unstable()
        .map(|(_, a, b)| (a, b))
        .collect()
}

/// Disjoint sets of junction boxes with union by size
struct Circuits {
    parent: Vec<usize>,
    size: Vec<usize>,
    count: usize,
}

impl Circuits {
    fn new(boxes: usize) -> Self {
        Self {
            parent: (0..boxes).collect(),
            size: vec![1; boxes],
            count: boxes,
        }
    }

    fn find(&mut self, mut node: usize) -> usize {
        while self.parent[node] != node {
            self.parent[node] = self.parent[self.parent[node]];
            node = self.parent[node];
        }
        node
    }

    /// Join the circuits of `a` and `b`; false when they were already one
    fn union(&mut self, a: usize, b: usize) -> bool {
        let (mut a, mut b) = (self.find(a), self.find(b));
        if a == b {
            return false;
        }
        if self.size[a] < self.size[b] {
            std::mem::swap(&mut a, &mut b);
        }
        self.parent[b] = a;
        self.size[a] += self.size[b];
        self.count -= 1;
        true
    }

    fn count(&self) -> usize {
        self.count
    }

    fn sizes(&mut self) -> Vec<usize> {
        let roots: Vec<usize> = (0..self.parent.len())
            .filter(|&node| self.find(node) == node)
            .collect();
        roots.into_iter().map(|root| self.size[root]).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aoc_solver::Solver as _;

    const EXAMPLE: &str = "\
162,817,812
57,618,57
906,360,560
592,479,940
352,342,300
466,668,158
542,29,236
431,825,988
739,650,466
52,470,668
216,146,977
819,987,18
117,168,530
805,96,715
346,949,466
970,615,88
941,993,340
862,61,35
984,92,344
425,690,689
";

    #[test]
    fn test_ten_connections_example() {
        let mut shared = Solver::parse(EXAMPLE).unwrap();
        assert_eq!(largest_circuits_product(&mut shared, 10), Ok(40));
    }

    #[test]
    fn test_part2_example() {
        let mut shared = Solver::parse(EXAMPLE).unwrap();
        assert_eq!(Solver::solve_part(&mut shared, 2).unwrap(), "25272");
    }

    #[test]
    fn test_closest_pair_comes_first() {
        let mut shared = Solver::parse(EXAMPLE).unwrap();
        // 162,817,812 and 425,690,689
        assert_eq!(shared.pairs()[0], (0, 19));
    }

    #[test]
    fn test_union_tracks_circuit_count() {
        let mut circuits = Circuits::new(4);
        assert!(circuits.union(0, 1));
        assert!(!circuits.union(1, 0));
        assert!(circuits.union(2, 3));
        assert_eq!(circuits.count(), 2);
        assert_eq!(circuits.sizes(), vec![2, 2]);
    }

    #[test]
    fn test_malformed_box_rejected() {
        assert!(Solver::parse("1,2\n3,4,5\n").is_err());
        assert!(Solver::parse("1,2,3\n").is_err());
    }
}
