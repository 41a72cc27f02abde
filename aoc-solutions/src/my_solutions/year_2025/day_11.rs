use crate::utils::reduce::Reduction;
use crate::utils::search::{BreadthFirst, RouteCountError};
use aoc_solver::{AocParser, ParseError, PartSolver, SolveError};
use aoc_solver_macros::{AocSolver, AutoRegisterSolver};
use std::collections::{HashMap, HashSet};

#[derive(AocSolver, AutoRegisterSolver)]
#[aoc_solver(max_parts = 2)]
#[aoc(year = 2025, day = 11, tags = ["2025", "graph", "search"])]
pub struct Solver;

/// Device outputs, borrowing device names from the puzzle input
#[derive(Debug)]
pub struct Rack<'a> {
    outputs: HashMap<&'a str, Vec<&'a str>>,
    /// Distinct device names, including ones that only appear as outputs
    devices: usize,
}

impl<'a> Rack<'a> {
    /// Distinct data paths from `from` to `to`
    ///
    /// Every path in an acyclic rack visits each device at most once, so a
    /// search deeper than the device count means the rack has a loop.
    fn count_paths(&self, from: &'a str, to: &'a str) -> Result<u128, RouteCountError> {
        BreadthFirst::new(|device: &&'a str| self.outputs.get(device).into_iter().flatten().copied())
            .max_depth(self.devices + 1)
            .count_routes(from, &to)
    }
}

impl AocParser for Solver {
    type SharedData<'a> = Rack<'a>;

    fn parse<'a>(input: &'a str) -> Result<Self::SharedData<'a>, ParseError> {
        let mut outputs = HashMap::new();
        let mut names = HashSet::new();

        for (line_idx, line) in input.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let (device, targets) = line
                .split_once(':')
                .ok_or_else(|| ParseError::at_line(line_idx, "expected 'device: outputs...'"))?;
            let device = device.trim();
            if device.is_empty() {
                return Err(ParseError::at_line(line_idx, "missing device name"));
            }

            let targets: Vec<&str> = targets.split_whitespace().collect();
            names.insert(device);
            names.extend(targets.iter().copied());
            if outputs.insert(device, targets).is_some() {
                return Err(ParseError::at_line(
                    line_idx,
                    format!("device '{device}' listed twice"),
                ));
            }
        }

        if outputs.is_empty() {
            return Err(ParseError::MissingData("no devices".to_string()));
        }
        Ok(Rack {
            outputs,
            devices: names.len(),
        })
    }
}

impl PartSolver<1> for Solver {
    fn solve(rack: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        Ok(rack.count_paths("you", "out")?.to_string())
    }
}

impl PartSolver<2> for Solver {
    /// Paths from the server to the output that pass through both the
    /// FFT and the DAC, in either order
    fn solve(rack: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        let mut total = 0;
        for stages in [["svr", "fft", "dac", "out"], ["svr", "dac", "fft", "out"]] {
            let legs = stages
                .windows(2)
                .map(|leg| rack.count_paths(leg[0], leg[1]));
            let routes: u128 = Reduction::Product.try_reduce(legs)?;
            total = Reduction::Sum.combine(total, routes)?;
        }
        Ok(total.to_string())
    }
}
