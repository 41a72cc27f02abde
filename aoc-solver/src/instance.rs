//! Parsed puzzle inputs that answer parts on demand

use crate::error::{ParseError, SolveError};
use crate::solver::Solver;
use chrono::{TimeDelta, Utc};

/// Run `f` and measure it on the wall clock
fn timed<T>(f: impl FnOnce() -> T) -> (T, TimeDelta) {
    let start = Utc::now();
    let value = f();
    (value, Utc::now() - start)
}

/// Answer to one part and how long solving it took
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolveResult {
    pub part: u8,
    pub answer: String,
    pub duration: TimeDelta,
}

/// A puzzle input for (`year`, `day`) already parsed by solver `S`
///
/// Parts run against the same shared data, in whatever order the runner
/// asks for them, so a later part sees what an earlier one stored.
pub struct SolverInstance<'a, S: Solver> {
    year: u16,
    day: u8,
    shared: S::SharedData<'a>,
    parse_duration: TimeDelta,
}

impl<'a, S: Solver> SolverInstance<'a, S> {
    pub fn new(year: u16, day: u8, input: &'a str) -> Result<Self, ParseError> {
        let (shared, parse_duration) = timed(|| S::parse(input));
        Ok(Self {
            year,
            day,
            shared: shared?,
            parse_duration,
        })
    }

    pub fn shared(&self) -> &S::SharedData<'a> {
        &self.shared
    }
}

/// What the runner sees of a parsed puzzle, whatever its solver type
///
/// ```no_run
/// use aoc_solver::DynSolver;
///
/// fn run(mut solver: Box<dyn DynSolver>) -> Result<(), Box<dyn std::error::Error>> {
///     println!("{}/{:02} parsed in {}", solver.year(), solver.day(), solver.parse_duration());
///     for part in 1..=solver.parts() {
///         let result = solver.solve(part)?;
///         println!("Part {}: {} (took {})", result.part, result.answer, result.duration);
///     }
///     Ok(())
/// }
/// ```
pub trait DynSolver {
    /// Solve `part`; part numbers the solver does not have are
    /// [`SolveError::PartOutOfRange`]
    fn solve(&mut self, part: u8) -> Result<SolveResult, SolveError>;

    fn year(&self) -> u16;

    fn day(&self) -> u8;

    fn parts(&self) -> u8;

    fn parse_duration(&self) -> TimeDelta;
}

impl<S: Solver> DynSolver for SolverInstance<'_, S> {
    fn solve(&mut self, part: u8) -> Result<SolveResult, SolveError> {
        let (answer, duration) = timed(|| S::solve_requested_part(&mut self.shared, part));
        Ok(SolveResult {
            part,
            answer: answer?,
            duration,
        })
    }

    fn year(&self) -> u16 {
        self.year
    }

    fn day(&self) -> u8 {
        self.day
    }

    fn parts(&self) -> u8 {
        S::PARTS
    }

    fn parse_duration(&self) -> TimeDelta {
        self.parse_duration
    }
}
