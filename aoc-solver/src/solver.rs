//! Core solver traits

use crate::error::{ParseError, SolveError};
use std::ops::RangeInclusive;

/// Parsing half of a solver: turns raw puzzle input into shared data.
///
/// # Example
///
/// ```
/// use aoc_solver::{AocParser, ParseError};
///
/// struct Day1;
///
/// impl AocParser for Day1 {
///     type SharedData<'a> = Vec<i32>;
///
///     fn parse(input: &str) -> Result<Self::SharedData<'_>, ParseError> {
///         input
///             .lines()
///             .map(|l| l.parse().map_err(|_| ParseError::InvalidFormat("bad int".into())))
///             .collect()
///     }
/// }
///
/// assert_eq!(Day1::parse("1\n2").unwrap(), vec![1, 2]);
/// ```
pub trait AocParser {
    /// Parsed input plus any intermediate results the parts want to share.
    ///
    /// Owned data (`Vec<T>`, structs) is the common case; borrowing from the
    /// input via `'a` avoids copies when no transformation is needed.
    type SharedData<'a>;

    /// Parse the input string into the shared data structure.
    fn parse<'a>(input: &'a str) -> Result<Self::SharedData<'a>, ParseError>;
}

/// Solves part `N` of a puzzle.
///
/// # Example
///
/// ```
/// use aoc_solver::{AocParser, PartSolver, ParseError, SolveError};
///
/// struct Day1;
///
/// impl AocParser for Day1 {
///     type SharedData<'a> = Vec<i32>;
///
///     fn parse(input: &str) -> Result<Self::SharedData<'_>, ParseError> {
///         input
///             .lines()
///             .map(|l| l.parse().map_err(|_| ParseError::InvalidFormat("bad int".into())))
///             .collect()
///     }
/// }
///
/// impl PartSolver<1> for Day1 {
///     fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
///         Ok(shared.iter().sum::<i32>().to_string())
///     }
/// }
/// ```
pub trait PartSolver<const N: u8>: AocParser {
    /// Solve this part of the puzzle.
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError>;
}

/// Dispatches part numbers to the matching [`PartSolver`] implementations.
///
/// Normally generated with `#[derive(AocSolver)]`:
///
/// ```
/// use aoc_solver::{AocParser, AocSolver, ParseError, PartSolver, SolveError, Solver};
///
/// #[derive(AocSolver)]
/// #[aoc_solver(max_parts = 2)]
/// struct Day1;
///
/// impl AocParser for Day1 {
///     type SharedData<'a> = Vec<i64>;
///
///     fn parse(input: &str) -> Result<Self::SharedData<'_>, ParseError> {
///         input
///             .lines()
///             .map(|l| l.parse().map_err(|_| ParseError::InvalidFormat("bad int".into())))
///             .collect()
///     }
/// }
///
/// impl PartSolver<1> for Day1 {
///     fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
///         Ok(shared.iter().sum::<i64>().to_string())
///     }
/// }
///
/// impl PartSolver<2> for Day1 {
///     fn solve(_shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
///         Err(SolveError::PartNotImplemented(2))
///     }
/// }
///
/// let mut shared = Day1::parse("1\n2\n3").unwrap();
/// assert_eq!(Day1::solve_part(&mut shared, 1).unwrap(), "6");
/// assert!(Day1::solve_part(&mut shared, 2).is_err());
/// ```
pub trait Solver: AocParser {
    /// Number of parts this solver implements
    const PARTS: u8;

    /// Solve a specific part of the problem
    ///
    /// # Returns
    /// * `Ok(String)` - The answer for this part
    /// * `Err(SolveError::PartNotImplemented)` - The part has no implementation
    /// * `Err(SolveError::SolveFailed)` - The algorithm failed
    fn solve_part(shared: &mut Self::SharedData<'_>, part: u8) -> Result<String, SolveError>;

    /// Part numbers a runner may ask for
    fn parts() -> RangeInclusive<u8> {
        1..=Self::PARTS
    }

    /// [`Solver::solve_part`] for a part number that came from outside, such
    /// as a command line; numbers outside [`Solver::parts`] are
    /// [`SolveError::PartOutOfRange`]
    fn solve_requested_part(
        shared: &mut Self::SharedData<'_>,
        part: u8,
    ) -> Result<String, SolveError> {
        if !Self::parts().contains(&part) {
            return Err(SolveError::PartOutOfRange(part));
        }
        Self::solve_part(shared, part)
    }
}
