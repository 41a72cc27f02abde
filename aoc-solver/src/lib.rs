//! Advent of Code Solver Library
//!
//! A small, type-safe framework for puzzle solvers spanning several years.
//! Each puzzle is a unit struct that parses its input once and then answers
//! one or more parts from the parsed data.
//!
//! # Overview
//!
//! - [`AocParser`] turns raw text into `SharedData`
//! - [`PartSolver<N>`] answers part `N`
//! - [`Solver`] dispatches part numbers, usually via `#[derive(AocSolver)]`
//! - [`SolverRegistry`] maps (year, day) to factories, built once at startup
//! - [`DynSolver`] is the timed, type-erased view the runner works with
//!
//! # Quick Example
//!
//! ```
//! use aoc_solver::{AocParser, AocSolver, ParseError, PartSolver, SolveError, SolverRegistryBuilder};
//!
//! #[derive(AocSolver)]
//! #[aoc_solver(max_parts = 2)]
//! struct Day1;
//!
//! impl AocParser for Day1 {
//!     type SharedData<'a> = Vec<i32>;
//!
//!     fn parse(input: &str) -> Result<Self::SharedData<'_>, ParseError> {
//!         input
//!             .lines()
//!             .map(|l| l.parse().map_err(|_| ParseError::InvalidFormat("Expected integer".into())))
//!             .collect()
//!     }
//! }
//!
//! impl PartSolver<1> for Day1 {
//!     fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
//!         Ok(shared.iter().sum::<i32>().to_string())
//!     }
//! }
//!
//! impl PartSolver<2> for Day1 {
//!     fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
//!         Ok(shared.iter().product::<i32>().to_string())
//!     }
//! }
//!
//! let registry = SolverRegistryBuilder::new()
//!     .register::<Day1>(2023, 1)
//!     .unwrap()
//!     .build();
//!
//! let mut solver = registry.create_solver(2023, 1, "1\n2\n3").unwrap();
//! assert_eq!(solver.solve(1).unwrap().answer, "6");
//! assert_eq!(solver.solve(2).unwrap().answer, "6");
//! ```
//!
//! # Plugins
//!
//! Solutions register themselves at link time:
//!
//! ```ignore
//! #[derive(AocSolver, AutoRegisterSolver)]
//! #[aoc_solver(max_parts = 2)]
//! #[aoc(year = 2025, day = 7, tags = ["grid", "search"])]
//! pub struct Solver;
//! ```
//!
//! and the runner collects them with
//! [`SolverRegistryBuilder::register_all_plugins`].

mod error;
mod instance;
mod registry;
mod solver;

pub use error::{ParseError, RegistrationError, SolveError, SolverError};
pub use instance::{DynSolver, SolveResult, SolverInstance};
pub use registry::{
    FactoryInfo, RegisterableSolver, SolverFactory, SolverPlugin, SolverRegistry,
    SolverRegistryBuilder,
};
pub use solver::{AocParser, PartSolver, Solver};

// Re-exported for the code generated by `AutoRegisterSolver`
pub use inventory;

pub use aoc_solver_macros::{AocSolver, AutoRegisterSolver};
