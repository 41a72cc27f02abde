//! Advent of Code puzzle solutions with automatic registration
//!
//! Solutions live under `my_solutions/year_YYYY/day_D.rs`. Each one derives
//! `AocSolver` for part dispatch and `AutoRegisterSolver` so the runner picks
//! it up without any central list.

pub mod utils;

#[cfg(feature = "my-solutions")]
pub mod my_solutions;
