//! CLI argument parsing using clap

use clap::{Parser, ValueEnum};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Parallelization level for solver execution
#[derive(Debug, Clone, Copy, Default, ValueEnum, PartialEq, Eq)]
pub enum ParallelizeBy {
    /// No parallelization; execute all solvers sequentially in order
    Sequential,
    /// Parallelize across years; days and parts run sequentially within each year
    Year,
    /// Parallelize across year/day combinations; parts run sequentially (default)
    #[default]
    Day,
    /// Parallelize across all year/day/part combinations
    Part,
}

/// A single puzzle written as `YYYY/DD` or `YYYY-DD`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PuzzleId {
    pub year: u16,
    pub day: u8,
}

impl FromStr for PuzzleId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (year, day) = s
            .split_once(['/', '-'])
            .ok_or_else(|| format!("expected YYYY/DD or YYYY-DD, got '{s}'"))?;
        let year = year
            .parse()
            .map_err(|e| format!("invalid year '{year}': {e}"))?;
        let day: u8 = day.parse().map_err(|e| format!("invalid day '{day}': {e}"))?;
        if !(1..=25).contains(&day) {
            return Err(format!("day {day} is not within 1..=25"));
        }
        Ok(PuzzleId { year, day })
    }
}

impl fmt::Display for PuzzleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{:02}", self.year, self.day)
    }
}

/// Advent of Code solver runner
#[derive(Parser, Debug)]
#[command(name = "aoc", about = "Run Advent of Code solvers", version)]
pub struct Args {
    /// Puzzle to run, e.g. 2025/07 (same as --year 2025 --day 7)
    #[arg(conflicts_with_all = ["year", "day"])]
    pub puzzle: Option<PuzzleId>,

    /// Year to run (runs all years if omitted)
    #[arg(short, long)]
    pub year: Option<u16>,

    /// Day to run (runs all days if omitted)
    #[arg(short, long, value_parser = clap::value_parser!(u8).range(1..=25))]
    pub day: Option<u8>,

    /// Part to run (runs all parts if omitted); parts a puzzle does not have
    /// are reported as errors
    #[arg(short, long)]
    pub part: Option<u8>,

    /// Tags to filter solvers (comma-separated)
    #[arg(short, long, value_delimiter = ',')]
    pub tags: Vec<String>,

    /// Input file for a single puzzle, overriding --input-dir
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Directory holding puzzle inputs named {year}_day{DD}.txt
    #[arg(long, default_value = "inputs")]
    pub input_dir: PathBuf,

    /// Number of threads for parallel execution
    #[arg(long)]
    pub threads: Option<usize>,

    /// Parallelization level: sequential, year, day, or part
    #[arg(long, value_enum, default_value = "day")]
    pub parallelize_by: ParallelizeBy,

    /// Quiet mode - only output answers
    #[arg(short, long)]
    pub quiet: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_puzzle_id_separators() {
        let expected = PuzzleId { year: 2025, day: 7 };
        assert_eq!("2025/07".parse(), Ok(expected));
        assert_eq!("2025-7".parse(), Ok(expected));
        assert_eq!(expected.to_string(), "2025/07");
    }

    #[test]
    fn test_puzzle_id_rejects_bad_days() {
        assert!("2025/26".parse::<PuzzleId>().is_err());
        assert!("2025/0".parse::<PuzzleId>().is_err());
        assert!("2025".parse::<PuzzleId>().is_err());
        assert!("20x5/01".parse::<PuzzleId>().is_err());
    }

    #[test]
    fn test_positional_puzzle_and_part() {
        let args = Args::try_parse_from(["aoc", "2021/18", "--part", "2", "--quiet"]).unwrap();
        assert_eq!(args.puzzle, Some(PuzzleId { year: 2021, day: 18 }));
        assert_eq!(args.part, Some(2));
        assert!(args.quiet);
        assert_eq!(args.parallelize_by, ParallelizeBy::Day);
    }

    #[test]
    fn test_unknown_part_number_is_accepted() {
        let args = Args::try_parse_from(["aoc", "2025/01", "-p", "3"]).unwrap();
        assert_eq!(args.part, Some(3));
    }

    #[test]
    fn test_puzzle_conflicts_with_year() {
        assert!(Args::try_parse_from(["aoc", "2025/01", "--year", "2024"]).is_err());
    }
}
