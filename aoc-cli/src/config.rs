//! Configuration resolution from CLI args

use crate::cli::{Args, ParallelizeBy};
use crate::error::CliError;
use std::path::{Path, PathBuf};

/// Resolved runtime configuration
pub struct Config {
    /// Year filter (None = all years)
    pub year_filter: Option<u16>,
    /// Day filter (None = all days)
    pub day_filter: Option<u8>,
    /// Part filter (None = all parts)
    pub part_filter: Option<u8>,
    /// Tags to filter solvers
    pub tags: Vec<String>,
    /// Directory holding `{year}_day{DD}.txt` inputs
    pub input_dir: PathBuf,
    /// Explicit input file for a single puzzle
    pub input_file: Option<PathBuf>,
    /// Number of threads for parallel execution
    pub thread_count: usize,
    /// Parallelization level
    pub parallelize_by: ParallelizeBy,
    /// Quiet mode
    pub quiet: bool,
}

impl Config {
    /// Build config from CLI args
    pub fn from_args(args: Args) -> Result<Self, CliError> {
        let (year_filter, day_filter) = match args.puzzle {
            Some(puzzle) => (Some(puzzle.year), Some(puzzle.day)),
            None => (args.year, args.day),
        };

        if args.input.is_some() && (year_filter.is_none() || day_filter.is_none()) {
            return Err(CliError::Config(
                "--input needs a single puzzle (give PUZZLE or both --year and --day)".to_string(),
            ));
        }

        Ok(Config {
            year_filter,
            day_filter,
            part_filter: args.part,
            tags: args.tags,
            input_dir: expand_tilde(&args.input_dir),
            input_file: args.input.as_deref().map(expand_tilde),
            thread_count: args.threads.unwrap_or_else(num_cpus),
            parallelize_by: args.parallelize_by,
            quiet: args.quiet,
        })
    }
}

/// Expand ~ to home directory
fn expand_tilde(path: &Path) -> PathBuf {
    if let Some(path_str) = path.to_str()
        && (path_str.starts_with("~/") || path_str == "~")
        && let Some(home) = dirs::home_dir()
    {
        return home.join(path_str.get(2..).unwrap_or_default());
    }
    path.to_path_buf()
}

/// Get number of CPUs
fn num_cpus() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn config(args: &[&str]) -> Result<Config, CliError> {
        Config::from_args(Args::try_parse_from(args).unwrap())
    }

    #[test]
    fn test_puzzle_sets_year_and_day() {
        let config = config(&["aoc", "2025-11"]).unwrap();
        assert_eq!(config.year_filter, Some(2025));
        assert_eq!(config.day_filter, Some(11));
        assert_eq!(config.part_filter, None);
        assert_eq!(config.input_dir, PathBuf::from("inputs"));
    }

    #[test]
    fn test_input_file_requires_single_puzzle() {
        assert!(matches!(
            config(&["aoc", "--year", "2025", "--input", "day.txt"]),
            Err(CliError::Config(_))
        ));
        let config = config(&["aoc", "--year", "2025", "--day", "3", "-i", "day.txt"]).unwrap();
        assert_eq!(config.input_file, Some(PathBuf::from("day.txt")));
    }

    #[test]
    fn test_tilde_expansion() {
        let plain = Path::new("inputs/2025");
        assert_eq!(expand_tilde(plain), plain.to_path_buf());
        if let Some(home) = dirs::home_dir() {
            assert_eq!(expand_tilde(Path::new("~/aoc")), home.join("aoc"));
            assert_eq!(expand_tilde(Path::new("~")), home);
        }
    }

    #[test]
    fn test_thread_count_defaults_to_available_parallelism() {
        assert_eq!(config(&["aoc"]).unwrap().thread_count, num_cpus());
        assert_eq!(config(&["aoc", "--threads", "3"]).unwrap().thread_count, 3);
    }
}
