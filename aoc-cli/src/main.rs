//! AOC CLI - Command-line interface for running Advent of Code solvers

mod aggregator;
mod cli;
mod config;
mod error;
mod executor;
mod inputs;
mod output;

// Import aoc-solutions to link the solver plugins
use aoc_solutions as _;

use aggregator::ResultAggregator;
use aoc_solver::SolverRegistryBuilder;
use clap::Parser;
use cli::Args;
use config::Config;
use error::CliError;
use executor::{Executor, WorkItem};
use inputs::InputLocator;
use output::OutputFormatter;

fn main() {
    let args = Args::parse();

    if let Err(e) = run(args) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<(), CliError> {
    let config = Config::from_args(args)?;
    let registry = build_registry(&config.tags)?;
    let executor =
        Executor::new(registry, &config).map_err(|e| CliError::Config(e.to_string()))?;

    let work_items = executor.collect_work_items();
    if work_items.is_empty() {
        println!("No solvers found matching the specified filters.");
        return Ok(());
    }

    if !config.quiet {
        report_missing_inputs(&work_items, executor.inputs());
    }

    run_executor(executor, work_items, config.quiet)
}

/// Warn up front about puzzles whose input file is absent; they still run
/// and fail individually
fn report_missing_inputs(work_items: &[WorkItem], inputs: &InputLocator) {
    let missing: Vec<_> = work_items
        .iter()
        .filter(|w| !inputs.contains(w.year, w.day))
        .collect();
    if missing.is_empty() {
        return;
    }

    eprintln!("Missing {} input file(s):", missing.len());
    for work in missing {
        eprintln!("  - {}", inputs.input_path(work.year, work.day).display());
    }
}

/// Run the executor and collect results
fn run_executor(
    executor: Executor,
    work_items: Vec<WorkItem>,
    quiet: bool,
) -> Result<(), CliError> {
    let mut aggregator = ResultAggregator::for_work_items(&work_items);
    if !quiet {
        println!(
            "Running {} solver(s), {} part(s)...",
            work_items.len(),
            aggregator.expected_len()
        );
    }

    let (tx, rx) = std::sync::mpsc::channel();
    let executor_handle = std::thread::spawn(move || executor.execute(tx));

    let formatter = OutputFormatter::new(quiet);
    let mut results = Vec::new();

    for result in rx {
        for ready in aggregator.add(result) {
            formatter.print_result(&ready);
            results.push(ready);
        }
    }

    for ready in aggregator.drain() {
        formatter.print_result(&ready);
        results.push(ready);
    }

    if !aggregator.is_complete() {
        eprintln!("Warning: Not all expected results were received");
    }

    executor_handle
        .join()
        .map_err(|_| CliError::Config("Executor thread panicked".to_string()))??;

    formatter.print_summary(&results);

    Ok(())
}

/// Build registry with tag filtering
fn build_registry(tags: &[String]) -> Result<aoc_solver::SolverRegistry, CliError> {
    let builder = SolverRegistryBuilder::new();

    let builder = if tags.is_empty() {
        builder.register_all_plugins()?
    } else {
        builder.register_solver_plugins(|plugin| {
            tags.iter().all(|tag| plugin.tags.contains(&tag.as_str()))
        })?
    };

    Ok(builder.build())
}
