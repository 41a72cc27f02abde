//! Parallel executor for running solvers

use crate::cli::ParallelizeBy;
use crate::config::Config;
use crate::error::{ArcExecutorError, ExecutorError};
use crate::inputs::InputLocator;
use aoc_solver::{DynSolver, SolverError, SolverRegistry};
use chrono::TimeDelta;
use itertools::Itertools;
use rayon::prelude::*;
use std::ops::RangeInclusive;
use std::sync::mpsc::Sender;

/// Result from a single solver execution
pub struct SolverResult {
    pub year: u16,
    pub day: u8,
    pub part: u8,
    pub answer: Result<String, ArcExecutorError>,
    pub solve_duration: TimeDelta,
    /// Set on the result that paid for parsing the input
    pub parse_duration: Option<TimeDelta>,
}

impl SolverResult {
    fn failed(year: u16, day: u8, part: u8, error: impl Into<ArcExecutorError>) -> Self {
        Self {
            year,
            day,
            part,
            answer: Err(error.into()),
            solve_duration: TimeDelta::zero(),
            parse_duration: None,
        }
    }
}

/// Work item representing a solver to execute
pub struct WorkItem {
    pub year: u16,
    pub day: u8,
    pub parts: RangeInclusive<u8>,
}

/// Parallel executor for running solvers
pub struct Executor {
    sync_executor_config: SyncExecutorConfig,
    thread_pool: rayon::ThreadPool,
}

pub struct SyncExecutorConfig {
    registry: SolverRegistry,
    inputs: InputLocator,
    parallelize_by: ParallelizeBy,
    year_filter: Option<u16>,
    day_filter: Option<u8>,
    part_filter: Option<u8>,
}

impl Executor {
    /// Create a new executor from config
    pub fn new(registry: SolverRegistry, config: &Config) -> Result<Self, ExecutorError> {
        let thread_pool = rayon::ThreadPoolBuilder::new()
            .num_threads(config.thread_count)
            .build()
            .map_err(|e| ExecutorError::ThreadPool(e.to_string()))?;

        Ok(Self {
            sync_executor_config: SyncExecutorConfig {
                registry,
                inputs: InputLocator::new(config.input_dir.clone(), config.input_file.clone()),
                parallelize_by: config.parallelize_by,
                year_filter: config.year_filter,
                day_filter: config.day_filter,
                part_filter: config.part_filter,
            },
            thread_pool,
        })
    }

    pub fn inputs(&self) -> &InputLocator {
        &self.sync_executor_config.inputs
    }

    /// Collect work items by filtering from registry metadata
    pub fn collect_work_items(&self) -> Vec<WorkItem> {
        let cfg = &self.sync_executor_config;
        cfg.registry
            .iter_info()
            .filter(|info| cfg.year_filter.is_none_or(|y| info.year == y))
            .filter(|info| cfg.day_filter.is_none_or(|d| info.day == d))
            .map(|info| WorkItem {
                year: info.year,
                day: info.day,
                parts: self.filter_parts(info.parts),
            })
            .collect()
    }

    /// An explicit part is kept even when the solver lacks it, so the run
    /// reports it as out of range instead of silently skipping it
    fn filter_parts(&self, max_parts: u8) -> RangeInclusive<u8> {
        match self.sync_executor_config.part_filter {
            Some(p) => p..=p,
            None => 1..=max_parts,
        }
    }

    /// Execute all work items and send results to channel
    pub fn execute(&self, tx: Sender<SolverResult>) -> Result<(), ArcExecutorError> {
        let work_items = self.collect_work_items();

        match self.sync_executor_config.parallelize_by {
            ParallelizeBy::Sequential => {
                let mut collected_error: Option<ArcExecutorError> = None;
                for work in work_items {
                    if let Err(e) = run_solver(&work, &tx, &self.sync_executor_config) {
                        collected_error = Some(ArcExecutorError::combine_opt(collected_error, e));
                    }
                }
                collected_error.map_or(Ok(()), Err)
            }
            ParallelizeBy::Year => {
                let by_year: Vec<Vec<WorkItem>> = work_items
                    .into_iter()
                    .chunk_by(|w| w.year)
                    .into_iter()
                    .map(|(_, group)| group.collect())
                    .collect();

                self.execute_parallel_grouped(by_year, &tx)
            }
            // Part differs from Day inside run_solver
            ParallelizeBy::Day | ParallelizeBy::Part => self.execute_parallel(work_items, &tx),
        }
    }

    /// Execute work items in parallel, collecting errors
    fn execute_parallel(
        &self,
        work_items: Vec<WorkItem>,
        tx: &Sender<SolverResult>,
    ) -> Result<(), ArcExecutorError> {
        let sync_executor_config = &self.sync_executor_config;

        self.thread_pool.install(|| {
            work_items
                .into_par_iter()
                .map(|work| run_solver(&work, tx, sync_executor_config).err())
                .reduce_with(|err1, err2| match (err1, err2) {
                    (Some(e1), e2) => Some(ArcExecutorError::combine_opt(e2, e1)),
                    (None, e2) => e2,
                })
                .flatten()
                .map_or(Ok(()), Err)
        })
    }

    /// Execute grouped work items in parallel (for year-level parallelism)
    fn execute_parallel_grouped(
        &self,
        groups: Vec<Vec<WorkItem>>,
        tx: &Sender<SolverResult>,
    ) -> Result<(), ArcExecutorError> {
        let sync_executor_config = &self.sync_executor_config;

        self.thread_pool.install(|| {
            groups
                .into_par_iter()
                .map(|items| {
                    let mut err = None;
                    for work in items {
                        if let Err(e) = run_solver(&work, tx, sync_executor_config) {
                            err = Some(ArcExecutorError::combine_opt(err, e))
                        }
                    }
                    err
                })
                .reduce_with(|err1, err2| match (err1, err2) {
                    (Some(e1), e2) => Some(ArcExecutorError::combine_opt(e2, e1)),
                    (None, e2) => e2,
                })
                .flatten()
                .map_or(Ok(()), Err)
        })
    }
}

fn send(tx: &Sender<SolverResult>, result: SolverResult) -> Result<(), ArcExecutorError> {
    tx.send(result)
        .map_err(|_| ExecutorError::ChannelSend.into())
}

/// Load the input and solve every requested part of one puzzle
///
/// Per-puzzle failures (missing input, parse errors, unknown parts) are sent
/// as error results; only a closed channel fails the run.
fn run_solver(
    work: &WorkItem,
    tx: &Sender<SolverResult>,
    sync_executor_config: &SyncExecutorConfig,
) -> Result<(), ArcExecutorError> {
    let (year, day) = (work.year, work.day);

    let input = match sync_executor_config.inputs.read(year, day) {
        Ok(input) => input,
        Err(source) => {
            let error: ArcExecutorError = ExecutorError::Input { year, day, source }.into();
            for part in work.parts.clone() {
                send(tx, SolverResult::failed(year, day, part, error.clone()))?;
            }
            return Ok(());
        }
    };

    if matches!(sync_executor_config.parallelize_by, ParallelizeBy::Part) {
        run_solver_parts_parallel(work, &input, tx, &sync_executor_config.registry)
    } else {
        run_solver_sequential(work, &input, tx, &sync_executor_config.registry)
    }
}

/// Run solver with part-level parallelism, buffering results to emit in order
///
/// Every part parses its own copy of the input.
fn run_solver_parts_parallel(
    work: &WorkItem,
    input: &str,
    tx: &Sender<SolverResult>,
    registry: &SolverRegistry,
) -> Result<(), ArcExecutorError> {
    let (result_tx, result_rx) = std::sync::mpsc::channel();
    let (year, day) = (work.year, work.day);

    work.parts
        .clone()
        .into_par_iter()
        .for_each_with(result_tx, |rtx, part| {
            let result = match registry.create_solver(year, day, input) {
                Ok(mut solver) => solve_part(&mut *solver, part, true),
                Err(e) => SolverResult::failed(year, day, part, ExecutorError::from(e)),
            };
            rtx.send(result).ok();
        });

    let start_part = *work.parts.start();
    let mut buffer: Vec<Option<SolverResult>> = work.parts.clone().map(|_| None).collect();
    let mut next_part = start_part;

    for result in result_rx {
        let idx = usize::from(result.part - start_part);
        if let Some(slot) = buffer.get_mut(idx) {
            *slot = Some(result);
        }
        while let Some(result) = buffer
            .get_mut(usize::from(next_part - start_part))
            .and_then(Option::take)
        {
            send(tx, result)?;
            next_part = next_part.saturating_add(1);
        }
    }
    Ok(())
}

/// Parse once on a background thread and stream each part's result as soon
/// as it is solved
fn run_solver_sequential(
    work: &WorkItem,
    input: &str,
    tx: &Sender<SolverResult>,
    registry: &SolverRegistry,
) -> Result<(), ArcExecutorError> {
    let (solve_tx, solve_rx) = std::sync::mpsc::channel();
    let (year, day) = (work.year, work.day);
    let parts = work.parts.clone();

    std::thread::scope(|s| {
        s.spawn(move || match registry.create_solver(year, day, input) {
            Ok(mut solver) => {
                for (idx, part) in parts.enumerate() {
                    let result = solve_part(&mut *solver, part, idx == 0);
                    if solve_tx.send(result).is_err() {
                        break;
                    }
                }
            }
            Err(e) => {
                let error: ArcExecutorError = ExecutorError::from(e).into();
                for part in parts {
                    if solve_tx
                        .send(SolverResult::failed(year, day, part, error.clone()))
                        .is_err()
                    {
                        break;
                    }
                }
            }
        });

        for result in solve_rx {
            send(tx, result)?;
        }
        Ok(())
    })
}

/// Solve a single part on an already parsed instance
fn solve_part(solver: &mut dyn DynSolver, part: u8, with_parse: bool) -> SolverResult {
    let (year, day) = (solver.year(), solver.day());
    let parse_duration = with_parse.then(|| solver.parse_duration());

    match solver.solve(part) {
        Ok(solved) => SolverResult {
            year,
            day,
            part,
            solve_duration: solved.duration,
            answer: Ok(solved.answer),
            parse_duration,
        },
        Err(e) => SolverResult {
            parse_duration,
            ..SolverResult::failed(year, day, part, ExecutorError::from(SolverError::from(e)))
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aoc_solver::{AocParser, AocSolver, ParseError, PartSolver, SolveError, SolverRegistryBuilder};
    use std::fs;
    use tempfile::TempDir;

    /// Part 1 sums the numbers, part 2 multiplies them
    #[derive(AocSolver)]
    #[aoc_solver(max_parts = 2)]
    struct Numbers;

    impl AocParser for Numbers {
        type SharedData<'a> = Vec<u64>;

        fn parse(input: &str) -> Result<Self::SharedData<'_>, ParseError> {
            input
                .split_whitespace()
                .map(|n| n.parse().map_err(|_| ParseError::InvalidFormat(n.to_string())))
                .collect()
        }
    }

    impl PartSolver<1> for Numbers {
        fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
            Ok(shared.iter().sum::<u64>().to_string())
        }
    }

    impl PartSolver<2> for Numbers {
        fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
            Ok(shared.iter().product::<u64>().to_string())
        }
    }

    fn executor(
        dir: &TempDir,
        part_filter: Option<u8>,
        parallelize_by: ParallelizeBy,
    ) -> Executor {
        let registry = SolverRegistryBuilder::new()
            .register::<Numbers>(2030, 1)
            .and_then(|b| b.register::<Numbers>(2030, 2))
            .and_then(|b| b.register::<Numbers>(2031, 1))
            .unwrap()
            .build();
        let config = Config {
            year_filter: None,
            day_filter: None,
            part_filter,
            tags: Vec::new(),
            input_dir: dir.path().to_path_buf(),
            input_file: None,
            thread_count: 2,
            parallelize_by,
            quiet: true,
        };
        Executor::new(registry, &config).unwrap()
    }

    fn run(executor: &Executor) -> Vec<(u16, u8, u8, Result<String, String>)> {
        let (tx, rx) = std::sync::mpsc::channel();
        executor.execute(tx).unwrap();
        let mut results: Vec<_> = rx
            .into_iter()
            .map(|r| (r.year, r.day, r.part, r.answer.map_err(|e| e.to_string())))
            .collect();
        results.sort_by_key(|r| (r.0, r.1, r.2));
        results
    }

    fn write_inputs(dir: &TempDir) {
        fs::write(dir.path().join("2030_day01.txt"), "1 2 3\n").unwrap();
        fs::write(dir.path().join("2030_day02.txt"), "4 5\n").unwrap();
    }

    #[test]
    fn test_every_mode_produces_the_same_answers() {
        let dir = TempDir::new().unwrap();
        write_inputs(&dir);

        for mode in [
            ParallelizeBy::Sequential,
            ParallelizeBy::Year,
            ParallelizeBy::Day,
            ParallelizeBy::Part,
        ] {
            let results = run(&executor(&dir, None, mode));
            assert_eq!(results.len(), 6, "{mode:?}");
            assert_eq!(results[0], (2030, 1, 1, Ok("6".to_string())));
            assert_eq!(results[1], (2030, 1, 2, Ok("6".to_string())));
            assert_eq!(results[3], (2030, 2, 2, Ok("20".to_string())));
            // 2031/01 has no input file
            assert!(results[4].3.as_ref().is_err_and(|e| e.contains("2031_day01.txt")));
        }
    }

    #[test]
    fn test_unknown_part_is_reported_not_skipped() {
        let dir = TempDir::new().unwrap();
        write_inputs(&dir);

        let executor = executor(&dir, Some(3), ParallelizeBy::Day);
        let items = executor.collect_work_items();
        assert!(items.iter().all(|w| w.parts == (3..=3)));

        let results = run(&executor);
        assert_eq!(results[0], (2030, 1, 3, Err("Solve error: Part 3 is out of range".to_string())));
    }

    #[test]
    fn test_parse_error_reported_for_each_part() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("2030_day01.txt"), "1 x\n").unwrap();

        let results = run(&executor(&dir, None, ParallelizeBy::Sequential));
        assert!(results[0].3.is_err());
        assert!(results[1].3.is_err());
    }

    #[test]
    fn test_parse_time_counted_once_per_instance() {
        let dir = TempDir::new().unwrap();
        write_inputs(&dir);

        let (tx, rx) = std::sync::mpsc::channel();
        executor(&dir, None, ParallelizeBy::Sequential).execute(tx).unwrap();
        let with_parse = rx
            .into_iter()
            .filter(|r| r.answer.is_ok() && r.parse_duration.is_some())
            .count();
        assert_eq!(with_parse, 2);
    }
}
