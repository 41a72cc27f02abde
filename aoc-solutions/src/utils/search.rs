//! Level-order state-space search
//!
//! A search starts from a single state and repeatedly applies a pure
//! transition function to every state of the current [`Frontier`]. The first
//! level that contains a goal state gives the minimum number of transitions.
//!
//! [`WeightedFrontier`] is the counting variant: instead of a set it keeps,
//! per state, the number of distinct routes that reach it, which lets callers
//! count routes rather than measure distances.

use crate::utils::reduce::{CountOverflow, Reduction};
use aoc_solver::SolveError;
use std::collections::{HashMap, HashSet};
use std::hash::Hash;
use thiserror::Error;

/// The goal was not reached before the frontier ran empty or the depth
/// bound was hit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("search exhausted after {depth} transitions without reaching the goal")]
pub struct SearchExhausted {
    pub depth: usize,
}

impl From<SearchExhausted> for SolveError {
    fn from(err: SearchExhausted) -> Self {
        SolveError::SolveFailed(Box::new(err))
    }
}

/// Route counting failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RouteCountError {
    #[error(transparent)]
    Exhausted(#[from] SearchExhausted),
    #[error("route count: {0}")]
    Overflow(#[from] CountOverflow),
}

impl From<RouteCountError> for SolveError {
    fn from(err: RouteCountError) -> Self {
        SolveError::SolveFailed(Box::new(err))
    }
}

/// States reachable after exactly `k` transitions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frontier<S: Eq + Hash> {
    states: HashSet<S>,
}

impl<S: Eq + Hash> Frontier<S> {
    pub fn single(start: S) -> Self {
        Self {
            states: HashSet::from([start]),
        }
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn contains(&self, state: &S) -> bool {
        self.states.contains(state)
    }

    pub fn iter(&self) -> impl Iterator<Item = &S> + '_ {
        self.states.iter()
    }

    /// All successors of all states, deduplicated
    pub fn step<I, F>(&self, mut successors: F) -> Self
    where
        F: FnMut(&S) -> I,
        I: IntoIterator<Item = S>,
    {
        self.states.iter().flat_map(|state| successors(state)).collect()
    }
}

impl<S: Eq + Hash> FromIterator<S> for Frontier<S> {
    fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
        Self {
            states: iter.into_iter().collect(),
        }
    }
}

/// States reachable after exactly `k` transitions, each with the number of
/// distinct routes that reach it
///
/// Counts are exact: a level whose counts do not fit in `u128` is a
/// [`CountOverflow`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeightedFrontier<S: Eq + Hash> {
    counts: HashMap<S, u128>,
}

impl<S: Eq + Hash> WeightedFrontier<S> {
    pub fn single(start: S) -> Self {
        Self {
            counts: HashMap::from([(start, 1)]),
        }
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Routes reaching `state` at this level (0 when absent)
    pub fn get(&self, state: &S) -> u128 {
        self.counts.get(state).copied().unwrap_or(0)
    }

    /// Routes over all states at this level
    pub fn total(&self) -> Result<u128, CountOverflow> {
        Reduction::Sum.reduce(self.counts.values().copied())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&S, u128)> + '_ {
        self.counts.iter().map(|(state, &count)| (state, count))
    }

    /// Push every state's count to each of its successors, summing counts
    /// that arrive at the same successor
    pub fn step<I, F>(&self, mut successors: F) -> Result<Self, CountOverflow>
    where
        F: FnMut(&S) -> I,
        I: IntoIterator<Item = S>,
    {
        let mut counts = HashMap::with_capacity(self.counts.len());
        for (state, &count) in &self.counts {
            for next in successors(state) {
                let routes = counts.entry(next).or_insert(0);
                *routes = Reduction::Sum.combine(*routes, count)?;
            }
        }
        Ok(Self { counts })
    }
}

/// Breadth-first explorer over a pure transition function
///
/// ```
/// use aoc_solutions::utils::search::BreadthFirst;
///
/// // Reach 10 from 1 using "+1" and "*2"
/// let depth = BreadthFirst::new(|n: &u32| [n + 1, n * 2])
///     .max_depth(20)
///     .min_transitions(1, |&n| n == 10)
///     .unwrap();
/// assert_eq!(depth, 4); // 1 -> 2 -> 4 -> 5 -> 10
/// ```
pub struct BreadthFirst<F> {
    successors: F,
    max_depth: Option<usize>,
}

impl<F> BreadthFirst<F> {
    pub fn new(successors: F) -> Self {
        Self {
            successors,
            max_depth: None,
        }
    }

    /// Give up with [`SearchExhausted`] once this many transitions were taken
    pub fn max_depth(mut self, limit: usize) -> Self {
        self.max_depth = Some(limit);
        self
    }

    fn depth_exceeded(&self, depth: usize) -> bool {
        self.max_depth.is_some_and(|limit| depth >= limit)
    }

    /// Minimum number of transitions from `start` to a state satisfying `goal`
    ///
    /// States expanded at an earlier level are not expanded again, so any
    /// finite state space ends either with a depth or with
    /// [`SearchExhausted`].
    pub fn min_transitions<S, I, G>(&mut self, start: S, mut goal: G) -> Result<usize, SearchExhausted>
    where
        S: Eq + Hash + Clone,
        F: FnMut(&S) -> I,
        I: IntoIterator<Item = S>,
        G: FnMut(&S) -> bool,
    {
        if goal(&start) {
            return Ok(0);
        }

        let mut seen = HashSet::from([start.clone()]);
        let mut frontier = Frontier::single(start);
        let mut depth = 0;

        while !frontier.is_empty() && !self.depth_exceeded(depth) {
            let mut next = HashSet::new();
            for state in frontier.iter() {
                for successor in (self.successors)(state) {
                    if goal(&successor) {
                        return Ok(depth + 1);
                    }
                    if seen.insert(successor.clone()) {
                        next.insert(successor);
                    }
                }
            }
            frontier = Frontier { states: next };
            depth += 1;
        }

        Err(SearchExhausted { depth })
    }

    /// Number of distinct routes from `start` that arrive at `target`
    ///
    /// Arrivals are summed over every level; a route needs at least one
    /// transition. The state graph must be acyclic: with a cycle the frontier
    /// never empties and only `max_depth` stops the search.
    pub fn count_routes<S, I>(&mut self, start: S, target: &S) -> Result<u128, RouteCountError>
    where
        S: Eq + Hash,
        F: FnMut(&S) -> I,
        I: IntoIterator<Item = S>,
    {
        let mut arrivals = 0;
        let mut frontier = WeightedFrontier::single(start);
        let mut depth = 0;

        while !frontier.is_empty() {
            if self.depth_exceeded(depth) {
                return Err(SearchExhausted { depth }.into());
            }
            frontier = frontier.step(&mut self.successors)?;
            depth += 1;
            arrivals = Reduction::Sum.combine(arrivals, frontier.get(target))?;
        }

        Ok(arrivals)
    }
}
