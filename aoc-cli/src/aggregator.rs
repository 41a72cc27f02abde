//! Re-orders results arriving from parallel workers
//!
//! Results are released strictly in (year, day, part) order: each one waits
//! in a buffer until every result that sorts before it has been released.

use crate::executor::{SolverResult, WorkItem};
use std::collections::{BTreeMap, VecDeque};

/// Key for ordering results (year, day, part) - ordered ascending
#[derive(Debug, Ord, PartialOrd, Eq, PartialEq, Clone, Copy)]
pub struct ResultKey {
    pub year: u16,
    pub day: u8,
    pub part: u8,
}

impl From<&SolverResult> for ResultKey {
    fn from(r: &SolverResult) -> Self {
        Self {
            year: r.year,
            day: r.day,
            part: r.part,
        }
    }
}

/// Aggregator that buffers results and emits them in sorted order
pub struct ResultAggregator {
    /// Keys not yet released, ascending
    expected: VecDeque<ResultKey>,
    /// Results received ahead of their turn
    pending: BTreeMap<ResultKey, SolverResult>,
}

impl ResultAggregator {
    pub fn new(mut expected_keys: Vec<ResultKey>) -> Self {
        expected_keys.sort_unstable();
        expected_keys.dedup();
        Self {
            expected: expected_keys.into(),
            pending: BTreeMap::new(),
        }
    }

    /// Expect one result per part of every work item
    pub fn for_work_items(work_items: &[WorkItem]) -> Self {
        Self::new(
            work_items
                .iter()
                .flat_map(|w| {
                    w.parts.clone().map(move |part| ResultKey {
                        year: w.year,
                        day: w.day,
                        part,
                    })
                })
                .collect(),
        )
    }

    pub fn expected_len(&self) -> usize {
        self.expected.len()
    }

    /// Add a result and return any results ready for output (in order)
    pub fn add(&mut self, result: SolverResult) -> Vec<SolverResult> {
        self.pending.insert(ResultKey::from(&result), result);

        let mut ready = Vec::new();
        while let Some(next) = self.expected.front() {
            let Some(result) = self.pending.remove(next) else {
                break;
            };
            self.expected.pop_front();
            ready.push(result);
        }
        ready
    }

    /// Drain remaining results in order (for final output)
    pub fn drain(&mut self) -> Vec<SolverResult> {
        std::mem::take(&mut self.pending).into_values().collect()
    }

    /// Check if all expected results have been received
    pub fn is_complete(&self) -> bool {
        self.expected.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeDelta;
    use proptest::prelude::*;

    fn make_result(year: u16, day: u8, part: u8) -> SolverResult {
        SolverResult {
            year,
            day,
            part,
            answer: Ok(format!("{}_{}_{}", year, day, part)),
            solve_duration: TimeDelta::milliseconds(10),
            parse_duration: Some(TimeDelta::milliseconds(5)),
        }
    }

    fn keys(ids: &[(u16, u8, u8)]) -> Vec<ResultKey> {
        ids.iter()
            .map(|&(year, day, part)| ResultKey { year, day, part })
            .collect()
    }

    fn order(results: &[SolverResult]) -> Vec<(u16, u8, u8)> {
        results.iter().map(|r| (r.year, r.day, r.part)).collect()
    }

    #[test]
    fn test_in_order_results() {
        let mut agg = ResultAggregator::new(keys(&[(2025, 1, 1), (2025, 1, 2)]));

        assert_eq!(order(&agg.add(make_result(2025, 1, 1))), vec![(2025, 1, 1)]);
        assert_eq!(order(&agg.add(make_result(2025, 1, 2))), vec![(2025, 1, 2)]);
        assert!(agg.is_complete());
    }

    #[test]
    fn test_out_of_order_results() {
        let mut agg = ResultAggregator::new(keys(&[(2025, 2, 1), (2025, 1, 2), (2025, 1, 1)]));

        assert!(agg.add(make_result(2025, 1, 2)).is_empty());
        assert!(agg.add(make_result(2025, 2, 1)).is_empty());

        let ready = agg.add(make_result(2025, 1, 1));
        assert_eq!(
            order(&ready),
            vec![(2025, 1, 1), (2025, 1, 2), (2025, 2, 1)]
        );
        assert!(agg.is_complete());
    }

    #[test]
    fn test_drain_remaining() {
        let mut agg = ResultAggregator::new(keys(&[(2021, 18, 1), (2021, 18, 2)]));

        agg.add(make_result(2021, 18, 2));
        assert!(!agg.is_complete());

        assert_eq!(order(&agg.drain()), vec![(2021, 18, 2)]);
        assert!(agg.drain().is_empty());
    }

    #[test]
    fn test_keys_from_work_items() {
        let work = [
            WorkItem {
                year: 2025,
                day: 12,
                parts: 1..=2,
            },
            WorkItem {
                year: 2021,
                day: 18,
                parts: 3..=3,
            },
        ];
        let agg = ResultAggregator::for_work_items(&work);
        assert_eq!(agg.expected_len(), 3);
        assert_eq!(agg.expected.front(), Some(&ResultKey { year: 2021, day: 18, part: 3 }));
    }

    proptest! {
        #[test]
        fn prop_any_arrival_order_is_released_sorted(
            ids in prop::collection::btree_set((2015u16..2020, 1u8..=25, 1u8..=2), 1..30)
                .prop_map(|ids| ids.into_iter().collect::<Vec<_>>())
                .prop_shuffle()
        ) {
            let mut agg = ResultAggregator::new(keys(&ids));
            let mut released = Vec::new();
            for &(year, day, part) in &ids {
                released.extend(order(&agg.add(make_result(year, day, part))));
            }

            let mut sorted = ids.clone();
            sorted.sort_unstable();
            prop_assert_eq!(released, sorted);
            prop_assert!(agg.is_complete());
        }
    }
}
