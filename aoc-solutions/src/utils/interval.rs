//! Inclusive integer intervals

use aoc_solver::ParseError;
use std::ops::RangeInclusive;

/// Parse `start-end` into an inclusive range
pub fn parse_range(text: &str) -> Result<RangeInclusive<u64>, ParseError> {
    let (start, end) = text
        .trim()
        .split_once('-')
        .ok_or_else(|| ParseError::InvalidFormat(format!("expected 'start-end', got '{text}'")))?;
    let parse = |s: &str| {
        s.parse::<u64>()
            .map_err(|e| ParseError::InvalidFormat(format!("bad bound '{s}' in '{text}': {e}")))
    };
    let (start, end) = (parse(start)?, parse(end)?);
    if start > end {
        return Err(ParseError::InvalidFormat(format!(
            "range '{text}' ends before it starts"
        )));
    }
    Ok(start..=end)
}

/// Sort and merge overlapping or touching ranges
///
/// The result is sorted by start and no two ranges overlap or are adjacent.
pub fn merge(mut ranges: Vec<RangeInclusive<u64>>) -> Vec<RangeInclusive<u64>> {
    ranges.sort_by_key(|range| *range.start());

    let mut merged: Vec<RangeInclusive<u64>> = Vec::with_capacity(ranges.len());
    for range in ranges {
        if let Some(last) = merged.last_mut()
            && *range.start() <= last.end().saturating_add(1)
        {
            if range.end() > last.end() {
                *last = *last.start()..=*range.end();
            }
            continue;
        }
        merged.push(range);
    }
    merged
}

/// Number of integers covered by `range`
pub fn span(range: &RangeInclusive<u64>) -> u64 {
    range.end() - range.start() + 1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlapping_ranges_merge() {
        assert_eq!(merge(vec![3..=5, 4..=10]), vec![3..=10]);
    }

    #[test]
    fn test_disjoint_ranges_stay_apart() {
        assert_eq!(merge(vec![7..=10, 3..=5]), vec![3..=5, 7..=10]);
    }

    #[test]
    fn test_contained_and_adjacent_ranges() {
        assert_eq!(merge(vec![1..=10, 2..=3, 11..=12]), vec![1..=12]);
        assert_eq!(merge(vec![]), Vec::<RangeInclusive<u64>>::new());
    }

    #[test]
    fn test_parse_range() {
        assert_eq!(parse_range("10-14"), Ok(10..=14));
        assert!(parse_range("10").is_err());
        assert!(parse_range("14-10").is_err());
        assert!(parse_range("a-3").is_err());
    }

    #[test]
    fn test_span() {
        assert_eq!(span(&(3..=5)), 3);
        assert_eq!(merge(vec![3..=5, 10..=14, 16..=20, 12..=18]).iter().map(span).sum::<u64>(), 14);
    }
}
