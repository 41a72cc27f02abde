//! Line-oriented parsing helpers

use anyhow::Context;
use aoc_solver::ParseError;
use std::str::FromStr;

/// Parse every non-blank line with `parse_line`
///
/// Failures are reported as [`ParseError::InvalidFormat`] carrying the
/// 1-based line number and the full error context.
pub fn parse_lines<T>(
    input: &str,
    mut parse_line: impl FnMut(&str) -> anyhow::Result<T>,
) -> Result<Vec<T>, ParseError> {
    input
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(line_idx, line)| {
            parse_line(line).map_err(|e| ParseError::at_line(line_idx, format!("{e:#}")))
        })
        .collect()
}

/// Split `text` on `separator` and parse each trimmed, non-empty piece
pub fn parse_separated<T>(text: &str, separator: char) -> anyhow::Result<Vec<T>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    text.split(separator)
        .map(str::trim)
        .filter(|piece| !piece.is_empty())
        .map(|piece| {
            piece
                .parse()
                .with_context(|| format!("cannot parse '{piece}' as a number"))
        })
        .collect()
}

/// Group lines into sections separated by one or more blank lines
pub fn sections(input: &str) -> Vec<Vec<&str>> {
    let mut sections = Vec::new();
    let mut current = Vec::new();
    for line in input.lines() {
        if line.trim().is_empty() {
            if !current.is_empty() {
                sections.push(std::mem::take(&mut current));
            }
        } else {
            current.push(line);
        }
    }
    if !current.is_empty() {
        sections.push(current);
    }
    sections
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;

    #[test]
    fn test_line_numbers_in_errors() {
        let err = parse_lines("1\n\n2\nx\n", |line| {
            line.parse::<u32>().map_err(|_| anyhow!("not a number: {line}"))
        })
        .unwrap_err();
        assert_eq!(err, ParseError::InvalidFormat("(line 4) not a number: x".into()));
    }

    #[test]
    fn test_separated_numbers() {
        assert_eq!(parse_separated::<u32>("3, 5,7", ',').unwrap(), vec![3, 5, 7]);
        assert!(parse_separated::<u32>("3,a", ',').is_err());
    }

    #[test]
    fn test_sections() {
        let input = "a\nb\n\n\nc\r\n\r\nd\n";
        assert_eq!(sections(input), vec![vec!["a", "b"], vec!["c"], vec!["d"]]);
        assert!(sections("\n\n").is_empty());
    }
}
