//! Snailfish numbers: binary trees of regular numbers that reduce after
//! every addition

use crate::utils::parse::parse_lines;
use aoc_solver::{AocParser, ParseError, PartSolver, SolveError};
use aoc_solver_macros::{AocSolver, AutoRegisterSolver};
use itertools::Itertools;
use std::fmt;
use std::ops::Add;
use std::str::FromStr;

/// Pairs nested inside this many pairs explode
const EXPLODE_DEPTH: usize = 4;
/// Regular numbers at or above this split
const SPLIT_THRESHOLD: u32 = 10;

#[derive(AocSolver, AutoRegisterSolver)]
#[aoc_solver(max_parts = 2)]
#[aoc(year = 2021, day = 18, tags = ["2021", "recursion", "parsing"])]
pub struct Solver;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Number {
    Regular(u32),
    Pair(Box<Number>, Box<Number>),
}

impl Number {
    pub fn pair(left: Number, right: Number) -> Self {
        Number::Pair(Box::new(left), Box::new(right))
    }

    pub fn magnitude(&self) -> u64 {
        match self {
            Number::Regular(value) => u64::from(*value),
            Number::Pair(left, right) => 3 * left.magnitude() + 2 * right.magnitude(),
        }
    }

    /// Apply explosions and splits until neither applies
    ///
    /// Every explosion is performed before any split is considered.
    pub fn reduce(&mut self) {
        loop {
            if self.explode(0).is_some() {
                continue;
            }
            if !self.split() {
                break;
            }
        }
    }

    /// Explode the leftmost pair nested `EXPLODE_DEPTH` deep
    ///
    /// Returns the values still to be added to the nearest regular number
    /// on each side, or `None` when nothing exploded.
    fn explode(&mut self, depth: usize) -> Option<(Option<u32>, Option<u32>)> {
        let Number::Pair(left, right) = self else {
            return None;
        };

        if depth >= EXPLODE_DEPTH
            && let (Number::Regular(l), Number::Regular(r)) = (left.as_ref(), right.as_ref())
        {
            let carry = (Some(*l), Some(*r));
            *self = Number::Regular(0);
            return Some(carry);
        }

        if let Some((carry_left, carry_right)) = left.explode(depth + 1) {
            if let Some(value) = carry_right {
                right.add_to_leftmost(value);
            }
            return Some((carry_left, None));
        }
        if let Some((carry_left, carry_right)) = right.explode(depth + 1) {
            if let Some(value) = carry_left {
                left.add_to_rightmost(value);
            }
            return Some((None, carry_right));
        }
        None
    }

    fn add_to_leftmost(&mut self, value: u32) {
        match self {
            Number::Regular(n) => *n += value,
            Number::Pair(left, _) => left.add_to_leftmost(value),
        }
    }

    fn add_to_rightmost(&mut self, value: u32) {
        match self {
            Number::Regular(n) => *n += value,
            Number::Pair(_, right) => right.add_to_rightmost(value),
        }
    }

    /// Split the leftmost regular number of at least `SPLIT_THRESHOLD`
    fn split(&mut self) -> bool {
        match self {
            Number::Regular(value) if *value >= SPLIT_THRESHOLD => {
                let half = *value / 2;
                let rest = *value - half;
                *self = Number::pair(Number::Regular(half), Number::Regular(rest));
                true
            }
            Number::Regular(_) => false,
            Number::Pair(left, right) => left.split() || right.split(),
        }
    }
}

impl Add for Number {
    type Output = Number;

    fn add(self, rhs: Number) -> Number {
        let mut sum = Number::pair(self, rhs);
        sum.reduce();
        sum
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Regular(value) => write!(f, "{value}"),
            Number::Pair(left, right) => write!(f, "[{left},{right}]"),
        }
    }
}

impl FromStr for Number {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut reader = Reader {
            bytes: s.trim().as_bytes(),
            pos: 0,
        };
        let number = reader.number()?;
        if reader.pos != reader.bytes.len() {
            return Err(reader.error("trailing characters"));
        }
        Ok(number)
    }
}

/// Recursive descent over `[left,right]` and decimal literals
struct Reader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl Reader<'_> {
    fn number(&mut self) -> Result<Number, ParseError> {
        match self.bytes.get(self.pos) {
            Some(b'[') => {
                self.pos += 1;
                let left = self.number()?;
                self.expect(b',')?;
                let right = self.number()?;
                self.expect(b']')?;
                Ok(Number::pair(left, right))
            }
            Some(b) if b.is_ascii_digit() => {
                let digits = self.bytes[self.pos..]
                    .iter()
                    .take_while(|b| b.is_ascii_digit())
                    .count();
                let value = self.bytes[self.pos..self.pos + digits]
                    .iter()
                    .try_fold(0u32, |acc, &b| acc.checked_mul(10)?.checked_add(u32::from(b - b'0')))
                    .ok_or_else(|| self.error("regular number too large"))?;
                self.pos += digits;
                Ok(Number::Regular(value))
            }
            _ => Err(self.error("expected '[' or a digit")),
        }
    }

    fn expect(&mut self, byte: u8) -> Result<(), ParseError> {
        if self.bytes.get(self.pos) == Some(&byte) {
            self.pos += 1;
            Ok(())
        } else {
            Err(self.error(&format!("expected '{}'", byte as char)))
        }
    }

    fn error(&self, reason: &str) -> ParseError {
        ParseError::InvalidFormat(format!("{reason} at column {}", self.pos + 1))
    }
}

impl AocParser for Solver {
    type SharedData<'a> = Vec<Number>;

    fn parse<'a>(input: &'a str) -> Result<Self::SharedData<'a>, ParseError> {
        let numbers = parse_lines(input, |line| Ok(line.parse::<Number>()?))?;
        if numbers.is_empty() {
            return Err(ParseError::MissingData("no snailfish numbers".to_string()));
        }
        Ok(numbers)
    }
}

impl PartSolver<1> for Solver {
    fn solve(numbers: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        let sum = numbers
            .iter()
            .cloned()
            .reduce(|acc, number| acc + number)
            .ok_or_else(|| SolveError::SolveFailed("no snailfish numbers".into()))?;
        Ok(sum.magnitude().to_string())
    }
}

impl PartSolver<2> for Solver {
    /// Largest magnitude of the sum of two different numbers; addition is
    /// not commutative, so both orders are tried
    fn solve(numbers: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        let largest = numbers
            .iter()
            .permutations(2)
            .map(|pair| (pair[0].clone() + pair[1].clone()).magnitude())
            .max()
            .unwrap_or(0);
        Ok(largest.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aoc_solver::Solver as _;

    const HOMEWORK: &str = "\
[[[0,[5,8]],[[1,7],[9,6]]],[[4,[1,2]],[[1,4],2]]]
[[[5,[2,8]],4],[5,[[9,9],0]]]
[6,[[[6,2],[5,6]],[[7,6],[4,7]]]]
[[[6,[0,7]],[0,9]],[4,[9,[9,0]]]]
[[[7,[6,4]],[3,[1,3]]],[[[5,5],1],9]]
[[6,[[7,3],[3,2]]],[[[3,8],[5,7]],4]]
[[[[5,4],[7,7]],8],[[8,3],8]]
[[9,3],[[9,9],[6,[4,9]]]]
[[2,[[7,7],7]],[[5,8],[[9,3],[0,2]]]]
[[[[5,2],5],[8,[3,7]]],[[5,[7,5]],[4,4]]]
";

    fn number(s: &str) -> Number {
        s.parse().unwrap()
    }

    #[test]
    fn test_part1_example() {
        let mut shared = Solver::parse(HOMEWORK).unwrap();
        assert_eq!(Solver::solve_part(&mut shared, 1).unwrap(), "4140");
    }

    #[test]
    fn test_part2_example() {
        let mut shared = Solver::parse(HOMEWORK).unwrap();
        assert_eq!(Solver::solve_part(&mut shared, 2).unwrap(), "3993");
    }

    #[test]
    fn test_homework_sum() {
        let sum = Solver::parse(HOMEWORK)
            .unwrap()
            .into_iter()
            .reduce(|a, b| a + b)
            .unwrap();
        assert_eq!(
            sum.to_string(),
            "[[[[6,6],[7,6]],[[7,7],[7,0]]],[[[7,7],[7,7]],[[7,8],[9,9]]]]"
        );
    }

    #[test]
    fn test_single_explosions() {
        let cases = [
            ("[[[[[9,8],1],2],3],4]", "[[[[0,9],2],3],4]"),
            ("[7,[6,[5,[4,[3,2]]]]]", "[7,[6,[5,[7,0]]]]"),
            ("[[6,[5,[4,[3,2]]]],1]", "[[6,[5,[7,0]]],3]"),
            (
                "[[3,[2,[1,[7,3]]]],[6,[5,[4,[3,2]]]]]",
                "[[3,[2,[8,0]]],[9,[5,[4,[3,2]]]]]",
            ),
        ];
        for (input, expected) in cases {
            let mut n = number(input);
            assert!(n.explode(0).is_some(), "{input} should explode");
            assert_eq!(n.to_string(), expected);
        }
    }

    #[test]
    fn test_split_halves_round_up_on_the_right() {
        let mut n = Number::Regular(11);
        assert!(n.split());
        assert_eq!(n, number("[5,6]"));
        assert!(!Number::Regular(9).split());
    }

    #[test]
    fn test_addition_reduces() {
        let sum = number("[[[[4,3],4],4],[7,[[8,4],9]]]") + number("[1,1]");
        assert_eq!(sum.to_string(), "[[[[0,7],4],[[7,8],[6,0]]],[8,1]]");
    }

    #[test]
    fn test_magnitude() {
        assert_eq!(number("[[1,2],[[3,4],5]]").magnitude(), 143);
        assert_eq!(number("[[[[0,7],4],[[7,8],[6,0]]],[8,1]]").magnitude(), 1384);
        assert_eq!(number("[[[[8,7],[7,7]],[[8,6],[7,7]]],[[[0,7],[6,6]],[8,7]]]").magnitude(), 3488);
    }

    #[test]
    fn test_display_round_trips_input() {
        let text = "[[1,[2,3]],[[4,5],16]]";
        assert_eq!(number(text).to_string(), text);
    }

    #[test]
    fn test_malformed_numbers_rejected() {
        for bad in ["[1,2", "[1;2]", "[1,2]]", "[,2]", "x"] {
            assert!(bad.parse::<Number>().is_err(), "{bad} should be rejected");
        }
    }
}
