//! Combining independent per-instance answers into one number

use aoc_solver::SolveError;
use rayon::prelude::*;
use thiserror::Error;

/// How per-instance results combine; both are order independent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reduction {
    Sum,
    Product,
}

/// A combined answer no longer fits its integer type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("{0:?} overflowed")]
pub struct CountOverflow(pub Reduction);

impl From<CountOverflow> for SolveError {
    fn from(err: CountOverflow) -> Self {
        SolveError::SolveFailed(Box::new(err))
    }
}

/// Unsigned answers that combine with overflow checks
pub trait Count: Copy + Send + Sync {
    const ZERO: Self;
    const ONE: Self;

    fn checked_add(self, other: Self) -> Option<Self>;
    fn checked_mul(self, other: Self) -> Option<Self>;
}

macro_rules! impl_count {
    ($($ty:ty),*) => {$(
        impl Count for $ty {
            const ZERO: Self = 0;
            const ONE: Self = 1;

            fn checked_add(self, other: Self) -> Option<Self> {
                <$ty>::checked_add(self, other)
            }

            fn checked_mul(self, other: Self) -> Option<Self> {
                <$ty>::checked_mul(self, other)
            }
        }
    )*};
}

impl_count!(u64, u128);

impl Reduction {
    pub fn identity<T: Count>(self) -> T {
        match self {
            Reduction::Sum => T::ZERO,
            Reduction::Product => T::ONE,
        }
    }

    pub fn combine<T: Count>(self, a: T, b: T) -> Result<T, CountOverflow> {
        match self {
            Reduction::Sum => a.checked_add(b),
            Reduction::Product => a.checked_mul(b),
        }
        .ok_or(CountOverflow(self))
    }

    pub fn reduce<T, I>(self, values: I) -> Result<T, CountOverflow>
    where
        T: Count,
        I: IntoIterator<Item = T>,
    {
        values
            .into_iter()
            .try_fold(self.identity(), |acc, value| self.combine(acc, value))
    }

    /// Reduce fallible results, stopping at the first error
    pub fn try_reduce<T, I, E>(self, values: I) -> Result<T, E>
    where
        T: Count,
        I: IntoIterator<Item = Result<T, E>>,
        E: From<CountOverflow>,
    {
        values
            .into_iter()
            .try_fold(self.identity(), |acc, value| Ok(self.combine(acc, value?)?))
    }

    /// Solve every instance on the rayon pool and reduce the results
    pub fn par_try_reduce<X, T, E, F>(self, instances: &[X], solve: F) -> Result<T, E>
    where
        X: Sync,
        T: Count,
        E: From<CountOverflow> + Send,
        F: Fn(&X) -> Result<T, E> + Sync + Send,
    {
        instances
            .par_iter()
            .map(solve)
            .try_reduce(|| self.identity(), |a, b| Ok(self.combine(a, b)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sum_and_product() {
        assert_eq!(Reduction::Sum.reduce([1u64, 2, 3, 4]), Ok(10));
        assert_eq!(Reduction::Product.reduce([1u64, 2, 3, 4]), Ok(24));
        assert_eq!(Reduction::Product.reduce::<u64, _>([]), Ok(1));
    }

    #[test]
    fn test_try_reduce_stops_at_error() {
        let ok: Result<u64, SolveError> = Reduction::Sum.try_reduce([Ok(1), Ok(2)]);
        assert_eq!(ok.unwrap(), 3);
        let err: Result<u64, SolveError> = Reduction::Sum.try_reduce([
            Ok(1),
            Err(SolveError::PartNotImplemented(2)),
            Ok(2),
        ]);
        assert!(matches!(err, Err(SolveError::PartNotImplemented(2))));
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let values: Vec<u64> = (1..=200).collect();
        let parallel: Result<u64, CountOverflow> =
            Reduction::Sum.par_try_reduce(&values, |v| Ok(v * 2));
        assert_eq!(parallel, Reduction::Sum.reduce(values.iter().map(|v| v * 2)));
    }

    #[test]
    fn test_overflow_is_an_error() {
        assert_eq!(
            Reduction::Sum.reduce([u64::MAX, 1]),
            Err(CountOverflow(Reduction::Sum))
        );
        assert_eq!(
            Reduction::Product.reduce([1u128 << 64, 1u128 << 64]),
            Err(CountOverflow(Reduction::Product))
        );
        assert_eq!(
            Reduction::Product.reduce([1u128 << 64, 1u128 << 63]),
            Ok(1u128 << 127)
        );

        let parallel: Result<u64, CountOverflow> =
            Reduction::Sum.par_try_reduce(&[u64::MAX, 1, 2], |&v| Ok(v));
        assert_eq!(parallel, Err(CountOverflow(Reduction::Sum)));
    }
}
