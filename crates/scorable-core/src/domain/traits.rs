//! Traits - declared score bounds.

use std::cmp::Ordering;
use std::fmt::Debug;

use serde::{Deserialize, Serialize};

use super::errors::ScorableError;
use super::order::Comparator;

/// `[minimum, maximum]` bound on the scores a set of candidates may produce.
///
/// A bounded fold treats any score outside the bound as a protocol violation
/// and stops scanning as soon as a candidate reaches `maximum`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Traits<S> {
    pub minimum: S,
    pub maximum: S,
}

impl<S> Traits<S> {
    pub fn new(minimum: S, maximum: S) -> Self {
        Self { minimum, maximum }
    }

    /// Fails with `InvalidTraits` when `minimum` orders after `maximum`.
    pub fn validate(&self, comparator: &Comparator<S>) -> Result<(), ScorableError>
    where
        S: Debug,
    {
        if comparator(&self.minimum, &self.maximum) == Ordering::Greater {
            return Err(ScorableError::InvalidTraits {
                minimum: format!("{:?}", self.minimum),
                maximum: format!("{:?}", self.maximum),
            });
        }
        Ok(())
    }

    pub fn contains(&self, score: &S, comparator: &Comparator<S>) -> bool {
        comparator(score, &self.minimum) != Ordering::Less
            && comparator(score, &self.maximum) != Ordering::Greater
    }
}

/// Traits for probability-like `f64` scores in `[0.0, 1.0]`.
#[derive(Debug, Clone, Copy, Default)]
pub struct NormalizedTraits;

impl NormalizedTraits {
    pub const MINIMUM: f64 = 0.0;
    pub const MAXIMUM: f64 = 1.0;

    pub fn traits() -> Traits<f64> {
        Traits::new(Self::MINIMUM, Self::MAXIMUM)
    }
}

impl From<NormalizedTraits> for Traits<f64> {
    fn from(_: NormalizedTraits) -> Self {
        NormalizedTraits::traits()
    }
}
