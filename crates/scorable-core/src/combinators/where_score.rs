//! `where_score`: a candidate only counts as scoring when a predicate over
//! its score holds.

use super::delegating::{Delegating, Interpret};
use crate::domain::ScorableError;
use crate::scorable::Scorable;

pub struct ScoreFilter<F> {
    predicate: F,
}

impl<F> ScoreFilter<F> {
    pub fn new(predicate: F) -> Self {
        Self { predicate }
    }
}

impl<I, T, F> Interpret<I, T> for ScoreFilter<F>
where
    T: Scorable<I>,
    F: Fn(&I, &T::Score) -> bool + Send + Sync,
{
    type Score = T::Score;

    fn has_score(&self, inner: &T, item: &I, state: &T::State) -> Result<bool, ScorableError> {
        if !inner.has_score(item, state)? {
            return Ok(false);
        }
        let score = inner.get_score(item, state)?;
        Ok((self.predicate)(item, &score))
    }

    fn get_score(&self, inner: &T, item: &I, state: &T::State) -> Result<T::Score, ScorableError> {
        inner.get_score(item, state)
    }
}

pub type WhereScore<T, F> = Delegating<T, ScoreFilter<F>>;
