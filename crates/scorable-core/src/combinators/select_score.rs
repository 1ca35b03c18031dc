//! `select_score`: map the inner score when it is read.

use std::marker::PhantomData;

use super::delegating::{Delegating, Interpret};
use crate::domain::ScorableError;
use crate::scorable::Scorable;

pub struct ScoreMap<F, S> {
    map: F,
    _marker: PhantomData<fn() -> S>,
}

impl<F, S> ScoreMap<F, S> {
    pub fn new(map: F) -> Self {
        Self {
            map,
            _marker: PhantomData,
        }
    }
}

impl<I, T, F, S> Interpret<I, T> for ScoreMap<F, S>
where
    T: Scorable<I>,
    F: Fn(&I, T::Score) -> S + Send + Sync,
    S: Send + 'static,
{
    type Score = S;

    fn get_score(&self, inner: &T, item: &I, state: &T::State) -> Result<S, ScorableError> {
        let score = inner.get_score(item, state)?;
        Ok((self.map)(item, score))
    }
}

pub type SelectScore<T, F, S> = Delegating<T, ScoreMap<F, S>>;
