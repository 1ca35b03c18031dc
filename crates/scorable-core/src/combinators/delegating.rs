//! Delegating base: wraps one inner candidate and reinterprets its score.
//!
//! `prepare`, `commit` and `release` always go straight to the inner
//! candidate with the inner state, so an `Interpret` policy can change what
//! the score means but never the lifecycle.

use async_trait::async_trait;

use crate::domain::{CancelSignal, ScorableError};
use crate::scorable::Scorable;

/// Overridable phases of a delegating candidate.
pub trait Interpret<Item, Inner: Scorable<Item>>: Send + Sync {
    type Score: Send + 'static;

    fn has_score(
        &self,
        inner: &Inner,
        item: &Item,
        state: &Inner::State,
    ) -> Result<bool, ScorableError> {
        inner.has_score(item, state)
    }

    fn get_score(
        &self,
        inner: &Inner,
        item: &Item,
        state: &Inner::State,
    ) -> Result<Self::Score, ScorableError>;
}

pub struct Delegating<T, P> {
    inner: T,
    policy: P,
}

impl<T, P> Delegating<T, P> {
    pub fn new(inner: T, policy: P) -> Self {
        Self { inner, policy }
    }

    pub fn inner(&self) -> &T {
        &self.inner
    }

    pub fn into_inner(self) -> T {
        self.inner
    }
}

#[async_trait]
impl<I, T, P> Scorable<I> for Delegating<T, P>
where
    I: Send + Sync + 'static,
    T: Scorable<I>,
    P: Interpret<I, T>,
{
    type Score = P::Score;
    type State = T::State;

    async fn prepare(&self, item: &I, cancel: &CancelSignal) -> Result<T::State, ScorableError> {
        self.inner.prepare(item, cancel).await
    }

    fn has_score(&self, item: &I, state: &T::State) -> Result<bool, ScorableError> {
        self.policy.has_score(&self.inner, item, state)
    }

    fn get_score(&self, item: &I, state: &T::State) -> Result<P::Score, ScorableError> {
        self.policy.get_score(&self.inner, item, state)
    }

    async fn commit(
        &self,
        item: &I,
        state: &T::State,
        cancel: &CancelSignal,
    ) -> Result<(), ScorableError> {
        self.inner.commit(item, state, cancel).await
    }

    async fn release(
        &self,
        item: &I,
        state: T::State,
        cancel: &CancelSignal,
    ) -> Result<(), ScorableError> {
        self.inner.release(item, state, cancel).await
    }

    fn is_null(&self) -> bool {
        self.inner.is_null()
    }
}
