//! Type erasure: `Erased<T>` turns any `Scorable` into a `DynScorable`.
//!
//! # Object Safety
//! - `DynScorable` has no associated types; the state travels as `BoxedState`
//! - `Erased<T>` downcasts the box back to `T::State` on every phase

use std::any::{Any, type_name};
use std::sync::Arc;

use async_trait::async_trait;

use super::Scorable;
use crate::domain::{CancelSignal, ScorableError};

/// State of an erased candidate.
pub type BoxedState = Box<dyn Any + Send + Sync>;

/// Shared handle to an erased candidate. Fold inputs and outputs use this.
pub type ScorableRef<Item, Score> = Arc<dyn DynScorable<Item, Score>>;

#[async_trait]
pub trait DynScorable<Item, Score>: Send + Sync {
    async fn prepare_dyn(
        &self,
        item: &Item,
        cancel: &CancelSignal,
    ) -> Result<BoxedState, ScorableError>;

    fn has_score_dyn(&self, item: &Item, state: &BoxedState) -> Result<bool, ScorableError>;

    fn get_score_dyn(&self, item: &Item, state: &BoxedState) -> Result<Score, ScorableError>;

    async fn commit_dyn(
        &self,
        item: &Item,
        state: &BoxedState,
        cancel: &CancelSignal,
    ) -> Result<(), ScorableError>;

    async fn release_dyn(
        &self,
        item: &Item,
        state: BoxedState,
        cancel: &CancelSignal,
    ) -> Result<(), ScorableError>;

    fn is_null_dyn(&self) -> bool;

    /// Type name of the wrapped candidate, for logs.
    fn name(&self) -> &'static str;
}

pub struct Erased<T> {
    inner: T,
}

impl<T> Erased<T> {
    pub fn new(inner: T) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &T {
        &self.inner
    }
}

fn downcast<S: 'static>(state: &BoxedState) -> Result<&S, ScorableError> {
    (**state)
        .downcast_ref::<S>()
        .ok_or(ScorableError::StateMismatch {
            expected: type_name::<S>(),
        })
}

#[async_trait]
impl<I, T> DynScorable<I, T::Score> for Erased<T>
where
    I: Send + Sync + 'static,
    T: Scorable<I>,
{
    async fn prepare_dyn(
        &self,
        item: &I,
        cancel: &CancelSignal,
    ) -> Result<BoxedState, ScorableError> {
        let state = self.inner.prepare(item, cancel).await?;
        Ok(Box::new(state))
    }

    fn has_score_dyn(&self, item: &I, state: &BoxedState) -> Result<bool, ScorableError> {
        self.inner.has_score(item, downcast::<T::State>(state)?)
    }

    fn get_score_dyn(&self, item: &I, state: &BoxedState) -> Result<T::Score, ScorableError> {
        self.inner.get_score(item, downcast::<T::State>(state)?)
    }

    async fn commit_dyn(
        &self,
        item: &I,
        state: &BoxedState,
        cancel: &CancelSignal,
    ) -> Result<(), ScorableError> {
        let state = downcast::<T::State>(state)?;
        self.inner.commit(item, state, cancel).await
    }

    async fn release_dyn(
        &self,
        item: &I,
        state: BoxedState,
        cancel: &CancelSignal,
    ) -> Result<(), ScorableError> {
        let state = state
            .downcast::<T::State>()
            .map_err(|_| ScorableError::StateMismatch {
                expected: type_name::<T::State>(),
            })?;
        self.inner.release(item, *state, cancel).await
    }

    fn is_null_dyn(&self) -> bool {
        self.inner.is_null()
    }

    fn name(&self) -> &'static str {
        type_name::<T>()
    }
}

/// Erased handles are candidates too, so the driver and the combinators
/// accept fold results directly. Generic over the trait object lifetime so
/// driver futures over a `ScorableRef` stay `Send`.
#[async_trait]
impl<'a, I, S> Scorable<I> for Arc<dyn DynScorable<I, S> + 'a>
where
    I: Send + Sync + 'static,
    S: Send + 'static,
{
    type Score = S;
    type State = BoxedState;

    async fn prepare(&self, item: &I, cancel: &CancelSignal) -> Result<BoxedState, ScorableError> {
        self.prepare_dyn(item, cancel).await
    }

    fn has_score(&self, item: &I, state: &BoxedState) -> Result<bool, ScorableError> {
        self.has_score_dyn(item, state)
    }

    fn get_score(&self, item: &I, state: &BoxedState) -> Result<S, ScorableError> {
        self.get_score_dyn(item, state)
    }

    async fn commit(
        &self,
        item: &I,
        state: &BoxedState,
        cancel: &CancelSignal,
    ) -> Result<(), ScorableError> {
        self.commit_dyn(item, state, cancel).await
    }

    async fn release(
        &self,
        item: &I,
        state: BoxedState,
        cancel: &CancelSignal,
    ) -> Result<(), ScorableError> {
        self.release_dyn(item, state, cancel).await
    }

    fn is_null(&self) -> bool {
        self.is_null_dyn()
    }
}
