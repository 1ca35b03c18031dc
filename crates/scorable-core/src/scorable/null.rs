//! NullScorable - never scores.

use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;

use super::{Erased, Scorable, ScorableRef};
use crate::domain::{CancelSignal, ScorableError};

/// The no-op candidate: `has_score` is always false, every other phase is a
/// no-op. `fold` collapses empty and all-null candidate lists into this.
pub struct NullScorable<S> {
    _marker: PhantomData<fn() -> S>,
}

impl<S> NullScorable<S> {
    pub fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<S> Default for NullScorable<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> fmt::Debug for NullScorable<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("NullScorable")
    }
}

#[async_trait]
impl<I, S> Scorable<I> for NullScorable<S>
where
    I: Send + Sync + 'static,
    S: Send + 'static,
{
    type Score = S;
    type State = ();

    async fn prepare(&self, _item: &I, _cancel: &CancelSignal) -> Result<(), ScorableError> {
        Ok(())
    }

    fn has_score(&self, _item: &I, _state: &()) -> Result<bool, ScorableError> {
        Ok(false)
    }

    fn get_score(&self, _item: &I, _state: &()) -> Result<S, ScorableError> {
        Err(ScorableError::NoScore)
    }

    async fn commit(&self, _item: &I, _state: &(), _cancel: &CancelSignal) -> Result<(), ScorableError> {
        Err(ScorableError::NoScore)
    }

    async fn release(&self, _item: &I, _state: (), _cancel: &CancelSignal) -> Result<(), ScorableError> {
        Ok(())
    }

    fn is_null(&self) -> bool {
        true
    }
}

/// Erased null candidate.
pub fn null<I, S>() -> ScorableRef<I, S>
where
    I: Send + Sync + 'static,
    S: Send + 'static,
{
    Arc::new(Erased::new(NullScorable::<S>::new()))
}
