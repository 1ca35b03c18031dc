//! Aggregating base: the outer item is projected to an inner item, and the
//! inner candidate evaluates that instead.
//!
//! The outer state is a `Token` carrying everything the later phases need,
//! so `has_score`/`get_score`/`commit`/`release` work off the token alone.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::{CancelSignal, ScorableError};
use crate::scorable::Scorable;

/// Chooses the inner candidate and inner item for an outer item, and maps the
/// inner score back to the outer score type.
pub trait Project<Outer>: Send + Sync {
    type Item: Send + Sync + 'static;
    type Inner: Scorable<Self::Item> + 'static;
    type Score: Send + 'static;

    fn project(&self, item: &Outer) -> Result<(Self::Item, Arc<Self::Inner>), ScorableError>;

    fn convert(
        &self,
        item: &Outer,
        score: <Self::Inner as Scorable<Self::Item>>::Score,
    ) -> Result<Self::Score, ScorableError>;

    fn is_null(&self) -> bool {
        false
    }
}

/// State of an aggregating candidate: projected item, inner candidate, and
/// the inner candidate's own state.
pub struct Token<Item, Inner: Scorable<Item>> {
    pub item: Item,
    pub scorable: Arc<Inner>,
    pub state: Inner::State,
}

pub struct Aggregating<P> {
    projection: P,
}

impl<P> Aggregating<P> {
    pub fn new(projection: P) -> Self {
        Self { projection }
    }

    pub fn projection(&self) -> &P {
        &self.projection
    }
}

#[async_trait]
impl<O, P> Scorable<O> for Aggregating<P>
where
    O: Send + Sync + 'static,
    P: Project<O>,
{
    type Score = P::Score;
    type State = Token<P::Item, P::Inner>;

    async fn prepare(&self, item: &O, cancel: &CancelSignal) -> Result<Self::State, ScorableError> {
        let (inner_item, scorable) = self.projection.project(item)?;
        let state = scorable.prepare(&inner_item, cancel).await?;
        Ok(Token {
            item: inner_item,
            scorable,
            state,
        })
    }

    fn has_score(&self, _item: &O, token: &Self::State) -> Result<bool, ScorableError> {
        token.scorable.has_score(&token.item, &token.state)
    }

    fn get_score(&self, item: &O, token: &Self::State) -> Result<P::Score, ScorableError> {
        let score = token.scorable.get_score(&token.item, &token.state)?;
        self.projection.convert(item, score)
    }

    async fn commit(
        &self,
        _item: &O,
        token: &Self::State,
        cancel: &CancelSignal,
    ) -> Result<(), ScorableError> {
        token.scorable.commit(&token.item, &token.state, cancel).await
    }

    async fn release(
        &self,
        _item: &O,
        token: Self::State,
        cancel: &CancelSignal,
    ) -> Result<(), ScorableError> {
        let Token {
            item,
            scorable,
            state,
        } = token;
        scorable.release(&item, state, cancel).await
    }

    fn is_null(&self) -> bool {
        self.projection.is_null()
    }
}
