//! `select_item`: evaluate a projection of the outer item.

use std::marker::PhantomData;
use std::sync::Arc;

use super::aggregating::{Aggregating, Project};
use crate::domain::ScorableError;
use crate::scorable::Scorable;

/// Projection onto a single inner candidate with a pure item mapping.
pub struct ItemProjection<T, F, I> {
    scorable: Arc<T>,
    project: F,
    _marker: PhantomData<fn() -> I>,
}

impl<T, F, I> ItemProjection<T, F, I> {
    pub fn new(scorable: T, project: F) -> Self {
        Self {
            scorable: Arc::new(scorable),
            project,
            _marker: PhantomData,
        }
    }
}

impl<O, T, F, I> Project<O> for ItemProjection<T, F, I>
where
    I: Send + Sync + 'static,
    T: Scorable<I> + 'static,
    F: Fn(&O) -> I + Send + Sync,
{
    type Item = I;
    type Inner = T;
    type Score = T::Score;

    fn project(&self, item: &O) -> Result<(I, Arc<T>), ScorableError> {
        Ok(((self.project)(item), Arc::clone(&self.scorable)))
    }

    fn convert(&self, _item: &O, score: T::Score) -> Result<T::Score, ScorableError> {
        Ok(score)
    }

    fn is_null(&self) -> bool {
        self.scorable.is_null()
    }
}

pub type SelectItem<T, F, I> = Aggregating<ItemProjection<T, F, I>>;
