//! Combinators: filter, score-map and item-map, built on the delegating and
//! aggregating bases.

pub mod aggregating;
pub mod delegating;
pub mod select_item;
pub mod select_score;
pub mod where_score;

pub use self::aggregating::{Aggregating, Project, Token};
pub use self::delegating::{Delegating, Interpret};
pub use self::select_item::{ItemProjection, SelectItem};
pub use self::select_score::{ScoreMap, SelectScore};
pub use self::where_score::{ScoreFilter, WhereScore};

use std::sync::Arc;

use crate::scorable::{Erased, Scorable, ScorableRef};

/// Fluent composition over any `Scorable`.
///
/// ```ignore
/// let greeting = keyword("hello")
///     .where_score(|_, score| *score > 0.5)
///     .select_score(|_, score| score * 10.0)
///     .select_item(|message: &Message| message.text.to_lowercase())
///     .erase();
/// ```
pub trait ScorableExt<Item>: Scorable<Item> + Sized {
    /// Only score when `predicate(item, &score)` holds.
    fn where_score<F>(self, predicate: F) -> WhereScore<Self, F>
    where
        F: Fn(&Item, &Self::Score) -> bool + Send + Sync,
    {
        Delegating::new(self, ScoreFilter::new(predicate))
    }

    /// Map the score with `map(item, score)`.
    fn select_score<S, F>(self, map: F) -> SelectScore<Self, F, S>
    where
        F: Fn(&Item, Self::Score) -> S + Send + Sync,
        S: Send + 'static,
    {
        Delegating::new(self, ScoreMap::new(map))
    }

    /// Evaluate `project(outer)` instead of the outer item.
    fn select_item<Outer, F>(self, project: F) -> SelectItem<Self, F, Item>
    where
        F: Fn(&Outer) -> Item + Send + Sync,
    {
        Aggregating::new(ItemProjection::new(self, project))
    }

    /// Type-erase into a shared handle, ready for `fold`.
    fn erase(self) -> ScorableRef<Item, Self::Score>
    where
        Self: 'static,
        Item: Send + Sync + 'static,
    {
        Arc::new(Erased::new(self))
    }
}

impl<Item, T: Scorable<Item>> ScorableExt<Item> for T {}
