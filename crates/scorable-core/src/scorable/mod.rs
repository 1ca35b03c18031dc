//! Scorable - 候補（candidate）の四段階プロトコル
//!
//! # 二層構造
//! - **表層（Typed）**: `Scorable<Item>` - `State` / `Score` を associated type で持つ
//! - **内部（Dyn）**: `DynScorable<Item, Score>` - object-safe、state は `BoxedState`
//!
//! Candidate lists (fold inputs) are `Vec<ScorableRef<Item, Score>>`, so
//! candidates with different state types can be mixed.

pub mod erased;
pub mod null;

pub use self::erased::{BoxedState, DynScorable, Erased, ScorableRef};
pub use self::null::{NullScorable, null};

use async_trait::async_trait;

use crate::domain::{CancelSignal, ScorableError};

/// A candidate that can evaluate an item and optionally win it.
///
/// Lifecycle for one item: `prepare` → (`has_score` → `get_score` → `commit`
/// on the winner only) → `release`. Every state returned by `prepare` is
/// handed back to `release` exactly once; `release` consumes it.
///
/// The candidate itself holds no per-evaluation data. Everything an evaluation
/// needs lives in `State`, which is never shared between evaluations.
///
/// # 使用例
/// ```ignore
/// struct Keyword(&'static str);
///
/// #[async_trait]
/// impl Scorable<String> for Keyword {
///     type Score = f64;
///     type State = bool;
///
///     async fn prepare(&self, item: &String, _: &CancelSignal) -> Result<bool, ScorableError> {
///         Ok(item.contains(self.0))
///     }
///     fn has_score(&self, _: &String, matched: &bool) -> Result<bool, ScorableError> {
///         Ok(*matched)
///     }
///     fn get_score(&self, _: &String, _: &bool) -> Result<f64, ScorableError> {
///         Ok(1.0)
///     }
///     async fn commit(&self, item: &String, _: &bool, _: &CancelSignal) -> Result<(), ScorableError> {
///         println!("matched {item}");
///         Ok(())
///     }
///     async fn release(&self, _: &String, _: bool, _: &CancelSignal) -> Result<(), ScorableError> {
///         Ok(())
///     }
/// }
/// ```
#[async_trait]
pub trait Scorable<Item>: Send + Sync {
    type Score: Send + 'static;
    type State: Send + Sync + 'static;

    /// Allocate per-item state. May suspend. On failure nothing is owed to
    /// `release`.
    async fn prepare(&self, item: &Item, cancel: &CancelSignal)
    -> Result<Self::State, ScorableError>;

    fn has_score(&self, item: &Item, state: &Self::State) -> Result<bool, ScorableError>;

    /// Only valid when `has_score` is true. A pure projection of `state`.
    fn get_score(&self, item: &Item, state: &Self::State) -> Result<Self::Score, ScorableError>;

    /// Side effect of winning. Runs at most once per state.
    async fn commit(
        &self,
        item: &Item,
        state: &Self::State,
        cancel: &CancelSignal,
    ) -> Result<(), ScorableError>;

    /// Cleanup. Runs exactly once per prepared state, also after failures and
    /// when `cancel` is already raised.
    async fn release(
        &self,
        item: &Item,
        state: Self::State,
        cancel: &CancelSignal,
    ) -> Result<(), ScorableError>;

    /// True only for candidates that can never score. Lets `fold` drop them
    /// at composition time.
    fn is_null(&self) -> bool {
        false
    }
}
