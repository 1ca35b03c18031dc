//! scorable-core
//!
//! Candidates that score an item, folds that pick one winner, and a driver
//! that commits the winner and releases everyone.
//!
//! # モジュール構成
//! - **domain**: 基本型（errors, traits, order, cancel, ids）
//! - **scorable**: `Scorable` trait、型消去（`DynScorable` / `Erased`）、`NullScorable`
//! - **driver**: 四段階プロトコルを一回実行する `try_evaluate`
//! - **combinators**: `Delegating` / `Aggregating` と where_score, select_score, select_item
//! - **fold**: `fold` / `first` / `bounded_fold` / `normalized_fold`
//! - **app**: `SelectionPolicy`（設定）と `SelectorBuilder`

pub mod domain;
pub mod scorable;
pub mod driver;
pub mod combinators;
pub mod fold;
pub mod app;

#[cfg(test)]
mod testing;

pub use app::{BuildError, SelectionPolicy, Selector, SelectorBuilder};
pub use combinators::ScorableExt;
pub use domain::{CancelSignal, CancelSource, ScorableError, Traits};
pub use driver::{try_evaluate, try_evaluate_all};
pub use fold::{bounded_fold, first, fold, fold_with, normalized_fold};
pub use scorable::{DynScorable, Scorable, ScorableRef};
