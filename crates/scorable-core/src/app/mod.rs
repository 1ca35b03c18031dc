//! App - 設定と構築
//!
//! - **SelectionPolicy**: 勝者選択ルール（serde で設定ファイルから読む）
//! - **SelectorBuilder**: 名前付き候補の登録と起動時検証
//! - **Selector**: fold 済みの候補で item を評価する

pub mod builder;
pub mod policy;

pub use self::builder::{BuildError, Selector, SelectorBuilder};
pub use self::policy::SelectionPolicy;
