//! SelectionPolicy - 設定から選ぶ勝者選択ルール

use serde::{Deserialize, Serialize};

use crate::domain::{ScorableError, Traits, total_order_f64};
use crate::fold::{bounded_fold, first, fold, normalized_fold};
use crate::scorable::ScorableRef;

/// How a `Selector` folds its candidates. Scores are `f64`, compared with
/// the IEEE total order.
///
/// Serialized with a `kind` tag:
/// ```json
/// { "kind": "bounded", "minimum": 0.0, "maximum": 10.0 }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SelectionPolicy {
    /// Highest score wins; ties go to the earliest candidate.
    #[default]
    Best,

    /// First candidate with any score wins.
    First,

    /// Highest score wins; scores outside the bounds are an error and a
    /// score equal to `maximum` ends the scan.
    Bounded { minimum: f64, maximum: f64 },

    /// `Bounded` over `[0.0, 1.0]`.
    Normalized,
}

impl SelectionPolicy {
    pub fn compose<I>(
        &self,
        scorables: Vec<ScorableRef<I, f64>>,
    ) -> Result<ScorableRef<I, f64>, ScorableError>
    where
        I: Send + Sync + 'static,
    {
        let folded = match *self {
            Self::Best => fold(scorables, total_order_f64()),
            Self::First => first(scorables),
            Self::Bounded { minimum, maximum } => {
                bounded_fold(scorables, Traits::new(minimum, maximum), total_order_f64())?
            }
            Self::Normalized => normalized_fold(scorables),
        };
        Ok(folded)
    }
}
