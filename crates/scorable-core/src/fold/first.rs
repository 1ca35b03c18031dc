//! `first`: the first candidate with any score wins.

use crate::domain::{ScorableError, natural_order};
use crate::scorable::{BoxedState, DynScorable, ScorableRef};

use super::{OnFold, fold_with};

/// Stops the walk at the first score, whatever its value.
#[derive(Debug, Clone, Copy, Default)]
pub struct StopAtFirst;

impl<I, S> OnFold<I, S> for StopAtFirst {
    fn on_fold(
        &self,
        _scorable: &dyn DynScorable<I, S>,
        _item: &I,
        _state: &BoxedState,
        _score: &S,
    ) -> Result<bool, ScorableError> {
        Ok(false)
    }
}

/// "First to score wins". Every candidate is still prepared and released;
/// scores after the winner are never read.
pub fn first<I, S>(scorables: impl IntoIterator<Item = ScorableRef<I, S>>) -> ScorableRef<I, S>
where
    I: Send + Sync + 'static,
    S: PartialOrd + Send + 'static,
{
    fold_with(scorables, natural_order(), StopAtFirst)
}
