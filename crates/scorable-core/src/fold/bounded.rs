//! Bounded fold: scores must stay inside declared traits, and reaching the
//! maximum ends the scan.
//!
//! When several candidates could reach `maximum`, the first one to do so
//! wins, matching the tie-break of the plain fold.

use std::cmp::Ordering;
use std::fmt::Debug;
use std::sync::Arc;

use tracing::warn;

use crate::domain::{Comparator, NormalizedTraits, ScorableError, Traits, total_order_f64};
use crate::scorable::{BoxedState, DynScorable, Erased, ScorableRef, null};

use super::{Fold, OnFold};

pub struct WithinTraits<S> {
    traits: Traits<S>,
    comparator: Comparator<S>,
}

impl<S> WithinTraits<S> {
    pub fn new(traits: Traits<S>, comparator: Comparator<S>) -> Self {
        Self { traits, comparator }
    }

    pub fn traits(&self) -> &Traits<S> {
        &self.traits
    }
}

impl<I, S> OnFold<I, S> for WithinTraits<S>
where
    S: Debug + Send + Sync,
{
    fn on_fold(
        &self,
        scorable: &dyn DynScorable<I, S>,
        _item: &I,
        _state: &BoxedState,
        score: &S,
    ) -> Result<bool, ScorableError> {
        if !self.traits.contains(score, &self.comparator) {
            warn!(candidate = scorable.name(), ?score, traits = ?self.traits, "score out of range");
            return Err(ScorableError::out_of_range(score, &self.traits));
        }
        Ok((self.comparator)(score, &self.traits.maximum) != Ordering::Equal)
    }
}

/// Fold that validates every observed score against `traits`.
///
/// Empty and all-null inputs collapse to the null candidate. A single
/// candidate is still wrapped, so its score is validated too.
pub fn bounded_fold<I, S>(
    scorables: impl IntoIterator<Item = ScorableRef<I, S>>,
    traits: Traits<S>,
    comparator: Comparator<S>,
) -> Result<ScorableRef<I, S>, ScorableError>
where
    I: Send + Sync + 'static,
    S: Debug + Send + Sync + 'static,
{
    traits.validate(&comparator)?;
    Ok(build(scorables.into_iter().collect(), traits, comparator))
}

/// Bounded fold over probability-like scores in `[0.0, 1.0]`.
pub fn normalized_fold<I>(scorables: impl IntoIterator<Item = ScorableRef<I, f64>>) -> ScorableRef<I, f64>
where
    I: Send + Sync + 'static,
{
    build(
        scorables.into_iter().collect(),
        NormalizedTraits::traits(),
        total_order_f64(),
    )
}

fn build<I, S>(
    scorables: Vec<ScorableRef<I, S>>,
    traits: Traits<S>,
    comparator: Comparator<S>,
) -> ScorableRef<I, S>
where
    I: Send + Sync + 'static,
    S: Debug + Send + Sync + 'static,
{
    if scorables.iter().all(|scorable| scorable.is_null_dyn()) {
        return null();
    }
    let hook = WithinTraits::new(traits, Arc::clone(&comparator));
    Arc::new(Erased::new(Fold::new(scorables, comparator, hook)))
}
