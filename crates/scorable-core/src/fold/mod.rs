//! Fold - 複数の候補から勝者を一つ選ぶ
//!
//! `Fold::prepare` prepares every candidate in the order given. The winner is
//! found by walking the prepared pairs in the same order: a score replaces
//! the current best only when the comparator says it is strictly greater, so
//! the first candidate to reach the best score wins ties. After each score
//! the `OnFold` hook decides whether to keep scanning.
//!
//! Only the winner is committed; every prepared candidate is released.

pub mod bounded;
pub mod first;

pub use self::bounded::{WithinTraits, bounded_fold, normalized_fold};
pub use self::first::{StopAtFirst, first};

use std::cmp::Ordering;
use std::panic::{AssertUnwindSafe, resume_unwind};
use std::sync::{Arc, OnceLock};

use async_trait::async_trait;
use futures::FutureExt;
use tracing::{debug, warn};

use crate::domain::{CancelSignal, Comparator, ScorableError};
use crate::scorable::{BoxedState, DynScorable, Erased, Scorable, ScorableRef, null};

/// Early-exit policy, consulted after every score the walk encounters.
///
/// `Ok(true)` keeps scanning, `Ok(false)` stops with the best so far (this
/// score included), `Err` aborts the walk.
pub trait OnFold<Item, Score>: Send + Sync {
    fn on_fold(
        &self,
        scorable: &dyn DynScorable<Item, Score>,
        item: &Item,
        state: &BoxedState,
        score: &Score,
    ) -> Result<bool, ScorableError>;
}

/// Plain fold: scan everything, keep the global best.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScanAll;

impl<I, S> OnFold<I, S> for ScanAll {
    fn on_fold(
        &self,
        _scorable: &dyn DynScorable<I, S>,
        _item: &I,
        _state: &BoxedState,
        _score: &S,
    ) -> Result<bool, ScorableError> {
        Ok(true)
    }
}

struct Prepared<I, S> {
    scorable: ScorableRef<I, S>,
    state: BoxedState,
}

/// State of a `Fold`: one prepared pair per candidate, in input order.
pub struct FoldState<I, S> {
    prepared: Vec<Prepared<I, S>>,
    winner: OnceLock<Option<usize>>,
}

impl<I, S> FoldState<I, S> {
    pub fn len(&self) -> usize {
        self.prepared.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prepared.is_empty()
    }
}

pub struct Fold<I, S, H = ScanAll> {
    scorables: Vec<ScorableRef<I, S>>,
    comparator: Comparator<S>,
    hook: H,
}

impl<I, S, H> Fold<I, S, H>
where
    I: Send + Sync + 'static,
    S: Send + 'static,
    H: OnFold<I, S>,
{
    /// Build the fold node as-is. `fold` applies the composition-time
    /// rewrites first and should be preferred.
    pub fn new(scorables: Vec<ScorableRef<I, S>>, comparator: Comparator<S>, hook: H) -> Self {
        Self {
            scorables,
            comparator,
            hook,
        }
    }

    pub fn len(&self) -> usize {
        self.scorables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scorables.is_empty()
    }

    fn winner(&self, item: &I, state: &FoldState<I, S>) -> Result<Option<usize>, ScorableError> {
        if let Some(winner) = state.winner.get() {
            return Ok(*winner);
        }
        let winner = self.scan(item, state)?;
        let _ = state.winner.set(winner);
        Ok(winner)
    }

    fn scan(&self, item: &I, state: &FoldState<I, S>) -> Result<Option<usize>, ScorableError> {
        let mut best: Option<(usize, S)> = None;
        for (index, prepared) in state.prepared.iter().enumerate() {
            if !prepared.scorable.has_score_dyn(item, &prepared.state)? {
                continue;
            }
            let score = prepared.scorable.get_score_dyn(item, &prepared.state)?;
            let keep_scanning =
                self.hook
                    .on_fold(prepared.scorable.as_ref(), item, &prepared.state, &score)?;

            let better = match &best {
                None => true,
                Some((_, current)) => (self.comparator)(&score, current) == Ordering::Greater,
            };
            if better {
                best = Some((index, score));
            }
            if !keep_scanning {
                debug!(index, "fold stopped early");
                break;
            }
        }
        let winner = best.map(|(index, _)| index);
        debug!(?winner, candidates = state.prepared.len(), "fold scanned");
        Ok(winner)
    }
}

/// Release every pair in order. Keeps going past failures and returns the
/// first one.
async fn release_all<I, S>(
    item: &I,
    prepared: Vec<Prepared<I, S>>,
    cancel: &CancelSignal,
) -> Result<(), ScorableError>
where
    I: Send + Sync + 'static,
    S: Send + 'static,
{
    let mut first_error = None;
    for Prepared { scorable, state } in prepared {
        if let Err(err) = scorable.release_dyn(item, state, cancel).await {
            warn!(candidate = scorable.name(), error = %err, "release failed");
            first_error.get_or_insert(err);
        }
    }
    first_error.map_or(Ok(()), Err)
}

#[async_trait]
impl<I, S, H> Scorable<I> for Fold<I, S, H>
where
    I: Send + Sync + 'static,
    S: Send + 'static,
    H: OnFold<I, S> + 'static,
{
    type Score = S;
    type State = FoldState<I, S>;

    async fn prepare(&self, item: &I, cancel: &CancelSignal) -> Result<FoldState<I, S>, ScorableError> {
        let mut prepared = Vec::with_capacity(self.scorables.len());
        for scorable in &self.scorables {
            let attempt = match cancel.check() {
                Ok(()) => {
                    AssertUnwindSafe(scorable.prepare_dyn(item, cancel))
                        .catch_unwind()
                        .await
                }
                Err(cancelled) => Ok(Err(cancelled)),
            };
            match attempt {
                Ok(Ok(state)) => prepared.push(Prepared {
                    scorable: Arc::clone(scorable),
                    state,
                }),
                Ok(Err(err)) => {
                    debug!(prepared = prepared.len(), error = %err, "fold prepare aborted");
                    if let Err(release_err) = release_all(item, prepared, cancel).await {
                        warn!(error = %release_err, "release failed after aborted prepare");
                    }
                    return Err(err);
                }
                Err(panic) => {
                    if let Err(release_err) = release_all(item, prepared, cancel).await {
                        warn!(error = %release_err, "release failed while unwinding");
                    }
                    resume_unwind(panic)
                }
            }
        }
        Ok(FoldState {
            prepared,
            winner: OnceLock::new(),
        })
    }

    fn has_score(&self, item: &I, state: &FoldState<I, S>) -> Result<bool, ScorableError> {
        Ok(self.winner(item, state)?.is_some())
    }

    fn get_score(&self, item: &I, state: &FoldState<I, S>) -> Result<S, ScorableError> {
        let index = self.winner(item, state)?.ok_or(ScorableError::NoScore)?;
        let winner = &state.prepared[index];
        winner.scorable.get_score_dyn(item, &winner.state)
    }

    async fn commit(
        &self,
        item: &I,
        state: &FoldState<I, S>,
        cancel: &CancelSignal,
    ) -> Result<(), ScorableError> {
        let index = self.winner(item, state)?.ok_or(ScorableError::NoScore)?;
        let winner = &state.prepared[index];
        debug!(index, candidate = winner.scorable.name(), "committing fold winner");
        winner.scorable.commit_dyn(item, &winner.state, cancel).await
    }

    async fn release(
        &self,
        item: &I,
        state: FoldState<I, S>,
        cancel: &CancelSignal,
    ) -> Result<(), ScorableError> {
        release_all(item, state.prepared, cancel).await
    }
}

/// Fold `scorables` into one candidate that commits the best scorer under
/// `comparator`.
///
/// Composition-time rewrites: no candidates, or only null candidates, give
/// the null candidate; a single candidate is returned unchanged.
pub fn fold<I, S>(
    scorables: impl IntoIterator<Item = ScorableRef<I, S>>,
    comparator: Comparator<S>,
) -> ScorableRef<I, S>
where
    I: Send + Sync + 'static,
    S: Send + 'static,
{
    fold_with(scorables, comparator, ScanAll)
}

/// `fold` with a custom early-exit hook.
pub fn fold_with<I, S, H>(
    scorables: impl IntoIterator<Item = ScorableRef<I, S>>,
    comparator: Comparator<S>,
    hook: H,
) -> ScorableRef<I, S>
where
    I: Send + Sync + 'static,
    S: Send + 'static,
    H: OnFold<I, S> + 'static,
{
    let mut scorables: Vec<_> = scorables.into_iter().collect();
    match scorables.len() {
        0 => return null(),
        1 => return scorables.remove(0),
        _ => {}
    }
    if scorables.iter().all(|scorable| scorable.is_null_dyn()) {
        return null();
    }
    Arc::new(Erased::new(Fold::new(scorables, comparator, hook)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CancelSource, natural_order, reversed};
    use crate::driver::try_evaluate;
    use crate::testing::{Phase, Recorder, event_log};

    fn item() -> String {
        "item".to_string()
    }

    #[tokio::test]
    async fn empty_fold_never_scores() {
        let folded = fold::<String, f64>(Vec::new(), natural_order());

        assert!(folded.is_null());
        let committed = try_evaluate(&folded, &item(), &CancelSignal::never())
            .await
            .unwrap();
        assert!(!committed);
    }

    #[test]
    fn single_candidate_is_returned_unchanged() {
        let log = event_log();
        let only = Recorder::scoring("a", 1.0, &log).erase();

        let folded = fold(vec![Arc::clone(&only)], natural_order());

        assert!(Arc::ptr_eq(&folded, &only));
    }

    #[test]
    fn all_null_candidates_collapse_to_null() {
        let folded = fold(vec![null::<String, f64>(), null()], natural_order());
        assert!(folded.is_null());
        assert!(folded.name().contains("NullScorable"));
    }

    #[tokio::test]
    async fn best_score_wins_and_everyone_is_released() {
        let log = event_log();
        let folded = fold(
            vec![
                Recorder::scoring("a", 0.3, &log).erase(),
                Recorder::silent("b", &log).erase(),
                Recorder::scoring("c", 0.9, &log).erase(),
                Recorder::scoring("d", 0.5, &log).erase(),
            ],
            natural_order(),
        );

        let committed = try_evaluate(&folded, &item(), &CancelSignal::never())
            .await
            .unwrap();

        assert!(committed);
        assert!(log.contains("commit:c"));
        assert_eq!(log.count("commit:a") + log.count("commit:d"), 0);
        for name in ["a", "b", "c", "d"] {
            assert_eq!(log.count(&format!("release:{name}")), 1, "release:{name}");
        }
        let releases: Vec<_> = log
            .events()
            .into_iter()
            .filter(|event| event.starts_with("release:"))
            .collect();
        assert_eq!(releases, ["release:a", "release:b", "release:c", "release:d"]);
    }

    #[tokio::test]
    async fn first_of_equal_scores_wins() {
        let log = event_log();
        let folded = fold(
            vec![
                Recorder::scoring("a", 0.5, &log).erase(),
                Recorder::scoring("b", 0.7, &log).erase(),
                Recorder::scoring("c", 0.7, &log).erase(),
            ],
            natural_order(),
        );

        try_evaluate(&folded, &item(), &CancelSignal::never())
            .await
            .unwrap();

        assert!(log.contains("commit:b"));
        assert!(!log.contains("commit:c"));
    }

    #[tokio::test]
    async fn comparator_decides_what_better_means() {
        let log = event_log();
        let folded = fold(
            vec![
                Recorder::scoring("far", 9.0, &log).erase(),
                Recorder::scoring("near", 1.0, &log).erase(),
            ],
            reversed(natural_order()),
        );

        try_evaluate(&folded, &item(), &CancelSignal::never())
            .await
            .unwrap();

        assert!(log.contains("commit:near"));
    }

    #[tokio::test]
    async fn fold_without_scores_commits_nothing() {
        let log = event_log();
        let folded = fold(
            vec![Recorder::silent("a", &log).erase(), Recorder::silent("b", &log).erase()],
            natural_order(),
        );

        let committed = try_evaluate(&folded, &item(), &CancelSignal::never())
            .await
            .unwrap();

        assert!(!committed);
        assert_eq!(log.count("release:a") + log.count("release:b"), 2);
    }

    #[tokio::test]
    async fn failed_prepare_releases_earlier_candidates_only() {
        let log = event_log();
        let folded = fold(
            vec![
                Recorder::scoring("a", 0.1, &log).erase(),
                Recorder::scoring("b", 0.2, &log).failing(Phase::Prepare).erase(),
                Recorder::scoring("c", 0.3, &log).erase(),
            ],
            natural_order(),
        );

        let err = try_evaluate(&folded, &item(), &CancelSignal::never())
            .await
            .unwrap_err();

        assert!(matches!(err, ScorableError::Candidate(_)));
        assert_eq!(log.events(), ["prepare:a", "prepare:b", "release:a"]);
    }

    #[tokio::test]
    async fn failing_score_still_releases_every_candidate() {
        let log = event_log();
        let folded = fold(
            vec![
                Recorder::scoring("a", 0.1, &log).erase(),
                Recorder::scoring("b", 0.2, &log).failing(Phase::GetScore).erase(),
                Recorder::scoring("c", 0.3, &log).erase(),
            ],
            natural_order(),
        );

        let result = try_evaluate(&folded, &item(), &CancelSignal::never()).await;

        assert!(result.is_err());
        for name in ["a", "b", "c"] {
            assert_eq!(log.count(&format!("release:{name}")), 1);
        }
        assert!(!log.events().iter().any(|event| event.starts_with("commit:")));
    }

    #[tokio::test]
    async fn failing_release_does_not_skip_siblings() {
        let log = event_log();
        let folded = fold(
            vec![
                Recorder::scoring("a", 0.1, &log).failing(Phase::Release).erase(),
                Recorder::scoring("b", 0.2, &log).erase(),
            ],
            natural_order(),
        );

        let result = try_evaluate(&folded, &item(), &CancelSignal::never()).await;

        assert!(result.is_err());
        assert!(log.contains("commit:b"));
        assert!(log.contains("release:b"));
    }

    #[tokio::test]
    async fn cancelled_before_prepare_prepares_nothing() {
        let log = event_log();
        let folded = fold(
            vec![Recorder::scoring("a", 0.1, &log).erase(), Recorder::scoring("b", 0.2, &log).erase()],
            natural_order(),
        );
        let source = CancelSource::new();
        source.cancel();

        let err = try_evaluate(&folded, &item(), &source.signal())
            .await
            .unwrap_err();

        assert!(err.is_cancelled());
        assert!(log.events().is_empty());
    }

    #[tokio::test]
    async fn cancelled_between_prepares_releases_what_was_prepared() {
        let log = event_log();
        let source = Arc::new(CancelSource::new());
        let folded = fold(
            vec![
                Recorder::scoring("a", 0.1, &log).cancelling(&source).erase(),
                Recorder::scoring("b", 0.2, &log).erase(),
            ],
            natural_order(),
        );

        let err = try_evaluate(&folded, &item(), &source.signal())
            .await
            .unwrap_err();

        assert!(err.is_cancelled());
        assert_eq!(log.events(), ["prepare:a", "release_cancelled:a"]);
    }

    #[tokio::test]
    async fn panicking_prepare_releases_earlier_candidates() {
        let log = event_log();
        let folded = fold(
            vec![
                Recorder::scoring("a", 0.1, &log).erase(),
                Recorder::scoring("b", 0.2, &log).panicking_on(Phase::Prepare).erase(),
                Recorder::scoring("c", 0.3, &log).erase(),
            ],
            natural_order(),
        );

        let evaluation = tokio::spawn(async move {
            try_evaluate(&folded, &item(), &CancelSignal::never()).await
        });

        assert!(evaluation.await.unwrap_err().is_panic());
        assert_eq!(log.events(), ["prepare:a", "prepare:b", "release:a"]);
    }

    #[tokio::test]
    async fn fold_state_holds_one_pair_per_candidate() {
        let log = event_log();
        let node = Fold::new(
            vec![Recorder::silent("a", &log).erase(), Recorder::silent("b", &log).erase()],
            natural_order(),
            ScanAll,
        );
        assert_eq!(node.len(), 2);
        assert!(!node.is_empty());

        let cancel = CancelSignal::never();
        let state = node.prepare(&item(), &cancel).await.unwrap();
        assert_eq!(state.len(), 2);
        assert!(!state.is_empty());
        assert!(!node.has_score(&item(), &state).unwrap());

        node.release(&item(), state, &cancel).await.unwrap();
        assert_eq!(log.count("release:a") + log.count("release:b"), 2);
    }

    #[tokio::test]
    async fn scan_runs_once_per_state() {
        let log = event_log();
        let folded = fold(
            vec![Recorder::scoring("a", 0.1, &log).erase(), Recorder::scoring("b", 0.2, &log).erase()],
            natural_order(),
        );

        try_evaluate(&folded, &item(), &CancelSignal::never())
            .await
            .unwrap();

        // one scan for has_score; get_score and commit reuse it
        assert_eq!(log.count("has_score:a"), 1);
        assert_eq!(log.count("get_score:a"), 1);
        assert_eq!(log.count("get_score:b"), 2);
    }

    #[tokio::test]
    async fn nested_folds_release_all_leaves() {
        let log = event_log();
        let inner = fold(
            vec![Recorder::scoring("a", 0.4, &log).erase(), Recorder::scoring("b", 0.6, &log).erase()],
            natural_order(),
        );
        let outer = fold(
            vec![inner, Recorder::scoring("c", 0.5, &log).erase()],
            natural_order(),
        );

        try_evaluate(&outer, &item(), &CancelSignal::never())
            .await
            .unwrap();

        assert!(log.contains("commit:b"));
        for name in ["a", "b", "c"] {
            assert_eq!(log.count(&format!("release:{name}")), 1);
        }
    }
}
