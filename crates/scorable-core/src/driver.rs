//! Driver: runs the four-phase protocol once against one item.

use std::panic::{AssertUnwindSafe, resume_unwind};

use futures::FutureExt;
use tracing::{Instrument, debug, info_span, warn};

use crate::domain::{CancelSignal, EvaluationId, ScorableError};
use crate::scorable::Scorable;

/// Evaluate `scorable` against `item`; commit it if it scores.
///
/// Returns whether `commit` ran. Once `prepare` succeeds, `release` runs on
/// every exit path: no score, a failing `has_score`/`get_score`/`commit`, or
/// a panic in any of them (resumed after release). A scoring or commit error
/// takes precedence over a release error; the release error is logged.
pub async fn try_evaluate<I, T>(
    scorable: &T,
    item: &I,
    cancel: &CancelSignal,
) -> Result<bool, ScorableError>
where
    I: Send + Sync + 'static,
    T: Scorable<I> + ?Sized,
{
    let evaluation_id = EvaluationId::generate();
    let span = info_span!("scorable.evaluate", %evaluation_id);
    evaluate(scorable, item, cancel).instrument(span).await
}

/// Run the driver once per item, in order. Stops at the first error and
/// returns the number of items that were committed.
pub async fn try_evaluate_all<'a, I, T>(
    scorable: &T,
    items: impl IntoIterator<Item = &'a I>,
    cancel: &CancelSignal,
) -> Result<usize, ScorableError>
where
    I: Send + Sync + 'static,
    T: Scorable<I> + ?Sized,
{
    let mut committed = 0;
    for item in items {
        if try_evaluate(scorable, item, cancel).await? {
            committed += 1;
        }
    }
    Ok(committed)
}

async fn evaluate<I, T>(scorable: &T, item: &I, cancel: &CancelSignal) -> Result<bool, ScorableError>
where
    I: Send + Sync + 'static,
    T: Scorable<I> + ?Sized,
{
    let state = scorable.prepare(item, cancel).await?;

    let outcome = AssertUnwindSafe(score_and_commit(scorable, item, &state, cancel))
        .catch_unwind()
        .await;

    let released = scorable.release(item, state, cancel).await;

    match outcome {
        Err(panic) => {
            if let Err(err) = released {
                warn!(error = %err, "release failed while unwinding");
            }
            resume_unwind(panic)
        }
        Ok(Err(err)) => {
            if let Err(release_err) = released {
                warn!(error = %release_err, "release failed after evaluation error");
            }
            Err(err)
        }
        Ok(Ok(committed)) => {
            released?;
            debug!(committed, "evaluation finished");
            Ok(committed)
        }
    }
}

async fn score_and_commit<I, T>(
    scorable: &T,
    item: &I,
    state: &T::State,
    cancel: &CancelSignal,
) -> Result<bool, ScorableError>
where
    I: Send + Sync + 'static,
    T: Scorable<I> + ?Sized,
{
    if !scorable.has_score(item, state)? {
        return Ok(false);
    }
    // Score is read for the contract only; the winner was already decided.
    let _score = scorable.get_score(item, state)?;
    scorable.commit(item, state, cancel).await?;
    Ok(true)
}
