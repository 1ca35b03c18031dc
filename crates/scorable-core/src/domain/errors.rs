//! Errors - 評価プロトコルのエラー型
//!
//! "no score" is not an error: a candidate that does not match simply answers
//! `has_score == false`. Everything here propagates to the caller of the
//! driver or fold, after every prepared state has been released.

use std::fmt::Debug;

use thiserror::Error;

use super::traits::Traits;

/// Boxed domain error raised by a concrete candidate.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Debug, Error)]
pub enum ScorableError {
    /// A bounded fold observed a score outside its declared traits.
    #[error("score {score} is outside of traits [{minimum}, {maximum}]")]
    OutOfRange {
        score: String,
        minimum: String,
        maximum: String,
    },

    #[error("invalid traits: minimum {minimum} is greater than maximum {maximum}")]
    InvalidTraits { minimum: String, maximum: String },

    #[error("evaluation cancelled")]
    Cancelled,

    /// `get_score` or `commit` was requested on a state that has no score.
    #[error("no candidate produced a score")]
    NoScore,

    /// An erased state was handed back to a candidate that did not produce it.
    #[error("state type mismatch: expected {expected}")]
    StateMismatch { expected: &'static str },

    #[error("candidate failed: {0}")]
    Candidate(#[source] BoxError),

    #[error("{0}")]
    Other(String),
}

impl ScorableError {
    /// Wrap a domain-specific failure of a candidate.
    pub fn candidate<E: Into<BoxError>>(err: E) -> Self {
        Self::Candidate(err.into())
    }

    pub fn out_of_range<S: Debug>(score: &S, traits: &Traits<S>) -> Self {
        Self::OutOfRange {
            score: format!("{score:?}"),
            minimum: format!("{:?}", traits.minimum),
            maximum: format!("{:?}", traits.maximum),
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_of_range_renders_score_and_bounds() {
        let err = ScorableError::out_of_range(&1.5, &Traits::new(0.0, 1.0));
        assert_eq!(err.to_string(), "score 1.5 is outside of traits [0.0, 1.0]");
    }

    #[test]
    fn candidate_error_keeps_source() {
        let err = ScorableError::candidate("lookup timed out");
        assert!(matches!(err, ScorableError::Candidate(_)));
        assert_eq!(err.to_string(), "candidate failed: lookup timed out");
        assert!(std::error::Error::source(&err).is_some());
    }
}
