//! Test doubles shared by the module tests.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::domain::{CancelSignal, CancelSource, ScorableError};
use crate::scorable::{Erased, Scorable, ScorableRef};

/// Ordered record of every phase call, shared by all candidates of one test.
#[derive(Debug, Clone, Default)]
pub(crate) struct EventLog(Arc<Mutex<Vec<String>>>);

impl EventLog {
    fn push(&self, event: String) {
        self.0.lock().unwrap().push(event);
    }

    pub(crate) fn events(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }

    pub(crate) fn count(&self, event: &str) -> usize {
        self.0.lock().unwrap().iter().filter(|e| *e == event).count()
    }

    pub(crate) fn contains(&self, event: &str) -> bool {
        self.count(event) > 0
    }
}

pub(crate) fn event_log() -> EventLog {
    EventLog::default()
}

/// The phase a candidate fails in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Phase {
    Prepare,
    HasScore,
    GetScore,
    Commit,
    Release,
}

/// Candidate with a fixed score (or none) that logs `<phase>:<name>`.
pub(crate) struct Recorder {
    name: &'static str,
    score: Option<f64>,
    fails: Vec<Phase>,
    panics: Vec<Phase>,
    cancels: Option<Arc<CancelSource>>,
    log: EventLog,
}

pub(crate) struct RecorderState {
    name: &'static str,
}

impl Recorder {
    pub(crate) fn scoring(name: &'static str, score: f64, log: &EventLog) -> Self {
        Self {
            name,
            score: Some(score),
            fails: Vec::new(),
            panics: Vec::new(),
            cancels: None,
            log: log.clone(),
        }
    }

    pub(crate) fn silent(name: &'static str, log: &EventLog) -> Self {
        Self {
            name,
            score: None,
            fails: Vec::new(),
            panics: Vec::new(),
            cancels: None,
            log: log.clone(),
        }
    }

    pub(crate) fn failing(mut self, phase: Phase) -> Self {
        self.fails.push(phase);
        self
    }

    pub(crate) fn panicking_on(mut self, phase: Phase) -> Self {
        self.panics.push(phase);
        self
    }

    /// Raise `source` from inside `prepare`.
    pub(crate) fn cancelling(mut self, source: &Arc<CancelSource>) -> Self {
        self.cancels = Some(Arc::clone(source));
        self
    }

    pub(crate) fn erase(self) -> ScorableRef<String, f64> {
        Arc::new(Erased::new(self))
    }

    fn record(&self, phase: Phase, event: &str) -> Result<(), ScorableError> {
        self.log.push(format!("{event}:{}", self.name));
        if self.fails.contains(&phase) {
            return Err(ScorableError::candidate(format!("{event} failed for {}", self.name)));
        }
        Ok(())
    }
}

#[async_trait]
impl<I: Send + Sync + 'static> Scorable<I> for Recorder {
    type Score = f64;
    type State = RecorderState;

    async fn prepare(&self, _item: &I, _cancel: &CancelSignal) -> Result<RecorderState, ScorableError> {
        self.record(Phase::Prepare, "prepare")?;
        if self.panics.contains(&Phase::Prepare) {
            panic!("prepare panicked for {}", self.name);
        }
        if let Some(source) = &self.cancels {
            source.cancel();
        }
        Ok(RecorderState { name: self.name })
    }

    fn has_score(&self, _item: &I, _state: &RecorderState) -> Result<bool, ScorableError> {
        self.record(Phase::HasScore, "has_score")?;
        Ok(self.score.is_some())
    }

    fn get_score(&self, _item: &I, _state: &RecorderState) -> Result<f64, ScorableError> {
        self.record(Phase::GetScore, "get_score")?;
        self.score.ok_or(ScorableError::NoScore)
    }

    async fn commit(
        &self,
        _item: &I,
        state: &RecorderState,
        _cancel: &CancelSignal,
    ) -> Result<(), ScorableError> {
        assert_eq!(state.name, self.name);
        self.record(Phase::Commit, "commit")?;
        if self.panics.contains(&Phase::Commit) {
            panic!("commit panicked for {}", self.name);
        }
        Ok(())
    }

    async fn release(
        &self,
        _item: &I,
        state: RecorderState,
        cancel: &CancelSignal,
    ) -> Result<(), ScorableError> {
        assert_eq!(state.name, self.name);
        let event = if cancel.is_cancelled() { "release_cancelled" } else { "release" };
        self.record(Phase::Release, event)
    }
}
