//! Keyword rules loaded from a JSON file.
//!
//! ```json
//! {
//!   "policy": { "kind": "bounded", "minimum": 0.0, "maximum": 10.0 },
//!   "rules": [
//!     { "name": "greeting", "keywords": ["hello", "hi"], "score": 3.0 },
//!     { "name": "farewell", "keywords": ["bye"], "score": 5.0, "min_score": 4.0 }
//!   ]
//! }
//! ```

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use scorable_core::domain::{CancelSignal, ScorableError};
use scorable_core::scorable::Scorable;

#[derive(Debug, Deserialize)]
pub struct RulesFile {
    #[serde(default)]
    pub policy: scorable_core::SelectionPolicy,
    pub rules: Vec<RuleSpec>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RuleSpec {
    pub name: String,
    pub keywords: Vec<String>,
    /// Score per matched keyword.
    pub score: f64,
    /// Drop matches scoring below this.
    #[serde(default)]
    pub min_score: Option<f64>,
}

/// Scores an item by how many of its keywords it contains.
#[derive(Debug)]
pub struct KeywordRule {
    name: String,
    keywords: Vec<String>,
    score: f64,
}

impl KeywordRule {
    pub fn new(spec: &RuleSpec) -> Self {
        Self {
            name: spec.name.clone(),
            keywords: spec.keywords.iter().map(|k| k.to_lowercase()).collect(),
            score: spec.score,
        }
    }
}

#[async_trait]
impl Scorable<String> for KeywordRule {
    type Score = f64;
    /// Score, when at least one keyword matched.
    type State = Option<f64>;

    async fn prepare(&self, item: &String, cancel: &CancelSignal) -> Result<Option<f64>, ScorableError> {
        cancel.check()?;
        let matched = self
            .keywords
            .iter()
            .filter(|keyword| item.contains(keyword.as_str()))
            .count();
        if matched == 0 {
            return Ok(None);
        }
        Ok(Some(self.score * matched as f64))
    }

    fn has_score(&self, _item: &String, state: &Option<f64>) -> Result<bool, ScorableError> {
        Ok(state.is_some())
    }

    fn get_score(&self, _item: &String, state: &Option<f64>) -> Result<f64, ScorableError> {
        state.ok_or(ScorableError::NoScore)
    }

    async fn commit(
        &self,
        item: &String,
        state: &Option<f64>,
        _cancel: &CancelSignal,
    ) -> Result<(), ScorableError> {
        let score = state.ok_or(ScorableError::NoScore)?;
        println!("{item:?} -> {} ({score})", self.name);
        Ok(())
    }

    async fn release(
        &self,
        item: &String,
        state: Option<f64>,
        _cancel: &CancelSignal,
    ) -> Result<(), ScorableError> {
        debug!(rule = %self.name, item = %item, matched = state.is_some(), "rule released");
        Ok(())
    }
}
