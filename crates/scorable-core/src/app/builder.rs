//! SelectorBuilder - 候補の登録と Selector の構築
//!
//! # Fail-fast 設計
//! - register() で候補名の重複を拒否
//! - expect_candidates() で期待される候補名を登録
//! - build() 時に「期待集合 ⊆ 登録済み集合」と policy の妥当性をチェック

use tracing::info;

use super::policy::SelectionPolicy;
use crate::combinators::ScorableExt;
use crate::domain::{CancelSignal, ScorableError};
use crate::driver::try_evaluate;
use crate::scorable::{Scorable, ScorableRef};

/// Builds a `Selector` from named candidates and a policy.
///
/// # 使用例
/// ```ignore
/// let selector = SelectorBuilder::new()
///     .register("greeting", greeting)?
///     .register("farewell", farewell)?
///     .policy(SelectionPolicy::Normalized)
///     .expect_candidates(&["greeting", "farewell"])
///     .build()?;
///
/// let handled = selector.evaluate(&message, &cancel).await?;
/// ```
pub struct SelectorBuilder<Item> {
    entries: Vec<(String, ScorableRef<Item, f64>)>,
    policy: SelectionPolicy,
    expected: Option<Vec<String>>,
}

#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("Candidate '{0}' is already registered")]
    DuplicateCandidate(String),

    #[error("Missing candidates: {0:?}. These candidates were expected but not registered.")]
    MissingCandidates(Vec<String>),

    #[error("Invalid selection policy: {0}")]
    Policy(#[source] ScorableError),
}

impl<Item> SelectorBuilder<Item>
where
    Item: Send + Sync + 'static,
{
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            policy: SelectionPolicy::default(),
            expected: None,
        }
    }

    /// Register a candidate under a unique name. Registration order is the
    /// fold order.
    pub fn register<T>(self, name: &str, scorable: T) -> Result<Self, BuildError>
    where
        T: Scorable<Item, Score = f64> + 'static,
    {
        self.register_ref(name, scorable.erase())
    }

    pub fn register_ref(
        mut self,
        name: &str,
        scorable: ScorableRef<Item, f64>,
    ) -> Result<Self, BuildError> {
        if self.entries.iter().any(|(existing, _)| existing == name) {
            return Err(BuildError::DuplicateCandidate(name.to_string()));
        }
        self.entries.push((name.to_string(), scorable));
        Ok(self)
    }

    pub fn policy(mut self, policy: SelectionPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn expect_candidates(mut self, names: &[&str]) -> Self {
        self.expected = Some(names.iter().map(|name| name.to_string()).collect());
        self
    }

    pub fn build(self) -> Result<Selector<Item>, BuildError> {
        let names: Vec<String> = self.entries.iter().map(|(name, _)| name.clone()).collect();
        if let Some(expected) = &self.expected {
            let missing: Vec<String> = expected
                .iter()
                .filter(|name| !names.contains(name))
                .cloned()
                .collect();
            if !missing.is_empty() {
                return Err(BuildError::MissingCandidates(missing));
            }
        }

        let scorables = self.entries.into_iter().map(|(_, scorable)| scorable).collect();
        let scorable = self
            .policy
            .compose(scorables)
            .map_err(BuildError::Policy)?;
        info!(candidates = names.len(), policy = ?self.policy, "selector built");

        Ok(Selector {
            names,
            policy: self.policy,
            scorable,
        })
    }
}

impl<Item> Default for SelectorBuilder<Item>
where
    Item: Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

/// Named candidates folded under a policy, ready to evaluate items.
pub struct Selector<Item> {
    names: Vec<String>,
    policy: SelectionPolicy,
    scorable: ScorableRef<Item, f64>,
}

impl<Item> Selector<Item>
where
    Item: Send + Sync + 'static,
{
    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn policy(&self) -> SelectionPolicy {
        self.policy
    }

    /// The folded candidate, for further composition.
    pub fn scorable(&self) -> &ScorableRef<Item, f64> {
        &self.scorable
    }

    /// Run the driver once for `item`. Returns whether a candidate committed.
    pub async fn evaluate(&self, item: &Item, cancel: &CancelSignal) -> Result<bool, ScorableError> {
        try_evaluate(&self.scorable, item, cancel).await
    }
}
