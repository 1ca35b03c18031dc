//! scorable-cli
//!
//! Reads keyword rules and routes each item to the best-scoring rule.
//!
//! ```text
//! scorable-cli <rules.json> <item>...
//! ```

mod rules;
mod telemetry;

use std::sync::Arc;

use anyhow::{Context, bail};
use tracing::{info, warn};

use scorable_core::combinators::ScorableExt;
use scorable_core::domain::CancelSource;
use scorable_core::scorable::ScorableRef;
use scorable_core::{Selector, SelectorBuilder};

use crate::rules::{KeywordRule, RuleSpec, RulesFile};

fn usage() -> &'static str {
    "usage: scorable-cli <rules.json> <item>..."
}

fn candidate(spec: &RuleSpec) -> ScorableRef<String, f64> {
    let rule = KeywordRule::new(spec);
    match spec.min_score {
        Some(min_score) => rule
            .where_score(move |_: &String, score: &f64| *score >= min_score)
            .select_item(|item: &String| item.to_lowercase())
            .erase(),
        None => rule
            .select_item(|item: &String| item.to_lowercase())
            .erase(),
    }
}

fn load(path: &str) -> anyhow::Result<Selector<String>> {
    let raw = std::fs::read_to_string(path).with_context(|| format!("reading {path}"))?;
    let file: RulesFile = serde_json::from_str(&raw).with_context(|| format!("parsing {path}"))?;
    selector(&file)
}

fn selector(file: &RulesFile) -> anyhow::Result<Selector<String>> {
    let mut builder = SelectorBuilder::new().policy(file.policy);
    for spec in &file.rules {
        builder = builder.register_ref(&spec.name, candidate(spec))?;
    }
    Ok(builder.build()?)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    telemetry::init_telemetry("info");

    let mut args = std::env::args().skip(1);
    let Some(path) = args.next() else {
        bail!(usage());
    };
    let items: Vec<String> = args.collect();
    if items.is_empty() {
        bail!(usage());
    }

    let selector = load(&path)?;
    info!(rules = ?selector.names(), policy = ?selector.policy(), "rules loaded");

    let source = Arc::new(CancelSource::new());
    let cancel = source.signal();
    {
        let source = Arc::clone(&source);
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("interrupted, cancelling");
                source.cancel();
            }
        });
    }

    let mut matched = 0;
    for item in &items {
        if selector.evaluate(item, &cancel).await? {
            matched += 1;
        } else {
            println!("{item:?} -> (no match)");
        }
    }
    info!(items = items.len(), matched, "done");
    Ok(())
}
