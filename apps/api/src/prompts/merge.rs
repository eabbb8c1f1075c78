use std::collections::{BTreeSet, HashSet};

use serde_json::Value;
use tracing::warn;

use crate::models::prompt::{Prompt, PromptOrigin, RawPrompt};

/// Decodes and validates a batch of raw entries one at a time, dropping
/// (and logging) the malformed ones.
pub fn ingest(raw: Vec<Value>, origin: PromptOrigin) -> Vec<Prompt> {
    raw.into_iter()
        .enumerate()
        .filter_map(|(index, entry)| {
            let decoded = match serde_json::from_value::<RawPrompt>(entry) {
                Ok(decoded) => decoded,
                Err(e) => {
                    warn!("Skipping undecodable {origin:?} prompt #{index}: {e}");
                    return None;
                }
            };
            match decoded.into_prompt(origin) {
                Ok(prompt) => Some(prompt),
                Err(e) => {
                    warn!("Skipping malformed {origin:?} prompt #{index}: {e}");
                    None
                }
            }
        })
        .collect()
}

/// Merges the three sources into one catalog with unique ids.
///
/// Precedence is custom > daily > core: the first occurrence of an id in the
/// display sequence `[custom.., daily.., core..]` wins, which is the same as
/// last-write-wins over `[core, daily, custom]`. Built-ins whose id is hidden
/// are dropped; custom prompts are never hidden.
pub fn merge_sources(
    custom: Vec<Prompt>,
    daily: Vec<Prompt>,
    core: Vec<Prompt>,
    hidden: &HashSet<String>,
) -> Vec<Prompt> {
    let mut seen = HashSet::new();
    let builtins = daily
        .into_iter()
        .chain(core)
        .filter(|p| !hidden.contains(&p.id));

    custom
        .into_iter()
        .chain(builtins)
        .filter(|p| seen.insert(p.id.clone()))
        .collect()
}

/// Distinct non-empty categories in sorted order.
pub fn collect_categories(prompts: &[Prompt]) -> Vec<String> {
    prompts
        .iter()
        .map(|p| p.category.as_str())
        .filter(|c| !c.is_empty())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(String::from)
        .collect()
}
