//! The pure function from (catalog, favorites, query) to the ordered list
//! the user sees.
//!
//! Pipeline:
//! 1. search: keyword is a case-insensitive substring of title, body, author or sub-category
//! 2. category: `all` or exact match
//! 3. filters: every active filter must hold
//! 4. partition: favorites, then non-favorite customs, then the rest
//! 5. only the last group follows the sort mode
//! 6. the flash prompt goes in front, untouched by steps 1 to 5

use std::cmp::Ordering;
use std::collections::HashSet;

use crate::catalog::flash::flash_prompt;
use crate::catalog::query::{CatalogFilter, CatalogQuery, SortMode};
use crate::catalog::random::RandomOrder;
use crate::models::prompt::{Prompt, PromptMode};

fn matches_keyword(prompt: &Prompt, keyword: &str) -> bool {
    if keyword.is_empty() {
        return true;
    }
    let contains = |field: &str| field.to_lowercase().contains(keyword);
    contains(&prompt.title)
        || contains(&prompt.prompt)
        || contains(&prompt.author)
        || prompt.sub_category.as_deref().is_some_and(contains)
}

fn matches_filter(prompt: &Prompt, filter: CatalogFilter, favorites: &HashSet<String>) -> bool {
    match filter {
        CatalogFilter::Favorite => favorites.contains(&prompt.id),
        CatalogFilter::Custom => prompt.is_custom,
        CatalogFilter::Generate => prompt.mode == Some(PromptMode::Generate),
        CatalogFilter::Edit => prompt.mode == Some(PromptMode::Edit),
    }
}

fn passes(prompt: &Prompt, keyword: &str, favorites: &HashSet<String>, query: &CatalogQuery) -> bool {
    matches_keyword(prompt, keyword)
        && query.category.matches(&prompt.category)
        && query
            .filters
            .iter()
            .all(|f| matches_filter(prompt, *f, favorites))
}

/// Computes the full ordered listing. `prompts` is expected in repository
/// merge order; any flash entries in it are ignored so the pinned assistant
/// appears exactly once.
pub fn recompute(
    prompts: &[Prompt],
    favorites: &HashSet<String>,
    query: &CatalogQuery,
    random: &RandomOrder,
) -> Vec<Prompt> {
    let keyword = query.normalized_keyword();

    let mut favorite_items = Vec::new();
    let mut custom_items = Vec::new();
    let mut normal_items = Vec::new();

    let matching = prompts
        .iter()
        .filter(|p| !p.is_flash && passes(p, &keyword, favorites, query));

    for prompt in matching {
        if favorites.contains(&prompt.id) {
            favorite_items.push(prompt.clone());
        } else if prompt.is_custom {
            custom_items.push(prompt.clone());
        } else {
            normal_items.push(prompt.clone());
        }
    }

    if query.sort == SortMode::Random {
        // Ids without a key sort last, keeping their merge order.
        normal_items.sort_by(|a, b| {
            let ka = random.value(&a.id).unwrap_or(f64::INFINITY);
            let kb = random.value(&b.id).unwrap_or(f64::INFINITY);
            ka.partial_cmp(&kb).unwrap_or(Ordering::Equal)
        });
    }

    let mut result =
        Vec::with_capacity(1 + favorite_items.len() + custom_items.len() + normal_items.len());
    result.push(flash_prompt());
    result.extend(favorite_items);
    result.extend(custom_items);
    result.extend(normal_items);
    result
}
