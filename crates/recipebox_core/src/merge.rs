//! Combining remote query results with locally persisted overrides.

use crate::models::recipe::{Recipe, RecipeId};
use indexmap::{IndexMap, IndexSet};

/// Normalize a free-text query for matching.
///
/// # Returns
/// Lowercased, trimmed query, or `None` when it is blank.
pub fn normalize_query(query: &str) -> Option<String> {
    let trimmed = query.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_lowercase())
}

fn overlay_into(by_id: &mut IndexMap<RecipeId, Recipe>, recipe: Recipe) {
    match by_id.get_mut(&recipe.id) {
        Some(existing) => existing.overlay(recipe),
        None => {
            by_id.insert(recipe.id, recipe);
        }
    }
}

/// Merge remote results with local overrides into one id-unique list.
///
/// A blank `query` keeps every local record; otherwise local records are
/// narrowed with [`Recipe::matches_query`]. Remote records are inserted first
/// and local records are shallow-merged over them, so local fields win. The
/// output keeps insertion order: remote records, then unmatched local ones.
pub fn merge_recipes(remote: Vec<Recipe>, local: Vec<Recipe>, query: &str) -> Vec<Recipe> {
    let local: Vec<Recipe> = match normalize_query(query) {
        None => local,
        Some(query_lower) => local
            .into_iter()
            .filter(|recipe| recipe.matches_query(&query_lower))
            .collect(),
    };

    let mut by_id: IndexMap<RecipeId, Recipe> =
        IndexMap::with_capacity(remote.len() + local.len());
    for recipe in remote.into_iter().chain(local) {
        overlay_into(&mut by_id, recipe);
    }
    by_id.into_values().collect()
}

/// Resolve favorite ids against remote and local records.
///
/// Ids are deduplicated keeping first occurrence order; ids with no record in
/// either source are dropped.
pub fn compose_favorites(
    remote: Vec<Recipe>,
    local: Vec<Recipe>,
    favorite_ids: &[RecipeId],
) -> Vec<Recipe> {
    let mut by_id: IndexMap<RecipeId, Recipe> = IndexMap::with_capacity(remote.len());
    for recipe in remote.into_iter().chain(local) {
        overlay_into(&mut by_id, recipe);
    }

    let unique: IndexSet<RecipeId> = favorite_ids.iter().copied().collect();
    unique
        .into_iter()
        .filter_map(|id| by_id.swap_remove(&id))
        .collect()
}

/// Fallback identifier for a locally created recipe.
///
/// # Returns
/// One more than the largest id in `ids`, or `1` when there are none.
pub fn next_local_id(ids: impl IntoIterator<Item = RecipeId>) -> RecipeId {
    ids.into_iter()
        .max()
        .map_or(1, |max| max.saturating_add(1))
}
