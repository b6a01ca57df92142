//! Meal-type tag derivation and selection filtering.

use crate::constants::SEED_MEAL_TYPE;
use crate::models::recipe::Recipe;
use indexmap::IndexSet;

/// Distinct meal-type tags across `recipes`, in first-seen order.
pub fn compute_meal_types(recipes: &[Recipe]) -> Vec<String> {
    let tags: IndexSet<&str> = recipes.iter().flat_map(Recipe::meal_tags).collect();
    tags.into_iter().map(str::to_string).collect()
}

/// Union `extra` into `known`, keeping the existing order and appending new
/// tags in the order given.
pub fn union_meal_types(known: Vec<String>, extra: impl IntoIterator<Item = String>) -> Vec<String> {
    let mut tags: IndexSet<String> = known.into_iter().collect();
    tags.extend(extra);
    tags.into_iter().collect()
}

/// Choices to offer when nothing is known yet.
pub fn meal_type_choices(known: &[String]) -> Vec<String> {
    if known.is_empty() {
        vec![SEED_MEAL_TYPE.to_string()]
    } else {
        known.to_vec()
    }
}

/// Set of meal-type tags the user selected.
///
/// An empty selection means "no filtering".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MealSelection {
    selected: IndexSet<String>,
}

impl MealSelection {
    /// Build a selection from tags.
    pub fn from_tags<I, T>(tags: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        Self {
            selected: tags.into_iter().map(Into::into).collect(),
        }
    }

    /// Flip `tag` in or out of the selection.
    ///
    /// # Returns
    /// `true` when the tag is selected after the call.
    pub fn toggle(&mut self, tag: &str) -> bool {
        if self.selected.shift_remove(tag) {
            false
        } else {
            self.selected.insert(tag.to_string());
            true
        }
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.selected.contains(tag)
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// Whether `recipe` passes this selection.
    ///
    /// Records without a meal type never match a non-empty selection.
    pub fn matches(&self, recipe: &Recipe) -> bool {
        self.is_empty() || recipe.meal_tags().any(|tag| self.contains(tag))
    }
}

/// Keep the recipes whose meal types intersect `selection`.
///
/// An empty selection returns the input unchanged, in the same order.
pub fn apply_filters(recipes: &[Recipe], selection: &MealSelection) -> Vec<Recipe> {
    if selection.is_empty() {
        return recipes.to_vec();
    }
    recipes
        .iter()
        .filter(|recipe| selection.matches(recipe))
        .cloned()
        .collect()
}
