//! Favorite-set bookkeeping and the in-memory favorites page list.

use crate::error::AppError;
use crate::filter::compute_meal_types;
use crate::models::recipe::{Recipe, RecipeId};
use crate::store::list::FavoriteIds;

/// Notification emitted after a favorite toggle.
///
/// Carries the full record so a caller holding a favorites list can update it
/// without re-fetching.
#[derive(Debug, Clone, PartialEq)]
pub struct FavoriteChange {
    pub id: RecipeId,
    pub is_favorite: bool,
    pub recipe: Recipe,
}

/// Persisted favorite-id set.
#[derive(Clone)]
pub struct Favorites {
    list: FavoriteIds,
}

impl Favorites {
    pub fn new(list: FavoriteIds) -> Self {
        Self { list }
    }

    /// Current favorite ids in stored order.
    pub fn ids(&self) -> Vec<RecipeId> {
        self.list.load()
    }

    pub fn contains(&self, id: RecipeId) -> bool {
        self.ids().contains(&id)
    }

    /// Flip the favorite flag for `recipe` and persist the new set.
    ///
    /// Unfavoriting drops every stored occurrence of the id. The recipe's own
    /// record is never touched.
    ///
    /// # Errors
    /// Returns an error when the updated set cannot be saved.
    pub fn toggle(&self, recipe: &Recipe) -> Result<FavoriteChange, AppError> {
        let mut ids = self.ids();
        let was_favorite = ids.contains(&recipe.id);
        if was_favorite {
            ids.retain(|id| *id != recipe.id);
        } else {
            ids.push(recipe.id);
        }
        self.list.save(&ids)?;
        tracing::info!(
            recipe_id = recipe.id,
            is_favorite = !was_favorite,
            "toggled favorite"
        );
        Ok(FavoriteChange {
            id: recipe.id,
            is_favorite: !was_favorite,
            recipe: recipe.clone(),
        })
    }

    /// Remove `id` from the set.
    ///
    /// # Returns
    /// `true` when the id was present.
    ///
    /// # Errors
    /// Returns an error when the updated set cannot be saved.
    pub fn remove(&self, id: RecipeId) -> Result<bool, AppError> {
        let mut ids = self.ids();
        let before = ids.len();
        ids.retain(|fav| *fav != id);
        if ids.len() == before {
            return Ok(false);
        }
        self.list.save(&ids)?;
        Ok(true)
    }
}

/// Favorites currently shown to the user, kept in sync from change
/// notifications instead of re-fetching.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FavoritesPage {
    recipes: Vec<Recipe>,
    meal_types: Vec<String>,
}

impl FavoritesPage {
    pub fn new(recipes: Vec<Recipe>) -> Self {
        let meal_types = compute_meal_types(&recipes);
        Self {
            recipes,
            meal_types,
        }
    }

    pub fn recipes(&self) -> &[Recipe] {
        &self.recipes
    }

    pub fn meal_types(&self) -> &[String] {
        &self.meal_types
    }

    fn refresh_meal_types(&mut self) {
        self.meal_types = compute_meal_types(&self.recipes);
    }

    /// Apply a toggle notification.
    ///
    /// Unfavorited records are removed; newly favorited records are merged
    /// over an existing entry or prepended.
    pub fn apply_change(&mut self, change: FavoriteChange) {
        if !change.is_favorite {
            self.remove(change.id);
            return;
        }
        match self.recipes.iter_mut().find(|r| r.id == change.id) {
            Some(existing) => existing.overlay(change.recipe),
            None => self.recipes.insert(0, change.recipe),
        }
        self.refresh_meal_types();
    }

    /// Merge an edited record over the matching entry, if shown.
    pub fn apply_edit(&mut self, edited: Recipe) {
        if let Some(existing) = self.recipes.iter_mut().find(|r| r.id == edited.id) {
            existing.overlay(edited);
            self.refresh_meal_types();
        }
    }

    /// Drop `id` from the page.
    pub fn remove(&mut self, id: RecipeId) {
        self.recipes.retain(|r| r.id != id);
        self.refresh_meal_types();
    }
}
