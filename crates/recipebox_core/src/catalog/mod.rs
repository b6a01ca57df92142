//! Catalog commands: the user-facing operations over the remote service and
//! the local override store.
//!
//! Every command works on best-effort data. Remote reads that fail degrade to
//! an empty remote set, and remote mutations that fail are still applied to
//! the local store so the user's action is kept.

use crate::constants::{DEFAULT_USER_ID, SEED_MEAL_TYPE};
use crate::error::AppError;
use crate::favorites::{FavoriteChange, Favorites};
use crate::filter::{compute_meal_types, union_meal_types};
use crate::merge::{compose_favorites, merge_recipes, next_local_id, normalize_query};
use crate::models::recipe::{Recipe, RecipeDraft, RecipeId, RecipePatch};
use crate::remote::RecipeApi;
use crate::store::list::{favorite_ids, recipe_overrides, RecipeOverrides};
use crate::store::KeyValueStore;
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{info, warn};

/// What a delete command changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeleteOutcome {
    pub id: RecipeId,
    /// A local override record was removed.
    pub removed_local: bool,
    /// The id was removed from the favorite set.
    pub removed_favorite: bool,
    /// The remote service acknowledged the delete.
    pub remote_deleted: bool,
}

/// Recipe catalog bound to a remote service and a local store.
pub struct Catalog {
    api: Arc<dyn RecipeApi>,
    overrides: RecipeOverrides,
    favorites: Favorites,
    user_id: u64,
    remote_ids: BTreeSet<RecipeId>,
}

impl Catalog {
    /// Build a catalog over `api` persisting into `store`.
    pub fn new(api: Arc<dyn RecipeApi>, store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            api,
            overrides: recipe_overrides(store.clone()),
            favorites: Favorites::new(favorite_ids(store)),
            user_id: DEFAULT_USER_ID,
            remote_ids: BTreeSet::new(),
        }
    }

    /// Owning user id stamped on recipes created without one.
    pub fn with_user_id(mut self, user_id: u64) -> Self {
        self.user_id = user_id;
        self
    }

    pub fn is_favorite(&self, id: RecipeId) -> bool {
        self.favorites.contains(id)
    }

    pub fn favorite_ids(&self) -> Vec<RecipeId> {
        self.favorites.ids()
    }

    fn remember_remote(&mut self, recipes: &[Recipe]) {
        self.remote_ids.extend(recipes.iter().map(|r| r.id));
    }

    async fn remote_all(&mut self) -> Result<Vec<Recipe>, AppError> {
        let recipes = self.api.list(None).await?;
        self.remember_remote(&recipes);
        Ok(recipes)
    }

    async fn remote_all_or_empty(&mut self) -> Vec<Recipe> {
        match self.remote_all().await {
            Ok(recipes) => recipes,
            Err(err) => {
                warn!(error = %err, "listing remote recipes failed; using local data only");
                Vec::new()
            }
        }
    }

    /// Populate the known remote ids so new local ids avoid them.
    async fn refresh_remote_ids(&mut self) {
        if let Err(err) = self.remote_all().await {
            warn!(error = %err, "listing remote recipes failed; allocating ids from local data");
        }
    }

    /// Look up the merged record for `id`.
    ///
    /// # Returns
    /// `Ok(None)` when the service answered and neither source has the id.
    ///
    /// # Errors
    /// Returns the remote error when the service is unreachable and no local
    /// record exists.
    async fn find_merged(&mut self, id: RecipeId) -> Result<Option<Recipe>, AppError> {
        let local = self.overrides.load();
        match self.remote_all().await {
            Ok(remote) => Ok(merge_recipes(remote, local, "")
                .into_iter()
                .find(|r| r.id == id)),
            Err(err) => match local.into_iter().find(|r| r.id == id) {
                Some(recipe) => Ok(Some(recipe)),
                None => Err(err),
            },
        }
    }

    /// The recipe list for a free-text query.
    ///
    /// A blank query lists everything; otherwise the service searches and
    /// local overrides are filtered client-side. Remote failure degrades to
    /// local records only.
    pub async fn browse(&mut self, query: &str) -> Vec<Recipe> {
        let remote = match normalize_query(query) {
            None => self.api.list(None).await,
            Some(_) => self.api.search(query.trim()).await,
        };
        let remote = match remote {
            Ok(recipes) => {
                self.remember_remote(&recipes);
                recipes
            }
            Err(err) => {
                warn!(query = %query.trim(), error = %err, "remote query failed; using local data only");
                Vec::new()
            }
        };
        let merged = merge_recipes(remote, self.overrides.load(), query);
        tracing::debug!(query = %query.trim(), count = merged.len(), "browse");
        merged
    }

    /// Meal types offered for filtering `visible`, unioned with the types the
    /// service reports for the seed meal type.
    pub async fn meal_types(&self, visible: &[Recipe]) -> Vec<String> {
        let known = compute_meal_types(visible);
        match self.api.by_meal_type(SEED_MEAL_TYPE).await {
            Ok(seeded) => union_meal_types(known, compute_meal_types(&seeded)),
            Err(err) => {
                warn!(error = %err, "loading seed meal types failed");
                known
            }
        }
    }

    /// Favorite recipes in favorite-set order.
    ///
    /// An empty favorite set returns immediately without contacting the
    /// service.
    pub async fn favorites(&mut self) -> Vec<Recipe> {
        let ids = self.favorites.ids();
        if ids.is_empty() {
            return Vec::new();
        }
        let remote = self.remote_all_or_empty().await;
        compose_favorites(remote, self.overrides.load(), &ids)
    }

    /// The merged record for `id`.
    ///
    /// # Errors
    /// Returns [`AppError::NotFound`] when no source has the id, or the remote
    /// error when the service is unreachable and there is no local record.
    pub async fn show(&mut self, id: RecipeId) -> Result<Recipe, AppError> {
        self.find_merged(id).await?.ok_or(AppError::NotFound)
    }

    /// Create a recipe from form input.
    ///
    /// The record always lands in the local override list. Its id is the
    /// server-assigned one unless the create call failed or the server
    /// returned an id that is already taken, in which case it is one more
    /// than the largest known id.
    ///
    /// # Errors
    /// Returns [`AppError::BadRequest`] for invalid input, or a storage error
    /// when the override list cannot be saved.
    pub async fn add(&mut self, draft: RecipeDraft) -> Result<Recipe, AppError> {
        let valid = draft.validate()?.with_default_user(self.user_id);
        if self.remote_ids.is_empty() {
            self.refresh_remote_ids().await;
        }

        let mut local = self.overrides.load();
        let taken: BTreeSet<RecipeId> = local
            .iter()
            .map(|r| r.id)
            .chain(self.remote_ids.iter().copied())
            .collect();
        let fallback_id = next_local_id(taken.iter().copied());
        let mut recipe = valid.into_recipe(fallback_id);

        match self.api.create(&recipe).await {
            Ok(created) if !taken.contains(&created.id) => recipe.id = created.id,
            Ok(created) => warn!(
                server_id = created.id,
                recipe_id = fallback_id,
                "server assigned an id already in use; keeping local id"
            ),
            Err(err) => warn!(
                recipe_id = fallback_id,
                error = %err,
                "remote create failed; recipe kept locally"
            ),
        }

        local.push(recipe.clone());
        self.overrides.save(&local)?;
        info!(recipe_id = recipe.id, name = recipe.display_name(), "added recipe");
        Ok(recipe)
    }

    /// Apply an edit to recipe `id`.
    ///
    /// The local override record is created from the current merged record
    /// when needed, then the patch is merged over it.
    ///
    /// # Errors
    /// Returns [`AppError::BadRequest`] for an empty or invalid patch,
    /// [`AppError::NotFound`] when the service answered and no source has the
    /// id, or a storage error when saving fails.
    pub async fn edit(&mut self, id: RecipeId, patch: RecipePatch) -> Result<Recipe, AppError> {
        if patch.is_empty() {
            return Err(AppError::BadRequest("edit changes no fields".to_string()));
        }
        let changes = patch.into_overlay(id)?;

        let mut local = self.overrides.load();
        let index = match local.iter().position(|r| r.id == id) {
            Some(index) => index,
            None => {
                let base = match self.find_merged(id).await {
                    Ok(Some(recipe)) => recipe,
                    Ok(None) => return Err(AppError::NotFound),
                    Err(err) => {
                        warn!(recipe_id = id, error = %err, "remote lookup failed; storing partial override");
                        Recipe::new(id)
                    }
                };
                local.push(base);
                local.len() - 1
            }
        };

        if let Err(err) = self.api.update(id, &changes).await {
            warn!(recipe_id = id, error = %err, "remote update failed; edit kept locally");
        }

        local[index].overlay(changes);
        let updated = local[index].clone();
        self.overrides.save(&local)?;
        info!(recipe_id = id, "edited recipe");
        Ok(updated)
    }

    /// Delete recipe `id` from the local override list and the favorite set,
    /// then ask the service to delete it.
    ///
    /// The remote call is best effort; its failure is logged and reported in
    /// the outcome only.
    ///
    /// # Errors
    /// Returns a storage error when the local lists cannot be saved.
    pub async fn delete(&mut self, id: RecipeId) -> Result<DeleteOutcome, AppError> {
        let mut local = self.overrides.load();
        let before = local.len();
        local.retain(|r| r.id != id);
        let removed_local = local.len() != before;
        if removed_local {
            self.overrides.save(&local)?;
        }
        let removed_favorite = self.favorites.remove(id)?;

        let remote_deleted = match self.api.delete(id).await {
            Ok(()) => true,
            Err(err) => {
                warn!(recipe_id = id, error = %err, "remote delete failed");
                false
            }
        };

        info!(recipe_id = id, removed_local, removed_favorite, "deleted recipe");
        Ok(DeleteOutcome {
            id,
            removed_local,
            removed_favorite,
            remote_deleted,
        })
    }

    /// Toggle the favorite flag of recipe `id`.
    ///
    /// The favorite set is independent of recipe content, so an id can be
    /// favorited while the service is unreachable.
    ///
    /// # Errors
    /// Returns [`AppError::NotFound`] when the service answered and no source
    /// has the id, or a storage error when the set cannot be saved.
    pub async fn toggle_favorite(&mut self, id: RecipeId) -> Result<FavoriteChange, AppError> {
        let recipe = match self.find_merged(id).await {
            Ok(Some(recipe)) => recipe,
            Ok(None) if self.favorites.contains(id) => Recipe::new(id),
            Ok(None) => return Err(AppError::NotFound),
            Err(err) => {
                warn!(recipe_id = id, error = %err, "remote lookup failed; toggling by id");
                Recipe::new(id)
            }
        };
        self.favorites.toggle(&recipe)
    }
}

#[cfg(test)]
mod tests;
