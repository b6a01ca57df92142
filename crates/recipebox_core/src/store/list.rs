//! Typed JSON array persisted under a single store key.

use super::KeyValueStore;
use crate::constants::{FAVORITES_KEY, RECIPES_KEY};
use crate::error::AppError;
use crate::models::recipe::{Recipe, RecipeId};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::marker::PhantomData;
use std::sync::Arc;

/// A JSON array of `T` stored under a fixed key.
///
/// Reads never fail: a missing key, an unreadable backend, or a value that is
/// not a JSON array all load as an empty list. Array entries that do not
/// decode as `T` are skipped one by one so the rest of the list survives.
pub struct JsonList<T> {
    store: Arc<dyn KeyValueStore>,
    key: &'static str,
    _items: PhantomData<fn() -> T>,
}

impl<T> Clone for JsonList<T> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            key: self.key,
            _items: PhantomData,
        }
    }
}

impl<T: Serialize + DeserializeOwned> JsonList<T> {
    /// Bind a list to `key` in `store`.
    pub fn new(store: Arc<dyn KeyValueStore>, key: &'static str) -> Self {
        Self {
            store,
            key,
            _items: PhantomData,
        }
    }

    /// Storage key this list is bound to.
    pub fn key(&self) -> &'static str {
        self.key
    }

    /// Load the stored list, skipping entries that fail to decode.
    pub fn load(&self) -> Vec<T> {
        let bytes = match self.store.get(self.key) {
            Ok(Some(bytes)) => bytes,
            Ok(None) => return Vec::new(),
            Err(err) => {
                tracing::warn!(key = self.key, error = %err, "failed to read stored list");
                return Vec::new();
            }
        };
        let entries: Vec<serde_json::Value> = match serde_json::from_slice(&bytes) {
            Ok(entries) => entries,
            Err(err) => {
                tracing::warn!(key = self.key, error = %err, "discarding corrupt stored list");
                return Vec::new();
            }
        };
        entries
            .into_iter()
            .enumerate()
            .filter_map(|(index, entry)| match serde_json::from_value(entry) {
                Ok(item) => Some(item),
                Err(err) => {
                    tracing::warn!(key = self.key, index, error = %err, "skipping unreadable stored entry");
                    None
                }
            })
            .collect()
    }

    /// Replace the stored list with `items`.
    ///
    /// # Errors
    /// Returns an error when serialization or the backend write fails.
    pub fn save(&self, items: &[T]) -> Result<(), AppError> {
        let bytes = serde_json::to_vec(items)?;
        self.store.set(self.key, &bytes)?;
        tracing::debug!(key = self.key, count = items.len(), "saved list");
        Ok(())
    }
}

/// User-authored and user-edited recipes.
pub type RecipeOverrides = JsonList<Recipe>;
/// Favorite recipe identifiers.
pub type FavoriteIds = JsonList<RecipeId>;

/// Bind the recipe override list to its fixed key.
pub fn recipe_overrides(store: Arc<dyn KeyValueStore>) -> RecipeOverrides {
    JsonList::new(store, RECIPES_KEY)
}

/// Bind the favorite id list to its fixed key.
pub fn favorite_ids(store: Arc<dyn KeyValueStore>) -> FavoriteIds {
    JsonList::new(store, FAVORITES_KEY)
}
