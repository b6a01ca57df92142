//! Core domain library for RecipeBox (config, storage, models, catalog).

/// Catalog commands combining the remote service with local state.
pub mod catalog;
/// Configuration loading and defaults.
pub mod config;
/// Shared constants.
pub mod constants;
/// Process-environment helpers shared by tests and tooling.
pub mod env;
/// Application error types (storage/domain/remote).
pub mod error;
/// Favorite-set bookkeeping.
pub mod favorites;
/// Meal-type derivation and filtering.
pub mod filter;
/// Remote/local record merging.
pub mod merge;
/// Recipe data models and form validation.
pub mod models;
/// Remote recipe service contract.
pub mod remote;
/// Key-value persistence backends.
pub mod store;

#[cfg(test)]
pub(crate) mod test_support;

pub use catalog::{Catalog, DeleteOutcome};
pub use config::{Config, StoreBackend};
pub use error::AppError;
pub use favorites::{FavoriteChange, FavoritesPage};
pub use filter::{apply_filters, MealSelection};
pub use models::recipe::{Recipe, RecipeDraft, RecipeId, RecipePatch};
pub use remote::{OfflineApi, RecipeApi};
pub use store::{open_store, KeyValueStore};
