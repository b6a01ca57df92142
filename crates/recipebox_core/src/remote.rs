//! Contract for the remote recipe service.

use crate::error::AppError;
use crate::models::recipe::{Recipe, RecipeId};
use async_trait::async_trait;

/// Operations consumed from the recipe service.
///
/// The service is a stateless mock: mutations echo a plausible response but
/// are not retained, which is why the catalog mirrors them locally.
#[async_trait]
pub trait RecipeApi: Send + Sync {
    /// List recipes. `None` asks for every record the service has.
    async fn list(&self, limit: Option<usize>) -> Result<Vec<Recipe>, AppError>;

    /// Server-side free-text search.
    async fn search(&self, query: &str) -> Result<Vec<Recipe>, AppError>;

    /// Recipes tagged with `meal`.
    async fn by_meal_type(&self, meal: &str) -> Result<Vec<Recipe>, AppError>;

    /// Create a recipe; the returned record carries the server-assigned id.
    async fn create(&self, recipe: &Recipe) -> Result<Recipe, AppError>;

    /// Update recipe `id` with the fields in `recipe`.
    async fn update(&self, id: RecipeId, recipe: &Recipe) -> Result<Recipe, AppError>;

    /// Delete recipe `id`.
    async fn delete(&self, id: RecipeId) -> Result<(), AppError>;
}

/// Stand-in used when the remote service is bypassed; every call fails so
/// callers take their local-only fallback paths.
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineApi;

impl OfflineApi {
    fn unavailable<T>() -> Result<T, AppError> {
        Err(AppError::Transport("remote service bypassed (offline mode)".to_string()))
    }
}

#[async_trait]
impl RecipeApi for OfflineApi {
    async fn list(&self, _limit: Option<usize>) -> Result<Vec<Recipe>, AppError> {
        Self::unavailable()
    }

    async fn search(&self, _query: &str) -> Result<Vec<Recipe>, AppError> {
        Self::unavailable()
    }

    async fn by_meal_type(&self, _meal: &str) -> Result<Vec<Recipe>, AppError> {
        Self::unavailable()
    }

    async fn create(&self, _recipe: &Recipe) -> Result<Recipe, AppError> {
        Self::unavailable()
    }

    async fn update(&self, _id: RecipeId, _recipe: &Recipe) -> Result<Recipe, AppError> {
        Self::unavailable()
    }

    async fn delete(&self, _id: RecipeId) -> Result<(), AppError> {
        Self::unavailable()
    }
}
