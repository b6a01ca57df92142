//! Shared test-only helpers for recipebox_core.

use crate::error::AppError;
use crate::models::recipe::{MealType, Recipe, RecipeId};
use crate::remote::RecipeApi;
use crate::store::{KeyValueStore, MemoryStore};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};

/// Scripted in-memory stand-in for the recipe service.
///
/// Like the real mock service it never retains mutations.
#[derive(Default)]
pub(crate) struct FakeApi {
    state: Mutex<FakeState>,
}

#[derive(Default)]
pub(crate) struct FakeState {
    pub recipes: Vec<Recipe>,
    /// Fail every read.
    pub reads_fail: bool,
    /// Fail every create/update/delete.
    pub writes_fail: bool,
    /// Id returned by `create`; defaults to `recipes.len() + 1`.
    pub create_id: Option<RecipeId>,
    pub calls: Vec<String>,
}

impl FakeApi {
    pub(crate) fn with_recipes(recipes: Vec<Recipe>) -> Self {
        Self {
            state: Mutex::new(FakeState {
                recipes,
                ..FakeState::default()
            }),
        }
    }

    pub(crate) fn update_state(&self, apply: impl FnOnce(&mut FakeState)) {
        let mut state = self.state.lock().expect("fake api state");
        apply(&mut *state);
    }

    pub(crate) fn calls(&self) -> Vec<String> {
        self.state.lock().expect("fake api state").calls.clone()
    }

    fn read(&self, call: String, pick: impl Fn(&Recipe) -> bool) -> Result<Vec<Recipe>, AppError> {
        let mut state = self.state.lock().expect("fake api state");
        state.calls.push(call);
        if state.reads_fail {
            return Err(AppError::Transport("connection refused".to_string()));
        }
        Ok(state.recipes.iter().filter(|r| pick(*r)).cloned().collect())
    }

    fn write(&self, call: String) -> Result<usize, AppError> {
        let mut state = self.state.lock().expect("fake api state");
        state.calls.push(call);
        if state.writes_fail {
            return Err(AppError::Remote {
                status: 503,
                message: "service unavailable".to_string(),
            });
        }
        Ok(state.recipes.len())
    }
}

#[async_trait]
impl RecipeApi for FakeApi {
    async fn list(&self, limit: Option<usize>) -> Result<Vec<Recipe>, AppError> {
        let mut recipes = self.read(format!("list:{:?}", limit), |_| true)?;
        if let Some(limit) = limit.filter(|limit| *limit > 0) {
            recipes.truncate(limit);
        }
        Ok(recipes)
    }

    async fn search(&self, query: &str) -> Result<Vec<Recipe>, AppError> {
        let query_lower = query.to_lowercase();
        self.read(format!("search:{}", query), |r| {
            r.name
                .as_deref()
                .is_some_and(|name| name.to_lowercase().contains(&query_lower))
        })
    }

    async fn by_meal_type(&self, meal: &str) -> Result<Vec<Recipe>, AppError> {
        self.read(format!("meal:{}", meal), |r| {
            r.meal_tags().any(|tag| tag.eq_ignore_ascii_case(meal))
        })
    }

    async fn create(&self, recipe: &Recipe) -> Result<Recipe, AppError> {
        let count = self.write(format!("create:{}", recipe.display_name()))?;
        let id = self
            .state
            .lock()
            .expect("fake api state")
            .create_id
            .unwrap_or(count as RecipeId + 1);
        let mut created = recipe.clone();
        created.id = id;
        Ok(created)
    }

    async fn update(&self, id: RecipeId, recipe: &Recipe) -> Result<Recipe, AppError> {
        self.write(format!("update:{}", id))?;
        let mut updated = recipe.clone();
        updated.id = id;
        Ok(updated)
    }

    async fn delete(&self, id: RecipeId) -> Result<(), AppError> {
        self.write(format!("delete:{}", id))?;
        Ok(())
    }
}

/// A fresh in-memory store.
pub(crate) fn memory_store() -> Arc<dyn KeyValueStore> {
    Arc::new(MemoryStore::default())
}

/// A named recipe with the given meal types.
pub(crate) fn sample_recipe(id: RecipeId, name: &str, meals: &[&str]) -> Recipe {
    let mut recipe = Recipe::new(id);
    recipe.name = Some(name.to_string());
    recipe.cuisine = Some("Italian".to_string());
    recipe.ingredients = Some(vec!["Salt".to_string()]);
    recipe.instructions = Some(vec!["Cook".to_string()]);
    recipe.meal_type = Some(MealType::Many(
        meals.iter().map(|meal| meal.to_string()).collect(),
    ));
    recipe
}
