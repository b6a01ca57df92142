//! Recipe data models, form input types, and boundary validation.

use crate::error::AppError;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// Identifier shared by remote records and local overrides.
pub type RecipeId = u64;

/// Preparation difficulty as published by the recipe service.
///
/// Decoding is case-insensitive; encoding always uses the capitalized label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl FromStr for Difficulty {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Self::Easy),
            "medium" => Ok(Self::Medium),
            "hard" => Ok(Self::Hard),
            other => Err(AppError::BadRequest(format!(
                "unknown difficulty '{}'; expected Easy, Medium or Hard",
                other
            ))),
        }
    }
}

impl<'de> Deserialize<'de> for Difficulty {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let label = String::deserialize(deserializer)?;
        label.parse().map_err(serde::de::Error::custom)
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Easy => "Easy",
            Self::Medium => "Medium",
            Self::Hard => "Hard",
        };
        f.write_str(label)
    }
}

/// Meal-type field, which the service and older stored records encode either
/// as a single string or as a list of strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MealType {
    One(String),
    Many(Vec<String>),
}

impl MealType {
    /// Iterate the normalized flat tag list.
    pub fn tags(&self) -> impl Iterator<Item = &str> {
        let slice: &[String] = match self {
            Self::One(tag) => std::slice::from_ref(tag),
            Self::Many(tags) => tags.as_slice(),
        };
        slice.iter().map(String::as_str)
    }
}

impl fmt::Display for MealType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined = self.tags().collect::<Vec<_>>().join(", ");
        f.write_str(&joined)
    }
}

/// Recipe record as exchanged with the recipe service and persisted locally.
///
/// Only `id` is mandatory. Local overrides may carry a subset of fields, so
/// every other field is optional and omitted from JSON when absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    pub id: RecipeId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cuisine: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<Difficulty>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prep_time_minutes: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cook_time_minutes: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calories_per_serving: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub servings: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ingredients: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instructions: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meal_type: Option<MealType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub review_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<u64>,
}

fn overlay_field<T>(slot: &mut Option<T>, value: Option<T>) {
    if value.is_some() {
        *slot = value;
    }
}

fn contains_lower(haystack: &str, query_lower: &str) -> bool {
    haystack.to_lowercase().contains(query_lower)
}

impl Recipe {
    /// Create an empty record carrying only `id`.
    pub fn new(id: RecipeId) -> Self {
        Self {
            id,
            name: None,
            cuisine: None,
            difficulty: None,
            prep_time_minutes: None,
            cook_time_minutes: None,
            calories_per_serving: None,
            servings: None,
            image: None,
            ingredients: None,
            instructions: None,
            meal_type: None,
            tags: None,
            rating: None,
            review_count: None,
            user_id: None,
        }
    }

    /// Shallow-merge `top` over `self`: every field `top` defines wins.
    ///
    /// `id` is left untouched.
    pub fn overlay(&mut self, top: Recipe) {
        overlay_field(&mut self.name, top.name);
        overlay_field(&mut self.cuisine, top.cuisine);
        overlay_field(&mut self.difficulty, top.difficulty);
        overlay_field(&mut self.prep_time_minutes, top.prep_time_minutes);
        overlay_field(&mut self.cook_time_minutes, top.cook_time_minutes);
        overlay_field(&mut self.calories_per_serving, top.calories_per_serving);
        overlay_field(&mut self.servings, top.servings);
        overlay_field(&mut self.image, top.image);
        overlay_field(&mut self.ingredients, top.ingredients);
        overlay_field(&mut self.instructions, top.instructions);
        overlay_field(&mut self.meal_type, top.meal_type);
        overlay_field(&mut self.tags, top.tags);
        overlay_field(&mut self.rating, top.rating);
        overlay_field(&mut self.review_count, top.review_count);
        overlay_field(&mut self.user_id, top.user_id);
    }

    /// Name for display, falling back to a placeholder for partial records.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("(untitled)")
    }

    /// Iterate meal-type tags, empty when the record has none.
    pub fn meal_tags(&self) -> impl Iterator<Item = &str> {
        self.meal_type.iter().flat_map(MealType::tags)
    }

    /// Case-insensitive substring match over name, cuisine, meal types, tags,
    /// and ingredients.
    ///
    /// # Arguments
    /// - `query_lower`: Already-lowercased, non-empty query.
    pub fn matches_query(&self, query_lower: &str) -> bool {
        let text_hit = [self.name.as_deref(), self.cuisine.as_deref()]
            .into_iter()
            .flatten()
            .any(|value| contains_lower(value, query_lower));
        if text_hit {
            return true;
        }
        if self.meal_tags().any(|tag| contains_lower(tag, query_lower)) {
            return true;
        }
        [self.tags.as_deref(), self.ingredients.as_deref()]
            .into_iter()
            .flatten()
            .flatten()
            .any(|value| contains_lower(value, query_lower))
    }
}

/// List envelope returned by the recipe service.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecipePage {
    #[serde(default)]
    pub recipes: Vec<Recipe>,
    #[serde(default)]
    pub total: usize,
    #[serde(default)]
    pub skip: usize,
    #[serde(default)]
    pub limit: usize,
}

/// Form input for the add flow.
///
/// Numeric fields are signed so that negative user input can be represented
/// and rejected by [`RecipeDraft::validate`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RecipeDraft {
    pub name: String,
    pub cuisine: String,
    pub difficulty: Difficulty,
    pub prep_time_minutes: i64,
    pub cook_time_minutes: i64,
    pub calories_per_serving: i64,
    pub servings: i64,
    pub image: String,
    pub ingredients: Vec<String>,
    pub instructions: Vec<String>,
    pub meal_type: Vec<String>,
    pub tags: Vec<String>,
    pub rating: f64,
    pub review_count: i64,
    pub user_id: Option<u64>,
}

impl Default for RecipeDraft {
    fn default() -> Self {
        Self {
            name: String::new(),
            cuisine: "Italian".to_string(),
            difficulty: Difficulty::Easy,
            prep_time_minutes: 0,
            cook_time_minutes: 0,
            calories_per_serving: 0,
            servings: 1,
            image: String::new(),
            ingredients: vec![String::new()],
            instructions: vec![String::new()],
            meal_type: vec!["Dinner".to_string()],
            tags: vec![String::new()],
            rating: 0.0,
            review_count: 0,
            user_id: None,
        }
    }
}

/// A draft that passed validation; convertible into a full [`Recipe`].
#[derive(Debug, Clone, PartialEq)]
pub struct ValidRecipe {
    recipe: Recipe,
}

impl ValidRecipe {
    /// Fill in the owning user when the draft did not name one.
    pub fn with_default_user(mut self, user_id: u64) -> Self {
        self.recipe.user_id.get_or_insert(user_id);
        self
    }

    /// Produce the stored record with `id` assigned.
    pub fn into_recipe(self, id: RecipeId) -> Recipe {
        let mut recipe = self.recipe;
        recipe.id = id;
        recipe
    }
}

fn required_text(field: &str, value: &str) -> Result<String, AppError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::BadRequest(format!("{} must not be empty", field)));
    }
    Ok(trimmed.to_string())
}

fn clean_list(values: Vec<String>) -> Vec<String> {
    values
        .into_iter()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .collect()
}

fn required_list(field: &str, values: Vec<String>) -> Result<Vec<String>, AppError> {
    let cleaned = clean_list(values);
    if cleaned.is_empty() {
        return Err(AppError::BadRequest(format!(
            "{} must contain at least one entry",
            field
        )));
    }
    Ok(cleaned)
}

fn non_negative(field: &str, value: i64) -> Result<u32, AppError> {
    u32::try_from(value)
        .map_err(|_| AppError::BadRequest(format!("{} must be between 0 and {}", field, u32::MAX)))
}

fn positive(field: &str, value: i64) -> Result<u32, AppError> {
    match non_negative(field, value)? {
        0 => Err(AppError::BadRequest(format!("{} must be at least 1", field))),
        value => Ok(value),
    }
}

fn valid_rating(value: f64) -> Result<f64, AppError> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(AppError::BadRequest(
            "rating must be a non-negative number".to_string(),
        ))
    }
}

fn meal_type_from_list(values: Vec<String>) -> Option<MealType> {
    let cleaned = clean_list(values);
    (!cleaned.is_empty()).then_some(MealType::Many(cleaned))
}

impl RecipeDraft {
    /// Validate and normalize the form input.
    ///
    /// Text is trimmed and blank list entries are dropped before checks run.
    ///
    /// # Errors
    /// Returns [`AppError::BadRequest`] for an empty name, cuisine, or image,
    /// negative times or calories, servings below one, or ingredient and
    /// instruction lists with no non-blank entry.
    pub fn validate(self) -> Result<ValidRecipe, AppError> {
        let recipe = Recipe {
            id: 0,
            name: Some(required_text("name", &self.name)?),
            cuisine: Some(required_text("cuisine", &self.cuisine)?),
            difficulty: Some(self.difficulty),
            prep_time_minutes: Some(non_negative("prepTimeMinutes", self.prep_time_minutes)?),
            cook_time_minutes: Some(non_negative("cookTimeMinutes", self.cook_time_minutes)?),
            calories_per_serving: Some(non_negative(
                "caloriesPerServing",
                self.calories_per_serving,
            )?),
            servings: Some(positive("servings", self.servings)?),
            image: Some(required_text("image", &self.image)?),
            ingredients: Some(required_list("ingredients", self.ingredients)?),
            instructions: Some(required_list("instructions", self.instructions)?),
            meal_type: meal_type_from_list(self.meal_type),
            tags: Some(clean_list(self.tags)),
            rating: Some(valid_rating(self.rating)?),
            review_count: Some(non_negative("reviewCount", self.review_count)?),
            user_id: self.user_id,
        };
        Ok(ValidRecipe { recipe })
    }
}

/// Edit input: only the fields present are changed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RecipePatch {
    pub name: Option<String>,
    pub cuisine: Option<String>,
    pub difficulty: Option<Difficulty>,
    pub prep_time_minutes: Option<i64>,
    pub cook_time_minutes: Option<i64>,
    pub calories_per_serving: Option<i64>,
    pub servings: Option<i64>,
    pub image: Option<String>,
    pub ingredients: Option<Vec<String>>,
    pub instructions: Option<Vec<String>>,
    pub meal_type: Option<Vec<String>>,
    pub tags: Option<Vec<String>>,
    pub rating: Option<f64>,
}

impl RecipePatch {
    /// Validate the fields that are set and build a partial record for overlay.
    ///
    /// # Errors
    /// Returns [`AppError::BadRequest`] under the same rules as
    /// [`RecipeDraft::validate`], applied only to the fields present.
    pub fn into_overlay(self, id: RecipeId) -> Result<Recipe, AppError> {
        let mut recipe = Recipe::new(id);
        recipe.name = self.name.map(|v| required_text("name", &v)).transpose()?;
        recipe.cuisine = self
            .cuisine
            .map(|v| required_text("cuisine", &v))
            .transpose()?;
        recipe.difficulty = self.difficulty;
        recipe.prep_time_minutes = self
            .prep_time_minutes
            .map(|v| non_negative("prepTimeMinutes", v))
            .transpose()?;
        recipe.cook_time_minutes = self
            .cook_time_minutes
            .map(|v| non_negative("cookTimeMinutes", v))
            .transpose()?;
        recipe.calories_per_serving = self
            .calories_per_serving
            .map(|v| non_negative("caloriesPerServing", v))
            .transpose()?;
        recipe.servings = self.servings.map(|v| positive("servings", v)).transpose()?;
        recipe.image = self.image.map(|v| required_text("image", &v)).transpose()?;
        recipe.ingredients = self
            .ingredients
            .map(|v| required_list("ingredients", v))
            .transpose()?;
        recipe.instructions = self
            .instructions
            .map(|v| required_list("instructions", v))
            .transpose()?;
        recipe.meal_type = self
            .meal_type
            .map(|v| required_list("mealType", v).map(MealType::Many))
            .transpose()?;
        recipe.tags = self.tags.map(clean_list);
        recipe.rating = self.rating.map(valid_rating).transpose()?;
        Ok(recipe)
    }

    /// Returns `true` when the patch changes nothing.
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}
