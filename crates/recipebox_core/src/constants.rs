//! Shared constants used across RecipeBox crates.

/// Default base URL of the remote recipe service.
pub const DEFAULT_API_URL: &str = "https://dummyjson.com";

/// Default HTTP request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Storage key holding user-authored and user-edited recipes.
pub const RECIPES_KEY: &str = "recipes";
/// Storage key holding favorite recipe identifiers.
pub const FAVORITES_KEY: &str = "favorites";

/// Owning user id stamped on recipes created through the add flow.
pub const DEFAULT_USER_ID: u64 = 166;

/// Meal type queried to seed the filter choices.
pub const SEED_MEAL_TYPE: &str = "snack";

/// File name for the redb database within the configured store directory.
pub const REDB_FILE_NAME: &str = "store.redb";
