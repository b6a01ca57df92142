//! Catalog command tests against a scripted recipe service.

use super::*;
use crate::constants::{FAVORITES_KEY, RECIPES_KEY};
use crate::models::recipe::Difficulty;
use crate::test_support::{memory_store, sample_recipe, FakeApi};

fn remote_fixture() -> Vec<Recipe> {
    vec![
        sample_recipe(1, "Classic Margherita Pizza", &["Dinner"]),
        sample_recipe(2, "Vegetarian Stir-Fry", &["Lunch"]),
        sample_recipe(3, "Chocolate Chip Cookies", &["Snack", "Dessert"]),
    ]
}

fn catalog_with(api: Arc<FakeApi>) -> (Catalog, Arc<dyn KeyValueStore>) {
    let store = memory_store();
    let catalog = Catalog::new(api, store.clone());
    (catalog, store)
}

fn draft(name: &str) -> RecipeDraft {
    RecipeDraft {
        name: name.to_string(),
        image: "https://cdn.example/r.webp".to_string(),
        ingredients: vec!["Flour".to_string()],
        instructions: vec!["Mix".to_string()],
        ..RecipeDraft::default()
    }
}

fn ids(recipes: &[Recipe]) -> Vec<RecipeId> {
    recipes.iter().map(|r| r.id).collect()
}

#[tokio::test]
async fn browse_merges_remote_list_with_local_additions() {
    let api = Arc::new(FakeApi::with_recipes(remote_fixture()));
    let (mut catalog, store) = catalog_with(api.clone());
    recipe_overrides(store).save(&[sample_recipe(60, "Family Lasagna", &["Dinner"])])
        .expect("seed local");

    let recipes = catalog.browse("").await;
    assert_eq!(ids(&recipes), vec![1, 2, 3, 60]);
    assert_eq!(api.calls(), vec!["list:None".to_string()]);
}

#[tokio::test]
async fn browse_with_query_searches_remote_and_filters_local() {
    let api = Arc::new(FakeApi::with_recipes(remote_fixture()));
    let (mut catalog, store) = catalog_with(api.clone());
    recipe_overrides(store)
        .save(&[
            sample_recipe(60, "Pizza Bianca", &["Dinner"]),
            sample_recipe(61, "Granola", &["Breakfast"]),
        ])
        .expect("seed local");

    let recipes = catalog.browse("  pizza ").await;
    assert_eq!(ids(&recipes), vec![1, 60]);
    assert_eq!(api.calls(), vec!["search:pizza".to_string()]);
}

#[tokio::test]
async fn browse_degrades_to_local_records_when_remote_fails() {
    let api = Arc::new(FakeApi::with_recipes(remote_fixture()));
    api.update_state(|state| state.reads_fail = true);
    let (mut catalog, store) = catalog_with(api);
    recipe_overrides(store).save(&[sample_recipe(60, "Soup", &["Lunch"])])
        .expect("seed local");

    assert_eq!(ids(&catalog.browse("").await), vec![60]);
}

#[tokio::test]
async fn meal_types_union_visible_and_seed_endpoint() {
    let api = Arc::new(FakeApi::with_recipes(remote_fixture()));
    let (mut catalog, _store) = catalog_with(api.clone());
    let visible: Vec<Recipe> = catalog.browse("").await.into_iter().take(2).collect();

    let types = catalog.meal_types(&visible).await;
    assert_eq!(types, vec!["Dinner", "Lunch", "Snack", "Dessert"]);

    api.update_state(|state| state.reads_fail = true);
    assert_eq!(catalog.meal_types(&visible).await, vec!["Dinner", "Lunch"]);
}

#[tokio::test]
async fn add_uses_server_id_when_it_is_free() {
    let api = Arc::new(FakeApi::with_recipes(remote_fixture()));
    let (mut catalog, store) = catalog_with(api);

    let added = catalog.add(draft("Banana Bread")).await.expect("add");
    assert_eq!(added.id, 4);
    assert_eq!(added.user_id, Some(DEFAULT_USER_ID));

    let stored = recipe_overrides(store).load();
    assert_eq!(stored, vec![added]);
}

#[tokio::test]
async fn add_falls_back_to_max_plus_one_when_create_fails() {
    let api = Arc::new(FakeApi::with_recipes(remote_fixture()));
    api.update_state(|state| state.writes_fail = true);
    let (mut catalog, store) = catalog_with(api);
    let overrides = recipe_overrides(store);
    overrides
        .save(&[sample_recipe(9, "Mine", &["Lunch"])])
        .expect("seed local");

    let added = catalog.add(draft("Offline Pie")).await.expect("add");
    assert_eq!(added.id, 10);

    let stored = overrides.load();
    assert_eq!(ids(&stored), vec![9, 10]);
    assert_eq!(stored[1].name.as_deref(), Some("Offline Pie"));
}

#[tokio::test]
async fn add_replaces_colliding_server_id() {
    let api = Arc::new(FakeApi::with_recipes(remote_fixture()));
    api.update_state(|state| state.create_id = Some(4));
    let (mut catalog, _store) = catalog_with(api);

    let first = catalog.add(draft("First")).await.expect("add first");
    let second = catalog.add(draft("Second")).await.expect("add second");
    assert_eq!(first.id, 4);
    assert_eq!(second.id, 5);
}

#[tokio::test]
async fn add_with_everything_offline_uses_local_ids_only() {
    let api = Arc::new(FakeApi::default());
    api.update_state(|state| {
        state.reads_fail = true;
        state.writes_fail = true;
    });
    let (mut catalog, store) = catalog_with(api);

    let added = catalog.add(draft("Solo")).await.expect("add");
    assert_eq!(added.id, 1);
    assert_eq!(recipe_overrides(store).load().len(), 1);
}

#[tokio::test]
async fn add_rejects_invalid_draft_without_touching_storage() {
    let api = Arc::new(FakeApi::with_recipes(remote_fixture()));
    let (mut catalog, store) = catalog_with(api.clone());

    let err = catalog
        .add(RecipeDraft {
            ingredients: vec!["  ".to_string()],
            ..draft("Empty")
        })
        .await
        .expect_err("must reject");
    assert!(matches!(err, AppError::BadRequest(_)));
    assert!(store.get(RECIPES_KEY).expect("get").is_none());
    assert!(api.calls().is_empty());
}

#[tokio::test]
async fn add_keeps_stored_recipes_around_an_unreadable_entry() {
    let api = Arc::new(FakeApi::with_recipes(remote_fixture()));
    let (mut catalog, store) = catalog_with(api);
    store
        .set(
            RECIPES_KEY,
            br#"[{"id":60,"name":"Soup","difficulty":"easy"},{"name":"no id"},{"id":61,"name":"Stew"}]"#,
        )
        .expect("seed raw list");

    let added = catalog.add(draft("New")).await.expect("add");
    assert_eq!(added.id, 4);

    let stored = recipe_overrides(store).load();
    assert_eq!(ids(&stored), vec![60, 61, 4]);
    assert_eq!(stored[0].difficulty, Some(Difficulty::Easy));
    assert_eq!(stored[1].name.as_deref(), Some("Stew"));
}

#[tokio::test]
async fn edit_of_remote_recipe_creates_full_override() {
    let api = Arc::new(FakeApi::with_recipes(remote_fixture()));
    let (mut catalog, store) = catalog_with(api.clone());

    let patch = RecipePatch {
        name: Some("Margherita (thin crust)".to_string()),
        servings: Some(2),
        ..RecipePatch::default()
    };
    let edited = catalog.edit(1, patch).await.expect("edit");
    assert_eq!(edited.name.as_deref(), Some("Margherita (thin crust)"));
    assert_eq!(edited.cuisine.as_deref(), Some("Italian"));

    let stored = recipe_overrides(store).load();
    assert_eq!(stored, vec![edited.clone()]);
    assert!(api.calls().contains(&"update:1".to_string()));

    let browsed = catalog.browse("").await;
    assert_eq!(ids(&browsed), vec![1, 2, 3]);
    assert_eq!(browsed[0], edited);
}

#[tokio::test]
async fn edit_keeps_change_locally_when_update_fails() {
    let api = Arc::new(FakeApi::default());
    api.update_state(|state| state.writes_fail = true);
    let (mut catalog, store) = catalog_with(api);
    let overrides = recipe_overrides(store);
    overrides
        .save(&[sample_recipe(60, "Soup", &["Lunch"])])
        .expect("seed local");

    let patch = RecipePatch {
        meal_type: Some(vec!["Dinner".to_string()]),
        ..RecipePatch::default()
    };
    catalog.edit(60, patch).await.expect("edit");
    let stored = overrides.load();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].meal_tags().collect::<Vec<_>>(), vec!["Dinner"]);
    assert_eq!(stored[0].name.as_deref(), Some("Soup"));
}

#[tokio::test]
async fn edit_reports_missing_and_empty_edits() {
    let api = Arc::new(FakeApi::with_recipes(remote_fixture()));
    let (mut catalog, _store) = catalog_with(api);

    let missing = catalog
        .edit(
            404,
            RecipePatch {
                name: Some("Ghost".to_string()),
                ..RecipePatch::default()
            },
        )
        .await
        .expect_err("missing id");
    assert!(matches!(missing, AppError::NotFound));

    let empty = catalog
        .edit(1, RecipePatch::default())
        .await
        .expect_err("empty patch");
    assert!(matches!(empty, AppError::BadRequest(_)));

    let blank_meals = catalog
        .edit(
            1,
            RecipePatch {
                meal_type: Some(vec!["  ".to_string()]),
                ..RecipePatch::default()
            },
        )
        .await
        .expect_err("blank meal types");
    assert!(matches!(blank_meals, AppError::BadRequest(_)));
}

#[tokio::test]
async fn delete_local_recipe_clears_override_and_favorite() {
    let api = Arc::new(FakeApi::with_recipes(remote_fixture()));
    let (mut catalog, store) = catalog_with(api.clone());
    recipe_overrides(store.clone())
        .save(&[sample_recipe(60, "Soup", &["Lunch"])])
        .expect("seed local");
    favorite_ids(store.clone()).save(&[2, 60]).expect("seed favorites");

    let outcome = catalog.delete(60).await.expect("delete");
    assert_eq!(
        outcome,
        DeleteOutcome {
            id: 60,
            removed_local: true,
            removed_favorite: true,
            remote_deleted: true,
        }
    );
    assert!(recipe_overrides(store.clone()).load().is_empty());
    assert_eq!(favorite_ids(store).load(), vec![2]);
    assert!(api.calls().contains(&"delete:60".to_string()));
}

#[tokio::test]
async fn delete_remote_recipe_only_drops_local_state() {
    let api = Arc::new(FakeApi::with_recipes(remote_fixture()));
    api.update_state(|state| state.writes_fail = true);
    let (mut catalog, store) = catalog_with(api);
    favorite_ids(store.clone()).save(&[1]).expect("seed favorites");

    let outcome = catalog.delete(1).await.expect("delete");
    assert!(!outcome.removed_local);
    assert!(outcome.removed_favorite);
    assert!(!outcome.remote_deleted);
    assert!(store.get(RECIPES_KEY).expect("get").is_none());

    // The stateless service still lists it.
    assert_eq!(ids(&catalog.browse("").await), vec![1, 2, 3]);
}

#[tokio::test]
async fn favorites_short_circuit_when_set_is_empty() {
    let api = Arc::new(FakeApi::with_recipes(remote_fixture()));
    let (mut catalog, _store) = catalog_with(api.clone());

    assert!(catalog.favorites().await.is_empty());
    assert!(api.calls().is_empty());
}

#[tokio::test]
async fn favorites_resolve_in_set_order_with_local_overrides() {
    let api = Arc::new(FakeApi::with_recipes(remote_fixture()));
    let (mut catalog, store) = catalog_with(api);
    let mut renamed = Recipe::new(3);
    renamed.name = Some("Grandma's Cookies".to_string());
    recipe_overrides(store.clone())
        .save(&[renamed, sample_recipe(60, "Soup", &["Lunch"])])
        .expect("seed local");
    favorite_ids(store).save(&[60, 3, 77]).expect("seed favorites");

    let favorites = catalog.favorites().await;
    assert_eq!(ids(&favorites), vec![60, 3]);
    assert_eq!(favorites[1].name.as_deref(), Some("Grandma's Cookies"));
    assert!(favorites[1].meal_type.is_some());
}

#[tokio::test]
async fn toggle_favorite_round_trips_and_notifies_with_full_record() {
    let api = Arc::new(FakeApi::with_recipes(remote_fixture()));
    let (mut catalog, store) = catalog_with(api);

    let on = catalog.toggle_favorite(2).await.expect("favorite");
    assert!(on.is_favorite);
    assert_eq!(on.recipe.name.as_deref(), Some("Vegetarian Stir-Fry"));
    assert!(catalog.is_favorite(2));

    let off = catalog.toggle_favorite(2).await.expect("unfavorite");
    assert!(!off.is_favorite);
    assert!(catalog.favorite_ids().is_empty());
    assert_eq!(store.get(FAVORITES_KEY).expect("get").as_deref(), Some(&b"[]"[..]));
}

#[tokio::test]
async fn toggle_favorite_handles_unknown_and_unreachable_ids() {
    let api = Arc::new(FakeApi::with_recipes(remote_fixture()));
    let (mut catalog, _store) = catalog_with(api.clone());

    let err = catalog.toggle_favorite(404).await.expect_err("unknown id");
    assert!(matches!(err, AppError::NotFound));

    api.update_state(|state| state.reads_fail = true);
    let change = catalog.toggle_favorite(404).await.expect("toggle by id");
    assert!(change.is_favorite);
    assert_eq!(change.recipe, Recipe::new(404));
}

#[tokio::test]
async fn show_prefers_merged_record_and_falls_back_to_local() {
    let api = Arc::new(FakeApi::with_recipes(remote_fixture()));
    let (mut catalog, store) = catalog_with(api.clone());
    recipe_overrides(store)
        .save(&[sample_recipe(60, "Soup", &["Lunch"])])
        .expect("seed local");

    assert_eq!(catalog.show(1).await.expect("remote").id, 1);
    assert!(matches!(catalog.show(99).await, Err(AppError::NotFound)));

    api.update_state(|state| state.reads_fail = true);
    assert_eq!(catalog.show(60).await.expect("local").id, 60);
    assert!(matches!(catalog.show(1).await, Err(AppError::Transport(_))));
}
