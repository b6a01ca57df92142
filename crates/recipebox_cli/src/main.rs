//! Command-line client for RecipeBox.

mod api;

use anyhow::{Context, Result};
use api::HttpRecipeApi;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use recipebox_core::config::expand_tilde;
use recipebox_core::filter::{apply_filters, meal_type_choices, MealSelection};
use recipebox_core::models::recipe::{Recipe, RecipeDraft, RecipeId, RecipePatch};
use recipebox_core::{
    open_store, Catalog, Config, DeleteOutcome, FavoriteChange, OfflineApi, RecipeApi,
};
use serde_json::json;
use std::io::{self, Read};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "recipebox", about = "RecipeBox CLI", version)]
struct Cli {
    /// Recipe service URL (can also be set via RECIPEBOX_API_URL env var)
    #[arg(short, long, env = "RECIPEBOX_API_URL")]
    server: Option<String>,

    /// Local store directory (overrides RECIPEBOX_STORE_PATH)
    #[arg(long, global = true)]
    store: Option<String>,

    /// Skip the recipe service and work from local data only
    #[arg(long, global = true)]
    offline: bool,

    /// Output in JSON format
    #[arg(short, long, global = true)]
    json: bool,

    /// Request timeout in seconds (overrides RECIPEBOX_TIMEOUT_SECS)
    #[arg(short = 't', long)]
    timeout: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
    /// List recipes, optionally narrowed by a query and meal types
    List {
        #[arg(short, long)]
        query: Option<String>,
        /// Keep recipes tagged with this meal type (repeatable)
        #[arg(short, long = "meal")]
        meals: Vec<String>,
    },
    /// Search recipes by name, cuisine, tag, meal type or ingredient
    Search {
        query: String,
        #[arg(short, long = "meal")]
        meals: Vec<String>,
    },
    /// List favorite recipes
    Favorites {
        #[arg(short, long = "meal")]
        meals: Vec<String>,
    },
    /// Show one recipe
    Show { id: RecipeId },
    /// Add a recipe from a JSON draft (`-` reads stdin)
    Add {
        #[arg(short, long)]
        file: String,
    },
    /// Edit a recipe with a JSON patch (`-` reads stdin)
    Edit {
        id: RecipeId,
        #[arg(short, long)]
        file: String,
    },
    /// Delete a recipe
    Delete { id: RecipeId },
    /// Toggle a recipe's favorite flag
    Fav { id: RecipeId },
    /// List the meal types available for filtering
    MealTypes {
        #[arg(short, long)]
        query: Option<String>,
    },
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "recipebox=info,recipebox_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

fn explicit_override(value: Option<String>) -> Option<String> {
    value.and_then(|value| {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

/// Apply command-line overrides on top of the environment configuration.
fn apply_overrides(
    mut config: Config,
    server: Option<String>,
    store: Option<String>,
    timeout: Option<u64>,
    offline: bool,
) -> Config {
    if let Some(server) = explicit_override(server) {
        config.api_url = server;
    }
    if let Some(store) = explicit_override(store) {
        config.store_path = expand_tilde(store);
    }
    if let Some(timeout) = timeout {
        config.timeout_secs = timeout;
    }
    config.offline |= offline;
    config
}

fn build_api(config: &Config) -> Result<Arc<dyn RecipeApi>> {
    if config.offline {
        tracing::info!("offline mode: recipe service bypassed");
        return Ok(Arc::new(OfflineApi));
    }
    let api = HttpRecipeApi::new(&config.api_url, Duration::from_secs(config.timeout_secs))?;
    tracing::debug!(server = api.server(), "using recipe service");
    Ok(Arc::new(api))
}

fn read_input(path: &str) -> Result<String> {
    if path == "-" {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .context("reading stdin")?;
        return Ok(buffer);
    }
    std::fs::read_to_string(path).with_context(|| format!("reading {}", path))
}

fn completions_script(shell: Shell) -> String {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    let mut buffer = Vec::new();
    generate(shell, &mut cmd, name, &mut buffer);
    String::from_utf8_lossy(&buffer).into_owned()
}

fn recipe_row(recipe: &Recipe, is_favorite: bool) -> String {
    let marker = if is_favorite { "*" } else { " " };
    let meals = recipe
        .meal_type
        .as_ref()
        .map(ToString::to_string)
        .unwrap_or_default();
    let row = format!(
        "{:>5} {} {:<36} {:<14} {}",
        recipe.id,
        marker,
        recipe.display_name(),
        recipe.cuisine.as_deref().unwrap_or("-"),
        meals
    );
    row.trim_end().to_string()
}

fn format_recipe_rows(
    recipes: &[Recipe],
    favorites: &[RecipeId],
    json: bool,
) -> Result<String, serde_json::Error> {
    if json {
        return serde_json::to_string_pretty(recipes);
    }
    let rows: Vec<String> = recipes
        .iter()
        .map(|recipe| recipe_row(recipe, favorites.contains(&recipe.id)))
        .collect();
    Ok(rows.join("\n"))
}

fn format_recipe_detail(
    recipe: &Recipe,
    is_favorite: bool,
    json: bool,
) -> Result<String, serde_json::Error> {
    if json {
        return serde_json::to_string_pretty(recipe);
    }

    let mut lines = vec![format!(
        "#{} {}{}",
        recipe.id,
        recipe.display_name(),
        if is_favorite { " *" } else { "" }
    )];
    if let Some(cuisine) = &recipe.cuisine {
        lines.push(format!("Cuisine: {}", cuisine));
    }
    if let Some(difficulty) = &recipe.difficulty {
        lines.push(format!("Difficulty: {}", difficulty));
    }
    if let Some(meal_type) = &recipe.meal_type {
        lines.push(format!("Meal type: {}", meal_type));
    }

    let timings: Vec<String> = [
        ("Prep", recipe.prep_time_minutes, " min"),
        ("Cook", recipe.cook_time_minutes, " min"),
        ("Servings", recipe.servings, ""),
        ("Calories/serving", recipe.calories_per_serving, ""),
    ]
    .into_iter()
    .filter_map(|(label, value, unit)| value.map(|value| format!("{}: {}{}", label, value, unit)))
    .collect();
    if !timings.is_empty() {
        lines.push(timings.join("  "));
    }

    if let Some(rating) = recipe.rating {
        match recipe.review_count {
            Some(count) => lines.push(format!("Rating: {:.1} ({} reviews)", rating, count)),
            None => lines.push(format!("Rating: {:.1}", rating)),
        }
    }
    if let Some(tags) = recipe.tags.as_ref().filter(|tags| !tags.is_empty()) {
        lines.push(format!("Tags: {}", tags.join(", ")));
    }
    if let Some(ingredients) = &recipe.ingredients {
        lines.push(String::new());
        lines.push("Ingredients:".to_string());
        lines.extend(ingredients.iter().map(|item| format!("  - {}", item)));
    }
    if let Some(instructions) = &recipe.instructions {
        lines.push(String::new());
        lines.push("Instructions:".to_string());
        lines.extend(
            instructions
                .iter()
                .enumerate()
                .map(|(index, step)| format!("  {}. {}", index + 1, step)),
        );
    }
    Ok(lines.join("\n"))
}

fn format_delete_output(outcome: &DeleteOutcome, json: bool) -> Result<String, serde_json::Error> {
    if json {
        return serde_json::to_string_pretty(&json!({
            "id": outcome.id,
            "removedLocal": outcome.removed_local,
            "removedFavorite": outcome.removed_favorite,
            "remoteDeleted": outcome.remote_deleted,
        }));
    }

    let mut line = format!("Deleted recipe: {}", outcome.id);
    if !outcome.remote_deleted {
        line.push_str(" (recipe service did not confirm)");
    }
    Ok(line)
}

fn format_favorite_output(change: &FavoriteChange, json: bool) -> Result<String, serde_json::Error> {
    if json {
        return serde_json::to_string_pretty(&json!({
            "id": change.id,
            "isFavorite": change.is_favorite,
            "recipe": change.recipe,
        }));
    }

    let verb = if change.is_favorite {
        "Favorited"
    } else {
        "Unfavorited"
    };
    Ok(format!("{}: {} ({})", verb, change.recipe.display_name(), change.id))
}

fn format_meal_types(types: &[String], json: bool) -> Result<String, serde_json::Error> {
    if json {
        return serde_json::to_string_pretty(types);
    }
    Ok(types.join("\n"))
}

fn narrow(recipes: Vec<Recipe>, meals: Vec<String>) -> Vec<Recipe> {
    let selection = MealSelection::from_tags(meals);
    if selection.is_empty() {
        return recipes;
    }
    apply_filters(&recipes, &selection)
}

async fn run(catalog: &mut Catalog, command: Commands, json: bool) -> Result<String> {
    let output = match command {
        Commands::Completions { shell } => completions_script(shell),
        Commands::List { query, meals } => {
            let recipes = narrow(catalog.browse(query.as_deref().unwrap_or("")).await, meals);
            format_recipe_rows(&recipes, &catalog.favorite_ids(), json)?
        }
        Commands::Search { query, meals } => {
            let recipes = narrow(catalog.browse(&query).await, meals);
            format_recipe_rows(&recipes, &catalog.favorite_ids(), json)?
        }
        Commands::Favorites { meals } => {
            let recipes = narrow(catalog.favorites().await, meals);
            format_recipe_rows(&recipes, &catalog.favorite_ids(), json)?
        }
        Commands::Show { id } => {
            let recipe = catalog
                .show(id)
                .await
                .with_context(|| format!("showing recipe {}", id))?;
            format_recipe_detail(&recipe, catalog.is_favorite(id), json)?
        }
        Commands::Add { file } => {
            let input = read_input(&file)?;
            let draft: RecipeDraft =
                serde_json::from_str(&input).context("parsing recipe draft JSON")?;
            let recipe = catalog.add(draft).await.context("adding recipe")?;
            if json {
                serde_json::to_string_pretty(&recipe)?
            } else {
                format!("Added recipe: {} ({})", recipe.display_name(), recipe.id)
            }
        }
        Commands::Edit { id, file } => {
            let input = read_input(&file)?;
            let patch: RecipePatch =
                serde_json::from_str(&input).context("parsing recipe patch JSON")?;
            let recipe = catalog
                .edit(id, patch)
                .await
                .with_context(|| format!("editing recipe {}", id))?;
            if json {
                serde_json::to_string_pretty(&recipe)?
            } else {
                format!("Updated recipe: {} ({})", recipe.display_name(), recipe.id)
            }
        }
        Commands::Delete { id } => {
            let outcome = catalog
                .delete(id)
                .await
                .with_context(|| format!("deleting recipe {}", id))?;
            format_delete_output(&outcome, json)?
        }
        Commands::Fav { id } => {
            let change = catalog
                .toggle_favorite(id)
                .await
                .with_context(|| format!("toggling favorite for recipe {}", id))?;
            format_favorite_output(&change, json)?
        }
        Commands::MealTypes { query } => {
            let visible = catalog.browse(query.as_deref().unwrap_or("")).await;
            let types = catalog.meal_types(&visible).await;
            format_meal_types(&meal_type_choices(&types), json)?
        }
    };
    Ok(output)
}

#[tokio::main]
async fn main() -> Result<()> {
    let Cli {
        server,
        store,
        offline,
        json,
        timeout,
        command,
    } = Cli::parse();

    if let Commands::Completions { shell } = &command {
        print!("{}", completions_script(*shell));
        return Ok(());
    }

    init_tracing();

    let config = apply_overrides(Config::from_env(), server, store, timeout, offline);
    let store = open_store(&config)
        .with_context(|| format!("opening local store at {}", config.store_path))?;
    let api = build_api(&config)?;
    let mut catalog = Catalog::new(api, store).with_user_id(config.user_id);

    let output = run(&mut catalog, command, json).await?;
    if !output.is_empty() {
        println!("{}", output);
    }
    Ok(())
}
