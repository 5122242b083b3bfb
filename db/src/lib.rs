use std::str::FromStr;

use color_eyre::{eyre::WrapErr, Result};
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    SqliteConnection,
};

pub mod ingredients;
pub mod notes;
pub mod recipe_types;
pub mod recipes;
pub mod seed;
pub mod transfer;
pub mod units;

pub use ingredients::{Ingredient, IngredientWithUnit, NewIngredient};
pub use notes::RecipeNote;
pub use recipe_types::RecipeType;
pub use recipes::{Recipe, RecipeDraft, RecipeWithDetails};
pub use units::IngredientUnit;

pub use sqlx;
pub use sqlx::SqlitePool;

pub const DEFAULT_DATABASE_URL: &str = "sqlite://margin.db";

#[tracing::instrument(err)]
pub async fn setup_db_pool(database_url: &str) -> Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str(database_url)
        .wrap_err_with(|| format!("Invalid DATABASE_URL {database_url}"))?
        .create_if_missing(true)
        .foreign_keys(true);

    // Every connection to `sqlite::memory:` is its own database
    let max_connections = if database_url.contains(":memory:") {
        1
    } else {
        5
    };

    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect_with(options)
        .await
        .wrap_err("Failed to open the recipe database")?;

    sqlx::migrate!()
        .run(&pool)
        .await
        .wrap_err("Failed to run migrations")?;
    tracing::info!("Migrations applied");

    Ok(pool)
}

/// Deletes every row in the catalog, children first.
///
/// Tables use plain `INTEGER PRIMARY KEY`s so identifiers start again from 1
/// once a table is empty.
pub(crate) async fn clear_all(conn: &mut SqliteConnection) -> Result<(), sqlx::Error> {
    for table in [
        "recipe_notes",
        "ingredients",
        "recipes",
        "recipe_types",
        "ingredient_units",
    ] {
        sqlx::query(&format!("DELETE FROM {table}"))
            .execute(&mut *conn)
            .await?;
    }

    Ok(())
}
