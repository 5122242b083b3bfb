use chrono::Utc;
use color_eyre::Result;
use indoc::indoc;
use sqlx::SqlitePool;

use crate::{
    clear_all, ingredients::NewIngredient, notes::RecipeNote, recipe_types::RecipeType,
    recipes::RecipeDraft, units::IngredientUnit, Recipe,
};

const RECIPE_TYPES: &[&str] = &["Breakfast", "Main", "Side", "Dessert", "Drink"];

const UNITS: &[(&str, Option<&str>)] = &[
    ("cup", Some("c")),
    ("tablespoon", Some("tbsp")),
    ("teaspoon", Some("tsp")),
    ("gram", Some("g")),
    ("millilitre", Some("ml")),
    ("whole", None),
];

const PANCAKES_BODY: &str = indoc! {"
    Whisk the dry ingredients together in a large bowl.

    Beat the egg into the buttermilk, then stir in the melted butter. Pour the
    wet ingredients into the dry ones and mix until just combined. A few lumps
    are fine.

    Cook on a hot, lightly buttered griddle, about a quarter cup of batter per
    pancake. Flip when bubbles form on the surface.
"};

/// Wipes the catalog and loads the starter fixtures.
///
/// The starter recipe is always recipe 1.
#[tracing::instrument(skip(pool), err)]
pub async fn reset(pool: &SqlitePool) -> Result<()> {
    let mut tx = pool.begin().await?;
    clear_all(&mut tx).await?;

    let mut breakfast = None;
    for name in RECIPE_TYPES {
        let recipe_type = RecipeType::create(&mut *tx, name).await?;
        if *name == "Breakfast" {
            breakfast = Some(recipe_type);
        }
    }
    let breakfast = breakfast.ok_or_else(|| color_eyre::eyre::eyre!("Missing breakfast type"))?;

    let mut units = vec![];
    for (name, abbreviation) in UNITS {
        units.push(IngredientUnit::create(&mut *tx, name, *abbreviation).await?);
    }
    let unit_id = |name: &str| {
        units
            .iter()
            .find(|u| u.name == name)
            .map(|u| u.ingredient_unit_id)
            .ok_or_else(|| color_eyre::eyre::eyre!("Missing fixture unit {name}"))
    };

    let line = |quantity: f64, unit: &str, name: &str| -> Result<NewIngredient> {
        Ok(NewIngredient {
            quantity,
            ingredient_unit_id: unit_id(unit)?,
            name: name.to_string(),
        })
    };

    let pancakes = RecipeDraft {
        title: "Buttermilk Pancakes".to_string(),
        body: PANCAKES_BODY.to_string(),
        recipe_type_id: breakfast.recipe_type_id,
        ingredients: vec![
            line(2.0, "cup", "all-purpose flour")?,
            line(2.0, "tablespoon", "sugar")?,
            line(2.0, "teaspoon", "baking powder")?,
            line(0.5, "teaspoon", "salt")?,
            line(2.0, "cup", "buttermilk")?,
            line(1.0, "whole", "egg")?,
            line(3.0, "tablespoon", "melted butter")?,
        ],
    };
    let recipe = Recipe::insert(&mut tx, Some(1), &pancakes, Utc::now()).await?;

    RecipeNote::create(
        &mut *tx,
        recipe.recipe_id,
        "Let the batter rest for five minutes before cooking.",
    )
    .await?;

    tx.commit().await?;
    tracing::info!("Catalog reset to starter fixtures");

    Ok(())
}
