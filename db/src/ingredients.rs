use color_eyre::Result;
use serde::{Deserialize, Serialize};
use sqlx::{Executor, Sqlite, SqliteConnection};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Ingredient {
    pub ingredient_id: i64,
    pub recipe_id: i64,
    pub position: i64,
    pub quantity: f64,
    pub ingredient_unit_id: i64,
    pub name: String,
}

/// An ingredient line joined with the unit it is measured in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct IngredientWithUnit {
    #[sqlx(flatten)]
    pub ingredient: Ingredient,
    pub unit_name: String,
    pub unit_abbreviation: Option<String>,
}

impl IngredientWithUnit {
    pub fn unit_label(&self) -> &str {
        self.unit_abbreviation.as_deref().unwrap_or(&self.unit_name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewIngredient {
    pub quantity: f64,
    pub ingredient_unit_id: i64,
    pub name: String,
}

impl Ingredient {
    pub async fn get_by_recipe<'e, E>(
        executor: E,
        recipe_id: i64,
    ) -> Result<Vec<IngredientWithUnit>>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let ingredients = sqlx::query_as::<_, IngredientWithUnit>(
            r"
            SELECT
                ingredients.ingredient_id,
                ingredients.recipe_id,
                ingredients.position,
                ingredients.quantity,
                ingredients.ingredient_unit_id,
                ingredients.name,
                ingredient_units.name AS unit_name,
                ingredient_units.abbreviation AS unit_abbreviation
            FROM ingredients
            JOIN ingredient_units USING (ingredient_unit_id)
            WHERE ingredients.recipe_id = ?1
            ORDER BY ingredients.position
            ",
        )
        .bind(recipe_id)
        .fetch_all(executor)
        .await?;

        Ok(ingredients)
    }

    /// Replaces the whole ingredient list of a recipe, numbering lines in order.
    pub async fn replace_for_recipe(
        conn: &mut SqliteConnection,
        recipe_id: i64,
        ingredients: &[NewIngredient],
    ) -> Result<Vec<Ingredient>> {
        sqlx::query("DELETE FROM ingredients WHERE recipe_id = ?1")
            .bind(recipe_id)
            .execute(&mut *conn)
            .await?;

        let mut inserted = Vec::with_capacity(ingredients.len());
        for (position, ingredient) in (0_i64..).zip(ingredients) {
            let row = sqlx::query_as::<_, Ingredient>(
                r"
                INSERT INTO ingredients (recipe_id, position, quantity, ingredient_unit_id, name)
                VALUES (?1, ?2, ?3, ?4, ?5)
                RETURNING ingredient_id, recipe_id, position, quantity, ingredient_unit_id, name
                ",
            )
            .bind(recipe_id)
            .bind(position)
            .bind(ingredient.quantity)
            .bind(ingredient.ingredient_unit_id)
            .bind(&ingredient.name)
            .fetch_one(&mut *conn)
            .await?;

            inserted.push(row);
        }

        Ok(inserted)
    }
}
