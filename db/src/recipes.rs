use chrono::{DateTime, Utc};
use color_eyre::Result;
use serde::{Deserialize, Serialize};
use sqlx::{Executor, Sqlite, SqliteConnection, SqlitePool};

use crate::{
    ingredients::{Ingredient, IngredientWithUnit, NewIngredient},
    notes::RecipeNote,
    recipe_types::RecipeType,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Recipe {
    pub recipe_id: i64,
    pub title: String,
    pub body: String,
    pub recipe_type_id: i64,
    pub created_at: DateTime<Utc>,
}

/// Everything needed to write a recipe, as submitted by the edit form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeDraft {
    pub title: String,
    pub body: String,
    pub recipe_type_id: i64,
    pub ingredients: Vec<NewIngredient>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeWithDetails {
    pub recipe: Recipe,
    pub recipe_type: RecipeType,
    pub ingredients: Vec<IngredientWithUnit>,
    pub notes: Vec<RecipeNote>,
}

impl Recipe {
    #[tracing::instrument(skip(pool, draft), fields(title = %draft.title), err)]
    pub async fn create(pool: &SqlitePool, draft: &RecipeDraft) -> Result<Self> {
        let mut tx = pool.begin().await?;
        let recipe = Self::insert(&mut tx, None, draft, Utc::now()).await?;
        tx.commit().await?;

        Ok(recipe)
    }

    /// Inserts a recipe and its ingredient lines on an open connection.
    ///
    /// A `recipe_id` of `None` lets the store assign the next identifier.
    pub(crate) async fn insert(
        conn: &mut SqliteConnection,
        recipe_id: Option<i64>,
        draft: &RecipeDraft,
        created_at: DateTime<Utc>,
    ) -> Result<Self> {
        let recipe = sqlx::query_as::<_, Recipe>(
            r"
            INSERT INTO recipes (recipe_id, title, body, recipe_type_id, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            RETURNING recipe_id, title, body, recipe_type_id, created_at
            ",
        )
        .bind(recipe_id)
        .bind(&draft.title)
        .bind(&draft.body)
        .bind(draft.recipe_type_id)
        .bind(created_at)
        .fetch_one(&mut *conn)
        .await?;

        Ingredient::replace_for_recipe(conn, recipe.recipe_id, &draft.ingredients).await?;

        Ok(recipe)
    }

    /// Overwrites the recipe's fields and ingredient list. Notes and the
    /// creation time are left alone. Returns `None` when no such recipe exists.
    #[tracing::instrument(skip(pool, draft), err)]
    pub async fn update(
        pool: &SqlitePool,
        recipe_id: i64,
        draft: &RecipeDraft,
    ) -> Result<Option<Self>> {
        let mut tx = pool.begin().await?;

        let updated = sqlx::query_as::<_, Recipe>(
            r"
            UPDATE recipes
            SET title = ?2,
                body = ?3,
                recipe_type_id = ?4
            WHERE recipe_id = ?1
            RETURNING recipe_id, title, body, recipe_type_id, created_at
            ",
        )
        .bind(recipe_id)
        .bind(&draft.title)
        .bind(&draft.body)
        .bind(draft.recipe_type_id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(updated) = updated else {
            return Ok(None);
        };

        Ingredient::replace_for_recipe(&mut tx, recipe_id, &draft.ingredients).await?;
        tx.commit().await?;

        Ok(Some(updated))
    }

    pub async fn get_by_id<'e, E>(executor: E, recipe_id: i64) -> Result<Option<Self>>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let recipe = sqlx::query_as::<_, Recipe>(
            r"
            SELECT recipe_id, title, body, recipe_type_id, created_at
            FROM recipes
            WHERE recipe_id = ?1
            ",
        )
        .bind(recipe_id)
        .fetch_optional(executor)
        .await?;

        Ok(recipe)
    }

    /// Newest recipes first, at most `limit` of them.
    pub async fn recent(pool: &SqlitePool, limit: i64) -> Result<Vec<Self>> {
        let recipes = sqlx::query_as::<_, Recipe>(
            r"
            SELECT recipe_id, title, body, recipe_type_id, created_at
            FROM recipes
            ORDER BY created_at DESC, recipe_id DESC
            LIMIT ?1
            ",
        )
        .bind(limit)
        .fetch_all(pool)
        .await?;

        Ok(recipes)
    }

    pub async fn list_by_type(pool: &SqlitePool, recipe_type_id: i64) -> Result<Vec<Self>> {
        let recipes = sqlx::query_as::<_, Recipe>(
            r"
            SELECT recipe_id, title, body, recipe_type_id, created_at
            FROM recipes
            WHERE recipe_type_id = ?1
            ORDER BY created_at DESC, recipe_id DESC
            ",
        )
        .bind(recipe_type_id)
        .fetch_all(pool)
        .await?;

        Ok(recipes)
    }

    /// Oldest first, the order recipes are written out in an export.
    pub async fn list_oldest_first(pool: &SqlitePool) -> Result<Vec<Self>> {
        let recipes = sqlx::query_as::<_, Recipe>(
            r"
            SELECT recipe_id, title, body, recipe_type_id, created_at
            FROM recipes
            ORDER BY created_at, recipe_id
            ",
        )
        .fetch_all(pool)
        .await?;

        Ok(recipes)
    }

    pub async fn random(pool: &SqlitePool) -> Result<Option<Self>> {
        let recipe = sqlx::query_as::<_, Recipe>(
            r"
            SELECT recipe_id, title, body, recipe_type_id, created_at
            FROM recipes
            ORDER BY RANDOM()
            LIMIT 1
            ",
        )
        .fetch_optional(pool)
        .await?;

        Ok(recipe)
    }

    pub async fn count(pool: &SqlitePool) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM recipes")
            .fetch_one(pool)
            .await?;

        Ok(count)
    }

    pub async fn get_full(pool: &SqlitePool, recipe_id: i64) -> Result<Option<RecipeWithDetails>> {
        let recipe = Self::get_by_id(pool, recipe_id).await?;

        if let Some(recipe) = recipe {
            Ok(Some(recipe.with_details(pool).await?))
        } else {
            Ok(None)
        }
    }

    pub async fn with_details(self, pool: &SqlitePool) -> Result<RecipeWithDetails> {
        let recipe_type = RecipeType::get_by_id(pool, self.recipe_type_id)
            .await?
            .ok_or_else(|| {
                color_eyre::eyre::eyre!(
                    "Recipe {} points at missing recipe type {}",
                    self.recipe_id,
                    self.recipe_type_id
                )
            })?;
        let ingredients = Ingredient::get_by_recipe(pool, self.recipe_id).await?;
        let notes = RecipeNote::get_by_recipe(pool, self.recipe_id).await?;

        Ok(RecipeWithDetails {
            recipe: self,
            recipe_type,
            ingredients,
            notes,
        })
    }
}
