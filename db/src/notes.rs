use chrono::{DateTime, Utc};
use color_eyre::Result;
use serde::{Deserialize, Serialize};
use sqlx::{Executor, Sqlite};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct RecipeNote {
    pub recipe_note_id: i64,
    pub recipe_id: i64,
    pub note_text: String,
    pub created_at: DateTime<Utc>,
}

impl RecipeNote {
    pub async fn create<'e, E>(executor: E, recipe_id: i64, note_text: &str) -> Result<Self>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        Self::create_at(executor, recipe_id, note_text, Utc::now()).await
    }

    pub async fn create_at<'e, E>(
        executor: E,
        recipe_id: i64,
        note_text: &str,
        created_at: DateTime<Utc>,
    ) -> Result<Self>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let note = sqlx::query_as::<_, RecipeNote>(
            r"
            INSERT INTO recipe_notes (recipe_id, note_text, created_at)
            VALUES (?1, ?2, ?3)
            RETURNING recipe_note_id, recipe_id, note_text, created_at
            ",
        )
        .bind(recipe_id)
        .bind(note_text)
        .bind(created_at)
        .fetch_one(executor)
        .await?;

        Ok(note)
    }

    pub async fn get_by_recipe<'e, E>(executor: E, recipe_id: i64) -> Result<Vec<Self>>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let notes = sqlx::query_as::<_, RecipeNote>(
            r"
            SELECT recipe_note_id, recipe_id, note_text, created_at
            FROM recipe_notes
            WHERE recipe_id = ?1
            ORDER BY created_at, recipe_note_id
            ",
        )
        .bind(recipe_id)
        .fetch_all(executor)
        .await?;

        Ok(notes)
    }
}
