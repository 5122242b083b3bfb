use color_eyre::Result;
use serde::{Deserialize, Serialize};
use sqlx::{Executor, Sqlite};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct RecipeType {
    pub recipe_type_id: i64,
    pub name: String,
}

impl RecipeType {
    pub async fn create<'e, E>(executor: E, name: &str) -> Result<Self>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let recipe_type = sqlx::query_as::<_, RecipeType>(
            r"
            INSERT INTO recipe_types (name)
            VALUES (?1)
            RETURNING recipe_type_id, name
            ",
        )
        .bind(name)
        .fetch_one(executor)
        .await?;

        Ok(recipe_type)
    }

    /// Returns the type with this name, creating it when missing.
    pub async fn find_or_create<'e, E>(executor: E, name: &str) -> Result<Self>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let recipe_type = sqlx::query_as::<_, RecipeType>(
            r"
            INSERT INTO recipe_types (name)
            VALUES (?1)
            ON CONFLICT (name) DO UPDATE SET name = excluded.name
            RETURNING recipe_type_id, name
            ",
        )
        .bind(name)
        .fetch_one(executor)
        .await?;

        Ok(recipe_type)
    }

    pub async fn get_by_id<'e, E>(executor: E, recipe_type_id: i64) -> Result<Option<Self>>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let recipe_type = sqlx::query_as::<_, RecipeType>(
            r"
            SELECT recipe_type_id, name
            FROM recipe_types
            WHERE recipe_type_id = ?1
            ",
        )
        .bind(recipe_type_id)
        .fetch_optional(executor)
        .await?;

        Ok(recipe_type)
    }

    pub async fn list<'e, E>(executor: E) -> Result<Vec<Self>>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let recipe_types = sqlx::query_as::<_, RecipeType>(
            r"
            SELECT recipe_type_id, name
            FROM recipe_types
            ORDER BY name
            ",
        )
        .fetch_all(executor)
        .await?;

        Ok(recipe_types)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::SqlitePool;

    #[sqlx::test(migrations = "./migrations")]
    async fn test_find_or_create_reuses_existing_type(pool: SqlitePool) {
        let created = RecipeType::create(&pool, "Dessert").await.unwrap();
        let found = RecipeType::find_or_create(&pool, "Dessert").await.unwrap();

        assert_eq!(created, found);
        assert_eq!(RecipeType::list(&pool).await.unwrap().len(), 1);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_list_is_sorted_by_name(pool: SqlitePool) {
        RecipeType::create(&pool, "Soup").await.unwrap();
        RecipeType::create(&pool, "Breakfast").await.unwrap();

        let names: Vec<String> = RecipeType::list(&pool)
            .await
            .unwrap()
            .into_iter()
            .map(|t| t.name)
            .collect();

        assert_eq!(names, vec!["Breakfast", "Soup"]);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_get_by_id_missing(pool: SqlitePool) {
        assert!(RecipeType::get_by_id(&pool, 42).await.unwrap().is_none());
    }
}
