use color_eyre::Result;
use serde::{Deserialize, Serialize};
use sqlx::{Executor, Sqlite};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct IngredientUnit {
    pub ingredient_unit_id: i64,
    pub name: String,
    pub abbreviation: Option<String>,
}

impl IngredientUnit {
    pub async fn create<'e, E>(executor: E, name: &str, abbreviation: Option<&str>) -> Result<Self>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let unit = sqlx::query_as::<_, IngredientUnit>(
            r"
            INSERT INTO ingredient_units (name, abbreviation)
            VALUES (?1, ?2)
            RETURNING ingredient_unit_id, name, abbreviation
            ",
        )
        .bind(name)
        .bind(abbreviation)
        .fetch_one(executor)
        .await?;

        Ok(unit)
    }

    /// Inserts a unit keeping its identifier, used when restoring an export.
    pub async fn insert<'e, E>(&self, executor: E) -> Result<()>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        sqlx::query(
            r"
            INSERT INTO ingredient_units (ingredient_unit_id, name, abbreviation)
            VALUES (?1, ?2, ?3)
            ",
        )
        .bind(self.ingredient_unit_id)
        .bind(&self.name)
        .bind(&self.abbreviation)
        .execute(executor)
        .await?;

        Ok(())
    }

    pub async fn list<'e, E>(executor: E) -> Result<Vec<Self>>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let units = sqlx::query_as::<_, IngredientUnit>(
            r"
            SELECT ingredient_unit_id, name, abbreviation
            FROM ingredient_units
            ORDER BY ingredient_unit_id
            ",
        )
        .fetch_all(executor)
        .await?;

        Ok(units)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::SqlitePool;

    #[sqlx::test(migrations = "./migrations")]
    async fn test_insert_keeps_identifier(pool: SqlitePool) {
        let unit = IngredientUnit {
            ingredient_unit_id: 17,
            name: "pinch".to_string(),
            abbreviation: None,
        };
        unit.insert(&pool).await.unwrap();

        let found = IngredientUnit::list(&pool).await.unwrap();
        assert_eq!(found, vec![unit]);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_unit_names_are_unique(pool: SqlitePool) {
        IngredientUnit::create(&pool, "cup", Some("c")).await.unwrap();

        let duplicate = IngredientUnit::create(&pool, "cup", None).await;
        assert!(duplicate.is_err());
    }
}
