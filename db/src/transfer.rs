//! Whole-catalog export and import.
//!
//! The document is a two element JSON array, `[units, recipes]`. Units come
//! first because ingredient lines refer to them by `ingredient_unit_id`.
//! Recipes carry their type by name and their ingredients and notes by value.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use crate::{
    clear_all, ingredients::NewIngredient, notes::RecipeNote, recipe_types::RecipeType,
    recipes::RecipeDraft, units::IngredientUnit, Recipe,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportedUnit {
    pub ingredient_unit_id: i64,
    pub name: String,
    #[serde(default)]
    pub abbreviation: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportedIngredient {
    pub quantity: f64,
    pub ingredient_unit_id: i64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportedNote {
    pub note_text: String,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportedRecipe {
    #[serde(default)]
    pub recipe_id: Option<i64>,
    pub title: String,
    #[serde(default)]
    pub body: String,
    pub recipe_type: String,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub ingredients: Vec<ExportedIngredient>,
    #[serde(default)]
    pub notes: Vec<ExportedNote>,
}

/// The export document. Serializes as `[[unit, ...], [recipe, ...]]`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogExport(pub Vec<ExportedUnit>, pub Vec<ExportedRecipe>);

impl CatalogExport {
    pub fn units(&self) -> &[ExportedUnit] {
        &self.0
    }

    pub fn recipes(&self) -> &[ExportedRecipe] {
        &self.1
    }

    pub fn from_json(bytes: &[u8]) -> Result<Self, TransferError> {
        Ok(serde_json::from_slice(bytes)?)
    }

    pub fn to_json(&self) -> Result<Vec<u8>, TransferError> {
        Ok(serde_json::to_vec_pretty(self)?)
    }

    /// Checks the references inside the document before anything is written.
    pub fn validate(&self) -> Result<(), TransferError> {
        let mut unit_ids = HashSet::new();
        let mut unit_names = HashSet::new();
        for unit in self.units() {
            if !unit_ids.insert(unit.ingredient_unit_id) {
                return Err(TransferError::DuplicateUnit(unit.ingredient_unit_id));
            }
            if !unit_names.insert(unit.name.as_str()) {
                return Err(TransferError::DuplicateUnitName(unit.name.clone()));
            }
        }

        let mut recipe_ids = HashSet::new();
        for recipe in self.recipes() {
            if recipe.title.trim().is_empty() {
                return Err(TransferError::Invalid(
                    "every recipe needs a title".to_string(),
                ));
            }

            if let Some(recipe_id) = recipe.recipe_id {
                if !recipe_ids.insert(recipe_id) {
                    return Err(TransferError::DuplicateRecipe(recipe_id));
                }
            }

            if let Some(bad) = recipe
                .ingredients
                .iter()
                .find(|i| !i.quantity.is_finite() || i.quantity < 0.0)
            {
                return Err(TransferError::Invalid(format!(
                    "{} in {:?} has quantity {}, quantities must be zero or more",
                    bad.name, recipe.title, bad.quantity
                )));
            }

            if let Some(missing) = recipe
                .ingredients
                .iter()
                .find(|i| !unit_ids.contains(&i.ingredient_unit_id))
            {
                return Err(TransferError::UnknownUnit {
                    recipe: recipe.title.clone(),
                    ingredient_unit_id: missing.ingredient_unit_id,
                });
            }
        }

        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TransferError {
    #[error("import file is not a [units, recipes] document: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("recipe {recipe:?} uses ingredient unit {ingredient_unit_id}, which the file does not define")]
    UnknownUnit {
        recipe: String,
        ingredient_unit_id: i64,
    },
    #[error("ingredient unit {0} is defined more than once")]
    DuplicateUnit(i64),
    #[error("ingredient unit name {0:?} is used more than once")]
    DuplicateUnitName(String),
    #[error("recipe {0} appears more than once")]
    DuplicateRecipe(i64),
    #[error("invalid import file: {0}")]
    Invalid(String),
    #[error("storage failure during transfer: {0}")]
    Storage(Box<dyn std::error::Error + Send + Sync + 'static>),
}

impl TransferError {
    /// True when the payload itself is at fault rather than the store.
    pub fn is_validation(&self) -> bool {
        !matches!(self, TransferError::Storage(_))
    }
}

impl From<sqlx::Error> for TransferError {
    fn from(e: sqlx::Error) -> Self {
        Self::Storage(e.into())
    }
}

impl From<color_eyre::Report> for TransferError {
    fn from(e: color_eyre::Report) -> Self {
        Self::Storage(e.into())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    pub units: usize,
    pub recipe_types: usize,
    pub recipes: usize,
}

#[tracing::instrument(skip(pool), err)]
pub async fn export_catalog(pool: &SqlitePool) -> Result<CatalogExport, TransferError> {
    let units = IngredientUnit::list(pool)
        .await?
        .into_iter()
        .map(|u| ExportedUnit {
            ingredient_unit_id: u.ingredient_unit_id,
            name: u.name,
            abbreviation: u.abbreviation,
        })
        .collect::<Vec<_>>();

    let mut recipes = vec![];
    for recipe in Recipe::list_oldest_first(pool).await? {
        let details = recipe.with_details(pool).await?;

        recipes.push(ExportedRecipe {
            recipe_id: Some(details.recipe.recipe_id),
            title: details.recipe.title,
            body: details.recipe.body,
            recipe_type: details.recipe_type.name,
            created_at: details.recipe.created_at,
            ingredients: details
                .ingredients
                .into_iter()
                .map(|line| ExportedIngredient {
                    quantity: line.ingredient.quantity,
                    ingredient_unit_id: line.ingredient.ingredient_unit_id,
                    name: line.ingredient.name,
                })
                .collect(),
            notes: details
                .notes
                .into_iter()
                .map(|n| ExportedNote {
                    note_text: n.note_text,
                    created_at: n.created_at,
                })
                .collect(),
        });
    }

    tracing::info!(
        units = units.len(),
        recipes = recipes.len(),
        "Exported catalog"
    );

    Ok(CatalogExport(units, recipes))
}

/// Replaces the whole catalog with the contents of `export`.
///
/// Runs in a single transaction: if any part of the document cannot be
/// written, the catalog is left exactly as it was.
#[tracing::instrument(skip(pool, export), err)]
pub async fn import_catalog(
    pool: &SqlitePool,
    export: &CatalogExport,
) -> Result<ImportSummary, TransferError> {
    export.validate()?;

    let mut tx = pool.begin().await?;
    clear_all(&mut tx).await?;

    for unit in export.units() {
        tracing::debug!(unit = unit.name, "Importing unit");

        IngredientUnit {
            ingredient_unit_id: unit.ingredient_unit_id,
            name: unit.name.clone(),
            abbreviation: unit.abbreviation.clone(),
        }
        .insert(&mut *tx)
        .await?;
    }

    // Recipes that keep their identifier go first so that the ones without
    // one can't be handed an identifier that is claimed later in the file.
    let (with_ids, without_ids): (Vec<_>, Vec<_>) = export
        .recipes()
        .iter()
        .partition(|r| r.recipe_id.is_some());

    let mut recipe_type_names = HashSet::new();
    for recipe in with_ids.into_iter().chain(without_ids) {
        tracing::debug!(title = recipe.title, "Importing recipe");

        let recipe_type = RecipeType::find_or_create(&mut *tx, &recipe.recipe_type).await?;
        recipe_type_names.insert(recipe_type.name);

        let draft = RecipeDraft {
            title: recipe.title.clone(),
            body: recipe.body.clone(),
            recipe_type_id: recipe_type.recipe_type_id,
            ingredients: recipe
                .ingredients
                .iter()
                .map(|i| NewIngredient {
                    quantity: i.quantity,
                    ingredient_unit_id: i.ingredient_unit_id,
                    name: i.name.clone(),
                })
                .collect(),
        };
        let stored = Recipe::insert(&mut tx, recipe.recipe_id, &draft, recipe.created_at).await?;

        for note in &recipe.notes {
            RecipeNote::create_at(&mut *tx, stored.recipe_id, &note.note_text, note.created_at)
                .await?;
        }
    }

    tx.commit().await?;

    let summary = ImportSummary {
        units: export.units().len(),
        recipe_types: recipe_type_names.len(),
        recipes: export.recipes().len(),
    };
    tracing::info!(?summary, "Imported catalog");

    Ok(summary)
}
