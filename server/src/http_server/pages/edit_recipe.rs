use axum::{
    extract::{Path, State},
    response::Redirect,
};
use axum_extra::extract::Form;
use db::{IngredientUnit, NewIngredient, Recipe, RecipeDraft, RecipeType, RecipeWithDetails};
use itertools::izip;
use maud::{html, Markup};
use serde::Deserialize;

use crate::{
    http_server::{session::AdminSession, templates::Layout, ResponseResult, ServerError},
    quantity::{format_quantity, parse_quantity},
    AppState,
};

/// Empty ingredient rows offered below the existing ones.
const BLANK_INGREDIENT_ROWS: usize = 5;

pub(crate) async fn new_recipe_form(
    _admin: AdminSession,
    State(state): State<AppState>,
    layout: Layout,
) -> ResponseResult<Markup> {
    let units = IngredientUnit::list(&state.db).await?;

    Ok(recipe_form(&layout, &units, None))
}

pub(crate) async fn edit_recipe_form(
    _admin: AdminSession,
    Path(recipe_id): Path<i64>,
    State(state): State<AppState>,
    layout: Layout,
) -> ResponseResult<Markup> {
    let recipe = Recipe::get_full(&state.db, recipe_id)
        .await?
        .ok_or_else(|| ServerError::not_found(format!("Recipe {recipe_id}")))?;
    let units = IngredientUnit::list(&state.db).await?;

    Ok(recipe_form(&layout, &units, Some(&recipe)))
}

/// The edit form as submitted. Ingredient rows arrive as three parallel lists.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct RecipeForm {
    #[serde(default)]
    title: String,
    #[serde(default)]
    recipe_type_id: String,
    #[serde(default)]
    body: String,
    #[serde(default)]
    ingredient_quantity: Vec<String>,
    #[serde(default)]
    ingredient_unit_id: Vec<String>,
    #[serde(default)]
    ingredient_name: Vec<String>,
}

impl RecipeForm {
    fn into_draft(
        self,
        recipe_types: &[RecipeType],
        units: &[IngredientUnit],
    ) -> Result<RecipeDraft, String> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err("A recipe needs a title".to_string());
        }

        let recipe_type_id = self
            .recipe_type_id
            .trim()
            .parse::<i64>()
            .ok()
            .filter(|id| recipe_types.iter().any(|t| t.recipe_type_id == *id))
            .ok_or_else(|| "Pick a recipe type from the list".to_string())?;

        if self.ingredient_quantity.len() != self.ingredient_name.len()
            || self.ingredient_unit_id.len() != self.ingredient_name.len()
        {
            return Err("Every ingredient row needs a quantity, unit and name".to_string());
        }

        let mut ingredients = vec![];
        for (row, (quantity, unit_id, name)) in izip!(
            &self.ingredient_quantity,
            &self.ingredient_unit_id,
            &self.ingredient_name
        )
        .enumerate()
        {
            let name = name.trim();
            if name.is_empty() && quantity.trim().is_empty() {
                continue;
            }
            if name.is_empty() {
                return Err(format!("Ingredient row {} has no name", row + 1));
            }

            let quantity = parse_quantity(quantity)
                .ok_or_else(|| format!("Can't read the quantity for {name}"))?;
            let ingredient_unit_id = unit_id
                .trim()
                .parse::<i64>()
                .ok()
                .filter(|id| units.iter().any(|u| u.ingredient_unit_id == *id))
                .ok_or_else(|| format!("Pick a unit for {name}"))?;

            ingredients.push(NewIngredient {
                quantity,
                ingredient_unit_id,
                name: name.to_string(),
            });
        }

        Ok(RecipeDraft {
            title: title.to_string(),
            body: self.body.trim_end().to_string(),
            recipe_type_id,
            ingredients,
        })
    }
}

async fn draft_from_form(state: &AppState, form: RecipeForm) -> ResponseResult<RecipeDraft> {
    let recipe_types = RecipeType::list(&state.db).await?;
    let units = IngredientUnit::list(&state.db).await?;

    form.into_draft(&recipe_types, &units)
        .map_err(ServerError::bad_request)
}

pub(crate) async fn create_recipe(
    AdminSession { session }: AdminSession,
    State(state): State<AppState>,
    Form(form): Form<RecipeForm>,
) -> ResponseResult<Redirect> {
    let draft = draft_from_form(&state, form).await?;
    let recipe = Recipe::create(&state.db, &draft).await?;

    tracing::info!(recipe_id = recipe.recipe_id, "Created recipe");
    session.set_flash(format!("Saved {}", recipe.title));

    Ok(Redirect::to(&format!("/recipe/{}", recipe.recipe_id)))
}

pub(crate) async fn update_recipe(
    AdminSession { session }: AdminSession,
    Path(recipe_id): Path<i64>,
    State(state): State<AppState>,
    Form(form): Form<RecipeForm>,
) -> ResponseResult<Redirect> {
    let draft = draft_from_form(&state, form).await?;
    let recipe = Recipe::update(&state.db, recipe_id, &draft)
        .await?
        .ok_or_else(|| ServerError::not_found(format!("Recipe {recipe_id}")))?;

    tracing::info!(recipe_id, "Updated recipe");
    session.set_flash(format!("Saved {}", recipe.title));

    Ok(Redirect::to(&format!("/recipe/{recipe_id}")))
}

fn recipe_form(
    layout: &Layout,
    units: &[IngredientUnit],
    existing: Option<&RecipeWithDetails>,
) -> Markup {
    let (title, action) = match existing {
        Some(details) => (
            format!("Edit {}", details.recipe.title),
            format!("/edit_recipe/{}", details.recipe.recipe_id),
        ),
        None => ("New recipe".to_string(), "/edit_recipe".to_string()),
    };
    let selected_type = existing.map(|d| d.recipe.recipe_type_id);
    let lines = existing.map(|d| d.ingredients.as_slice()).unwrap_or_default();

    layout.render(
        &title,
        html! {
          h1 { (title) }

          @if layout.recipe_types.is_empty() || units.is_empty() {
            p class="empty" {
              "There are no recipe types or units yet. "
              a href="/admin" { "Reset or import the catalog" }
              " first."
            }
          }

          form method="post" action=(action) class="recipe-form" {
            label for="title" { "Title" }
            input type="text" id="title" name="title" required
              value=[existing.map(|d| d.recipe.title.as_str())];

            label for="recipe_type_id" { "Type" }
            select id="recipe_type_id" name="recipe_type_id" required {
              @for recipe_type in &layout.recipe_types {
                option value=(recipe_type.recipe_type_id)
                  selected[selected_type == Some(recipe_type.recipe_type_id)] {
                  (recipe_type.name)
                }
              }
            }

            fieldset {
              legend { "Ingredients" }
              table class="ingredient-rows" {
                thead {
                  tr { th { "Quantity" } th { "Unit" } th { "Ingredient" } }
                }
                tbody {
                  @for line in lines {
                    (ingredient_row(units, Some(line.ingredient.quantity), Some(line.ingredient.ingredient_unit_id), &line.ingredient.name))
                  }
                  @for _ in 0..BLANK_INGREDIENT_ROWS {
                    (ingredient_row(units, None, None, ""))
                  }
                }
              }
            }

            label for="body" { "Instructions" }
            textarea id="body" name="body" rows="12" {
              @if let Some(details) = existing { (details.recipe.body) }
            }

            button type="submit" class="button button-primary" { "Save recipe" }
          }
        },
    )
}

fn ingredient_row(
    units: &[IngredientUnit],
    quantity: Option<f64>,
    unit_id: Option<i64>,
    name: &str,
) -> Markup {
    html! {
      tr {
        td {
          input type="text" name="ingredient_quantity" size="6"
            value=[quantity.map(format_quantity)];
        }
        td {
          select name="ingredient_unit_id" {
            @for unit in units {
              option value=(unit.ingredient_unit_id) selected[unit_id == Some(unit.ingredient_unit_id)] {
                (unit.name)
              }
            }
          }
        }
        td {
          input type="text" name="ingredient_name" value=(name);
        }
      }
    }
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use sqlx::SqlitePool;

    use super::*;
    use crate::http_server::test_helpers::{
        create_test_app, get, location, login, post_form, response_body_string,
    };

    fn types() -> Vec<RecipeType> {
        vec![RecipeType {
            recipe_type_id: 1,
            name: "Main".to_string(),
        }]
    }

    fn units() -> Vec<IngredientUnit> {
        vec![IngredientUnit {
            ingredient_unit_id: 4,
            name: "gram".to_string(),
            abbreviation: Some("g".to_string()),
        }]
    }

    fn form(rows: &[(&str, &str, &str)]) -> RecipeForm {
        RecipeForm {
            title: " Risotto ".to_string(),
            recipe_type_id: "1".to_string(),
            body: "Stir.\n".to_string(),
            ingredient_quantity: rows.iter().map(|r| r.0.to_string()).collect(),
            ingredient_unit_id: rows.iter().map(|r| r.1.to_string()).collect(),
            ingredient_name: rows.iter().map(|r| r.2.to_string()).collect(),
        }
    }

    #[test]
    fn test_into_draft_skips_blank_rows() {
        let draft = form(&[("300", "4", "arborio rice"), ("", "4", ""), ("1 1/2", "4", "salt")])
            .into_draft(&types(), &units())
            .unwrap();

        assert_eq!(draft.title, "Risotto");
        assert_eq!(draft.body, "Stir.");
        assert_eq!(draft.recipe_type_id, 1);
        assert_eq!(draft.ingredients.len(), 2);
        assert_eq!(draft.ingredients[1].name, "salt");
        assert!((draft.ingredients[1].quantity - 1.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_into_draft_rejects_bad_input() {
        let mut untitled = form(&[]);
        untitled.title = "  ".to_string();
        assert!(untitled.into_draft(&types(), &units()).is_err());

        let mut unknown_type = form(&[]);
        unknown_type.recipe_type_id = "9".to_string();
        assert!(unknown_type.into_draft(&types(), &units()).is_err());

        assert!(form(&[("lots", "4", "rice")])
            .into_draft(&types(), &units())
            .is_err());
        assert!(form(&[("1", "5", "rice")])
            .into_draft(&types(), &units())
            .is_err());
        assert!(form(&[("1", "4", "")])
            .into_draft(&types(), &units())
            .is_err());

        let mut ragged = form(&[("1", "4", "rice")]);
        ragged.ingredient_unit_id.clear();
        assert!(ragged.into_draft(&types(), &units()).is_err());
    }

    #[sqlx::test(migrations = "../db/migrations")]
    async fn test_edit_form_requires_login(pool: SqlitePool) {
        db::seed::reset(&pool).await.unwrap();
        let app = create_test_app(pool);

        assert_eq!(
            get(&app, "/edit_recipe", None).await.status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            get(&app, "/edit_recipe/1", None).await.status(),
            StatusCode::UNAUTHORIZED
        );
    }

    #[sqlx::test(migrations = "../db/migrations")]
    async fn test_edit_form_is_prefilled(pool: SqlitePool) {
        db::seed::reset(&pool).await.unwrap();
        let app = create_test_app(pool);
        let cookie = login(&app).await;

        let response = get(&app, "/edit_recipe/1", Some(&cookie)).await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = response_body_string(response).await;
        assert!(body.contains("value=\"Buttermilk Pancakes\""));
        assert!(body.contains("value=\"all-purpose flour\""));
        assert!(body.contains("action=\"/edit_recipe/1\""));

        assert_eq!(
            get(&app, "/edit_recipe/77", Some(&cookie)).await.status(),
            StatusCode::NOT_FOUND
        );
    }

    #[sqlx::test(migrations = "../db/migrations")]
    async fn test_create_recipe_and_redirect(pool: SqlitePool) {
        db::seed::reset(&pool).await.unwrap();
        let main = RecipeType::find_or_create(&pool, "Main").await.unwrap();
        let app = create_test_app(pool.clone());
        let cookie = login(&app).await;

        let type_id = main.recipe_type_id.to_string();
        let response = post_form(
            &app,
            "/edit_recipe",
            Some(&cookie),
            &[
                ("title", "Omelette"),
                ("recipe_type_id", &type_id),
                ("body", "Whisk and fry."),
                ("ingredient_quantity", "3"),
                ("ingredient_unit_id", "6"),
                ("ingredient_name", "eggs"),
                ("ingredient_quantity", ""),
                ("ingredient_unit_id", "1"),
                ("ingredient_name", ""),
            ],
        )
        .await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/recipe/2");

        let full = Recipe::get_full(&pool, 2).await.unwrap().unwrap();
        assert_eq!(full.recipe.title, "Omelette");
        assert_eq!(full.recipe_type.name, "Main");
        assert_eq!(full.ingredients.len(), 1);
        assert_eq!(full.ingredients[0].unit_name, "whole");
    }

    #[sqlx::test(migrations = "../db/migrations")]
    async fn test_update_recipe_keeps_notes(pool: SqlitePool) {
        db::seed::reset(&pool).await.unwrap();
        let app = create_test_app(pool.clone());
        let cookie = login(&app).await;

        let before = Recipe::get_full(&pool, 1).await.unwrap().unwrap();
        let type_id = before.recipe.recipe_type_id.to_string();

        let response = post_form(
            &app,
            "/edit_recipe/1",
            Some(&cookie),
            &[
                ("title", "Fluffy Pancakes"),
                ("recipe_type_id", &type_id),
                ("body", "Same as before."),
            ],
        )
        .await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/recipe/1");

        let after = Recipe::get_full(&pool, 1).await.unwrap().unwrap();
        assert_eq!(after.recipe.title, "Fluffy Pancakes");
        assert!(after.ingredients.is_empty());
        assert_eq!(after.notes, before.notes);
        assert_eq!(after.recipe.created_at, before.recipe.created_at);
    }

    #[sqlx::test(migrations = "../db/migrations")]
    async fn test_invalid_submission_is_bad_request(pool: SqlitePool) {
        db::seed::reset(&pool).await.unwrap();
        let app = create_test_app(pool.clone());
        let cookie = login(&app).await;

        let response = post_form(
            &app,
            "/edit_recipe",
            Some(&cookie),
            &[("title", ""), ("recipe_type_id", "1")],
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(Recipe::count(&pool).await.unwrap(), 1);
    }

    #[sqlx::test(migrations = "../db/migrations")]
    async fn test_unauthenticated_submission_changes_nothing(pool: SqlitePool) {
        db::seed::reset(&pool).await.unwrap();
        let app = create_test_app(pool.clone());

        let response = post_form(
            &app,
            "/edit_recipe/1",
            None,
            &[("title", "Hijacked"), ("recipe_type_id", "1")],
        )
        .await;

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let recipe = Recipe::get_by_id(&pool, 1).await.unwrap().unwrap();
        assert_eq!(recipe.title, "Buttermilk Pancakes");
    }
}
