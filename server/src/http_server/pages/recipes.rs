use axum::extract::{Path, State};
use db::{Recipe, RecipeType, RecipeWithDetails};
use maud::{html, Markup};

use crate::{
    http_server::{
        templates::{
            buttons::LinkButton,
            recipes::{ingredient_line, instructions, RecipeList},
            Layout,
        },
        ResponseResult, ServerError,
    },
    AppState,
};

pub(crate) async fn show_recipe(
    Path(recipe_id): Path<i64>,
    State(state): State<AppState>,
    layout: Layout,
) -> ResponseResult<Markup> {
    let recipe = Recipe::get_full(&state.db, recipe_id)
        .await?
        .ok_or_else(|| ServerError::not_found(format!("Recipe {recipe_id}")))?;

    Ok(recipe_page(&layout, &recipe))
}

pub(crate) async fn random_recipe(
    State(state): State<AppState>,
    layout: Layout,
) -> ResponseResult<Markup> {
    let recipe = Recipe::random(&state.db)
        .await?
        .ok_or_else(|| ServerError::not_found("Any recipe"))?;
    let recipe = recipe.with_details(&state.db).await?;

    Ok(recipe_page(&layout, &recipe))
}

pub(crate) async fn recipes_by_type(
    Path(recipe_type_id): Path<i64>,
    State(state): State<AppState>,
    layout: Layout,
) -> ResponseResult<Markup> {
    let recipe_type = RecipeType::get_by_id(&state.db, recipe_type_id)
        .await?
        .ok_or_else(|| ServerError::not_found(format!("Recipe type {recipe_type_id}")))?;
    let recipes = Recipe::list_by_type(&state.db, recipe_type_id).await?;

    Ok(layout.render(
        &recipe_type.name,
        html! {
          h1 { (recipe_type.name) }
          (RecipeList { recipes: &recipes, layout: &layout })
        },
    ))
}

fn recipe_page(layout: &Layout, details: &RecipeWithDetails) -> Markup {
    let recipe = &details.recipe;

    layout.render(
        &recipe.title,
        html! {
          article class="recipe" {
            h1 { (recipe.title) }
            p class="meta" {
              a href=(format!("/recipe_type/{}", details.recipe_type.recipe_type_id)) { (details.recipe_type.name) }
              " · added " (layout.timestamp(recipe.created_at))
            }

            @if layout.is_admin {
              (LinkButton::secondary(html!("Edit recipe"), format!("/edit_recipe/{}", recipe.recipe_id)))
            }

            section {
              h2 { "Ingredients" }
              @if details.ingredients.is_empty() {
                p class="empty" { "No ingredients listed." }
              } @else {
                ul class="ingredients" {
                  @for line in &details.ingredients {
                    (ingredient_line(line))
                  }
                }
              }
            }

            section class="instructions" {
              h2 { "Instructions" }
              (instructions(&recipe.body))
            }

            section class="notes" {
              h2 { "Notes" }
              @if details.notes.is_empty() {
                p class="empty" { "No notes yet." }
              } @else {
                ol class="note-list" {
                  @for note in &details.notes {
                    li class="note" {
                      p { (note.note_text) }
                      span class="meta" { (layout.timestamp(note.created_at)) }
                    }
                  }
                }
              }

              @if layout.is_admin {
                form method="post" action="/new_note" class="note-form" {
                  input type="hidden" name="recipe_id" value=(recipe.recipe_id);
                  label for="new-note" { "Add a note" }
                  textarea id="new-note" name="new-note" rows="3" required {}
                  button type="submit" class="button button-primary" { "Save note" }
                }
              }
            }
          }
        },
    )
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use sqlx::SqlitePool;

    use crate::http_server::test_helpers::{create_test_app, get, login, response_body_string};

    #[sqlx::test(migrations = "../db/migrations")]
    async fn test_recipe_page_shows_stored_recipe(pool: SqlitePool) {
        db::seed::reset(&pool).await.unwrap();
        let app = create_test_app(pool);

        let response = get(&app, "/recipe/1", None).await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = response_body_string(response).await;
        assert!(body.contains("Buttermilk Pancakes"));
        assert!(body.contains("Breakfast"));
        assert!(body.contains("all-purpose flour"));
        assert!(body.contains("1/2"));
        assert!(body.contains("Let the batter rest"));
        assert!(!body.contains("Save note"));
    }

    #[sqlx::test(migrations = "../db/migrations")]
    async fn test_missing_recipe_is_not_found(pool: SqlitePool) {
        let app = create_test_app(pool);

        let response = get(&app, "/recipe/99", None).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let body = response_body_string(response).await;
        assert!(body.contains("Recipe 99 not found"));
    }

    #[sqlx::test(migrations = "../db/migrations")]
    async fn test_random_recipe(pool: SqlitePool) {
        let app = create_test_app(pool.clone());
        assert_eq!(
            get(&app, "/random", None).await.status(),
            StatusCode::NOT_FOUND
        );

        db::seed::reset(&pool).await.unwrap();
        let response = get(&app, "/random", None).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response_body_string(response)
            .await
            .contains("Buttermilk Pancakes"));
    }

    #[sqlx::test(migrations = "../db/migrations")]
    async fn test_recipes_by_type(pool: SqlitePool) {
        db::seed::reset(&pool).await.unwrap();
        let breakfast = db::RecipeType::find_or_create(&pool, "Breakfast")
            .await
            .unwrap();
        let dessert = db::RecipeType::find_or_create(&pool, "Dessert")
            .await
            .unwrap();
        let app = create_test_app(pool);

        let body = response_body_string(
            get(&app, &format!("/recipe_type/{}", breakfast.recipe_type_id), None).await,
        )
        .await;
        assert!(body.contains("Buttermilk Pancakes"));

        let body = response_body_string(
            get(&app, &format!("/recipe_type/{}", dessert.recipe_type_id), None).await,
        )
        .await;
        assert!(body.contains("No recipes yet."));

        assert_eq!(
            get(&app, "/recipe_type/404", None).await.status(),
            StatusCode::NOT_FOUND
        );
    }

    #[sqlx::test(migrations = "../db/migrations")]
    async fn test_admin_sees_note_form(pool: SqlitePool) {
        db::seed::reset(&pool).await.unwrap();
        let app = create_test_app(pool);
        let cookie = login(&app).await;

        let body = response_body_string(get(&app, "/recipe/1", Some(&cookie)).await).await;

        assert!(body.contains("Save note"));
        assert!(body.contains("/edit_recipe/1"));
    }
}
