use axum::extract::State;
use db::Recipe;
use maud::{html, Markup};

use crate::{
    http_server::{
        templates::{recipes::RecipeList, Layout},
        ResponseResult,
    },
    AppState,
};

/// The front page never lists more than this many recipes.
pub(crate) const RECENT_RECIPE_LIMIT: i64 = 6;

pub(crate) async fn home_page(
    State(state): State<AppState>,
    layout: Layout,
) -> ResponseResult<Markup> {
    let recipes = Recipe::recent(&state.db, RECENT_RECIPE_LIMIT).await?;

    Ok(layout.render(
        "Recent recipes",
        html! {
          section {
            h1 { "Recent recipes" }
            (RecipeList { recipes: &recipes, layout: &layout })
          }

          @if !layout.recipe_types.is_empty() {
            section {
              h2 { "Browse by type" }
              ul class="type-list" {
                @for recipe_type in &layout.recipe_types {
                  li {
                    a href=(format!("/recipe_type/{}", recipe_type.recipe_type_id)) { (recipe_type.name) }
                  }
                }
              }
            }
          }
        },
    ))
}
