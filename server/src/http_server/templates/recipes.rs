use db::{IngredientWithUnit, Recipe};
use maud::{html, Markup, PreEscaped, Render};

use super::Layout;
use crate::quantity::format_quantity;

/// A list of recipe links with their type and creation time.
pub(crate) struct RecipeList<'a> {
    pub recipes: &'a [Recipe],
    pub layout: &'a Layout,
}

impl Render for RecipeList<'_> {
    fn render(&self) -> Markup {
        html! {
          @if self.recipes.is_empty() {
            p class="empty" { "No recipes yet." }
          } @else {
            ul class="recipe-list" {
              @for recipe in self.recipes {
                li {
                  a href=(format!("/recipe/{}", recipe.recipe_id)) { (recipe.title) }
                  span class="meta" {
                    @if let Some(type_name) = self.layout.type_name(recipe.recipe_type_id) {
                      (type_name) " · "
                    }
                    (self.layout.timestamp(recipe.created_at))
                  }
                }
              }
            }
          }
        }
    }
}

pub(crate) fn ingredient_line(line: &IngredientWithUnit) -> Markup {
    html! {
      li class="ingredient" {
        span class="quantity" { (format_quantity(line.ingredient.quantity)) }
        " "
        span class="unit" { (line.unit_label()) }
        " "
        span class="name" { (line.ingredient.name) }
      }
    }
}

/// Renders recipe instructions written in Markdown. Raw HTML in the source is
/// escaped by the renderer.
pub(crate) fn instructions(body: &str) -> Markup {
    PreEscaped(markdown::to_html(body))
}
