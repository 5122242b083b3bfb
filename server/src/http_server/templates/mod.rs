use axum::{extract::FromRequestParts, http::request::Parts, http::StatusCode};
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use db::RecipeType;
use maud::{html, Markup, DOCTYPE};

use super::{session::Session, ServerError};
use crate::AppState;

pub(crate) mod buttons;
pub(crate) mod recipes;

const SITE_NAME: &str = "Margin Recipes";

pub fn head(title: &str) -> Markup {
    html! {
      head {
        meta charset="utf-8";
        meta name="viewport" content="width=device-width, initial-scale=1";
        title { (title) " · " (SITE_NAME) }
        link rel="stylesheet" href="/static/styles.css" {}
      }
    }
}

/// Per-request page chrome: the type navigation, the pending flash message and
/// whether admin links should show.
pub(crate) struct Layout {
    pub recipe_types: Vec<RecipeType>,
    pub flash: Option<String>,
    pub is_admin: bool,
    pub timezone: Tz,
}

impl FromRequestParts<AppState> for Layout {
    type Rejection = ServerError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let session = Session::from_request_parts(parts, state).await?;
        let recipe_types = RecipeType::list(&state.db).await?;

        Ok(Self {
            recipe_types,
            flash: session.take_flash(),
            is_admin: session.is_admin(),
            timezone: state.app.display_timezone,
        })
    }
}

impl Layout {
    pub fn render(&self, title: &str, inner: Markup) -> Markup {
        html! {
          (DOCTYPE)
          html lang="en" {
            (head(title))

            body {
              (self.header())

              main class="content" {
                @if let Some(flash) = &self.flash {
                  div class="flash" role="status" { (flash) }
                }

                (inner)
              }

              footer class="footer" {
                a href="/export" { "Download all recipes" }
                " · "
                a href="/admin" { "Admin" }
              }
            }
          }
        }
    }

    fn header(&self) -> Markup {
        html! {
          header class="header" {
            a class="site-name" href="/" { (SITE_NAME) }

            nav {
              ul class="nav" {
                @for recipe_type in &self.recipe_types {
                  li {
                    a href=(format!("/recipe_type/{}", recipe_type.recipe_type_id)) { (recipe_type.name) }
                  }
                }
                li { a href="/random" { "Surprise me" } }
                @if self.is_admin {
                  li { a href="/edit_recipe" { "New recipe" } }
                  li { a href="/logout" { "Log out" } }
                } @else {
                  li { a href="/login" { "Log in" } }
                }
              }
            }
          }
        }
    }

    pub fn type_name(&self, recipe_type_id: i64) -> Option<&str> {
        self.recipe_types
            .iter()
            .find(|t| t.recipe_type_id == recipe_type_id)
            .map(|t| t.name.as_str())
    }

    /// Formats a stored UTC time in the configured display timezone.
    pub fn timestamp(&self, at: DateTime<Utc>) -> String {
        at.with_timezone(&self.timezone)
            .format("%b %d, %Y at %-I:%M %p")
            .to_string()
    }
}

/// Bare page used for error responses, which can't rely on the database.
pub fn error_page(status: StatusCode, message: &str) -> Markup {
    let title = status.canonical_reason().unwrap_or("Error");

    html! {
      (DOCTYPE)
      html lang="en" {
        (head(title))

        body {
          header class="header" {
            a class="site-name" href="/" { (SITE_NAME) }
          }

          main class="content error" {
            h1 { (status.as_u16()) " " (title) }
            p { (message) }
            p { a href="/" { "Back to the recipes" } }
          }
        }
      }
    }
}
