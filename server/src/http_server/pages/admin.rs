use axum::{extract::State, response::Redirect};
use maud::{html, Markup};

use crate::{
    http_server::{
        session::AdminSession,
        templates::{buttons::LinkButton, Layout},
        ResponseResult,
    },
    AppState,
};

#[axum_macros::debug_handler(state = AppState)]
pub(crate) async fn dashboard(layout: Layout) -> Markup {
    layout.render(
        "Admin",
        html! {
          h1 { "Admin" }

          @if layout.is_admin {
            section {
              h2 { "Recipes" }
              p {
                (LinkButton::primary(html!("New recipe"), "/edit_recipe"))
                " "
                (LinkButton::secondary(html!("Download all recipes"), "/export"))
              }
            }

            section {
              h2 { "Import" }
              p { "Uploading a file replaces every recipe, unit and note in the catalog." }
              form method="post" action="/import" enctype="multipart/form-data" class="import-form" {
                input type="file" name="import_data" accept="application/json,.json" required;
                button type="submit" class="button button-primary" { "Import recipes" }
              }
            }

            section {
              h2 { "Start over" }
              p { "Reset wipes the catalog and loads the starter recipe." }
              (LinkButton::danger(html!("Reset catalog"), "/reset"))
            }
          } @else {
            p {
              "You need to "
              a href="/login" { "log in" }
              " to manage recipes."
            }
          }
        },
    )
}

pub(crate) async fn reset(
    AdminSession { session }: AdminSession,
    State(state): State<AppState>,
) -> ResponseResult<Redirect> {
    db::seed::reset(&state.db).await?;
    session.set_flash("The catalog was reset");

    Ok(Redirect::to("/recipe/1"))
}

/// Form endpoints answer GET by sending admins back to the dashboard.
pub(crate) async fn redirect_to_admin(_admin: AdminSession) -> Redirect {
    Redirect::to("/admin")
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use db::{Recipe, RecipeNote};
    use sqlx::SqlitePool;

    use crate::http_server::test_helpers::{
        create_test_app, get, location, login, response_body_string,
    };

    #[sqlx::test(migrations = "../db/migrations")]
    async fn test_dashboard_shows_tools_only_to_admins(pool: SqlitePool) {
        let app = create_test_app(pool);

        let body = response_body_string(get(&app, "/admin", None).await).await;
        assert!(body.contains("/login"));
        assert!(!body.contains("import_data"));

        let cookie = login(&app).await;
        let body = response_body_string(get(&app, "/admin", Some(&cookie)).await).await;
        assert!(body.contains("import_data"));
        assert!(body.contains("multipart/form-data"));
        assert!(body.contains("/reset"));
    }

    #[sqlx::test(migrations = "../db/migrations")]
    async fn test_reset_restores_fixtures(pool: SqlitePool) {
        db::seed::reset(&pool).await.unwrap();
        RecipeNote::create(&pool, 1, "scribble").await.unwrap();
        let app = create_test_app(pool.clone());

        assert_eq!(
            get(&app, "/reset", None).await.status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(RecipeNote::get_by_recipe(&pool, 1).await.unwrap().len(), 2);

        let cookie = login(&app).await;
        let response = get(&app, "/reset", Some(&cookie)).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/recipe/1");

        assert_eq!(Recipe::count(&pool).await.unwrap(), 1);
        assert_eq!(RecipeNote::get_by_recipe(&pool, 1).await.unwrap().len(), 1);
    }

    #[sqlx::test(migrations = "../db/migrations")]
    async fn test_form_gets_redirect_to_dashboard(pool: SqlitePool) {
        let app = create_test_app(pool);
        let cookie = login(&app).await;

        for uri in ["/new_note", "/import"] {
            let response = get(&app, uri, Some(&cookie)).await;
            assert_eq!(response.status(), StatusCode::SEE_OTHER);
            assert_eq!(location(&response), "/admin");

            assert_eq!(
                get(&app, uri, None).await.status(),
                StatusCode::UNAUTHORIZED
            );
        }
    }
}
