use axum::{
    extract::{DefaultBodyLimit, Path},
    http::{header, HeaderMap, Uri},
    response::IntoResponse,
    routing::get,
    Router,
};
use include_dir::{include_dir, Dir};

use super::{pages, ResponseResult, ServerError};
use crate::AppState;

static STATIC_ASSETS: Dir<'_> = include_dir!("$CARGO_MANIFEST_DIR/static");

pub(crate) fn make_router() -> Router<AppState> {
    Router::new()
        .route("/static/{*path}", get(static_assets))
        .route("/", get(pages::home::home_page))
        .route("/random", get(pages::recipes::random_recipe))
        .route("/recipe/{id}", get(pages::recipes::show_recipe))
        .route("/recipe_type/{id}", get(pages::recipes::recipes_by_type))
        .route(
            "/edit_recipe",
            get(pages::edit_recipe::new_recipe_form).post(pages::edit_recipe::create_recipe),
        )
        .route(
            "/edit_recipe/{id}",
            get(pages::edit_recipe::edit_recipe_form).post(pages::edit_recipe::update_recipe),
        )
        .route(
            "/new_note",
            get(pages::admin::redirect_to_admin).post(pages::notes::new_note),
        )
        .route("/reset", get(pages::admin::reset))
        .route("/export", get(pages::transfer::export))
        .route(
            "/import",
            get(pages::admin::redirect_to_admin)
                .post(pages::transfer::import)
                .layer(DefaultBodyLimit::max(pages::transfer::MAX_IMPORT_BYTES)),
        )
        .route("/admin", get(pages::admin::dashboard))
        .route(
            "/login",
            get(pages::login::login_form).post(pages::login::login),
        )
        .route("/logout", get(pages::login::logout))
        .fallback(fallback)
}

async fn fallback(uri: Uri) -> ServerError {
    ServerError::not_found(format!("Page {}", uri.path()))
}

async fn static_assets(Path(p): Path<String>) -> ResponseResult {
    let path = p.strip_prefix('/').unwrap_or(&p);

    let Some(entry) = STATIC_ASSETS.get_file(path) else {
        return Err(ServerError::not_found(format!("Static asset {path}")));
    };

    let mime = mime_guess::from_path(path).first_or_octet_stream();

    let mut headers = HeaderMap::new();
    headers.insert(header::CONTENT_TYPE, mime.to_string().parse()?);

    Ok((headers, entry.contents()).into_response())
}

#[cfg(test)]
mod tests {
    use axum::http::{header, StatusCode};
    use sqlx::SqlitePool;

    use crate::http_server::test_helpers::{create_test_app, get, response_body_string};

    #[sqlx::test(migrations = "../db/migrations")]
    async fn test_stylesheet_is_served(pool: SqlitePool) {
        let app = create_test_app(pool);

        let response = get(&app, "/static/styles.css", None).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "text/css");
    }

    #[sqlx::test(migrations = "../db/migrations")]
    async fn test_unknown_paths_are_not_found(pool: SqlitePool) {
        let app = create_test_app(pool);

        assert_eq!(
            get(&app, "/static/missing.css", None).await.status(),
            StatusCode::NOT_FOUND
        );

        let response = get(&app, "/no/such/page", None).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(response_body_string(response)
            .await
            .contains("Page /no/such/page not found"));
    }
}
