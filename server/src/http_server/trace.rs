use axum::{
    extract::MatchedPath,
    http::{self, header, Method},
};
use tower_http::trace::{MakeSpan, OnResponse};
use tracing::{field::Empty, Level};

/// Request spans for the recipe site.
///
/// Spans name the matched route and carry the recipe or recipe type the
/// request is about, so a slow or failing page can be tied to the row it read.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Tracer;

/// The catalog row a route addresses, taken from its `{id}` segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CatalogTarget {
    Recipe(i64),
    RecipeType(i64),
}

fn catalog_target(route: &str, path: &str) -> Option<CatalogTarget> {
    let id = path.rsplit('/').next()?.parse::<i64>().ok()?;

    match route {
        "/recipe/{id}" | "/edit_recipe/{id}" => Some(CatalogTarget::Recipe(id)),
        "/recipe_type/{id}" => Some(CatalogTarget::RecipeType(id)),
        _ => None,
    }
}

impl<Body> MakeSpan<Body> for Tracer {
    fn make_span(&mut self, request: &http::Request<Body>) -> tracing::Span {
        let route = request
            .extensions()
            .get::<MatchedPath>()
            .map_or("", MatchedPath::as_str);
        let path = request.uri().path();

        let span = tracing::span!(
            Level::INFO,
            "server.request",
            otel.name = format!("{} {}", request.method(), route),
            http.route = route,
            http.request.method = %request.method(),
            url.path = path,
            user_agent.original = request
                .headers()
                .get(header::USER_AGENT)
                .and_then(|h| h.to_str().ok()),
            catalog.write = request.method() == Method::POST,
            recipe.id = Empty,
            recipe_type.id = Empty,
            http.response.status_code = Empty,
            http.response.location = Empty,
        );

        match catalog_target(route, path) {
            Some(CatalogTarget::Recipe(id)) => {
                span.record("recipe.id", id);
            }
            Some(CatalogTarget::RecipeType(id)) => {
                span.record("recipe_type.id", id);
            }
            None => {}
        }

        span
    }
}

impl<Body> OnResponse<Body> for Tracer {
    fn on_response(
        self,
        response: &http::Response<Body>,
        latency: std::time::Duration,
        span: &tracing::Span,
    ) {
        let status_code = response.status().as_u16();
        span.record("http.response.status_code", status_code);

        // Writes answer with a redirect to the page they changed
        let location = response
            .headers()
            .get(header::LOCATION)
            .and_then(|h| h.to_str().ok());
        if let Some(location) = location {
            span.record("http.response.location", location);
        }

        tracing::event!(
            Level::INFO,
            status = status_code,
            location,
            latency = format_args!("{} ms", latency.as_millis()),
            "finished processing request"
        );
    }
}
