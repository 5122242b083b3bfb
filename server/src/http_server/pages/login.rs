use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    Form,
};
use maud::{html, Markup};
use serde::Deserialize;

use crate::{
    http_server::{session::Session, templates::Layout},
    AppState,
};

#[derive(Debug, Deserialize)]
pub(crate) struct LoginForm {
    #[serde(default)]
    username: String,
    #[serde(default)]
    password: String,
}

pub(crate) async fn login_form(layout: Layout) -> Markup {
    login_page(&layout, None, "")
}

pub(crate) async fn login(
    State(state): State<AppState>,
    session: Session,
    layout: Layout,
    Form(form): Form<LoginForm>,
) -> Response {
    match state.admin.check(form.username.trim(), &form.password) {
        Ok(()) => {
            tracing::info!("Admin logged in");
            session.log_in();
            session.set_flash("You are now logged in.");

            Redirect::to("/").into_response()
        }
        Err(err) => {
            tracing::warn!(error = %err, "Failed login attempt");

            (
                StatusCode::UNAUTHORIZED,
                login_page(&layout, Some(&err.to_string()), &form.username),
            )
                .into_response()
        }
    }
}

pub(crate) async fn logout(session: Session) -> Redirect {
    session.log_out();
    session.set_flash("You were logged out");

    Redirect::to("/")
}

fn login_page(layout: &Layout, error: Option<&str>, username: &str) -> Markup {
    layout.render(
        "Log in",
        html! {
          h1 { "Log in" }

          @if let Some(error) = error {
            p class="flash error" role="alert" { (error) }
          }

          form method="post" action="/login" class="login-form" {
            label for="username" { "Username" }
            input type="text" id="username" name="username" autocomplete="username" required value=(username);

            label for="password" { "Password" }
            input type="password" id="password" name="password" autocomplete="current-password" required;

            button type="submit" class="button button-primary" { "Log in" }
          }
        },
    )
}
