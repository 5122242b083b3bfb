use axum::{
    extract::{rejection::FormRejection, State},
    response::Redirect,
    Form,
};
use db::{Recipe, RecipeNote};
use serde::Deserialize;

use crate::{
    http_server::{session::AdminSession, ResponseResult, ServerError},
    AppState,
};

#[derive(Debug, Deserialize)]
pub(crate) struct NewNoteForm {
    recipe_id: i64,
    #[serde(rename = "new-note")]
    new_note: String,
}

pub(crate) async fn new_note(
    AdminSession { session }: AdminSession,
    State(state): State<AppState>,
    form: Result<Form<NewNoteForm>, FormRejection>,
) -> ResponseResult<Redirect> {
    let Form(form) = form.map_err(|rejection| ServerError::bad_request(rejection.body_text()))?;

    let recipe = Recipe::get_by_id(&state.db, form.recipe_id)
        .await?
        .ok_or_else(|| ServerError::not_found(format!("Recipe {}", form.recipe_id)))?;

    RecipeNote::create(&state.db, recipe.recipe_id, &form.new_note).await?;
    tracing::info!(recipe_id = recipe.recipe_id, "Added note");
    session.set_flash("Note saved");

    Ok(Redirect::to(&format!("/recipe/{}", recipe.recipe_id)))
}
