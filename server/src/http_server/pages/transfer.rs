use axum::{
    extract::{Multipart, State},
    http::header,
    response::{IntoResponse, Redirect},
};
use db::transfer::{export_catalog, import_catalog, CatalogExport};

use crate::{
    http_server::{errors::transfer_error, session::AdminSession, ResponseResult, ServerError},
    AppState,
};

const IMPORT_FIELD: &str = "import_data";
const EXPORT_FILENAME: &str = "margin_recipes.json";

/// Imports larger than this are refused before they reach the handler.
pub(crate) const MAX_IMPORT_BYTES: usize = 10 * 1024 * 1024;

pub(crate) async fn export(State(state): State<AppState>) -> ResponseResult {
    let export = export_catalog(&state.db).await?;
    let body = export.to_json()?;

    Ok((
        [
            (header::CONTENT_TYPE, "application/json".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename={EXPORT_FILENAME}"),
            ),
        ],
        body,
    )
        .into_response())
}

pub(crate) async fn import(
    AdminSession { session }: AdminSession,
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> ResponseResult<Redirect> {
    let mut upload = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ServerError::bad_request(e.body_text()))?
    {
        if field.name() == Some(IMPORT_FIELD) {
            let bytes = field
                .bytes()
                .await
                .map_err(|e| ServerError::bad_request(e.body_text()))?;
            upload = Some(bytes);
        }
    }

    let upload = upload
        .filter(|bytes| !bytes.is_empty())
        .ok_or_else(|| ServerError::bad_request("Choose an export file to import"))?;

    let export = CatalogExport::from_json(&upload).map_err(transfer_error)?;
    let summary = import_catalog(&state.db, &export)
        .await
        .map_err(transfer_error)?;

    tracing::info!(?summary, "Imported catalog");
    session.set_flash(format!(
        "Imported {} recipes and {} units",
        summary.recipes, summary.units
    ));

    Ok(Redirect::to("/"))
}
