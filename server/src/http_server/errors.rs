use std::fmt::{Debug, Display};

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use color_eyre::eyre::{self, eyre};
use db::transfer::TransferError;

use super::templates;

/// Error returned from handlers: a report plus the status to answer with.
///
/// Anything convertible into an `eyre::Report` becomes a 500 through `?`.
/// Client errors are built with the named constructors.
pub(crate) struct ServerError(pub(crate) eyre::Report, pub(crate) StatusCode);

impl ServerError {
    pub(crate) fn not_found(what: impl Display) -> Self {
        Self(eyre!("{what} not found"), StatusCode::NOT_FOUND)
    }

    pub(crate) fn unauthorized() -> Self {
        Self(
            eyre!("You need to log in to do that"),
            StatusCode::UNAUTHORIZED,
        )
    }

    pub(crate) fn bad_request(message: impl Display) -> Self {
        Self(eyre!("{message}"), StatusCode::BAD_REQUEST)
    }
}

impl<E> From<E> for ServerError
where
    E: Into<eyre::Report>,
{
    fn from(err: E) -> Self {
        ServerError(err.into(), StatusCode::INTERNAL_SERVER_ERROR)
    }
}

/// Payload problems are the client's fault, everything else is ours.
pub(crate) fn transfer_error(err: TransferError) -> ServerError {
    if err.is_validation() {
        ServerError::bad_request(err)
    } else {
        ServerError(err.into(), StatusCode::INTERNAL_SERVER_ERROR)
    }
}

impl Debug for ServerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Status Code: {} ServerError: {:?}", self.1, self.0)
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let message = if self.1.is_server_error() {
            let err: &(dyn std::error::Error + 'static) = self.0.as_ref();
            sentry::capture_error(err);
            tracing::error!(error = ?self, "ServerError");

            "Something went wrong on our side. Please try again.".to_string()
        } else {
            tracing::info!(status = %self.1, error = %self.0, "Request rejected");

            self.0.to_string()
        };

        (self.1, templates::error_page(self.1, &message)).into_response()
    }
}
