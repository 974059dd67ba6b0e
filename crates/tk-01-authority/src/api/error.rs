//! HTTP mapping of [`AuthorityError`].

use crate::domain::AuthorityError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use shared_types::ErrorResponse;
use tracing::warn;

impl AuthorityError {
    /// Status code reported to REST callers.
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        if self.is_client_error() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }

    /// Render as `{success:false, error}` with `status` instead of the
    /// kind's own code.
    pub(super) fn into_response_with(self, status: StatusCode) -> Response {
        warn!(status = status.as_u16(), error = %self, "[tk-01] Request failed");
        (status, Json(ErrorResponse::new(self.to_string()))).into_response()
    }
}

impl IntoResponse for AuthorityError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        self.into_response_with(status)
    }
}
