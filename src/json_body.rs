//! The JSON request body extractor used by the API endpoints.

use axum::extract::{FromRequest, rejection::JsonRejection};

use crate::Error;

/// Extracts a JSON request body like [axum::Json].
///
/// A body that is not valid JSON, or that does not fit `T`, is rejected with
/// [Error::InvalidBody] so that clients get the usual JSON error body instead
/// of axum's plain text response.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(Error))]
pub struct JsonBody<T>(pub T);

impl From<JsonRejection> for Error {
    fn from(rejection: JsonRejection) -> Self {
        tracing::debug!("rejected request body: {}", rejection.body_text());
        Error::InvalidBody(rejection.body_text())
    }
}
