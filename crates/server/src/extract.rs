//! Request extractors with API-shaped rejections.

use axum::extract::FromRequest;
use axum::extract::rejection::JsonRejection;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::error::ApiError;

/// JSON body extractor whose rejection is an [`ApiError`].
///
/// Axum's stock `Json` answers malformed bodies with its own plain-text
/// 400/415/422 responses; routing the rejection through `ApiError` keeps
/// the JSON error envelope and maps every body problem to 400.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct Json<T>(pub T);

impl<T: Serialize> IntoResponse for Json<T> {
    fn into_response(self) -> Response {
        axum::Json(self.0).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadJson(rejection.body_text())
    }
}
