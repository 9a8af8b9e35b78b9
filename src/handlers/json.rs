//! JSON extractor whose rejections use the `{"detail": ...}` error body
//!
//! Wraps Axum's `Json` extractor so that malformed request bodies produce the
//! same error shape as every other failure of the API.

use axum::{
    Json,
    extract::{FromRequest, Request, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::de::DeserializeOwned;

/// Body-parsing failure
///
/// Status codes by rejection type:
/// - JSON syntax errors → 400 Bad Request
/// - Wrong field types → 422 Unprocessable Entity
/// - Missing content type → 415 Unsupported Media Type
#[derive(Debug)]
pub struct DetailJsonRejection(JsonRejection);

impl IntoResponse for DetailJsonRejection {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            JsonRejection::JsonSyntaxError(_) => (StatusCode::BAD_REQUEST, self.0.body_text()),
            JsonRejection::JsonDataError(_) => {
                (StatusCode::UNPROCESSABLE_ENTITY, self.0.body_text())
            }
            JsonRejection::MissingJsonContentType(_) => (
                StatusCode::UNSUPPORTED_MEDIA_TYPE,
                "Content-Type must be application/json".to_string(),
            ),
            _ => (StatusCode::BAD_REQUEST, self.0.body_text()),
        };

        tracing::debug!(status = %status, reason = %message, "Rejected request body");

        (status, Json(serde_json::json!({ "detail": message }))).into_response()
    }
}

/// `Json<T>` replacement for handlers of this API
pub struct DetailJson<T>(pub T);

impl<S, T> FromRequest<S> for DetailJson<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = DetailJsonRejection;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(DetailJson(value)),
            Err(rejection) => Err(DetailJsonRejection(rejection)),
        }
    }
}
