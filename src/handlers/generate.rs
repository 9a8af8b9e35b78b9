//! Generation endpoint handler
//!
//! Handles POST /generate_response for both QA and free-form requests.

use crate::dispatch::CombinedRequest;
use crate::error::AppError;
use crate::generator;
use crate::handlers::AppState;
use crate::handlers::json::DetailJson;
use crate::middleware::RequestId;
use axum::{Extension, Json, extract::State};
use serde::{Deserialize, Serialize};

/// Successful generation response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateResponse {
    /// Model output
    pub response: String,
}

/// POST /generate_response handler
///
/// Returns 200 with the model output, 400 when the request carries neither a
/// complete subject/topic/subtopic triple nor a prompt, and 500 when the
/// model call fails. The model is called at most once.
pub async fn handler(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    DetailJson(request): DetailJson<CombinedRequest>,
) -> Result<Json<GenerateResponse>, AppError> {
    tracing::debug!(
        request_id = %request_id,
        has_subject = request.subject().is_some(),
        has_topic = request.topic().is_some(),
        has_subtopic = request.subtopic().is_some(),
        has_prompt = request.prompt().is_some(),
        "Received generation request"
    );

    match generator::generate(state.client(), state.metrics(), &request).await {
        Ok(response) => {
            tracing::info!(
                request_id = %request_id,
                response_length = response.len(),
                "Generation completed"
            );
            Ok(Json(GenerateResponse { response }))
        }
        Err(e) => {
            tracing::warn!(
                request_id = %request_id,
                status = %e.status(),
                error = %e,
                "Generation failed"
            );
            Err(e)
        }
    }
}
