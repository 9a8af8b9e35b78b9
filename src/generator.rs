//! Generation pipeline: classify, build the prompt, invoke the model
//!
//! Shared by the `/generate_response` handler and anything else that needs to
//! turn a [`CombinedRequest`] into model output. Each call is independent and
//! makes at most one model invocation.

use crate::dispatch::{CombinedRequest, Dispatch, classify};
use crate::error::{AppError, AppResult};
use crate::metrics::{Metrics, Outcome};
use crate::models::{ModelClient, ModelReply};
use crate::prompt::{build_freeform_prompt, build_qa_prompt};
use std::borrow::Cow;
use std::time::Instant;

/// Send already-formatted text to the model exactly once
///
/// Any client failure becomes [`AppError::UpstreamFailure`] carrying the
/// client's error message. Nothing is retried.
pub async fn invoke_model(
    client: &dyn ModelClient,
    metrics: &Metrics,
    text: &str,
) -> AppResult<ModelReply> {
    let start = Instant::now();
    let result = client.invoke(text).await;
    let latency_ms = start.elapsed().as_secs_f64() * 1000.0;

    let outcome = if result.is_ok() {
        Outcome::Success
    } else {
        Outcome::Failure
    };
    if let Err(e) = metrics.record_model_invocation(outcome, latency_ms) {
        tracing::error!(
            error = %e,
            outcome = outcome.as_str(),
            "Metrics recording failed (non-fatal)"
        );
    }

    match result {
        Ok(reply) => {
            tracing::debug!(
                model = %client.model_name(),
                reply_length = reply.content().len(),
                latency_ms = %latency_ms,
                "Model invocation succeeded"
            );
            Ok(reply)
        }
        Err(e) => {
            tracing::warn!(
                model = %client.model_name(),
                error = %e,
                latency_ms = %latency_ms,
                "Model invocation failed"
            );
            Err(AppError::UpstreamFailure(e.to_string()))
        }
    }
}

/// Produce the model's answer for a request
///
/// Returns [`AppError::InvalidRequest`] without calling the model when the
/// request matches neither strategy.
pub async fn generate(
    client: &dyn ModelClient,
    metrics: &Metrics,
    request: &CombinedRequest,
) -> AppResult<String> {
    let dispatch = classify(request);

    if let Err(e) = metrics.record_request(dispatch) {
        tracing::error!(error = %e, strategy = %dispatch, "Metrics recording failed (non-fatal)");
    }

    let text: Cow<'_, str> = match dispatch {
        Dispatch::Qa {
            subject,
            topic,
            subtopic,
        } => Cow::Owned(build_qa_prompt(subject, topic, subtopic)),
        Dispatch::Freeform { prompt } => Cow::Borrowed(build_freeform_prompt(prompt)),
        Dispatch::Invalid => {
            tracing::info!("Request matched neither QA nor free-form strategy");
            return Err(AppError::InvalidRequest);
        }
    };

    tracing::debug!(
        strategy = %dispatch,
        prompt_length = text.len(),
        "Prompt built"
    );

    let reply = invoke_model(client, metrics, &text).await?;
    Ok(reply.into_content())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ModelError;
    use async_trait::async_trait;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingClient {
        calls: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl ModelClient for RecordingClient {
        fn model_name(&self) -> &str {
            "recording"
        }

        async fn invoke(&self, text: &str) -> Result<ModelReply, ModelError> {
            self.calls.lock().unwrap().push(text.to_string());
            Ok(ModelReply::new(format!("reply to: {}", text)))
        }
    }

    struct FailingClient;

    #[async_trait]
    impl ModelClient for FailingClient {
        fn model_name(&self) -> &str {
            "failing"
        }

        async fn invoke(&self, _text: &str) -> Result<ModelReply, ModelError> {
            Err(ModelError::Other("quota exhausted".to_string()))
        }
    }

    fn metrics() -> Metrics {
        Metrics::new().expect("should create metrics")
    }

    #[tokio::test]
    async fn test_qa_request_invokes_model_with_formatted_prompt() {
        let client = RecordingClient::default();
        let request = CombinedRequest::qa("Math", "Algebra", "Linear Equations");

        let reply = generate(&client, &metrics(), &request).await.unwrap();

        let calls = client.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(
            calls[0],
            build_qa_prompt("Math", "Algebra", "Linear Equations")
        );
        assert_eq!(reply, format!("reply to: {}", calls[0]));
    }

    #[tokio::test]
    async fn test_freeform_request_passes_prompt_unchanged() {
        let client = RecordingClient::default();
        let request = CombinedRequest::freeform("Explain gravity");

        generate(&client, &metrics(), &request).await.unwrap();

        assert_eq!(*client.calls.lock().unwrap(), vec!["Explain gravity"]);
    }

    #[tokio::test]
    async fn test_invalid_request_makes_no_model_call() {
        let client = RecordingClient::default();

        let err = generate(&client, &metrics(), &CombinedRequest::default())
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::InvalidRequest));
        assert!(client.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_client_failure_becomes_upstream_failure() {
        let request = CombinedRequest::freeform("Explain gravity");

        let err = generate(&FailingClient, &metrics(), &request)
            .await
            .unwrap_err();

        match err {
            AppError::UpstreamFailure(msg) => assert_eq!(msg, "quota exhausted"),
            other => panic!("expected UpstreamFailure, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_metrics_count_strategy_and_outcome() {
        let metrics = metrics();
        let client = RecordingClient::default();

        generate(&client, &metrics, &CombinedRequest::freeform("hi"))
            .await
            .unwrap();
        let _ = generate(&client, &metrics, &CombinedRequest::default()).await;
        let _ = generate(&FailingClient, &metrics, &CombinedRequest::freeform("hi")).await;

        let output = metrics.gather().unwrap();
        assert!(output.contains(r#"qagen_requests_total{strategy="freeform"} 2"#));
        assert!(output.contains(r#"qagen_requests_total{strategy="invalid"} 1"#));
        assert!(output.contains(r#"qagen_model_invocations_total{outcome="success"} 1"#));
        assert!(output.contains(r#"qagen_model_invocations_total{outcome="failure"} 1"#));
    }
}
