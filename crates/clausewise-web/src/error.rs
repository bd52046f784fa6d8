use std::any::Any;

use axum::extract::multipart::MultipartError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use clausewise_core::SummarizeError;
use serde_json::json;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error("Invalid upload: {0}")]
    Multipart(#[from] MultipartError),
    #[error(transparent)]
    Summarize(#[from] SummarizeError),
    #[error(transparent)]
    Storage(#[from] clausewise_core::Error),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Multipart(e) => e.status(),
            Self::Summarize(e) if e.is_client_error() => StatusCode::BAD_REQUEST,
            Self::Summarize(SummarizeError::GatewayFailure(_)) => StatusCode::BAD_GATEWAY,
            Self::Summarize(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Storage(clausewise_core::Error::SummaryNotFound(_)) => StatusCode::NOT_FOUND,
            Self::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Debug form of the error followed by its source chain.
    fn trace(&self) -> String {
        let mut trace = format!("{self:?}");
        let mut source = std::error::Error::source(self);
        while let Some(cause) = source {
            trace.push_str("\ncaused by: ");
            trace.push_str(&cause.to_string());
            source = cause.source();
        }
        trace
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let trace = self.trace();

        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), error = %self, trace = %trace, "Request failed");
        } else {
            tracing::warn!(status = status.as_u16(), error = %self, "Request rejected");
        }

        let body = axum::Json(json!({ "error": self.to_string(), "trace": trace }));
        (status, body).into_response()
    }
}

/// Response for a handler that panicked: the same `{error, trace}` shape as
/// every other 500.
pub fn panic_response(payload: Box<dyn Any + Send + 'static>) -> Response {
    let message = payload
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| payload.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic payload");

    let error = SummarizeError::InternalError(message.to_string()).to_string();
    let trace = format!("panic: {message}");
    tracing::error!(error = %error, trace = %trace, "Request handler panicked");

    let body = axum::Json(json!({ "error": error, "trace": trace }));
    (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
}

#[cfg(test)]
mod tests {
    use clausewise_core::GatewayError;

    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            ApiError::from(SummarizeError::EmptyUpload).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::from(SummarizeError::UnextractableDocument("nope".into())).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::from(SummarizeError::GatewayFailure(GatewayError::MissingApiKey)).status(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            ApiError::from(SummarizeError::InternalError("bug".into())).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ApiError::from(clausewise_core::Error::SummaryNotFound(3)).status(),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn test_message_and_trace() {
        let err = ApiError::from(SummarizeError::GatewayFailure(GatewayError::MissingApiKey));

        assert_eq!(
            err.to_string(),
            "Model gateway failed: No API key configured for the model gateway"
        );
        let trace = err.trace();
        assert!(trace.starts_with("Summarize(GatewayFailure(MissingApiKey))"));
        assert!(trace.contains("caused by: No API key configured for the model gateway"));
    }

    #[test]
    fn test_empty_upload_message() {
        let err = ApiError::from(SummarizeError::EmptyUpload);
        assert_eq!(err.to_string(), "Uploaded file is empty.");
    }

    #[tokio::test]
    async fn test_panic_response_body() {
        let response = panic_response(Box::new("sink exploded".to_string()));

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"], "Internal error: sink exploded");
        assert_eq!(body["trace"], "panic: sink exploded");
    }
}
