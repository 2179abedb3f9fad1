use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::{HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use whisker_core::{DetectionError, RecognitionError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ReportPolicy {
    Ignore,
    Report,
}

#[derive(Debug, Clone)]
pub struct ApiError {
    status: StatusCode,
    public_code: &'static str,
    public_message: String,
    report_policy: ReportPolicy,
}

impl ApiError {
    fn new(
        status: StatusCode,
        public_code: &'static str,
        public_message: impl Into<String>,
        report_policy: ReportPolicy,
    ) -> Self {
        Self {
            status,
            public_code,
            public_message: public_message.into(),
            report_policy,
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn bad_request(msg: impl Into<String>) -> Self {
        let msg = msg.into();
        tracing::warn!("Bad request: {}", msg);
        Self::new(
            StatusCode::BAD_REQUEST,
            "BAD_REQUEST",
            msg,
            ReportPolicy::Ignore,
        )
    }

    /// A collaborator (detector, object store) failed; the request itself was fine
    pub fn bad_gateway(public_message: &str, details: impl Into<String>) -> Self {
        tracing::error!("Upstream failure: {}", details.into());
        Self::new(
            StatusCode::BAD_GATEWAY,
            "UPSTREAM_ERROR",
            public_message,
            ReportPolicy::Report,
        )
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        #[derive(Serialize)]
        struct ErrorEnvelope<'a> {
            error: ErrorBody<'a>,
        }

        #[derive(Serialize)]
        struct ErrorBody<'a> {
            code: &'a str,
            #[serde(skip_serializing_if = "Option::is_none")]
            id: Option<&'a str>,
            message: &'a str,
        }

        let error_id = (self.report_policy == ReportPolicy::Report).then(whisker_types::create_id);

        let mut response = (
            self.status,
            Json(ErrorEnvelope {
                error: ErrorBody {
                    code: self.public_code,
                    id: error_id.as_deref(),
                    message: &self.public_message,
                },
            }),
        )
            .into_response();

        if let Some(id) = error_id.as_deref()
            && let Ok(v) = HeaderValue::from_str(id)
        {
            response.headers_mut().insert("x-error-id", v);
        }

        response
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::bad_request(rejection.body_text())
    }
}

impl From<DetectionError> for ApiError {
    fn from(err: DetectionError) -> Self {
        Self::bad_gateway("Failed recognition", err.to_string())
    }
}

impl From<RecognitionError> for ApiError {
    fn from(err: RecognitionError) -> Self {
        match err {
            RecognitionError::Base64Decode(e) => {
                Self::bad_request(format!("Failed Decode Base64 Image: {}", e))
            }
            RecognitionError::UnsupportedExtension(ext) => {
                Self::bad_request(format!("Image extension not allowed: {}", ext))
            }
            RecognitionError::Upload(e) => Self::bad_gateway("Failed Upload To S3", e.to_string()),
            RecognitionError::Detection(e) => e.into(),
        }
    }
}
