// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Wire-level error code taxonomy.
///
/// `VALIDATION_ERROR` is client-correctable; `EXTERNAL_SERVICE_ERROR` is safe
/// for the caller to retry with backoff; the rest are not retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ApiErrorCode {
    AuthenticationError,
    ValidationError,
    NotFound,
    ExternalServiceError,
    InternalError,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ApiError {
    #[serde(rename = "error")]
    pub code: ApiErrorCode,
    pub message: String,
    pub details: Value,
    pub request_id: String,
}

impl ApiError {
    #[must_use]
    pub fn new(
        code: ApiErrorCode,
        message: impl Into<String>,
        details: Value,
        request_id: impl Into<String>,
    ) -> Self {
        Self {
            code,
            message: message.into(),
            details,
            request_id: request_id.into(),
        }
    }

    /// Parameter failed to parse or violated its range constraint.
    #[must_use]
    pub fn invalid_param(name: &str, value: &str, constraint: &str) -> Self {
        Self::new(
            ApiErrorCode::ValidationError,
            format!("invalid query parameter: {name}"),
            json!({"field_errors":[{"parameter": name, "value": value, "constraint": constraint}]}),
            "req-unknown",
        )
    }

    #[must_use]
    pub fn authentication(message: impl Into<String>) -> Self {
        Self::new(
            ApiErrorCode::AuthenticationError,
            message,
            json!({}),
            "req-unknown",
        )
    }

    #[must_use]
    pub fn external_service(service: &str, message: impl Into<String>) -> Self {
        Self::new(
            ApiErrorCode::ExternalServiceError,
            message,
            json!({"service": service}),
            "req-unknown",
        )
    }

    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ApiErrorCode::InternalError, message, json!({}), "req-unknown")
    }

    #[must_use]
    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = request_id.into();
        self
    }
}
