// SPDX-License-Identifier: Apache-2.0

use crate::errors::{ApiError, ApiErrorCode};

pub const API_ERROR_SCHEMA_REF: &str = "#/components/schemas/ApiError";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ApiErrorMapping {
    pub status_code: u16,
    pub schema_ref: &'static str,
}

#[must_use]
pub fn map_error(error: &ApiError) -> ApiErrorMapping {
    let status_code = match error.code {
        ApiErrorCode::AuthenticationError => 401,
        ApiErrorCode::NotFound => 404,
        ApiErrorCode::ValidationError => 422,
        ApiErrorCode::ExternalServiceError => 502,
        ApiErrorCode::InternalError => 500,
    };

    ApiErrorMapping {
        status_code,
        schema_ref: API_ERROR_SCHEMA_REF,
    }
}
