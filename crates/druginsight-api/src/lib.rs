#![forbid(unsafe_code)]

use serde_json::{json, Value};

pub mod dto;
pub mod error_mapping;
pub mod errors;
pub mod params;

pub use dto::{FiltersApplied, ListNewEntriesResponse, NewEntriesSummary, PageMeta};
pub use error_mapping::map_error;
pub use errors::{ApiError, ApiErrorCode};
pub use params::{
    parse_list_new_entries_params, parse_list_new_entries_params_with_bounds,
    ListNewEntriesParams, ParamBounds,
};

pub const CRATE_NAME: &str = "druginsight-api";
pub const API_VERSION: &str = "v1";

#[must_use]
pub fn openapi_spec() -> Value {
    json!({
      "openapi": "3.0.3",
      "info": {
        "title": "DrugInsight API",
        "version": API_VERSION
      },
      "paths": {
        "/healthz": {"get": {"responses": {"200": {"description": "ok"}}}},
        "/readyz": {"get": {"responses": {"200": {"description": "ready"}, "503": {"description": "store unavailable"}}}},
        "/metrics": {"get": {"responses": {"200": {"description": "request metrics"}}}},
        "/version": {"get": {"responses": {"200": {"description": "service version"}}}},
        "/drugs/new": {
          "get": {
            "parameters": [
              {"name": "page", "in": "query", "schema": {"type": "integer", "minimum": 1, "default": 1}},
              {"name": "limit", "in": "query", "schema": {"type": "integer", "minimum": 1, "maximum": 100, "default": 20}},
              {"name": "days_back", "in": "query", "schema": {"type": "integer", "minimum": 1, "maximum": 365, "default": 30}}
            ],
            "responses": {
              "200": {"description": "paginated new-drug entries with window summary"},
              "401": {"description": "missing or invalid credentials", "content": {"application/json": {"schema": {"$ref": "#/components/schemas/ApiError"}}}},
              "422": {"description": "parameter out of range", "content": {"application/json": {"schema": {"$ref": "#/components/schemas/ApiError"}}}},
              "502": {"description": "storage unreachable", "content": {"application/json": {"schema": {"$ref": "#/components/schemas/ApiError"}}}},
              "500": {"description": "internal error", "content": {"application/json": {"schema": {"$ref": "#/components/schemas/ApiError"}}}}
            }
          }
        }
      },
      "components": {
        "schemas": {
          "ApiError": {
            "type": "object",
            "required": ["error", "message", "details", "request_id"],
            "properties": {
              "error": {"type": "string"},
              "message": {"type": "string"},
              "details": {"type": "object"},
              "request_id": {"type": "string"}
            }
          }
        }
      }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn openapi_spec_names_the_contract_routes() {
        let spec = openapi_spec();
        for path in ["/drugs/new", "/healthz", "/readyz", "/version"] {
            assert!(
                spec["paths"].get(path).is_some(),
                "missing path {path} in openapi spec"
            );
        }
    }
}
