// src/api/types.rs

use axum::body::Bytes;
use axum::http::StatusCode;
use axum::Json;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::data::DataMode;
use crate::infra::errors::OrionError;

/// Error half of every handler's return type.
pub type ApiError = (StatusCode, Json<ErrorResponse>);

/// Error response body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

pub fn error(status: StatusCode, message: impl Into<String>) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
}

pub fn bad_request(message: impl Into<String>) -> ApiError {
    error(StatusCode::BAD_REQUEST, message)
}

pub fn not_found(message: impl Into<String>) -> ApiError {
    error(StatusCode::NOT_FOUND, message)
}

/// Log the real cause; the caller only sees a generic message.
pub fn internal(what: &str, err: &OrionError) -> ApiError {
    tracing::error!(route = what, error = %err, "Request failed");
    error(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
}

/// Decode a JSON request body. Routes take raw `Bytes` so malformed or
/// mistyped bodies get a 400 `{error}` instead of axum's plain-text rejection.
pub fn parse_body<T: DeserializeOwned>(body: &Bytes) -> Result<T, ApiError> {
    serde_json::from_slice(body).map_err(|e| bad_request(format!("Invalid request body: {e}")))
}

/// Query parameters shared by the data routes. Everything arrives as a
/// string so bad values get our own 400 message.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiQuery {
    pub tenant: Option<String>,
    pub limit: Option<String>,
    #[serde(rename = "dataMode")]
    pub data_mode: Option<String>,
    pub scale: Option<String>,
    pub format: Option<String>,
}

/// GET /api/v1/health
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub supabase_configured: bool,
    pub data_mode: DataMode,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataModeBody {
    pub mode: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataModeResponse {
    pub mode: DataMode,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectedProjects {
    #[serde(default)]
    pub project_ids: Vec<String>,
}
