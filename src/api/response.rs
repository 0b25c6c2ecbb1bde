use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::error::{Dependents, LedgerError};

/// 统一响应体
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: Some(data),
        }
    }
}

impl ApiResponse<()> {
    pub fn done(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: None,
        }
    }
}

/// 错误响应体
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub message: String,
    pub error: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blocking: Option<Vec<Dependents>>,
}

impl LedgerError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            LedgerError::NotFound { .. } => (StatusCode::NOT_FOUND, "not_found"),
            LedgerError::Validation { .. } => (StatusCode::BAD_REQUEST, "validation_error"),
            LedgerError::InvalidShipmentType(_) => {
                (StatusCode::BAD_REQUEST, "invalid_shipment_type")
            }
            LedgerError::ClientHasDependents { .. } => {
                (StatusCode::CONFLICT, "client_has_dependents")
            }
            LedgerError::Store(_) | LedgerError::Migration(_) | LedgerError::Export(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "store_failure")
            }
        }
    }
}

impl IntoResponse for LedgerError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
        }

        let field = match &self {
            LedgerError::Validation { field, .. } => Some(field.clone()),
            LedgerError::InvalidShipmentType(_) => Some("type".to_string()),
            _ => None,
        };
        let blocking = match &self {
            LedgerError::ClientHasDependents { blocking, .. } => Some(blocking.clone()),
            _ => None,
        };

        let body = ErrorResponse {
            success: false,
            message: format!("Error: {}", self),
            error: code,
            field,
            blocking,
        };
        (status, Json(body)).into_response()
    }
}

impl From<JsonRejection> for LedgerError {
    fn from(rejection: JsonRejection) -> Self {
        LedgerError::validation("body", rejection.body_text())
    }
}

impl From<QueryRejection> for LedgerError {
    fn from(rejection: QueryRejection) -> Self {
        LedgerError::validation("query", rejection.body_text())
    }
}
