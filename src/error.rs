// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::models::ErrorResponse;
use crate::transfer::{TransferError, ValidationErrors};

const VALIDATION_ERROR_TYPE: &str = "ValidationError";

#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
    /// Per-field messages, present only for validation failures.
    pub field_errors: Option<ValidationErrors>,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            field_errors: None,
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    pub fn validation(errors: ValidationErrors) -> Self {
        Self {
            status: StatusCode::UNAUTHORIZED,
            message: errors.to_string(),
            field_errors: Some(errors),
        }
    }
}

impl From<TransferError> for ApiError {
    fn from(err: TransferError) -> Self {
        match err {
            TransferError::Validation(errors) => ApiError::validation(errors),
            TransferError::InsufficientFunds(_) => ApiError::unauthorized(err.to_string()),
            TransferError::UnsupportedNetwork(_) => ApiError::bad_request(err.to_string()),
            TransferError::Execution(message) => ApiError::internal(message),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = match self.field_errors {
            Some(errors) => ErrorResponse {
                error: self.message,
                kind: Some(VALIDATION_ERROR_TYPE.to_string()),
                errors: serde_json::to_value(errors).ok(),
            },
            None => ErrorResponse {
                error: self.message,
                kind: None,
                errors: None,
            },
        };
        (self.status, Json(body)).into_response()
    }
}
