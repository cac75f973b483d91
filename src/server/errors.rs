use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use super::executor::ExecutionError;
use super::models::ErrorResponse;
use crate::mutation_builder::MutationError;
use crate::query_compiler::CompileError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Missing query parameter `{0}`")]
    MissingParameter(&'static str),
    #[error(transparent)]
    Compile(#[from] CompileError),
    #[error(transparent)]
    Mutation(#[from] MutationError),
    #[error(transparent)]
    Execution(#[from] ExecutionError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::MissingParameter(_) => StatusCode::BAD_REQUEST,
            ApiError::Mutation(MutationError::MissingRequiredField { .. })
            | ApiError::Mutation(MutationError::InvalidValue { .. })
            | ApiError::Mutation(MutationError::TypeQl(_)) => StatusCode::BAD_REQUEST,
            ApiError::Mutation(MutationError::Schema(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Compile(_) | ApiError::Execution(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn field(&self) -> Option<String> {
        match self {
            ApiError::MissingParameter(name) => Some(name.to_string()),
            ApiError::Mutation(MutationError::MissingRequiredField { field, .. }) => {
                Some(field.clone())
            }
            ApiError::Mutation(MutationError::InvalidValue { attribute, .. }) => {
                Some(attribute.clone())
            }
            _ => None,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            log::error!("Request failed: {}", self);
        } else {
            log::warn!("Rejected request: {}", self);
        }
        let body = ErrorResponse {
            error: self.to_string(),
            field: self.field(),
        };
        (status, Json(body)).into_response()
    }
}
