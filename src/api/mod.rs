//! REST API module.
//!
//! Contains all API routes and handlers consumed by the rendering layer.

mod accounts;
mod auth;
mod departments;
mod employees;
mod requests;

pub use accounts::*;
pub use auth::*;
pub use departments::*;
pub use employees::*;
pub use requests::*;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::errors::AppError;
use crate::store::Mutated;

/// Success response envelope. `warning` is present when the mutation
/// committed in memory but the snapshot write failed (weak consistency:
/// the change is not rolled back, the caller is told).
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn new(data: T) -> Self {
        Self {
            success: true,
            data,
            warning: None,
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

/// Response type that can be either success or error.
pub type ApiResult<T> = Result<ApiResponse<T>, AppError>;

/// Create a successful API response.
pub fn success<T: Serialize>(data: T) -> ApiResult<T> {
    Ok(ApiResponse::new(data))
}

/// Create a successful API response from a committed mutation, carrying
/// its persistence warning if any.
pub fn committed<T: Serialize>(mutated: Mutated<T>) -> ApiResult<T> {
    Ok(ApiResponse {
        success: true,
        data: mutated.value,
        warning: mutated.warning,
    })
}
