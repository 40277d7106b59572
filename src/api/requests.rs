//! Supply request endpoints.

use axum::{
    extract::{Path, State},
    Json,
};

use super::{committed, success, ApiResult};
use crate::models::{SubmitRequest, SupplyRequest};
use crate::AppState;

/// GET /api/requests - The session account's own requests.
pub async fn list_my_requests(State(state): State<AppState>) -> ApiResult<Vec<SupplyRequest>> {
    success(state.workflow.list_mine().await?)
}

/// GET /api/requests/all - Every request in the system (Admin only).
pub async fn list_all_requests(State(state): State<AppState>) -> ApiResult<Vec<SupplyRequest>> {
    success(state.workflow.list_all().await?)
}

/// POST /api/requests - Submit a new request for the session account.
pub async fn submit_request(
    State(state): State<AppState>,
    Json(request): Json<SubmitRequest>,
) -> ApiResult<SupplyRequest> {
    committed(state.workflow.submit(&request).await?)
}

/// POST /api/requests/{id}/cancel - Cancel an own pending request.
pub async fn cancel_request(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<SupplyRequest> {
    committed(state.workflow.cancel(id).await?)
}

/// POST /api/requests/{id}/approve - Approve a pending request (Admin only).
pub async fn approve_request(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<SupplyRequest> {
    committed(state.workflow.approve(id).await?)
}

/// POST /api/requests/{id}/reject - Reject a pending request (Admin only).
pub async fn reject_request(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<SupplyRequest> {
    committed(state.workflow.reject(id).await?)
}
