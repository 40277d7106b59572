//! Account administration endpoints (Admin only).

use axum::{
    extract::{Path, State},
    Json,
};

use super::{committed, success, ApiResult};
use crate::models::{Account, CreateAccountRequest, ResetPasswordRequest, UpdateAccountRequest};
use crate::AppState;

/// GET /api/accounts - List all accounts.
pub async fn list_accounts(State(state): State<AppState>) -> ApiResult<Vec<Account>> {
    success(state.auth.list_accounts().await?)
}

/// POST /api/accounts - Create an account with chosen role and verification.
pub async fn create_account(
    State(state): State<AppState>,
    Json(request): Json<CreateAccountRequest>,
) -> ApiResult<Account> {
    committed(state.auth.create_account(&request).await?)
}

/// PUT /api/accounts/{email} - Replace an account's fields.
pub async fn update_account(
    State(state): State<AppState>,
    Path(email): Path<String>,
    Json(request): Json<UpdateAccountRequest>,
) -> ApiResult<Account> {
    committed(state.auth.update_account(&email, &request).await?)
}

/// PUT /api/accounts/{email}/password - Reset an account's password.
pub async fn reset_password(
    State(state): State<AppState>,
    Path(email): Path<String>,
    Json(request): Json<ResetPasswordRequest>,
) -> ApiResult<()> {
    committed(state.auth.reset_password(&email, &request).await?)
}

/// DELETE /api/accounts/{email} - Delete an account, cascading to its
/// employee record. Self-deletion is blocked.
pub async fn delete_account(
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> ApiResult<()> {
    committed(state.auth.delete_account(&email).await?)
}
