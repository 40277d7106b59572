//! Authentication, session, profile, and navigation endpoints.

use axum::{
    extract::{Path, State},
    Json,
};

use super::{committed, success, ApiResult};
use crate::auth::NavigationDecision;
use crate::models::{
    Account, ChangePasswordRequest, LoginRequest, RegisterRequest, UpdateProfileRequest,
};
use crate::AppState;

/// POST /api/auth/register - Register a new, unverified account.
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> ApiResult<Account> {
    committed(state.auth.register(&request).await?)
}

/// POST /api/auth/verify - Complete verification for the pending email.
pub async fn verify_email(State(state): State<AppState>) -> ApiResult<Account> {
    committed(state.auth.verify_pending().await?)
}

/// POST /api/auth/login - Authenticate and open the session.
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> ApiResult<Account> {
    success(state.auth.login(&request).await?)
}

/// POST /api/auth/logout - Close the session.
pub async fn logout(State(state): State<AppState>) -> ApiResult<()> {
    state.auth.current_session().await?;
    success(state.auth.logout().await?)
}

/// GET /api/auth/session - Reconstruct the session from the stored token.
pub async fn session(State(state): State<AppState>) -> ApiResult<Account> {
    success(state.auth.current_session().await?)
}

/// GET /api/navigation/{route} - Authorization decision for a named route.
pub async fn navigation(
    State(state): State<AppState>,
    Path(route): Path<String>,
) -> ApiResult<NavigationDecision> {
    success(state.auth.navigate(&route).await)
}

/// GET /api/profile - The session account.
pub async fn get_profile(State(state): State<AppState>) -> ApiResult<Account> {
    success(state.auth.current_session().await?)
}

/// PUT /api/profile - Edit the session account's names.
pub async fn update_profile(
    State(state): State<AppState>,
    Json(request): Json<UpdateProfileRequest>,
) -> ApiResult<Account> {
    committed(state.auth.update_profile(&request).await?)
}

/// PUT /api/profile/password - Change the session account's password.
pub async fn change_password(
    State(state): State<AppState>,
    Json(request): Json<ChangePasswordRequest>,
) -> ApiResult<()> {
    committed(state.auth.change_password(&request).await?)
}
