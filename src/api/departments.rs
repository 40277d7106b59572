//! Department endpoints (Admin only).

use axum::{
    extract::{Path, State},
    Json,
};

use super::{committed, success, ApiResult};
use crate::models::{CreateDepartmentRequest, Department, UpdateDepartmentRequest};
use crate::AppState;

/// GET /api/departments - List all departments.
pub async fn list_departments(State(state): State<AppState>) -> ApiResult<Vec<Department>> {
    success(state.directory.list_departments().await?)
}

/// POST /api/departments - Create a department.
pub async fn create_department(
    State(state): State<AppState>,
    Json(request): Json<CreateDepartmentRequest>,
) -> ApiResult<Department> {
    committed(state.directory.create_department(&request).await?)
}

/// PUT /api/departments/{id} - Update a department.
pub async fn update_department(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<UpdateDepartmentRequest>,
) -> ApiResult<Department> {
    committed(state.directory.update_department(id, &request).await?)
}

/// DELETE /api/departments/{id} - Delete a department; blocked while any
/// employee references it.
pub async fn delete_department(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<()> {
    committed(state.directory.delete_department(id).await?)
}
