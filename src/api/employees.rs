//! Employee endpoints (Admin only).

use axum::{
    extract::{Path, State},
    Json,
};

use super::{committed, success, ApiResult};
use crate::models::{Account, CreateEmployeeRequest, Employee, UpdateEmployeeRequest};
use crate::AppState;

/// GET /api/employees - List all employees.
pub async fn list_employees(State(state): State<AppState>) -> ApiResult<Vec<Employee>> {
    success(state.directory.list_employees().await?)
}

/// GET /api/employees/candidates - Accounts offerable as a new employee's
/// user email (non-admin, not already linked).
pub async fn candidate_accounts(State(state): State<AppState>) -> ApiResult<Vec<Account>> {
    success(state.directory.candidate_accounts().await?)
}

/// POST /api/employees - Create an employee.
pub async fn create_employee(
    State(state): State<AppState>,
    Json(request): Json<CreateEmployeeRequest>,
) -> ApiResult<Employee> {
    committed(state.directory.create_employee(&request).await?)
}

/// PUT /api/employees/{employeeId} - Update an employee; the id is immutable.
pub async fn update_employee(
    State(state): State<AppState>,
    Path(employee_id): Path<String>,
    Json(request): Json<UpdateEmployeeRequest>,
) -> ApiResult<Employee> {
    committed(state.directory.update_employee(&employee_id, &request).await?)
}

/// DELETE /api/employees/{employeeId} - Delete an employee.
pub async fn delete_employee(
    State(state): State<AppState>,
    Path(employee_id): Path<String>,
) -> ApiResult<()> {
    committed(state.directory.delete_employee(&employee_id).await?)
}
