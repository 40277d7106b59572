//! Employee model: links an account to a department with employment attributes.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// An employee record. `employee_id` is the user-supplied primary key and is
/// immutable after creation; `user_email` references an account and
/// `department_id` references a department, both by value.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    pub employee_id: String,
    pub user_email: String,
    pub position: String,
    pub department_id: i64,
    pub hire_date: NaiveDate,
}

/// Request body for creating a new employee.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateEmployeeRequest {
    pub employee_id: String,
    pub user_email: String,
    pub position: String,
    pub department_id: i64,
    pub hire_date: NaiveDate,
}

/// Request body for updating an employee. The employee id travels in the
/// path and cannot be changed through this operation.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEmployeeRequest {
    pub user_email: String,
    pub position: String,
    pub department_id: i64,
    pub hire_date: NaiveDate,
}
