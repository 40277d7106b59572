//! Department model: organizational unit.

use serde::{Deserialize, Serialize};

/// A department. The id is assigned once (max existing + 1) and never changes;
/// the name is unique case-insensitively.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Department {
    pub id: i64,
    pub name: String,
    pub description: String,
}

/// Request body for creating a new department.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDepartmentRequest {
    pub name: String,
    pub description: String,
}

/// Request body for updating an existing department. The id is immutable
/// and travels in the path.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDepartmentRequest {
    pub name: String,
    pub description: String,
}
