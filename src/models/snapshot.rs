//! Snapshot: the complete serialized state of all four collections.

use serde::{Deserialize, Serialize};

use super::{Account, Department, Employee, SupplyRequest};

/// The root state object persisted as a single JSON document. Cross-entity
/// references are by value (email, id), so lookups are linear scans over
/// the owning collection.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub accounts: Vec<Account>,
    pub departments: Vec<Department>,
    pub employees: Vec<Employee>,
    pub requests: Vec<SupplyRequest>,
}

impl Snapshot {
    pub fn find_account(&self, email: &str) -> Option<&Account> {
        self.accounts.iter().find(|a| a.email == email)
    }

    pub fn find_account_mut(&mut self, email: &str) -> Option<&mut Account> {
        self.accounts.iter_mut().find(|a| a.email == email)
    }

    pub fn find_department(&self, id: i64) -> Option<&Department> {
        self.departments.iter().find(|d| d.id == id)
    }

    pub fn find_employee(&self, employee_id: &str) -> Option<&Employee> {
        self.employees.iter().find(|e| e.employee_id == employee_id)
    }

    pub fn find_request_mut(&mut self, id: i64) -> Option<&mut SupplyRequest> {
        self.requests.iter_mut().find(|r| r.id == id)
    }

    /// Employee linked to an account, if any. At most one exists by the
    /// creation-time candidate filter, so first match wins.
    pub fn employee_for_account(&self, email: &str) -> Option<&Employee> {
        self.employees.iter().find(|e| e.user_email == email)
    }
}
