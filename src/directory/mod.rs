//! Directory service: department and employee CRUD with cross-entity
//! integrity checks. Every operation is restricted to Admin callers.
//!
//! Integrity rules: a department cannot be deleted while employees reference
//! it, and an employee's userEmail must name an existing account. Both are
//! enforced procedurally before commit; references are plain values, not
//! foreign-key constraints.

use std::sync::Arc;

use chrono::Utc;

use crate::auth::{normalize_email, AuthService};
use crate::errors::AppError;
use crate::models::{
    Account, CreateDepartmentRequest, CreateEmployeeRequest, Department, Employee,
    UpdateDepartmentRequest, UpdateEmployeeRequest,
};
use crate::store::{Mutated, Store};

pub struct Directory {
    store: Arc<Store>,
    auth: Arc<AuthService>,
}

impl Directory {
    pub fn new(store: Arc<Store>, auth: Arc<AuthService>) -> Self {
        Self { store, auth }
    }

    // ==================== DEPARTMENTS ====================

    pub async fn list_departments(&self) -> Result<Vec<Department>, AppError> {
        self.auth.require_admin().await?;
        Ok(self
            .store
            .read(|snapshot| snapshot.departments.clone())
            .await)
    }

    /// Create a department; the id is one past the current maximum.
    pub async fn create_department(
        &self,
        req: &CreateDepartmentRequest,
    ) -> Result<Mutated<Department>, AppError> {
        self.auth.require_admin().await?;

        let name = req.name.trim().to_string();
        let description = req.description.trim().to_string();
        validate_department_fields(&name, &description)?;

        self.store
            .mutate(move |snapshot| {
                if snapshot
                    .departments
                    .iter()
                    .any(|d| d.name.eq_ignore_ascii_case(&name))
                {
                    return Err(AppError::Conflict(
                        "Department name already exists".to_string(),
                    ));
                }
                let id = snapshot
                    .departments
                    .iter()
                    .map(|d| d.id)
                    .max()
                    .unwrap_or(0)
                    + 1;
                let department = Department {
                    id,
                    name,
                    description,
                };
                snapshot.departments.push(department.clone());
                Ok(department)
            })
            .await
    }

    /// Update a department; the duplicate-name check excludes the record
    /// being edited.
    pub async fn update_department(
        &self,
        id: i64,
        req: &UpdateDepartmentRequest,
    ) -> Result<Mutated<Department>, AppError> {
        self.auth.require_admin().await?;

        let name = req.name.trim().to_string();
        let description = req.description.trim().to_string();
        validate_department_fields(&name, &description)?;

        self.store
            .mutate(move |snapshot| {
                if snapshot
                    .departments
                    .iter()
                    .any(|d| d.id != id && d.name.eq_ignore_ascii_case(&name))
                {
                    return Err(AppError::Conflict(
                        "Department name already exists".to_string(),
                    ));
                }
                let department = snapshot
                    .departments
                    .iter_mut()
                    .find(|d| d.id == id)
                    .ok_or_else(|| AppError::NotFound("Department not found".to_string()))?;
                department.name = name;
                department.description = description;
                Ok(department.clone())
            })
            .await
    }

    /// Delete a department, blocked while any employee references it.
    pub async fn delete_department(&self, id: i64) -> Result<Mutated<()>, AppError> {
        self.auth.require_admin().await?;

        self.store
            .mutate(move |snapshot| {
                if snapshot.find_department(id).is_none() {
                    return Err(AppError::NotFound("Department not found".to_string()));
                }
                let dependents = snapshot
                    .employees
                    .iter()
                    .filter(|e| e.department_id == id)
                    .count();
                if dependents > 0 {
                    return Err(AppError::DependentEntities {
                        message: format!(
                            "This department has {} employee(s) assigned to it",
                            dependents
                        ),
                        count: dependents,
                    });
                }
                snapshot.departments.retain(|d| d.id != id);
                Ok(())
            })
            .await
    }

    // ==================== EMPLOYEES ====================

    pub async fn list_employees(&self) -> Result<Vec<Employee>, AppError> {
        self.auth.require_admin().await?;
        Ok(self.store.read(|snapshot| snapshot.employees.clone()).await)
    }

    /// Accounts offerable as a new employee's userEmail: not Admin, not
    /// already linked. A convenience filter for callers, not an invariant
    /// of `create_employee`.
    pub async fn candidate_accounts(&self) -> Result<Vec<Account>, AppError> {
        self.auth.require_admin().await?;
        Ok(self
            .store
            .read(|snapshot| {
                snapshot
                    .accounts
                    .iter()
                    .filter(|a| {
                        !a.role.is_admin() && snapshot.employee_for_account(&a.email).is_none()
                    })
                    .cloned()
                    .collect()
            })
            .await)
    }

    pub async fn create_employee(
        &self,
        req: &CreateEmployeeRequest,
    ) -> Result<Mutated<Employee>, AppError> {
        self.auth.require_admin().await?;

        let employee_id = req.employee_id.trim().to_string();
        let user_email = normalize_email(&req.user_email);
        let position = req.position.trim().to_string();
        validate_employee_fields(&employee_id, &user_email, &position, req.hire_date)?;

        let department_id = req.department_id;
        let hire_date = req.hire_date;
        self.store
            .mutate(move |snapshot| {
                if snapshot.find_account(&user_email).is_none() {
                    return Err(AppError::NotFound(
                        "User email does not exist. Please create an account first.".to_string(),
                    ));
                }
                if snapshot.find_employee(&employee_id).is_some() {
                    return Err(AppError::Conflict(
                        "Employee ID already exists. Please use a different ID.".to_string(),
                    ));
                }
                if snapshot.find_department(department_id).is_none() {
                    return Err(AppError::NotFound("Department not found".to_string()));
                }
                let employee = Employee {
                    employee_id,
                    user_email,
                    position,
                    department_id,
                    hire_date,
                };
                snapshot.employees.push(employee.clone());
                Ok(employee)
            })
            .await
    }

    /// Update an employee in place. The employee id is the immutable key;
    /// every other field is freely replaceable.
    pub async fn update_employee(
        &self,
        employee_id: &str,
        req: &UpdateEmployeeRequest,
    ) -> Result<Mutated<Employee>, AppError> {
        self.auth.require_admin().await?;

        let employee_id = employee_id.trim().to_string();
        let user_email = normalize_email(&req.user_email);
        let position = req.position.trim().to_string();
        validate_employee_fields(&employee_id, &user_email, &position, req.hire_date)?;

        let department_id = req.department_id;
        let hire_date = req.hire_date;
        self.store
            .mutate(move |snapshot| {
                if snapshot.find_account(&user_email).is_none() {
                    return Err(AppError::NotFound(
                        "User email does not exist. Please create an account first.".to_string(),
                    ));
                }
                if snapshot.find_department(department_id).is_none() {
                    return Err(AppError::NotFound("Department not found".to_string()));
                }
                let employee = snapshot
                    .employees
                    .iter_mut()
                    .find(|e| e.employee_id == employee_id)
                    .ok_or_else(|| AppError::NotFound("Employee not found".to_string()))?;
                employee.user_email = user_email;
                employee.position = position;
                employee.department_id = department_id;
                employee.hire_date = hire_date;
                Ok(employee.clone())
            })
            .await
    }

    /// Unconditional removal; employees have no dependents to cascade.
    pub async fn delete_employee(&self, employee_id: &str) -> Result<Mutated<()>, AppError> {
        self.auth.require_admin().await?;

        let employee_id = employee_id.trim().to_string();
        self.store
            .mutate(move |snapshot| {
                if snapshot.find_employee(&employee_id).is_none() {
                    return Err(AppError::NotFound("Employee not found".to_string()));
                }
                snapshot.employees.retain(|e| e.employee_id != employee_id);
                Ok(())
            })
            .await
    }
}

fn validate_department_fields(name: &str, description: &str) -> Result<(), AppError> {
    if name.is_empty() || description.is_empty() {
        return Err(AppError::Validation(
            "Please fill in all fields".to_string(),
        ));
    }
    if name.len() < 2 {
        return Err(AppError::Validation(
            "Department name must be at least 2 characters".to_string(),
        ));
    }
    Ok(())
}

fn validate_employee_fields(
    employee_id: &str,
    user_email: &str,
    position: &str,
    hire_date: chrono::NaiveDate,
) -> Result<(), AppError> {
    if employee_id.is_empty() || user_email.is_empty() || position.is_empty() {
        return Err(AppError::Validation(
            "Please fill in all required fields".to_string(),
        ));
    }
    // Date-only comparison, time of day ignored.
    if hire_date > Utc::now().date_naive() {
        return Err(AppError::Validation(
            "Hire date cannot be in the future".to_string(),
        ));
    }
    Ok(())
}
