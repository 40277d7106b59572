//! Request workflow: the supply-request state machine.
//!
//! Pending is the initial state; Approved, Rejected, and Cancelled are
//! terminal. Cancel belongs to the owner, approve and reject to Admins, and
//! every transition starts from Pending or fails with InvalidTransition,
//! leaving the status unchanged. Requests are never deleted.

use std::sync::Arc;

use chrono::Utc;

use crate::auth::AuthService;
use crate::errors::AppError;
use crate::models::{RequestStatus, Snapshot, SubmitRequest, SupplyRequest};
use crate::store::{Mutated, Store};

pub struct Workflow {
    store: Arc<Store>,
    auth: Arc<AuthService>,
}

impl Workflow {
    pub fn new(store: Arc<Store>, auth: Arc<AuthService>) -> Self {
        Self { store, auth }
    }

    /// Submit a new request for the session account.
    pub async fn submit(&self, req: &SubmitRequest) -> Result<Mutated<SupplyRequest>, AppError> {
        let session = self.auth.current_session().await?;

        let request_type = req.request_type.trim().to_string();
        if request_type.is_empty() {
            return Err(AppError::Validation("Request type is required".to_string()));
        }
        let mut items = req.items.clone();
        if items.is_empty() {
            return Err(AppError::Validation(
                "Please add at least one item with name and quantity".to_string(),
            ));
        }
        for item in &mut items {
            item.name = item.name.trim().to_string();
            if item.name.is_empty() {
                return Err(AppError::Validation(
                    "Please complete all item fields or remove empty rows".to_string(),
                ));
            }
            if item.qty < 1 {
                return Err(AppError::Validation(
                    "Quantity must be at least 1".to_string(),
                ));
            }
        }

        self.store
            .mutate(move |snapshot| {
                let request = SupplyRequest {
                    id: next_request_id(snapshot),
                    request_type,
                    items,
                    status: RequestStatus::Pending,
                    date: Utc::now().date_naive(),
                    employee_email: session.email,
                };
                snapshot.requests.push(request.clone());
                Ok(request)
            })
            .await
    }

    /// Cancel a pending request; only its owner may do so.
    pub async fn cancel(&self, id: i64) -> Result<Mutated<SupplyRequest>, AppError> {
        let session = self.auth.current_session().await?;

        self.store
            .mutate(move |snapshot| {
                let request = snapshot
                    .find_request_mut(id)
                    .ok_or_else(|| AppError::NotFound("Request not found".to_string()))?;
                if request.employee_email != session.email {
                    return Err(AppError::Forbidden(
                        "Only the request owner can cancel it".to_string(),
                    ));
                }
                transition(request, RequestStatus::Cancelled, "cancelled")
            })
            .await
    }

    /// Approve a pending request (Admin only).
    pub async fn approve(&self, id: i64) -> Result<Mutated<SupplyRequest>, AppError> {
        self.decide(id, RequestStatus::Approved, "approved").await
    }

    /// Reject a pending request (Admin only).
    pub async fn reject(&self, id: i64) -> Result<Mutated<SupplyRequest>, AppError> {
        self.decide(id, RequestStatus::Rejected, "rejected").await
    }

    async fn decide(
        &self,
        id: i64,
        to: RequestStatus,
        verb: &'static str,
    ) -> Result<Mutated<SupplyRequest>, AppError> {
        self.auth.require_admin().await?;

        self.store
            .mutate(move |snapshot| {
                let request = snapshot
                    .find_request_mut(id)
                    .ok_or_else(|| AppError::NotFound("Request not found".to_string()))?;
                transition(request, to, verb)
            })
            .await
    }

    /// Requests owned by the session account.
    pub async fn list_mine(&self) -> Result<Vec<SupplyRequest>, AppError> {
        let session = self.auth.current_session().await?;
        Ok(self
            .store
            .read(|snapshot| {
                snapshot
                    .requests
                    .iter()
                    .filter(|r| r.employee_email == session.email)
                    .cloned()
                    .collect()
            })
            .await)
    }

    /// Every request in the system (Admin view).
    pub async fn list_all(&self) -> Result<Vec<SupplyRequest>, AppError> {
        self.auth.require_admin().await?;
        Ok(self.store.read(|snapshot| snapshot.requests.clone()).await)
    }
}

fn transition(
    request: &mut SupplyRequest,
    to: RequestStatus,
    verb: &'static str,
) -> Result<SupplyRequest, AppError> {
    if request.status.is_terminal() {
        return Err(AppError::InvalidTransition(format!(
            "Only pending requests can be {}",
            verb
        )));
    }
    request.status = to;
    Ok(request.clone())
}

/// Timestamp-derived id, bumped past the existing maximum on collision so
/// rapid submissions in the same millisecond stay unique and sortable.
fn next_request_id(snapshot: &Snapshot) -> i64 {
    let id = Utc::now().timestamp_millis();
    if snapshot.requests.iter().any(|r| r.id == id) {
        snapshot.requests.iter().map(|r| r.id).max().unwrap_or(id) + 1
    } else {
        id
    }
}
