//! Supply request model and its status state machine.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Lifecycle status of a supply request. Pending is the only non-terminal
/// state; every transition leads out of Pending and nowhere else.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum RequestStatus {
    Pending,
    Approved,
    Rejected,
    Cancelled,
}

impl RequestStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, RequestStatus::Pending)
    }
}

/// A single line item on a request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RequestItem {
    pub name: String,
    pub qty: u32,
}

/// A supply/equipment request. The id is a millisecond timestamp at
/// submission, so ids sort by creation order. Requests are never deleted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SupplyRequest {
    pub id: i64,
    #[serde(rename = "type")]
    pub request_type: String,
    pub items: Vec<RequestItem>,
    pub status: RequestStatus,
    pub date: NaiveDate,
    pub employee_email: String,
}

/// Request body for submitting a new supply request. The owner comes from
/// the session, the id and date from the clock.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitRequest {
    #[serde(rename = "type")]
    pub request_type: String,
    pub items: Vec<RequestItem>,
}
