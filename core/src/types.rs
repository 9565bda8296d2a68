//! Wire types of the timesheet API.
//!
//! # Design
//! Defined independently from the server crate so the client carries no axum
//! or tokio dependency. The end-to-end test in `tests/integration.rs` catches
//! schema drift between the two.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A stored time entry as returned by list and filter.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Entry {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub date: DateTime<Utc>,
    pub in_time: String,
    pub out_time: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

/// Request payload for recording a new entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewEntry {
    pub date: DateTime<Utc>,
    pub in_time: String,
    pub out_time: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

/// Request payload for changing an entry. Only the fields present in the
/// JSON are replaced on the server; `location: Some(None)` is sent as `null`
/// and clears it.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub in_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub out_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<Option<String>>,
}

/// Confirmation returned by create and delete.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Ack {
    pub message: String,
}

/// Confirmation returned by update.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UpdateAck {
    pub message: String,
    #[serde(rename = "_id")]
    pub id: Uuid,
}
