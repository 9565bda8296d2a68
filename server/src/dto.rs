//! Success bodies returned by the write endpoints.

use serde::{Deserialize, Serialize};

use crate::model::EntryId;

pub const ENTRY_ADDED: &str = "Data added successfully";
pub const ENTRY_UPDATED: &str = "Data updated successfully";
pub const ENTRY_DELETED: &str = "Data deleted successfully";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: &str) -> Self {
        Self {
            message: message.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateResponse {
    pub message: String,
    #[serde(rename = "_id")]
    pub id: EntryId,
}
