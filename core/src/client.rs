//! Stateless HTTP request builder and response parser for the timesheet API.
//!
//! # Design
//! `TimesheetClient` holds only a `base_url`. Each operation is split into a
//! `build_*` method that produces an `HttpRequest` and a `parse_*` method that
//! consumes an `HttpResponse`. Every endpoint answers 200 on success.

use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use uuid::Uuid;

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{Ack, Entry, EntryPatch, NewEntry, UpdateAck};

/// Synchronous, stateless client for the timesheet API.
#[derive(Debug, Clone)]
pub struct TimesheetClient {
    base_url: String,
}

impl TimesheetClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn build_list_entries(&self) -> HttpRequest {
        self.request(HttpMethod::Get, format!("{}/api", self.base_url), None)
    }

    /// Entries dated on `day`, as the server's local calendar sees it.
    pub fn build_filter_by_date(&self, day: NaiveDate) -> HttpRequest {
        let url = format!("{}/api/filter?date={}", self.base_url, day.format("%Y-%m-%d"));
        self.request(HttpMethod::Get, url, None)
    }

    /// Entries dated within `month` of `year`. The month is sent as given;
    /// the server rejects values outside 1..=12.
    pub fn build_filter_by_month(&self, year: i32, month: u32) -> HttpRequest {
        let url = format!("{}/api/filter?monthYear={year:04}-{month:02}", self.base_url);
        self.request(HttpMethod::Get, url, None)
    }

    pub fn build_create_entry(&self, input: &NewEntry) -> Result<HttpRequest, ApiError> {
        let body = to_json(input)?;
        Ok(self.request(HttpMethod::Post, format!("{}/api", self.base_url), Some(body)))
    }

    pub fn build_update_entry(
        &self,
        id: Uuid,
        patch: &EntryPatch,
    ) -> Result<HttpRequest, ApiError> {
        let body = to_json(patch)?;
        Ok(self.request(HttpMethod::Put, format!("{}/api/{id}", self.base_url), Some(body)))
    }

    pub fn build_delete_entry(&self, id: Uuid) -> HttpRequest {
        self.request(HttpMethod::Delete, format!("{}/api/{id}", self.base_url), None)
    }

    pub fn parse_list_entries(&self, response: HttpResponse) -> Result<Vec<Entry>, ApiError> {
        parse_ok(response)
    }

    pub fn parse_filter_entries(&self, response: HttpResponse) -> Result<Vec<Entry>, ApiError> {
        parse_ok(response)
    }

    pub fn parse_create_entry(&self, response: HttpResponse) -> Result<Ack, ApiError> {
        parse_ok(response)
    }

    pub fn parse_update_entry(&self, response: HttpResponse) -> Result<UpdateAck, ApiError> {
        parse_ok(response)
    }

    pub fn parse_delete_entry(&self, response: HttpResponse) -> Result<Ack, ApiError> {
        parse_ok(response)
    }

    fn request(&self, method: HttpMethod, url: String, body: Option<String>) -> HttpRequest {
        let headers = match body {
            Some(_) => vec![("content-type".to_string(), "application/json".to_string())],
            None => Vec::new(),
        };
        HttpRequest {
            method,
            url,
            headers,
            body,
        }
    }
}

/// Error body shape shared by every failing endpoint.
#[derive(Deserialize)]
struct ErrorBody {
    message: String,
    #[serde(default)]
    data: Option<Value>,
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String, ApiError> {
    serde_json::to_string(value).map_err(|e| ApiError::SerializationError(e.to_string()))
}

fn parse_ok<T: DeserializeOwned>(response: HttpResponse) -> Result<T, ApiError> {
    let body = check_status(response)?;
    serde_json::from_str(&body).map_err(|e| ApiError::DeserializationError(e.to_string()))
}

/// Map non-200 statuses to the matching `ApiError` variant, returning the body
/// on success.
fn check_status(response: HttpResponse) -> Result<String, ApiError> {
    match response.status {
        200 => Ok(response.body),
        400 => {
            let message = match error_body(&response.body) {
                Some(body) => body.message,
                None => response.body,
            };
            Err(ApiError::BadRequest { message })
        }
        404 => {
            let (message, data) = match error_body(&response.body) {
                Some(body) => (body.message, body.data),
                None => (response.body, None),
            };
            Err(ApiError::NotFound { message, data })
        }
        status => Err(ApiError::HttpError {
            status,
            body: response.body,
        }),
    }
}

fn error_body(body: &str) -> Option<ErrorBody> {
    serde_json::from_str(body).ok()
}
