//! Synchronous API client core for the timesheet service.
//!
//! # Overview
//! Builds `HttpRequest` values and parses `HttpResponse` values without
//! touching the network (host-does-IO pattern). The caller executes the
//! actual HTTP round-trip, keeping the core deterministic and testable.
//!
//! # Design
//! - `TimesheetClient` is stateless; it holds only `base_url`.
//! - Each operation is split into `build_*` (produces the request) and
//!   `parse_*` (consumes the response), so the I/O boundary is explicit.

pub mod client;
pub mod error;
pub mod http;
pub mod types;

pub use client::TimesheetClient;
pub use error::ApiError;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use types::{Ack, Entry, EntryPatch, NewEntry, UpdateAck};
