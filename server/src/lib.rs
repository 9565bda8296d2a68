//! REST backend for recording and querying time-tracking entries.
//!
//! # Overview
//! `/api` lists and creates entries, `/api/{id}` updates and deletes them and
//! `/api/filter` narrows the list to one local calendar day or month. Every
//! request is independent: a handler validates its input, makes one call on
//! the shared [`EntryStore`] and maps the result onto a JSON response.
//!
//! # Design
//! - The store is chosen once at start-up and injected through [`AppState`]:
//!   [`SqliteStore`] when `DATABASE_URL` is set, [`MemoryStore`] otherwise.
//!   There are no globals.
//! - Query and body parsing happen at the handler boundary, before any store
//!   call, and produce typed values or [`ApiError::Validation`].
//! - [`ApiError`] is the single place where failures become status codes.

pub mod config;
pub mod dates;
pub mod dto;
pub mod error;
pub mod filter;
pub mod handlers;
pub mod model;
pub mod state;
pub mod store;

use std::future::Future;

use axum::{
    routing::{get, put},
    Router,
};
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub use config::{Config, ConfigError};
pub use error::ApiError;
pub use model::{Entry, EntryId, EntryPatch, NewEntry};
pub use state::AppState;
pub use store::{EntryStore, MemoryStore, SqliteStore, StoreError};

pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/api", get(handlers::list_entries).post(handlers::create_entry))
        .route("/api/filter", get(handlers::filter_entries))
        .route(
            "/api/{id}",
            put(handlers::update_entry).delete(handlers::delete_entry),
        )
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Serves until `shutdown` resolves, then drains in-flight requests.
pub async fn run<F>(
    listener: TcpListener,
    state: AppState,
    shutdown: F,
) -> Result<(), std::io::Error>
where
    F: Future<Output = ()> + Send + 'static,
{
    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown)
        .await
}
