//! One handler per endpoint. Each validates its input, makes exactly one
//! store call and maps the outcome onto a response.

use axum::{
    body::Bytes,
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    Json,
};
use chrono::Local;
use serde_json::{Map, Value};
use tracing::{debug, info};

use crate::dto::{MessageResponse, UpdateResponse, ENTRY_ADDED, ENTRY_DELETED, ENTRY_UPDATED};
use crate::error::ApiError;
use crate::filter::{Filter, FilterParams};
use crate::model::{Entry, EntryId, EntryPatch, NewEntry};
use crate::state::AppState;

pub type HandlerResult<T> = Result<Json<T>, ApiError>;

const FETCH_FAILED: &str = "Error fetching data";
const ADD_FAILED: &str = "Error adding data";
const UPDATE_FAILED: &str = "Error updating data";
const DELETE_FAILED: &str = "Error deleting data";

/// GET /api
pub async fn list_entries(State(state): State<AppState>) -> HandlerResult<Vec<Entry>> {
    let entries = state.store.find_all().await.map_err(ApiError::store(FETCH_FAILED))?;
    Ok(Json(entries))
}

/// GET /api/filter?date=YYYY-MM-DD or ?monthYear=YYYY-MM
///
/// Days and months are resolved in the server's local time zone.
pub async fn filter_entries(
    State(state): State<AppState>,
    params: Result<Query<FilterParams>, QueryRejection>,
) -> HandlerResult<Vec<Entry>> {
    let Query(params) = params.map_err(|rejection| ApiError::Validation(rejection.body_text()))?;
    let filter = Filter::from_params(&params)?;
    let range = filter.range(&Local);
    debug!(?filter, start = %range.start, end = %range.end, "filtering entries");

    let entries = state
        .store
        .find_in_range(&range)
        .await
        .map_err(ApiError::store(FETCH_FAILED))?;
    Ok(Json(entries))
}

/// POST /api
pub async fn create_entry(
    State(state): State<AppState>,
    payload: Result<Json<NewEntry>, JsonRejection>,
) -> HandlerResult<MessageResponse> {
    let Json(input) = payload.map_err(|rejection| ApiError::Validation(rejection.body_text()))?;
    let entry = state.store.insert(input).await.map_err(ApiError::store(ADD_FAILED))?;
    info!(id = %entry.id, "entry added");
    Ok(Json(MessageResponse::new(ENTRY_ADDED)))
}

/// PUT /api/{id}
///
/// An empty body is an empty patch. An id that cannot name any entry is
/// reported like an unknown one.
pub async fn update_entry(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Bytes,
) -> HandlerResult<UpdateResponse> {
    let data = patch_body(&body)?;
    let patch: EntryPatch = serde_json::from_value(data.clone())
        .map_err(|err| ApiError::Validation(format!("Invalid entry payload: {err}")))?;

    let Ok(id) = id.parse::<EntryId>() else {
        return Err(ApiError::NotFound { data });
    };
    let updated = state
        .store
        .update_by_id(&id, patch)
        .await
        .map_err(ApiError::store(UPDATE_FAILED))?
        .ok_or(ApiError::NotFound { data })?;

    info!(id = %updated.id, "entry updated");
    Ok(Json(UpdateResponse {
        message: ENTRY_UPDATED.to_string(),
        id: updated.id,
    }))
}

/// DELETE /api/{id}
///
/// Answers the same whether or not anything matched.
pub async fn delete_entry(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> HandlerResult<MessageResponse> {
    if let Ok(id) = id.parse::<EntryId>() {
        let removed = state
            .store
            .delete_by_id(&id)
            .await
            .map_err(ApiError::store(DELETE_FAILED))?;
        if removed.is_some() {
            info!(%id, "entry deleted");
        }
    }
    Ok(Json(MessageResponse::new(ENTRY_DELETED)))
}

fn patch_body(body: &[u8]) -> Result<Value, ApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Object(Map::new()));
    }
    serde_json::from_slice(body)
        .map_err(|err| ApiError::Validation(format!("Invalid JSON body: {err}")))
}
