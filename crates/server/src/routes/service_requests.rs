use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use models::{ServiceRequest, ServiceRequestPayload};
use service::{ServiceError, ServiceRequestRepository};
use tracing::info;
use uuid::Uuid;

use crate::errors::JsonApiError;

/// Shared handler state: the repository all routes run against.
#[derive(Clone)]
pub struct ServerState {
    pub store: Arc<dyn ServiceRequestRepository>,
}

fn bad_id() -> JsonApiError {
    JsonApiError::new(
        StatusCode::BAD_REQUEST,
        "Bad Request",
        Some("id must not be the nil uuid".into()),
    )
}

fn not_found(id: Uuid) -> JsonApiError {
    JsonApiError::new(
        StatusCode::NOT_FOUND,
        "Not Found",
        Some(format!("service request {id} not found")),
    )
}

fn store_error(e: ServiceError) -> JsonApiError {
    match e {
        ServiceError::NotFound(msg) => {
            JsonApiError::new(StatusCode::NOT_FOUND, "Not Found", Some(msg))
        }
        ServiceError::Conflict(msg) => {
            JsonApiError::new(StatusCode::CONFLICT, "Conflict", Some(msg))
        }
    }
}

/// List all service requests that are not soft-deleted.
/// An empty store maps to 204, anything else to 200 with the collection.
#[utoipa::path(get, path = "/servicerequest", tag = "servicerequest",
    responses(
        (status = 200, description = "Open service requests"),
        (status = 204, description = "No open service requests")
    )
)]
pub async fn list(State(state): State<ServerState>) -> Response {
    let open = state.store.list_open().await;
    if open.is_empty() {
        StatusCode::NO_CONTENT.into_response()
    } else {
        Json(open).into_response()
    }
}

/// Fetch one service request by id, soft-deleted ones included.
#[utoipa::path(get, path = "/servicerequest/{id}", tag = "servicerequest",
    params(("id" = Uuid, Path, description = "Service request id")),
    responses(
        (status = 200, description = "Found"),
        (status = 400, description = "Nil id"),
        (status = 404, description = "Unknown id")
    )
)]
pub async fn get(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ServiceRequest>, JsonApiError> {
    if id.is_nil() {
        return Err(bad_id());
    }
    match state.store.get_by_id(id).await {
        Some(rec) => Ok(Json(rec)),
        None => Err(not_found(id)),
    }
}

/// Create a service request. The id is optional; the store generates one and
/// stamps creation provenance before returning the stored record.
#[utoipa::path(post, path = "/servicerequest", tag = "servicerequest",
    request_body = crate::openapi::ServiceRequestPayloadDoc,
    responses(
        (status = 201, description = "Created"),
        (status = 409, description = "Duplicate id")
    )
)]
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<ServiceRequestPayload>,
) -> Result<(StatusCode, Json<ServiceRequest>), JsonApiError> {
    match state.store.create(payload).await {
        Ok(rec) => {
            info!(id = %rec.id, building = %rec.building_code, "service request created");
            Ok((StatusCode::CREATED, Json(rec)))
        }
        Err(e) => Err(store_error(e)),
    }
}

/// Replace a service request. The current record is re-read as the snapshot
/// the store's conditional replace is keyed on; a concurrent writer between
/// the read and the replace surfaces as 409 and the client should retry.
#[utoipa::path(put, path = "/servicerequest/{id}", tag = "servicerequest",
    params(("id" = Uuid, Path, description = "Service request id")),
    request_body = crate::openapi::ServiceRequestPayloadDoc,
    responses(
        (status = 204, description = "Updated"),
        (status = 400, description = "Nil id"),
        (status = 404, description = "Unknown id"),
        (status = 409, description = "Concurrent modification, retry")
    )
)]
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ServiceRequestPayload>,
) -> Result<StatusCode, JsonApiError> {
    if id.is_nil() {
        return Err(bad_id());
    }
    let Some(existing) = state.store.get_by_id(id).await else {
        return Err(not_found(id));
    };
    state
        .store
        .update(id, payload, &existing)
        .await
        .map(|_| StatusCode::NO_CONTENT)
        .map_err(store_error)
}

/// Soft delete: flips the record to `Complete`; it stays addressable by id
/// but drops out of the list view. Same snapshot contract as update.
#[utoipa::path(delete, path = "/servicerequest/{id}", tag = "servicerequest",
    params(("id" = Uuid, Path, description = "Service request id")),
    responses(
        (status = 200, description = "Deleted"),
        (status = 400, description = "Nil id"),
        (status = 404, description = "Unknown id"),
        (status = 409, description = "Concurrent modification, retry")
    )
)]
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, JsonApiError> {
    if id.is_nil() {
        return Err(bad_id());
    }
    let Some(existing) = state.store.get_by_id(id).await else {
        return Err(not_found(id));
    };
    match state.store.delete(id, &existing).await {
        Ok(_) => {
            info!(%id, "service request deleted");
            Ok(Json(serde_json::json!({
                "message": format!("service request '{id}' got deleted successfully")
            })))
        }
        Err(e) => Err(store_error(e)),
    }
}
