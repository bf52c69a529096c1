use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use models::{CurrentStatus, ServiceRequest, ServiceRequestPayload};
use tracing::debug;
use uuid::Uuid;

use crate::errors::ServiceError;
use crate::repository::ServiceRequestRepository;

/// Actor recorded when a payload does not name one (business rule).
const DEFAULT_ACTOR: &str = "System admin";

/// Concurrent in-memory store for service requests, keyed by id.
///
/// All mutation goes through compare-and-replace: the caller reads a
/// snapshot, the store computes the merged record, and the replace happens
/// under the shard lock only if the stored value still equals the snapshot.
/// Contended writes on one id see exactly one winner; losers get
/// [`ServiceError::Conflict`]. Different ids never serialize against each
/// other beyond shard granularity.
///
/// Deletion is soft: the record flips to `Complete` and drops out of
/// [`list_open`](Self::list_open), but stays addressable by id. Keys are
/// never removed, so an id is never reassigned. Hard delete would remove the
/// entry instead; not implemented here.
#[derive(Clone, Default)]
pub struct ServiceRequestStore {
    requests: Arc<DashMap<Uuid, ServiceRequest>>,
}

impl ServiceRequestStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Look up a service request by id, soft-deleted ones included.
    pub async fn get_by_id(&self, id: Uuid) -> Option<ServiceRequest> {
        self.requests.get(&id).map(|r| r.value().clone())
    }

    /// All requests that are not completed (soft-deleted), unordered.
    /// An empty store yields an empty vec, never an error.
    pub async fn list_open(&self) -> Vec<ServiceRequest> {
        // Completed requests are filtered out here; paging and richer
        // filtering are a known gap.
        self.requests
            .iter()
            .filter(|r| r.current_status != CurrentStatus::Complete)
            .map(|r| r.value().clone())
            .collect()
    }

    /// Insert a new request. A nil/absent id gets a fresh one; creation
    /// provenance is stamped by the store and the status is forced to
    /// `Created` regardless of the payload.
    pub async fn create(
        &self,
        payload: ServiceRequestPayload,
    ) -> Result<ServiceRequest, ServiceError> {
        let id = payload.id.filter(|id| !id.is_nil()).unwrap_or_else(Uuid::new_v4);
        let record = ServiceRequest {
            id,
            building_code: payload.building_code,
            description: payload.description,
            current_status: CurrentStatus::Created,
            created_by: payload.created_by.unwrap_or_else(|| DEFAULT_ACTOR.to_string()),
            created_date: Utc::now(),
            last_modified_by: None,
            last_modified_date: None,
        };
        // Guards caller-supplied ids; generated ones cannot collide in practice.
        match self.requests.entry(id) {
            Entry::Occupied(_) => Err(ServiceError::Conflict(format!(
                "service request {id} already exists"
            ))),
            Entry::Vacant(slot) => {
                slot.insert(record.clone());
                debug!(%id, "service request created");
                Ok(record)
            }
        }
    }

    /// Replace the record at `id` with the payload, merged against the
    /// `expected` snapshot the caller read:
    /// - `created_by`/`created_date` are copied from `expected`, whatever
    ///   the payload carries for them is discarded
    /// - `last_modified_*` is stamped fresh, actor defaulting to the sentinel
    /// - everything else, status included, comes from the payload
    ///
    /// Fails with `NotFound` if the id is absent and with `Conflict` if the
    /// stored record no longer equals `expected`; either way the store is
    /// left untouched. Never retried internally.
    pub async fn update(
        &self,
        id: Uuid,
        payload: ServiceRequestPayload,
        expected: &ServiceRequest,
    ) -> Result<ServiceRequest, ServiceError> {
        let merged = ServiceRequest {
            id,
            building_code: payload.building_code,
            description: payload.description,
            current_status: payload.current_status.unwrap_or(expected.current_status),
            created_by: expected.created_by.clone(),
            created_date: expected.created_date,
            last_modified_by: Some(
                payload.last_modified_by.unwrap_or_else(|| DEFAULT_ACTOR.to_string()),
            ),
            last_modified_date: Some(Utc::now()),
        };

        let mut stored = self
            .requests
            .get_mut(&id)
            .ok_or_else(|| ServiceError::not_found("service request"))?;
        if *stored != *expected {
            return Err(ServiceError::Conflict(format!(
                "service request {id} was modified concurrently"
            )));
        }
        *stored = merged.clone();
        Ok(merged)
    }

    /// Soft delete: an update of the existing record with the status forced
    /// to `Complete` and modification provenance refreshed. Same snapshot
    /// contract as [`update`](Self::update).
    pub async fn delete(
        &self,
        id: Uuid,
        expected: &ServiceRequest,
    ) -> Result<ServiceRequest, ServiceError> {
        let payload = ServiceRequestPayload {
            id: Some(id),
            building_code: expected.building_code.clone(),
            description: expected.description.clone(),
            current_status: Some(CurrentStatus::Complete),
            created_by: Some(expected.created_by.clone()),
            last_modified_by: expected.last_modified_by.clone(),
        };
        let completed = self.update(id, payload, expected).await?;
        debug!(%id, "service request soft deleted");
        Ok(completed)
    }
}

#[async_trait]
impl ServiceRequestRepository for ServiceRequestStore {
    async fn get_by_id(&self, id: Uuid) -> Option<ServiceRequest> {
        self.get_by_id(id).await
    }

    async fn list_open(&self) -> Vec<ServiceRequest> {
        self.list_open().await
    }

    async fn create(&self, payload: ServiceRequestPayload) -> Result<ServiceRequest, ServiceError> {
        self.create(payload).await
    }

    async fn update(
        &self,
        id: Uuid,
        payload: ServiceRequestPayload,
        expected: &ServiceRequest,
    ) -> Result<ServiceRequest, ServiceError> {
        self.update(id, payload, expected).await
    }

    async fn delete(
        &self,
        id: Uuid,
        expected: &ServiceRequest,
    ) -> Result<ServiceRequest, ServiceError> {
        self.delete(id, expected).await
    }
}
