use async_trait::async_trait;
use models::{ServiceRequest, ServiceRequestPayload};
use uuid::Uuid;

use crate::errors::ServiceError;

/// Trait abstraction for service request storage.
/// Implementations can be in-memory, file-backed, or database-backed.
///
/// `update` and `delete` replace the stored record only if it still equals
/// `expected` (the snapshot the caller read the merge from); a concurrent
/// writer in between surfaces as `ServiceError::Conflict` and the caller is
/// expected to re-read and retry.
#[async_trait]
pub trait ServiceRequestRepository: Send + Sync {
    async fn get_by_id(&self, id: Uuid) -> Option<ServiceRequest>;
    async fn list_open(&self) -> Vec<ServiceRequest>;
    async fn create(&self, payload: ServiceRequestPayload) -> Result<ServiceRequest, ServiceError>;
    async fn update(
        &self,
        id: Uuid,
        payload: ServiceRequestPayload,
        expected: &ServiceRequest,
    ) -> Result<ServiceRequest, ServiceError>;
    async fn delete(&self, id: Uuid, expected: &ServiceRequest)
        -> Result<ServiceRequest, ServiceError>;
}
