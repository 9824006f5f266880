use chrono::NaiveDateTime;
use serde::Serialize;

use super::domain::{MonthStamp, RequestId, ServiceRequest, UserId, Vehicle, VehicleId};

/// Storage abstraction for vehicles so the service can be exercised without a
/// database. The relational store behind an implementation owns the counting
/// guarantees; this module only issues reads and single writes.
pub trait VehicleRepository: Send + Sync {
    fn insert(&self, vehicle: Vehicle) -> Result<Vehicle, RepositoryError>;
    /// Remove an owner's vehicle. `NotFound` covers both a missing id and a
    /// vehicle registered to somebody else.
    fn remove(&self, owner: &UserId, id: &VehicleId) -> Result<(), RepositoryError>;
    fn fetch(&self, id: &VehicleId) -> Result<Option<Vehicle>, RepositoryError>;
    fn count_for_owner(&self, owner: &UserId) -> Result<u32, RepositoryError>;
    fn list_for_owner(&self, owner: &UserId) -> Result<Vec<Vehicle>, RepositoryError>;
}

/// Storage abstraction for service requests.
pub trait ServiceRequestRepository: Send + Sync {
    fn insert(&self, request: ServiceRequest) -> Result<ServiceRequest, RepositoryError>;
    fn update(&self, request: ServiceRequest) -> Result<(), RepositoryError>;
    fn fetch(&self, id: &RequestId) -> Result<Option<ServiceRequest>, RepositoryError>;
    /// Requests created by `requester` whose `created_at` falls in `month`.
    fn count_for_month(&self, requester: &UserId, month: MonthStamp)
        -> Result<u32, RepositoryError>;
    fn list_for_requester(&self, requester: &UserId) -> Result<Vec<ServiceRequest>, RepositoryError>;
    /// Unassigned pending requests visible to the mechanic pool.
    fn list_open(&self) -> Result<Vec<ServiceRequest>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Sanitized representation of a request for API responses.
#[derive(Debug, Clone, Serialize)]
pub struct ServiceRequestView {
    pub request_id: RequestId,
    pub requester_id: UserId,
    pub vehicle_id: VehicleId,
    pub service_type: &'static str,
    pub status: &'static str,
    pub description: String,
    pub created_at: NaiveDateTime,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mechanic_id: Option<UserId>,
}

impl ServiceRequest {
    pub fn view(&self) -> ServiceRequestView {
        ServiceRequestView {
            request_id: self.id.clone(),
            requester_id: self.requester_id.clone(),
            vehicle_id: self.vehicle_id.clone(),
            service_type: self.service_type.label(),
            status: self.status.label(),
            description: self.description.clone(),
            created_at: self.created_at,
            mechanic_id: self.mechanic_id.clone(),
        }
    }
}
