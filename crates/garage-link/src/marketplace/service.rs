use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::NaiveDateTime;
use tracing::info;

use super::domain::{
    MonthStamp, RequestId, ServiceRequest, ServiceRequestStatus, ServiceType, UserId, Vehicle,
    VehicleId, VehicleSpec,
};
use super::lifecycle::{InvalidTransitionError, MechanicAction};
use super::plans::{PlanTier, Quota};
use super::policy::UsagePolicy;
use super::repository::{RepositoryError, ServiceRequestRepository, VehicleRepository};

static VEHICLE_SEQUENCE: AtomicU64 = AtomicU64::new(1);
static REQUEST_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_vehicle_id() -> VehicleId {
    let id = VEHICLE_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    VehicleId(format!("veh-{id:06}"))
}

fn next_request_id() -> RequestId {
    let id = REQUEST_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    RequestId(format!("req-{id:06}"))
}

/// Facade composing the usage policy with the vehicle and request stores.
///
/// Counts are re-derived from the repositories on every admission check; no
/// reservation is held between the check and the insert.
pub struct MarketplaceService<V, R> {
    policy: UsagePolicy,
    vehicles: Arc<V>,
    requests: Arc<R>,
}

impl<V, R> MarketplaceService<V, R>
where
    V: VehicleRepository + 'static,
    R: ServiceRequestRepository + 'static,
{
    pub fn new(policy: UsagePolicy, vehicles: Arc<V>, requests: Arc<R>) -> Self {
        Self {
            policy,
            vehicles,
            requests,
        }
    }

    pub fn policy(&self) -> &UsagePolicy {
        &self.policy
    }

    /// Register a vehicle for `owner`, refusing once the tier's vehicle
    /// entitlement is used up.
    pub fn register_vehicle(
        &self,
        owner: &UserId,
        tier: PlanTier,
        spec: VehicleSpec,
    ) -> Result<Vehicle, MarketplaceError> {
        let current = self.vehicles.count_for_owner(owner)?;
        if !self.policy.can_add_vehicle(tier, current) {
            let limit = self.policy.catalog().entitlements_for(tier).max_vehicles;
            return Err(MarketplaceError::VehicleLimitReached { tier, limit });
        }

        let vehicle = Vehicle::from_spec(next_vehicle_id(), owner.clone(), spec);
        let stored = self.vehicles.insert(vehicle)?;
        info!(vehicle = %stored.id.0, owner = %owner.0, "vehicle registered");
        Ok(stored)
    }

    /// Remove one of the owner's vehicles, freeing a slot in the entitlement.
    pub fn remove_vehicle(
        &self,
        owner: &UserId,
        vehicle_id: &VehicleId,
    ) -> Result<(), MarketplaceError> {
        self.vehicles.remove(owner, vehicle_id)?;
        info!(vehicle = %vehicle_id.0, owner = %owner.0, "vehicle removed");
        Ok(())
    }

    pub fn vehicles_for(&self, owner: &UserId) -> Result<Vec<Vehicle>, MarketplaceError> {
        Ok(self.vehicles.list_for_owner(owner)?)
    }

    /// Submit a service request for one of the requester's vehicles.
    ///
    /// `now` is the requester's timezone-naive submission timestamp; it both
    /// stamps the request and selects the calendar month for the cap check.
    pub fn submit_request(
        &self,
        requester: &UserId,
        tier: PlanTier,
        vehicle_id: &VehicleId,
        service_type: ServiceType,
        description: String,
        now: NaiveDateTime,
    ) -> Result<ServiceRequest, MarketplaceError> {
        let vehicle = self.vehicles.fetch(vehicle_id)?;
        match vehicle {
            Some(vehicle) if vehicle.owner_id == *requester => {}
            // Do not reveal whether the id exists under another owner.
            _ => return Err(MarketplaceError::UnknownVehicle),
        }

        let used = self
            .requests
            .count_for_month(requester, MonthStamp::of(now))?;
        if !self.policy.can_add_service_request(tier, used) {
            let limit = self
                .policy
                .catalog()
                .entitlements_for(tier)
                .max_requests_per_month;
            return Err(MarketplaceError::RequestLimitReached { tier, limit });
        }

        let request = ServiceRequest {
            id: next_request_id(),
            requester_id: requester.clone(),
            vehicle_id: vehicle_id.clone(),
            service_type,
            description,
            status: ServiceRequestStatus::Pending,
            created_at: now,
            mechanic_id: None,
        };

        let stored = self.requests.insert(request)?;
        info!(
            request = %stored.id.0,
            requester = %requester.0,
            service = stored.service_type.label(),
            "service request submitted"
        );
        Ok(stored)
    }

    pub fn accept(
        &self,
        mechanic: &UserId,
        request_id: &RequestId,
    ) -> Result<ServiceRequest, MarketplaceError> {
        self.transition(mechanic, request_id, MechanicAction::Accept)
    }

    pub fn reject(
        &self,
        mechanic: &UserId,
        request_id: &RequestId,
    ) -> Result<ServiceRequest, MarketplaceError> {
        self.transition(mechanic, request_id, MechanicAction::Reject)
    }

    pub fn start(
        &self,
        mechanic: &UserId,
        request_id: &RequestId,
    ) -> Result<ServiceRequest, MarketplaceError> {
        self.transition(mechanic, request_id, MechanicAction::Start)
    }

    pub fn complete(
        &self,
        mechanic: &UserId,
        request_id: &RequestId,
    ) -> Result<ServiceRequest, MarketplaceError> {
        self.transition(mechanic, request_id, MechanicAction::Complete)
    }

    /// Apply a mechanic action. The transition is validated before anything
    /// is written, so an illegal attempt never mutates stored state. An
    /// unassigned pending request can be claimed by any mechanic in the pool;
    /// once assigned, only that mechanic may drive it further.
    fn transition(
        &self,
        mechanic: &UserId,
        request_id: &RequestId,
        action: MechanicAction,
    ) -> Result<ServiceRequest, MarketplaceError> {
        let mut request = self
            .requests
            .fetch(request_id)?
            .ok_or(RepositoryError::NotFound)?;

        if let Some(assigned) = &request.mechanic_id {
            if assigned != mechanic {
                return Err(MarketplaceError::NotAssigned);
            }
        }

        request.status = request.status.apply(action)?;
        if request.mechanic_id.is_none() {
            request.mechanic_id = Some(mechanic.clone());
        }

        self.requests.update(request.clone())?;
        info!(
            request = %request.id.0,
            mechanic = %mechanic.0,
            status = request.status.label(),
            "service request transitioned"
        );
        Ok(request)
    }

    pub fn request(&self, request_id: &RequestId) -> Result<ServiceRequest, MarketplaceError> {
        let request = self
            .requests
            .fetch(request_id)?
            .ok_or(RepositoryError::NotFound)?;
        Ok(request)
    }

    pub fn requests_for(&self, requester: &UserId) -> Result<Vec<ServiceRequest>, MarketplaceError> {
        Ok(self.requests.list_for_requester(requester)?)
    }

    /// Unassigned pending requests for the mechanic pool view.
    pub fn open_requests(&self) -> Result<Vec<ServiceRequest>, MarketplaceError> {
        Ok(self.requests.list_open()?)
    }
}

/// Error raised by the marketplace facade.
#[derive(Debug, thiserror::Error)]
pub enum MarketplaceError {
    #[error("vehicle limit reached: the {tier} plan allows {limit} vehicle(s)")]
    VehicleLimitReached { tier: PlanTier, limit: Quota },
    #[error("monthly request limit reached: the {tier} plan allows {limit} request(s) per month")]
    RequestLimitReached { tier: PlanTier, limit: Quota },
    #[error("vehicle not found for this owner")]
    UnknownVehicle,
    #[error("request is assigned to another mechanic")]
    NotAssigned,
    #[error(transparent)]
    Transition(#[from] InvalidTransitionError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
