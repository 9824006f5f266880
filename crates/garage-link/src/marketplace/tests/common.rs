use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::{NaiveDate, NaiveDateTime};
use serde_json::Value;

use crate::marketplace::domain::{
    MonthStamp, RequestId, ServiceRequest, ServiceRequestStatus, ServiceType, UserId, Vehicle,
    VehicleId, VehicleSpec,
};
use crate::marketplace::plans::{PlanCatalog, PlanTier};
use crate::marketplace::policy::UsagePolicy;
use crate::marketplace::repository::{
    RepositoryError, ServiceRequestRepository, VehicleRepository,
};
use crate::marketplace::router::marketplace_router;
use crate::marketplace::service::MarketplaceService;

pub(super) fn client() -> UserId {
    UserId("user-aline".to_string())
}

pub(super) fn mechanic() -> UserId {
    UserId("mech-rocha".to_string())
}

pub(super) fn other_mechanic() -> UserId {
    UserId("mech-silva".to_string())
}

pub(super) fn vehicle_spec() -> VehicleSpec {
    VehicleSpec {
        brand: "Fiat".to_string(),
        model: "Uno".to_string(),
        year: 2012,
        plate: "ABC-1234".to_string(),
        color: "red".to_string(),
    }
}

pub(super) fn ts(year: i32, month: u32, day: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(year, month, day)
        .expect("valid date")
        .and_hms_opt(10, 30, 0)
        .expect("valid time")
}

pub(super) fn build_service() -> (
    MarketplaceService<MemoryVehicles, MemoryRequests>,
    Arc<MemoryVehicles>,
    Arc<MemoryRequests>,
) {
    let vehicles = Arc::new(MemoryVehicles::default());
    let requests = Arc::new(MemoryRequests::default());
    let service = MarketplaceService::new(
        UsagePolicy::new(PlanCatalog::published()),
        vehicles.clone(),
        requests.clone(),
    );
    (service, vehicles, requests)
}

/// Register a vehicle and submit a pending request for it in one step.
pub(super) fn pending_request(
    service: &MarketplaceService<MemoryVehicles, MemoryRequests>,
    tier: PlanTier,
    now: NaiveDateTime,
) -> ServiceRequest {
    let vehicle = service
        .register_vehicle(&client(), tier, vehicle_spec())
        .expect("vehicle registers");
    service
        .submit_request(
            &client(),
            tier,
            &vehicle.id,
            ServiceType::Brakes,
            "front brakes squeal under load".to_string(),
            now,
        )
        .expect("request submits")
}

#[derive(Default, Clone)]
pub(super) struct MemoryVehicles {
    records: Arc<Mutex<HashMap<VehicleId, Vehicle>>>,
}

impl VehicleRepository for MemoryVehicles {
    fn insert(&self, vehicle: Vehicle) -> Result<Vehicle, RepositoryError> {
        let mut guard = self.records.lock().expect("vehicle mutex poisoned");
        if guard.contains_key(&vehicle.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(vehicle.id.clone(), vehicle.clone());
        Ok(vehicle)
    }

    fn remove(&self, owner: &UserId, id: &VehicleId) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("vehicle mutex poisoned");
        match guard.get(id) {
            Some(vehicle) if vehicle.owner_id == *owner => {
                guard.remove(id);
                Ok(())
            }
            _ => Err(RepositoryError::NotFound),
        }
    }

    fn fetch(&self, id: &VehicleId) -> Result<Option<Vehicle>, RepositoryError> {
        let guard = self.records.lock().expect("vehicle mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn count_for_owner(&self, owner: &UserId) -> Result<u32, RepositoryError> {
        let guard = self.records.lock().expect("vehicle mutex poisoned");
        Ok(guard
            .values()
            .filter(|vehicle| vehicle.owner_id == *owner)
            .count() as u32)
    }

    fn list_for_owner(&self, owner: &UserId) -> Result<Vec<Vehicle>, RepositoryError> {
        let guard = self.records.lock().expect("vehicle mutex poisoned");
        Ok(guard
            .values()
            .filter(|vehicle| vehicle.owner_id == *owner)
            .cloned()
            .collect())
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryRequests {
    records: Arc<Mutex<HashMap<RequestId, ServiceRequest>>>,
}

impl ServiceRequestRepository for MemoryRequests {
    fn insert(&self, request: ServiceRequest) -> Result<ServiceRequest, RepositoryError> {
        let mut guard = self.records.lock().expect("request mutex poisoned");
        if guard.contains_key(&request.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(request.id.clone(), request.clone());
        Ok(request)
    }

    fn update(&self, request: ServiceRequest) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("request mutex poisoned");
        if guard.contains_key(&request.id) {
            guard.insert(request.id.clone(), request);
            Ok(())
        } else {
            Err(RepositoryError::NotFound)
        }
    }

    fn fetch(&self, id: &RequestId) -> Result<Option<ServiceRequest>, RepositoryError> {
        let guard = self.records.lock().expect("request mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn count_for_month(
        &self,
        requester: &UserId,
        month: MonthStamp,
    ) -> Result<u32, RepositoryError> {
        let guard = self.records.lock().expect("request mutex poisoned");
        Ok(guard
            .values()
            .filter(|request| {
                request.requester_id == *requester && MonthStamp::of(request.created_at) == month
            })
            .count() as u32)
    }

    fn list_for_requester(
        &self,
        requester: &UserId,
    ) -> Result<Vec<ServiceRequest>, RepositoryError> {
        let guard = self.records.lock().expect("request mutex poisoned");
        Ok(guard
            .values()
            .filter(|request| request.requester_id == *requester)
            .cloned()
            .collect())
    }

    fn list_open(&self) -> Result<Vec<ServiceRequest>, RepositoryError> {
        let guard = self.records.lock().expect("request mutex poisoned");
        Ok(guard
            .values()
            .filter(|request| {
                request.status == ServiceRequestStatus::Pending && request.mechanic_id.is_none()
            })
            .cloned()
            .collect())
    }
}

pub(super) struct UnavailableVehicles;

impl VehicleRepository for UnavailableVehicles {
    fn insert(&self, _vehicle: Vehicle) -> Result<Vehicle, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn remove(&self, _owner: &UserId, _id: &VehicleId) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch(&self, _id: &VehicleId) -> Result<Option<Vehicle>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn count_for_owner(&self, _owner: &UserId) -> Result<u32, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn list_for_owner(&self, _owner: &UserId) -> Result<Vec<Vehicle>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

pub(super) fn router_with_service(
    service: MarketplaceService<MemoryVehicles, MemoryRequests>,
) -> axum::Router {
    marketplace_router(Arc::new(service))
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
