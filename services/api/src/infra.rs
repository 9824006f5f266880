use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

use garage_link::marketplace::{
    MonthStamp, RepositoryError, RequestId, ServiceRequest, ServiceRequestRepository,
    ServiceRequestStatus, UserId, Vehicle, VehicleId, VehicleRepository,
};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Development-grade vehicle store. A relational store replaces this in
/// deployment; only that store can serialize the check-then-create window.
#[derive(Default, Clone)]
pub(crate) struct InMemoryVehicleRepository {
    records: Arc<Mutex<HashMap<VehicleId, Vehicle>>>,
}

impl VehicleRepository for InMemoryVehicleRepository {
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

/// Development-grade request store mirroring the columns the relational
/// schema tracks for a service request.
#[derive(Default, Clone)]
pub(crate) struct InMemoryServiceRequestRepository {
    records: Arc<Mutex<HashMap<RequestId, ServiceRequest>>>,
}

impl ServiceRequestRepository for InMemoryServiceRequestRepository {
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
