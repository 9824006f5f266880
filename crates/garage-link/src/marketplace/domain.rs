use chrono::{Datelike, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Identifier wrapper for platform users (clients and mechanics alike).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(pub String);

/// Identifier wrapper for registered vehicles.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VehicleId(pub String);

/// Identifier wrapper for service requests.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RequestId(pub String);

/// Owner-provided vehicle details collected at registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VehicleSpec {
    pub brand: String,
    pub model: String,
    pub year: u16,
    pub plate: String,
    pub color: String,
}

/// A vehicle registered by exactly one owner. Counts toward the owner's
/// `max_vehicles` entitlement until explicitly removed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vehicle {
    pub id: VehicleId,
    pub owner_id: UserId,
    pub brand: String,
    pub model: String,
    pub year: u16,
    pub plate: String,
    pub color: String,
}

impl Vehicle {
    pub fn from_spec(id: VehicleId, owner_id: UserId, spec: VehicleSpec) -> Self {
        Self {
            id,
            owner_id,
            brand: spec.brand,
            model: spec.model,
            year: spec.year,
            plate: spec.plate,
            color: spec.color,
        }
    }
}

/// Fixed vocabulary of work a client can request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceType {
    Inspection,
    OilChange,
    Brakes,
    Suspension,
    Engine,
    Transmission,
    AirConditioning,
    Electrical,
    Tires,
    Locksmith,
    Other,
}

impl ServiceType {
    pub const fn label(self) -> &'static str {
        match self {
            ServiceType::Inspection => "inspection",
            ServiceType::OilChange => "oil_change",
            ServiceType::Brakes => "brakes",
            ServiceType::Suspension => "suspension",
            ServiceType::Engine => "engine",
            ServiceType::Transmission => "transmission",
            ServiceType::AirConditioning => "air_conditioning",
            ServiceType::Electrical => "electrical",
            ServiceType::Tires => "tires",
            ServiceType::Locksmith => "locksmith",
            ServiceType::Other => "other",
        }
    }
}

/// Lifecycle status of a service request.
///
/// `Completed` and `Rejected` are terminal; see [`crate::marketplace::lifecycle`]
/// for the legal transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceRequestStatus {
    Pending,
    Accepted,
    InProgress,
    Completed,
    Rejected,
}

impl ServiceRequestStatus {
    pub const fn label(self) -> &'static str {
        match self {
            ServiceRequestStatus::Pending => "pending",
            ServiceRequestStatus::Accepted => "accepted",
            ServiceRequestStatus::InProgress => "in_progress",
            ServiceRequestStatus::Completed => "completed",
            ServiceRequestStatus::Rejected => "rejected",
        }
    }

    pub const fn is_terminal(self) -> bool {
        matches!(
            self,
            ServiceRequestStatus::Completed | ServiceRequestStatus::Rejected
        )
    }
}

impl std::fmt::Display for ServiceRequestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// A client's request for mechanical work on one of their vehicles.
///
/// Never deleted; it only moves through the lifecycle. The `created_at`
/// timestamp is timezone-naive and scopes the request to a calendar month for
/// the monthly entitlement count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceRequest {
    pub id: RequestId,
    pub requester_id: UserId,
    pub vehicle_id: VehicleId,
    pub service_type: ServiceType,
    pub description: String,
    pub status: ServiceRequestStatus,
    pub created_at: NaiveDateTime,
    pub mechanic_id: Option<UserId>,
}

/// Calendar month bucket used when counting requests against the monthly cap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MonthStamp {
    pub year: i32,
    pub month: u32,
}

impl MonthStamp {
    pub fn of(timestamp: NaiveDateTime) -> Self {
        Self {
            year: timestamp.year(),
            month: timestamp.month(),
        }
    }
}
