//! Plan entitlements, usage admission, and the service-request lifecycle.
//!
//! The module deliberately owns no storage: counts and statuses are read from
//! and written back through the repository traits, and every operation is a
//! single synchronous decision. Strict enforcement of the check-then-create
//! window belongs to the backing store.

pub mod domain;
pub mod lifecycle;
pub mod plans;
pub mod policy;
pub mod repository;
pub mod router;
pub mod service;
pub mod subscription;

#[cfg(test)]
mod tests;

pub use domain::{
    MonthStamp, RequestId, ServiceRequest, ServiceRequestStatus, ServiceType, UserId, Vehicle,
    VehicleId, VehicleSpec,
};
pub use lifecycle::{InvalidTransitionError, MechanicAction};
pub use plans::{Entitlements, Plan, PlanCatalog, PlanTier, Quota, UnknownTierError};
pub use policy::UsagePolicy;
pub use repository::{
    RepositoryError, ServiceRequestRepository, ServiceRequestView, VehicleRepository,
};
pub use router::marketplace_router;
pub use service::{MarketplaceError, MarketplaceService};
pub use subscription::{Subscription, SubscriptionStatus};
