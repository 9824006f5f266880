use super::plans::{PlanCatalog, PlanTier};

/// Pure admission decisions for new vehicles and service requests.
///
/// Callers pass the counts they derived from storage; nothing is reserved
/// here, so two concurrent creations can both pass the same check. Serializing
/// the check-and-create sequence is the storage layer's job.
#[derive(Debug, Clone)]
pub struct UsagePolicy {
    catalog: PlanCatalog,
}

impl UsagePolicy {
    pub fn new(catalog: PlanCatalog) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &PlanCatalog {
        &self.catalog
    }

    /// True iff the owner may register one more vehicle.
    pub fn can_add_vehicle(&self, tier: PlanTier, current_vehicle_count: u32) -> bool {
        self.catalog
            .entitlements_for(tier)
            .max_vehicles
            .admits(current_vehicle_count)
    }

    /// True iff the requester may submit one more service request this
    /// calendar month. `requests_this_month` must count only requests whose
    /// `created_at` falls in the current month.
    pub fn can_add_service_request(&self, tier: PlanTier, requests_this_month: u32) -> bool {
        self.catalog
            .entitlements_for(tier)
            .max_requests_per_month
            .admits(requests_this_month)
    }
}

impl Default for UsagePolicy {
    fn default() -> Self {
        Self::new(PlanCatalog::published())
    }
}
