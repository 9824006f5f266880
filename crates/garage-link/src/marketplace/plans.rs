use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Named subscription level determining entitlements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanTier {
    Free,
    Basic,
    Premium,
}

impl PlanTier {
    pub const ALL: [PlanTier; 3] = [PlanTier::Free, PlanTier::Basic, PlanTier::Premium];

    pub const fn label(self) -> &'static str {
        match self {
            PlanTier::Free => "free",
            PlanTier::Basic => "basic",
            PlanTier::Premium => "premium",
        }
    }

    /// Position of the tier's plan inside [`PlanCatalog`]; keeps the lookup
    /// total with no fallible search.
    const fn index(self) -> usize {
        match self {
            PlanTier::Free => 0,
            PlanTier::Basic => 1,
            PlanTier::Premium => 2,
        }
    }
}

impl fmt::Display for PlanTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for PlanTier {
    type Err = UnknownTierError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "free" => Ok(PlanTier::Free),
            "basic" => Ok(PlanTier::Basic),
            "premium" => Ok(PlanTier::Premium),
            _ => Err(UnknownTierError(value.to_string())),
        }
    }
}

/// Raised when a tier name falls outside the fixed vocabulary. This is a
/// configuration error on the caller's side, not a recoverable user input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown plan tier '{0}'")]
pub struct UnknownTierError(pub String);

/// Cap on a countable resource. `Unlimited` is its own variant so it is never
/// compared numerically against a finite bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Quota {
    Limited(u32),
    Unlimited,
}

impl Quota {
    /// Whether one more item may be created given the current count.
    pub const fn admits(self, current: u32) -> bool {
        match self {
            Quota::Unlimited => true,
            Quota::Limited(max) => current < max,
        }
    }
}

impl fmt::Display for Quota {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Quota::Limited(max) => write!(f, "{max}"),
            Quota::Unlimited => f.write_str("unlimited"),
        }
    }
}

/// Entitlement pair granted by a tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entitlements {
    pub max_vehicles: Quota,
    pub max_requests_per_month: Quota,
}

/// Published definition of a subscription tier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plan {
    pub tier: PlanTier,
    pub entitlements: Entitlements,
    /// Monthly price in minor currency units.
    pub monthly_price_minor: u32,
}

/// Static catalog mapping each tier to exactly one plan definition.
///
/// Built once at process start and never mutated. This is the single source
/// of truth for entitlements; call sites must not hardcode their own limits.
#[derive(Debug, Clone)]
pub struct PlanCatalog {
    plans: [Plan; 3],
}

impl PlanCatalog {
    /// The catalog as published on the plans page, ordered by tier index.
    pub fn published() -> Self {
        Self {
            plans: [
                Plan {
                    tier: PlanTier::Free,
                    entitlements: Entitlements {
                        max_vehicles: Quota::Limited(1),
                        max_requests_per_month: Quota::Limited(3),
                    },
                    monthly_price_minor: 0,
                },
                Plan {
                    tier: PlanTier::Basic,
                    entitlements: Entitlements {
                        max_vehicles: Quota::Limited(5),
                        max_requests_per_month: Quota::Limited(15),
                    },
                    monthly_price_minor: 1000,
                },
                Plan {
                    tier: PlanTier::Premium,
                    entitlements: Entitlements {
                        max_vehicles: Quota::Unlimited,
                        max_requests_per_month: Quota::Unlimited,
                    },
                    monthly_price_minor: 2500,
                },
            ],
        }
    }

    pub fn plans(&self) -> &[Plan] {
        &self.plans
    }

    pub fn plan(&self, tier: PlanTier) -> &Plan {
        &self.plans[tier.index()]
    }

    pub fn entitlements_for(&self, tier: PlanTier) -> Entitlements {
        self.plan(tier).entitlements
    }

    /// Resolve a tier by name, e.g. from a session payload. Unknown names are
    /// a configuration error and surface as [`UnknownTierError`].
    pub fn resolve(&self, name: &str) -> Result<&Plan, UnknownTierError> {
        let tier = name.parse::<PlanTier>()?;
        Ok(self.plan(tier))
    }
}

impl Default for PlanCatalog {
    fn default() -> Self {
        Self::published()
    }
}
