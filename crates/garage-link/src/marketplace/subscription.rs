use super::domain::UserId;
use super::plans::PlanTier;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Billing state as last reported by the payment collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionStatus {
    Active,
    PastDue,
    Cancelled,
}

impl SubscriptionStatus {
    pub const fn label(self) -> &'static str {
        match self {
            SubscriptionStatus::Active => "active",
            SubscriptionStatus::PastDue => "past_due",
            SubscriptionStatus::Cancelled => "cancelled",
        }
    }
}

/// Binds a user to a plan tier over time.
///
/// The billing provider is the authority for tier changes; this module only
/// consumes the resulting record. Subscriptions are superseded, never deleted,
/// and each user holds at most one active subscription.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subscription {
    pub user_id: UserId,
    pub tier: PlanTier,
    pub status: SubscriptionStatus,
    pub current_period_end: Option<NaiveDateTime>,
    pub cancel_at_period_end: bool,
}

impl Subscription {
    /// The default subscription every user starts on at registration.
    pub fn free(user_id: UserId) -> Self {
        Self {
            user_id,
            tier: PlanTier::Free,
            status: SubscriptionStatus::Active,
            current_period_end: None,
            cancel_at_period_end: false,
        }
    }

    /// Replace this record with the tier and status a billing webhook
    /// reported. Consumes self so stale copies cannot linger.
    pub fn superseded_by(
        self,
        tier: PlanTier,
        status: SubscriptionStatus,
        current_period_end: Option<NaiveDateTime>,
        cancel_at_period_end: bool,
    ) -> Self {
        Self {
            user_id: self.user_id,
            tier,
            status,
            current_period_end,
            cancel_at_period_end,
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == SubscriptionStatus::Active
    }

    /// A subscription with no recorded period end never expires.
    pub fn is_expired(&self, now: NaiveDateTime) -> bool {
        match self.current_period_end {
            Some(period_end) => now > period_end,
            None => false,
        }
    }

    /// The tier entitlement checks should use right now. Anything not active,
    /// or past its period end, falls back to the free tier.
    pub fn effective_tier(&self, now: NaiveDateTime) -> PlanTier {
        if self.is_active() && !self.is_expired(now) {
            self.tier
        } else {
            PlanTier::Free
        }
    }
}
