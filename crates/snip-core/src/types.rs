//! # Domain Types
//!
//! Core domain types used throughout SnipRewards.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │     Salon       │   │    Customer     │   │     Visit       │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (= user id) │◄──│  id (UUID)      │◄──│  id (UUID)      │       │
//! │  │  services       │   │  phone (unique) │   │  customer_id    │       │
//! │  │  barbers        │   │  visits, points │   │  amount         │       │
//! │  │  rollups        │   │  tier           │   │  points_earned  │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐                             │
//! │  │      User       │   │  Subscription   │                             │
//! │  │  ─────────────  │   │  ─────────────  │                             │
//! │  │  session record │   │  Trial          │                             │
//! │  │  salon profile  │   │  Starter ...    │                             │
//! │  └─────────────────┘   └─────────────────┘                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Field names serialize as camelCase so stored session records and the web
//! front end share one shape.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::tier::{Tier, TierProgress};

/// Visit count at which a new customer's first reward is due.
pub const FIRST_REWARD_AT: u32 = 5;

// =============================================================================
// Subscription
// =============================================================================

/// SnipRewards plan the salon is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum Subscription {
    Trial,
    Starter,
    Professional,
    Enterprise,
}

impl Default for Subscription {
    fn default() -> Self {
        Subscription::Trial
    }
}

// =============================================================================
// Customer
// =============================================================================

/// A customer enrolled in a salon's loyalty program.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    /// Unique identifier (UUID v4 for new customers).
    pub id: String,

    /// Phone number, unique within the salon.
    pub phone: String,

    pub name: String,

    pub email: Option<String>,

    /// Cumulative visit count. Drives the tier.
    pub visits: u32,

    pub total_spent: Money,

    /// Accrued points. Only ever increases.
    pub points: i64,

    pub tier: Tier,

    pub favorite_services: Vec<String>,

    pub preferred_barber: Option<String>,

    #[ts(as = "String")]
    pub join_date: DateTime<Utc>,

    #[ts(as = "Option<String>")]
    pub last_visit: Option<DateTime<Utc>>,

    /// Visit count at which the next reward is due.
    pub next_reward_at: u32,
}

impl Customer {
    /// Whether the customer has reached their next reward.
    pub fn reward_available(&self) -> bool {
        self.visits >= self.next_reward_at
    }

    /// Visits left until the next reward (zero once reached).
    pub fn visits_to_reward(&self) -> u32 {
        self.next_reward_at.saturating_sub(self.visits)
    }

    /// Progress through the current tier.
    pub fn tier_progress(&self) -> TierProgress {
        TierProgress::for_visits(self.visits)
    }
}

/// Profile fields supplied when enrolling a customer.
///
/// System-assigned fields (id, counters, tier, join date, next reward) are
/// deliberately absent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCustomer {
    pub phone: String,
    pub name: String,
    pub email: Option<String>,
    #[serde(default)]
    pub favorite_services: Vec<String>,
    pub preferred_barber: Option<String>,
    pub last_visit: Option<DateTime<Utc>>,
}

/// Patch-merge of a customer's profile. `None` leaves a field untouched.
///
/// Loyalty counters are not patchable; they only move through visits.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerPatch {
    pub name: Option<String>,
    pub phone: Option<String>,
    /// `Some("")` clears the email.
    pub email: Option<String>,
    pub favorite_services: Option<Vec<String>>,
    /// `Some("")` clears the preferred barber.
    pub preferred_barber: Option<String>,
}

impl CustomerPatch {
    pub(crate) fn apply_to(self, customer: &mut Customer) {
        if let Some(name) = self.name {
            customer.name = name.trim().to_string();
        }
        if let Some(phone) = self.phone {
            customer.phone = phone.trim().to_string();
        }
        if let Some(email) = self.email {
            customer.email = non_empty(email);
        }
        if let Some(services) = self.favorite_services {
            customer.favorite_services = services;
        }
        if let Some(barber) = self.preferred_barber {
            customer.preferred_barber = non_empty(barber);
        }
    }
}

// =============================================================================
// Visit
// =============================================================================

/// A single billable service event. Immutable once recorded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Visit {
    pub id: String,
    pub customer_id: String,
    /// Customer name at time of visit (frozen).
    pub customer_name: String,
    /// Customer phone at time of visit (frozen).
    pub customer_phone: String,
    #[ts(as = "String")]
    pub date: DateTime<Utc>,
    pub services: Vec<String>,
    pub amount: Money,
    pub barber: String,
    /// floor(amount / 10) at creation time.
    pub points_earned: i64,
    pub reward_used: Option<String>,
}

/// Input for recording a visit.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewVisit {
    pub customer_id: String,
    /// Used as-is for orphan visits; replaced by the customer's current name
    /// when the customer resolves.
    #[serde(default)]
    pub customer_name: String,
    #[serde(default)]
    pub customer_phone: String,
    pub date: DateTime<Utc>,
    pub services: Vec<String>,
    pub amount: Money,
    pub barber: String,
    /// Computed from `amount` when absent.
    pub points_earned: Option<i64>,
    pub reward_used: Option<String>,
}

impl NewVisit {
    /// A visit for `customer_id` happening now, points left to the store.
    pub fn now(
        customer_id: impl Into<String>,
        services: Vec<String>,
        amount: Money,
        barber: impl Into<String>,
    ) -> Self {
        NewVisit {
            customer_id: customer_id.into(),
            customer_name: String::new(),
            customer_phone: String::new(),
            date: Utc::now(),
            services,
            amount,
            barber: barber.into(),
            points_earned: None,
            reward_used: None,
        }
    }
}

// =============================================================================
// Salon
// =============================================================================

/// Salon configuration aggregate plus its rollup counters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Salon {
    pub id: String,
    pub name: String,
    pub phone: String,
    pub address: String,
    /// Service catalog.
    pub services: Vec<String>,
    /// Staff roster.
    pub barbers: Vec<String>,
    /// QR image URL that encodes the check-in link.
    pub qr_code: String,
    pub subscription: Subscription,
    #[ts(as = "String")]
    pub subscription_expiry: DateTime<Utc>,
    pub total_customers: u32,
    pub total_revenue: Money,
    pub average_visit_value: Money,
    /// Share of customers with two or more visits, in basis points.
    pub retention_rate_bps: u32,
}

// =============================================================================
// User (session record)
// =============================================================================

/// The logged-in salon owner. This is the record mirrored to storage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub email: String,
    pub name: String,
    pub salon_name: String,
    pub phone: String,
    pub address: String,
    pub avatar: Option<String>,
    #[ts(as = "String")]
    pub join_date: DateTime<Utc>,
    pub subscription: Subscription,
    #[ts(as = "String")]
    pub subscription_expiry: DateTime<Utc>,
}

/// Patch-merge of the current user's profile.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfilePatch {
    pub name: Option<String>,
    pub salon_name: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    /// `Some("")` clears the avatar.
    pub avatar: Option<String>,
}

impl ProfilePatch {
    /// Returns true when the patch changes nothing.
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.salon_name.is_none()
            && self.phone.is_none()
            && self.address.is_none()
            && self.avatar.is_none()
    }

    /// Applies the patch to a user record.
    pub fn apply_to(self, user: &mut User) {
        if let Some(name) = self.name {
            user.name = name;
        }
        if let Some(salon_name) = self.salon_name {
            user.salon_name = salon_name;
        }
        if let Some(phone) = self.phone {
            user.phone = phone;
        }
        if let Some(address) = self.address {
            user.address = address;
        }
        if let Some(avatar) = self.avatar {
            user.avatar = non_empty(avatar);
        }
    }
}

/// Sign-up form for a new salon account.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub name: String,
    pub salon_name: String,
    pub phone: String,
    pub address: String,
}

fn non_empty(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
