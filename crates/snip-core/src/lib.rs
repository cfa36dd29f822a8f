//! # snip-core: Pure Loyalty Logic for SnipRewards
//!
//! This crate holds the loyalty rules of SnipRewards as plain data and pure
//! functions. It never touches a database, the network or the file system.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      SnipRewards Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                      snip CLI (apps/cli)                        │   │
//! │  │   login ──► dashboard ──► check-in ──► record-visit ──► ...    │   │
//! │  └──────────────┬──────────────────────────────────┬───────────────┘   │
//! │                 │                                  │                    │
//! │  ┌──────────────▼──────────────────────┐  ┌────────▼───────────────┐   │
//! │  │        ★ snip-core (THIS CRATE) ★   │  │      snip-store        │   │
//! │  │                                     │  │  SessionStore          │   │
//! │  │  loyalty   LoyaltyStore, points     │  │  KeyValueStore (SQLite)│   │
//! │  │  tier      Tier, TIER_TABLE         │◄─│                        │   │
//! │  │  analytics rollups, reports         │  └────────────────────────┘   │
//! │  │  campaign  audiences, templates     │                               │
//! │  │  checkin   scan links, QR urls      │                               │
//! │  │  roster    demo accounts            │                               │
//! │  │                                     │                               │
//! │  │  NO I/O • NO DATABASE • NO NETWORK  │                               │
//! │  └─────────────────────────────────────┘                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Customer, Visit, Salon, User)
//! - [`money`] - Integer-cent `Money`
//! - [`tier`] - The tier ladder and its single mapping table
//! - [`loyalty`] - `LoyaltyStore`: customers, visits, point accrual
//! - [`analytics`] - Salon rollups and dashboard reports
//! - [`campaign`] - SMS campaign previews
//! - [`checkin`] - Check-in links and QR image URLs
//! - [`seed`] - Demo salon data
//! - [`roster`] - Demo login accounts
//! - [`error`] / [`validation`] - Typed errors and field rules
//!
//! ## Example Usage
//!
//! ```rust
//! use snip_core::{LoyaltyRules, LoyaltyStore, Money, NewCustomer, NewVisit, Tier};
//! use snip_core::seed::demo_salon;
//! use snip_core::roster::DemoRoster;
//!
//! let user = DemoRoster::demo().authenticate("demo@sniprewards.com", "demo123").unwrap();
//! let mut store = LoyaltyStore::new(demo_salon(&user).unwrap(), LoyaltyRules::default());
//!
//! let customer = store
//!     .add_customer(NewCustomer {
//!         phone: "+27705678901".into(),
//!         name: "Thabo Molefe".into(),
//!         ..Default::default()
//!     })
//!     .unwrap();
//!
//! let haircut = vec!["Haircut".to_string()];
//! let outcome = store
//!     .add_visit(NewVisit::now(&customer.id, haircut, Money::from_major(200), "John Smith"))
//!     .unwrap();
//!
//! assert_eq!(outcome.visit().points_earned, 20);
//! assert_eq!(outcome.customer().unwrap().tier, Tier::Bronze);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod analytics;
pub mod campaign;
pub mod checkin;
pub mod error;
pub mod loyalty;
pub mod money;
pub mod roster;
pub mod seed;
pub mod tier;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError};
pub use loyalty::{calculate_points, LoyaltyRules, LoyaltyStore, OrphanVisitPolicy, VisitOutcome};
pub use money::Money;
pub use tier::{tier_for_visits, Tier, TierProgress};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum services recorded against one visit.
///
/// The catalog has eight services; anything beyond this is a data entry slip.
pub const MAX_SERVICES_PER_VISIT: usize = 10;

/// Largest amount accepted for a single visit: R 1,000,000.00.
pub const MAX_VISIT_AMOUNT: Money = Money::from_major(1_000_000);

/// Currency symbol used when no configuration says otherwise.
pub const DEFAULT_CURRENCY_SYMBOL: &str = "R";
