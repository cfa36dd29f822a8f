//! # Loyalty Store
//!
//! The single source of truth for one salon's customers and visit history.
//!
//! ## Write Path
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  add_visit(NewVisit)                                                    │
//! │       │                                                                 │
//! │       ├── validate services / amount / barber                          │
//! │       ├── points = floor(amount / 10)  (or check the supplied value)   │
//! │       ├── checked totals: overflow fails before anything is stored     │
//! │       ├── resolve customer by id                                       │
//! │       │      ├── found     → append visit, update counters + tier      │
//! │       │      └── not found → OrphanVisitPolicy                         │
//! │       │                       ├── Record → append visit only           │
//! │       │                       └── Reject → CustomerNotFound            │
//! │       └── recompute salon rollups                                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! All mutation goes through this type. Callers hold it explicitly (the CLI
//! wraps it in a mutex-guarded state object); there is no global instance.

use std::collections::HashSet;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::analytics::SalonRollup;
use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::tier::{Tier, TierProgress};
use crate::types::{
    Customer, CustomerPatch, NewCustomer, NewVisit, Salon, User, Visit, FIRST_REWARD_AT,
};
use crate::validation::{
    validate_amount, validate_email, validate_name, validate_phone, validate_services,
};
use crate::MAX_VISIT_AMOUNT;

// =============================================================================
// Rules
// =============================================================================

/// What `add_visit` does when the customer id matches nobody.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrphanVisitPolicy {
    /// Store the visit, leave the roster untouched, report `VisitOutcome::Orphaned`.
    #[default]
    Record,
    /// Fail with `CoreError::CustomerNotFound` and store nothing.
    Reject,
}

impl std::str::FromStr for OrphanVisitPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "record" => Ok(OrphanVisitPolicy::Record),
            "reject" => Ok(OrphanVisitPolicy::Reject),
            other => Err(format!("unknown orphan visit policy '{}'", other)),
        }
    }
}

/// Store-wide rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoyaltyRules {
    pub orphan_visits: OrphanVisitPolicy,
    /// `next_reward_at` for newly enrolled customers.
    pub first_reward_at: u32,
}

impl Default for LoyaltyRules {
    fn default() -> Self {
        LoyaltyRules {
            orphan_visits: OrphanVisitPolicy::default(),
            first_reward_at: FIRST_REWARD_AT,
        }
    }
}

// =============================================================================
// Pure rules
// =============================================================================

/// Points earned for an amount: one per 10 currency units, floored.
///
/// ```rust
/// use snip_core::loyalty::calculate_points;
/// use snip_core::money::Money;
///
/// assert_eq!(calculate_points(Money::from_major(350)), 35);
/// assert_eq!(calculate_points(Money::from_major(9)), 0);
/// ```
pub fn calculate_points(amount: Money) -> i64 {
    amount.loyalty_points()
}

// =============================================================================
// Visit outcome
// =============================================================================

/// Result of a successful `add_visit`.
#[derive(Debug, Clone, PartialEq)]
pub enum VisitOutcome {
    /// The visit was stored and the customer's counters were updated.
    Applied {
        visit: Visit,
        customer: Customer,
        previous_tier: Tier,
    },
    /// The visit was stored but no customer matched its id.
    Orphaned { visit: Visit },
}

impl VisitOutcome {
    /// The stored visit.
    pub fn visit(&self) -> &Visit {
        match self {
            VisitOutcome::Applied { visit, .. } | VisitOutcome::Orphaned { visit } => visit,
        }
    }

    /// The updated customer, if one resolved.
    pub fn customer(&self) -> Option<&Customer> {
        match self {
            VisitOutcome::Applied { customer, .. } => Some(customer),
            VisitOutcome::Orphaned { .. } => None,
        }
    }

    /// `Some(new_tier)` when the visit moved the customer up a tier.
    pub fn tier_change(&self) -> Option<Tier> {
        match self {
            VisitOutcome::Applied {
                customer,
                previous_tier,
                ..
            } if customer.tier != *previous_tier => Some(customer.tier),
            _ => None,
        }
    }

    pub fn is_orphaned(&self) -> bool {
        matches!(self, VisitOutcome::Orphaned { .. })
    }
}

// =============================================================================
// Store
// =============================================================================

/// Customers, visits and rollups for one salon.
#[derive(Debug, Clone)]
pub struct LoyaltyStore {
    salon: Salon,
    customers: Vec<Customer>,
    visits: Vec<Visit>,
    rules: LoyaltyRules,
}

impl LoyaltyStore {
    /// Creates an empty store for a salon.
    pub fn new(salon: Salon, rules: LoyaltyRules) -> Self {
        let mut store = LoyaltyStore {
            salon,
            customers: Vec::new(),
            visits: Vec::new(),
            rules,
        };
        store.recompute_rollups();
        store
    }

    /// Creates a store from existing collections and recomputes the rollups.
    ///
    /// ## Errors
    /// - `Validation(Duplicate)` when two customers share a phone
    pub fn with_data(
        salon: Salon,
        customers: Vec<Customer>,
        visits: Vec<Visit>,
        rules: LoyaltyRules,
    ) -> CoreResult<Self> {
        ensure_unique_phones(&customers)?;
        let mut store = LoyaltyStore {
            salon,
            customers,
            visits,
            rules,
        };
        store.recompute_rollups();
        Ok(store)
    }

    /// Replaces both collections wholesale.
    ///
    /// A roster with a repeated phone is rejected and the store is left as it was.
    pub fn replace_all(&mut self, customers: Vec<Customer>, visits: Vec<Visit>) -> CoreResult<()> {
        ensure_unique_phones(&customers)?;
        debug!(customers = customers.len(), visits = visits.len(), "Replacing loyalty data");
        self.customers = customers;
        self.visits = visits;
        self.recompute_rollups();
        Ok(())
    }

    /// Copies the owner's profile fields onto the salon record.
    ///
    /// Customers, visits and rollups are left alone.
    pub fn apply_profile(&mut self, user: &User) {
        self.salon.name = user.salon_name.clone();
        self.salon.phone = user.phone.clone();
        self.salon.address = user.address.clone();
        debug!(salon_id = %self.salon.id, "Salon profile updated");
    }

    pub fn salon(&self) -> &Salon {
        &self.salon
    }

    pub fn rules(&self) -> LoyaltyRules {
        self.rules
    }

    pub fn customers(&self) -> &[Customer] {
        &self.customers
    }

    pub fn visits(&self) -> &[Visit] {
        &self.visits
    }

    // -------------------------------------------------------------------------
    // Queries
    // -------------------------------------------------------------------------

    /// First customer with this phone. O(n) scan.
    pub fn customer_by_phone(&self, phone: &str) -> Option<&Customer> {
        let phone = phone.trim();
        self.customers.iter().find(|c| c.phone == phone)
    }

    pub fn customer(&self, id: &str) -> Option<&Customer> {
        self.customers.iter().find(|c| c.id == id)
    }

    /// Visits for one customer, newest first.
    pub fn visits_for_customer(&self, customer_id: &str) -> Vec<&Visit> {
        let mut visits: Vec<&Visit> = self
            .visits
            .iter()
            .filter(|v| v.customer_id == customer_id)
            .collect();
        visits.sort_by(|a, b| b.date.cmp(&a.date));
        visits
    }

    /// Tier progress for a customer id.
    pub fn tier_progress(&self, customer_id: &str) -> Option<TierProgress> {
        self.customer(customer_id).map(Customer::tier_progress)
    }

    // -------------------------------------------------------------------------
    // Writes
    // -------------------------------------------------------------------------

    /// Enrols a customer.
    ///
    /// System fields start at zero / Bronze; `join_date` is now.
    ///
    /// ## Errors
    /// - `Validation(Required | InvalidFormat)` for a bad phone, name or email
    /// - `Validation(Duplicate)` when the phone is already enrolled
    pub fn add_customer(&mut self, data: NewCustomer) -> CoreResult<Customer> {
        let phone = data.phone.trim().to_string();
        validate_phone(&phone)?;
        validate_name("name", &data.name)?;
        let email = match data.email.as_deref().map(str::trim) {
            Some("") | None => None,
            Some(email) => {
                validate_email(email)?;
                Some(email.to_string())
            }
        };
        self.ensure_phone_free(&phone, None)?;

        let customer = Customer {
            id: Uuid::new_v4().to_string(),
            phone,
            name: data.name.trim().to_string(),
            email,
            visits: 0,
            total_spent: Money::zero(),
            points: 0,
            tier: Tier::Bronze,
            favorite_services: data.favorite_services,
            preferred_barber: data.preferred_barber.filter(|b| !b.trim().is_empty()),
            join_date: Utc::now(),
            last_visit: data.last_visit,
            next_reward_at: self.rules.first_reward_at,
        };

        info!(customer_id = %customer.id, phone = %customer.phone, "Customer enrolled");
        self.customers.push(customer.clone());
        self.recompute_rollups();
        Ok(customer)
    }

    /// Patch-merges a customer's profile fields.
    pub fn update_customer(&mut self, id: &str, patch: CustomerPatch) -> CoreResult<Customer> {
        if let Some(phone) = patch.phone.as_deref() {
            validate_phone(phone)?;
            self.ensure_phone_free(phone.trim(), Some(id))?;
        }
        if let Some(name) = patch.name.as_deref() {
            validate_name("name", name)?;
        }
        if let Some(email) = patch.email.as_deref().map(str::trim).filter(|e| !e.is_empty()) {
            validate_email(email)?;
        }

        let customer = self
            .customers
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| CoreError::CustomerNotFound(id.to_string()))?;

        patch.apply_to(customer);
        debug!(customer_id = %id, "Customer profile updated");
        Ok(customer.clone())
    }

    /// Records a visit and applies it to the customer's loyalty state.
    ///
    /// ## Errors
    /// - `Validation` for empty services, blank barber, an amount outside
    ///   `0..=MAX_VISIT_AMOUNT`, or totals that would overflow
    /// - `PointsMismatch` when a supplied `points_earned` breaks the rule
    /// - `CustomerNotFound` for an unknown customer under `OrphanVisitPolicy::Reject`
    pub fn add_visit(&mut self, data: NewVisit) -> CoreResult<VisitOutcome> {
        if data.customer_id.trim().is_empty() {
            return Err(ValidationError::required("customer_id").into());
        }
        let points_earned = self.check_visit(&data)?;

        let position = self.customers.iter().position(|c| c.id == data.customer_id);
        match position {
            Some(index) => {
                let customer = &self.customers[index];
                let totals_fit = customer.total_spent.checked_add(data.amount).is_some()
                    && customer.points.checked_add(points_earned).is_some()
                    && customer.visits.checked_add(1).is_some();
                if !totals_fit {
                    return Err(amount_out_of_range().into());
                }
            }
            None if self.rules.orphan_visits == OrphanVisitPolicy::Reject => {
                warn!(customer_id = %data.customer_id, "Rejected visit for unknown customer");
                return Err(CoreError::CustomerNotFound(data.customer_id));
            }
            None => {}
        }

        let mut visit = Visit {
            id: Uuid::new_v4().to_string(),
            customer_id: data.customer_id,
            customer_name: data.customer_name,
            customer_phone: data.customer_phone,
            date: data.date,
            services: data.services,
            amount: data.amount,
            barber: data.barber.trim().to_string(),
            points_earned,
            reward_used: data.reward_used,
        };

        let outcome = match position {
            Some(index) => {
                let customer = &mut self.customers[index];
                let previous_tier = customer.tier;

                customer.visits += 1;
                customer.total_spent += visit.amount;
                customer.points += visit.points_earned;
                customer.tier = Tier::for_visits(customer.visits);
                customer.last_visit = Some(visit.date);

                visit.customer_name = customer.name.clone();
                visit.customer_phone = customer.phone.clone();

                info!(
                    customer_id = %customer.id,
                    amount = %visit.amount,
                    points = visit.points_earned,
                    visits = customer.visits,
                    "Visit recorded"
                );
                if customer.tier != previous_tier {
                    info!(
                        customer_id = %customer.id,
                        from = %previous_tier,
                        to = %customer.tier,
                        "Tier upgraded"
                    );
                }

                VisitOutcome::Applied {
                    visit: visit.clone(),
                    customer: customer.clone(),
                    previous_tier,
                }
            }
            None => {
                warn!(
                    customer_id = %visit.customer_id,
                    visit_id = %visit.id,
                    "Visit recorded for unknown customer; roster not updated"
                );
                VisitOutcome::Orphaned { visit: visit.clone() }
            }
        };

        self.visits.push(visit);
        self.recompute_rollups();
        Ok(outcome)
    }

    /// Enrols a walk-in customer and records their first visit in one step.
    ///
    /// The visit is checked before enrolment, so a bad visit leaves the roster
    /// untouched. `visit.customer_id` is ignored.
    pub fn add_customer_with_visit(
        &mut self,
        customer: NewCustomer,
        visit: NewVisit,
    ) -> CoreResult<VisitOutcome> {
        self.check_visit(&visit)?;
        let customer = self.add_customer(customer)?;
        self.add_visit(NewVisit {
            customer_id: customer.id,
            ..visit
        })
    }

    /// Validates a visit against the rules and salon totals; returns its points.
    fn check_visit(&self, data: &NewVisit) -> CoreResult<i64> {
        validate_services(&data.services)?;
        validate_amount(data.amount)?;
        if data.barber.trim().is_empty() {
            return Err(ValidationError::required("barber").into());
        }

        let expected = calculate_points(data.amount);
        if let Some(supplied) = data.points_earned {
            if supplied != expected {
                return Err(CoreError::PointsMismatch { expected, supplied });
            }
        }

        if self.salon.total_revenue.checked_add(data.amount).is_none() {
            return Err(amount_out_of_range().into());
        }
        Ok(expected)
    }

    /// Recomputes the salon's rollup counters from the collections.
    fn recompute_rollups(&mut self) {
        SalonRollup::compute(&self.customers, &self.visits).apply_to(&mut self.salon);
    }

    fn ensure_phone_free(&self, phone: &str, except_id: Option<&str>) -> CoreResult<()> {
        let taken = self
            .customers
            .iter()
            .any(|c| c.phone == phone && Some(c.id.as_str()) != except_id);
        if taken {
            return Err(ValidationError::Duplicate {
                field: "phone".to_string(),
                value: phone.to_string(),
            }
            .into());
        }
        Ok(())
    }
}

fn ensure_unique_phones(customers: &[Customer]) -> CoreResult<()> {
    let mut seen = HashSet::with_capacity(customers.len());
    for customer in customers {
        if !seen.insert(customer.phone.as_str()) {
            return Err(ValidationError::Duplicate {
                field: "phone".to_string(),
                value: customer.phone.clone(),
            }
            .into());
        }
    }
    Ok(())
}

fn amount_out_of_range() -> ValidationError {
    ValidationError::OutOfRange {
        field: "amount".to_string(),
        min: 0,
        max: MAX_VISIT_AMOUNT.cents(),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roster::DemoRoster;
    use crate::seed::demo_store;
    use crate::types::Subscription;
    use chrono::{Duration, TimeZone};

    fn salon() -> Salon {
        Salon {
            id: "salon-1".to_string(),
            name: "Elite Cuts & Styles".to_string(),
            phone: "+27712345678".to_string(),
            address: "123 Sandton Drive, Johannesburg".to_string(),
            services: vec!["Haircut".to_string(), "Beard Trim".to_string()],
            barbers: vec!["John Smith".to_string()],
            qr_code: String::new(),
            subscription: Subscription::Professional,
            subscription_expiry: Utc::now() + Duration::days(30),
            total_customers: 0,
            total_revenue: Money::zero(),
            average_visit_value: Money::zero(),
            retention_rate_bps: 0,
        }
    }

    fn demo_user() -> User {
        DemoRoster::demo()
            .authenticate("demo@sniprewards.com", "demo123")
            .unwrap()
    }

    fn store() -> LoyaltyStore {
        LoyaltyStore::new(salon(), LoyaltyRules::default())
    }

    fn enrol(store: &mut LoyaltyStore, phone: &str) -> Customer {
        store
            .add_customer(NewCustomer {
                phone: phone.to_string(),
                name: "Thabo Molefe".to_string(),
                ..Default::default()
            })
            .unwrap()
    }

    fn visit(customer_id: &str, units: i64) -> NewVisit {
        NewVisit::now(
            customer_id,
            vec!["Haircut".to_string()],
            Money::from_major(units),
            "John Smith",
        )
    }

    #[test]
    fn test_points_match_floor_of_tenth() {
        for units in 0..=1000_i64 {
            assert_eq!(calculate_points(Money::from_major(units)), units / 10);
        }
    }

    #[test]
    fn test_add_then_lookup_by_phone() {
        let mut store = store();
        let added = enrol(&mut store, "+27705678901");

        let found = store.customer_by_phone("+27705678901").unwrap();
        assert_eq!(found.id, added.id);
        assert_eq!(found.visits, 0);
        assert_eq!(found.points, 0);
        assert_eq!(found.tier, Tier::Bronze);
        assert_eq!(found.next_reward_at, 5);
        assert_eq!(found.total_spent, Money::zero());
        assert!(store.customer_by_phone("+27000000000").is_none());
    }

    #[test]
    fn test_fifth_visit_promotes_to_silver() {
        let mut store = store();
        let customer = enrol(&mut store, "+27705678901");
        for _ in 0..4 {
            store.add_visit(visit(&customer.id, 20)).unwrap();
        }
        let before = store.customer(&customer.id).unwrap().clone();
        assert_eq!(before.visits, 4);
        assert_eq!(before.tier, Tier::Bronze);

        let outcome = store.add_visit(visit(&customer.id, 100)).unwrap();

        let after = outcome.customer().unwrap();
        assert_eq!(after.visits, 5);
        assert_eq!(after.tier, Tier::Silver);
        assert_eq!(after.points, before.points + 10);
        assert_eq!(outcome.tier_change(), Some(Tier::Silver));
        assert!(after.reward_available());
    }

    #[test]
    fn test_total_spent_is_exact_sum() {
        let mut store = store();
        let customer = enrol(&mut store, "+27705678901");

        let mut first = visit(&customer.id, 0);
        first.amount = Money::from_cents(10_010);
        let mut second = visit(&customer.id, 0);
        second.amount = Money::from_cents(20_020);

        store.add_visit(first).unwrap();
        store.add_visit(second).unwrap();

        let c = store.customer(&customer.id).unwrap();
        assert_eq!(c.total_spent, Money::from_cents(30_030));
        assert_eq!(c.points, 10 + 20);
    }

    #[test]
    fn test_orphan_visit_recorded_by_default() {
        let mut store = store();
        let customer = enrol(&mut store, "+27705678901");
        let roster_before = store.customers().to_vec();

        let outcome = store.add_visit(visit("no-such-customer", 200)).unwrap();

        assert!(outcome.is_orphaned());
        assert_eq!(store.visits().len(), 1);
        assert_eq!(store.visits()[0].customer_id, "no-such-customer");
        assert_eq!(store.visits()[0].points_earned, 20);
        assert_eq!(store.customers(), roster_before.as_slice());
        assert_eq!(store.customer(&customer.id).unwrap().visits, 0);
    }

    #[test]
    fn test_orphan_visit_rejected_under_reject_policy() {
        let rules = LoyaltyRules {
            orphan_visits: OrphanVisitPolicy::Reject,
            ..Default::default()
        };
        let mut store = LoyaltyStore::new(salon(), rules);

        let err = store.add_visit(visit("ghost", 200)).unwrap_err();

        assert!(matches!(err, CoreError::CustomerNotFound(id) if id == "ghost"));
        assert!(store.visits().is_empty());
    }

    #[test]
    fn test_duplicate_phone_rejected() {
        let mut store = store();
        enrol(&mut store, "+27705678901");

        let err = store
            .add_customer(NewCustomer {
                phone: " +27705678901 ".to_string(),
                name: "Someone Else".to_string(),
                ..Default::default()
            })
            .unwrap_err();

        assert!(matches!(
            err,
            CoreError::Validation(ValidationError::Duplicate { .. })
        ));
        assert_eq!(store.customers().len(), 1);
    }

    #[test]
    fn test_update_customer_keeps_phone_unique() {
        let mut store = store();
        let first = enrol(&mut store, "+27705678901");
        let second = enrol(&mut store, "+27704567890");

        let err = store
            .update_customer(
                &second.id,
                CustomerPatch {
                    phone: Some(first.phone.clone()),
                    ..Default::default()
                },
            )
            .unwrap_err();
        assert!(matches!(err, CoreError::Validation(ValidationError::Duplicate { .. })));

        // Re-saving your own phone is fine.
        let updated = store
            .update_customer(
                &first.id,
                CustomerPatch {
                    phone: Some(first.phone.clone()),
                    preferred_barber: Some("Grace Nkomo".to_string()),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(updated.preferred_barber.as_deref(), Some("Grace Nkomo"));
    }

    #[test]
    fn test_update_unknown_customer() {
        let mut store = store();
        let err = store
            .update_customer("missing", CustomerPatch::default())
            .unwrap_err();
        assert!(matches!(err, CoreError::CustomerNotFound(_)));
    }

    #[test]
    fn test_supplied_points_must_match() {
        let mut store = store();
        let customer = enrol(&mut store, "+27705678901");

        let mut ok = visit(&customer.id, 350);
        ok.points_earned = Some(35);
        assert!(store.add_visit(ok).is_ok());

        let mut bad = visit(&customer.id, 350);
        bad.points_earned = Some(40);
        let err = store.add_visit(bad).unwrap_err();
        assert!(matches!(err, CoreError::PointsMismatch { expected: 35, supplied: 40 }));
        assert_eq!(store.visits().len(), 1);
    }

    #[test]
    fn test_visit_validation() {
        let mut store = store();
        let customer = enrol(&mut store, "+27705678901");

        let mut no_services = visit(&customer.id, 100);
        no_services.services.clear();
        assert!(store.add_visit(no_services).is_err());

        let mut negative = visit(&customer.id, 100);
        negative.amount = Money::from_cents(-1);
        assert!(store.add_visit(negative).is_err());

        let mut no_barber = visit(&customer.id, 100);
        no_barber.barber = "  ".to_string();
        assert!(store.add_visit(no_barber).is_err());

        assert!(store.visits().is_empty());
        assert_eq!(store.customer(&customer.id).unwrap().visits, 0);
    }

    #[test]
    fn test_visit_denormalizes_current_customer() {
        let mut store = store();
        let customer = enrol(&mut store, "+27705678901");

        let outcome = store.add_visit(visit(&customer.id, 50)).unwrap();

        assert_eq!(outcome.visit().customer_name, "Thabo Molefe");
        assert_eq!(outcome.visit().customer_phone, "+27705678901");
        assert_eq!(
            store.customer(&customer.id).unwrap().last_visit,
            Some(outcome.visit().date)
        );
    }

    #[test]
    fn test_tier_never_decreases_across_visits() {
        let mut store = store();
        let customer = enrol(&mut store, "+27705678901");
        let mut previous = Tier::Bronze;
        for _ in 0..25 {
            let outcome = store.add_visit(visit(&customer.id, 10)).unwrap();
            let tier = outcome.customer().unwrap().tier;
            assert!(tier >= previous);
            previous = tier;
        }
        assert_eq!(previous, Tier::Platinum);
        assert_eq!(store.customer(&customer.id).unwrap().points, 25);
    }

    #[test]
    fn test_rollups_follow_writes() {
        let mut store = store();
        let a = enrol(&mut store, "+27705678901");
        let b = enrol(&mut store, "+27704567890");
        store.add_visit(visit(&a.id, 100)).unwrap();
        store.add_visit(visit(&a.id, 200)).unwrap();
        store.add_visit(visit(&b.id, 300)).unwrap();

        let salon = store.salon();
        assert_eq!(salon.total_customers, 2);
        assert_eq!(salon.total_revenue, Money::from_major(600));
        assert_eq!(salon.average_visit_value, Money::from_major(200));
        assert_eq!(salon.retention_rate_bps, 5_000);
    }

    #[test]
    fn test_visits_for_customer_newest_first() {
        let mut store = store();
        let customer = enrol(&mut store, "+27705678901");
        let base = Utc.with_ymd_and_hms(2024, 1, 10, 9, 0, 0).unwrap();
        for day in [1, 3, 2] {
            let mut v = visit(&customer.id, 100);
            v.date = base + Duration::days(day);
            store.add_visit(v).unwrap();
        }

        let dates: Vec<_> = store
            .visits_for_customer(&customer.id)
            .iter()
            .map(|v| v.date)
            .collect();
        assert_eq!(
            dates,
            vec![base + Duration::days(3), base + Duration::days(2), base + Duration::days(1)]
        );
        assert_eq!(
            store.customer(&customer.id).unwrap().last_visit,
            Some(base + Duration::days(2))
        );
    }

    #[test]
    fn test_oversized_amount_rejected_without_mutation() {
        let mut store = demo_store(&demo_user(), LoyaltyRules::default()).unwrap();
        let before = store.customer("1").unwrap().clone();
        let revenue = store.salon().total_revenue;

        let err = store
            .add_visit(NewVisit::now(
                "1",
                vec!["Haircut".to_string()],
                Money::from_cents(i64::MAX),
                "John Smith",
            ))
            .unwrap_err();

        assert!(matches!(err, CoreError::Validation(ValidationError::OutOfRange { .. })));
        assert_eq!(store.customer("1").unwrap(), &before);
        assert_eq!(store.salon().total_revenue, revenue);
    }

    #[test]
    fn test_total_spent_overflow_rejected() {
        let mut rich = enrol(&mut store(), "+27705678901");
        rich.total_spent = Money::from_cents(i64::MAX - 100);
        rich.visits = 3;
        let rules = LoyaltyRules::default();
        let mut store =
            LoyaltyStore::with_data(salon(), vec![rich.clone()], Vec::new(), rules).unwrap();

        let err = store.add_visit(visit(&rich.id, 100)).unwrap_err();

        assert!(matches!(err, CoreError::Validation(ValidationError::OutOfRange { .. })));
        assert_eq!(store.customer(&rich.id).unwrap().visits, 3);
        assert!(store.visits().is_empty());
    }

    #[test]
    fn test_with_data_rejects_duplicate_phones() {
        let mut scratch = store();
        let first = enrol(&mut scratch, "+27705678901");
        let twin = Customer {
            id: "twin".to_string(),
            ..first.clone()
        };

        let rules = LoyaltyRules::default();
        let err =
            LoyaltyStore::with_data(salon(), vec![first, twin], Vec::new(), rules).unwrap_err();
        assert!(matches!(err, CoreError::Validation(ValidationError::Duplicate { .. })));
    }

    #[test]
    fn test_replace_all_checks_phones() {
        let mut scratch = store();
        let a = enrol(&mut scratch, "+27704567890");
        let b = enrol(&mut scratch, "+27703456789");
        let mut store = store();
        let kept = enrol(&mut store, "+27705678901");

        let duplicate = Customer {
            id: "other".to_string(),
            ..a.clone()
        };
        let err = store.replace_all(vec![a.clone(), duplicate], Vec::new()).unwrap_err();
        assert!(matches!(err, CoreError::Validation(ValidationError::Duplicate { .. })));
        assert_eq!(store.customers(), &[kept]);

        store.replace_all(vec![a, b], Vec::new()).unwrap();
        assert_eq!(store.customers().len(), 2);
        assert_eq!(store.salon().total_customers, 2);
    }

    #[test]
    fn test_add_customer_with_visit() {
        let mut store = store();
        let new_customer = NewCustomer {
            phone: "+27711112222".to_string(),
            name: "Lerato Khumalo".to_string(),
            ..Default::default()
        };

        let outcome = store
            .add_customer_with_visit(new_customer.clone(), visit("", 150))
            .unwrap();

        let customer = outcome.customer().unwrap();
        assert_eq!(customer.phone, "+27711112222");
        assert_eq!(customer.visits, 1);
        assert_eq!(customer.points, 15);
        assert_eq!(outcome.visit().customer_id, customer.id);
        assert_eq!(outcome.visit().customer_phone, "+27711112222");

        // A bad visit enrols nobody.
        let mut bad = visit("", 150);
        bad.services.clear();
        let other = NewCustomer {
            phone: "+27722223333".to_string(),
            ..new_customer
        };
        assert!(store.add_customer_with_visit(other, bad).is_err());
        assert_eq!(store.customers().len(), 1);
    }

    #[test]
    fn test_apply_profile_keeps_roster() {
        let mut store = store();
        let customer = enrol(&mut store, "+27705678901");
        store.add_visit(visit(&customer.id, 100)).unwrap();

        store.apply_profile(&User {
            salon_name: "Fade Factory".to_string(),
            phone: "+27719998888".to_string(),
            ..demo_user()
        });

        assert_eq!(store.salon().name, "Fade Factory");
        assert_eq!(store.salon().phone, "+27719998888");
        assert_eq!(store.salon().id, "salon-1");
        assert_eq!(store.customers().len(), 1);
        assert_eq!(store.salon().total_revenue, Money::from_major(100));
    }

    #[test]
    fn test_orphan_policy_parse() {
        assert_eq!("Reject".parse::<OrphanVisitPolicy>().unwrap(), OrphanVisitPolicy::Reject);
        assert!("ignore".parse::<OrphanVisitPolicy>().is_err());
    }
}
