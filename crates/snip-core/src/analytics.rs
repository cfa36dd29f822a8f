//! # Analytics
//!
//! Read-only aggregates over a salon's customers and visits: the salon
//! rollup counters kept on `Salon`, and the dashboard/analytics report.
//!
//! Every function here is pure. Callers pass `now` explicitly so reports are
//! reproducible in tests.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::tier::Tier;
use crate::types::{Customer, Salon, Visit};

/// Days without a visit after which a customer counts as inactive.
pub const INACTIVE_AFTER_DAYS: i64 = 30;

/// Default length of the "top N" lists.
pub const TOP_N: usize = 5;

const BASIS_POINTS: u64 = 10_000;

// =============================================================================
// Salon Rollup
// =============================================================================

/// The rollup counters stored on `Salon`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SalonRollup {
    pub total_customers: u32,
    pub total_revenue: Money,
    pub average_visit_value: Money,
    pub retention_rate_bps: u32,
}

impl SalonRollup {
    /// Computes the rollup from the full collections.
    pub fn compute(customers: &[Customer], visits: &[Visit]) -> Self {
        let total_revenue = total_revenue(visits);
        SalonRollup {
            total_customers: customers.len() as u32,
            total_revenue,
            average_visit_value: Money::average(total_revenue, visits.len()),
            retention_rate_bps: retention_rate_bps(customers),
        }
    }

    /// Writes the counters onto a salon.
    pub fn apply_to(self, salon: &mut Salon) {
        salon.total_customers = self.total_customers;
        salon.total_revenue = self.total_revenue;
        salon.average_visit_value = self.average_visit_value;
        salon.retention_rate_bps = self.retention_rate_bps;
    }
}

// =============================================================================
// Aggregates
// =============================================================================

/// Sum of all visit amounts.
pub fn total_revenue(visits: &[Visit]) -> Money {
    visits.iter().map(|v| v.amount).sum()
}

/// Share of customers with two or more visits, in basis points.
///
/// ```rust
/// use snip_core::analytics::retention_rate_bps;
///
/// assert_eq!(retention_rate_bps(&[]), 0);
/// ```
pub fn retention_rate_bps(customers: &[Customer]) -> u32 {
    if customers.is_empty() {
        return 0;
    }
    let returning = customers.iter().filter(|c| c.visits >= 2).count() as u64;
    (returning * BASIS_POINTS / customers.len() as u64) as u32
}

/// Visits whose date falls on the same UTC day as `now`.
pub fn visits_today(visits: &[Visit], now: DateTime<Utc>) -> usize {
    let today = now.date_naive();
    visits.iter().filter(|v| v.date.date_naive() == today).count()
}

/// Distinct customer ids that appear in the visit log.
pub fn unique_visiting_customers(visits: &[Visit]) -> usize {
    visits
        .iter()
        .map(|v| v.customer_id.as_str())
        .collect::<HashSet<_>>()
        .len()
}

/// Customer count per tier, lowest tier first. Every tier is present.
pub fn tier_distribution(customers: &[Customer]) -> Vec<TierCount> {
    Tier::ALL
        .into_iter()
        .map(|tier| TierCount {
            tier,
            customers: customers.iter().filter(|c| c.tier == tier).count() as u32,
        })
        .collect()
}

/// Customers with the highest spend. Ties keep roster order.
pub fn top_customers(customers: &[Customer], limit: usize) -> Vec<&Customer> {
    let mut ranked: Vec<&Customer> = customers.iter().collect();
    ranked.sort_by(|a, b| b.total_spent.cmp(&a.total_spent));
    ranked.truncate(limit);
    ranked
}

/// Most recent visits, newest first.
pub fn recent_visits(visits: &[Visit], limit: usize) -> Vec<&Visit> {
    let mut ranked: Vec<&Visit> = visits.iter().collect();
    ranked.sort_by(|a, b| b.date.cmp(&a.date));
    ranked.truncate(limit);
    ranked
}

/// Most-booked services. Ties are broken alphabetically.
pub fn top_services(visits: &[Visit], limit: usize) -> Vec<ServiceCount> {
    let mut counts: HashMap<&str, u32> = HashMap::new();
    for service in visits.iter().flat_map(|v| v.services.iter()) {
        *counts.entry(service.as_str()).or_default() += 1;
    }

    let mut ranked: Vec<ServiceCount> = counts
        .into_iter()
        .map(|(service, count)| ServiceCount {
            service: service.to_string(),
            count,
        })
        .collect();
    ranked.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.service.cmp(&b.service)));
    ranked.truncate(limit);
    ranked
}

/// Barbers ranked by revenue. Ties are broken alphabetically.
pub fn top_barbers(visits: &[Visit], limit: usize) -> Vec<BarberRevenue> {
    let mut totals: HashMap<&str, (Money, u32)> = HashMap::new();
    for visit in visits {
        let entry = totals.entry(visit.barber.as_str()).or_default();
        entry.0 = entry.0.saturating_add(visit.amount);
        entry.1 += 1;
    }

    let mut ranked: Vec<BarberRevenue> = totals
        .into_iter()
        .map(|(barber, (revenue, visits))| BarberRevenue {
            barber: barber.to_string(),
            revenue,
            visits,
        })
        .collect();
    ranked.sort_by(|a, b| b.revenue.cmp(&a.revenue).then_with(|| a.barber.cmp(&b.barber)));
    ranked.truncate(limit);
    ranked
}

/// Customers whose last visit is older than `INACTIVE_AFTER_DAYS`, or who
/// never visited.
pub fn inactive_customers(customers: &[Customer], now: DateTime<Utc>) -> Vec<&Customer> {
    let cutoff = now - Duration::days(INACTIVE_AFTER_DAYS);
    customers
        .iter()
        .filter(|c| is_inactive(c, cutoff))
        .collect()
}

pub(crate) fn is_inactive(customer: &Customer, cutoff: DateTime<Utc>) -> bool {
    customer.last_visit.map_or(true, |last| last < cutoff)
}

// =============================================================================
// Report Types
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct TierCount {
    pub tier: Tier,
    pub customers: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ServiceCount {
    pub service: String,
    pub count: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct BarberRevenue {
    pub barber: String,
    pub revenue: Money,
    pub visits: u32,
}

/// Everything the dashboard and analytics screens show.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsReport {
    pub total_customers: u32,
    pub total_visits: usize,
    pub unique_visiting_customers: usize,
    pub visits_today: usize,
    pub total_revenue: Money,
    pub average_visit_value: Money,
    pub retention_rate_bps: u32,
    pub tier_distribution: Vec<TierCount>,
    pub top_customers: Vec<Customer>,
    pub recent_visits: Vec<Visit>,
    pub top_services: Vec<ServiceCount>,
    pub top_barbers: Vec<BarberRevenue>,
    pub inactive_customers: usize,
}

impl AnalyticsReport {
    /// Builds the report as of `now`.
    pub fn build(customers: &[Customer], visits: &[Visit], now: DateTime<Utc>) -> Self {
        let rollup = SalonRollup::compute(customers, visits);
        AnalyticsReport {
            total_customers: rollup.total_customers,
            total_visits: visits.len(),
            unique_visiting_customers: unique_visiting_customers(visits),
            visits_today: visits_today(visits, now),
            total_revenue: rollup.total_revenue,
            average_visit_value: rollup.average_visit_value,
            retention_rate_bps: rollup.retention_rate_bps,
            tier_distribution: tier_distribution(customers),
            top_customers: top_customers(customers, TOP_N).into_iter().cloned().collect(),
            recent_visits: recent_visits(visits, TOP_N).into_iter().cloned().collect(),
            top_services: top_services(visits, TOP_N),
            top_barbers: top_barbers(visits, TOP_N),
            inactive_customers: inactive_customers(customers, now).len(),
        }
    }

    /// Retention as a whole percentage, rounded down.
    pub fn retention_percent(&self) -> u32 {
        self.retention_rate_bps / 100
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn customer(id: &str, visits: u32, spent: i64, last_visit: Option<DateTime<Utc>>) -> Customer {
        Customer {
            id: id.to_string(),
            phone: format!("+2770000000{}", id),
            name: format!("Customer {}", id),
            email: None,
            visits,
            total_spent: Money::from_major(spent),
            points: spent / 10,
            tier: Tier::for_visits(visits),
            favorite_services: vec![],
            preferred_barber: None,
            join_date: Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap(),
            last_visit,
            next_reward_at: 5,
        }
    }

    fn visit(
        customer_id: &str,
        date: DateTime<Utc>,
        services: &[&str],
        units: i64,
        barber: &str,
    ) -> Visit {
        Visit {
            id: format!("v-{}-{}", customer_id, date.timestamp()),
            customer_id: customer_id.to_string(),
            customer_name: String::new(),
            customer_phone: String::new(),
            date,
            services: services.iter().map(|s| s.to_string()).collect(),
            amount: Money::from_major(units),
            barber: barber.to_string(),
            points_earned: units / 10,
            reward_used: None,
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 15, 18, 0, 0).unwrap()
    }

    #[test]
    fn test_rollup_on_empty_store() {
        let rollup = SalonRollup::compute(&[], &[]);
        assert_eq!(rollup.total_customers, 0);
        assert_eq!(rollup.total_revenue, Money::zero());
        assert_eq!(rollup.average_visit_value, Money::zero());
        assert_eq!(rollup.retention_rate_bps, 0);
    }

    #[test]
    fn test_retention_rate() {
        let customers = vec![
            customer("1", 0, 0, None),
            customer("2", 1, 100, None),
            customer("3", 2, 200, None),
        ];
        assert_eq!(retention_rate_bps(&customers), 3_333);
    }

    #[test]
    fn test_top_services_and_barbers() {
        let day = now();
        let visits = vec![
            visit("1", day, &["Haircut", "Beard Trim"], 350, "John Smith"),
            visit("2", day, &["Haircut", "Styling"], 450, "Sarah Johnson"),
            visit("3", day, &["Haircut", "Beard Trim"], 400, "John Smith"),
        ];

        let services = top_services(&visits, 2);
        assert_eq!(services[0], ServiceCount { service: "Haircut".into(), count: 3 });
        assert_eq!(services[1], ServiceCount { service: "Beard Trim".into(), count: 2 });

        let barbers = top_barbers(&visits, TOP_N);
        assert_eq!(barbers[0].barber, "John Smith");
        assert_eq!(barbers[0].revenue, Money::from_major(750));
        assert_eq!(barbers[0].visits, 2);
        assert_eq!(barbers[1].barber, "Sarah Johnson");
    }

    #[test]
    fn test_visits_today_uses_utc_day() {
        let midnight = Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap();
        let visits = vec![
            visit("1", midnight, &["Haircut"], 100, "A"),
            visit("2", midnight - Duration::seconds(1), &["Haircut"], 100, "A"),
        ];
        assert_eq!(visits_today(&visits, now()), 1);
    }

    #[test]
    fn test_inactive_customers() {
        let customers = vec![
            customer("1", 3, 300, Some(now() - Duration::days(5))),
            customer("2", 3, 300, Some(now() - Duration::days(31))),
            customer("3", 0, 0, None),
        ];
        let ids: Vec<&str> = inactive_customers(&customers, now())
            .iter()
            .map(|c| c.id.as_str())
            .collect();
        assert_eq!(ids, vec!["2", "3"]);
    }

    #[test]
    fn test_report() {
        let customers = vec![
            customer("1", 12, 3600, Some(now())),
            customer("2", 8, 2400, Some(now())),
            customer("3", 1, 100, Some(now())),
        ];
        let visits = vec![
            visit("1", now(), &["Haircut"], 350, "John Smith"),
            visit("1", now() - Duration::days(1), &["Haircut"], 250, "John Smith"),
            visit("9", now() - Duration::days(2), &["Massage"], 300, "Grace Nkomo"),
        ];

        let report = AnalyticsReport::build(&customers, &visits, now());

        assert_eq!(report.total_customers, 3);
        assert_eq!(report.total_visits, 3);
        assert_eq!(report.unique_visiting_customers, 2);
        assert_eq!(report.visits_today, 1);
        assert_eq!(report.total_revenue, Money::from_major(900));
        assert_eq!(report.average_visit_value, Money::from_major(300));
        assert_eq!(report.retention_percent(), 66);
        assert_eq!(report.top_customers[0].id, "1");
        assert_eq!(report.recent_visits[0].amount, Money::from_major(350));
        assert_eq!(report.inactive_customers, 0);

        let silver = report
            .tier_distribution
            .iter()
            .find(|t| t.tier == Tier::Silver)
            .unwrap();
        assert_eq!(silver.customers, 1);
        assert_eq!(report.tier_distribution.len(), 4);
    }
}
