//! # Demo Seed
//!
//! The salon, customers and visits a demo account starts with.
//!
//! The salon is derived from the logged-in user; the customers and visits are
//! fixed so every demo session shows the same dashboard.

use chrono::{DateTime, TimeZone, Utc};
use tracing::debug;

use crate::checkin::qr_code_url;
use crate::error::CoreResult;
use crate::loyalty::{LoyaltyRules, LoyaltyStore};
use crate::money::Money;
use crate::tier::Tier;
use crate::types::{Customer, Salon, User, Visit};

/// Default service catalog.
pub const DEFAULT_SERVICES: [&str; 8] = [
    "Haircut",
    "Beard Trim",
    "Hair Wash",
    "Styling",
    "Coloring",
    "Massage",
    "Manicure",
    "Pedicure",
];

/// Default staff roster.
pub const DEFAULT_BARBERS: [&str; 4] =
    ["John Smith", "Sarah Johnson", "David Williams", "Grace Nkomo"];

/// Builds the salon record for a user. Rollups start at zero.
pub fn demo_salon(user: &User) -> CoreResult<Salon> {
    Ok(Salon {
        id: user.id.clone(),
        name: user.salon_name.clone(),
        phone: user.phone.clone(),
        address: user.address.clone(),
        services: DEFAULT_SERVICES.iter().map(|s| s.to_string()).collect(),
        barbers: DEFAULT_BARBERS.iter().map(|s| s.to_string()).collect(),
        qr_code: qr_code_url(&user.id)?.to_string(),
        subscription: user.subscription,
        subscription_expiry: user.subscription_expiry,
        total_customers: 0,
        total_revenue: Money::zero(),
        average_visit_value: Money::zero(),
        retention_rate_bps: 0,
    })
}

/// A store for `user` populated with the demo customers and visits.
pub fn demo_store(user: &User, rules: LoyaltyRules) -> CoreResult<LoyaltyStore> {
    let salon = demo_salon(user)?;
    let store = LoyaltyStore::with_data(salon, demo_customers(), demo_visits(), rules)?;
    debug!(
        salon_id = %store.salon().id,
        customers = store.customers().len(),
        visits = store.visits().len(),
        "Seeded demo salon"
    );
    Ok(store)
}

struct CustomerSeed {
    id: &'static str,
    name: &'static str,
    phone: &'static str,
    email: Option<&'static str>,
    visits: u32,
    total_spent: i64,
    last_visit: (i32, u32, u32),
    join_date: (i32, u32, u32),
    tier: Tier,
    points: i64,
    favorite_services: &'static [&'static str],
    preferred_barber: &'static str,
    next_reward_at: u32,
}

const CUSTOMERS: [CustomerSeed; 5] = [
    CustomerSeed {
        id: "1",
        name: "Michael Mthembu",
        phone: "+27701234567",
        email: Some("michael@email.com"),
        visits: 12,
        total_spent: 3600,
        last_visit: (2024, 1, 15),
        join_date: (2023, 8, 15),
        tier: Tier::Gold,
        points: 360,
        favorite_services: &["Haircut", "Beard Trim"],
        preferred_barber: "John Smith",
        next_reward_at: 15,
    },
    CustomerSeed {
        id: "2",
        name: "Jane Nkomo",
        phone: "+27702345678",
        email: Some("jane@email.com"),
        visits: 8,
        total_spent: 2400,
        last_visit: (2024, 1, 14),
        join_date: (2023, 10, 20),
        tier: Tier::Silver,
        points: 240,
        favorite_services: &["Haircut", "Styling"],
        preferred_barber: "Sarah Johnson",
        next_reward_at: 10,
    },
    CustomerSeed {
        id: "3",
        name: "Peter Williams",
        phone: "+27703456789",
        email: None,
        visits: 25,
        total_spent: 7500,
        last_visit: (2024, 1, 13),
        join_date: (2023, 5, 10),
        tier: Tier::Platinum,
        points: 750,
        favorite_services: &["Haircut", "Beard Trim", "Massage"],
        preferred_barber: "David Williams",
        next_reward_at: 30,
    },
    CustomerSeed {
        id: "4",
        name: "Nomsa Dlamini",
        phone: "+27704567890",
        email: Some("nomsa@email.com"),
        visits: 6,
        total_spent: 1800,
        last_visit: (2024, 1, 12),
        join_date: (2023, 11, 5),
        tier: Tier::Silver,
        points: 180,
        favorite_services: &["Haircut", "Coloring"],
        preferred_barber: "Grace Nkomo",
        next_reward_at: 10,
    },
    CustomerSeed {
        id: "5",
        name: "Thabo Molefe",
        phone: "+27705678901",
        email: None,
        visits: 3,
        total_spent: 900,
        last_visit: (2024, 1, 11),
        join_date: (2023, 12, 1),
        tier: Tier::Bronze,
        points: 90,
        favorite_services: &["Haircut"],
        preferred_barber: "John Smith",
        next_reward_at: 5,
    },
];

struct VisitSeed {
    customer: usize,
    at: (u32, u32, u32),
    services: &'static [&'static str],
    amount: i64,
    barber: &'static str,
}

/// One most-recent visit per demo customer, all in January 2024.
const VISITS: [VisitSeed; 5] = [
    VisitSeed {
        customer: 0,
        at: (15, 10, 30),
        services: &["Haircut", "Beard Trim"],
        amount: 350,
        barber: "John Smith",
    },
    VisitSeed {
        customer: 1,
        at: (14, 14, 15),
        services: &["Haircut", "Styling"],
        amount: 450,
        barber: "Sarah Johnson",
    },
    VisitSeed {
        customer: 2,
        at: (13, 16, 45),
        services: &["Haircut", "Massage"],
        amount: 400,
        barber: "David Williams",
    },
    VisitSeed {
        customer: 3,
        at: (12, 11, 20),
        services: &["Haircut", "Coloring"],
        amount: 650,
        barber: "Grace Nkomo",
    },
    VisitSeed {
        customer: 4,
        at: (11, 9, 15),
        services: &["Haircut"],
        amount: 200,
        barber: "John Smith",
    },
];

/// The five demo customers.
pub fn demo_customers() -> Vec<Customer> {
    CUSTOMERS
        .iter()
        .map(|seed| Customer {
            id: seed.id.to_string(),
            phone: seed.phone.to_string(),
            name: seed.name.to_string(),
            email: seed.email.map(str::to_string),
            visits: seed.visits,
            total_spent: Money::from_major(seed.total_spent),
            points: seed.points,
            tier: seed.tier,
            favorite_services: seed.favorite_services.iter().map(|s| s.to_string()).collect(),
            preferred_barber: Some(seed.preferred_barber.to_string()),
            join_date: midnight(seed.join_date),
            last_visit: Some(midnight(seed.last_visit)),
            next_reward_at: seed.next_reward_at,
        })
        .collect()
}

/// The five demo visits, one per demo customer.
pub fn demo_visits() -> Vec<Visit> {
    VISITS
        .iter()
        .map(|seed| {
            let customer = &CUSTOMERS[seed.customer];
            let amount = Money::from_major(seed.amount);
            let (day, hour, minute) = seed.at;
            Visit {
                id: customer.id.to_string(),
                customer_id: customer.id.to_string(),
                customer_name: customer.name.to_string(),
                customer_phone: customer.phone.to_string(),
                date: utc(2024, 1, day, hour, minute),
                services: seed.services.iter().map(|s| s.to_string()).collect(),
                amount,
                barber: seed.barber.to_string(),
                points_earned: amount.loyalty_points(),
                reward_used: None,
            }
        })
        .collect()
}

fn midnight((year, month, day): (i32, u32, u32)) -> DateTime<Utc> {
    utc(year, month, day, 0, 0)
}

fn utc(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
    // Seed dates are literals; `single()` only fails on invalid ones.
    Utc.with_ymd_and_hms(year, month, day, hour, minute, 0)
        .single()
        .unwrap_or_default()
}
