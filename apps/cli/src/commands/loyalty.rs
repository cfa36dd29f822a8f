//! # Loyalty Commands
//!
//! Front-desk operations against the salon's loyalty store.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Customer walks in                                                      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  check-in <phone> ──── unknown? ──► add-customer <phone> <name>        │
//! │       │                                   │                             │
//! │       ▼                                   ▼                             │
//! │  tier, points, reward due?  ◄─────────────┘                            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  record-visit <phone> --service Haircut --amount 350 --barber "..."    │
//! │       │        (unknown phone + --name enrols the walk-in first)       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  points earned, new tier (if any)                                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use serde::Serialize;
use snip_core::checkin::{check_in as lookup, CheckIn};
use snip_core::validation::validate_phone;
use snip_core::{
    CoreResult, Customer, LoyaltyStore, Money, NewCustomer, NewVisit, Tier, TierProgress, Visit,
    VisitOutcome,
};
use tracing::debug;

use crate::error::ApiError;
use crate::state::SalonState;

// =============================================================================
// Responses
// =============================================================================

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerResponse {
    pub customer: Customer,
    pub progress: TierProgress,
    /// Newest first. Empty for list views.
    pub visits: Vec<Visit>,
}

impl CustomerResponse {
    fn new(customer: Customer, visits: Vec<Visit>) -> Self {
        CustomerResponse {
            progress: customer.tier_progress(),
            customer,
            visits,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerListResponse {
    pub customers: Vec<Customer>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VisitResponse {
    pub visit: Visit,
    /// `None` when the visit did not match a customer.
    pub customer: Option<Customer>,
    pub tier_change: Option<Tier>,
    /// The customer was enrolled by this visit.
    pub enrolled: bool,
}

impl From<VisitOutcome> for VisitResponse {
    fn from(outcome: VisitOutcome) -> Self {
        let tier_change = outcome.tier_change();
        match outcome {
            VisitOutcome::Applied { visit, customer, .. } => VisitResponse {
                visit,
                customer: Some(customer),
                tier_change,
                enrolled: false,
            },
            VisitOutcome::Orphaned { visit } => VisitResponse {
                visit,
                customer: None,
                tier_change: None,
                enrolled: false,
            },
        }
    }
}

/// Arguments of `record-visit`.
#[derive(Debug, Clone)]
pub struct RecordVisitRequest {
    /// Phone number or customer id.
    pub customer: String,
    pub services: Vec<String>,
    pub amount: Money,
    pub barber: String,
    /// Supplied points; checked against the accrual rule.
    pub points: Option<i64>,
    pub reward_used: Option<String>,
    pub date: Option<DateTime<Utc>>,
    /// Enrols an unknown phone under this name before recording.
    pub name: Option<String>,
    pub email: Option<String>,
}

// =============================================================================
// Commands
// =============================================================================

pub fn add_customer(salon: &SalonState, data: NewCustomer) -> Result<CustomerResponse, ApiError> {
    debug!(phone = %data.phone, "add_customer command");
    let customer = salon.with_store_mut(|store| store.add_customer(data))??;
    Ok(CustomerResponse::new(customer, Vec::new()))
}

/// Records a visit. `customer` may be a phone number or a customer id.
///
/// An unknown phone with a `name` enrols the walk-in and records the visit in
/// one step. Anything else that matches nobody is handled by the configured
/// orphan policy; an unknown phone is kept on the visit.
pub fn record_visit(
    salon: &SalonState,
    request: RecordVisitRequest,
) -> Result<VisitResponse, ApiError> {
    debug!(customer = %request.customer, amount = %request.amount, "record_visit command");

    let (outcome, enrolled) = salon.with_store_mut(|store| apply_visit(store, request))??;

    let mut response = VisitResponse::from(outcome);
    response.enrolled = enrolled;
    Ok(response)
}

fn apply_visit(
    store: &mut LoyaltyStore,
    request: RecordVisitRequest,
) -> CoreResult<(VisitOutcome, bool)> {
    let query = request.customer.trim().to_string();
    let visit = NewVisit {
        customer_id: query.clone(),
        customer_name: String::new(),
        customer_phone: String::new(),
        date: request.date.unwrap_or_else(Utc::now),
        services: request.services,
        amount: request.amount,
        barber: request.barber,
        points_earned: request.points,
        reward_used: request.reward_used,
    };

    if let Some(customer) = find_customer(store, &query) {
        let customer_id = customer.id.clone();
        return Ok((store.add_visit(NewVisit { customer_id, ..visit })?, false));
    }
    if validate_phone(&query).is_err() {
        return Ok((store.add_visit(visit)?, false));
    }

    match request.name {
        Some(name) => {
            let walk_in = NewCustomer {
                phone: query,
                name,
                email: request.email,
                favorite_services: visit.services.clone(),
                preferred_barber: Some(visit.barber.clone()),
                ..Default::default()
            };
            Ok((store.add_customer_with_visit(walk_in, visit)?, true))
        }
        None => {
            let visit = NewVisit {
                customer_phone: query,
                ..visit
            };
            Ok((store.add_visit(visit)?, false))
        }
    }
}

/// One customer by phone or id, with visit history.
pub fn customer(salon: &SalonState, query: &str) -> Result<CustomerResponse, ApiError> {
    salon.with_store(|store| {
        let customer = find_customer(store, query)
            .cloned()
            .ok_or_else(|| ApiError::not_found("Customer", query))?;
        let visits = store
            .visits_for_customer(&customer.id)
            .into_iter()
            .cloned()
            .collect();
        Ok(CustomerResponse::new(customer, visits))
    })?
}

/// All customers, roster order.
pub fn list_customers(salon: &SalonState) -> Result<CustomerListResponse, ApiError> {
    let customers = salon.with_store(|store| store.customers().to_vec())?;
    Ok(CustomerListResponse { customers })
}

/// Front-desk lookup by phone. Does not record a visit.
pub fn check_in(salon: &SalonState, phone: &str) -> Result<CheckIn, ApiError> {
    salon
        .with_store(|store| lookup(store, phone))?
        .ok_or_else(|| ApiError::not_found("Customer", phone))
}

fn find_customer<'a>(store: &'a LoyaltyStore, query: &str) -> Option<&'a Customer> {
    store
        .customer_by_phone(query)
        .or_else(|| store.customer(query.trim()))
}
