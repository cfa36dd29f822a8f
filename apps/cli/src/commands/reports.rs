//! # Report Commands
//!
//! Read-only views over the salon store: dashboard, analytics, campaign
//! previews and the check-in QR link. None of these mutate state.

use chrono::{DateTime, Utc};
use serde::Serialize;
use snip_core::analytics::{recent_visits, top_customers, visits_today, AnalyticsReport, TOP_N};
use snip_core::campaign::{Audience, CampaignKind, CampaignPreview};
use snip_core::checkin::{checkin_url, qr_code_url};
use snip_core::{Customer, Salon, Visit};

use crate::error::ApiError;
use crate::state::SalonState;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardResponse {
    /// Salon record including rollups.
    pub salon: Salon,
    pub visits_today: usize,
    pub recent_visits: Vec<Visit>,
    pub top_customers: Vec<Customer>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QrResponse {
    pub salon_id: String,
    pub checkin_url: String,
    pub qr_code: String,
}

pub fn dashboard(salon: &SalonState, now: DateTime<Utc>) -> Result<DashboardResponse, ApiError> {
    salon.with_store(|store| DashboardResponse {
        salon: store.salon().clone(),
        visits_today: visits_today(store.visits(), now),
        recent_visits: recent_visits(store.visits(), TOP_N).into_iter().cloned().collect(),
        top_customers: top_customers(store.customers(), TOP_N).into_iter().cloned().collect(),
    })
}

pub fn analytics(salon: &SalonState, now: DateTime<Utc>) -> Result<AnalyticsReport, ApiError> {
    salon.with_store(|store| AnalyticsReport::build(store.customers(), store.visits(), now))
}

/// Preview of an SMS campaign. Nothing is sent.
pub fn campaign(
    salon: &SalonState,
    kind: CampaignKind,
    audience: Audience,
    now: DateTime<Utc>,
) -> Result<CampaignPreview, ApiError> {
    salon.with_store(|store| {
        CampaignPreview::build(kind, audience, &store.salon().name, store.customers(), now)
    })
}

pub fn qr(salon: &SalonState) -> Result<QrResponse, ApiError> {
    let salon_id = salon.with_store(|store| store.salon().id.clone())?;
    Ok(QrResponse {
        checkin_url: checkin_url(&salon_id)?.to_string(),
        qr_code: qr_code_url(&salon_id)?.to_string(),
        salon_id,
    })
}
