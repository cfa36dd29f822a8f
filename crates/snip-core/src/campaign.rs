//! # SMS Campaigns
//!
//! Audience selection and message templating for SMS campaign previews.
//!
//! ```text
//! CampaignKind ──► template (subject + body with {name} {tier} {salon})
//!       │
//! Audience ──► recipients ⊆ customers
//!       │
//!       └──► CampaignPreview { recipients, sample message, estimated cost }
//! ```
//!
//! Nothing is sent from here.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::analytics::{is_inactive, INACTIVE_AFTER_DAYS};
use crate::money::Money;
use crate::tier::Tier;
use crate::types::Customer;

/// Cost of one SMS.
pub const COST_PER_SMS: Money = Money::from_major(1);

// =============================================================================
// Campaign Kind
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CampaignKind {
    Birthday,
    Reminder,
    Promotion,
    Reward,
}

impl CampaignKind {
    pub const ALL: [CampaignKind; 4] = [
        CampaignKind::Birthday,
        CampaignKind::Reminder,
        CampaignKind::Promotion,
        CampaignKind::Reward,
    ];

    pub fn subject(self) -> &'static str {
        match self {
            CampaignKind::Birthday => "Happy Birthday! 🎉",
            CampaignKind::Reminder => "Time for your next visit ✂️",
            CampaignKind::Promotion => "Special Offer Just for You! 💫",
            CampaignKind::Reward => "Congratulations! You've earned a reward! 🎁",
        }
    }

    /// Body template. Placeholders: `{name}`, `{tier}`, `{salon}`.
    pub fn template(self) -> &'static str {
        match self {
            CampaignKind::Birthday => {
                "Happy Birthday {name}! 🎂 Celebrate with us and get 20% off your next visit \
                 at {salon}. Book now!"
            }
            CampaignKind::Reminder => {
                "Hi {name}! It's been a while since your last visit to {salon}. \
                 Book your appointment today and keep looking great!"
            }
            CampaignKind::Promotion => {
                "Exclusive offer for our {tier} members! Get 15% off all services this week \
                 at {salon}. Limited time only!"
            }
            CampaignKind::Reward => {
                "Amazing news {name}! You've reached {tier} tier and earned a free service. \
                 Come claim your reward at {salon}!"
            }
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            CampaignKind::Birthday => "birthday",
            CampaignKind::Reminder => "reminder",
            CampaignKind::Promotion => "promotion",
            CampaignKind::Reward => "reward",
        }
    }
}

impl fmt::Display for CampaignKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for CampaignKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CampaignKind::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown campaign '{}'", s))
    }
}

// =============================================================================
// Audience
// =============================================================================

/// Who receives a campaign.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Audience {
    All,
    Tier(Tier),
    /// No visit in the last `INACTIVE_AFTER_DAYS` days.
    Inactive,
}

impl Audience {
    /// Whether a customer belongs to this audience as of `now`.
    pub fn includes(&self, customer: &Customer, now: DateTime<Utc>) -> bool {
        match self {
            Audience::All => true,
            Audience::Tier(tier) => customer.tier == *tier,
            Audience::Inactive => is_inactive(customer, now - Duration::days(INACTIVE_AFTER_DAYS)),
        }
    }

    /// The matching customers, in roster order.
    pub fn select<'a>(&self, customers: &'a [Customer], now: DateTime<Utc>) -> Vec<&'a Customer> {
        customers.iter().filter(|c| self.includes(c, now)).collect()
    }
}

impl fmt::Display for Audience {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Audience::All => f.write_str("all"),
            Audience::Tier(tier) => write!(f, "{}", tier.as_str().to_ascii_lowercase()),
            Audience::Inactive => f.write_str("inactive"),
        }
    }
}

impl std::str::FromStr for Audience {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(Audience::All),
            "inactive" => Ok(Audience::Inactive),
            other => other
                .parse::<Tier>()
                .map(Audience::Tier)
                .map_err(|_| format!("unknown audience '{}'", s)),
        }
    }
}

// =============================================================================
// Rendering
// =============================================================================

/// Fills a template for one customer.
///
/// ```rust
/// use snip_core::campaign::render;
///
/// let text = render("Hi {name} at {salon}", "Jane", "Gold", "Elite Cuts");
/// assert_eq!(text, "Hi Jane at Elite Cuts");
/// ```
pub fn render(template: &str, name: &str, tier: &str, salon: &str) -> String {
    template
        .replace("{name}", name)
        .replace("{tier}", tier)
        .replace("{salon}", salon)
}

/// Campaign preview shown before sending.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignPreview {
    pub kind: CampaignKind,
    pub audience: Audience,
    pub subject: String,
    pub recipients: Vec<Recipient>,
    pub estimated_cost: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipient {
    pub customer_id: String,
    pub phone: String,
    pub message: String,
}

impl CampaignPreview {
    /// Renders `kind` for every customer in `audience`.
    pub fn build(
        kind: CampaignKind,
        audience: Audience,
        salon_name: &str,
        customers: &[Customer],
        now: DateTime<Utc>,
    ) -> Self {
        let recipients: Vec<Recipient> = audience
            .select(customers, now)
            .into_iter()
            .map(|c| Recipient {
                customer_id: c.id.clone(),
                phone: c.phone.clone(),
                message: render(kind.template(), &c.name, c.tier.as_str(), salon_name),
            })
            .collect();

        CampaignPreview {
            kind,
            audience,
            subject: kind.subject().to_string(),
            estimated_cost: Money::from_cents(COST_PER_SMS.cents() * recipients.len() as i64),
            recipients,
        }
    }

    pub fn recipient_count(&self) -> usize {
        self.recipients.len()
    }
}
