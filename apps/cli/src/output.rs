//! # Output
//!
//! Turns command responses into terminal text.
//!
//! ```text
//! Command response ──┬── --json ──► serde_json::to_string_pretty
//!                    └── default ─► Render::render(&ConfigState)
//! ```
//!
//! Money is always formatted with the configured currency symbol.

use serde::Serialize;
use snip_core::analytics::AnalyticsReport;
use snip_core::campaign::CampaignPreview;
use snip_core::checkin::CheckIn;
use snip_core::{Customer, Visit};

use crate::commands::loyalty::{CustomerListResponse, CustomerResponse, VisitResponse};
use crate::commands::reports::{DashboardResponse, QrResponse};
use crate::commands::session::{MessageResponse, UserResponse};
use crate::error::ApiError;
use crate::state::ConfigState;

/// Human-readable rendering of a response.
pub trait Render {
    fn render(&self, config: &ConfigState) -> String;
}

/// Renders `value` as pretty JSON or as text.
pub fn format_output<T>(value: &T, json: bool, config: &ConfigState) -> Result<String, ApiError>
where
    T: Serialize + Render,
{
    if json {
        serde_json::to_string_pretty(value)
            .map_err(|e| ApiError::internal(format!("Failed to serialize output: {}", e)))
    } else {
        Ok(value.render(config))
    }
}

/// Pretty JSON for an error, falling back to its display form.
pub fn format_error(error: &ApiError, json: bool) -> String {
    if json {
        serde_json::to_string_pretty(error).unwrap_or_else(|_| error.to_string())
    } else {
        format!("Error: {}", error.message)
    }
}

// =============================================================================
// Session
// =============================================================================

impl Render for UserResponse {
    fn render(&self, _config: &ConfigState) -> String {
        let user = &self.user;
        [
            format!("{} <{}>", user.name, user.email),
            format!("Salon:        {}", user.salon_name),
            format!("Phone:        {}", user.phone),
            format!("Address:      {}", user.address),
            format!(
                "Subscription: {:?} (until {})",
                user.subscription,
                user.subscription_expiry.format("%Y-%m-%d")
            ),
        ]
        .join("\n")
    }
}

impl Render for MessageResponse {
    fn render(&self, _config: &ConfigState) -> String {
        self.message.clone()
    }
}

// =============================================================================
// Loyalty
// =============================================================================

fn customer_line(customer: &Customer, config: &ConfigState) -> String {
    format!(
        "{:<20} {:<14} {:<9} {:>3} visits {:>5} pts {:>12}",
        customer.name,
        customer.phone,
        customer.tier.as_str(),
        customer.visits,
        customer.points,
        config.format_currency(customer.total_spent)
    )
}

fn visit_line(visit: &Visit, config: &ConfigState) -> String {
    format!(
        "{}  {:<20} {:<28} {:>12}  {}",
        visit.date.format("%Y-%m-%d %H:%M"),
        visit.customer_name,
        visit.services.join(", "),
        config.format_currency(visit.amount),
        visit.barber
    )
}

impl Render for CustomerResponse {
    fn render(&self, config: &ConfigState) -> String {
        let c = &self.customer;
        let mut lines = vec![
            format!("{} ({})", c.name, c.phone),
            format!("Tier:         {}", c.tier.as_str()),
            format!("Visits:       {}", c.visits),
            format!("Points:       {}", c.points),
            format!("Total spent:  {}", config.format_currency(c.total_spent)),
        ];

        match (self.progress.next, self.progress.visits_needed) {
            (Some(next), needed) => lines.push(format!(
                "Progress:     {}% to {} ({} more visits)",
                self.progress.percent,
                next.as_str(),
                needed
            )),
            (None, _) => lines.push("Progress:     top tier".to_string()),
        }

        if c.reward_available() {
            lines.push("Reward:       available now".to_string());
        } else {
            lines.push(format!("Reward:       {} visits away", c.visits_to_reward()));
        }

        if !self.visits.is_empty() {
            lines.push(String::new());
            lines.push("Visits:".to_string());
            lines.extend(self.visits.iter().map(|v| format!("  {}", visit_line(v, config))));
        }
        lines.join("\n")
    }
}

impl Render for CustomerListResponse {
    fn render(&self, config: &ConfigState) -> String {
        if self.customers.is_empty() {
            return "No customers yet.".to_string();
        }
        self.customers
            .iter()
            .map(|c| customer_line(c, config))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl Render for VisitResponse {
    fn render(&self, config: &ConfigState) -> String {
        let mut lines = Vec::new();
        if self.enrolled {
            lines.push("New customer enrolled.".to_string());
        }
        lines.push(format!(
            "Visit recorded: {} for {} ({} points)",
            config.format_currency(self.visit.amount),
            self.visit.services.join(", "),
            self.visit.points_earned
        ));

        match &self.customer {
            Some(customer) => {
                lines.push(customer_line(customer, config));
                if let Some(tier) = self.tier_change {
                    lines.push(format!("Promoted to {}!", tier.as_str()));
                }
            }
            None => lines.push(format!(
                "Warning: no customer matches '{}'; customer totals not updated.",
                self.visit.customer_id
            )),
        }
        lines.join("\n")
    }
}

impl Render for CheckIn {
    fn render(&self, _config: &ConfigState) -> String {
        let reward = if self.reward_available {
            "Reward available!".to_string()
        } else {
            format!("Next reward at {} visits", self.next_reward_at)
        };
        format!(
            "Welcome back, {}!\n{} member, {} visits, {} points\n{}",
            self.name,
            self.tier.as_str(),
            self.visits,
            self.points,
            reward
        )
    }
}

// =============================================================================
// Reports
// =============================================================================

impl Render for DashboardResponse {
    fn render(&self, config: &ConfigState) -> String {
        let s = &self.salon;
        let mut lines = vec![
            s.name.clone(),
            format!("Customers:          {}", s.total_customers),
            format!("Revenue:            {}", config.format_currency(s.total_revenue)),
            format!("Average visit:      {}", config.format_currency(s.average_visit_value)),
            format!("Retention:          {}%", s.retention_rate_bps / 100),
            format!("Visits today:       {}", self.visits_today),
            String::new(),
            "Recent visits:".to_string(),
        ];
        lines.extend(self.recent_visits.iter().map(|v| format!("  {}", visit_line(v, config))));
        lines.push(String::new());
        lines.push("Top customers:".to_string());
        lines.extend(self.top_customers.iter().map(|c| format!("  {}", customer_line(c, config))));
        lines.join("\n")
    }
}

impl Render for AnalyticsReport {
    fn render(&self, config: &ConfigState) -> String {
        let mut lines = vec![
            format!("Customers:          {}", self.total_customers),
            format!("Visits:             {}", self.total_visits),
            format!("Visiting customers: {}", self.unique_visiting_customers),
            format!("Visits today:       {}", self.visits_today),
            format!("Revenue:            {}", config.format_currency(self.total_revenue)),
            format!("Average visit:      {}", config.format_currency(self.average_visit_value)),
            format!("Retention:          {}%", self.retention_percent()),
            format!("Inactive (30d):     {}", self.inactive_customers),
            String::new(),
            "Tiers:".to_string(),
        ];
        lines.extend(
            self.tier_distribution
                .iter()
                .map(|t| format!("  {:<9} {}", t.tier.as_str(), t.customers)),
        );

        lines.push(String::new());
        lines.push("Top services:".to_string());
        lines.extend(
            self.top_services
                .iter()
                .map(|s| format!("  {:<12} {}", s.service, s.count)),
        );

        lines.push(String::new());
        lines.push("Top barbers:".to_string());
        lines.extend(self.top_barbers.iter().map(|b| {
            format!(
                "  {:<16} {:>12} ({} visits)",
                b.barber,
                config.format_currency(b.revenue),
                b.visits
            )
        }));
        lines.join("\n")
    }
}

impl Render for CampaignPreview {
    fn render(&self, config: &ConfigState) -> String {
        let mut lines = vec![
            format!("{} ({} campaign, audience: {})", self.subject, self.kind, self.audience),
            format!(
                "{} recipients, estimated cost {}",
                self.recipient_count(),
                config.format_currency(self.estimated_cost)
            ),
        ];
        for recipient in &self.recipients {
            lines.push(String::new());
            lines.push(format!("To {}:", recipient.phone));
            lines.push(format!("  {}", recipient.message));
        }
        lines.join("\n")
    }
}

impl Render for QrResponse {
    fn render(&self, _config: &ConfigState) -> String {
        format!("Check-in link: {}\nQR code:       {}", self.checkin_url, self.qr_code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    #[test]
    fn test_message_text_and_json() {
        let response = MessageResponse {
            message: "Logged out.".to_string(),
        };
        let config = ConfigState::default();

        assert_eq!(format_output(&response, false, &config).unwrap(), "Logged out.");
        let json = format_output(&response, true, &config).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["message"], "Logged out.");
    }

    #[test]
    fn test_qr_render() {
        let response = QrResponse {
            salon_id: "1".to_string(),
            checkin_url: "https://sniprewards.com/scan/1".to_string(),
            qr_code: "https://api.qrserver.com/v1/create-qr-code/".to_string(),
        };
        let text = response.render(&ConfigState::default());
        assert!(text.starts_with("Check-in link: https://sniprewards.com/scan/1"));
    }

    #[test]
    fn test_error_output() {
        let err = ApiError::new(ErrorCode::NotFound, "Customer not found: 9");
        assert_eq!(format_error(&err, false), "Error: Customer not found: 9");
        assert!(format_error(&err, true).contains("\"NOT_FOUND\""));
    }
}
