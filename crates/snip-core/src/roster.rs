//! # Demo Roster
//!
//! The fixed set of demo accounts that the session layer checks credentials
//! against, plus any accounts registered during the current process.
//!
//! Passwords are plaintext. This is a demo login, not a security boundary.

use chrono::{DateTime, Duration, TimeZone, Utc};
use tracing::info;
use uuid::Uuid;

use crate::error::ValidationError;
use crate::types::{RegisterRequest, Subscription, User};
use crate::validation::{
    validate_email, validate_name, validate_password, validate_phone, ValidationResult,
};

/// Length of the trial granted at sign-up.
pub const TRIAL_DAYS: i64 = 14;

/// A roster entry.
#[derive(Debug, Clone, PartialEq)]
pub struct DemoAccount {
    pub user: User,
    pub password: String,
}

/// Accounts that can log in.
#[derive(Debug, Clone, Default)]
pub struct DemoRoster {
    accounts: Vec<DemoAccount>,
}

impl DemoRoster {
    /// An empty roster.
    pub fn empty() -> Self {
        Self::default()
    }

    /// The two built-in demo accounts.
    pub fn demo() -> Self {
        DemoRoster {
            accounts: vec![
                DemoAccount {
                    user: User {
                        id: "1".to_string(),
                        email: "demo@sniprewards.com".to_string(),
                        name: "John Mwangi".to_string(),
                        salon_name: "Elite Cuts & Styles".to_string(),
                        phone: "+27712345678".to_string(),
                        address: "123 Sandton Drive, Johannesburg".to_string(),
                        avatar: None,
                        join_date: date(2024, 1, 1),
                        subscription: Subscription::Professional,
                        subscription_expiry: date(2024, 12, 31),
                    },
                    password: "demo123".to_string(),
                },
                DemoAccount {
                    user: User {
                        id: "2".to_string(),
                        email: "sarah@beautysalon.co.za".to_string(),
                        name: "Sarah Williams".to_string(),
                        salon_name: "Beauty & Grace Salon".to_string(),
                        phone: "+27823456789".to_string(),
                        address: "456 Cape Town Street, Cape Town".to_string(),
                        avatar: None,
                        join_date: date(2024, 1, 15),
                        subscription: Subscription::Starter,
                        subscription_expiry: date(2024, 6, 15),
                    },
                    password: "sarah123".to_string(),
                },
            ],
        }
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    /// The user whose email and password both match exactly.
    pub fn authenticate(&self, email: &str, password: &str) -> Option<User> {
        self.accounts
            .iter()
            .find(|a| a.user.email == email && a.password == password)
            .map(|a| a.user.clone())
    }

    pub fn contains_email(&self, email: &str) -> bool {
        self.accounts.iter().any(|a| a.user.email == email)
    }

    /// Adds a trial account and returns its user.
    ///
    /// ## Errors
    /// - `Required`, `InvalidFormat` or `TooLong` for bad fields
    /// - `Duplicate` when the email is already on the roster
    pub fn register(
        &mut self,
        request: RegisterRequest,
        now: DateTime<Utc>,
    ) -> ValidationResult<User> {
        let email = request.email.trim().to_string();
        validate_email(&email)?;
        validate_password(&request.password)?;
        validate_name("name", &request.name)?;
        validate_name("salon_name", &request.salon_name)?;
        validate_phone(&request.phone)?;

        if self.contains_email(&email) {
            return Err(ValidationError::Duplicate {
                field: "email".to_string(),
                value: email,
            });
        }

        let user = User {
            id: Uuid::new_v4().to_string(),
            email,
            name: request.name.trim().to_string(),
            salon_name: request.salon_name.trim().to_string(),
            phone: request.phone.trim().to_string(),
            address: request.address.trim().to_string(),
            avatar: None,
            join_date: now,
            subscription: Subscription::Trial,
            subscription_expiry: now + Duration::days(TRIAL_DAYS),
        };

        info!(user_id = %user.id, email = %user.email, "Registered trial account");
        self.accounts.push(DemoAccount {
            user: user.clone(),
            password: request.password,
        });
        Ok(user)
    }
}

fn date(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 0, 0, 0)
        .single()
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(email: &str) -> RegisterRequest {
        RegisterRequest {
            email: email.to_string(),
            password: "secret".to_string(),
            name: "Lerato Khumalo".to_string(),
            salon_name: "Fade Factory".to_string(),
            phone: "+27831112222".to_string(),
            address: "9 Main Road, Durban".to_string(),
        }
    }

    #[test]
    fn test_authenticate_exact_match() {
        let roster = DemoRoster::demo();
        let user = roster.authenticate("demo@sniprewards.com", "demo123").unwrap();
        assert_eq!(user.name, "John Mwangi");
        assert_eq!(user.subscription, Subscription::Professional);

        assert!(roster.authenticate("demo@sniprewards.com", "wrong").is_none());
        assert!(roster.authenticate("DEMO@sniprewards.com", "demo123").is_none());
        assert!(roster.authenticate("nobody@example.com", "demo123").is_none());
    }

    #[test]
    fn test_register_grants_trial() {
        let mut roster = DemoRoster::demo();
        let now = Utc.with_ymd_and_hms(2024, 2, 1, 8, 0, 0).unwrap();

        let user = roster.register(request("owner@fadefactory.co.za"), now).unwrap();

        assert_eq!(user.subscription, Subscription::Trial);
        assert_eq!(user.subscription_expiry, now + Duration::days(14));
        assert_eq!(user.join_date, now);
        assert_eq!(roster.len(), 3);
        assert!(roster.authenticate("owner@fadefactory.co.za", "secret").is_some());
    }

    #[test]
    fn test_register_rejects_taken_email() {
        let mut roster = DemoRoster::demo();
        let err = roster
            .register(request("sarah@beautysalon.co.za"), Utc::now())
            .unwrap_err();
        assert!(matches!(err, ValidationError::Duplicate { .. }));
        assert_eq!(roster.len(), 2);
    }

    #[test]
    fn test_register_validates_fields() {
        let mut roster = DemoRoster::empty();
        let mut bad = request("owner@fadefactory.co.za");
        bad.password.clear();
        assert!(roster.register(bad, Utc::now()).is_err());
        assert!(roster.is_empty());
    }
}
