//! # Session Store
//!
//! Holds the logged-in salon owner and mirrors it to durable storage so the
//! next process starts logged in.
//!
//! ## Lifecycle
//! ```text
//!              restore()                 login() / register()
//!  storage ───────────────► LoggedOut ─────────────────────────► LoggedIn
//!  (sniprewards_user)           ▲                                  │  │
//!                               │          logout()                │  │ update_profile()
//!                               └──────────────────────────────────┘  └──► LoggedIn
//! ```
//!
//! Every transition into `LoggedIn` writes the JSON-serialized `User` under
//! `SESSION_KEY`; `logout` removes it.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use snip_core::roster::DemoRoster;
use snip_core::{ProfilePatch, RegisterRequest, User};
use tracing::{debug, info, warn};

use crate::error::{SessionError, SessionResult, StoreResult};
use crate::kv::KeyValueStore;

/// Storage key of the session record.
pub const SESSION_KEY: &str = "sniprewards_user";

// =============================================================================
// Configuration
// =============================================================================

/// Simulated network latency for the demo login.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionConfig {
    pub login_delay: Duration,
    pub register_delay: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        SessionConfig {
            login_delay: Duration::from_millis(1000),
            register_delay: Duration::from_millis(1500),
        }
    }
}

impl SessionConfig {
    /// No artificial delays.
    pub fn instant() -> Self {
        SessionConfig {
            login_delay: Duration::ZERO,
            register_delay: Duration::ZERO,
        }
    }
}

// =============================================================================
// Session Store
// =============================================================================

/// The current user plus the roster credentials are checked against.
pub struct SessionStore {
    storage: Arc<dyn KeyValueStore>,
    roster: DemoRoster,
    current: Option<User>,
    config: SessionConfig,
}

impl SessionStore {
    /// A logged-out session over `storage`. Call [`restore`](Self::restore)
    /// to pick up a persisted login.
    pub fn new(storage: Arc<dyn KeyValueStore>, roster: DemoRoster, config: SessionConfig) -> Self {
        SessionStore {
            storage,
            roster,
            current: None,
            config,
        }
    }

    pub fn current_user(&self) -> Option<&User> {
        self.current.as_ref()
    }

    pub fn is_logged_in(&self) -> bool {
        self.current.is_some()
    }

    pub fn roster(&self) -> &DemoRoster {
        &self.roster
    }

    /// Loads the persisted user, if any.
    ///
    /// A record that no longer parses is deleted and the session starts
    /// logged out.
    pub async fn restore(&mut self) -> SessionResult<Option<User>> {
        let Some(raw) = self.storage.get(SESSION_KEY).await? else {
            debug!("No stored session");
            self.current = None;
            return Ok(None);
        };

        match serde_json::from_str::<User>(&raw) {
            Ok(user) => {
                debug!(user_id = %user.id, "Restored session");
                self.current = Some(user.clone());
                Ok(Some(user))
            }
            Err(e) => {
                warn!(error = %e, "Discarding unreadable session record");
                self.storage.remove(SESSION_KEY).await?;
                self.current = None;
                Ok(None)
            }
        }
    }

    /// Logs in with a roster email and password.
    pub async fn login(&mut self, email: &str, password: &str) -> SessionResult<User> {
        tokio::time::sleep(self.config.login_delay).await;

        let user = self
            .roster
            .authenticate(email.trim(), password)
            .ok_or(SessionError::InvalidCredentials)?;

        self.persist(&user).await?;
        info!(user_id = %user.id, "Logged in");
        self.current = Some(user.clone());
        Ok(user)
    }

    /// Creates a trial account and logs it in.
    pub async fn register(&mut self, request: RegisterRequest) -> SessionResult<User> {
        tokio::time::sleep(self.config.register_delay).await;

        let email = request.email.trim().to_string();
        if self.roster.contains_email(&email) {
            return Err(SessionError::EmailTaken(email));
        }

        let user = self.roster.register(request, Utc::now())?;
        self.persist(&user).await?;
        info!(user_id = %user.id, "Registered and logged in");
        self.current = Some(user.clone());
        Ok(user)
    }

    /// Clears the current user and the stored record.
    pub async fn logout(&mut self) -> SessionResult<()> {
        self.storage.remove(SESSION_KEY).await?;
        if let Some(user) = self.current.take() {
            info!(user_id = %user.id, "Logged out");
        }
        Ok(())
    }

    /// Patch-merges the current user's profile and re-persists it.
    pub async fn update_profile(&mut self, patch: ProfilePatch) -> SessionResult<User> {
        let mut user = self.current.clone().ok_or(SessionError::NotLoggedIn)?;
        patch.apply_to(&mut user);

        self.persist(&user).await?;
        debug!(user_id = %user.id, "Profile updated");
        self.current = Some(user.clone());
        Ok(user)
    }

    async fn persist(&self, user: &User) -> StoreResult<()> {
        let json = serde_json::to_string(user)?;
        self.storage.set(SESSION_KEY, &json).await
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
