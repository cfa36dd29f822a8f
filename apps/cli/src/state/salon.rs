//! # Salon State
//!
//! The logged-in salon's `LoyaltyStore`, seeded from the current user.
//!
//! ## Thread Safety
//! Wrapped in `Arc<Mutex<_>>`: every operation either reads the store or
//! mutates it in one step, so a plain mutex keeps writes serialized.
//!
//! ```text
//!  login / restore ──► seed(user) ──► Some(LoyaltyStore)
//!  profile         ──► apply_profile(user): salon fields only
//!  logout          ──► clear()    ──► None
//!
//!  check-in, customer, dashboard ... ──► with_store(|s| ...)
//!  add-customer, record-visit        ──► with_store_mut(|s| ...)
//! ```

use std::sync::{Arc, Mutex, MutexGuard};

use snip_core::seed::demo_store;
use snip_core::{LoyaltyRules, LoyaltyStore, User};
use tracing::debug;

use crate::error::ApiError;

/// Holder of the current salon's loyalty store, if a user is logged in.
#[derive(Debug, Clone, Default)]
pub struct SalonState {
    store: Arc<Mutex<Option<LoyaltyStore>>>,
}

impl SalonState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the store with the demo data for `user`.
    pub fn seed(&self, user: &User, rules: LoyaltyRules) -> Result<(), ApiError> {
        let store = demo_store(user, rules)?;
        debug!(salon_id = %store.salon().id, "Salon store ready");
        *self.lock()? = Some(store);
        Ok(())
    }

    /// Carries a profile change onto the loaded salon, seeding if none is loaded.
    pub fn apply_profile(&self, user: &User, rules: LoyaltyRules) -> Result<(), ApiError> {
        let mut guard = self.lock()?;
        match guard.as_mut() {
            Some(store) => store.apply_profile(user),
            None => *guard = Some(demo_store(user, rules)?),
        }
        Ok(())
    }

    /// Installs a prepared store.
    pub fn install(&self, store: LoyaltyStore) -> Result<(), ApiError> {
        *self.lock()? = Some(store);
        Ok(())
    }

    /// Drops the store.
    pub fn clear(&self) -> Result<(), ApiError> {
        *self.lock()? = None;
        Ok(())
    }

    pub fn is_loaded(&self) -> Result<bool, ApiError> {
        Ok(self.lock()?.is_some())
    }

    /// Runs `f` with read access to the store.
    ///
    /// ```rust,ignore
    /// let status = salon.with_store(|store| check_in(store, &phone))?;
    /// ```
    pub fn with_store<F, R>(&self, f: F) -> Result<R, ApiError>
    where
        F: FnOnce(&LoyaltyStore) -> R,
    {
        let guard = self.lock()?;
        let store = guard.as_ref().ok_or_else(ApiError::not_logged_in)?;
        Ok(f(store))
    }

    /// Runs `f` with write access to the store.
    ///
    /// ```rust,ignore
    /// let outcome = salon.with_store_mut(|store| store.add_visit(visit))??;
    /// ```
    pub fn with_store_mut<F, R>(&self, f: F) -> Result<R, ApiError>
    where
        F: FnOnce(&mut LoyaltyStore) -> R,
    {
        let mut guard = self.lock()?;
        let store = guard.as_mut().ok_or_else(ApiError::not_logged_in)?;
        Ok(f(store))
    }

    fn lock(&self) -> Result<MutexGuard<'_, Option<LoyaltyStore>>, ApiError> {
        self.store
            .lock()
            .map_err(|_| ApiError::internal("Salon state mutex poisoned"))
    }
}
