//! # Session State
//!
//! Shared handle to the `SessionStore`. Session operations await storage, so
//! this uses the Tokio mutex rather than the std one in `SalonState`.

use std::sync::Arc;

use snip_core::User;
use snip_store::SessionStore;
use tokio::sync::{Mutex, MutexGuard};

#[derive(Clone)]
pub struct SessionState {
    inner: Arc<Mutex<SessionStore>>,
}

impl SessionState {
    pub fn new(store: SessionStore) -> Self {
        SessionState {
            inner: Arc::new(Mutex::new(store)),
        }
    }

    /// Exclusive access for the length of one command.
    pub async fn lock(&self) -> MutexGuard<'_, SessionStore> {
        self.inner.lock().await
    }

    /// Snapshot of the logged-in user.
    pub async fn current_user(&self) -> Option<User> {
        self.inner.lock().await.current_user().cloned()
    }
}
