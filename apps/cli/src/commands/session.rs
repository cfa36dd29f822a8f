//! # Session Commands
//!
//! login, register, logout, whoami, profile.
//!
//! A successful login or registration also seeds the salon store so the
//! loyalty commands have data to work on.

use serde::Serialize;
use snip_core::{ProfilePatch, RegisterRequest, User};
use tracing::debug;

use crate::error::ApiError;
use crate::state::{ConfigState, SalonState, SessionState};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub user: User,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageResponse {
    pub message: String,
}

pub async fn login(
    session: &SessionState,
    salon: &SalonState,
    config: &ConfigState,
    email: &str,
    password: &str,
) -> Result<UserResponse, ApiError> {
    debug!(email = %email, "login command");
    let user = session.lock().await.login(email, password).await?;
    salon.seed(&user, config.loyalty_rules())?;
    Ok(UserResponse { user })
}

pub async fn register(
    session: &SessionState,
    salon: &SalonState,
    config: &ConfigState,
    request: RegisterRequest,
) -> Result<UserResponse, ApiError> {
    debug!(email = %request.email, "register command");
    let user = session.lock().await.register(request).await?;
    salon.seed(&user, config.loyalty_rules())?;
    Ok(UserResponse { user })
}

pub async fn logout(
    session: &SessionState,
    salon: &SalonState,
) -> Result<MessageResponse, ApiError> {
    debug!("logout command");
    let mut store = session.lock().await;
    let was_logged_in = store.is_logged_in();
    store.logout().await?;
    salon.clear()?;

    let message = if was_logged_in {
        "Logged out."
    } else {
        "Nobody was logged in."
    };
    Ok(MessageResponse {
        message: message.to_string(),
    })
}

pub async fn whoami(session: &SessionState) -> Result<UserResponse, ApiError> {
    let user = session.current_user().await.ok_or_else(ApiError::not_logged_in)?;
    Ok(UserResponse { user })
}

pub async fn update_profile(
    session: &SessionState,
    salon: &SalonState,
    config: &ConfigState,
    patch: ProfilePatch,
) -> Result<UserResponse, ApiError> {
    if patch.is_empty() {
        return Err(ApiError::validation("Nothing to update"));
    }
    let user = session.lock().await.update_profile(patch).await?;
    // Salon name, phone and address come from the profile.
    salon.apply_profile(&user, config.loyalty_rules())?;
    Ok(UserResponse { user })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use snip_core::roster::DemoRoster;
    use snip_core::NewCustomer;
    use snip_store::{KeyValueStore, MemoryStore, SessionConfig, SessionStore};
    use std::sync::Arc;

    fn states() -> (SessionState, SalonState, ConfigState) {
        let storage: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let store = SessionStore::new(storage, DemoRoster::demo(), SessionConfig::instant());
        (SessionState::new(store), SalonState::new(), ConfigState::default())
    }

    #[tokio::test]
    async fn test_login_seeds_salon() {
        let (session, salon, config) = states();

        let response = login(&session, &salon, &config, "demo@sniprewards.com", "demo123")
            .await
            .unwrap();

        assert_eq!(response.user.name, "John Mwangi");
        assert_eq!(salon.with_store(|s| s.salon().id.clone()).unwrap(), "1");
    }

    #[tokio::test]
    async fn test_failed_login_leaves_salon_empty() {
        let (session, salon, config) = states();

        let err = login(&session, &salon, &config, "demo@sniprewards.com", "guess")
            .await
            .unwrap_err();

        assert_eq!(err.code, ErrorCode::Unauthorized);
        assert!(!salon.is_loaded().unwrap());
    }

    #[tokio::test]
    async fn test_logout_and_whoami() {
        let (session, salon, config) = states();
        login(&session, &salon, &config, "sarah@beautysalon.co.za", "sarah123")
            .await
            .unwrap();
        assert_eq!(whoami(&session).await.unwrap().user.salon_name, "Beauty & Grace Salon");

        logout(&session, &salon).await.unwrap();

        assert_eq!(whoami(&session).await.unwrap_err().code, ErrorCode::Unauthorized);
        assert!(!salon.is_loaded().unwrap());
    }

    #[tokio::test]
    async fn test_profile_update_renames_salon() {
        let (session, salon, config) = states();
        login(&session, &salon, &config, "demo@sniprewards.com", "demo123")
            .await
            .unwrap();
        salon
            .with_store_mut(|s| {
                s.add_customer(NewCustomer {
                    phone: "+27711112222".to_string(),
                    name: "Lerato Khumalo".to_string(),
                    ..Default::default()
                })
            })
            .unwrap()
            .unwrap();

        let patch = ProfilePatch {
            salon_name: Some("Elite Cuts Rosebank".to_string()),
            phone: Some("+27719998888".to_string()),
            ..Default::default()
        };
        update_profile(&session, &salon, &config, patch).await.unwrap();

        let (name, phone, customers) = salon
            .with_store(|s| (s.salon().name.clone(), s.salon().phone.clone(), s.customers().len()))
            .unwrap();
        assert_eq!(name, "Elite Cuts Rosebank");
        assert_eq!(phone, "+27719998888");
        assert_eq!(customers, 6);
    }

    #[tokio::test]
    async fn test_empty_profile_patch_rejected() {
        let (session, salon, config) = states();
        let err = update_profile(&session, &salon, &config, ProfilePatch::default())
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
    }
}
