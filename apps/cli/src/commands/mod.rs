//! # Commands Module
//!
//! Every operation the `snip` binary exposes.
//!
//! ## Command Organization
//! ```text
//! commands/
//! ├── mod.rs      ◄─── You are here (exports)
//! ├── session.rs  ◄─── login, register, logout, whoami, profile
//! ├── loyalty.rs  ◄─── add-customer, record-visit, customer, check-in
//! └── reports.rs  ◄─── dashboard, analytics, campaign, qr
//! ```
//!
//! ## State Injection
//! Each command takes only the state it needs:
//! ```rust,ignore
//! // Only needs the salon store
//! fn check_in(salon: &SalonState, phone: &str)
//!
//! // Session plus salon, since login seeds the salon
//! async fn login(session: &SessionState, salon: &SalonState, config: &ConfigState, ...)
//! ```
//!
//! Commands return serializable responses; rendering lives in `output`.

pub mod loyalty;
pub mod reports;
pub mod session;
