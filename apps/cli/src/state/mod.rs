//! # State Module
//!
//! Application state for the CLI, split into focused types so each command
//! takes only what it needs.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │  ┌──────────────────┐  ┌──────────────────┐  ┌──────────────────┐      │
//! │  │   SessionState   │  │    SalonState    │  │   ConfigState    │      │
//! │  │                  │  │                  │  │                  │      │
//! │  │  Arc<tokio::     │  │  Arc<Mutex<      │  │  currency symbol │      │
//! │  │   Mutex<Session  │  │   Option<Loyalty │  │  orphan policy   │      │
//! │  │   Store>>>       │  │   Store>>>       │  │  delays, db path │      │
//! │  └──────────────────┘  └──────────────────┘  └──────────────────┘      │
//! │                                                                         │
//! │  • SessionState: async storage access, so a Tokio mutex                │
//! │  • SalonState: synchronous store operations, so a std mutex            │
//! │  • ConfigState: read-only after load                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod config;
mod salon;
mod session;

pub use config::{ConfigError, ConfigState};
pub use salon::SalonState;
pub use session::SessionState;
