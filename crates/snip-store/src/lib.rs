//! # snip-store: Durable Storage for SnipRewards
//!
//! Key-value persistence (SQLite via sqlx, or in-memory) and the session
//! layer that mirrors the logged-in user into it.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  snip CLI (login, logout, profile ...)                                  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    snip-store (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │ SessionStore  │    │ KeyValueStore │    │  Migrations  │  │   │
//! │  │   │ (session.rs)  │───►│   (kv.rs)     │    │  (embedded)  │  │   │
//! │  │   │ login/logout  │    │ Sqlite/Memory │    │ 001_kv_store │  │   │
//! │  │   └───────────────┘    └───────┬───────┘    └──────────────┘  │   │
//! │  │                                │  Database (pool.rs)           │   │
//! │  └────────────────────────────────┼────────────────────────────────┘   │
//! │                                   ▼                                     │
//! │                      SQLite: <data dir>/snip.db                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use snip_core::roster::DemoRoster;
//! use snip_store::{Database, DbConfig, SessionConfig, SessionStore};
//!
//! let db = Database::new(DbConfig::new("snip.db")).await?;
//! let storage = Arc::new(db.kv());
//! let mut session = SessionStore::new(storage, DemoRoster::demo(), SessionConfig::default());
//! session.restore().await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod kv;
pub mod migrations;
pub mod pool;
pub mod session;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{SessionError, SessionResult, StoreError, StoreResult};
pub use kv::{KeyValueStore, MemoryStore, SqliteKvStore};
pub use pool::{Database, DbConfig};
pub use session::{SessionConfig, SessionStore, SESSION_KEY};
