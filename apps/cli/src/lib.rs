//! # Snip CLI Library
//!
//! Command-line front end for SnipRewards. `main.rs` only parses arguments
//! and prints; everything else lives here so tests can drive it directly.
//!
//! ## Module Organization
//! ```text
//! snip_cli/
//! ├── lib.rs          ◄─── You are here (startup & dispatch)
//! ├── cli.rs          ◄─── clap argument definitions
//! ├── output.rs       ◄─── Text / JSON rendering
//! ├── state/
//! │   ├── mod.rs      ◄─── State type exports
//! │   ├── session.rs  ◄─── Session store wrapper
//! │   ├── salon.rs    ◄─── Loyalty store for the logged-in salon
//! │   └── config.rs   ◄─── Configuration state
//! ├── commands/
//! │   ├── mod.rs      ◄─── Command exports
//! │   ├── session.rs  ◄─── login, register, logout, whoami, profile
//! │   ├── loyalty.rs  ◄─── add-customer, record-visit, customer, check-in
//! │   └── reports.rs  ◄─── dashboard, analytics, campaign, qr
//! └── error.rs        ◄─── API error type for commands
//! ```
//!
//! ## Startup Sequence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  1. Load config ────── defaults ► config.toml ► SNIP_* env              │
//! │  2. Open database ──── SQLite (WAL), run migrations                     │
//! │  3. Restore session ── read `sniprewards_user` from kv_store            │
//! │  4. Seed salon ─────── demo customers & visits for the restored user    │
//! │  5. Dispatch command ─ render text or JSON                              │
//! │  6. Close pool                                                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The salon store lives in memory and is rebuilt from the demo seed on
//! every run; only the session survives between invocations.

pub mod cli;
pub mod commands;
pub mod error;
pub mod output;
pub mod state;

use std::sync::Arc;

use chrono::Utc;
use snip_core::roster::DemoRoster;
use snip_core::{NewCustomer, ProfilePatch, RegisterRequest};
use snip_store::{Database, DbConfig, KeyValueStore, SessionStore};
use tracing::info;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Command};
use commands::loyalty::RecordVisitRequest;
use commands::{loyalty, reports, session};
use error::ApiError;
use output::format_output;
use state::{ConfigState, SalonState, SessionState};

/// Everything a command may need, opened once per invocation.
pub struct App {
    config: ConfigState,
    session: SessionState,
    salon: SalonState,
    db: Database,
}

impl App {
    /// Opens the configured database and restores the session.
    pub async fn open(config: ConfigState) -> Result<Self, ApiError> {
        let db_path = config.resolve_database_path()?;
        info!(?db_path, "Database path determined");
        let db = Database::new(DbConfig::new(db_path)).await?;
        Self::with_database(config, db).await
    }

    /// Builds the app over an already-open database.
    pub async fn with_database(config: ConfigState, db: Database) -> Result<Self, ApiError> {
        let storage: Arc<dyn KeyValueStore> = Arc::new(db.kv());
        let mut store = SessionStore::new(storage, DemoRoster::demo(), config.session_config());

        let salon = SalonState::new();
        if let Some(user) = store.restore().await? {
            salon.seed(&user, config.loyalty_rules())?;
        }

        Ok(App {
            session: SessionState::new(store),
            salon,
            config,
            db,
        })
    }

    pub fn config(&self) -> &ConfigState {
        &self.config
    }

    /// Runs one command and renders its response.
    pub async fn execute(&self, command: Command, json: bool) -> Result<String, ApiError> {
        if command.requires_login() && self.session.current_user().await.is_none() {
            return Err(ApiError::not_logged_in());
        }

        let (session, salon, config) = (&self.session, &self.salon, &self.config);
        let now = Utc::now();

        match command {
            Command::Login { email, password } => {
                let response = session::login(session, salon, config, &email, &password).await?;
                format_output(&response, json, config)
            }
            Command::Register {
                email,
                password,
                name,
                salon_name,
                phone,
                address,
            } => {
                let request = RegisterRequest {
                    email,
                    password,
                    name,
                    salon_name,
                    phone,
                    address,
                };
                let response = session::register(session, salon, config, request).await?;
                format_output(&response, json, config)
            }
            Command::Logout => {
                format_output(&session::logout(session, salon).await?, json, config)
            }
            Command::Whoami => format_output(&session::whoami(session).await?, json, config),
            Command::Profile {
                name,
                salon_name,
                phone,
                address,
                avatar,
            } => {
                let patch = ProfilePatch {
                    name,
                    salon_name,
                    phone,
                    address,
                    avatar,
                };
                let response = session::update_profile(session, salon, config, patch).await?;
                format_output(&response, json, config)
            }
            Command::Dashboard => format_output(&reports::dashboard(salon, now)?, json, config),
            Command::Analytics => format_output(&reports::analytics(salon, now)?, json, config),
            Command::Customer { query: Some(query) } => {
                format_output(&loyalty::customer(salon, &query)?, json, config)
            }
            Command::Customer { query: None } => {
                format_output(&loyalty::list_customers(salon)?, json, config)
            }
            Command::CheckIn { phone } => {
                format_output(&loyalty::check_in(salon, &phone)?, json, config)
            }
            Command::RecordVisit {
                customer,
                services,
                amount,
                barber,
                points,
                reward_used,
                name,
                email,
            } => {
                let request = RecordVisitRequest {
                    customer,
                    services,
                    amount,
                    barber,
                    points,
                    reward_used,
                    date: None,
                    name,
                    email,
                };
                format_output(&loyalty::record_visit(salon, request)?, json, config)
            }
            Command::AddCustomer {
                phone,
                name,
                email,
                favorite_services,
                barber,
            } => {
                let data = NewCustomer {
                    phone,
                    name,
                    email,
                    favorite_services,
                    preferred_barber: barber,
                    ..Default::default()
                };
                format_output(&loyalty::add_customer(salon, data)?, json, config)
            }
            Command::Campaign { kind, audience } => {
                format_output(&reports::campaign(salon, kind, audience, now)?, json, config)
            }
            Command::Qr => format_output(&reports::qr(salon)?, json, config),
        }
    }

    pub async fn close(self) {
        self.db.close().await;
    }
}

/// Loads config, opens storage, runs the parsed command.
///
/// An explicit `--config` file must load cleanly; the default location
/// falls back to defaults with a warning.
pub async fn run(cli: Cli) -> Result<String, ApiError> {
    let config = match cli.config {
        Some(path) => ConfigState::load(Some(path))?,
        None => ConfigState::load_or_default(None),
    };

    let app = App::open(config).await?;
    let result = app.execute(cli.command, cli.json).await;
    app.close().await;
    result
}

/// Initializes the tracing subscriber for structured logging.
///
/// Logs go to stderr so command output on stdout stays clean.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=snip_store=trace` - Trace storage only
/// - Default: `info,snip=debug,sqlx=warn`
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,snip=debug,sqlx=warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use clap::Parser;

    fn test_config() -> ConfigState {
        ConfigState {
            login_delay_ms: 0,
            register_delay_ms: 0,
            ..ConfigState::default()
        }
    }

    async fn open_app(db: Database) -> App {
        App::with_database(test_config(), db).await.unwrap()
    }

    fn command(args: &[&str]) -> Command {
        let mut argv = vec!["snip"];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).unwrap().command
    }

    #[tokio::test]
    async fn test_commands_require_login() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let app = open_app(db).await;

        let err = app.execute(command(&["dashboard"]), false).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::Unauthorized);
    }

    #[tokio::test]
    async fn test_login_then_record_visit() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let app = open_app(db).await;

        app.execute(
            command(&["login", "--email", "demo@sniprewards.com", "--password", "demo123"]),
            false,
        )
        .await
        .unwrap();

        let out = app
            .execute(
                command(&[
                    "record-visit",
                    "+27705678901",
                    "--service",
                    "Haircut",
                    "--amount",
                    "250",
                    "--barber",
                    "John Smith",
                ]),
                true,
            )
            .await
            .unwrap();

        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["visit"]["pointsEarned"], 25);
        assert_eq!(value["customer"]["visits"], 4);
    }

    #[tokio::test]
    async fn test_record_visit_enrols_walk_in() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let app = open_app(db).await;
        app.execute(
            command(&["login", "--email", "demo@sniprewards.com", "--password", "demo123"]),
            false,
        )
        .await
        .unwrap();

        let out = app
            .execute(
                command(&[
                    "record-visit",
                    "+27711112222",
                    "--service",
                    "Haircut",
                    "--amount",
                    "150",
                    "--barber",
                    "John Smith",
                    "--name",
                    "Lerato Khumalo",
                ]),
                false,
            )
            .await
            .unwrap();
        assert!(out.starts_with("New customer enrolled."));

        let status = app.execute(command(&["check-in", "+27711112222"]), true).await.unwrap();
        let value: serde_json::Value = serde_json::from_str(&status).unwrap();
        assert_eq!(value["visits"], 1);
        assert_eq!(value["points"], 15);
    }

    #[tokio::test]
    async fn test_session_survives_reopen() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let app = open_app(db.clone()).await;
        app.execute(
            command(&["login", "--email", "sarah@beautysalon.co.za", "--password", "sarah123"]),
            false,
        )
        .await
        .unwrap();

        let reopened = open_app(db).await;
        let out = reopened.execute(command(&["qr"]), false).await.unwrap();
        assert!(out.contains("https://sniprewards.com/scan/2"));
    }

    #[tokio::test]
    async fn test_text_output_uses_currency_symbol() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let config = ConfigState {
            currency_symbol: "$".to_string(),
            ..test_config()
        };
        let app = App::with_database(config, db).await.unwrap();
        app.execute(
            command(&["login", "--email", "demo@sniprewards.com", "--password", "demo123"]),
            false,
        )
        .await
        .unwrap();

        let out = app.execute(command(&["dashboard"]), false).await.unwrap();
        assert!(out.contains("$ 2050.00"));
    }
}
