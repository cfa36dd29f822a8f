//! # Command-Line Arguments
//!
//! `clap` derive definitions for the `snip` binary.
//!
//! ```text
//! snip [--json] [--config <FILE>] <COMMAND>
//!
//!   login         register     logout      whoami     profile
//!   dashboard     analytics    customer    check-in
//!   record-visit  add-customer campaign    qr
//! ```

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use snip_core::campaign::{Audience, CampaignKind};
use snip_core::Money;

/// SnipRewards salon loyalty from the terminal
#[derive(Debug, Parser)]
#[command(name = "snip")]
#[command(about = "Salon loyalty: customers, visits, tiers and rewards")]
#[command(version)]
pub struct Cli {
    /// Print responses as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Config file (defaults to the platform config directory)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Log in with a demo account
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },

    /// Create an account with a 14-day trial
    Register {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        name: String,
        #[arg(long)]
        salon_name: String,
        #[arg(long)]
        phone: String,
        #[arg(long)]
        address: String,
    },

    /// Log out and forget the stored session
    Logout,

    /// Show the logged-in user
    Whoami,

    /// Update the logged-in user's profile
    Profile {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        salon_name: Option<String>,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        address: Option<String>,
        #[arg(long)]
        avatar: Option<String>,
    },

    /// Salon totals, today's visits, recent visits and top customers
    Dashboard,

    /// Full analytics report
    Analytics,

    /// Show one customer by phone or id, or list all customers
    Customer {
        /// Phone number or customer id
        query: Option<String>,
    },

    /// Look a customer up by phone at the front desk
    CheckIn {
        phone: String,
    },

    /// Record a visit and award points
    RecordVisit {
        /// Phone number or customer id
        customer: String,

        /// Service rendered; repeat for several
        #[arg(long = "service", required = true)]
        services: Vec<String>,

        /// Amount charged, e.g. 350 or 350.50
        #[arg(long, value_parser = parse_amount)]
        amount: Money,

        #[arg(long)]
        barber: String,

        /// Points to award; must match the accrual rule
        #[arg(long)]
        points: Option<i64>,

        /// Reward redeemed during the visit
        #[arg(long)]
        reward_used: Option<String>,

        /// Enrol an unknown phone under this name first
        #[arg(long)]
        name: Option<String>,

        /// Email for a customer enrolled by --name
        #[arg(long, requires = "name")]
        email: Option<String>,
    },

    /// Enrol a new customer
    AddCustomer {
        phone: String,
        name: String,
        #[arg(long)]
        email: Option<String>,
        /// Favourite service; repeat for several
        #[arg(long = "service")]
        favorite_services: Vec<String>,
        #[arg(long)]
        barber: Option<String>,
    },

    /// Preview an SMS campaign (birthday, reminder, promotion, reward)
    Campaign {
        kind: CampaignKind,

        /// all, inactive, or a tier name
        #[arg(long, default_value = "all")]
        audience: Audience,
    },

    /// Print the salon's check-in link and QR code URL
    Qr,
}

impl Command {
    /// Whether the command needs a logged-in user.
    pub fn requires_login(&self) -> bool {
        !matches!(
            self,
            Command::Login { .. } | Command::Register { .. } | Command::Logout
        )
    }
}

/// Parses a currency amount with at most two decimals into `Money`.
///
/// ```rust
/// use snip_cli::cli::parse_amount;
/// use snip_core::Money;
///
/// assert_eq!(parse_amount("350").unwrap(), Money::from_major(350));
/// assert_eq!(parse_amount("350.5").unwrap(), Money::from_cents(35_050));
/// assert!(parse_amount("-1").is_err());
/// ```
pub fn parse_amount(input: &str) -> Result<Money, String> {
    let input = input.trim();
    let invalid = || format!("invalid amount '{}'", input);

    let (whole, fraction) = match input.split_once('.') {
        Some((whole, fraction)) => (whole, fraction),
        None => (input, ""),
    };
    if whole.is_empty() || !whole.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }
    if fraction.len() > 2 || !fraction.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }

    let units: i64 = whole.parse().map_err(|_| invalid())?;
    let cents: i64 = match fraction.len() {
        0 => 0,
        1 => fraction.parse::<i64>().map_err(|_| invalid())? * 10,
        _ => fraction.parse().map_err(|_| invalid())?,
    };

    units
        .checked_mul(100)
        .and_then(|c| c.checked_add(cents))
        .map(Money::from_cents)
        .ok_or_else(invalid)
}
