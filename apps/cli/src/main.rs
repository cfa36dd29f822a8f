//! # snip
//!
//! Entry point for the SnipRewards command-line tool.
//!
//! ```text
//! $ snip login --email demo@sniprewards.com --password demo123
//! $ snip check-in +27701234567
//! $ snip record-visit +27701234567 --service Haircut --amount 350 --barber "John Smith"
//! $ snip dashboard --json
//! ```
//!
//! The setup lives in lib.rs for testability.

use clap::Parser;
use snip_cli::cli::Cli;
use snip_cli::output::format_error;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let json = cli.json;

    snip_cli::init_tracing();

    match snip_cli::run(cli).await {
        Ok(output) => println!("{}", output),
        Err(err) => {
            eprintln!("{}", format_error(&err, json));
            std::process::exit(err.exit_code());
        }
    }
}
