//! Time series example.
//!
//! Fetches a week of daily prices for a couple of symbols and prints one
//! line per record, followed by any errors reported by the service.
//!
//! The token is read from `DSWS_TOKEN`, its expiry literal from
//! `DSWS_TOKEN_EXPIRY` (for example `/Date(1893456000000)/`). Client
//! settings come from the usual environment variables or a `.env` file.
//!
//! Run with: cargo run --example fetch_timeseries

use chrono::NaiveDate;
use dsws_client::{ClientConfig, DswsClient, Frequency, Token};

#[tokio::main]
async fn main() -> dsws_client::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    let config = ClientConfig::from_env()?;
    let token = std::env::var("DSWS_TOKEN").expect("DSWS_TOKEN environment variable required");
    let expiry = std::env::var("DSWS_TOKEN_EXPIRY")
        .expect("DSWS_TOKEN_EXPIRY environment variable required");

    let client = DswsClient::new(Token::from_date_literal(token, &expiry)?, config)?;

    let parsed = client
        .fetch_timeseries_data(
            &["VOD", "U:JPM"],
            &["P", "MV"],
            NaiveDate::from_ymd_opt(2023, 4, 17).expect("valid date"),
            NaiveDate::from_ymd_opt(2023, 4, 24).expect("valid date"),
            Frequency::Daily,
            Some("demo"),
        )
        .await?;

    println!("{} record(s):", parsed.records.len());
    for record in &parsed.records {
        println!(
            "  {:<8} {}  P={:?}  MV={:?}",
            record.symbol,
            record.date.date_naive(),
            record.get("P"),
            record.get("MV")
        );
    }

    for (symbol, name) in &parsed.meta.symbol_names {
        println!("  {} = {}", symbol, name.as_deref().unwrap_or("-"));
    }

    if !parsed.errors.is_empty() {
        println!("\n{} error(s):", parsed.errors.len());
        for error in &parsed.errors {
            println!("  {} / {}: {}", error.symbol, error.field, error.message);
        }
    }

    Ok(())
}
