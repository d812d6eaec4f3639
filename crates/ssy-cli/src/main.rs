//! ssy entry point.
//!
//! This file is intentionally thin: it parses arguments, resolves
//! credentials, wires the HTTP gateway and the console decision source into
//! the runner, and owns every piece of interactive IO — the retry prompt and
//! the exit acknowledgment. The runner itself never touches the console.

use std::io::{BufRead, Write};
use std::path::PathBuf;

use anyhow::Result;
use chrono::Local;
use clap::Parser;

use ssy_gateway::HttpBookingGateway;
use ssy_runner::{ActionFailure, DecisionSource, Directive, RunConfig, RunSummary};

#[derive(Parser)]
#[command(name = "ssy")]
#[command(about = "SeatSync: converge booking-platform reservations to the box-office ledger", long_about = None)]
struct Cli {
    /// Booking-platform export; rewritten after every successful mutation
    #[arg(long, default_value = "mirror_bookings.json")]
    mirror: PathBuf,

    /// Box-office ledger CSV (read-only)
    #[arg(long, default_value = "ledger.csv")]
    ledger: PathBuf,

    /// Venue-code → merchant mapping JSON (read-only)
    #[arg(long, default_value = "merchants.json")]
    merchants: PathBuf,

    /// Tag-cache file, rewritten at the start of every run
    #[arg(long, default_value = "tag_cache.json")]
    tag_cache: PathBuf,
}

#[tokio::main]
async fn main() {
    // Load .env.local if present (dev convenience).
    // Silent if the file does not exist — production injects env vars directly.
    let _ = dotenvy::from_filename(".env.local");

    init_tracing();

    let cli = Cli::parse();
    let code = match sync(cli).await {
        Ok(summary) => {
            println!(
                "created={} cancelled={} skipped={} resolution_failures={}",
                summary.created, summary.cancelled, summary.skipped, summary.resolution_failures
            );
            0
        }
        Err(e) => {
            eprintln!("ERROR: {:#}", e);
            1
        }
    };

    // Operator acknowledgment before the console window can vanish.
    pause_for_ack();
    std::process::exit(code);
}

async fn sync(cli: Cli) -> Result<RunSummary> {
    let creds = ssy_config::resolve_credentials()?;
    let gateway = HttpBookingGateway::new(creds.gateway_url, creds.auth_token, creds.agent_id);

    let cfg = RunConfig {
        mirror_path: cli.mirror,
        ledger_path: cli.ledger,
        merchants_path: cli.merchants,
        tag_cache_path: cli.tag_cache,
    };

    let mut decisions = ConsoleDecisions;
    ssy_runner::run(&cfg, &gateway, &mut decisions, Local::now().naive_local()).await
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .init();
}

/// Interactive decision source: reports the failure with enough detail for
/// the operator to fix the conflict out-of-band, then reads one directive.
struct ConsoleDecisions;

impl DecisionSource for ConsoleDecisions {
    fn decide(&mut self, failure: &ActionFailure) -> Directive {
        println!();
        println!("FAILURE: {} {}", failure.kind.as_str(), failure.error);
        println!("\t{}", failure.customer);
        println!(
            "\t{} people at {} on {}",
            failure.party_size, failure.merchant_name, failure.event_at
        );
        println!("Rearrange tables or add table combos to accommodate the booking");
        println!("[ENTER] to try again, [skip] to skip, [skipall] to auto skip any remaining");
        let _ = std::io::stdout().flush();

        let mut line = String::new();
        match std::io::stdin().lock().read_line(&mut line) {
            Ok(n) if n > 0 => Directive::parse(&line),
            // Console gone (EOF) or unreadable: a bare ENTER would mean
            // "retry forever", so stop prompting for the rest of the run.
            _ => Directive::SkipAll,
        }
    }
}

fn pause_for_ack() {
    println!("ALL FINISHED, you may quit");
    let mut line = String::new();
    let _ = std::io::stdin().lock().read_line(&mut line);
}
