use std::path::PathBuf;
use std::process::ExitCode;
use std::time::{Duration, Instant};

use clap::Parser;
use service_health::cli;
use service_health::config::{load_config, load_from_env, PeerConfig};

#[derive(Parser)]
#[command(name = "health-cli")]
#[command(about = "Check every service's /health endpoint and the database", long_about = None)]
struct Cli {
    /// TOML config file (defaults plus environment when omitted)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Per-check timeout in seconds
    #[arg(short, long)]
    timeout: Option<u64>,

    /// Service to check, as NAME=URL (repeatable)
    #[arg(short, long = "service", value_parser = cli::parse_service_arg)]
    services: Vec<PeerConfig>,

    /// Skip the database check
    #[arg(long)]
    skip_database: bool,
}

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let args = Cli::parse();

    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => load_from_env()?,
    };
    if let Some(timeout) = args.timeout {
        config.cli.timeout_secs = timeout;
    }
    if args.skip_database {
        config.cli.check_database = false;
    }

    let services = cli::select_services(args.services, &config.cli, args.timeout, |key| {
        std::env::var(key).ok()
    });

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.cli.timeout_secs))
        .build()?;
    let checks = cli::build_checks(&config, &services, &client)?;

    let start = Instant::now();
    let outcomes = cli::run_checks(&checks).await;
    println!("{}", cli::render(&outcomes, start.elapsed()));

    Ok(if cli::all_healthy(&outcomes) {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
