//! Changelog CLI - date-bucketed commit history for GitHub repositories

use changelog_lib::{build_changelog, render_text};
use clap::Parser;
use tracing_subscriber::{filter::EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "changelog")]
#[command(
    about = "Build a date-bucketed changelog from a GitHub repository's commit history",
    long_about = None
)]
struct Cli {
    /// GitHub repository URL (https or git@ form)
    #[arg(value_name = "REPO_URL")]
    repo_url: String,

    /// Release buckets to keep: "all", "latest", or a number
    #[arg(value_name = "RELEASES")]
    releases: Option<String>,

    /// GitHub API token (falls back to the GITHUB_TOKEN environment variable)
    #[arg(short, long, value_name = "TOKEN")]
    token: Option<String>,

    /// Output the changelog as JSON instead of text
    #[arg(long)]
    json: bool,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short = 'v', action = clap::ArgAction::Count)]
    log_verbosity: u8,

    /// Output logs as JSON
    #[arg(long)]
    log_json: bool,
}

/// Initialize tracing subscriber based on verbosity and output format
fn init_tracing(verbose: u8, json: bool) {
    // Base filter from RUST_LOG or verbosity flags; default shows only WARN
    let base_filter = match std::env::var("RUST_LOG") {
        Ok(filter) => filter,
        Err(_) => match verbose {
            0 => "warn".to_string(),
            1 => "warn,changelog_lib=info".to_string(),
            2 => "info,changelog_lib=debug".to_string(),
            _ => "debug,changelog_lib=trace".to_string(),
        },
    };

    let filter = EnvFilter::try_new(&base_filter).unwrap_or_else(|_| EnvFilter::new("warn"));

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_level(true)
                    .with_writer(std::io::stderr)
                    .compact(),
            )
            .init();
    }
}

#[tokio::main]
async fn main() {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(cli.log_verbosity, cli.log_json);

    tracing::debug!(repo = %cli.repo_url, "Changelog CLI starting");

    let client = reqwest::Client::new();

    match build_changelog(
        &client,
        &cli.repo_url,
        cli.releases.as_deref(),
        cli.token.as_deref(),
    )
    .await
    {
        Ok(changelog) => {
            if cli.json {
                match serde_json::to_string_pretty(&changelog) {
                    Ok(rendered) => println!("{}", rendered),
                    Err(e) => {
                        eprintln!("Failed to serialize changelog: {}", e);
                        std::process::exit(1);
                    }
                }
            } else {
                print!("{}", render_text(&changelog));
            }
        }
        Err(e) => {
            eprintln!("Changelog failed: {}", e);
            std::process::exit(1);
        }
    }
}
