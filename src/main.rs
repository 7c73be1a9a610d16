//! Teamwatch - a webhook alerter for team activity feeds.
//!
//! This is the main entry point for teamwatch, which logs into a subtitling
//! platform, discovers the account's teams, scans each team's activity feed
//! for recent alert-worthy events and sends at most one aggregated webhook
//! notification per run.
//!
//! # Overview
//!
//! A run is stateless and single-shot:
//!
//! 1. **Bootstrap**: perform the CSRF login handshake and extract the team
//!    list from the landing page navigation.
//! 2. **Fetch**: request every team's activity feed, with the number of
//!    in-flight requests bounded by the configured concurrency limit. All
//!    fetches share one cookie-carrying session.
//! 3. **Filter**: parse each item's relative time label ("1 day, 5 hours
//!    ago") and keep items within the recency window; feeds are
//!    newest-first, so the first stale item ends its feed.
//! 4. **Match**: keep activities whose text matches any configured alert
//!    pattern.
//! 5. **Dispatch**: when anything matched, post one JSON payload to the
//!    webhook with a team-name summary and a per-activity detail body.
//!
//! Run it from cron or a systemd timer for periodic watching.
//!
//! # Configuration
//!
//! Create a `config.yaml` file with your settings:
//!
//! ```yaml
//! site:
//!   base_url: "https://amara.example.org/en"
//!   username: "watcher"
//!   password: "secret"
//!
//! watch:
//!   recency_threshold_secs: 600
//!   concurrency: 1
//!
//! webhook:
//!   url: "https://hooks.example.com/trigger/team-activity/with/key/XYZ"
//! ```
//!
//! Every value can be overridden through `TEAMWATCH_`-prefixed environment
//! variables with `__` as section separator:
//!
//! ```bash
//! export TEAMWATCH_SITE__PASSWORD="secret-from-env"
//! teamwatch --config config.yaml
//! ```
//!
//! # Architecture
//!
//! - [`config`] - YAML configuration with environment variable overrides
//! - [`error`] - error taxonomy of the pipeline
//! - [`timedelta`] - relative time label parsing
//! - [`scrape`] - authenticated session and document extraction
//! - [`watch`] - fetch, filter and match pipeline
//! - [`notify`] - aggregated webhook alerting
//!
//! # Exit status
//!
//! Non-zero when the run fails: configuration unreadable, login rejected, or
//! the webhook call failed. Per-feed failures are logged and do not fail the
//! run.
//!
//! # Environment variables
//!
//! - `RUST_LOG` - controls logging level (default: `info`)

use anyhow::Context;
use clap::Parser;
use env_logger::Env;
use log::{error, info};

use crate::config::Config;
use crate::notify::WebhookNotifier;
use crate::scrape::{Credentials, HtmlExtractor, SiteClient};
use crate::watch::{RunReport, Watcher, compile_patterns};

mod config;
mod error;
mod notify;
mod scrape;
mod timedelta;
mod watch;

/// Command-line arguments for teamwatch.
///
/// All settings live in the YAML configuration file (see [`config::Config`]);
/// the only argument is where to find it.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the YAML configuration file.
    ///
    /// Values can be overridden with `TEAMWATCH_`-prefixed environment
    /// variables, e.g. `TEAMWATCH_SITE__PASSWORD`.
    #[arg(short, long)]
    config: String,
}

/// Builds the pipeline from configuration and runs it once.
async fn run(config: Config) -> Result<RunReport, anyhow::Error> {
    let patterns = compile_patterns(&config.watch.patterns)?;
    let client = SiteClient::new(&config.site.base_url).context("creating the HTTP client")?;
    let notifier = WebhookNotifier::new(&config.webhook.url);

    let watcher = Watcher::new(
        client,
        HtmlExtractor,
        notifier,
        config.watch.concurrency,
        config.watch.recency_threshold_secs,
        patterns,
    );

    let credentials = Credentials {
        username: config.site.username.clone(),
        password: config.site.password.clone(),
    };

    let report = watcher.run(&credentials).await?;
    Ok(report)
}

/// Main entry point for teamwatch.
///
/// Initializes logging (`info` level unless `RUST_LOG` says otherwise),
/// parses arguments, loads configuration and performs one watch run. Exits
/// non-zero when the run fails.
#[tokio::main]
async fn main() {
    // Put logger at info level by default
    let env = Env::default().filter_or("RUST_LOG", "info");
    env_logger::init_from_env(env);

    info!("starting teamwatch {}...", env!("CARGO_PKG_VERSION"));

    // Parse command line arguments
    let args = Args::parse();

    // Load configuration from YAML file with environment variable overrides
    let config: Config = match Config::load(&args.config) {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("Failed to load config file: {}", e);
            std::process::exit(1);
        }
    };

    match run(config).await {
        Ok(report) => {
            info!(
                "run finished: {} teams, {} activities seen, {} matched, dispatch {:?}",
                report.teams_discovered,
                report.activities_seen,
                report.activities_matched,
                report.dispatch
            );
        }
        Err(e) => {
            error!("run failed: {:#}", e);
            std::process::exit(1);
        }
    }
}
