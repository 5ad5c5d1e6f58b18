//! Entry point for the `airnow-notifier` job.
//!
//! Meant to be launched by an external scheduler (cron, a systemd timer,
//! a scheduled container task). Each launch is one independent invocation:
//! - Load configuration from environment variables or `.env`
//! - Initialize structured logging/tracing
//! - Fetch today's observations and publish a notification if warranted
//!
//! A non-zero exit status means the fetch or the publish failed.
//!
//! # Environment Variables
//! - `AQI_TOPIC_ARN`, `AIRNOW_API_KEY`, `AIRNOW_ZIP_CODE` – see `config`
//! - `AQI_REQUEST_ID` (optional) – invocation id for log correlation
//!   (default: a fresh UUID v4)
//! - `AQI_LOG_LEVEL` (optional) – log verbosity (default: `info`)
use std::{env, io::IsTerminal};

use anyhow::Result;
use chrono::Local;
use dotenvy::dotenv;
use tracing::Instrument;
use tracing_subscriber::filter::EnvFilter;
use uuid::Uuid;

use airnow_notifier::{config, run_once, Outcome, SnsPublisher};

// ---

#[tokio::main]
async fn main() -> Result<()> {
    // ---
    dotenv().ok();
    init_tracing();

    let cfg = config::load_from_env()?;
    cfg.log_config();

    let request_id = env::var("AQI_REQUEST_ID").unwrap_or_else(|_| Uuid::new_v4().to_string());
    let today = Local::now().date_naive();

    let http = reqwest::Client::new();
    let publisher = SnsPublisher::from_env().await;

    let span = tracing::info_span!("invocation", request_id = %request_id);
    let outcome = run_once(&cfg, &http, &publisher, today, &request_id)
        .instrument(span)
        .await
        .inspect_err(|e| tracing::error!("Invocation {} failed: {:#}", request_id, e))?;

    match outcome {
        Outcome::Published { .. } => tracing::debug!("Invocation {} published", request_id),
        Outcome::Rejected { .. } | Outcome::NoPm25 => {
            tracing::debug!("Invocation {} completed without publishing", request_id)
        }
    }

    Ok(())
}

// ---

/// Install the global tracing subscriber.
///
/// - Color output controlled by `FORCE_COLOR` (`1|true|yes`, `0|false|no`),
///   otherwise TTY detection
/// - Log level from `RUST_LOG` if set, else `AQI_LOG_LEVEL`, else `info`;
///   HTTP and AWS SDK internals are capped at `warn`
///
/// Call once, before any logging macros are used.
fn init_tracing() {
    // ---
    let use_color = match env::var("FORCE_COLOR").as_deref() {
        Ok("1") | Ok("true") | Ok("yes") => true,
        Ok("0") | Ok("false") | Ok("no") => false,
        _ => std::io::stdout().is_terminal(),
    };

    let env_filter = if env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        let level = match env::var("AQI_LOG_LEVEL").ok().as_deref() {
            Some("trace") => "trace",
            Some("debug") => "debug",
            Some("info") => "info",
            Some("warn") => "warn",
            Some("error") => "error",
            _ => "info",
        };
        EnvFilter::new(format!(
            "{level},hyper=warn,hyper_util=warn,reqwest=warn,aws_config=warn,aws_smithy_runtime=warn"
        ))
    };

    tracing_subscriber::fmt()
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .with_env_filter(env_filter)
        .with_ansi(use_color)
        .compact()
        .init();
}
