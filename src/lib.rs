//! `airnow-notifier`: poll AirNow for a zip code's PM2.5 AQI and publish a
//! notification when the reading is harmful during reportable hours.
//!
//! One call to [`run_once`] is one invocation: fetch → select → gate →
//! publish, with no state carried between runs.
//!
//! Sibling modules only reach each other through the re-exports here, so
//! `airnow.rs` and `notifier.rs` never depend on each other directly.
use anyhow::Result;
use chrono::NaiveDate;

pub mod airnow;
pub mod config;
pub mod models;
pub mod notifier;
pub mod publisher;

pub use config::Config;
pub use models::{AqiMessage, Observation, ObservationError, RawObservation, PM25};
pub use notifier::Outcome;
pub use publisher::{Publisher, SnsPublisher};

// ---

/// Run a single invocation for `date`.
///
/// Fetch and publish failures are returned unrecovered; the scheduler that
/// launched the run owns any retry.
pub async fn run_once(
    cfg: &Config,
    http: &reqwest::Client,
    publisher: &dyn Publisher,
    date: NaiveDate,
    request_id: &str,
) -> Result<Outcome> {
    // ---
    let records = airnow::fetch_observations(http, cfg, date).await?;
    notifier::notify(&records, &cfg.topic_arn, request_id, publisher).await
}
