//! Configuration loader for the `airnow-notifier` job.
//!
//! All runtime values are read once at process start (with optional `.env`
//! support provided by the caller) and handed to the fetch/notify stages as
//! a plain struct. Nothing downstream reads the environment itself.
use std::env;

use anyhow::{anyhow, Result};

/// Default AirNow "current observation by zip code" endpoint.
pub const DEFAULT_API_URL: &str = "http://www.airnowapi.org/aq/observation/zipCode/current/";

/// Default search radius around the zip code, in miles.
pub const DEFAULT_DISTANCE: u32 = 25;

/// Parse an optional integer variable with a default value.
macro_rules! parse_env_u32 {
    ($lookup:expr, $var_name:expr, $default:expr) => {
        $lookup($var_name)
            .map(|v| v.trim().parse::<u32>())
            .transpose()
            .map_err(|e| anyhow!("Invalid {}: {}", $var_name, e))?
            .unwrap_or($default)
    };
}

/// Read a variable that has no default. Absence is logged, not rejected;
/// the empty value surfaces later as an upstream or publish error.
macro_rules! unchecked_env {
    ($lookup:expr, $var_name:expr) => {
        $lookup($var_name).unwrap_or_else(|| {
            tracing::warn!("{} is not set; continuing with an empty value", $var_name);
            String::new()
        })
    };
}

/// Strongly typed job configuration.
#[derive(Debug, Clone)]
pub struct Config {
    // ---
    /// Pub/sub topic ARN notifications are published to.
    pub topic_arn: String,

    /// AirNow API key.
    pub api_key: String,

    /// Zip code whose observations are polled.
    pub zip_code: String,

    /// AirNow endpoint base URL.
    pub api_url: String,

    /// Search radius in miles.
    pub distance: u32,
}

/// Load configuration from the process environment.
///
/// Core values:
/// - `AQI_TOPIC_ARN` – SNS topic ARN
/// - `AIRNOW_API_KEY` – AirNow API key
/// - `AIRNOW_ZIP_CODE` – zip code to poll
///
/// Optional:
/// - `AIRNOW_API_URL` – endpoint (default: AirNow production)
/// - `AIRNOW_DISTANCE` – radius in miles (default: 25)
///
/// Only a malformed `AIRNOW_DISTANCE` is an error here.
pub fn load_from_env() -> Result<Config> {
    // ---
    load_with(|name| env::var(name).ok())
}

/// Build a [`Config`] from an arbitrary variable lookup.
pub fn load_with<F>(lookup: F) -> Result<Config>
where
    F: Fn(&str) -> Option<String>,
{
    // ---
    let topic_arn = unchecked_env!(lookup, "AQI_TOPIC_ARN");
    let api_key = unchecked_env!(lookup, "AIRNOW_API_KEY");
    let zip_code = unchecked_env!(lookup, "AIRNOW_ZIP_CODE");
    let api_url = lookup("AIRNOW_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string());
    let distance = parse_env_u32!(lookup, "AIRNOW_DISTANCE", DEFAULT_DISTANCE);

    Ok(Config {
        topic_arn,
        api_key,
        zip_code,
        api_url,
        distance,
    })
}

impl Config {
    /// Log the loaded configuration, masking the API key.
    pub fn log_config(&self) {
        // ---
        tracing::info!("Configuration loaded:");
        tracing::info!("  AQI_TOPIC_ARN   : {}", self.topic_arn);
        tracing::info!("  AIRNOW_API_KEY  : {}", self.masked_api_key());
        tracing::info!("  AIRNOW_ZIP_CODE : {}", self.zip_code);
        tracing::info!("  AIRNOW_API_URL  : {}", self.api_url);
        tracing::info!("  AIRNOW_DISTANCE : {}", self.distance);
    }

    fn masked_api_key(&self) -> String {
        // ---
        let visible: String = self.api_key.chars().take(4).collect();
        if visible.len() == self.api_key.len() {
            "****".to_string()
        } else {
            format!("{}****", visible)
        }
    }
}
