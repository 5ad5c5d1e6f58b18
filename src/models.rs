//! Data models for AirNow observations and the notification they produce.

use std::fmt;

use serde::Deserialize;
use thiserror::Error;

// ---

/// Parameter name AirNow uses for fine particulate matter.
pub const PM25: &str = "PM2.5";

/// A numeric field AirNow may send either as a JSON number or a string.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum Loose {
    Int(i64),
    Text(String),
    Other(serde_json::Value),
}

impl Default for Loose {
    fn default() -> Self {
        Loose::Other(serde_json::Value::Null)
    }
}

impl Loose {
    fn as_i64(&self) -> Option<i64> {
        match self {
            Loose::Int(n) => Some(*n),
            Loose::Text(s) => s.trim().parse().ok(),
            Loose::Other(_) => None,
        }
    }
}

impl fmt::Display for Loose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Loose::Int(n) => write!(f, "{}", n),
            Loose::Text(s) => write!(f, "{:?}", s),
            Loose::Other(v) => write!(f, "{}", v),
        }
    }
}

/// One element of the AirNow response array, as sent on the wire.
///
/// Every field tolerates being absent or null, and numeric fields are kept
/// loose until the record is selected, so a malformed record for some other
/// parameter never fails the run.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct RawObservation {
    // ---
    pub parameter_name: Option<String>,
    pub date_observed: Option<String>,
    pub hour_observed: Loose,
    pub reporting_area: Option<String>,
    #[serde(rename = "AQI")]
    pub aqi: Loose,
}

impl RawObservation {
    pub fn is_parameter(&self, name: &str) -> bool {
        self.parameter_name.as_deref() == Some(name)
    }
}

/// A validated observation with typed hour and AQI.
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    // ---
    pub parameter_name: String,
    pub date_observed: String,
    /// Local hour of day, 0..=23.
    pub hour_observed: u8,
    pub reporting_area: String,
    pub aqi: i32,
}

/// Reasons a selected record could not be turned into an [`Observation`].
#[derive(Debug, Error, PartialEq)]
pub enum ObservationError {
    #[error("HourObserved is not an integer: {0}")]
    InvalidHour(String),

    #[error("HourObserved {0} is outside 0..=23")]
    HourOutOfRange(i64),

    #[error("AQI is not an integer: {0}")]
    InvalidAqi(String),

    #[error("{0} is missing")]
    MissingField(&'static str),
}

impl TryFrom<&RawObservation> for Observation {
    type Error = ObservationError;

    fn try_from(raw: &RawObservation) -> Result<Self, Self::Error> {
        // ---
        let hour = raw
            .hour_observed
            .as_i64()
            .ok_or_else(|| ObservationError::InvalidHour(raw.hour_observed.to_string()))?;
        let hour_observed = u8::try_from(hour)
            .ok()
            .filter(|h| *h <= 23)
            .ok_or(ObservationError::HourOutOfRange(hour))?;

        let aqi = raw
            .aqi
            .as_i64()
            .and_then(|a| i32::try_from(a).ok())
            .ok_or_else(|| ObservationError::InvalidAqi(raw.aqi.to_string()))?;

        // AirNow pads DateObserved with a trailing space; keep it out of the message.
        let date_observed = required_text(raw.date_observed.as_deref(), "DateObserved")?;
        let reporting_area = required_text(raw.reporting_area.as_deref(), "ReportingArea")?;

        Ok(Observation {
            parameter_name: raw.parameter_name.clone().unwrap_or_default(),
            date_observed,
            hour_observed,
            reporting_area,
            aqi,
        })
    }
}

fn required_text(value: Option<&str>, field: &'static str) -> Result<String, ObservationError> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .ok_or(ObservationError::MissingField(field))
}

/// The human-readable notification body for an observation.
#[derive(Debug, Clone, PartialEq)]
pub struct AqiMessage(String);

impl AqiMessage {
    pub fn for_observation(obs: &Observation) -> Self {
        AqiMessage(format!(
            "On {} in {}, AQI is {}.",
            obs.date_observed, obs.reporting_area, obs.aqi
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for AqiMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
