//! Decides whether an invocation's observations warrant a notification and
//! publishes it.
//!
//! Three terminal outcomes per run: no PM2.5 record, gates rejected, or
//! published. Only a publish failure (or an unparseable PM2.5 record) is
//! an error.

use std::ops::RangeInclusive;

use anyhow::{Context, Result};

use crate::{AqiMessage, Observation, Publisher, RawObservation, PM25};

// ---

/// Local hours during which notifications may be sent.
pub const REPORTABLE_HOURS: RangeInclusive<u8> = 5..=21;

/// AQI values strictly above this are considered harmful.
pub const HARMFUL_AQI: i32 = 50;

/// What a single invocation ended up doing.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// The response held no PM2.5 record.
    NoPm25,
    /// A PM2.5 record was found but at least one gate failed.
    Rejected { hour: u8, aqi: i32 },
    /// The message was handed to the publisher.
    Published { message: String },
}

/// True when `hour` falls inside [`REPORTABLE_HOURS`], both ends included.
pub fn is_within_reportable_hours(hour: u8) -> bool {
    REPORTABLE_HOURS.contains(&hour)
}

/// True when `aqi` is strictly above [`HARMFUL_AQI`].
pub fn is_air_quality_bad_enough(aqi: i32) -> bool {
    aqi > HARMFUL_AQI
}

/// Both gates must pass.
pub fn should_notify(obs: &Observation) -> bool {
    is_within_reportable_hours(obs.hour_observed) && is_air_quality_bad_enough(obs.aqi)
}

/// First record whose parameter name is exactly `PM2.5`.
pub fn select_pm25(records: &[RawObservation]) -> Option<&RawObservation> {
    records.iter().find(|r| r.is_parameter(PM25))
}

/// Run the notification decision for one invocation.
///
/// `request_id` is only used to correlate the confirmation log line.
pub async fn notify(
    records: &[RawObservation],
    topic: &str,
    request_id: &str,
    publisher: &dyn Publisher,
) -> Result<Outcome> {
    // ---
    let Some(raw) = select_pm25(records) else {
        tracing::warn!(
            "No {} record among {} observations; nothing to report",
            PM25,
            records.len()
        );
        return Ok(Outcome::NoPm25);
    };

    let obs = Observation::try_from(raw).context("Invalid PM2.5 observation")?;

    if !should_notify(&obs) {
        tracing::info!(
            "Reporting conditions (hour_observed: {}, aqi_value: {}) do not meet reporting requirements. No message is published",
            obs.hour_observed,
            obs.aqi
        );
        return Ok(Outcome::Rejected {
            hour: obs.hour_observed,
            aqi: obs.aqi,
        });
    }

    let message = AqiMessage::for_observation(&obs);
    publisher.publish(topic, message.as_str()).await?;
    tracing::info!("{} published formatted AQI message", request_id);

    Ok(Outcome::Published {
        message: message.into_string(),
    })
}

#[cfg(test)]
mod tests {
    // ---
    use super::*;
    use crate::models::Loose;
    use async_trait::async_trait;
    use std::sync::Mutex;

    const TOPIC: &str = "arn:aws:sns:us-west-2:123456789012:aqi";

    #[derive(Default)]
    struct RecordingPublisher {
        sent: Mutex<Vec<(String, String)>>,
    }

    #[async_trait]
    impl Publisher for RecordingPublisher {
        async fn publish(&self, topic: &str, message: &str) -> Result<()> {
            self.sent
                .lock()
                .unwrap()
                .push((topic.to_string(), message.to_string()));
            Ok(())
        }
    }

    struct FailingPublisher;

    #[async_trait]
    impl Publisher for FailingPublisher {
        async fn publish(&self, _topic: &str, _message: &str) -> Result<()> {
            anyhow::bail!("topic does not exist")
        }
    }

    fn record(parameter: &str, hour: &str, aqi: &str) -> RawObservation {
        // ---
        RawObservation {
            parameter_name: Some(parameter.to_string()),
            date_observed: Some("2024-06-01".to_string()),
            hour_observed: Loose::Text(hour.to_string()),
            reporting_area: Some("Springfield".to_string()),
            aqi: Loose::Text(aqi.to_string()),
        }
    }

    fn observation(hour: u8, aqi: i32) -> Observation {
        // ---
        Observation {
            parameter_name: PM25.to_string(),
            date_observed: "2024-06-01".to_string(),
            hour_observed: hour,
            reporting_area: "Springfield".to_string(),
            aqi,
        }
    }

    #[test]
    fn test_reportable_hours() {
        // ---
        for h in 0..=23u8 {
            assert_eq!(is_within_reportable_hours(h), (5..=21).contains(&h), "hour {}", h);
        }
        assert!(!is_within_reportable_hours(4));
        assert!(is_within_reportable_hours(5));
        assert!(is_within_reportable_hours(21));
        assert!(!is_within_reportable_hours(22));
    }

    #[test]
    fn test_harmful_threshold() {
        // ---
        assert!(!is_air_quality_bad_enough(0));
        assert!(!is_air_quality_bad_enough(50));
        assert!(is_air_quality_bad_enough(51));
        assert!(is_air_quality_bad_enough(300));
    }

    #[test]
    fn test_gate_truth_table() {
        // ---
        assert!(should_notify(&observation(14, 75)));
        assert!(!should_notify(&observation(3, 75)));
        assert!(!should_notify(&observation(14, 40)));
        assert!(!should_notify(&observation(3, 40)));
    }

    #[test]
    fn test_select_first_pm25() {
        // ---
        let records = vec![
            record("O3", "14", "30"),
            record("PM2.5", "14", "75"),
            record("PM2.5", "15", "90"),
        ];
        let selected = select_pm25(&records).unwrap();
        assert_eq!(selected.aqi, Loose::Text("75".to_string()));

        // Exact match only
        let near_misses = vec![record("PM25", "14", "75"), record("pm2.5", "14", "75")];
        assert!(select_pm25(&near_misses).is_none());
    }

    #[tokio::test]
    async fn test_publishes_expected_message() {
        // ---
        let publisher = RecordingPublisher::default();
        let records = vec![record("O3", "14", "20"), record("PM2.5", "14", "75")];

        let outcome = notify(&records, TOPIC, "req-1", &publisher).await.unwrap();

        let expected = "On 2024-06-01 in Springfield, AQI is 75.";
        assert_eq!(
            outcome,
            Outcome::Published {
                message: expected.to_string()
            }
        );
        let sent = publisher.sent.lock().unwrap();
        assert_eq!(sent.as_slice(), &[(TOPIC.to_string(), expected.to_string())]);
    }

    #[tokio::test]
    async fn test_gate_failures_do_not_publish() {
        // ---
        let publisher = RecordingPublisher::default();

        let early = notify(&[record("PM2.5", "3", "75")], TOPIC, "req-2", &publisher)
            .await
            .unwrap();
        assert_eq!(early, Outcome::Rejected { hour: 3, aqi: 75 });

        let clean = notify(&[record("PM2.5", "14", "40")], TOPIC, "req-3", &publisher)
            .await
            .unwrap();
        assert_eq!(clean, Outcome::Rejected { hour: 14, aqi: 40 });

        assert!(publisher.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_no_pm25_is_a_noop() {
        // ---
        let publisher = RecordingPublisher::default();
        let records = vec![record("O3", "14", "180"), record("PM10", "14", "160")];

        let outcome = notify(&records, TOPIC, "req-4", &publisher).await.unwrap();
        assert_eq!(outcome, Outcome::NoPm25);

        let empty = notify(&[], TOPIC, "req-5", &publisher).await.unwrap();
        assert_eq!(empty, Outcome::NoPm25);

        assert!(publisher.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_publish_failure_propagates() {
        // ---
        let err = notify(&[record("PM2.5", "14", "75")], TOPIC, "req-6", &FailingPublisher)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("topic does not exist"));
    }

    #[tokio::test]
    async fn test_unparseable_pm25_is_an_error_not_a_rejection() {
        // ---
        let publisher = RecordingPublisher::default();
        let err = notify(&[record("PM2.5", "14", "n/a")], TOPIC, "req-7", &publisher)
            .await
            .unwrap_err();

        assert!(err.downcast_ref::<crate::ObservationError>().is_some());
        assert!(publisher.sent.lock().unwrap().is_empty());
    }
}
