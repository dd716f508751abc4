//! Windowed availability and latency aggregation

use crate::observation::{Measurement, Observation};
use chrono::{DateTime, Duration, Utc};
use std::collections::BTreeSet;

/// The lookback windows the report covers, in days
pub const DEFAULT_WINDOWS: [u32; 3] = [30, 100, 365];

/// SLA ceiling for latency-coerced availability: a numeric sample below
/// this many milliseconds counts as "up"
pub const SLA_CEILING_MS: f64 = 5000.0;

/// How a service's samples are coerced into up/down.
///
/// Two encodings appear in the wild for the same log: a literal boolean
/// flag, and a raw latency number judged against [`SLA_CEILING_MS`]. Which
/// one a service uses is explicit configuration, never inferred from the
/// value type at runtime.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CoercionMode {
    /// Only boolean samples count; numeric samples are ignored
    #[default]
    StatusFlag,

    /// Booleans count as-is; numeric samples count as up below the ceiling
    LatencyCeiling,
}

/// Per-service coercion configuration
#[derive(Clone, Debug, Default)]
pub struct ServiceModes {
    latency_ceiling: BTreeSet<String>,
}

impl ServiceModes {
    pub fn new(latency_services: &[String]) -> Self {
        Self {
            latency_ceiling: latency_services.iter().cloned().collect(),
        }
    }

    pub fn mode_for(&self, service: &str) -> CoercionMode {
        if self.latency_ceiling.contains(service) {
            CoercionMode::LatencyCeiling
        } else {
            CoercionMode::StatusFlag
        }
    }
}

/// Distinct service names seen across all records, sorted.
///
/// Recomputed on each call; the store is append-only and small.
pub fn service_catalog(records: &[Observation]) -> Vec<String> {
    let mut catalog = BTreeSet::new();
    for record in records {
        for service in record.services() {
            catalog.insert(service.to_string());
        }
    }
    catalog.into_iter().collect()
}

/// Fraction of in-window samples for `service` that are up, as a
/// percentage in `[0, 100]`.
///
/// A window with no eligible samples reports 0%, not "no data" - a fresh
/// service with no history reads as fully down. Known sharp edge, kept for
/// compatibility with the numbers operators already watch. No rounding
/// happens here; the report composer rounds at presentation time.
pub fn uptime_percent(
    records: &[Observation],
    now: DateTime<Utc>,
    window_days: u32,
    service: &str,
    mode: CoercionMode,
) -> f64 {
    let cutoff = now - Duration::days(i64::from(window_days));

    let mut total = 0u64;
    let mut up = 0u64;

    for record in records {
        if record.timestamp < cutoff {
            continue;
        }

        let Some(measurement) = record.get(service) else {
            continue;
        };
        let Some(sample_up) = coerce(measurement, mode) else {
            continue;
        };

        total += 1;
        if sample_up {
            up += 1;
        }
    }

    if total == 0 {
        0.0
    } else {
        (up as f64 / total as f64) * 100.0
    }
}

fn coerce(measurement: &Measurement, mode: CoercionMode) -> Option<bool> {
    match (mode, measurement) {
        (_, Measurement::Status(b)) => Some(*b),
        (CoercionMode::StatusFlag, Measurement::Latency(_)) => None,
        (CoercionMode::LatencyCeiling, Measurement::Latency(ms)) => Some(*ms < SLA_CEILING_MS),
    }
}

/// Latency statistics over one window
#[derive(Clone, Debug, PartialEq)]
pub struct LatencyStats {
    pub samples: usize,
    pub mean_ms: f64,
    pub max_ms: f64,
}

/// Summarize the numeric samples for `service` within the window, or
/// `None` when there are none. Informational only; availability is
/// computed separately by [`uptime_percent`].
pub fn latency_stats(
    records: &[Observation],
    now: DateTime<Utc>,
    window_days: u32,
    service: &str,
) -> Option<LatencyStats> {
    let cutoff = now - Duration::days(i64::from(window_days));

    let values: Vec<f64> = records
        .iter()
        .filter(|r| r.timestamp >= cutoff)
        .filter_map(|r| r.get(service).and_then(Measurement::as_latency))
        .collect();

    if values.is_empty() {
        return None;
    }

    let sum: f64 = values.iter().sum();
    let max = values.iter().fold(f64::MIN, |acc, v| acc.max(*v));

    Some(LatencyStats {
        samples: values.len(),
        mean_ms: sum / values.len() as f64,
        max_ms: max,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
    }

    fn days_ago(days: i64) -> DateTime<Utc> {
        now() - Duration::days(days)
    }

    fn status(days: i64, service: &str, up: bool) -> Observation {
        Observation::new(days_ago(days))
            .with_status(service, up)
            .unwrap()
    }

    fn latency(days: i64, service: &str, ms: f64) -> Observation {
        Observation::new(days_ago(days))
            .with_latency(service, ms)
            .unwrap()
    }

    #[test]
    fn test_empty_window_reports_zero() {
        assert_eq!(
            uptime_percent(&[], now(), 30, "svcA", CoercionMode::StatusFlag),
            0.0
        );

        // Records exist, but none for this service
        let records = vec![status(1, "svcB", true)];
        assert_eq!(
            uptime_percent(&records, now(), 30, "svcA", CoercionMode::StatusFlag),
            0.0
        );
    }

    #[test]
    fn test_quarter_up() {
        let records = vec![
            status(4, "svcA", true),
            status(3, "svcA", false),
            status(2, "svcA", false),
            status(1, "svcA", false),
        ];

        assert_eq!(
            uptime_percent(&records, now(), 30, "svcA", CoercionMode::StatusFlag),
            25.0
        );
    }

    #[test]
    fn test_cutoff_excludes_old_samples() {
        let records = vec![
            status(40, "svcA", false),
            status(10, "svcA", true),
        ];

        // The failure is outside the 30-day window
        assert_eq!(
            uptime_percent(&records, now(), 30, "svcA", CoercionMode::StatusFlag),
            100.0
        );
        // But inside the 100-day window
        assert_eq!(
            uptime_percent(&records, now(), 100, "svcA", CoercionMode::StatusFlag),
            50.0
        );
    }

    #[test]
    fn test_monotonic_in_up_fraction() {
        let mut records = vec![
            status(3, "svcA", false),
            status(2, "svcA", false),
            status(1, "svcA", true),
        ];
        let before = uptime_percent(&records, now(), 30, "svcA", CoercionMode::StatusFlag);

        records[0] = status(3, "svcA", true);
        let after = uptime_percent(&records, now(), 30, "svcA", CoercionMode::StatusFlag);

        assert!(after > before);
    }

    #[test]
    fn test_pure_function_of_inputs() {
        let records = vec![status(2, "svcA", true), status(1, "svcA", false)];

        let first = uptime_percent(&records, now(), 30, "svcA", CoercionMode::StatusFlag);
        let second = uptime_percent(&records, now(), 30, "svcA", CoercionMode::StatusFlag);
        assert_eq!(first, second);
    }

    #[test]
    fn test_status_flag_mode_ignores_numeric_samples() {
        let records = vec![
            latency(2, "svcA", 100.0),
            status(1, "svcA", false),
        ];

        // Only the boolean sample counts
        assert_eq!(
            uptime_percent(&records, now(), 30, "svcA", CoercionMode::StatusFlag),
            0.0
        );
    }

    #[test]
    fn test_latency_ceiling_mode() {
        let records = vec![
            latency(3, "svcA", 4999.0),
            latency(2, "svcA", 5000.0),
            status(1, "svcA", true),
        ];

        // 4999 up, 5000 down, boolean true up
        let pct = uptime_percent(&records, now(), 30, "svcA", CoercionMode::LatencyCeiling);
        assert!((pct - 200.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_service_catalog_is_sorted_and_distinct() {
        let records = vec![
            status(3, "udp", true),
            status(2, "cloud-login", true),
            latency(1, "udp", 10.0),
        ];

        assert_eq!(service_catalog(&records), vec!["cloud-login", "udp"]);
        assert!(service_catalog(&[]).is_empty());
    }

    #[test]
    fn test_service_modes_lookup() {
        let modes = ServiceModes::new(&["udp".to_string()]);

        assert_eq!(modes.mode_for("udp"), CoercionMode::LatencyCeiling);
        assert_eq!(modes.mode_for("cloud-login"), CoercionMode::StatusFlag);
    }

    #[test]
    fn test_latency_stats() {
        let records = vec![
            latency(3, "udp", 100.0),
            latency(2, "udp", 300.0),
            status(1, "udp", true),
            latency(50, "udp", 9000.0),
        ];

        let stats = latency_stats(&records, now(), 30, "udp").unwrap();
        assert_eq!(stats.samples, 2);
        assert_eq!(stats.mean_ms, 200.0);
        assert_eq!(stats.max_ms, 300.0);

        assert_eq!(latency_stats(&records, now(), 30, "cloud-login"), None);
    }
}
