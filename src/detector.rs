//! Sustained-failure detection over the observation log

use crate::aggregate::service_catalog;
use crate::observation::{Measurement, Observation};

/// Number of consecutive failed checks that count as a sustained outage.
/// Approximates "down for at least the polling interval times three".
pub const SUSTAINED_FAILURE_SAMPLES: usize = 3;

/// True when the most recent [`SUSTAINED_FAILURE_SAMPLES`] boolean samples
/// for `service` are all failures.
///
/// Numeric samples never participate. A service with fewer boolean samples
/// than the threshold cannot trigger.
pub fn has_sustained_failure(records: &[Observation], service: &str) -> bool {
    let samples: Vec<bool> = records
        .iter()
        .filter_map(|r| r.get(service).and_then(Measurement::as_status))
        .collect();

    if samples.len() < SUSTAINED_FAILURE_SAMPLES {
        return false;
    }

    samples
        .iter()
        .rev()
        .take(SUSTAINED_FAILURE_SAMPLES)
        .all(|up| !up)
}

/// Every service currently in a sustained-failure state, sorted.
///
/// Scans the full catalog rather than stopping at the first hit, so the
/// result is deterministic and reportable as a set.
pub fn flagged_services(records: &[Observation]) -> Vec<String> {
    service_catalog(records)
        .into_iter()
        .filter(|service| has_sustained_failure(records, service))
        .collect()
}

pub fn has_any_sustained_failure(records: &[Observation]) -> bool {
    !flagged_services(records).is_empty()
}
