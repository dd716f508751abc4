//! Observation records and their measurement values

use crate::errors::{ReporterError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Field name reserved for the observation timestamp. It can never be used
/// as a service name.
pub const TIMESTAMP_FIELD: &str = "timestamp";

/// A single measurement for one service within an observation.
///
/// The persisted log is an open schema: a field value is either a boolean
/// up/down outcome or a raw number (a latency in milliseconds). Untagged so
/// the JSON stays exactly `"svc": true` or `"svc": 812.4`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Measurement {
    /// Boolean up/down outcome (`true` = up)
    Status(bool),

    /// Numeric measurement, interpreted as milliseconds
    Latency(f64),
}

impl Measurement {
    pub fn as_status(&self) -> Option<bool> {
        match self {
            Measurement::Status(up) => Some(*up),
            Measurement::Latency(_) => None,
        }
    }

    pub fn as_latency(&self) -> Option<f64> {
        match self {
            Measurement::Status(_) => None,
            Measurement::Latency(ms) => Some(*ms),
        }
    }
}

/// One timestamped set of measurements, keyed by service name.
///
/// Service names are chosen freely by producers; the store does not declare
/// a fixed set of services up front.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub timestamp: DateTime<Utc>,

    #[serde(flatten)]
    fields: BTreeMap<String, Measurement>,
}

impl Observation {
    /// Create an empty observation at the given instant
    pub fn new(timestamp: DateTime<Utc>) -> Self {
        Self {
            timestamp,
            fields: BTreeMap::new(),
        }
    }

    /// Add a boolean up/down outcome for a service
    pub fn with_status(self, service: impl Into<String>, up: bool) -> Result<Self> {
        self.with_field(service.into(), Measurement::Status(up))
    }

    /// Add a latency measurement (milliseconds) for a service
    pub fn with_latency(self, service: impl Into<String>, ms: f64) -> Result<Self> {
        self.with_field(service.into(), Measurement::Latency(ms))
    }

    fn with_field(mut self, service: String, measurement: Measurement) -> Result<Self> {
        if service == TIMESTAMP_FIELD {
            return Err(ReporterError::InvalidField(format!(
                "'{}' is reserved and cannot be used as a service name",
                TIMESTAMP_FIELD
            )));
        }

        self.fields.insert(service, measurement);
        Ok(self)
    }

    /// Look up the measurement recorded for a service, if any
    pub fn get(&self, service: &str) -> Option<&Measurement> {
        self.fields.get(service)
    }

    /// Iterate over the service names present in this observation
    pub fn services(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
