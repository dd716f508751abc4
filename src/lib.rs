//! Uptime Reporter Library
//!
//! This library maintains an append-only uptime log, computes windowed
//! availability and latency statistics per service, detects sustained
//! failures, and dispatches report and alarm messages to chat webhooks.

pub mod aggregate;
pub mod config;
pub mod detector;
pub mod errors;
pub mod notify;
pub mod observation;
pub mod report;
pub mod runner;
pub mod store;

pub use aggregate::{CoercionMode, LatencyStats, ServiceModes};
pub use config::Config;
pub use errors::{ReporterError, Result};
pub use notify::{DeliveryResult, NotificationSink, WebhookNotifier};
pub use observation::{Measurement, Observation};
pub use runner::{ReportRunner, RunSummary};
pub use store::UptimeStore;
