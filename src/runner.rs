//! One aggregate-and-notify cycle

use crate::aggregate::{service_catalog, ServiceModes};
use crate::config::Config;
use crate::detector::flagged_services;
use crate::errors::Result;
use crate::notify::{DeliveryResult, NotificationSink};
use crate::report::{compose_alarm, compose_report};
use crate::store::UptimeStore;
use chrono::Utc;
use tracing::{error, info, warn};
use uuid::Uuid;

/// Runs a single reporting cycle: load the log once, compose and send the
/// report, then detect sustained failures and raise the alarm if needed.
///
/// The two sends are issued in fixed order (report first, alarm second) and
/// are independent: a failed report send never suppresses the alarm, and no
/// delivery outcome affects the run's exit status.
pub struct ReportRunner {
    config: Config,
    sink: Box<dyn NotificationSink>,
    run_id: String,
}

/// What a cycle did, for logging and for callers that want to inspect it
#[derive(Debug)]
pub struct RunSummary {
    pub run_id: String,
    pub records: usize,
    pub services: Vec<String>,
    pub sustained_failures: Vec<String>,
    pub report_delivery: DeliveryResult,
    pub alarm_delivery: Option<DeliveryResult>,
}

impl ReportRunner {
    pub fn new(config: Config, sink: Box<dyn NotificationSink>) -> Self {
        Self {
            config,
            sink,
            run_id: Uuid::new_v4().to_string(),
        }
    }

    pub async fn run(&self) -> Result<RunSummary> {
        // Snapshot the log once; a corrupt log aborts before any
        // aggregation or delivery
        let store = UptimeStore::load(&self.config.store_path)?;
        let records = store.records();
        let now = Utc::now();

        info!(
            "Reporting run {} over {} records from {}",
            self.run_id,
            records.len(),
            store.path().display()
        );

        let modes = ServiceModes::new(&self.config.latency_services);
        let report = compose_report(records, now, &self.config.windows, &modes);

        let report_delivery = self
            .sink
            .send(&self.config.report_webhook_url, &report)
            .await;
        if !report_delivery.success {
            error!(
                "Report delivery to {} failed: {:?}",
                report_delivery.destination, report_delivery.message
            );
        }

        let sustained_failures = flagged_services(records);
        let alarm_delivery = if sustained_failures.is_empty() {
            None
        } else {
            warn!(
                "Sustained failure detected for: {}",
                sustained_failures.join(", ")
            );

            let delivery = self
                .sink
                .send(&self.config.alarm_webhook_url, compose_alarm())
                .await;
            if !delivery.success {
                error!(
                    "Alarm delivery to {} failed: {:?}",
                    delivery.destination, delivery.message
                );
            }
            Some(delivery)
        };

        Ok(RunSummary {
            run_id: self.run_id.clone(),
            records: records.len(),
            services: service_catalog(records),
            sustained_failures,
            report_delivery,
            alarm_delivery,
        })
    }
}
