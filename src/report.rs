//! Report and alarm composition

use crate::aggregate::{latency_stats, service_catalog, uptime_percent, ServiceModes};
use crate::observation::Observation;
use chrono::{DateTime, Utc};

/// Fixed alarm text for the critical channel. No dynamic content, so a
/// broken aggregation path can never garble the page.
pub const ALARM_MESSAGE: &str =
    "\u{1f6a8} CRITICAL OUTAGE: repeated uptime checks are failing. Immediate attention required.";

/// Round to two decimals, the way the report displays percentages
fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Build the multi-service uptime summary.
///
/// Per-service percentages are rounded to two decimals here, at
/// presentation time, and the overall average per window is the arithmetic
/// mean of those already-rounded values - not a re-aggregation over raw
/// records. Services with zero eligible samples still contribute 0.00% to
/// the average. Both quirks are preserved so the numbers match what
/// operators have been reading.
pub fn compose_report(
    records: &[Observation],
    now: DateTime<Utc>,
    windows: &[u32],
    modes: &ServiceModes,
) -> String {
    let catalog = service_catalog(records);

    let mut lines = Vec::new();
    lines.push(format!(
        "Uptime report ({})",
        now.format("%Y-%m-%d %H:%M UTC")
    ));

    if catalog.is_empty() {
        lines.push("No observations recorded yet.".to_string());
        return lines.join("\n");
    }

    // Rounded per-service values, per window, feeding the overall average
    let mut rounded_per_window: Vec<Vec<f64>> = vec![Vec::new(); windows.len()];
    let widest = windows.iter().copied().max().unwrap_or(0);

    for service in &catalog {
        let mode = modes.mode_for(service);

        let mut parts = Vec::new();
        for (i, &window) in windows.iter().enumerate() {
            let pct = round2(uptime_percent(records, now, window, service, mode));
            rounded_per_window[i].push(pct);
            parts.push(format!("last {}d -> {:.2}%", window, pct));
        }
        lines.push(format!("{}: {}", service, parts.join(" | ")));

        if let Some(stats) = latency_stats(records, now, widest, service) {
            lines.push(format!(
                "{} latency ({}d): {} samples, mean {:.1} ms, max {:.1} ms",
                service, widest, stats.samples, stats.mean_ms, stats.max_ms
            ));
        }
    }

    let mut overall = Vec::new();
    for (i, &window) in windows.iter().enumerate() {
        let values = &rounded_per_window[i];
        let mean = values.iter().sum::<f64>() / values.len() as f64;
        overall.push(format!("last {}d -> {:.2}%", window, mean));
    }
    lines.push(format!("Overall: {}", overall.join(" | ")));

    lines.join("\n")
}

/// The critical-outage alarm, kept separate from the report channel
pub fn compose_alarm() -> &'static str {
    ALARM_MESSAGE
}
