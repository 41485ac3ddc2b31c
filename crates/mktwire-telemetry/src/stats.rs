//! Periodic activity summary output.
//!
//! Reads the process-wide metric counters and logs a human-readable
//! summary of gateway activity since startup.

use crate::metrics::{
    DATA_LOSS_TOTAL, EVENTS_TOTAL, NORMALIZE_ERRORS_TOTAL, PERSISTENCE_ERRORS_TOTAL,
    RECORDS_NORMALIZED_TOTAL, RECORDS_PERSISTED_TOTAL, SLOW_CONSUMER_TOTAL,
    SUBSCRIPTION_FAILURES_TOTAL, UNKNOWN_TOKEN_TOTAL,
};
use chrono::{DateTime, Utc};
use mktwire_core::FeedKind;
use prometheus::core::Collector;
use tracing::info;

/// Activity counters for one feed kind.
#[derive(Debug, Clone)]
pub struct FeedActivity {
    pub feed_kind: FeedKind,
    pub records_normalized: u64,
    pub records_persisted: u64,
    pub normalize_errors: u64,
    pub persistence_errors: u64,
}

/// Periodic activity reporter.
#[derive(Debug)]
pub struct ActivityReporter {
    start_time: DateTime<Utc>,
}

impl ActivityReporter {
    /// Create a new activity reporter. Counters are relative to process start.
    pub fn new() -> Self {
        Self {
            start_time: Utc::now(),
        }
    }

    /// Get current activity for all feed kinds.
    pub fn feed_activity(&self) -> Vec<FeedActivity> {
        FeedKind::all()
            .iter()
            .map(|kind| {
                let label = kind.dir_name();
                FeedActivity {
                    feed_kind: *kind,
                    records_normalized: counter_value(&RECORDS_NORMALIZED_TOTAL, &[label]),
                    records_persisted: counter_value(&RECORDS_PERSISTED_TOTAL, &[label]),
                    normalize_errors: counter_value(&NORMALIZE_ERRORS_TOTAL, &[label]),
                    persistence_errors: counter_value(&PERSISTENCE_ERRORS_TOTAL, &[label]),
                }
            })
            .collect()
    }

    /// Output an activity summary to logs.
    pub fn output_summary(&self) {
        let duration = Utc::now() - self.start_time;
        let hours = duration.num_hours();
        let minutes = duration.num_minutes() % 60;

        info!("========== Activity Summary ==========");
        info!(
            "Since: {} ({} hours {} minutes)",
            self.start_time.format("%Y-%m-%d %H:%M:%S UTC"),
            hours,
            minutes
        );
        info!(
            "Events: data={}, status={}, other={}",
            counter_value(&EVENTS_TOTAL, &["data"]),
            counter_value(&EVENTS_TOTAL, &["status"]),
            counter_value(&EVENTS_TOTAL, &["other"])
        );

        for a in self.feed_activity() {
            if a.records_normalized == 0
                && a.records_persisted == 0
                && a.normalize_errors == 0
                && a.persistence_errors == 0
            {
                continue;
            }
            info!(
                "  {}: normalized={}, persisted={}, normalize_errors={}, persistence_errors={}",
                a.feed_kind,
                a.records_normalized,
                a.records_persisted,
                a.normalize_errors,
                a.persistence_errors
            );
        }

        info!(
            "Drops: unknown_token={}, subscription_failures={}, data_loss={}",
            UNKNOWN_TOKEN_TOTAL.get() as u64,
            vec_total(&SUBSCRIPTION_FAILURES_TOTAL),
            vec_total(&DATA_LOSS_TOTAL)
        );
        info!(
            "Slow consumer: warnings={}, cleared={}",
            counter_value(&SLOW_CONSUMER_TOTAL, &["warning"]),
            counter_value(&SLOW_CONSUMER_TOTAL, &["cleared"])
        );
        info!("======================================");
    }
}

impl Default for ActivityReporter {
    fn default() -> Self {
        Self::new()
    }
}

/// Get counter value for given labels.
fn counter_value(counter: &prometheus::CounterVec, labels: &[&str]) -> u64 {
    counter.with_label_values(labels).get() as u64
}

/// Sum a labeled counter across all label values.
fn vec_total(counter: &prometheus::CounterVec) -> u64 {
    let mut total = 0.0;
    for mf in counter.collect() {
        for m in mf.get_metric() {
            total += m.get_counter().get_value();
        }
    }
    total as u64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::Metrics;

    #[test]
    fn test_feed_activity_covers_all_kinds() {
        let reporter = ActivityReporter::new();
        let activity = reporter.feed_activity();
        assert_eq!(activity.len(), 4);
        let kinds: Vec<FeedKind> = activity.iter().map(|a| a.feed_kind).collect();
        assert_eq!(kinds, FeedKind::all().to_vec());
    }

    #[test]
    fn test_counter_value_reads_increments() {
        let before = counter_value(&SUBSCRIPTION_FAILURES_TOTAL, &["stats-test-token"]);
        Metrics::subscription_failure("stats-test-token");
        let after = counter_value(&SUBSCRIPTION_FAILURES_TOTAL, &["stats-test-token"]);
        assert_eq!(after - before, 1);
    }

    #[test]
    fn test_vec_total_counts_all_labels() {
        let before = vec_total(&DATA_LOSS_TOTAL);
        Metrics::data_loss("stats-test-a");
        Metrics::data_loss("stats-test-b");
        let after = vec_total(&DATA_LOSS_TOTAL);
        assert_eq!(after - before, 2);
    }

    #[test]
    fn test_output_summary_does_not_panic() {
        let reporter = ActivityReporter::new();
        reporter.output_summary();
    }
}
