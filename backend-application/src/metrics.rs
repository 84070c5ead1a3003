use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Default)]
pub struct Metrics {
    status_transitions: AtomicU64,
    status_failures: AtomicU64,
    impact_created: AtomicU64,
    impact_duplicates: AtomicU64,
    job_ticks: AtomicU64,
    job_ticks_skipped: AtomicU64,
    job_errors: AtomicU64,
    waste_records: AtomicU64,
    late_waste_records: AtomicU64,
    registrations: AtomicU64,
    notifications: AtomicU64,
}

impl Metrics {
    pub fn record_transitions(&self, updated: usize, failed: usize) {
        self.status_transitions
            .fetch_add(updated as u64, Ordering::Relaxed);
        self.status_failures.fetch_add(failed as u64, Ordering::Relaxed);
    }

    pub fn record_impact_created(&self) {
        self.impact_created.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_impact_duplicate(&self) {
        self.impact_duplicates.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_job_tick(&self) {
        self.job_ticks.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_job_skipped(&self) {
        self.job_ticks_skipped.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_job_error(&self) {
        self.job_errors.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_waste(&self, record_count: usize) {
        self.waste_records
            .fetch_add(record_count as u64, Ordering::Relaxed);
    }

    /// Records appended after their event's summary was finalized.
    pub fn record_late_waste(&self, record_count: usize) {
        self.late_waste_records
            .fetch_add(record_count as u64, Ordering::Relaxed);
    }

    pub fn record_registration(&self) {
        self.registrations.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_notifications(&self, count: usize) {
        self.notifications.fetch_add(count as u64, Ordering::Relaxed);
    }

    pub fn impact_created(&self) -> u64 {
        self.impact_created.load(Ordering::Relaxed)
    }

    pub fn late_waste_records(&self) -> u64 {
        self.late_waste_records.load(Ordering::Relaxed)
    }

    pub fn job_ticks_skipped(&self) -> u64 {
        self.job_ticks_skipped.load(Ordering::Relaxed)
    }

    pub fn render_prometheus(&self) -> String {
        let counters = [
            ("shoreline_status_transitions_total", &self.status_transitions),
            ("shoreline_status_failures_total", &self.status_failures),
            ("shoreline_impact_summaries_created_total", &self.impact_created),
            ("shoreline_impact_duplicates_absorbed_total", &self.impact_duplicates),
            ("shoreline_job_ticks_total", &self.job_ticks),
            ("shoreline_job_ticks_skipped_total", &self.job_ticks_skipped),
            ("shoreline_job_errors_total", &self.job_errors),
            ("shoreline_waste_records_total", &self.waste_records),
            ("shoreline_waste_records_after_finalize_total", &self.late_waste_records),
            ("shoreline_registrations_total", &self.registrations),
            ("shoreline_notifications_total", &self.notifications),
        ];
        let mut out = String::new();
        for (name, counter) in counters {
            out.push_str(&format!(
                "# TYPE {name} counter\n{name} {}\n",
                counter.load(Ordering::Relaxed)
            ));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prometheus_output_lists_counters() {
        let metrics = Metrics::default();
        metrics.record_transitions(3, 1);
        metrics.record_impact_created();
        let text = metrics.render_prometheus();
        assert!(text.contains("shoreline_status_transitions_total 3\n"));
        assert!(text.contains("shoreline_status_failures_total 1\n"));
        assert!(text.contains("shoreline_impact_summaries_created_total 1\n"));
        assert!(text.contains("# TYPE shoreline_job_ticks_total counter\n"));
    }
}
