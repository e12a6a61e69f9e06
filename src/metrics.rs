//! Cache telemetry: counters and a histogram recorded through the `metrics` facade.
//!
//! Without an installed recorder every call is a no-op, so library users pay
//! nothing unless they opt in (e.g. via `install_prometheus`).

use metrics::{counter, describe_counter, describe_histogram, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};
use once_cell::sync::OnceCell;

pub const CACHE_HITS: &str = "readiness_cache_hits_total";
pub const CACHE_MISSES: &str = "readiness_cache_misses_total";
pub const CACHE_WRITE_FAILURES: &str = "readiness_cache_write_failures_total";
pub const WARM_FAILURES: &str = "readiness_warm_failures_total";
pub const SCORE_COMPUTE_MS: &str = "readiness_score_compute_ms";

/// One-time metrics registration (so series show up on scrape with help text).
pub fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!(CACHE_HITS, "Score lookups served from a matching cache record.");
        describe_counter!(
            CACHE_MISSES,
            "Score lookups that recomputed (label reason=absent|stale|corrupt)."
        );
        describe_counter!(CACHE_WRITE_FAILURES, "Cache record upserts that failed.");
        describe_counter!(WARM_FAILURES, "Best-effort warm-ups that were skipped on error.");
        describe_histogram!(SCORE_COMPUTE_MS, "Rule evaluation time in milliseconds.");
    });
}

pub(crate) fn record_hit() {
    counter!(CACHE_HITS).increment(1);
}

pub(crate) fn record_miss(reason: &'static str) {
    counter!(CACHE_MISSES, "reason" => reason).increment(1);
}

pub(crate) fn record_write_failure() {
    counter!(CACHE_WRITE_FAILURES).increment(1);
}

pub(crate) fn record_warm_failure() {
    counter!(WARM_FAILURES).increment(1);
}

pub(crate) fn record_compute_ms(ms: f64) {
    histogram!(SCORE_COMPUTE_MS).record(ms);
}

/// Install the Prometheus recorder process-wide and return its render handle.
pub fn install_prometheus() -> Result<PrometheusHandle, BuildError> {
    let handle = PrometheusBuilder::new().install_recorder()?;
    ensure_metrics_described();
    Ok(handle)
}
