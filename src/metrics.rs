// Prometheus metrics definitions for the Tap Sim bot.

use lazy_static::lazy_static;
use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounter, IntCounterVec, IntGauge, Opts, Registry,
    TextEncoder,
};

lazy_static! {
    pub static ref REGISTRY: Registry = Registry::new();

    // ── Gauges ───────────────────────────────────────────────────────

    /// Records in the most recent hatch leaderboard fetch.
    pub static ref HATCH_LEADERBOARD_SIZE: IntGauge =
        IntGauge::new("tapsim_hatch_leaderboard_size", "Records in the last hatch leaderboard").unwrap();

    // ── Counters ─────────────────────────────────────────────────────

    /// Chat commands handled, by command and outcome (ok, not_found, usage, unavailable).
    pub static ref COMMANDS_TOTAL: IntCounterVec = IntCounterVec::new(
        Opts::new("tapsim_commands_total", "Chat commands handled"),
        &["command", "outcome"],
    )
    .unwrap();

    /// Upstream fetch attempts, by endpoint and result (ok or error kind).
    pub static ref UPSTREAM_FETCHES_TOTAL: IntCounterVec = IntCounterVec::new(
        Opts::new("tapsim_upstream_fetches_total", "Upstream fetch attempts"),
        &["endpoint", "result"],
    )
    .unwrap();

    /// Periodic hatch cycles, by outcome (changed, unchanged, failed).
    pub static ref HATCH_CYCLES_TOTAL: IntCounterVec = IntCounterVec::new(
        Opts::new("tapsim_hatch_cycles_total", "Periodic hatch leaderboard cycles"),
        &["outcome"],
    )
    .unwrap();

    /// Hatch leaderboard posts delivered to the destination.
    pub static ref HATCH_POSTS_TOTAL: IntCounter = IntCounter::new(
        "tapsim_hatch_posts_total",
        "Hatch leaderboard posts delivered",
    )
    .unwrap();

    /// Hatch leaderboard posts that failed to deliver.
    pub static ref HATCH_POST_FAILURES_TOTAL: IntCounter = IntCounter::new(
        "tapsim_hatch_post_failures_total",
        "Hatch leaderboard posts that failed to deliver",
    )
    .unwrap();

    // ── Histograms ───────────────────────────────────────────────────

    /// Upstream request duration in seconds, by endpoint.
    pub static ref UPSTREAM_FETCH_DURATION_SECONDS: HistogramVec = HistogramVec::new(
        HistogramOpts::new(
            "tapsim_upstream_fetch_duration_seconds",
            "Upstream request duration in seconds",
        )
        .buckets(vec![0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0]),
        &["endpoint"],
    )
    .unwrap();
}

/// Register all metrics with the custom registry. Call once at startup.
pub fn register_metrics() {
    let collectors: Vec<Box<dyn prometheus::core::Collector>> = vec![
        Box::new(HATCH_LEADERBOARD_SIZE.clone()),
        Box::new(COMMANDS_TOTAL.clone()),
        Box::new(UPSTREAM_FETCHES_TOTAL.clone()),
        Box::new(HATCH_CYCLES_TOTAL.clone()),
        Box::new(HATCH_POSTS_TOTAL.clone()),
        Box::new(HATCH_POST_FAILURES_TOTAL.clone()),
        Box::new(UPSTREAM_FETCH_DURATION_SECONDS.clone()),
    ];

    for c in collectors {
        if let Err(e) = REGISTRY.register(c) {
            tracing::warn!("Metric registration skipped: {e}");
        }
    }
}

/// Serialize all registered metrics to the Prometheus text exposition format.
pub fn gather_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        tracing::error!("Failed to encode metrics: {e}");
        return String::new();
    }
    String::from_utf8(buffer).unwrap_or_default()
}
