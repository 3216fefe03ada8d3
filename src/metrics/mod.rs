//! Prometheus metrics registration and export.

use prometheus::{CounterVec, Encoder, Opts, Registry, TextEncoder};
use std::sync::OnceLock;

use crate::model::JobStatus;

/// Global Prometheus registry for all swaprunn metrics.
pub static REGISTRY: OnceLock<Registry> = OnceLock::new();

/// Total HTTP requests served, labeled by method, route and status class.
pub static HTTP_REQUESTS_TOTAL: OnceLock<CounterVec> = OnceLock::new();

/// Total job lifecycle transitions, labeled by resulting status.
pub static JOB_TRANSITIONS_TOTAL: OnceLock<CounterVec> = OnceLock::new();

/// Total accounts created, labeled by role.
pub static SIGNUPS_TOTAL: OnceLock<CounterVec> = OnceLock::new();

/// Initialize all metrics and register them with the registry.
///
/// Call once at startup; a second call is a no-op because the cells are
/// already populated.
pub fn init_metrics() -> Result<(), prometheus::Error> {
    if REGISTRY.get().is_some() {
        return Ok(());
    }

    let registry = Registry::new();

    let http_requests = CounterVec::new(
        Opts::new("swaprunn_http_requests_total", "Total HTTP requests served"),
        &["method", "route", "status"],
    )?;
    registry.register(Box::new(http_requests.clone()))?;

    let job_transitions = CounterVec::new(
        Opts::new(
            "swaprunn_job_transitions_total",
            "Total job lifecycle transitions",
        ),
        &["to"],
    )?;
    registry.register(Box::new(job_transitions.clone()))?;

    let signups = CounterVec::new(
        Opts::new("swaprunn_signups_total", "Total accounts created"),
        &["role"],
    )?;
    registry.register(Box::new(signups.clone()))?;

    let _ = REGISTRY.set(registry);
    let _ = HTTP_REQUESTS_TOTAL.set(http_requests);
    let _ = JOB_TRANSITIONS_TOTAL.set(job_transitions);
    let _ = SIGNUPS_TOTAL.set(signups);

    Ok(())
}

/// Records one served HTTP request. No-op before `init_metrics`.
pub fn record_http_request(method: &str, route: &str, status: u16) {
    if let Some(counter) = HTTP_REQUESTS_TOTAL.get() {
        counter
            .with_label_values(&[method, route, &status.to_string()])
            .inc();
    }
}

/// Records a job entering `to`. No-op before `init_metrics`.
pub fn record_job_transition(to: JobStatus) {
    if let Some(counter) = JOB_TRANSITIONS_TOTAL.get() {
        counter.with_label_values(&[to.as_str()]).inc();
    }
}

/// Records an account creation for `role`. No-op before `init_metrics`.
pub fn record_signup(role: &str) {
    if let Some(counter) = SIGNUPS_TOTAL.get() {
        counter.with_label_values(&[role]).inc();
    }
}

/// Renders all registered metrics in the Prometheus text format.
pub fn gather_text() -> String {
    let Some(registry) = REGISTRY.get() else {
        return String::new();
    };

    let metric_families = registry.gather();
    let mut buffer = Vec::new();
    let encoder = TextEncoder::new();
    if encoder.encode(&metric_families, &mut buffer).is_err() {
        return String::new();
    }
    String::from_utf8(buffer).unwrap_or_default()
}
