//! Prometheus metrics export.

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::sync::OnceLock;

static PROMETHEUS: OnceLock<PrometheusHandle> = OnceLock::new();

/// Install the global metrics recorder. Call once at startup, before the
/// first counter is touched; a second call panics.
pub fn init_metrics() {
    let handle = PrometheusBuilder::new()
        .install_recorder()
        .expect("failed to install Prometheus recorder");

    if PROMETHEUS.set(handle).is_err() {
        panic!("metrics recorder installed twice");
    }
}

/// Render the current metrics in the Prometheus text format.
pub fn get_metrics() -> String {
    match PROMETHEUS.get() {
        Some(handle) => handle.render(),
        None => "# metrics recorder not installed\n".to_string(),
    }
}
