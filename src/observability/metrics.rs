//! Metrics collection and exposition.
//!
//! # Metrics
//! - `secure_host_rejections_total` (counter): requests for hosts outside the allow-list
//! - `secure_redirects_total` (counter): insecure requests upgraded to HTTPS

use std::net::SocketAddr;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus exporter with its own HTTP listener.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint started");
    Ok(())
}

pub fn record_host_rejected() {
    ::metrics::counter!("secure_host_rejections_total").increment(1);
}

pub fn record_https_redirect() {
    ::metrics::counter!("secure_redirects_total").increment(1);
}
