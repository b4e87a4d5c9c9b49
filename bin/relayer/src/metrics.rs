//! Prometheus metrics for the relayer.
//!
//! All metrics are aggregated in the [`Metrics`] struct for easy tracking and management.

use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge, histogram};
use std::time::Duration;

/// Aggregated metrics for the relayer.
///
/// Metrics are registered with the global metrics registry on creation.
#[derive(Debug, Clone)]
pub struct Metrics {
    _private: (),
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Metrics {
    /// Create a new metrics instance and register all metric descriptions.
    pub fn new() -> Self {
        Self::register_descriptions();
        Self { _private: () }
    }

    fn register_descriptions() {
        describe_counter!(
            "relayer_cycles_total",
            "Total number of report cycles executed"
        );
        describe_counter!(
            "relayer_cycles_failure_total",
            "Total number of failed report cycles"
        );
        describe_histogram!(
            "relayer_cycle_duration_seconds",
            "Duration of each report cycle in seconds"
        );

        describe_gauge!(
            "relayer_pending_quotes",
            "Number of pending quotes by next step"
        );
        describe_gauge!(
            "relayer_escrowed_amount",
            "Source amount still held in escrow, by token"
        );

        describe_counter!(
            "relayer_events_total",
            "RFQ events observed, by chain and event name"
        );
        describe_counter!(
            "relayer_stream_errors_total",
            "Failed event stream polls, by chain"
        );
    }

    /// Record a completed cycle.
    pub fn record_cycle(&self, success: bool, duration: Duration) {
        counter!("relayer_cycles_total").increment(1);
        histogram!("relayer_cycle_duration_seconds").record(duration.as_secs_f64());

        if !success {
            counter!("relayer_cycles_failure_total").increment(1);
        }
    }

    /// Set the count of pending quotes waiting on `step`.
    pub fn set_pending_quotes(&self, step: &str, count: usize) {
        gauge!("relayer_pending_quotes", "step" => step.to_string()).set(count as f64);
    }

    /// Set the escrowed amount of `token`, in its smallest unit.
    pub fn set_escrowed_amount(&self, token: &str, amount: u128) {
        gauge!("relayer_escrowed_amount", "token" => token.to_string()).set(amount as f64);
    }

    pub fn record_event(&self, chain: &str, event: &'static str) {
        counter!("relayer_events_total", "chain" => chain.to_string(), "event" => event)
            .increment(1);
    }

    pub fn record_stream_error(&self, chain: &str) {
        counter!("relayer_stream_errors_total", "chain" => chain.to_string()).increment(1);
    }
}

/// Install the Prometheus metrics exporter and start the HTTP server.
///
/// Returns an error if the server fails to bind to the specified port.
pub fn install_prometheus_exporter(port: u16) -> eyre::Result<()> {
    use metrics_exporter_prometheus::PrometheusBuilder;
    use std::net::SocketAddr;

    let addr = SocketAddr::from(([0, 0, 0, 0], port));

    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .map_err(|e| eyre::eyre!("Failed to install Prometheus exporter: {}", e))?;

    Ok(())
}
