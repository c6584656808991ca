//! Prometheus metrics for the worker loop and the HTTP API.

use prometheus::{
    Encoder, Histogram, HistogramOpts, IntCounter, IntGauge, Opts, Registry, TextEncoder,
};

pub struct Metrics {
    registry: Registry,
    pub cycles_total: IntCounter,
    pub pairs_skipped_total: IntCounter,
    pub candidates_total: IntCounter,
    pub signals_accepted_total: IntCounter,
    pub signals_rate_limited_total: IntCounter,
    pub http_requests_total: IntCounter,
    pub http_request_duration_seconds: Histogram,
    pub http_requests_in_flight: IntGauge,
}

fn counter(registry: &Registry, name: &str, help: &str) -> Result<IntCounter, prometheus::Error> {
    let counter = IntCounter::with_opts(Opts::new(name, help).namespace("fxpulse"))?;
    registry.register(Box::new(counter.clone()))?;
    Ok(counter)
}

impl Metrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let http_request_duration_seconds = Histogram::with_opts(
            HistogramOpts::new(
                "http_request_duration_seconds",
                "HTTP request latency in seconds",
            )
            .namespace("fxpulse"),
        )?;
        registry.register(Box::new(http_request_duration_seconds.clone()))?;

        let http_requests_in_flight = IntGauge::with_opts(
            Opts::new("http_requests_in_flight", "HTTP requests being served").namespace("fxpulse"),
        )?;
        registry.register(Box::new(http_requests_in_flight.clone()))?;

        Ok(Self {
            cycles_total: counter(&registry, "cycles_total", "Evaluation cycles run")?,
            pairs_skipped_total: counter(
                &registry,
                "pairs_skipped_total",
                "Pairs skipped for missing data or provider failure",
            )?,
            candidates_total: counter(&registry, "candidates_total", "Candidate signals produced")?,
            signals_accepted_total: counter(
                &registry,
                "signals_accepted_total",
                "Signals accepted into history",
            )?,
            signals_rate_limited_total: counter(
                &registry,
                "signals_rate_limited_total",
                "Candidates dropped by the hourly cap",
            )?,
            http_requests_total: counter(&registry, "http_requests_total", "HTTP requests served")?,
            http_request_duration_seconds,
            http_requests_in_flight,
            registry,
        })
    }

    /// Text exposition format
    pub fn export(&self) -> Result<String, prometheus::Error> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }
}
