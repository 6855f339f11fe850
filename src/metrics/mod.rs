use prometheus::{Counter, Encoder, Histogram, HistogramOpts, Opts, Registry, TextEncoder};
use std::sync::Arc;

/// Prometheus metrics for the search service
#[derive(Clone)]
pub struct SearchMetrics {
    pub searches_total: Counter,
    pub search_errors: Counter,
    pub documents_served: Counter,
    pub search_latency: Histogram,

    registry: Arc<Registry>,
}

impl SearchMetrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let searches_total = Counter::with_opts(Opts::new(
            "ferret_searches_total",
            "Total number of search requests",
        ))?;
        registry.register(Box::new(searches_total.clone()))?;

        let search_errors = Counter::with_opts(Opts::new(
            "ferret_search_errors_total",
            "Total number of failed searches",
        ))?;
        registry.register(Box::new(search_errors.clone()))?;

        let documents_served = Counter::with_opts(Opts::new(
            "ferret_documents_served_total",
            "Total number of documents returned by /docs",
        ))?;
        registry.register(Box::new(documents_served.clone()))?;

        let search_latency = Histogram::with_opts(
            HistogramOpts::new("ferret_search_latency_seconds", "Search latency")
                .buckets(vec![0.0001, 0.0005, 0.001, 0.005, 0.01, 0.05, 0.1, 0.5]),
        )?;
        registry.register(Box::new(search_latency.clone()))?;

        Ok(Self {
            searches_total,
            search_errors,
            documents_served,
            search_latency,
            registry: Arc::new(registry),
        })
    }

    /// Render all metrics in the prometheus text format.
    pub fn render(&self) -> String {
        let encoder = TextEncoder::new();
        let mut buf = Vec::new();
        if encoder.encode(&self.registry.gather(), &mut buf).is_err() {
            return String::new();
        }
        String::from_utf8(buf).unwrap_or_default()
    }
}
