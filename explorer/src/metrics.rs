//! Prometheus metrics for the explorer.
//!
//! [`ExplorerMetrics`] owns a dedicated [`Registry`] that the HTTP API's
//! `/metrics` endpoint encodes into the text exposition format.

use crate::ExplorerError;
use cashscope_types::DiagnosticKind;
use prometheus::{
    register_histogram_with_registry, register_int_counter_vec_with_registry,
    register_int_counter_with_registry, register_int_gauge_with_registry, Encoder, Histogram,
    HistogramOpts, IntCounter, IntCounterVec, IntGauge, Opts, Registry, TextEncoder,
};

pub struct ExplorerMetrics {
    pub registry: Registry,

    // ── Counters ────────────────────────────────────────────────────────
    pub lookups_started: IntCounter,
    /// Lookups that ended without a report.
    pub lookups_failed: IntCounter,
    /// Session lookups discarded because a newer one was submitted.
    pub lookups_superseded: IntCounter,
    /// Indexer queries issued, counting every page.
    pub indexer_pages: IntCounter,
    /// Metadata diagnostics, labelled by kind.
    pub metadata_diagnostics: IntCounterVec,

    // ── Gauges ──────────────────────────────────────────────────────────
    /// Trust registry downloads performed by this process.
    pub trust_registry_fetches: IntGauge,

    // ── Histograms ──────────────────────────────────────────────────────
    pub lookup_latency_ms: Histogram,
}

impl ExplorerMetrics {
    pub fn new() -> Self {
        let registry = Registry::new();

        let lookups_started = register_int_counter_with_registry!(
            Opts::new("cashscope_lookups_started_total", "Token lookups started"),
            registry
        )
        .expect("failed to register lookups_started counter");

        let lookups_failed = register_int_counter_with_registry!(
            Opts::new(
                "cashscope_lookups_failed_total",
                "Token lookups that produced no report"
            ),
            registry
        )
        .expect("failed to register lookups_failed counter");

        let lookups_superseded = register_int_counter_with_registry!(
            Opts::new(
                "cashscope_lookups_superseded_total",
                "Session lookups discarded in favour of a newer one"
            ),
            registry
        )
        .expect("failed to register lookups_superseded counter");

        let indexer_pages = register_int_counter_with_registry!(
            Opts::new(
                "cashscope_indexer_pages_total",
                "Indexer queries issued, one per page"
            ),
            registry
        )
        .expect("failed to register indexer_pages counter");

        let metadata_diagnostics = register_int_counter_vec_with_registry!(
            Opts::new(
                "cashscope_metadata_diagnostics_total",
                "Metadata resolution diagnostics by kind"
            ),
            &["kind"],
            registry
        )
        .expect("failed to register metadata_diagnostics counter");

        let trust_registry_fetches = register_int_gauge_with_registry!(
            Opts::new(
                "cashscope_trust_registry_fetches",
                "Trust registry downloads performed"
            ),
            registry
        )
        .expect("failed to register trust_registry_fetches gauge");

        // 10 ms → ~160 s.
        let lookup_latency_ms = register_histogram_with_registry!(
            HistogramOpts::new("cashscope_lookup_latency_ms", "Lookup latency in milliseconds")
                .buckets(
                    prometheus::exponential_buckets(10.0, 2.0, 15)
                        .expect("static bucket layout is valid")
                ),
            registry
        )
        .expect("failed to register lookup_latency_ms histogram");

        Self {
            registry,
            lookups_started,
            lookups_failed,
            lookups_superseded,
            indexer_pages,
            metadata_diagnostics,
            trust_registry_fetches,
            lookup_latency_ms,
        }
    }

    pub fn record_diagnostic(&self, kind: DiagnosticKind) {
        self.metadata_diagnostics
            .with_label_values(&[kind.as_str()])
            .inc();
    }

    /// Text exposition of every metric.
    pub fn encode(&self) -> Result<String, ExplorerError> {
        let mut buffer = Vec::new();
        TextEncoder::new()
            .encode(&self.registry.gather(), &mut buffer)
            .map_err(|e| ExplorerError::Metrics(e.to_string()))?;
        String::from_utf8(buffer).map_err(|e| ExplorerError::Metrics(e.to_string()))
    }
}

impl Default for ExplorerMetrics {
    fn default() -> Self {
        Self::new()
    }
}
