use prometheus::{Histogram, HistogramOpts, IntCounter, IntCounterVec, Opts, Registry};

// ============================================================================
// Metrics Module - Prometheus metrics for observability
// ============================================================================
//
// Provides metrics for:
// - Order intake and cancellation throughput
// - Rejected requests, labelled by rejection reason
// - End-to-end request latency per endpoint
//
// All metrics are registered with Prometheus and scraped via /metrics.
// ============================================================================

/// Central metrics registry for the entire application
pub struct Metrics {
    registry: Registry,

    pub orders_created: IntCounter,
    pub orders_cancelled: IntCounter,
    pub order_rejections: IntCounterVec,
    pub request_duration: Histogram,
}

impl Metrics {
    pub fn new() -> anyhow::Result<Self> {
        let registry = Registry::new();

        let orders_created = IntCounter::new(
            "orders_created_total",
            "Total orders accepted by the intake endpoint",
        )?;
        registry.register(Box::new(orders_created.clone()))?;

        let orders_cancelled = IntCounter::new(
            "orders_cancelled_total",
            "Total orders cancelled by their owner",
        )?;
        registry.register(Box::new(orders_cancelled.clone()))?;

        let order_rejections = IntCounterVec::new(
            Opts::new(
                "order_rejections_total",
                "Rejected order operations by reason",
            ),
            &["reason"],
        )?;
        registry.register(Box::new(order_rejections.clone()))?;

        let request_duration = Histogram::with_opts(
            HistogramOpts::new(
                "order_request_duration_seconds",
                "Order endpoint request duration",
            )
            .buckets(vec![0.001, 0.005, 0.01, 0.05, 0.1, 0.5, 1.0, 5.0]),
        )?;
        registry.register(Box::new(request_duration.clone()))?;

        Ok(Self {
            registry,
            orders_created,
            orders_cancelled,
            order_rejections,
            request_duration,
        })
    }

    /// Get the Prometheus registry for exposing metrics via HTTP
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn record_order_created(&self) {
        self.orders_created.inc();
    }

    pub fn record_order_cancelled(&self) {
        self.orders_cancelled.inc();
    }

    pub fn record_rejection(&self, reason: &str) {
        self.order_rejections.with_label_values(&[reason]).inc();
    }

    pub fn observe_request(&self, duration_secs: f64) {
        self.request_duration.observe(duration_secs);
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new().expect("Failed to create metrics")
    }
}
