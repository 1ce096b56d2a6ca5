/*!
 * # Metrics Module
 *
 * In-process metrics for the Wireplant API.
 *
 * Metrics are exposed in the following formats:
 * - Prometheus text format at `/metrics`
 * - JSON format at `/metrics/json`
 */

use axum::{http::header, response::IntoResponse, Json};
use dashmap::DashMap;
use serde_json::json;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use thiserror::Error;
use tokio::time::Duration;

#[derive(Debug, Error)]
pub enum MetricsError {
    #[error("Failed to export metrics: {0}")]
    ExportError(String),
}

impl IntoResponse for MetricsError {
    fn into_response(self) -> axum::response::Response {
        tracing::error!(error = %self, "metrics export failed");
        (
            axum::http::StatusCode::INTERNAL_SERVER_ERROR,
            crate::errors::SERVER_ERROR_MESSAGE,
        )
            .into_response()
    }
}

#[derive(Debug, Clone, Default)]
pub struct Counter {
    value: Arc<AtomicU64>,
}

impl Counter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn inc(&self) {
        self.value.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_by(&self, value: u64) {
        self.value.fetch_add(value, Ordering::Relaxed);
    }

    pub fn get(&self) -> u64 {
        self.value.load(Ordering::Relaxed)
    }
}

/// Gauge holding an `f64` as raw bits
#[derive(Debug, Clone, Default)]
pub struct Gauge {
    bits: Arc<AtomicU64>,
}

impl Gauge {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, value: f64) {
        self.bits.store(value.to_bits(), Ordering::Relaxed);
    }

    pub fn get(&self) -> f64 {
        f64::from_bits(self.bits.load(Ordering::Relaxed))
    }
}

#[derive(Debug, Clone, Default)]
pub struct Histogram {
    sum_bits: Arc<AtomicU64>,
    count: Arc<AtomicU64>,
}

impl Histogram {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn observe(&self, value: f64) {
        let _ = self
            .sum_bits
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |bits| {
                Some((f64::from_bits(bits) + value).to_bits())
            });
        self.count.fetch_add(1, Ordering::Relaxed);
    }

    pub fn get_count(&self) -> u64 {
        self.count.load(Ordering::Relaxed)
    }

    pub fn get_sum(&self) -> f64 {
        f64::from_bits(self.sum_bits.load(Ordering::Relaxed))
    }
}

#[derive(Debug, Default)]
pub struct MetricsRegistry {
    counters: DashMap<String, Counter>,
    gauges: DashMap<String, Gauge>,
    histograms: DashMap<String, Histogram>,
}

impl MetricsRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_create_counter(&self, name: &str) -> Counter {
        self.counters
            .entry(name.to_string())
            .or_insert_with(Counter::new)
            .clone()
    }

    pub fn get_or_create_gauge(&self, name: &str) -> Gauge {
        self.gauges
            .entry(name.to_string())
            .or_insert_with(Gauge::new)
            .clone()
    }

    pub fn get_or_create_histogram(&self, name: &str) -> Histogram {
        self.histograms
            .entry(name.to_string())
            .or_insert_with(Histogram::new)
            .clone()
    }

    pub fn export_metrics(&self) -> Result<String, MetricsError> {
        use std::fmt::Write;

        let mut output = String::new();
        let render = |out: &mut String| -> std::fmt::Result {
            for entry in self.counters.iter() {
                let (name, counter) = entry.pair();
                writeln!(out, "# TYPE {} counter", name)?;
                writeln!(out, "{} {}", name, counter.get())?;
            }
            for entry in self.gauges.iter() {
                let (name, gauge) = entry.pair();
                writeln!(out, "# TYPE {} gauge", name)?;
                writeln!(out, "{} {}", name, gauge.get())?;
            }
            for entry in self.histograms.iter() {
                let (name, histogram) = entry.pair();
                writeln!(out, "# TYPE {} histogram", name)?;
                writeln!(out, "{}_count {}", name, histogram.get_count())?;
                writeln!(out, "{}_sum {}", name, histogram.get_sum())?;
            }
            Ok(())
        };
        render(&mut output).map_err(|e| MetricsError::ExportError(e.to_string()))?;

        Ok(output)
    }

    pub fn export_metrics_json(&self) -> serde_json::Value {
        let mut counters = serde_json::Map::new();
        for entry in self.counters.iter() {
            let (name, counter) = entry.pair();
            counters.insert(name.to_string(), json!(counter.get()));
        }

        let mut gauges = serde_json::Map::new();
        for entry in self.gauges.iter() {
            let (name, gauge) = entry.pair();
            gauges.insert(name.to_string(), json!(gauge.get()));
        }

        let mut histograms = serde_json::Map::new();
        for entry in self.histograms.iter() {
            let (name, histogram) = entry.pair();
            histograms.insert(
                name.to_string(),
                json!({
                    "count": histogram.get_count(),
                    "sum": histogram.get_sum(),
                }),
            );
        }

        json!({
            "counters": counters,
            "gauges": gauges,
            "histograms": histograms,
        })
    }
}

// Global metrics registry
lazy_static::lazy_static! {
    pub static ref METRICS: MetricsRegistry = MetricsRegistry::new();
}

pub fn increment_counter(name: &str) {
    METRICS.get_or_create_counter(name).inc();
}

pub fn set_gauge(name: &str, value: f64) {
    METRICS.get_or_create_gauge(name).set(value);
}

// HTTP endpoint-specific metrics
pub struct EndpointMetrics {
    pub requests_total: Counter,
    pub request_duration: Histogram,
    pub status_2xx: Counter,
    pub status_4xx: Counter,
    pub status_5xx: Counter,
}

impl EndpointMetrics {
    pub fn new() -> Self {
        Self {
            requests_total: METRICS.get_or_create_counter("wireplant_http_requests_total"),
            request_duration: METRICS
                .get_or_create_histogram("wireplant_http_request_duration_seconds"),
            status_2xx: METRICS.get_or_create_counter("wireplant_http_status_2xx_total"),
            status_4xx: METRICS.get_or_create_counter("wireplant_http_status_4xx_total"),
            status_5xx: METRICS.get_or_create_counter("wireplant_http_status_5xx_total"),
        }
    }

    pub fn record_request(&self, duration: Duration, status_code: u16) {
        self.requests_total.inc();
        self.request_duration.observe(duration.as_secs_f64());

        match status_code {
            200..=299 => self.status_2xx.inc(),
            400..=499 => self.status_4xx.inc(),
            500..=599 => self.status_5xx.inc(),
            _ => {}
        }
    }
}

/// Counters and gauges fed by the plant-floor services
pub struct PlantMetrics {
    pub production_records_created: Counter,
    pub balance_reports_generated: Counter,
    pub alerts_resolved: Counter,
    pub logins_succeeded: Counter,
    pub logins_failed: Counter,
    pub deficit_items: Gauge,
    pub unresolved_alerts: Gauge,
}

impl PlantMetrics {
    pub fn new() -> Self {
        Self {
            production_records_created: METRICS
                .get_or_create_counter("wireplant_production_records_created_total"),
            balance_reports_generated: METRICS
                .get_or_create_counter("wireplant_balance_reports_total"),
            alerts_resolved: METRICS.get_or_create_counter("wireplant_alerts_resolved_total"),
            logins_succeeded: METRICS.get_or_create_counter("wireplant_auth_success_total"),
            logins_failed: METRICS.get_or_create_counter("wireplant_auth_failures_total"),
            deficit_items: METRICS.get_or_create_gauge("wireplant_deficit_items"),
            unresolved_alerts: METRICS.get_or_create_gauge("wireplant_unresolved_alerts"),
        }
    }
}

lazy_static::lazy_static! {
    pub static ref ENDPOINT_METRICS: EndpointMetrics = EndpointMetrics::new();
    pub static ref PLANT_METRICS: PlantMetrics = PlantMetrics::new();
}

// HTTP endpoint handler for metrics
pub async fn metrics_handler() -> Result<impl IntoResponse, MetricsError> {
    let body = METRICS.export_metrics()?;
    Ok((
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4; charset=utf-8")],
        body,
    ))
}

pub async fn metrics_json_handler() -> Json<serde_json::Value> {
    Json(METRICS.export_metrics_json())
}
