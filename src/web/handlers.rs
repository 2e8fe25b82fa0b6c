//! HTTP handlers for the exporter endpoints.

use super::exposition::encode_text;
use crate::collector::TransceiverCollector;
use crate::inspector::HardwareInspector;
use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
};
use std::sync::Arc;
use tracing::{debug, error};

/// Shared state of the web application.
pub struct AppState<I> {
    pub collector: TransceiverCollector<I>,
    index_html: Arc<str>,
}

impl<I> Clone for AppState<I> {
    fn clone(&self) -> Self {
        Self {
            collector: self.collector.clone(),
            index_html: Arc::clone(&self.index_html),
        }
    }
}

impl<I: HardwareInspector> AppState<I> {
    pub fn new(collector: TransceiverCollector<I>, metrics_path: &str) -> Self {
        Self {
            collector,
            index_html: index_page(metrics_path).into(),
        }
    }
}

/// Run one scrape and return it in the Prometheus text format.
///
/// Interface errors only shrink the output; anything fatal becomes a 500.
pub async fn metrics<I: HardwareInspector>(State(state): State<AppState<I>>) -> Response {
    let collector = &state.collector;

    let report = match collector.scrape().await {
        Ok(report) => report,
        Err(e) => {
            error!("Scrape failed: {}", e);
            return (StatusCode::INTERNAL_SERVER_ERROR, format!("{}\n", e)).into_response();
        }
    };
    debug!(
        "Scrape finished with {} samples and {} interface errors",
        report.samples.len(),
        report.errors.len()
    );

    match encode_text(&collector.describe(), &report.samples) {
        Ok(body) => ([(header::CONTENT_TYPE, prometheus::TEXT_FORMAT)], body).into_response(),
        Err(e) => {
            error!("Failed to encode metrics: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, format!("{}\n", e)).into_response()
        }
    }
}

/// Landing page linking to the metrics path.
pub async fn index<I: HardwareInspector>(State(state): State<AppState<I>>) -> Html<String> {
    Html(state.index_html.to_string())
}

fn index_page(metrics_path: &str) -> String {
    format!(
        r#"<html>
<head><title>Transceiver Exporter</title></head>
<body>
<h1>Transceiver Exporter</h1>
<p>Version {}</p>
<p><a href="{}">Metrics</a></p>
</body>
</html>
"#,
        env!("CARGO_PKG_VERSION"),
        metrics_path
    )
}
