//! HTTP transport for the transceiver exporter.
//!
//! Serves a landing page at `/` and one fresh scrape per request on the
//! configured metrics path.

pub mod config;
pub mod exposition;
pub mod handlers;
pub mod router;

// Re-export commonly used items
pub use config::WebConfig;
pub use exposition::encode_text;
pub use router::create_app;

use crate::collector::TransceiverCollector;
use crate::error::{ExporterError, Result};
use crate::inspector::HardwareInspector;
use tracing::info;

/// Bind the listen address and serve until the server fails.
pub async fn start_web_server<I: HardwareInspector>(
    config: WebConfig,
    collector: TransceiverCollector<I>,
) -> Result<()> {
    let app = create_app(&config, collector)?;
    let addr = config.bind_address()?;

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| ExporterError::web_server_error(format!("Failed to bind to {}: {}", addr, e)))?;

    info!("Listening on http://{}", addr);
    info!("Metrics available at http://{}{}", addr, config.metrics_path);

    axum::serve(listener, app)
        .await
        .map_err(|e| ExporterError::web_server_error(format!("Server error: {}", e)))?;

    Ok(())
}
