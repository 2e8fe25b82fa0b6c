//! # Transceiver Exporter
//!
//! A Prometheus exporter for pluggable optical transceivers on Linux hosts
//! and switches. Each scrape enumerates the network interfaces, filters them,
//! reads driver information, feature flags and transceiver EEPROM/DOM data
//! and turns it into gauges.
//!
//! ## Features
//!
//! - **Interface selection**: exclude/include name lists, regular expressions, admin-down filtering
//! - **EEPROM facts**: identifier, encoding, vendor data, link lengths, power class
//! - **Digital optical monitoring**: temperature, voltage, laser bias and light levels with alarm thresholds
//! - **Partial failure tolerance**: one unreadable interface never fails the scrape
//! - **Pluggable hardware access**: sysfs on live hosts, JSON fixtures for tests and replays
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use transceiver_exporter::{start_web_server, CollectorConfig, SysfsInspector, TransceiverCollector, WebConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let collector = TransceiverCollector::new(SysfsInspector::new(), CollectorConfig::default());
//!     start_web_server(WebConfig::default(), collector).await?;
//!     Ok(())
//! }
//! ```

pub mod collector;
pub mod error;
pub mod inspector;
pub mod metrics;
pub mod web;

// Re-export public API
pub use collector::{CollectorConfig, FilterConfig, ScrapeHandle, ScrapeReport, TransceiverCollector};
pub use error::{ExporterError, Result};
pub use inspector::{
    FixtureInspector, HardwareInspector, InspectorSession, InterfaceHandle, InterfaceRecord, SysfsInspector,
};
pub use metrics::{Descriptor, DescriptorCatalog, MetricEmitter, MetricSample, PowerUnit};
pub use web::{create_app, encode_text, start_web_server, WebConfig};

/// The default address the exporter listens on
pub const DEFAULT_LISTEN_ADDRESS: &str = "[::]:9458";

/// The default path metrics are exposed under
pub const DEFAULT_METRICS_PATH: &str = "/metrics";
