//! Web server configuration.

use crate::error::{ExporterError, Result};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;

/// Configuration for the web server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebConfig {
    /// Address to listen on, e.g. `[::]:9458`
    pub listen_address: String,
    /// Path under which metrics are exposed
    pub metrics_path: String,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            listen_address: crate::DEFAULT_LISTEN_ADDRESS.to_string(),
            metrics_path: crate::DEFAULT_METRICS_PATH.to_string(),
        }
    }
}

impl WebConfig {
    /// Create a new web configuration with a custom listen address and metrics path.
    pub fn new(listen_address: impl Into<String>, metrics_path: impl Into<String>) -> Self {
        Self {
            listen_address: listen_address.into(),
            metrics_path: metrics_path.into(),
        }
    }

    /// Set the listen address for the web server.
    pub fn with_listen_address(mut self, listen_address: impl Into<String>) -> Self {
        self.listen_address = listen_address.into();
        self
    }

    /// Set the metrics path.
    pub fn with_metrics_path(mut self, metrics_path: impl Into<String>) -> Self {
        self.metrics_path = metrics_path.into();
        self
    }

    /// Parse the listen address.
    pub fn bind_address(&self) -> Result<SocketAddr> {
        self.listen_address
            .parse()
            .map_err(|e| ExporterError::config_error(format!("Invalid listen address {}: {}", self.listen_address, e)))
    }

    /// Check that the metrics path can be routed.
    pub fn validate(&self) -> Result<()> {
        if !self.metrics_path.starts_with('/') {
            return Err(ExporterError::config_error(format!(
                "Metrics path must start with '/': {}",
                self.metrics_path
            )));
        }
        if self.metrics_path == "/" {
            return Err(ExporterError::config_error("Metrics path cannot be the index page"));
        }
        // ':' and '*' start route parameters and wildcards.
        if self.metrics_path.contains([':', '*']) {
            return Err(ExporterError::config_error(format!(
                "Metrics path must be a literal path without ':' or '*': {}",
                self.metrics_path
            )));
        }
        self.bind_address().map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_binds_all_addresses() {
        let config = WebConfig::default();
        let addr = config.bind_address().unwrap();
        assert!(addr.ip().is_unspecified());
        assert_eq!(addr.port(), 9458);
        assert_eq!(config.metrics_path, "/metrics");
    }

    #[test]
    fn test_invalid_listen_address() {
        let config = WebConfig::default().with_listen_address("localhost");
        assert!(matches!(config.bind_address(), Err(ExporterError::Configuration(_))));
    }

    #[test]
    fn test_validate_metrics_path() {
        assert!(WebConfig::default().validate().is_ok());
        assert!(WebConfig::default().with_metrics_path("metrics").validate().is_err());
        assert!(WebConfig::default().with_metrics_path("/").validate().is_err());
        assert!(WebConfig::default().with_metrics_path("/transceiver/metrics").validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_route_syntax() {
        for path in ["/*", "/metrics/*x/y", "/*rest", "/:", "/metrics/:id", "/a:b"] {
            let result = WebConfig::default().with_metrics_path(path).validate();
            assert!(matches!(result, Err(ExporterError::Configuration(_))), "{} accepted", path);
        }
    }
}
