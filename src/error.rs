//! Error handling for the transceiver exporter.

/// A specialized `Result` type for exporter operations.
pub type Result<T> = std::result::Result<T, ExporterError>;

/// The main error type for the exporter.
///
/// Only [`ExporterError::Configuration`], [`ExporterError::InspectorInit`] and
/// [`ExporterError::ScrapeAborted`] end a scrape. Interface query errors are
/// reported on the scrape's error channel and the sweep carries on.
#[derive(Debug, thiserror::Error)]
pub enum ExporterError {
    /// Invalid or contradictory configuration
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The hardware inspector could not be opened
    #[error("Could not open hardware inspector: {0}")]
    InspectorInit(String),

    /// Reading one interface failed
    #[error("Error fetching information for interface {interface}: {reason}")]
    InterfaceQuery { interface: String, reason: String },

    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Fixture document could not be parsed
    #[error("Invalid fixture document: {0}")]
    Fixture(#[from] serde_json::Error),

    /// Samples could not be encoded for the transport
    #[error("Exposition error: {0}")]
    Exposition(String),

    /// Web server error
    #[error("Web server error: {0}")]
    WebServer(String),

    /// The scrape worker stopped without reporting completion
    #[error("Scrape worker terminated before completing")]
    ScrapeAborted,
}

impl ExporterError {
    /// Create a new configuration error
    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Create a new inspector initialization error
    pub fn inspector_init_error(msg: impl Into<String>) -> Self {
        Self::InspectorInit(msg.into())
    }

    /// Create a new per-interface query error
    pub fn interface_query_error(interface: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InterfaceQuery {
            interface: interface.into(),
            reason: reason.into(),
        }
    }

    /// Create a new exposition error
    pub fn exposition_error(msg: impl Into<String>) -> Self {
        Self::Exposition(msg.into())
    }

    /// Create a new web server error
    pub fn web_server_error(msg: impl Into<String>) -> Self {
        Self::WebServer(msg.into())
    }

    /// Whether this error ends the whole scrape rather than one interface.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Self::InterfaceQuery { .. })
    }
}

impl From<prometheus::Error> for ExporterError {
    fn from(err: prometheus::Error) -> Self {
        Self::Exposition(err.to_string())
    }
}
