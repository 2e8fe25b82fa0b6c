//! Web application router and middleware setup.

use super::config::WebConfig;
use super::handlers::{self, AppState};
use crate::collector::TransceiverCollector;
use crate::error::Result;
use crate::inspector::HardwareInspector;
use axum::{routing::get, Router};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

/// Create the axum application serving the landing page and the metrics path.
pub fn create_app<I: HardwareInspector>(config: &WebConfig, collector: TransceiverCollector<I>) -> Result<Router> {
    config.validate()?;

    let state = AppState::new(collector, &config.metrics_path);
    let app = Router::new()
        .route("/", get(handlers::index::<I>))
        .route(&config.metrics_path, get(handlers::metrics::<I>))
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
        .with_state(state);

    Ok(app)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collector::CollectorConfig;
    use crate::error::ExporterError;
    use crate::inspector::{Fixture, FixtureInspector};

    fn collector() -> TransceiverCollector<FixtureInspector> {
        TransceiverCollector::new(FixtureInspector::new(Fixture::default()), CollectorConfig::default())
    }

    #[test]
    fn test_create_app() {
        assert!(create_app(&WebConfig::default(), collector()).is_ok());
    }

    #[test]
    fn test_create_app_rejects_bad_metrics_path() {
        let config = WebConfig::default().with_metrics_path("metrics");
        assert!(create_app(&config, collector()).is_err());
    }

    #[test]
    fn test_create_app_rejects_wildcard_paths_without_panicking() {
        for path in ["/*", "/metrics/*x/y", "/metrics/:"] {
            let config = WebConfig::default().with_metrics_path(path);
            let result = std::panic::catch_unwind(|| create_app(&config, collector()));
            let result = result.unwrap_or_else(|_| panic!("create_app panicked for {}", path));
            assert!(matches!(result, Err(ExporterError::Configuration(_))));
        }
    }
}
