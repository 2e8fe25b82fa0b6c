//! Scrape orchestration.
//!
//! A scrape resolves the interface set, opens the inspector, queries each
//! selected interface in order and emits its samples. Interface failures are
//! reported and skipped; configuration and inspector-open failures end the
//! scrape with no samples.

use super::config::CollectorConfig;
use super::filter::FilterConfig;
use crate::error::{ExporterError, Result};
use crate::inspector::{HardwareInspector, InspectorSession};
use crate::metrics::{Descriptor, DescriptorCatalog, MetricEmitter, MetricSample};
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, error};

/// Result of a scrape that was not aborted.
#[derive(Debug, Default)]
pub struct ScrapeReport {
    pub samples: Vec<MetricSample>,
    /// Per-interface errors; the affected interfaces contributed no samples
    pub errors: Vec<ExporterError>,
}

impl ScrapeReport {
    pub fn is_partial(&self) -> bool {
        !self.errors.is_empty()
    }
}

/// Collects transceiver metrics from a [`HardwareInspector`].
///
/// Cheap to clone; clones share the inspector, configuration and catalog.
pub struct TransceiverCollector<I> {
    inspector: Arc<I>,
    config: Arc<CollectorConfig>,
    catalog: Arc<DescriptorCatalog>,
}

impl<I> Clone for TransceiverCollector<I> {
    fn clone(&self) -> Self {
        Self {
            inspector: Arc::clone(&self.inspector),
            config: Arc::clone(&self.config),
            catalog: Arc::clone(&self.catalog),
        }
    }
}

impl<I: HardwareInspector> TransceiverCollector<I> {
    /// Create a collector and build its descriptor catalog.
    pub fn new(inspector: I, config: CollectorConfig) -> Self {
        let catalog = DescriptorCatalog::new(config.collect_interface_features, config.power_unit);
        Self {
            inspector: Arc::new(inspector),
            config: Arc::new(config),
            catalog: Arc::new(catalog),
        }
    }

    pub fn name(&self) -> &'static str {
        "transceiver-collector"
    }

    pub fn config(&self) -> &CollectorConfig {
        &self.config
    }

    pub fn catalog(&self) -> &DescriptorCatalog {
        &self.catalog
    }

    pub fn inspector(&self) -> &I {
        &self.inspector
    }

    /// Every descriptor samples from this collector can refer to.
    pub fn describe(&self) -> Vec<Descriptor> {
        self.catalog.describe()
    }

    /// Names of the interfaces the next scrape would query.
    pub fn monitored_interfaces(&self) -> Result<Vec<String>> {
        monitored_interfaces(self.inspector.as_ref(), &self.config.filter)
    }

    /// Run a scrape on the calling thread.
    pub fn collect(&self) -> Result<ScrapeReport> {
        let mut errors = Vec::new();
        let samples = sweep(self.inspector.as_ref(), &self.catalog, &self.config.filter, |err| {
            error!("Error while collecting metrics: {}", err);
            errors.push(err);
        })?;
        Ok(ScrapeReport { samples, errors })
    }

    /// Start a scrape on the blocking thread pool.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn_scrape(&self) -> ScrapeHandle {
        let (errors_tx, errors_rx) = mpsc::unbounded_channel();
        let (done_tx, done_rx) = oneshot::channel();

        let inspector = Arc::clone(&self.inspector);
        let catalog = Arc::clone(&self.catalog);
        let config = Arc::clone(&self.config);

        tokio::task::spawn_blocking(move || {
            let outcome = sweep(inspector.as_ref(), &catalog, &config.filter, |err| {
                // The receiver only goes away if the caller stopped waiting.
                let _ = errors_tx.send(err);
            });
            let _ = done_tx.send(outcome);
        });

        ScrapeHandle {
            errors: errors_rx,
            done: done_rx,
        }
    }

    /// Run a scrape on the blocking thread pool and wait for it.
    pub async fn scrape(&self) -> Result<ScrapeReport> {
        self.spawn_scrape().finish().await
    }
}

/// A running scrape.
///
/// Errors for individual interfaces arrive on one channel while the scrape
/// runs; the samples (or the fatal error) arrive once it has concluded.
#[derive(Debug)]
pub struct ScrapeHandle {
    errors: mpsc::UnboundedReceiver<ExporterError>,
    done: oneshot::Receiver<Result<Vec<MetricSample>>>,
}

impl ScrapeHandle {
    /// Drain interface errors until the scrape signals completion.
    ///
    /// A worker that dies without signalling yields [`ExporterError::ScrapeAborted`].
    pub async fn finish(mut self) -> Result<ScrapeReport> {
        let mut errors = Vec::new();

        let outcome = loop {
            tokio::select! {
                biased;
                Some(err) = self.errors.recv() => {
                    error!("Error while collecting metrics: {}", err);
                    errors.push(err);
                }
                outcome = &mut self.done => break outcome,
            }
        };

        while let Ok(err) = self.errors.try_recv() {
            error!("Error while collecting metrics: {}", err);
            errors.push(err);
        }

        let samples = match outcome {
            Ok(result) => result?,
            Err(_) => return Err(ExporterError::ScrapeAborted),
        };
        Ok(ScrapeReport { samples, errors })
    }
}

fn monitored_interfaces<I: HardwareInspector>(inspector: &I, filter: &FilterConfig) -> Result<Vec<String>> {
    // Validate before touching the hardware.
    filter.validate()?;
    let interfaces = inspector.interfaces()?;
    filter.select(&interfaces)
}

fn sweep<I: HardwareInspector>(
    inspector: &I,
    catalog: &DescriptorCatalog,
    filter: &FilterConfig,
    mut report: impl FnMut(ExporterError),
) -> Result<Vec<MetricSample>> {
    let interfaces = monitored_interfaces(inspector, filter)?;
    let mut session = inspector.open()?;
    let emitter = MetricEmitter::new(catalog);

    let mut samples = Vec::new();
    for name in &interfaces {
        match session.query(name) {
            Ok(Some(record)) => emitter.emit_into(&record, &mut samples),
            Ok(None) => debug!("Interface {} vanished before it could be queried", name),
            Err(err @ ExporterError::InterfaceQuery { .. }) => report(err),
            Err(err) => report(ExporterError::interface_query_error(name.as_str(), err.to_string())),
        }
    }

    debug!(
        "Collected {} samples from {} interfaces",
        samples.len(),
        interfaces.len()
    );
    Ok(samples)
}
