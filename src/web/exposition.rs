//! Prometheus text exposition of scrape results.
//!
//! Every scrape is encoded through a fresh [`Registry`] so that series from
//! interfaces that have since disappeared are never carried over.

use crate::error::{ExporterError, Result};
use crate::metrics::{Descriptor, MetricSample};
use prometheus::{Encoder, GaugeVec, Opts, Registry, TextEncoder};
use std::collections::HashMap;

/// Encode `samples` in the Prometheus text format.
///
/// Families appear in the order of `descriptors`; descriptors without
/// samples are left out. A sample naming a descriptor that is not in
/// `descriptors` fails the whole encoding.
pub fn encode_text(descriptors: &[Descriptor], samples: &[MetricSample]) -> Result<String> {
    let registry = Registry::new();
    let mut families: HashMap<&'static str, GaugeVec> = HashMap::with_capacity(descriptors.len());

    for descriptor in descriptors {
        let gauge = GaugeVec::new(Opts::new(descriptor.name, descriptor.help), descriptor.label_names)?;
        registry.register(Box::new(gauge.clone()))?;
        families.insert(descriptor.name, gauge);
    }

    for sample in samples {
        let gauge = families.get(sample.name()).ok_or_else(|| {
            ExporterError::exposition_error(format!("Sample for undescribed metric {}", sample.name()))
        })?;
        let labels: Vec<&str> = sample.label_values.iter().map(String::as_str).collect();
        gauge.get_metric_with_label_values(&labels)?.set(sample.value);
    }

    let mut buffer = Vec::new();
    TextEncoder::new().encode(&registry.gather(), &mut buffer)?;
    String::from_utf8(buffer).map_err(|e| ExporterError::exposition_error(e.to_string()))
}
