//! Metric descriptors, unit conversion and sample emission.
//!
//! This module turns interface records from the [`crate::inspector`] into
//! [`MetricSample`]s named after the static [`DescriptorCatalog`].

pub mod catalog;
pub mod emitter;
pub mod units;

// Re-export commonly used items
pub use catalog::{Descriptor, DescriptorCatalog, LightLevelDescriptors, MeasurementDescriptors, PowerUnit};
pub use emitter::{MetricEmitter, MetricSample};
pub use units::milliwatts_to_dbm;
