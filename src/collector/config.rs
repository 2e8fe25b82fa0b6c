//! Collector configuration.

use super::filter::FilterConfig;
use crate::metrics::PowerUnit;

/// Settings fixed for the lifetime of a collector.
#[derive(Debug, Clone)]
pub struct CollectorConfig {
    /// Which interfaces are scraped
    pub filter: FilterConfig,
    /// Whether per-interface feature flags are exported
    pub collect_interface_features: bool,
    /// Unit for laser optical power
    pub power_unit: PowerUnit,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            filter: FilterConfig::default(),
            collect_interface_features: true,
            power_unit: PowerUnit::Milliwatts,
        }
    }
}

impl CollectorConfig {
    pub fn with_filter(mut self, filter: FilterConfig) -> Self {
        self.filter = filter;
        self
    }

    pub fn with_interface_features(mut self, enabled: bool) -> Self {
        self.collect_interface_features = enabled;
        self
    }

    pub fn with_power_unit(mut self, unit: PowerUnit) -> Self {
        self.power_unit = unit;
        self
    }
}
