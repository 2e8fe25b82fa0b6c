//! Records produced by a hardware inspector for one interface.
//!
//! Everything in here is created fresh by a live hardware query and dropped
//! once the scrape that asked for it has emitted its samples.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A reading that could not be taken from the hardware.
///
/// These never end a scrape; they only shrink the set of samples produced
/// for the measurement they belong to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[error("{0}")]
pub struct ReadError(pub String);

impl ReadError {
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }
}

/// An interface as enumerated by the operating system.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterfaceHandle {
    /// Interface name (e.g., "eth0", "swp12")
    pub name: String,
    /// Whether this is a loopback device
    #[serde(default)]
    pub is_loopback: bool,
    /// Whether the interface is administratively up
    #[serde(default = "default_true")]
    pub is_up: bool,
}

fn default_true() -> bool {
    true
}

impl InterfaceHandle {
    /// An administratively up, non-loopback interface.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_loopback: false,
            is_up: true,
        }
    }

    pub fn loopback(mut self) -> Self {
        self.is_loopback = true;
        self
    }

    pub fn admin_down(mut self) -> Self {
        self.is_up = false;
        self
    }

    pub fn is_admin_down(&self) -> bool {
        !self.is_up
    }
}

/// Driver details of an interface.
///
/// The driver name is always known when there is a driver at all. The other
/// facts are `None` when the inspector has no way to read them; an empty
/// string is a value the driver itself reported.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriverInfo {
    pub driver_name: String,
    #[serde(default)]
    pub driver_version: Option<String>,
    #[serde(default)]
    pub firmware_version: Option<String>,
    #[serde(default)]
    pub bus_info: Option<String>,
    #[serde(default)]
    pub expansion_rom_version: Option<String>,
}

/// Availability and state of one offload feature.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureStatus {
    pub available: bool,
    pub active: bool,
}

/// Feature name to status, ordered by name.
pub type FeatureMap = BTreeMap<String, FeatureStatus>;

/// The four alarm/warning boundaries of a monitored value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AlarmThresholds {
    pub high_alarm: f64,
    pub high_warning: f64,
    pub low_alarm: f64,
    pub low_warning: f64,
}

/// A single diagnostic reading in its native unit
/// (bias: mA, optical power: mW, temperature: °C, supply: V).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    pub value: f64,
    /// `None` when the module does not support thresholds for this reading.
    /// `Some(Err(_))` when it claims support but the thresholds can't be read.
    #[serde(default)]
    pub thresholds: Option<Result<AlarmThresholds, ReadError>>,
}

impl Measurement {
    /// A reading without threshold support.
    pub fn new(value: f64) -> Self {
        Self {
            value,
            thresholds: None,
        }
    }

    pub fn with_thresholds(mut self, thresholds: AlarmThresholds) -> Self {
        self.thresholds = Some(Ok(thresholds));
        self
    }

    pub fn with_unreadable_thresholds(mut self, err: ReadError) -> Self {
        self.thresholds = Some(Err(err));
        self
    }

    pub fn supports_thresholds(&self) -> bool {
        self.thresholds.is_some()
    }
}

/// Per-lane optical diagnostics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LaserMonitoring {
    pub bias: Result<Measurement, ReadError>,
    pub tx_power: Result<Measurement, ReadError>,
    pub rx_power: Result<Measurement, ReadError>,
}

/// One laser (lane) of a module. Identified only by its position.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Laser {
    #[serde(default)]
    pub monitoring: Option<LaserMonitoring>,
}

impl Laser {
    pub fn supports_monitoring(&self) -> bool {
        self.monitoring.is_some()
    }
}

/// Module-level diagnostics, present only on modules with DOM support.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModuleMonitoring {
    pub temperature: Result<Measurement, ReadError>,
    pub voltage: Result<Measurement, ReadError>,
    #[serde(default)]
    pub lasers: Vec<Laser>,
}

/// Power class of a module and the maximum power it may draw.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PowerClass {
    pub class: u8,
    pub max_power_watts: f64,
}

/// Decoded transceiver EEPROM.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EepromRecord {
    pub identifier: String,
    pub encoding: String,
    pub power_class: PowerClass,
    /// Nominal signaling rate in bauds per second
    pub signaling_rate: f64,
    /// Media name to maximum supported link length in meters
    #[serde(default)]
    pub supported_link_lengths: BTreeMap<String, f64>,
    pub vendor_name: String,
    pub vendor_part_number: String,
    pub vendor_revision: String,
    pub vendor_serial_number: String,
    pub vendor_oui: String,
    pub date_code: DateTime<Utc>,
    /// Nominal wavelength in nanometers
    pub wavelength: f64,
    #[serde(default)]
    pub monitoring: Option<ModuleMonitoring>,
}

impl EepromRecord {
    pub fn supports_monitoring(&self) -> bool {
        self.monitoring.is_some()
    }
}

fn no_features() -> Result<FeatureMap, ReadError> {
    Ok(FeatureMap::new())
}

/// Everything the inspector could find out about one interface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterfaceRecord {
    pub name: String,
    #[serde(default)]
    pub driver_info: Option<DriverInfo>,
    #[serde(default = "no_features")]
    pub features: Result<FeatureMap, ReadError>,
    #[serde(default)]
    pub eeprom: Option<EepromRecord>,
}

impl InterfaceRecord {
    /// A record with nothing but a name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            driver_info: None,
            features: no_features(),
            eeprom: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_measurement_threshold_support() {
        let plain = Measurement::new(3.3);
        assert!(!plain.supports_thresholds());

        let broken = Measurement::new(3.3).with_unreadable_thresholds(ReadError::new("i2c timeout"));
        assert!(broken.supports_thresholds());
    }

    #[test]
    fn test_interface_handle_defaults_from_json() {
        let handle: InterfaceHandle = serde_json::from_str(r#"{"name": "eth0"}"#).unwrap();
        assert_eq!(handle, InterfaceHandle::new("eth0"));
        assert!(!handle.is_admin_down());
    }

    #[test]
    fn test_record_without_features_defaults_to_empty_map() {
        let record: InterfaceRecord = serde_json::from_str(r#"{"name": "swp1"}"#).unwrap();
        assert_eq!(record.features, Ok(FeatureMap::new()));
        assert!(record.eeprom.is_none());
    }
}
