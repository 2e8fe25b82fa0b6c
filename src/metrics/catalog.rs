//! Metric descriptors: the name, help text and label schema of every fact the
//! exporter can report.
//!
//! A [`DescriptorCatalog`] is built once from the collector configuration and
//! then shared read-only by every scrape. Optical power descriptors exist for
//! exactly one unit per catalog.

use super::units::milliwatts_to_dbm;
use serde::{Deserialize, Serialize};

/// Prefix shared by all metric names.
pub const PREFIX: &str = "transceiver_";

const INTERFACE_LABELS: &[&str] = &["interface"];
const LASER_LABELS: &[&str] = &["interface", "laser_index"];

/// Static identity of a metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Descriptor {
    /// Stable semantic key, e.g. `laser_tx_power`
    pub key: &'static str,
    /// Full metric name
    pub name: &'static str,
    pub help: &'static str,
    pub label_names: &'static [&'static str],
}

macro_rules! descriptor {
    ($key:literal, $suffix:literal, $help:literal, $labels:expr) => {
        Descriptor {
            key: $key,
            name: concat!("transceiver_", $suffix),
            help: $help,
            label_names: $labels,
        }
    };
}

/// Unit used for laser tx/rx optical power.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PowerUnit {
    #[default]
    Milliwatts,
    Dbm,
}

impl PowerUnit {
    pub fn from_dbm_flag(dbm: bool) -> Self {
        if dbm {
            Self::Dbm
        } else {
            Self::Milliwatts
        }
    }
}

/// Descriptors for a value with optional alarm/warning thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MeasurementDescriptors {
    pub value: Descriptor,
    pub supports_thresholds: Descriptor,
    pub high_alarm: Descriptor,
    pub high_warning: Descriptor,
    pub low_alarm: Descriptor,
    pub low_warning: Descriptor,
}

impl MeasurementDescriptors {
    pub fn all(&self) -> [Descriptor; 6] {
        [
            self.value,
            self.supports_thresholds,
            self.high_alarm,
            self.high_warning,
            self.low_alarm,
            self.low_warning,
        ]
    }
}

/// Driver information, each encoded as an `_info` metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DriverDescriptors {
    pub driver_name: Descriptor,
    pub driver_version: Descriptor,
    pub firmware_version: Descriptor,
    pub bus_info: Descriptor,
    pub expansion_rom_version: Descriptor,
}

impl DriverDescriptors {
    pub fn all(&self) -> [Descriptor; 5] {
        [
            self.driver_name,
            self.driver_version,
            self.firmware_version,
            self.bus_info,
            self.expansion_rom_version,
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeatureDescriptors {
    pub available: Descriptor,
    pub active: Descriptor,
}

/// Module identity and capability descriptors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EepromDescriptors {
    pub identifier: Descriptor,
    pub encoding: Descriptor,
    pub power_class: Descriptor,
    pub power_class_watts: Descriptor,
    pub signaling_rate: Descriptor,
    pub supported_link_length: Descriptor,
    pub vendor_name: Descriptor,
    pub vendor_part_number: Descriptor,
    pub vendor_revision: Descriptor,
    pub vendor_serial_number: Descriptor,
    pub vendor_oui: Descriptor,
    pub date_code: Descriptor,
    pub wavelength: Descriptor,
    pub supports_monitoring: Descriptor,
}

impl EepromDescriptors {
    pub fn all(&self) -> [Descriptor; 14] {
        [
            self.identifier,
            self.encoding,
            self.power_class,
            self.power_class_watts,
            self.signaling_rate,
            self.supported_link_length,
            self.vendor_name,
            self.vendor_part_number,
            self.vendor_revision,
            self.vendor_serial_number,
            self.vendor_oui,
            self.date_code,
            self.wavelength,
            self.supports_monitoring,
        ]
    }
}

/// Laser tx/rx power descriptors for the one unit the catalog was built with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LightLevelDescriptors {
    Milliwatts {
        tx: MeasurementDescriptors,
        rx: MeasurementDescriptors,
    },
    Dbm {
        tx: MeasurementDescriptors,
        rx: MeasurementDescriptors,
    },
}

impl LightLevelDescriptors {
    fn for_unit(unit: PowerUnit) -> Self {
        match unit {
            PowerUnit::Milliwatts => Self::Milliwatts {
                tx: LASER_TX_POWER_MILLIWATTS,
                rx: LASER_RX_POWER_MILLIWATTS,
            },
            PowerUnit::Dbm => Self::Dbm {
                tx: LASER_TX_POWER_DBM,
                rx: LASER_RX_POWER_DBM,
            },
        }
    }

    pub fn unit(&self) -> PowerUnit {
        match self {
            Self::Milliwatts { .. } => PowerUnit::Milliwatts,
            Self::Dbm { .. } => PowerUnit::Dbm,
        }
    }

    pub fn tx(&self) -> &MeasurementDescriptors {
        match self {
            Self::Milliwatts { tx, .. } | Self::Dbm { tx, .. } => tx,
        }
    }

    pub fn rx(&self) -> &MeasurementDescriptors {
        match self {
            Self::Milliwatts { rx, .. } | Self::Dbm { rx, .. } => rx,
        }
    }

    /// Convert a native milliwatt reading into this catalog's unit.
    pub fn convert(&self, mw: f64) -> f64 {
        match self {
            Self::Milliwatts { .. } => mw,
            Self::Dbm { .. } => milliwatts_to_dbm(mw),
        }
    }
}

/// The immutable set of descriptors a collector reports against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DescriptorCatalog {
    pub driver: DriverDescriptors,
    pub features: Option<FeatureDescriptors>,
    pub eeprom: EepromDescriptors,
    pub module_temperature: MeasurementDescriptors,
    pub module_voltage: MeasurementDescriptors,
    pub laser_supports_monitoring: Descriptor,
    pub laser_bias: MeasurementDescriptors,
    pub light_levels: LightLevelDescriptors,
}

impl DescriptorCatalog {
    /// Build the catalog for the given feature switch and power unit.
    pub fn new(collect_interface_features: bool, power_unit: PowerUnit) -> Self {
        Self {
            driver: DRIVER,
            features: collect_interface_features.then_some(FEATURES),
            eeprom: EEPROM,
            module_temperature: MODULE_TEMPERATURE,
            module_voltage: MODULE_VOLTAGE,
            laser_supports_monitoring: LASER_SUPPORTS_MONITORING,
            laser_bias: LASER_BIAS,
            light_levels: LightLevelDescriptors::for_unit(power_unit),
        }
    }

    pub fn power_unit(&self) -> PowerUnit {
        self.light_levels.unit()
    }

    /// Every descriptor this catalog was built with, in a fixed order.
    pub fn describe(&self) -> Vec<Descriptor> {
        let mut descriptors = Vec::with_capacity(64);
        descriptors.extend(self.driver.all());
        if let Some(features) = &self.features {
            descriptors.push(features.available);
            descriptors.push(features.active);
        }
        descriptors.extend(self.eeprom.all());
        descriptors.extend(self.module_temperature.all());
        descriptors.extend(self.module_voltage.all());
        descriptors.push(self.laser_supports_monitoring);
        descriptors.extend(self.laser_bias.all());
        descriptors.extend(self.light_levels.tx().all());
        descriptors.extend(self.light_levels.rx().all());
        descriptors
    }

    /// Look up a descriptor by its full metric name.
    pub fn find(&self, name: &str) -> Option<Descriptor> {
        self.describe().into_iter().find(|d| d.name == name)
    }
}

const DRIVER: DriverDescriptors = DriverDescriptors {
    driver_name: descriptor!("driver_name", "driver_name_info", "Driver name", &["interface", "driver_name"]),
    driver_version: descriptor!("driver_version", "driver_version_info", "Driver version", &["interface", "driver_version"]),
    firmware_version: descriptor!("firmware_version", "firmware_version_info", "Firmware version", &["interface", "firmware_version"]),
    bus_info: descriptor!("bus_info", "bus_info", "Bus information", &["interface", "bus_information"]),
    expansion_rom_version: descriptor!("expansion_rom_version", "expansion_rom_version_info", "Expansion ROM Version", &["interface", "expansion_rom_version"]),
};

const FEATURES: FeatureDescriptors = FeatureDescriptors {
    available: descriptor!(
        "interface_feature_available",
        "interface_feature_available",
        "Interfaces features as reported by interface driver. 1 if available.",
        &["interface", "feature_name"]
    ),
    active: descriptor!(
        "interface_feature_active",
        "interface_feature_active",
        "Interfaces features as reported by interface driver. 1 if active.",
        &["interface", "feature_name"]
    ),
};

const EEPROM: EepromDescriptors = EepromDescriptors {
    identifier: descriptor!("identifier", "identifier_info", "Type of transceiver information", &["interface", "identifier"]),
    encoding: descriptor!("encoding", "encoding_info", "Transceiver encoding information", &["interface", "encoding"]),
    power_class: descriptor!("power_class", "powerclass_info", "Highest power class supported by the transceiver", INTERFACE_LABELS),
    power_class_watts: descriptor!("power_class_watts", "powerclass_watts", "Maximum wattage supported by the transceivers power class", INTERFACE_LABELS),
    signaling_rate: descriptor!("signaling_rate", "signalingrate_bauds_per_second", "Signaling rate in bauds per second supported by the transceiver", INTERFACE_LABELS),
    supported_link_length: descriptor!("supported_link_length", "supported_link_length_meter", "Maximum supported link length for different media in meters", &["interface", "media"]),
    vendor_name: descriptor!("vendor_name", "vendor_name_info", "Vendor name", &["interface", "vendor_name"]),
    vendor_part_number: descriptor!("vendor_part_number", "vendor_part_number_info", "Vendor part number", &["interface", "vendor_part_number"]),
    vendor_revision: descriptor!("vendor_revision", "vendor_revision_info", "Vendor revision", &["interface", "vendor_revision"]),
    vendor_serial_number: descriptor!("vendor_serial_number", "vendor_serial_number_info", "Vendor serial number", &["interface", "vendor_serial_number"]),
    vendor_oui: descriptor!("vendor_oui", "vendor_oui_info", "Vendor IEEE company ID", &["interface", "vendor_oui"]),
    date_code: descriptor!("date_code", "date_code_unix_time", "Vendor supplied date code exported as unix epoch", INTERFACE_LABELS),
    wavelength: descriptor!("wavelength", "wavelength_nanometer", "Wavelength in nanometers", INTERFACE_LABELS),
    supports_monitoring: descriptor!("module_supports_monitoring", "module_supports_monitoring_bool", "1 if the module supports real time monitoring", INTERFACE_LABELS),
};

const MODULE_TEMPERATURE: MeasurementDescriptors = MeasurementDescriptors {
    value: descriptor!("module_temperature", "module_temperature_degrees_celsius", "Module temperature in degrees celsius", INTERFACE_LABELS),
    supports_thresholds: descriptor!("module_temperature_supports_thresholds", "module_temperature_supports_thresholds_bool", "1 if thresholds for module temperature are supported", INTERFACE_LABELS),
    high_alarm: descriptor!("module_temperature_high_alarm", "module_temperature_high_alarm_threshold_degrees_celsius", "High alarm threshold for the module temperature in degrees celsius", INTERFACE_LABELS),
    high_warning: descriptor!("module_temperature_high_warning", "module_temperature_high_warning_threshold_degrees_celsius", "High warning threshold for the module temperature in degrees celsius", INTERFACE_LABELS),
    low_alarm: descriptor!("module_temperature_low_alarm", "module_temperature_low_alarm_threshold_degrees_celsius", "Low alarm threshold for the module temperature in degrees celsius", INTERFACE_LABELS),
    low_warning: descriptor!("module_temperature_low_warning", "module_temperature_low_warning_threshold_degrees_celsius", "Low warning threshold for the module temperature in degrees celsius", INTERFACE_LABELS),
};

// Threshold names end in `_voltage`, not `_volts`; existing dashboards rely on them.
const MODULE_VOLTAGE: MeasurementDescriptors = MeasurementDescriptors {
    value: descriptor!("module_voltage", "module_voltage_volts", "Module supply voltage in Volts", INTERFACE_LABELS),
    supports_thresholds: descriptor!("module_voltage_supports_thresholds", "module_voltage_supports_thresholds_bool", "1 if thresholds for module voltage are supported", INTERFACE_LABELS),
    high_alarm: descriptor!("module_voltage_high_alarm", "module_voltage_high_alarm_threshold_voltage", "High alarm threshold for the module voltage in volts", INTERFACE_LABELS),
    high_warning: descriptor!("module_voltage_high_warning", "module_voltage_high_warning_threshold_voltage", "High warning threshold for the module voltage in volts", INTERFACE_LABELS),
    low_alarm: descriptor!("module_voltage_low_alarm", "module_voltage_low_alarm_threshold_voltage", "Low alarm threshold for the module voltage in volts", INTERFACE_LABELS),
    low_warning: descriptor!("module_voltage_low_warning", "module_voltage_low_warning_threshold_voltage", "Low warning threshold for the module voltage in volts", INTERFACE_LABELS),
};

const LASER_SUPPORTS_MONITORING: Descriptor = descriptor!(
    "laser_supports_monitoring",
    "laser_supports_monitoring_bool",
    "1 if the laser supports real time monitoring",
    LASER_LABELS
);

const LASER_BIAS: MeasurementDescriptors = MeasurementDescriptors {
    value: descriptor!("laser_bias", "laser_bias_current_milliamperes", "Laser bias current in milliamperes", LASER_LABELS),
    supports_thresholds: descriptor!("laser_bias_supports_thresholds", "laser_bias_current_supports_thresholds_bool", "1 if thresholds for the laser bias current are supported", LASER_LABELS),
    high_alarm: descriptor!("laser_bias_high_alarm", "laser_bias_current_high_alarm_threshold_milliamperes", "High alarm threshold for the laser bias current in milliamperes", LASER_LABELS),
    high_warning: descriptor!("laser_bias_high_warning", "laser_bias_current_high_warning_threshold_milliamperes", "High warning threshold for the laser bias current in milliamperes", LASER_LABELS),
    low_alarm: descriptor!("laser_bias_low_alarm", "laser_bias_current_low_alarm_threshold_milliamperes", "Low alarm threshold for the laser bias current in milliamperes", LASER_LABELS),
    low_warning: descriptor!("laser_bias_low_warning", "laser_bias_current_low_warning_threshold_milliamperes", "Low warning threshold for the laser bias current in milliamperes", LASER_LABELS),
};

const LASER_TX_POWER_SUPPORTS_THRESHOLDS: Descriptor = descriptor!(
    "laser_tx_power_supports_thresholds",
    "laser_tx_power_supports_thresholds_bool",
    "1 if thresholds for the laser tx power are supported",
    LASER_LABELS
);

const LASER_RX_POWER_SUPPORTS_THRESHOLDS: Descriptor = descriptor!(
    "laser_rx_power_supports_thresholds",
    "laser_rx_power_supports_thresholds_bool",
    "1 if thresholds for the laser rx power are supported",
    LASER_LABELS
);

const LASER_TX_POWER_MILLIWATTS: MeasurementDescriptors = MeasurementDescriptors {
    value: descriptor!("laser_tx_power", "laser_tx_power_milliwatts", "Laser tx power in milliwatts", LASER_LABELS),
    supports_thresholds: LASER_TX_POWER_SUPPORTS_THRESHOLDS,
    high_alarm: descriptor!("laser_tx_power_high_alarm", "laser_tx_power_high_alarm_threshold_milliwatts", "High alarm threshold for the laser tx power in milliwatts", LASER_LABELS),
    high_warning: descriptor!("laser_tx_power_high_warning", "laser_tx_power_high_warning_threshold_milliwatts", "High warning threshold for the laser tx power in milliwatts", LASER_LABELS),
    low_alarm: descriptor!("laser_tx_power_low_alarm", "laser_tx_power_low_alarm_threshold_milliwatts", "Low alarm threshold for the laser tx power in milliwatts", LASER_LABELS),
    low_warning: descriptor!("laser_tx_power_low_warning", "laser_tx_power_low_warning_threshold_milliwatts", "Low warning threshold for the laser tx power in milliwatts", LASER_LABELS),
};

const LASER_RX_POWER_MILLIWATTS: MeasurementDescriptors = MeasurementDescriptors {
    value: descriptor!("laser_rx_power", "laser_rx_power_milliwatts", "Laser rx power in milliwatts", LASER_LABELS),
    supports_thresholds: LASER_RX_POWER_SUPPORTS_THRESHOLDS,
    high_alarm: descriptor!("laser_rx_power_high_alarm", "laser_rx_power_high_alarm_threshold_milliwatts", "High alarm threshold for the laser rx power in milliwatts", LASER_LABELS),
    high_warning: descriptor!("laser_rx_power_high_warning", "laser_rx_power_high_warning_threshold_milliwatts", "High warning threshold for the laser rx power in milliwatts", LASER_LABELS),
    low_alarm: descriptor!("laser_rx_power_low_alarm", "laser_rx_power_low_alarm_threshold_milliwatts", "Low alarm threshold for the laser rx power in milliwatts", LASER_LABELS),
    low_warning: descriptor!("laser_rx_power_low_warning", "laser_rx_power_low_warning_threshold_milliwatts", "Low warning threshold for the laser rx power in milliwatts", LASER_LABELS),
};

const LASER_TX_POWER_DBM: MeasurementDescriptors = MeasurementDescriptors {
    value: descriptor!("laser_tx_power", "laser_tx_power_dbm", "Laser tx power in dBm", LASER_LABELS),
    supports_thresholds: LASER_TX_POWER_SUPPORTS_THRESHOLDS,
    high_alarm: descriptor!("laser_tx_power_high_alarm", "laser_tx_power_high_alarm_threshold_dbm", "High alarm threshold for the laser tx power in dBm", LASER_LABELS),
    high_warning: descriptor!("laser_tx_power_high_warning", "laser_tx_power_high_warning_threshold_dbm", "High warning threshold for the laser tx power in dBm", LASER_LABELS),
    low_alarm: descriptor!("laser_tx_power_low_alarm", "laser_tx_power_low_alarm_threshold_dbm", "Low alarm threshold for the laser tx power in dBm", LASER_LABELS),
    low_warning: descriptor!("laser_tx_power_low_warning", "laser_tx_power_low_warning_threshold_dbm", "Low warning threshold for the laser tx power in dBm", LASER_LABELS),
};

const LASER_RX_POWER_DBM: MeasurementDescriptors = MeasurementDescriptors {
    value: descriptor!("laser_rx_power", "laser_rx_power_dbm", "Laser rx power in dBm", LASER_LABELS),
    supports_thresholds: LASER_RX_POWER_SUPPORTS_THRESHOLDS,
    high_alarm: descriptor!("laser_rx_power_high_alarm", "laser_rx_power_high_alarm_threshold_dbm", "High alarm threshold for the laser rx power in dBm", LASER_LABELS),
    high_warning: descriptor!("laser_rx_power_high_warning", "laser_rx_power_high_warning_threshold_dbm", "High warning threshold for the laser rx power in dBm", LASER_LABELS),
    low_alarm: descriptor!("laser_rx_power_low_alarm", "laser_rx_power_low_alarm_threshold_dbm", "Low alarm threshold for the laser rx power in dBm", LASER_LABELS),
    low_warning: descriptor!("laser_rx_power_low_warning", "laser_rx_power_low_warning_threshold_dbm", "Low warning threshold for the laser rx power in dBm", LASER_LABELS),
};

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_describe_has_unique_prefixed_names() {
        for unit in [PowerUnit::Milliwatts, PowerUnit::Dbm] {
            let catalog = DescriptorCatalog::new(true, unit);
            let descriptors = catalog.describe();
            let names: HashSet<_> = descriptors.iter().map(|d| d.name).collect();
            assert_eq!(names.len(), descriptors.len());
            assert!(descriptors.iter().all(|d| d.name.starts_with(PREFIX)));
            assert!(descriptors.iter().all(|d| d.label_names.first() == Some(&"interface")));
        }
    }

    #[test]
    fn test_descriptor_counts() {
        // driver 5, eeprom 14, temperature 6, voltage 6, laser flag 1, bias 6, tx 6, rx 6
        assert_eq!(DescriptorCatalog::new(false, PowerUnit::Milliwatts).describe().len(), 50);
        assert_eq!(DescriptorCatalog::new(true, PowerUnit::Dbm).describe().len(), 52);
    }

    #[test]
    fn test_power_unit_exclusivity() {
        let dbm = DescriptorCatalog::new(false, PowerUnit::Dbm);
        assert!(dbm.describe().iter().all(|d| !d.name.ends_with("_milliwatts")));
        assert!(dbm.find("transceiver_laser_rx_power_dbm").is_some());
        assert_eq!(dbm.power_unit(), PowerUnit::Dbm);

        let mw = DescriptorCatalog::new(false, PowerUnit::Milliwatts);
        assert!(mw.describe().iter().all(|d| !d.name.ends_with("_dbm")));
        assert!(mw.find("transceiver_laser_tx_power_low_warning_threshold_milliwatts").is_some());
    }

    #[test]
    fn test_feature_descriptors_follow_switch() {
        let without = DescriptorCatalog::new(false, PowerUnit::Milliwatts);
        assert!(without.features.is_none());
        assert!(without.find("transceiver_interface_feature_active").is_none());

        let with = DescriptorCatalog::new(true, PowerUnit::Milliwatts);
        assert!(with.find("transceiver_interface_feature_available").is_some());
    }

    #[test]
    fn test_help_texts_are_spelled_out() {
        let catalog = DescriptorCatalog::new(false, PowerUnit::Milliwatts);
        assert_eq!(catalog.eeprom.vendor_oui.help, "Vendor IEEE company ID");
        assert_eq!(
            catalog.module_voltage.supports_thresholds.help,
            "1 if thresholds for module voltage are supported"
        );
        assert_eq!(catalog.laser_bias.value.help, "Laser bias current in milliamperes");
        // Names are unaffected by help wording
        assert_eq!(catalog.eeprom.vendor_oui.name, "transceiver_vendor_oui_info");
    }

    #[test]
    fn test_light_level_conversion() {
        let dbm = LightLevelDescriptors::for_unit(PowerUnit::Dbm);
        assert_eq!(dbm.convert(1.0), 0.0);
        let mw = LightLevelDescriptors::for_unit(PowerUnit::Milliwatts);
        assert_eq!(mw.convert(0.42), 0.42);
    }
}
