//! Turns one interface's hardware record into metric samples.

use super::catalog::{Descriptor, DescriptorCatalog, MeasurementDescriptors};
use super::units::bool_to_f64;
use crate::inspector::{DriverInfo, EepromRecord, FeatureMap, InterfaceRecord, Measurement};
use serde::Serialize;

/// One value of one metric. Produced per scrape and never kept.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricSample {
    pub descriptor: Descriptor,
    pub value: f64,
    /// Positionally matches `descriptor.label_names`
    pub label_values: Vec<String>,
}

impl MetricSample {
    pub fn new(descriptor: Descriptor, value: f64, label_values: Vec<String>) -> Self {
        Self {
            descriptor,
            value,
            label_values,
        }
    }

    pub fn name(&self) -> &'static str {
        self.descriptor.name
    }

    /// Value of the label called `name`, if the descriptor has one.
    pub fn label(&self, name: &str) -> Option<&str> {
        self.descriptor
            .label_names
            .iter()
            .position(|label| *label == name)
            .and_then(|idx| self.label_values.get(idx))
            .map(String::as_str)
    }
}

/// Emits samples for interface records against a [`DescriptorCatalog`].
///
/// Readings that failed are skipped silently; nothing in here can fail.
#[derive(Debug, Clone, Copy)]
pub struct MetricEmitter<'a> {
    catalog: &'a DescriptorCatalog,
}

impl<'a> MetricEmitter<'a> {
    pub fn new(catalog: &'a DescriptorCatalog) -> Self {
        Self { catalog }
    }

    /// All samples for one interface record.
    pub fn emit(&self, record: &InterfaceRecord) -> Vec<MetricSample> {
        let mut out = Vec::new();
        self.emit_into(record, &mut out);
        out
    }

    /// Append the samples for `record` to `out`.
    pub fn emit_into(&self, record: &InterfaceRecord, out: &mut Vec<MetricSample>) {
        if let Ok(features) = &record.features {
            self.emit_features(&record.name, features, out);
        }
        if let Some(driver_info) = &record.driver_info {
            self.emit_driver_info(&record.name, driver_info, out);
        }
        if let Some(eeprom) = &record.eeprom {
            self.emit_eeprom(&record.name, eeprom, out);
        }
    }

    /// Feature samples; nothing when the catalog was built without features.
    pub fn emit_features(&self, iface: &str, features: &FeatureMap, out: &mut Vec<MetricSample>) {
        let Some(descriptors) = &self.catalog.features else {
            return;
        };
        for (name, status) in features {
            push(out, descriptors.available, bool_to_f64(status.available), &[iface, name.as_str()]);
            push(out, descriptors.active, bool_to_f64(status.active), &[iface, name.as_str()]);
        }
    }

    /// Info samples for the driver facts that are known.
    pub fn emit_driver_info(&self, iface: &str, info: &DriverInfo, out: &mut Vec<MetricSample>) {
        let d = &self.catalog.driver;
        push(out, d.driver_name, 1.0, &[iface, info.driver_name.as_str()]);

        let optional = [
            (d.driver_version, &info.driver_version),
            (d.firmware_version, &info.firmware_version),
            (d.bus_info, &info.bus_info),
            (d.expansion_rom_version, &info.expansion_rom_version),
        ];
        for (descriptor, value) in optional {
            if let Some(value) = value {
                push(out, descriptor, 1.0, &[iface, value.as_str()]);
            }
        }
    }

    pub fn emit_eeprom(&self, iface: &str, rom: &EepromRecord, out: &mut Vec<MetricSample>) {
        let d = &self.catalog.eeprom;
        let labels = [iface];

        push(out, d.identifier, 1.0, &[iface, rom.identifier.as_str()]);
        push(out, d.encoding, 1.0, &[iface, rom.encoding.as_str()]);
        push(out, d.power_class, f64::from(rom.power_class.class), &labels);
        push(out, d.power_class_watts, rom.power_class.max_power_watts, &labels);
        push(out, d.signaling_rate, rom.signaling_rate, &labels);
        for (media, meters) in &rom.supported_link_lengths {
            push(out, d.supported_link_length, *meters, &[iface, media.as_str()]);
        }
        push(out, d.vendor_name, 1.0, &[iface, rom.vendor_name.as_str()]);
        push(out, d.vendor_part_number, 1.0, &[iface, rom.vendor_part_number.as_str()]);
        push(out, d.vendor_revision, 1.0, &[iface, rom.vendor_revision.as_str()]);
        push(out, d.vendor_serial_number, 1.0, &[iface, rom.vendor_serial_number.as_str()]);
        push(out, d.vendor_oui, 1.0, &[iface, rom.vendor_oui.as_str()]);
        push(out, d.date_code, rom.date_code.timestamp() as f64, &labels);
        push(out, d.wavelength, rom.wavelength, &labels);
        push(out, d.supports_monitoring, bool_to_f64(rom.supports_monitoring()), &labels);

        let Some(monitoring) = &rom.monitoring else {
            return;
        };

        if let Ok(temperature) = &monitoring.temperature {
            emit_measurement(out, &self.catalog.module_temperature, temperature, &labels, |v| v);
        }
        if let Ok(voltage) = &monitoring.voltage {
            emit_measurement(out, &self.catalog.module_voltage, voltage, &labels, |v| v);
        }

        let light_levels = &self.catalog.light_levels;
        for (index, laser) in monitoring.lasers.iter().enumerate() {
            let Some(lane) = &laser.monitoring else {
                continue;
            };
            let index = index.to_string();
            let labels = [iface, index.as_str()];

            if let Ok(bias) = &lane.bias {
                emit_measurement(out, &self.catalog.laser_bias, bias, &labels, |v| v);
            }
            if let Ok(tx_power) = &lane.tx_power {
                emit_measurement(out, light_levels.tx(), tx_power, &labels, |mw| {
                    light_levels.convert(mw)
                });
            }
            if let Ok(rx_power) = &lane.rx_power {
                emit_measurement(out, light_levels.rx(), rx_power, &labels, |mw| {
                    light_levels.convert(mw)
                });
            }
        }
    }
}

/// Value and threshold-support samples, plus the four thresholds when they
/// are supported and readable. `convert` applies to the value and thresholds.
fn emit_measurement(
    out: &mut Vec<MetricSample>,
    descriptors: &MeasurementDescriptors,
    measurement: &Measurement,
    labels: &[&str],
    convert: impl Fn(f64) -> f64,
) {
    push(out, descriptors.value, convert(measurement.value), labels);
    push(
        out,
        descriptors.supports_thresholds,
        bool_to_f64(measurement.supports_thresholds()),
        labels,
    );

    if let Some(Ok(thresholds)) = &measurement.thresholds {
        push(out, descriptors.high_alarm, convert(thresholds.high_alarm), labels);
        push(out, descriptors.high_warning, convert(thresholds.high_warning), labels);
        push(out, descriptors.low_alarm, convert(thresholds.low_alarm), labels);
        push(out, descriptors.low_warning, convert(thresholds.low_warning), labels);
    }
}

fn push(out: &mut Vec<MetricSample>, descriptor: Descriptor, value: f64, labels: &[&str]) {
    out.push(MetricSample::new(
        descriptor,
        value,
        labels.iter().map(|label| label.to_string()).collect(),
    ));
}
