//! Inspector backed by a JSON document instead of live hardware.
//!
//! Used for tests, benchmarks and for running the exporter against a captured
//! switch state (`--inspector.fixture`).

use super::data::{DriverInfo, EepromRecord, FeatureMap, InterfaceHandle, InterfaceRecord, ReadError};
use super::{HardwareInspector, InspectorSession};
use crate::error::{ExporterError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;

/// A captured host: its interfaces and what querying each of them returns.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Fixture {
    /// When set, opening the inspector fails with this message
    #[serde(default)]
    pub init_error: Option<String>,
    /// When set, enumerating interfaces fails with this message
    #[serde(default)]
    pub enumeration_error: Option<String>,
    #[serde(default)]
    pub interfaces: Vec<FixtureInterface>,
}

/// One interface of a [`Fixture`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixtureInterface {
    #[serde(flatten)]
    pub handle: InterfaceHandle,
    /// When set, querying this interface fails with this message
    #[serde(default)]
    pub query_error: Option<String>,
    /// Interface vanishes between enumeration and query
    #[serde(default)]
    pub vanished: bool,
    #[serde(default)]
    pub driver_info: Option<DriverInfo>,
    #[serde(default = "empty_features")]
    pub features: std::result::Result<FeatureMap, ReadError>,
    #[serde(default)]
    pub eeprom: Option<EepromRecord>,
}

fn empty_features() -> std::result::Result<FeatureMap, ReadError> {
    Ok(FeatureMap::new())
}

impl FixtureInterface {
    pub fn new(handle: InterfaceHandle) -> Self {
        Self {
            handle,
            query_error: None,
            vanished: false,
            driver_info: None,
            features: empty_features(),
            eeprom: None,
        }
    }

    pub fn with_driver_info(mut self, driver_info: DriverInfo) -> Self {
        self.driver_info = Some(driver_info);
        self
    }

    pub fn with_features(mut self, features: FeatureMap) -> Self {
        self.features = Ok(features);
        self
    }

    pub fn with_eeprom(mut self, eeprom: EepromRecord) -> Self {
        self.eeprom = Some(eeprom);
        self
    }

    pub fn with_query_error(mut self, msg: impl Into<String>) -> Self {
        self.query_error = Some(msg.into());
        self
    }

    pub fn vanished(mut self) -> Self {
        self.vanished = true;
        self
    }

    fn to_record(&self) -> InterfaceRecord {
        InterfaceRecord {
            name: self.handle.name.clone(),
            driver_info: self.driver_info.clone(),
            features: self.features.clone(),
            eeprom: self.eeprom.clone(),
        }
    }
}

/// [`HardwareInspector`] serving a [`Fixture`].
#[derive(Debug, Clone)]
pub struct FixtureInspector {
    fixture: Arc<Fixture>,
}

impl FixtureInspector {
    pub fn new(fixture: Fixture) -> Self {
        Self {
            fixture: Arc::new(fixture),
        }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(Self::new(serde_json::from_str(json)?))
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn fixture(&self) -> &Fixture {
        &self.fixture
    }
}

impl HardwareInspector for FixtureInspector {
    type Session = FixtureSession;

    fn interfaces(&self) -> Result<Vec<InterfaceHandle>> {
        if let Some(msg) = &self.fixture.enumeration_error {
            return Err(ExporterError::Io(std::io::Error::other(msg.clone())));
        }
        Ok(self
            .fixture
            .interfaces
            .iter()
            .map(|iface| iface.handle.clone())
            .collect())
    }

    fn open(&self) -> Result<FixtureSession> {
        if let Some(msg) = &self.fixture.init_error {
            return Err(ExporterError::inspector_init_error(msg.clone()));
        }
        Ok(FixtureSession {
            fixture: Arc::clone(&self.fixture),
        })
    }
}

/// Session handed out by [`FixtureInspector::open`].
#[derive(Debug)]
pub struct FixtureSession {
    fixture: Arc<Fixture>,
}

impl InspectorSession for FixtureSession {
    fn query(&mut self, interface: &str) -> Result<Option<InterfaceRecord>> {
        let Some(iface) = self
            .fixture
            .interfaces
            .iter()
            .find(|iface| iface.handle.name == interface)
        else {
            return Ok(None);
        };

        if let Some(reason) = &iface.query_error {
            return Err(ExporterError::interface_query_error(interface, reason.clone()));
        }
        if iface.vanished {
            return Ok(None);
        }
        Ok(Some(iface.to_record()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOCUMENT: &str = r#"{
        "interfaces": [
            {"name": "lo", "is_loopback": true},
            {"name": "eth0", "driver_info": {
                "driver_name": "ixgbe", "driver_version": "5.1.0-k",
                "firmware_version": "0x800003df", "bus_info": "0000:03:00.0",
                "expansion_rom_version": ""
            }},
            {"name": "eth1", "query_error": "No such device"},
            {"name": "eth2", "vanished": true}
        ]
    }"#;

    #[test]
    fn test_enumerates_in_document_order() {
        let inspector = FixtureInspector::from_json(DOCUMENT).unwrap();
        let names: Vec<_> = inspector
            .interfaces()
            .unwrap()
            .into_iter()
            .map(|iface| iface.name)
            .collect();
        assert_eq!(names, ["lo", "eth0", "eth1", "eth2"]);
    }

    #[test]
    fn test_query_outcomes() {
        let inspector = FixtureInspector::from_json(DOCUMENT).unwrap();
        let mut session = inspector.open().unwrap();

        let eth0 = session.query("eth0").unwrap().unwrap();
        assert_eq!(eth0.driver_info.unwrap().driver_name, "ixgbe");

        let err = session.query("eth1").unwrap_err();
        assert!(!err.is_fatal());
        assert!(err.to_string().contains("No such device"));

        assert!(session.query("eth2").unwrap().is_none());
        assert!(session.query("eth9").unwrap().is_none());
    }

    #[test]
    fn test_init_error() {
        let inspector = FixtureInspector::new(Fixture {
            init_error: Some("netlink socket unavailable".to_string()),
            ..Default::default()
        });
        assert!(matches!(inspector.open(), Err(ExporterError::InspectorInit(_))));
    }

    #[test]
    fn test_invalid_document() {
        let result = FixtureInspector::from_json("{ not json");
        assert!(matches!(result, Err(ExporterError::Fixture(_))));
    }
}
