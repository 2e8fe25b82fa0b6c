//! Linux inspector reading `/sys/class/net`.
//!
//! sysfs exposes interface flags and the bound driver, but neither the
//! ethtool feature flags nor the module EEPROM. Records produced here therefore
//! carry the driver facts sysfs knows about; features are reported as unreadable.

use super::data::{DriverInfo, InterfaceHandle, InterfaceRecord, ReadError};
use super::{HardwareInspector, InspectorSession};
use crate::error::{ExporterError, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

const IFF_UP: u32 = 0x1;
const IFF_LOOPBACK: u32 = 0x8;

/// [`HardwareInspector`] for the running Linux host.
#[derive(Debug, Clone)]
pub struct SysfsInspector {
    root: PathBuf,
}

impl Default for SysfsInspector {
    fn default() -> Self {
        Self::new()
    }
}

impl SysfsInspector {
    pub fn new() -> Self {
        Self::with_root("/sys")
    }

    /// Use a different sysfs mount point.
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn net_dir(&self) -> PathBuf {
        self.root.join("class").join("net")
    }
}

impl HardwareInspector for SysfsInspector {
    type Session = SysfsSession;

    fn interfaces(&self) -> Result<Vec<InterfaceHandle>> {
        let mut found = Vec::new();
        for entry in fs::read_dir(self.net_dir())? {
            let entry = entry?;
            let name = entry.file_name().to_string_lossy().to_string();
            let dir = entry.path();

            let ifindex = read_trimmed(&dir.join("ifindex"))
                .and_then(|s| s.parse::<u32>().ok())
                .unwrap_or(u32::MAX);
            let flags = read_trimmed(&dir.join("flags"))
                .and_then(|s| parse_flags(&s))
                .unwrap_or(0);

            found.push((
                ifindex,
                InterfaceHandle {
                    name,
                    is_loopback: flags & IFF_LOOPBACK != 0,
                    is_up: flags & IFF_UP != 0,
                },
            ));
        }

        found.sort_by(|(a_idx, a), (b_idx, b)| a_idx.cmp(b_idx).then_with(|| a.name.cmp(&b.name)));
        Ok(found.into_iter().map(|(_, handle)| handle).collect())
    }

    fn open(&self) -> Result<SysfsSession> {
        let net_dir = self.net_dir();
        if !net_dir.is_dir() {
            return Err(ExporterError::inspector_init_error(format!(
                "{} is not a directory",
                net_dir.display()
            )));
        }
        Ok(SysfsSession {
            net_dir,
            module_dir: self.root.join("module"),
        })
    }
}

/// Session handed out by [`SysfsInspector::open`].
#[derive(Debug)]
pub struct SysfsSession {
    net_dir: PathBuf,
    module_dir: PathBuf,
}

impl SysfsSession {
    fn read_driver_info(&self, iface_dir: &Path) -> Option<DriverInfo> {
        let device = iface_dir.join("device");
        let driver_name = link_target_name(&device.join("driver"))?;
        let driver_version = read_trimmed(&self.module_dir.join(&driver_name).join("version"));

        // Firmware and expansion ROM versions are only available through ethtool.
        Some(DriverInfo {
            driver_name,
            driver_version,
            firmware_version: None,
            bus_info: link_target_name(&device),
            expansion_rom_version: None,
        })
    }
}

impl InspectorSession for SysfsSession {
    fn query(&mut self, interface: &str) -> Result<Option<InterfaceRecord>> {
        let iface_dir = self.net_dir.join(interface);
        if !iface_dir.exists() {
            debug!("Interface {} disappeared before it could be queried", interface);
            return Ok(None);
        }

        Ok(Some(InterfaceRecord {
            name: interface.to_string(),
            driver_info: self.read_driver_info(&iface_dir),
            features: Err(ReadError::new("feature flags are not exposed through sysfs")),
            eeprom: None,
        }))
    }
}

fn read_trimmed(path: &Path) -> Option<String> {
    fs::read_to_string(path).ok().map(|s| s.trim().to_string())
}

fn link_target_name(path: &Path) -> Option<String> {
    let target = fs::read_link(path).ok()?;
    target.file_name().map(|name| name.to_string_lossy().to_string())
}

/// Parse the hex flag word found in `/sys/class/net/<iface>/flags`.
fn parse_flags(raw: &str) -> Option<u32> {
    let digits = raw.trim_start_matches("0x").trim_start_matches("0X");
    u32::from_str_radix(digits, 16).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::{DescriptorCatalog, MetricEmitter, PowerUnit};
    use std::os::unix::fs::symlink;

    fn add_interface(root: &Path, name: &str, ifindex: u32, flags: &str) -> PathBuf {
        let dir = root.join("class/net").join(name);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("ifindex"), format!("{}\n", ifindex)).unwrap();
        fs::write(dir.join("flags"), format!("{}\n", flags)).unwrap();
        dir
    }

    #[test]
    fn test_parse_flags() {
        assert_eq!(parse_flags("0x1003"), Some(0x1003));
        assert_eq!(parse_flags("0x9"), Some(0x9));
        assert_eq!(parse_flags("garbage"), None);
    }

    #[test]
    fn test_interfaces_ordered_by_ifindex() {
        let tmp = tempfile::tempdir().unwrap();
        add_interface(tmp.path(), "eth1", 3, "0x1002");
        add_interface(tmp.path(), "lo", 1, "0x9");
        add_interface(tmp.path(), "eth0", 2, "0x1003");

        let interfaces = SysfsInspector::with_root(tmp.path()).interfaces().unwrap();
        let names: Vec<_> = interfaces.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, ["lo", "eth0", "eth1"]);

        assert!(interfaces[0].is_loopback);
        assert!(interfaces[1].is_up);
        assert!(interfaces[2].is_admin_down());
    }

    #[test]
    fn test_query_reads_driver_links() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = add_interface(tmp.path(), "eth0", 2, "0x1003");

        let pci = tmp.path().join("devices/pci0000:00/0000:03:00.0");
        let driver = tmp.path().join("bus/pci/drivers/ixgbe");
        fs::create_dir_all(&pci).unwrap();
        fs::create_dir_all(&driver).unwrap();
        symlink(&driver, pci.join("driver")).unwrap();
        symlink(&pci, dir.join("device")).unwrap();
        fs::create_dir_all(tmp.path().join("module/ixgbe")).unwrap();
        fs::write(tmp.path().join("module/ixgbe/version"), "5.1.0-k\n").unwrap();

        let inspector = SysfsInspector::with_root(tmp.path());
        let mut session = inspector.open().unwrap();
        let record = session.query("eth0").unwrap().unwrap();

        let info = record.driver_info.unwrap();
        assert_eq!(info.driver_name, "ixgbe");
        assert_eq!(info.driver_version.as_deref(), Some("5.1.0-k"));
        assert_eq!(info.bus_info.as_deref(), Some("0000:03:00.0"));
        assert!(info.firmware_version.is_none());
        assert!(record.features.is_err());
        assert!(record.eeprom.is_none());

        assert!(session.query("eth7").unwrap().is_none());
    }

    #[test]
    fn test_unknown_driver_facts_are_not_emitted() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = add_interface(tmp.path(), "eth0", 2, "0x1003");

        let pci = tmp.path().join("devices/pci0000:00/0000:03:00.0");
        let driver = tmp.path().join("bus/pci/drivers/ixgbe");
        fs::create_dir_all(&pci).unwrap();
        fs::create_dir_all(&driver).unwrap();
        symlink(&driver, pci.join("driver")).unwrap();
        symlink(&pci, dir.join("device")).unwrap();

        let inspector = SysfsInspector::with_root(tmp.path());
        let record = inspector.open().unwrap().query("eth0").unwrap().unwrap();
        let info = record.driver_info.as_ref().unwrap();
        assert!(info.driver_version.is_none());

        let catalog = DescriptorCatalog::new(false, PowerUnit::Milliwatts);
        let samples = MetricEmitter::new(&catalog).emit(&record);
        let names: Vec<_> = samples.iter().map(|s| s.name()).collect();
        assert_eq!(names, ["transceiver_driver_name_info", "transceiver_bus_info"]);
        assert!(samples.iter().all(|s| s.label_values.iter().all(|v| !v.is_empty())));
    }

    #[test]
    fn test_open_without_net_class_fails() {
        let tmp = tempfile::tempdir().unwrap();
        let result = SysfsInspector::with_root(tmp.path()).open();
        assert!(matches!(result, Err(ExporterError::InspectorInit(_))));
    }
}
