//! Access to interface, driver and transceiver data on the host.
//!
//! The collector only talks to hardware through [`HardwareInspector`]. A scrape
//! enumerates interfaces, opens one [`InspectorSession`], queries every selected
//! interface through it and drops it when the sweep ends.

pub mod data;
pub mod fixture;
pub mod sysfs;

pub use data::{
    AlarmThresholds, DriverInfo, EepromRecord, FeatureMap, FeatureStatus, InterfaceHandle,
    InterfaceRecord, Laser, LaserMonitoring, Measurement, ModuleMonitoring, PowerClass, ReadError,
};
pub use fixture::{Fixture, FixtureInspector};
pub use sysfs::SysfsInspector;

use crate::error::Result;

/// Source of interface and transceiver records.
///
/// Implementations must tolerate several sessions being open at once, since
/// overlapping scrape requests each open their own.
pub trait HardwareInspector: Send + Sync + 'static {
    /// Per-scrape handle used to query individual interfaces.
    type Session: InspectorSession;

    /// Enumerate the system's interfaces in system order.
    fn interfaces(&self) -> Result<Vec<InterfaceHandle>>;

    /// Acquire the query capability for one scrape.
    ///
    /// Fails with [`crate::ExporterError::InspectorInit`] when it can't be opened at all.
    fn open(&self) -> Result<Self::Session>;
}

/// An open query capability.
pub trait InspectorSession {
    /// Read everything known about `interface`.
    ///
    /// `Ok(None)` means the interface disappeared after it was enumerated.
    fn query(&mut self, interface: &str) -> Result<Option<InterfaceRecord>>;
}
