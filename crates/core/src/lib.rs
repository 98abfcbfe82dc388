use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub mod correlate;
pub mod detect;
pub mod identity;
pub mod mounts;
pub mod pattern;
pub mod platforms;
pub mod registry;
pub mod source;
pub mod topology;
pub mod tree;

pub use detect::{Detection, DetectionStatus, Detector, LogSink, NullSink, TraceSink};
pub use platforms::{BuiltinPlatforms, PlatformDb};
pub use source::{AcquisitionError, DeviceRegistry, MountSource, UsbTopology, VolumeMetadata};
pub use tree::{RawTree, Scalar};

/// Block device or partition name, e.g. `disk2s1`.
pub type DiskId = String;

/// Disk id to mount point; `None` when the partition exists but is not mounted.
pub type MountTable = BTreeMap<DiskId, Option<String>>;

/// Board candidates from the registry, keyed by the disk they resolved to.
/// A `None` key holds a board no disk could be found for.
pub type CorrelatedDevices = BTreeMap<Option<DiskId>, UsbDeviceInfo>;

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct UsbDeviceInfo {
    pub serial: Option<String>,
    pub vendor_id: Option<String>,
    pub product_id: Option<String>,
    pub tty: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct BoardRecord {
    pub mount_point: Option<String>,
    pub serial_port: Option<String>,
    pub target_id: Option<String>,
    pub platform_name: Option<String>,
    // set only when volume metadata overrode the usb serial
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_id_usb_id: Option<String>,
    // outer None: metadata never consulted; Some(None): consulted, nothing found
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_id_mbed_htm: Option<Option<String>>,
}

impl BoardRecord {
    /// True when any of the four base fields is absent.
    pub fn is_incomplete(&self) -> bool {
        self.mount_point.is_none()
            || self.serial_port.is_none()
            || self.target_id.is_none()
            || self.platform_name.is_none()
    }
}
