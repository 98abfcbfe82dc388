use crate::tree::RawTree;
use crate::MountTable;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AcquisitionError {
    #[error("could not run {tool}: {source}")]
    Spawn {
        tool: String,
        #[source]
        source: std::io::Error,
    },
    #[error("{tool} exited with {status}: {stderr}")]
    ToolFailed { tool: String, status: String, stderr: String },
    #[error("could not parse {what}: {reason}")]
    Parse { what: String, reason: String },
    #[error("unexpected shape in {what}: {reason}")]
    Shape { what: String, reason: String },
    #[error("could not read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("{0} is not available on this platform")]
    Unsupported(String),
}

/// Device registry tree rooted at USB serial client nodes.
pub trait DeviceRegistry {
    fn query_device_registry(&self) -> Result<RawTree, AcquisitionError>;
}

/// Tree of `{_name, manufacturer?, serial_num?, bsd_name?, _items?}` nodes.
pub trait UsbTopology {
    fn query_usb_topology(&self) -> Result<RawTree, AcquisitionError>;
}

pub trait MountSource {
    fn query_mount_table(&self) -> Result<MountTable, AcquisitionError>;
}

/// Contents of the identification file at a volume root, if there is one.
pub trait VolumeMetadata {
    fn read_volume_metadata(&self, mount_point: &Path) -> Option<String>;
}
