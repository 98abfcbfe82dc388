use mbedls_core::{
    AcquisitionError, DeviceRegistry, Detector, MountSource, MountTable, RawTree, UsbTopology,
    VolumeMetadata,
};
use std::path::Path;

pub mod commands;
pub mod config;
pub mod diskutil;
mod fsstat;
pub mod plist_tree;
pub mod snapshot;
pub mod volume;

use commands::{run_tool, DISKUTIL_ARGS, IOREG_ARGS, SYSTEM_PROFILER_ARGS};
pub use config::ToolConfig;
use plist_tree::parse_plist;
pub use snapshot::{capture_snapshot, SnapshotHost};

/// Live macOS sources: ioreg, system_profiler and diskutil.
#[derive(Debug, Clone, Default)]
pub struct MacosHost {
    config: ToolConfig,
}

impl MacosHost {
    pub fn new(config: ToolConfig) -> Self {
        Self { config }
    }

    fn query(&self, tool: &Path, args: &[&str], what: &str) -> Result<RawTree, AcquisitionError> {
        if !cfg!(target_os = "macos") && is_bare_name(tool) {
            return Err(AcquisitionError::Unsupported(what.to_string()));
        }
        let output = run_tool(tool, args)?;
        parse_plist(&output, what)
    }

    fn diskutil_mounts(&self) -> Result<MountTable, AcquisitionError> {
        let tree = self.query(&self.config.diskutil, DISKUTIL_ARGS, "diskutil list")?;
        diskutil::mount_table(&tree)
    }
}

/// A tool given without a directory is looked up on `PATH`, which only holds
/// the Apple tools on macOS.
fn is_bare_name(tool: &Path) -> bool {
    tool.parent().map_or(true, |dir| dir.as_os_str().is_empty())
}

impl DeviceRegistry for MacosHost {
    fn query_device_registry(&self) -> Result<RawTree, AcquisitionError> {
        self.query(&self.config.ioreg, IOREG_ARGS, "ioreg")
    }
}

impl UsbTopology for MacosHost {
    fn query_usb_topology(&self) -> Result<RawTree, AcquisitionError> {
        self.query(&self.config.system_profiler, SYSTEM_PROFILER_ARGS, "system_profiler")
    }
}

impl MountSource for MacosHost {
    fn query_mount_table(&self) -> Result<MountTable, AcquisitionError> {
        #[cfg(target_os = "macos")]
        {
            self.diskutil_mounts().or_else(|err| {
                log::warn!("diskutil unavailable ({err}), falling back to getfsstat");
                fsstat::mount_table()
            })
        }

        #[cfg(not(target_os = "macos"))]
        {
            self.diskutil_mounts()
        }
    }
}

impl VolumeMetadata for MacosHost {
    fn read_volume_metadata(&self, mount_point: &Path) -> Option<String> {
        volume::read_mbed_htm(mount_point)
    }
}

/// Detector over the live host, with tool locations taken from the
/// environment.
pub fn build_detector() -> Detector<MacosHost> {
    Detector::new(MacosHost::new(ToolConfig::from_env()))
}
