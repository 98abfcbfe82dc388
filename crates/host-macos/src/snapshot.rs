use crate::commands::{run_tool, DISKUTIL_ARGS, IOREG_ARGS, SYSTEM_PROFILER_ARGS};
use crate::config::ToolConfig;
use crate::diskutil;
use crate::plist_tree::parse_plist;
use crate::volume::read_mbed_htm;
use anyhow::{Context, Result};
use mbedls_core::{
    AcquisitionError, DeviceRegistry, MountSource, MountTable, RawTree, UsbTopology, VolumeMetadata,
};
use std::fs;
use std::path::{Path, PathBuf};

pub const IOREG_FILE: &str = "ioreg.plist";
pub const SYSTEM_PROFILER_FILE: &str = "system_profiler.plist";
pub const DISKUTIL_FILE: &str = "diskutil.plist";

/// Host sources replayed from tool output captured earlier into a
/// directory. Volume metadata is still read from the live mount points.
#[derive(Debug, Clone)]
pub struct SnapshotHost {
    dir: PathBuf,
}

impl SnapshotHost {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn load(&self, file: &str) -> Result<RawTree, AcquisitionError> {
        let path = self.dir.join(file);
        let bytes = fs::read(&path).map_err(|source| AcquisitionError::Io {
            path: path.display().to_string(),
            source,
        })?;
        parse_plist(&bytes, file)
    }
}

impl DeviceRegistry for SnapshotHost {
    fn query_device_registry(&self) -> Result<RawTree, AcquisitionError> {
        self.load(IOREG_FILE)
    }
}

impl UsbTopology for SnapshotHost {
    fn query_usb_topology(&self) -> Result<RawTree, AcquisitionError> {
        self.load(SYSTEM_PROFILER_FILE)
    }
}

impl MountSource for SnapshotHost {
    fn query_mount_table(&self) -> Result<MountTable, AcquisitionError> {
        diskutil::mount_table(&self.load(DISKUTIL_FILE)?)
    }
}

impl VolumeMetadata for SnapshotHost {
    fn read_volume_metadata(&self, mount_point: &Path) -> Option<String> {
        read_mbed_htm(mount_point)
    }
}

/// Runs the three host tools and stores their raw output in `dir`, in the
/// layout `SnapshotHost` reads.
pub fn capture_snapshot(config: &ToolConfig, dir: &Path) -> Result<()> {
    fs::create_dir_all(dir).with_context(|| format!("create {}", dir.display()))?;
    let captures = [
        (&config.ioreg, IOREG_ARGS, IOREG_FILE),
        (&config.system_profiler, SYSTEM_PROFILER_ARGS, SYSTEM_PROFILER_FILE),
        (&config.diskutil, DISKUTIL_ARGS, DISKUTIL_FILE),
    ];
    for (tool, args, file) in captures {
        let output = run_tool(tool, args)?;
        let path = dir.join(file);
        fs::write(&path, output).with_context(|| format!("write {}", path.display()))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use mbedls_core::{DetectionStatus, Detector};

    fn fixtures() -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
    }

    #[test]
    fn detects_mounted_board_from_fixtures() {
        let detection = Detector::new(SnapshotHost::new(fixtures())).list_devices();
        assert!(detection.acquisition_errors.is_empty());
        assert_eq!(detection.boards.len(), 1);
        let board = &detection.boards[0];
        assert_eq!(board.mount_point.as_deref(), Some("/Volumes/MBED"));
        assert_eq!(board.serial_port.as_deref(), Some("/dev/tty.usbmodem1422"));
        assert_eq!(
            board.target_id.as_deref(),
            Some("0240000032044e4500257009997b00386781000097969900")
        );
        assert_eq!(board.platform_name.as_deref(), Some("K64F"));
        assert_eq!(detection.status, DetectionStatus::Complete);
    }

    #[test]
    fn missing_snapshot_files_are_acquisition_errors() {
        let dir = tempfile::tempdir().unwrap();
        let detection = Detector::new(SnapshotHost::new(dir.path())).list_devices();
        assert!(detection.boards.is_empty());
        assert_eq!(detection.acquisition_errors.len(), 3);
    }

    #[cfg(unix)]
    #[test]
    fn capture_writes_tool_output() {
        let dir = tempfile::tempdir().unwrap();
        let config = ToolConfig {
            ioreg: PathBuf::from("echo"),
            system_profiler: PathBuf::from("echo"),
            diskutil: PathBuf::from("echo"),
        };
        capture_snapshot(&config, dir.path()).unwrap();
        let diskutil = fs::read_to_string(dir.path().join(DISKUTIL_FILE)).unwrap();
        assert_eq!(diskutil.trim(), "list -plist");
    }
}
