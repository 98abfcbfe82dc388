use crate::correlate::correlate_devices;
use crate::identity::resolve_identity;
use crate::mounts::resolve_mounts;
use crate::platforms::{BuiltinPlatforms, PlatformDb};
use crate::registry::filter_registry;
use crate::source::{AcquisitionError, DeviceRegistry, MountSource, UsbTopology, VolumeMetadata};
use crate::topology::filter_usb_topology;
use crate::tree::{render_tree, RawTree};
use crate::{BoardRecord, MountTable};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DetectionStatus {
    Complete,
    /// At least one record has an absent field.
    Partial,
}

impl DetectionStatus {
    /// Status of a finished set of records.
    pub fn of(boards: &[BoardRecord]) -> Self {
        if boards.iter().any(BoardRecord::is_incomplete) {
            DetectionStatus::Partial
        } else {
            DetectionStatus::Complete
        }
    }

    pub fn error_level(self) -> i32 {
        match self {
            DetectionStatus::Complete => 0,
            DetectionStatus::Partial => -1,
        }
    }
}

#[derive(Debug)]
pub struct Detection {
    pub boards: Vec<BoardRecord>,
    pub status: DetectionStatus,
    /// Sources that failed and were treated as empty.
    pub acquisition_errors: Vec<AcquisitionError>,
}

/// Receives the intermediate trees of a detection run.
pub trait TraceSink {
    fn trace(&self, label: &str, trees: &[&RawTree]);
}

/// Writes traced trees at debug level.
#[derive(Debug, Default)]
pub struct LogSink;

impl TraceSink for LogSink {
    fn trace(&self, label: &str, trees: &[&RawTree]) {
        if !log::log_enabled!(log::Level::Debug) {
            return;
        }
        log::debug!("{label}: {} tree(s)", trees.len());
        for tree in trees {
            for line in render_tree(tree) {
                log::debug!("{line}");
            }
            log::debug!("{}", "~".repeat(80));
        }
    }
}

#[derive(Debug, Default)]
pub struct NullSink;

impl TraceSink for NullSink {
    fn trace(&self, _label: &str, _trees: &[&RawTree]) {}
}

/// Runs the whole detection pipeline over one host's data sources.
pub struct Detector<H> {
    host: H,
    platforms: Box<dyn PlatformDb>,
    trace: Box<dyn TraceSink>,
    volume_metadata: bool,
}

impl<H> Detector<H>
where
    H: DeviceRegistry + UsbTopology + MountSource + VolumeMetadata,
{
    pub fn new(host: H) -> Self {
        Self {
            host,
            platforms: Box::new(BuiltinPlatforms),
            trace: Box::new(LogSink),
            volume_metadata: true,
        }
    }

    pub fn with_platforms(mut self, platforms: impl PlatformDb + 'static) -> Self {
        self.platforms = Box::new(platforms);
        self
    }

    pub fn with_trace(mut self, trace: impl TraceSink + 'static) -> Self {
        self.trace = Box::new(trace);
        self
    }

    /// Enables or disables the volume identification file lookup.
    pub fn with_volume_metadata(mut self, enabled: bool) -> Self {
        self.volume_metadata = enabled;
        self
    }

    pub fn list_devices(&self) -> Detection {
        let mut errors = Vec::new();
        let registry = degrade("device registry", self.host.query_device_registry(), &mut errors)
            .unwrap_or_else(RawTree::empty);
        let topology = degrade("usb topology", self.host.query_usb_topology(), &mut errors)
            .unwrap_or_else(RawTree::empty);

        let subtrees = filter_registry(&registry);
        let matches = filter_usb_topology(&topology);
        self.trace.trace("registry subtrees", &subtrees);
        self.trace.trace("topology matches", &matches);

        let devices = correlate_devices(&subtrees, &matches);
        let mounts: MountTable = degrade("mount table", self.host.query_mount_table(), &mut errors)
            .unwrap_or_default();

        let mut boards = resolve_mounts(&devices, &mounts, &*self.platforms);
        if self.volume_metadata {
            for board in &mut boards {
                resolve_identity(board, &self.host, &*self.platforms);
            }
        }
        let status = DetectionStatus::of(&boards);
        log::debug!("detected {} board(s), status {:?}", boards.len(), status);

        Detection {
            boards,
            status,
            acquisition_errors: errors,
        }
    }
}

fn degrade<T>(what: &str, result: Result<T, AcquisitionError>, errors: &mut Vec<AcquisitionError>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(err) => {
            log::warn!("{what} unavailable, treating as empty: {err}");
            errors.push(err);
            None
        }
    }
}
