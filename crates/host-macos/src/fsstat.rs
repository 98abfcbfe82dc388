#![cfg_attr(not(target_os = "macos"), allow(dead_code))]

use mbedls_core::MountTable;

/// Filesystem type macOS reports for FAT volumes, which is what boards expose.
pub const BOARD_FS_TYPE: &str = "msdos";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MountEntry {
    pub device: String,
    pub mount_point: String,
    pub fs_type: String,
}

/// Mounted `/dev/*` FAT filesystems as reported by `getfsstat(2)`. Unmounted
/// partitions do not appear.
#[cfg(target_os = "macos")]
pub fn mount_table() -> Result<MountTable, mbedls_core::AcquisitionError> {
    Ok(board_mount_table(read_mounts()?))
}

/// Keeps FAT volumes backed by a `/dev` node, keyed by the device name.
pub fn board_mount_table(entries: impl IntoIterator<Item = MountEntry>) -> MountTable {
    let mut table = MountTable::new();
    for entry in entries {
        let Some(device) = entry.device.strip_prefix("/dev/") else {
            continue;
        };
        if device.is_empty() {
            continue;
        }
        if !entry.fs_type.eq_ignore_ascii_case(BOARD_FS_TYPE) {
            log::trace!("{device} is {}, not a board volume", entry.fs_type);
            continue;
        }
        table.insert(device.to_string(), Some(entry.mount_point));
    }
    table
}

#[cfg(target_os = "macos")]
fn read_mounts() -> Result<Vec<MountEntry>, mbedls_core::AcquisitionError> {
    use libc::{getfsstat, statfs, MNT_NOWAIT};
    use std::ffi::{c_char, CStr};
    use std::mem::size_of;
    use std::ptr;

    fn text(field: &[c_char]) -> String {
        unsafe { CStr::from_ptr(field.as_ptr()) }
            .to_string_lossy()
            .into_owned()
    }

    let count = unsafe { getfsstat(ptr::null_mut(), 0, MNT_NOWAIT) };
    if count < 0 {
        return Err(fsstat_error());
    }
    let mut buf = vec![unsafe { std::mem::zeroed::<statfs>() }; count as usize];
    let filled = unsafe {
        getfsstat(
            buf.as_mut_ptr(),
            (buf.len() * size_of::<statfs>()) as i32,
            MNT_NOWAIT,
        )
    };
    if filled < 0 {
        return Err(fsstat_error());
    }

    Ok(buf
        .iter()
        .take(filled as usize)
        .map(|fs| MountEntry {
            device: text(&fs.f_mntfromname),
            mount_point: text(&fs.f_mntonname),
            fs_type: text(&fs.f_fstypename),
        })
        .collect())
}

#[cfg(target_os = "macos")]
fn fsstat_error() -> mbedls_core::AcquisitionError {
    mbedls_core::AcquisitionError::Io {
        path: "getfsstat".to_string(),
        source: std::io::Error::last_os_error(),
    }
}
