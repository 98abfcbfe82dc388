use std::fs;
use std::path::Path;

pub const MBED_HTM: &str = "mbed.htm";

/// Contents of the volume's `mbed.htm`, whatever its case on disk.
pub fn read_mbed_htm(mount_point: &Path) -> Option<String> {
    let entries = fs::read_dir(mount_point).ok()?;
    for entry in entries.flatten() {
        if !entry.file_name().to_string_lossy().eq_ignore_ascii_case(MBED_HTM) {
            continue;
        }
        return match fs::read(entry.path()) {
            Ok(bytes) => Some(String::from_utf8_lossy(&bytes).into_owned()),
            Err(err) => {
                log::debug!("could not read {}: {err}", entry.path().display());
                None
            }
        };
    }
    None
}
