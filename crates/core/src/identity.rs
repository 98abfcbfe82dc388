use crate::platforms::{platform_for, PlatformDb};
use crate::source::VolumeMetadata;
use crate::BoardRecord;
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::Path;

static CODE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\?code=([a-fA-F0-9]+)").expect("code pattern is valid"));
static AUTH_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\?auth=([a-fA-F0-9]+)").expect("auth pattern is valid"));

/// Target id embedded in the redirect URL of an `mbed.htm` file.
pub fn extract_target_id(contents: &str) -> Option<String> {
    contents.lines().find_map(|line| {
        CODE_PATTERN
            .captures(line)
            .or_else(|| AUTH_PATTERN.captures(line))
            .map(|caps| caps[1].to_string())
    })
}

/// Lets the volume's own identification file override the usb serial.
pub fn resolve_identity(record: &mut BoardRecord, metadata: &dyn VolumeMetadata, platforms: &dyn PlatformDb) {
    let Some(mount_point) = record.mount_point.clone() else {
        return;
    };
    let htm_target_id = metadata
        .read_volume_metadata(Path::new(&mount_point))
        .and_then(|contents| extract_target_id(&contents));
    if let Some(target_id) = &htm_target_id {
        log::debug!("{mount_point}: volume target id {target_id} overrides {:?}", record.target_id);
        record.target_id_usb_id = record.target_id.take();
        record.target_id = Some(target_id.clone());
        record.platform_name = platform_for(platforms, Some(target_id));
    }
    record.target_id_mbed_htm = Some(htm_target_id);
}
