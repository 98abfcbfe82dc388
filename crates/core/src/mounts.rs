use crate::platforms::{platform_for, PlatformDb};
use crate::{BoardRecord, CorrelatedDevices, MountTable};

/// Produces one record per disk id present in both `devices` and `mounts`,
/// in disk id order.
pub fn resolve_mounts(
    devices: &CorrelatedDevices,
    mounts: &MountTable,
    platforms: &dyn PlatformDb,
) -> Vec<BoardRecord> {
    let mut records = Vec::new();
    for (disk_id, info) in devices {
        let Some(disk_id) = disk_id else {
            log::debug!("board {:?} has no disk, skipping", info.serial);
            continue;
        };
        let Some(mount_point) = mounts.get(disk_id) else {
            log::debug!("{disk_id} is not in the mount table, skipping");
            continue;
        };
        let target_id = info.serial.clone();
        let record = BoardRecord {
            mount_point: mount_point.clone(),
            serial_port: info.tty.clone(),
            platform_name: platform_for(platforms, target_id.as_deref()),
            target_id,
            target_id_usb_id: None,
            target_id_mbed_htm: None,
        };
        if record.is_incomplete() {
            log::debug!("{disk_id} detected partially: {record:?}");
        }
        records.push(record);
    }
    records
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platforms::BuiltinPlatforms;
    use crate::UsbDeviceInfo;

    fn info(serial: Option<&str>, tty: Option<&str>) -> UsbDeviceInfo {
        UsbDeviceInfo {
            serial: serial.map(str::to_string),
            tty: tty.map(str::to_string),
            ..UsbDeviceInfo::default()
        }
    }

    #[test]
    fn keeps_only_the_intersection() {
        let mut devices = CorrelatedDevices::new();
        devices.insert(Some("disk2".into()), info(Some("0240AAAA"), Some("/dev/tty.a")));
        devices.insert(Some("disk3".into()), info(Some("0240BBBB"), Some("/dev/tty.b")));
        devices.insert(None, info(Some("0240CCCC"), Some("/dev/tty.c")));
        let mut mounts = MountTable::new();
        mounts.insert("disk2".into(), Some("/Volumes/A".into()));
        mounts.insert("disk4".into(), Some("/Volumes/D".into()));

        let records = resolve_mounts(&devices, &mounts, &BuiltinPlatforms);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].mount_point.as_deref(), Some("/Volumes/A"));
        assert_eq!(records[0].serial_port.as_deref(), Some("/dev/tty.a"));
        assert_eq!(records[0].target_id.as_deref(), Some("0240AAAA"));
        assert_eq!(records[0].platform_name.as_deref(), Some("K64F"));
        assert!(!records[0].is_incomplete());
    }

    #[test]
    fn missing_serial_yields_partial_record() {
        let mut devices = CorrelatedDevices::new();
        devices.insert(Some("disk2".into()), info(None, Some("/dev/tty.a")));
        let mut mounts = MountTable::new();
        mounts.insert("disk2".into(), Some("/Volumes/A".into()));

        let records = resolve_mounts(&devices, &mounts, &BuiltinPlatforms);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].target_id, None);
        assert_eq!(records[0].platform_name, None);
        assert!(records[0].is_incomplete());
    }

    #[test]
    fn unmounted_volume_is_kept_but_flagged() {
        let mut devices = CorrelatedDevices::new();
        devices.insert(Some("disk2".into()), info(Some("0240AAAA"), Some("/dev/tty.a")));
        let mut mounts = MountTable::new();
        mounts.insert("disk2".into(), None);

        let records = resolve_mounts(&devices, &mounts, &BuiltinPlatforms);
        assert_eq!(records[0].mount_point, None);
        assert!(records[0].is_incomplete());
    }
}
