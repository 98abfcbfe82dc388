use mbedls_core::{AcquisitionError, MountTable, RawTree};

pub const ALL_DISKS_AND_PARTITIONS: &str = "AllDisksAndPartitions";
pub const DEVICE_IDENTIFIER: &str = "DeviceIdentifier";
pub const MOUNT_POINT: &str = "MountPoint";
pub const PARTITIONS: &str = "Partitions";

/// Builds the mount table from `diskutil list -plist` output. Whole disks
/// and their partitions are both listed; unmounted ones map to `None`.
pub fn mount_table(tree: &RawTree) -> Result<MountTable, AcquisitionError> {
    let disks = tree
        .get(ALL_DISKS_AND_PARTITIONS)
        .and_then(RawTree::as_sequence)
        .ok_or_else(|| AcquisitionError::Shape {
            what: "diskutil list".to_string(),
            reason: format!("no {ALL_DISKS_AND_PARTITIONS} array"),
        })?;

    let mut table = MountTable::new();
    for disk in disks {
        insert_entry(disk, &mut table);
        let partitions = disk.get(PARTITIONS).and_then(RawTree::as_sequence).unwrap_or_default();
        for partition in partitions {
            insert_entry(partition, &mut table);
        }
    }
    Ok(table)
}

fn insert_entry(entry: &RawTree, table: &mut MountTable) {
    match entry.text(DEVICE_IDENTIFIER) {
        Some(id) => {
            table.insert(id, entry.text(MOUNT_POINT));
        }
        None => log::debug!("diskutil entry without {DEVICE_IDENTIFIER}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plist_tree::parse_plist;
    use serde_json::json;

    #[test]
    fn reads_whole_disks_and_partitions() {
        let tree = parse_plist(include_bytes!("../tests/fixtures/diskutil.plist"), "diskutil").unwrap();
        let table = mount_table(&tree).unwrap();
        assert_eq!(table.len(), 4);
        assert_eq!(table["disk2"].as_deref(), Some("/Volumes/MBED"));
        assert_eq!(table["disk0s2"].as_deref(), Some("/"));
        assert_eq!(table["disk0s1"], None);
        assert_eq!(table["disk0"], None);
    }

    #[test]
    fn missing_disk_list_is_a_shape_error() {
        let err = mount_table(&RawTree::from(json!({ "AllDisks": [] }))).unwrap_err();
        assert!(matches!(err, AcquisitionError::Shape { .. }));
    }
}
