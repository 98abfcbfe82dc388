use crate::pattern::is_board_name;
use crate::tree::RawTree;
use crate::DiskId;

pub const ITEMS: &str = "_items";
pub const NAME: &str = "_name";
pub const MANUFACTURER: &str = "manufacturer";
pub const SERIAL_NUM: &str = "serial_num";
pub const BSD_NAME: &str = "bsd_name";
pub const VENDOR_ID: &str = "vendor_id";
pub const PRODUCT_ID: &str = "product_id";

/// Collects every node of the USB topology whose name (plus manufacturer,
/// when present) names a board and that carries a block-device name.
pub fn filter_usb_topology(root: &RawTree) -> Vec<&RawTree> {
    let mut matches = Vec::new();
    for node in root.items() {
        collect_matches(node, &mut matches);
    }
    matches
}

fn collect_matches<'a>(node: &'a RawTree, matches: &mut Vec<&'a RawTree>) {
    let Some(items) = node.get(ITEMS).and_then(RawTree::as_sequence) else {
        return;
    };
    for item in items {
        if item.contains_key(ITEMS) {
            collect_matches(item, matches);
        }
        let Some(mut search) = item.text(NAME) else {
            log::debug!("skipping topology entry without {NAME}");
            continue;
        };
        if let Some(manufacturer) = item.text(MANUFACTURER) {
            search.push(' ');
            search.push_str(&manufacturer);
        }
        if is_board_name(&search) && item.contains_key(BSD_NAME) {
            matches.push(item);
        }
    }
}

/// Block device of the first topology match whose serial number equals
/// `serial`. Entries without a usable serial or bsd name are skipped.
pub fn find_disk_id(matches: &[&RawTree], serial: &str) -> Option<DiskId> {
    matches.iter().find_map(|dev| {
        let bsd_name = dev.get(BSD_NAME)?.as_str()?;
        let serial_num = dev.get(SERIAL_NUM)?.as_str()?;
        (serial_num == serial).then(|| bsd_name.to_string())
    })
}

/// Block device of the only serial-less topology match with the given
/// vendor and product ids. Any ambiguity yields `None`.
pub fn find_disk_id_by_product(matches: &[&RawTree], vendor_id: &str, product_id: &str) -> Option<DiskId> {
    let mut candidates = matches.iter().filter(|dev| {
        !dev.contains_key(SERIAL_NUM)
            && dev.text(VENDOR_ID).and_then(|v| normalize_hex_id(&v)).as_deref() == Some(vendor_id)
            && dev.text(PRODUCT_ID).and_then(|v| normalize_hex_id(&v)).as_deref() == Some(product_id)
    });
    let found = candidates.next()?;
    if candidates.next().is_some() {
        log::debug!("several serial-less topology entries for {vendor_id}:{product_id}");
        return None;
    }
    found.get(BSD_NAME)?.as_str().map(str::to_string)
}

/// Normalises topology ids such as `"0x0d28  (ARM Ltd)"` to `"0d28"`.
pub fn normalize_hex_id(raw: &str) -> Option<String> {
    let token = raw.split_whitespace().next()?;
    let digits = token.strip_prefix("0x").or_else(|| token.strip_prefix("0X")).unwrap_or(token);
    u16::from_str_radix(digits, 16).ok().map(|id| format!("{id:04x}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn topology() -> RawTree {
        RawTree::from(json!([{
            "_name": "USB30Bus",
            "_items": [
                {
                    "_name": "USB2.0 Hub",
                    "_items": [
                        { "_name": "MBED", "serial_num": "9999", "bsd_name": "disk2s1" },
                        { "_name": "Mbedded-widget", "serial_num": "1111", "bsd_name": "disk5" }
                    ]
                },
                { "_name": "J-Link", "manufacturer": "SEGGER MSD", "serial_num": "000440", "bsd_name": "disk3" },
                { "_name": "DAPLink CMSIS-DAP", "manufacturer": "ARM mbed", "serial_num": "0240" },
                { "_name": "Keyboard", "serial_num": "kb" }
            ]
        }]))
    }

    #[test]
    fn collects_nested_and_manufacturer_matches() {
        let tree = topology();
        let matches = filter_usb_topology(&tree);
        let names: Vec<_> = matches.iter().filter_map(|m| m.text(NAME)).collect();
        assert_eq!(names.len(), 2);
        assert!(names.contains(&"MBED".to_string()));
        assert!(names.contains(&"J-Link".to_string()));
    }

    #[test]
    fn root_mapping_is_accepted() {
        let tree = RawTree::from(json!({
            "_items": [{ "_name": "mbed storage", "bsd_name": "disk4" }]
        }));
        assert_eq!(filter_usb_topology(&tree).len(), 1);
    }

    #[test]
    fn malformed_entries_do_not_abort_scan() {
        let tree = RawTree::from(json!([{
            "_items": [
                { "manufacturer": "mbed" },
                "garbage",
                { "_name": "MBED", "serial_num": "1", "bsd_name": "disk9" }
            ]
        }]));
        assert_eq!(filter_usb_topology(&tree).len(), 1);
    }

    #[test]
    fn finds_disk_by_serial() {
        let tree = topology();
        let matches = filter_usb_topology(&tree);
        assert_eq!(find_disk_id(&matches, "9999").as_deref(), Some("disk2s1"));
        assert_eq!(find_disk_id(&matches, "000440").as_deref(), Some("disk3"));
        assert_eq!(find_disk_id(&matches, "nope"), None);
    }

    #[test]
    fn find_disk_skips_malformed_entries() {
        let bad = RawTree::from(json!({ "serial_num": 42, "bsd_name": "disk1" }));
        let good = RawTree::from(json!({ "serial_num": "42", "bsd_name": "disk2" }));
        assert_eq!(find_disk_id(&[&bad, &good], "42").as_deref(), Some("disk2"));
    }

    #[test]
    fn product_lookup_requires_unique_candidate() {
        let a = RawTree::from(json!({ "vendor_id": "0x0d28  (ARM Ltd)", "product_id": "0x0204", "bsd_name": "disk2" }));
        let b = RawTree::from(json!({ "vendor_id": "0x0d28", "product_id": "0x0204", "bsd_name": "disk3" }));
        assert_eq!(find_disk_id_by_product(&[&a], "0d28", "0204").as_deref(), Some("disk2"));
        assert_eq!(find_disk_id_by_product(&[&a, &b], "0d28", "0204"), None);
        assert_eq!(find_disk_id_by_product(&[&a], "1366", "0204"), None);
    }

    #[test]
    fn normalizes_hex_ids() {
        assert_eq!(normalize_hex_id("0x0D28  (ARM Ltd)").as_deref(), Some("0d28"));
        assert_eq!(normalize_hex_id("204").as_deref(), Some("0204"));
        assert_eq!(normalize_hex_id("zz"), None);
    }
}
