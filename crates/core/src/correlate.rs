use crate::pattern::is_board_name;
use crate::registry::ENTRY_NAME;
use crate::topology::{find_disk_id, find_disk_id_by_product};
use crate::tree::{child_nodes, RawTree, Scalar};
use crate::{CorrelatedDevices, UsbDeviceInfo};

pub const VENDOR_STRING: &str = "kUSBVendorString";
pub const VENDOR_NAME: &str = "USB Vendor Name";
pub const ID_VENDOR: &str = "idVendor";
pub const ID_PRODUCT: &str = "idProduct";
pub const SERIAL_NUMBER: &str = "USB Serial Number";
pub const DIALIN_DEVICE: &str = "IODialinDevice";

const NAME_FIELDS: [&str; 3] = [ENTRY_NAME, VENDOR_STRING, VENDOR_NAME];

/// Outcome of walking one branch of a registry subtree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Descent {
    /// Nothing serial-bearing found; ancestors may still match.
    Continue,
    /// A board with a serial number was recorded; ancestors must not match.
    Stop,
}

/// Walks every registry subtree and joins each board node found there with
/// the topology matches, keyed by the resolved disk id.
pub fn correlate_devices(subtrees: &[&RawTree], topology: &[&RawTree]) -> CorrelatedDevices {
    let mut devices = CorrelatedDevices::new();
    for subtree in subtrees {
        walk(subtree, topology, &mut devices);
    }
    devices
}

/// Depth-first: children are visited before the node itself, so the board
/// is found before any hub or bridge above it.
pub fn walk(node: &RawTree, topology: &[&RawTree], devices: &mut CorrelatedDevices) -> Descent {
    let nested: Vec<&RawTree> = match node {
        RawTree::Mapping(map) => map.values().collect(),
        RawTree::Sequence(items) => items.iter().collect(),
        RawTree::Scalar(_) => return Descent::Continue,
    };

    let mut descent = Descent::Continue;
    for child in nested {
        if matches!(child, RawTree::Scalar(_)) {
            continue;
        }
        if walk(child, topology, devices) == Descent::Stop {
            descent = Descent::Stop;
        }
    }
    if descent == Descent::Stop || !is_board_node(node) {
        return descent;
    }

    let info = device_info(node);
    let disk_id = match (&info.serial, &info.vendor_id, &info.product_id) {
        (Some(serial), _, _) => find_disk_id(topology, serial),
        (None, Some(vendor), Some(product)) => find_disk_id_by_product(topology, vendor, product),
        _ => None,
    };
    log::debug!(
        "board node {:?} serial={:?} tty={:?} disk={:?}",
        node.text(ENTRY_NAME),
        info.serial,
        info.tty,
        disk_id
    );
    let stop = info.serial.is_some();
    devices.insert(disk_id, info);
    if stop {
        Descent::Stop
    } else {
        Descent::Continue
    }
}

fn is_board_node(node: &RawTree) -> bool {
    NAME_FIELDS.iter().any(|field| {
        node.get(field)
            .and_then(RawTree::as_str)
            .map(is_board_name)
            .unwrap_or(false)
    })
}

fn device_info(node: &RawTree) -> UsbDeviceInfo {
    let mut info = UsbDeviceInfo {
        vendor_id: usb_id(node, ID_VENDOR),
        product_id: usb_id(node, ID_PRODUCT),
        ..UsbDeviceInfo::default()
    };
    if let Some(serial) = node.text(SERIAL_NUMBER) {
        info.serial = Some(serial);
        info.tty = find_tty(node);
    }
    info
}

fn usb_id(node: &RawTree, key: &str) -> Option<String> {
    match node.get(key)? {
        RawTree::Scalar(Scalar::Integer(id)) => Some(format!("{id:04x}")),
        RawTree::Scalar(Scalar::String(id)) => Some(id.clone()),
        _ => None,
    }
}

/// First dial-in device path at or below `node`.
pub fn find_tty(node: &RawTree) -> Option<String> {
    if let Some(tty) = node.get(DIALIN_DEVICE).and_then(RawTree::as_str) {
        return Some(tty.to_string());
    }
    child_nodes(node).into_iter().find_map(find_tty)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::filter_registry;
    use crate::topology::filter_usb_topology;
    use serde_json::json;

    fn registry(board: serde_json::Value) -> RawTree {
        hub_with(vec![board])
    }

    fn hub_with(boards: Vec<serde_json::Value>) -> RawTree {
        RawTree::from(json!([{
            "IORegistryEntryName": "Root",
            "IORegistryEntryChildren": [{
                "IORegistryEntryName": "XHC1",
                "IORegistryEntryChildren": [{
                    "IORegistryEntryName": "mbed hub",
                    "USB Serial Number": "HUB0",
                    "sessionID": 10,
                    "bcdDevice": 1,
                    "IORegistryEntryChildren": boards
                }]
            }]
        }]))
    }

    fn board(serial: Option<&str>) -> serde_json::Value {
        let mut node = json!({
            "IORegistryEntryName": "DAPLink CMSIS-DAP",
            "USB Vendor Name": "ARM mbed",
            "idVendor": 3368,
            "idProduct": 516,
            "IORegistryEntryChildren": [{
                "IORegistryEntryName": "IOUSBHostInterface",
                "IORegistryEntryChildren": [{
                    "IORegistryEntryName": "IOSerialBSDClient",
                    "IODialinDevice": "/dev/tty.usbmodem1"
                }]
            }]
        });
        if let Some(serial) = serial {
            node["USB Serial Number"] = json!(serial);
        }
        node
    }

    fn topology() -> RawTree {
        RawTree::from(json!([{ "_items": [
            { "_name": "MBED", "serial_num": "9999", "bsd_name": "disk2s1" },
            { "_name": "MBED", "vendor_id": "0x0d28  (ARM Ltd)", "product_id": "0x0204", "bsd_name": "disk4" }
        ]}]))
    }

    fn run(registry: &RawTree, topology: &RawTree) -> CorrelatedDevices {
        let subtrees = filter_registry(registry);
        let matches = filter_usb_topology(topology);
        correlate_devices(&subtrees, &matches)
    }

    #[test]
    fn joins_board_on_serial() {
        let devices = run(&registry(board(Some("9999"))), &topology());
        assert_eq!(devices.len(), 1);
        let info = &devices[&Some("disk2s1".to_string())];
        assert_eq!(info.serial.as_deref(), Some("9999"));
        assert_eq!(info.tty.as_deref(), Some("/dev/tty.usbmodem1"));
        assert_eq!(info.vendor_id.as_deref(), Some("0d28"));
        assert_eq!(info.product_id.as_deref(), Some("0204"));
    }

    #[test]
    fn board_stops_hub_above_it_from_matching() {
        let devices = run(&registry(board(Some("9999"))), &topology());
        assert!(devices.values().all(|info| info.serial.as_deref() != Some("HUB0")));
    }

    #[test]
    fn sibling_boards_behind_one_hub_are_both_found() {
        let topology = RawTree::from(json!([{ "_items": [
            { "_name": "MBED", "serial_num": "A", "bsd_name": "disk2" },
            { "_name": "MBED", "serial_num": "B", "bsd_name": "disk3" }
        ]}]));
        let devices = run(&hub_with(vec![board(Some("A")), board(Some("B"))]), &topology);
        assert_eq!(devices.len(), 2);
        assert_eq!(devices[&Some("disk2".to_string())].serial.as_deref(), Some("A"));
        assert_eq!(devices[&Some("disk3".to_string())].serial.as_deref(), Some("B"));
        assert!(devices.values().all(|info| info.serial.as_deref() != Some("HUB0")));
    }

    #[test]
    fn unmatched_serial_is_keyed_by_absent_disk() {
        let devices = run(&registry(board(Some("0240000012345678"))), &RawTree::empty());
        assert_eq!(devices.len(), 1);
        assert!(devices.contains_key(&None::<String>));
    }

    #[test]
    fn serial_less_board_falls_back_to_product_ids() {
        let devices = run(&registry(board(None)), &topology());
        let info = &devices[&Some("disk4".to_string())];
        assert_eq!(info.serial, None);
        assert_eq!(info.tty, None);
        // the hub above was free to match because the board had no serial
        assert_eq!(devices[&None::<String>].serial.as_deref(), Some("HUB0"));
    }

    #[test]
    fn tty_search_covers_node_and_descendants() {
        let node = RawTree::from(json!({ "IODialinDevice": "/dev/tty.self" }));
        assert_eq!(find_tty(&node).as_deref(), Some("/dev/tty.self"));
        let none = RawTree::from(json!({ "IORegistryEntryChildren": [{ "x": 1 }] }));
        assert_eq!(find_tty(&none), None);
    }
}
