use crate::tree::{child_nodes, has_children, RawTree};

pub const ENTRY_NAME: &str = "IORegistryEntryName";
pub const SESSION_ID: &str = "sessionID";
pub const BCD_DEVICE: &str = "bcdDevice";
pub const ROOT_NAME: &str = "Root";

/// A node carrying both a session id and a device revision is the root of
/// a USB device subtree.
pub fn is_device_root(node: &RawTree) -> bool {
    node.contains_key(SESSION_ID) && node.contains_key(BCD_DEVICE)
}

/// Returns the USB device subtrees below every `Root` entry of a registry
/// query. Descent along a branch stops at its first device root.
pub fn filter_registry(root: &RawTree) -> Vec<&RawTree> {
    let mut found = Vec::new();
    for tree in root.items() {
        if tree.get(ENTRY_NAME).and_then(RawTree::as_str) == Some(ROOT_NAME) {
            descend(tree, &mut found);
        }
    }
    found
}

fn descend<'a>(node: &'a RawTree, found: &mut Vec<&'a RawTree>) {
    if !has_children(node) {
        return;
    }
    for child in child_nodes(node) {
        if is_device_root(child) {
            found.push(child);
        } else {
            descend(child, found);
        }
    }
}
