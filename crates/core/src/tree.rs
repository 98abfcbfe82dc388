use serde::Serialize;
use std::collections::BTreeMap;

/// Key under which the device registry stores a node's children.
pub const REGISTRY_CHILDREN: &str = "IORegistryEntryChildren";

/// Untyped document produced by the host tools (ioreg, system_profiler,
/// diskutil). Traversal code only goes through the accessors below.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RawTree {
    Mapping(BTreeMap<String, RawTree>),
    Sequence(Vec<RawTree>),
    Scalar(Scalar),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Scalar {
    String(String),
    Integer(i64),
    Real(f64),
    Boolean(bool),
    Data(Vec<u8>),
    Date(String),
}

impl RawTree {
    pub fn empty() -> Self {
        RawTree::Sequence(Vec::new())
    }

    pub fn is_empty(&self) -> bool {
        match self {
            RawTree::Mapping(map) => map.is_empty(),
            RawTree::Sequence(items) => items.is_empty(),
            RawTree::Scalar(_) => false,
        }
    }

    pub fn as_mapping(&self) -> Option<&BTreeMap<String, RawTree>> {
        match self {
            RawTree::Mapping(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&[RawTree]> {
        match self {
            RawTree::Sequence(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            RawTree::Scalar(Scalar::String(value)) => Some(value),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            RawTree::Scalar(Scalar::Integer(value)) => Some(*value),
            _ => None,
        }
    }

    pub fn get(&self, key: &str) -> Option<&RawTree> {
        self.as_mapping().and_then(|map| map.get(key))
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// String field, or an integer field rendered in decimal.
    pub fn text(&self, key: &str) -> Option<String> {
        match self.get(key)? {
            RawTree::Scalar(Scalar::String(value)) => Some(value.clone()),
            RawTree::Scalar(Scalar::Integer(value)) => Some(value.to_string()),
            _ => None,
        }
    }

    /// Items of a sequence, or the node itself when it is not one.
    pub fn items(&self) -> Vec<&RawTree> {
        match self {
            RawTree::Sequence(items) => items.iter().collect(),
            other => vec![other],
        }
    }
}

pub fn has_children(node: &RawTree) -> bool {
    node.contains_key(REGISTRY_CHILDREN)
}

pub fn get_children(node: &RawTree) -> Option<&RawTree> {
    node.get(REGISTRY_CHILDREN)
}

/// Child nodes of a registry node. A sequence holds one child per item, a
/// mapping is a single child.
pub fn child_nodes(node: &RawTree) -> Vec<&RawTree> {
    match get_children(node) {
        Some(RawTree::Sequence(items)) => items.iter().collect(),
        Some(child @ RawTree::Mapping(_)) => vec![child],
        _ => Vec::new(),
    }
}

impl From<serde_json::Value> for RawTree {
    fn from(value: serde_json::Value) -> Self {
        use serde_json::Value;
        match value {
            Value::Object(map) => RawTree::Mapping(
                map.into_iter()
                    .map(|(key, value)| (key, RawTree::from(value)))
                    .collect(),
            ),
            Value::Array(items) => RawTree::Sequence(items.into_iter().map(RawTree::from).collect()),
            Value::String(value) => RawTree::Scalar(Scalar::String(value)),
            Value::Bool(value) => RawTree::Scalar(Scalar::Boolean(value)),
            Value::Number(number) => match number.as_i64() {
                Some(value) => RawTree::Scalar(Scalar::Integer(value)),
                None => RawTree::Scalar(Scalar::Real(number.as_f64().unwrap_or_default())),
            },
            Value::Null => RawTree::empty(),
        }
    }
}

/// Renders a tree as indented `key => value` lines, scalars before nested
/// collections, for debug output.
pub fn render_tree(tree: &RawTree) -> Vec<String> {
    let mut lines = Vec::new();
    render_into(tree, 0, &mut lines);
    lines
}

const INDENT: &str = "    ";

fn render_into(tree: &RawTree, depth: usize, lines: &mut Vec<String>) {
    match tree {
        RawTree::Sequence(items) => {
            for item in items {
                render_into(item, depth, lines);
                lines.push("~".repeat(80));
            }
        }
        RawTree::Mapping(map) => {
            let width = map.keys().map(|key| key.len()).max().unwrap_or(0);
            let prefix = INDENT.repeat(depth);
            for (key, value) in map {
                if let RawTree::Scalar(scalar) = value {
                    lines.push(format!("{prefix}{key:<width$}  =>  {}", render_scalar(scalar)));
                }
            }
            for (key, value) in map {
                if !matches!(value, RawTree::Scalar(_)) {
                    let arrow = "=".repeat((INDENT.len() * depth).saturating_sub(2));
                    lines.push(format!("{arrow}> {key}"));
                    render_into(value, depth + 1, lines);
                }
            }
        }
        RawTree::Scalar(scalar) => lines.push(format!("{}{}", INDENT.repeat(depth), render_scalar(scalar))),
    }
}

fn render_scalar(scalar: &Scalar) -> String {
    match scalar {
        Scalar::String(value) | Scalar::Date(value) => value.clone(),
        Scalar::Integer(value) => value.to_string(),
        Scalar::Real(value) => value.to_string(),
        Scalar::Boolean(value) => value.to_string(),
        Scalar::Data(bytes) => format!("<{} bytes>", bytes.len()),
    }
}
