use mbedls_core::{AcquisitionError, RawTree, Scalar};
use plist::Value;
use std::io::Cursor;

/// Parses property-list output (XML or binary). Empty output is an empty
/// tree, which is what the tools print when nothing matches the query.
pub fn parse_plist(bytes: &[u8], what: &str) -> Result<RawTree, AcquisitionError> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(RawTree::empty());
    }
    let value = Value::from_reader(Cursor::new(bytes)).map_err(|err| AcquisitionError::Parse {
        what: what.to_string(),
        reason: err.to_string(),
    })?;
    Ok(to_raw_tree(value))
}

pub fn to_raw_tree(value: Value) -> RawTree {
    match value {
        Value::Dictionary(dict) => RawTree::Mapping(
            dict.into_iter()
                .map(|(key, value)| (key, to_raw_tree(value)))
                .collect(),
        ),
        Value::Array(items) => RawTree::Sequence(items.into_iter().map(to_raw_tree).collect()),
        Value::String(value) => RawTree::Scalar(Scalar::String(value)),
        Value::Boolean(value) => RawTree::Scalar(Scalar::Boolean(value)),
        Value::Real(value) => RawTree::Scalar(Scalar::Real(value)),
        Value::Integer(value) => match value.as_signed() {
            Some(value) => RawTree::Scalar(Scalar::Integer(value)),
            None => RawTree::Scalar(Scalar::String(value.as_unsigned().unwrap_or_default().to_string())),
        },
        Value::Data(bytes) => RawTree::Scalar(Scalar::Data(bytes)),
        Value::Date(date) => RawTree::Scalar(Scalar::Date(date.to_xml_format())),
        Value::Uid(uid) => RawTree::Scalar(Scalar::String(uid.get().to_string())),
        _ => RawTree::empty(),
    }
}
