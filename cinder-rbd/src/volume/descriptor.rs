//! Descriptor decoding.
//!
//! Each recognized key is pulled out and checked on its own so a bad
//! descriptor fails with the name of the offending field. Missing keys and
//! `null` values fall back to the empty value of the field, unknown keys are
//! ignored. Keys match case-insensitively (`"Name"` fills `name`); an exact
//! match wins over a case-folded one.
//!
//! Coercions, applied only where the intent is unambiguous:
//! - a single string where a list is expected becomes a one-element list
//! - an integer where a string list element is expected becomes its decimal form

use cinder_shared::DecodeError;
use cinder_shared::constants::descriptor as keys;
use serde_json::Value;

use super::{VolumeDescriptor, VolumeRecord};

/// Decode a descriptor into a [`VolumeRecord`].
///
/// Never returns a partially filled record: the first incompatible field
/// aborts the whole decode.
pub fn decode(descriptor: &VolumeDescriptor) -> Result<VolumeRecord, DecodeError> {
    Ok(VolumeRecord {
        keyring: string_field(descriptor, keys::KEYRING)?,
        auth_enabled: bool_field(descriptor, keys::AUTH_ENABLED)?,
        auth_user: string_field(descriptor, keys::AUTH_USERNAME)?,
        hosts: string_list_field(descriptor, keys::HOSTS)?,
        ports: string_list_field(descriptor, keys::PORTS)?,
        name: string_field(descriptor, keys::NAME)?,
        access_mode: string_field(descriptor, keys::ACCESS_MODE)?,
        volume_type: string_field(descriptor, keys::VOLUME_TYPE)?,
    })
}

/// Parse descriptor JSON text. The top-level value must be an object.
pub fn descriptor_from_json(text: &str) -> Result<VolumeDescriptor, DecodeError> {
    match serde_json::from_str::<Value>(text)? {
        Value::Object(map) => Ok(map),
        other => Err(DecodeError::NotAnObject(kind(&other))),
    }
}

fn present<'a>(descriptor: &'a VolumeDescriptor, key: &str) -> Option<&'a Value> {
    descriptor
        .get(key)
        .or_else(|| {
            descriptor
                .iter()
                .find(|(k, _)| k.eq_ignore_ascii_case(key))
                .map(|(_, value)| value)
        })
        .filter(|value| !value.is_null())
}

fn string_field(descriptor: &VolumeDescriptor, key: &'static str) -> Result<String, DecodeError> {
    match present(descriptor, key) {
        None => Ok(String::new()),
        Some(Value::String(s)) => Ok(s.clone()),
        Some(other) => Err(DecodeError::FieldType {
            field: key,
            expected: "string",
            found: kind(other),
        }),
    }
}

fn bool_field(descriptor: &VolumeDescriptor, key: &'static str) -> Result<bool, DecodeError> {
    match present(descriptor, key) {
        None => Ok(false),
        Some(Value::Bool(b)) => Ok(*b),
        Some(other) => Err(DecodeError::FieldType {
            field: key,
            expected: "boolean",
            found: kind(other),
        }),
    }
}

fn string_list_field(
    descriptor: &VolumeDescriptor,
    key: &'static str,
) -> Result<Vec<String>, DecodeError> {
    match present(descriptor, key) {
        None => Ok(Vec::new()),
        Some(Value::String(s)) => Ok(vec![s.clone()]),
        Some(Value::Array(items)) => items
            .iter()
            .enumerate()
            .map(|(index, item)| list_element(key, index, item))
            .collect(),
        Some(other) => Err(DecodeError::FieldType {
            field: key,
            expected: "list of strings",
            found: kind(other),
        }),
    }
}

fn list_element(field: &'static str, index: usize, item: &Value) -> Result<String, DecodeError> {
    match item {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) if n.is_i64() || n.is_u64() => Ok(n.to_string()),
        other => Err(DecodeError::ElementType {
            field,
            index,
            found: kind(other),
        }),
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "object",
    }
}
