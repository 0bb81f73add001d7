//! Volume descriptors and the typed records decoded from them.
//!
//! The host framework hands drivers a loosely-typed key/value mapping:
//! - `VolumeDescriptor` - the raw mapping as received
//! - `VolumeRecord` - the validated, read-only view built from it
//! - `decode` - field-by-field extraction with per-field errors

mod descriptor;
mod record;

pub use descriptor::{decode, descriptor_from_json};
pub use record::VolumeRecord;

/// Untyped volume descriptor as provided by the host framework.
pub type VolumeDescriptor = serde_json::Map<String, serde_json::Value>;
