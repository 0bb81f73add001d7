//! Typed volume record.

use std::fmt;

use cinder_shared::DecodeError;
use cinder_shared::constants::descriptor as keys;
use serde::Serialize;

use super::VolumeDescriptor;

/// Typed view of an RBD volume descriptor.
///
/// Built fresh for every driver call and never mutated afterwards.
/// `hosts` and `ports` are parallel lists of monitor endpoints.
#[derive(Clone, Default, PartialEq, Eq, Serialize)]
pub struct VolumeRecord {
    pub keyring: String,
    pub auth_enabled: bool,
    #[serde(rename = "auth_username")]
    pub auth_user: String,
    pub hosts: Vec<String>,
    pub ports: Vec<String>,
    pub name: String,
    pub access_mode: String,
    pub volume_type: String,
}

impl VolumeRecord {
    /// Name of the backend image, failing when it is empty.
    ///
    /// Every device operation needs it; attach and detach do not.
    pub fn require_name(&self) -> Result<&str, DecodeError> {
        if self.name.is_empty() {
            return Err(DecodeError::MissingField(keys::NAME));
        }
        Ok(&self.name)
    }

    /// Monitor endpoints as `host:port` pairs.
    ///
    /// Pairs are formed positionally; surplus hosts or ports are dropped.
    pub fn endpoints(&self) -> Vec<String> {
        if self.hosts.len() != self.ports.len() {
            tracing::warn!(
                volume = %self.name,
                hosts = self.hosts.len(),
                ports = self.ports.len(),
                "Volume hosts and ports have different lengths"
            );
        }

        self.hosts
            .iter()
            .zip(&self.ports)
            .map(|(host, port)| format!("{}:{}", host, port))
            .collect()
    }

    /// Re-encode the record using the descriptor key names.
    pub fn to_descriptor(&self) -> VolumeDescriptor {
        match serde_json::to_value(self) {
            Ok(serde_json::Value::Object(map)) => map,
            // A struct of strings, bools and string lists always encodes to an object
            _ => VolumeDescriptor::new(),
        }
    }
}

// Keyring material stays out of logs
impl fmt::Debug for VolumeRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VolumeRecord")
            .field("keyring", &if self.keyring.is_empty() { "" } else { "<redacted>" })
            .field("auth_enabled", &self.auth_enabled)
            .field("auth_user", &self.auth_user)
            .field("hosts", &self.hosts)
            .field("ports", &self.ports)
            .field("name", &self.name)
            .field("access_mode", &self.access_mode)
            .field("volume_type", &self.volume_type)
            .finish()
    }
}

impl fmt::Display for VolumeRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rbd:{}", self.name)?;
        if !self.hosts.is_empty() {
            write!(f, " hosts=[{}]", self.hosts.join(","))?;
        }
        if self.auth_enabled {
            write!(f, " user={}", self.auth_user)?;
        }
        if !self.access_mode.is_empty() {
            write!(f, " access_mode={}", self.access_mode)?;
        }
        if !self.volume_type.is_empty() {
            write!(f, " type={}", self.volume_type)?;
        }
        Ok(())
    }
}
