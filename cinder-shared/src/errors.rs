//! Hierarchical error types for the cinder drivers.
//!
//! Errors are grouped by where they come from:
//! - [`DecodeError`]: the volume descriptor has the wrong shape (caller-fixable)
//! - [`CommandError`]: an external tool could not run or exited non-zero
//! - [`CinderError`]: what a driver operation reports to its caller

use std::io;
use thiserror::Error;

use crate::constants::status;

/// Result alias used across the cinder crates.
pub type CinderResult<T> = Result<T, CinderError>;

// ============================================================================
// Top-Level Error
// ============================================================================

/// Errors returned by driver operations.
///
/// None of these are retried by the driver itself; the only built-in
/// recovery is the flatten-and-remap path, whose outcome ends up in
/// [`CinderError::MapFailed`] when it does not help.
#[derive(Debug, Error)]
pub enum CinderError {
    /// The volume descriptor does not match the volume record shape.
    #[error("decode volume descriptor: {0}")]
    Decode(#[from] DecodeError),

    /// A required executable is not on the search path.
    #[error("{0} command not found")]
    ToolNotFound(String),

    /// Mapping the volume to a local block device failed.
    #[error("rbd map {volume} failed: {source}")]
    MapFailed {
        volume: String,
        #[source]
        source: CommandError,
    },

    /// Inspecting the mapped device failed.
    #[error("file -s on volume {volume} ({device}) failed: {source}")]
    InspectFailed {
        volume: String,
        device: String,
        #[source]
        source: CommandError,
    },

    /// Creating the filesystem on the mapped device failed.
    #[error("rbd format {volume} ({device}) as {fs_type} failed: {source}")]
    FormatFailed {
        volume: String,
        device: String,
        fs_type: String,
        #[source]
        source: CommandError,
    },

    /// No driver is registered under the requested name.
    #[error("driver {name:?} is not registered. Available drivers: {available:?}")]
    DriverNotFound {
        name: String,
        available: Vec<String>,
    },

    /// A driver is already registered under this name.
    #[error("driver {0:?} is already registered")]
    DriverAlreadyRegistered(String),

    /// Driver options could not be loaded.
    #[error("config: {0}")]
    Config(String),
}

// ============================================================================
// Decode Errors (descriptor shape, caller-fixable)
// ============================================================================

/// Errors while turning a loosely-typed descriptor into a volume record.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The descriptor text is not valid JSON.
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The descriptor is valid JSON but not an object.
    #[error("descriptor must be an object, found {0}")]
    NotAnObject(&'static str),

    /// A field holds a value of an incompatible type.
    #[error("field `{field}`: expected {expected}, found {found}")]
    FieldType {
        field: &'static str,
        expected: &'static str,
        found: &'static str,
    },

    /// A list element holds a value of an incompatible type.
    #[error("field `{field}[{index}]`: expected string, found {found}")]
    ElementType {
        field: &'static str,
        index: usize,
        found: &'static str,
    },

    /// A field required by the operation is missing or empty.
    #[error("field `{0}` is required")]
    MissingField(&'static str),
}

// ============================================================================
// Command Errors (external tool invocation)
// ============================================================================

/// Failure of a single external command.
#[derive(Debug, Error)]
pub enum CommandError {
    /// The process could not be started.
    #[error("failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    /// The process ran and exited unsuccessfully.
    #[error(
        "{program} {} exited with {}: {}",
        .args.join(" "),
        describe_exit(.code),
        .output.trim()
    )]
    Exit {
        program: String,
        args: Vec<String>,
        /// Exit code, `None` when the process was killed by a signal.
        code: Option<i32>,
        /// Combined stdout and stderr.
        output: String,
    },

    /// The process succeeded but its output could not be used.
    #[error("{program} {} succeeded but {reason}", .args.join(" "))]
    BadOutput {
        program: String,
        args: Vec<String>,
        reason: String,
    },
}

impl CommandError {
    /// Exit code of the failed process, if it exited normally.
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            CommandError::Exit { code, .. } => *code,
            CommandError::Spawn { .. } | CommandError::BadOutput { .. } => None,
        }
    }

    /// Whether the tool rejected the request with EINVAL (status 22).
    pub fn is_invalid_argument(&self) -> bool {
        self.exit_code() == Some(status::INVALID_ARGUMENT)
    }
}

fn describe_exit(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit status {}", code),
        None => "signal".to_string(),
    }
}
