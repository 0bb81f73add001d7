//! RBD device mapping.
//!
//! Provides the map/unmap/flatten calls and the RAII-managed mapping:
//! - `Rbd` - the `rbd` tool bound to a runner
//! - `MappedDevice` - a mapped block device, unmapped on drop
//! - `map_volume` - map with the flatten-and-retry remediation

use std::path::Path;

use cinder_shared::{CinderError, CinderResult, CommandError};

use crate::exec::CommandRunner;

/// The `rbd` executable and the runner used to invoke it.
#[derive(Clone, Copy)]
pub(crate) struct Rbd<'a> {
    runner: &'a dyn CommandRunner,
    path: &'a Path,
}

impl<'a> Rbd<'a> {
    pub(crate) fn new(runner: &'a dyn CommandRunner, path: &'a Path) -> Self {
        Self { runner, path }
    }

    /// `rbd map <volume>`, returning the device path it printed.
    fn map(&self, volume: &str) -> Result<String, CommandError> {
        let output = self.runner.run(self.path, &["map", volume])?;
        device_from_output(&output).ok_or_else(|| CommandError::BadOutput {
            program: self.path.display().to_string(),
            args: vec!["map".to_string(), volume.to_string()],
            reason: "printed no device path".to_string(),
        })
    }

    /// `rbd unmap <device>`.
    fn unmap(&self, device: &str) -> Result<(), CommandError> {
        self.runner.run(self.path, &["unmap", device]).map(drop)
    }

    /// `rbd flatten <volume>`: detach the image from its parent chain.
    fn flatten(&self, volume: &str) -> Result<(), CommandError> {
        self.runner.run(self.path, &["flatten", volume]).map(drop)
    }
}

/// Device path from `rbd map` output: the last non-empty line, trimmed.
fn device_from_output(output: &str) -> Option<String> {
    output
        .lines()
        .map(str::trim)
        .rfind(|line| !line.is_empty())
        .map(str::to_string)
}

/// RAII-managed block device mapping.
///
/// Runs `rbd unmap` exactly once when dropped. Unmap failures are logged
/// and otherwise ignored.
pub(crate) struct MappedDevice<'a> {
    rbd: Rbd<'a>,
    device: String,
}

impl MappedDevice<'_> {
    /// Local block device path (e.g. `/dev/rbd0`).
    pub(crate) fn path(&self) -> &str {
        &self.device
    }
}

impl Drop for MappedDevice<'_> {
    fn drop(&mut self) {
        match self.rbd.unmap(&self.device) {
            Ok(()) => tracing::debug!(device = %self.device, "Unmapped rbd device"),
            Err(e) => tracing::warn!(device = %self.device, "rbd unmap failed: {}", e),
        }
    }
}

/// Map `volume` to a local block device.
///
/// A map failing with EINVAL (status 22) usually means the image has too
/// many parent layers: the image is flattened and mapped once more. If the
/// flatten fails the original map error is reported. Any other failure is
/// reported immediately.
pub(crate) fn map_volume<'a>(rbd: Rbd<'a>, volume: &str) -> CinderResult<MappedDevice<'a>> {
    let device = match rbd.map(volume) {
        Ok(device) => device,
        Err(e) if e.is_invalid_argument() => {
            tracing::warn!(volume, "rbd map volume failed: {}. try to flatten it", e);

            if let Err(flatten_err) = rbd.flatten(volume) {
                tracing::warn!(volume, "rbd flatten volume failed: {}", flatten_err);
                return Err(map_failed(volume, e));
            }

            rbd.map(volume).map_err(|retry_err| {
                tracing::warn!(volume, "rbd map after flatten failed: {}", retry_err);
                map_failed(volume, retry_err)
            })?
        }
        Err(e) => return Err(map_failed(volume, e)),
    };

    tracing::info!(volume, device = %device, "Mapped rbd volume");
    Ok(MappedDevice { rbd, device })
}

fn map_failed(volume: &str, source: CommandError) -> CinderError {
    CinderError::MapFailed {
        volume: volume.to_string(),
        source,
    }
}
