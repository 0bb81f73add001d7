//! Ceph RBD volume driver.
//!
//! Attach and detach only validate and record the request; making the
//! device visible at the target path is left to the host. Format is the
//! real work:
//!
//! ```text
//! Start → ToolsResolved → Mapped → Inspected → {Formatted | Skipped} → Unmapped
//! ```
//!
//! Any step may fail instead; once the volume is mapped, the unmap runs on
//! every exit path.

mod filesystem;
mod mapping;

use std::path::Path;
use std::sync::Arc;

use cinder_shared::CinderResult;
use cinder_shared::constants::{drivers, tools};

use crate::driver::{DriverRegistry, VolumeDriver};
use crate::exec::{CommandRunner, SystemRunner, ToolLocator};
use crate::options::DriverOptions;
use crate::volume::{self, VolumeDescriptor};

use mapping::{Rbd, map_volume};

/// Volume driver for Ceph RBD images.
#[derive(Clone)]
pub struct RbdDriver {
    runner: Arc<dyn CommandRunner>,
    locator: Arc<dyn ToolLocator>,
}

impl RbdDriver {
    /// Driver running real processes, finding tools on the configured search path.
    pub fn new(options: &DriverOptions) -> Self {
        Self::with_parts(Arc::new(SystemRunner), Arc::new(options.search_path()))
    }

    /// Driver with explicit command runner and tool locator.
    pub fn with_parts(runner: Arc<dyn CommandRunner>, locator: Arc<dyn ToolLocator>) -> Self {
        Self { runner, locator }
    }
}

impl VolumeDriver for RbdDriver {
    fn name(&self) -> &str {
        drivers::RBD
    }

    fn attach(&self, descriptor: &VolumeDescriptor, target_path: &Path) -> CinderResult<()> {
        let volume = volume::decode(descriptor)?;

        tracing::debug!(
            volume = %volume,
            endpoints = ?volume.endpoints(),
            target = %target_path.display(),
            "Attach cinder rbd volume"
        );
        Ok(())
    }

    fn detach(&self, descriptor: &VolumeDescriptor, target_path: &Path) -> CinderResult<()> {
        let volume = volume::decode(descriptor)?;

        tracing::debug!(
            volume = %volume,
            target = %target_path.display(),
            "Detach cinder rbd volume"
        );
        Ok(())
    }

    fn format(&self, descriptor: &VolumeDescriptor, fs_type: &str) -> CinderResult<()> {
        let volume = volume::decode(descriptor)?;
        tracing::debug!(volume = %volume, fs_type, "Format cinder rbd volume");
        let name = volume.require_name()?;

        // Both lookups happen before anything touches the image
        let rbd_path = self.locator.require(tools::RBD)?;
        let file_path = self.locator.require(tools::FILE)?;
        let runner = self.runner.as_ref();

        let device = map_volume(Rbd::new(runner, &rbd_path), name)?;

        let info = filesystem::inspect(runner, &file_path, name, device.path())?;
        if filesystem::has_filesystem(&info, fs_type) {
            tracing::info!(
                volume = name,
                device = device.path(),
                fs_type,
                "Filesystem already present, skipping format"
            );
            return Ok(());
        }

        let mkfs_path = self.locator.require(&tools::mkfs(fs_type))?;
        filesystem::make_filesystem(runner, &mkfs_path, name, device.path(), fs_type)
    }
}

/// Register the RBD driver under `"rbd"`.
///
/// Each created instance uses `options` as given at registration time.
pub fn register(registry: &DriverRegistry, options: DriverOptions) -> CinderResult<()> {
    registry.register(drivers::RBD, move || {
        Ok(Box::new(RbdDriver::new(&options)) as Box<dyn VolumeDriver>)
    })
}
