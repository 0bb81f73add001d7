//! Volume driver abstraction for the host framework.

use std::path::Path;

use cinder_shared::CinderResult;

use crate::volume::VolumeDescriptor;

pub mod registry;

pub use registry::{DriverFactory, DriverRegistry};

/// Operations the host framework dispatches to a volume driver.
///
/// Every call decodes its descriptor afresh and blocks until done. Callers
/// serialize operations on the same volume; drivers do no locking.
pub trait VolumeDriver: Send + Sync {
    /// Name the driver is registered under.
    fn name(&self) -> &str;

    /// Make the volume available at `target_path`.
    fn attach(&self, descriptor: &VolumeDescriptor, target_path: &Path) -> CinderResult<()>;

    /// Release the volume from `target_path`.
    fn detach(&self, descriptor: &VolumeDescriptor, target_path: &Path) -> CinderResult<()>;

    /// Ensure the volume carries a `fs_type` filesystem, creating one if needed.
    fn format(&self, descriptor: &VolumeDescriptor, fs_type: &str) -> CinderResult<()>;
}
