//! # cinder-rbd - Ceph RBD volume driver
//!
//! Maps RBD images to local block devices and makes sure they carry the
//! requested filesystem, creating one only when it is missing. Drivers are
//! exposed to the host framework through a [`DriverRegistry`] the host fills
//! explicitly at startup.
//!
//! | Module | Purpose |
//! |---|---|
//! | [`volume`] | Descriptor decoding into [`VolumeRecord`]. |
//! | [`driver`] | [`VolumeDriver`] trait and [`DriverRegistry`]. |
//! | [`rbd`] | [`RbdDriver`]: attach, detach, map/inspect/format workflow. |
//! | [`exec`] | Command execution and tool lookup. |
//! | [`options`] | [`DriverOptions`] loading. |
//! | [`logging`] | Tracing subscriber setup for host processes. |
//!
//! ```rust,no_run
//! use cinder_rbd::{DriverOptions, DriverRegistry, descriptor_from_json, rbd};
//!
//! let registry = DriverRegistry::new();
//! rbd::register(&registry, DriverOptions::load(None)?)?;
//!
//! let driver = registry.create("rbd")?;
//! let descriptor = descriptor_from_json(r#"{"name": "volume-1"}"#)?;
//! driver.format(&descriptor, "ext4")?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod driver;
pub mod exec;
pub mod logging;
pub mod options;
pub mod rbd;
pub mod volume;

pub use cinder_shared::constants;
pub use cinder_shared::{CinderError, CinderResult, CommandError, DecodeError};
pub use driver::{DriverRegistry, VolumeDriver};
pub use options::DriverOptions;
pub use rbd::RbdDriver;
pub use volume::{VolumeDescriptor, VolumeRecord, decode, descriptor_from_json};
