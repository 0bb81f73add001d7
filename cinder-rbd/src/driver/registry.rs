//! Named driver registry.
//!
//! The host process owns a [`DriverRegistry`] and registers the drivers it
//! wants during its own initialization. Nothing registers itself at load time.

use std::collections::BTreeMap;

use cinder_shared::{CinderError, CinderResult};
use parking_lot::RwLock;

use super::VolumeDriver;

/// Constructor for a driver instance.
pub type DriverFactory = Box<dyn Fn() -> CinderResult<Box<dyn VolumeDriver>> + Send + Sync>;

/// Lookup table from driver name to factory.
///
/// Registration takes `&self` so a registry shared behind an `Arc` can be
/// filled and queried from any thread.
#[derive(Default)]
pub struct DriverRegistry {
    factories: RwLock<BTreeMap<String, DriverFactory>>,
}

impl DriverRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `name` to `factory`.
    ///
    /// # Returns
    /// * `Ok(())` - The name was free and is now bound
    /// * `Err(CinderError::DriverAlreadyRegistered)` - The name is taken; the
    ///   existing binding is kept
    pub fn register<F>(&self, name: impl Into<String>, factory: F) -> CinderResult<()>
    where
        F: Fn() -> CinderResult<Box<dyn VolumeDriver>> + Send + Sync + 'static,
    {
        let name = name.into();
        let mut factories = self.factories.write();
        if factories.contains_key(&name) {
            return Err(CinderError::DriverAlreadyRegistered(name));
        }

        tracing::debug!(driver = %name, "Registered volume driver");
        factories.insert(name, Box::new(factory));
        Ok(())
    }

    /// Create a driver instance by looking up its factory.
    ///
    /// # Returns
    /// * `Ok(Box<dyn VolumeDriver>)` - Driver created
    /// * `Err(CinderError::DriverNotFound)` - Name not registered; the error
    ///   lists what is available
    /// * `Err(_)` - The factory itself failed
    pub fn create(&self, name: &str) -> CinderResult<Box<dyn VolumeDriver>> {
        let factories = self.factories.read();
        match factories.get(name) {
            Some(factory) => {
                tracing::debug!(driver = name, "Creating driver instance");
                factory()
            }
            None => Err(CinderError::DriverNotFound {
                name: name.to_string(),
                available: factories.keys().cloned().collect(),
            }),
        }
    }

    /// Check if a driver name is registered.
    pub fn is_registered(&self, name: &str) -> bool {
        self.factories.read().contains_key(name)
    }

    /// Registered driver names, sorted.
    pub fn available_drivers(&self) -> Vec<String> {
        self.factories.read().keys().cloned().collect()
    }
}
