use std::path::PathBuf;

use anyhow::Context;
use cinder_rbd::constants::{drivers, envs};
use cinder_rbd::{DriverOptions, DriverRegistry, VolumeDescriptor, VolumeDriver};
use clap::{Args, Parser, Subcommand};

use crate::commands;

/// Attach, detach and format Ceph RBD volumes
#[derive(Parser, Debug)]
#[command(name = "cinder-rbd", author, version, about)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalFlags,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Record that a volume is attached at a target path
    Attach(commands::attach::AttachArgs),
    /// Record that a volume is detached from a target path
    Detach(commands::detach::DetachArgs),
    /// Map a volume and create a filesystem on it unless one exists
    Format(commands::format::FormatArgs),
    /// Print a decoded volume descriptor
    Show(commands::show::ShowArgs),
    /// List registered volume drivers
    Drivers,
}

#[derive(Args, Debug)]
pub struct GlobalFlags {
    /// Log level used when RUST_LOG is not set
    #[arg(long, global = true, default_value = "warn")]
    pub log_level: String,

    /// Write logs to this file instead of stderr
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    /// Driver options file (JSON)
    #[arg(long, global = true, env = envs::CONFIG)]
    pub config: Option<PathBuf>,
}

impl GlobalFlags {
    /// Registry holding every driver this binary ships.
    pub fn create_registry(&self) -> anyhow::Result<DriverRegistry> {
        let options = DriverOptions::load(self.config.as_deref())?;
        let registry = DriverRegistry::new();
        cinder_rbd::rbd::register(&registry, options)?;
        Ok(registry)
    }

    pub fn create_driver(&self) -> anyhow::Result<Box<dyn VolumeDriver>> {
        Ok(self.create_registry()?.create(drivers::RBD)?)
    }
}

/// Where the volume descriptor comes from.
#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
pub struct VolumeSource {
    /// Volume descriptor as a JSON object
    #[arg(long)]
    pub volume: Option<String>,

    /// File containing the volume descriptor JSON
    #[arg(long)]
    pub volume_file: Option<PathBuf>,
}

impl VolumeSource {
    pub fn load(&self) -> anyhow::Result<VolumeDescriptor> {
        let text = match (&self.volume, &self.volume_file) {
            (Some(json), _) => json.clone(),
            (None, Some(path)) => std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?,
            (None, None) => anyhow::bail!("a volume descriptor is required"),
        };
        Ok(cinder_rbd::descriptor_from_json(&text)?)
    }
}
