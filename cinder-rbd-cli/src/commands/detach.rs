use std::path::PathBuf;

use anyhow::Context;
use clap::Args;

use crate::cli::{GlobalFlags, VolumeSource};

#[derive(Args, Debug)]
pub struct DetachArgs {
    #[command(flatten)]
    pub source: VolumeSource,

    /// Path the volume is released from
    #[arg(long)]
    pub target: PathBuf,
}

pub fn execute(args: DetachArgs, global: &GlobalFlags) -> anyhow::Result<()> {
    let driver = global.create_driver()?;
    let descriptor = args.source.load()?;

    driver
        .detach(&descriptor, &args.target)
        .with_context(|| format!("Failed to detach volume from {}", args.target.display()))?;

    println!("{}", args.target.display());
    Ok(())
}
