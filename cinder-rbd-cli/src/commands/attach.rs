use std::path::PathBuf;

use anyhow::Context;
use clap::Args;

use crate::cli::{GlobalFlags, VolumeSource};

#[derive(Args, Debug)]
pub struct AttachArgs {
    #[command(flatten)]
    pub source: VolumeSource,

    /// Path the volume is made available at
    #[arg(long)]
    pub target: PathBuf,
}

pub fn execute(args: AttachArgs, global: &GlobalFlags) -> anyhow::Result<()> {
    let driver = global.create_driver()?;
    let descriptor = args.source.load()?;

    driver
        .attach(&descriptor, &args.target)
        .with_context(|| format!("Failed to attach volume at {}", args.target.display()))?;

    println!("{}", args.target.display());
    Ok(())
}
