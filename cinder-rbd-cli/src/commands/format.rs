use anyhow::Context;
use clap::Args;

use crate::cli::{GlobalFlags, VolumeSource};

#[derive(Args, Debug)]
pub struct FormatArgs {
    #[command(flatten)]
    pub source: VolumeSource,

    /// Filesystem type; `mkfs.<FS_TYPE>` must be on the search path
    #[arg(long, default_value = "ext4")]
    pub fs_type: String,
}

pub fn execute(args: FormatArgs, global: &GlobalFlags) -> anyhow::Result<()> {
    let driver = global.create_driver()?;
    let descriptor = args.source.load()?;

    driver
        .format(&descriptor, &args.fs_type)
        .with_context(|| format!("Failed to format volume as {}", args.fs_type))?;

    tracing::info!(fs_type = %args.fs_type, "Volume formatted");
    Ok(())
}
