use cinder_rbd::constants::descriptor as keys;
use clap::Args;

use crate::cli::VolumeSource;

#[derive(Args, Debug)]
pub struct ShowArgs {
    #[command(flatten)]
    pub source: VolumeSource,

    /// Print the record as a descriptor JSON object (keyring removed)
    #[arg(long)]
    pub json: bool,
}

pub fn execute(args: ShowArgs) -> anyhow::Result<()> {
    let volume = cinder_rbd::decode(&args.source.load()?)?;

    if args.json {
        let mut descriptor = volume.to_descriptor();
        descriptor.remove(keys::KEYRING);
        println!("{}", serde_json::to_string_pretty(&descriptor)?);
    } else {
        println!("{}", volume);
        let endpoints = volume.endpoints();
        if !endpoints.is_empty() {
            println!("endpoints: {}", endpoints.join(","));
        }
    }
    Ok(())
}
