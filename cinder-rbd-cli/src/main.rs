//! cinder-rbd: operator front end for the RBD volume driver.

mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let _log_guard =
        cinder_rbd::logging::init_tracing(&cli.global.log_level, cli.global.log_file.as_deref())?;

    match cli.command {
        Commands::Attach(args) => commands::attach::execute(args, &cli.global),
        Commands::Detach(args) => commands::detach::execute(args, &cli.global),
        Commands::Format(args) => commands::format::execute(args, &cli.global),
        Commands::Show(args) => commands::show::execute(args),
        Commands::Drivers => commands::drivers::execute(&cli.global),
    }
}
