//! External command execution.
//!
//! Drivers never spawn processes directly; they go through a
//! [`CommandRunner`] and find executables through a [`ToolLocator`], so the
//! workflow can run against fake tools.

mod search;
#[cfg(test)]
pub(crate) mod testing;

use std::io::Read;
use std::path::Path;
use std::process::{Command, Stdio};

use cinder_shared::CommandError;

pub use search::{SearchPath, ToolLocator};

/// Runs an external program to completion and returns its combined output.
pub trait CommandRunner: Send + Sync {
    /// Run `program` with `args`, blocking until it exits.
    ///
    /// Returns stdout and stderr interleaved in the order the program wrote
    /// them on success, or a [`CommandError`] carrying the exit code and the
    /// same combined output.
    fn run(&self, program: &Path, args: &[&str]) -> Result<String, CommandError>;
}

/// Runs commands as real child processes.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, program: &Path, args: &[&str]) -> Result<String, CommandError> {
        tracing::debug!(program = %program.display(), ?args, "Running command");

        let spawn_err = |source| CommandError::Spawn {
            program: program.display().to_string(),
            source,
        };

        // Both streams share one pipe so lines keep their write order.
        let (mut reader, writer) = std::io::pipe().map_err(spawn_err)?;
        let mut child = {
            let mut command = Command::new(program);
            command
                .args(args)
                .stdin(Stdio::null())
                .stdout(writer.try_clone().map_err(spawn_err)?)
                .stderr(writer);
            // The command holds the write ends until dropped; they must be
            // closed before reading to EOF.
            command.spawn().map_err(spawn_err)?
        };

        let mut raw = Vec::new();
        let read = reader.read_to_end(&mut raw);
        let status = child.wait().map_err(spawn_err)?;
        read.map_err(spawn_err)?;

        let combined = String::from_utf8_lossy(&raw).into_owned();

        if !status.success() {
            tracing::debug!(
                program = %program.display(),
                code = ?status.code(),
                "Command failed"
            );
            return Err(CommandError::Exit {
                program: program.display().to_string(),
                args: args.iter().map(|a| a.to_string()).collect(),
                code: status.code(),
                output: combined,
            });
        }

        Ok(combined)
    }
}
