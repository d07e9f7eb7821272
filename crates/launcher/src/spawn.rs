//! Starting the terminal and the editor.

use std::ffi::OsString;
use std::path::Path;
use std::process::{Command, Stdio};

use crate::error::LaunchError;

/// Starts a program without waiting for it.
pub trait Spawner {
	fn spawn(&self, program: &str, args: &[OsString], dir: &Path) -> Result<(), LaunchError>;
}

/// Starts programs found on `PATH`, detached from workon.
///
/// The child runs in `dir` with the inherited environment and null stdio,
/// in a process group of its own so that it survives workon's terminal
/// going away. It is never waited for.
#[derive(Debug, Clone, Copy, Default)]
pub struct DetachedSpawner;

impl Spawner for DetachedSpawner {
	fn spawn(&self, program: &str, args: &[OsString], dir: &Path) -> Result<(), LaunchError> {
		let spawn_failed = |source| LaunchError::SpawnFailed {
			program: program.to_string(),
			source,
		};

		let path = which::which(program).map_err(|err| {
			spawn_failed(std::io::Error::new(
				std::io::ErrorKind::NotFound,
				format!("not found in PATH: {err}"),
			))
		})?;

		let mut cmd = Command::new(&path);
		cmd.args(args)
			.current_dir(dir)
			.stdin(Stdio::null())
			.stdout(Stdio::null())
			.stderr(Stdio::null());
		#[cfg(unix)]
		{
			use std::os::unix::process::CommandExt;
			cmd.process_group(0);
		}

		let child = cmd.spawn().map_err(spawn_failed)?;
		tracing::info!(
			program,
			path = %path.display(),
			pid = child.id(),
			args = args.len(),
			dir = %dir.display(),
			"launch.spawned"
		);
		Ok(())
	}
}
