//! Error types for the launcher.

use std::path::PathBuf;

use thiserror::Error;
use workon_resolve::ResolveError;
use workon_wm::WmError;

/// Errors building the configuration. All of them are fatal at startup.
#[derive(Debug, Error)]
pub enum ConfigError {
	/// Error reading the configuration file.
	#[error("I/O error reading {}: {error}", path.display())]
	Io {
		/// Path to the file that failed to read.
		path: PathBuf,
		/// The underlying I/O error.
		error: std::io::Error,
	},

	/// Error parsing the configuration file.
	#[error("parse error in {}: {source}", path.display())]
	Parse {
		/// Path to the offending file.
		path: PathBuf,
		/// The TOML error.
		source: toml::de::Error,
	},

	/// No search root was configured anywhere.
	#[error("no module roots configured (use --root, `roots` in the config file, WORKON_ROOTS or GOPATH)")]
	NoRoots,
}

/// Errors while resolving and launching. All of them end the process.
#[derive(Debug, Error)]
pub enum LaunchError {
	/// The pattern did not resolve to exactly one module.
	#[error(transparent)]
	Resolve(#[from] ResolveError),

	/// The window manager could not switch workspace.
	#[error("switching workspace: {0}")]
	Workspace(#[from] WmError),

	/// A terminal or editor could not be started.
	#[error("starting {program}: {source}")]
	SpawnFailed {
		/// The program as configured.
		program: String,
		/// Lookup or spawn failure.
		source: std::io::Error,
	},

	/// The module's source files could not be listed.
	#[error("finding files to edit in {}: {source}", dir.display())]
	ListFailed {
		/// Module directory.
		dir: PathBuf,
		/// Walk failure.
		source: ignore::Error,
	},
}
