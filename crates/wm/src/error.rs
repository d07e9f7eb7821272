//! Error types for window-manager integration.

use thiserror::Error;

/// Errors talking to the window manager.
#[derive(Debug, Error)]
pub enum WmError {
	/// The IPC client executable is not on `PATH`.
	#[error("{program}: not found in PATH: {source}")]
	NotFound {
		/// Executable name.
		program: String,
		/// Lookup failure.
		source: which::Error,
	},

	/// The IPC client could not be started.
	#[error("running {command}: {source}")]
	Io {
		/// Full command line, for the message.
		command: String,
		/// The underlying I/O error.
		source: std::io::Error,
	},

	/// The IPC client exited unsuccessfully.
	#[error("{command}: {status}")]
	Command {
		/// Full command line, for the message.
		command: String,
		/// Exit status description.
		status: String,
	},

	/// The reply was not the JSON we expected.
	#[error("decoding {what} reply: {source}")]
	Decode {
		/// Which reply failed to decode.
		what: &'static str,
		/// The JSON error.
		source: serde_json::Error,
	},

	/// The window manager refused a command.
	#[error("{command}: {message}")]
	Rejected {
		/// The command that was refused.
		command: String,
		/// Error reported by the window manager.
		message: String,
	},
}

/// Result type for window-manager operations.
pub type Result<T> = std::result::Result<T, WmError>;
