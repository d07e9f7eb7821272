//! i3 IPC through the `i3-msg` client.

use std::fmt;
use std::process::{Command, Stdio};

use serde::Deserialize;

use crate::error::{Result, WmError};
use crate::workspace::{Workspace, format_target, next_number};

/// i3 IPC message types used by workon.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
	/// Run a command, e.g. `workspace 3:mail`.
	Command,
	/// List the current workspaces.
	GetWorkspaces,
}

impl MessageKind {
	pub fn as_str(self) -> &'static str {
		match self {
			MessageKind::Command => "command",
			MessageKind::GetWorkspaces => "get_workspaces",
		}
	}
}

impl fmt::Display for MessageKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Sends one message to the window manager and returns the raw reply.
pub trait WmIpc {
	fn invoke(&self, kind: MessageKind, payload: &str) -> Result<Vec<u8>>;
}

/// [`WmIpc`] implementation running `i3-msg -t <kind> <payload>`.
///
/// The child's stderr goes to ours; stdout is returned as the reply.
#[derive(Debug, Clone)]
pub struct I3Msg {
	program: String,
}

impl Default for I3Msg {
	fn default() -> Self {
		Self::new("i3-msg")
	}
}

impl I3Msg {
	pub fn new(program: impl Into<String>) -> Self {
		Self { program: program.into() }
	}
}

impl WmIpc for I3Msg {
	fn invoke(&self, kind: MessageKind, payload: &str) -> Result<Vec<u8>> {
		let command = format!("{} -t {kind} {payload}", self.program).trim_end().to_string();
		let path = which::which(&self.program).map_err(|source| WmError::NotFound {
			program: self.program.clone(),
			source,
		})?;

		let mut cmd = Command::new(path);
		cmd.arg("-t").arg(kind.as_str());
		if !payload.is_empty() {
			cmd.arg(payload);
		}

		tracing::debug!(%kind, payload, "wm.invoke");
		let output = cmd
			.stdin(Stdio::null())
			.stderr(Stdio::inherit())
			.output()
			.map_err(|source| WmError::Io {
				command: command.clone(),
				source,
			})?;

		if !output.status.success() {
			return Err(WmError::Command {
				command,
				status: output.status.to_string(),
			});
		}

		Ok(output.stdout)
	}
}

#[derive(Deserialize)]
struct CommandReply {
	success: bool,
	#[serde(default)]
	error: Option<String>,
}

/// Returns the current workspaces.
pub fn list_workspaces(ipc: &dyn WmIpc) -> Result<Vec<Workspace>> {
	let reply = ipc.invoke(MessageKind::GetWorkspaces, "")?;
	serde_json::from_slice(&reply).map_err(|source| WmError::Decode {
		what: "get_workspaces",
		source,
	})
}

/// Returns the lowest workspace number not currently in use.
pub fn next_workspace(ipc: &dyn WmIpc) -> Result<u32> {
	let workspaces = list_workspaces(ipc)?;
	let next = next_number(&workspaces);
	tracing::debug!(existing = workspaces.len(), next, "wm.workspace.next");
	Ok(next)
}

/// Switches to workspace `<number>:<label>`, creating it if needed.
pub fn switch_to(ipc: &dyn WmIpc, number: u32, label: &str) -> Result<()> {
	let command = format!("workspace {}", format_target(number, label));
	let reply = ipc.invoke(MessageKind::Command, &command)?;

	let outcomes: Vec<CommandReply> = serde_json::from_slice(&reply).map_err(|source| WmError::Decode {
		what: "command",
		source,
	})?;
	if let Some(failed) = outcomes.into_iter().find(|o| !o.success) {
		return Err(WmError::Rejected {
			command,
			message: failed.error.unwrap_or_else(|| "command failed".to_string()),
		});
	}

	tracing::info!(number, label, "wm.workspace.switched");
	Ok(())
}
