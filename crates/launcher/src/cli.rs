//! CLI schema and parsing helpers for the workon binary.

use std::path::PathBuf;

use clap::Parser;

/// Default terminal, as chosen by i3.
pub const DEFAULT_TERMINAL: &str = "i3-sensible-terminal";
/// Default editor, as chosen by i3.
pub const DEFAULT_EDITOR: &str = "i3-sensible-editor";

/// Where to open the module, window-manager wise.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkspaceTarget {
	/// Stay on the current workspace.
	Current,
	/// Use the lowest workspace number not in use.
	Auto,
	/// Use this workspace number.
	Number(u32),
}

impl WorkspaceTarget {
	/// Parses `auto` or a workspace number; `0` means the current workspace.
	pub fn parse(s: &str) -> Result<Self, String> {
		if s.eq_ignore_ascii_case("auto") {
			return Ok(Self::Auto);
		}
		match s.parse::<u32>() {
			Ok(0) => Ok(Self::Current),
			Ok(n) => Ok(Self::Number(n)),
			Err(_) => Err(format!("expected a workspace number or `auto`, got {s:?}")),
		}
	}
}

#[derive(Parser, Debug)]
#[command(name = "workon")]
#[command(about = "Open a terminal and an editor on a local Go module")]
#[command(version)]
/// Command-line arguments.
pub struct Cli {
	/// Module path pattern (e.g. github.com/perillo/workon or .../workon)
	pub pattern: String,

	/// Workspace to switch to: a number, or `auto` for the first free one
	#[arg(long, short = 'w', value_name = "N|auto", value_parser = WorkspaceTarget::parse)]
	pub workspace: Option<WorkspaceTarget>,

	/// Terminal to start in the module directory
	#[arg(long, value_name = "CMD")]
	pub terminal: Option<String>,

	/// Editor to start on the module files
	#[arg(long, value_name = "CMD")]
	pub editor: Option<String>,

	/// Root directory to search (repeatable, overrides configuration)
	#[arg(long = "root", value_name = "DIR")]
	pub roots: Vec<PathBuf>,

	/// Verbose logging
	#[arg(long, short)]
	pub verbose: bool,
}

impl Cli {
	/// The workspace target, `Current` when none was given.
	pub fn workspace_target(&self) -> WorkspaceTarget {
		self.workspace.unwrap_or(WorkspaceTarget::Current)
	}
}

#[cfg(test)]
mod tests;
