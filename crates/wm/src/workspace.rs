//! Workspace numbering.
//!
//! i3 workspaces are identified by a name; a name starting with a number
//! (`"3"` or `"3:mail"`) also gives the workspace a number, which is what
//! keyboard bindings use. New workspaces opened by workon get the lowest
//! free number, labelled after the module.

use serde::Deserialize;

/// A workspace as reported by the window manager.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "WorkspaceReply")]
pub struct Workspace {
	/// Logical number, when the workspace has one.
	pub number: Option<u32>,
	/// Workspace name.
	pub label: String,
	/// Whether the workspace has the focus.
	pub focused: bool,
	/// Whether the workspace is visible on some output.
	pub visible: bool,
}

/// Wire shape of one entry of the `get_workspaces` reply.
/// i3 reports `num == -1` for named workspaces.
#[derive(Deserialize)]
struct WorkspaceReply {
	num: Option<i64>,
	name: String,
	#[serde(default)]
	focused: bool,
	#[serde(default)]
	visible: bool,
}

impl From<WorkspaceReply> for Workspace {
	fn from(reply: WorkspaceReply) -> Self {
		Self {
			number: reply.num.and_then(|n| u32::try_from(n).ok()).filter(|&n| n > 0),
			label: reply.name,
			focused: reply.focused,
			visible: reply.visible,
		}
	}
}

impl Workspace {
	/// Builds a numbered workspace with the default name.
	pub fn numbered(number: u32) -> Self {
		Self {
			number: Some(number),
			label: number.to_string(),
			..Self::default()
		}
	}

	/// Builds a workspace known only by its name.
	pub fn labelled(label: impl Into<String>) -> Self {
		Self {
			label: label.into(),
			..Self::default()
		}
	}

	/// The number this workspace occupies, if any.
	///
	/// An explicit positive number wins; otherwise the number is taken from
	/// the name.
	pub fn effective_number(&self) -> Option<u32> {
		self.number.filter(|&n| n > 0).or_else(|| parse_number(&self.label))
	}
}

/// Parses the number prefix of a workspace name.
///
/// Only `"<n>"` and `"<n>:<rest>"` are recognized, with `n` made of decimal
/// digits. i3 is more permissive (it also accepts `"<n><rest>"`), but those
/// names are not produced here. Returns `None` for names without a number,
/// for negative numbers and for zero.
pub fn parse_number(label: &str) -> Option<u32> {
	let digits = label.split_once(':').map_or(label, |(n, _)| n);
	if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
		return None;
	}
	digits.parse::<u32>().ok().filter(|&n| n > 0)
}

/// Formats a workspace target as `"<n>:<label>"`.
pub fn format_target(number: u32, label: &str) -> String {
	format!("{number}:{label}")
}

/// Returns the lowest positive number not used by any workspace.
///
/// Workspaces without a number are ignored.
pub fn next_number(existing: &[Workspace]) -> u32 {
	let mut numbers: Vec<u32> = existing.iter().filter_map(Workspace::effective_number).collect();
	numbers.sort_unstable();
	numbers.dedup();

	let mut next = 1;
	for number in numbers {
		if number > next {
			return next;
		}
		next = number.saturating_add(1);
	}
	next
}
