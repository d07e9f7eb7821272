//! i3 window-manager integration for workon.
//!
//! * [`workspace`]: workspace numbering, independent of any IPC.
//! * [`ipc`]: the [`WmIpc`] seam and its `i3-msg` implementation.

pub mod error;
pub mod ipc;
pub mod workspace;

pub use error::{Result, WmError};
pub use ipc::{I3Msg, MessageKind, WmIpc, list_workspaces, next_workspace, switch_to};
pub use workspace::{Workspace, format_target, next_number, parse_number};
