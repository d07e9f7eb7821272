//! Resolve a module, then open it.

use std::ffi::OsString;

use workon_resolve::{Module, Resolver};
use workon_wm::{I3Msg, WmIpc};

use crate::cli::WorkspaceTarget;
use crate::config::Config;
use crate::error::LaunchError;
use crate::files::{FileLister, GoFileLister};
use crate::spawn::{DetachedSpawner, Spawner};

/// Drives one workon invocation.
///
/// The steps run in order and the first failure aborts the rest: resolve
/// the pattern, switch workspace when asked to, start the terminal in the
/// module directory, then start the editor on the module's files.
pub struct Launcher {
	resolver: Resolver,
	terminal: String,
	editor: String,
	wm: Box<dyn WmIpc>,
	spawner: Box<dyn Spawner>,
	lister: Box<dyn FileLister>,
}

impl Launcher {
	/// Launcher talking to i3 and starting real processes.
	pub fn new(config: Config) -> Self {
		Self::with_collaborators(
			config,
			Box::new(I3Msg::default()),
			Box::new(DetachedSpawner),
			Box::new(GoFileLister),
		)
	}

	pub fn with_collaborators(
		config: Config,
		wm: Box<dyn WmIpc>,
		spawner: Box<dyn Spawner>,
		lister: Box<dyn FileLister>,
	) -> Self {
		Self {
			resolver: Resolver::new(config.resolver),
			terminal: config.terminal,
			editor: config.editor,
			wm,
			spawner,
			lister,
		}
	}

	/// Opens the module matching `pattern` and returns it.
	pub fn run(&self, pattern: &str, target: WorkspaceTarget) -> Result<Module, LaunchError> {
		let module = self.resolver.resolve(pattern)?;
		tracing::info!(
			identity = %module.identity,
			dir = %module.directory.display(),
			toolchain = %module.toolchain_version,
			"launch.resolved"
		);

		let number = match target {
			WorkspaceTarget::Current => None,
			WorkspaceTarget::Auto => Some(workon_wm::next_workspace(self.wm.as_ref())?),
			WorkspaceTarget::Number(n) => Some(n),
		};
		if let Some(number) = number {
			workon_wm::switch_to(self.wm.as_ref(), number, module.name())?;
		}

		self.spawner.spawn(&self.terminal, &[], &module.directory)?;

		let files: Vec<OsString> = self
			.lister
			.list(&module.directory)?
			.into_iter()
			.map(Into::into)
			.collect();
		if files.is_empty() {
			tracing::warn!(dir = %module.directory.display(), "launch.files.none");
		}
		self.spawner.spawn(&self.editor, &files, &module.directory)?;

		Ok(module)
	}
}

#[cfg(test)]
mod tests;
