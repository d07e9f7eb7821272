//! Resolved modules and the candidates they are built from.

use std::path::{Path, PathBuf};

use crate::error::LoadError;

/// A local module that passed every check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Module {
	/// Module path, as declared by the `module` directive or derived from
	/// the directory when the directive is missing.
	pub identity: String,
	/// Module version from the `module` directive, normally absent.
	pub version: Option<String>,
	/// Directory holding the module files.
	pub directory: PathBuf,
	/// Path to the manifest backing this module.
	pub manifest_path: PathBuf,
	/// Toolchain version from the `go` directive, or the configured default.
	pub toolchain_version: String,
	/// Search root this module was found under.
	pub root: PathBuf,
}

impl Module {
	/// Returns the short name of the module: the last element of its identity.
	pub fn name(&self) -> &str {
		match self.identity.rfind('/') {
			Some(i) if i > 0 => &self.identity[i + 1..],
			_ => &self.identity,
		}
	}
}

/// A manifest location discovered by the root walker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawCandidate {
	/// Root the manifest was found under.
	pub root: PathBuf,
	/// Directory containing the manifest.
	pub directory: PathBuf,
	/// The manifest file itself.
	pub manifest_path: PathBuf,
}

impl RawCandidate {
	/// Builds a candidate from a manifest path found under `root`.
	pub fn new(root: impl Into<PathBuf>, manifest_path: impl Into<PathBuf>) -> Self {
		let manifest_path = manifest_path.into();
		let directory = manifest_path.parent().map(Path::to_path_buf).unwrap_or_default();
		Self {
			root: root.into(),
			directory,
			manifest_path,
		}
	}

	/// The identity implied by where the manifest sits: its directory
	/// relative to the root, with `/` separators.
	///
	/// Returns `None` when the directory is not below the root.
	pub fn fallback_identity(&self) -> Option<String> {
		let relative = self.directory.strip_prefix(&self.root).ok()?;
		let parts: Vec<_> = relative.components().map(|c| c.as_os_str().to_string_lossy()).collect();
		if parts.is_empty() {
			return None;
		}
		Some(parts.join("/"))
	}
}

/// A candidate whose identity is known but which failed validation.
#[derive(Debug)]
pub struct Rejected {
	/// Effective identity of the candidate.
	pub identity: String,
	/// Directory containing the manifest.
	pub directory: PathBuf,
	/// The manifest file.
	pub manifest_path: PathBuf,
	/// Why the candidate was rejected.
	pub reason: LoadError,
}

/// Outcome of loading one manifest.
#[derive(Debug)]
pub enum Candidate {
	/// A valid module, eligible for matching.
	Loaded(Module),
	/// A module that must never be selected, kept for diagnostics.
	Rejected(Rejected),
}

impl Candidate {
	/// Effective identity, declared or derived.
	pub fn identity(&self) -> &str {
		match self {
			Candidate::Loaded(module) => &module.identity,
			Candidate::Rejected(rejected) => &rejected.identity,
		}
	}
}
