//! Error types for module resolution.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use crate::module::Rejected;

/// Why a pattern was refused before matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathKind {
	/// The pattern is empty.
	Empty,
	/// The pattern is an absolute filesystem path.
	Absolute,
	/// The pattern starts like a path relative to the current directory.
	Relative,
	/// The pattern could not be turned into a matcher.
	Invalid,
}

impl fmt::Display for PathKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(match self {
			PathKind::Empty => "empty pattern",
			PathKind::Absolute => "absolute path",
			PathKind::Relative => "relative path",
			PathKind::Invalid => "invalid pattern",
		})
	}
}

/// Errors returned by [`Resolver::resolve`](crate::Resolver::resolve).
///
/// Per-candidate problems never show up here directly: they are logged and
/// the candidate is dropped. [`ResolveError::NotFound`] still carries the
/// rejected candidates whose identity matched, so callers can explain why
/// nothing was selected.
#[derive(Debug, Error)]
pub enum ResolveError {
	/// The pattern looks like a filesystem path and cannot be searched.
	#[error("resolve {pattern:?}: not supported: {kind}")]
	UnsupportedPattern {
		/// The pattern as given.
		pattern: String,
		/// What the pattern looked like.
		kind: PathKind,
	},

	/// No module matched.
	#[error("resolve {pattern:?}: no modules matched{}", rejected_suffix(.rejected))]
	NotFound {
		/// The pattern as given.
		pattern: String,
		/// Candidates whose identity matched but which failed to load.
		rejected: Vec<Rejected>,
	},

	/// More than one module matched.
	#[error("resolve {pattern:?}: multiple modules matched: {}", .identities.join(", "))]
	Ambiguous {
		/// The pattern as given.
		pattern: String,
		/// Identities of every matching module, in walk order.
		identities: Vec<String>,
	},
}

fn rejected_suffix(rejected: &[Rejected]) -> String {
	match rejected.len() {
		0 => String::new(),
		1 => " (1 matching module failed to load)".to_string(),
		n => format!(" ({n} matching modules failed to load)"),
	}
}

/// Errors attached to a single candidate.
#[derive(Debug, Error)]
pub enum LoadError {
	/// The manifest could not be read, usually because it vanished after
	/// the walk found it.
	#[error("reading {}: {source}", path.display())]
	ManifestMissing {
		/// Manifest path.
		path: PathBuf,
		/// The underlying I/O error.
		source: std::io::Error,
	},

	/// The manifest is not well formed.
	#[error("{}:{line}: {message}", path.display())]
	ManifestMalformed {
		/// Manifest path.
		path: PathBuf,
		/// 1-based line of the offending token.
		line: usize,
		/// What went wrong.
		message: String,
	},

	/// The declared identity is not a valid import path.
	#[error("module {identity}: invalid import path: {reason}")]
	InvalidIdentity {
		/// The declared identity.
		identity: String,
		/// Which rule was broken.
		reason: String,
	},

	/// The declared identity does not match where the module sits under its root.
	#[error("module {identity}: not at its root location: {}", directory.display())]
	PlacementInvariantViolated {
		/// The declared identity.
		identity: String,
		/// The directory the manifest was found in.
		directory: PathBuf,
	},
}
