//! Pattern to module resolution.

use std::path::PathBuf;

use crate::error::{LoadError, ResolveError};
use crate::manifest::{DEFAULT_TOOLCHAIN_VERSION, Loader, MANIFEST_NAME, PlacementPolicy};
use crate::module::{Candidate, Module, Rejected};
use crate::pattern::Pattern;
use crate::walk::{SkipReason, WalkEntry, walk};

/// Everything the resolver needs to know, passed in once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolverConfig {
	/// Search roots, in priority order.
	pub roots: Vec<PathBuf>,
	/// Base name of the manifest file.
	pub manifest_name: String,
	/// Toolchain version used when a manifest has no `go` directive.
	pub default_toolchain_version: String,
	/// How module placement under its root is enforced.
	pub placement: PlacementPolicy,
}

impl ResolverConfig {
	/// Configuration with the default policies for the given roots.
	pub fn new(roots: impl IntoIterator<Item = impl Into<PathBuf>>) -> Self {
		Self {
			roots: roots.into_iter().map(Into::into).collect(),
			manifest_name: MANIFEST_NAME.to_string(),
			default_toolchain_version: DEFAULT_TOOLCHAIN_VERSION.to_string(),
			placement: PlacementPolicy::default(),
		}
	}
}

/// The result of matching a single pattern against every root.
#[derive(Debug)]
pub struct Match {
	/// The pattern itself.
	pub pattern: String,
	/// Whether the pattern has no wildcard.
	pub literal: bool,
	/// Modules whose identity matched.
	pub modules: Vec<Module>,
	/// Candidates whose identity matched but which failed validation.
	pub rejected: Vec<Rejected>,
}

/// Resolves module patterns under a fixed set of roots.
///
/// Every call walks the roots again; nothing is cached between calls.
#[derive(Debug, Clone)]
pub struct Resolver {
	config: ResolverConfig,
	loader: Loader,
}

impl Resolver {
	pub fn new(config: ResolverConfig) -> Self {
		let loader = Loader::new(config.default_toolchain_version.clone(), config.placement);
		Self { config, loader }
	}

	/// Resolves `pattern` to exactly one module.
	pub fn resolve(&self, pattern: &str) -> Result<Module, ResolveError> {
		let Match {
			pattern,
			mut modules,
			rejected,
			..
		} = self.matches(pattern)?;

		match modules.len() {
			0 => Err(ResolveError::NotFound { pattern, rejected }),
			1 => Ok(modules.remove(0)),
			_ => Err(ResolveError::Ambiguous {
				pattern,
				identities: modules.into_iter().map(|m| m.identity).collect(),
			}),
		}
	}

	/// Collects every module matching `pattern`, along with matching
	/// candidates that were rejected.
	///
	/// Candidates that fail to load are logged and skipped; they never make
	/// the whole call fail.
	pub fn matches(&self, pattern: &str) -> Result<Match, ResolveError> {
		let compiled = Pattern::compile(pattern)?;
		let mut found = Match {
			pattern: pattern.to_string(),
			literal: compiled.is_literal(),
			modules: Vec::new(),
			rejected: Vec::new(),
		};

		for entry in walk(&self.config.roots, &self.config.manifest_name) {
			let raw = match entry {
				WalkEntry::Candidate(raw) => raw,
				WalkEntry::Skipped {
					path,
					reason: reason @ SkipReason::RootUnavailable(_),
				} => {
					tracing::warn!(root = ?path, %reason, "resolve.root.skipped");
					continue;
				}
				WalkEntry::Skipped { path, reason } => {
					tracing::debug!(path = ?path, %reason, "resolve.entry.skipped");
					continue;
				}
			};

			let loaded = match self.loader.load(&raw) {
				Ok(loaded) => loaded,
				Err(err) => {
					log_load_error(&err);
					continue;
				}
			};

			if !compiled.matches(loaded.candidate.identity()) {
				if let Candidate::Rejected(rejected) = &loaded.candidate {
					log_load_error(&rejected.reason);
					tracing::debug!(identity = %rejected.identity, "resolve.candidate.rejected");
				}
				continue;
			}

			match loaded.candidate {
				Candidate::Loaded(module) => {
					tracing::debug!(identity = %module.identity, dir = %module.directory.display(), "resolve.match");
					found.modules.push(module);
				}
				Candidate::Rejected(rejected) => {
					log_load_error(&rejected.reason);
					found.rejected.push(rejected);
				}
			}
		}

		Ok(found)
	}
}

fn log_load_error(err: &LoadError) {
	tracing::warn!("can't load module: {err}");
}
