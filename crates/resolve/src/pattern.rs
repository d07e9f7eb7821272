//! Module path patterns.
//!
//! A pattern is a module path where `...` matches any string, including
//! strings containing `/`. A trailing `/...` also matches the path without
//! it, so `example.com/tools/...` selects `example.com/tools` itself as well
//! as every module nested below it.

use std::path::Path;

use regex::Regex;

use crate::error::{PathKind, ResolveError};

/// The recursive wildcard.
pub const WILDCARD: &str = "...";

/// A compiled module path pattern.
#[derive(Debug, Clone)]
pub struct Pattern {
	regex: Regex,
	literal: bool,
}

impl Pattern {
	/// Compiles `pattern`, rejecting anything that looks like a filesystem path.
	pub fn compile(pattern: &str) -> Result<Self, ResolveError> {
		check_pattern(pattern)?;

		let mut re = regex::escape(pattern);
		let escaped_wildcard = regex::escape(WILDCARD);
		let escaped_suffix = format!("/{escaped_wildcard}");
		if let Some(prefix) = re.strip_suffix(escaped_suffix.as_str()) {
			re = format!("{prefix}(/{escaped_wildcard})?");
		}
		let re = re.replace(escaped_wildcard.as_str(), ".*");

		let regex = Regex::new(&format!("^{re}$")).map_err(|_| ResolveError::UnsupportedPattern {
			pattern: pattern.to_string(),
			kind: PathKind::Invalid,
		})?;

		Ok(Self {
			regex,
			literal: !pattern.contains(WILDCARD),
		})
	}

	/// Reports whether `identity` matches the whole pattern.
	pub fn matches(&self, identity: &str) -> bool {
		self.regex.is_match(identity)
	}

	/// True when the pattern has no wildcard and can name at most one module.
	pub fn is_literal(&self) -> bool {
		self.literal
	}
}

/// Rejects patterns that name filesystem locations instead of module paths.
pub fn check_pattern(pattern: &str) -> Result<(), ResolveError> {
	let kind = if pattern.is_empty() {
		PathKind::Empty
	} else if Path::new(pattern).is_absolute() || pattern.starts_with('/') {
		PathKind::Absolute
	} else if is_relative_path(pattern) {
		PathKind::Relative
	} else {
		return Ok(());
	};

	Err(ResolveError::UnsupportedPattern {
		pattern: pattern.to_string(),
		kind,
	})
}

fn is_relative_path(pattern: &str) -> bool {
	pattern == "." || pattern == ".." || pattern.starts_with("./") || pattern.starts_with("../")
}
