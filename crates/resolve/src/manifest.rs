//! Manifest (`go.mod`) parsing and candidate loading.
//!
//! Only the `module` and `go` directives are interpreted. Every other known
//! directive is accepted and ignored, so that a manifest the Go toolchain
//! would accept is not rejected here, while unknown directives and broken
//! syntax are still reported as malformed.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;

use crate::error::LoadError;
use crate::module::{Candidate, Module, RawCandidate, Rejected};

/// File name of a module manifest.
pub const MANIFEST_NAME: &str = "go.mod";

/// Toolchain version assumed when a manifest has no `go` directive.
///
/// This is the version the Go toolchain itself assumes for such modules.
pub const DEFAULT_TOOLCHAIN_VERSION: &str = "1.16";

const KNOWN_VERBS: &[&str] = &[
	"module", "go", "toolchain", "godebug", "require", "exclude", "replace", "retract", "tool", "ignore",
];

static GO_VERSION: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(r"^[1-9][0-9]*\.(0|[1-9][0-9]*)(\.(0|[1-9][0-9]*))?([a-z]+[0-9]+)?$").expect("valid go version regex")
});

/// How strictly a module must sit at the location its identity implies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PlacementPolicy {
	/// `root/identity` must be the module directory.
	#[default]
	Strict,
	/// Mismatches are logged but the module is kept.
	Lenient,
}

/// The directives this crate cares about.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ManifestFile {
	/// Argument of the `module` directive.
	pub module: Option<String>,
	/// Argument of the `go` directive.
	pub go_version: Option<String>,
}

/// Non-fatal problems found while loading a manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ManifestWarning {
	/// No `module` directive; the identity was derived from the directory.
	MissingModuleDirective(PathBuf),
	/// No `go` directive; the default toolchain version was used.
	MissingToolchainDirective(PathBuf),
}

impl fmt::Display for ManifestWarning {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			ManifestWarning::MissingModuleDirective(path) => {
				write!(f, "missing module directive in {}", path.display())
			}
			ManifestWarning::MissingToolchainDirective(path) => {
				write!(f, "missing go directive in {}", path.display())
			}
		}
	}
}

/// A loaded candidate plus the warnings produced along the way.
#[derive(Debug)]
pub struct Loaded {
	pub candidate: Candidate,
	pub warnings: Vec<ManifestWarning>,
}

/// Turns raw candidates into [`Candidate`]s.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Loader {
	default_toolchain_version: String,
	placement: PlacementPolicy,
}

impl Default for Loader {
	fn default() -> Self {
		Self::new(DEFAULT_TOOLCHAIN_VERSION, PlacementPolicy::default())
	}
}

impl Loader {
	pub fn new(default_toolchain_version: impl Into<String>, placement: PlacementPolicy) -> Self {
		Self {
			default_toolchain_version: default_toolchain_version.into(),
			placement,
		}
	}

	/// Reads and validates the manifest behind `raw`.
	///
	/// Fails only when the manifest cannot be read or parsed. Identity and
	/// placement problems produce a [`Candidate::Rejected`] instead, since
	/// the identity is known and the candidate may still match the pattern.
	pub fn load(&self, raw: &RawCandidate) -> Result<Loaded, LoadError> {
		let path = &raw.manifest_path;
		let data = fs::read(path).map_err(|source| LoadError::ManifestMissing {
			path: path.clone(),
			source,
		})?;
		let text = std::str::from_utf8(&data).map_err(|err| LoadError::ManifestMalformed {
			path: path.clone(),
			line: 1 + data[..err.valid_up_to()].iter().filter(|&&b| b == b'\n').count(),
			message: "invalid UTF-8".to_string(),
		})?;
		let file = parse(path, text)?;

		let mut warnings = Vec::new();
		let declared = file.module.is_some();
		let identity = match file.module {
			Some(identity) => identity,
			None => {
				let warning = ManifestWarning::MissingModuleDirective(path.clone());
				tracing::warn!(manifest = %path.display(), "warning: {warning}");
				warnings.push(warning);
				raw.fallback_identity().unwrap_or_default()
			}
		};
		let toolchain_version = match file.go_version {
			Some(version) => version,
			None => {
				let warning = ManifestWarning::MissingToolchainDirective(path.clone());
				tracing::warn!(manifest = %path.display(), "warning: {warning}");
				warnings.push(warning);
				self.default_toolchain_version.clone()
			}
		};

		let rejection = if declared && let Err(reason) = check_import_path(&identity) {
			Some(LoadError::InvalidIdentity {
				identity: identity.clone(),
				reason,
			})
		} else {
			self.check_placement(raw, &identity)
		};

		let candidate = match rejection {
			Some(reason) => Candidate::Rejected(Rejected {
				identity,
				directory: raw.directory.clone(),
				manifest_path: path.clone(),
				reason,
			}),
			None => Candidate::Loaded(Module {
				identity,
				version: None,
				directory: raw.directory.clone(),
				manifest_path: path.clone(),
				toolchain_version,
				root: raw.root.clone(),
			}),
		};

		Ok(Loaded { candidate, warnings })
	}

	fn check_placement(&self, raw: &RawCandidate, identity: &str) -> Option<LoadError> {
		if !identity.is_empty() && raw.root.join(identity) == raw.directory {
			return None;
		}

		match self.placement {
			PlacementPolicy::Strict => Some(LoadError::PlacementInvariantViolated {
				identity: identity.to_string(),
				directory: raw.directory.clone(),
			}),
			PlacementPolicy::Lenient if !identity.is_empty() => {
				tracing::debug!(identity, directory = %raw.directory.display(), "manifest.placement.mismatch");
				None
			}
			PlacementPolicy::Lenient => Some(LoadError::PlacementInvariantViolated {
				identity: String::new(),
				directory: raw.directory.clone(),
			}),
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
	Word(String),
	LParen,
	RParen,
}

/// Parses manifest text, keeping the `module` and `go` directives.
pub fn parse(path: &Path, text: &str) -> Result<ManifestFile, LoadError> {
	let malformed = |line: usize, message: String| LoadError::ManifestMalformed {
		path: path.to_path_buf(),
		line,
		message,
	};

	let mut file = ManifestFile::default();
	let mut block: Option<(String, usize)> = None;

	for (index, line) in text.lines().enumerate() {
		let lineno = index + 1;
		let tokens = tokenize(line).map_err(|message| malformed(lineno, message))?;
		let Some(first) = tokens.first() else {
			continue;
		};

		if block.is_some() {
			if tokens == [Token::RParen] {
				block = None;
			} else if tokens.iter().any(|t| matches!(t, Token::LParen | Token::RParen)) {
				return Err(malformed(lineno, "unexpected parenthesis in block".to_string()));
			}
			continue;
		}

		let verb = match first {
			Token::Word(verb) => verb.as_str(),
			Token::RParen => return Err(malformed(lineno, "unexpected )".to_string())),
			Token::LParen => return Err(malformed(lineno, "unexpected (".to_string())),
		};
		if !KNOWN_VERBS.contains(&verb) {
			return Err(malformed(lineno, format!("unknown directive: {verb}")));
		}

		let args = &tokens[1..];
		if args == [Token::LParen] {
			if verb == "module" || verb == "go" {
				return Err(malformed(lineno, format!("{verb} directive cannot be a block")));
			}
			block = Some((verb.to_string(), lineno));
			continue;
		}
		if args.iter().any(|t| matches!(t, Token::LParen | Token::RParen)) {
			return Err(malformed(lineno, "unexpected parenthesis".to_string()));
		}

		match verb {
			"module" => {
				if file.module.is_some() {
					return Err(malformed(lineno, "repeated module statement".to_string()));
				}
				let [Token::Word(module)] = args else {
					return Err(malformed(lineno, "usage: module module/path".to_string()));
				};
				file.module = Some(module.clone());
			}
			"go" => {
				if file.go_version.is_some() {
					return Err(malformed(lineno, "repeated go statement".to_string()));
				}
				let [Token::Word(version)] = args else {
					return Err(malformed(lineno, "usage: go 1.23".to_string()));
				};
				if !GO_VERSION.is_match(version) {
					return Err(malformed(lineno, format!("invalid go version '{version}': must match format 1.23.0")));
				}
				file.go_version = Some(version.clone());
			}
			_ => {}
		}
	}

	if let Some((verb, lineno)) = block {
		return Err(malformed(lineno, format!("unterminated {verb} block")));
	}

	Ok(file)
}

fn tokenize(line: &str) -> Result<Vec<Token>, String> {
	let mut tokens = Vec::new();
	let mut chars = line.char_indices().peekable();

	while let Some(&(start, c)) = chars.peek() {
		match c {
			c if c.is_whitespace() => {
				chars.next();
			}
			'/' if line[start..].starts_with("//") => break,
			'(' => {
				chars.next();
				tokens.push(Token::LParen);
			}
			')' => {
				chars.next();
				tokens.push(Token::RParen);
			}
			'"' => {
				chars.next();
				let mut word = String::new();
				let mut closed = false;
				while let Some((_, c)) = chars.next() {
					match c {
						'"' => {
							closed = true;
							break;
						}
						'\\' => match chars.next() {
							Some((_, escaped @ ('"' | '\\'))) => word.push(escaped),
							Some((_, 'n')) => word.push('\n'),
							Some((_, 't')) => word.push('\t'),
							Some((_, other)) => {
								word.push('\\');
								word.push(other);
							}
							None => break,
						},
						c => word.push(c),
					}
				}
				if !closed {
					return Err("unterminated quoted string".to_string());
				}
				tokens.push(Token::Word(word));
			}
			'`' => {
				chars.next();
				let rest = &line[start + 1..];
				let Some(end) = rest.find('`') else {
					return Err("unterminated raw string".to_string());
				};
				tokens.push(Token::Word(rest[..end].to_string()));
				while chars.peek().is_some_and(|&(i, _)| i <= start + end + 1) {
					chars.next();
				}
			}
			_ => {
				let mut word = String::new();
				while let Some(&(i, c)) = chars.peek() {
					if c.is_whitespace() || matches!(c, '(' | ')' | '"' | '`') || line[i..].starts_with("//") {
						break;
					}
					word.push(c);
					chars.next();
				}
				tokens.push(Token::Word(word));
			}
		}
	}

	Ok(tokens)
}

/// Checks that `path` is a well-formed import path for a module.
///
/// On failure the returned string says which rule was broken.
pub fn check_import_path(path: &str) -> Result<(), String> {
	if path.is_empty() {
		return Err("empty string".to_string());
	}
	if path.starts_with('/') {
		return Err("leading slash".to_string());
	}
	if path.ends_with('/') {
		return Err("trailing slash".to_string());
	}
	if path.contains("//") {
		return Err("double slash".to_string());
	}

	for elem in path.split('/') {
		check_element(elem)?;
	}

	let first = path.split('/').next().unwrap_or_default();
	if !first.contains('.') {
		return Err(format!("missing dot in first path element {first:?}"));
	}
	if first.starts_with('-') {
		return Err(format!("leading dash in first path element {first:?}"));
	}

	Ok(())
}

fn check_element(elem: &str) -> Result<(), String> {
	if elem == "." || elem == ".." {
		return Err(format!("invalid path element {elem:?}"));
	}
	if let Some(c) = elem.chars().find(|&c| !is_path_char(c)) {
		return Err(format!("invalid char {c:?}"));
	}
	if elem.starts_with('.') {
		return Err(format!("leading dot in path element {elem:?}"));
	}
	if elem.ends_with('.') {
		return Err(format!("trailing dot in path element {elem:?}"));
	}
	Ok(())
}

fn is_path_char(c: char) -> bool {
	c.is_ascii_alphanumeric() || matches!(c, '-' | '.' | '_' | '~' | '+')
}
