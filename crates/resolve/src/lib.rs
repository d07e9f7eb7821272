//! Local Go module resolution.
//!
//! Given a module path pattern such as `github.com/perillo/workon` or
//! `example.com/tools/...`, the [`Resolver`] walks every configured root,
//! loads each `go.mod` it finds and selects the one module whose declared
//! path matches.
//!
//! A module is only selected when it sits where its path says it should:
//! `root/<module path>` must be the module directory. Modules that break
//! this rule, or whose manifest declares an invalid path, are kept as
//! [`Rejected`] candidates so callers can explain why nothing matched.
//!
//! ```no_run
//! use workon_resolve::{Resolver, ResolverConfig};
//!
//! let resolver = Resolver::new(ResolverConfig::new(["/home/me/go/src"]));
//! let module = resolver.resolve("github.com/perillo/workon")?;
//! println!("{}", module.directory.display());
//! # Ok::<(), workon_resolve::ResolveError>(())
//! ```

pub mod error;
pub mod manifest;
pub mod module;
pub mod pattern;
pub mod resolver;
pub mod walk;

pub use error::{LoadError, PathKind, ResolveError};
pub use manifest::{DEFAULT_TOOLCHAIN_VERSION, Loaded, Loader, MANIFEST_NAME, ManifestWarning, PlacementPolicy};
pub use module::{Candidate, Module, RawCandidate, Rejected};
pub use pattern::Pattern;
pub use resolver::{Match, Resolver, ResolverConfig};
pub use walk::{SkipReason, WalkEntry, walk};
