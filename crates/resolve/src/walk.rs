//! Discovery of manifest files under the configured roots.

use std::collections::VecDeque;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use ignore::WalkBuilder;

use crate::module::RawCandidate;

/// Why the walker passed over a path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
	/// The root itself is missing or is not a directory.
	RootUnavailable(String),
	/// One entry below the root could not be read.
	EntryUnreadable(String),
	/// A manifest sits directly in the root, where no module path can live.
	ManifestAtRoot,
}

impl fmt::Display for SkipReason {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			SkipReason::RootUnavailable(err) => write!(f, "root unavailable: {err}"),
			SkipReason::EntryUnreadable(err) => write!(f, "unreadable entry: {err}"),
			SkipReason::ManifestAtRoot => f.write_str("manifest at root"),
		}
	}
}

/// One step of the walk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WalkEntry {
	/// A manifest to load.
	Candidate(RawCandidate),
	/// A path that produced no candidate.
	Skipped {
		/// The offending path, when one is known.
		path: Option<PathBuf>,
		/// Why it was skipped.
		reason: SkipReason,
	},
}

/// Walks every root in order, yielding manifests and skipped entries.
///
/// Entries within a root come out sorted by file name, so the sequence is
/// stable for a fixed tree.
pub fn walk<I, P>(roots: I, manifest_name: &str) -> Walk
where
	I: IntoIterator<Item = P>,
	P: AsRef<Path>,
{
	Walk {
		pending: roots.into_iter().map(|root| root.as_ref().to_path_buf()).collect(),
		current: None,
		manifest_name: manifest_name.to_string(),
	}
}

/// Iterator returned by [`walk`].
pub struct Walk {
	pending: VecDeque<PathBuf>,
	current: Option<(PathBuf, ignore::Walk)>,
	manifest_name: String,
}

impl Walk {
	fn open_next_root(&mut self) -> Option<WalkEntry> {
		let root = self.pending.pop_front()?;
		match fs::metadata(&root) {
			Ok(meta) if meta.is_dir() => {
				tracing::trace!(root = %root.display(), "walk.root.start");
				let walker = build_walk(&root).build();
				self.current = Some((root, walker));
				None
			}
			Ok(_) => Some(root_unavailable(root, "not a directory".to_string())),
			Err(err) => Some(root_unavailable(root, err.to_string())),
		}
	}

	fn classify(&self, root: &Path, entry: Result<ignore::DirEntry, ignore::Error>) -> Option<WalkEntry> {
		let entry = match entry {
			Ok(entry) => entry,
			Err(err) => {
				return Some(WalkEntry::Skipped {
					path: None,
					reason: SkipReason::EntryUnreadable(err.to_string()),
				});
			}
		};

		// Symlinks are not followed, so a linked manifest shows up as a link.
		if entry.file_type().is_none_or(|ft| ft.is_dir()) {
			return None;
		}
		if entry.file_name() != self.manifest_name.as_str() {
			return None;
		}
		if entry.depth() < 2 {
			return Some(WalkEntry::Skipped {
				path: Some(entry.into_path()),
				reason: SkipReason::ManifestAtRoot,
			});
		}

		Some(WalkEntry::Candidate(RawCandidate::new(root, entry.into_path())))
	}
}

impl Iterator for Walk {
	type Item = WalkEntry;

	fn next(&mut self) -> Option<WalkEntry> {
		loop {
			if self.current.is_none() {
				if self.pending.is_empty() {
					return None;
				}
				if let Some(skipped) = self.open_next_root() {
					return Some(skipped);
				}
				continue;
			}

			let step = self
				.current
				.as_mut()
				.and_then(|(root, walker)| walker.next().map(|entry| (root.clone(), entry)));
			match step {
				Some((root, entry)) => {
					if let Some(item) = self.classify(&root, entry) {
						return Some(item);
					}
				}
				None => self.current = None,
			}
		}
	}
}

fn root_unavailable(root: PathBuf, err: String) -> WalkEntry {
	WalkEntry::Skipped {
		path: Some(root),
		reason: SkipReason::RootUnavailable(err),
	}
}

fn build_walk(root: &Path) -> WalkBuilder {
	let mut walker = WalkBuilder::new(root);

	walker
		.standard_filters(false)
		.follow_links(false)
		.sort_by_file_name(|a, b| a.cmp(b));

	walker
}

#[cfg(test)]
mod tests {
	use std::fs;

	use pretty_assertions::assert_eq;

	use super::*;

	fn touch(path: &Path) {
		fs::create_dir_all(path.parent().expect("has parent")).expect("create dirs");
		fs::write(path, "module x\n").expect("write file");
	}

	fn candidates(entries: &[WalkEntry]) -> Vec<PathBuf> {
		entries
			.iter()
			.filter_map(|entry| match entry {
				WalkEntry::Candidate(raw) => Some(raw.manifest_path.clone()),
				WalkEntry::Skipped { .. } => None,
			})
			.collect()
	}

	#[test]
	fn finds_manifests_in_sorted_order() {
		let temp = tempfile::tempdir().expect("create tempdir");
		let root = temp.path();
		touch(&root.join("b.org/x/go.mod"));
		touch(&root.join("a.org/y/go.mod"));
		touch(&root.join("a.org/y/nested/go.mod"));
		touch(&root.join("a.org/y/main.go"));
		touch(&root.join(".hidden/z/go.mod"));

		let entries: Vec<_> = walk([root], "go.mod").collect();
		assert_eq!(
			candidates(&entries),
			vec![
				root.join(".hidden/z/go.mod"),
				root.join("a.org/y/go.mod"),
				root.join("a.org/y/nested/go.mod"),
				root.join("b.org/x/go.mod"),
			]
		);
	}

	#[test]
	fn candidate_records_root_and_directory() {
		let temp = tempfile::tempdir().expect("create tempdir");
		let root = temp.path();
		touch(&root.join("example.com/a/go.mod"));

		let entries: Vec<_> = walk([root], "go.mod").collect();
		assert_eq!(
			entries,
			vec![WalkEntry::Candidate(RawCandidate {
				root: root.to_path_buf(),
				directory: root.join("example.com/a"),
				manifest_path: root.join("example.com/a/go.mod"),
			})]
		);
	}

	#[test]
	fn missing_root_is_skipped_and_walk_continues() {
		let temp = tempfile::tempdir().expect("create tempdir");
		let missing = temp.path().join("missing");
		let present = temp.path().join("present");
		touch(&present.join("example.com/a/go.mod"));

		let entries: Vec<_> = walk([&missing, &present], "go.mod").collect();
		assert_eq!(entries.len(), 2);
		assert!(matches!(
			&entries[0],
			WalkEntry::Skipped { path: Some(p), reason: SkipReason::RootUnavailable(_) } if p == &missing
		));
		assert_eq!(candidates(&entries), vec![present.join("example.com/a/go.mod")]);
	}

	#[test]
	fn file_root_is_unavailable() {
		let temp = tempfile::tempdir().expect("create tempdir");
		let file = temp.path().join("file");
		fs::write(&file, "").expect("write file");

		let entries: Vec<_> = walk([&file], "go.mod").collect();
		assert!(matches!(
			entries.as_slice(),
			[WalkEntry::Skipped { reason: SkipReason::RootUnavailable(_), .. }]
		));
	}

	#[test]
	fn manifest_directly_in_root_is_skipped() {
		let temp = tempfile::tempdir().expect("create tempdir");
		touch(&temp.path().join("go.mod"));

		let entries: Vec<_> = walk([temp.path()], "go.mod").collect();
		assert!(matches!(
			entries.as_slice(),
			[WalkEntry::Skipped { reason: SkipReason::ManifestAtRoot, .. }]
		));
	}

	#[test]
	fn directories_named_like_the_manifest_are_ignored() {
		let temp = tempfile::tempdir().expect("create tempdir");
		fs::create_dir_all(temp.path().join("example.com/go.mod")).expect("create dir");

		assert_eq!(walk([temp.path()], "go.mod").count(), 0);
	}

	#[cfg(unix)]
	#[test]
	fn symlinked_manifest_is_a_candidate() {
		let temp = tempfile::tempdir().expect("create tempdir");
		let root = temp.path().join("src");
		let target = temp.path().join("shared/go.mod");
		touch(&target);
		let link = root.join("example.com/linked/go.mod");
		fs::create_dir_all(link.parent().expect("has parent")).expect("create dirs");
		std::os::unix::fs::symlink(&target, &link).expect("create symlink");

		let entries: Vec<_> = walk([&root], "go.mod").collect();
		assert_eq!(candidates(&entries), vec![link]);
	}

	#[cfg(unix)]
	#[test]
	fn unreadable_subtree_is_skipped_and_walk_continues() {
		use std::os::unix::fs::PermissionsExt;

		let temp = tempfile::tempdir().expect("create tempdir");
		let root = temp.path();
		touch(&root.join("a.org/locked/x/go.mod"));
		touch(&root.join("b.org/open/go.mod"));
		let locked = root.join("a.org/locked");
		fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).expect("lock dir");
		if fs::read_dir(&locked).is_ok() {
			// Running as root: permission bits are not enforced.
			fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).expect("unlock dir");
			return;
		}

		let entries: Vec<_> = walk([root], "go.mod").collect();
		fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).expect("unlock dir");

		let unreadable = entries
			.iter()
			.filter(|entry| {
				matches!(
					entry,
					WalkEntry::Skipped {
						reason: SkipReason::EntryUnreadable(_),
						..
					}
				)
			})
			.count();
		assert_eq!(unreadable, 1);
		assert_eq!(candidates(&entries), vec![root.join("b.org/open/go.mod")]);
	}
}
