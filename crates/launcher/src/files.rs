//! Listing the source files of a module for the editor.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use ignore::{DirEntry, WalkBuilder};
use workon_resolve::MANIFEST_NAME;

use crate::error::LaunchError;

/// Lists the files to open for a module.
pub trait FileLister {
	/// Returns paths relative to `dir`, in a stable order.
	fn list(&self, dir: &Path) -> Result<Vec<PathBuf>, LaunchError>;
}

/// Lists the non-test Go files of every package in a module.
///
/// Like the go tool, skips `testdata` and `vendor`, names starting with `.`
/// or `_`, and nested modules.
#[derive(Debug, Clone, Copy, Default)]
pub struct GoFileLister;

impl FileLister for GoFileLister {
	fn list(&self, dir: &Path) -> Result<Vec<PathBuf>, LaunchError> {
		let list_failed = |source| LaunchError::ListFailed {
			dir: dir.to_path_buf(),
			source,
		};

		let walker = WalkBuilder::new(dir)
			.standard_filters(false)
			.follow_links(false)
			.sort_by_file_name(OsStr::cmp)
			.filter_entry(|entry| !pruned(entry))
			.build();

		let mut files = Vec::new();
		for entry in walker {
			let entry = entry.map_err(list_failed)?;
			if !entry.file_type().is_some_and(|ft| ft.is_file()) || !is_go_source(entry.file_name()) {
				continue;
			}
			if let Ok(relative) = entry.path().strip_prefix(dir) {
				files.push(relative.to_path_buf());
			}
		}
		files.sort();

		tracing::debug!(dir = %dir.display(), count = files.len(), "launch.files.listed");
		Ok(files)
	}
}

fn pruned(entry: &DirEntry) -> bool {
	if entry.depth() == 0 || !entry.file_type().is_some_and(|ft| ft.is_dir()) {
		return false;
	}
	let name = entry.file_name().to_string_lossy();
	name.starts_with('.')
		|| name.starts_with('_')
		|| name == "testdata"
		|| name == "vendor"
		|| entry.path().join(MANIFEST_NAME).is_file()
}

fn is_go_source(name: &OsStr) -> bool {
	let name = name.to_string_lossy();
	name.ends_with(".go")
		&& !name.ends_with("_test.go")
		&& !name.starts_with('.')
		&& !name.starts_with('_')
}

#[cfg(test)]
mod tests {
	use std::fs;

	use pretty_assertions::assert_eq;

	use super::*;

	fn touch(root: &Path, rel: &str) {
		let path = root.join(rel);
		if let Some(parent) = path.parent() {
			fs::create_dir_all(parent).expect("create parent dirs");
		}
		fs::write(path, "package x\n").expect("write file");
	}

	#[test]
	fn lists_sources_of_all_packages() {
		let temp = tempfile::tempdir().expect("create tempdir");
		let root = temp.path();
		for rel in [
			"go.mod",
			"main.go",
			"main_test.go",
			"README.md",
			"internal/pattern/pattern.go",
			"internal/pattern/pattern_test.go",
			"cmd/tool/tool.go",
			"testdata/fixture.go",
			"vendor/example.com/dep/dep.go",
			".git/hooks/hook.go",
			"_scratch/old.go",
			"_ignored.go",
			"nested/go.mod",
			"nested/nested.go",
		] {
			touch(root, rel);
		}

		let files = GoFileLister.list(root).expect("list files");
		assert_eq!(
			files,
			vec![
				PathBuf::from("cmd/tool/tool.go"),
				PathBuf::from("internal/pattern/pattern.go"),
				PathBuf::from("main.go"),
			]
		);
	}

	#[test]
	fn module_without_sources_lists_nothing() {
		let temp = tempfile::tempdir().expect("create tempdir");
		touch(temp.path(), "go.mod");

		assert!(GoFileLister.list(temp.path()).expect("list files").is_empty());
	}

	#[test]
	fn missing_directory_is_list_failure() {
		let temp = tempfile::tempdir().expect("create tempdir");
		let gone = temp.path().join("gone");

		assert!(matches!(
			GoFileLister.list(&gone),
			Err(LaunchError::ListFailed { .. })
		));
	}
}
