use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use pretty_assertions::assert_eq;
use tempfile::TempDir;
use workon_resolve::{ResolveError, ResolverConfig};
use workon_wm::{MessageKind, WmError};

use super::*;

#[derive(Debug, Clone, PartialEq, Eq)]
struct Spawned {
	program: String,
	args: Vec<OsString>,
	dir: PathBuf,
}

#[derive(Default)]
struct Record {
	spawned: Vec<Spawned>,
	sent: Vec<(MessageKind, String)>,
}

struct RecordingSpawner {
	record: Rc<RefCell<Record>>,
	fail: Option<&'static str>,
}

impl Spawner for RecordingSpawner {
	fn spawn(&self, program: &str, args: &[OsString], dir: &Path) -> Result<(), LaunchError> {
		if self.fail == Some(program) {
			return Err(LaunchError::SpawnFailed {
				program: program.to_string(),
				source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found in PATH"),
			});
		}
		self.record.borrow_mut().spawned.push(Spawned {
			program: program.to_string(),
			args: args.to_vec(),
			dir: dir.to_path_buf(),
		});
		Ok(())
	}
}

struct FakeWm {
	record: Rc<RefCell<Record>>,
	replies: RefCell<Vec<&'static str>>,
}

impl WmIpc for FakeWm {
	fn invoke(&self, kind: MessageKind, payload: &str) -> workon_wm::Result<Vec<u8>> {
		self.record.borrow_mut().sent.push((kind, payload.to_string()));
		match self.replies.borrow_mut().pop() {
			Some(reply) => Ok(reply.as_bytes().to_vec()),
			None => Err(WmError::Command {
				command: format!("i3-msg -t {kind} {payload}"),
				status: "exit status: 1".to_string(),
			}),
		}
	}
}

struct FixedLister(Vec<PathBuf>);

impl FileLister for FixedLister {
	fn list(&self, _dir: &Path) -> Result<Vec<PathBuf>, LaunchError> {
		Ok(self.0.clone())
	}
}

struct Fixture {
	_temp: TempDir,
	root: PathBuf,
	record: Rc<RefCell<Record>>,
}

impl Fixture {
	fn new() -> Self {
		let temp = tempfile::tempdir().expect("create tempdir");
		let root = temp.path().join("src");
		fs::create_dir_all(&root).expect("create root");
		Self {
			_temp: temp,
			root,
			record: Rc::default(),
		}
	}

	fn module(&self, identity: &str) -> PathBuf {
		let dir = self.root.join(identity);
		fs::create_dir_all(&dir).expect("create module dir");
		fs::write(dir.join("go.mod"), format!("module {identity}\n\ngo 1.21\n")).expect("write go.mod");
		dir
	}

	fn launcher(&self, wm_replies: &[&'static str], fail: Option<&'static str>) -> Launcher {
		let config = Config {
			resolver: ResolverConfig::new([self.root.clone()]),
			terminal: "term".to_string(),
			editor: "edit".to_string(),
		};
		Launcher::with_collaborators(
			config,
			Box::new(FakeWm {
				record: Rc::clone(&self.record),
				replies: RefCell::new(wm_replies.iter().rev().copied().collect()),
			}),
			Box::new(RecordingSpawner {
				record: Rc::clone(&self.record),
				fail,
			}),
			Box::new(FixedLister(vec![PathBuf::from("main.go"), PathBuf::from("pkg/pkg.go")])),
		)
	}
}

#[test]
fn opens_terminal_then_editor_in_module_dir() {
	let fx = Fixture::new();
	let dir = fx.module("github.com/perillo/workon");

	let module = fx
		.launcher(&[], None)
		.run(".../workon", WorkspaceTarget::Current)
		.expect("launch succeeds");

	assert_eq!(module.identity, "github.com/perillo/workon");
	let record = fx.record.borrow();
	assert!(record.sent.is_empty());
	assert_eq!(
		record.spawned,
		vec![
			Spawned {
				program: "term".to_string(),
				args: Vec::new(),
				dir: dir.clone(),
			},
			Spawned {
				program: "edit".to_string(),
				args: vec![OsString::from("main.go"), OsString::from("pkg/pkg.go")],
				dir,
			},
		]
	);
}

#[test]
fn numbered_workspace_is_labelled_after_the_module() {
	let fx = Fixture::new();
	fx.module("github.com/perillo/workon");

	fx.launcher(&[r#"[{"success":true}]"#], None)
		.run("github.com/perillo/workon", WorkspaceTarget::Number(4))
		.expect("launch succeeds");

	assert_eq!(
		fx.record.borrow().sent,
		vec![(MessageKind::Command, "workspace 4:workon".to_string())]
	);
}

#[test]
fn auto_workspace_takes_the_first_free_number() {
	let fx = Fixture::new();
	fx.module("example.com/tools");

	fx.launcher(
		&[
			r#"[{"num":1,"name":"1"},{"num":3,"name":"3:mail"}]"#,
			r#"[{"success":true}]"#,
		],
		None,
	)
	.run("example.com/tools", WorkspaceTarget::Auto)
	.expect("launch succeeds");

	let record = fx.record.borrow();
	assert_eq!(
		record.sent,
		vec![
			(MessageKind::GetWorkspaces, String::new()),
			(MessageKind::Command, "workspace 2:tools".to_string()),
		]
	);
	assert_eq!(record.spawned.len(), 2);
}

#[test]
fn resolution_failure_starts_nothing() {
	let fx = Fixture::new();
	fx.module("example.com/a/tool");
	fx.module("example.com/b/tool");

	let err = fx
		.launcher(&[], None)
		.run(".../tool", WorkspaceTarget::Auto)
		.expect_err("ambiguous pattern");

	assert!(matches!(err, LaunchError::Resolve(ResolveError::Ambiguous { .. })));
	let record = fx.record.borrow();
	assert!(record.sent.is_empty());
	assert!(record.spawned.is_empty());
}

#[test]
fn workspace_failure_starts_nothing() {
	let fx = Fixture::new();
	fx.module("example.com/tools");

	let err = fx
		.launcher(&[], None)
		.run("example.com/tools", WorkspaceTarget::Number(2))
		.expect_err("i3 unavailable");

	assert!(matches!(err, LaunchError::Workspace(WmError::Command { .. })));
	assert!(fx.record.borrow().spawned.is_empty());
}

#[test]
fn terminal_failure_skips_the_editor() {
	let fx = Fixture::new();
	fx.module("example.com/tools");

	let err = fx
		.launcher(&[], Some("term"))
		.run("example.com/tools", WorkspaceTarget::Current)
		.expect_err("terminal missing");

	assert!(matches!(err, LaunchError::SpawnFailed { ref program, .. } if program == "term"));
	assert!(fx.record.borrow().spawned.is_empty());
}
