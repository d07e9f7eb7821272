use clap::error::ErrorKind;

use super::*;

fn parse(args: &[&str]) -> Cli {
	Cli::try_parse_from(std::iter::once("workon").chain(args.iter().copied())).expect("arguments parse")
}

#[test]
fn pattern_only() {
	let cli = parse(&["github.com/perillo/workon"]);
	assert_eq!(cli.pattern, "github.com/perillo/workon");
	assert_eq!(cli.workspace_target(), WorkspaceTarget::Current);
	assert_eq!(cli.terminal, None);
	assert_eq!(cli.editor, None);
	assert!(cli.roots.is_empty());
	assert!(!cli.verbose);
}

#[test]
fn all_options() {
	let cli = parse(&[
		"--workspace",
		"4",
		"--terminal",
		"kitty",
		"--editor",
		"code",
		"--root",
		"/a",
		"--root",
		"/b",
		"-v",
		".../workon",
	]);
	assert_eq!(cli.workspace_target(), WorkspaceTarget::Number(4));
	assert_eq!(cli.terminal.as_deref(), Some("kitty"));
	assert_eq!(cli.editor.as_deref(), Some("code"));
	assert_eq!(cli.roots, vec![PathBuf::from("/a"), PathBuf::from("/b")]);
	assert!(cli.verbose);
	assert_eq!(cli.pattern, ".../workon");
}

#[test]
fn workspace_values() {
	assert_eq!(WorkspaceTarget::parse("auto"), Ok(WorkspaceTarget::Auto));
	assert_eq!(WorkspaceTarget::parse("AUTO"), Ok(WorkspaceTarget::Auto));
	assert_eq!(WorkspaceTarget::parse("0"), Ok(WorkspaceTarget::Current));
	assert_eq!(WorkspaceTarget::parse("7"), Ok(WorkspaceTarget::Number(7)));
	assert!(WorkspaceTarget::parse("-1").is_err());
	assert!(WorkspaceTarget::parse("mail").is_err());
}

#[test]
fn wrong_argument_count_is_a_usage_error() {
	for args in [&["workon"][..], &["workon", "a", "b"][..]] {
		let err = Cli::try_parse_from(args).expect_err("usage error");
		assert!(matches!(
			err.kind(),
			ErrorKind::MissingRequiredArgument | ErrorKind::UnknownArgument
		));
		assert_eq!(err.exit_code(), 2);
	}
}

#[test]
fn bad_workspace_is_a_usage_error() {
	let err = Cli::try_parse_from(["workon", "-w", "mail", "x"]).expect_err("usage error");
	assert_eq!(err.kind(), ErrorKind::ValueValidation);
}
