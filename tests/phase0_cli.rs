mod common;

use assert_cmd::Command;
use common::{snapshot_json, write_snapshot};
use predicates::prelude::*;
use repotree::Entry;

#[test]
fn test_help_flag() {
    Command::cargo_bin("repotree")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("directory tree of a repository snapshot"))
        .stdout(predicate::str::contains("--export"))
        .stdout(predicate::str::contains("--level"))
        .stdout(predicate::str::contains("--ignore"))
        .stdout(predicate::str::contains("--max-entries"))
        .stdout(predicate::str::contains("--expand-all"))
        .stdout(predicate::str::contains("--debounce"))
        .stdout(predicate::str::contains("--verbose"))
        .stdout(predicate::str::contains("--quiet"))
        .stdout(predicate::str::contains("Examples:"));
}

#[test]
fn test_version_flag() {
    Command::cargo_bin("repotree")
        .unwrap()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("repotree"));
}

#[test]
fn test_nonexistent_snapshot_exits_with_error() {
    Command::cargo_bin("repotree")
        .unwrap()
        .args(["-x", "/this/path/does/not/exist.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No such file"));
}

#[test]
fn test_invalid_json_exits_with_error() {
    let (_tmp, path) = write_snapshot("{ not json");
    Command::cargo_bin("repotree")
        .unwrap()
        .arg("-x")
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid snapshot"));
}

#[test]
fn test_export_from_file_uses_repository_name() {
    let json = snapshot_json(
        Some("octo/demo"),
        &[Entry::leaf("src/index.ts", Some(10)), Entry::container("src/utils")],
    );
    let (_tmp, path) = write_snapshot(&json);
    Command::cargo_bin("repotree")
        .unwrap()
        .arg("--export")
        .arg(&path)
        .assert()
        .success()
        .stdout("demo/\n└── src/\n    ├── utils/\n    └── index.ts\n");
}

#[test]
fn test_export_from_stdin_with_name_override() {
    Command::cargo_bin("repotree")
        .unwrap()
        .args(["-x", "-n", "mine", "-"])
        .write_stdin(r#"[{"path": "b.txt", "type": "blob"}, {"path": "a", "type": "tree"}]"#)
        .assert()
        .success()
        .stdout("mine/\n├── a/\n└── b.txt\n");
}

#[test]
fn test_export_name_falls_back_to_file_stem() {
    let (_tmp, path) = write_snapshot(r#"[{"path": "x", "type": "blob"}]"#);
    Command::cargo_bin("repotree")
        .unwrap()
        .arg("-x")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::starts_with("snapshot/\n"));
}

#[test]
fn test_export_to_output_file() {
    let (tmp, path) = write_snapshot(r#"[{"path": "docs/guide.md", "type": "blob"}]"#);
    let out = tmp.path().join("tree.txt");
    Command::cargo_bin("repotree")
        .unwrap()
        .args(["-x", "-n", "r", "-o"])
        .arg(&out)
        .arg(&path)
        .assert()
        .success()
        .stdout("");
    let written = std::fs::read_to_string(&out).unwrap();
    assert_eq!(written, "r/\n└── docs/\n    └── guide.md\n");
}

#[test]
fn test_export_respects_ignore_and_cap() {
    let stdin = r#"[
        {"path": "node_modules/pkg/index.js", "type": "blob"},
        {"path": "a.txt", "type": "blob"},
        {"path": "b.txt", "type": "blob"},
        {"path": "c.txt", "type": "blob"}
    ]"#;
    Command::cargo_bin("repotree")
        .unwrap()
        .args(["-x", "-n", "r", "-I", "node_modules", "--max-entries", "2", "-"])
        .write_stdin(stdin)
        .assert()
        .success()
        .stdout("r/\n├── a.txt\n└── b.txt\n");
}

#[test]
fn test_default_debounce_is_200() {
    use clap::Parser;
    use repotree::cli::Args;
    let args = Args::parse_from(["repotree", "s.json"]);
    assert_eq!(args.debounce_ms, 200);
}

#[test]
fn test_debounce_floor_enforced() {
    use clap::Parser;
    use repotree::cli::Args;
    let args = Args::parse_from(["repotree", "--debounce", "10", "s.json"]).validated();
    assert_eq!(args.debounce_ms, 50, "Debounce floor should be 50ms");
}

#[test]
fn test_multiple_ignore_patterns() {
    use clap::Parser;
    use repotree::cli::Args;
    let args = Args::parse_from(["repotree", "-I", "*.log", "-I", "node_modules", "s.json"]);
    assert_eq!(args.ignore, vec!["*.log", "node_modules"]);
}

#[test]
fn test_verbose_count_levels() {
    use clap::Parser;
    use repotree::cli::Args;
    let args = Args::parse_from(["repotree", "-vv", "s.json"]).validated();
    assert_eq!(args.verbose, 2);
    assert_eq!(args.log_level(), "debug");
}

#[test]
fn test_quiet_resets_verbose() {
    use clap::Parser;
    use repotree::cli::Args;
    let args = Args::parse_from(["repotree", "-vv", "--quiet", "s.json"]).validated();
    assert!(args.quiet);
    assert_eq!(args.verbose, 0, "quiet should reset verbosity to 0");
}
