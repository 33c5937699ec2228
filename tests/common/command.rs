use crate::common::file::{FileSpec, write_file};
use assert_cmd::Command;
use assert_fs::TempDir;
use rstest::fixture;
use std::path::Path;

pub const AUTHOR_NAME: &str = "fake_user";
pub const AUTHOR_EMAIL: &str = "fake_email@email.com";
pub const AUTHOR_DATE: &str = "2023-01-01 12:00:00 +0000";

#[fixture]
pub fn repository_dir() -> TempDir {
    TempDir::new().expect("Failed to create temp dir")
}

/// A repository with one commit holding `1.txt`, `a/2.txt` and `a/b/3.txt`.
#[fixture]
pub fn init_repository_dir(repository_dir: TempDir) -> TempDir {
    run_kit_command(repository_dir.path(), &["init"])
        .assert()
        .success();

    write_file(FileSpec::new(repository_dir.path().join("1.txt"), "one".to_string()));
    write_file(FileSpec::new(
        repository_dir.path().join("a").join("2.txt"),
        "two".to_string(),
    ));
    write_file(FileSpec::new(
        repository_dir.path().join("a").join("b").join("3.txt"),
        "three".to_string(),
    ));

    commit_all(repository_dir.path(), "Initial commit");

    repository_dir
}

/// Old side of the two-hunk diff fixture.
#[fixture]
pub fn file_a() -> String {
    r#"fn main() {
    let s = String::new();
    std::io::stdin().read_line(&mut s).unwrap();
    for i in 0..1000000000 {
        println!("{}",  s);
    }

    println!("Done");

    let tx = std::thread::spawn(move || {
        for i in 0..10 {
            println!("Thread: {}", i);
        }
    });

    tx.join().unwrap();

    println!("All threads completed");
}"#
    .to_string()
}

#[fixture]
pub fn file_b() -> String {
    r#"fn main() {
    let s = String::new();
    std::io::stdin().read_line(&mut s).unwrap();

    println!("Done");

    let tx = std::thread::spawn(move || {
        for i in 0..10 {
            println!("Thread: {}", i);
        }
    });

    if let Err(e) = tx.join() {
        eprintln!("Thread error: {}", e);
    }

    println!("All threads completed");
}"#
    .to_string()
}

/// Hunks turning [`file_a`] into [`file_b`].
#[fixture]
pub fn diff_hunks_output() -> String {
    "@@ -1,9 +1,6 @@\n fn main() {\n     let s = String::new();\n     std::io::stdin().read_line(&mut s).unwrap();\n-    for i in 0..1000000000 {\n-        println!(\"{}\",  s);\n-    }\n \n     println!(\"Done\");\n \n@@ -13,7 +10,9 @@\n         }\n     });\n \n-    tx.join().unwrap();\n+    if let Err(e) = tx.join() {\n+        eprintln!(\"Thread error: {}\", e);\n+    }\n \n     println!(\"All threads completed\");\n }\n"
        .to_string()
}

/// `1.txt` and `a/2.txt` both committed with the content of [`file_a`].
#[fixture]
pub fn diff_hunks_repository_dir(repository_dir: TempDir, file_a: String) -> TempDir {
    run_kit_command(repository_dir.path(), &["init"])
        .assert()
        .success();
    write_file(FileSpec::new(repository_dir.path().join("1.txt"), file_a.clone()));
    write_file(FileSpec::new(repository_dir.path().join("a").join("2.txt"), file_a));

    commit_all(repository_dir.path(), "Initial commit");

    repository_dir
}

pub fn run_kit_command(dir: &Path, args: &[&str]) -> Command {
    let mut cmd = Command::cargo_bin("kit").expect("Failed to find kit binary");
    cmd.envs([("NO_PAGER", "1"), ("NO_COLOR", "1")]);
    cmd.env_remove("KIT_LOG");
    cmd.current_dir(dir);
    cmd.args(args);
    cmd
}

pub fn kit_commit(dir: &Path, message: &str) -> Command {
    let mut cmd = run_kit_command(dir, &["commit", "-m", message]);
    cmd.envs([
        ("GIT_AUTHOR_NAME", AUTHOR_NAME),
        ("GIT_AUTHOR_EMAIL", AUTHOR_EMAIL),
        ("GIT_AUTHOR_DATE", AUTHOR_DATE),
    ]);
    cmd
}

/// Stage everything and commit it.
pub fn commit_all(dir: &Path, message: &str) {
    run_kit_command(dir, &["add", "."]).assert().success();
    kit_commit(dir, message).assert().success();
}

/// Run a command that must succeed and return its stdout.
pub fn stdout_of(dir: &Path, args: &[&str]) -> String {
    let output = run_kit_command(dir, args).assert().success();
    String::from_utf8(output.get_output().stdout.clone()).expect("stdout is not UTF-8")
}

/// Run a command that must succeed and return its stderr.
pub fn stderr_of(dir: &Path, args: &[&str]) -> String {
    let output = run_kit_command(dir, args).assert().success();
    String::from_utf8(output.get_output().stderr.clone()).expect("stderr is not UTF-8")
}

/// Run a command that must fail with `code` and return its stderr.
pub fn stderr_of_failure(dir: &Path, args: &[&str], code: i32) -> String {
    let output = run_kit_command(dir, args).assert().failure().code(code);
    String::from_utf8(output.get_output().stderr.clone()).expect("stderr is not UTF-8")
}

/// The commit HEAD resolves to, following a symbolic HEAD.
pub fn get_head_commit_sha(dir: &Path) -> String {
    let git_dir = dir.join(".git");
    let head = read_head(dir);

    match head.strip_prefix("ref: ") {
        Some(ref_path) => read(&git_dir.join(ref_path)),
        None => head,
    }
}

pub fn read_head(dir: &Path) -> String {
    read(&dir.join(".git").join("HEAD"))
}

pub fn read_branch(dir: &Path, branch: &str) -> String {
    read(&dir.join(".git").join("refs").join("heads").join(branch))
}

pub fn read(path: &Path) -> String {
    std::fs::read_to_string(path)
        .unwrap_or_else(|e| panic!("Failed to read {path:?}: {e}"))
        .trim()
        .to_string()
}
