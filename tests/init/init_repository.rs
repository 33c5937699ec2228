use crate::common::command::{read_head, repository_dir, run_kit_command};
use assert_fs::TempDir;
use predicates::prelude::predicate;
use rstest::rstest;

#[rstest]
fn init_repository_successfully(repository_dir: TempDir) -> Result<(), Box<dyn std::error::Error>> {
    let target = repository_dir.path().join("project");

    run_kit_command(repository_dir.path(), &["init", "project"])
        .assert()
        .success()
        .stdout(predicate::str::is_match(
            r"^Initialized empty Git repository in .+\n$",
        )?)
        .stdout(predicate::str::contains(
            target.canonicalize()?.join(".git").display().to_string(),
        ));

    assert!(target.join(".git").join("objects").is_dir());
    assert!(target.join(".git").join("refs").join("heads").is_dir());
    assert_eq!(read_head(&target), "ref: refs/heads/master");

    Ok(())
}

#[rstest]
fn init_honours_the_directory_option(
    repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let elsewhere = TempDir::new()?;

    run_kit_command(
        elsewhere.path(),
        &["-C", repository_dir.path().to_str().ok_or("non UTF-8 temp dir")?, "init"],
    )
    .assert()
    .success();

    assert!(repository_dir.path().join(".git").join("HEAD").is_file());
    assert!(!elsewhere.path().join(".git").exists());

    Ok(())
}

#[rstest]
fn commands_on_an_unborn_branch_report_no_commits(
    repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    run_kit_command(repository_dir.path(), &["init"])
        .assert()
        .success();

    run_kit_command(repository_dir.path(), &["ls-tree", "HEAD"])
        .assert()
        .failure()
        .code(128)
        .stderr(predicate::str::starts_with("fatal: "));

    Ok(())
}
