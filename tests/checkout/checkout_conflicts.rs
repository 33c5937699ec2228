use crate::checkout::checkout_branch::diverged_repository_dir;
use crate::common::command::{
    get_head_commit_sha, init_repository_dir, read, read_head, run_kit_command,
    stderr_of_failure, stdout_of,
};
use crate::common::file::{FileSpec, write_file};
use assert_fs::TempDir;
use pretty_assertions::assert_eq;
use rstest::rstest;

#[rstest]
fn locally_modified_file_blocks_the_checkout(diverged_repository_dir: TempDir) {
    let repository_dir = diverged_repository_dir;
    let master = get_head_commit_sha(repository_dir.path());
    write_file(FileSpec::new(repository_dir.path().join("1.txt"), "local edit".to_string()));

    let stderr = stderr_of_failure(repository_dir.path(), &["checkout", "feature"], 1);

    assert_eq!(
        stderr,
        "error: Your local changes to the following files would be overwritten by checkout:\n\
         \t1.txt\n\
         Please commit your changes or stash them before you switch branches.\n\
         Aborting\n"
    );
    assert_eq!(read(&repository_dir.path().join("1.txt")), "local edit");
    assert_eq!(read_head(repository_dir.path()), "ref: refs/heads/master");
    assert_eq!(get_head_commit_sha(repository_dir.path()), master);
    assert!(!repository_dir.path().join(".git/index.lock").exists());
}

#[rstest]
fn staged_but_uncommitted_change_blocks_the_checkout(diverged_repository_dir: TempDir) {
    let repository_dir = diverged_repository_dir;
    write_file(FileSpec::new(repository_dir.path().join("4.txt"), "staged".to_string()));
    run_kit_command(repository_dir.path(), &["add", "4.txt"])
        .assert()
        .success();

    let stderr = stderr_of_failure(repository_dir.path(), &["checkout", "feature"], 1);

    assert!(stderr.contains("would be overwritten by checkout:\n\t4.txt\n"));
    assert_eq!(
        stdout_of(repository_dir.path(), &["status", "--porcelain"]),
        "M  4.txt\n"
    );
}

#[rstest]
fn untracked_file_in_the_way_blocks_the_checkout(diverged_repository_dir: TempDir) {
    let repository_dir = diverged_repository_dir;
    run_kit_command(repository_dir.path(), &["checkout", "feature"])
        .assert()
        .success();
    write_file(FileSpec::new(repository_dir.path().join("4.txt"), "mine".to_string()));

    let stderr = stderr_of_failure(repository_dir.path(), &["checkout", "master"], 1);

    assert_eq!(
        stderr,
        "error: The following untracked working tree files would be overwritten by checkout:\n\
         \t4.txt\n\
         Please move or remove them before you switch branches.\n\
         Aborting\n"
    );
    assert_eq!(read(&repository_dir.path().join("4.txt")), "mine");
    assert_eq!(read(&repository_dir.path().join("1.txt")), "one");
    assert_eq!(read_head(repository_dir.path()), "ref: refs/heads/feature");
}

#[rstest]
fn every_conflicting_path_is_reported(diverged_repository_dir: TempDir) {
    let repository_dir = diverged_repository_dir;
    run_kit_command(repository_dir.path(), &["checkout", "feature"])
        .assert()
        .success();
    write_file(FileSpec::new(repository_dir.path().join("1.txt"), "local edit".to_string()));
    write_file(FileSpec::new(repository_dir.path().join("4.txt"), "mine".to_string()));

    let stderr = stderr_of_failure(repository_dir.path(), &["checkout", "master"], 1);

    assert_eq!(
        stderr,
        "error: Your local changes to the following files would be overwritten by checkout:\n\
         \t1.txt\n\
         Please commit your changes or stash them before you switch branches.\n\
         error: The following untracked working tree files would be overwritten by checkout:\n\
         \t4.txt\n\
         Please move or remove them before you switch branches.\n\
         Aborting\n"
    );
}

#[rstest]
fn revision_past_the_root_commit_fails(init_repository_dir: TempDir) {
    let stderr = stderr_of_failure(init_repository_dir.path(), &["checkout", "HEAD^"], 128);

    assert!(stderr.starts_with("fatal: "));
    assert!(stderr.contains("has no parent"));
    assert!(!init_repository_dir.path().join(".git/index.lock").exists());
}

#[rstest]
fn unknown_revision_fails(init_repository_dir: TempDir) {
    let stderr = stderr_of_failure(init_repository_dir.path(), &["checkout", "missing"], 128);

    assert_eq!(stderr, "fatal: not a valid object name: 'missing'\n");
}
