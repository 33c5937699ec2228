use crate::common::command::{
    AUTHOR_EMAIL, AUTHOR_NAME, get_head_commit_sha, init_repository_dir, kit_commit,
    repository_dir, run_kit_command, stdout_of,
};
use crate::common::file::{FileSpec, write_file};
use assert_fs::TempDir;
use predicates::prelude::predicate;
use pretty_assertions::assert_eq;
use rstest::rstest;

#[rstest]
fn first_commit_is_a_root_commit(repository_dir: TempDir) -> Result<(), Box<dyn std::error::Error>> {
    run_kit_command(repository_dir.path(), &["init"])
        .assert()
        .success();
    write_file(FileSpec::new(repository_dir.path().join("1.txt"), "one".to_string()));
    run_kit_command(repository_dir.path(), &["add", "."])
        .assert()
        .success();

    let output = kit_commit(repository_dir.path(), "Initial commit\n\nWith a body")
        .assert()
        .success()
        .stdout(predicate::str::is_match(
            r"^\[\(root-commit\) [0-9a-f]{7}\] Initial commit\n$",
        )?);
    let stdout = String::from_utf8(output.get_output().stdout.clone())?;

    let head = get_head_commit_sha(repository_dir.path());
    assert!(stdout.contains(&head[..7]));

    Ok(())
}

#[rstest]
fn second_commit_points_at_its_parent(
    init_repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let repository_dir = init_repository_dir;
    let parent = get_head_commit_sha(repository_dir.path());

    write_file(FileSpec::new(repository_dir.path().join("4.txt"), "four".to_string()));
    run_kit_command(repository_dir.path(), &["add", "4.txt"])
        .assert()
        .success();
    kit_commit(repository_dir.path(), "Second commit")
        .assert()
        .success()
        .stdout(predicate::str::is_match(r"^\[[0-9a-f]{7}\] Second commit\n$")?);

    let head = get_head_commit_sha(repository_dir.path());
    let commit = stdout_of(repository_dir.path(), &["cat-file", "-p", &head]);

    assert!(commit.contains(&format!("parent {parent}\n")));
    assert!(commit.contains(&format!(
        "author {AUTHOR_NAME} <{AUTHOR_EMAIL}> 1672574400 +0000\n"
    )));
    assert!(commit.ends_with("\n\nSecond commit"));

    Ok(())
}

#[rstest]
fn commit_tree_lists_every_staged_file(
    init_repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let repository_dir = init_repository_dir;

    assert_eq!(
        stdout_of(repository_dir.path(), &["ls-tree", "HEAD"]),
        "100644 blob 43dd47ea691c90a5fa7827892c70241913351963\t1.txt\n\
         100644 blob 64c5e5885a4b06010b3a0c20edb7900dd0311025\ta/2.txt\n\
         100644 blob 1d19714ffbc272ba0da6eb419d66123c20527174\ta/b/3.txt\n"
    );

    Ok(())
}

#[rstest]
fn commit_without_an_author_fails(
    init_repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let repository_dir = init_repository_dir;
    let head = get_head_commit_sha(repository_dir.path());

    run_kit_command(repository_dir.path(), &["commit", "-m", "anonymous"])
        .env_remove("GIT_AUTHOR_NAME")
        .env_remove("GIT_AUTHOR_EMAIL")
        .assert()
        .failure()
        .code(128)
        .stderr(predicate::str::contains("GIT_AUTHOR_NAME not set"));

    assert_eq!(get_head_commit_sha(repository_dir.path()), head);

    Ok(())
}
