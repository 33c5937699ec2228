use crate::common::command::{
    commit_all, get_head_commit_sha, init_repository_dir, read_branch, repository_dir,
    run_kit_command, stderr_of_failure,
};
use crate::common::file::{FileSpec, write_file};
use assert_fs::TempDir;
use pretty_assertions::assert_eq;
use rstest::rstest;

/// Three commits on master; returns the directory and the commit ids, oldest first.
fn three_commits(dir: TempDir) -> (TempDir, Vec<String>) {
    let mut commits = vec![get_head_commit_sha(dir.path())];
    for (name, content) in [("4.txt", "four"), ("5.txt", "five")] {
        write_file(FileSpec::new(dir.path().join(name), content.to_string()));
        commit_all(dir.path(), &format!("Add {name}"));
        commits.push(get_head_commit_sha(dir.path()));
    }

    (dir, commits)
}

#[rstest]
fn new_branch_points_at_head(init_repository_dir: TempDir) {
    let repository_dir = init_repository_dir;

    run_kit_command(repository_dir.path(), &["branch", "topic"])
        .assert()
        .success()
        .stdout("");

    assert_eq!(
        read_branch(repository_dir.path(), "topic"),
        get_head_commit_sha(repository_dir.path())
    );
}

#[rstest]
#[case("feature/login")]
#[case("release-1.0")]
#[case("a/b/c")]
#[case("UPPER_case")]
fn valid_branch_names_are_accepted(init_repository_dir: TempDir, #[case] name: &str) {
    run_kit_command(init_repository_dir.path(), &["branch", name])
        .assert()
        .success();

    assert_eq!(
        read_branch(init_repository_dir.path(), name),
        get_head_commit_sha(init_repository_dir.path())
    );
}

#[rstest]
#[case(".hidden")]
#[case("topic.lock")]
#[case("double..dot")]
#[case("trailing/")]
#[case("with space")]
#[case("tilde~1")]
#[case("caret^")]
#[case("colon:name")]
fn invalid_branch_names_are_rejected(init_repository_dir: TempDir, #[case] name: &str) {
    let stderr = stderr_of_failure(init_repository_dir.path(), &["branch", name], 128);

    assert_eq!(stderr, format!("fatal: '{name}' is not a valid branch name\n"));
}

#[rstest]
fn duplicate_branch_fails(init_repository_dir: TempDir) {
    run_kit_command(init_repository_dir.path(), &["branch", "topic"])
        .assert()
        .success();

    let stderr = stderr_of_failure(init_repository_dir.path(), &["branch", "topic"], 128);

    assert_eq!(stderr, "fatal: a branch named 'topic' already exists\n");
}

#[rstest]
fn branch_without_commits_fails(repository_dir: TempDir) {
    run_kit_command(repository_dir.path(), &["init"])
        .assert()
        .success();

    let stderr = stderr_of_failure(repository_dir.path(), &["branch", "topic"], 128);

    assert_eq!(stderr, "fatal: not a valid object name: 'HEAD'\n");
    assert!(
        !repository_dir
            .path()
            .join(".git/refs/heads/topic")
            .exists()
    );
}

#[rstest]
#[case("HEAD^", 1)]
#[case("HEAD~1", 1)]
#[case("HEAD~2", 0)]
#[case("HEAD^^", 0)]
#[case("master~0", 2)]
#[case("@^", 1)]
fn branch_from_an_ancestor(
    init_repository_dir: TempDir,
    #[case] revision: &str,
    #[case] expected: usize,
) {
    let (repository_dir, commits) = three_commits(init_repository_dir);

    run_kit_command(repository_dir.path(), &["branch", "topic", revision])
        .assert()
        .success();

    assert_eq!(read_branch(repository_dir.path(), "topic"), commits[expected]);
}

#[rstest]
fn branch_from_another_branch(init_repository_dir: TempDir) {
    let (repository_dir, commits) = three_commits(init_repository_dir);
    run_kit_command(repository_dir.path(), &["branch", "base", "HEAD^^"])
        .assert()
        .success();

    run_kit_command(repository_dir.path(), &["branch", "topic", "base"])
        .assert()
        .success();

    assert_eq!(read_branch(repository_dir.path(), "topic"), commits[0]);
}

#[rstest]
#[case(40)]
#[case(7)]
fn branch_from_a_full_or_abbreviated_commit_id(init_repository_dir: TempDir, #[case] len: usize) {
    let (repository_dir, commits) = three_commits(init_repository_dir);

    run_kit_command(repository_dir.path(), &["branch", "topic", &commits[1][..len]])
        .assert()
        .success();

    assert_eq!(read_branch(repository_dir.path(), "topic"), commits[1]);
}

#[rstest]
fn branch_past_the_root_commit_fails(init_repository_dir: TempDir) {
    let stderr = stderr_of_failure(init_repository_dir.path(), &["branch", "topic", "HEAD^"], 128);

    assert!(stderr.starts_with("fatal: "));
    assert!(stderr.contains("has no parent"));
}

#[rstest]
fn branch_from_an_unknown_revision_fails(init_repository_dir: TempDir) {
    let stderr = stderr_of_failure(init_repository_dir.path(), &["branch", "topic", "nope"], 128);

    assert_eq!(stderr, "fatal: not a valid object name: 'nope'\n");
}

#[rstest]
fn branch_from_a_blob_id_fails(init_repository_dir: TempDir) {
    let stderr = stderr_of_failure(
        init_repository_dir.path(),
        &["branch", "topic", "43dd47ea691c90a5fa7827892c70241913351963"],
        128,
    );

    assert_eq!(stderr, "fatal: object 43dd47e is a blob, not a commit\n");
}
