use crate::common::command::{commit_all, init_repository_dir, stdout_of};
use crate::common::file::{FileSpec, delete_path, write_file};
use assert_fs::TempDir;
use pretty_assertions::assert_eq;
use rstest::{fixture, rstest};

/// A second commit that modifies `1.txt`, adds `4.txt` and `a/5.txt` and deletes `a/2.txt`.
#[fixture]
fn two_commits_dir(init_repository_dir: TempDir) -> TempDir {
    let repository_dir = init_repository_dir;
    write_file(FileSpec::new(repository_dir.path().join("1.txt"), "one modified".to_string()));
    write_file(FileSpec::new(repository_dir.path().join("4.txt"), "four".to_string()));
    write_file(FileSpec::new(
        repository_dir.path().join("a").join("5.txt"),
        "five".to_string(),
    ));
    delete_path(&repository_dir.path().join("a").join("2.txt"));
    commit_all(repository_dir.path(), "Second commit");

    repository_dir
}

#[rstest]
fn name_status_between_revisions(two_commits_dir: TempDir) {
    assert_eq!(
        stdout_of(two_commits_dir.path(), &["diff", "--name-status", "HEAD^", "HEAD"]),
        "M\t1.txt\nA\t4.txt\nD\ta/2.txt\nA\ta/5.txt\n"
    );
}

#[rstest]
#[case("AD", "A\t4.txt\nD\ta/2.txt\nA\ta/5.txt\n")]
#[case("M", "M\t1.txt\n")]
#[case("D", "D\ta/2.txt\n")]
fn diff_filter_selects_change_kinds(
    two_commits_dir: TempDir,
    #[case] filter: &str,
    #[case] expected: &str,
) {
    let filter = format!("--diff-filter={filter}");

    assert_eq!(
        stdout_of(
            two_commits_dir.path(),
            &["diff", "--name-status", &filter, "HEAD~1", "HEAD"]
        ),
        expected
    );
}

#[rstest]
fn reversed_revisions_swap_additions_and_deletions(two_commits_dir: TempDir) {
    assert_eq!(
        stdout_of(two_commits_dir.path(), &["diff", "--name-status", "HEAD", "HEAD^"]),
        "M\t1.txt\nD\t4.txt\nA\ta/2.txt\nD\ta/5.txt\n"
    );
}

#[rstest]
fn patch_between_revisions(two_commits_dir: TempDir) {
    assert_eq!(
        stdout_of(
            two_commits_dir.path(),
            &["diff", "--diff-filter=M", "HEAD^", "HEAD"]
        ),
        "diff --git a/1.txt b/1.txt\n\
         index 43dd47e..9290e08 100644\n\
         --- a/1.txt\n\
         +++ b/1.txt\n\
         @@ -1,1 +1,1 @@\n\
         -one\n\
         +one modified\n"
    );
}

#[rstest]
fn invalid_diff_filter_is_rejected(two_commits_dir: TempDir) {
    crate::common::command::run_kit_command(
        two_commits_dir.path(),
        &["diff", "--diff-filter=X", "HEAD^", "HEAD"],
    )
    .assert()
    .failure()
    .code(2);
}
