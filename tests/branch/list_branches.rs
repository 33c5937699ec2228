use crate::common::command::{
    get_head_commit_sha, init_repository_dir, run_kit_command, stdout_of,
};
use assert_fs::TempDir;
use pretty_assertions::assert_eq;
use rstest::rstest;

#[rstest]
fn only_master_after_the_first_commit(init_repository_dir: TempDir) {
    assert_eq!(stdout_of(init_repository_dir.path(), &["branch"]), "* master\n");
}

#[rstest]
fn branches_are_sorted_and_current_is_marked(init_repository_dir: TempDir) {
    let repository_dir = init_repository_dir;
    for name in ["zeta", "alpha", "feature/login"] {
        run_kit_command(repository_dir.path(), &["branch", name])
            .assert()
            .success();
    }

    assert_eq!(
        stdout_of(repository_dir.path(), &["branch"]),
        "  alpha\n  feature/login\n* master\n  zeta\n"
    );

    run_kit_command(repository_dir.path(), &["checkout", "zeta"])
        .assert()
        .success();

    assert_eq!(
        stdout_of(repository_dir.path(), &["branch"]),
        "  alpha\n  feature/login\n  master\n* zeta\n"
    );
}

#[rstest]
fn detached_head_marks_no_branch(init_repository_dir: TempDir) {
    let repository_dir = init_repository_dir;
    let sha = get_head_commit_sha(repository_dir.path());
    run_kit_command(repository_dir.path(), &["checkout", &sha])
        .assert()
        .success();

    assert_eq!(stdout_of(repository_dir.path(), &["branch"]), "  master\n");
}
