use crate::common::command::{
    commit_all, init_repository_dir, run_kit_command, stderr_of_failure, stdout_of,
};
use crate::common::file::{FileSpec, write_file};
use assert_fs::TempDir;
use pretty_assertions::assert_eq;
use rstest::rstest;

const INITIAL_TREE: &str = "100644 blob 43dd47ea691c90a5fa7827892c70241913351963\t1.txt\n\
                            100644 blob 64c5e5885a4b06010b3a0c20edb7900dd0311025\ta/2.txt\n\
                            100644 blob 1d19714ffbc272ba0da6eb419d66123c20527174\ta/b/3.txt\n";

#[rstest]
fn defaults_to_head(init_repository_dir: TempDir) {
    assert_eq!(stdout_of(init_repository_dir.path(), &["ls-tree"]), INITIAL_TREE);
}

#[rstest]
fn lists_an_older_revision(init_repository_dir: TempDir) {
    let repository_dir = init_repository_dir;
    write_file(FileSpec::new(repository_dir.path().join("a/5.txt"), "five".to_string()));
    commit_all(repository_dir.path(), "Add five");

    assert_eq!(stdout_of(repository_dir.path(), &["ls-tree", "HEAD^"]), INITIAL_TREE);
    assert_eq!(
        stdout_of(repository_dir.path(), &["ls-tree", "master"]),
        "100644 blob 43dd47ea691c90a5fa7827892c70241913351963\t1.txt\n\
         100644 blob 64c5e5885a4b06010b3a0c20edb7900dd0311025\ta/2.txt\n\
         100644 blob 011203eab01ee87afe7a0c418d5f36974cb1af2c\ta/5.txt\n\
         100644 blob 1d19714ffbc272ba0da6eb419d66123c20527174\ta/b/3.txt\n"
    );
}

#[cfg(unix)]
#[rstest]
fn executable_files_keep_their_mode(init_repository_dir: TempDir) {
    use crate::common::file::make_file_executable;

    let repository_dir = init_repository_dir;
    make_file_executable(&repository_dir.path().join("1.txt"));
    run_kit_command(repository_dir.path(), &["add", "1.txt"])
        .assert()
        .success();
    crate::common::command::kit_commit(repository_dir.path(), "Make executable")
        .assert()
        .success();

    assert!(
        stdout_of(repository_dir.path(), &["ls-tree"])
            .starts_with("100755 blob 43dd47ea691c90a5fa7827892c70241913351963\t1.txt\n")
    );
}

#[rstest]
fn invalid_revision_fails(init_repository_dir: TempDir) {
    let stderr = stderr_of_failure(init_repository_dir.path(), &["ls-tree", "bad..name"], 128);

    assert_eq!(stderr, "fatal: not a valid revision: 'bad..name'\n");
}
