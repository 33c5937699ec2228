use crate::common::command::{
    AUTHOR_EMAIL, AUTHOR_NAME, get_head_commit_sha, init_repository_dir, stderr_of_failure,
    stdout_of,
};
use assert_fs::TempDir;
use pretty_assertions::assert_eq;
use rstest::rstest;

const ROOT_TREE: &str = "88484bd9e7919fa9b7dfeb008fb8f6c85743d171";
const A_TREE: &str = "202bc192d34beb85d0301ec8c8940cd0252cc48a";

#[rstest]
fn blob_prints_its_content(init_repository_dir: TempDir) {
    assert_eq!(
        stdout_of(
            init_repository_dir.path(),
            &["cat-file", "-p", "64c5e5885a4b06010b3a0c20edb7900dd0311025"]
        ),
        "two"
    );
}

#[rstest]
fn tree_lists_its_direct_entries(init_repository_dir: TempDir) {
    assert_eq!(
        stdout_of(init_repository_dir.path(), &["cat-file", "-p", ROOT_TREE]),
        format!(
            "100644 blob 43dd47ea691c90a5fa7827892c70241913351963\t1.txt\n\
             040000 tree {A_TREE}\ta"
        )
    );
}

#[rstest]
fn commit_by_revision(init_repository_dir: TempDir) {
    let head = get_head_commit_sha(init_repository_dir.path());
    let by_revision = stdout_of(init_repository_dir.path(), &["cat-file", "-p", "HEAD"]);
    let by_id = stdout_of(init_repository_dir.path(), &["cat-file", "-p", &head]);

    assert_eq!(by_revision, by_id);
    assert_eq!(
        by_revision,
        format!(
            "tree {ROOT_TREE}\n\
             author {AUTHOR_NAME} <{AUTHOR_EMAIL}> 1672574400 +0000\n\
             committer {AUTHOR_NAME} <{AUTHOR_EMAIL}> 1672574400 +0000\n\
             \n\
             Initial commit"
        )
    );
}

#[rstest]
fn unknown_object_fails(init_repository_dir: TempDir) {
    let stderr = stderr_of_failure(
        init_repository_dir.path(),
        &["cat-file", "-p", "0123456789012345678901234567890123456789"],
        128,
    );

    assert!(stderr.starts_with("fatal: "));
}
