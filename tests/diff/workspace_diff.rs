use crate::common::command::{
    diff_hunks_output, diff_hunks_repository_dir, file_b, init_repository_dir, stdout_of,
};
use crate::common::file::{FileSpec, delete_path, touch_file, write_file};
use assert_fs::TempDir;
use pretty_assertions::assert_eq;
use rstest::rstest;

#[rstest]
fn clean_workspace_has_no_diff(init_repository_dir: TempDir) {
    touch_file(&init_repository_dir.path().join("1.txt"));

    assert_eq!(stdout_of(init_repository_dir.path(), &["diff"]), "");
}

#[rstest]
fn hunks_for_multiple_modified_files(
    diff_hunks_repository_dir: TempDir,
    file_b: String,
    diff_hunks_output: String,
) {
    let repository_dir = diff_hunks_repository_dir;
    write_file(FileSpec::new(repository_dir.path().join("1.txt"), file_b.clone()));
    write_file(FileSpec::new(repository_dir.path().join("a").join("2.txt"), file_b));

    let expected = format!(
        "diff --git a/1.txt b/1.txt\n\
         index 6143f6e..e0b1c3b 100644\n\
         --- a/1.txt\n\
         +++ b/1.txt\n\
         {diff_hunks_output}\
         diff --git a/a/2.txt b/a/2.txt\n\
         index 6143f6e..e0b1c3b 100644\n\
         --- a/a/2.txt\n\
         +++ b/a/2.txt\n\
         {diff_hunks_output}"
    );

    assert_eq!(stdout_of(repository_dir.path(), &["diff"]), expected);
}

#[rstest]
fn file_deleted_from_workspace(init_repository_dir: TempDir) {
    let repository_dir = init_repository_dir;
    delete_path(&repository_dir.path().join("a").join("2.txt"));

    assert_eq!(
        stdout_of(repository_dir.path(), &["diff"]),
        "diff --git a/a/2.txt b/a/2.txt\n\
         deleted file mode 100644\n\
         index 64c5e58..0000000\n\
         --- a/a/2.txt\n\
         +++ /dev/null\n\
         @@ -1,1 +0,0 @@\n\
         -two\n"
    );
}

#[rstest]
fn name_status_lists_workspace_changes(init_repository_dir: TempDir) {
    let repository_dir = init_repository_dir;
    write_file(FileSpec::new(repository_dir.path().join("1.txt"), "changed".to_string()));
    delete_path(&repository_dir.path().join("a").join("b").join("3.txt"));
    write_file(FileSpec::new(repository_dir.path().join("4.txt"), "untracked".to_string()));

    assert_eq!(
        stdout_of(repository_dir.path(), &["diff", "--name-status"]),
        "M\t1.txt\nD\ta/b/3.txt\n"
    );
}

#[cfg(unix)]
#[rstest]
fn mode_only_change_has_no_index_line(init_repository_dir: TempDir) {
    use crate::common::file::make_file_executable;

    let repository_dir = init_repository_dir;
    make_file_executable(&repository_dir.path().join("1.txt"));

    assert_eq!(
        stdout_of(repository_dir.path(), &["diff"]),
        "diff --git a/1.txt b/1.txt\nold mode 100644\nnew mode 100755\n"
    );
}
