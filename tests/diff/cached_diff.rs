use crate::common::command::{init_repository_dir, run_kit_command, stdout_of};
use crate::common::file::{FileSpec, write_file};
use assert_fs::TempDir;
use pretty_assertions::assert_eq;
use rstest::rstest;

fn stage(dir: &TempDir, path: &str) {
    run_kit_command(dir.path(), &["add", path]).assert().success();
}

#[rstest]
fn nothing_staged_has_no_cached_diff(init_repository_dir: TempDir) {
    write_file(FileSpec::new(
        init_repository_dir.path().join("1.txt"),
        "unstaged".to_string(),
    ));

    assert_eq!(stdout_of(init_repository_dir.path(), &["diff", "--cached"]), "");
}

#[rstest]
fn file_added_to_index(init_repository_dir: TempDir) {
    let repository_dir = init_repository_dir;
    write_file(FileSpec::new(repository_dir.path().join("4.txt"), "four".to_string()));
    stage(&repository_dir, "4.txt");

    assert_eq!(
        stdout_of(repository_dir.path(), &["diff", "--cached"]),
        "diff --git a/4.txt b/4.txt\n\
         new file mode 100644\n\
         index 0000000..ea1f343\n\
         --- /dev/null\n\
         +++ b/4.txt\n\
         @@ -0,0 +1,1 @@\n\
         +four\n"
    );
}

#[rstest]
fn file_with_modified_content_in_index(init_repository_dir: TempDir) {
    let repository_dir = init_repository_dir;
    write_file(FileSpec::new(
        repository_dir.path().join("1.txt"),
        "one modified".to_string(),
    ));
    stage(&repository_dir, "1.txt");

    assert_eq!(
        stdout_of(repository_dir.path(), &["diff", "--cached"]),
        "diff --git a/1.txt b/1.txt\n\
         index 43dd47e..9290e08 100644\n\
         --- a/1.txt\n\
         +++ b/1.txt\n\
         @@ -1,1 +1,1 @@\n\
         -one\n\
         +one modified\n"
    );
}

#[cfg(unix)]
#[rstest]
fn file_with_modified_content_and_mode_in_index(init_repository_dir: TempDir) {
    use crate::common::file::make_file_executable;

    let repository_dir = init_repository_dir;
    let file = repository_dir.path().join("1.txt");
    write_file(FileSpec::new(file.clone(), "one modified".to_string()));
    make_file_executable(&file);
    stage(&repository_dir, "1.txt");

    assert_eq!(
        stdout_of(repository_dir.path(), &["diff", "--cached"]),
        "diff --git a/1.txt b/1.txt\n\
         old mode 100644\n\
         new mode 100755\n\
         index 43dd47e..9290e08\n\
         --- a/1.txt\n\
         +++ b/1.txt\n\
         @@ -1,1 +1,1 @@\n\
         -one\n\
         +one modified\n"
    );
}

#[rstest]
fn file_removed_from_index(init_repository_dir: TempDir) {
    let repository_dir = init_repository_dir;
    std::fs::remove_file(repository_dir.path().join("1.txt")).unwrap();
    stage(&repository_dir, "1.txt");

    assert_eq!(
        stdout_of(repository_dir.path(), &["diff", "--cached", "--name-status"]),
        "D\t1.txt\n"
    );
}
