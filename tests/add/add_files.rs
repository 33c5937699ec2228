use crate::common::command::{
    init_repository_dir, repository_dir, run_kit_command, stdout_of,
};
use crate::common::file::{FileSpec, delete_path, write_file, write_generated_files};
use assert_fs::TempDir;
use predicates::prelude::predicate;
use pretty_assertions::assert_eq;
use rstest::rstest;

#[rstest]
fn add_files_from_nested_directories_to_index_successfully(
    repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    run_kit_command(repository_dir.path(), &["init"])
        .assert()
        .success();

    write_file(FileSpec::new(repository_dir.path().join("top.txt"), "top".to_string()));
    write_file(FileSpec::new(
        repository_dir.path().join("x").join("y").join("deep.txt"),
        "deep".to_string(),
    ));

    run_kit_command(repository_dir.path(), &["add", "."])
        .assert()
        .success();

    assert_eq!(
        stdout_of(repository_dir.path(), &["status", "--porcelain"]),
        "A  top.txt\nA  x/y/deep.txt\n"
    );

    Ok(())
}

#[rstest]
fn add_multiple_files_incrementally(
    repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    run_kit_command(repository_dir.path(), &["init"])
        .assert()
        .success();
    let files = write_generated_files(repository_dir.path(), 3);
    let names = files
        .iter()
        .map(|file| file.path.file_name().unwrap().to_string_lossy().into_owned())
        .collect::<Vec<_>>();

    run_kit_command(repository_dir.path(), &["add", &names[0]])
        .assert()
        .success();
    run_kit_command(repository_dir.path(), &["add", &names[1], &names[2]])
        .assert()
        .success();

    let expected = names
        .iter()
        .map(|name| format!("A  {name}\n"))
        .collect::<String>();
    assert_eq!(stdout_of(repository_dir.path(), &["status", "--porcelain"]), expected);

    Ok(())
}

#[rstest]
fn adding_a_non_existent_file_is_ignored(
    repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    run_kit_command(repository_dir.path(), &["init"])
        .assert()
        .success();
    write_file(FileSpec::new(repository_dir.path().join("real.txt"), "real".to_string()));

    run_kit_command(repository_dir.path(), &["add", "missing.txt", "real.txt"])
        .assert()
        .success()
        .stderr(predicate::str::contains(
            "warning: pathspec 'missing.txt' did not match any files",
        ));

    assert_eq!(
        stdout_of(repository_dir.path(), &["status", "--porcelain"]),
        "A  real.txt\n"
    );

    Ok(())
}

#[rstest]
fn removing_deleted_files_from_index_successfully(
    init_repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let repository_dir = init_repository_dir;
    delete_path(&repository_dir.path().join("a").join("2.txt"));

    run_kit_command(repository_dir.path(), &["add", "a"])
        .assert()
        .success();

    assert_eq!(
        stdout_of(repository_dir.path(), &["status", "--porcelain"]),
        "D  a/2.txt\n"
    );

    Ok(())
}

#[rstest]
fn replace_file_with_directory_successfully(
    init_repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let repository_dir = init_repository_dir;
    delete_path(&repository_dir.path().join("1.txt"));
    write_file(FileSpec::new(
        repository_dir.path().join("1.txt").join("nested.txt"),
        "nested".to_string(),
    ));

    run_kit_command(repository_dir.path(), &["add", "1.txt"])
        .assert()
        .success();

    assert_eq!(
        stdout_of(repository_dir.path(), &["status", "--porcelain"]),
        "D  1.txt\nA  1.txt/nested.txt\n"
    );

    Ok(())
}
