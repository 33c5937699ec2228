use crate::common::command::{repository_dir, run_kit_command, stdout_of};
use crate::common::file::{FileSpec, write_file};
use assert_fs::TempDir;
use predicates::prelude::predicate;
use pretty_assertions::assert_eq;
use rstest::{fixture, rstest};

#[fixture]
fn hello_dir(repository_dir: TempDir) -> TempDir {
    run_kit_command(repository_dir.path(), &["init"])
        .assert()
        .success();
    write_file(FileSpec::new(
        repository_dir.path().join("hello.txt"),
        "hello\n".to_string(),
    ));

    repository_dir
}

fn object_path(dir: &TempDir, oid: &str) -> std::path::PathBuf {
    dir.path().join(".git/objects").join(&oid[..2]).join(&oid[2..])
}

#[rstest]
fn prints_the_blob_id_without_storing_it(hello_dir: TempDir) {
    let stdout = stdout_of(hello_dir.path(), &["hash-object", "hello.txt"]);

    assert_eq!(stdout, "ce013625030ba8dba906f756967f9e9ca394464a\n");
    assert!(!object_path(&hello_dir, stdout.trim()).exists());
}

#[rstest]
fn write_flag_stores_the_blob(hello_dir: TempDir) {
    let stdout = stdout_of(hello_dir.path(), &["hash-object", "-w", "hello.txt"]);

    assert!(object_path(&hello_dir, stdout.trim()).is_file());
    assert_eq!(
        stdout_of(hello_dir.path(), &["cat-file", "-p", stdout.trim()]),
        "hello\n"
    );
}

#[rstest]
fn random_content_hashes_to_a_full_object_id(hello_dir: TempDir) {
    let files = crate::common::file::write_generated_files(hello_dir.path(), 3);

    for file in files {
        let name = file.path.file_name().unwrap().to_string_lossy().into_owned();
        run_kit_command(hello_dir.path(), &["hash-object", &name])
            .assert()
            .success()
            .stdout(predicate::str::is_match(r"^[0-9a-f]{40}\n$").unwrap());
    }
}

#[rstest]
fn missing_file_fails(hello_dir: TempDir) {
    run_kit_command(hello_dir.path(), &["hash-object", "missing.txt"])
        .assert()
        .failure()
        .code(128)
        .stderr(predicate::str::starts_with("fatal: "));
}
