use assert_cmd::Command;
use predicates::prelude::*;

fn bookshelf(config_dir: &std::path::Path) -> Command {
    let mut cmd = Command::cargo_bin("bookshelf").unwrap();
    cmd.env("BOOKSHELF_CONFIG_DIR", config_dir)
        .env("BOOKSHELF_ENV", "local");
    cmd
}

#[test]
fn openapi_lists_book_routes() {
    let dir = tempfile::tempdir().unwrap();

    bookshelf(dir.path())
        .arg("openapi")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"/api/books/{id}\""))
        .stdout(predicate::str::contains("\"Bookshelf API\""));
}

#[test]
fn config_reflects_config_files() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("local.toml"), "[server]\nport = 9191\n").unwrap();

    bookshelf(dir.path())
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"port\": 9191"));
}

#[test]
fn unknown_environment_fails() {
    let dir = tempfile::tempdir().unwrap();

    bookshelf(dir.path())
        .env("BOOKSHELF_ENV", "qa")
        .arg("config")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unsupported environment 'qa'"));
}
