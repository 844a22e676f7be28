//! Exit status of the `studentdb` binary for startup failures and clean runs
#![cfg(feature = "cli")]

use std::io::Write;
use std::path::Path;
use std::process::{Command, Output, Stdio};

fn studentdb(config: &Path, stdin: &str) -> Output {
    let mut child = Command::new(env!("CARGO_BIN_EXE_studentdb"))
        .arg("--config")
        .arg(config)
        .args(["--format", "psv"])
        .env_remove("STUDENTDB_DBNAME")
        .env_remove("STUDENTDB_USER")
        .env_remove("STUDENTDB_DATA_DIR")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();
    if let Some(mut input) = child.stdin.take() {
        // the process may already have exited on a startup failure
        let _ = input.write_all(stdin.as_bytes());
    }
    child.wait_with_output().unwrap()
}

fn write_config(dir: &tempfile::TempDir, dbname: &str) -> std::path::PathBuf {
    let path = dir.path().join("studentdb.toml");
    std::fs::write(
        &path,
        format!(
            "dbname = \"{}\"\nuser = \"tester\"\ndata_dir = \"{}\"\n",
            dbname,
            dir.path().display()
        ),
    )
    .unwrap();
    path
}

#[test]
fn missing_config_exits_non_zero() {
    let dir = tempfile::tempdir().unwrap();
    let output = studentdb(&dir.path().join("absent.toml"), "");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("not found"));
    assert!(stderr.contains("example configuration"));
}

#[test]
fn malformed_config_exits_non_zero() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("studentdb.toml");
    std::fs::write(&path, "dbname = \"unterminated\nuser = ").unwrap();

    let output = studentdb(&path, "");
    assert!(!output.status.success());
}

#[test]
fn unreachable_database_exits_non_zero() {
    let dir = tempfile::tempdir().unwrap();
    let dbname = dir.path().join("missing").join("x.sqlite3");
    let config = write_config(&dir, &dbname.to_string_lossy());

    let output = studentdb(&config, "q\n");
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Could not connect to database"));
}

#[test]
fn piped_session_exits_zero() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(&dir, "school");

    let output = studentdb(&config, "init\ngetallstudents\nexit\n");
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Connected to database 'school' as user 'tester'."));
    assert!(stdout.contains("3|Jim|Beam|jim.beam@example.com|2023-09-02"));
    assert!(stdout.ends_with("Exiting the program...\n"));
    assert!(dir.path().join("school.sqlite3").exists());
}
