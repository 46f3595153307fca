use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

const PEOPLE: &str = r#"[
    {"id": 1, "name": "Ann", "age": 30},
    {"id": 2, "name": "Bob", "age": 40}
]"#;

fn recast_cmd(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("recast").unwrap();
    cmd.current_dir(dir.path()).env("NO_COLOR", "1");
    cmd
}

fn write_input(dir: &TempDir, content: &str) -> PathBuf {
    let path = dir.path().join("people.json");
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn test_map_prints_pairs() {
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, PEOPLE);

    recast_cmd(&dir)
        .args(["map", "-k", "id", "-V", "name", "-i"])
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains("1  Ann"))
        .stdout(predicate::str::contains("2  Bob"));
}

#[test]
fn test_map_reads_stdin() {
    let dir = TempDir::new().unwrap();

    recast_cmd(&dir)
        .args(["map", "-k", "name", "-V", "age"])
        .write_stdin(PEOPLE)
        .assert()
        .success()
        .stdout(predicate::str::contains("Ann  30"));
}

#[test]
fn test_map_scalars_with_sentinels() {
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, r#"["x", "y"]"#);

    recast_cmd(&dir)
        .args(["map", "-k", "__value", "-V", "__position", "-i"])
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains("x  0"))
        .stdout(predicate::str::contains("y  1"));
}

#[test]
fn test_get_matches_loosely() {
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, PEOPLE);

    recast_cmd(&dir)
        .args(["get", "-k", "id", "-V", "name", "-i"])
        .arg(&input)
        .arg("2")
        .assert()
        .success()
        .stdout(predicate::str::diff("Bob\n"));
}

#[test]
fn test_get_missing_key_fails() {
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, PEOPLE);

    recast_cmd(&dir)
        .args(["get", "-k", "id", "-V", "name", "-i"])
        .arg(&input)
        .arg("9")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Not found"));
}

#[test]
fn test_count() {
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, PEOPLE);

    recast_cmd(&dir)
        .args(["count", "-i"])
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::diff("2\n"));
}

#[test]
fn test_scalar_input_is_unsupported() {
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, "5");

    recast_cmd(&dir)
        .args(["count", "-i"])
        .arg(&input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unsupported source"));
}

#[test]
fn test_table_renders_titles_rows_and_sort_links() {
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, PEOPLE);

    recast_cmd(&dir)
        .args([
            "table",
            "-c",
            "name=Name",
            "-c",
            "age",
            "--sort",
            "name:asc",
            "--path",
            "/people",
            "--query",
            "page=2",
            "-i",
        ])
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains("Name ▲"))
        .stdout(predicate::str::contains("Ann"))
        .stdout(predicate::str::contains("40"))
        .stdout(predicate::str::contains("/people?page=2&sort=name&order=desc"))
        .stdout(predicate::str::contains("/people?page=2&sort=age&order=asc"));
}

#[test]
fn test_table_without_request_has_no_links() {
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, PEOPLE);

    recast_cmd(&dir)
        .args(["table", "-c", "name", "--item-class", "BlogPost", "-i"])
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains("blog-post"))
        .stdout(predicate::str::contains("sort=").not());
}

#[test]
fn test_table_uses_config_file() {
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, PEOPLE);
    fs::write(
        dir.path().join("recast.json"),
        r#"{"sort_param": "by", "order_param": "dir", "link_params": {"tab": "all"}}"#,
    )
    .unwrap();

    recast_cmd(&dir)
        .args(["table", "-c", "name", "--path", "/t", "-i"])
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains("/t?tab=all&by=name&dir=asc"));
}

#[test]
fn test_table_rejects_malformed_sort() {
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, PEOPLE);

    recast_cmd(&dir)
        .args(["table", "-c", "name", "--sort", "name", "-i"])
        .arg(&input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("column:direction"));
}
