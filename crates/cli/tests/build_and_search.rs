use assert_cmd::Command;
use predicates::prelude::*;
use std::path::Path;
use tempfile::TempDir;

fn write_file(path: &Path, bytes: &[u8]) {
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, bytes).unwrap();
}

fn pixseek() -> Command {
    Command::cargo_bin("pixseek").unwrap()
}

#[test]
fn build_then_search_ranks_identical_image_first() {
    let tmp = TempDir::new().unwrap();
    let dataset = tmp.path().join("images");
    write_file(&dataset.join("red.png"), &[10u8; 64]);
    write_file(&dataset.join("blue.png"), &[200u8; 64]);

    let index = tmp.path().join("data/index.psx");
    pixseek()
        .args(["build", "--dataset"])
        .arg(&dataset)
        .arg("--output")
        .arg(&index)
        .assert()
        .success()
        .stdout(predicate::str::contains("Indexed 2 images"));

    // Query with a byte-identical copy stored outside the dataset.
    let query = tmp.path().join("query.png");
    write_file(&query, &[10u8; 64]);

    pixseek()
        .args(["search", "--json", "--index"])
        .arg(&index)
        .arg("--image")
        .arg(&query)
        .assert()
        .success()
        .stdout(predicate::str::contains("red.png"))
        .stdout(predicate::str::contains("blue.png"));
}

#[test]
fn build_on_empty_dataset_fails_without_artifact() {
    let tmp = TempDir::new().unwrap();
    let dataset = tmp.path().join("images");
    write_file(&dataset.join("notes.txt"), b"not an image");

    let index = tmp.path().join("index.psx");
    pixseek()
        .args(["build", "--dataset"])
        .arg(&dataset)
        .arg("--output")
        .arg(&index)
        .assert()
        .failure();

    assert!(!index.exists());
}

#[test]
fn search_without_index_reports_not_built() {
    let tmp = TempDir::new().unwrap();
    let query = tmp.path().join("query.png");
    write_file(&query, &[1u8; 16]);

    pixseek()
        .args(["search", "--index"])
        .arg(tmp.path().join("missing.psx"))
        .arg("--image")
        .arg(&query)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Index not built"));
}
