//! The command-line binary's setup failures

use std::process::Command;
use tempfile::TempDir;

fn trawler() -> Command {
    Command::new(env!("CARGO_BIN_EXE_paste-trawler"))
}

#[test]
fn test_invalid_config_leaves_no_output_file() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("trawler.toml");
    std::fs::write(&config, "[discovery]\nid-length = 0\n").unwrap();

    for (mode, extension) in [("json", "json"), ("csv", "csv")] {
        let output = dir.path().join("results");
        let status = trawler()
            .arg("--config")
            .arg(&config)
            .arg(mode)
            .arg(&output)
            .status()
            .unwrap();

        assert_eq!(status.code(), Some(1));
        assert!(!dir.path().join(format!("results.{}", extension)).exists());
    }
}

#[test]
fn test_clean_of_missing_file_exits_with_setup_error() {
    let dir = TempDir::new().unwrap();
    let status = trawler()
        .arg("clean")
        .arg(dir.path().join("missing.json"))
        .status()
        .unwrap();

    assert_eq!(status.code(), Some(1));
}
