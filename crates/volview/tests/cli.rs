use std::fs;
use std::process::Command;

use tempfile::TempDir;

#[test]
fn help_lists_viewer_flags() {
    let output = Command::new(env!("CARGO_BIN_EXE_volview"))
        .arg("--help")
        .output()
        .expect("failed to run volview --help");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    for flag in ["--size", "--shader-dir", "--config", "--no-debug", "--frames"] {
        assert!(stdout.contains(flag), "help output is missing {flag}");
    }
}

#[test]
fn malformed_size_is_rejected_before_opening_a_window() {
    let output = Command::new(env!("CARGO_BIN_EXE_volview"))
        .args(["--size", "800by600"])
        .output()
        .expect("failed to run volview");

    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("expected WxH format"));
}

#[test]
fn invalid_config_file_fails_with_context() {
    let root = TempDir::new().unwrap();
    let path = root.path().join("volview.toml");
    fs::write(&path, "[window]\nwidth = 0\nheight = 600\n").unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_volview"))
        .arg("--config")
        .arg(&path)
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run volview");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("failed to load configuration file"));
    assert!(stderr.contains("must be greater than zero"));
}
