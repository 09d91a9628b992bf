//! Integration tests for envreq CLI

use std::process::Command;

fn envreq() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_envreq"));
    // Keep the developer's environment out of the runs
    cmd.env_remove("ENVREQ_BASE_URL")
        .env_remove("ENVREQ_REQUESTED_BY")
        .env_remove("ENVREQ_OUTPUT")
        .env_remove("ENVREQ_COLOR")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_cli_version() {
    let output = envreq()
        .arg("--version")
        .output()
        .expect("Failed to execute envreq");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("envreq"));
}

#[test]
fn test_cli_help() {
    let output = envreq()
        .arg("--help")
        .output()
        .expect("Failed to execute envreq");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("submit"));
    assert!(stdout.contains("jupyter-url"));
    assert!(stdout.contains("health"));
}

#[test]
fn test_cli_invalid_command() {
    let output = envreq()
        .arg("invalid-command")
        .output()
        .expect("Failed to execute envreq");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("unrecognized subcommand"));
}

#[test]
fn test_submit_without_name_is_rejected_locally() {
    let temp = tempfile::tempdir().expect("tempdir");
    let path = temp.path().join("config.toml");
    std::fs::write(&path, "[service]\nrequested_by = \"tester\"\n").expect("write config");

    let output = envreq()
        .arg("--config")
        .arg(&path)
        .args(["--base-url", "http://127.0.0.1:9", "--color", "never"])
        .args(["submit", "--purpose", "p"])
        .output()
        .expect("Failed to execute envreq");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Env Name and Env Purpose are required"));
}

#[test]
fn test_json_mode_reports_errors_on_stdout() {
    let temp = tempfile::tempdir().expect("tempdir");
    let path = temp.path().join("config.toml");
    std::fs::write(&path, "[service]\nrequested_by = \"tester\"\n").expect("write config");

    let output = envreq()
        .arg("--config")
        .arg(&path)
        .args(["--base-url", "http://127.0.0.1:9", "--json"])
        .args(["submit", "--purpose", "p"])
        .output()
        .expect("Failed to execute envreq");

    assert!(!output.status.success());
    let json: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout is JSON");
    assert_eq!(json["type"], "Error");
    assert_eq!(json["data"]["kind"], "validation");
}

#[test]
fn test_jupyter_url_requires_request_id_argument() {
    let output = envreq()
        .arg("jupyter-url")
        .output()
        .expect("Failed to execute envreq");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("<REQUEST_ID>"));
}

#[test]
fn test_missing_explicit_config_is_reported() {
    let temp = tempfile::tempdir().expect("tempdir");
    let output = envreq()
        .arg("--config")
        .arg(temp.path().join("missing.toml"))
        .arg("list")
        .output()
        .expect("Failed to execute envreq");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("missing.toml"));
}

#[test]
fn test_invalid_config_file_is_reported() {
    let temp = tempfile::tempdir().expect("tempdir");
    let path = temp.path().join("config.toml");
    std::fs::write(&path, "[service]\nbase_url = 42\n").expect("write config");

    let output = envreq()
        .arg("--config")
        .arg(&path)
        .arg("health")
        .output()
        .expect("Failed to execute envreq");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Error:"));
}
