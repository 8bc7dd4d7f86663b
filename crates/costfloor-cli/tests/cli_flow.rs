use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tempfile::TempDir;

fn bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_costfloor"))
}

/// Fast bcrypt policy: cost 4 is instant and a 0ms floor is always met.
fn write_fast_config(config_home: &Path, min_cost: u32, max_cost: u32) -> PathBuf {
    let path = config_home.join("costfloor").join("config.toml");
    std::fs::create_dir_all(path.parent().expect("config parent")).expect("create config dir");
    let contents = format!(
        "[policy]\nmin_duration_ms = 0\nalgorithm = \"bcrypt\"\nmin_cost = {}\nmax_cost = {}\n",
        min_cost, max_cost
    );
    std::fs::write(&path, contents).expect("write config");
    path
}

fn command(config_home: &Path) -> Command {
    let mut cmd = Command::new(bin());
    cmd.env("XDG_CONFIG_HOME", config_home)
        .env_remove("COSTFLOOR_CONFIG")
        .env_remove("COSTFLOOR_PASSWORD")
        .env_remove("COSTFLOOR_LOG")
        .env("NO_COLOR", "1");
    cmd
}

fn run(cmd: &mut Command) -> Output {
    cmd.output().expect("run costfloor")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

fn json(output: &Output) -> serde_json::Value {
    serde_json::from_slice(&output.stdout).expect("stdout should be JSON")
}

fn hash_password(config_home: &Path, password: &str, extra: &[&str]) -> String {
    let output = run(command(config_home)
        .arg("hash")
        .args(extra)
        .env("COSTFLOOR_PASSWORD", password));
    assert!(output.status.success(), "hash failed: {:?}", output);
    stdout(&output).trim().to_string()
}

#[test]
fn test_help_lists_commands() {
    let dir = TempDir::new().unwrap();
    let output = run(command(dir.path()).arg("--help"));
    assert!(output.status.success());
    let text = stdout(&output);
    for name in ["calibrate", "hash", "verify", "config", "completions"] {
        assert!(text.contains(name), "help missing {}", name);
    }
}

#[test]
fn test_config_init_then_show() {
    let dir = TempDir::new().unwrap();

    let output = run(command(dir.path()).args(["config", "init"]));
    assert!(output.status.success(), "init failed: {:?}", output);
    assert!(dir.path().join("costfloor").join("config.toml").exists());

    let output = run(command(dir.path()).args(["--json", "config", "show"]));
    assert!(output.status.success());
    let value = json(&output);
    assert_eq!(value["exists"], true);
    assert_eq!(value["policy"]["min_duration_ms"], 250);
    assert_eq!(value["policy"]["algorithm"], "bcrypt");
    assert_eq!(value["cost_range"], serde_json::json!([10, 31]));

    // Refuses to overwrite without --force.
    let output = run(command(dir.path()).args(["config", "init"]));
    assert_eq!(output.status.code(), Some(4));
    let output = run(command(dir.path()).args(["config", "init", "--force"]));
    assert!(output.status.success());
}

#[test]
fn test_explicit_config_path_flag() {
    let dir = TempDir::new().unwrap();
    let custom = dir.path().join("elsewhere.toml");
    std::fs::write(&custom, "[policy]\nmin_duration_ms = 42\n").unwrap();

    let output = run(command(dir.path()).args([
        "--json",
        "--config",
        custom.to_str().unwrap(),
        "config",
        "show",
    ]));
    assert!(output.status.success());
    assert_eq!(json(&output)["policy"]["min_duration_ms"], 42);
}

#[test]
fn test_calibrate_reports_samples() {
    let dir = TempDir::new().unwrap();
    write_fast_config(dir.path(), 4, 6);

    let output = run(command(dir.path()).args(["--json", "calibrate"]));
    assert!(output.status.success(), "calibrate failed: {:?}", output);
    let value = json(&output);
    assert_eq!(value["algorithm"], "bcrypt");
    assert_eq!(value["cost"], 4);
    assert_eq!(value["samples"][0]["cost"], 4);
    assert_eq!(value["samples"].as_array().unwrap().len(), 1);
}

#[test]
fn test_hash_then_verify() {
    let dir = TempDir::new().unwrap();
    write_fast_config(dir.path(), 4, 6);

    let hash = hash_password(dir.path(), "hunter2", &[]);
    assert!(hash.starts_with("$2b$04$"), "unexpected hash {}", hash);

    let output = run(command(dir.path())
        .args(["verify", &hash])
        .env("COSTFLOOR_PASSWORD", "hunter2"));
    assert!(output.status.success(), "verify failed: {:?}", output);
    assert!(stdout(&output).contains("match"));
}

#[test]
fn test_verify_mismatch_exit_code() {
    let dir = TempDir::new().unwrap();
    write_fast_config(dir.path(), 4, 6);
    let hash = hash_password(dir.path(), "hunter2", &[]);

    let output = run(command(dir.path())
        .args(["--json", "verify", &hash])
        .env("COSTFLOOR_PASSWORD", "hunter3"));
    assert_eq!(output.status.code(), Some(5));
    let value = json(&output);
    assert_eq!(value["matched"], false);
    assert!(value["upgraded_hash"].is_null());
}

#[test]
fn test_verify_upgrades_stale_hash() {
    let dir = TempDir::new().unwrap();
    write_fast_config(dir.path(), 4, 6);
    let stale = hash_password(dir.path(), "hunter2", &[]);

    let output = run(command(dir.path())
        .args(["--json", "verify", &stale, "--min-cost", "5"])
        .env("COSTFLOOR_PASSWORD", "hunter2"));
    assert!(output.status.success(), "verify failed: {:?}", output);
    let value = json(&output);
    assert_eq!(value["matched"], true);
    let upgraded = value["upgraded_hash"].as_str().expect("upgraded hash");
    assert!(upgraded.starts_with("$2b$05$"));
    assert_eq!(value["events"][0]["event"], "upgraded");
    assert_eq!(value["events"][0]["previous"], 4);

    // The replacement verifies without another upgrade.
    let output = run(command(dir.path())
        .args(["--json", "verify", upgraded, "--min-cost", "5"])
        .env("COSTFLOOR_PASSWORD", "hunter2"));
    assert!(output.status.success());
    assert!(json(&output)["upgraded_hash"].is_null());
}

#[test]
fn test_password_from_stdin() {
    use std::io::Write;
    use std::process::Stdio;

    let dir = TempDir::new().unwrap();
    write_fast_config(dir.path(), 4, 4);

    let mut child = command(dir.path())
        .arg("hash")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("spawn");
    child
        .stdin
        .take()
        .expect("stdin")
        .write_all(b"piped secret\n")
        .expect("write stdin");
    let output = child.wait_with_output().expect("wait");
    assert!(output.status.success(), "hash failed: {:?}", output);
    let hash = stdout(&output).trim().to_string();

    let output = run(command(dir.path())
        .args(["verify", &hash])
        .env("COSTFLOOR_PASSWORD", "piped secret"));
    assert!(output.status.success());
}

#[test]
fn test_unattainable_policy_exit_code() {
    let dir = TempDir::new().unwrap();
    write_fast_config(dir.path(), 4, 4);

    let output = run(command(dir.path())
        .args(["calibrate", "--min-ms", "600000"]));
    assert_eq!(output.status.code(), Some(3));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("unattainable"));
}

#[test]
fn test_inverted_cost_range_rejected() {
    let dir = TempDir::new().unwrap();
    write_fast_config(dir.path(), 4, 6);

    let output = run(command(dir.path())
        .args(["calibrate", "--min-cost", "9"]));
    assert_eq!(output.status.code(), Some(4));
}

#[test]
fn test_completions_generate() {
    let dir = TempDir::new().unwrap();
    let output = run(command(dir.path()).args(["completions", "bash"]));
    assert!(output.status.success());
    assert!(stdout(&output).contains("costfloor"));
}
