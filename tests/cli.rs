use assert_cmd::Command;
use keydrill::config::{Config, ConfigStore, FileConfigStore};
use keydrill::keymap::MapStyle;

fn keydrill() -> Command {
    Command::cargo_bin("keydrill").unwrap()
}

#[test]
fn help_lists_flags() {
    let output = keydrill().arg("--help").output().unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("--dragonfly"));
    assert!(stdout.contains("--retry-chance"));
}

#[test]
fn refuses_to_run_without_a_tty() {
    let dir = tempfile::tempdir().unwrap();
    let output = keydrill()
        .arg("--config")
        .arg(dir.path().join("config.json"))
        .write_stdin("abc")
        .output()
        .unwrap();
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("stdin must be a tty"), "stderr: {stderr}");
}

#[test]
fn rejects_out_of_range_settings() {
    let dir = tempfile::tempdir().unwrap();
    let output = keydrill()
        .arg("--config")
        .arg(dir.path().join("config.json"))
        .args(["--retry-chance", "1.5"])
        .output()
        .unwrap();
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("retry_chance"), "stderr: {stderr}");
}

#[test]
fn write_config_saves_effective_settings() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");

    // Saving happens before the tty check, so the run still fails afterwards
    let output = keydrill()
        .arg("--config")
        .arg(&path)
        .args(["--write-config", "--dragonfly", "--repetitions", "4", "5", "10"])
        .output()
        .unwrap();
    assert!(!output.status.success());

    let saved = FileConfigStore::with_path(&path).load();
    assert_eq!(
        saved,
        Config {
            combo: 5,
            capital_percentage: 10,
            style: MapStyle::Dragonfly,
            repetitions: 4,
            ..Config::default()
        }
    );
}

#[test]
fn rejects_oversized_combo_before_touching_the_terminal() {
    let dir = tempfile::tempdir().unwrap();
    let output = keydrill()
        .arg("--config")
        .arg(dir.path().join("config.json"))
        .arg(usize::MAX.to_string())
        .output()
        .unwrap();
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("combo length"), "stderr: {stderr}");
    assert!(!stderr.contains("panicked"), "stderr: {stderr}");
}
