use cinder_rbd::constants::envs;
use predicates::prelude::*;

mod common;

const VOLUME: &str = r#"{
    "name": "volume-7d1c",
    "keyring": "AQBsecretkeyring==",
    "auth_enabled": true,
    "auth_username": "cinder",
    "hosts": ["10.0.0.1", "10.0.0.2"],
    "ports": ["6789", 6789],
    "access_mode": "rw",
    "volume_type": "rbd"
}"#;

#[test]
fn test_attach_and_detach_run_no_tools() {
    let mut ctx = common::cinder_rbd();
    let target = "/var/lib/kubelet/plugins/cinder/mounts/volume-7d1c";

    ctx.cmd
        .args(["attach", "--volume", VOLUME, "--target", target])
        .assert()
        .success()
        .stdout(predicate::str::contains(target));

    ctx.new_cmd()
        .args(["detach", "--volume", VOLUME, "--target", target])
        .assert()
        .success()
        .stdout(predicate::str::contains(target));

    assert!(ctx.tools.calls().is_empty());
}

#[test]
fn test_attach_rejects_bad_descriptor() {
    let mut ctx = common::cinder_rbd();

    ctx.cmd
        .args(["attach", "--volume", "[1, 2]", "--target", "/mnt/x"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("descriptor must be an object"));
}

#[test]
fn test_drivers_lists_rbd() {
    let mut ctx = common::cinder_rbd();

    ctx.cmd
        .arg("drivers")
        .assert()
        .success()
        .stdout(predicate::eq("rbd\n"));
}

#[test]
fn test_show_redacts_keyring() {
    let mut ctx = common::cinder_rbd();

    ctx.cmd
        .args(["show", "--volume", VOLUME])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "rbd:volume-7d1c hosts=[10.0.0.1,10.0.0.2] user=cinder access_mode=rw type=rbd",
        ))
        .stdout(predicate::str::contains("endpoints: 10.0.0.1:6789,10.0.0.2:6789"))
        .stdout(predicate::str::contains("AQBsecret").not());

    ctx.new_cmd()
        .args(["show", "--json", "--volume", VOLUME])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""auth_username": "cinder""#))
        .stdout(predicate::str::contains("keyring").not());
}

#[test]
fn test_config_file_search_path() {
    let mut ctx = common::cinder_rbd();
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("options.json");
    std::fs::write(
        &config,
        format!(
            r#"{{"search_path": "{}"}}"#,
            ctx.tools.bin_dir().display()
        ),
    )
    .unwrap();

    ctx.cmd
        .env("PATH", "/nonexistent")
        .arg("--config")
        .arg(&config)
        .args(["format", "--volume", r#"{"name": "vol1"}"#])
        .assert()
        .success();

    assert_eq!(ctx.tools.count("mkfs.ext4 /dev/rbd0"), 1);
}

#[test]
fn test_config_file_from_env() {
    let mut ctx = common::cinder_rbd();
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("options.json");
    std::fs::write(
        &config,
        format!(
            r#"{{"search_path": "{}"}}"#,
            ctx.tools.bin_dir().display()
        ),
    )
    .unwrap();

    ctx.cmd
        .env("PATH", "/nonexistent")
        .env(envs::CONFIG, &config)
        .args(["format", "--volume", r#"{"name": "vol1"}"#])
        .assert()
        .success();

    assert_eq!(ctx.tools.count("rbd map vol1"), 1);
}

#[test]
fn test_search_path_env_overrides_path() {
    let mut ctx = common::cinder_rbd();

    ctx.cmd
        .env("PATH", "/nonexistent")
        .env(envs::SEARCH_PATH, ctx.tools.search_path())
        .args(["format", "--volume", r#"{"name": "vol1"}"#])
        .assert()
        .success();

    assert_eq!(ctx.tools.count("rbd map vol1"), 1);
}

#[test]
fn test_missing_rbd_reported() {
    let mut ctx = common::cinder_rbd();

    ctx.cmd
        .env("PATH", "/nonexistent")
        .args(["format", "--volume", r#"{"name": "vol1"}"#])
        .assert()
        .failure()
        .stderr(predicate::str::contains("rbd command not found"));
}

#[test]
fn test_invalid_config_file() {
    let mut ctx = common::cinder_rbd();
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("options.json");
    std::fs::write(&config, "{not json").unwrap();

    ctx.cmd
        .arg("--config")
        .arg(&config)
        .arg("drivers")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid options"));
}

#[test]
fn test_log_file_receives_driver_logs() {
    let mut ctx = common::cinder_rbd();
    let dir = tempfile::tempdir().unwrap();
    let log = dir.path().join("logs").join("cinder-rbd.log");

    ctx.cmd
        .arg("--log-level")
        .arg("info")
        .arg("--log-file")
        .arg(&log)
        .args(["format", "--volume", r#"{"name": "vol1"}"#])
        .assert()
        .success();

    let content = std::fs::read_to_string(&log).unwrap();
    assert!(content.contains("Mapped rbd volume"));
}
