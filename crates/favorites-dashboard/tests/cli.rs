//! Integration tests for the `favd` binary.
//!
//! Every test points `--config` and the store at a temp dir so the user's
//! real files are never read.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const FAVD_BIN: &str = env!("CARGO_BIN_EXE_favd");

fn favd(config: &Path) -> Command {
    let mut cmd = Command::new(FAVD_BIN);
    cmd.env_remove("FAVD_LOG")
        .arg("--config")
        .arg(config);
    cmd
}

fn store_cmd(tmp: &TempDir, args: &[&str]) -> assert_cmd::assert::Assert {
    let store = tmp.path().join("favorites.json");
    favd(&tmp.path().join("config.toml"))
        .arg("store")
        .arg("--path")
        .arg(&store)
        .args(args)
        .assert()
}

fn write_states(tmp: &TempDir) -> PathBuf {
    let path = tmp.path().join("states.json");
    let states = serde_json::json!({
        "light.kitchen": {"state": "on", "attributes": {"friendly_name": "Kitchen"}},
        "cover.blind": {"state": "closed", "attributes": {"friendly_name": "Blind", "current_position": 0}}
    });
    fs::write(&path, states.to_string()).expect("write states");
    path
}

#[test]
fn store_add_then_list() {
    let tmp = TempDir::new().expect("temp dir");
    store_cmd(&tmp, &["add", "u1", "light.kitchen"])
        .success()
        .stdout(predicate::str::contains(r#""action":"add""#));
    store_cmd(&tmp, &["add", "u1", "cover.blind", "--name", "Blind"]).success();

    store_cmd(&tmp, &["list", "u1"])
        .success()
        .stdout("light.kitchen\ncover.blind\tBlind\n");
}

#[test]
fn store_rejects_malformed_entity() {
    let tmp = TempDir::new().expect("temp dir");
    store_cmd(&tmp, &["add", "u1", "Kitchen Light"])
        .failure()
        .stderr(predicate::str::contains("Store error"));
}

#[test]
fn store_reorder_and_summary() {
    let tmp = TempDir::new().expect("temp dir");
    store_cmd(&tmp, &["add", "u1", "light.kitchen"]).success();
    store_cmd(&tmp, &["add", "u1", "cover.blind"]).success();
    store_cmd(&tmp, &["reorder", "u1", "cover.blind", "light.kitchen"])
        .success()
        .stdout(predicate::str::contains(
            r#""favorites":["cover.blind","light.kitchen"]"#,
        ));
    store_cmd(&tmp, &["summary"])
        .success()
        .stdout("count: 2\nhas_favorites: true\n");
}

#[test]
fn render_prints_grid_for_user() {
    let tmp = TempDir::new().expect("temp dir");
    store_cmd(&tmp, &["add", "u1", "light.kitchen"]).success();
    store_cmd(&tmp, &["add", "u1", "cover.blind"]).success();
    let states = write_states(&tmp);

    favd(&tmp.path().join("config.toml"))
        .arg("render")
        .arg("--states")
        .arg(&states)
        .arg("--store")
        .arg(tmp.path().join("favorites.json"))
        .args(["--user", "u1", "--width", "60"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Favorites"))
        .stdout(predicate::str::contains("2 items"))
        .stdout(predicate::str::contains("Kitchen"))
        .stdout(predicate::str::contains("0%"));
}

#[test]
fn render_reports_missing_states_file() {
    let tmp = TempDir::new().expect("temp dir");
    favd(&tmp.path().join("config.toml"))
        .arg("render")
        .arg("--states")
        .arg(tmp.path().join("missing.json"))
        .arg("--store")
        .arg(tmp.path().join("favorites.json"))
        .args(["--user", "u1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read states file"));
}

#[test]
fn config_init_set_validate() {
    let tmp = TempDir::new().expect("temp dir");
    let config = tmp.path().join("config.toml");

    favd(&config).args(["config", "init"]).assert().success();
    favd(&config)
        .args(["config", "init"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));

    favd(&config)
        .args(["config", "set", "columns", "3"])
        .assert()
        .success()
        .stdout("columns = 3\n");
    favd(&config)
        .args(["config", "set", "theme", "neon"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Config error"));

    favd(&config)
        .args(["config", "validate"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Configuration is valid"))
        .stdout(predicate::str::contains("columns: 3"));
}

#[test]
fn config_path_honours_flag() {
    let tmp = TempDir::new().expect("temp dir");
    let config = tmp.path().join("custom.toml");
    favd(&config)
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("custom.toml"));
}
