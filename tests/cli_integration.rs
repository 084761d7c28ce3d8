// End-to-end tests for the securevault binary.

use assert_cmd::Command;
use predicates::prelude::*;
use serial_test::serial;
use tempfile::TempDir;

fn vault_cmd(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("securevault").unwrap();
    cmd.arg("-f").arg(dir.path().join("vault.json"));
    cmd
}

fn init_vault(dir: &TempDir) {
    vault_cmd(dir).arg("init").assert().success();
}

fn add_entry(dir: &TempDir, title: &str, username: &str, password: &str) {
    vault_cmd(dir)
        .args([
            "add", title, "--username", username, "--password", password,
        ])
        .assert()
        .success();
}

#[test]
fn test_init_creates_vault_file() {
    let dir = TempDir::new().unwrap();
    vault_cmd(&dir)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Created vault"));
    assert!(dir.path().join("vault.json").exists());
}

#[test]
fn test_init_refuses_existing_vault_without_force() {
    let dir = TempDir::new().unwrap();
    init_vault(&dir);
    vault_cmd(&dir)
        .arg("init")
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
    vault_cmd(&dir).args(["init", "--force"]).assert().success();
}

#[test]
fn test_add_and_list() {
    let dir = TempDir::new().unwrap();
    init_vault(&dir);
    add_entry(&dir, "GitHub", "emmachuka@gmail.com", "SecurePass123!@#");

    vault_cmd(&dir)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("GitHub"))
        .stdout(predicate::str::contains("strong"));
}

#[test]
fn test_list_never_prints_passwords() {
    let dir = TempDir::new().unwrap();
    init_vault(&dir);
    add_entry(&dir, "GitHub", "emma", "SecurePass123!@#");

    vault_cmd(&dir)
        .args(["list", "-o", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("SecurePass123!@#").not())
        .stdout(predicate::str::contains("••••••••"));
}

#[test]
fn test_add_rejects_empty_title() {
    let dir = TempDir::new().unwrap();
    init_vault(&dir);
    vault_cmd(&dir)
        .args(["add", "  ", "--password", "SecurePass123!@#"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("title"));
}

#[test]
fn test_add_requires_password_for_login_when_not_a_tty() {
    let dir = TempDir::new().unwrap();
    init_vault(&dir);
    vault_cmd(&dir)
        .args(["add", "GitHub"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("password"));
}

#[test]
fn test_secure_note_without_password() {
    let dir = TempDir::new().unwrap();
    init_vault(&dir);
    vault_cmd(&dir)
        .args(["add", "Recovery codes", "--category", "secure-note"])
        .assert()
        .success();

    vault_cmd(&dir)
        .args(["list", "--category", "secure-note"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Recovery codes"));
}

#[test]
fn test_search_filters_by_query_and_category() {
    let dir = TempDir::new().unwrap();
    init_vault(&dir);
    add_entry(&dir, "GitHub", "emma", "SecurePass123!@#");
    add_entry(&dir, "GitLab", "emma", "OtherPass456$%");
    vault_cmd(&dir)
        .args(["add", "Git notes", "--category", "secure-note"])
        .assert()
        .success();

    vault_cmd(&dir)
        .args(["search", "git", "--category", "login"])
        .assert()
        .success()
        .stdout(predicate::str::contains("GitHub"))
        .stdout(predicate::str::contains("GitLab"))
        .stdout(predicate::str::contains("Git notes").not());
}

#[test]
fn test_show_masks_by_default_and_reveals_on_request() {
    let dir = TempDir::new().unwrap();
    init_vault(&dir);
    add_entry(&dir, "GitHub", "emma", "SecurePass123!@#");

    let output = vault_cmd(&dir)
        .args(["list", "-o", "json"])
        .output()
        .unwrap();
    let entries: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let id = entries[0]["id"].as_str().unwrap().to_string();

    vault_cmd(&dir)
        .args(["show", &id])
        .assert()
        .success()
        .stdout(predicate::str::contains("••••••••"))
        .stdout(predicate::str::contains("SecurePass123!@#").not());

    vault_cmd(&dir)
        .args(["show", &id, "--reveal"])
        .assert()
        .success()
        .stdout(predicate::str::contains("SecurePass123!@#"));
}

#[test]
fn test_status_reports_metrics() {
    let dir = TempDir::new().unwrap();
    init_vault(&dir);
    add_entry(&dir, "GitHub", "emma", "SharedPass1!");
    add_entry(&dir, "GitLab", "emma", "SharedPass1!");
    vault_cmd(&dir)
        .args(["add", "Router", "--password", "cat"])
        .assert()
        .success();

    let output = vault_cmd(&dir)
        .args(["status", "-o", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let metrics: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(metrics["total_entries"], 3);
    assert_eq!(metrics["weak_passwords"], 1);
    assert_eq!(metrics["duplicate_passwords"], 2);
    // 100*(1-1/3)*0.6 + 100*(1-2/3)*0.4 = 40 + 13.33 -> 53
    assert_eq!(metrics["security_score"], 53);
}

#[test]
fn test_edit_updates_strength() {
    let dir = TempDir::new().unwrap();
    init_vault(&dir);
    add_entry(&dir, "GitHub", "emma", "SecurePass123!@#");

    let output = vault_cmd(&dir)
        .args(["list", "-o", "json"])
        .output()
        .unwrap();
    let entries: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let id = entries[0]["id"].as_str().unwrap().to_string();

    vault_cmd(&dir)
        .args(["edit", &id, "--password", "cat"])
        .assert()
        .success()
        .stdout(predicate::str::contains("weak"));
}

#[test]
fn test_rm_deletes_entry() {
    let dir = TempDir::new().unwrap();
    init_vault(&dir);
    add_entry(&dir, "GitHub", "emma", "SecurePass123!@#");

    let output = vault_cmd(&dir)
        .args(["list", "-o", "json"])
        .output()
        .unwrap();
    let entries: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let id = entries[0]["id"].as_str().unwrap().to_string();

    vault_cmd(&dir)
        .args(["rm", &id, "--yes"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Deleted"));

    vault_cmd(&dir)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("GitHub").not());
}

#[test]
fn test_rm_unknown_id_fails() {
    let dir = TempDir::new().unwrap();
    init_vault(&dir);
    vault_cmd(&dir)
        .args(["rm", "0000000000000000", "--yes"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn test_favorite_toggle() {
    let dir = TempDir::new().unwrap();
    init_vault(&dir);
    add_entry(&dir, "GitHub", "emma", "SecurePass123!@#");

    let output = vault_cmd(&dir)
        .args(["list", "-o", "json"])
        .output()
        .unwrap();
    let entries: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let id = entries[0]["id"].as_str().unwrap().to_string();

    vault_cmd(&dir)
        .args(["favorite", &id])
        .assert()
        .success()
        .stdout(predicate::str::contains("Favorite on"));

    vault_cmd(&dir)
        .args(["favorite", &id])
        .assert()
        .success()
        .stdout(predicate::str::contains("Favorite off"));
}

#[test]
fn test_missing_vault_file_is_an_error() {
    let dir = TempDir::new().unwrap();
    vault_cmd(&dir)
        .arg("list")
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

#[test]
#[serial]
fn test_vault_file_env_var() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("vault.json");

    Command::cargo_bin("securevault")
        .unwrap()
        .env("VAULT_FILE", &path)
        .arg("init")
        .assert()
        .success();

    Command::cargo_bin("securevault")
        .unwrap()
        .env("VAULT_FILE", &path)
        .args([
            "add",
            "GitHub",
            "--password",
            "SecurePass123!@#",
        ])
        .assert()
        .success();

    Command::cargo_bin("securevault")
        .unwrap()
        .env("VAULT_FILE", &path)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("GitHub"));
}
