use assert_cmd::cargo::cargo_bin_cmd;
use predicates::str::contains;

const INVENTORY: &str = r#"{
    "VaultARN": "arn:aws:glacier:eu-west-1:111122223333:vaults/photos",
    "InventoryDate": "2021-03-01T10:00:00Z",
    "ArchiveList": [
        {
            "ArchiveId": "A1",
            "ArchiveDescription": "{\"path\": \"docs/readme.txt\"}",
            "CreationDate": "2020-01-01T00:00:00Z",
            "Size": 7,
            "SHA256TreeHash": "00ff"
        }
    ]
}"#;

fn thawctl(dir: &std::path::Path) -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("thawctl");
    cmd.current_dir(dir)
        .env("THAW_ENV_FILE", dir.join("absent.env"))
        .env_remove("THAW_INVENTORY")
        .env_remove("THAW_ACCOUNT_ID")
        .env_remove("THAW_VAULT_NAME")
        .env_remove("THAW_CONFIG");
    cmd
}

#[test]
fn help_lists_run_options() {
    let output = cargo_bin_cmd!("thawctl")
        .arg("--help")
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let text = String::from_utf8_lossy(&output);
    for flag in [
        "--inventory",
        "--account-id",
        "--vault-name",
        "--restore-path",
        "--restore-tier",
        "--max-job-count",
        "--check-status",
        "--download",
        "--initiate-restore",
        "--print-all-jobs",
        "--config",
    ] {
        assert!(text.contains(flag), "help missing {flag}");
    }
}

#[test]
fn mismatched_account_fails_before_contacting_the_vault() {
    let dir = tempfile::tempdir().unwrap();
    let inventory = dir.path().join("inventory.json");
    std::fs::write(&inventory, INVENTORY).unwrap();

    thawctl(dir.path())
        .arg("--inventory")
        .arg(&inventory)
        .args(["--account-id", "999999999999"])
        .assert()
        .failure()
        .stderr(contains("doesn't match"));
}

#[test]
fn missing_vault_target_is_reported() {
    let dir = tempfile::tempdir().unwrap();

    thawctl(dir.path())
        .assert()
        .failure()
        .stderr(contains("blank"));
}

#[test]
fn malformed_config_file_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("thaw.toml");
    std::fs::write(&config, "restore_tier = \"glacial\"\n").unwrap();

    thawctl(dir.path())
        .arg("--config")
        .arg(&config)
        .assert()
        .failure()
        .stderr(contains("invalid config"));
}
