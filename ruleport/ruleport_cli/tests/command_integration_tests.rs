use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const POLICY: &str = "\
p, alice, data1, read
p, bob, data2, write
p, data2_admin, data2, read
p, data2_admin, data2, write

# groupings
g, alice, data2_admin
";

fn ruleport(store: &Path) -> Command {
    let mut cmd = Command::cargo_bin("ruleport").unwrap();
    cmd.env_remove("RUST_LOG").arg("--store").arg(store);
    cmd
}

fn imported_store() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    let policy = dir.path().join("policy.csv");
    fs::write(&policy, POLICY).unwrap();

    ruleport(&dir.path().join("data"))
        .arg("import")
        .arg(&policy)
        .assert()
        .success()
        .stdout(predicate::str::contains("imported 5 rules into casbin_rule"));
    dir
}

#[test]
fn test_import_then_list() {
    let dir = imported_store();

    ruleport(&dir.path().join("data"))
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("p, alice, data1, read"))
        .stdout(predicate::str::contains("p, bob, data2, write"))
        .stdout(predicate::str::contains("g, alice, data2_admin"));

    ruleport(&dir.path().join("data"))
        .arg("count")
        .assert()
        .success()
        .stdout("5\n");
}

#[test]
fn test_list_with_filter() {
    let dir = imported_store();

    ruleport(&dir.path().join("data"))
        .args(["list", "--ptype", "p", "--field", "v1=data2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("p, bob, data2, write"))
        .stdout(predicate::str::contains("alice, data1").not())
        .stdout(predicate::str::contains("g, ").not());
}

#[test]
fn test_list_rejects_unknown_field() {
    let dir = imported_store();

    ruleport(&dir.path().join("data"))
        .args(["list", "--field", "subject=alice"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown field `subject`"));
}

#[test]
fn test_add_and_remove() {
    let dir = tempfile::tempdir().unwrap();
    let store = dir.path().join("data");

    ruleport(&store)
        .args(["add", "p", "carol", "data3", "read"])
        .assert()
        .success()
        .stdout(predicate::str::contains("added p, carol, data3, read"));

    // Adding twice keeps one record.
    ruleport(&store)
        .args(["add", "p", "carol", "data3", "read"])
        .assert()
        .success();
    ruleport(&store).arg("count").assert().success().stdout("1\n");

    ruleport(&store)
        .args(["remove", "p", "carol", "data3", "read"])
        .assert()
        .success();
    ruleport(&store).arg("count").assert().success().stdout("0\n");
}

#[test]
fn test_remove_filtered_and_remove_type() {
    let dir = imported_store();
    let store = dir.path().join("data");

    ruleport(&store)
        .args(["remove-filtered", "p", "0", "data2_admin"])
        .assert()
        .success();
    ruleport(&store).arg("count").assert().success().stdout("3\n");

    ruleport(&store)
        .args(["remove-filtered", "p", "0", "", "", "write"])
        .assert()
        .success();
    ruleport(&store).arg("count").assert().success().stdout("2\n");

    ruleport(&store)
        .args(["remove-type", "p"])
        .assert()
        .success();
    ruleport(&store)
        .arg("list")
        .assert()
        .success()
        .stdout("g, alice, data2_admin\n");
}

#[test]
fn test_collection_option_isolates_rules() {
    let dir = imported_store();
    let store = dir.path().join("data");

    ruleport(&store)
        .args(["--collection", "tenant_b", "count"])
        .assert()
        .success()
        .stdout("0\n");
}

#[test]
fn test_config_file_sets_collection() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("ruleport.toml");
    fs::write(
        &config,
        format!(
            "[adapter]\ncollection = \"from_config\"\n\n[store]\npath = {:?}\n",
            dir.path().join("data")
        ),
    )
    .unwrap();

    Command::cargo_bin("ruleport")
        .unwrap()
        .arg("--config")
        .arg(&config)
        .args(["add", "g", "alice", "admin"])
        .assert()
        .success();

    assert!(dir.path().join("data").join("from_config.json").exists());
}

#[test]
fn test_command_line_overrides_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("ruleport.toml");
    fs::write(
        &config,
        format!(
            "[adapter]\ncollection = \"from_config\"\n\n[store]\npath = {:?}\n",
            dir.path().join("config_data")
        ),
    )
    .unwrap();
    let store = dir.path().join("cli_data");

    Command::cargo_bin("ruleport")
        .unwrap()
        .arg("--config")
        .arg(&config)
        .arg("--store")
        .arg(&store)
        .args(["--collection", "cli_rules", "add", "g", "alice", "admin"])
        .assert()
        .success();

    assert!(store.join("cli_rules.json").exists());
    assert!(!store.join("from_config.json").exists());
    assert!(!dir.path().join("config_data").exists());
}

#[test]
fn test_rejects_unknown_rule_type() {
    let dir = tempfile::tempdir().unwrap();

    ruleport(dir.path())
        .args(["add", "x", "alice"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("must start with 'p' or 'g'"));
}

#[test]
fn test_import_reports_bad_line() {
    let dir = tempfile::tempdir().unwrap();
    let policy = dir.path().join("policy.csv");
    fs::write(&policy, "p, alice, data1, read\nz, nobody\n").unwrap();

    ruleport(&dir.path().join("data"))
        .arg("import")
        .arg(&policy)
        .assert()
        .failure()
        .stderr(predicate::str::contains("policy.csv:2"));
}
