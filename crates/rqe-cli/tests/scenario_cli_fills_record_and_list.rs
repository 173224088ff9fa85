//! `rqe fills record` appends; `rqe fills list` prints newest first.

use assert_cmd::Command;
use predicates::prelude::*;
use std::path::Path;

#[allow(deprecated)]
fn rqe(db: &Path) -> Command {
    let mut cmd = Command::cargo_bin("rqe").expect("rqe binary");
    cmd.env(rqe_config::ENV_DB_PATH, db).env_remove("RUST_LOG");
    cmd
}

fn record(db: &Path, note: &str) {
    rqe(db)
        .args([
            "fills", "record", "--mode", "paper", "--strategy", "funding", "--symbol", "BTCUSDT",
            "--side", "SELL", "--qty", "0.01", "--price", "65000", "--pnl", "-1.25", "--note",
            note,
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("fill_id="));
}

#[test]
fn list_is_newest_first_and_respects_limit() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("rqe.sqlite");
    rqe(&db).args(["db", "migrate"]).assert().success();

    for note in ["a", "b", "c"] {
        record(&db, note);
    }

    let out = rqe(&db)
        .args(["fills", "list", "--limit", "2"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let lines: Vec<serde_json::Value> = String::from_utf8(out)
        .unwrap()
        .lines()
        .map(|l| serde_json::from_str(l).expect("json line"))
        .collect();

    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0]["note"], "c");
    assert_eq!(lines[1]["note"], "b");
    assert_eq!(lines[0]["pnl"], -1.25);
    assert!(lines[0]["id"].as_i64().unwrap() > lines[1]["id"].as_i64().unwrap());
}

#[test]
fn list_on_empty_ledger_prints_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("rqe.sqlite");
    rqe(&db).args(["db", "migrate"]).assert().success();

    rqe(&db)
        .args(["fills", "list"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}
