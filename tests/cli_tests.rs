//! End-to-end CLI tests
//!
//! Every command runs against a temp data directory via `FIITRACK_DATA_DIR`,
//! with universe snapshots pre-seeded so no test touches the network.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn fiitrack(data_dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("fiitrack").expect("binary builds");
    cmd.env("FIITRACK_DATA_DIR", data_dir.path())
        .env("BRAPI_API_KEY", "test-key")
        .env("FIITRACK_SKIP_ONLINE_TESTS", "1")
        .arg("--no-color");
    cmd
}

fn seed_universe(data_dir: &TempDir) {
    std::fs::write(
        data_dir.path().join("universe.csv"),
        "ticker,name,fund_type,last_price,trailing_yield_pct,last_updated\n\
         HGLG11,CSHG LOG,FII,165,8.4,2025-01-10 12:00\n\
         MXRF11,MAXI RENDA,FII,10.50,12,2025-01-10 12:00\n",
    )
    .unwrap();
}

#[test]
fn test_help_shows_dashboard_summary() {
    let dir = TempDir::new().unwrap();
    fiitrack(&dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("financial-independence target"));
}

#[test]
fn test_explore_hints_bootstrap_on_empty_universe() {
    let dir = TempDir::new().unwrap();
    fiitrack(&dir)
        .arg("explore")
        .assert()
        .success()
        .stdout(predicate::str::contains("fiitrack bootstrap"));
}

#[test]
fn test_explore_filters_by_search() {
    let dir = TempDir::new().unwrap();
    seed_universe(&dir);

    fiitrack(&dir)
        .args(["explore", "--search", "maxi"])
        .assert()
        .success()
        .stdout(predicate::str::contains("MXRF11"))
        .stdout(predicate::str::contains("HGLG11").not());
}

#[test]
fn test_buy_rejects_zero_quantity_without_mutation() {
    let dir = TempDir::new().unwrap();
    fiitrack(&dir)
        .args(["portfolio", "buy", "HGLG11", "0", "100"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("quantity must not be zero"));

    assert!(!dir.path().join("portfolio.json").exists());
}

#[test]
fn test_buy_rejects_non_positive_price() {
    let dir = TempDir::new().unwrap();
    fiitrack(&dir)
        .args(["portfolio", "buy", "HGLG11", "10", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("price must be positive"));
}

#[test]
fn test_buy_sell_show_round_trip() {
    let dir = TempDir::new().unwrap();
    seed_universe(&dir);

    fiitrack(&dir)
        .args(["portfolio", "buy", "hglg11", "10", "150"])
        .assert()
        .success()
        .stdout(predicate::str::contains("HGLG11"));

    fiitrack(&dir)
        .args(["portfolio", "buy", "HGLG11", "10", "200"])
        .assert()
        .success()
        .stdout(predicate::str::contains("R$ 175,00"));

    // Snapshot prices resolve the metrics, so show works offline
    fiitrack(&dir)
        .args(["portfolio", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("R$ 3.300,00"))
        .stdout(predicate::str::contains("Average yield"));

    // Over-sell closes the position entirely
    fiitrack(&dir)
        .args(["portfolio", "sell", "HGLG11", "30", "160"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Position closed"));

    fiitrack(&dir)
        .args(["portfolio", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Portfolio is empty"));
}

#[test]
fn test_project_from_empty_portfolio_reaches_small_target() {
    let dir = TempDir::new().unwrap();

    fiitrack(&dir)
        .args([
            "project",
            "--contribution",
            "1000",
            "--target",
            "100",
            "--years",
            "10",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Financial independence reached"));
}

#[test]
fn test_project_unreachable_target_warns() {
    let dir = TempDir::new().unwrap();

    fiitrack(&dir)
        .args([
            "project",
            "--contribution",
            "100",
            "--target",
            "1000000",
            "--years",
            "1",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Target not reached"));
}
