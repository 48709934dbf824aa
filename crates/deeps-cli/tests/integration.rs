use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn deeps(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("deeps").unwrap();
    cmd.current_dir(dir.path());
    cmd
}

// ---------------------------------------------------------------------------
// deeps roster
// ---------------------------------------------------------------------------

#[test]
fn roster_lists_the_default_cohort() {
    let dir = TempDir::new().unwrap();
    deeps(&dir)
        .arg("roster")
        .assert()
        .success()
        .stdout(predicate::str::contains("15 admission(s)"));
}

#[test]
fn roster_json_is_parseable() {
    let dir = TempDir::new().unwrap();
    let output = deeps(&dir).args(["roster", "--json"]).assert().success();
    let stdout = String::from_utf8(output.get_output().stdout.clone()).unwrap();
    let patients: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(patients.as_array().unwrap().len(), 15);
}

#[test]
fn roster_is_deterministic_per_seed() {
    let dir = TempDir::new().unwrap();
    let first = deeps(&dir)
        .args(["roster", "--seed", "7", "--json"])
        .assert()
        .success();
    let second = deeps(&dir)
        .args(["roster", "--seed", "7", "--json"])
        .assert()
        .success();
    assert_eq!(first.get_output().stdout, second.get_output().stdout);
}

#[test]
fn roster_kind_filter_rejects_unknown_kind() {
    let dir = TempDir::new().unwrap();
    deeps(&dir)
        .args(["roster", "--kind", "CARDIAC"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown procedure kind"));
}

// ---------------------------------------------------------------------------
// deeps run
// ---------------------------------------------------------------------------

#[test]
fn run_fast_reaches_a_terminal_report() {
    let dir = TempDir::new().unwrap();
    deeps(&dir)
        .args(["run", "0", "--fast"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("SURGICAL SUCCESS RECORD")
                .or(predicate::str::contains("REFERRAL LETTER (ABORTED)")),
        );
}

#[test]
fn run_unknown_patient_fails() {
    let dir = TempDir::new().unwrap();
    deeps(&dir)
        .args(["run", "PX-THERE-IS-NO-SUCH-ID", "--fast"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no admission matches"));
}

// ---------------------------------------------------------------------------
// deeps replay
// ---------------------------------------------------------------------------

#[test]
fn replay_summarizes_the_session() {
    let dir = TempDir::new().unwrap();
    deeps(&dir)
        .args(["replay", "0", "--fast"])
        .assert()
        .success()
        .stdout(predicate::str::contains("events over"));
}

#[test]
fn replay_at_zero_reports_defaults() {
    let dir = TempDir::new().unwrap();
    deeps(&dir)
        .args(["replay", "0", "--fast", "--at", "0", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"active_laser\""));
}

#[test]
fn replay_anomalies_flag_runs() {
    let dir = TempDir::new().unwrap();
    deeps(&dir)
        .args(["replay", "0", "--fast", "--anomalies"])
        .assert()
        .success();
}

// ---------------------------------------------------------------------------
// config handling
// ---------------------------------------------------------------------------

#[test]
fn config_file_overrides_roster_size() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("deeps.yaml"), "roster_size: 4\n").unwrap();
    deeps(&dir)
        .arg("roster")
        .assert()
        .success()
        .stdout(predicate::str::contains("4 admission(s)"));
}

#[test]
fn malformed_config_is_reported() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("deeps.yaml"), "roster_size: [not, a, number]\n").unwrap();
    deeps(&dir)
        .arg("roster")
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to load config"));
}
