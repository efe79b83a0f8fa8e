use assert_cmd::prelude::*;
use std::fs;
use std::process::Command;
use tempfile::tempdir;

#[test]
fn fail_on_threshold_controls_exit_code() -> Result<(), Box<dyn std::error::Error>> {
    let tmp = tempdir()?;
    let test_file = tmp.path().join("page.php");
    fs::write(&test_file, "<?php\n$tab = $_GET['tab'];\n")?;

    Command::cargo_bin("wpsec")?
        .arg("scan")
        .arg(&test_file)
        .args(["--fail-on", "warning", "--quiet"])
        .assert()
        .failure()
        .code(1);

    Command::cargo_bin("wpsec")?
        .arg("scan")
        .arg(&test_file)
        .args(["--fail-on", "error", "--quiet"])
        .assert()
        .success();

    Command::cargo_bin("wpsec")?
        .arg("scan")
        .arg(&test_file)
        .arg("--quiet")
        .assert()
        .success();
    Ok(())
}

#[test]
fn unknown_severity_is_rejected() -> Result<(), Box<dyn std::error::Error>> {
    let tmp = tempdir()?;
    Command::cargo_bin("wpsec")?
        .arg("scan")
        .arg(tmp.path())
        .args(["--fail-on", "critical"])
        .assert()
        .failure()
        .stderr(predicates::str::contains("unknown severity 'critical'"));
    Ok(())
}
