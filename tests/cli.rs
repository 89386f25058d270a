use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn fixtures() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn cdl_schema() -> Command {
    let mut cmd = Command::cargo_bin("cdl-schema").unwrap();
    cmd.env_remove("CDL_SCHEMA_BASE_URL").env_remove("RUST_LOG");
    cmd
}

#[test]
fn convert_directory_writes_domain_routed_schemas() {
    let out = TempDir::new().unwrap();

    cdl_schema()
        .arg("convert")
        .arg(fixtures())
        .arg(out.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Processing:"))
        .stdout(predicate::str::contains("  Generated:"))
        .stdout(predicate::str::contains(
            "Converted 2 file(s): 2 generated, 0 skipped, 0 failed",
        ));

    assert!(out.path().join("pf_active/coil-current.schema.json").is_file());
    assert!(out.path().join("base/polygon-geometry.schema.json").is_file());
}

#[test]
fn convert_skips_existing_unless_forced() {
    let out = TempDir::new().unwrap();
    let input = fixtures().join("pf_active/coil_current.cdl");

    cdl_schema()
        .arg("convert")
        .arg(&input)
        .arg(out.path())
        .assert()
        .success();

    cdl_schema()
        .arg("convert")
        .arg(&input)
        .arg(out.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists, use --force to overwrite"))
        .stdout(predicate::str::contains("0 generated, 1 skipped"));

    cdl_schema()
        .arg("convert")
        .arg(&input)
        .arg(out.path())
        .arg("--force")
        .assert()
        .success()
        .stdout(predicate::str::contains("1 generated, 0 skipped"));
}

#[test]
fn base_url_comes_from_environment() {
    let out = TempDir::new().unwrap();

    cdl_schema()
        .env("CDL_SCHEMA_BASE_URL", "https://schemas.example.org")
        .arg("convert")
        .arg(fixtures().join("pf_active/coil_current.cdl"))
        .arg(out.path())
        .assert()
        .success();

    let text = fs::read_to_string(out.path().join("pf_active/coil-current.schema.json")).unwrap();
    let schema: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(
        schema["$id"],
        "https://schemas.example.org/pf_active/coil-current.schema.json"
    );
}

#[test]
fn convert_reports_broken_files_and_continues() {
    let input = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    fs::copy(
        fixtures().join("pf_active/coil_current.cdl"),
        input.path().join("coil_current.cdl"),
    )
    .unwrap();
    fs::write(
        input.path().join("dangling.cdl"),
        "netcdf d { variables: double pf_x(nowhere) ; }",
    )
    .unwrap();

    cdl_schema()
        .arg("convert")
        .arg(input.path())
        .arg(out.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("  Error processing"))
        .stdout(predicate::str::contains("undeclared dimension 'nowhere'"))
        .stdout(predicate::str::contains("1 generated, 0 skipped, 1 failed"));
}

#[test]
fn convert_fails_without_inputs() {
    let empty = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();

    cdl_schema()
        .arg("convert")
        .arg(empty.path())
        .arg(out.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("No CDL files found"));

    cdl_schema()
        .arg("convert")
        .arg(empty.path().join("missing"))
        .arg(out.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("is not a valid file or directory"));
}

#[test]
fn validate_accepts_and_rejects() {
    let dir = TempDir::new().unwrap();
    let good = dir.path().join("good.json");
    fs::write(
        &good,
        r#"{"dims": ["time"], "attrs": {"standard_name": "magnetic_field_strength", "units": "T"}, "data": [1.0, 2.0]}"#,
    )
    .unwrap();
    let bad = dir.path().join("bad.json");
    fs::write(&bad, r#"{"standard_name": "Air Temperature", "units": "K"}"#).unwrap();

    cdl_schema()
        .arg("validate")
        .arg(&good)
        .assert()
        .success()
        .stdout(predicate::str::contains("valid data array"));

    cdl_schema()
        .arg("validate")
        .arg(&bad)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("**Air Temperature** is *not* valid"));
}

#[test]
fn check_reports_missing_schemas() {
    let out = TempDir::new().unwrap();

    cdl_schema()
        .arg("check")
        .arg(fixtures())
        .arg(out.path())
        .assert()
        .failure()
        .stdout(predicate::str::contains("Missing schema:"))
        .stdout(predicate::str::contains("2 missing, 0 invalid"));

    cdl_schema()
        .arg("convert")
        .arg(fixtures())
        .arg(out.path())
        .assert()
        .success();

    cdl_schema()
        .arg("check")
        .arg(fixtures())
        .arg(out.path())
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Checked 2 definition(s) and 2 schema(s): 0 missing, 0 invalid",
        ));
}

#[test]
fn list_definitions_and_schemas() {
    cdl_schema()
        .arg("list")
        .arg(fixtures())
        .assert()
        .success()
        .stdout("base/polygon_geometry.cdl\npf_active/coil_current.cdl\n");

    cdl_schema()
        .arg("list")
        .arg(fixtures())
        .args(["--category", "pf_active"])
        .assert()
        .success()
        .stdout("coil_current.cdl\n");

    let out = TempDir::new().unwrap();
    cdl_schema()
        .arg("convert")
        .arg(fixtures())
        .arg(out.path())
        .assert()
        .success();
    cdl_schema()
        .arg("list")
        .arg(out.path())
        .arg("--schemas")
        .assert()
        .success()
        .stdout(predicate::str::contains("pf_active/coil-current.schema.json"));
}

#[test]
fn log_flag_writes_debug_output() {
    let dir = TempDir::new().unwrap();
    let log = dir.path().join("run.log");
    let out = dir.path().join("out");

    cdl_schema()
        .arg("--log")
        .arg(&log)
        .arg("convert")
        .arg(fixtures().join("base/polygon_geometry.cdl"))
        .arg(&out)
        .assert()
        .success();

    let text = fs::read_to_string(&log).unwrap();
    assert!(text.contains("Starting cdl-schema"));
    assert!(text.contains("Generated schema"));
}
