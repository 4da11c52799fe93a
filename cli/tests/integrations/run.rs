use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

fn write_vars(temp_dir: &TempDir) -> PathBuf {
    let path = temp_dir.path().join("vars.json");
    fs::write(
        &path,
        r#"[
  {"id": "v1", "name": "Wall Length", "value": 10, "type": "number"},
  {"id": "v2", "name": "Wall Width", "value": 5},
  {"id": "v3", "name": "Width", "value": 2},
  {"id": "v4", "name": "Material Base Cost", "value": 2},
  {"id": "v5", "name": "Trim Count"}
]"#,
    )
    .unwrap();
    path
}

#[test]
fn test_cli_eval_bare_names() {
    let temp_dir = TempDir::new().unwrap();
    let vars = write_vars(&temp_dir);

    let mut cmd = Command::cargo_bin("costing").unwrap();
    cmd.arg("eval")
        .arg("Wall Length * Wall Width * Material Base Cost")
        .arg("--vars")
        .arg(&vars);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("= 100"));
}

#[test]
fn test_cli_eval_raw() {
    let temp_dir = TempDir::new().unwrap();
    let vars = write_vars(&temp_dir);

    let mut cmd = Command::cargo_bin("costing").unwrap();
    cmd.arg("eval")
        .arg("Wall Width")
        .arg("--vars")
        .arg(&vars)
        .arg("--raw");

    cmd.assert().success().stdout("5\n");
}

#[test]
fn test_cli_eval_without_vars() {
    let mut cmd = Command::cargo_bin("costing").unwrap();
    cmd.arg("eval").arg("(2 + 3) * 4").arg("--raw");

    cmd.assert().success().stdout("20\n");
}

#[test]
fn test_cli_eval_unknown_reference_warns() {
    let temp_dir = TempDir::new().unwrap();
    let vars = write_vars(&temp_dir);

    let mut cmd = Command::cargo_bin("costing").unwrap();
    cmd.arg("eval")
        .arg("UnknownVar * 5")
        .arg("--vars")
        .arg(&vars);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("= 0"))
        .stderr(predicate::str::contains("UnknownVar"));
}

#[test]
fn test_cli_eval_strict_fails_on_unknown_reference() {
    let temp_dir = TempDir::new().unwrap();
    let vars = write_vars(&temp_dir);

    let mut cmd = Command::cargo_bin("costing").unwrap();
    cmd.arg("eval")
        .arg("UnknownVar * 5")
        .arg("--vars")
        .arg(&vars)
        .arg("--strict");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Unknown variable"));
}

#[test]
fn test_cli_eval_strict_parse_error() {
    let mut cmd = Command::cargo_bin("costing").unwrap();
    cmd.arg("eval").arg("(2 + 3").arg("--strict");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Parse error"))
        .stderr(predicate::str::contains("closing parenthesis"));
}

#[test]
fn test_cli_eval_explain() {
    let temp_dir = TempDir::new().unwrap();
    let vars = write_vars(&temp_dir);

    let mut cmd = Command::cargo_bin("costing").unwrap();
    cmd.arg("eval")
        .arg("Wall Length * Width + Trim Count")
        .arg("--vars")
        .arg(&vars)
        .arg("--explain");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("10 * 2 + 0"))
        .stdout(predicate::str::contains("10 * 2 = 20"))
        .stdout(predicate::str::contains("Trim Count"));
}

#[test]
fn test_cli_check_ok() {
    let temp_dir = TempDir::new().unwrap();
    let vars = write_vars(&temp_dir);

    let mut cmd = Command::cargo_bin("costing").unwrap();
    cmd.arg("check")
        .arg("{v1} * Width")
        .arg("--vars")
        .arg(&vars);

    cmd.assert().success().stdout(predicate::str::contains("ok"));
}

#[test]
fn test_cli_check_reports_problems() {
    let temp_dir = TempDir::new().unwrap();
    let vars = write_vars(&temp_dir);

    let mut cmd = Command::cargo_bin("costing").unwrap();
    cmd.arg("check")
        .arg("Door Count *")
        .arg("--vars")
        .arg(&vars);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Door Count"))
        .stderr(predicate::str::contains("Parse error"));
}

#[test]
fn test_cli_display_and_store() {
    let temp_dir = TempDir::new().unwrap();
    let vars = write_vars(&temp_dir);

    let mut cmd = Command::cargo_bin("costing").unwrap();
    cmd.arg("display")
        .arg("{v1} * {v2} + {gone}")
        .arg("--vars")
        .arg(&vars);
    cmd.assert()
        .success()
        .stdout("{Wall Length} * {Wall Width} + {gone}\n");

    let mut cmd = Command::cargo_bin("costing").unwrap();
    cmd.arg("store")
        .arg("{Wall Length} * {Wall Width}")
        .arg("--vars")
        .arg(&vars);
    cmd.assert().success().stdout("{v1} * {v2}\n");
}

#[test]
fn test_cli_store_bracket_bare_names() {
    let temp_dir = TempDir::new().unwrap();
    let vars = write_vars(&temp_dir);

    let mut cmd = Command::cargo_bin("costing").unwrap();
    cmd.arg("store")
        .arg("Wall Width * {Width}")
        .arg("--vars")
        .arg(&vars)
        .arg("--bracket");

    cmd.assert().success().stdout("{v2} * {v3}\n");
}

#[test]
fn test_cli_highlight() {
    let mut cmd = Command::cargo_bin("costing").unwrap();
    cmd.arg("highlight").arg("{Wall Length} * 2");

    cmd.assert().success().stdout(
        "<span class=\"formula-variable\">{Wall Length}</span> * 2\n",
    );

    let mut cmd = Command::cargo_bin("costing").unwrap();
    cmd.arg("highlight")
        .arg("{a} + {b}")
        .arg("--open")
        .arg("[")
        .arg("--close")
        .arg("]");

    cmd.assert().success().stdout("[{a}] + [{b}]\n");
}

#[test]
fn test_cli_vars_table() {
    let temp_dir = TempDir::new().unwrap();
    let vars = write_vars(&temp_dir);

    let mut cmd = Command::cargo_bin("costing").unwrap();
    cmd.arg("vars").arg("--vars").arg(&vars);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Material Base Cost"))
        .stdout(predicate::str::contains("number"));
}

#[test]
fn test_cli_estimate() {
    let temp_dir = TempDir::new().unwrap();
    let vars = write_vars(&temp_dir);
    let elements = temp_dir.path().join("elements.json");
    fs::write(
        &elements,
        r#"[
  {"name": "North wall", "materialCostFormula": "{v1} * {v2} * 20", "laborCostFormula": "Wall Length * 45"},
  {"name": "Door", "materialCostFormula": "Door Cost"}
]"#,
    )
    .unwrap();

    let mut cmd = Command::cargo_bin("costing").unwrap();
    cmd.arg("estimate")
        .arg(&elements)
        .arg("--vars")
        .arg(&vars);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("North wall"))
        .stdout(predicate::str::contains("1,000"))
        .stdout(predicate::str::contains("1,450"))
        .stderr(predicate::str::contains("Door Cost"));

    let mut cmd = Command::cargo_bin("costing").unwrap();
    cmd.arg("estimate")
        .arg(&elements)
        .arg("--vars")
        .arg(&vars)
        .arg("--json");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("\"total\": 1450.0"));
}

#[test]
fn test_cli_invalid_vars_json() {
    let temp_dir = TempDir::new().unwrap();
    let vars = temp_dir.path().join("vars.json");
    fs::write(&vars, "{not json").unwrap();

    let mut cmd = Command::cargo_bin("costing").unwrap();
    cmd.arg("eval").arg("1 + 1").arg("--vars").arg(&vars);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("invalid variables JSON"));
}
