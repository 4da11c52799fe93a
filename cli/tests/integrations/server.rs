use assert_cmd::Command;

#[test]
fn test_server_command_available() {
    let mut cmd = Command::cargo_bin("costing").unwrap();
    cmd.arg("--help");

    cmd.assert()
        .success()
        .stdout(predicates::str::contains("server"));
}

#[test]
fn test_server_rejects_missing_vars_file() {
    let mut cmd = Command::cargo_bin("costing").unwrap();
    cmd.arg("server").arg("--vars").arg("/nonexistent/vars.json");

    cmd.assert()
        .failure()
        .stderr(predicates::str::contains("failed to read variables file"));
}
