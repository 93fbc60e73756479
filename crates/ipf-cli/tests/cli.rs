//! CLI command integration tests.
//! IPF_CONFIG is cleared so a developer's config never leaks in.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn ipf_cmd() -> Command {
    #[allow(deprecated)]
    let mut cmd = Command::cargo_bin("ipf").unwrap();
    cmd.env_remove("IPF_CONFIG");
    cmd
}

#[test]
fn reduce_into_cubic_sector() {
    ipf_cmd()
        .args(["reduce", "--symmetry", "m-3m", "--", "-1,1,0"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1.000000 0.000000 1.000000"));
}

#[test]
fn reduce_accepts_schoenflies_names() {
    ipf_cmd()
        .args(["reduce", "--symmetry", "d6h", "--", "-1,1,0"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1.366025 0.366025 0.000000"));
}

#[test]
fn reduce_unique_drops_equivalents() {
    // all six cube face normals reduce to the same direction
    let output = ipf_cmd()
        .args(["reduce", "--symmetry", "m-3m", "--unique", "--"])
        .args(["1,0,0", "-1,0,0", "0,1,0", "0,-1,0", "0,0,1", "0,0,-1"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.lines().count(), 1, "got: {stdout}");
}

#[test]
fn reduce_unknown_group_fails() {
    ipf_cmd()
        .args(["reduce", "--symmetry", "not-a-group", "1,0,0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown point group"));
}

#[test]
fn reduce_without_vectors_fails() {
    ipf_cmd()
        .args(["reduce", "--symmetry", "m-3m"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no vectors given"));
}

#[test]
fn reduce_from_input_file_as_json() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("vectors.json");
    std::fs::write(&input, "[[-1, 1, 0], [0, 0, 1]]").unwrap();

    let output = ipf_cmd()
        .args(["--json", "reduce", "--symmetry", "m-3m", "--input"])
        .arg(&input)
        .output()
        .unwrap();
    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["shape"], serde_json::json!([2]));
    assert_eq!(json["vectors"].as_array().unwrap().len(), 2);
}

#[test]
fn nearest_prefers_longer_collinear_candidate() {
    ipf_cmd()
        .args(["nearest", "--target", "1,0,0", "0.5,0,0", "0.6,0,0"])
        .assert()
        .success()
        .stdout(predicate::str::contains("0.600000 0.000000 0.000000"));
}

#[test]
fn nearest_with_nothing_eligible() {
    ipf_cmd()
        .args(["nearest", "--target", "0,0,1", "0,0,1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("no eligible candidate"));
}

#[test]
fn angle_in_degrees() {
    ipf_cmd()
        .args(["angle", "--degrees", "1,0,0", "0,1,0", "1,1,0"])
        .assert()
        .success()
        .stdout(predicate::str::contains("90.000000"))
        .stdout(predicate::str::contains("45.000000"));
}

#[test]
fn polar_of_axis_vectors() {
    ipf_cmd()
        .args(["polar", "--degrees", "0,0,1", "0,2,0"])
        .assert()
        .success()
        .stdout(predicate::str::contains("0.000000 0.000000 1.000000"))
        .stdout(predicate::str::contains("90.000000 90.000000 2.000000"));
}

#[test]
fn polar_hemisphere_filter() {
    let output = ipf_cmd()
        .args(["polar", "--hemisphere", "lower", "--", "0,0,1", "0,0,-1", "1,0,-1"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.lines().count(), 2, "got: {stdout}");
}

#[test]
fn polar_reproject_mirrors_other_hemisphere() {
    let output = ipf_cmd()
        .args(["polar", "--degrees", "--hemisphere", "upper", "--reproject", "--"])
        .args(["0,0.6,0.8", "0,0.6,-0.8"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines, vec!["90.000000 36.869898 1.000000"; 2], "got: {stdout}");
}

#[test]
fn polar_reproject_ignored_for_both() {
    ipf_cmd()
        .args(["polar", "--degrees", "--hemisphere", "both", "--reproject", "--"])
        .args(["0,0.6,-0.8"])
        .assert()
        .success()
        .stdout(predicate::str::contains("90.000000 143.130102 1.000000"));
}

#[test]
fn project_stereographic() {
    ipf_cmd()
        .args(["project", "1,0,0", "0,0,1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1.000000 0.000000"))
        .stdout(predicate::str::contains("0.000000 0.000000"));
}

#[test]
fn project_ipf_reduces_first() {
    ipf_cmd()
        .args(["project", "--projection", "ipf", "--symmetry", "m-3m", "--", "-1,1,0"])
        .assert()
        .success()
        .stdout(predicate::str::contains("0.414214 0.000000"));
}

#[test]
fn project_ipf_needs_symmetry() {
    ipf_cmd()
        .args(["project", "--projection", "ipf", "1,0,0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("needs --symmetry"));
}

#[test]
fn config_file_sets_degrees() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("ipf.toml");
    std::fs::write(&config, "degrees = true\n").unwrap();

    ipf_cmd()
        .arg("--config")
        .arg(&config)
        .args(["polar", "1,0,0"])
        .assert()
        .success()
        .stdout(predicate::str::contains("0.000000 90.000000 1.000000"));
}

#[test]
fn config_from_environment() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("ipf.toml");
    std::fs::write(&config, "[circle]\nsteps = 3\n").unwrap();

    let output = ipf_cmd()
        .env("IPF_CONFIG", &config)
        .args(["circle", "0,0,1"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.lines().count(), 3, "got: {stdout}");
}

#[test]
fn missing_config_fails() {
    let dir = TempDir::new().unwrap();
    ipf_cmd()
        .arg("--config")
        .arg(dir.path().join("absent.toml"))
        .arg("groups")
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to read config"));
}

#[test]
fn circle_json_shape() {
    let output = ipf_cmd()
        .args(["--json", "circle", "--steps", "4", "--opening-angle", "30"])
        .args(["0,0,1", "1,0,0"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["shape"], serde_json::json!([2, 4]));
}

#[test]
fn outer_eager_and_chunked_match() {
    let dir = TempDir::new().unwrap();
    let left = dir.path().join("left.json");
    let right = dir.path().join("right.json");
    std::fs::write(&left, "[[1, 0, 0], [0, 1, 0], [0, 0, 1]]").unwrap();
    std::fs::write(&right, "[[1, 2, 3], [4, 5, 6]]").unwrap();

    let run = |extra: &[&str]| {
        let output = ipf_cmd()
            .args(["outer", "--left"])
            .arg(&left)
            .arg("--right")
            .arg(&right)
            .args(extra)
            .output()
            .unwrap();
        assert!(output.status.success());
        String::from_utf8_lossy(&output.stdout).into_owned()
    };

    let eager = run(&[]);
    assert!(eager.contains("2.000000 5.000000"), "got: {eager}");
    assert_eq!(run(&["--chunk-size", "1"]), eager);
}

#[test]
fn groups_lists_cubic() {
    ipf_cmd()
        .arg("groups")
        .assert()
        .success()
        .stdout(predicate::str::contains("m-3m"))
        .stdout(predicate::str::contains("Oh"))
        .stdout(predicate::str::contains("48"));
}

#[test]
fn missing_required_args() {
    ipf_cmd().arg("reduce").assert().failure();
    ipf_cmd().arg("nearest").assert().failure();
    ipf_cmd().args(["outer", "--left", "a.json"]).assert().failure();
}
