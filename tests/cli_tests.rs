#![cfg(unix)]
//! End-to-end runs of `build-matrix` against the fake compiler.

mod common;

use common::Workspace;
use predicates::prelude::*;

/// One passing specification: built, run, reported as OK, cleaned up, exit 0.
#[test]
fn test_successful_run() {
    let ws = Workspace::new();
    let config = ws.write_matrix(
        "ok.toml",
        r#"
[[specs]]
compiler = "fakecc"
arch = "x86_64"
flags = "-O0"
"#,
    );

    ws.command()
        .args(["--lang", "en", "--config"])
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("fakecc/x86_64/-O0 OK"))
        .stdout(predicate::str::contains("demo ran"))
        .stdout(predicate::str::contains("All 1 specifications passed."));

    assert!(!ws.build_dir().exists());
}

/// A compile failure prints the failure message, never runs the artifact,
/// prints no status line, and still cleans up.
#[test]
fn test_build_failure() {
    let ws = Workspace::new();
    let config = ws.write_matrix(
        "build_fail.toml",
        r#"
[[specs]]
compiler = "fakecc"
arch = "x86_64"
flags = "-DFAIL_BUILD"
"#,
    );

    ws.command()
        .args(["--lang", "en", "--config"])
        .arg(&config)
        .assert()
        .code(1)
        .stdout(predicate::str::contains(
            "Fail to compile test (fakecc_x86_64-DFAIL_BUILD)",
        ))
        .stdout(predicate::str::contains("deliberate build failure"))
        .stdout(predicate::str::contains(" OK").not())
        .stdout(predicate::str::contains(" FAIL").not());

    assert!(!ws.build_dir().exists());
}

/// An artifact exiting nonzero is reported as FAIL while its neighbours pass.
#[test]
fn test_execution_failure() {
    let ws = Workspace::new();
    let config = ws.write_matrix(
        "run_fail.toml",
        r#"
[[specs]]
compiler = "fakecc"
arch = "x86_64"
flags = "-O0"

[[specs]]
compiler = "fakecc"
arch = "x86_64"
flags = "-O2 -DFAIL_RUN"
"#,
    );

    ws.command()
        .args(["--lang", "en", "--config"])
        .arg(&config)
        .assert()
        .code(1)
        .stdout(predicate::str::contains("fakecc/x86_64/-O0 OK"))
        .stdout(predicate::str::contains("fakecc/x86_64/-O2,-DFAIL_RUN FAIL"))
        .stdout(predicate::str::contains("1 of 2 specifications failed."));

    assert!(!ws.build_dir().exists());
}

/// Later specifications are still built and run after an earlier build failure.
#[test]
fn test_mixed_matrix_attempts_everything() {
    let ws = Workspace::new();
    let config = ws.write_matrix(
        "mixed.toml",
        r#"
[[specs]]
compiler = "fakecc"
arch = "i386"
flags = "-DFAIL_BUILD"

[[specs]]
compiler = "fakecc"
arch = "x86_64"
flags = ""
"#,
    );

    ws.command()
        .args(["--lang", "en", "--config"])
        .arg(&config)
        .assert()
        .code(1)
        .stdout(predicate::str::contains("fakecc_i386-DFAIL_BUILD"))
        .stdout(predicate::str::contains("fakecc/i386/").not())
        .stdout(predicate::str::contains("fakecc/x86_64/ OK"));
}

/// `BuildMatrix.toml` in the working directory is picked up without `--config`.
#[test]
fn test_implicit_config_file() {
    let ws = Workspace::new();
    ws.write_matrix(
        "BuildMatrix.toml",
        r#"
build_dir = "out"

[[specs]]
compiler = "fakecc"
arch = "arm64"
flags = "-O1"
"#,
    );

    ws.command()
        .args(["--lang", "en", "run"])
        .assert()
        .success()
        .stdout(predicate::str::contains("BuildMatrix.toml"))
        .stdout(predicate::str::contains("fakecc/arm64/-O1 OK"));

    assert!(!ws.path().join("out").exists());
}

/// A stale build directory from an earlier run does not get in the way.
#[test]
fn test_existing_build_dir_is_reused_and_removed() {
    let ws = Workspace::new();
    std::fs::create_dir_all(ws.build_dir().join("leftover")).unwrap();
    let config = ws.write_matrix(
        "ok.toml",
        r#"
[[specs]]
compiler = "fakecc"
arch = "x86_64"
"#,
    );

    ws.command()
        .args(["--lang", "en", "--config"])
        .arg(&config)
        .assert()
        .success();

    assert!(!ws.build_dir().exists());
}

/// Artifacts that outlive `timeout_secs` are killed and reported as FAIL.
#[test]
fn test_timeout_marks_spec_failed() {
    let ws = Workspace::new();
    let config = ws.write_matrix(
        "hang.toml",
        r#"
timeout_secs = 1

[[specs]]
compiler = "fakecc"
arch = "x86_64"
flags = "-DHANG"
"#,
    );

    ws.command()
        .args(["--lang", "en", "--config"])
        .arg(&config)
        .timeout(std::time::Duration::from_secs(20))
        .assert()
        .code(1)
        .stdout(predicate::str::contains("did not finish within 1s"))
        .stdout(predicate::str::contains("fakecc/x86_64/-DHANG FAIL"));
}

/// Flags containing path separators still produce an artifact directly
/// inside the build directory.
#[test]
fn test_flags_with_path_separators() {
    let ws = Workspace::new();
    let config = ws.write_matrix(
        "include.toml",
        r#"
[[specs]]
compiler = "fakecc"
arch = "x86_64"
flags = "-I/usr/include"
"#,
    );

    ws.command()
        .args(["--lang", "en", "--config"])
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("fakecc/x86_64/-I/usr/include OK"))
        .stdout(predicate::str::contains("Fail to compile test").not());

    assert!(!ws.build_dir().exists());
}
