//! End-to-end tests for the `fragments` command.
//!
//! These tests invoke the actual CLI binary and validate the listing of
//! fragment declarations from a user's perspective.

mod common;

use common::prelude::*;

/// Test that fragments --help shows help information
#[test]
fn test_fragments_help() {
    let mut cmd = cargo_bin_cmd!("maven-compose");

    cmd.arg("fragments")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "List the fragment declarations of a descriptor",
        ));
}

/// Test that declarations are listed in merge order without resolving them
#[test]
fn test_fragments_lists_declarations_offline() {
    let workspace = Workspace::new();
    let app = workspace.descriptor("app", descriptors::APP);

    let mut cmd = cargo_bin_cmd!("maven-compose");

    let output = cmd
        .current_dir(workspace.path())
        .arg("--color=never")
        .arg("fragments")
        .arg(&app)
        .arg("--repository")
        .arg(workspace.repository_root())
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(
        lines,
        vec![
            "maven-compose.a = com.x:frag-a:1.0",
            "maven-compose.b = com.x:frag-b:2.0"
        ]
    );
}

/// Test that local override locations are shown
#[test]
fn test_fragments_shows_local_override() {
    let workspace = Workspace::new();
    let app = workspace.descriptor(
        "app",
        "artifactId: app\nproperties: { maven.compose.shared: 'com.x:frag-a:1.0@../shared' }\n",
    );

    let mut cmd = cargo_bin_cmd!("maven-compose");

    cmd.current_dir(workspace.path())
        .arg("--color=never")
        .arg("fragments")
        .arg(&app)
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "maven.compose.shared = com.x:frag-a:1.0 @ ",
        ))
        .stdout(predicate::str::contains("shared"));
}

/// Test the message for a descriptor without declarations
#[test]
fn test_fragments_none_declared() {
    let workspace = Workspace::new();
    let app = workspace.descriptor("app", "artifactId: app\nproperties: { java.version: '17' }\n");

    let mut cmd = cargo_bin_cmd!("maven-compose");

    cmd.current_dir(workspace.path())
        .arg("fragments")
        .arg(&app)
        .assert()
        .success()
        .stdout(predicate::str::contains("No fragments declared in"));
}

/// Test that a custom property prefix from the configuration is honoured
#[test]
fn test_fragments_custom_prefix() {
    let workspace = Workspace::new();
    let app = workspace.descriptor(
        "app",
        "artifactId: app\nproperties:\n  mixin.logging: 'com.x:logging:1.0'\n  maven-compose.a: 'com.x:frag-a:1.0'\n",
    );
    let config = workspace.temp.child("compose.yaml");
    config.write_str("property-prefixes: ['mixin.']\n").unwrap();

    let mut cmd = cargo_bin_cmd!("maven-compose");

    cmd.current_dir(workspace.path())
        .arg("--color=never")
        .arg("fragments")
        .arg(&app)
        .arg("-c")
        .arg(config.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("mixin.logging = com.x:logging:1.0"))
        .stdout(predicate::str::contains("maven-compose.a").not());
}

/// Test that a malformed declaration is reported
#[test]
fn test_fragments_invalid_declaration() {
    let workspace = Workspace::new();
    let app = workspace.descriptor("app", "artifactId: app\nproperties: { maven-compose.a: 'com.x' }\n");

    let mut cmd = cargo_bin_cmd!("maven-compose");

    cmd.current_dir(workspace.path())
        .arg("fragments")
        .arg(&app)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Invalid fragment coordinate 'com.x'"));
}
