//! End-to-end tests for the tarball-publisher binary
//!
//! A fake `npm` script is placed first on PATH. It records its arguments,
//! exits 3 when `$HOME/.npmrc` is missing and fails any tarball whose
//! name contains `bad`.

#![cfg(unix)]

use assert_cmd::Command;
use predicates::prelude::*;
use std::env;
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const FAKE_NPM: &str = r#"#!/bin/sh
echo "$@" >> "$FAKE_NPM_LOG"
[ -f "$HOME/.npmrc" ] || exit 3
case "$(basename "$2")" in
  *bad*) exit 1 ;;
esac
exit 0
"#;

const INPUT_VARS: &[&str] = &[
    "INPUT_PATH",
    "INPUT_REGISTRY",
    "INPUT_TOKEN",
    "INPUT_ACCESS",
    "INPUT_DRYRUN",
    "INPUT_USETAGS",
    "RUNNER_DEBUG",
    "RUST_LOG",
];

struct Sandbox {
    _temp_dir: TempDir,
    bin: PathBuf,
    home: PathBuf,
    work: PathBuf,
    log: PathBuf,
}

impl Sandbox {
    fn new() -> Self {
        let temp_dir = TempDir::new().unwrap();
        let base = temp_dir.path().canonicalize().unwrap();
        let bin = base.join("bin");
        let home = base.join("home");
        let work = base.join("work");
        for dir in [&bin, &home, &work] {
            fs::create_dir_all(dir).unwrap();
        }

        let npm = bin.join("npm");
        fs::write(&npm, FAKE_NPM).unwrap();
        fs::set_permissions(&npm, fs::Permissions::from_mode(0o755)).unwrap();

        let log = base.join("npm.log");
        Self {
            _temp_dir: temp_dir,
            bin,
            home,
            work,
            log,
        }
    }

    fn tarball(&self, relative: &str) -> PathBuf {
        let path = self.work.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, b"tarball").unwrap();
        path
    }

    fn npmrc(&self) -> PathBuf {
        self.home.join(".npmrc")
    }

    fn calls(&self) -> Vec<String> {
        fs::read_to_string(&self.log)
            .unwrap_or_default()
            .lines()
            .map(str::to_string)
            .collect()
    }

    fn cmd(&self) -> Command {
        let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("tarball-publisher"));
        for var in INPUT_VARS {
            cmd.env_remove(var);
        }
        cmd.current_dir(&self.work)
            .env("HOME", &self.home)
            .env("PATH", search_path(&self.bin))
            .env("FAKE_NPM_LOG", &self.log);
        cmd
    }

    fn publish(&self) -> Command {
        let mut cmd = self.cmd();
        cmd.args(["--registry", "registry.example.com", "--token", "s3cr3t"]);
        cmd
    }
}

fn search_path(first: &Path) -> String {
    match env::var("PATH") {
        Ok(rest) if !rest.is_empty() => format!("{}:{}", first.display(), rest),
        _ => format!("{}:/usr/bin:/bin", first.display()),
    }
}

#[test]
fn help_lists_inputs() {
    let sandbox = Sandbox::new();
    sandbox
        .cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--registry"))
        .stdout(predicate::str::contains("--token"))
        .stdout(predicate::str::contains("--dry-run"))
        .stdout(predicate::str::contains("--use-tags"));
}

#[test]
fn missing_registry_fails_and_removes_npmrc() {
    let sandbox = Sandbox::new();
    fs::write(sandbox.npmrc(), "stale").unwrap();

    sandbox
        .cmd()
        .args(["--token", "s3cr3t"])
        .assert()
        .failure()
        .stdout(predicate::str::contains(
            "::error::Input required and not supplied: registry",
        ))
        .stderr(predicate::str::contains("Invalid configuration"));

    assert!(!sandbox.npmrc().exists());
    assert!(sandbox.calls().is_empty());
}

#[test]
fn partial_failure_still_succeeds() {
    let sandbox = Sandbox::new();
    let good = sandbox.tarball("good-1.0.0.tgz");
    let bad = sandbox.tarball("bad-1.0.0.tgz");

    sandbox
        .publish()
        .assert()
        .success()
        .stdout(predicate::str::contains("Published 1 of 2 tarballs"));

    let calls = sandbox.calls();
    assert_eq!(calls.len(), 2);
    assert!(calls.contains(&format!("publish {}", bad.display())));
    assert!(calls.contains(&format!("publish {}", good.display())));
    assert!(!sandbox.npmrc().exists());
}

#[test]
fn every_tarball_failing_fails_the_run() {
    let sandbox = Sandbox::new();
    sandbox.tarball("bad-a-1.0.0.tgz");
    sandbox.tarball("nested/bad-b-1.0.0.tgz");

    sandbox
        .publish()
        .assert()
        .failure()
        .stdout(predicate::str::contains(
            "::error::All tarballs failed to publish: [",
        ))
        .stdout(predicate::str::contains("bad-a-1.0.0.tgz"))
        .stdout(predicate::str::contains("bad-b-1.0.0.tgz"))
        .stderr(predicate::str::contains("Publishing failed"));

    assert_eq!(sandbox.calls().len(), 2);
    assert!(!sandbox.npmrc().exists());
}

#[test]
fn no_tarballs_is_success() {
    let sandbox = Sandbox::new();

    sandbox
        .publish()
        .assert()
        .success()
        .stdout(predicate::str::contains("Published 0 of 0 tarballs"));

    assert!(sandbox.calls().is_empty());
    assert!(!sandbox.npmrc().exists());
}

#[test]
fn inputs_from_environment() {
    let sandbox = Sandbox::new();
    let tarball = sandbox.tarball("dist/pkg-2.0.0.tgz");
    sandbox.tarball("elsewhere/other-1.0.0.tgz");

    sandbox
        .cmd()
        .env("INPUT_PATH", " dist ")
        .env("INPUT_REGISTRY", "registry.example.com")
        .env("INPUT_TOKEN", "s3cr3t")
        .env("INPUT_ACCESS", "public")
        .env("INPUT_DRYRUN", "true")
        .assert()
        .success()
        .stdout(predicate::str::contains("(dry-run)"));

    assert_eq!(
        sandbox.calls(),
        vec![format!(
            "publish {} --access public --dry-run",
            tarball.display()
        )]
    );
}

#[test]
fn flags_override_environment() {
    let sandbox = Sandbox::new();
    let tarball = sandbox.tarball("pkg-1.0.0.tgz");

    sandbox
        .publish()
        .args(["--dry-run", "false"])
        .env("INPUT_DRYRUN", "true")
        .env("INPUT_ACCESS", "restricted")
        .assert()
        .success();

    assert_eq!(
        sandbox.calls(),
        vec![format!("publish {} --access restricted", tarball.display())]
    );
}

#[test]
fn booleans_require_exact_true() {
    let sandbox = Sandbox::new();
    let tarball = sandbox.tarball("pkg-1.2.3-beta.1.tgz");

    sandbox
        .publish()
        .args(["--dry-run", "TRUE", "--use-tags", "yes"])
        .assert()
        .success();

    assert_eq!(sandbox.calls(), vec![format!("publish {}", tarball.display())]);
}

#[test]
fn bare_dry_run_flag_enables_dry_run() {
    let sandbox = Sandbox::new();
    sandbox.tarball("pkg-1.0.0.tgz");

    sandbox.publish().arg("--dry-run").assert().success();

    let calls = sandbox.calls();
    assert_eq!(calls.len(), 1);
    assert!(calls[0].ends_with("--dry-run"));
}

#[test]
fn use_tags_derives_dist_tag() {
    let sandbox = Sandbox::new();
    let beta = sandbox.tarball("pkg-1.2.3-beta.1.tgz");
    let stable = sandbox.tarball("pkg-1.2.3.tgz");

    sandbox
        .publish()
        .args(["--use-tags", "true"])
        .assert()
        .success();

    let calls = sandbox.calls();
    assert!(calls.contains(&format!("publish {} --tag beta", beta.display())));
    assert!(calls.contains(&format!("publish {}", stable.display())));
}

#[test]
fn token_is_not_echoed() {
    let sandbox = Sandbox::new();
    sandbox.tarball("pkg-1.0.0.tgz");

    sandbox
        .publish()
        .arg("--verbose")
        .assert()
        .success()
        .stdout(predicate::str::contains("s3cr3t").not())
        .stderr(predicate::str::contains("s3cr3t").not());
}
