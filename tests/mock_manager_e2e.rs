// A user-defined manager backed by a shell script on PATH.
#![cfg(unix)]

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::PathBuf;
use tempfile::TempDir;

struct TestEnv {
    _tmp: TempDir,
    config_dir: PathBuf,
    home_dir: PathBuf,
    bin_dir: PathBuf,
    state_dir: PathBuf,
}

impl TestEnv {
    fn new() -> Self {
        let tmp = tempfile::tempdir().expect("tempdir");
        let root = tmp.path().to_path_buf();
        let config_dir = root.join("config");
        let home_dir = root.join("home");
        let bin_dir = root.join("bin");
        let state_dir = root.join("mockpm");
        for dir in [&config_dir, &home_dir, &bin_dir, &state_dir] {
            fs::create_dir_all(dir).expect("mkdir");
        }

        fs::write(
            config_dir.join("managers.kdl"),
            r#"
manager "mockpm" {
    binary "mockpm"
    description "Scripted test manager"
    version "mockpm --version"
    list "mockpm list" {
        skip "^#"
    }
    install "mockpm install {package}" {
        idempotent "already installed"
    }
    uninstall "mockpm remove {package}"
    upgrade "mockpm upgrade {package}"
    upgrade-all "mockpm upgrade-all"
    search "mockpm search {query}" {
        parse "parseable"
        delimiter "|"
    }
    name-transform pattern="^([^ ]+) .*$" replacement="$1"
    metadata {
        version pattern="^[^ ]+ ([^ ]+)$" source="raw"
    }
}
"#,
        )
        .expect("write managers.kdl");

        fs::write(
            config_dir.join("homedecl.kdl"),
            r#"
settings {
    default-manager "mockpm"
}
hooks {
    post-apply "mockpm hook post-apply"
}
"#,
        )
        .expect("write homedecl.kdl");

        let script = r##"#!/usr/bin/env bash
set -uo pipefail
state="$MOCKPM_STATE"
echo "$*" >> "$state/calls"
touch "$state/installed"
case "${1:-}" in
  --version) echo "mockpm 1.0" ;;
  list)
    echo "# installed tools"
    cat "$state/installed"
    ;;
  install)
    if [ "$2" = "broken" ]; then
      echo "error: package not found: broken" >&2
      exit 1
    fi
    if grep -q "^$2 " "$state/installed"; then
      echo "$2 is already installed"
      exit 0
    fi
    echo "$2 1.0.0" >> "$state/installed"
    ;;
  remove)
    if [ "$2" = "stuck" ]; then
      echo "error: permission denied" >&2
      exit 1
    fi
    if ! grep -q "^$2 " "$state/installed"; then
      echo "$2 is not installed" >&2
      exit 1
    fi
    grep -v "^$2 " "$state/installed" > "$state/installed.next"
    mv "$state/installed.next" "$state/installed"
    ;;
  search)
    echo "alpha|1.0.0|first letter"
    echo "alphabet|2.0.0|all of them"
    ;;
  *) exit 0 ;;
esac
"##;
        let bin = bin_dir.join("mockpm");
        fs::write(&bin, script).expect("write mockpm");
        let mut perms = fs::metadata(&bin).expect("metadata").permissions();
        perms.set_mode(0o755);
        fs::set_permissions(&bin, perms).expect("chmod");

        Self {
            _tmp: tmp,
            config_dir,
            home_dir,
            bin_dir,
            state_dir,
        }
    }

    fn cmd(&self) -> Command {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_homedecl"));
        let path = format!(
            "{}:{}",
            self.bin_dir.display(),
            std::env::var("PATH").unwrap_or_default()
        );
        cmd.env("HOMEDECL_CONFIG_DIR", &self.config_dir)
            .env("HOMEDECL_HOME", &self.home_dir)
            .env("MOCKPM_STATE", &self.state_dir)
            .env("NO_COLOR", "1")
            .env("PATH", path);
        cmd
    }

    fn declared(&self) -> String {
        fs::read_to_string(self.config_dir.join("homedecl.lock")).unwrap_or_default()
    }

    fn calls(&self) -> Vec<String> {
        fs::read_to_string(self.state_dir.join("calls"))
            .unwrap_or_default()
            .lines()
            .map(str::to_string)
            .collect()
    }
}

#[test]
fn e2e_apply_installs_declared_packages() {
    let env = TestEnv::new();
    env.cmd().args(["add", "alpha", "mockpm:beta"]).assert().success();

    env.cmd()
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("mockpm:alpha"))
        .stdout(predicate::str::contains("2 missing"));

    env.cmd()
        .arg("apply")
        .assert()
        .success()
        .stdout(predicate::str::contains("installed"));

    let calls = env.calls();
    assert!(calls.contains(&"install alpha".to_string()));
    assert!(calls.contains(&"install beta".to_string()));
    assert!(calls.contains(&"hook post-apply".to_string()));

    env.cmd()
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("In sync"));
}

#[test]
fn e2e_failed_install_exits_non_zero_after_full_pass() {
    let env = TestEnv::new();
    env.cmd()
        .args(["add", "mockpm:broken", "mockpm:gamma"])
        .assert()
        .success();

    env.cmd()
        .arg("apply")
        .assert()
        .failure()
        .stdout(predicate::str::contains("failed"))
        .stderr(predicate::str::contains("1 failed"));

    assert!(env.calls().contains(&"install gamma".to_string()));
}

#[test]
fn e2e_dry_run_executes_nothing() {
    let env = TestEnv::new();
    env.cmd().args(["add", "alpha"]).assert().success();

    env.cmd()
        .args(["apply", "--dry-run"])
        .assert()
        .success()
        .stdout(predicate::str::contains("would-install"));

    let calls = env.calls();
    assert!(!calls.iter().any(|c| c.starts_with("install")));
    assert!(!calls.iter().any(|c| c.starts_with("hook")));
}

#[test]
fn e2e_search_with_mock_manager() {
    let env = TestEnv::new();
    env.cmd()
        .args(["search", "alpha", "--manager", "mockpm", "--limit", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("mockpm:alpha"))
        .stdout(predicate::str::contains("alphabet").not());
}

#[test]
fn e2e_upgrade_uses_upgrade_all() {
    let env = TestEnv::new();
    env.cmd().args(["add", "alpha"]).assert().success();

    env.cmd().arg("upgrade").assert().success();
    assert!(env.calls().contains(&"upgrade-all".to_string()));

    env.cmd().args(["upgrade", "alpha"]).assert().success();
    assert!(env.calls().contains(&"upgrade alpha".to_string()));
}

#[test]
fn e2e_remove_uninstall_honors_dry_run() {
    let env = TestEnv::new();
    env.cmd().args(["add", "alpha"]).assert().success();
    env.cmd().arg("apply").assert().success();

    env.cmd()
        .args(["remove", "alpha", "--uninstall", "--dry-run"])
        .assert()
        .success()
        .stdout(predicate::str::contains("would uninstall mockpm:alpha"));
    assert!(!env.calls().contains(&"remove alpha".to_string()));
    assert!(env.declared().contains("alpha"));

    env.cmd()
        .args(["remove", "alpha", "--uninstall"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Uninstalled mockpm:alpha"));
    assert!(env.calls().contains(&"remove alpha".to_string()));
    assert!(!env.declared().contains("alpha"));
    let installed = fs::read_to_string(env.state_dir.join("installed")).unwrap();
    assert!(!installed.contains("alpha"));
}

#[test]
fn e2e_remove_uninstall_of_absent_package_succeeds() {
    let env = TestEnv::new();
    env.cmd().args(["add", "beta"]).assert().success();

    env.cmd()
        .args(["remove", "beta", "--uninstall"])
        .assert()
        .success()
        .stdout(predicate::str::contains("was not installed"));
    assert!(!env.declared().contains("beta"));
}

#[test]
fn e2e_failed_uninstall_keeps_declaration() {
    let env = TestEnv::new();
    env.cmd().args(["add", "stuck"]).assert().success();

    env.cmd()
        .args(["remove", "stuck", "--uninstall"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("1 uninstall(s) failed"));
    assert!(env.declared().contains("stuck"));
}
