use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn touch(root: &Path, rel: &str, contents: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

fn setup_test_directory() -> tempfile::TempDir {
    let dir = tempdir().unwrap();

    touch(dir.path(), "a/__pycache__/x.pyc", "compiled");
    touch(dir.path(), "dist/output.bin", "binary");
    touch(dir.path(), "notes.txt", "This is a test");

    dir
}

fn cachesweep() -> Command {
    let mut cmd = Command::cargo_bin("cachesweep").unwrap();
    cmd.env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_clean_scenario() {
    let dir = setup_test_directory();

    cachesweep()
        .arg("clean")
        .current_dir(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Cleaning caches and build artifacts..."))
        .stdout(predicate::str::contains("Clean complete."))
        .stdout(predicate::str::contains("Removed 2 entries"));

    assert!(!dir.path().join("a/__pycache__").exists());
    assert!(!dir.path().join("dist").exists());
    assert!(dir.path().join("notes.txt").exists());
}

#[test]
fn test_clean_explicit_root() {
    let dir = setup_test_directory();

    cachesweep()
        .arg("clean")
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Clean complete."));

    assert!(!dir.path().join("dist").exists());
    assert!(dir.path().join("notes.txt").exists());
}

#[test]
fn test_clean_does_not_log_individual_deletions() {
    let dir = setup_test_directory();

    cachesweep()
        .arg("clean")
        .current_dir(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("__pycache__").not())
        .stdout(predicate::str::contains("output.bin").not())
        .stderr(predicate::str::is_empty());
}

#[test]
fn test_verbose_logs_deletions_to_stderr() {
    let dir = setup_test_directory();

    cachesweep()
        .arg("clean")
        .arg("--verbose")
        .current_dir(dir.path())
        .assert()
        .success()
        .stderr(predicate::str::contains("removed"));
}

#[test]
fn test_clean_twice_is_idempotent() {
    let dir = setup_test_directory();

    cachesweep()
        .arg("clean")
        .current_dir(dir.path())
        .assert()
        .success();

    cachesweep()
        .arg("clean")
        .current_dir(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Clean complete."))
        .stdout(predicate::str::contains("Removed 0 entries"));

    assert!(dir.path().join("notes.txt").exists());
}

#[test]
fn test_clean_empty_tree() {
    let dir = tempdir().unwrap();

    cachesweep()
        .arg("clean")
        .current_dir(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Clean complete."));
}

#[test]
fn test_clean_missing_root_still_completes() {
    let dir = tempdir().unwrap();

    cachesweep()
        .arg("clean")
        .arg(dir.path().join("nowhere"))
        .assert()
        .success()
        .stdout(predicate::str::contains("Clean complete."));
}

#[cfg(unix)]
#[test]
fn test_protected_match_does_not_stop_other_patterns() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempdir().unwrap();
    touch(dir.path(), "locked/__pycache__/x.pyc", "compiled");
    touch(dir.path(), "build/out.o", "object");
    touch(dir.path(), "pkg.egg-info/PKG-INFO", "meta");

    let locked = dir.path().join("locked");
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o555)).unwrap();

    let assert = cachesweep()
        .arg("clean")
        .current_dir(dir.path())
        .assert();

    // Restore so the tempdir can be cleaned up
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

    assert
        .success()
        .stdout(predicate::str::contains("Clean complete."));
    assert!(!dir.path().join("build").exists());
    assert!(!dir.path().join("pkg.egg-info").exists());
}

#[test]
fn test_help_single_marker() {
    let dir = tempdir().unwrap();
    fs::write(
        dir.path().join("Makefile"),
        "clean: ## Remove caches\n\t@rm -rf dist\n",
    )
    .unwrap();

    cachesweep()
        .arg("help")
        .current_dir(dir.path())
        .assert()
        .success()
        .stdout("Usage: make [target]\n\nTargets:\nclean:  Remove caches\n");
}

#[test]
fn test_help_named_files() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.mk"), "lint: ## Run linters \\\n").unwrap();
    fs::write(dir.path().join("b.mk"), "test: ## Run tests\n").unwrap();

    cachesweep()
        .arg("help")
        .arg("-f")
        .arg("a.mk")
        .arg("-f")
        .arg("b.mk")
        .current_dir(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("lint:  Run linters \n"))
        .stdout(predicate::str::contains("test:  Run tests\n"));
}

#[test]
fn test_help_missing_file_prints_header_only() {
    let dir = tempdir().unwrap();

    cachesweep()
        .arg("help")
        .arg("-f")
        .arg("missing.mk")
        .current_dir(dir.path())
        .assert()
        .success()
        .stdout("Usage: make [target]\n\nTargets:\n");
}

#[test]
fn test_help_without_makefile_documents_itself() {
    let dir = tempdir().unwrap();

    cachesweep()
        .arg("help")
        .current_dir(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::starts_with("Usage: make [target]"))
        .stdout(predicate::str::contains("clean:"));
}
