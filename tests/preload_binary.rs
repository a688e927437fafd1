//! Runs the built binary against scratch install roots.

use std::{
    fs,
    path::Path,
    process::{Command, Output},
};

use native_preload::{loader::LIBRARY_EXTENSION, Architecture};

fn run_with_root(root: &Path) -> Output {
    Command::new(env!("CARGO_BIN_EXE_native-preload"))
        .env("PRELOAD_ROOT", root)
        .env("PRELOAD_CONFIG", root.join("no-such-settings.json"))
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG")
        .output()
        .expect("spawn native-preload")
}

fn arch_dir(root: &Path) -> std::path::PathBuf {
    let dir = root.join(Architecture::current().dir_name());
    fs::create_dir(&dir).unwrap();
    dir
}

#[test]
fn empty_library_directory_exits_cleanly() {
    let tmp = tempfile::tempdir().unwrap();
    arch_dir(tmp.path());

    let out = run_with_root(tmp.path());
    assert_eq!(out.status.code(), Some(0), "stderr: {}", String::from_utf8_lossy(&out.stderr));
}

#[test]
fn broken_library_exits_with_status_one() {
    let tmp = tempfile::tempdir().unwrap();
    let dir = arch_dir(tmp.path());
    let name = format!("libbroken.{LIBRARY_EXTENSION}");
    fs::write(dir.join(&name), b"not a library").unwrap();

    let out = run_with_root(tmp.path());
    assert_eq!(out.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains(&name), "stderr: {stderr}");
    assert_eq!(stderr.matches("failed to load library").count(), 1, "stderr: {stderr}");
}

#[test]
fn missing_library_directory_exits_with_status_one() {
    let tmp = tempfile::tempdir().unwrap();

    let out = run_with_root(tmp.path());
    assert_eq!(out.status.code(), Some(1));
}

#[test]
fn relative_root_exits_with_status_one() {
    let out = Command::new(env!("CARGO_BIN_EXE_native-preload"))
        .env("PRELOAD_ROOT", "relative/root")
        .env("NO_COLOR", "1")
        .env_remove("PRELOAD_CONFIG")
        .env_remove("RUST_LOG")
        .output()
        .expect("spawn native-preload");
    assert_eq!(out.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&out.stderr).contains("relative/root"));
}
