//! Command line tests for the convert-audio binary

use assert_cmd::Command;
use predicates::prelude::*;
use std::path::Path;
use tempfile::TempDir;

fn convert_audio() -> Command {
    let mut cmd = Command::cargo_bin("convert-audio").unwrap();
    cmd.env_remove("RUST_LOG");
    cmd
}

fn populate(root: &Path) {
    std::fs::create_dir_all(root.join("nested")).unwrap();
    std::fs::write(root.join("a.m4a"), b"m4a data").unwrap();
    std::fs::write(root.join("nested/b.wav"), b"wav data").unwrap();
    std::fs::write(root.join("c.txt"), b"notes").unwrap();
}

#[test]
fn test_help() {
    convert_audio()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--policy"))
        .stdout(predicate::str::contains("--dry-run"));
}

#[test]
fn test_dry_run_lists_without_converting() {
    let temp_dir = TempDir::new().unwrap();
    populate(temp_dir.path());

    convert_audio()
        .arg(temp_dir.path())
        .args(["--dry-run", "--ffmpeg", "/nonexistent/ffmpeg"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2 file(s) would be converted"));

    assert!(temp_dir.path().join("a.m4a").exists());
    assert!(temp_dir.path().join("nested/b.wav").exists());
}

#[test]
fn test_missing_root_fails() {
    let temp_dir = TempDir::new().unwrap();

    convert_audio()
        .arg(temp_dir.path().join("missing"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Root directory does not exist"));
}

#[test]
fn test_invalid_formats_fail() {
    let temp_dir = TempDir::new().unwrap();

    convert_audio()
        .arg(temp_dir.path())
        .args(["-i", "mp3", "-o", "mp3"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot also be an input format"));
}

#[test]
fn test_missing_codec_keeps_files() {
    let temp_dir = TempDir::new().unwrap();
    populate(temp_dir.path());

    convert_audio()
        .arg(temp_dir.path())
        .args(["--ffmpeg", "/nonexistent/ffmpeg"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Codec not found"));

    assert!(temp_dir.path().join("a.m4a").exists());
}

#[test]
fn test_write_default_config() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("convert-audio.toml");

    convert_audio()
        .arg("--write-default-config")
        .arg(&config_path)
        .assert()
        .success();

    let content = std::fs::read_to_string(&config_path).unwrap();
    assert!(content.contains("output_format = \"mp3\""));
    assert!(content.contains("policy = \"skip\""));
}

#[cfg(unix)]
mod with_fake_ffmpeg {
    use super::*;
    use std::os::unix::fs::PermissionsExt;

    /// Writes a stand-in ffmpeg that copies its input to the last argument
    /// and fails on inputs whose name contains "broken".
    fn fake_ffmpeg(dir: &Path) -> std::path::PathBuf {
        let script = r#"#!/bin/sh
if [ "$1" = "-version" ]; then
    echo "ffmpeg version fake"
    exit 0
fi
input=""
prev=""
for arg in "$@"; do
    if [ "$prev" = "-i" ]; then input="$arg"; fi
    prev="$arg"
    last="$arg"
done
case "$input" in
    *broken*) echo "Invalid data found when processing input" >&2; exit 1 ;;
esac
cp "$input" "$last"
"#;
        let path = dir.join("ffmpeg");
        std::fs::write(&path, script).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    #[test]
    fn test_end_to_end_conversion() {
        let bin_dir = TempDir::new().unwrap();
        let ffmpeg = fake_ffmpeg(bin_dir.path());
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        populate(root);

        convert_audio()
            .arg(root)
            .arg("--ffmpeg")
            .arg(&ffmpeg)
            .assert()
            .success()
            .stdout(predicate::str::contains("2 converted, 0 failed"));

        assert_eq!(std::fs::read(root.join("a.mp3")).unwrap(), b"m4a data");
        assert!(root.join("nested/b.mp3").exists());
        assert!(!root.join("a.m4a").exists());
        assert!(!root.join("nested/b.wav").exists());
        assert!(root.join("c.txt").exists());

        // Nothing left to do on a second run
        convert_audio()
            .arg(root)
            .arg("--ffmpeg")
            .arg(&ffmpeg)
            .assert()
            .success()
            .stdout(predicate::str::contains("0 converted, 0 failed"));
    }

    #[test]
    fn test_skip_and_abort_policies() {
        let bin_dir = TempDir::new().unwrap();
        let ffmpeg = fake_ffmpeg(bin_dir.path());

        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        for name in ["1.m4a", "2-broken.m4a", "3.m4a"] {
            std::fs::write(root.join(name), b"data").unwrap();
        }

        convert_audio()
            .arg(root)
            .arg("--ffmpeg")
            .arg(&ffmpeg)
            .args(["--policy", "abort"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Invalid data found"));
        assert!(root.join("1.mp3").exists());
        assert!(root.join("3.m4a").exists());

        convert_audio()
            .arg(root)
            .arg("--ffmpeg")
            .arg(&ffmpeg)
            .args(["--policy", "skip"])
            .assert()
            .success()
            .stdout(predicate::str::contains("1 converted, 1 failed"))
            .stdout(predicate::str::contains("2-broken.m4a"));
        assert!(root.join("2-broken.m4a").exists());
        assert!(root.join("3.mp3").exists());
        assert!(!root.join("3.m4a").exists());
    }

    #[test]
    fn test_check_mode() {
        let bin_dir = TempDir::new().unwrap();
        let ffmpeg = fake_ffmpeg(bin_dir.path());
        let temp_dir = TempDir::new().unwrap();

        convert_audio()
            .arg(temp_dir.path())
            .arg("--ffmpeg")
            .arg(&ffmpeg)
            .arg("--check")
            .assert()
            .success()
            .stdout(predicate::str::contains("Config OK"));
    }
}
