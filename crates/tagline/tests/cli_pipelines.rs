#![cfg(feature = "cli")]

use std::ffi::OsStr;
use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Output, Stdio};

fn unique_temp_dir(tag: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "tagline-{tag}-{}-{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .expect("time should be after epoch")
            .as_nanos()
    ));
    std::fs::create_dir_all(&dir).expect("temp dir should be creatable");
    dir
}

/// Run the binary with `stdin` piped in and collect its output.
fn tagline<I, S>(args: I, stdin: &[u8]) -> Output
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let mut child = Command::new(env!("CARGO_BIN_EXE_tagline"))
        .args(["--log-level", "off"])
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("tagline should start");

    let mut input = child.stdin.take().expect("stdin should be piped");
    // Commands that never read stdin may exit before the write lands.
    let _ = input.write_all(stdin);
    drop(input);

    child.wait_with_output().expect("tagline should finish")
}

#[test]
fn write_emits_records() {
    let out = tagline(&["write", "--label", "count", "--unsigned", "42"], b"");
    assert!(out.status.success());
    assert_eq!(out.stdout, b"count:42\n");

    let out = tagline(
        &[
            "write",
            "-l",
            "id",
            "-u",
            "e4fa98a6-929a-4436-9f66-c38f9371db62",
        ],
        b"",
    );
    assert_eq!(out.stdout, b"id:e4fa98a6-929a-4436-9f66-c38f9371db62\n");

    let out = tagline(&["write", "--label", "name", "--string", "John"], b"");
    assert_eq!(out.stdout, b"name:4:John\n");
}

#[cfg(unix)]
#[test]
fn write_string_keeps_raw_argument_bytes() {
    use std::os::unix::ffi::OsStrExt;

    let raw = OsStr::from_bytes(b"caf\xe9");
    let args = [
        OsStr::new("write"),
        OsStr::new("--label"),
        OsStr::new("name"),
        OsStr::new("--string"),
        raw,
    ];
    let out = tagline(args, b"");
    assert!(out.status.success());
    assert_eq!(out.stdout, b"name:4:caf\xe9\n");

    let args = [
        OsStr::new("expect"),
        OsStr::new("--quiet"),
        OsStr::new("--label"),
        OsStr::new("name"),
        OsStr::new("--string"),
        raw,
    ];
    assert!(tagline(args, &out.stdout).status.success());
}

#[test]
fn write_blob_from_file() {
    let dir = unique_temp_dir("write-blob");
    let path = dir.join("blob.bin");
    std::fs::write(&path, b"a\0b\nc").expect("blob file should be writable");

    let out = tagline(
        &["write", "--label", "data", "--blob", path.to_str().unwrap()],
        b"",
    );
    assert!(out.status.success());
    assert_eq!(out.stdout, b"data:5:a\0b\nc\n");

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn write_chain_appends_after_input() {
    let out = tagline(
        &["write", "--chain", "--label", "second", "--unsigned", "2"],
        b"first:1\n",
    );
    assert!(out.status.success());
    assert_eq!(out.stdout, b"first:1\nsecond:2\n");
}

#[test]
fn read_echoes_value() {
    let out = tagline(&["read", "--label", "count", "--unsigned"], b"count:42\n");
    assert!(out.status.success());
    assert_eq!(out.stdout, b"42\n");

    let out = tagline(&["read", "--label", "data", "--blob"], b"data:3:x\ny\n");
    assert_eq!(out.stdout, b"x\ny");
}

#[test]
fn read_quiet_prints_nothing() {
    let out = tagline(
        &["read", "--quiet", "--label", "name", "--string"],
        b"name:4:John\n",
    );
    assert!(out.status.success());
    assert!(out.stdout.is_empty());
}

#[test]
fn read_chain_passes_rest_through() {
    let out = tagline(
        &["read", "--chain", "--label", "count", "--unsigned"],
        b"count:42\nname:4:John\n",
    );
    assert!(out.status.success());
    assert_eq!(out.stdout, b"name:4:John\n");
}

#[test]
fn read_json_format() {
    let out = tagline(
        &["read", "--format", "json", "--label", "name", "--string"],
        b"name:4:John\n",
    );
    assert!(out.status.success());
    let json: serde_json::Value =
        serde_json::from_slice(&out.stdout).expect("output should be json");
    assert_eq!(json["label"], "name");
    assert_eq!(json["value"], "John");
}

#[test]
fn expect_match_and_mismatch() {
    let out = tagline(&["expect", "--label", "count", "--unsigned", "42"], b"count:42\n");
    assert!(out.status.success());
    assert_eq!(out.stdout, b"42\n");

    let out = tagline(&["expect", "--label", "count", "--unsigned", "43"], b"count:42\n");
    assert_eq!(out.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&out.stderr).contains("expected 43 but found 42"));
}

#[test]
fn expect_capitalized_label_is_malformed() {
    let out = tagline(&["expect", "--label", "count", "--unsigned", "4"], b"Count:4\n");
    assert_eq!(out.status.code(), Some(60));
}

#[test]
fn expect_blob_against_file() {
    let dir = unique_temp_dir("expect-blob");
    let path = dir.join("expected.bin");
    std::fs::write(&path, b"\x00\x01\x02").expect("blob file should be writable");
    let path = path.to_str().unwrap();

    let out = tagline(
        &["expect", "--quiet", "--label", "data", "--blob", path],
        b"data:3:\x00\x01\x02\n",
    );
    assert!(out.status.success());

    let out = tagline(
        &["expect", "--label", "data", "--blob", path],
        b"data:2:\x00\x01\n",
    );
    assert_eq!(out.status.code(), Some(1));

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn large_blob_mismatch_reports_briefly() {
    let dir = unique_temp_dir("blob-mismatch");
    let path = dir.join("expected.bin");
    std::fs::write(&path, vec![b'b'; 200_000]).expect("blob file should be writable");

    let mut stdin = b"data:200000:".to_vec();
    stdin.extend(std::iter::repeat(b'a').take(200_000));
    stdin.push(b'\n');

    let out = tagline(
        &["expect", "--label", "data", "--blob", path.to_str().unwrap()],
        &stdin,
    );
    assert_eq!(out.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.len() < 256, "{stderr}");
    assert!(stderr.contains("at offset 0"), "{stderr}");

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn truncated_blob_is_malformed() {
    let out = tagline(&["read", "--label", "data", "--blob"], b"data:10:abcdef");
    assert_eq!(out.status.code(), Some(60));
}

#[test]
fn invalid_label_is_a_usage_error() {
    let out = tagline(&["write", "--label", "Count", "--unsigned", "1"], b"");
    assert_eq!(out.status.code(), Some(64));
    assert!(out.stdout.is_empty());
}

#[test]
fn invalid_unsigned_argument_is_a_usage_error() {
    let out = tagline(&["write", "--label", "count", "--unsigned", "12abc"], b"");
    assert_eq!(out.status.code(), Some(64));
}

#[test]
fn missing_blob_file_fails_without_consuming_input() {
    let out = tagline(
        &[
            "expect",
            "--label",
            "data",
            "--blob",
            "/nonexistent/tagline/blob.bin",
        ],
        b"data:1:x\n",
    );
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("/nonexistent/tagline/blob.bin"));
}

#[test]
fn chained_pipeline_builds_and_verifies_fixture() {
    let first = tagline(&["write", "--label", "id", "--unsigned", "7"], b"");
    let second = tagline(
        &["write", "--chain", "--label", "name", "--string", "fixture"],
        &first.stdout,
    );
    assert_eq!(second.stdout, b"id:7\nname:7:fixture\n");

    let verified = tagline(
        &["expect", "--chain", "--label", "id", "--unsigned", "7"],
        &second.stdout,
    );
    assert!(verified.status.success());

    let last = tagline(
        &["expect", "--label", "name", "--string", "fixture"],
        &verified.stdout,
    );
    assert!(last.status.success());
    assert_eq!(last.stdout, b"fixture\n");
}

#[test]
fn version_prints_name() {
    let out = tagline(&["version"], b"");
    assert!(out.status.success());
    assert!(String::from_utf8_lossy(&out.stdout).starts_with("tagline "));
}
